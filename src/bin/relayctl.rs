//! relayctl
//!
//! Lists FT245R relay boards and switches or queries their relays.
//!
//! ```text
//! relayctl list
//! relayctl --serial A907QJ3S on 1 3
//! relayctl off 3
//! relayctl status --json
//! ```
//!
//! Without `--serial` the first board found is used.  Logging goes to stderr
//! and can be controlled via the `RUST_LOG` environment variable.
use clap::{Parser, Subcommand};
use ft245r_relay::{Board, BoardBuilder, Driver, Error, Relay, RelayState};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Serial number of the board to use
    #[arg(short, long, global = true)]
    serial: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List attached boards
    List {
        #[arg(long)]
        json: bool,
    },
    /// Switch relays on
    On {
        #[arg(required = true, value_parser = parse_relay)]
        relays: Vec<Relay>,
    },
    /// Switch relays off
    Off {
        #[arg(required = true, value_parser = parse_relay)]
        relays: Vec<Relay>,
    },
    /// Show the state of every relay
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn parse_relay(arg: &str) -> Result<Relay, String> {
    let number = arg
        .parse::<u8>()
        .map_err(|e| format!("{arg} is not a relay number: {e}"))?;
    Relay::new(number).map_err(|e| e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Output {
        message: e.to_string(),
    })
}

fn switch(serial: Option<&str>, relays: &[Relay], state: RelayState) -> Result<(), Error> {
    let mut builder = BoardBuilder::new();
    if let Some(serial) = serial {
        builder.serial(serial);
    }
    let mut board = builder.build()?;
    for relay in relays {
        board.switch(*relay, state)?;
        println!("{}: {} {}", board.info().serial(), relay, state);
    }
    Ok(())
}

fn execute(args: Args) -> Result<(), Error> {
    let serial = args.serial.as_deref();
    match args.command {
        Command::List { json } => {
            let driver = BoardBuilder::new().build_driver()?;
            let devices = driver.list_devices()?;
            if json {
                println!("{}", to_json(&devices)?);
            } else if devices.is_empty() {
                println!("{}", ft245r_relay::constants::NO_DEVICES_MESSAGE);
            } else {
                for info in &devices {
                    println!("FT245R relay board:");
                    info.print();
                }
            }
        }
        Command::On { relays } => switch(serial, &relays, RelayState::On)?,
        Command::Off { relays } => switch(serial, &relays, RelayState::Off)?,
        Command::Status { json } => {
            let mut builder = BoardBuilder::new();
            if let Some(serial) = serial {
                builder.serial(serial);
            }
            let mut board = builder.build()?;
            let states = board.states()?;
            if json {
                let states: Vec<(u8, RelayState)> =
                    states.iter().map(|(r, s)| (r.number(), s)).collect();
                println!("{}", to_json(&states)?);
            } else {
                println!("{} {}", board.info().serial(), states);
                for (relay, state) in states.iter() {
                    println!("  {}: {}", relay, state);
                }
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = execute(args) {
        error!("Error: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
