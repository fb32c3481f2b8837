//! Relay demo.
//!
//! Lists the FT245R relay boards attached over USB, picks the first one and
//! clicks relays 2 and 4 on and off, a second apart.
//!
//! Takes no arguments.  Logging goes to stderr and can be controlled via the
//! `RUST_LOG` environment variable.
//!
//! Exits 0 if the demo ran, and also if there were no boards to run it on.
//! Any other failure exits 1, leaving the relays as they were last set.
use ft245r_relay::constants::DEFAULT_SWITCH_DELAY;
use ft245r_relay::{run_demo, DemoOutcome, Error, ThreadWaiter, UsbDriver};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

fn execute() -> Result<DemoOutcome, Error> {
    info!("Create USB driver");
    let driver = UsbDriver::new(None)?;

    let mut stdout = std::io::stdout().lock();
    run_demo(&driver, &mut ThreadWaiter, &mut stdout, DEFAULT_SWITCH_DELAY)
}

fn main() {
    env_logger::builder().init();

    match execute() {
        Ok(DemoOutcome::NoDevices) => {
            warn!("Nothing to do - exiting without switching any relays");
            std::process::exit(0)
        }
        Ok(DemoOutcome::Completed { serial }) => {
            info!("All done with {serial} - exiting");
            std::process::exit(0)
        }
        Err(e) => {
            error!("Error: {}", e);
            // Use our own eprintln so our Error display is used instead of
            // Rust's default one
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
