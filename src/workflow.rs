//! The relay demonstration workflow: list the attached boards, pick the
//! first, and click two of its relays on and off.
use crate::constants::{DEMO_RELAY_A, DEMO_RELAY_B, NO_DEVICES_MESSAGE};
use crate::{Board, DeviceInfo, Driver, Error, Relay, RelayState};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::io::Write;
use std::thread::sleep;
use std::time::Duration;

/// Something which can block for a period of time.  Lets tests run the
/// workflow without real delays.
pub trait Waiter {
    fn wait(&mut self, dur: Duration);
}

/// Waits by putting the current thread to sleep
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadWaiter;

impl Waiter for ThreadWaiter {
    fn wait(&mut self, dur: Duration) {
        trace!("ThreadWaiter::wait {dur:?}");
        sleep(dur);
    }
}

/// One step of the demo sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoStep {
    Switch(u8, RelayState),
    Wait,
}

/// The fixed sequence run against the selected board
pub const DEMO_SEQUENCE: [DemoStep; 6] = [
    DemoStep::Switch(DEMO_RELAY_A, RelayState::On),
    DemoStep::Switch(DEMO_RELAY_B, RelayState::On),
    DemoStep::Wait,
    DemoStep::Switch(DEMO_RELAY_A, RelayState::Off),
    DemoStep::Wait,
    DemoStep::Switch(DEMO_RELAY_B, RelayState::Off),
];

/// How a demo run finished
#[derive(Debug, Clone, PartialEq)]
pub enum DemoOutcome {
    /// Enumeration found nothing, so nothing was switched
    NoDevices,
    /// The sequence ran to completion on the board with this serial number
    Completed { serial: String },
}

/// Picks the board to use from an enumeration - always the first
pub fn select_device(devices: &[DeviceInfo]) -> Option<&DeviceInfo> {
    devices.first()
}

/// Runs the demo against `driver`.
///
/// Prints the serial number of each board found to `out`, then the board
/// chosen, then connects and runs [`DEMO_SEQUENCE`], waiting `delay` at each
/// [`DemoStep::Wait`].
///
/// # Returns
/// * `Ok(DemoOutcome)` - Either no boards were found, or the sequence
///   completed
/// * `Err(Error)` - Enumeration, connection or a relay switch failed.  The
///   sequence stops at the first failure and relays already switched are
///   left as they are
pub fn run_demo<D, W, O>(
    driver: &D,
    waiter: &mut W,
    out: &mut O,
    delay: Duration,
) -> Result<DemoOutcome, Error>
where
    D: Driver,
    W: Waiter,
    O: Write,
{
    trace!("run_demo delay {delay:?}");
    let devices = driver.list_devices()?;

    let Some(device) = select_device(&devices) else {
        print_line(out, NO_DEVICES_MESSAGE)?;
        return Ok(DemoOutcome::NoDevices);
    };

    for info in &devices {
        print_line(out, info.serial())?;
    }

    print_line(
        out,
        &format!("Using device with serial number {}", device.serial()),
    )?;

    let mut board = driver.connect(device)?;
    run_sequence(&mut board, waiter, delay)?;

    info!("Demo complete on {}", device.serial());
    Ok(DemoOutcome::Completed {
        serial: device.serial().to_string(),
    })
}

fn run_sequence<B, W>(board: &mut B, waiter: &mut W, delay: Duration) -> Result<(), Error>
where
    B: Board,
    W: Waiter,
{
    for step in DEMO_SEQUENCE {
        debug!("Demo step {step:?}");
        match step {
            DemoStep::Switch(number, state) => board.switch(Relay::new(number)?, state)?,
            DemoStep::Wait => waiter.wait(delay),
        }
    }
    Ok(())
}

fn print_line<O: Write>(out: &mut O, line: &str) -> Result<(), Error> {
    writeln!(out, "{line}").map_err(|e| Error::Output {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{Event, MockDriver};
    use crate::DeviceAccessKind;
    use std::time::Instant;

    const DELAY: Duration = Duration::from_millis(1000);

    fn output(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    fn switch_events(events: &[Event]) -> Vec<Event> {
        events
            .iter()
            .filter(|e| matches!(e, Event::Switch(..) | Event::Wait(_)))
            .cloned()
            .collect()
    }

    fn expected_sequence() -> Vec<Event> {
        vec![
            Event::Switch(2, RelayState::On),
            Event::Switch(4, RelayState::On),
            Event::Wait(DELAY),
            Event::Switch(2, RelayState::Off),
            Event::Wait(DELAY),
            Event::Switch(4, RelayState::Off),
        ]
    }

    #[test]
    fn test_no_devices() {
        let driver = MockDriver::with_serials(&[]);
        let mut waiter = driver.waiter();
        let mut out = Vec::new();

        let outcome = run_demo(&driver, &mut waiter, &mut out, DELAY).unwrap();

        assert_eq!(outcome, DemoOutcome::NoDevices);
        assert_eq!(output(out), vec!["No FT245R devices found"]);
        // No connect, switch or wait
        assert_eq!(driver.events(), vec![Event::List]);
    }

    #[test]
    fn test_two_devices() {
        let driver = MockDriver::with_serials(&["AB001", "AB002"]);
        let mut waiter = driver.waiter();
        let mut out = Vec::new();

        let outcome = run_demo(&driver, &mut waiter, &mut out, DELAY).unwrap();

        assert_eq!(
            outcome,
            DemoOutcome::Completed {
                serial: "AB001".to_string()
            }
        );
        assert_eq!(
            output(out),
            vec!["AB001", "AB002", "Using device with serial number AB001"]
        );

        let events = driver.events();
        assert_eq!(events[0], Event::List);
        assert_eq!(events[1], Event::Connect("AB001".to_string()));
        assert_eq!(switch_events(&events), expected_sequence());
    }

    #[test]
    fn test_always_connects_to_first() {
        for serials in [
            vec!["ZZ9"],
            vec!["ZZ9", "AA1"],
            vec!["B", "A", "C", "A"],
            vec!["", "X"],
        ] {
            let driver = MockDriver::with_serials(&serials);
            let mut waiter = driver.waiter();
            let mut out = Vec::new();
            run_demo(&driver, &mut waiter, &mut out, DELAY).unwrap();

            let connects: Vec<Event> = driver
                .events()
                .into_iter()
                .filter(|e| matches!(e, Event::Connect(_)))
                .collect();
            assert_eq!(connects, vec![Event::Connect(serials[0].to_string())]);
        }
    }

    #[test]
    fn test_serials_printed_in_order_before_using_line() {
        let serials = ["S3", "S1", "S2", "S0", "S9"];
        let driver = MockDriver::with_serials(&serials);
        let mut waiter = driver.waiter();
        let mut out = Vec::new();
        run_demo(&driver, &mut waiter, &mut out, DELAY).unwrap();

        let lines = output(out);
        assert_eq!(lines.len(), serials.len() + 1);
        assert_eq!(&lines[..serials.len()], &serials[..]);
        assert_eq!(
            lines[serials.len()],
            "Using device with serial number S3".to_string()
        );
    }

    #[test]
    fn test_sequence_independent_of_device_count() {
        for count in 1..=4 {
            let serials: Vec<String> = (0..count).map(|ii| format!("DEV{ii}")).collect();
            let serials: Vec<&str> = serials.iter().map(|s| s.as_str()).collect();
            let driver = MockDriver::with_serials(&serials);
            let mut waiter = driver.waiter();
            let mut out = Vec::new();
            run_demo(&driver, &mut waiter, &mut out, DELAY).unwrap();

            assert_eq!(switch_events(&driver.events()), expected_sequence());
        }
    }

    #[test]
    fn test_connect_failure_propagates() {
        let driver = MockDriver::with_serials(&["AB001"]).connect_fails();
        let mut waiter = driver.waiter();
        let mut out = Vec::new();

        let result = run_demo(&driver, &mut waiter, &mut out, DELAY);

        assert_eq!(
            result,
            Err(Error::DeviceAccess {
                kind: DeviceAccessKind::Gone {
                    serial: "AB001".to_string()
                }
            })
        );
        // The using line is printed before the connect is attempted
        assert_eq!(
            output(out),
            vec!["AB001", "Using device with serial number AB001"]
        );
        assert!(switch_events(&driver.events()).is_empty());
    }

    #[test]
    fn test_switch_failure_stops_sequence() {
        // Relay 2 and 4 go on, then the board vanishes
        let driver = MockDriver::with_serials(&["AB001"]).fail_after_switches(2);
        let mut waiter = driver.waiter();
        let mut out = Vec::new();

        let result = run_demo(&driver, &mut waiter, &mut out, DELAY);

        assert!(result.is_err());
        assert_eq!(
            switch_events(&driver.events()),
            vec![
                Event::Switch(2, RelayState::On),
                Event::Switch(4, RelayState::On),
                Event::Wait(DELAY),
            ]
        );
    }

    #[test]
    fn test_real_waits_take_at_least_delay() {
        let delay = Duration::from_millis(20);
        let driver = MockDriver::with_serials(&["AB001"]);
        let mut waiter = ThreadWaiter;
        let mut out = Vec::new();

        let start = Instant::now();
        run_demo(&driver, &mut waiter, &mut out, delay).unwrap();
        assert!(start.elapsed() >= delay * 2);
    }

    #[test]
    fn test_thread_waiter_blocks() {
        let delay = Duration::from_millis(15);
        let mut waiter = ThreadWaiter;
        let start = Instant::now();
        waiter.wait(delay);
        assert!(start.elapsed() >= delay);
    }

    #[test]
    fn test_select_device() {
        assert!(select_device(&[]).is_none());
        let devices = vec![
            DeviceInfo {
                serial_number: Some("AB001".to_string()),
                ..Default::default()
            },
            DeviceInfo {
                serial_number: Some("AB002".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(select_device(&devices).unwrap().serial(), "AB001");
    }

    #[test]
    fn test_demo_sequence_relays_are_valid() {
        for step in DEMO_SEQUENCE {
            if let DemoStep::Switch(number, _) = step {
                assert!(Relay::new(number).is_ok());
            }
        }
    }
}
