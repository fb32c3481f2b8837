//! A mock [`Driver`] and [`Board`] which record every call into a shared
//! event log, so tests can check both what was done and in what order.
use super::{Board, DeviceInfo, Driver};
use crate::error::DeviceAccessKind;
use crate::workflow::Waiter;
use crate::{Error, Relay, RelayState, RelayStates};

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    List,
    Connect(String),
    Switch(u8, RelayState),
    Wait(Duration),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug)]
pub struct MockDriver {
    devices: Vec<DeviceInfo>,
    log: EventLog,
    connect_fails: bool,
    fail_after_switches: Option<usize>,
}

impl MockDriver {
    pub fn with_serials(serials: &[&str]) -> Self {
        let devices = serials
            .iter()
            .enumerate()
            .map(|(ii, serial)| DeviceInfo {
                serial_number: Some(serial.to_string()),
                device_address: ii as u8 + 1,
                ..Default::default()
            })
            .collect();
        MockDriver {
            devices,
            log: Rc::new(RefCell::new(Vec::new())),
            connect_fails: false,
            fail_after_switches: None,
        }
    }

    /// Makes connect behave as if the board was unplugged after enumeration
    pub fn connect_fails(mut self) -> Self {
        self.connect_fails = true;
        self
    }

    /// Makes the connected board fail every switch after the first `count`
    pub fn fail_after_switches(mut self, count: usize) -> Self {
        self.fail_after_switches = Some(count);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    /// A waiter which records into the same log as this driver
    pub fn waiter(&self) -> MockWaiter {
        MockWaiter {
            log: self.log.clone(),
        }
    }
}

impl Driver for MockDriver {
    type Board = MockBoard;

    fn list_devices(&self) -> Result<Vec<DeviceInfo>, Error> {
        self.log.borrow_mut().push(Event::List);
        Ok(self.devices.clone())
    }

    fn connect(&self, info: &DeviceInfo) -> Result<MockBoard, Error> {
        self.log
            .borrow_mut()
            .push(Event::Connect(info.serial().to_string()));
        if self.connect_fails {
            return Err(DeviceAccessKind::Gone {
                serial: info.serial().to_string(),
            }
            .into());
        }
        Ok(MockBoard {
            info: info.clone(),
            states: RelayStates::default(),
            log: self.log.clone(),
            switches_left: self.fail_after_switches,
        })
    }
}

#[derive(Debug)]
pub struct MockBoard {
    info: DeviceInfo,
    states: RelayStates,
    log: EventLog,
    switches_left: Option<usize>,
}

impl MockBoard {
    fn take_switch(&mut self) -> Result<(), Error> {
        match self.switches_left {
            Some(0) => Err(rusb::Error::NoDevice.into()),
            Some(ref mut n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Board for MockBoard {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn switch(&mut self, relay: Relay, state: RelayState) -> Result<(), Error> {
        self.take_switch()?;
        self.log
            .borrow_mut()
            .push(Event::Switch(relay.number(), state));
        self.states.set(relay, state);
        Ok(())
    }

    fn switch_all(&mut self, states: RelayStates) -> Result<(), Error> {
        self.take_switch()?;
        for (relay, state) in states.iter() {
            if self.states.get(relay) != state {
                self.log
                    .borrow_mut()
                    .push(Event::Switch(relay.number(), state));
            }
        }
        self.states = states;
        Ok(())
    }

    fn states(&mut self) -> Result<RelayStates, Error> {
        Ok(self.states)
    }
}

#[derive(Debug)]
pub struct MockWaiter {
    log: EventLog,
}

impl Waiter for MockWaiter {
    fn wait(&mut self, dur: Duration) {
        self.log.borrow_mut().push(Event::Wait(dur));
    }
}
