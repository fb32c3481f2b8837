//! Relay numbering and state objects
use crate::constants::{RELAY_MAX, RELAY_MIN};
use crate::Error;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A relay number on the board, validated to lie within
/// [`RELAY_MIN`]..=[`RELAY_MAX`].  Used by [`crate::Board`] functions which
/// require a relay to be specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relay(u8);

impl Relay {
    /// Create a new Relay object
    pub fn new(number: u8) -> Result<Self, Error> {
        Self::validate(number)?;
        Ok(Self(number))
    }

    /// Returns the relay number
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// Returns the bit in the output byte which drives this relay
    pub const fn mask(&self) -> u8 {
        1 << (self.0 - RELAY_MIN)
    }

    /// Iterate over every relay on the board
    pub fn all() -> impl Iterator<Item = Relay> {
        (RELAY_MIN..=RELAY_MAX).map(Relay)
    }

    fn validate(number: u8) -> Result<(), Error> {
        trace!("Relay::validate: number {number}");

        if number < RELAY_MIN {
            trace!("Relay {number} below minimum {RELAY_MIN}");
            Err(Error::Args {
                message: format!("Relay number {number} is less than minimum {RELAY_MIN}"),
            })
        } else if number > RELAY_MAX {
            trace!("Relay {number} above maximum {RELAY_MAX}");
            Err(Error::Args {
                message: format!("Relay number {number} is greater than maximum {RELAY_MAX}"),
            })
        } else {
            Ok(())
        }
    }
}

impl TryFrom<u8> for Relay {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Relay::new(number)
    }
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "relay {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayState {
    On,
    Off,
}

impl From<bool> for RelayState {
    fn from(on: bool) -> Self {
        if on {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelayState::On => write!(f, "on"),
            RelayState::Off => write!(f, "off"),
        }
    }
}

/// The state of all 8 relays, as the byte latched onto the FT245R data pins.
/// Bit n-1 drives relay n.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStates(u8);

impl RelayStates {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn get(&self, relay: Relay) -> RelayState {
        (self.0 & relay.mask() != 0).into()
    }

    pub fn set(&mut self, relay: Relay, state: RelayState) {
        match state {
            RelayState::On => self.0 |= relay.mask(),
            RelayState::Off => self.0 &= !relay.mask(),
        }
    }

    /// Returns a copy with `relay` changed to `state`, leaving the others as they are
    pub fn with(mut self, relay: Relay, state: RelayState) -> Self {
        self.set(relay, state);
        self
    }

    /// Iterate over (relay, state) pairs in relay order
    pub fn iter(&self) -> impl Iterator<Item = (Relay, RelayState)> + '_ {
        Relay::all().map(move |relay| (relay, self.get(relay)))
    }
}

impl fmt::Display for RelayStates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#010b}", self.0)
    }
}
