//! Error type for the ADP5360 driver.

use core::fmt::{self, Debug, Display};

/// An error returned by the ADP5360 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The I2C transaction failed.
    I2c(E),
    /// A bit index outside `0..=7` was passed in.
    InvalidBit(u8),
    /// The device did not answer the presence check.
    DeviceNotFound,
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "I2C error: {err:?}"),
            Self::InvalidBit(bit) => write!(f, "bit index {bit} is out of range 0..=7"),
            Self::DeviceNotFound => write!(f, "ADP5360 did not respond"),
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}
