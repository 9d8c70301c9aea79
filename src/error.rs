//! Driver error types
//!
//! This module defines the error types surfaced by the driver. Transport
//! implementations map their HAL-specific errors to [`BusError`] variants,
//! and driver operations wrap those in [`Error`] together with the failures
//! the driver detects itself.

use core::fmt;

/// I2C-specific faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cFault {
    /// Bus error occurred
    Bus,
    /// Arbitration lost
    ArbitrationLoss,
    /// No acknowledgment received
    Nack,
    /// Receive overrun
    Overrun,
    /// Other controller-specific fault
    Other,
}

/// SPI-specific faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiFault {
    /// Receive overrun
    Overrun,
    /// Mode fault
    ModeFault,
    /// Frame format error
    FrameFormat,
    /// Chip select fault
    ChipSelect,
    /// Other controller-specific fault
    Other,
}

/// Transport-level errors
///
/// All bus implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// I2C operation failed
    I2c(I2cFault),
    /// SPI operation failed
    Spi(SpiFault),
    /// Transfer returned fewer bytes than requested
    Incomplete,
}

/// Driver-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus transfer failed
    Bus(BusError),
    /// Chip identity does not match a supported device
    UnsupportedDevice(u8),
    /// Reading the factory calibration block failed
    Calibration(BusError),
    /// Conversion did not complete within the polling window
    ConversionTimeout,
    /// Writing the measurement configuration failed
    Configuration(BusError),
    /// No trigger dispatch path is available in the current mode or state
    TriggerUnavailable,
}

impl From<BusError> for Error {
    fn from(err: BusError) -> Self {
        Error::Bus(err)
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::I2c(e) => write!(f, "I2C fault: {:?}", e),
            BusError::Spi(e) => write!(f, "SPI fault: {:?}", e),
            BusError::Incomplete => write!(f, "Incomplete transfer"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "Bus error: {}", e),
            Error::UnsupportedDevice(id) => write!(f, "Unsupported device id {:#04x}", id),
            Error::Calibration(e) => write!(f, "Calibration read failed: {}", e),
            Error::ConversionTimeout => write!(f, "Conversion timed out"),
            Error::Configuration(e) => write!(f, "Configuration write failed: {}", e),
            Error::TriggerUnavailable => write!(f, "Trigger dispatch unavailable"),
        }
    }
}
