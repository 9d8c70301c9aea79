//! Register bus transports
//!
//! The device speaks the same register-addressed protocol over SPI and I2C.
//! [`RegisterBus`] captures that contract; the driver is generic over it and
//! never branches on the bus kind. One transport is chosen at construction
//! and fixed for the instance's lifetime.

mod i2c;
mod spi;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use i2c::{I2cBus, I2C_ADDR_PRIMARY, I2C_ADDR_SECONDARY};
pub use spi::SpiBus;

use crate::error::BusError;
use crate::registers;

/// Register-addressed transport over one of the supported buses
#[allow(async_fn_in_trait)]
pub trait RegisterBus {
    /// Read consecutive registers starting at `reg` into `buf`
    ///
    /// The whole transfer is one bus transaction, so multi-byte reads
    /// cannot tear.
    async fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError>;

    /// Write a single register
    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError>;

    /// Probe the identity register for a known chip
    async fn check(&mut self) -> Result<bool, BusError> {
        let mut id = [0u8; 1];
        self.read_registers(registers::CHIP_ID, &mut id).await?;
        Ok(matches!(
            id[0],
            registers::CHIP_ID_BMP388 | registers::CHIP_ID_BMP390
        ))
    }
}
