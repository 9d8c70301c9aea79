#![cfg_attr(not(test), no_std)]

//! bmp3xx - Async driver for the Bosch BMP388/BMP390 barometer family
//!
//! This library provides register transports (SPI and I2C), factory
//! calibration handling, the datasheet's integer compensation, typed
//! measurement configuration, and data-ready trigger dispatch.
//!
//! ```ignore
//! use bmp3xx::{Bmp3xx, Config, DispatchMode, I2cBus};
//!
//! let bus = I2cBus::new_primary(i2c);
//! let baro = Bmp3xx::new(bus, Config::default(), DispatchMode::Disabled).await?;
//! let measurement = baro.sample().await?;
//! let hpa = measurement.pressure_hectopascal();
//! ```

// Register transports (SPI, I2C, test mock)
pub mod bus;

// Factory calibration block
pub mod calibration;

// Raw sample parsing and integer compensation
pub mod compensation;

// Measurement configuration types
pub mod config;

// Driver composition
pub mod driver;

// Error types
pub mod error;

// Register map
pub mod registers;

// Data-ready trigger state machine
pub mod trigger;

// Log macros
mod logging;

pub use bus::{I2cBus, RegisterBus, SpiBus, I2C_ADDR_PRIMARY, I2C_ADDR_SECONDARY};
pub use calibration::CalibrationData;
pub use compensation::{compensate, Measurement, RawSample};
pub use config::{Config, IirFilter, OutputDataRate, Oversampling, PowerMode};
pub use driver::{Bmp3xx, ChipModel};
pub use error::{BusError, Error, I2cFault, SpiFault};
pub use trigger::{
    DataReadyHandler, DeferredWork, DispatchMode, TriggerPhase, WakeSignal, WorkQueue,
    EVENT_QUEUE_DEPTH,
};
