//! BMP388/BMP390 register definitions
//!
//! Addresses and bit masks for the device register map. The two chips share
//! one map and differ only in the identity code.

// =============================================================================
// Identity
// =============================================================================

/// Chip identity register
pub const CHIP_ID: u8 = 0x00;

/// Identity code reported by the BMP388
pub const CHIP_ID_BMP388: u8 = 0x50;

/// Identity code reported by the BMP390
pub const CHIP_ID_BMP390: u8 = 0x60;

// =============================================================================
// Status and Data
// =============================================================================

/// Error condition flags
pub const ERR_REG: u8 = 0x02;

/// Fatal error flag (bit 0 of ERR_REG)
pub const ERR_FATAL: u8 = 1 << 0;

/// Command execution error flag (bit 1 of ERR_REG)
pub const ERR_CMD: u8 = 1 << 1;

/// Configuration error flag (bit 2 of ERR_REG)
pub const ERR_CONF: u8 = 1 << 2;

/// Sensor status flags
pub const STATUS: u8 = 0x03;

/// Command decoder ready for a new command (bit 4 of STATUS)
pub const STATUS_CMD_RDY: u8 = 1 << 4;

/// Pressure conversion complete (bit 5 of STATUS)
pub const STATUS_DRDY_PRESS: u8 = 1 << 5;

/// Temperature conversion complete (bit 6 of STATUS)
pub const STATUS_DRDY_TEMP: u8 = 1 << 6;

/// First data register: pressure LSB, then 0x05/0x06 up to the MSB,
/// followed by temperature LSB..MSB at 0x07..0x09
pub const DATA0: u8 = 0x04;

/// Length of one pressure + temperature burst read
pub const DATA_LEN: usize = 6;

/// Device-internal sample timestamp, 0x0C..0x0F (not read by this driver)
pub const SENSORTIME0: u8 = 0x0C;

/// Event flags (power-on / interface transition detection)
pub const EVENT: u8 = 0x10;

/// Interrupt status flags
pub const INT_STATUS: u8 = 0x11;

// =============================================================================
// FIFO
// =============================================================================
//
// The FIFO register block is declared for map completeness; this driver
// defines no FIFO read or configuration path.

/// FIFO fill level LSB
pub const FIFO_LENGTH0: u8 = 0x12;

/// FIFO fill level MSB
pub const FIFO_LENGTH1: u8 = 0x13;

/// FIFO data output
pub const FIFO_DATA: u8 = 0x14;

/// FIFO watermark LSB
pub const FIFO_WTM0: u8 = 0x15;

/// FIFO watermark MSB
pub const FIFO_WTM1: u8 = 0x16;

/// FIFO configuration 1
pub const FIFO_CONFIG1: u8 = 0x17;

/// FIFO configuration 2
pub const FIFO_CONFIG2: u8 = 0x18;

// =============================================================================
// Control and Configuration
// =============================================================================

/// Interrupt output control
pub const INT_CTRL: u8 = 0x19;

/// Data-ready interrupt enable (bit 6 of INT_CTRL)
pub const INT_CTRL_DRDY_EN: u8 = 1 << 6;

/// Serial interface configuration (left at defaults by this driver)
pub const IF_CONF: u8 = 0x1A;

/// Measurement enable and power mode control
pub const PWR_CTRL: u8 = 0x1B;

/// Pressure measurement enable (bit 0 of PWR_CTRL)
pub const PWR_CTRL_PRESS_EN: u8 = 1 << 0;

/// Temperature measurement enable (bit 1 of PWR_CTRL)
pub const PWR_CTRL_TEMP_EN: u8 = 1 << 1;

/// Position of the mode field in PWR_CTRL
pub const PWR_CTRL_MODE_POS: u8 = 4;

/// Mask of the mode field in PWR_CTRL (bits 5:4)
pub const PWR_CTRL_MODE_MASK: u8 = 0x30;

/// Oversampling settings
pub const OSR: u8 = 0x1C;

/// Mask of the pressure oversampling field (bits 2:0 of OSR)
pub const OSR_PRESS_MASK: u8 = 0x07;

/// Position of the temperature oversampling field in OSR
pub const OSR_TEMP_POS: u8 = 3;

/// Mask of the temperature oversampling field (bits 5:3 of OSR)
pub const OSR_TEMP_MASK: u8 = 0x38;

/// Output data rate setting
pub const ODR: u8 = 0x1D;

/// Mask of the output data rate field (bits 4:0 of ODR)
pub const ODR_MASK: u8 = 0x1F;

/// IIR filter configuration
pub const CONFIG: u8 = 0x1F;

/// Position of the IIR filter coefficient field in CONFIG
pub const CONFIG_IIR_POS: u8 = 1;

/// Mask of the IIR filter coefficient field (bits 3:1 of CONFIG)
pub const CONFIG_IIR_MASK: u8 = 0x0E;

// =============================================================================
// Calibration and Commands
// =============================================================================

/// Base address of the factory calibration block
pub const CALIB0: u8 = 0x31;

/// Length of the factory calibration block in bytes
pub const CALIB_LEN: usize = 21;

/// Command register
pub const CMD: u8 = 0x7E;

/// CMD value: flush the FIFO (FIFO itself is unused by this driver)
pub const CMD_FIFO_FLUSH: u8 = 0xB0;

/// CMD value: soft reset, restoring power-on defaults
pub const CMD_SOFT_RESET: u8 = 0xB6;
