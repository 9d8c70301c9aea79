//! Factory calibration block
//!
//! Every device ships with per-unit trim coefficients burned into NVM at
//! 0x31..0x45. They are read once after reset and feed the integer
//! compensation in [`crate::compensation`].

use crate::registers;

/// Trim coefficients read from the calibration block
///
/// Multi-byte coefficients are stored little-endian; signedness follows the
/// datasheet's per-coefficient types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    /// Temperature coefficient T1
    pub par_t1: u16,
    /// Temperature coefficient T2
    pub par_t2: u16,
    /// Temperature coefficient T3
    pub par_t3: i8,
    /// Pressure coefficient P1
    pub par_p1: i16,
    /// Pressure coefficient P2
    pub par_p2: i16,
    /// Pressure coefficient P3
    pub par_p3: i8,
    /// Pressure coefficient P4
    pub par_p4: i8,
    /// Pressure coefficient P5
    pub par_p5: u16,
    /// Pressure coefficient P6
    pub par_p6: u16,
    /// Pressure coefficient P7
    pub par_p7: i8,
    /// Pressure coefficient P8
    pub par_p8: i8,
    /// Pressure coefficient P9
    pub par_p9: i16,
    /// Pressure coefficient P10
    pub par_p10: i8,
    /// Pressure coefficient P11
    pub par_p11: i8,
}

impl CalibrationData {
    /// Decode the raw calibration block
    pub fn from_registers(raw: &[u8; registers::CALIB_LEN]) -> Self {
        Self {
            par_t1: u16::from_le_bytes([raw[0], raw[1]]),
            par_t2: u16::from_le_bytes([raw[2], raw[3]]),
            par_t3: raw[4] as i8,
            par_p1: i16::from_le_bytes([raw[5], raw[6]]),
            par_p2: i16::from_le_bytes([raw[7], raw[8]]),
            par_p3: raw[9] as i8,
            par_p4: raw[10] as i8,
            par_p5: u16::from_le_bytes([raw[11], raw[12]]),
            par_p6: u16::from_le_bytes([raw[13], raw[14]]),
            par_p7: raw[15] as i8,
            par_p8: raw[16] as i8,
            par_p9: i16::from_le_bytes([raw[17], raw[18]]),
            par_p10: raw[19] as i8,
            par_p11: raw[20] as i8,
        }
    }
}
