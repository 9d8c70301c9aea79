//! Raw sample parsing and compensation
//!
//! Implements the datasheet's 64-bit integer compensation. Temperature is
//! linearized first and the linearized value feeds the pressure polynomial,
//! so the two stages always run in order over one burst of raw counts.

use crate::calibration::CalibrationData;
use crate::registers;

/// Uncompensated conversion counts from one burst read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// 24-bit pressure counts
    pub pressure: u32,
    /// 24-bit temperature counts
    pub temperature: u32,
}

impl RawSample {
    /// Decode one data-register burst, LSB first within each channel
    pub fn from_registers(raw: &[u8; registers::DATA_LEN]) -> Self {
        Self {
            pressure: u32::from(raw[0]) | u32::from(raw[1]) << 8 | u32::from(raw[2]) << 16,
            temperature: u32::from(raw[3]) | u32::from(raw[4]) << 8 | u32::from(raw[5]) << 16,
        }
    }
}

/// Compensated measurement in fixed-point physical units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Temperature in hundredths of a degree Celsius
    pub temperature: i32,
    /// Pressure in hundredths of a Pascal
    pub pressure: u32,
}

impl Measurement {
    /// Temperature in degrees Celsius
    pub fn temperature_celsius(self) -> f32 {
        self.temperature as f32 / 100.0
    }

    /// Pressure in Pascal
    pub fn pressure_pascal(self) -> f32 {
        self.pressure as f32 / 100.0
    }

    /// Pressure in hectopascal (millibar)
    pub fn pressure_hectopascal(self) -> f32 {
        self.pressure as f32 / 10_000.0
    }
}

/// Apply the integer compensation to one raw sample
///
/// Pure transform with no failure mode. The caller guarantees the raw
/// counts and trims came from the same device.
pub fn compensate(raw: RawSample, cal: &CalibrationData) -> Measurement {
    let t_lin = linearize_temperature(raw.temperature, cal);
    Measurement {
        temperature: ((t_lin * 25) / 16384) as i32,
        pressure: compensate_pressure(raw.pressure, t_lin, cal),
    }
}

/// Linearized temperature, the shared input of both output channels
fn linearize_temperature(raw_temp: u32, cal: &CalibrationData) -> i64 {
    let pd1 = i64::from(raw_temp) - 256 * i64::from(cal.par_t1);
    let pd2 = i64::from(cal.par_t2) * pd1;
    let pd3 = pd1 * pd1;
    let pd4 = pd3 * i64::from(cal.par_t3);
    let pd5 = pd2 * 262144 + pd4;
    pd5 / 4294967296
}

fn compensate_pressure(raw_press: u32, t_lin: i64, cal: &CalibrationData) -> u32 {
    let raw = i64::from(raw_press);

    let pd1 = t_lin * t_lin;
    let pd2 = pd1 / 64;
    let pd3 = (pd2 * t_lin) / 256;
    let pd4 = (i64::from(cal.par_p8) * pd3) / 32;
    let pd5 = (i64::from(cal.par_p7) * pd1) * 16;
    let pd6 = (i64::from(cal.par_p6) * t_lin) * 4194304;
    let offset = i64::from(cal.par_p5) * 140737488355328 + pd4 + pd5 + pd6;

    let pd2 = (i64::from(cal.par_p4) * pd3) / 32;
    let pd4 = (i64::from(cal.par_p3) * pd1) * 4;
    let pd5 = (i64::from(cal.par_p2) - 16384) * t_lin * 2097152;
    let sensitivity = (i64::from(cal.par_p1) - 16384) * 70368744177664 + pd2 + pd4 + pd5;

    let pd1 = (sensitivity / 16777216) * raw;
    let pd2 = i64::from(cal.par_p10) * t_lin;
    let pd3 = pd2 + 65536 * i64::from(cal.par_p9);
    let pd4 = (pd3 * raw) / 8192;
    // raw * pd4 does not fit in 64 bits; scale by 10 around the divide
    let pd5 = (raw * (pd4 / 10)) / 512 * 10;
    let pd6 = raw * raw;
    let pd2 = (i64::from(cal.par_p11) * pd6) / 65536;
    let pd3 = (pd2 * raw) / 128;
    let pd4 = offset / 4 + pd1 + pd5 + pd3;

    // pd4 goes negative with degenerate trims and pd4 * 25 can leave i64;
    // widen for the final scale and clamp into the u32 output range
    let comp = (i128::from(pd4) * 25) / 1099511627776;
    comp.clamp(0, i128::from(u32::MAX)) as u32
}
