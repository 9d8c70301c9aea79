//! Measurement configuration types
//!
//! Typed settings for oversampling, output data rate, IIR filtering and
//! power mode. Each enum maps to the raw field value its register expects;
//! the driver shifts the value into position when writing.

/// Oversampling factor for pressure or temperature conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// 1x (no oversampling)
    #[default]
    X1,
    /// 2x
    X2,
    /// 4x
    X4,
    /// 8x
    X8,
    /// 16x
    X16,
    /// 32x
    X32,
}

impl Oversampling {
    /// Get the register field value for this factor
    pub fn register_value(self) -> u8 {
        match self {
            Oversampling::X1 => 0x00,
            Oversampling::X2 => 0x01,
            Oversampling::X4 => 0x02,
            Oversampling::X8 => 0x03,
            Oversampling::X16 => 0x04,
            Oversampling::X32 => 0x05,
        }
    }
}

/// Output data rate in normal mode
///
/// Each step halves the rate of the previous one, from 200 Hz down to one
/// sample every 655 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    /// 200 Hz (5 ms period)
    Hz200,
    /// 100 Hz (10 ms period)
    Hz100,
    /// 50 Hz (20 ms period)
    #[default]
    Hz50,
    /// 25 Hz (40 ms period)
    Hz25,
    /// 12.5 Hz (80 ms period)
    Hz12_5,
    /// 6.25 Hz (160 ms period)
    Hz6_25,
    /// 3.1 Hz (320 ms period)
    Hz3_1,
    /// 1.5 Hz (640 ms period)
    Hz1_5,
    /// 0.78 Hz (1.28 s period)
    Hz0_78,
    /// 0.39 Hz (2.56 s period)
    Hz0_39,
    /// 0.2 Hz (5.12 s period)
    Hz0_2,
    /// 0.1 Hz (10.24 s period)
    Hz0_1,
    /// 0.05 Hz (20.48 s period)
    Hz0_05,
    /// 0.02 Hz (40.96 s period)
    Hz0_02,
    /// 0.01 Hz (81.92 s period)
    Hz0_01,
    /// 0.006 Hz (163.84 s period)
    Hz0_006,
    /// 0.003 Hz (327.68 s period)
    Hz0_003,
    /// 0.0015 Hz (655.36 s period)
    Hz0_0015,
}

impl OutputDataRate {
    /// Get the register field value for this rate
    pub fn register_value(self) -> u8 {
        match self {
            OutputDataRate::Hz200 => 0x00,
            OutputDataRate::Hz100 => 0x01,
            OutputDataRate::Hz50 => 0x02,
            OutputDataRate::Hz25 => 0x03,
            OutputDataRate::Hz12_5 => 0x04,
            OutputDataRate::Hz6_25 => 0x05,
            OutputDataRate::Hz3_1 => 0x06,
            OutputDataRate::Hz1_5 => 0x07,
            OutputDataRate::Hz0_78 => 0x08,
            OutputDataRate::Hz0_39 => 0x09,
            OutputDataRate::Hz0_2 => 0x0A,
            OutputDataRate::Hz0_1 => 0x0B,
            OutputDataRate::Hz0_05 => 0x0C,
            OutputDataRate::Hz0_02 => 0x0D,
            OutputDataRate::Hz0_01 => 0x0E,
            OutputDataRate::Hz0_006 => 0x0F,
            OutputDataRate::Hz0_003 => 0x10,
            OutputDataRate::Hz0_0015 => 0x11,
        }
    }
}

/// IIR filter coefficient applied to raw conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IirFilter {
    /// Filter bypassed
    #[default]
    Bypass,
    /// Coefficient 1
    Coef1,
    /// Coefficient 3
    Coef3,
    /// Coefficient 7
    Coef7,
    /// Coefficient 15
    Coef15,
    /// Coefficient 31
    Coef31,
    /// Coefficient 63
    Coef63,
    /// Coefficient 127
    Coef127,
}

impl IirFilter {
    /// Get the register field value for this coefficient
    pub fn register_value(self) -> u8 {
        match self {
            IirFilter::Bypass => 0x00,
            IirFilter::Coef1 => 0x01,
            IirFilter::Coef3 => 0x02,
            IirFilter::Coef7 => 0x03,
            IirFilter::Coef15 => 0x04,
            IirFilter::Coef31 => 0x05,
            IirFilter::Coef63 => 0x06,
            IirFilter::Coef127 => 0x07,
        }
    }
}

/// Sensor power mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// No conversions, registers accessible
    #[default]
    Sleep,
    /// Single conversion, then back to sleep
    Forced,
    /// Continuous conversions at the configured data rate
    Normal,
}

impl PowerMode {
    /// Get the mode field value, before shifting into position
    pub fn register_value(self) -> u8 {
        match self {
            PowerMode::Sleep => 0b00,
            PowerMode::Forced => 0b01,
            PowerMode::Normal => 0b11,
        }
    }
}

/// Measurement configuration
///
/// The default follows the datasheet's standard-resolution drone profile:
/// 8x pressure oversampling, 1x temperature oversampling, 50 Hz output and
/// a coefficient-3 IIR filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Pressure oversampling factor
    pub pressure_oversampling: Oversampling,
    /// Temperature oversampling factor
    pub temperature_oversampling: Oversampling,
    /// Output data rate in normal mode
    pub output_data_rate: OutputDataRate,
    /// IIR filter coefficient
    pub iir_filter: IirFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pressure_oversampling: Oversampling::X8,
            temperature_oversampling: Oversampling::X1,
            output_data_rate: OutputDataRate::Hz50,
            iir_filter: IirFilter::Coef3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversampling_register_values() {
        assert_eq!(Oversampling::X1.register_value(), 0x00);
        assert_eq!(Oversampling::X8.register_value(), 0x03);
        assert_eq!(Oversampling::X32.register_value(), 0x05);
    }

    #[test]
    fn test_output_data_rate_register_values() {
        assert_eq!(OutputDataRate::Hz200.register_value(), 0x00);
        assert_eq!(OutputDataRate::Hz50.register_value(), 0x02);
        assert_eq!(OutputDataRate::Hz1_5.register_value(), 0x07);
        assert_eq!(OutputDataRate::Hz0_0015.register_value(), 0x11);
    }

    #[test]
    fn test_iir_filter_register_values() {
        assert_eq!(IirFilter::Bypass.register_value(), 0x00);
        assert_eq!(IirFilter::Coef3.register_value(), 0x02);
        assert_eq!(IirFilter::Coef127.register_value(), 0x07);
    }

    #[test]
    fn test_power_mode_register_values() {
        assert_eq!(PowerMode::Sleep.register_value(), 0b00);
        assert_eq!(PowerMode::Forced.register_value(), 0b01);
        assert_eq!(PowerMode::Normal.register_value(), 0b11);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pressure_oversampling, Oversampling::X8);
        assert_eq!(config.temperature_oversampling, Oversampling::X1);
        assert_eq!(config.output_data_rate, OutputDataRate::Hz50);
        assert_eq!(config.iir_filter, IirFilter::Coef3);
    }
}
