//! Device driver composition
//!
//! [`Bmp3xx`] ties the transport, calibration, compensation and trigger
//! pieces together: identity check, reset and calibration load at
//! construction, masked configuration writes, polled acquisition, and the
//! data-ready dispatch paths.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use crate::bus::RegisterBus;
use crate::calibration::CalibrationData;
use crate::compensation::{compensate, Measurement, RawSample};
use crate::config::{Config, PowerMode};
use crate::error::{BusError, Error};
use crate::registers;
use crate::trigger::{
    DataReadyHandler, DeferredWork, DispatchMode, TriggerControl, TriggerPhase,
};

// =============================================================================
// Time Abstraction Helpers
// =============================================================================

/// Async delay in milliseconds
///
/// Uses `embassy_time::Timer` when the `embassy` feature is enabled.
/// No-op for host tests without embassy.
#[cfg(feature = "embassy")]
async fn delay_ms(ms: u64) {
    embassy_time::Timer::after_millis(ms).await;
}

#[cfg(not(feature = "embassy"))]
async fn delay_ms(_ms: u64) {
    // No-op for host tests
}

// =============================================================================
// Constants
// =============================================================================

/// Startup time after a soft reset before the device accepts commands
const SOFT_RESET_DELAY_MS: u64 = 2;

/// Upper bound on data-ready polls per acquisition
const CONVERSION_POLL_LIMIT: u32 = 100;

/// Pause between data-ready polls
const CONVERSION_POLL_MS: u64 = 1;

/// PWR_CTRL image applied at the end of init: both measurement channels
/// enabled, normal mode
const PWR_CTRL_ON: u8 = registers::PWR_CTRL_PRESS_EN
    | registers::PWR_CTRL_TEMP_EN
    | (0b11 << registers::PWR_CTRL_MODE_POS);

// =============================================================================
// Chip Identity
// =============================================================================

/// Supported device generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipModel {
    /// BMP388
    Bmp388,
    /// BMP390
    Bmp390,
}

impl ChipModel {
    fn from_chip_id(id: u8) -> Option<Self> {
        match id {
            registers::CHIP_ID_BMP388 => Some(ChipModel::Bmp388),
            registers::CHIP_ID_BMP390 => Some(ChipModel::Bmp390),
            _ => None,
        }
    }

    /// Identity code the device reports
    pub fn chip_id(self) -> u8 {
        match self {
            ChipModel::Bmp388 => registers::CHIP_ID_BMP388,
            ChipModel::Bmp390 => registers::CHIP_ID_BMP390,
        }
    }
}

// =============================================================================
// Serialized Register State
// =============================================================================

/// State guarded by the instance mutex: the transport plus the cached
/// register configuration
struct Shared<B> {
    bus: B,
    config: Config,
    power_mode: PowerMode,
}

impl<B> Shared<B>
where
    B: RegisterBus,
{
    async fn read_register(&mut self, reg: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.bus.read_registers(reg, &mut buf).await?;
        Ok(buf[0])
    }

    /// Read-modify-write of the masked bits of one register
    ///
    /// Bits outside `mask` keep their current value. The write is skipped
    /// when the register already holds the target image.
    async fn update_field(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), BusError> {
        let current = self.read_register(reg).await?;
        let updated = (current & !mask) | (value & mask);
        if updated == current {
            return Ok(());
        }
        crate::log_trace!("reg {:#x} update: {:#x} -> {:#x}", reg, current, updated);
        self.bus.write_register(reg, updated).await
    }

    /// Push a configuration into the OSR, ODR and CONFIG registers
    ///
    /// The cache is updated only after all three writes succeeded.
    async fn apply_config(&mut self, config: Config) -> Result<(), BusError> {
        let osr = config.pressure_oversampling.register_value()
            | config.temperature_oversampling.register_value() << registers::OSR_TEMP_POS;
        self.update_field(
            registers::OSR,
            registers::OSR_PRESS_MASK | registers::OSR_TEMP_MASK,
            osr,
        )
        .await?;
        self.update_field(
            registers::ODR,
            registers::ODR_MASK,
            config.output_data_rate.register_value(),
        )
        .await?;
        self.update_field(
            registers::CONFIG,
            registers::CONFIG_IIR_MASK,
            config.iir_filter.register_value() << registers::CONFIG_IIR_POS,
        )
        .await?;
        self.config = config;
        Ok(())
    }

    async fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), BusError> {
        self.update_field(
            registers::PWR_CTRL,
            registers::PWR_CTRL_MODE_MASK,
            mode.register_value() << registers::PWR_CTRL_MODE_POS,
        )
        .await?;
        self.power_mode = mode;
        Ok(())
    }

    /// Wait for both channels to finish converting, then fetch the data
    /// block in a single burst
    async fn read_raw_sample(&mut self) -> Result<RawSample, Error> {
        let ready = registers::STATUS_DRDY_PRESS | registers::STATUS_DRDY_TEMP;
        let mut polls = 0;
        loop {
            let status = self.read_register(registers::STATUS).await?;
            if status & ready == ready {
                break;
            }
            polls += 1;
            if polls >= CONVERSION_POLL_LIMIT {
                return Err(Error::ConversionTimeout);
            }
            delay_ms(CONVERSION_POLL_MS).await;
        }

        let mut raw = [0u8; registers::DATA_LEN];
        self.bus.read_registers(registers::DATA0, &mut raw).await?;
        Ok(RawSample::from_registers(&raw))
    }
}

// =============================================================================
// Driver
// =============================================================================

/// BMP388/BMP390 driver
///
/// Generic over the register transport, so SPI and I2C wiring share every
/// code path above the bus. The transport and the cached configuration sit
/// behind one async mutex per instance; all register sequences (including
/// every read-modify-write) run under that lock, so a configuration call
/// and a trigger re-arm can never interleave their read and write halves.
pub struct Bmp3xx<B>
where
    B: RegisterBus,
{
    /// Serialized transport and register cache
    shared: Mutex<CriticalSectionRawMutex, Shared<B>>,

    /// Factory trim coefficients, loaded once at construction
    cal: CalibrationData,

    /// Detected device generation
    model: ChipModel,

    /// Data-ready state machine and dispatch strategy
    trigger: TriggerControl,
}

impl<B> Bmp3xx<B>
where
    B: RegisterBus,
{
    /// Create and initialize a driver instance
    ///
    /// Verifies the chip identity, soft-resets the device, loads the
    /// factory calibration, applies `config` and enables both measurement
    /// channels in normal mode.
    ///
    /// # Arguments
    ///
    /// * `bus` - register transport (SPI or I2C)
    /// * `config` - initial measurement configuration
    /// * `dispatch` - data-ready dispatch strategy, fixed for this instance
    ///
    /// # Returns
    ///
    /// Initialized driver, or the first error of the bring-up sequence
    pub async fn new(mut bus: B, config: Config, dispatch: DispatchMode) -> Result<Self, Error> {
        // Step 1: Verify chip identity
        let mut id = [0u8; 1];
        bus.read_registers(registers::CHIP_ID, &mut id).await?;
        let Some(model) = ChipModel::from_chip_id(id[0]) else {
            crate::log_error!("unsupported chip id {:#x}", id[0]);
            return Err(Error::UnsupportedDevice(id[0]));
        };
        crate::log_info!("BMP3xx detected (chip id {:#x})", id[0]);

        // Step 2: Soft reset, then wait out the documented startup time
        bus.write_register(registers::CMD, registers::CMD_SOFT_RESET)
            .await?;
        delay_ms(SOFT_RESET_DELAY_MS).await;

        // Step 3: Load factory calibration
        let mut raw_cal = [0u8; registers::CALIB_LEN];
        bus.read_registers(registers::CALIB0, &mut raw_cal)
            .await
            .map_err(Error::Calibration)?;
        let cal = CalibrationData::from_registers(&raw_cal);

        // Step 4: Apply the measurement configuration
        let mut shared = Shared {
            bus,
            config,
            power_mode: PowerMode::Sleep,
        };
        shared
            .apply_config(config)
            .await
            .map_err(Error::Configuration)?;

        // Step 5: Enable both channels and start converting
        shared
            .bus
            .write_register(registers::PWR_CTRL, PWR_CTRL_ON)
            .await?;
        shared.power_mode = PowerMode::Normal;
        crate::log_debug!("configuration applied, normal mode");

        Ok(Self {
            shared: Mutex::new(shared),
            cal,
            model,
            trigger: TriggerControl::new(dispatch),
        })
    }

    /// Detected device generation
    pub fn chip_model(&self) -> ChipModel {
        self.model
    }

    /// Factory calibration loaded at construction
    pub fn calibration(&self) -> &CalibrationData {
        &self.cal
    }

    /// Cached measurement configuration
    pub async fn config(&self) -> Config {
        self.shared.lock().await.config
    }

    /// Cached power mode
    pub async fn power_mode(&self) -> PowerMode {
        self.shared.lock().await.power_mode
    }

    /// Current phase of the trigger state machine
    pub fn trigger_phase(&self) -> TriggerPhase {
        self.trigger.phase()
    }

    /// Write a new measurement configuration
    ///
    /// Each field lands as a masked write, so unrelated bits of the shared
    /// registers keep their value. On failure the cached configuration is
    /// left unchanged; registers written before the failure keep their new
    /// contents and the caller decides whether to retry.
    pub async fn configure(&self, config: Config) -> Result<(), Error> {
        let mut shared = self.shared.lock().await;
        shared
            .apply_config(config)
            .await
            .map_err(Error::Configuration)
    }

    /// Switch the power mode
    pub async fn set_power_mode(&self, mode: PowerMode) -> Result<(), Error> {
        let mut shared = self.shared.lock().await;
        shared.set_power_mode(mode).await.map_err(Error::Bus)
    }

    /// Acquire one compensated measurement
    ///
    /// In forced mode a conversion is started first; in normal mode the
    /// next periodic conversion is awaited. The status poll and the data
    /// burst run under the instance lock, so no other register access from
    /// this driver lands between them.
    pub async fn sample(&self) -> Result<Measurement, Error> {
        let raw = {
            let mut shared = self.shared.lock().await;
            if shared.power_mode == PowerMode::Forced {
                shared
                    .set_power_mode(PowerMode::Forced)
                    .await
                    .map_err(Error::Bus)?;
            }
            shared.read_raw_sample().await?
        };
        Ok(compensate(raw, &self.cal))
    }

    /// Read one register, for diagnostics
    pub async fn read_register(&self, reg: u8) -> Result<u8, Error> {
        let mut shared = self.shared.lock().await;
        shared.read_register(reg).await.map_err(Error::Bus)
    }

    /// Read-modify-write of masked register bits
    ///
    /// Escape hatch for registers the typed configuration does not cover.
    /// Serialized with every other register sequence on this instance.
    pub async fn update_register_field(&self, reg: u8, mask: u8, value: u8) -> Result<(), Error> {
        let mut shared = self.shared.lock().await;
        shared
            .update_field(reg, mask, value)
            .await
            .map_err(Error::Bus)
    }

    // =========================================================================
    // Trigger Path
    // =========================================================================

    /// Register a data-ready handler and enable the interrupt
    ///
    /// The handler is stored before the interrupt-enable bit is written,
    /// so an event firing mid-arm always finds a handler. Fails with
    /// [`Error::TriggerUnavailable`] when the instance was built with
    /// [`DispatchMode::Disabled`] or while a dispatch is running; if the
    /// register write fails, the previous trigger state is restored.
    pub async fn arm_trigger(&self, handler: DataReadyHandler) -> Result<(), Error> {
        if matches!(self.trigger.mode(), DispatchMode::Disabled) {
            return Err(Error::TriggerUnavailable);
        }
        let Some(prev) = self.trigger.try_arm(handler) else {
            return Err(Error::TriggerUnavailable);
        };

        let mut shared = self.shared.lock().await;
        if let Err(err) = shared
            .update_field(
                registers::INT_CTRL,
                registers::INT_CTRL_DRDY_EN,
                registers::INT_CTRL_DRDY_EN,
            )
            .await
        {
            self.trigger.restore(prev);
            return Err(Error::Bus(err));
        }
        Ok(())
    }

    /// Disable the interrupt and clear the handler
    ///
    /// Events still queued from before the disarm are dropped when their
    /// dispatch runs. If the register write fails, the previous trigger
    /// state is restored.
    pub async fn disarm_trigger(&self) -> Result<(), Error> {
        let prev = self.trigger.disarm();

        let mut shared = self.shared.lock().await;
        if let Err(err) = shared
            .update_field(registers::INT_CTRL, registers::INT_CTRL_DRDY_EN, 0)
            .await
        {
            self.trigger.restore(prev);
            return Err(Error::Bus(err));
        }
        Ok(())
    }

    /// Signal a data-ready event
    ///
    /// Call from the interrupt context wired to the INT pin (or any other
    /// event source). Never blocks: direct dispatch runs the handler inline
    /// without touching the bus, the deferred strategies enqueue and
    /// return. Events raised while a dispatch is in flight queue behind
    /// it; events landing on a full queue coalesce with the pending ones,
    /// and events whose dispatch finds the trigger disarmed are dropped.
    pub fn on_data_ready(&self) {
        match self.trigger.mode() {
            DispatchMode::Disabled => {}
            DispatchMode::Direct => {
                if let Some(handler) = self.trigger.begin_dispatch() {
                    handler(None);
                    self.trigger.finish_dispatch();
                }
            }
            DispatchMode::OwnWorker(signal) => {
                let _ = signal.try_send(());
            }
            DispatchMode::SharedQueue(queue) => {
                let _ = queue.try_send(DeferredWork::DataReady);
            }
        }
    }

    /// Execute one deferred data-ready dispatch
    ///
    /// Shared-queue consumers call this for every dequeued
    /// [`DeferredWork::DataReady`]: it reads the sample, compensates it and
    /// invokes the handler with the result. Returns without dispatching
    /// when the trigger was disarmed after the event was queued.
    pub async fn process_data_ready(&self) -> Result<(), Error> {
        let Some(handler) = self.trigger.begin_dispatch() else {
            return Ok(());
        };

        let raw = {
            let mut shared = self.shared.lock().await;
            match shared.read_raw_sample().await {
                Ok(raw) => raw,
                Err(err) => {
                    self.trigger.finish_dispatch();
                    return Err(err);
                }
            }
        };

        handler(Some(compensate(raw, &self.cal)));
        self.trigger.finish_dispatch();
        Ok(())
    }

    /// Drive the dedicated-worker dispatch strategy
    ///
    /// Spawn this once on a long-lived task when the instance was built
    /// with [`DispatchMode::OwnWorker`]. Every wake performs the bus read,
    /// compensation and handler invocation outside the signalling context;
    /// read failures are logged and the worker keeps running.
    pub async fn run_worker(&self) -> Result<(), Error> {
        let DispatchMode::OwnWorker(signal) = self.trigger.mode() else {
            return Err(Error::TriggerUnavailable);
        };
        loop {
            signal.receive().await;
            if let Err(err) = self.process_data_ready().await {
                crate::log_warn!("data-ready dispatch failed: {}", err);
            }
        }
    }
}
