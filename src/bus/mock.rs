//! Mock register bus for testing
//!
//! Backs [`RegisterBus`] with an in-memory register image. Records all
//! transactions for test verification, serves reads from the image, and
//! injects faults on demand. State sits behind a blocking mutex so one
//! instance can be shared as `&'static` between a test body and spawned
//! worker tasks.

use core::cell::RefCell;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::bus::RegisterBus;
use crate::error::{BusError, I2cFault};

/// Size of the emulated register file
const REGISTER_SPACE: usize = 0x80;

/// Capacity of the transaction log
const LOG_CAPACITY: usize = 256;

/// Bus access record for test verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusTransaction {
    /// Burst read of `len` registers starting at `reg`
    Read { reg: u8, len: usize },
    /// Single register write
    Write { reg: u8, value: u8 },
}

struct Inner {
    registers: [u8; REGISTER_SPACE],
    transactions: heapless::Vec<BusTransaction, LOG_CAPACITY>,
    read_fault: Option<u8>,
    write_fault: Option<u8>,
    short_read: Option<(u8, usize)>,
}

/// Shared state of a mock bus
///
/// Hand out transports with [`MockBusState::handle`]; every handle operates
/// on the same register image and transaction log.
pub struct MockBusState {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl MockBusState {
    /// Create a mock with an all-zero register image
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                registers: [0; REGISTER_SPACE],
                transactions: heapless::Vec::new(),
                read_fault: None,
                write_fault: None,
                short_read: None,
            })),
        }
    }

    /// Create a transport handle onto this state
    pub fn handle(&self) -> MockBus<'_> {
        MockBus { state: self }
    }

    /// Preset one register of the image
    pub fn set_register(&self, reg: u8, value: u8) {
        self.inner.lock(|inner| {
            inner.borrow_mut().registers[reg as usize % REGISTER_SPACE] = value;
        });
    }

    /// Preset consecutive registers starting at `base`
    pub fn set_registers(&self, base: u8, values: &[u8]) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            for (i, value) in values.iter().enumerate() {
                inner.registers[(base as usize + i) % REGISTER_SPACE] = *value;
            }
        });
    }

    /// Current value of one register of the image
    pub fn register(&self, reg: u8) -> u8 {
        self.inner
            .lock(|inner| inner.borrow().registers[reg as usize % REGISTER_SPACE])
    }

    /// Fail every read touching `reg` until faults are cleared
    pub fn fail_reads_at(&self, reg: u8) {
        self.inner.lock(|inner| {
            inner.borrow_mut().read_fault = Some(reg);
        });
    }

    /// Fail every write touching `reg` until faults are cleared
    pub fn fail_writes_at(&self, reg: u8) {
        self.inner.lock(|inner| {
            inner.borrow_mut().write_fault = Some(reg);
        });
    }

    /// Serve reads at `reg` only up to `available` bytes; longer bursts fail
    pub fn truncate_reads_at(&self, reg: u8, available: usize) {
        self.inner.lock(|inner| {
            inner.borrow_mut().short_read = Some((reg, available));
        });
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.read_fault = None;
            inner.write_fault = None;
            inner.short_read = None;
        });
    }

    /// Get all transactions recorded so far
    pub fn transactions(&self) -> heapless::Vec<BusTransaction, LOG_CAPACITY> {
        self.inner.lock(|inner| inner.borrow().transactions.clone())
    }

    /// Clear recorded transactions
    pub fn clear_transactions(&self) {
        self.inner.lock(|inner| {
            inner.borrow_mut().transactions.clear();
        });
    }
}

impl Default for MockBusState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock transport handle
pub struct MockBus<'a> {
    state: &'a MockBusState,
}

impl RegisterBus for MockBus<'_> {
    async fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        yield_now().await;
        self.state.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let _ = inner.transactions.push(BusTransaction::Read {
                reg,
                len: buf.len(),
            });
            if inner.read_fault == Some(reg) {
                return Err(BusError::I2c(I2cFault::Nack));
            }
            if let Some((short_reg, available)) = inner.short_read {
                if short_reg == reg && buf.len() > available {
                    return Err(BusError::Incomplete);
                }
            }
            for (i, dst) in buf.iter_mut().enumerate() {
                *dst = inner.registers[(reg as usize + i) % REGISTER_SPACE];
            }
            Ok(())
        })
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        yield_now().await;
        self.state.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let _ = inner
                .transactions
                .push(BusTransaction::Write { reg, value });
            if inner.write_fault == Some(reg) {
                return Err(BusError::I2c(I2cFault::Nack));
            }
            inner.registers[reg as usize % REGISTER_SPACE] = value;
            Ok(())
        })
    }
}
