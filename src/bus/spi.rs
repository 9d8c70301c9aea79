//! SPI transport
//!
//! Four-wire access in mode 3 (clock idles high, data latched on the
//! rising edge), MSB first. A register read sets bit 7 of the address and
//! the device clocks out one dummy byte before the data; a write clears
//! bit 7.

use embedded_hal_async::spi::{ErrorKind, Operation, SpiDevice};

use crate::bus::RegisterBus;
use crate::error::{BusError, SpiFault};

/// Read request flag, set on the address byte
const SPI_READ_REQUEST: u8 = 0x80;

/// Mask keeping writes inside the 7-bit register address space
const SPI_ADDR_MASK: u8 = 0x7F;

/// Longest burst this transport serves; the calibration block at 21 bytes
/// is the largest read the driver issues
const SPI_BURST_MAX: usize = 32;

/// SPI register transport
pub struct SpiBus<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> SpiBus<SPI> {
    /// Create a transport over a mode-3 SPI device
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }
}

fn map_error<E: embedded_hal_async::spi::Error>(err: E) -> BusError {
    BusError::Spi(match err.kind() {
        ErrorKind::Overrun => SpiFault::Overrun,
        ErrorKind::ModeFault => SpiFault::ModeFault,
        ErrorKind::FrameFormat => SpiFault::FrameFormat,
        ErrorKind::ChipSelectFault => SpiFault::ChipSelect,
        _ => SpiFault::Other,
    })
}

impl<SPI: SpiDevice> RegisterBus for SpiBus<SPI> {
    async fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if buf.len() > SPI_BURST_MAX {
            return Err(BusError::Incomplete);
        }
        let request = [reg | SPI_READ_REQUEST];
        let mut scratch = [0u8; SPI_BURST_MAX + 1];
        self.spi
            .transaction(&mut [
                Operation::Write(&request),
                Operation::Read(&mut scratch[..buf.len() + 1]),
            ])
            .await
            .map_err(map_error)?;
        buf.copy_from_slice(&scratch[1..buf.len() + 1]);
        Ok(())
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        self.spi
            .write(&[reg & SPI_ADDR_MASK, value])
            .await
            .map_err(map_error)
    }
}
