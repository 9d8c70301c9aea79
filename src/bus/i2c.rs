//! I2C transport
//!
//! Two-wire access with a 7-bit address selected by the SDO pin. A register
//! read is a write of the register address followed by a repeated-start
//! read; a register write sends address and value in one transfer.

use embedded_hal_async::i2c::{ErrorKind, I2c};

use crate::bus::RegisterBus;
use crate::error::{BusError, I2cFault};

/// Device address with SDO tied low
pub const I2C_ADDR_PRIMARY: u8 = 0x76;

/// Device address with SDO tied high
pub const I2C_ADDR_SECONDARY: u8 = 0x77;

/// I2C register transport
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cBus<I2C> {
    /// Create a transport for the given device address
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Create a transport for the primary (SDO low) address
    pub fn new_primary(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDR_PRIMARY)
    }
}

fn map_error<E: embedded_hal_async::i2c::Error>(err: E) -> BusError {
    BusError::I2c(match err.kind() {
        ErrorKind::Bus => I2cFault::Bus,
        ErrorKind::ArbitrationLoss => I2cFault::ArbitrationLoss,
        ErrorKind::NoAcknowledge(_) => I2cFault::Nack,
        ErrorKind::Overrun => I2cFault::Overrun,
        _ => I2cFault::Other,
    })
}

impl<I2C: I2c> RegisterBus for I2cBus<I2C> {
    async fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(map_error)
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_async::i2c::{ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug)]
    struct StubError(ErrorKind);

    impl embedded_hal_async::i2c::Error for StubError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    #[derive(Debug, PartialEq)]
    enum Access {
        Write(u8, Vec<u8>),
        Read(u8, usize),
    }

    /// Records every bus access and serves reads from a canned buffer.
    struct RecordingI2c {
        accesses: Vec<Access>,
        read_data: Vec<u8>,
        fail: Option<ErrorKind>,
    }

    impl RecordingI2c {
        fn new(read_data: &[u8]) -> Self {
            Self {
                accesses: Vec::new(),
                read_data: read_data.to_vec(),
                fail: None,
            }
        }
    }

    impl ErrorType for RecordingI2c {
        type Error = StubError;
    }

    impl I2c for RecordingI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail {
                return Err(StubError(kind));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.accesses.push(Access::Write(address, bytes.to_vec()));
                    }
                    Operation::Read(buf) => {
                        for (dst, src) in buf.iter_mut().zip(self.read_data.iter()) {
                            *dst = *src;
                        }
                        self.accesses.push(Access::Read(address, buf.len()));
                    }
                }
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_read_frames_register_then_data() {
        let mut bus = I2cBus::new_primary(RecordingI2c::new(&[0x11, 0x22]));
        let mut buf = [0u8; 2];
        bus.read_registers(0x04, &mut buf).await.unwrap();

        assert_eq!(buf, [0x11, 0x22]);
        assert_eq!(
            bus.i2c.accesses,
            vec![
                Access::Write(I2C_ADDR_PRIMARY, vec![0x04]),
                Access::Read(I2C_ADDR_PRIMARY, 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_sends_register_and_value() {
        let mut bus = I2cBus::new(RecordingI2c::new(&[]), I2C_ADDR_SECONDARY);
        bus.write_register(0x7E, 0xB6).await.unwrap();

        assert_eq!(
            bus.i2c.accesses,
            vec![Access::Write(I2C_ADDR_SECONDARY, vec![0x7E, 0xB6])]
        );
    }

    #[tokio::test]
    async fn test_nack_maps_to_fault() {
        let mut stub = RecordingI2c::new(&[]);
        stub.fail = Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        let mut bus = I2cBus::new_primary(stub);

        let err = bus.write_register(0x1B, 0x33).await.unwrap_err();
        assert_eq!(err, BusError::I2c(I2cFault::Nack));
    }
}
