use alloc::rc::Rc;
use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use embedded_hal::i2c::{Operation, SevenBitAddress};
use embedded_hal_async::i2c::{self, I2c};

/// `Mutex`-based shared bus [`I2c`] implementation.
///
/// This allows for sharing an I2C bus, obtaining multiple [`SharedI2cDevice`] instances,
/// one per driver. Each I2C call holds the bus lock until it completes, so
/// transactions from different devices never interleave on the wire.
///
/// A driver that needs several calls to stay together (a read-modify-write, for
/// example) is still split into separate lock acquisitions.
///
/// Bus errors are logged at debug level and passed through unchanged; the
/// driver on top decides whether they deserve a warning.
pub struct SharedI2cDevice<M: RawMutex, BUS> {
    bus: Rc<Mutex<M, BUS>>,
}

impl<M: RawMutex, BUS> SharedI2cDevice<M, BUS> {
    /// Create a new [`SharedI2cDevice`].
    pub fn new(bus: Rc<Mutex<M, BUS>>) -> Self {
        Self { bus }
    }
}

impl<M: RawMutex, BUS> Clone for SharedI2cDevice<M, BUS> {
    fn clone(&self) -> Self {
        Self::new(self.bus.clone())
    }
}

impl<M: RawMutex, BUS: i2c::ErrorType> i2c::ErrorType for SharedI2cDevice<M, BUS> {
    type Error = BUS::Error;
}

impl<M, BUS> I2c for SharedI2cDevice<M, BUS>
where
    M: RawMutex,
    BUS: I2c<SevenBitAddress>,
{
    async fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        log_failure(address, bus.read(address, read).await)
    }

    async fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        log_failure(address, bus.write(address, write).await)
    }

    async fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        log_failure(address, bus.write_read(address, write, read).await)
    }

    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        log_failure(address, bus.transaction(address, operations).await)
    }
}

fn log_failure<E: core::fmt::Debug>(
    address: SevenBitAddress,
    result: Result<(), E>,
) -> Result<(), E> {
    if let Err(err) = &result {
        log::debug!("Error communicating with the I2C device at {address:#04x}: {err:?}");
    }
    result
}

#[cfg(test)]
mod tests {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    use super::*;

    #[tokio::test]
    async fn devices_share_one_bus() {
        let expectations = [
            Transaction::write(0x46, vec![0x32, 0x80]),
            Transaction::write_read(0x36, vec![0x09], vec![0x12, 0x34]),
            Transaction::read(0x46, vec![0xAB]),
        ];
        let bus = Rc::new(Mutex::<NoopRawMutex, _>::new(Mock::new(&expectations)));
        let mut first = SharedI2cDevice::new(bus.clone());
        let mut second = first.clone();

        first.write(0x46, &[0x32, 0x80]).await.unwrap();

        let mut buf = [0u8; 2];
        second.write_read(0x36, &[0x09], &mut buf).await.unwrap();
        assert_eq!(buf, [0x12, 0x34]);

        let mut buf = [0u8; 1];
        first.read(0x46, &mut buf).await.unwrap();
        assert_eq!(buf, [0xAB]);

        drop(first);
        drop(second);
        let mut mock = Rc::try_unwrap(bus).ok().unwrap().into_inner();
        mock.done();
    }

    #[tokio::test]
    async fn errors_are_passed_through() {
        let expectations =
            [Transaction::write_read(0x46, vec![0x08], vec![0x00]).with_error(ErrorKind::Other)];
        let bus = Rc::new(Mutex::<NoopRawMutex, _>::new(Mock::new(&expectations)));
        let mut device = SharedI2cDevice::new(bus.clone());

        let mut buf = [0u8; 1];
        assert_eq!(
            device.write_read(0x46, &[0x08], &mut buf).await,
            Err(ErrorKind::Other)
        );

        drop(device);
        let mut mock = Rc::try_unwrap(bus).ok().unwrap().into_inner();
        mock.done();
    }
}
