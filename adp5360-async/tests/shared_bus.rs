use std::rc::Rc;

use adp5360_async::{Adp5360, Interrupt, ADP5360_I2C_ADDR};
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};
use embedded_bus_async::i2c::SharedI2cDevice;
use embedded_hal_async::i2c::I2c;
use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

const GAUGE_ADDR: u8 = 0x36;

#[tokio::test]
async fn pmic_on_shared_bus() {
    let expectations = [
        // probe
        Transaction::write_read(ADP5360_I2C_ADDR, vec![0x08], vec![0x00]),
        // another driver on the same bus
        Transaction::write(GAUGE_ADDR, vec![0x60, 0x01]),
        // enable VBUS interrupt
        Transaction::write_read(ADP5360_I2C_ADDR, vec![0x32], vec![0x80]),
        Transaction::write(ADP5360_I2C_ADDR, vec![0x32, 0x81]),
        // flag check
        Transaction::write_read(ADP5360_I2C_ADDR, vec![0x34], vec![0x01]),
    ];
    let bus = Rc::new(Mutex::<NoopRawMutex, _>::new(Mock::new(&expectations)));

    let mut pmic = Adp5360::new(SharedI2cDevice::new(bus.clone()));
    let mut other = SharedI2cDevice::new(bus.clone());

    pmic.begin().await.unwrap();
    other.write(GAUGE_ADDR, &[0x60, 0x01]).await.unwrap();
    pmic.enable_interrupt(Interrupt::Vbus, true).await.unwrap();
    assert!(pmic.is_vbus_interrupt_set().await.unwrap());

    drop(pmic);
    drop(other);
    let mut mock = Rc::try_unwrap(bus).ok().unwrap().into_inner();
    mock.done();
}
