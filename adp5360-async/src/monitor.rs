//! A voltage-only view of the driver.

use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{error::Error, Adp5360};

/// Borrowed view of an [`Adp5360`] that can only read the battery voltage.
///
/// Hand this to code that should only sample the battery, without giving it
/// access to interrupt or fault configuration.
pub struct VoltageMonitor<'a, I2cType: I2c<SevenBitAddress>> {
    pmic: &'a mut Adp5360<I2cType>,
}

impl<'a, I2cType: I2c<SevenBitAddress>> VoltageMonitor<'a, I2cType> {
    pub(crate) fn new(pmic: &'a mut Adp5360<I2cType>) -> Self {
        Self { pmic }
    }

    /// See [`Adp5360::read_battery_voltage`].
    pub async fn read_battery_voltage(&mut self) -> Result<u16, Error<I2cType::Error>> {
        self.pmic.read_battery_voltage().await
    }
}
