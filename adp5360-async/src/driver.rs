//! Core implementation of the ADP5360 driver.

use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use log::{debug, trace, warn};

use crate::error::Error;
use crate::monitor::VoltageMonitor;
use crate::registers::*;
use crate::types::*;

/// A handle to an ADP5360 on an I2C bus.
///
/// The handle caches nothing: every accessor goes to the device. Methods that
/// modify a register do a read followed by a write, which are two separate
/// bus transactions. Callers sharing the device between tasks must make sure
/// no other access to the same ADP5360 interleaves with such a call.
pub struct Adp5360<I2cType: I2c<SevenBitAddress>> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType: I2c<SevenBitAddress>> Adp5360<I2cType> {
    /// Creates a new driver at the default address `0x46`.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C peripheral that implements the `embedded-hal-async::i2c::I2c` trait.
    pub fn new(i2c: I2cType) -> Self {
        Self::with_address(i2c, ADP5360_I2C_ADDR)
    }

    /// Creates a new driver at a custom 7-bit address.
    pub fn with_address(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit address this handle talks to.
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Destroys the driver and returns the bus.
    pub fn release(self) -> I2cType {
        self.i2c
    }

    /// Borrows the handle as a [`VoltageMonitor`], which only reads the battery voltage.
    pub fn voltage_monitor(&mut self) -> VoltageMonitor<'_, I2cType> {
        VoltageMonitor::new(self)
    }

    /// Checks that the device answers on the bus.
    ///
    /// Performs one read of CHARGER_STATUS1. A bus error is reported as
    /// [`Error::DeviceNotFound`].
    pub async fn probe(&mut self) -> Result<(), Error<I2cType::Error>> {
        match self.read_register(Register::Status1).await {
            Ok(status1) => {
                debug!("ADP5360 found at {:#04x}, STATUS1={status1:#010b}", self.address);
                Ok(())
            }
            Err(_) => {
                debug!("ADP5360 not responding at {:#04x}", self.address);
                Err(Error::DeviceNotFound)
            }
        }
    }

    /// Starts talking to the device. Alias of [`Adp5360::probe`].
    pub async fn begin(&mut self) -> Result<(), Error<I2cType::Error>> {
        self.probe().await
    }

    // --- Register access ---

    /// Reads one register: writes the address, then reads one byte after a repeated start.
    pub async fn read_register(&mut self, reg: Register) -> Result<u8, Error<I2cType::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg.addr()], &mut buf)
            .await
            .inspect_err(|err| warn!("Error reading {reg:?}: {err:?}"))
            .map_err(Error::I2c)?;
        trace!("{reg:?} -> {:#04x}", buf[0]);
        Ok(buf[0])
    }

    /// Writes one register.
    pub async fn write_register(
        &mut self,
        reg: Register,
        value: u8,
    ) -> Result<(), Error<I2cType::Error>> {
        debug!("{reg:?} <- {value:#04x}");
        self.i2c
            .write(self.address, &[reg.addr(), value])
            .await
            .inspect_err(|err| warn!("Error writing {reg:?}: {err:?}"))
            .map_err(Error::I2c)
    }

    async fn check_bit(&mut self, reg: Register, bit: u8) -> Result<bool, Error<I2cType::Error>> {
        if bit > MAX_BIT {
            return Err(Error::InvalidBit(bit));
        }
        let value = self.read_register(reg).await?;
        Ok(value & (1 << bit) != 0)
    }

    async fn update_bit(
        &mut self,
        reg: Register,
        bit: u8,
        set: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        if bit > MAX_BIT {
            return Err(Error::InvalidBit(bit));
        }
        let mut value = self.read_register(reg).await?;
        if set {
            value |= 1 << bit;
        } else {
            value &= !(1 << bit);
        }
        self.write_register(reg, value).await
    }

    /// Reads CHARGER_STATUS1 (0x08).
    pub async fn read_status1(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::Status1).await
    }

    /// Reads CHARGER_STATUS2 (0x09).
    pub async fn read_status2(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::Status2).await
    }

    /// Reads BAT_SOC (0x21).
    pub async fn read_bat_soc(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::BatSoc).await
    }

    /// Reads FAULT (0x2E).
    pub async fn read_fault_register(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::Fault).await
    }

    /// Reads PGOOD_STATUS (0x2F).
    pub async fn read_pgood_status(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::PgoodStatus).await
    }

    /// Reads INTERRUPT_ENABLE1 (0x32).
    pub async fn read_interrupt_enable1(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::IntEn1).await
    }

    /// Reads INTERRUPT_ENABLE2 (0x33).
    pub async fn read_interrupt_enable2(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::IntEn2).await
    }

    /// Reads INTERRUPT_FLAG1 (0x34).
    pub async fn read_interrupt_flag1(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::IntFlag1).await
    }

    /// Reads INTERRUPT_FLAG2 (0x35).
    pub async fn read_interrupt_flag2(&mut self) -> Result<u8, Error<I2cType::Error>> {
        self.read_register(Register::IntFlag2).await
    }

    /// Reads the raw 13-bit battery voltage ADC code.
    ///
    /// VBAT_READ_H holds bits 12:5 and VBAT_READ_L holds bits 4:0 in its top
    /// five bits. No scaling is applied.
    pub async fn read_battery_voltage(&mut self) -> Result<u16, Error<I2cType::Error>> {
        let high = self.read_register(Register::VbatHigh).await?;
        let low = self.read_register(Register::VbatLow).await?;
        Ok(battery_voltage_from_bits(high, low))
    }

    // --- CHARGER_STATUS1 ---

    /// VBUS over-voltage, STATUS1 bit 7.
    pub async fn is_vbus_over_voltage(&mut self) -> Result<bool, Error<I2cType::Error>> {
        Ok(self.read_status1().await? & VBUS_OV_MASK != 0)
    }

    /// Adaptive charge current active, STATUS1 bit 6.
    pub async fn is_adaptive_charging_active(&mut self) -> Result<bool, Error<I2cType::Error>> {
        Ok(self.read_status1().await? & ADPICHG_MASK != 0)
    }

    /// VBUS input current limit active, STATUS1 bit 5.
    pub async fn is_vbus_current_limited(&mut self) -> Result<bool, Error<I2cType::Error>> {
        Ok(self.read_status1().await? & VBUS_ILIM_MASK != 0)
    }

    /// Raw charger status, STATUS1 bits 2:0.
    pub async fn charger_status(&mut self) -> Result<u8, Error<I2cType::Error>> {
        Ok(self.read_status1().await? & CHARGER_STATUS_MASK)
    }

    /// Charger status, STATUS1 bits 2:0, decoded.
    pub async fn charger_state(&mut self) -> Result<ChargerState, Error<I2cType::Error>> {
        Ok(ChargerState::from(self.charger_status().await?))
    }

    // --- CHARGER_STATUS2 ---

    /// Raw thermistor threshold status, STATUS2 bits 7:5, shifted down.
    pub async fn thr_status(&mut self) -> Result<u8, Error<I2cType::Error>> {
        Ok((self.read_status2().await? & THR_STATUS_MASK) >> THR_STATUS_SHIFT)
    }

    /// Thermistor threshold status, STATUS2 bits 7:5, decoded.
    pub async fn thermistor_state(&mut self) -> Result<ThermistorState, Error<I2cType::Error>> {
        Ok(ThermistorState::from(self.thr_status().await?))
    }

    /// Battery over-voltage, STATUS2 bit 4.
    pub async fn is_battery_over_voltage(&mut self) -> Result<bool, Error<I2cType::Error>> {
        Ok(self.read_status2().await? & BAT_OV_MASK != 0)
    }

    /// Battery under-voltage, STATUS2 bit 3.
    pub async fn is_battery_under_voltage(&mut self) -> Result<bool, Error<I2cType::Error>> {
        Ok(self.read_status2().await? & BAT_UV_MASK != 0)
    }

    /// Raw battery charge status, STATUS2 bits 2:0.
    pub async fn battery_charge_status(&mut self) -> Result<u8, Error<I2cType::Error>> {
        Ok(self.read_status2().await? & BAT_CHG_STATUS_MASK)
    }

    /// Battery charge status, STATUS2 bits 2:0, decoded.
    pub async fn battery_state(&mut self) -> Result<BatteryState, Error<I2cType::Error>> {
        Ok(BatteryState::from(self.battery_charge_status().await?))
    }

    // --- BAT_SOC ---

    /// Battery state of charge, BAT_SOC bits 6:0.
    pub async fn battery_soc(&mut self) -> Result<u8, Error<I2cType::Error>> {
        Ok(self.read_bat_soc().await? & BAT_SOC_MASK)
    }

    // --- PGOOD_STATUS ---

    /// Tests one PGOOD_STATUS bit.
    pub async fn is_power_good(&mut self, flag: PowerGood) -> Result<bool, Error<I2cType::Error>> {
        self.check_bit(Register::PgoodStatus, flag.bit()).await
    }

    /// Manual reset pressed, PGOOD_STATUS bit 5.
    pub async fn is_mr_pressed(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_power_good(PowerGood::MrPressed).await
    }

    /// Charge complete, PGOOD_STATUS bit 4.
    pub async fn is_charge_complete(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_power_good(PowerGood::ChargeComplete).await
    }

    /// VBUS power good, PGOOD_STATUS bit 3.
    pub async fn is_vbus_ok(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_power_good(PowerGood::VbusOk).await
    }

    /// Battery power good, PGOOD_STATUS bit 2.
    pub async fn is_battery_ok(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_power_good(PowerGood::BatteryOk).await
    }

    /// VOUT2 (buck-boost) power good, PGOOD_STATUS bit 1.
    pub async fn is_vout2_ok(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_power_good(PowerGood::Vout2Ok).await
    }

    /// VOUT1 (buck) power good, PGOOD_STATUS bit 0.
    pub async fn is_vout1_ok(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_power_good(PowerGood::Vout1Ok).await
    }

    // --- FAULT ---

    /// Tests bit `bit` of the FAULT register.
    ///
    /// Returns [`Error::InvalidBit`] without touching the bus if `bit > 7`.
    pub async fn check_fault_bit(&mut self, bit: u8) -> Result<bool, Error<I2cType::Error>> {
        self.check_bit(Register::Fault, bit).await
    }

    /// Clears bit `bit` of the FAULT register by writing a 1 to it.
    ///
    /// The register is read, the bit is set and the whole byte is written
    /// back. FAULT is write-one-to-clear, so every other fault latched at the
    /// time of the read is written back as 1 and cleared as well.
    ///
    /// Returns [`Error::InvalidBit`] without touching the bus if `bit > 7`.
    pub async fn clear_fault_bit(&mut self, bit: u8) -> Result<(), Error<I2cType::Error>> {
        self.update_bit(Register::Fault, bit, true).await
    }

    /// Tests one FAULT bit.
    pub async fn has_fault(&mut self, fault: Fault) -> Result<bool, Error<I2cType::Error>> {
        self.check_fault_bit(fault.bit()).await
    }

    /// See [`Adp5360::clear_fault_bit`].
    pub async fn clear_fault(&mut self, fault: Fault) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault_bit(fault.bit()).await
    }

    /// Battery undervoltage fault, FAULT bit 7.
    pub async fn has_undervoltage_fault(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.has_fault(Fault::Undervoltage).await
    }

    /// Battery discharge overcurrent fault, FAULT bit 6.
    pub async fn has_overcurrent_fault(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.has_fault(Fault::Overcurrent).await
    }

    /// Overcharge current fault, FAULT bit 5.
    pub async fn has_overcharge_current_fault(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.has_fault(Fault::OverchargeCurrent).await
    }

    /// Overcharge voltage fault, FAULT bit 4.
    pub async fn has_overcharge_voltage_fault(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.has_fault(Fault::OverchargeVoltage).await
    }

    /// Watchdog timeout fault, FAULT bit 2.
    pub async fn has_watchdog_timeout_fault(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.has_fault(Fault::WatchdogTimeout).await
    }

    /// Thermal shutdown fault, FAULT bit 0.
    pub async fn has_temperature_shutdown_fault(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.has_fault(Fault::TemperatureShutdown).await
    }

    /// Clears FAULT bit 7, see [`Adp5360::clear_fault_bit`].
    pub async fn clear_undervoltage_fault(&mut self) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault(Fault::Undervoltage).await
    }

    /// Clears FAULT bit 6, see [`Adp5360::clear_fault_bit`].
    pub async fn clear_overcurrent_fault(&mut self) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault(Fault::Overcurrent).await
    }

    /// Clears FAULT bit 5, see [`Adp5360::clear_fault_bit`].
    pub async fn clear_overcharge_current_fault(&mut self) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault(Fault::OverchargeCurrent).await
    }

    /// Clears FAULT bit 4, see [`Adp5360::clear_fault_bit`].
    pub async fn clear_overcharge_voltage_fault(&mut self) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault(Fault::OverchargeVoltage).await
    }

    /// Clears FAULT bit 2, see [`Adp5360::clear_fault_bit`].
    pub async fn clear_watchdog_timeout_fault(&mut self) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault(Fault::WatchdogTimeout).await
    }

    /// Clears FAULT bit 0, see [`Adp5360::clear_fault_bit`].
    pub async fn clear_temperature_shutdown_fault(
        &mut self,
    ) -> Result<(), Error<I2cType::Error>> {
        self.clear_fault(Fault::TemperatureShutdown).await
    }

    // --- Interrupts ---

    /// Enables or disables an interrupt source with a read-modify-write of its enable register.
    pub async fn enable_interrupt(
        &mut self,
        irq: Interrupt,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.update_bit(irq.enable_register(), irq.bit(), enable).await
    }

    /// Tests the flag of an interrupt source.
    pub async fn is_interrupt_set(
        &mut self,
        irq: Interrupt,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.check_bit(irq.flag_register(), irq.bit()).await
    }

    /// Low state of charge, INTERRUPT_ENABLE1 bit 7.
    pub async fn enable_soc_low_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::SocLow, enable).await
    }

    /// State of charge accumulation, INTERRUPT_ENABLE1 bit 6.
    pub async fn enable_soc_accumulation_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::SocAccumulation, enable).await
    }

    /// Adaptive charge current, INTERRUPT_ENABLE1 bit 5.
    pub async fn enable_adaptive_charge_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::AdaptiveCharge, enable).await
    }

    /// Battery protection, INTERRUPT_ENABLE1 bit 4.
    pub async fn enable_battery_protection_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::BatteryProtection, enable).await
    }

    /// Thermistor threshold, INTERRUPT_ENABLE1 bit 3.
    pub async fn enable_thr_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::Threshold, enable).await
    }

    /// Battery voltage threshold, INTERRUPT_ENABLE1 bit 2.
    pub async fn enable_battery_voltage_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::BatteryVoltage, enable).await
    }

    /// Charger mode change, INTERRUPT_ENABLE1 bit 1.
    pub async fn enable_charger_mode_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::ChargerMode, enable).await
    }

    /// VBUS voltage threshold, INTERRUPT_ENABLE1 bit 0.
    pub async fn enable_vbus_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::Vbus, enable).await
    }

    /// Manual reset press, INTERRUPT_ENABLE2 bit 7.
    pub async fn enable_mr_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::ManualReset, enable).await
    }

    /// Watchdog timeout, INTERRUPT_ENABLE2 bit 6.
    pub async fn enable_watchdog_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::Watchdog, enable).await
    }

    /// Buck power good, INTERRUPT_ENABLE2 bit 4.
    pub async fn enable_buck_power_good_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::BuckPowerGood, enable).await
    }

    /// Buck-boost power good, INTERRUPT_ENABLE2 bit 5.
    pub async fn enable_buck_boost_power_good_interrupt(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2cType::Error>> {
        self.enable_interrupt(Interrupt::BuckBoostPowerGood, enable).await
    }

    /// Low state of charge, INTERRUPT_FLAG1 bit 7.
    pub async fn is_soc_low_interrupt_set(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::SocLow).await
    }

    /// State of charge accumulation, INTERRUPT_FLAG1 bit 6.
    pub async fn is_soc_accumulation_interrupt_set(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::SocAccumulation).await
    }

    /// Adaptive charge current, INTERRUPT_FLAG1 bit 5.
    pub async fn is_adaptive_charge_interrupt_set(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::AdaptiveCharge).await
    }

    /// Battery protection, INTERRUPT_FLAG1 bit 4.
    pub async fn is_battery_protection_interrupt_set(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::BatteryProtection).await
    }

    /// Thermistor threshold, INTERRUPT_FLAG1 bit 3.
    pub async fn is_thr_interrupt_set(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::Threshold).await
    }

    /// Battery voltage threshold, INTERRUPT_FLAG1 bit 2.
    pub async fn is_battery_voltage_interrupt_set(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::BatteryVoltage).await
    }

    /// Charger mode change, INTERRUPT_FLAG1 bit 1.
    pub async fn is_charger_mode_interrupt_set(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::ChargerMode).await
    }

    /// VBUS voltage threshold, INTERRUPT_FLAG1 bit 0.
    pub async fn is_vbus_interrupt_set(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::Vbus).await
    }

    /// Manual reset press, INTERRUPT_FLAG2 bit 7.
    pub async fn is_mr_interrupt_set(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::ManualReset).await
    }

    /// Watchdog timeout, INTERRUPT_FLAG2 bit 6.
    pub async fn is_watchdog_interrupt_set(&mut self) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::Watchdog).await
    }

    /// Buck power good, INTERRUPT_FLAG2 bit 4.
    pub async fn is_buck_power_good_interrupt_set(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::BuckPowerGood).await
    }

    /// Buck-boost power good, INTERRUPT_FLAG2 bit 5.
    pub async fn is_buck_boost_power_good_interrupt_set(
        &mut self,
    ) -> Result<bool, Error<I2cType::Error>> {
        self.is_interrupt_set(Interrupt::BuckBoostPowerGood).await
    }

    // --- Snapshots ---

    /// Reads both interrupt flag registers.
    pub async fn read_pending_interrupts(
        &mut self,
    ) -> Result<InterruptFlags, Error<I2cType::Error>> {
        Ok(InterruptFlags {
            flag1: self.read_interrupt_flag1().await?,
            flag2: self.read_interrupt_flag2().await?,
        })
    }

    /// Reads and decodes the FAULT register.
    pub async fn read_faults(&mut self) -> Result<Faults, Error<I2cType::Error>> {
        Ok(Faults::from_bits(self.read_fault_register().await?))
    }

    /// Reads and decodes every status register.
    ///
    /// Each register is read exactly once, in address order. The registers
    /// are not latched together, so fields may come from slightly different
    /// moments.
    pub async fn read_status(&mut self) -> Result<Status, Error<I2cType::Error>> {
        let status1 = self.read_status1().await?;
        let status2 = self.read_status2().await?;
        let soc = self.read_bat_soc().await?;
        let battery_voltage = self.read_battery_voltage().await?;
        let fault = self.read_fault_register().await?;
        let pgood = self.read_pgood_status().await?;

        Ok(Status {
            charger: ChargerStatus::from_bits(status1, status2),
            battery_soc: soc & BAT_SOC_MASK,
            power_good: PowerGoodStatus::from_bits(pgood),
            faults: Faults::from_bits(fault),
            battery_voltage,
        })
    }
}
