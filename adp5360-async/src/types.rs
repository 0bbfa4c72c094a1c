//! Decoded register contents.

use crate::registers::*;

/// Charger state machine status, CHARGER_STATUS1 bits 2:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargerState {
    /// Charger off.
    Off,
    /// Trickle charge.
    TrickleCharge,
    /// Fast charge, constant current.
    FastChargeConstantCurrent,
    /// Fast charge, constant voltage.
    FastChargeConstantVoltage,
    /// Charge complete.
    ChargeComplete,
    /// LDO mode.
    LdoMode,
    /// Trickle or fast charge timer expired.
    TimerExpired,
    /// Battery detection in progress.
    BatteryDetection,
}

impl From<u8> for ChargerState {
    /// Decodes the 3-bit field; bits above 2 are ignored.
    fn from(bits: u8) -> Self {
        match bits & CHARGER_STATUS_MASK {
            0b000 => ChargerState::Off,
            0b001 => ChargerState::TrickleCharge,
            0b010 => ChargerState::FastChargeConstantCurrent,
            0b011 => ChargerState::FastChargeConstantVoltage,
            0b100 => ChargerState::ChargeComplete,
            0b101 => ChargerState::LdoMode,
            0b110 => ChargerState::TimerExpired,
            _ => ChargerState::BatteryDetection,
        }
    }
}

/// Battery thermistor status, CHARGER_STATUS2 bits 7:5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermistorState {
    /// Thermistor measurement off.
    Off,
    /// Battery cold.
    Cold,
    /// Battery cool.
    Cool,
    /// Battery warm.
    Warm,
    /// Battery hot.
    Hot,
    /// Thermistor within the normal range.
    Ok,
    /// A code the datasheet marks reserved.
    Reserved(u8),
}

impl From<u8> for ThermistorState {
    /// Decodes an already shifted 3-bit field.
    fn from(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => ThermistorState::Off,
            0b001 => ThermistorState::Cold,
            0b010 => ThermistorState::Cool,
            0b011 => ThermistorState::Warm,
            0b100 => ThermistorState::Hot,
            0b111 => ThermistorState::Ok,
            other => ThermistorState::Reserved(other),
        }
    }
}

/// Battery charge status, CHARGER_STATUS2 bits 2:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryState {
    /// Battery monitor off.
    MonitorOff,
    /// No battery detected.
    NoBattery,
    /// VBAT_SNS below the dead-battery threshold.
    BelowDeadThreshold,
    /// VBAT_SNS between the dead and weak thresholds.
    BelowWeakThreshold,
    /// VBAT_SNS at or above the weak threshold.
    AboveWeakThreshold,
    /// A code the datasheet marks reserved.
    Reserved(u8),
}

impl From<u8> for BatteryState {
    fn from(bits: u8) -> Self {
        match bits & BAT_CHG_STATUS_MASK {
            0b000 => BatteryState::MonitorOff,
            0b001 => BatteryState::NoBattery,
            0b010 => BatteryState::BelowDeadThreshold,
            0b011 => BatteryState::BelowWeakThreshold,
            0b100 => BatteryState::AboveWeakThreshold,
            other => BatteryState::Reserved(other),
        }
    }
}

/// A fault bit of the FAULT register. Bits 1 and 3 are reserved.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Battery undervoltage.
    Undervoltage = 7,
    /// Battery discharge overcurrent.
    Overcurrent = 6,
    /// Overcharge current.
    OverchargeCurrent = 5,
    /// Overcharge voltage.
    OverchargeVoltage = 4,
    /// Watchdog timer expired.
    WatchdogTimeout = 2,
    /// Die temperature shutdown.
    TemperatureShutdown = 0,
}

impl Fault {
    /// Every fault, from bit 7 down.
    pub const ALL: [Fault; 6] = [
        Fault::Undervoltage,
        Fault::Overcurrent,
        Fault::OverchargeCurrent,
        Fault::OverchargeVoltage,
        Fault::WatchdogTimeout,
        Fault::TemperatureShutdown,
    ];

    /// Bit position within FAULT.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Single-bit mask within FAULT.
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// A status bit of the PGOOD_STATUS register.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerGood {
    /// Manual reset input pressed.
    MrPressed = 5,
    /// Charge complete.
    ChargeComplete = 4,
    /// VBUS above its good threshold.
    VbusOk = 3,
    /// Battery above its good threshold.
    BatteryOk = 2,
    /// Buck-boost output in regulation.
    Vout2Ok = 1,
    /// Buck output in regulation.
    Vout1Ok = 0,
}

impl PowerGood {
    /// Bit position within PGOOD_STATUS.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Single-bit mask within PGOOD_STATUS.
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// An interrupt source. Enable and flag registers share one layout, so each
/// source maps to the same bit in INTERRUPT_ENABLEx and INTERRUPT_FLAGx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// State of charge dropped below the low threshold.
    SocLow,
    /// State of charge accumulation step.
    SocAccumulation,
    /// Adaptive charge current change.
    AdaptiveCharge,
    /// Battery protection event.
    BatteryProtection,
    /// Thermistor threshold change.
    Threshold,
    /// Battery voltage threshold crossed.
    BatteryVoltage,
    /// Charger mode change.
    ChargerMode,
    /// VBUS voltage threshold crossed.
    Vbus,
    /// Manual reset press.
    ManualReset,
    /// Watchdog alarm.
    Watchdog,
    /// Buck-boost power good change.
    BuckBoostPowerGood,
    /// Buck power good change.
    BuckPowerGood,
}

impl Interrupt {
    /// Every interrupt source, INTERRUPT_ENABLE1 first.
    pub const ALL: [Interrupt; 12] = [
        Interrupt::SocLow,
        Interrupt::SocAccumulation,
        Interrupt::AdaptiveCharge,
        Interrupt::BatteryProtection,
        Interrupt::Threshold,
        Interrupt::BatteryVoltage,
        Interrupt::ChargerMode,
        Interrupt::Vbus,
        Interrupt::ManualReset,
        Interrupt::Watchdog,
        Interrupt::BuckBoostPowerGood,
        Interrupt::BuckPowerGood,
    ];

    const fn in_first_bank(self) -> bool {
        !matches!(
            self,
            Interrupt::ManualReset
                | Interrupt::Watchdog
                | Interrupt::BuckBoostPowerGood
                | Interrupt::BuckPowerGood
        )
    }

    /// The enable register holding this source.
    pub const fn enable_register(self) -> Register {
        if self.in_first_bank() {
            Register::IntEn1
        } else {
            Register::IntEn2
        }
    }

    /// The flag register holding this source.
    pub const fn flag_register(self) -> Register {
        if self.in_first_bank() {
            Register::IntFlag1
        } else {
            Register::IntFlag2
        }
    }

    /// Bit position within the enable and flag registers.
    pub const fn bit(self) -> u8 {
        match self {
            Interrupt::SocLow => 7,
            Interrupt::SocAccumulation => 6,
            Interrupt::AdaptiveCharge => 5,
            Interrupt::BatteryProtection => 4,
            Interrupt::Threshold => 3,
            Interrupt::BatteryVoltage => 2,
            Interrupt::ChargerMode => 1,
            Interrupt::Vbus => 0,
            Interrupt::ManualReset => 7,
            Interrupt::Watchdog => 6,
            Interrupt::BuckBoostPowerGood => 5,
            Interrupt::BuckPowerGood => 4,
        }
    }

    /// Single-bit mask within the enable and flag registers.
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// Decoded CHARGER_STATUS1 and CHARGER_STATUS2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargerStatus {
    /// VBUS over-voltage.
    pub vbus_over_voltage: bool,
    /// Adaptive charge current active.
    pub adaptive_charging: bool,
    /// VBUS input current limit active.
    pub vbus_current_limited: bool,
    /// Charger state machine status.
    pub charger_state: ChargerState,
    /// Thermistor status.
    pub thermistor_state: ThermistorState,
    /// Battery over-voltage.
    pub battery_over_voltage: bool,
    /// Battery under-voltage.
    pub battery_under_voltage: bool,
    /// Battery charge status.
    pub battery_state: BatteryState,
}

impl ChargerStatus {
    /// Decodes the raw STATUS1 and STATUS2 bytes.
    pub fn from_bits(status1: u8, status2: u8) -> Self {
        Self {
            vbus_over_voltage: status1 & VBUS_OV_MASK != 0,
            adaptive_charging: status1 & ADPICHG_MASK != 0,
            vbus_current_limited: status1 & VBUS_ILIM_MASK != 0,
            charger_state: ChargerState::from(status1),
            thermistor_state: ThermistorState::from(
                (status2 & THR_STATUS_MASK) >> THR_STATUS_SHIFT,
            ),
            battery_over_voltage: status2 & BAT_OV_MASK != 0,
            battery_under_voltage: status2 & BAT_UV_MASK != 0,
            battery_state: BatteryState::from(status2),
        }
    }
}

/// Decoded PGOOD_STATUS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerGoodStatus {
    /// Manual reset pressed, bit 5.
    pub mr_pressed: bool,
    /// Charge complete, bit 4.
    pub charge_complete: bool,
    /// VBUS power good, bit 3.
    pub vbus_ok: bool,
    /// Battery power good, bit 2.
    pub battery_ok: bool,
    /// VOUT2 (buck-boost) power good, bit 1.
    pub vout2_ok: bool,
    /// VOUT1 (buck) power good, bit 0.
    pub vout1_ok: bool,
}

impl PowerGoodStatus {
    /// Decodes the raw PGOOD_STATUS byte.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            mr_pressed: bits & PowerGood::MrPressed.mask() != 0,
            charge_complete: bits & PowerGood::ChargeComplete.mask() != 0,
            vbus_ok: bits & PowerGood::VbusOk.mask() != 0,
            battery_ok: bits & PowerGood::BatteryOk.mask() != 0,
            vout2_ok: bits & PowerGood::Vout2Ok.mask() != 0,
            vout1_ok: bits & PowerGood::Vout1Ok.mask() != 0,
        }
    }
}

/// Decoded FAULT register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    /// Battery undervoltage, bit 7.
    pub undervoltage: bool,
    /// Battery discharge overcurrent, bit 6.
    pub overcurrent: bool,
    /// Overcharge current, bit 5.
    pub overcharge_current: bool,
    /// Overcharge voltage, bit 4.
    pub overcharge_voltage: bool,
    /// Watchdog timeout, bit 2.
    pub watchdog_timeout: bool,
    /// Thermal shutdown, bit 0.
    pub temperature_shutdown: bool,
}

impl Faults {
    /// Decodes the raw FAULT byte. Reserved bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            undervoltage: bits & Fault::Undervoltage.mask() != 0,
            overcurrent: bits & Fault::Overcurrent.mask() != 0,
            overcharge_current: bits & Fault::OverchargeCurrent.mask() != 0,
            overcharge_voltage: bits & Fault::OverchargeVoltage.mask() != 0,
            watchdog_timeout: bits & Fault::WatchdogTimeout.mask() != 0,
            temperature_shutdown: bits & Fault::TemperatureShutdown.mask() != 0,
        }
    }

    /// Returns `true` if any fault is latched.
    pub fn any(&self) -> bool {
        self.undervoltage
            || self.overcurrent
            || self.overcharge_current
            || self.overcharge_voltage
            || self.watchdog_timeout
            || self.temperature_shutdown
    }
}

/// Raw contents of INTERRUPT_FLAG1 and INTERRUPT_FLAG2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptFlags {
    /// INTERRUPT_FLAG1 (0x34).
    pub flag1: u8,
    /// INTERRUPT_FLAG2 (0x35).
    pub flag2: u8,
}

impl InterruptFlags {
    /// Returns `true` if `irq` is flagged.
    pub fn contains(&self, irq: Interrupt) -> bool {
        let bits = match irq.flag_register() {
            Register::IntFlag1 => self.flag1,
            _ => self.flag2,
        };
        bits & irq.mask() != 0
    }

    /// Returns `true` if no known interrupt source is flagged.
    pub fn is_empty(&self) -> bool {
        !Interrupt::ALL.iter().any(|irq| self.contains(*irq))
    }

    /// Iterates over the flagged sources.
    pub fn iter(&self) -> impl Iterator<Item = Interrupt> + '_ {
        Interrupt::ALL.into_iter().filter(|irq| self.contains(*irq))
    }
}

/// A full snapshot of the status registers, read in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// Charger and battery status.
    pub charger: ChargerStatus,
    /// Battery state of charge, BAT_SOC bits 6:0.
    pub battery_soc: u8,
    /// Power good status.
    pub power_good: PowerGoodStatus,
    /// Latched faults.
    pub faults: Faults,
    /// Raw 13-bit battery voltage code.
    pub battery_voltage: u16,
}

/// Assembles the 13-bit battery voltage from VBAT_READ_H and VBAT_READ_L.
///
/// The low register's three least significant bits are reserved and dropped.
pub fn battery_voltage_from_bits(high: u8, low: u8) -> u16 {
    ((high as u16) << VBAT_HIGH_SHIFT) | (low >> VBAT_LOW_SHIFT) as u16
}
