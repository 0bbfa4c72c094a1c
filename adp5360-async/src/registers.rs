//! Register map of the ADP5360.
//!
//! Only the registers the driver touches are listed. Addresses are hardware
//! constants taken from the datasheet register map.

/// Default 7-bit I2C address of the ADP5360.
pub const ADP5360_I2C_ADDR: u8 = 0x46;

/// A register of the ADP5360, with its bus address as discriminant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// CHARGER_STATUS1
    Status1 = 0x08,
    /// CHARGER_STATUS2
    Status2 = 0x09,
    /// BAT_SOC
    BatSoc = 0x21,
    /// VBAT_READ_H, battery voltage bits 12:5.
    VbatHigh = 0x25,
    /// VBAT_READ_L, battery voltage bits 4:0 in bits 7:3.
    VbatLow = 0x26,
    /// FAULT
    Fault = 0x2E,
    /// PGOOD_STATUS
    PgoodStatus = 0x2F,
    /// INTERRUPT_ENABLE1
    IntEn1 = 0x32,
    /// INTERRUPT_ENABLE2
    IntEn2 = 0x33,
    /// INTERRUPT_FLAG1
    IntFlag1 = 0x34,
    /// INTERRUPT_FLAG2
    IntFlag2 = 0x35,
}

impl Register {
    /// The register's address on the bus.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg.addr()
    }
}

// --- CHARGER_STATUS1 ---
pub(crate) const VBUS_OV_MASK: u8 = 0b1000_0000;
pub(crate) const ADPICHG_MASK: u8 = 0b0100_0000;
pub(crate) const VBUS_ILIM_MASK: u8 = 0b0010_0000;
pub(crate) const CHARGER_STATUS_MASK: u8 = 0b0000_0111;

// --- CHARGER_STATUS2 ---
pub(crate) const THR_STATUS_MASK: u8 = 0b1110_0000;
pub(crate) const THR_STATUS_SHIFT: u8 = 5;
pub(crate) const BAT_OV_MASK: u8 = 0b0001_0000;
pub(crate) const BAT_UV_MASK: u8 = 0b0000_1000;
pub(crate) const BAT_CHG_STATUS_MASK: u8 = 0b0000_0111;

// --- BAT_SOC ---
pub(crate) const BAT_SOC_MASK: u8 = 0b0111_1111;

// --- VBAT_READ ---
pub(crate) const VBAT_HIGH_SHIFT: u16 = 5;
pub(crate) const VBAT_LOW_SHIFT: u8 = 3;

/// Largest value the battery voltage ADC code can take (13 bits).
pub const VBAT_MAX: u16 = 0x1FFF;

/// Highest valid bit index within a register.
pub(crate) const MAX_BIT: u8 = 7;
