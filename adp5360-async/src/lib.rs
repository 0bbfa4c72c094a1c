//! An asynchronous, `no_std` driver for the ADP5360 power management and fuel gauge IC.
//!
//! This driver provides an `Adp5360` handle to talk to the ADP5360 over I2C.
//! It reads and decodes the charger status, battery state of charge, power good,
//! fault and interrupt registers, reads the raw battery voltage, and can
//! enable interrupt sources and clear latched faults.
//!
//! Every accessor performs a fresh bus transaction and returns a `Result`, so a
//! register that reads 0 can be told apart from a device that did not answer.
//!
//! # Usage
//!
//! To use this driver, you need an I2C peripheral implementation that satisfies the
//! `embedded-hal-async::i2c::I2c` trait.
//!
//! ```ignore
//! use adp5360_async::{Adp5360, Interrupt};
//!
//! async fn monitor_battery<I: embedded_hal_async::i2c::I2c>(i2c: I) {
//!     let mut pmic = Adp5360::new(i2c);
//!     pmic.begin().await.unwrap();
//!
//!     pmic.enable_interrupt(Interrupt::SocLow, true).await.unwrap();
//!
//!     if let Ok(status) = pmic.read_status().await {
//!         // log::info!("SOC: {}", status.battery_soc);
//!         // log::info!("Charger: {:?}", status.charger.charger_state);
//!     }
//!
//!     if pmic.has_undervoltage_fault().await.unwrap() {
//!         pmic.clear_undervoltage_fault().await.unwrap();
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod driver;
pub mod error;
pub mod monitor;
pub mod registers;
pub mod types;

pub use driver::Adp5360;
pub use error::Error;
pub use monitor::VoltageMonitor;
pub use registers::{Register, ADP5360_I2C_ADDR, VBAT_MAX};
pub use types::*;
