#![cfg_attr(not(test), no_std)]
#![doc = "Asynchronous shared I2C bus device for embedded-hal-async drivers."]

// For the official Embassy implementation, see:
// - https://github.com/embassy-rs/embassy/tree/main/embassy-embedded-hal/src/shared_bus

extern crate alloc;

pub mod i2c;
