//! Drives the ADP5360 driver against a scripted I2C bus on the host.
//!
//! The mock plays the part of a PMIC that is fast charging a battery at 60%
//! state of charge with a latched undervoltage fault. Swap it for a real
//! `embedded-hal-async` I2C peripheral to talk to hardware.

use adp5360_async::{Adp5360, Register, ADP5360_I2C_ADDR};
use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
use log::{error, info, LevelFilter};

fn read(reg: Register, value: u8) -> Transaction {
    Transaction::write_read(ADP5360_I2C_ADDR, vec![reg.addr()], vec![value])
}

fn write(reg: Register, value: u8) -> Transaction {
    Transaction::write(ADP5360_I2C_ADDR, vec![reg.addr(), value])
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .expect("Could not initialize logger");

    let expectations = [
        // begin()
        read(Register::Status1, 0b0000_0010),
        // read_status()
        read(Register::Status1, 0b0000_0010),
        read(Register::Status2, 0b1110_0100),
        read(Register::BatSoc, 0x3C),
        read(Register::VbatHigh, 0x7A),
        read(Register::VbatLow, 0x40),
        read(Register::Fault, 0x80),
        read(Register::PgoodStatus, 0b0000_1111),
        // enable_soc_low_interrupt(true)
        read(Register::IntEn1, 0x00),
        write(Register::IntEn1, 0x80),
        // read_pending_interrupts()
        read(Register::IntFlag1, 0x80),
        read(Register::IntFlag2, 0x00),
        // clear_undervoltage_fault()
        read(Register::Fault, 0x80),
        write(Register::Fault, 0x80),
        // voltage_monitor().read_battery_voltage()
        read(Register::VbatHigh, 0x7A),
        read(Register::VbatLow, 0x40),
    ];

    let mut pmic = Adp5360::new(Mock::new(&expectations));

    if let Err(err) = pmic.begin().await {
        error!("ADP5360 not found: {err}");
        return;
    }
    info!("ADP5360 found at {:#04x}", pmic.address());

    match pmic.read_status().await {
        Ok(status) => {
            info!("--- PMIC Status ---");
            info!("Charger: {:?}", status.charger.charger_state);
            info!("Thermistor: {:?}", status.charger.thermistor_state);
            info!("Battery: {:?}", status.charger.battery_state);
            info!("SOC: {}%", status.battery_soc);
            info!("VBAT code: {:#06x}", status.battery_voltage);
            info!("Power Good: {:?}", status.power_good);
            info!("Faults: {:?}", status.faults);
            info!("-------------------");

            if let Err(err) = pmic.enable_soc_low_interrupt(true).await {
                error!("Failed to enable SOC low interrupt: {err}");
            }

            match pmic.read_pending_interrupts().await {
                Ok(flags) => {
                    for irq in flags.iter() {
                        info!("Pending interrupt: {irq:?}");
                    }
                }
                Err(err) => error!("Failed to read interrupt flags: {err}"),
            }

            if status.faults.undervoltage {
                match pmic.clear_undervoltage_fault().await {
                    Ok(()) => info!("Cleared undervoltage fault"),
                    Err(err) => error!("Failed to clear undervoltage fault: {err}"),
                }
            }
        }
        Err(err) => {
            error!("Failed to read PMIC status: {err}");
        }
    }

    let mut monitor = pmic.voltage_monitor();
    match monitor.read_battery_voltage().await {
        Ok(code) => info!("VBAT code via monitor: {code:#06x}"),
        Err(err) => error!("Failed to read battery voltage: {err}"),
    }

    pmic.release().done();
}
