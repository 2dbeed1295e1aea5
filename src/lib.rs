#![cfg_attr(not(test), no_std)]

//! Support crate for the WizeUp metering module.
//!
//! * An `embedded-hal` driver for the [ADF7030-1](https://www.analog.com/en/products/adf7030-1.html)
//!   sub-GHz radio PHY: SPI memory and field access, radio commands, GPIO configuration and the
//!   host interrupt controller.
//! * AT command responses written to the console UART.
//! * Board support: platform identifiers, RTC prescaler math, the configuration EEPROM and a
//!   board bundle tying the radio and console together.
//!
//! # Not yet implemented
//! * Radio state machine sequencing (PHY_ON / RX / TX flows)
//! * Calibration and packet framing
pub mod atci;
pub mod bsp;
mod error;
pub mod gpio;
pub mod irq;
#[cfg(test)]
mod mock;
mod registers;
mod spi;

pub use error::{Error, XferResult};
pub use gpio::{Bank, GpioConfig, GpioPin, GpioPins};
pub use irq::{IntPin, IrqMask, IrqSource};
pub use registers::PhyStatus;
pub use spi::RadioCmd;

/// Driver configuration
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Radio GPIO carrying the IRQ0 host interrupt line
    pub irq0_gpio: GpioPin,
    /// Radio GPIO carrying the IRQ1 host interrupt line
    pub irq1_gpio: GpioPin,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            irq0_gpio: GpioPin::Gpio3,
            irq1_gpio: GpioPin::Gpio4,
        }
    }
}

pub struct Adf7030<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: Config,
    last_xfer: XferResult,
    irq_map: [IrqMask; 2],
    irq_status: [IrqMask; 2],
}

impl<SPI, CS> Adf7030<SPI, CS> {
    pub fn new(spi: SPI, cs: CS, config: Config) -> Self {
        assert!(
            config.irq0_gpio != config.irq1_gpio,
            "IRQ0 and IRQ1 must use different GPIOs"
        );
        Adf7030 {
            spi,
            cs,
            config,
            last_xfer: XferResult::Success,
            irq_map: [IrqMask::empty(); 2],
            irq_status: [IrqMask::empty(); 2],
        }
    }

    /// Result of the last SPI frame exchanged with the radio
    pub fn last_xfer(&self) -> XferResult {
        self.last_xfer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the bus and chip select
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}
