//! # Radio GPIO pins
//!
//! The ADF7030-1 has eight GPIOs. Each one has an 8-bit configuration byte (GPCON) selecting
//! its function, stored in two places:
//! - the hardware GPIO block, where a change takes effect immediately ([`Bank::Direct`]),
//! - the radio profile, copied to the hardware when the host issues
//!   [`RadioCmd::CfgDev`] ([`Bank::Profile`], see [`apply_profile`](Adf7030::apply_profile)).
//!
//! Pins configured as outputs are driven through the set / clear registers with
//! [`set_pin`](Adf7030::set_pin) and [`clr_pin`](Adf7030::clr_pin).

use bitflags::bitflags;
use embedded_hal as hal;
use hal::blocking::spi::Transfer;
use hal::digital::v2::OutputPin;

use crate::error::Error;
use crate::registers::{byte_location, RegisterAddr, GPIO_BASE, PROFILE_GPCON_BASE};
use crate::spi::RadioCmd;
use crate::Adf7030;

/// Radio GPIO pin
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioPin {
    Gpio0,
    Gpio1,
    Gpio2,
    Gpio3,
    Gpio4,
    Gpio5,
    Gpio6,
    Gpio7,
}

/// Where a pin configuration is read from or written to
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Live hardware configuration
    Direct,
    /// Profile copy, applied on the next CFG_DEV command
    Profile,
}

impl Bank {
    fn base(&self) -> u32 {
        match self {
            Bank::Direct => GPIO_BASE,
            Bank::Profile => PROFILE_GPCON_BASE,
        }
    }
}

/// GPCON function code of a radio GPIO
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioConfig(pub u8);

impl GpioConfig {
    pub const DISABLED: GpioConfig = GpioConfig(0x00);
    pub const INPUT: GpioConfig = GpioConfig(0x01);
    /// Output driven by the set / clear registers
    pub const OUTPUT: GpioConfig = GpioConfig(0x02);
    /// Host interrupt line 0
    pub const IRQ0_OUT: GpioConfig = GpioConfig(0x03);
    /// Host interrupt line 1
    pub const IRQ1_OUT: GpioConfig = GpioConfig(0x04);
    pub const TX_EN: GpioConfig = GpioConfig(0x05);
    pub const RX_EN: GpioConfig = GpioConfig(0x06);
    pub const PA_EN: GpioConfig = GpioConfig(0x07);
    pub const LNA_EN: GpioConfig = GpioConfig(0x08);
    pub const CLK_OUT: GpioConfig = GpioConfig(0x09);
    /// Serial data (transparent mode)
    pub const TRX_DATA: GpioConfig = GpioConfig(0x0A);
    /// Serial clock (transparent mode)
    pub const TRX_CLK: GpioConfig = GpioConfig(0x0B);
}

bitflags! {
    /// Set of radio GPIO pins, as written to the set / clear registers
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GpioPins: u32 {
        const GPIO0 = 1 << 0;
        const GPIO1 = 1 << 1;
        const GPIO2 = 1 << 2;
        const GPIO3 = 1 << 3;
        const GPIO4 = 1 << 4;
        const GPIO5 = 1 << 5;
        const GPIO6 = 1 << 6;
        const GPIO7 = 1 << 7;
    }
}

impl From<GpioPin> for GpioPins {
    fn from(pin: GpioPin) -> Self {
        GpioPins::from_bits_truncate(1 << pin as u32)
    }
}

/// Word address and bit offset of the configuration byte of `pin`
fn config_location(pin: GpioPin, bank: Bank) -> (u32, u8) {
    byte_location(bank.base() + pin as u32)
}

impl<SPI, CS> Adf7030<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    /// Sets the function of a single GPIO
    pub fn set_config(
        &mut self,
        pin: GpioPin,
        cfg: GpioConfig,
        bank: Bank,
    ) -> Result<(), Error<SPI, CS>> {
        let (addr, offset) = config_location(pin, bank);
        self.set_field(addr, offset, 8, cfg.0 as u32)
    }

    /// Gets the function of a single GPIO
    pub fn get_config(&mut self, pin: GpioPin, bank: Bank) -> Result<GpioConfig, Error<SPI, CS>> {
        let (addr, offset) = config_location(pin, bank);
        self.get_field(addr, offset, 8).map(|cfg| GpioConfig(cfg as u8))
    }

    /// Copies the profile (including profile GPIO settings) to the hardware
    pub fn apply_profile(&mut self) -> Result<(), Error<SPI, CS>> {
        self.issue_cmd(RadioCmd::CfgDev)
    }

    /// Drives the given output pins high
    pub fn set_pin(&mut self, pins: impl Into<GpioPins>) -> Result<(), Error<SPI, CS>> {
        self.write_reg(RegisterAddr::GpioSet, pins.into().bits())
    }

    /// Drives the given output pins low
    pub fn clr_pin(&mut self, pins: impl Into<GpioPins>) -> Result<(), Error<SPI, CS>> {
        self.write_reg(RegisterAddr::GpioClr, pins.into().bits())
    }
}
