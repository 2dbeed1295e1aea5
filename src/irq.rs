//! # Radio interrupts
//!
//! The radio reports up to 32 interrupt sources: 16 soft events raised by the PHY firmware
//! ([`IrqSource::Preamble`] .. [`IrqSource::HardFault`]) and 16 hard lines from the radio
//! peripherals. Each of the two host interrupt lines ([`IntPin`]) has its own source map and
//! pending status, and is brought out on a radio GPIO chosen in [`Config`](crate::Config).

use bitflags::bitflags;
use embedded_hal as hal;
use hal::blocking::spi::Transfer;
use hal::digital::v2::OutputPin;

use crate::error::Error;
use crate::gpio::{Bank, GpioConfig};
use crate::registers::RegisterAddr;
use crate::Adf7030;

/// Interrupt source number
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqSource {
    // Soft events
    /// Preamble detected (RX) / preamble started (TX)
    Preamble = 0,
    /// Preamble gone (RX) / end of preamble (TX)
    PreambleGone = 1,
    /// Syncword detected (RX) / end of syncword (TX)
    Syncword = 2,
    /// Valid length received (RX) / end of length word (TX)
    Length = 3,
    /// Full payload received / transmitted
    Payload = 4,
    /// Payload block received / transmitted
    PayloadBloc = 5,
    /// Frame CRC correct (RX) / CRC transmitted (TX)
    CrcChk = 6,
    /// End of frame
    Eof = 7,
    /// Rolling buffer half full
    BuffHalf = 8,
    /// Rolling buffer full
    BuffFull = 9,
    /// State machine ready for a new command
    SmReady = 10,
    /// State machine idle
    SmIdle = 11,
    /// State machine in a state body function
    SmBody = 12,
    /// State machine end of script, also signals a state machine error
    SmScript = 13,
    /// MCR snoop
    Snoop = 14,
    /// Critical firmware error
    HardFault = 15,

    // Hard lines
    SpiHostExt = 16,
    Tmr0Ext = 17,
    Tmr1Ext = 18,
    Tmr2Ext = 19,
    Tmr3Ext = 20,
    Unused0 = 21,
    RtcExt = 22,
    WdtExt = 23,
    SerdesExt = 24,
    SerdesMonitorExt = 25,
    McrSnoopExt = 26,
    CalReadyExt = 27,
    AgcExt = 28,
    Unused1 = 29,
    Unused2 = 30,
    Unused3 = 31,
}

impl IrqSource {
    /// State machine error shares its number with the end of script event
    pub const SM_ERROR: IrqSource = IrqSource::SmScript;

    /// Whether the source is raised by the PHY firmware rather than a peripheral line
    pub fn is_soft(&self) -> bool {
        (*self as u8) < 16
    }
}

bitflags! {
    /// Interrupt source mask, bit `n` is [`IrqSource`] number `n`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqMask: u32 {
        const PREAMBLE = 1 << 0;
        const PREAMBLE_GONE = 1 << 1;
        const SYNCWORD = 1 << 2;
        const LENGTH = 1 << 3;
        const PAYLOAD = 1 << 4;
        const PAYLOAD_BLOC = 1 << 5;
        const CRC_CHK = 1 << 6;
        const EOF = 1 << 7;
        const BUFF_HALF = 1 << 8;
        const BUFF_FULL = 1 << 9;
        const SM_READY = 1 << 10;
        const SM_IDLE = 1 << 11;
        const SM_BODY = 1 << 12;
        const SM_SCRIPT = 1 << 13;
        const SM_ERROR = 1 << 13;
        const SNOOP = 1 << 14;
        const HARDFAULT = 1 << 15;
        const SPI_HOST_EXT = 1 << 16;
        const TMR0_EXT = 1 << 17;
        const TMR1_EXT = 1 << 18;
        const TMR2_EXT = 1 << 19;
        const TMR3_EXT = 1 << 20;
        const UNUSED0 = 1 << 21;
        const RTC_EXT = 1 << 22;
        const WDT_EXT = 1 << 23;
        const SERDES_EXT = 1 << 24;
        const SERDES_MONITOR_EXT = 1 << 25;
        const MCR_SNOOP_EXT = 1 << 26;
        const CAL_READY_EXT = 1 << 27;
        const AGC_EXT = 1 << 28;
        const UNUSED1 = 1 << 29;
        const UNUSED2 = 1 << 30;
        const UNUSED3 = 1 << 31;
    }
}

impl From<IrqSource> for IrqMask {
    fn from(source: IrqSource) -> Self {
        IrqMask::from_bits_retain(1 << source as u32)
    }
}

/// Host interrupt line
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntPin {
    Irq0,
    Irq1,
}

impl IntPin {
    fn mask_reg(&self) -> RegisterAddr {
        match self {
            IntPin::Irq0 => RegisterAddr::Irq0Mask,
            IntPin::Irq1 => RegisterAddr::Irq1Mask,
        }
    }

    fn status_reg(&self) -> RegisterAddr {
        match self {
            IntPin::Irq0 => RegisterAddr::Irq0Status,
            IntPin::Irq1 => RegisterAddr::Irq1Status,
        }
    }

    fn gpio_config(&self) -> GpioConfig {
        match self {
            IntPin::Irq0 => GpioConfig::IRQ0_OUT,
            IntPin::Irq1 => GpioConfig::IRQ1_OUT,
        }
    }
}

impl<SPI, CS> Adf7030<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    /// Brings the interrupt line out on its configured GPIO
    pub fn irq_set_gpio_pin(&mut self, line: IntPin) -> Result<(), Error<SPI, CS>> {
        let gpio = match line {
            IntPin::Irq0 => self.config.irq0_gpio,
            IntPin::Irq1 => self.config.irq1_gpio,
        };
        self.set_config(gpio, line.gpio_config(), Bank::Direct)
    }

    /// Selects which sources assert the interrupt line
    pub fn irq_set_map(&mut self, line: IntPin, map: IrqMask) -> Result<(), Error<SPI, CS>> {
        self.write_reg(line.mask_reg(), map.bits())?;
        self.irq_map[line as usize] = map;
        Ok(())
    }

    /// Reads back the sources routed to the interrupt line
    pub fn irq_get_map(&mut self, line: IntPin) -> Result<IrqMask, Error<SPI, CS>> {
        let map = IrqMask::from_bits_retain(self.read_reg(line.mask_reg())?);
        self.irq_map[line as usize] = map;
        Ok(map)
    }

    /// Reads the pending sources of the interrupt line
    pub fn irq_get_status(&mut self, line: IntPin) -> Result<IrqMask, Error<SPI, CS>> {
        let status = IrqMask::from_bits_retain(self.read_reg(line.status_reg())?);
        self.irq_status[line as usize] = status;
        Ok(status)
    }

    /// Acknowledges the given sources on the interrupt line
    pub fn irq_clr_status(&mut self, line: IntPin, sources: IrqMask) -> Result<(), Error<SPI, CS>> {
        self.write_reg(line.status_reg(), sources.bits())?;
        self.irq_status[line as usize].remove(sources);
        Ok(())
    }

    /// Acknowledges every source on the interrupt line
    pub fn irq_clr_all_status(&mut self, line: IntPin) -> Result<(), Error<SPI, CS>> {
        self.irq_clr_status(line, IrqMask::all())
    }

    /// Reads the pending sources, then acknowledges exactly those
    pub fn irq_get_clr_status(&mut self, line: IntPin) -> Result<IrqMask, Error<SPI, CS>> {
        let status = self.irq_get_status(line)?;
        if !status.is_empty() {
            self.irq_clr_status(line, status)?;
        }
        Ok(status)
    }

    /// Source map last written to or read from the radio
    pub fn irq_map(&self, line: IntPin) -> IrqMask {
        self.irq_map[line as usize]
    }

    /// Pending sources as of the last status read, less the sources acknowledged since
    pub fn irq_status(&self, line: IntPin) -> IrqMask {
        self.irq_status[line as usize]
    }
}
