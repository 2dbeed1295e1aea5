//! # Board support
//!
//! Platform identifiers and constants of the WizeUp board, the RTC prescaler arithmetic, the
//! configuration EEPROM on the internal I2C bus, and [`Bsp`], which owns the radio driver, the
//! AT console and the board delay.

use core::fmt;
use embedded_hal as hal;
use hal::blocking::delay::DelayMs;
use hal::blocking::i2c;
use hal::blocking::serial;
use hal::blocking::spi::Transfer;
use hal::digital::v2::OutputPin;

use crate::atci::{Atci, AtciError};
use crate::error::Error;
use crate::irq::IntPin;
use crate::spi::RadioCmd;
use crate::Adf7030;

#[cfg(feature = "defmt")]
use defmt::{debug, warn};

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiId {
    /// Bus shared with the radio
    Main,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cId {
    /// On-board bus (EEPROM)
    Internal,
    /// Connector bus
    External,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Console,
}

/// UART carrying AT traffic and messages
pub const STDOUT_UART: UartId = UartId::Console;

/// EEPROM bus address, 8-bit form (R/W bit included)
pub const EEPROM_ADDRESS: u8 = 0b1010_0000;
/// EEPROM capacity in bytes
pub const EEPROM_SIZE: usize = 8192;
/// EEPROM write page
pub const EEPROM_PAGE_SIZE: usize = 32;
/// Time the EEPROM needs to commit a page
const EEPROM_WRITE_CYCLE_MS: u32 = 5;

/// RTC synchronous prescaler
pub const RTC_PREDIV_S: u32 = 1023;
/// RTC asynchronous prescaler
pub const RTC_PREDIV_A: u32 = 31;
/// Low speed crystal feeding the RTC
pub const LSE_HZ: u32 = 32_768;

/// Calendar update rate for a given RTC clock
pub const fn rtc_calendar_hz(rtc_clk_hz: u32) -> u32 {
    rtc_clk_hz / ((RTC_PREDIV_A + 1) * (RTC_PREDIV_S + 1))
}

/// Sub-second counter rate for a given RTC clock
pub const fn rtc_subsecond_hz(rtc_clk_hz: u32) -> u32 {
    rtc_clk_hz / (RTC_PREDIV_A + 1)
}

/// Converts the RTC sub-second register (a down counter) to milliseconds into the second
///
/// Returns `None` while a shift operation leaves the register above the prescaler, in which
/// case the calendar second has not been adjusted yet and the registers must be read again.
pub fn rtc_subseconds_to_ms(ss: u32) -> Option<u32> {
    if ss > RTC_PREDIV_S {
        return None;
    }
    Some((RTC_PREDIV_S - ss) * 1000 / (RTC_PREDIV_S + 1))
}

#[derive(Debug, PartialEq)]
pub enum EepromError<E> {
    I2c(E),
    /// Access past the end of the EEPROM
    OutOfRange,
}

/// 16-bit addressed I2C EEPROM
pub struct Eeprom<I2C> {
    i2c: I2C,
}

impl<I2C> Eeprom<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Eeprom { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn address() -> u8 {
        EEPROM_ADDRESS >> 1
    }
}

impl<I2C, E> Eeprom<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>,
{
    pub fn read(&mut self, mem_addr: u16, buf: &mut [u8]) -> Result<(), EepromError<E>> {
        check_range(mem_addr, buf.len())?;
        self.i2c
            .write_read(Self::address(), &mem_addr.to_be_bytes(), buf)
            .map_err(EepromError::I2c)
    }

    /// Writes `data`, splitting it on page boundaries and waiting out each write cycle
    pub fn write<D>(
        &mut self,
        mem_addr: u16,
        data: &[u8],
        delay: &mut D,
    ) -> Result<(), EepromError<E>>
    where
        D: DelayMs<u32>,
    {
        check_range(mem_addr, data.len())?;
        let mut addr = mem_addr;
        let mut rest = data;
        while !rest.is_empty() {
            let room = EEPROM_PAGE_SIZE - (addr as usize % EEPROM_PAGE_SIZE);
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            let mut frame = [0u8; 2 + EEPROM_PAGE_SIZE];
            frame[..2].copy_from_slice(&addr.to_be_bytes());
            frame[2..2 + chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(Self::address(), &frame[..2 + chunk.len()])
                .map_err(EepromError::I2c)?;
            delay.delay_ms(EEPROM_WRITE_CYCLE_MS);
            addr += chunk.len() as u16;
            rest = tail;
        }
        Ok(())
    }
}

fn check_range<E>(mem_addr: u16, len: usize) -> Result<(), EepromError<E>> {
    if mem_addr as usize + len > EEPROM_SIZE {
        return Err(EepromError::OutOfRange);
    }
    Ok(())
}

/// Error raised by board level sequences
pub enum BspError<SPI, CS, UART>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
    UART: serial::Write<u8>,
{
    Radio(Error<SPI, CS>),
    Console(AtciError<UART::Error>),
}

impl<SPI, CS, UART> From<Error<SPI, CS>> for BspError<SPI, CS, UART>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
    UART: serial::Write<u8>,
{
    fn from(error: Error<SPI, CS>) -> Self {
        BspError::Radio(error)
    }
}

impl<SPI, CS, UART> From<AtciError<UART::Error>> for BspError<SPI, CS, UART>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
    UART: serial::Write<u8>,
{
    fn from(error: AtciError<UART::Error>) -> Self {
        BspError::Console(error)
    }
}

impl<SPI, CS, UART> fmt::Debug for BspError<SPI, CS, UART>
where
    SPI: Transfer<u8>,
    SPI::Error: fmt::Debug,
    CS: OutputPin,
    <CS as OutputPin>::Error: fmt::Debug,
    UART: serial::Write<u8>,
    UART::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BspError::Radio(error) => write!(f, "Radio({:?})", error),
            BspError::Console(error) => write!(f, "Console({:?})", error),
        }
    }
}

/// The board: radio, AT console and delay
pub struct Bsp<SPI, CS, UART, D> {
    radio: Adf7030<SPI, CS>,
    atci: Atci<UART>,
    delay: D,
}

impl<SPI, CS, UART, D> Bsp<SPI, CS, UART, D> {
    pub fn new(radio: Adf7030<SPI, CS>, atci: Atci<UART>, delay: D) -> Self {
        Bsp { radio, atci, delay }
    }

    pub fn radio(&mut self) -> &mut Adf7030<SPI, CS> {
        &mut self.radio
    }

    pub fn atci(&mut self) -> &mut Atci<UART> {
        &mut self.atci
    }

    pub fn release(self) -> (Adf7030<SPI, CS>, Atci<UART>, D) {
        (self.radio, self.atci, self.delay)
    }
}

impl<SPI, CS, UART, D> Bsp<SPI, CS, UART, D>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
    UART: serial::Write<u8>,
    D: DelayMs<u32>,
{
    pub fn msleep(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Routes the radio interrupt to the MCU, drops stale interrupts and announces the wake up
    pub fn init(&mut self) -> Result<(), BspError<SPI, CS, UART>> {
        debug!("bsp init");
        self.radio.irq_set_gpio_pin(IntPin::Irq0)?;
        self.radio.irq_clr_all_status(IntPin::Irq0)?;
        self.radio.irq_clr_all_status(IntPin::Irq1)?;
        self.atci.send_wakeup_msg()?;
        Ok(())
    }

    /// Announces the sleep, then puts the radio PHY to sleep
    pub fn sleep(&mut self) -> Result<(), BspError<SPI, CS, UART>> {
        debug!("bsp sleep");
        self.atci.send_sleep_msg()?;
        self.radio.issue_cmd(RadioCmd::PhySleep)?;
        Ok(())
    }

    /// Acknowledges an AT command with the binary outcome of a radio operation
    pub fn ack<T>(
        &mut self,
        result: &Result<T, Error<SPI, CS>>,
    ) -> Result<(), AtciError<UART::Error>> {
        let code = match result {
            Ok(_) => 0,
            Err(error) => {
                warn!("radio access failed");
                error.code()
            }
        };
        self.atci.resp_ack(code)
    }
}
