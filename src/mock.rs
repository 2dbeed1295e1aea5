//! Provides mock peripherals that behave like the ADF7030-1 and the board console
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::serial;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

use crate::registers::{RegisterAddr, GPIO_CLR_REG, GPIO_SET_REG};
use crate::{Adf7030, Config};

#[derive(Debug, PartialEq)]
pub enum MockError {
    Bus,
}

#[derive(Debug, PartialEq)]
enum Phase {
    Idle,
    Write(u32),
    Read(u32),
}

/// Simulated radio memory behind the SPI bus
pub struct MockAdf7030SPI {
    memory: BTreeMap<u32, u32>,
    frame_start: Rc<Cell<bool>>,
    phase: Phase,
    gpio_out: u32,
    commands: Vec<u8>,
    failures: u32,
    raise_on_read: Option<(u32, u32)>,
}

/// Chip select that marks frame boundaries for `MockAdf7030SPI`
pub struct MockAdf7030CS {
    frame_start: Rc<Cell<bool>>,
}

impl MockAdf7030SPI {
    pub fn peek(&self, addr: u32) -> u32 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }

    pub fn poke(&mut self, addr: u32, data: u32) {
        self.memory.insert(addr, data);
    }

    /// Asserts interrupt sources as the radio firmware would
    pub fn raise(&mut self, status: RegisterAddr, bits: u32) {
        let addr = status.addr();
        let pending = self.peek(addr) | bits;
        self.poke(addr, pending);
    }

    /// Asserts `bits` right after the next read of `status` completes
    pub fn raise_after_read(&mut self, status: RegisterAddr, bits: u32) {
        self.raise_on_read = Some((status.addr(), bits));
    }

    /// Fails the next `count` transfers, then behaves normally again
    pub fn fail_next(&mut self, count: u32) {
        self.failures = count;
    }

    pub fn gpio_out(&self) -> u32 {
        self.gpio_out
    }

    pub fn commands(&self) -> &[u8] {
        &self.commands
    }

    fn status_byte(&self) -> u8 {
        let pending = self.peek(RegisterAddr::Irq0Status.addr())
            | self.peek(RegisterAddr::Irq1Status.addr());
        0b1010_0010 | if pending != 0 { 0x40 } else { 0 }
    }

    fn store(&mut self, addr: u32, data: u32) {
        match addr {
            GPIO_SET_REG => self.gpio_out |= data,
            GPIO_CLR_REG => self.gpio_out &= !data,
            a if a == RegisterAddr::Irq0Status.addr() || a == RegisterAddr::Irq1Status.addr() => {
                let pending = self.peek(a) & !data;
                self.poke(a, pending);
            }
            a => self.poke(a, data),
        }
    }
}

pub fn mock_pair() -> (MockAdf7030SPI, MockAdf7030CS) {
    let frame_start = Rc::new(Cell::new(false));
    (
        MockAdf7030SPI {
            memory: BTreeMap::new(),
            frame_start: frame_start.clone(),
            phase: Phase::Idle,
            gpio_out: 0,
            commands: Vec::new(),
            failures: 0,
            raise_on_read: None,
        },
        MockAdf7030CS { frame_start },
    )
}

pub fn mock_radio() -> Adf7030<MockAdf7030SPI, MockAdf7030CS> {
    let (spi, cs) = mock_pair();
    Adf7030::new(spi, cs, Config::default())
}

impl Transfer<u8> for MockAdf7030SPI {
    type Error = MockError;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(MockError::Bus);
        }
        if self.frame_start.replace(false) {
            let status = self.status_byte();
            let cmd = words[0];
            self.phase = Phase::Idle;
            if cmd & 0x80 != 0 {
                if cmd != 0xFF {
                    self.commands.push(cmd);
                }
            } else {
                let mut addr = [0u8; 4];
                addr.clone_from_slice(&words[1..5]);
                let addr = u32::from_be_bytes(addr);
                self.phase = if cmd & 0x40 != 0 {
                    Phase::Read(addr)
                } else {
                    Phase::Write(addr)
                };
            }
            words.iter_mut().for_each(|w| *w = 0);
            words[0] = status;
            return Ok(words);
        }
        match self.phase {
            Phase::Write(addr) => {
                let mut buf = [0u8; 4];
                buf.clone_from_slice(&words[..4]);
                self.store(addr, u32::from_be_bytes(buf));
                self.phase = Phase::Write(addr + 4);
                words.iter_mut().for_each(|w| *w = 0);
            }
            Phase::Read(addr) => {
                words[..4].clone_from_slice(&self.peek(addr).to_be_bytes());
                self.phase = Phase::Read(addr + 4);
                if let Some((status, bits)) = self.raise_on_read {
                    if status == addr {
                        self.raise_on_read = None;
                        let pending = self.peek(addr) | bits;
                        self.poke(addr, pending);
                    }
                }
            }
            Phase::Idle => return Err(MockError::Bus),
        }
        Ok(words)
    }
}

impl OutputPin for MockAdf7030CS {
    type Error = MockError;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.frame_start.set(true);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.frame_start.set(false);
        Ok(())
    }
}

/// SPI bus that fails every transfer
pub struct FailingSPI;

impl Transfer<u8> for FailingSPI {
    type Error = MockError;

    fn transfer<'w>(&mut self, _words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        Err(MockError::Bus)
    }
}

/// Console capturing everything written to it
#[derive(Default)]
pub struct MockConsole {
    sent: Vec<u8>,
}

impl MockConsole {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.sent).into_owned()
    }
}

impl serial::Write<u8> for MockConsole {
    type Error = MockError;

    fn bwrite_all(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        self.sent.extend_from_slice(buffer);
        Ok(())
    }

    fn bflush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay that only accumulates the requested time
#[derive(Default)]
pub struct MockDelay {
    pub elapsed_ms: u32,
}

impl DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock() {
        let (mut spi, mut cs) = mock_pair();
        cs.set_low().unwrap();
        spi.transfer(&mut [0x38, 0x20, 0x00, 0x05, 0x14]).unwrap();
        spi.transfer(&mut [0x00, 0x00, 0x00, 0x03]).unwrap();
        cs.set_high().unwrap();

        cs.set_low().unwrap();
        spi.transfer(&mut [0x78, 0x20, 0x00, 0x05, 0x14, 0xFF, 0xFF]).unwrap();
        let mut read = [0xFF; 4];
        spi.transfer(&mut read).unwrap();
        cs.set_high().unwrap();
        assert_eq!(u32::from_be_bytes(read), 3);
    }

    #[test]
    fn status_registers_clear_on_write() {
        let (mut spi, mut cs) = mock_pair();
        spi.raise(RegisterAddr::Irq0Status, 0b1011);
        cs.set_low().unwrap();
        let mut header = [0x38, 0x40, 0x00, 0x38, 0x08];
        spi.transfer(&mut header).unwrap();
        assert_eq!(header[0] & 0x40, 0x40);
        spi.transfer(&mut [0x00, 0x00, 0x00, 0x03]).unwrap();
        cs.set_high().unwrap();
        assert_eq!(spi.peek(RegisterAddr::Irq0Status.addr()), 0b1000);
    }

    #[test]
    fn raise_lands_after_the_read() {
        let (mut spi, mut cs) = mock_pair();
        spi.raise(RegisterAddr::Irq1Status, 0b01);
        spi.raise_after_read(RegisterAddr::Irq1Status, 0b10);
        cs.set_low().unwrap();
        spi.transfer(&mut [0x78, 0x40, 0x00, 0x38, 0x0C, 0xFF, 0xFF]).unwrap();
        let mut read = [0xFF; 4];
        spi.transfer(&mut read).unwrap();
        cs.set_high().unwrap();
        assert_eq!(u32::from_be_bytes(read), 0b01);
        assert_eq!(spi.peek(RegisterAddr::Irq1Status.addr()), 0b11);
    }

    #[test]
    fn fails_only_the_requested_transfers() {
        let (mut spi, mut cs) = mock_pair();
        spi.fail_next(1);
        cs.set_low().unwrap();
        assert_eq!(spi.transfer(&mut [0xFF]), Err(MockError::Bus));
        cs.set_high().unwrap();
        cs.set_low().unwrap();
        assert!(spi.transfer(&mut [0xFF]).is_ok());
        cs.set_high().unwrap();
    }
}
