use crate::error::Error;
use crate::registers::{PhyStatus, RegisterAddr};
use crate::Adf7030;
use embedded_hal as hal;
use hal::blocking::spi::Transfer;
use hal::digital::v2::OutputPin;

#[cfg(feature = "defmt")]
use defmt::trace;

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

/// Block memory write with a 32-bit address in the frame
const MEM_WR_BLOCK_LONG: u8 = 0x38;
/// Block memory read with a 32-bit address in the frame
const MEM_RD_BLOCK_LONG: u8 = 0x78;
/// No operation, clocks out the status byte
const NOP: u8 = 0xFF;

/// Radio controller commands
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioCmd {
    PhySleep = 0x81,
    PhyOff = 0x82,
    PhyOn = 0x83,
    PhyRx = 0x84,
    PhyTx = 0x85,
    /// Applies the profile to the hardware
    CfgDev = 0x86,
    Cca = 0x87,
    DoCal = 0x89,
    Monitor = 0x8A,
}

impl<SPI, CS> Adf7030<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    /// Runs `body` inside one chip select window and records the outcome
    fn frame<T, F>(&mut self, body: F) -> Result<T, Error<SPI, CS>>
    where
        F: FnOnce(&mut SPI) -> Result<T, SPI::Error>,
    {
        let result = self.select(body);
        self.last_xfer = (&result).into();
        result
    }

    fn select<T, F>(&mut self, body: F) -> Result<T, Error<SPI, CS>>
    where
        F: FnOnce(&mut SPI) -> Result<T, SPI::Error>,
    {
        self.cs.set_low().map_err(Error::ChipSelect)?;
        let value = body(&mut self.spi).map_err(Error::Transfer);
        // CS is released even when the transfer failed
        let released = self.cs.set_high().map_err(Error::ChipSelect);
        let value = value?;
        released?;
        Ok(value)
    }

    /// Writes consecutive 32-bit words starting at `addr`
    pub fn write_mem(&mut self, addr: u32, data: &[u32]) -> Result<(), Error<SPI, CS>> {
        assert!(addr & 0x3 == 0, "Address must be word aligned");
        trace!("mem wr {=u32:#x} x{=usize}", addr, data.len());
        self.frame(|spi| {
            let mut header = pack(MEM_WR_BLOCK_LONG, addr);
            spi.transfer(&mut header)?;
            for word in data {
                let mut buf = word.to_be_bytes();
                spi.transfer(&mut buf)?;
            }
            Ok(())
        })
    }

    /// Reads consecutive 32-bit words starting at `addr`
    pub fn read_mem(&mut self, addr: u32, data: &mut [u32]) -> Result<(), Error<SPI, CS>> {
        assert!(addr & 0x3 == 0, "Address must be word aligned");
        trace!("mem rd {=u32:#x} x{=usize}", addr, data.len());
        self.frame(|spi| {
            let header = pack(MEM_RD_BLOCK_LONG, addr);
            // Two dummy bytes before the radio starts shifting data out
            let mut buf = [header[0], header[1], header[2], header[3], header[4], NOP, NOP];
            spi.transfer(&mut buf)?;
            for word in data.iter_mut() {
                let mut buf = [NOP; 4];
                spi.transfer(&mut buf)?;
                *word = u32::from_be_bytes(buf);
            }
            Ok(())
        })
    }

    pub fn set_mem32(&mut self, addr: u32, data: u32) -> Result<(), Error<SPI, CS>> {
        self.write_mem(addr, &[data])
    }

    pub fn get_mem32(&mut self, addr: u32) -> Result<u32, Error<SPI, CS>> {
        let mut data = [0u32];
        self.read_mem(addr, &mut data)?;
        Ok(data[0])
    }

    /// Writes `width` bits of `value` at bit `offset` of the word at `addr`, leaving the rest
    /// of the word untouched
    pub fn set_field(
        &mut self,
        addr: u32,
        offset: u8,
        width: u8,
        value: u32,
    ) -> Result<(), Error<SPI, CS>> {
        check_field(offset, width);
        if width == 32 {
            return self.set_mem32(addr, value);
        }
        let mask = field_mask(width) << offset;
        let word = self.get_mem32(addr)?;
        self.set_mem32(addr, (word & !mask) | ((value << offset) & mask))
    }

    /// Reads `width` bits at bit `offset` of the word at `addr`
    pub fn get_field(&mut self, addr: u32, offset: u8, width: u8) -> Result<u32, Error<SPI, CS>> {
        check_field(offset, width);
        let word = self.get_mem32(addr)?;
        Ok((word >> offset) & field_mask(width))
    }

    /// Sends a command to the radio controller
    pub fn issue_cmd(&mut self, cmd: RadioCmd) -> Result<(), Error<SPI, CS>> {
        trace!("cmd {=u8:#x}", cmd as u8);
        self.frame(|spi| {
            spi.transfer(&mut [cmd as u8])?;
            Ok(())
        })
    }

    /// Polls the status byte
    pub fn get_status(&mut self) -> Result<PhyStatus, Error<SPI, CS>> {
        self.frame(|spi| {
            let mut buf = [NOP];
            spi.transfer(&mut buf)?;
            Ok(PhyStatus::from(buf[0]))
        })
    }

    pub(crate) fn read_reg(&mut self, reg: RegisterAddr) -> Result<u32, Error<SPI, CS>> {
        assert!(!reg.write_only(), "Register is write only");
        self.get_mem32(reg.addr())
    }

    pub(crate) fn write_reg(&mut self, reg: RegisterAddr, data: u32) -> Result<(), Error<SPI, CS>> {
        self.set_mem32(reg.addr(), data)
    }
}

fn pack(cmd: u8, addr: u32) -> [u8; 5] {
    let a = addr.to_be_bytes();
    [cmd, a[0], a[1], a[2], a[3]]
}

fn check_field(offset: u8, width: u8) {
    assert!(width > 0, "Field must be at least one bit wide");
    assert!(
        offset as u32 + width as u32 <= 32,
        "Field must fit in a 32 bit word"
    );
}

fn field_mask(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

// Tests
