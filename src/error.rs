use core::fmt;
use embedded_hal::{blocking::spi, digital::v2::OutputPin};

/// Error type throwable by radio operations
pub enum Error<SPI, CS>
where
    SPI: spi::Transfer<u8>,
    CS: OutputPin,
{
    /// Error during SPI Transfer
    Transfer(<SPI as spi::Transfer<u8>>::Error),
    /// Error driving the chip select line
    ChipSelect(<CS as OutputPin>::Error),
}

impl<SPI, CS> Error<SPI, CS>
where
    SPI: spi::Transfer<u8>,
    CS: OutputPin,
{
    /// Binary status code reported to the host, always 1 for a failed transfer
    pub fn code(&self) -> u8 {
        XferResult::Failed as u8
    }
}

impl<SPI, CS> fmt::Debug for Error<SPI, CS>
where
    SPI: spi::Transfer<u8>,
    SPI::Error: fmt::Debug,
    CS: OutputPin,
    <CS as OutputPin>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transfer(error) => write!(f, "Transfer({:?})", error),
            Error::ChipSelect(error) => write!(f, "ChipSelect({:?})", error),
        }
    }
}

/// Outcome of the most recent SPI frame
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum XferResult {
    Success = 0,
    Failed = 1,
}

impl<T, E> From<&Result<T, E>> for XferResult {
    fn from(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => XferResult::Success,
            Err(_) => XferResult::Failed,
        }
    }
}
