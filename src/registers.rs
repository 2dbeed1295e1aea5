//! ADF7030-1 memory map used by the driver

/// Hardware GPIO pin configuration bytes (GPCON0..GPCON7), live settings
pub(crate) const GPIO_BASE: u32 = 0x4000_1200;
/// GPIO output set register, 1 bits drive the matching pin high
pub(crate) const GPIO_SET_REG: u32 = 0x4000_1214;
/// GPIO output clear register, 1 bits drive the matching pin low
pub(crate) const GPIO_CLR_REG: u32 = 0x4000_1218;
/// Profile copy of the GPCON bytes, applied by the CFG_DEV command
pub(crate) const PROFILE_GPCON_BASE: u32 = 0x2000_0514;
/// Host interrupt controller: mask and status for IRQ0 / IRQ1
pub(crate) const IRQ_CTRL_BASE: u32 = 0x4000_3800;

#[derive(Debug, PartialEq, Copy, Clone)]
pub(crate) enum RegisterAddr {
    // Pin output set
    GpioSet,
    // Pin output clear
    GpioClr,
    // Sources routed to IRQ0
    Irq0Mask,
    // Sources routed to IRQ1
    Irq1Mask,
    // Pending sources on IRQ0, write one to clear
    Irq0Status,
    // Pending sources on IRQ1, write one to clear
    Irq1Status,
}

impl RegisterAddr {
    pub(crate) fn addr(&self) -> u32 {
        match self {
            RegisterAddr::GpioSet => GPIO_SET_REG,
            RegisterAddr::GpioClr => GPIO_CLR_REG,
            RegisterAddr::Irq0Mask => IRQ_CTRL_BASE,
            RegisterAddr::Irq1Mask => IRQ_CTRL_BASE + 0x04,
            RegisterAddr::Irq0Status => IRQ_CTRL_BASE + 0x08,
            RegisterAddr::Irq1Status => IRQ_CTRL_BASE + 0x0C,
        }
    }

    pub(crate) fn write_only(&self) -> bool {
        matches!(self, RegisterAddr::GpioSet | RegisterAddr::GpioClr)
    }
}

/// Splits a byte address into its enclosing word address and the bit offset of the byte
pub(crate) fn byte_location(addr: u32) -> (u32, u8) {
    ((addr >> 2) << 2, ((addr & 0x3) << 3) as u8)
}

// Utilities

fn shift_flag_back(payload: u32, bit: u8) -> bool {
    (payload >> bit) & 1 == 1
}

fn shift_num_back(payload: u32, start: u8, size: u8) -> u32 {
    (payload >> start) & (2u32.pow(size as u32) - 1)
}

/// Status byte returned as the first byte of every SPI frame
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyStatus {
    /// SPI interface ready to accept a frame
    pub spi_ready: bool,
    /// At least one host interrupt line is asserted
    pub irq_status: bool,
    /// Last memory access completed without error
    pub mem_access_ok: bool,
    /// Firmware state of the radio controller
    pub fw_status: u8,
    /// Radio controller ready for a new command
    pub cmd_ready: bool,
}

impl From<u8> for PhyStatus {
    fn from(byte: u8) -> Self {
        let payload = byte as u32;
        PhyStatus {
            spi_ready: shift_flag_back(payload, 7),
            irq_status: shift_flag_back(payload, 6),
            mem_access_ok: shift_flag_back(payload, 5),
            fw_status: shift_num_back(payload, 2, 3) as u8,
            cmd_ready: shift_flag_back(payload, 1),
        }
    }
}

// Tests
