//! ATA PIO disk driver.
//!
//! Moves one 512-byte sector per command over the primary channel using
//! 28-bit LBA addressing. Every transfer busy-waits on the status register;
//! there are no interrupts and no DMA. The error and fault status bits are
//! not inspected, so a drive that accepts a command and then fails it goes
//! unnoticed. A drive that never leaves BSY is abandoned after
//! `MAX_POLL_ITERATIONS` polls.

use bitflags::bitflags;
use x86_64::instructions::port::Port;

use crate::{
    constants::{ata::*, ports::{ATA_PRIMARY_CTRL, ATA_PRIMARY_IO}},
    filesys::{BlockDevice, FsError},
    trace, warn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtaError {
    /// Status never showed BSY clear with DRQ set
    Timeout,
    /// Address does not fit in 28 bits
    OutOfRange,
    /// Transfer buffer is not exactly one sector
    BufferSize,
}

impl core::fmt::Display for AtaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AtaError::Timeout => write!(f, "Drive did not become ready"),
            AtaError::OutOfRange => write!(f, "LBA beyond 28-bit range"),
            AtaError::BufferSize => write!(f, "Buffer is not one sector"),
        }
    }
}

impl From<AtaError> for FsError {
    fn from(_: AtaError) -> Self {
        FsError::IOError
    }
}

bitflags! {
    /// Status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const BUSY = 1 << 7;
        const READY = 1 << 6;
        const DEVICE_FAULT = 1 << 5;
        const SEEK_COMPLETE = 1 << 4;
        const DATA_REQUEST = 1 << 3;
        const CORRECTED = 1 << 2;
        const INDEX = 1 << 1;
        const ERROR = 1;
    }
}

bitflags! {
    /// Device control register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u8 {
        /// Mask the drive's interrupt line
        const INTERRUPT_DISABLE = 1 << 1;
        const SOFT_RESET = 1 << 2;
    }
}

/// Access to one channel's task-file registers, addressed by offset from
/// the command block base
pub trait AtaRegisters: Send + Sync {
    fn read_u8(&self, offset: u16) -> u8;
    fn write_u8(&self, offset: u16, value: u8);
    fn read_u16(&self, offset: u16) -> u16;
    fn write_u16(&self, offset: u16, value: u16);
    fn write_control(&self, value: u8);
}

/// Registers reached through x86 I/O ports
pub struct PortIo {
    base: u16,
    control: u16,
}

impl PortIo {
    /// # Safety
    /// `base` and `control` must be the ports of an ATA channel that nothing
    /// else drives while this value exists.
    pub const unsafe fn new(base: u16, control: u16) -> Self {
        Self { base, control }
    }
}

impl AtaRegisters for PortIo {
    fn read_u8(&self, offset: u16) -> u8 {
        let mut port: Port<u8> = Port::new(self.base + offset);
        unsafe { port.read() }
    }

    fn write_u8(&self, offset: u16, value: u8) {
        let mut port: Port<u8> = Port::new(self.base + offset);
        unsafe { port.write(value) }
    }

    fn read_u16(&self, offset: u16) -> u16 {
        let mut port: Port<u16> = Port::new(self.base + offset);
        unsafe { port.read() }
    }

    fn write_u16(&self, offset: u16, value: u16) {
        let mut port: Port<u16> = Port::new(self.base + offset);
        unsafe { port.write(value) }
    }

    fn write_control(&self, value: u8) {
        let mut port: Port<u8> = Port::new(self.control);
        unsafe { port.write(value) }
    }
}

/// Polling PIO driver for the master drive of one channel
pub struct AtaPio<R: AtaRegisters = PortIo> {
    regs: R,
}

impl AtaPio<PortIo> {
    /// Driver for the master drive on the primary channel
    ///
    /// # Safety
    /// Must be created at most once, and nothing else may use ports
    /// `0x1F0..=0x1F7` or `0x3F6` afterwards.
    pub unsafe fn primary() -> Self {
        Self::new(PortIo::new(ATA_PRIMARY_IO, ATA_PRIMARY_CTRL))
    }
}

impl<R: AtaRegisters> AtaPio<R> {
    pub fn new(regs: R) -> Self {
        regs.write_control(Control::INTERRUPT_DISABLE.bits());
        Self { regs }
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    fn status(&self) -> Status {
        Status::from_bits_retain(self.regs.read_u8(REG_STATUS))
    }

    /// Spins until the drive is idle and wants data moved
    fn wait_ready(&self) -> Result<(), AtaError> {
        for _ in 0..MAX_POLL_ITERATIONS {
            let status = self.status();
            if !status.contains(Status::BUSY) && status.contains(Status::DATA_REQUEST) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(AtaError::Timeout)
    }

    /// Programs a one-sector transfer at `lba` and waits for the data phase
    fn issue(&self, lba: u64, command: u8) -> Result<(), AtaError> {
        if lba > MAX_LBA28 {
            return Err(AtaError::OutOfRange);
        }
        let lba = lba as u32;
        trace!("ata: command {:#x} lba {}", command, lba);
        self.regs.write_u8(REG_SECTOR_COUNT, 1);
        self.regs.write_u8(REG_LBA_LOW, lba as u8);
        self.regs.write_u8(REG_LBA_MID, (lba >> 8) as u8);
        self.regs.write_u8(REG_LBA_HIGH, (lba >> 16) as u8);
        self.regs
            .write_u8(REG_DRIVE_HEAD, DRIVE_MASTER_LBA | ((lba >> 24) as u8 & 0x0F));
        self.regs.write_u8(REG_COMMAND, command);

        self.wait_ready().inspect_err(|_| {
            warn!("ata: lba {} timed out after command {:#x}", lba, command);
        })
    }

    /// Reads one sector at `lba` into `buf`
    pub fn read_sector(&self, lba: u64, buf: &mut [u8]) -> Result<(), AtaError> {
        if buf.len() != ATA_SECTOR_SIZE {
            return Err(AtaError::BufferSize);
        }
        self.issue(lba, CMD_READ_SECTORS)?;
        for word in buf.chunks_exact_mut(2) {
            word.copy_from_slice(&self.regs.read_u16(REG_DATA).to_le_bytes());
        }
        Ok(())
    }

    /// Writes one sector from `buf` to `lba`
    pub fn write_sector(&self, lba: u64, buf: &[u8]) -> Result<(), AtaError> {
        if buf.len() != ATA_SECTOR_SIZE {
            return Err(AtaError::BufferSize);
        }
        self.issue(lba, CMD_WRITE_SECTORS)?;
        for word in buf.chunks_exact(2) {
            self.regs
                .write_u16(REG_DATA, u16::from_le_bytes([word[0], word[1]]));
        }
        Ok(())
    }
}

impl<R: AtaRegisters> BlockDevice for AtaPio<R> {
    fn read_block(&self, block_num: u64, buf: &mut [u8]) -> Result<(), FsError> {
        Ok(self.read_sector(block_num, buf)?)
    }

    fn write_block(&mut self, block_num: u64, buf: &[u8]) -> Result<(), FsError> {
        Ok(self.write_sector(block_num, buf)?)
    }

    fn block_size(&self) -> usize {
        ATA_SECTOR_SIZE
    }

    /// Every address reachable with 28-bit LBA; the drive is not asked
    /// for its real capacity
    fn total_blocks(&self) -> u64 {
        MAX_LBA28 + 1
    }
}
