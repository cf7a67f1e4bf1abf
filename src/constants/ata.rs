//! ATA PIO register offsets and command codes.

/// Data register (16-bit), relative to the command block base.
pub const REG_DATA: u16 = 0;
/// Sector count register.
pub const REG_SECTOR_COUNT: u16 = 2;
/// LBA bits 0..8.
pub const REG_LBA_LOW: u16 = 3;
/// LBA bits 8..16.
pub const REG_LBA_MID: u16 = 4;
/// LBA bits 16..24.
pub const REG_LBA_HIGH: u16 = 5;
/// Drive select and LBA bits 24..28.
pub const REG_DRIVE_HEAD: u16 = 6;
/// Command register on write, status register on read.
pub const REG_COMMAND: u16 = 7;
pub const REG_STATUS: u16 = 7;

/// Master drive, LBA addressing.
pub const DRIVE_MASTER_LBA: u8 = 0xE0;

pub const CMD_READ_SECTORS: u8 = 0x20;
pub const CMD_WRITE_SECTORS: u8 = 0x30;

/// Largest address expressible in 28-bit LBA mode.
pub const MAX_LBA28: u64 = (1 << 28) - 1;

/// Bytes per ATA sector.
pub const ATA_SECTOR_SIZE: usize = 512;

/// Status polls before a transfer is abandoned.
pub const MAX_POLL_ITERATIONS: usize = 5_000_000;
