//! I/O port definitions.

/// Base I/O port address for the first serial port (COM1).
pub const SERIAL_PORT: u16 = 0x3F8;

/// Command block base of the primary ATA channel.
pub const ATA_PRIMARY_IO: u16 = 0x1F0;

/// Device control / alternate status register of the primary ATA channel.
pub const ATA_PRIMARY_CTRL: u16 = 0x3F6;
