//! On-disk layout of the flat tables

pub use crate::filesys::block::SECTOR_SIZE;

/// Directory table slots, including the root in slot 0
pub const MAX_DIRS: usize = 4;

/// File table slots
pub const MAX_FILES: usize = 16;

/// Bytes reserved for a name on disk, NUL terminator included
pub const NAME_FIELD_LEN: usize = 16;

/// Longest name that fits in a name field
pub const NAME_CAPACITY: usize = NAME_FIELD_LEN - 1;

/// Largest file in bytes; longer writes are clamped
pub const MAX_FILE_SIZE: usize = 4096;

/// LBA of the directory table
pub const DIR_TABLE_LBA: u64 = 1;
pub const DIR_TABLE_SECTORS: usize = 1;

/// LBA of the file table
pub const FILE_TABLE_LBA: u64 = 2;
pub const FILE_TABLE_SECTORS: usize = 2;

/// First LBA of the file data region
pub const DATA_REGION_LBA: u64 = 10;

/// Sectors statically reserved for every file slot
pub const SECTORS_PER_FILE: usize = MAX_FILE_SIZE / SECTOR_SIZE;

/// Blocks a device must expose to hold the whole layout
pub const REQUIRED_BLOCKS: u64 = DATA_REGION_LBA + (MAX_FILES * SECTORS_PER_FILE) as u64;

/// Stride of a directory record: name, used flag, 7 reserved bytes
pub const DIR_ENTRY_SIZE: usize = 24;

/// Stride of a file record: name, size, start block, used flag,
/// directory index, 2 reserved bytes
pub const FILE_ENTRY_SIZE: usize = 28;

/// Slot of the implicit root directory
pub const ROOT_DIR: usize = 0;

/// Name the root directory is stored and looked up under
pub const ROOT_DIR_NAME: &str = "/";

const _: () = assert!(MAX_DIRS * DIR_ENTRY_SIZE <= DIR_TABLE_SECTORS * SECTOR_SIZE);
const _: () = assert!(MAX_FILES * FILE_ENTRY_SIZE <= FILE_TABLE_SECTORS * SECTOR_SIZE);
const _: () = assert!(FILE_TABLE_LBA + FILE_TABLE_SECTORS as u64 <= DATA_REGION_LBA);
const _: () = assert!(MAX_FILE_SIZE % SECTOR_SIZE == 0);
