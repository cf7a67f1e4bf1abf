//! File table record

use super::constants::{
    DATA_REGION_LBA, FILE_ENTRY_SIZE, MAX_FILE_SIZE, NAME_FIELD_LEN, SECTORS_PER_FILE,
};
use super::name::EntryName;
use super::table::Record;

const SIZE_OFFSET: usize = NAME_FIELD_LEN;
const BLOCK_OFFSET: usize = SIZE_OFFSET + 4;
const USED_OFFSET: usize = BLOCK_OFFSET + 4;
const DIR_OFFSET: usize = USED_OFFSET + 1;

/// A file: its name, owning directory and where its data lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    pub name: EntryName,
    /// Bytes of valid data, never above `MAX_FILE_SIZE`
    pub size: u32,
    /// First sector of the slot's data area
    pub start_block: u32,
    /// Slot index in the directory table
    pub directory: u8,
}

impl FileEntry {
    /// A fresh, empty file occupying file slot `slot`
    pub fn new(name: &str, directory: usize, slot: usize) -> Self {
        Self {
            name: EntryName::new(name),
            size: 0,
            start_block: Self::start_block_for(slot),
            directory: directory as u8,
        }
    }

    /// Data location bound to a file slot
    pub const fn start_block_for(slot: usize) -> u32 {
        (DATA_REGION_LBA + (slot * SECTORS_PER_FILE) as u64) as u32
    }

    pub fn len(&self) -> usize {
        (self.size as usize).min(MAX_FILE_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Record for FileEntry {
    const SIZE: usize = FILE_ENTRY_SIZE;

    fn encode(&self, raw: &mut [u8]) {
        raw[..NAME_FIELD_LEN].copy_from_slice(&self.name.to_field());
        raw[SIZE_OFFSET..BLOCK_OFFSET].copy_from_slice(&self.size.to_le_bytes());
        raw[BLOCK_OFFSET..USED_OFFSET].copy_from_slice(&self.start_block.to_le_bytes());
        raw[USED_OFFSET] = 1;
        raw[DIR_OFFSET] = self.directory;
    }

    fn decode(raw: &[u8]) -> Option<Self> {
        if raw[USED_OFFSET] == 0 {
            return None;
        }
        let word = |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        Some(Self {
            name: EntryName::from_field(&raw[..NAME_FIELD_LEN]),
            size: word(SIZE_OFFSET),
            start_block: word(BLOCK_OFFSET),
            directory: raw[DIR_OFFSET],
        })
    }
}
