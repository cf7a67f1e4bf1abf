//! Directory table record

use super::constants::{DIR_ENTRY_SIZE, NAME_FIELD_LEN, ROOT_DIR_NAME};
use super::name::EntryName;
use super::table::Record;

const USED_OFFSET: usize = NAME_FIELD_LEN;

/// A named directory. Files point at directories by slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: EntryName,
}

impl DirectoryEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: EntryName::new(name),
        }
    }

    /// The entry kept in slot 0
    pub fn root() -> Self {
        Self::new(ROOT_DIR_NAME)
    }
}

impl Record for DirectoryEntry {
    const SIZE: usize = DIR_ENTRY_SIZE;

    fn encode(&self, raw: &mut [u8]) {
        raw[..NAME_FIELD_LEN].copy_from_slice(&self.name.to_field());
        raw[USED_OFFSET] = 1;
    }

    fn decode(raw: &[u8]) -> Option<Self> {
        if raw[USED_OFFSET] == 0 {
            return None;
        }
        Some(Self {
            name: EntryName::from_field(&raw[..NAME_FIELD_LEN]),
        })
    }
}
