//! Sector buffers and block device backends

use core::ops::{Deref, DerefMut};

pub mod memory;

pub use memory::MemoryBlockDevice;

/// Size of a disk sector in bytes
pub const SECTOR_SIZE: usize = 512;

/// One sector worth of bytes, the unit every transfer moves
#[derive(Clone)]
pub struct Sector([u8; SECTOR_SIZE]);

impl Sector {
    /// Returns a sector filled with zeroes
    pub const fn zeroed() -> Self {
        Self([0; SECTOR_SIZE])
    }

    /// Builds a sector from up to `SECTOR_SIZE` bytes, zero-filling the rest
    pub fn from_partial(data: &[u8]) -> Self {
        let mut sector = Self::zeroed();
        let len = data.len().min(SECTOR_SIZE);
        sector.0[..len].copy_from_slice(&data[..len]);
        sector
    }
}

impl Default for Sector {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Deref for Sector {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl DerefMut for Sector {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

/// Number of whole sectors needed to hold `bytes`
pub const fn sectors_for(bytes: usize) -> usize {
    bytes.div_ceil(SECTOR_SIZE)
}
