//! In-memory block device implementation

use crate::filesys::{BlockDevice, FsError};
use alloc::vec;
use alloc::vec::Vec;
use core::result::Result;

/// Block device that stores data in memory
///
/// Stands in for the ATA disk wherever the tables and file data need a
/// backing store without hardware, and keeps a count of block writes so
/// callers can observe how often the tables are rewritten.
pub struct MemoryBlockDevice {
    /// Blocks of data, each block_size bytes
    blocks: Vec<Vec<u8>>,

    /// Size of each block in bytes
    block_size: usize,

    /// Number of successful `write_block` calls
    writes: u64,
}

impl MemoryBlockDevice {
    /// Creates a new zeroed memory block device with given size
    pub fn new(total_blocks: u64, block_size: usize) -> Self {
        let blocks = (0..total_blocks).map(|_| vec![0; block_size]).collect();
        Self {
            blocks,
            block_size,
            writes: 0,
        }
    }

    /// Returns the raw contents of a block, if it exists
    pub fn block(&self, block_num: u64) -> Option<&[u8]> {
        self.blocks.get(block_num as usize).map(Vec::as_slice)
    }

    /// Returns how many blocks have been written since creation
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Validates block number is within bounds
    fn validate_block(&self, block_num: u64) -> Result<(), FsError> {
        if block_num as usize >= self.blocks.len() {
            return Err(FsError::IOError);
        }
        Ok(())
    }

    /// Validates buffer is correct block size
    fn validate_buffer(&self, buf: &[u8]) -> Result<(), FsError> {
        if buf.len() != self.block_size {
            return Err(FsError::IOError);
        }
        Ok(())
    }
}

impl BlockDevice for MemoryBlockDevice {
    fn read_block(&self, block_num: u64, buf: &mut [u8]) -> Result<(), FsError> {
        self.validate_block(block_num)?;
        self.validate_buffer(buf)?;
        buf.copy_from_slice(&self.blocks[block_num as usize]);
        Ok(())
    }

    fn write_block(&mut self, block_num: u64, buf: &[u8]) -> Result<(), FsError> {
        self.validate_block(block_num)?;
        self.validate_buffer(buf)?;
        self.blocks[block_num as usize].copy_from_slice(buf);
        self.writes += 1;
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn total_blocks(&self) -> u64 {
        self.blocks.len() as u64
    }
}
