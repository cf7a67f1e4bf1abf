use alloc::boxed::Box;
use core::result::Result;
use spin::Mutex;

use crate::{devices::ata::AtaPio, info, logging};

pub mod block;
pub mod flat;

pub use flat::{FileInfo, FlatFs, Listing};

// Define error types for the filesystem operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// Name or directory does not resolve
    NotFound,
    /// No free slot left in the table
    CapacityExhausted,
    InvalidName,
    AlreadyInitialized,
    NotInitialized,
    IOError,
}

impl core::fmt::Display for FsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FsError::NotFound => write!(f, "Entry not found"),
            FsError::CapacityExhausted => write!(f, "No free table slot"),
            FsError::InvalidName => write!(f, "Invalid entry name"),
            FsError::AlreadyInitialized => write!(f, "Storage already mounted"),
            FsError::NotInitialized => write!(f, "Storage not mounted"),
            FsError::IOError => write!(f, "Block device I/O failed"),
        }
    }
}

/// Represents a block device that can be read from and written to
pub trait BlockDevice: Send + Sync {
    fn read_block(&self, block_num: u64, buf: &mut [u8]) -> Result<(), FsError>;
    fn write_block(&mut self, block_num: u64, buf: &[u8]) -> Result<(), FsError>;
    fn block_size(&self) -> usize;
    fn total_blocks(&self) -> u64;

    /// Reads consecutive blocks starting at `start` until `buf` is full.
    /// `buf` must hold a whole number of blocks.
    fn read_sectors(&self, start: u64, buf: &mut [u8]) -> Result<(), FsError> {
        let block_size = self.block_size();
        if buf.len() % block_size != 0 {
            return Err(FsError::IOError);
        }
        for (i, chunk) in buf.chunks_exact_mut(block_size).enumerate() {
            self.read_block(start + i as u64, chunk)?;
        }
        Ok(())
    }

    /// Writes `buf` to consecutive blocks starting at `start`.
    /// `buf` must hold a whole number of blocks.
    fn write_sectors(&mut self, start: u64, buf: &[u8]) -> Result<(), FsError> {
        let block_size = self.block_size();
        if buf.len() % block_size != 0 {
            return Err(FsError::IOError);
        }
        for (i, chunk) in buf.chunks_exact(block_size).enumerate() {
            self.write_block(start + i as u64, chunk)?;
        }
        Ok(())
    }
}

/// The mounted storage instance shared by the shell, apps and installer.
///
/// Holding the lock covers an operation from table mutation through the
/// persist that follows it, so the disk never sees a half-applied change
/// and only one caller talks to the device at a time.
pub static STORAGE: Mutex<Option<FlatFs<'static>>> = Mutex::new(None);

/// Mounts the tables found on `device` as the global storage instance
pub fn mount(device: Box<dyn BlockDevice>) -> Result<(), FsError> {
    let mut storage = STORAGE.lock();
    if storage.is_some() {
        return Err(FsError::AlreadyInitialized);
    }
    *storage = Some(FlatFs::new(device)?);
    Ok(())
}

/// Runs `op` against the mounted storage while holding its lock
pub fn with_storage<R>(
    op: impl FnOnce(&mut FlatFs<'static>) -> Result<R, FsError>,
) -> Result<R, FsError> {
    let mut storage = STORAGE.lock();
    let fs = storage.as_mut().ok_or(FsError::NotInitialized)?;
    op(fs)
}

/// Brings up logging and mounts the primary ATA disk.
///
/// # Arguments
/// * `cpu_id` - CPU core identifier. Only core 0 touches the disk
pub fn init(cpu_id: u32) -> Result<(), FsError> {
    if cpu_id != 0 {
        return Ok(());
    }
    logging::init(cpu_id);

    // SAFETY: core 0 runs this once during boot and nothing else drives
    // the primary channel.
    let disk = unsafe { AtaPio::primary() };
    mount(Box::new(disk))?;
    info!("storage mounted from primary ATA disk");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesys::block::{MemoryBlockDevice, SECTOR_SIZE};

    // The only test that touches the global instance.
    #[test]
    fn global_mount_serializes_access() {
        assert_eq!(
            with_storage(|fs| fs.create_file("boot.log", None)),
            Err(FsError::NotInitialized)
        );

        mount(Box::new(MemoryBlockDevice::new(256, SECTOR_SIZE))).unwrap();
        assert_eq!(
            mount(Box::new(MemoryBlockDevice::new(256, SECTOR_SIZE))),
            Err(FsError::AlreadyInitialized)
        );

        with_storage(|fs| {
            fs.create_file("boot.log", None)?;
            fs.write_file("boot.log", None, b"ok")
        })
        .unwrap();

        let mut out = [0u8; 8];
        let n = with_storage(|fs| fs.read_file("boot.log", None, &mut out)).unwrap();
        assert_eq!(&out[..n], b"ok");
    }
}
