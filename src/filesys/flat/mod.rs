//! Flat table filesystem
//!
//! Two fixed tables live at fixed sectors: up to four directories (the
//! root always in slot 0) and up to sixteen files. Each file slot owns a
//! fixed run of sectors in the data region, so a file's location is a pure
//! function of its slot. Both tables are kept in memory and rewritten in
//! full after every change.

use super::{BlockDevice, FsError};
use crate::{debug, error, info, warn};
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

pub mod constants;
mod data;
mod dir_entry;
mod file_entry;
mod name;
mod resolve;
mod table;

use constants::*;
pub use dir_entry::DirectoryEntry;
pub use file_entry::FileEntry;
pub use name::EntryName;
pub use table::{Record, Slot, Table};

pub type DirectoryTable = Table<DirectoryEntry, MAX_DIRS>;
pub type FileTable = Table<FileEntry, MAX_FILES>;

/// Flat table filesystem driver
pub struct FlatFs<'a> {
    /// Underlying block device
    device: Box<dyn BlockDevice + 'a>,
    /// In-memory copy of the directory table
    directories: DirectoryTable,
    /// In-memory copy of the file table
    files: FileTable,
}

/// Outcome of copying a name listing into a caller buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    /// Bytes written, every name followed by `\n`
    pub len: usize,
    /// A name did not fit; it and every name after it were left out
    pub truncated: bool,
}

impl Listing {
    fn write<'n>(names: impl Iterator<Item = &'n str>, out: &mut [u8]) -> Self {
        let mut len = 0;
        for name in names {
            let end = len + name.len() + 1;
            if end > out.len() {
                return Listing {
                    len,
                    truncated: true,
                };
            }
            out[len..end - 1].copy_from_slice(name.as_bytes());
            out[end - 1] = b'\n';
            len = end;
        }
        Listing {
            len,
            truncated: false,
        }
    }
}

/// Public view of a file entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: usize,
    pub start_block: u64,
    /// Slot of the owning directory, 0 for the root
    pub directory: usize,
}

impl From<&FileEntry> for FileInfo {
    fn from(entry: &FileEntry) -> Self {
        FileInfo {
            name: entry.name.to_string(),
            size: entry.len(),
            start_block: entry.start_block as u64,
            directory: entry.directory as usize,
        }
    }
}

impl<'a> FlatFs<'a> {
    /// Writes empty tables holding only the root directory and mounts them.
    /// File data sectors are left as they are.
    pub fn format(device: Box<dyn BlockDevice + 'a>) -> Result<Self, FsError> {
        check_geometry(&*device)?;
        let mut fs = FlatFs {
            device,
            directories: Table::new(),
            files: Table::new(),
        };
        fs.directories.occupy(ROOT_DIR, DirectoryEntry::root());
        fs.persist()?;
        info!("formatted flat tables");
        Ok(fs)
    }

    /// Loads both tables from `device`
    pub fn new(device: Box<dyn BlockDevice + 'a>) -> Result<Self, FsError> {
        check_geometry(&*device)?;

        let mut dir_buf = vec![0u8; DIR_TABLE_SECTORS * SECTOR_SIZE];
        device.read_sectors(DIR_TABLE_LBA, &mut dir_buf)?;
        let mut file_buf = vec![0u8; FILE_TABLE_SECTORS * SECTOR_SIZE];
        device.read_sectors(FILE_TABLE_LBA, &mut file_buf)?;

        let mut fs = FlatFs {
            device,
            directories: Table::decode_from(&dir_buf),
            files: Table::decode_from(&file_buf),
        };
        fs.repair();
        info!(
            "loaded flat tables: {} directories, {} files",
            fs.directories.len() - 1,
            fs.files.len()
        );
        Ok(fs)
    }

    /// Brings freshly loaded tables back in line with the layout rules.
    ///
    /// Records that cannot be reached by name (empty, or a duplicate of a
    /// lower slot that lookups already resolve to) are dropped, which frees
    /// their slots. A file whose directory is gone moves to the root unless
    /// the root already holds that name, in which case it is dropped.
    fn repair(&mut self) {
        if let Some(entry) = self.directories.get(ROOT_DIR) {
            if *entry != DirectoryEntry::root() {
                warn!("directory slot 0 held {}, treating it as the root", entry.name);
            }
        }

        let mut directories = DirectoryTable::new();
        directories.occupy(ROOT_DIR, DirectoryEntry::root());
        for (slot, dir) in self.directories.iter().filter(|(slot, _)| *slot != ROOT_DIR) {
            if dir.name.is_empty() || directories.position(|kept| kept.name == dir.name).is_some() {
                warn!("dropping directory slot {}, name {:?} is unusable", slot, dir.name);
                continue;
            }
            directories.occupy(slot, *dir);
        }

        let mut files = FileTable::new();
        for (slot, file) in self.files.iter() {
            let mut file = *file;
            let start_block = FileEntry::start_block_for(slot);
            if file.start_block != start_block {
                warn!(
                    "file {} recorded start block {}, slot {} owns {}",
                    file.name, file.start_block, slot, start_block
                );
                file.start_block = start_block;
            }
            if file.size as usize > MAX_FILE_SIZE {
                warn!("file {} recorded {} bytes, clamping", file.name, file.size);
                file.size = MAX_FILE_SIZE as u32;
            }
            if directories.get(file.directory as usize).is_none() {
                let taken = self.files.iter().any(|(other, entry)| {
                    other != slot && entry.directory as usize == ROOT_DIR && entry.name == file.name
                });
                if taken {
                    warn!(
                        "file {} belongs to missing directory {} and the root holds its name, dropping it",
                        file.name, file.directory
                    );
                    continue;
                }
                warn!(
                    "file {} belongs to missing directory {}, moving it to the root",
                    file.name, file.directory
                );
                file.directory = ROOT_DIR as u8;
            }
            let duplicate = files
                .position(|kept| kept.directory == file.directory && kept.name == file.name)
                .is_some();
            if file.name.is_empty() || duplicate {
                warn!(
                    "dropping file slot {}, name {:?} is unusable in directory {}",
                    slot, file.name, file.directory
                );
                continue;
            }
            files.occupy(slot, file);
        }

        self.directories = directories;
        self.files = files;
    }

    /// Rewrites both tables to their fixed sectors
    pub fn persist(&mut self) -> Result<(), FsError> {
        let mut dir_buf = vec![0u8; DIR_TABLE_SECTORS * SECTOR_SIZE];
        self.directories.encode_into(&mut dir_buf);
        self.device.write_sectors(DIR_TABLE_LBA, &dir_buf)?;

        let mut file_buf = vec![0u8; FILE_TABLE_SECTORS * SECTOR_SIZE];
        self.files.encode_into(&mut file_buf);
        self.device.write_sectors(FILE_TABLE_LBA, &file_buf)?;
        Ok(())
    }

    /// Runs `op` and persists the tables. If either step fails the
    /// in-memory tables go back to what they were before `op`.
    fn apply<R>(&mut self, op: impl FnOnce(&mut Self) -> Result<R, FsError>) -> Result<R, FsError> {
        let directories = self.directories.clone();
        let files = self.files.clone();
        let result = op(self).and_then(|value| self.persist().map(|()| value));
        if let Err(err) = &result {
            error!("storage update failed: {}, tables rolled back", err);
            self.directories = directories;
            self.files = files;
        }
        result
    }

    /// Creates a directory unless one with this name already exists
    pub fn create_directory(&mut self, name: &str) -> Result<(), FsError> {
        let name = entry_name(name)?;
        if self.find_directory(name.as_str()).is_some() {
            return Ok(());
        }

        let slot = self
            .directories
            .first_empty(ROOT_DIR + 1)
            .ok_or(FsError::CapacityExhausted)?;
        self.apply(|fs| {
            fs.directories.occupy(slot, DirectoryEntry { name });
            Ok(())
        })?;
        info!("created directory {} in slot {}", name, slot);
        Ok(())
    }

    /// Creates an empty file unless it already exists in that directory.
    /// A missing or unknown directory means the root.
    pub fn create_file(&mut self, name: &str, directory: Option<&str>) -> Result<(), FsError> {
        let name = entry_name(name)?;
        let directory = self.resolve_directory(directory);
        if self.find_file(name.as_str(), directory).is_some() {
            return Ok(());
        }

        let slot = self.files.first_empty(0).ok_or(FsError::CapacityExhausted)?;
        self.apply(|fs| {
            fs.files.occupy(slot, FileEntry::new(name.as_str(), directory, slot));
            Ok(())
        })?;
        info!(
            "created file {} in directory {} (slot {}, block {})",
            name,
            directory,
            slot,
            FileEntry::start_block_for(slot)
        );
        Ok(())
    }

    /// Copies the names of the files in `directory` into `out`, one per line.
    /// `None` or an empty name lists the root; an unknown name is `NotFound`.
    pub fn list(&self, directory: Option<&str>, out: &mut [u8]) -> Result<Listing, FsError> {
        let directory = self.lookup_directory(directory)?;
        let names = self
            .files
            .iter()
            .filter(|(_, file)| file.directory as usize == directory)
            .map(|(_, file)| file.name.as_str());
        Ok(Listing::write(names, out))
    }

    /// Copies the names of all files, in every directory, into `out`
    pub fn list_all(&self, out: &mut [u8]) -> Listing {
        Listing::write(self.files.iter().map(|(_, file)| file.name.as_str()), out)
    }

    /// Describes every file in `directory`, in slot order
    pub fn read_dir(&self, directory: Option<&str>) -> Result<Vec<FileInfo>, FsError> {
        let directory = self.lookup_directory(directory)?;
        Ok(self
            .files
            .iter()
            .filter(|(_, file)| file.directory as usize == directory)
            .map(|(_, file)| FileInfo::from(file))
            .collect())
    }

    /// Describes one file, resolving `directory` like `create_file` does
    pub fn metadata(&self, name: &str, directory: Option<&str>) -> Result<FileInfo, FsError> {
        let slot = self.resolve_file(name, directory)?;
        self.files
            .get(slot)
            .map(FileInfo::from)
            .ok_or(FsError::NotFound)
    }

    /// Names of the user-created directories, in slot order
    pub fn directories(&self) -> Vec<String> {
        self.directories
            .iter()
            .filter(|(slot, _)| *slot != ROOT_DIR)
            .map(|(_, dir)| dir.name.to_string())
            .collect()
    }

    pub fn directory_table(&self) -> &DirectoryTable {
        &self.directories
    }

    pub fn file_table(&self) -> &FileTable {
        &self.files
    }

    pub fn device(&self) -> &dyn BlockDevice {
        &*self.device
    }

    /// Unmounts, handing the device back
    pub fn into_device(self) -> Box<dyn BlockDevice + 'a> {
        self.device
    }
}

/// Rejects devices that cannot hold the fixed layout
fn check_geometry(device: &dyn BlockDevice) -> Result<(), FsError> {
    if device.block_size() != SECTOR_SIZE || device.total_blocks() < REQUIRED_BLOCKS {
        warn!(
            "device has {} blocks of {} bytes, layout needs {} of {}",
            device.total_blocks(),
            device.block_size(),
            REQUIRED_BLOCKS,
            SECTOR_SIZE
        );
        return Err(FsError::IOError);
    }
    Ok(())
}

/// Names must be non-empty, and may not hold the on-disk terminator or the
/// listing separator
fn entry_name(name: &str) -> Result<EntryName, FsError> {
    if name.contains(['\0', '\n']) {
        debug!("rejecting entry name {:?}", name);
        return Err(FsError::InvalidName);
    }
    let name = EntryName::new(name);
    if name.is_empty() {
        debug!("rejecting empty entry name");
        return Err(FsError::InvalidName);
    }
    Ok(name)
}
