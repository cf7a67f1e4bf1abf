//! Name lookups over the in-memory tables

use super::constants::ROOT_DIR;
use super::name::EntryName;
use super::FlatFs;
use crate::debug;
use crate::filesys::FsError;

impl FlatFs<'_> {
    /// Slot of the directory called `name`, the root answering to `/`
    pub(super) fn find_directory(&self, name: &str) -> Option<usize> {
        let name = EntryName::new(name);
        self.directories.position(|dir| dir.name == name)
    }

    /// Directory slot for file operations: no name, an empty name or an
    /// unknown name all mean the root
    pub(super) fn resolve_directory(&self, directory: Option<&str>) -> usize {
        match directory {
            None => ROOT_DIR,
            Some(name) if name.is_empty() => ROOT_DIR,
            Some(name) => self.find_directory(name).unwrap_or_else(|| {
                debug!("unknown directory {}, using the root", name);
                ROOT_DIR
            }),
        }
    }

    /// Directory slot for listings, where an unknown name is an error
    pub(super) fn lookup_directory(&self, directory: Option<&str>) -> Result<usize, FsError> {
        match directory {
            None => Ok(ROOT_DIR),
            Some(name) if name.is_empty() => Ok(ROOT_DIR),
            Some(name) => self.find_directory(name).ok_or(FsError::NotFound),
        }
    }

    /// Slot of the file `name` inside directory slot `directory`
    pub(super) fn find_file(&self, name: &str, directory: usize) -> Option<usize> {
        let name = EntryName::new(name);
        self.files
            .position(|file| file.directory as usize == directory && file.name == name)
    }

    pub(super) fn resolve_file(&self, name: &str, directory: Option<&str>) -> Result<usize, FsError> {
        let directory = self.resolve_directory(directory);
        self.find_file(name, directory).ok_or(FsError::NotFound)
    }
}
