//! PulseFS: the flat-table storage subsystem of the kernel.
//!
//! A directory table and a file table live at fixed sectors of the boot
//! disk and are mirrored in memory; every file owns a fixed run of sectors.
//! [`filesys::FlatFs`] is the store, [`devices::ata::AtaPio`] the disk
//! driver, and [`filesys::with_storage`] the entry point for the shell,
//! apps and installer once [`filesys::init`] has mounted the disk.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
extern crate alloc;

pub mod constants;
pub mod devices;
pub mod filesys;
pub mod logging;

pub use devices::serial;

pub mod prelude {
    pub use crate::filesys::{with_storage, FileInfo, FlatFs, FsError, Listing};
    pub use crate::serial_print;
    pub use crate::serial_println;
}
