//! Device drivers.
//!
//! - `ata`: polling PIO driver for the boot disk, backing the flat tables
//! - `serial`: COM1 output used by the kernel log

pub mod ata;
pub mod serial;
