//! Storage logging facility
//!
//! Routes the `log` crate to COM1 so mounts, table changes and driver
//! timeouts show up on the serial console. Nothing is printed until
//! [`init`] installs the logger.

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

/// Global logger instance
pub static LOGGER: Logger = Logger::new();

/// Serializes whole lines onto the serial port
pub struct Logger {
    inner: Mutex<()>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub const fn new() -> Logger {
        Logger {
            inner: Mutex::new(()),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    /// Formats messages as "[LEVEL] target: message"
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _guard = self.inner.lock();
            crate::serial_println!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Level used for a build: everything down to debug in debug builds,
/// info and above in release
pub const fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the serial logger.
///
/// # Arguments
/// * `cpu_id` - CPU core identifier. Only core 0 installs the logger; a
///   second installation attempt is ignored
pub fn init(cpu_id: u32) {
    if cpu_id == 0 && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_level());
    }
}

/// Convenience macro for trace-level logging
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => (log::trace!($($arg)*));
}

/// Convenience macro for debug-level logging
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => (log::debug!($($arg)*));
}

/// Convenience macro for info-level logging
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => (log::info!($($arg)*));
}

/// Convenience macro for warning-level logging
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => (log::warn!($($arg)*));
}

/// Convenience macro for error-level logging
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => (log::error!($($arg)*));
}
