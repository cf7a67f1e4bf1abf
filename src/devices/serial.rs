//! COM1 output for the kernel log.
//!
//! Storage events (mounts, table repairs, rolled back updates, ATA
//! timeouts) reach the console through here, so the port stays usable
//! before and independently of the disk.

use crate::constants::ports::SERIAL_PORT;
use lazy_static::lazy_static;
use spin::Mutex;
use uart_16550::SerialPort;

lazy_static! {
    /// First serial port (COM1), initialized on first use.
    pub static ref SERIAL1: Mutex<SerialPort> = {
        let mut serial_port = unsafe { SerialPort::new(SERIAL_PORT) };
        serial_port.init();
        Mutex::new(serial_port)
    };
}

#[doc(hidden)]
pub fn _print(args: ::core::fmt::Arguments) {
    use core::fmt::Write;
    // A log line about a failing disk must not take the kernel down with
    // it, so a failed write is dropped.
    let _ = SERIAL1.lock().write_fmt(args);
}

/// Prints formatted text to the serial port.
///
/// # Examples
/// ```no_run
/// pulsefs::serial_print!("mounting {}... ", "ata0");
/// ```
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::serial::_print(format_args!($($arg)*))
    };
}

/// Prints formatted text to the serial port, followed by a newline.
///
/// # Examples
/// ```no_run
/// pulsefs::serial_println!("{} files in /", 3);
/// ```
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => ($crate::serial_print!("{}\n", format_args!($($arg)*)));
}
