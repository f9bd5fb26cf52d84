// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART transmit wrapper and the `log` backend that writes through it.
//!
//! Lines are terminated with CRLF so they render correctly in `screen`.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```

use core::cell::RefCell;
use core::fmt::{self, Write as _};

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// `log` backend over a [`Usart`]. Declare one as a `static` and call [`install`](Self::install).
///
/// ```ignore
/// static LOGGER: UsartLogger<pac::USART1> = UsartLogger::new();
///
/// LOGGER.install(usart, LevelFilter::Info).ok();
/// log::info!("ready");
/// ```
pub struct UsartLogger<U: Instance> {
    usart: Mutex<RefCell<Option<Usart<U>>>>,
}

impl<U: Instance> UsartLogger<U> {
    pub const fn new() -> Self {
        Self {
            usart: Mutex::new(RefCell::new(None)),
        }
    }

    /// Take ownership of `usart` and register as the global logger.
    pub fn install(&'static self, usart: Usart<U>, level: LevelFilter) -> Result<(), SetLoggerError>
    where
        U: Send,
    {
        interrupt::free(|cs| self.usart.borrow(cs).replace(Some(usart)));
        log::set_logger(self)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl<U: Instance + Send> Log for UsartLogger<U> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(usart, "[{:<5}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}
