//! # AT command responses
//!
//! Every message is framed by CR-LF pairs on the console:
//!
//! | Message                                     | Console text                    |
//! |---------------------------------------------|---------------------------------|
//! | [`send_wakeup_msg`](Atci::send_wakeup_msg)  | `\r\n+WAKEUP\r\n`               |
//! | [`send_sleep_msg`](Atci::send_sleep_msg)    | `\r\n+SLEEP\r\n`                |
//! | [`resp_ack`](Atci::resp_ack)                | `\r\nOK\r\n` / `\r\nERROR: 3\r\n` |
//! | [`resp_data`](Atci::resp_data)              | `\r\nATIDENT:$01,$A0B1\r\n`      |
//! | [`info_str`](Atci::info_str)                | `\r\n+INF: text\r\n`            |
//! | [`debug_str`](Atci::debug_str)              | `\r\n+DBG: text\r\n`            |
//!
//! Parameters are written as `$` followed by their bytes in upper-case hex.

use core::fmt::{self, Write as _};
use embedded_hal::blocking::serial::Write;

const INFO_PREFIX: &str = "+INF: ";
const DEBUG_PREFIX: &str = "+DBG: ";

/// Selects which optional message classes reach the console
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AtciConfig {
    /// `+DBG:` messages
    pub debug: bool,
    /// `+INF:` messages
    pub info: bool,
}

impl Default for AtciConfig {
    fn default() -> Self {
        AtciConfig {
            debug: true,
            info: true,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AtciError<E> {
    /// Console transport failed
    Console(E),
    /// A formatted argument failed to render
    Format,
}

/// Adapts the console to `core::fmt`, keeping the transport error
struct ConsoleWriter<'a, W: Write<u8>> {
    console: &'a mut W,
    error: Option<W::Error>,
}

impl<W: Write<u8>> fmt::Write for ConsoleWriter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.console.bwrite_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

pub struct Atci<W> {
    console: W,
    config: AtciConfig,
}

impl<W> Atci<W> {
    pub fn new(console: W, config: AtciConfig) -> Self {
        Atci { console, config }
    }

    pub fn config(&self) -> &AtciConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AtciConfig) {
        self.config = config;
    }

    pub fn release(self) -> W {
        self.console
    }
}

impl<W: Write<u8>> Atci<W> {
    fn emit<F>(&mut self, prefix: &str, body: F) -> Result<(), AtciError<W::Error>>
    where
        F: FnOnce(&mut dyn fmt::Write) -> fmt::Result,
    {
        let mut out = ConsoleWriter {
            console: &mut self.console,
            error: None,
        };
        let written = frame(&mut out, prefix, body);
        if let Some(error) = out.error.take() {
            return Err(AtciError::Console(error));
        }
        written.map_err(|_| AtciError::Format)?;
        self.console.bflush().map_err(AtciError::Console)
    }

    pub fn send_wakeup_msg(&mut self) -> Result<(), AtciError<W::Error>> {
        self.emit("", |out| out.write_str("+WAKEUP"))
    }

    pub fn send_sleep_msg(&mut self) -> Result<(), AtciError<W::Error>> {
        self.emit("", |out| out.write_str("+SLEEP"))
    }

    /// Acknowledges a command, `0` is success and anything else is reported as is
    pub fn resp_ack(&mut self, code: u8) -> Result<(), AtciError<W::Error>> {
        self.emit("", |out| match code {
            0 => out.write_str("OK"),
            code => write!(out, "ERROR: {}", code),
        })
    }

    /// Sends the response of `cmd` with its parameters
    pub fn resp_data(&mut self, cmd: &str, params: &[&[u8]]) -> Result<(), AtciError<W::Error>> {
        self.emit("", |out| write_data(out, cmd, params))
    }

    pub fn info_str(&mut self, msg: &str) -> Result<(), AtciError<W::Error>> {
        if !self.config.info {
            return Ok(());
        }
        self.emit(INFO_PREFIX, |out| out.write_str(msg))
    }

    /// `+INF:` message from `format_args!`
    pub fn info_fmt(&mut self, args: fmt::Arguments) -> Result<(), AtciError<W::Error>> {
        if !self.config.info {
            return Ok(());
        }
        self.emit(INFO_PREFIX, |out| out.write_fmt(args))
    }

    pub fn debug_str(&mut self, msg: &str) -> Result<(), AtciError<W::Error>> {
        if !self.config.debug {
            return Ok(());
        }
        self.emit(DEBUG_PREFIX, |out| out.write_str(msg))
    }

    /// `+DBG:` message from `format_args!`
    pub fn debug_fmt(&mut self, args: fmt::Arguments) -> Result<(), AtciError<W::Error>> {
        if !self.config.debug {
            return Ok(());
        }
        self.emit(DEBUG_PREFIX, |out| out.write_fmt(args))
    }

    /// Dumps command or response parameters in the `resp_data` format
    pub fn debug_param_data(
        &mut self,
        msg: &str,
        params: &[&[u8]],
    ) -> Result<(), AtciError<W::Error>> {
        if !self.config.debug {
            return Ok(());
        }
        self.emit(DEBUG_PREFIX, |out| write_data(out, msg, params))
    }
}

fn frame<F>(out: &mut dyn fmt::Write, prefix: &str, body: F) -> fmt::Result
where
    F: FnOnce(&mut dyn fmt::Write) -> fmt::Result,
{
    out.write_str("\r\n")?;
    out.write_str(prefix)?;
    body(out)?;
    out.write_str("\r\n")
}

/// `head` alone, or `head:$p1,$p2...` when there are parameters
fn write_data(out: &mut dyn fmt::Write, head: &str, params: &[&[u8]]) -> fmt::Result {
    out.write_str(head)?;
    for (i, param) in params.iter().enumerate() {
        out.write_char(if i == 0 { ':' } else { ',' })?;
        out.write_char('$')?;
        for byte in param.iter() {
            write!(out, "{:02X}", byte)?;
        }
    }
    Ok(())
}
