//! Structured logging with box-drawing output.
//!
//! Every line goes to stdout with colors. When a file mirror is active
//! (`Log::start_file_mirror`), the same line is also written, timestamped and
//! with ANSI codes stripped, to a log file by a background thread so daemon runs
//! leave a trace after the terminal is gone.
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a new conceptual block (`┃` spacer then `┣ message`).
//! - `log_decorated!` continues a block (`┣ message`).
//! - `log_indented!` lists details that belong to the previous line (`┃   message`).
//! - `log_pipe!` inserts a spacer before a standalone `log_info!`/`log_warning!`/...
//! - `log_version!` prints the header once, `log_end!` the final `╹`.
//! - `log_debug!` only prints when debug output was enabled with `--debug`.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// Mirror channel, installed at most once per process
static MIRROR_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Line(String),
    Shutdown,
}

/// Runtime switches for the logging macros.
pub struct Log;

impl Log {
    /// Enable or disable all output, e.g. to keep tests quiet.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Mirror all output to `file_path` (appending) until the guard is dropped.
    pub fn start_file_mirror(file_path: &str) -> anyhow::Result<LoggerGuard> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        let (tx, rx) = channel();
        MIRROR_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("Log file mirror already initialized"))?;

        let handle = std::thread::spawn(move || {
            loop {
                match rx.recv() {
                    Ok(LogMessage::Line(text)) => {
                        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                        for line in text.lines() {
                            writeln!(file, "{stamp} {line}")?;
                        }
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }
}

/// Flushes and stops the file mirror when dropped.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Remove `ESC [ ... m` color sequences.
pub(crate) fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Route one formatted chunk to stdout and, if active, the file mirror.
/// Public for macro access.
pub fn write_output(text: &str) {
    if !Log::is_enabled() {
        return;
    }

    print!("{text}");
    let _ = std::io::stdout().flush();

    if let Some(tx) = MIRROR_CHANNEL.get() {
        let _ = tx.send(LogMessage::Line(strip_ansi_codes(text)));
    }
}

// # Logging Macros

/// Shared body of the line macros: `lead` is placed in front of the message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($lead:expr, $fmt:literal $($arg:tt)*) => {{
        let message = format!($fmt $($arg)*);
        $crate::logger::write_output(&format!("{}{message}\n", $lead));
    }};
    ($lead:expr, $expr:expr) => {{
        let expr = $expr;
        $crate::logger::write_output(&format!("{}{expr}\n", $lead));
    }};
}

/// Continue the current block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => { $crate::__log_line!("┣ ", $($arg)+) };
}

/// Detail line under the previous message: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => { $crate::__log_line!("┃   ", $($arg)+) };
}

/// Empty spacer line.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::write_output("┃\n")
    };
}

/// Open a new block: spacer, then `┣ message`.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => { $crate::__log_line!("┃\n┣ ", $($arg)+) };
}

/// Application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::write_output(&format!(
            "┏ audamo v{} ━━╸\n",
            env!("CARGO_PKG_VERSION")
        ))
    };
}

/// Final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::write_output("╹\n")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] ", $($arg)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => { $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] ", $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] ", $($arg)+) };
}

/// Error that ends the current flow: spacer, then `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => { $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] ", $($arg)+) };
}

/// Only printed when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {{
        if $crate::logger::Log::is_debug() {
            $crate::__log_line!("┣[\x1b[32mDEBUG\x1b[0m] ", $($arg)+)
        }
    }};
}
