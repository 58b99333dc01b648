//! Structured logging with box-drawing output.
//!
//! Every line the CLI prints goes through these macros so output keeps one
//! visual shape:
//!
//! ```text
//! ┏ gloaming v0.1.0 ━━╸
//! ┃
//! ┣ Light phases for 2024-06-21
//! ┃   Morning blue hour    04:02 → 04:21
//! ┣[WARNING] Evening blue hour boundary was estimated
//! ╹
//! ```
//!
//! ## Conventions
//!
//! - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
//! - **`log_decorated!`** continues a block (`┣ message`).
//! - **`log_indented!`** prints nested detail lines (`┃   message`).
//! - **`log_pipe!`** inserts an empty `┃` spacer, normally before a leveled message.
//! - **`log_version!`** / **`log_end!`** frame the whole output.
//! - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`** carry a `[LEVEL]` tag.
//!
//! Logging can be switched off at runtime, which `--json` output and tests rely on.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

pub struct Log;

impl Log {
    /// Enable or disable all structured output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }
}

/// Write already formatted text to stdout and flush.
pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

// Shared body of the message macros: `$template` receives the rendered message as `{}`.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($template:literal, $fmt:literal $($arg:tt)*) => {{
        if $crate::common::logger::Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!($template, message));
        }
    }};
    ($template:literal, $expr:expr) => {{
        if $crate::common::logger::Log::is_enabled() {
            let message = $expr;
            $crate::common::logger::write_output(&format!($template, message));
        }
    }};
}

/// Continue the current block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($($body:tt)+) => { $crate::__log_line!("┣ {}\n", $($body)+) };
}

/// Detail line inside a block: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($($body:tt)+) => { $crate::__log_line!("┃   {}\n", $($body)+) };
}

/// Start a new block with a spacer line above it.
#[macro_export]
macro_rules! log_block_start {
    ($($body:tt)+) => { $crate::__log_line!("┃\n┣ {}\n", $($body)+) };
}

#[macro_export]
macro_rules! log_pipe {
    () => {{
        if $crate::common::logger::Log::is_enabled() {
            $crate::common::logger::write_output("┃\n");
        }
    }};
}

/// Application header, printed once per invocation.
#[macro_export]
macro_rules! log_version {
    () => {{
        if $crate::common::logger::Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::common::logger::write_output(&format!("┏ gloaming v{version} ━━╸\n"));
        }
    }};
}

#[macro_export]
macro_rules! log_end {
    () => {{
        if $crate::common::logger::Log::is_enabled() {
            $crate::common::logger::write_output("╹\n");
        }
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($($body:tt)+) => {
        $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] {}\n", $($body)+)
    };
}

/// Warning printed outside the box structure (before the header exists).
#[macro_export]
macro_rules! log_warning_standalone {
    ($($body:tt)+) => {
        $crate::__log_line!("[\x1b[33mWARNING\x1b[0m] {}\n", $($body)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($body:tt)+) => {
        $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] {}\n", $($body)+)
    };
}

/// Terminal error: closes the box with `┗`.
#[macro_export]
macro_rules! log_error_exit {
    ($($body:tt)+) => {
        $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] {}\n", $($body)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($body:tt)+) => {
        $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] {}\n", $($body)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($body:tt)+) => {
        $crate::__log_line!("┣[\x1b[32mDEBUG\x1b[0m] {}\n", $($body)+)
    };
}
