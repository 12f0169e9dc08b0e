// SPDX-License-Identifier: MIT
//
// Stderr logger for the `log` facade.
//
// The library crates only emit records; the binary decides where they go.
// The level comes from the TEDIT_LOG environment variable (off, error, warn,
// info, debug, trace). Unset or unparsable means warnings and errors only.

use std::io::Write;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the log level.
pub const LEVEL_VAR: &str = "TEDIT_LOG";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        // A failed diagnostic write has nowhere else to go.
        let _ = writeln!(
            err,
            "[{:<5}] [{}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Parse a level name; `None` for anything unrecognized.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(value.trim()).ok()
}

/// Install the stderr logger at the level named by `TEDIT_LOG`.
pub fn init() {
    let level = std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
