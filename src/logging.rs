//! Logger setup
//!
//! Run reports are printed on stdout by the binary. Progress narration shares
//! stdout with them, warnings and errors go to stderr so a redirected report
//! stays readable. An optional log file receives every record with a
//! timestamp.

use std::path::Path;

use anyhow::Result;
use chrono::SecondsFormat;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter};

/// Verbosity selected with repeated `-v` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Progress and problems (default)
    Info,
    /// Adds the minifier command lines and skipped entries
    Debug,
    /// Adds every scanned path
    Trace,
}

impl LogLevel {
    pub fn from_occurrences(occurrences: u8) -> Self {
        match occurrences {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Whether a record belongs on stderr
fn is_problem(level: Level) -> bool {
    level <= Level::Warn
}

fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    let narration = Dispatch::new()
        .filter(|metadata| !is_problem(metadata.level()))
        .chain(std::io::stdout());
    let problems = Dispatch::new()
        .filter(|metadata| is_problem(metadata.level()))
        .chain(std::io::stderr());

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "\x1B[{}m{}\x1B[0m",
                colors.get_color(&record.level()).to_fg_str(),
                message
            ))
        })
        .chain(narration)
        .chain(problems)
}

fn file_dispatch(path: &Path) -> Result<Dispatch> {
    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(fern::log_file(path)?))
}

/// Installs the global logger
///
/// # Errors
/// Returns an error if the log file cannot be opened or a logger is
/// already installed
pub fn init_logger(verbosity: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let mut dispatch = Dispatch::new()
        .level(verbosity.to_level_filter())
        .chain(console_dispatch());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(file_dispatch(path)?);
    }
    dispatch.apply()?;

    log::debug!("Logging at {verbosity:?}");
    Ok(())
}

/// Pick the coloured variant of a message when stdout is a terminal
pub fn format_message(message: &str, colored_message: &str) -> String {
    if atty::is(atty::Stream::Stdout) {
        colored_message.to_string()
    } else {
        message.to_string()
    }
}
