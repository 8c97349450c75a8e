//! Logger that writes every record to the console and an append-only file.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target, WriteStyle};
use log::Level;
use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

pub const DEFAULT_LOG_FILE: &str = "aws_cli_profiles_execution.log";

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Writes everything to both `primary` and `secondary`.
pub struct Tee<A, B> {
    primary: A,
    secondary: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (A, B) {
        (self.primary, self.secondary)
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.secondary.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

pub fn format_line(now: &DateTime<Local>, level: Level, message: &str) -> String {
    format!("{} [{}] {}", now.format(TIMESTAMP_FORMAT), level, message)
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn console_and_file(path: &Path) -> Result<Tee<Stdout, File>> {
    Ok(Tee::new(io::stdout(), open_log_file(path)?))
}

/// Installs the global logger. `RUST_LOG` overrides the default `info` filter.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a logger is already
/// installed.
pub fn init(log_file: &Path) -> Result<()> {
    let sink = console_and_file(log_file)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(&Local::now(), record.level(), &record.args().to_string())
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(sink)))
        .try_init()
        .context("Failed to initialize logger")
}
