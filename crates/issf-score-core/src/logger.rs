//! Logging setup for the scoring tools.
//!
//! Library code only talks to the `log` facade. A binary installs one sink:
//! the stderr logger from [`init_with_level`], or with the `tracing` feature
//! the subscriber from `init_tracing`, which also receives `log` records.
//! Both take their default level from [`level_for`].

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Level for the usual `-v` / `-q` command line pair; `verbose` wins.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

/// `[  0.042s  INFO] message`; debug and trace lines also name the emitting module.
fn write_line(out: &mut impl Write, elapsed_s: f64, record: &Record) -> io::Result<()> {
    match record.level() {
        Level::Debug | Level::Trace => writeln!(
            out,
            "[{:7.3}s {:>5} {}] {}",
            elapsed_s,
            record.level(),
            record.module_path().unwrap_or_else(|| record.target()),
            record.args()
        ),
        level => writeln!(out, "[{:7.3}s {:>5}] {}", elapsed_s, level, record.args()),
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let elapsed = self.started.elapsed().as_secs_f64();
            let _ = write_line(&mut io::stderr().lock(), elapsed, record);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first level and return `Ok`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr and route `log` records into it.
///
/// `RUST_LOG` overrides `default_level`. `json` switches to flattened JSON
/// events; otherwise lines carry the process uptime. Pipeline spans are
/// reported when they close. Does nothing if a global logger or subscriber
/// is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string().to_lowercase()));
    if tracing_log::LogTracer::init().is_err() {
        return;
    }
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr);
    let _ = if json {
        tracing::subscriber::set_global_default(builder.json().flatten_event(true).finish())
    } else {
        tracing::subscriber::set_global_default(
            builder.with_timer(fmt::time::Uptime::default()).finish(),
        )
    };
}
