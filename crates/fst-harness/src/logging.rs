//! Logging setup: a log file plus the console.
//!
//! The file receives INFO (or DEBUG with `debug`), the console INFO (or DEBUG
//! with `verbose`). `RUST_LOG` overrides the file filter when set.

use std::fmt;
use std::fs::File;
use std::io;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::HarnessConfig;
use crate::error::Error;
use crate::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock timestamps, `2024-01-31 12:00:00`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// `<timestamp> <LEVEL> <message>`, one space between each part.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        LocalTimestamp.format_time(&mut writer)?;
        write!(writer, " {} ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber. The log file is truncated.
pub fn init_logging(config: &HarnessConfig) -> Result<()> {
    let file = File::create(&config.log_file).map_err(|e| {
        Error::Logging(format!("cannot open {}: {}", config.log_file.display(), e))
    })?;

    let file_level = if config.debug { "debug" } else { "info" };
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(file_level));
    let console_level = if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .event_format(LineFormat)
        .with_filter(file_filter);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .event_format(LineFormat)
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
