use std::fmt::{self, Display};

use clap::ValueEnum;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Send `tracing` events from our own crates to stderr. Dependencies are
/// kept quiet unless `RUST_LOG` asks for them.
pub fn init_logging(log_level: LogLevel, no_color: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::ERROR.into())
        .from_env_lossy()
        .add_directive(directive("heapalign", log_level))
        .add_directive(directive("heapalign_core", log_level));

    let layer = tracing_fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    // Ignore the error: a subscriber may already be installed in tests.
    let _ = tracing_subscriber::registry().with(layer).with(filter).try_init();
}

fn directive(target: &str, log_level: LogLevel) -> tracing_subscriber::filter::Directive {
    format!("{target}={log_level}")
        .parse()
        .unwrap_or_else(|_| tracing::level_filters::LevelFilter::WARN.into())
}
