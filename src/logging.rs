//! Tracing subscriber setup for hosts embedding the session layer.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `LINK3_LOG_JSON=1` selects JSON lines.
    pub fn from_env() -> Self {
        match std::env::var("LINK3_LOG_JSON").as_deref() {
            Ok("1") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_logging() {
    init_logging_with(LogFormat::from_env(), "info");
}

/// `RUST_LOG` wins over `default_filter`. A second call is a no-op.
pub fn init_logging_with(format: LogFormat, default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
