//! Logging for the pedigree pipeline
//!
//! Structured logging via `tracing`. Native builds install a
//! `tracing-subscriber` registry writing to stderr, so SVG or JSON written to
//! stdout stays clean; wasm builds log to the browser console through
//! `tracing-wasm`.
//!
//! ```rust
//! use pedigree::core::logging::init_logging;
//!
//! // Only the first call can install the global subscriber
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! assert!(init_logging(None, None).is_err());
//! ```
//!
//! Levels are `EnvFilter` directives, so a single module can be turned up:
//!
//! ```bash
//! RUST_LOG="warn,pedigree::plugins::pedigree::interaction=trace" pedigree drag -i family.json --id C --to 280,240
//! ```
//!
//! A redraw shows up as a `redraw_pedigree` span enclosing
//! `optimize_layout`, `render_pedigree` and `route_connections`.

use std::fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Filter used when neither an argument nor the environment sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output format of the native subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no targets
    #[default]
    Compact,
    /// Multi-line with source locations and span activity
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "unknown log format '{}', expected one of {}",
                s,
                Self::variants().join(", ")
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Filter directive and format after applying arguments and environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Arguments win; then `PEDIGREE_LOG_LEVEL`, `RUST_LOG` and
    /// `PEDIGREE_LOG_FORMAT`; then `info` in compact format
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        Self::resolve_with(level, format, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        level: Option<&str>,
        format: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let filter = level
            .map(str::to_string)
            .or_else(|| env("PEDIGREE_LOG_LEVEL"))
            .or_else(|| env("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let format = match format.map(str::to_string).or_else(|| env("PEDIGREE_LOG_FORMAT")) {
            Some(name) => name.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self { filter, format })
    }

    /// An unparsable directive falls back to the default filter
    #[cfg(not(target_arch = "wasm32"))]
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

/// Install the global subscriber
///
/// `level` is an `EnvFilter` directive such as `debug` or `off`; `format` is
/// one of [`LogFormat::variants`]. Fails on an unknown format or when a
/// subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format)?;

    #[cfg(target_arch = "wasm32")]
    {
        // The browser console has its own level filtering
        let _ = settings;
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_level(true);
        let layer: Box<dyn Layer<Registry> + Send + Sync> = match settings.format {
            LogFormat::Compact => base
                .with_target(false)
                .with_span_events(FmtSpan::NONE)
                .boxed(),
            LogFormat::Pretty => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
                .boxed(),
            LogFormat::Json => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .json()
                .boxed(),
        };

        Registry::default()
            .with(layer)
            .with(settings.env_filter())
            .try_init()?;
        Ok(())
    }
}
