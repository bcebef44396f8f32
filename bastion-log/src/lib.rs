//! Bastion Logging
//!
//! Installs a `tracing` subscriber configured from the environment and
//! provides [`security_event`] for reporting blocked attacks in a single,
//! greppable shape.
//!
//! # Usage
//!
//! ```rust
//! use serde_json::json;
//!
//! bastion_log::init();
//!
//! bastion_log::security_event(
//!     "xss_blocked",
//!     &json!({ "pattern": "Script Tag", "path": "/api/xss/secure" }),
//! );
//! ```
//!
//! # Environment Variables
//!
//! - `BASTION_DEBUG=1` - Enable debug logging
//! - `BASTION_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `BASTION_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `BASTION_LOG_COLOR=1|0` - Enable/disable ANSI colors
//! - `RUST_LOG` - Overrides the level filter entirely

use once_cell::sync::{Lazy, OnceCell};
use std::env;

/// Target used for every [`security_event`].
pub const SECURITY_TARGET: &str = "bastion::security";

// ============================================================================
// Log Levels
// ============================================================================

/// Log level for Bastion logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    /// No logging at all
    Off,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Directive understood by `EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_filter().to_uppercase())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Single-line output
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether ANSI colors are enabled
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            // JSON output doesn't use colors
            color: false,
        }
    }
}

impl LogConfig {
    /// Read the configuration from `BASTION_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let debug = flag("BASTION_DEBUG").unwrap_or(false);

        let level = lookup("BASTION_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("BASTION_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let color = flag("BASTION_LOG_COLOR")
            .unwrap_or_else(|| format != Format::Json && lookup("NO_COLOR").is_none());

        Self {
            debug,
            level,
            format,
            color,
        }
    }
}

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);
static INSTALLED: OnceCell<bool> = OnceCell::new();

/// The process-wide configuration, read from the environment on first use.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Subscriber Installation
// ============================================================================

/// Install the global subscriber using [`config()`].
///
/// Safe to call more than once. Returns `false` when another subscriber was
/// already installed by someone else.
pub fn init() -> bool {
    *INSTALLED.get_or_init(|| init_with(config()))
}

/// Install the global subscriber with an explicit configuration.
pub fn init_with(config: &LogConfig) -> bool {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        Format::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(config.color))
            .try_init(),
        Format::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.color))
            .try_init(),
        #[cfg(feature = "json")]
        Format::Json => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        #[cfg(not(feature = "json"))]
        Format::Json => registry
            .with(fmt::layer().compact().with_ansi(false))
            .try_init(),
    };

    installed.is_ok()
}

// ============================================================================
// Security Events
// ============================================================================

/// Report a security-relevant event (a blocked payload, a rejected token).
///
/// The event name and details land as structured fields on the
/// [`SECURITY_TARGET`] target at warn level.
pub fn security_event(event: &str, details: &serde_json::Value) {
    tracing::warn!(
        target: SECURITY_TARGET,
        event = event,
        details = %details,
        "security event"
    );
}
