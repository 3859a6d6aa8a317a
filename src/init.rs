// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Optional `tracing` subscriber bootstrap.
//!
//! Hosts that already install their own subscriber should skip this module
//! entirely; [`TracingSink`](crate::sink::TracingSink) emits through
//! whatever subscriber is active.

use std::io;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::policy::LogLevel;

/// Configuration for the bundled subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level if `RUST_LOG` is not set.
    pub default_level: LogLevel,

    /// Use ANSI colors in output.
    pub ansi: bool,

    /// Include the target module path in each line.
    pub include_target: bool,

    /// Custom filter directive (overrides `default_level`).
    pub filter_directive: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            ansi: true,
            include_target: true,
            filter_directive: None,
        }
    }
}

impl LoggingConfig {
    /// Set the default level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    /// Set a custom filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_directive = Some(filter.into());
        self
    }
}

/// Install a global fmt subscriber.
///
/// Call once at startup. `RUST_LOG` takes precedence over the configured
/// default level; an explicit filter directive takes precedence over both.
pub fn init_logging(config: &LoggingConfig) -> io::Result<()> {
    let fallback = || EnvFilter::new(config.default_level.as_str());
    let filter = match &config.filter_directive {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(config.ansi)
                .with_target(config.include_target)
                .compact(),
        )
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
