// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Marker model and per-method decision resolution.
//!
//! Markers are the entire configuration surface of the layer: a base
//! severity, an off switch, and an optional parameter-logging marker that
//! also controls whether logged failures are re-raised. They are attached
//! to a method at registration time and resolved exactly once into an
//! immutable [`Decision`]; nothing is introspected per call.

use serde::{Deserialize, Serialize};

/// Severity of an emitted instrumentation event.
///
/// Distinct from [`tracing::Level`] so markers can be declared and
/// serialized from host configuration; convert with
/// [`as_tracing`](Self::as_tracing) at the sink boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to the equivalent `tracing` level.
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }

    /// Lowercase static name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter-logging marker: log each argument at `level`, and re-raise a
/// caught failure to the caller when `raise_on_error` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsMarker {
    /// Overriding level for start/param/end events of the method.
    pub level: LogLevel,

    /// Re-raise a logged failure instead of swallowing it.
    #[serde(default)]
    pub raise_on_error: bool,
}

impl ParamsMarker {
    /// Marker that logs parameters and swallows failures (the default).
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            raise_on_error: false,
        }
    }

    /// Marker that logs parameters and re-raises failures.
    pub fn rethrowing(level: LogLevel) -> Self {
        Self {
            level,
            raise_on_error: true,
        }
    }
}

/// Declarative per-method instrumentation metadata.
///
/// All three fields are optional; a method with no markers at all still
/// gets start/end events at the interceptor's default level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Base severity for the method's events.
    #[serde(default)]
    pub level: Option<LogLevel>,

    /// Suppress detail logging; one minimal line is still emitted.
    #[serde(default)]
    pub disabled: bool,

    /// Enable parameter logging and failure re-raising.
    #[serde(default)]
    pub params: Option<ParamsMarker>,
}

impl Markers {
    /// No markers.
    pub fn none() -> Self {
        Self::default()
    }

    /// Base marker at the given level.
    pub fn at(level: LogLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    /// Turn off detail logging for the method.
    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Attach a parameter-logging marker.
    pub fn with_params(mut self, params: ParamsMarker) -> Self {
        self.params = Some(params);
        self
    }

    /// Combine method-level markers with the declaring scope's base markers.
    ///
    /// Level and the off switch are inherited; the params marker never is,
    /// it must be declared on the method itself.
    pub fn inherit_from(self, base: &Markers) -> Self {
        Self {
            level: self.level.or(base.level),
            disabled: self.disabled || base.disabled,
            params: self.params,
        }
    }
}

/// The resolved, immutable logging behavior for one registered method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Emit a single "disabled" line and nothing else.
    pub skip_detail: bool,

    /// Severity for start/param/end events (and the disabled line).
    pub level: LogLevel,

    /// Emit one event per declared parameter.
    pub log_params: bool,

    /// Re-raise a logged failure to the caller.
    pub rethrow: bool,
}

/// Compute the effective decision for a marker set.
///
/// Resolution order, first match wins:
/// 1. `disabled` suppresses everything except the one minimal line, which
///    keeps the base level (the params marker is never consulted).
/// 2. The params marker's level overrides the base level.
/// 3. Parameters are logged iff the params marker is present.
/// 4. `raise_on_error` comes from the params marker; absent it, failures
///    are logged and swallowed.
pub fn resolve(markers: &Markers, default_level: LogLevel) -> Decision {
    let base = markers.level.unwrap_or(default_level);

    if markers.disabled {
        return Decision {
            skip_detail: true,
            level: base,
            log_params: false,
            rethrow: false,
        };
    }

    Decision {
        skip_detail: false,
        level: markers.params.map_or(base, |p| p.level),
        log_params: markers.params.is_some(),
        rethrow: markers.params.is_some_and(|p| p.raise_on_error),
    }
}
