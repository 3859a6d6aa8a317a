// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interceptor configuration.

use serde::{Deserialize, Serialize};

use crate::policy::LogLevel;

/// What happens to a wrapped call's failure after it has been logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Per-method markers decide: failures are re-raised only where the
    /// params marker says so, otherwise logged and swallowed. Callers must
    /// treat "null value, no error" as a valid outcome under this mode.
    ObserveOnly,

    /// Every logged failure is re-raised to the caller, regardless of
    /// markers.
    ObserveAndRethrow,
}

impl Default for FailureMode {
    fn default() -> Self {
        Self::ObserveOnly
    }
}

/// Configuration for an [`Interceptor`](crate::interceptor::Interceptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptorConfig {
    /// Level for methods whose markers declare no base level.
    pub default_level: LogLevel,

    /// Swallow-vs-rethrow policy for logged failures.
    pub failure_mode: FailureMode,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            failure_mode: FailureMode::ObserveOnly,
        }
    }
}

impl InterceptorConfig {
    /// Set the default level for unmarked methods.
    pub fn with_default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    /// Set the failure mode.
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Config that re-raises every logged failure.
    pub fn observe_and_rethrow() -> Self {
        Self::default().with_failure_mode(FailureMode::ObserveAndRethrow)
    }
}
