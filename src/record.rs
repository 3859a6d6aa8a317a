// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The structured events this layer produces.
//!
//! One [`LogRecord`] per emitted line. Records carry the correlation
//! identifier, the qualified method name, a UTC timestamp, and the event
//! payload; the sink decides how they are rendered or persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::correlation::CorrelationId;
use crate::policy::LogLevel;

/// What happened at one point of an instrumented invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InvocationEvent {
    /// Detail logging is switched off for the method.
    Disabled,
    /// The wrapped call is about to run.
    Start,
    /// One declared parameter and its serialized runtime value.
    Param { name: String, value: String },
    /// The wrapped call returned successfully.
    EndOk,
    /// The wrapped call failed.
    EndKo,
    /// One link of the failure's cause chain, 0-based from the root.
    ChainLink { depth: usize, message: String },
    /// Marker emitted before descending to the next cause, so a stream
    /// truncated mid-chain still reads coherently.
    InnerCause { message: String },
}

impl InvocationEvent {
    /// Stable machine-readable tag for the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Start => "start",
            Self::Param { .. } => "param",
            Self::EndOk => "end_ok",
            Self::EndKo => "end_ko",
            Self::ChainLink { .. } => "chain_link",
            Self::InnerCause { .. } => "inner_cause",
        }
    }
}

/// A single structured log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity the line is emitted at.
    pub level: LogLevel,

    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,

    /// Identifier shared by every line of the call chain.
    pub correlation: CorrelationId,

    /// Qualified name of the instrumented method.
    pub method: String,

    /// The event payload.
    pub event: InvocationEvent,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        level: LogLevel,
        correlation: CorrelationId,
        method: impl Into<String>,
        event: InvocationEvent,
    ) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            correlation,
            method: method.into(),
            event,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.correlation.short();
        match &self.event {
            InvocationEvent::Disabled => {
                write!(f, "[{id}] Logging is disabled for method {}", self.method)
            }
            InvocationEvent::Start => write!(f, "[{id}] {} Start", self.method),
            InvocationEvent::Param { name, value } => {
                write!(f, "[{id}] {} Param: {name} = {value}", self.method)
            }
            InvocationEvent::EndOk => write!(f, "[{id}] {} End Ok", self.method),
            InvocationEvent::EndKo => write!(f, "[{id}] {} End KO", self.method),
            InvocationEvent::ChainLink { depth, message } => {
                write!(f, "[{id}] Depth {depth}: {message}")
            }
            InvocationEvent::InnerCause { message } => {
                write!(f, "[{id}] Inner cause: {message}")
            }
        }
    }
}
