// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Correlation identifiers and the scope that owns them.
//!
//! Every log line belonging to one logical call chain carries the same
//! [`CorrelationId`], so the chain can be reassembled from an interleaved
//! log stream. The identifier lives in a [`CorrelationScope`]: one scope
//! per logical request or session, owned by the caller and injected into
//! the interceptor. Dropping the scope ends the identifier's life; there
//! is no process-wide state.

use std::fmt;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier shared by all log events of one call chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new random (v4) correlation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a correlation ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Get a short representation (first 8 characters) for log previews.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({})", self.short())
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Owner of a single lazily-created correlation identifier.
///
/// The identifier is created on first [`get_or_create`](Self::get_or_create)
/// and is immutable for the rest of the scope's life. Initialization is
/// atomic: when several calls race on first access, exactly one identifier
/// is ever produced and all callers observe it.
///
/// Intended use is one scope per logical request or session. A scope shared
/// across unrelated call chains will correlate them all under one
/// identifier.
#[derive(Debug, Default)]
pub struct CorrelationScope {
    slot: OnceCell<CorrelationId>,
}

impl CorrelationScope {
    /// Create a scope with no identifier yet.
    pub fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// Return the scope's identifier, creating it on first access.
    pub fn get_or_create(&self) -> CorrelationId {
        *self.slot.get_or_init(CorrelationId::new)
    }

    /// Return the identifier if one has been created, without creating it.
    pub fn current(&self) -> Option<CorrelationId> {
        self.slot.get().copied()
    }
}
