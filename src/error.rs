// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the instrumentation layer.
//!
//! The layer itself invents exactly one failure: asking it to invoke a
//! method that was never registered. Everything else that can go wrong is
//! the wrapped call's own failure, which travels as [`anyhow::Error`] so
//! its cause chain stays intact for the chain logger.

use thiserror::Error;

/// Faults of the instrumentation layer itself, as opposed to failures of
/// the wrapped call.
#[derive(Error, Debug)]
pub enum InterceptError {
    #[error("Method not registered: {0}")]
    MethodNotFound(String),
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found_display() {
        let err = InterceptError::MethodNotFound("billing.close".to_string());
        assert_eq!(err.to_string(), "Method not registered: billing.close");
    }

    #[test]
    fn test_converts_to_anyhow() {
        let err: anyhow::Error = InterceptError::MethodNotFound("x".to_string()).into();
        assert!(err.downcast_ref::<InterceptError>().is_some());
    }
}
