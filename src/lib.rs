// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Calltrace - correlated, policy-driven instrumentation for method calls.
//!
//! Wraps registered method calls and emits structured start/param/end/error
//! events, all stamped with one correlation identifier per logical call
//! chain. Per-method markers decide what gets logged, at which level,
//! whether parameters are included, and whether a logged failure is
//! re-raised or swallowed.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`policy`] - Marker model and per-method decision resolution
//! - [`correlation`] - Correlation identifiers and their owning scope
//! - [`record`] - Structured event model ([`LogRecord`], [`InvocationEvent`])
//! - [`sink`] - Logging seam ([`LogSink`], tracing-backed and capturing sinks)
//! - [`chain`] - Bounded failure-chain logging
//! - [`registry`] - Method registry and the [`MethodHandler`] seam
//! - [`interceptor`] - Invocation orchestration
//! - [`config`] - Interceptor configuration
//! - [`init`] - Optional `tracing` subscriber bootstrap
//! - [`error`] - Error types and result alias
//!
//! # Example
//!
//! ```rust,ignore
//! use calltrace::{
//!     Interceptor, InterceptorConfig, LogLevel, Markers, MethodDescriptor,
//!     MethodRegistry, ParamsMarker,
//! };
//!
//! let mut builder = MethodRegistry::builder();
//! builder.register(
//!     MethodDescriptor::new("billing.Invoices.close").with_params(["id"]),
//!     Markers::at(LogLevel::Info).with_params(ParamsMarker::new(LogLevel::Debug)),
//!     CloseInvoiceHandler,
//! );
//!
//! let config = InterceptorConfig::default();
//! let interceptor = Interceptor::new(builder.build(config.default_level), config);
//! let outcome = interceptor
//!     .invoke("billing.Invoices.close", vec![serde_json::json!(42)])
//!     .await?;
//! ```

pub mod chain;
pub mod config;
pub mod correlation;
pub mod error;
pub mod init;
pub mod interceptor;
pub mod policy;
pub mod record;
pub mod registry;
pub mod sink;

// Re-export commonly used types at crate root
pub use chain::{log_failure_chain, MAX_CHAIN_DEPTH};
pub use config::{FailureMode, InterceptorConfig};
pub use correlation::{CorrelationId, CorrelationScope};
pub use error::{InterceptError, Result};
pub use init::{init_logging, LoggingConfig};
pub use interceptor::{CallOutcome, Interceptor, ABSENT_PARAM, UNSERIALIZABLE_PARAM};
pub use policy::{resolve, Decision, LogLevel, Markers, ParamsMarker};
pub use record::{InvocationEvent, LogRecord};
pub use registry::{MethodDescriptor, MethodHandler, MethodRegistry, MethodRegistryBuilder};
pub use sink::{CaptureSink, LogSink, TracingSink};

/// Calltrace version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
