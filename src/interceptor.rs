// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Invocation orchestration.
//!
//! [`Interceptor::invoke`] wraps one call to a registered method: it reads
//! the method's precomputed decision, stamps every event with the scope's
//! correlation identifier, emits start/param/end events through the sink,
//! runs the handler, and on failure walks the cause chain and applies the
//! swallow-vs-rethrow policy.
//!
//! Under [`FailureMode::ObserveOnly`] a failing call whose markers do not
//! request re-raising returns `Ok` with a null value and `failed: true`.
//! Introducing this layer can turn a failing call into a non-failing one
//! from the caller's point of view.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::chain::log_failure_chain;
use crate::config::{FailureMode, InterceptorConfig};
use crate::correlation::{CorrelationId, CorrelationScope};
use crate::error::{InterceptError, Result};
use crate::policy::LogLevel;
use crate::record::{InvocationEvent, LogRecord};
use crate::registry::{MethodDescriptor, MethodRegistry};
use crate::sink::{LogSink, TracingSink};

/// Logged in place of an argument the host did not supply.
pub const ABSENT_PARAM: &str = "<absent>";

/// Logged in place of a value the serializer could not render.
pub const UNSERIALIZABLE_PARAM: &str = "<unserializable>";

/// Result of one intercepted invocation.
#[derive(Debug)]
pub struct CallOutcome {
    /// Qualified name of the invoked method.
    pub method: String,

    /// Value returned by the wrapped call; `Null` when a failure was
    /// swallowed.
    pub value: serde_json::Value,

    /// Wall-clock duration of the wrapped call.
    pub duration: Duration,

    /// True when the wrapped call failed and the failure was swallowed.
    /// A genuine null result has `failed: false`.
    pub failed: bool,
}

/// Orchestrates intercepted invocations.
///
/// Owns the registry, the correlation scope, the sink, and the config.
/// Create one interceptor per correlation scope (typically per logical
/// request or session), or inject a shared scope with
/// [`with_scope`](Self::with_scope).
pub struct Interceptor {
    registry: Arc<MethodRegistry>,
    scope: Arc<CorrelationScope>,
    sink: Arc<dyn LogSink>,
    config: InterceptorConfig,
}

impl Interceptor {
    /// Create an interceptor with a fresh correlation scope and the
    /// tracing-backed sink.
    pub fn new(registry: MethodRegistry, config: InterceptorConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            scope: Arc::new(CorrelationScope::new()),
            sink: Arc::new(TracingSink::new()),
            config,
        }
    }

    /// Replace the sink.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Share a correlation scope owned by the host, e.g. one scope spanning
    /// several interceptors of the same logical request.
    pub fn with_scope(mut self, scope: Arc<CorrelationScope>) -> Self {
        self.scope = scope;
        self
    }

    /// The correlation scope in use.
    pub fn scope(&self) -> &Arc<CorrelationScope> {
        &self.scope
    }

    /// The method registry in use.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    /// Invoke a registered method with the given runtime arguments.
    ///
    /// Errors are either [`InterceptError::MethodNotFound`] or the wrapped
    /// call's own failure when policy says to re-raise it; this layer never
    /// invents any other failure for the caller.
    pub async fn invoke(
        &self,
        name: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<CallOutcome> {
        let method = self
            .registry
            .get(name)
            .ok_or_else(|| InterceptError::MethodNotFound(name.to_string()))?;
        let decision = method.decision;
        let correlation = self.scope.get_or_create();
        let method_name = method.descriptor.name.as_str();

        if decision.skip_detail {
            // One minimal line, then hand over; success and failure both
            // propagate unmodified.
            self.emit(decision.level, correlation, method_name, InvocationEvent::Disabled);
            let start = Instant::now();
            let value = method.handler.call(args).await?;
            return Ok(CallOutcome {
                method: method_name.to_string(),
                value,
                duration: start.elapsed(),
                failed: false,
            });
        }

        self.emit(decision.level, correlation, method_name, InvocationEvent::Start);

        if decision.log_params {
            self.log_params(decision.level, correlation, &method.descriptor, &args);
        }

        let start = Instant::now();
        let result = method.handler.call(args).await;
        let duration = start.elapsed();

        match result {
            Ok(value) => {
                self.emit(decision.level, correlation, method_name, InvocationEvent::EndOk);
                Ok(CallOutcome {
                    method: method_name.to_string(),
                    value,
                    duration,
                    failed: false,
                })
            }
            Err(failure) => {
                self.emit(decision.level, correlation, method_name, InvocationEvent::EndKo);
                log_failure_chain(self.sink.as_ref(), correlation, method_name, &failure);

                if decision.rethrow || self.config.failure_mode == FailureMode::ObserveAndRethrow {
                    Err(failure)
                } else {
                    Ok(CallOutcome {
                        method: method_name.to_string(),
                        value: serde_json::Value::Null,
                        duration,
                        failed: true,
                    })
                }
            }
        }
    }

    /// One `Param` event per declared parameter, in declaration order.
    /// Serialization problems degrade to placeholders; this path never
    /// fails the call.
    fn log_params(
        &self,
        level: LogLevel,
        correlation: CorrelationId,
        descriptor: &MethodDescriptor,
        args: &[serde_json::Value],
    ) {
        for (index, name) in descriptor.params.iter().enumerate() {
            let value = match args.get(index) {
                Some(arg) => serde_json::to_string(arg)
                    .unwrap_or_else(|_| UNSERIALIZABLE_PARAM.to_string()),
                None => ABSENT_PARAM.to_string(),
            };
            self.emit(
                level,
                correlation,
                &descriptor.name,
                InvocationEvent::Param {
                    name: name.clone(),
                    value,
                },
            );
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        correlation: CorrelationId,
        method: &str,
        event: InvocationEvent,
    ) {
        self.sink
            .emit(&LogRecord::new(level, correlation, method, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Markers, ParamsMarker};
    use crate::registry::MethodHandler;
    use crate::sink::CaptureSink;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoHandler;

    #[async_trait]
    impl MethodHandler for EchoHandler {
        async fn call(&self, args: Vec<Value>) -> Result<Value> {
            Ok(Value::Array(args))
        }
    }

    struct FailingHandler {
        chain_len: usize,
    }

    #[async_trait]
    impl MethodHandler for FailingHandler {
        async fn call(&self, _args: Vec<Value>) -> Result<Value> {
            let mut err = anyhow!("cause 0");
            for i in 1..self.chain_len {
                err = err.context(format!("cause {i}"));
            }
            Err(err)
        }
    }

    fn build(
        markers: Markers,
        handler: impl MethodHandler + 'static,
        params: &[&str],
        config: InterceptorConfig,
    ) -> (Interceptor, Arc<CaptureSink>) {
        let mut builder = MethodRegistry::builder();
        builder.register(
            MethodDescriptor::new("svc.m").with_params(params.iter().copied()),
            markers,
            handler,
        );
        let sink = Arc::new(CaptureSink::new());
        let interceptor = Interceptor::new(builder.build(config.default_level), config)
            .with_sink(Arc::clone(&sink) as Arc<dyn LogSink>);
        (interceptor, sink)
    }

    fn kinds(sink: &CaptureSink) -> Vec<&'static str> {
        sink.records().iter().map(|r| r.event.kind()).collect()
    }

    #[tokio::test]
    async fn test_unmarked_method_start_end_only() {
        let (interceptor, sink) = build(
            Markers::none(),
            EchoHandler,
            &[],
            InterceptorConfig::default(),
        );

        let outcome = interceptor.invoke("svc.m", vec![json!(1)]).await.unwrap();
        assert_eq!(outcome.value, json!([1]));
        assert!(!outcome.failed);

        assert_eq!(kinds(&sink), vec!["start", "end_ok"]);
        assert!(sink.records().iter().all(|r| r.level == LogLevel::Info));
    }

    #[tokio::test]
    async fn test_disabled_emits_single_line_and_passes_value() {
        let (interceptor, sink) = build(
            Markers::at(LogLevel::Warn)
                .with_params(ParamsMarker::rethrowing(LogLevel::Debug))
                .disable(),
            EchoHandler,
            &["a"],
            InterceptorConfig::default(),
        );

        let outcome = interceptor.invoke("svc.m", vec![json!("x")]).await.unwrap();
        assert_eq!(outcome.value, json!(["x"]));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event, InvocationEvent::Disabled);
        // The disabled line keeps the base level.
        assert_eq!(records[0].level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_disabled_propagates_failure_unmodified() {
        let (interceptor, sink) = build(
            Markers::none().disable(),
            FailingHandler { chain_len: 3 },
            &[],
            InterceptorConfig::default(),
        );

        let err = interceptor.invoke("svc.m", vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), "cause 2");
        // No end/error events on the disabled path.
        assert_eq!(kinds(&sink), vec!["disabled"]);
    }

    #[tokio::test]
    async fn test_params_marker_logs_each_param_in_order() {
        let (interceptor, sink) = build(
            Markers::none().with_params(ParamsMarker::rethrowing(LogLevel::Debug)),
            EchoHandler,
            &["a", "b"],
            InterceptorConfig::default(),
        );

        interceptor
            .invoke("svc.m", vec![json!(1), json!(2)])
            .await
            .unwrap();

        assert_eq!(kinds(&sink), vec!["start", "param", "param", "end_ok"]);
        let records = sink.records();
        assert!(records.iter().all(|r| r.level == LogLevel::Debug));
        assert_eq!(
            records[1].event,
            InvocationEvent::Param {
                name: "a".to_string(),
                value: "1".to_string()
            }
        );
        assert_eq!(
            records[2].event,
            InvocationEvent::Param {
                name: "b".to_string(),
                value: "2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_params_marker_rethrows_after_chain() {
        let (interceptor, sink) = build(
            Markers::none().with_params(ParamsMarker::rethrowing(LogLevel::Debug)),
            FailingHandler { chain_len: 2 },
            &["a"],
            InterceptorConfig::default(),
        );

        let err = interceptor.invoke("svc.m", vec![json!(1)]).await.unwrap_err();
        assert_eq!(err.to_string(), "cause 1");

        assert_eq!(
            kinds(&sink),
            vec!["start", "param", "end_ko", "chain_link", "inner_cause", "chain_link"]
        );
        let records = sink.records();
        // End KO at the decision level, chain entries at error level.
        assert_eq!(records[2].level, LogLevel::Debug);
        assert_eq!(records[3].level, LogLevel::Error);
    }

    #[tokio::test]
    async fn test_failure_swallowed_by_default() {
        let (interceptor, sink) = build(
            Markers::none(),
            FailingHandler { chain_len: 2 },
            &[],
            InterceptorConfig::default(),
        );

        let outcome = interceptor.invoke("svc.m", vec![]).await.unwrap();
        assert_eq!(outcome.value, Value::Null);
        assert!(outcome.failed);
        assert_eq!(
            kinds(&sink),
            vec!["start", "end_ko", "chain_link", "inner_cause", "chain_link"]
        );
    }

    #[tokio::test]
    async fn test_observe_and_rethrow_forces_propagation() {
        let (interceptor, _sink) = build(
            Markers::none(),
            FailingHandler { chain_len: 1 },
            &[],
            InterceptorConfig::observe_and_rethrow(),
        );

        assert!(interceptor.invoke("svc.m", vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_arity_mismatch_logs_absent_marker() {
        let (interceptor, sink) = build(
            Markers::none().with_params(ParamsMarker::new(LogLevel::Info)),
            EchoHandler,
            &["a", "b"],
            InterceptorConfig::default(),
        );

        interceptor.invoke("svc.m", vec![json!(7)]).await.unwrap();

        let records = sink.records();
        assert_eq!(
            records[2].event,
            InvocationEvent::Param {
                name: "b".to_string(),
                value: ABSENT_PARAM.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_correlation_shared_across_calls_in_scope() {
        let (interceptor, sink) = build(
            Markers::none(),
            EchoHandler,
            &[],
            InterceptorConfig::default(),
        );

        interceptor.invoke("svc.m", vec![]).await.unwrap();
        interceptor.invoke("svc.m", vec![]).await.unwrap();

        let records = sink.records();
        let first = records[0].correlation;
        assert!(records.iter().all(|r| r.correlation == first));
    }

    #[tokio::test]
    async fn test_separate_interceptors_get_separate_ids() {
        let (a, sink_a) = build(
            Markers::none(),
            EchoHandler,
            &[],
            InterceptorConfig::default(),
        );
        let (b, sink_b) = build(
            Markers::none(),
            EchoHandler,
            &[],
            InterceptorConfig::default(),
        );

        a.invoke("svc.m", vec![]).await.unwrap();
        b.invoke("svc.m", vec![]).await.unwrap();

        assert_ne!(
            sink_a.records()[0].correlation,
            sink_b.records()[0].correlation
        );
    }

    #[tokio::test]
    async fn test_unknown_method_is_intercept_error() {
        let (interceptor, sink) = build(
            Markers::none(),
            EchoHandler,
            &[],
            InterceptorConfig::default(),
        );

        let err = interceptor.invoke("svc.missing", vec![]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InterceptError>(),
            Some(InterceptError::MethodNotFound(name)) if name == "svc.missing"
        ));
        assert!(sink.is_empty());
    }
}
