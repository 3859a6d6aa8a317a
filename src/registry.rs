// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Method registry and handler trait.
//!
//! Hosts register each interceptable method once: a descriptor (qualified
//! name plus declared parameter names), its instrumentation markers, and
//! the handler that performs the real call. Markers are resolved into a
//! [`Decision`] at build time, so an invocation only does a map lookup and
//! never introspects markers per call.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::policy::{resolve, Decision, LogLevel, Markers};

/// The wrapped call: invoke the real method and return its result or its
/// failure. Implementations must not log through the interceptor's sink
/// themselves; the interceptor does that around the call.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Run the real method with the runtime argument values, in
    /// declaration order.
    async fn call(&self, args: Vec<serde_json::Value>) -> Result<serde_json::Value>;
}

/// Identity and declared parameters of an interceptable method.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MethodDescriptor {
    /// Qualified name, e.g. `"billing.Invoices.close"`.
    pub name: String,

    /// Declared parameter names, in declaration order.
    pub params: Vec<String>,
}

impl MethodDescriptor {
    /// Descriptor for a method without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Attach the declared parameter names.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }
}

/// One registered method with its precomputed decision.
pub(crate) struct RegisteredMethod {
    pub(crate) descriptor: MethodDescriptor,
    pub(crate) decision: Decision,
    pub(crate) handler: Arc<dyn MethodHandler>,
}

/// Registry of interceptable methods, maps qualified names to handlers
/// and their resolved logging decisions. Immutable after build; share it
/// with `Arc`.
pub struct MethodRegistry {
    methods: HashMap<String, RegisteredMethod>,
}

impl MethodRegistry {
    /// Start building a registry.
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::new()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&RegisteredMethod> {
        self.methods.get(name)
    }

    /// Check if a method is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Resolved decision for a method, if registered.
    pub fn decision(&self, name: &str) -> Option<Decision> {
        self.methods.get(name).map(|m| m.decision)
    }

    /// Descriptors of all registered methods.
    pub fn descriptors(&self) -> Vec<&MethodDescriptor> {
        self.methods.values().map(|m| &m.descriptor).collect()
    }

    /// Names of all registered methods.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }
}

/// Builder for constructing a [`MethodRegistry`].
pub struct MethodRegistryBuilder {
    base_markers: Markers,
    methods: Vec<(MethodDescriptor, Markers, Arc<dyn MethodHandler>)>,
}

impl MethodRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            base_markers: Markers::none(),
            methods: Vec::new(),
        }
    }

    /// Base markers inherited by every registered method, the analogue of
    /// declaring the base marker on the type rather than each method.
    /// Level and the off switch are inherited; a params marker is not.
    pub fn base_markers(&mut self, markers: Markers) -> &mut Self {
        self.base_markers = markers;
        self
    }

    /// Register a method handler with its markers.
    pub fn register<H: MethodHandler + 'static>(
        &mut self,
        descriptor: MethodDescriptor,
        markers: Markers,
        handler: H,
    ) -> &mut Self {
        self.register_arc(descriptor, markers, Arc::new(handler))
    }

    /// Register an already-shared handler. A later registration under the
    /// same name replaces the earlier one.
    pub fn register_arc(
        &mut self,
        descriptor: MethodDescriptor,
        markers: Markers,
        handler: Arc<dyn MethodHandler>,
    ) -> &mut Self {
        self.methods.push((descriptor, markers, handler));
        self
    }

    /// Build the registry, resolving every marker set into its decision.
    ///
    /// `default_level` applies to methods whose effective markers declare
    /// no base level.
    pub fn build(self, default_level: LogLevel) -> MethodRegistry {
        let base = self.base_markers;
        let mut methods = HashMap::new();
        for (descriptor, markers, handler) in self.methods {
            let effective = markers.inherit_from(&base);
            methods.insert(
                descriptor.name.clone(),
                RegisteredMethod {
                    descriptor,
                    decision: resolve(&effective, default_level),
                    handler,
                },
            );
        }
        MethodRegistry { methods }
    }
}

impl Default for MethodRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
