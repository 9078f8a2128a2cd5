//! Per-call request context
//!
//! `AccessControlContext` carries the request metadata the engine attaches
//! to every access-control call. The gate never interprets it; fields are
//! forwarded verbatim to the metastore when a lookup is needed.

use crate::types::QueryId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Sink for non-fatal warnings raised while serving a query
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Mutex<Vec<String>>,
}

impl WarningCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning
    pub fn add(&self, warning: impl Into<String>) {
        self.warnings.lock().push(warning.into());
    }

    /// Snapshot of the warnings recorded so far, in insertion order
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.lock().is_empty()
    }
}

/// Aggregated value of one runtime metric
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeMetric {
    pub sum: i64,
    pub count: u64,
    pub min: i64,
    pub max: i64,
}

impl RuntimeMetric {
    const fn single(value: i64) -> Self {
        Self {
            sum: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    fn record(&mut self, value: i64) {
        self.sum = self.sum.saturating_add(value);
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Per-query runtime metrics sink
#[derive(Debug, Default)]
pub struct RuntimeStats {
    metrics: DashMap<String, RuntimeMetric>,
}

impl RuntimeStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample to the named metric, creating it on first use
    pub fn add_metric_value(&self, name: &str, value: i64) {
        self.metrics
            .entry(name.to_string())
            .and_modify(|m| m.record(value))
            .or_insert_with(|| RuntimeMetric::single(value));
    }

    #[must_use]
    pub fn metric(&self, name: &str) -> Option<RuntimeMetric> {
        self.metrics.get(name).map(|m| *m)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Request metadata attached to an access-control call
#[derive(Clone)]
pub struct AccessControlContext {
    query_id: QueryId,
    source: Option<String>,
    client_info: Option<String>,
    client_tags: BTreeSet<String>,
    warning_collector: Arc<WarningCollector>,
    runtime_stats: Arc<RuntimeStats>,
}

impl AccessControlContext {
    /// Start building a context for the given query
    pub fn builder(query_id: impl Into<QueryId>) -> AccessControlContextBuilder {
        AccessControlContextBuilder::new(query_id.into())
    }

    #[must_use]
    pub const fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn client_info(&self) -> Option<&str> {
        self.client_info.as_deref()
    }

    #[must_use]
    pub const fn client_tags(&self) -> &BTreeSet<String> {
        &self.client_tags
    }

    #[must_use]
    pub const fn warning_collector(&self) -> &Arc<WarningCollector> {
        &self.warning_collector
    }

    #[must_use]
    pub const fn runtime_stats(&self) -> &Arc<RuntimeStats> {
        &self.runtime_stats
    }
}

impl fmt::Debug for AccessControlContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControlContext")
            .field("query_id", &self.query_id)
            .field("source", &self.source)
            .field("client_info", &self.client_info)
            .field("client_tags", &self.client_tags)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AccessControlContext`]
#[derive(Debug)]
pub struct AccessControlContextBuilder {
    query_id: QueryId,
    source: Option<String>,
    client_info: Option<String>,
    client_tags: BTreeSet<String>,
    warning_collector: Option<Arc<WarningCollector>>,
    runtime_stats: Option<Arc<RuntimeStats>>,
}

impl AccessControlContextBuilder {
    const fn new(query_id: QueryId) -> Self {
        Self {
            query_id,
            source: None,
            client_info: None,
            client_tags: BTreeSet::new(),
            warning_collector: None,
            runtime_stats: None,
        }
    }

    /// Client-supplied source string (e.g. `presto-cli`)
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn client_info(mut self, client_info: impl Into<String>) -> Self {
        self.client_info = Some(client_info.into());
        self
    }

    #[must_use]
    pub fn client_tag(mut self, tag: impl Into<String>) -> Self {
        self.client_tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn client_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Share an existing warning sink (a fresh one is created otherwise)
    #[must_use]
    pub fn warning_collector(mut self, collector: Arc<WarningCollector>) -> Self {
        self.warning_collector = Some(collector);
        self
    }

    /// Share an existing metrics sink (a fresh one is created otherwise)
    #[must_use]
    pub fn runtime_stats(mut self, stats: Arc<RuntimeStats>) -> Self {
        self.runtime_stats = Some(stats);
        self
    }

    #[must_use]
    pub fn build(self) -> AccessControlContext {
        AccessControlContext {
            query_id: self.query_id,
            source: self.source,
            client_info: self.client_info,
            client_tags: self.client_tags,
            warning_collector: self.warning_collector.unwrap_or_default(),
            runtime_stats: self.runtime_stats.unwrap_or_default(),
        }
    }
}
