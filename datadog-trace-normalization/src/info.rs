// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ingestion health counters, one set per (tenant, tracer language) tuple.
//!
//! The reason tags reported by [`TracesDropped::tag_values`] and
//! [`TracesMalformed::tag_values`] are an operational contract consumed by
//! dashboards and monitors; renaming one breaks them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A single monotonic counter. Increments are relaxed: concurrent workers
/// race benignly and snapshots only need eventual consistency.
#[derive(Debug, Default)]
pub struct Count(AtomicU64);

impl Count {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counts traces (or single spans) rejected whole, by reason.
#[derive(Debug, Default)]
pub struct TracesDropped {
    pub empty_trace: Count,
    pub trace_id_zero: Count,
    pub span_id_zero: Count,
    pub foreign_span: Count,
}

impl TracesDropped {
    /// Snapshot of all drop counters keyed by their stable reason tag.
    pub fn tag_values(&self) -> HashMap<&'static str, u64> {
        HashMap::from([
            ("empty_trace", self.empty_trace.get()),
            ("trace_id_zero", self.trace_id_zero.get()),
            ("span_id_zero", self.span_id_zero.get()),
            ("foreign_span", self.foreign_span.get()),
        ])
    }
}

/// Counts traces accepted after one of their spans needed a repair, by reason.
#[derive(Debug, Default)]
pub struct TracesMalformed {
    pub duplicate_span_id: Count,
    pub service_empty: Count,
    pub service_truncate: Count,
    pub span_name_empty: Count,
    pub span_name_truncate: Count,
    pub span_name_invalid: Count,
    pub resource_empty: Count,
    pub invalid_start_date: Count,
    pub invalid_duration: Count,
    pub type_truncate: Count,
    pub invalid_http_status_code: Count,
}

impl TracesMalformed {
    /// Snapshot of all repair counters keyed by their stable reason tag.
    pub fn tag_values(&self) -> HashMap<&'static str, u64> {
        HashMap::from([
            ("duplicate_span_id", self.duplicate_span_id.get()),
            ("service_empty", self.service_empty.get()),
            ("service_truncate", self.service_truncate.get()),
            ("span_name_empty", self.span_name_empty.get()),
            ("span_name_truncate", self.span_name_truncate.get()),
            ("span_name_invalid", self.span_name_invalid.get()),
            ("resource_empty", self.resource_empty.get()),
            ("invalid_start_date", self.invalid_start_date.get()),
            ("invalid_duration", self.invalid_duration.get()),
            ("type_truncate", self.type_truncate.get()),
            ("invalid_http_status_code", self.invalid_http_status_code.get()),
        ])
    }
}

/// Counters for one tracer, shared by every worker handling its requests.
/// The normalizer only writes into the two counter groups; `lang` is read as
/// the fallback service name for spans that arrive without one.
#[derive(Debug, Default)]
pub struct TagStats {
    /// Language of the tracer library, e.g. "python", as reported by the
    /// receiver's request headers. May be empty.
    pub lang: String,
    pub traces_dropped: TracesDropped,
    pub traces_malformed: TracesMalformed,
}
