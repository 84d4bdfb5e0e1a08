// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::time::SystemTime;

use datadog_trace_protobuf::pb;
use tracing::debug;

use crate::errors::{NormalizeError, NormalizeIssue};
use crate::info::TagStats;
use crate::normalize_utils::{self, MAX_TYPE_LEN};
use crate::utf8;

// an arbitrary cutoff to spot weird-looking values
// nanoseconds since epoch on Jan 1, 2000
const YEAR_2000_NANOSEC_TS: i64 = 946684800000000000;

/// normalize validates and repairs a single span in place. Every repair
/// increments the matching `TracesMalformed` counter on `ts`; the span is
/// only rejected (with the `TracesDropped` counter incremented first) when
/// one of its identifiers is zero.
pub fn normalize(ts: &TagStats, s: &mut pb::Span) -> Result<(), NormalizeError> {
    match normalize_utils::normalize_service(&mut s.service, &ts.lang) {
        Some(NormalizeIssue::Empty) => {
            ts.traces_malformed.service_empty.inc();
            debug!(
                "Fixing malformed trace. Service is empty (reason:service_empty), setting span.service={}",
                s.service
            );
        }
        Some(NormalizeIssue::TooLong) => {
            ts.traces_malformed.service_truncate.inc();
            debug!(
                "Fixing malformed trace. Service is too long (reason:service_truncate), truncating span.service to length={}",
                normalize_utils::MAX_SERVICE_LEN
            );
        }
        Some(NormalizeIssue::Invalid) => {
            // no usable characters survived; the fallback keeps the span
            // addressable without a dedicated counter bucket
            debug!(
                "Fixing malformed trace. Service is not a valid tag, setting span.service={}",
                s.service
            );
        }
        None => {}
    }

    match normalize_utils::normalize_name(&mut s.name) {
        Some(NormalizeIssue::Empty) => {
            ts.traces_malformed.span_name_empty.inc();
            debug!(
                "Fixing malformed trace. Name is empty (reason:span_name_empty), setting span.name={}",
                s.name
            );
        }
        Some(NormalizeIssue::TooLong) => {
            ts.traces_malformed.span_name_truncate.inc();
            debug!(
                "Fixing malformed trace. Name is too long (reason:span_name_truncate), truncating span.name to length={}",
                normalize_utils::MAX_NAME_LEN
            );
        }
        Some(NormalizeIssue::Invalid) => {
            ts.traces_malformed.span_name_invalid.inc();
            debug!(
                "Fixing malformed trace. Name is invalid (reason:span_name_invalid), setting span.name={}",
                s.name
            );
        }
        None => {}
    }

    if s.resource.is_empty() {
        ts.traces_malformed.resource_empty.inc();
        debug!(
            "Fixing malformed trace. Resource is empty (reason:resource_empty), setting span.resource={}",
            s.name
        );
        s.resource = s.name.clone();
    } else if let Some(fixed) = utf8::replace_invalid(&s.resource) {
        s.resource = fixed;
    }

    if s.trace_id == 0 {
        ts.traces_dropped.trace_id_zero.inc();
        return Err(NormalizeError::TraceIdZero);
    }
    if s.span_id == 0 {
        ts.traces_dropped.span_id_zero.inc();
        return Err(NormalizeError::SpanIdZero);
    }

    // ParentID, TraceID and SpanID set by the client may all be equal: the
    // legacy Zipkin convention for a root span. Clear the parent to make it
    // a proper root.
    if s.parent_id == s.trace_id && s.parent_id == s.span_id {
        s.parent_id = 0;
    }

    // Start and Duration are nanosecond timestamps. A start before year
    // 2000 is almost certainly a unit bug in the client, so it is discarded.
    if s.duration < 0 {
        ts.traces_malformed.invalid_duration.inc();
        debug!(
            "Fixing malformed trace. Duration is invalid (reason:invalid_duration), setting span.duration=0"
        );
        s.duration = 0;
    }
    if s.start.checked_add(s.duration).is_none() {
        ts.traces_malformed.invalid_duration.inc();
        debug!(
            "Fixing malformed trace. Duration is too large and causes overflow (reason:invalid_duration), setting span.duration=0"
        );
        s.duration = 0;
    }
    if s.start < YEAR_2000_NANOSEC_TS {
        ts.traces_malformed.invalid_start_date.inc();
        debug!(
            "Fixing malformed trace. Start date is invalid (reason:invalid_start_date), setting span.start=time.now()"
        );
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);
        s.start = now - s.duration;
        if s.start < 0 {
            s.start = now;
        }
    }

    if let Some(fixed) = utf8::replace_invalid(&s.r#type) {
        s.r#type = fixed;
    }
    if s.r#type.len() > MAX_TYPE_LEN {
        ts.traces_malformed.type_truncate.inc();
        debug!(
            "Fixing malformed trace. Type is too long (reason:type_truncate), truncating span.type to length={}",
            MAX_TYPE_LEN
        );
        s.r#type = normalize_utils::truncate_utf8(&s.r#type, MAX_TYPE_LEN).to_owned();
    }

    // Meta keys and values are free text: invalid bytes stay visible as
    // U+FFFD instead of being dropped.
    let meta_dirty = s
        .meta
        .iter()
        .any(|(k, v)| !utf8::is_valid(k) || !utf8::is_valid(v));
    if meta_dirty {
        s.meta = std::mem::take(&mut s.meta)
            .into_iter()
            .map(|(k, v)| (utf8::into_valid(k), utf8::into_valid(v)))
            .collect();
    }

    if let Some(env) = s.meta.get_mut("env") {
        // environment names compare case-insensitively downstream
        if env.chars().any(char::is_uppercase) {
            *env = env.to_lowercase();
        }
    }

    let bad_status_code = s
        .meta
        .get("http.status_code")
        .is_some_and(|code| !is_valid_status_code(code));
    if bad_status_code {
        ts.traces_malformed.invalid_http_status_code.inc();
        debug!(
            "Fixing malformed trace. HTTP status code is invalid (reason:invalid_http_status_code), dropping invalid http.status_code"
        );
        s.meta.remove("http.status_code");
    }

    Ok(())
}

/// normalize_trace validates a whole trace:
/// * an empty trace or a trace ID discrepancy between two spans drops the
///   trace outright,
/// * a span rejected for a zero identifier propagates and drops the trace,
/// * later spans reusing an already-seen span ID are skipped, first
///   occurrence wins, and the trace is still accepted.
pub fn normalize_trace(ts: &TagStats, trace: &mut pb::Trace) -> Result<(), NormalizeError> {
    if trace.is_empty() {
        ts.traces_dropped.empty_trace.inc();
        return Err(NormalizeError::EmptyTrace);
    }
    let first_trace_id = trace[0].trace_id;

    let mut seen_span_ids = HashSet::with_capacity(trace.len());
    let mut kept = Vec::with_capacity(trace.len());
    for mut span in trace.drain(..) {
        if span.trace_id != first_trace_id {
            ts.traces_dropped.foreign_span.inc();
            return Err(NormalizeError::ForeignSpan);
        }
        match normalize(ts, &mut span) {
            Ok(()) => {}
            Err(err @ (NormalizeError::TraceIdZero | NormalizeError::SpanIdZero)) => {
                return Err(err);
            }
            // already counted by normalize; shed just this span
            Err(_) => continue,
        }
        if !seen_span_ids.insert(span.span_id) {
            ts.traces_malformed.duplicate_span_id.inc();
            debug!(
                "Found malformed trace with duplicate span ID (reason:duplicate_span_id), skipping span.span_id={}",
                span.span_id
            );
            continue;
        }
        kept.push(span);
    }
    *trace = kept;
    Ok(())
}

// is_valid_status_code accepts anything that parses to an integer within
// the range HTTP defines.
pub(crate) fn is_valid_status_code(sc: &str) -> bool {
    if let Ok(code) = sc.parse::<i64>() {
        return (100..600).contains(&code);
    }
    false
}
