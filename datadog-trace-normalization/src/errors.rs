// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// A structurally unrecoverable input. The matching `TracesDropped` counter
/// is incremented before this error is returned, and the caller drops the
/// trace (or span) whole.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("trace is empty (reason:empty_trace)")]
    EmptyTrace,
    #[error("trace has foreign span (reason:foreign_span)")]
    ForeignSpan,
    #[error("TraceID is zero (reason:trace_id_zero)")]
    TraceIdZero,
    #[error("SpanID is zero (reason:span_id_zero)")]
    SpanIdZero,
}

impl NormalizeError {
    /// Stable reason tag naming the counter bucket this rejection landed in.
    pub fn reason(&self) -> &'static str {
        match self {
            NormalizeError::EmptyTrace => "empty_trace",
            NormalizeError::ForeignSpan => "foreign_span",
            NormalizeError::TraceIdZero => "trace_id_zero",
            NormalizeError::SpanIdZero => "span_id_zero",
        }
    }
}

/// Why a field helper had to rewrite its input. The span normalizer maps
/// each issue onto the matching `TracesMalformed` counter.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum NormalizeIssue {
    // the field was empty and a fallback value was filled in
    #[error("empty")]
    Empty,
    // the field exceeded its maximum byte length and was truncated
    #[error("too long")]
    TooLong,
    // nothing usable survived normalization, a fallback was filled in
    #[error("invalid")]
    Invalid,
}
