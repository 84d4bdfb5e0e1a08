// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Trace is an ordered collection of spans sharing one trace ID, presented
/// together the way the receiver decoded them.
pub type Trace = ::std::vec::Vec<Span>;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Span {
    /// service is the name of the service with which this span is associated.
    #[prost(string, tag="1")]
    pub service: std::string::String,
    /// name is the operation name of this span.
    #[prost(string, tag="2")]
    pub name: std::string::String,
    /// resource is the resource name of this span, also sometimes called the endpoint (for web spans).
    #[prost(string, tag="3")]
    pub resource: std::string::String,
    /// traceID is the ID of the trace to which this span belongs.
    #[prost(uint64, tag="4")]
    pub trace_id: u64,
    /// spanID is the ID of this span.
    #[prost(uint64, tag="5")]
    pub span_id: u64,
    /// parentID is the ID of this span's parent, or zero if this span has no parent.
    #[prost(uint64, tag="6")]
    pub parent_id: u64,
    /// start is the number of nanoseconds between the Unix epoch and the beginning of this span.
    #[prost(int64, tag="7")]
    pub start: i64,
    /// duration is the time length of this span in nanoseconds.
    #[prost(int64, tag="8")]
    pub duration: i64,
    /// error is 1 if there is an error associated with this span, or 0 if there is not.
    #[prost(int32, tag="9")]
    pub error: i32,
    /// meta is a mapping from tag name to tag value for string-valued tags.
    #[prost(map="string, string", tag="10")]
    pub meta: ::std::collections::HashMap<std::string::String, std::string::String>,
    /// metrics is a mapping from tag name to tag value for numeric-valued tags.
    #[prost(map="string, double", tag="11")]
    pub metrics: ::std::collections::HashMap<std::string::String, f64>,
    /// type is the type of the service with which this span is associated.  Example values: web, db, lambda.
    #[prost(string, tag="12")]
    pub r#type: std::string::String,
    /// meta_struct is a registry of structured "other" data used by, e.g., AppSec.
    #[prost(map="string, bytes", tag="13")]
    pub meta_struct: ::std::collections::HashMap<std::string::String, std::vec::Vec<u8>>,
}
