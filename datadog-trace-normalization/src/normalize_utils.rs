// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Pure helpers turning untrusted field content into canonical form. These
//! run once per span service plus once per meta key, so they pre-size their
//! buffers and short-circuit on already-clean input.

use crate::errors::NormalizeIssue;
use crate::utf8;

// DEFAULT_SERVICE_NAME is the service we assign a span when none is set and
// the tracer language gives us no better fallback
pub const DEFAULT_SERVICE_NAME: &str = "unnamed-service";
// DEFAULT_SPAN_NAME is the operation name we assign a span when its own
// cannot be salvaged
pub const DEFAULT_SPAN_NAME: &str = "unnamed_operation";

// MAX_SERVICE_LEN is the maximum byte length a service can have
pub const MAX_SERVICE_LEN: usize = 100;
// MAX_NAME_LEN is the maximum byte length an operation name can have
pub const MAX_NAME_LEN: usize = 100;
// MAX_RESOURCE_LEN is the maximum byte length a resource can have
pub const MAX_RESOURCE_LEN: usize = 5000;
// MAX_TYPE_LEN is the maximum byte length a span type can have
pub const MAX_TYPE_LEN: usize = 100;
// MAX_META_KEY_LEN is the maximum byte length of a meta key
pub const MAX_META_KEY_LEN: usize = 100;
// MAX_META_VAL_LEN is the maximum byte length of a meta value
pub const MAX_META_VAL_LEN: usize = 25000;
// MAX_TAG_LEN is the maximum byte length a canonical tag can have
pub const MAX_TAG_LEN: usize = 200;

/// Truncates `s` to at most `limit` bytes, backing up to the previous
/// character boundary so the result stays well-formed.
pub fn truncate_utf8(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    &s[..utf8::floor_char_boundary(s, limit)]
}

// fallback_service names a span whose service is missing: the tracer
// language when the receiver reported one, a fixed default otherwise.
pub(crate) fn fallback_service(lang: &str) -> String {
    if lang.is_empty() {
        return DEFAULT_SERVICE_NAME.to_owned();
    }
    lang.to_owned()
}

/// Normalizes a span service in place: invalid UTF-8 is cut at the first bad
/// byte, the remainder run through the tag canonicalizer, and the result
/// capped at [`MAX_SERVICE_LEN`]. Returns the issue that forced a rewrite,
/// if any.
pub fn normalize_service(svc: &mut String, lang: &str) -> Option<NormalizeIssue> {
    if svc.is_empty() {
        *svc = fallback_service(lang);
        return Some(NormalizeIssue::Empty);
    }
    if let Some(valid) = utf8::truncate_invalid(svc) {
        *svc = valid;
    }
    let tag = normalize_tag(svc);
    if tag.is_empty() {
        *svc = fallback_service(lang);
        return Some(NormalizeIssue::Invalid);
    }
    *svc = tag;
    if svc.len() > MAX_SERVICE_LEN {
        // the cut may expose an underscore the canonicalizer would not keep
        *svc = truncate_utf8(svc, MAX_SERVICE_LEN)
            .trim_end_matches('_')
            .to_owned();
        return Some(NormalizeIssue::TooLong);
    }
    None
}

/// Normalizes a span operation name in place: invalid UTF-8 is cut at the
/// first bad byte, the length capped at [`MAX_NAME_LEN`], and the remainder
/// rewritten into the metric-name alphabet. Returns the issue that forced a
/// rewrite, if any.
pub fn normalize_name(name: &mut String) -> Option<NormalizeIssue> {
    if name.is_empty() {
        *name = DEFAULT_SPAN_NAME.to_owned();
        return Some(NormalizeIssue::Empty);
    }
    if let Some(valid) = utf8::truncate_invalid(name) {
        *name = valid;
    }
    let mut issue = None;
    if name.len() > MAX_NAME_LEN {
        *name = truncate_utf8(name, MAX_NAME_LEN).to_owned();
        issue = Some(NormalizeIssue::TooLong);
    }
    match normalize_metric_name(name) {
        Some(metric_name) => {
            *name = metric_name;
            issue
        }
        None => {
            *name = DEFAULT_SPAN_NAME.to_owned();
            Some(NormalizeIssue::Invalid)
        }
    }
}

// normalize_metric_name rewrites a span name into the metric-name alphabet
// `[a-zA-Z][a-zA-Z0-9_.]*`, or None when no letter survives to start it.
pub(crate) fn normalize_metric_name(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    // a metric name must start with a letter, everything before one is cut
    let start = bytes.iter().position(|b| b.is_ascii_alphabetic())?;
    let mut out = String::with_capacity(name.len());
    for &b in &bytes[start..] {
        if b.is_ascii_alphanumeric() {
            out.push(char::from(b));
        } else if b == b'.' {
            // an underscore immediately before a period folds into it
            if out.ends_with('_') {
                out.pop();
            }
            out.push('.');
        } else if !out.ends_with(['.', '_']) {
            out.push('_');
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    Some(out)
}

/// Canonicalizes arbitrary text into a metric-safe tag: lowercased Unicode
/// letters, digits and `:./-`, with every other character class collapsed
/// into single underscores. Output is capped at [`MAX_TAG_LEN`] bytes.
pub fn normalize_tag(tag: &str) -> String {
    // Fast path: an already-canonical ASCII tag passes through as-is. For
    // most spans this skips the char-wise walk entirely.
    if is_normalized_ascii_tag(tag) {
        return tag.to_owned();
    }

    let mut out = String::with_capacity(tag.len());
    // code points examined so far; bounds the walk the same way the output
    // cap bounds emission, so separator-heavy input cannot scan forever
    let mut seen = 0usize;

    'walk: for chunk in tag.as_bytes().utf8_chunks() {
        for c in chunk.valid().chars() {
            if !push_tag_char(&mut out, c, &mut seen) {
                break 'walk;
            }
        }
        // each invalid byte reads as one replacement char, i.e. a separator
        for _ in chunk.invalid() {
            if !push_tag_char(&mut out, char::REPLACEMENT_CHARACTER, &mut seen) {
                break 'walk;
            }
        }
    }

    // a separator run at the end never made it past pending state
    if out.ends_with('_') {
        out.pop();
    }
    out
}

// push_tag_char classifies one code point and appends its canonical form to
// `out`. Returns false once either cap is hit and the walk must stop.
fn push_tag_char(out: &mut String, c: char, seen: &mut usize) -> bool {
    if *seen >= MAX_TAG_LEN {
        return false;
    }
    if c.is_uppercase() {
        *seen += 1;
        let mut lower = c.to_lowercase();
        if lower.len() == 1 {
            if let Some(lc) = lower.next() {
                return push_capped(out, lc);
            }
        }
        // multi-char lowercase expansions are dropped, matching the simple
        // case mapping clients expect
        return true;
    }
    if c.is_alphabetic() || c == ':' {
        *seen += 1;
        return push_capped(out, c);
    }
    if c.is_ascii_digit() || c == '.' || c == '/' || c == '-' {
        if out.is_empty() {
            // these cannot start a tag, trim them
            return true;
        }
        *seen += 1;
        return push_capped(out, c);
    }
    // separator: leading runs are trimmed, inner runs coalesce into one
    // underscore
    *seen += 1;
    if !out.is_empty() && !out.ends_with('_') {
        return push_capped(out, '_');
    }
    true
}

// push_capped appends `c` unless its encoding would cross the output cap.
fn push_capped(out: &mut String, c: char) -> bool {
    if out.len() + c.len_utf8() > MAX_TAG_LEN {
        return false;
    }
    out.push(c);
    true
}

// is_normalized_ascii_tag reports whether `tag` is already in canonical
// form, looking at ASCII only so the check stays a single byte scan.
pub(crate) fn is_normalized_ascii_tag(tag: &str) -> bool {
    if tag.is_empty() {
        return true;
    }
    if tag.len() > MAX_TAG_LEN {
        return false;
    }
    let bytes = tag.as_bytes();
    if !is_valid_ascii_start_char(bytes[0]) {
        return false;
    }
    let mut prev = bytes[0];
    for &b in &bytes[1..] {
        if is_valid_ascii_tag_char(b) {
            prev = b;
        } else if b == b'_' {
            // an underscore is only canonical between valid characters
            if prev == b'_' {
                return false;
            }
            prev = b;
        } else {
            return false;
        }
    }
    prev != b'_'
}

fn is_valid_ascii_start_char(c: u8) -> bool {
    c.is_ascii_lowercase() || c == b':'
}

fn is_valid_ascii_tag_char(c: u8) -> bool {
    is_valid_ascii_start_char(c) || c.is_ascii_digit() || c == b'.' || c == b'/' || c == b'-'
}
