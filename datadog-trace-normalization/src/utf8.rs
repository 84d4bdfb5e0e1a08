// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Byte-level repair for field content that arrived off the wire without
//! UTF-8 validation. Two policies exist on purpose: fields feeding metrics
//! are cut at the first invalid byte, free-text fields keep their content
//! with invalid bytes made visible as U+FFFD.

use std::borrow::Cow;

/// True when `s` holds well-formed UTF-8.
pub(crate) fn is_valid(s: &str) -> bool {
    std::str::from_utf8(s.as_bytes()).is_ok()
}

/// Longest well-formed prefix of `s` as an owned string, or `None` when `s`
/// is already clean.
pub(crate) fn truncate_invalid(s: &str) -> Option<String> {
    match std::str::from_utf8(s.as_bytes()) {
        Ok(_) => None,
        Err(err) => {
            let prefix = &s.as_bytes()[..err.valid_up_to()];
            Some(String::from_utf8_lossy(prefix).into_owned())
        }
    }
}

/// Rewrite of `s` with each maximal invalid byte sequence replaced by
/// U+FFFD, or `None` when `s` is already clean.
pub(crate) fn replace_invalid(s: &str) -> Option<String> {
    match String::from_utf8_lossy(s.as_bytes()) {
        Cow::Borrowed(_) => None,
        Cow::Owned(fixed) => Some(fixed),
    }
}

/// Consuming variant of [`replace_invalid`]: hands back the input untouched
/// when it is already clean.
pub(crate) fn into_valid(s: String) -> String {
    match replace_invalid(&s) {
        Some(fixed) => fixed,
        None => s,
    }
}

/// Largest index not past `index` that lies on a character boundary.
/// Mirror of the unstable `str::floor_char_boundary`.
#[inline]
pub(crate) fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let lower_bound = index.saturating_sub(3);
        let new_index = s.as_bytes()[lower_bound..=index]
            .iter()
            .rposition(|b| (*b as i8) >= -0x40);
        // a character is at most 4 bytes wide, so the window holds a boundary
        lower_bound + new_index.unwrap_or(0)
    }
}
