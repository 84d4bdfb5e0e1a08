// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![deny(clippy::all)]

pub mod errors;
pub mod info;
pub mod normalize_utils;
pub mod normalizer;
pub(crate) mod utf8;
