// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![deny(clippy::all)]

#[rustfmt::skip]
pub mod pb {
    include!("pb.rs");
}
