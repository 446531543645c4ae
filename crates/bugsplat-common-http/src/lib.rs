// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for the BugSplat SDK.
//!
//! Every client in the SDK is built through this crate so outgoing requests
//! carry a consistent `User-Agent` header.

mod client;

pub use client::{builder, new_client, user_agent};
