// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Creates a new HTTP client with the standard BugSplat User-Agent header.
///
/// The User-Agent format is: `bugsplat-rust/{platform}/{version}`
/// Example: `bugsplat-rust/linux-x86_64/0.1.0`
pub fn new_client() -> Client {
	builder().build().expect("failed to build HTTP client")
}

/// Creates a new HTTP client builder with the standard BugSplat User-Agent
/// header.
///
/// Use this when you need to customize the client (e.g., disable the
/// timeout for object storage uploads).
///
/// # Example
/// ```ignore
/// let client = bugsplat_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard BugSplat User-Agent string.
///
/// Format: `bugsplat-rust/{platform}/{version}`
pub fn user_agent() -> String {
	format!(
		"bugsplat-rust/{}-{}/{}",
		std::env::consts::OS,
		std::env::consts::ARCH,
		env!("CARGO_PKG_VERSION")
	)
}
