// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Android binary symbol uploads.

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::api::api_client::BugSplatApiClient;
use crate::error::{ensure_not_empty, BugSplatError, Result};

/// Client for uploading Android binaries for server-side symbol extraction.
///
/// The backend runs `dump_syms` on the uploaded binary and responds with the
/// extracted debug-symbol module listing for verification.
pub struct AndroidClient {
	client: Arc<BugSplatApiClient>,
}

impl AndroidClient {
	/// Wraps an API client whose host and session the caller manages.
	pub fn new(client: Arc<BugSplatApiClient>) -> Self {
		Self { client }
	}

	/// Points the API client at the database's host and authenticates it
	/// when needed.
	pub async fn create(database: &str, client: Arc<BugSplatApiClient>) -> Result<Self> {
		ensure_not_empty(database, "database")?;

		client
			.set_host(format!("https://{database}.bugsplat.com"))
			.await;
		if !client.is_authenticated() {
			client.authenticate().await?;
		}

		Ok(Self::new(client))
	}

	/// Streams one Android binary (or `.so`) file to the symbol endpoint and
	/// returns the raw response.
	pub async fn upload_binary_file(&self, binary_file: &Path) -> Result<reqwest::Response> {
		if !self.client.is_authenticated() {
			return Err(BugSplatError::NotAuthenticated);
		}

		let file_name = binary_file
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();
		let len = tokio::fs::metadata(binary_file).await?.len();
		let file = tokio::fs::File::open(binary_file).await?;
		debug!(file = %file_name, len, "Uploading Android binary for symbol extraction");

		let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
			.file_name(file_name);
		let form = Form::new().part("file", part);

		self.client.post("/post/android/symbols", form).await
	}
}
