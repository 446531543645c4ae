// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbol upload orchestration.
//!
//! Wraps a [`BugSplatApiClient`], authenticating lazily, and fans batch
//! uploads out with bounded parallelism: all uploads are awaited and the
//! first error is surfaced.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tracing::info;

use crate::api::api_client::BugSplatApiClient;
use crate::api::versions::VersionsClient;
use crate::error::Result;

/// Upper bound on simultaneous symbol file uploads.
const MAX_CONCURRENT_UPLOADS: usize = 10;

/// Uploads debug symbol files associated with application versions.
pub struct SymbolUploader {
	client: Arc<BugSplatApiClient>,
}

impl SymbolUploader {
	pub fn new(client: Arc<BugSplatApiClient>) -> Self {
		Self { client }
	}

	/// Creates a `SymbolUploader` backed by email/password authentication.
	pub fn email_password(
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self> {
		Ok(Self::new(Arc::new(BugSplatApiClient::email_password(
			email, password,
		)?)))
	}

	/// Creates a `SymbolUploader` backed by OAuth2 client credentials.
	pub fn oauth2(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		Ok(Self::new(Arc::new(BugSplatApiClient::oauth2(
			client_id,
			client_secret,
		)?)))
	}

	/// Uploads one symbol file, authenticating first when needed.
	pub async fn upload_symbol_file(
		&self,
		database: &str,
		application: &str,
		version: &str,
		symbol_file: &Path,
	) -> Result<reqwest::Response> {
		self.upload_symbol_file_with_signature(database, application, version, symbol_file, None)
			.await
	}

	/// Uploads one symbol file with an optional debug id signature.
	pub async fn upload_symbol_file_with_signature(
		&self,
		database: &str,
		application: &str,
		version: &str,
		symbol_file: &Path,
		signature: Option<&str>,
	) -> Result<reqwest::Response> {
		self.ensure_authenticated().await?;
		VersionsClient::new(Arc::clone(&self.client))
			.upload_symbol_file(database, application, version, symbol_file, signature)
			.await
	}

	/// Uploads a collection of symbol files with at most
	/// [`MAX_CONCURRENT_UPLOADS`] in flight.
	///
	/// The full input set is awaited; when any upload fails the first error
	/// is returned.
	pub async fn upload_symbol_files(
		&self,
		database: &str,
		application: &str,
		version: &str,
		symbol_files: &[PathBuf],
	) -> Result<Vec<reqwest::Response>> {
		self.ensure_authenticated().await?;
		info!(count = symbol_files.len(), "Uploading symbol files");

		let results: Vec<Result<reqwest::Response>> =
			futures::stream::iter(symbol_files.iter().map(|symbol_file| {
				let versions = VersionsClient::new(Arc::clone(&self.client));
				async move {
					versions
						.upload_symbol_file(database, application, version, symbol_file, None)
						.await
				}
			}))
			.buffer_unordered(MAX_CONCURRENT_UPLOADS)
			.collect()
			.await;

		results.into_iter().collect()
	}

	async fn ensure_authenticated(&self) -> Result<()> {
		if !self.client.is_authenticated() {
			self.client.authenticate().await?;
		}
		Ok(())
	}
}
