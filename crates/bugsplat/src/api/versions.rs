// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Versions API: listing application versions and uploading symbol files.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::multipart::Form;
use tracing::debug;

use crate::api::api_client::BugSplatApiClient;
use crate::error::{ensure_not_empty, ensure_success, BugSplatError, Result};
use crate::json::parse_presigned_url;
use crate::s3::S3Client;
use crate::zip::TempZip;

/// Client for the BugSplat Versions API.
///
/// Requires an already-authenticated [`BugSplatApiClient`]; callers that want
/// lazy authentication should go through
/// [`SymbolUploader`](crate::SymbolUploader).
pub struct VersionsClient {
	client: Arc<BugSplatApiClient>,
	s3: S3Client,
}

impl VersionsClient {
	pub fn new(client: Arc<BugSplatApiClient>) -> Self {
		Self::with_s3_client(client, S3Client::new())
	}

	/// Builds a client around a caller-supplied object storage client.
	pub fn with_s3_client(client: Arc<BugSplatApiClient>, s3: S3Client) -> Self {
		Self { client, s3 }
	}

	/// Lists applications and versions with crashes and/or symbols for a
	/// database.
	pub async fn get_versions(&self, database: &str) -> Result<reqwest::Response> {
		ensure_not_empty(database, "database")?;
		self.ensure_authenticated()?;

		let response = self
			.client
			.get(&format!("/api/versions?database={database}"))
			.await?;
		ensure_success(response).await
	}

	/// Uploads one symbol file for an application version.
	///
	/// The file is zipped into a single-entry archive under a
	/// collision-resistant temporary name; the archive is deleted on every
	/// exit path. Supplying a `signature` (debug id) activates the backend's
	/// signature-matching path by also sending the module name and the
	/// file's last-write time.
	pub async fn upload_symbol_file(
		&self,
		database: &str,
		application: &str,
		version: &str,
		symbol_file: &Path,
		signature: Option<&str>,
	) -> Result<reqwest::Response> {
		ensure_not_empty(database, "database")?;
		ensure_not_empty(application, "application")?;
		ensure_not_empty(version, "version")?;
		self.ensure_authenticated()?;

		let temp_zip = TempZip::create(&[symbol_file])?;
		// The temp zip is dropped (and deleted) whether or not the upload
		// succeeds.
		self.upload_symbol_zip(database, application, version, symbol_file, &temp_zip, signature)
			.await
	}

	async fn upload_symbol_zip(
		&self,
		database: &str,
		application: &str,
		version: &str,
		symbol_file: &Path,
		temp_zip: &TempZip,
		signature: Option<&str>,
	) -> Result<reqwest::Response> {
		let mut form = Form::new()
			.text("database", database.to_string())
			.text("appName", application.to_string())
			.text("appVersion", version.to_string())
			.text("size", temp_zip.size().to_string())
			.text("symFileName", temp_zip.file_name().to_string());

		if let Some(signature) = signature {
			let module_name = symbol_file
				.file_name()
				.map(|name| name.to_string_lossy().into_owned())
				.unwrap_or_default();
			let modified = std::fs::metadata(symbol_file)?.modified()?;
			let last_modified = DateTime::<Utc>::from(modified).timestamp();

			form = form
				.text("SendPdbsVersion", "bsv1")
				.text("moduleName", module_name)
				.text("lastModified", last_modified.to_string())
				.text("dbgId", signature.to_string());
		}

		debug!(
			sym_file_name = temp_zip.file_name(),
			size = temp_zip.size(),
			"Requesting symbol upload URL"
		);
		let response = ensure_success(self.client.post("/api/versions", form).await?).await?;
		let presigned_url =
			parse_presigned_url(&response.text().await?, "symbol upload url response")?;

		let upload = self.s3.upload_file(&presigned_url, temp_zip.path()).await?;
		ensure_success(upload).await
	}

	fn ensure_authenticated(&self) -> Result<()> {
		if !self.client.is_authenticated() {
			return Err(BugSplatError::NotAuthenticated);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{body_string_contains, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	const DATABASE: &str = "fred";
	const APPLICATION: &str = "my-rust-crasher";
	const VERSION: &str = "1.0";

	async fn authenticated_client(server: &MockServer) -> Arc<BugSplatApiClient> {
		Mock::given(method("POST"))
			.and(path("/api/authenticatev3"))
			.respond_with(
				ResponseTemplate::new(200)
					.insert_header("Set-Cookie", "xsrf-token=abc123; Path=/"),
			)
			.mount(server)
			.await;

		let client =
			BugSplatApiClient::email_password("fred@bedrock.com", "hunter2").unwrap();
		client.set_host(server.uri()).await;
		client.authenticate().await.unwrap();
		Arc::new(client)
	}

	fn write_symbol_file(dir: &Path, name: &str) -> std::path::PathBuf {
		let path = dir.join(name);
		std::fs::write(&path, b"debug info").unwrap();
		path
	}

	#[tokio::test]
	async fn unauthenticated_client_is_rejected_before_any_request() {
		let client =
			Arc::new(BugSplatApiClient::email_password("fred@bedrock.com", "hunter2").unwrap());
		let versions = VersionsClient::new(client);

		let err = versions.get_versions(DATABASE).await.unwrap_err();
		assert!(matches!(err, BugSplatError::NotAuthenticated));

		let dir = tempfile::tempdir().unwrap();
		let symbol_file = write_symbol_file(dir.path(), "app.pdb");
		let err = versions
			.upload_symbol_file(DATABASE, APPLICATION, VERSION, &symbol_file, None)
			.await
			.unwrap_err();
		assert!(matches!(err, BugSplatError::NotAuthenticated));
	}

	#[tokio::test]
	async fn upload_symbol_file_streams_zip_to_presigned_url() {
		let server = MockServer::start().await;
		let client = authenticated_client(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/versions"))
			.and(body_string_contains("symFileName"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"url": format!("{}/upload", server.uri())
			})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/upload"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let dir = tempfile::tempdir().unwrap();
		let symbol_file = write_symbol_file(dir.path(), "app.pdb");

		let response = VersionsClient::new(client)
			.upload_symbol_file(DATABASE, APPLICATION, VERSION, &symbol_file, None)
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 200);
	}

	#[tokio::test]
	async fn signature_adds_send_pdbs_fields() {
		let server = MockServer::start().await;
		let client = authenticated_client(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/versions"))
			.and(body_string_contains("SendPdbsVersion"))
			.and(body_string_contains("bsv1"))
			.and(body_string_contains("moduleName"))
			.and(body_string_contains("lastModified"))
			.and(body_string_contains("dbgId"))
			.and(body_string_contains("1A2B3C"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"url": format!("{}/upload", server.uri())
			})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/upload"))
			.respond_with(ResponseTemplate::new(200))
			.mount(&server)
			.await;

		let dir = tempfile::tempdir().unwrap();
		let symbol_file = write_symbol_file(dir.path(), "app.pdb");

		VersionsClient::new(client)
			.upload_symbol_file(DATABASE, APPLICATION, VERSION, &symbol_file, Some("1A2B3C"))
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn temp_zip_is_deleted_even_when_upload_fails() {
		let server = MockServer::start().await;
		let client = authenticated_client(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/versions"))
			.respond_with(ResponseTemplate::new(500).set_body_string("no slots"))
			.mount(&server)
			.await;

		// A unique stem makes leftovers findable in the shared temp dir.
		let stem = format!("sym-{}.pdb", uuid::Uuid::new_v4());
		let dir = tempfile::tempdir().unwrap();
		let symbol_file = write_symbol_file(dir.path(), &stem);

		let err = VersionsClient::new(client)
			.upload_symbol_file(DATABASE, APPLICATION, VERSION, &symbol_file, None)
			.await
			.unwrap_err();
		assert!(matches!(err, BugSplatError::ServerError { status: 500, .. }));

		let leftovers: Vec<_> = std::fs::read_dir(std::env::temp_dir())
			.unwrap()
			.flatten()
			.flat_map(|entry| {
				std::fs::read_dir(entry.path())
					.into_iter()
					.flatten()
					.flatten()
					.map(|inner| inner.file_name().to_string_lossy().into_owned())
					.collect::<Vec<_>>()
			})
			.filter(|name| name.contains(&stem) && name.ends_with(".zip"))
			.collect();
		assert!(leftovers.is_empty(), "temp zip not cleaned up: {leftovers:?}");
	}

	#[tokio::test]
	async fn get_versions_requires_database() {
		let server = MockServer::start().await;
		let client = authenticated_client(&server).await;

		let err = VersionsClient::new(client)
			.get_versions("")
			.await
			.unwrap_err();
		assert!(matches!(err, BugSplatError::EmptyArgument("database")));
	}
}
