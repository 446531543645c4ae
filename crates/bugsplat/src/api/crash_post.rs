// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash post orchestration.
//!
//! Turns a crash artifact (stack trace text, minidump file, or XML report)
//! plus merged options into a committed crash record: merge default/override
//! options, bundle everything into one ZIP, request a presigned upload URL,
//! PUT the archive to object storage, then commit the metadata along with the
//! returned content hash.

use std::path::Path;

use bugsplat_core::{FormDataParam, ParamContent, PostOptions};
use reqwest::header::{HeaderMap, ETAG};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::error::{ensure_not_empty, ensure_success, BugSplatError, Result};
use crate::json::parse_presigned_url;
use crate::s3::S3Client;
use crate::zip::{create_in_memory_zip, InMemoryFile};

/// Entry name for a stack trace staged into the crash archive.
const CALLSTACK_FILE_NAME: &str = "Callstack.txt";

/// Client for posting crashes through the presigned-upload pipeline.
pub struct CrashPostClient {
	http: Client,
	s3: S3Client,
	base_url: Option<String>,
}

impl CrashPostClient {
	pub fn new() -> Self {
		Self::with_clients(bugsplat_common_http::new_client(), S3Client::new())
	}

	/// Builds a client around caller-supplied HTTP and object storage
	/// clients.
	pub fn with_clients(http: Client, s3: S3Client) -> Self {
		Self {
			http,
			s3,
			base_url: None,
		}
	}

	/// Overrides the per-database host (`https://{database}.bugsplat.com`),
	/// e.g. for an on-prem deployment.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
		self
	}

	/// Posts a stack trace as an exception crash report.
	pub async fn post_exception(
		&self,
		database: &str,
		application: &str,
		version: &str,
		stack_trace: &str,
		default_options: &PostOptions,
		override_options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		let crash_file =
			InMemoryFile::new(CALLSTACK_FILE_NAME, stack_trace.as_bytes().to_vec());
		self.post_in_memory_crash_file(
			database,
			application,
			version,
			crash_file,
			default_options,
			override_options,
		)
		.await
	}

	/// Posts a minidump file.
	pub async fn post_minidump(
		&self,
		database: &str,
		application: &str,
		version: &str,
		minidump_file: &Path,
		default_options: &PostOptions,
		override_options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		let crash_file = InMemoryFile::from_path(minidump_file)?;
		self.post_in_memory_crash_file(
			database,
			application,
			version,
			crash_file,
			default_options,
			override_options,
		)
		.await
	}

	/// Posts an XML diagnostic report file.
	pub async fn post_xml_report(
		&self,
		database: &str,
		application: &str,
		version: &str,
		xml_file: &Path,
		default_options: &PostOptions,
		override_options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		let crash_file = InMemoryFile::from_path(xml_file)?;
		self.post_in_memory_crash_file(
			database,
			application,
			version,
			crash_file,
			default_options,
			override_options,
		)
		.await
	}

	/// Posts an arbitrary crash file; the crash type id comes entirely from
	/// the options.
	pub async fn post_crash_file(
		&self,
		database: &str,
		application: &str,
		version: &str,
		crash_file: &Path,
		default_options: &PostOptions,
		override_options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		let crash_file = InMemoryFile::from_path(crash_file)?;
		self.post_in_memory_crash_file(
			database,
			application,
			version,
			crash_file,
			default_options,
			override_options,
		)
		.await
	}

	/// Posts a stack trace through the legacy direct endpoint
	/// (`/post/dotnetstandard/`), bypassing the presigned-upload pipeline.
	pub async fn post_stack_trace_direct(
		&self,
		database: &str,
		application: &str,
		version: &str,
		stack_trace: &str,
		default_options: &PostOptions,
		override_options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		ensure_not_empty(database, "database")?;
		ensure_not_empty(application, "application")?;
		ensure_not_empty(version, "version")?;

		let options = PostOptions::merged(default_options, override_options);

		let mut form = Form::new()
			.text("database", database.to_string())
			.text("appName", application.to_string())
			.text("appVersion", version.to_string())
			.text("description", options.description.clone())
			.text("email", options.email.clone())
			.text("appKey", options.key.clone())
			.text("user", options.user.clone())
			.text("callstack", stack_trace.to_string())
			.text("crashTypeId", options.crash_type.id().to_string());

		for param in &options.form_data {
			form = append_form_data_param(form, param);
		}
		for attachment in &options.attachments {
			if let Some(file) = InMemoryFile::try_from_path(attachment) {
				let name = file.file_name.clone();
				form = form.part(name.clone(), Part::bytes(file.content).file_name(name));
			}
		}

		let url = format!("{}/post/dotnetstandard/", self.base_url_for(database));
		let response = self.http.post(&url).multipart(form).send().await?;
		ensure_success(response).await
	}

	async fn post_in_memory_crash_file(
		&self,
		database: &str,
		application: &str,
		version: &str,
		crash_file: InMemoryFile,
		default_options: &PostOptions,
		override_options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		ensure_not_empty(database, "database")?;
		ensure_not_empty(application, "application")?;
		ensure_not_empty(version, "version")?;

		let options = PostOptions::merged(default_options, override_options);

		// Attachments are best effort; the crash artifact itself is not.
		let mut files: Vec<InMemoryFile> = options
			.attachments
			.iter()
			.filter_map(|path| InMemoryFile::try_from_path(path))
			.collect();
		files.push(crash_file);
		files.extend(
			options
				.form_data
				.iter()
				.filter(|param| {
					param.is_file() && matches!(param.content, ParamContent::Bytes(_))
				})
				.map(|param| {
					InMemoryFile::new(
						param.file_name.clone().unwrap_or_default(),
						param.content.as_bytes().to_vec(),
					)
				}),
		);

		let zip_bytes = create_in_memory_zip(&files)?;

		let upload_response = self
			.get_crash_upload_url(database, application, version, zip_bytes.len())
			.await?;
		let upload_response = ensure_success(upload_response).await?;
		let presigned_url =
			parse_presigned_url(&upload_response.text().await?, "crash upload url response")?;

		let put_response =
			ensure_success(self.s3.upload_bytes(&presigned_url, zip_bytes).await?).await?;
		let md5 = etag_from_headers(put_response.headers())?;

		let commit_response = self
			.commit_crash_upload(database, application, version, &md5, &presigned_url, &options)
			.await?;
		ensure_success(commit_response).await
	}

	async fn get_crash_upload_url(
		&self,
		database: &str,
		application: &str,
		version: &str,
		crash_post_size: usize,
	) -> Result<reqwest::Response> {
		let url = format!("{}/api/getCrashUploadUrl", self.base_url_for(database));
		debug!(url = %url, crash_post_size, "Requesting crash upload URL");

		let response = self
			.http
			.get(&url)
			.query(&[
				("database", database),
				("appName", application),
				("appVersion", version),
				("crashPostSize", &crash_post_size.to_string()),
			])
			.send()
			.await?;
		Ok(response)
	}

	async fn commit_crash_upload(
		&self,
		database: &str,
		application: &str,
		version: &str,
		md5: &str,
		s3_key: &str,
		options: &PostOptions,
	) -> Result<reqwest::Response> {
		let mut form = Form::new()
			.text("database", database.to_string())
			.text("appName", application.to_string())
			.text("appVersion", version.to_string())
			.text("description", options.description.clone())
			.text("email", options.email.clone())
			.text("appKey", options.key.clone())
			.text("notes", options.notes.clone())
			.text("user", options.user.clone())
			.text("crashTypeId", options.crash_type.id().to_string())
			.text("s3Key", s3_key.to_string())
			.text("md5", md5.to_string());

		if !options.attributes.is_empty() {
			form = form.text("attributes", serde_json::to_string(&options.attributes)?);
		}
		for param in &options.form_data {
			form = append_form_data_param(form, param);
		}

		let url = format!("{}/api/commitS3CrashUpload", self.base_url_for(database));
		debug!(url = %url, s3_key = %s3_key, "Committing crash upload");

		let response = self.http.post(&url).multipart(form).send().await?;
		Ok(response)
	}

	fn base_url_for(&self, database: &str) -> String {
		self.base_url
			.clone()
			.unwrap_or_else(|| format!("https://{database}.bugsplat.com"))
	}
}

impl Default for CrashPostClient {
	fn default() -> Self {
		Self::new()
	}
}

fn append_form_data_param(form: Form, param: &FormDataParam) -> Form {
	let part = match &param.content {
		ParamContent::Text(text) => Part::text(text.clone()),
		ParamContent::Bytes(bytes) => Part::bytes(bytes.clone()),
	};
	let part = match &param.file_name {
		Some(file_name) if !file_name.is_empty() => part.file_name(file_name.clone()),
		_ => part,
	};
	form.part(param.name.clone(), part)
}

/// Extracts the content hash from the object store's `ETag` header,
/// stripping surrounding quotes.
fn etag_from_headers(headers: &HeaderMap) -> Result<String> {
	headers
		.get(ETAG)
		.and_then(|value| value.to_str().ok())
		.map(|etag| etag.trim_matches('"').to_string())
		.ok_or_else(|| BugSplatError::InvalidResponse {
			context: "object storage response",
			message: "missing ETag header".to_string(),
		})
}
