// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! High-level crash reporter bound to one database/application/version.
//!
//! `BugSplat` carries the default options tier for every post it makes; the
//! per-call options argument is the override tier. Each report flavor gets its
//! default crash type from the reporter (`DotNetStandard` exceptions,
//! `WindowsNative` minidumps, `Xml` reports) unless the caller overrides it.

use std::error::Error;
use std::path::Path;

use bugsplat_core::{CrashType, ExceptionType, FormDataParam, MinidumpType, PostOptions, XmlType};
use tracing::error;

use crate::api::crash_post::CrashPostClient;
use crate::error::{ensure_not_empty, Result};

/// Crash reporter for a single application version.
pub struct BugSplat {
	database: String,
	application: String,
	version: String,
	options: PostOptions,
	exception_type: ExceptionType,
	minidump_type: MinidumpType,
	xml_type: XmlType,
	crash_post: CrashPostClient,
}

impl BugSplat {
	/// Creates a reporter for `database`/`application`/`version`. All three
	/// identifiers must be non-empty.
	pub fn new(
		database: impl Into<String>,
		application: impl Into<String>,
		version: impl Into<String>,
	) -> Result<Self> {
		let database = database.into();
		let application = application.into();
		let version = version.into();
		ensure_not_empty(&database, "database")?;
		ensure_not_empty(&application, "application")?;
		ensure_not_empty(&version, "version")?;

		Ok(Self {
			database,
			application,
			version,
			options: PostOptions::new(),
			exception_type: ExceptionType::DotNetStandard,
			minidump_type: MinidumpType::WindowsNative,
			xml_type: XmlType::Xml,
			crash_post: CrashPostClient::new(),
		})
	}

	/// Replaces the default options tier wholesale.
	pub fn with_default_options(mut self, options: PostOptions) -> Self {
		self.options = options;
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.options.description = description.into();
		self
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.options.email = email.into();
		self
	}

	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.options.key = key.into();
		self
	}

	pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
		self.options.notes = notes.into();
		self
	}

	pub fn with_user(mut self, user: impl Into<String>) -> Self {
		self.options.user = user.into();
		self
	}

	pub fn with_attachment(mut self, path: impl Into<std::path::PathBuf>) -> Self {
		self.options.attachments.push(path.into());
		self
	}

	pub fn with_form_data(mut self, param: FormDataParam) -> Self {
		self.options.form_data.push(param);
		self
	}

	pub fn with_attribute(
		mut self,
		key: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		self.options.attributes.insert(key.into(), value.into());
		self
	}

	/// Default crash type for stack trace posts.
	pub fn with_exception_type(mut self, exception_type: ExceptionType) -> Self {
		self.exception_type = exception_type;
		self
	}

	/// Default crash type for minidump posts.
	pub fn with_minidump_type(mut self, minidump_type: MinidumpType) -> Self {
		self.minidump_type = minidump_type;
		self
	}

	/// Default crash type for XML report posts.
	pub fn with_xml_type(mut self, xml_type: XmlType) -> Self {
		self.xml_type = xml_type;
		self
	}

	/// Swaps in a caller-configured crash post client, e.g. one pointed at an
	/// on-prem host.
	pub fn with_crash_post_client(mut self, crash_post: CrashPostClient) -> Self {
		self.crash_post = crash_post;
		self
	}

	/// Posts an error and its source chain as a stack trace report.
	pub async fn post_error(
		&self,
		error: &(dyn Error + 'static),
		options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		self.post_stack_trace(&stack_trace_from_error(error), options)
			.await
	}

	/// Posts a stack trace report.
	pub async fn post_stack_trace(
		&self,
		stack_trace: &str,
		options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		self.crash_post
			.post_exception(
				&self.database,
				&self.application,
				&self.version,
				stack_trace,
				&self.defaults_for(CrashType::Exception(self.exception_type)),
				options,
			)
			.await
	}

	/// Posts a minidump file.
	pub async fn post_minidump(
		&self,
		minidump_file: &Path,
		options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		self.crash_post
			.post_minidump(
				&self.database,
				&self.application,
				&self.version,
				minidump_file,
				&self.defaults_for(CrashType::Minidump(self.minidump_type)),
				options,
			)
			.await
	}

	/// Posts an XML diagnostic report file.
	pub async fn post_xml_report(
		&self,
		xml_file: &Path,
		options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		self.crash_post
			.post_xml_report(
				&self.database,
				&self.application,
				&self.version,
				xml_file,
				&self.defaults_for(CrashType::Xml(self.xml_type)),
				options,
			)
			.await
	}

	/// Posts an arbitrary crash file. The crash type comes from the options
	/// tiers; callers should set it on one of them.
	pub async fn post_crash_file(
		&self,
		crash_file: &Path,
		options: Option<&PostOptions>,
	) -> Result<reqwest::Response> {
		self.crash_post
			.post_crash_file(
				&self.database,
				&self.application,
				&self.version,
				crash_file,
				&self.options,
				options,
			)
			.await
	}

	/// Like [`post_error`](Self::post_error) but swallows failures, for call
	/// sites that must never panic or propagate (crash handlers).
	pub async fn try_post_error(
		&self,
		error: &(dyn Error + 'static),
		options: Option<&PostOptions>,
	) -> Option<reqwest::Response> {
		match self.post_error(error, options).await {
			Ok(response) => Some(response),
			Err(post_error) => {
				error!(error = %post_error, "Failed to post error report");
				None
			}
		}
	}

	/// Like [`post_stack_trace`](Self::post_stack_trace) but swallows
	/// failures.
	pub async fn try_post_stack_trace(
		&self,
		stack_trace: &str,
		options: Option<&PostOptions>,
	) -> Option<reqwest::Response> {
		match self.post_stack_trace(stack_trace, options).await {
			Ok(response) => Some(response),
			Err(post_error) => {
				error!(error = %post_error, "Failed to post stack trace report");
				None
			}
		}
	}

	fn defaults_for(&self, crash_type: CrashType) -> PostOptions {
		self.options.clone().with_crash_type(crash_type)
	}
}

/// Renders an error and its source chain in the shape of a stack trace.
fn stack_trace_from_error(error: &(dyn Error + 'static)) -> String {
	let mut trace = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		trace.push_str("\nCaused by: ");
		trace.push_str(&cause.to_string());
		source = cause.source();
	}
	trace
}
