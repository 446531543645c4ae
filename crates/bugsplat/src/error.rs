// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the BugSplat SDK.

use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, BugSplatError>;

/// Errors that can occur in the BugSplat SDK.
#[derive(Debug, Error)]
pub enum BugSplatError {
	/// A required argument was empty.
	#[error("{0} cannot be empty")]
	EmptyArgument(&'static str),

	/// A numeric argument was zero or negative.
	#[error("{0} must be greater than zero")]
	NonPositiveArgument(&'static str),

	/// An operation requiring a session was invoked before authentication.
	#[error("client must be authenticated before making this request")]
	NotAuthenticated,

	/// HTTP request failed at the transport level.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned a non-success status.
	#[error("server error (status {status}): {message}")]
	ServerError {
		/// HTTP status code.
		status: u16,
		/// Response body text.
		message: String,
	},

	/// A response was missing an expected field or header.
	#[error("failed to parse {context}: {message}")]
	InvalidResponse {
		/// What was being parsed.
		context: &'static str,
		/// Detail, including any server-supplied message.
		message: String,
	},

	/// Local file I/O failed while staging an upload.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Archive creation failed.
	#[error("zip error: {0}")]
	Zip(#[from] zip::result::ZipError),

	/// Failed to serialize request data.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Rejects empty string arguments before any I/O happens.
pub(crate) fn ensure_not_empty(argument: &str, name: &'static str) -> Result<()> {
	if argument.is_empty() {
		return Err(BugSplatError::EmptyArgument(name));
	}
	Ok(())
}

/// Maps a non-success response to `ServerError`, carrying the body text.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
	if response.status().is_success() {
		return Ok(response);
	}
	let status = response.status().as_u16();
	let message = response.text().await.unwrap_or_default();
	Err(BugSplatError::ServerError { status, message })
}
