// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Minimal key-path accessor over small JSON responses.
//!
//! The BugSplat API returns small, flat-ish JSON bodies (`{"url": "..."}`,
//! `{"token_type": "...", "access_token": "..."}`). This wrapper gives the
//! rest of the SDK structural access by key path without each call site
//! re-deriving types for every endpoint.

use serde_json::Value;

use crate::error::{BugSplatError, Result};

/// A parsed JSON document with string-value access by key path.
#[derive(Debug, Clone)]
pub struct JsonObject {
	value: Value,
}

impl JsonObject {
	/// Parses a JSON document.
	pub fn parse(json: &str) -> Result<Self> {
		let value = serde_json::from_str(json)?;
		Ok(Self { value })
	}

	/// Returns the string value at the given key path, or `None` when the
	/// path is missing or does not lead to a scalar.
	pub fn try_value_at(&self, path: &[&str]) -> Option<String> {
		let mut current = &self.value;
		for key in path {
			current = current.get(key)?;
		}
		match current {
			Value::String(s) => Some(s.clone()),
			Value::Number(n) => Some(n.to_string()),
			Value::Bool(b) => Some(b.to_string()),
			_ => None,
		}
	}

	/// Returns the string value at the given key path, failing with a
	/// descriptive message when the path is missing.
	pub fn value_at(&self, path: &[&str]) -> Result<String> {
		self.try_value_at(path)
			.ok_or_else(|| BugSplatError::InvalidResponse {
				context: "json response",
				message: format!("missing value at key path `{}`", path.join(".")),
			})
	}
}

/// Parses a presigned upload URL response body.
///
/// The body is a small JSON object with a `url` field; when the field is
/// absent, the server-supplied `message` field (if any) becomes the error
/// detail.
pub(crate) fn parse_presigned_url(body: &str, context: &'static str) -> Result<String> {
	let json = JsonObject::parse(body).map_err(|_| BugSplatError::InvalidResponse {
		context,
		message: "response body is not valid JSON".to_string(),
	})?;

	json.try_value_at(&["url"])
		.ok_or_else(|| BugSplatError::InvalidResponse {
			context,
			message: json
				.try_value_at(&["message"])
				.unwrap_or_else(|| "missing url field".to_string()),
		})
}
