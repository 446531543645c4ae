// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Arbitrary multipart form-data parameters attached to a crash post.

use serde::{Deserialize, Serialize};

/// Content of a form-data parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamContent {
	Text(String),
	Bytes(Vec<u8>),
}

impl ParamContent {
	/// Byte view of the content regardless of variant.
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Self::Text(s) => s.as_bytes(),
			Self::Bytes(b) => b,
		}
	}
}

/// A name/content pair appended to the crash post form data.
///
/// When `file_name` is set and the content is bytes, the parameter is also
/// staged as a member of the crash archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDataParam {
	pub name: String,
	pub content: ParamContent,
	pub file_name: Option<String>,
}

impl FormDataParam {
	/// A plain text field.
	pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			content: ParamContent::Text(value.into()),
			file_name: None,
		}
	}

	/// A named file part carrying byte content.
	pub fn file(
		name: impl Into<String>,
		file_name: impl Into<String>,
		content: Vec<u8>,
	) -> Self {
		Self {
			name: name.into(),
			content: ParamContent::Bytes(content),
			file_name: Some(file_name.into()),
		}
	}

	/// True when this parameter should be staged as an archive member.
	pub fn is_file(&self) -> bool {
		matches!(&self.file_name, Some(name) if !name.is_empty())
	}
}
