// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash and symbol archive staging.
//!
//! Crash posts bundle the artifact plus attachments into one in-memory ZIP;
//! symbol uploads stage a single-entry ZIP in a scoped temp directory that is
//! deleted on drop, on every exit path.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// One archive member held in memory.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryFile {
	pub file_name: String,
	pub content: Vec<u8>,
}

impl InMemoryFile {
	pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
		Self {
			file_name: file_name.into(),
			content,
		}
	}

	/// Reads a file fully into memory.
	pub fn from_path(path: &Path) -> std::io::Result<Self> {
		let file_name = base_name(path);
		let content = std::fs::read(path)?;
		Ok(Self { file_name, content })
	}

	/// Best-effort read: a locked or missing file is logged and skipped so it
	/// cannot abort the whole crash post.
	pub fn try_from_path(path: &Path) -> Option<Self> {
		match Self::from_path(path) {
			Ok(file) => Some(file),
			Err(error) => {
				warn!(path = %path.display(), %error, "Skipping unreadable attachment");
				None
			}
		}
	}
}

/// Bundles files into a single ZIP held in memory.
pub(crate) fn create_in_memory_zip(files: &[InMemoryFile]) -> Result<Vec<u8>> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

	for file in files {
		writer.start_file(file.file_name.as_str(), options)?;
		writer.write_all(&file.content)?;
	}

	Ok(writer.finish()?.into_inner())
}

/// A ZIP staged in a scoped temporary directory.
///
/// The directory (and the archive inside it) is removed when the value is
/// dropped, so cleanup happens on success, error, and early-return paths
/// alike.
#[derive(Debug)]
pub(crate) struct TempZip {
	_dir: tempfile::TempDir,
	path: PathBuf,
	file_name: String,
	size: u64,
}

impl TempZip {
	/// Zips the given files under a collision-resistant name.
	pub fn create(files: &[&Path]) -> Result<Self> {
		let dir = tempfile::Builder::new().prefix("bugsplat-").tempdir()?;

		let stem = files.first().map(|p| base_name(p)).unwrap_or_default();
		let file_name = format!("bugsplat-{}-{}.zip", stem, Uuid::new_v4());
		let path = dir.path().join(&file_name);

		let mut writer = ZipWriter::new(File::create(&path)?);
		let options =
			SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
		for file in files {
			writer.start_file(base_name(file).as_str(), options)?;
			let mut reader = File::open(file)?;
			std::io::copy(&mut reader, &mut writer)?;
		}
		writer.finish()?;

		let size = std::fs::metadata(&path)?.len();

		Ok(Self {
			_dir: dir,
			path,
			file_name,
			size,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn file_name(&self) -> &str {
		&self.file_name
	}

	pub fn size(&self) -> u64 {
		self.size
	}
}

fn base_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}
