// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object storage uploads to presigned URLs.

use std::path::Path;

use reqwest::header::{ACCEPT, CONTENT_LENGTH};
use reqwest::{Body, Client};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::Result;

/// Uploads raw bytes or file streams to presigned object storage URLs.
///
/// Uploads use an unbounded wait: the client carries no request timeout so a
/// large archive on a slow link is not cut off mid-transfer. Callers may
/// impose cancellation externally.
#[derive(Debug, Clone)]
pub struct S3Client {
	http: Client,
}

impl S3Client {
	pub fn new() -> Self {
		Self {
			http: bugsplat_common_http::new_client(),
		}
	}

	/// Builds an `S3Client` around a caller-supplied HTTP client.
	pub fn with_http_client(http: Client) -> Self {
		Self { http }
	}

	/// PUTs in-memory bytes to a presigned URL.
	pub async fn upload_bytes(&self, url: &str, bytes: Vec<u8>) -> Result<reqwest::Response> {
		debug!(url = %url, len = bytes.len(), "Uploading bytes to presigned URL");
		let response = self
			.http
			.put(url)
			.header(ACCEPT, "application/octet-stream")
			.body(bytes)
			.send()
			.await?;
		Ok(response)
	}

	/// PUTs a file to a presigned URL, streaming its contents.
	pub async fn upload_file(&self, url: &str, path: &Path) -> Result<reqwest::Response> {
		let len = tokio::fs::metadata(path).await?.len();
		debug!(url = %url, path = %path.display(), len, "Streaming file to presigned URL");

		let file = tokio::fs::File::open(path).await?;
		let body = Body::wrap_stream(ReaderStream::new(file));

		let response = self
			.http
			.put(url)
			.header(ACCEPT, "application/octet-stream")
			.header(CONTENT_LENGTH, len)
			.body(body)
			.send()
			.await?;
		Ok(response)
	}
}

impl Default for S3Client {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	#[tokio::test]
	async fn upload_bytes_sends_octet_stream_accept_header() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/upload"))
			.and(header("Accept", "application/octet-stream"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client = S3Client::new();
		let response = client
			.upload_bytes(&format!("{}/upload", server.uri()), b"zip bytes".to_vec())
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 200);
	}

	#[tokio::test]
	async fn upload_file_streams_file_contents() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/upload"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let dir = tempfile::tempdir().unwrap();
		let file_path = dir.path().join("archive.zip");
		std::fs::write(&file_path, b"zip bytes").unwrap();

		let client = S3Client::new();
		let response = client
			.upload_file(&format!("{}/upload", server.uri()), &file_path)
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 200);
	}
}
