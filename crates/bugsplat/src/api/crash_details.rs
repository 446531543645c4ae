// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash details lookups.

use std::sync::Arc;

use crate::api::api_client::BugSplatApiClient;
use crate::error::{ensure_not_empty, ensure_success, BugSplatError, Result};

/// Client for retrieving crash details by id.
///
/// The caller is responsible for authenticating the underlying API client.
pub struct CrashDetailsClient {
	client: Arc<BugSplatApiClient>,
}

impl CrashDetailsClient {
	pub fn new(client: Arc<BugSplatApiClient>) -> Self {
		Self { client }
	}

	/// Gets details of a crash from a BugSplat database by id.
	pub async fn get_crash_details(&self, database: &str, id: u64) -> Result<reqwest::Response> {
		ensure_not_empty(database, "database")?;
		if id == 0 {
			return Err(BugSplatError::NonPositiveArgument("id"));
		}
		if !self.client.is_authenticated() {
			return Err(BugSplatError::NotAuthenticated);
		}

		let response = self
			.client
			.get(&format!("/api/crash/details?database={database}&id={id}"))
			.await?;
		ensure_success(response).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	#[tokio::test]
	async fn rejects_zero_id_and_unauthenticated_client() {
		let client =
			Arc::new(BugSplatApiClient::email_password("fred@bedrock.com", "hunter2").unwrap());
		let details = CrashDetailsClient::new(Arc::clone(&client));

		let err = details.get_crash_details("fred", 0).await.unwrap_err();
		assert!(matches!(err, BugSplatError::NonPositiveArgument("id")));

		let err = details.get_crash_details("fred", 7).await.unwrap_err();
		assert!(matches!(err, BugSplatError::NotAuthenticated));
	}

	#[tokio::test]
	async fn fetches_details_for_database_and_id() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/authenticatev3"))
			.respond_with(
				ResponseTemplate::new(200)
					.insert_header("Set-Cookie", "xsrf-token=abc123; Path=/"),
			)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/api/crash/details"))
			.and(query_param("database", "fred"))
			.and(query_param("id", "42"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client =
			BugSplatApiClient::email_password("fred@bedrock.com", "hunter2").unwrap();
		client.set_host(server.uri()).await;
		client.authenticate().await.unwrap();

		let response = CrashDetailsClient::new(Arc::new(client))
			.get_crash_details("fred", 42)
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), 200);
	}
}
