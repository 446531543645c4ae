// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated BugSplat API client.
//!
//! Holds a base host and a session credential. `authenticate` obtains a
//! session token (an `xsrf-token` cookie value for email/password, a bearer
//! token for OAuth2 client credentials) and attaches it to every subsequent
//! request. Dependent clients check `is_authenticated` explicitly before use.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, SET_COOKIE};
use reqwest::multipart::Form;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ensure_not_empty, ensure_success, BugSplatError, Result};
use crate::json::JsonObject;

/// Default BugSplat API host.
pub const DEFAULT_HOST: &str = "https://app.bugsplat.com";

/// Credentials used to establish a session.
#[derive(Debug, Clone)]
pub enum Credentials {
	/// BugSplat account email and password.
	EmailPassword { email: String, password: String },
	/// OAuth2 client-credentials pair.
	ClientCredentials {
		client_id: String,
		client_secret: String,
	},
}

/// Client for making authenticated requests to the BugSplat API.
pub struct BugSplatApiClient {
	host: RwLock<String>,
	credentials: Credentials,
	http: Client,
	authenticated: AtomicBool,
	auth_header: RwLock<Option<(HeaderName, HeaderValue)>>,
}

impl BugSplatApiClient {
	/// Creates an unauthenticated client that will authenticate with a
	/// BugSplat account email and password.
	pub fn email_password(email: impl Into<String>, password: impl Into<String>) -> Result<Self> {
		let email = email.into();
		let password = password.into();
		ensure_not_empty(&email, "email")?;
		ensure_not_empty(&password, "password")?;
		Ok(Self::with_http_client(
			Credentials::EmailPassword { email, password },
			bugsplat_common_http::new_client(),
		))
	}

	/// Creates an unauthenticated client that will authenticate with OAuth2
	/// client credentials.
	pub fn oauth2(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();
		ensure_not_empty(&client_id, "client_id")?;
		ensure_not_empty(&client_secret, "client_secret")?;
		Ok(Self::with_http_client(
			Credentials::ClientCredentials {
				client_id,
				client_secret,
			},
			bugsplat_common_http::new_client(),
		))
	}

	/// Builds a client around a caller-supplied HTTP client.
	pub fn with_http_client(credentials: Credentials, http: Client) -> Self {
		Self {
			host: RwLock::new(DEFAULT_HOST.to_string()),
			credentials,
			http,
			authenticated: AtomicBool::new(false),
			auth_header: RwLock::new(None),
		}
	}

	/// Points the client at a different API host.
	pub async fn set_host(&self, host: impl Into<String>) {
		let host = host.into();
		*self.host.write().await = host.trim_end_matches('/').to_string();
	}

	/// True once `authenticate` has succeeded.
	pub fn is_authenticated(&self) -> bool {
		self.authenticated.load(Ordering::SeqCst)
	}

	/// Authenticates with the BugSplat backend and persists the session
	/// token for future requests.
	///
	/// On failure the authenticated flag stays false and no token is stored.
	pub async fn authenticate(&self) -> Result<()> {
		let (name, value) = match &self.credentials {
			Credentials::EmailPassword { email, password } => {
				self.authenticate_email_password(email, password).await?
			}
			Credentials::ClientCredentials {
				client_id,
				client_secret,
			} => {
				self.authenticate_client_credentials(client_id, client_secret)
					.await?
			}
		};

		*self.auth_header.write().await = Some((name, value));
		self.authenticated.store(true, Ordering::SeqCst);
		info!("Authenticated with BugSplat");
		Ok(())
	}

	async fn authenticate_email_password(
		&self,
		email: &str,
		password: &str,
	) -> Result<(HeaderName, HeaderValue)> {
		let url = format!("{}/api/authenticatev3", self.host.read().await);
		debug!(url = %url, "Authenticating via email/password");

		let form = Form::new()
			.text("email", email.to_string())
			.text("password", password.to_string());
		let response = ensure_success(self.http.post(&url).multipart(form).send().await?).await?;

		// The session token rides in an xsrf-token cookie.
		let token = response
			.headers()
			.get_all(SET_COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.find(|cookie| cookie.contains("xsrf-token"))
			.and_then(|cookie| cookie.split(';').next())
			.and_then(|pair| pair.split('=').next_back())
			.map(str::to_string)
			.ok_or_else(|| BugSplatError::InvalidResponse {
				context: "authentication response",
				message: "missing xsrf-token cookie".to_string(),
			})?;

		let value = HeaderValue::from_str(&token).map_err(|_| BugSplatError::InvalidResponse {
			context: "authentication response",
			message: "xsrf-token is not a valid header value".to_string(),
		})?;
		Ok((HeaderName::from_static("xsrf-token"), value))
	}

	async fn authenticate_client_credentials(
		&self,
		client_id: &str,
		client_secret: &str,
	) -> Result<(HeaderName, HeaderValue)> {
		let url = format!("{}/oauth2/authorize", self.host.read().await);
		debug!(url = %url, "Authenticating via OAuth2 client credentials");

		let form = Form::new()
			.text("client_id", client_id.to_string())
			.text("client_secret", client_secret.to_string())
			.text("scope", "restricted")
			.text("grant_type", "client_credentials");
		let response = ensure_success(self.http.post(&url).multipart(form).send().await?).await?;

		let json = JsonObject::parse(&response.text().await?)?;
		let token_type = json.value_at(&["token_type"])?;
		let access_token = json.value_at(&["access_token"])?;

		let value = HeaderValue::from_str(&format!("{token_type} {access_token}")).map_err(
			|_| BugSplatError::InvalidResponse {
				context: "authentication response",
				message: "access token is not a valid header value".to_string(),
			},
		)?;
		Ok((AUTHORIZATION, value))
	}

	/// Makes a GET request to a route relative to the host, attaching the
	/// session token when present.
	pub async fn get(&self, route: &str) -> Result<reqwest::Response> {
		let url = format!("{}{}", self.host.read().await, route);
		let mut request = self.http.get(&url);
		if let Some((name, value)) = self.auth_header.read().await.clone() {
			request = request.header(name, value);
		}
		Ok(request.send().await?)
	}

	/// Makes a multipart POST request to a route relative to the host,
	/// attaching the session token when present.
	pub async fn post(&self, route: &str, form: Form) -> Result<reqwest::Response> {
		let url = format!("{}{}", self.host.read().await, route);
		let mut request = self.http.post(&url).multipart(form);
		if let Some((name, value)) = self.auth_header.read().await.clone() {
			request = request.header(name, value);
		}
		Ok(request.send().await?)
	}
}
