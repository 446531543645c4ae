// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash and symbol upload SDK for the BugSplat backend.
//!
//! # Overview
//!
//! - [`BugSplat`] posts crash reports (stack traces, errors, minidumps, XML
//!   reports, arbitrary crash files) for one database/application/version,
//!   carrying a default [`PostOptions`] tier that per-call options override.
//! - [`SymbolUploader`] zips and uploads debug symbol files, authenticating
//!   lazily and fanning batches out with bounded parallelism.
//! - [`BugSplatApiClient`] manages the session (email/password or OAuth2
//!   client credentials) behind the authenticated API surfaces.
//!
//! # Example
//!
//! ```no_run
//! use bugsplat::{BugSplat, PostOptions};
//!
//! # async fn example() -> bugsplat::Result<()> {
//! let reporter = BugSplat::new("fred", "my-rust-crasher", "1.0")?
//! 	.with_email("fred@bedrock.com")
//! 	.with_description("BugSplat rocks!");
//!
//! let options = PostOptions::new().with_user("Fred");
//! reporter
//! 	.post_stack_trace("at main() in main.rs:line 42", Some(&options))
//! 	.await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod s3;
pub mod symbol_uploader;

mod json;
mod zip;

pub use api::{
	AndroidClient, BugSplatApiClient, CrashDetailsClient, CrashPostClient, Credentials,
	VersionsClient, DEFAULT_HOST,
};
pub use bugsplat_core::{
	CrashType, ExceptionType, FormDataParam, MinidumpType, ParamContent, PostOptions, XmlType,
};
pub use client::BugSplat;
pub use error::{BugSplatError, Result};
pub use s3::S3Client;
pub use symbol_uploader::SymbolUploader;
