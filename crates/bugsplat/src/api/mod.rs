// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Clients for the individual BugSplat API surfaces.

pub mod android;
pub mod api_client;
pub mod crash_details;
pub mod crash_post;
pub mod versions;

pub use android::AndroidClient;
pub use api_client::{BugSplatApiClient, Credentials, DEFAULT_HOST};
pub use crash_details::CrashDetailsClient;
pub use crash_post::CrashPostClient;
pub use versions::VersionsClient;
