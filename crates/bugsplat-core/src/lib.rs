// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the BugSplat crash reporting SDK.
//!
//! This crate provides the I/O-free building blocks shared by the SDK crate:
//! the two-tier post option model, multipart form-data parameters, and the
//! crash type discriminators the backend uses to route uploaded reports.
//!
//! # Overview
//!
//! - Post options carry overridable metadata (description, email, user,
//!   attachments, form data, attributes) in two tiers: a reporter-level
//!   default and a per-post override.
//! - Merging is field-by-field: non-empty override values win, lists are
//!   unioned with override entries winning on collision.
//! - Crash type ids are modeled as a sum type over report flavors with an
//!   `Unknown` sentinel that always defers to the default tier.

pub mod crash_type;
pub mod form_data;
pub mod options;

pub use crash_type::{CrashType, ExceptionType, MinidumpType, XmlType};
pub use form_data::{FormDataParam, ParamContent};
pub use options::PostOptions;
