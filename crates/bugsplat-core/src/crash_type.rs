// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash type discriminators.
//!
//! The BugSplat backend uses a numeric crash type id to decide how an
//! uploaded report should be parsed (native minidump vs. .NET exception vs.
//! XML report). Each report flavor has its own id space; `CrashType` unifies
//! them into a single sum type so merge logic can treat the discriminator
//! uniformly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Crash type ids for exception (stack trace) reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ExceptionType {
	Unknown = 0,
	UnityLegacy = 12,
	DotNetStandard = 18,
	Unity = 24,
}

/// Crash type ids for minidump reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum MinidumpType {
	Unknown = 0,
	WindowsNative = 1,
	DotNet = 8,
	UnityNativeWindows = 15,
}

/// Crash type ids for XML diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum XmlType {
	Unknown = 0,
	Xml = 21,
}

/// Tagged union over the per-flavor crash type discriminators.
///
/// `Generic(0)` is the neutral element: an options value carrying it never
/// overrides a default during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashType {
	Exception(ExceptionType),
	Minidump(MinidumpType),
	Xml(XmlType),
	Generic(u32),
}

impl CrashType {
	/// Numeric id sent to the backend as `crashTypeId`.
	pub fn id(self) -> u32 {
		match self {
			Self::Exception(t) => t as u32,
			Self::Minidump(t) => t as u32,
			Self::Xml(t) => t as u32,
			Self::Generic(id) => id,
		}
	}

	/// True when the id is the `Unknown` sentinel (0).
	pub fn is_unknown(self) -> bool {
		self.id() == 0
	}

	/// Resolves the effective crash type: the override wins unless it is the
	/// `Unknown` sentinel, in which case the default is used.
	pub fn resolve(override_type: CrashType, default_type: CrashType) -> CrashType {
		if override_type.is_unknown() {
			default_type
		} else {
			override_type
		}
	}
}

impl Default for CrashType {
	fn default() -> Self {
		Self::Generic(0)
	}
}

impl fmt::Display for CrashType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.id())
	}
}
