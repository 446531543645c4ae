// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Two-tier post options and the default/override merge.
//!
//! A `BugSplat` reporter carries a default `PostOptions`; callers may pass a
//! second `PostOptions` at post time. The effective options are computed by
//! [`PostOptions::merged`]: override string fields win only when non-empty,
//! list fields are unioned with override entries winning on collision, and
//! the crash type discriminator falls back to the default when the override
//! carries the `Unknown` sentinel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::crash_type::CrashType;
use crate::form_data::FormDataParam;

/// Overridable crash post metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostOptions {
	/// Description shown alongside the crash in the BugSplat UI.
	pub description: String,
	/// Reporter email.
	pub email: String,
	/// General purpose grouping key.
	pub key: String,
	/// Reporter IP address.
	pub ip_address: String,
	/// Free-form notes column.
	pub notes: String,
	/// Reporter user name.
	pub user: String,
	/// Files added to the crash archive at post time.
	pub attachments: Vec<PathBuf>,
	/// Extra multipart form fields appended to the post.
	pub form_data: Vec<FormDataParam>,
	/// Free-form attribute map, serialized to JSON on commit.
	pub attributes: BTreeMap<String, String>,
	/// Crash type discriminator; `Unknown` defers to the default tier.
	pub crash_type: CrashType,
}

impl PostOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = email.into();
		self
	}

	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();
		self
	}

	pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
		self.notes = notes.into();
		self
	}

	pub fn with_user(mut self, user: impl Into<String>) -> Self {
		self.user = user.into();
		self
	}

	pub fn with_crash_type(mut self, crash_type: CrashType) -> Self {
		self.crash_type = crash_type;
		self
	}

	pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
		self.attachments.push(path.into());
		self
	}

	pub fn with_form_data(mut self, param: FormDataParam) -> Self {
		self.form_data.push(param);
		self
	}

	pub fn with_attribute(
		mut self,
		key: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	/// Computes the effective options from a default tier and an optional
	/// override tier. An absent override is the identity element.
	pub fn merged(default: &PostOptions, override_options: Option<&PostOptions>) -> PostOptions {
		let Some(overrides) = override_options else {
			return default.clone();
		};

		let mut attributes = default.attributes.clone();
		attributes.extend(
			overrides
				.attributes
				.iter()
				.map(|(k, v)| (k.clone(), v.clone())),
		);

		PostOptions {
			description: string_or_default(&overrides.description, &default.description),
			email: string_or_default(&overrides.email, &default.email),
			key: string_or_default(&overrides.key, &default.key),
			ip_address: string_or_default(&overrides.ip_address, &default.ip_address),
			notes: string_or_default(&overrides.notes, &default.notes),
			user: string_or_default(&overrides.user, &default.user),
			attachments: union_by_key(&overrides.attachments, &default.attachments, |p| {
				p.clone()
			}),
			form_data: union_by_key(&overrides.form_data, &default.form_data, |p| {
				p.name.clone()
			}),
			attributes,
			crash_type: CrashType::resolve(overrides.crash_type, default.crash_type),
		}
	}
}

/// Non-empty override value wins, otherwise the default is kept.
pub fn string_or_default(value: &str, default: &str) -> String {
	if value.is_empty() {
		default.to_string()
	} else {
		value.to_string()
	}
}

/// Unions two lists, keeping the first occurrence per key. Override entries
/// come first so they win on collision.
fn union_by_key<T: Clone, K: Ord>(
	overrides: &[T],
	defaults: &[T],
	key: impl Fn(&T) -> K,
) -> Vec<T> {
	let mut seen = std::collections::BTreeSet::new();
	overrides
		.iter()
		.chain(defaults.iter())
		.filter(|item| seen.insert(key(item)))
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::crash_type::ExceptionType;
	use crate::form_data::ParamContent;
	use proptest::prelude::*;

	#[test]
	fn override_description_wins_when_non_empty() {
		let default = PostOptions::new().with_description("A");
		let overrides = PostOptions::new().with_description("B");

		let merged = PostOptions::merged(&default, Some(&overrides));
		assert_eq!(merged.description, "B");
	}

	#[test]
	fn empty_override_description_does_not_win() {
		let default = PostOptions::new().with_description("A");
		let overrides = PostOptions::new();

		let merged = PostOptions::merged(&default, Some(&overrides));
		assert_eq!(merged.description, "A");
	}

	#[test]
	fn absent_override_is_identity() {
		let default = PostOptions::new()
			.with_description("desc")
			.with_email("fred@bedrock.com")
			.with_attachment("/tmp/log.txt")
			.with_attribute("channel", "beta");

		let merged = PostOptions::merged(&default, None);
		assert_eq!(merged, default);
	}

	#[test]
	fn attachments_union_with_override_winning_on_path_collision() {
		let default = PostOptions::new()
			.with_attachment("/var/log/app.log")
			.with_attachment("/var/log/sys.log");
		let overrides = PostOptions::new().with_attachment("/var/log/app.log");

		let merged = PostOptions::merged(&default, Some(&overrides));
		assert_eq!(merged.attachments.len(), 2);
		assert_eq!(merged.attachments[0], PathBuf::from("/var/log/app.log"));
	}

	#[test]
	fn form_data_dedupes_by_name_with_override_winning() {
		let default = PostOptions::new()
			.with_form_data(FormDataParam::text("build", "release"))
			.with_form_data(FormDataParam::text("region", "us"));
		let overrides = PostOptions::new().with_form_data(FormDataParam::text("build", "debug"));

		let merged = PostOptions::merged(&default, Some(&overrides));
		assert_eq!(merged.form_data.len(), 2);
		let build = merged
			.form_data
			.iter()
			.find(|p| p.name == "build")
			.unwrap();
		assert_eq!(build.content, ParamContent::Text("debug".into()));
	}

	#[test]
	fn attributes_union_with_override_winning_per_key() {
		let default = PostOptions::new()
			.with_attribute("channel", "stable")
			.with_attribute("arch", "x86_64");
		let overrides = PostOptions::new().with_attribute("channel", "beta");

		let merged = PostOptions::merged(&default, Some(&overrides));
		assert_eq!(merged.attributes["channel"], "beta");
		assert_eq!(merged.attributes["arch"], "x86_64");
	}

	#[test]
	fn crash_type_resolution_follows_unknown_sentinel_rule() {
		let default = PostOptions::new()
			.with_crash_type(CrashType::Exception(ExceptionType::DotNetStandard));
		let unknown_override =
			PostOptions::new().with_crash_type(CrashType::Exception(ExceptionType::Unknown));
		let unity_override =
			PostOptions::new().with_crash_type(CrashType::Exception(ExceptionType::Unity));

		let merged = PostOptions::merged(&default, Some(&unknown_override));
		assert_eq!(merged.crash_type.id(), 18);

		let merged = PostOptions::merged(&default, Some(&unity_override));
		assert_eq!(merged.crash_type.id(), 24);
	}

	proptest! {
		#[test]
		fn merging_with_empty_override_yields_default_strings(
			description in ".*",
			email in ".*",
			user in ".*",
		) {
			let default = PostOptions::new()
				.with_description(description.clone())
				.with_email(email.clone())
				.with_user(user.clone());

			let merged = PostOptions::merged(&default, Some(&PostOptions::new()));
			prop_assert_eq!(merged.description, description);
			prop_assert_eq!(merged.email, email);
			prop_assert_eq!(merged.user, user);
		}

		#[test]
		fn merge_string_fields_pick_one_of_the_two_tiers(
			default_value in ".*",
			override_value in ".*",
		) {
			let picked = string_or_default(&override_value, &default_value);
			prop_assert!(picked == default_value || picked == override_value);
		}
	}
}
