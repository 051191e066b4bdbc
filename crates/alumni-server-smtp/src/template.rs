// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Named e-mail templates.
//!
//! Stored templates override these built-ins by name. Placeholders are
//! `{{name}}`; unknown placeholders are left as written. Substituted values
//! are HTML-escaped.

use std::collections::BTreeMap;

pub const NEW_ALUMNI: &str = "new_alumni";
pub const ALUMNI_UPDATED: &str = "alumni_updated";
pub const ACCOUNT_APPROVED: &str = "account_approved";
pub const FORGOT_PASSWORD: &str = "forgot_password";
pub const HAPPY_BIRTHDAY: &str = "happy_birthday";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
	pub name: &'static str,
	pub subject: &'static str,
	pub html: &'static str,
}

const BUILTINS: &[BuiltinTemplate] = &[
	BuiltinTemplate {
		name: NEW_ALUMNI,
		subject: "New alumni record: {{firstname}} {{lastname}}",
		html: "<p>{{firstname}} {{lastname}} ({{email}}) added a record to the alumni directory.</p>\
		       <p><a href=\"{{base_url}}\">Review it</a></p>",
	},
	BuiltinTemplate {
		name: ALUMNI_UPDATED,
		subject: "Alumni record updated: {{firstname}} {{lastname}}",
		html: "<p>{{firstname}} {{lastname}} ({{email}}) updated their alumni record.</p>\
		       <p><a href=\"{{base_url}}\">Review it</a></p>",
	},
	BuiltinTemplate {
		name: ACCOUNT_APPROVED,
		subject: "Your alumni directory account is approved",
		html: "<p>Your account ({{email}}) can now browse the alumni directory.</p>\
		       <p><a href=\"{{base_url}}\">Sign in</a></p>",
	},
	BuiltinTemplate {
		name: FORGOT_PASSWORD,
		subject: "Reset your alumni directory password",
		html: "<p>Someone asked to reset the password for {{email}}.</p>\
		       <p><a href=\"{{reset_link}}\">Choose a new password</a>. The link expires in one hour.</p>\
		       <p>If this was not you, ignore this e-mail.</p>",
	},
	BuiltinTemplate {
		name: HAPPY_BIRTHDAY,
		subject: "Happy birthday, {{firstname}}!",
		html: "<p>Happy birthday {{firstname}} {{lastname}} from all of us at the alumni association!</p>",
	},
];

pub fn builtin_template(name: &str) -> Option<&'static BuiltinTemplate> {
	BUILTINS.iter().find(|t| t.name == name)
}

/// Placeholder values keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
		self.0.insert(name.to_string(), value.into());
		self
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}
}

pub fn render_template(template: &str, vars: &TemplateVars) -> String {
	let mut out = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(start) = rest.find("{{") {
		out.push_str(&rest[..start]);
		let after = &rest[start + 2..];
		match after.find("}}") {
			Some(end) => {
				let name = after[..end].trim();
				match vars.get(name) {
					Some(value) => out.push_str(&escape_html(value)),
					None => out.push_str(&rest[start..start + 2 + end + 2]),
				}
				rest = &after[end + 2..];
			}
			None => {
				out.push_str(&rest[start..]);
				rest = "";
			}
		}
	}
	out.push_str(rest);
	out
}

fn escape_html(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Crude plain-text rendering: drops tags, turns paragraph ends into blank lines.
pub fn html_to_text(html: &str) -> String {
	let spaced = html.replace("</p>", "</p>\n\n").replace("<br>", "\n");
	let mut text = String::with_capacity(spaced.len());
	let mut in_tag = false;
	for c in spaced.chars() {
		match c {
			'<' => in_tag = true,
			'>' if in_tag => in_tag = false,
			_ if !in_tag => text.push(c),
			_ => {}
		}
	}
	text
		.replace("&amp;", "&")
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&#39;", "'")
		.trim()
		.to_string()
}
