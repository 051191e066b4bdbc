// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret loading from environment variables.
//!
//! A secret named `FOO` is read from `FOO` directly, or from the file whose
//! path is in `FOO_FILE` (for container secret mounts). Setting both is an
//! error.

use std::path::PathBuf;

use alumni_common_secret::SecretString;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set")]
	Ambiguous { name: String },

	#[error("failed to read {name}_FILE at {path}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Load an optional secret from `name` or `name_FILE`.
///
/// Empty values are treated as unset. Trailing newlines in secret files are
/// stripped.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{name}_FILE");
	let direct = std::env::var(name).ok().filter(|v| !v.is_empty());
	let file = std::env::var(&file_var).ok().filter(|v| !v.is_empty());

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			debug!(secret = name, path = %path.display(), "loading secret from file");
			let content = std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
				name: name.to_string(),
				path: path.clone(),
				source,
			})?;
			let trimmed = content.trim_end_matches(['\n', '\r']).to_string();
			if trimmed.is_empty() {
				Ok(None)
			} else {
				Ok(Some(SecretString::new(trimmed)))
			}
		}
		(None, None) => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// Each test uses its own variable name since the environment is process-wide.

	#[test]
	fn unset_secret_is_none() {
		assert!(load_secret_env("ALUMNI_TEST_SECRET_UNSET")
			.unwrap()
			.is_none());
	}

	#[test]
	fn reads_direct_value() {
		std::env::set_var("ALUMNI_TEST_SECRET_DIRECT", "s3cret");
		let secret = load_secret_env("ALUMNI_TEST_SECRET_DIRECT").unwrap().unwrap();
		assert_eq!(secret.expose(), "s3cret");
		std::env::remove_var("ALUMNI_TEST_SECRET_DIRECT");
	}

	#[test]
	fn reads_file_value_and_strips_newline() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();
		std::env::set_var("ALUMNI_TEST_SECRET_VIA_FILE_FILE", file.path());
		let secret = load_secret_env("ALUMNI_TEST_SECRET_VIA_FILE").unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");
		std::env::remove_var("ALUMNI_TEST_SECRET_VIA_FILE_FILE");
	}

	#[test]
	fn both_set_is_ambiguous() {
		std::env::set_var("ALUMNI_TEST_SECRET_BOTH", "a");
		std::env::set_var("ALUMNI_TEST_SECRET_BOTH_FILE", "/nonexistent");
		let err = load_secret_env("ALUMNI_TEST_SECRET_BOTH").unwrap_err();
		assert!(matches!(err, SecretEnvError::Ambiguous { .. }));
		std::env::remove_var("ALUMNI_TEST_SECRET_BOTH");
		std::env::remove_var("ALUMNI_TEST_SECRET_BOTH_FILE");
	}

	#[test]
	fn missing_file_is_an_error() {
		std::env::set_var(
			"ALUMNI_TEST_SECRET_MISSING_FILE",
			"/definitely/not/here/secret",
		);
		let err = load_secret_env("ALUMNI_TEST_SECRET_MISSING").unwrap_err();
		assert!(matches!(err, SecretEnvError::FileRead { .. }));
		std::env::remove_var("ALUMNI_TEST_SECRET_MISSING_FILE");
	}
}
