// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token extraction.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::instrument;

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Returns `None` when the header is missing, not valid UTF-8, uses another
/// scheme, or carries an empty token.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	fn headers_with(value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
		headers
	}

	#[test]
	fn extracts_bearer_token() {
		assert_eq!(
			extract_bearer_token(&headers_with("Bearer abc.def.ghi")),
			Some("abc.def.ghi".to_string())
		);
	}

	#[test]
	fn missing_header_is_none() {
		assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
	}

	#[test]
	fn other_schemes_are_ignored() {
		assert_eq!(extract_bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
	}

	#[test]
	fn empty_token_is_none() {
		assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
	}
}
