// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signed bearer tokens.
//!
//! A token is an HS256 JWT carrying the account id (`sub`), the admin flag as
//! it was at issuance, and an expiry 36 hours after the (whole-second) issue
//! instant. Tokens are never persisted and cannot be revoked; a stale admin
//! flag is corrected on the next refresh because the flag is re-read from the
//! account.
//!
//! Expiry is checked against the caller-supplied `now`, not the wall clock, so
//! [`TokenCodec::parse`] is a pure function of its inputs.

use alumni_common_secret::SecretString;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

use crate::error::{AuthError, Result};
use alumni_directory_core::AccountId;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 36;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
	pub sub: AccountId,
	pub admin: bool,
	pub iat: i64,
	pub exp: i64,
}

impl TokenClaims {
	pub fn expires_at(&self) -> Option<DateTime<Utc>> {
		DateTime::from_timestamp(self.exp, 0)
	}
}

/// Issues and verifies bearer tokens with a shared HMAC key.
#[derive(Clone)]
pub struct TokenCodec {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	has_key: bool,
	ttl: Duration,
}

impl TokenCodec {
	pub fn new(secret: &SecretString) -> Self {
		let key = secret.expose().as_bytes();
		Self {
			encoding_key: EncodingKey::from_secret(key),
			decoding_key: DecodingKey::from_secret(key),
			has_key: !secret.is_empty(),
			ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
		}
	}

	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;
		self
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Issue a token for `account_id` expiring one TTL after `now`.
	#[instrument(level = "debug", skip(self), fields(account_id = %account_id))]
	pub fn issue(&self, account_id: AccountId, is_admin: bool, now: DateTime<Utc>) -> Result<String> {
		if !self.has_key {
			return Err(AuthError::Signing("token signing key is not configured".to_string()));
		}

		let iat = now.timestamp();
		let claims = TokenClaims {
			sub: account_id,
			admin: is_admin,
			iat,
			exp: iat + self.ttl.num_seconds(),
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
			.map_err(|e| AuthError::Signing(e.to_string()))
	}

	/// Verify a token and return its claims.
	///
	/// # Errors
	///
	/// - [`AuthError::InvalidToken`] if the signature does not verify, the
	///   algorithm is not HS256, or the claims are missing or malformed
	/// - [`AuthError::ExpiredToken`] if `now` is at or past the expiry
	#[instrument(level = "debug", skip_all)]
	pub fn parse(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims> {
		if !self.has_key {
			return Err(AuthError::InvalidToken);
		}

		let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation())
			.map_err(|e| {
				tracing::debug!(error = %e, "token rejected");
				AuthError::InvalidToken
			})?
			.claims;

		if now.timestamp() >= claims.exp {
			tracing::debug!(account_id = %claims.sub, exp = claims.exp, "token expired");
			return Err(AuthError::ExpiredToken);
		}

		Ok(claims)
	}
}

fn validation() -> Validation {
	let mut validation = Validation::new(Algorithm::HS256);
	validation.validate_exp = false;
	validation.validate_aud = false;
	validation.required_spec_claims.clear();
	validation.leeway = 0;
	validation
}

impl fmt::Debug for TokenCodec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenCodec")
			.field("has_key", &self.has_key)
			.field("ttl", &self.ttl)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn codec() -> TokenCodec {
		TokenCodec::new(&SecretString::new("test-signing-key".to_string()))
	}

	fn t0() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
	}

	mod issue_and_parse {
		use super::*;

		#[test]
		fn round_trip_preserves_subject_and_flag() {
			let id = AccountId::generate();
			let token = codec().issue(id, true, t0()).unwrap();
			let claims = codec().parse(&token, t0()).unwrap();
			assert_eq!(claims.sub, id);
			assert!(claims.admin);
			assert_eq!(claims.exp - claims.iat, 36 * 60 * 60);
		}

		#[test]
		fn valid_one_second_before_expiry() {
			let token = codec().issue(AccountId::generate(), false, t0()).unwrap();
			let almost = t0() + Duration::hours(36) - Duration::seconds(1);
			assert!(codec().parse(&token, almost).is_ok());
		}

		#[test]
		fn expired_exactly_at_expiry() {
			let token = codec().issue(AccountId::generate(), false, t0()).unwrap();
			let at = t0() + Duration::hours(36);
			assert!(matches!(codec().parse(&token, at), Err(AuthError::ExpiredToken)));
		}

		#[test]
		fn custom_ttl_is_honoured() {
			let codec = codec().with_ttl(Duration::minutes(5));
			let token = codec.issue(AccountId::generate(), false, t0()).unwrap();
			assert!(codec.parse(&token, t0() + Duration::minutes(4)).is_ok());
			assert!(matches!(
				codec.parse(&token, t0() + Duration::minutes(5)),
				Err(AuthError::ExpiredToken)
			));
		}
	}

	mod rejection {
		use super::*;

		#[test]
		fn wrong_key_is_invalid() {
			let token = codec().issue(AccountId::generate(), false, t0()).unwrap();
			let other = TokenCodec::new(&SecretString::new("another-key".to_string()));
			assert!(matches!(other.parse(&token, t0()), Err(AuthError::InvalidToken)));
		}

		#[test]
		fn tampered_payload_is_invalid() {
			let token = codec().issue(AccountId::generate(), false, t0()).unwrap();
			let forged = codec().issue(AccountId::generate(), true, t0()).unwrap();
			let parts: Vec<&str> = token.split('.').collect();
			let forged_parts: Vec<&str> = forged.split('.').collect();
			let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
			assert!(matches!(codec().parse(&spliced, t0()), Err(AuthError::InvalidToken)));
		}

		#[test]
		fn other_algorithm_is_invalid() {
			let claims = TokenClaims {
				sub: AccountId::generate(),
				admin: true,
				iat: t0().timestamp(),
				exp: t0().timestamp() + 3600,
			};
			let token = encode(
				&Header::new(Algorithm::HS512),
				&claims,
				&EncodingKey::from_secret(b"test-signing-key"),
			)
			.unwrap();
			assert!(matches!(codec().parse(&token, t0()), Err(AuthError::InvalidToken)));
		}

		#[test]
		fn missing_expiry_is_invalid() {
			#[derive(Serialize)]
			struct NoExp {
				sub: AccountId,
				admin: bool,
				iat: i64,
			}
			let token = encode(
				&Header::new(Algorithm::HS256),
				&NoExp {
					sub: AccountId::generate(),
					admin: false,
					iat: t0().timestamp(),
				},
				&EncodingKey::from_secret(b"test-signing-key"),
			)
			.unwrap();
			assert!(matches!(codec().parse(&token, t0()), Err(AuthError::InvalidToken)));
		}

		#[test]
		fn malformed_expiry_is_invalid() {
			let token = encode(
				&Header::new(Algorithm::HS256),
				&serde_json::json!({
					"sub": AccountId::generate(),
					"admin": false,
					"iat": t0().timestamp(),
					"exp": "2025-06-03T00:00:00Z",
				}),
				&EncodingKey::from_secret(b"test-signing-key"),
			)
			.unwrap();
			assert!(matches!(codec().parse(&token, t0()), Err(AuthError::InvalidToken)));
		}

		#[test]
		fn garbage_is_invalid() {
			assert!(matches!(codec().parse("not.a.jwt", t0()), Err(AuthError::InvalidToken)));
			assert!(matches!(codec().parse("", t0()), Err(AuthError::InvalidToken)));
		}

		#[test]
		fn empty_key_cannot_sign() {
			let codec = TokenCodec::new(&SecretString::new(String::new()));
			assert!(matches!(
				codec.issue(AccountId::generate(), false, t0()),
				Err(AuthError::Signing(_))
			));
		}
	}

	#[test]
	fn debug_does_not_print_keys() {
		let debug = format!("{:?}", codec());
		assert!(!debug.contains("test-signing-key"));
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn accepted_iff_before_expiry(
				issued_secs in 1_000_000_000i64..2_000_000_000,
				issued_nanos in 0u32..1_000_000_000,
				elapsed_ms in 0i64..(72 * 60 * 60 * 1000),
				admin in any::<bool>(),
			) {
				let issued = DateTime::from_timestamp(issued_secs, issued_nanos).unwrap();
				let now = issued + Duration::milliseconds(elapsed_ms);
				let id = AccountId::generate();
				let token = codec().issue(id, admin, issued).unwrap();
				let expiry = DateTime::from_timestamp(issued_secs, 0).unwrap() + Duration::hours(36);

				match codec().parse(&token, now) {
					Ok(claims) => {
						prop_assert!(now < expiry);
						prop_assert_eq!(claims.sub, id);
						prop_assert_eq!(claims.admin, admin);
					}
					Err(AuthError::ExpiredToken) => prop_assert!(now >= expiry),
					Err(other) => prop_assert!(false, "unexpected error: {}", other),
				}
			}
		}
	}
}
