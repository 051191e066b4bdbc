// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and record visibility for the alumni directory.
//!
//! - [`token`]: signed bearer tokens with a 36 hour lifetime
//! - [`session`]: turning a bearer token into a loaded [`Account`]
//! - [`visibility`]: the pure rules deciding how much of a record a caller sees
//! - [`password`]: Argon2 credential hashing
//! - [`reset`]: single-use password reset tokens
//! - [`clock`]: injectable time source

mod argon2_config;
pub mod clock;
pub mod error;
pub mod middleware;
pub mod password;
pub mod reset;
pub mod session;
pub mod token;
pub mod visibility;

pub use alumni_directory_core::{Account, AccountId, AlumniId, ApprovalState, DisclosureLevel};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AuthError, Result};
pub use middleware::extract_bearer_token;
pub use password::{Argon2Hasher, CredentialHasher};
pub use reset::{generate_reset_token, hash_reset_token, reset_token_ttl, RESET_TOKEN_TTL_SECS};
pub use session::{AccountLookup, SessionResolver};
pub use token::{TokenClaims, TokenCodec, DEFAULT_TOKEN_TTL_HOURS};
pub use visibility::{
	can_browse, can_manage_accounts, can_modify, resolve_disclosure, CallerAttrs, TargetAttrs,
};
