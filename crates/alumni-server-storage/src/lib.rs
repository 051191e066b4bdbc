// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object storage for profile photos.
//!
//! Objects are written under a bucket directory and handed out through
//! HMAC-signed URLs that stop working after a fixed time-to-live.

pub mod error;
pub mod filesystem;
pub mod image;
pub mod signing;
pub mod store;

pub use error::{Result, StorageError};
pub use filesystem::FilesystemObjectStore;
pub use image::{sniff_image_type, IMAGE_JPEG, IMAGE_PNG};
pub use signing::{UrlSigner, DEFAULT_PRESIGN_TTL_SECS};
pub use store::{validate_key, ObjectStore, StoredObject};
