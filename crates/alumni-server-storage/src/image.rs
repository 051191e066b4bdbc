// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Content-type detection for uploaded photos.

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Identify a JPEG or PNG image from its leading bytes.
///
/// The declared content type of an upload is ignored; only the bytes count.
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
	if bytes.starts_with(JPEG_MAGIC) {
		Some(IMAGE_JPEG)
	} else if bytes.starts_with(PNG_MAGIC) {
		Some(IMAGE_PNG)
	} else {
		None
	}
}
