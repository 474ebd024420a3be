//! Image normalization pipeline.
//!
//! This module is the shared core of both services: it takes an arbitrary
//! uploaded raster image and produces a canonical, metadata-free copy that
//! the recognition engine can always decode.
//!
//! # Pipeline
//!
//! `normalize` applies two steps in fixed order:
//! 1. **Metadata strip** — unconditional: decode, flatten to three-channel
//!    RGB (dropping alpha and any embedded profile), re-encode as a fresh
//!    JPEG under a derived name. Runs even on already-canonical input.
//! 2. **Format classification** — inspect the stripped copy's detected
//!    format and convert to JPEG if it is not already one of the two
//!    canonical encodings (JPEG, PNG). Multi-image containers contribute
//!    only their first embedded image; the rest are discarded.
//!
//! Re-encoding always targets JPEG even when the source was lossless.
//! That quality trade-off is deliberate: the output feeds text
//! recognition, not an image archive.
//!
//! Normalization never mutates an asset in place — every transformation
//! writes a new file next to the source, so applying it to an
//! already-canonical asset is cheap and idempotent.

mod asset;
mod pipeline;

pub use asset::{DetectedFormat, ImageAsset};
pub use pipeline::{convert_to_canonical, normalize, strip_metadata, Normalized};
