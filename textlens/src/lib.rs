//! textlens — image upload and OCR pipeline.
//!
//! Two services share this library: the ingress API (`textlens-api`)
//! accepts image uploads, and the recognition service (`textlens-ocr`)
//! extracts text from them. Between the two sits the normalization
//! pipeline in [`normalize`], which turns an arbitrary uploaded raster
//! image into a metadata-free canonical copy the recognition engine can
//! always decode. Both services apply it — the recognition side
//! deliberately re-normalizes rather than trusting its caller across the
//! network hop.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod ocr;
pub mod storage;
