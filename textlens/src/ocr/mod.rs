//! Recognition adapter.
//!
//! Wraps the external text-recognition capability (Tesseract via leptess)
//! behind [`OcrProvider`]. The engine is treated as opaque: given
//! canonical-format image bytes it either produces extracted text or
//! fails. The adapter's job is translating those failures into the
//! system's error taxonomy — an image the engine cannot load is reported
//! differently from an extraction that fails — and degrading gracefully
//! when the engine is not installed at all.

mod provider;

pub use provider::OcrProvider;
