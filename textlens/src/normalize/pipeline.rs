use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, error};

use crate::error::{Result, TextLensError};

use super::asset::{DetectedFormat, ImageAsset};

/// Outcome of a successful normalization. The distinction matters to
/// callers only for observability; either way the contained asset is in
/// canonical format.
#[derive(Debug, Clone)]
pub enum Normalized {
    /// The stripped copy was already canonical; no conversion ran.
    Unchanged(ImageAsset),
    /// A format conversion produced a new asset.
    Converted(ImageAsset),
}

impl Normalized {
    pub fn asset(&self) -> &ImageAsset {
        match self {
            Normalized::Unchanged(asset) | Normalized::Converted(asset) => asset,
        }
    }

    pub fn into_asset(self) -> ImageAsset {
        match self {
            Normalized::Unchanged(asset) | Normalized::Converted(asset) => asset,
        }
    }
}

/// Normalize the image at `path`: strip metadata, then convert to a
/// canonical encoding if needed. Blocking (decode + encode); callers on an
/// async runtime run this under `spawn_blocking`.
pub fn normalize(path: &Path) -> Result<Normalized> {
    let stripped = strip_metadata(path)?;
    convert_to_canonical(&stripped)
}

/// Step 1: write a metadata-free single-frame copy of `path` next to it,
/// as `<stem>_clean.jpg`, flattened to three-channel RGB. Unconditional:
/// already-canonical images get a fresh copy too.
pub fn strip_metadata(path: &Path) -> Result<ImageAsset> {
    let bytes = std::fs::read(path)?;

    let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
    let Some(src_format) = reader.format() else {
        error!(file = %path.display(), "upload is not a recognizable image");
        return Err(TextLensError::UnsupportedFormat(format!(
            "{} does not contain a recognizable image",
            path.display()
        )));
    };

    // The generic decode path yields the first embedded image of a
    // multi-frame container, so the stripped copy is single-frame by
    // construction.
    let img = reader.decode().map_err(|e| {
        error!(
            stage = "strip",
            file = %path.display(),
            format = ?src_format,
            error = %e,
            "decode failed"
        );
        TextLensError::MetadataStrip(format!("failed to decode {}: {e}", path.display()))
    })?;

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let out = derived_path(path, "_clean");
    rgb.save_with_format(&out, ImageFormat::Jpeg).map_err(|e| {
        error!(
            stage = "strip",
            file = %out.display(),
            error = %e,
            "re-encode failed"
        );
        TextLensError::MetadataStrip(format!("failed to re-encode {}: {e}", path.display()))
    })?;

    debug!(
        file = %out.display(),
        format = %src_format.extensions_str().first().copied().unwrap_or("image"),
        "wrote stripped copy"
    );
    ImageAsset::probe(&out)
}

/// Step 2: classify the asset's detected format and convert to the
/// canonical lossy encoding when it is not already canonical. Exhaustive
/// over [`DetectedFormat`]; extending the format set forces a decision
/// here.
pub fn convert_to_canonical(asset: &ImageAsset) -> Result<Normalized> {
    match asset.format() {
        DetectedFormat::Jpeg | DetectedFormat::Png => {
            debug!(file = %asset.path().display(), format = %asset.format(), "already canonical");
            Ok(Normalized::Unchanged(asset.clone()))
        }
        DetectedFormat::MultiFrame(container) => {
            convert_first_frame(asset, container).map(Normalized::Converted)
        }
        DetectedFormat::Other(_) => convert_whole(asset).map(Normalized::Converted),
        DetectedFormat::Unknown => Err(TextLensError::UnsupportedFormat(format!(
            "{} does not contain a recognizable image",
            asset.path().display()
        ))),
    }
}

/// Select embedded image 0 of a multi-image container, discard the rest,
/// and re-encode as JPEG. Lossy and deliberate: the pipeline only ever
/// inspects the first image of any multi-image file.
fn convert_first_frame(asset: &ImageAsset, container: ImageFormat) -> Result<ImageAsset> {
    let path = asset.path();
    let bytes = std::fs::read(path)?;

    let first = match container {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes.as_slice())).map_err(|e| {
                TextLensError::UnsupportedFormat(format!(
                    "failed to open {}: {e}",
                    path.display()
                ))
            })?;
            let mut frames = decoder.into_frames();
            match frames.next() {
                Some(Ok(frame)) => DynamicImage::ImageRgba8(frame.into_buffer()),
                Some(Err(e)) => {
                    error!(stage = "convert", file = %path.display(), error = %e, "frame decode failed");
                    return Err(TextLensError::UnsupportedFormat(format!(
                        "failed to decode first image of {}: {e}",
                        path.display()
                    )));
                }
                None => {
                    error!(stage = "convert", file = %path.display(), "container holds no images");
                    return Err(TextLensError::MetadataStrip(format!(
                        "{} contains no images",
                        path.display()
                    )));
                }
            }
        }
        // Any other frame-oriented container: the generic decoder already
        // yields the first embedded image.
        _ => image::load_from_memory(&bytes).map_err(|e| {
            TextLensError::UnsupportedFormat(format!("failed to decode {}: {e}", path.display()))
        })?,
    };

    write_converted(path, first)
}

/// Re-encode a single-image asset to JPEG.
fn convert_whole(asset: &ImageAsset) -> Result<ImageAsset> {
    let path = asset.path();
    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|e| {
        TextLensError::UnsupportedFormat(format!("failed to decode {}: {e}", path.display()))
    })?;
    write_converted(path, img)
}

fn write_converted(src: &Path, img: DynamicImage) -> Result<ImageAsset> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let out = derived_path(src, "_converted");
    rgb.save_with_format(&out, ImageFormat::Jpeg).map_err(|e| {
        error!(stage = "convert", file = %out.display(), error = %e, "re-encode failed");
        TextLensError::MetadataStrip(format!("failed to re-encode {}: {e}", src.display()))
    })?;
    debug!(file = %out.display(), "wrote converted copy");
    ImageAsset::probe(&out)
}

/// `<dir>/<stem><suffix>.jpg` alongside the source file.
fn derived_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    path.with_file_name(format!("{stem}{suffix}.jpg"))
}
