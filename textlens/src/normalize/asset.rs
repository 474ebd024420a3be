use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ColorType, GenericImageView, ImageFormat, ImageReader};

use crate::error::{Result, TextLensError};

/// Content-detected image format, classified into the categories the
/// pipeline dispatches on. The set is closed: a new format has to be
/// placed into one of these arms deliberately rather than falling through
/// a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    /// Canonical lossy encoding; recognition accepts it natively.
    Jpeg,
    /// Canonical lossless encoding; recognition accepts it natively.
    Png,
    /// A container holding one or more embedded images, of which only the
    /// first is ever used.
    MultiFrame(ImageFormat),
    /// Any other format the codec stack can decode.
    Other(ImageFormat),
    /// Content not identifiable as an image.
    Unknown,
}

impl DetectedFormat {
    pub fn from_image_format(format: Option<ImageFormat>) -> Self {
        match format {
            Some(ImageFormat::Jpeg) => Self::Jpeg,
            Some(ImageFormat::Png) => Self::Png,
            Some(ImageFormat::Gif) => Self::MultiFrame(ImageFormat::Gif),
            Some(other) => Self::Other(other),
            None => Self::Unknown,
        }
    }

    /// True for the two encodings recognition consumes without conversion.
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::MultiFrame(fmt) => write!(f, "{}", format_name(*fmt)),
            Self::Other(fmt) => write!(f, "{}", format_name(*fmt)),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

fn format_name(fmt: ImageFormat) -> &'static str {
    fmt.extensions_str().first().copied().unwrap_or("image")
}

/// A reference to image data at rest, with attributes derived from the
/// content itself — the claimed filename plays no part. Assets are never
/// mutated: normalization produces new assets under derived names.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    path: PathBuf,
    format: DetectedFormat,
    width: u32,
    height: u32,
    color: ColorType,
}

impl ImageAsset {
    /// Inspect the file at `path` and derive its attributes.
    ///
    /// Fails with `UnsupportedFormat` when the content is not
    /// identifiable or decodable as an image.
    pub fn probe(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
        let format = DetectedFormat::from_image_format(reader.format());
        if matches!(format, DetectedFormat::Unknown) {
            return Err(TextLensError::UnsupportedFormat(format!(
                "{} does not contain a recognizable image",
                path.display()
            )));
        }

        let img = reader.decode().map_err(|e| {
            TextLensError::UnsupportedFormat(format!(
                "failed to decode {}: {e}",
                path.display()
            ))
        })?;
        let (width, height) = img.dimensions();

        Ok(Self {
            path: path.to_path_buf(),
            format,
            width,
            height,
            color: img.color(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bare file name, the form in which assets are referenced across
    /// the service boundary.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn format(&self) -> DetectedFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn color(&self) -> ColorType {
        self.color
    }
}
