#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::codecs::gif::GifEncoder;
use image::{DynamicImage, Frame, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use textlens::config::{
    Config, NormalizeConfig, OcrConfig, RecognitionClientConfig, ServerConfig, StorageConfig,
    UploadConfig,
};

/// Solid-color image encoded to the given format.
pub fn image_bytes(width: u32, height: u32, fmt: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 90, 90])));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), fmt).unwrap();
    out
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// One GIF frame per color, in order.
pub fn animated_gif_bytes(colors: &[[u8; 3]]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        let frames = colors
            .iter()
            .map(|c| Frame::new(RgbaImage::from_pixel(32, 32, Rgba([c[0], c[1], c[2], 255]))));
        encoder.encode_frames(frames).unwrap();
    }
    out
}

/// A GIF header and trailer with no embedded images.
pub fn empty_gif_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"GIF89a");
    bytes.extend_from_slice(&[0x20, 0x00, 0x20, 0x00, 0x00, 0x00, 0x00]);
    bytes.push(0x3B);
    bytes
}

pub fn garbage_bytes() -> Vec<u8> {
    b"this payload is not any kind of image".to_vec()
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Config pointing both services at a temp upload dir and the given
/// recognition endpoint, with timeouts short enough for tests.
pub fn test_config(upload_dir: &Path, recognition_url: &str) -> Config {
    Config {
        ingress: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        recognition: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: StorageConfig {
            upload_dir: upload_dir.to_path_buf(),
        },
        upload: UploadConfig {
            allowed_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
            ],
            max_file_size: 25 * 1024 * 1024,
        },
        ocr: OcrConfig {
            languages: "eng".to_string(),
            timeout_secs: 30,
        },
        recognition_client: RecognitionClientConfig {
            base_url: recognition_url.to_string(),
            timeout_secs: 2,
        },
        normalize: NormalizeConfig { max_concurrent: 2 },
    }
}
