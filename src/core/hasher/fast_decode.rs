//! Image decoding.
//!
//! JPEG files go through zune-jpeg first (1.5-2x faster than the image
//! crate); everything else, and any JPEG zune cannot handle, goes through
//! the image crate.

use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, ImageReader, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg")
    )
}

/// Decoder front end used by every hasher
pub struct FastDecoder;

impl FastDecoder {
    pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
        if is_jpeg(path) {
            Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))
        } else {
            Self::decode_fallback(path)
        }
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage, HashError> {
        let decode_error = |reason: String| HashError::DecodeError {
            path: path.to_path_buf(),
            reason,
        };

        let file_bytes = fs::read(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder
            .decode()
            .map_err(|e| decode_error(format!("zune-jpeg decode failed: {:?}", e)))?;

        let info = decoder
            .info()
            .ok_or_else(|| decode_error("missing JPEG header info".to_string()))?;
        let (width, height) = (info.width as u32, info.height as u32);

        let buffer_error = || decode_error("pixel buffer does not match dimensions".to_string());

        match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(buffer_error),
            ColorSpace::RGBA => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(buffer_error),
            ColorSpace::Luma => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(buffer_error),
            _ => Self::decode_fallback(path),
        }
    }

    /// Decode with the image crate, trusting file contents over the extension
    fn decode_fallback(path: &Path) -> Result<DynamicImage, HashError> {
        let reader = ImageReader::open(path)
            .map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?
            .with_guessed_format()
            .map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;

        if reader.format().is_none() {
            return Err(HashError::UnsupportedFormat {
                format: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            });
        }

        reader.decode().map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
