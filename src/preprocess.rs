//! Image shrinking before upload.
//!
//! Uploads are capped at 5 MiB by validation, but the server only needs a
//! web-sized picture. [`ImageCompressor`] downsizes to the configured bounding
//! box and re-encodes as JPEG until the payload fits the byte budget.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageError};
use thiserror::Error;

use crate::config::ImageConfig;
use crate::form::ImageFile;

/// JPEG qualities tried in order before the image is scaled down further.
const QUALITY_STEPS: [u8; 5] = [90, 80, 70, 60, 50];
/// Shrink factor (percent) applied when no quality fits the budget.
const SCALE_STEP_PERCENT: u32 = 80;
const MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub max_size_bytes: usize,
    pub max_dimension: u32,
    /// Run on the blocking thread pool instead of the async task.
    pub use_background_thread: bool,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: 1024 * 1024,
            max_dimension: 1920,
            use_background_thread: true,
        }
    }
}

impl From<&ImageConfig> for CompressionOptions {
    fn from(config: &ImageConfig) -> Self {
        Self {
            max_size_bytes: config.max_size_bytes,
            max_dimension: config.max_dimension,
            use_background_thread: config.use_background_thread,
        }
    }
}

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to decode '{file_name}': {source}")]
    Decode {
        file_name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode compressed image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Compression task failed: {0}")]
    Task(String),
}

/// Compresses an image before it is uploaded.
pub trait ImagePreprocessor: Send + Sync {
    fn process(
        &self,
        file: ImageFile,
        options: &CompressionOptions,
    ) -> Result<ImageFile, PreprocessError>;
}

/// Run `preprocessor`, on the blocking pool when the options ask for it.
pub async fn run_preprocessor(
    preprocessor: Arc<dyn ImagePreprocessor>,
    file: ImageFile,
    options: CompressionOptions,
) -> Result<ImageFile, PreprocessError> {
    if !options.use_background_thread {
        return preprocessor.process(file, &options);
    }
    tokio::task::spawn_blocking(move || preprocessor.process(file, &options))
        .await
        .map_err(|e| PreprocessError::Task(e.to_string()))?
}

/// Default [`ImagePreprocessor`] built on the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCompressor;

impl ImagePreprocessor for ImageCompressor {
    fn process(
        &self,
        file: ImageFile,
        options: &CompressionOptions,
    ) -> Result<ImageFile, PreprocessError> {
        let decoded = match image::load_from_memory(file.bytes()) {
            Ok(decoded) => decoded,
            // Formats without a decoder (SVG, HEIC, ...) go up as-is
            Err(ImageError::Unsupported(err)) => {
                tracing::warn!(
                    file = file.file_name(),
                    mime = file.mime(),
                    error = %err,
                    "no decoder for image, sending original"
                );
                return Ok(file);
            }
            Err(source) => {
                return Err(PreprocessError::Decode {
                    file_name: file.file_name().to_string(),
                    source,
                })
            }
        };

        let (width, height) = GenericImageView::dimensions(&decoded);
        let fits_box = width.max(height) <= options.max_dimension;
        if fits_box && file.size() <= options.max_size_bytes {
            tracing::debug!(
                file = file.file_name(),
                size = file.size(),
                "image already within limits"
            );
            return Ok(file);
        }

        let mut current = if fits_box {
            decoded
        } else {
            decoded.resize(options.max_dimension, options.max_dimension, FilterType::Triangle)
        };

        let mut smallest: Option<Vec<u8>> = None;
        for _ in 0..MAX_ITERATIONS {
            for quality in QUALITY_STEPS {
                let encoded = encode_jpeg(&current, quality)?;
                if encoded.len() <= options.max_size_bytes {
                    return Ok(finish(&file, encoded));
                }
                if smallest.as_ref().map_or(true, |s| encoded.len() < s.len()) {
                    smallest = Some(encoded);
                }
            }
            let (w, h) = GenericImageView::dimensions(&current);
            let next_w = (w * SCALE_STEP_PERCENT / 100).max(1);
            let next_h = (h * SCALE_STEP_PERCENT / 100).max(1);
            if (next_w, next_h) == (w, h) {
                break;
            }
            current = current.resize_exact(next_w, next_h, FilterType::Triangle);
        }

        tracing::warn!(
            file = file.file_name(),
            budget = options.max_size_bytes,
            "could not reach size budget, sending smallest encoding"
        );
        match smallest {
            Some(bytes) => Ok(finish(&file, bytes)),
            None => Ok(file),
        }
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, PreprocessError> {
    let rgb = image.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(PreprocessError::Encode)?;
    Ok(out.into_inner())
}

fn finish(original: &ImageFile, bytes: Vec<u8>) -> ImageFile {
    let file_name = Path::new(original.file_name())
        .with_extension("jpg")
        .to_string_lossy()
        .into_owned();
    tracing::debug!(
        file = %file_name,
        before = original.size(),
        after = bytes.len(),
        "image compressed"
    );
    ImageFile::new(file_name, "image/jpeg", bytes)
}
