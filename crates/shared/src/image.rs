use fast_image_resize::Resizer;
use fast_image_resize::images::Image;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ImageProcessingError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),

    #[error("Failed to resize image: {0}")]
    Resize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image dimensions")]
    InvalidDimensions,
}

pub type ImageResult<T> = Result<T, ImageProcessingError>;

/// Scales source dimensions down to fit the canvas, preserving aspect
/// ratio via the smaller of the two axis ratios. A source already
/// within the canvas is returned unchanged.
pub fn fit_to_canvas(source_w: u32, source_h: u32, canvas_w: u32, canvas_h: u32) -> (u32, u32) {
    if source_w > canvas_w || source_h > canvas_h {
        let width_ratio = canvas_w as f64 / source_w as f64;
        let height_ratio = canvas_h as f64 / source_h as f64;
        let ratio = width_ratio.min(height_ratio);
        (
            (source_w as f64 * ratio) as u32,
            (source_h as f64 * ratio) as u32,
        )
    } else {
        (source_w, source_h)
    }
}

pub fn load_image_from_bytes(data: &[u8]) -> ImageResult<DynamicImage> {
    let img = image::load_from_memory(data)?;
    debug!(width = img.width(), height = img.height(), "loaded image from memory");
    Ok(img)
}

pub fn load_image_from_path<P: AsRef<Path>>(path: P) -> ImageResult<DynamicImage> {
    let img = image::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "loaded image");
    Ok(img)
}

/// Cuts the given region out of the image. The region must lie fully
/// within the image and have a non-zero area.
pub fn crop_image(
    image: &DynamicImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> ImageResult<DynamicImage> {
    if width == 0
        || height == 0
        || x.saturating_add(width) > image.width()
        || y.saturating_add(height) > image.height()
    {
        return Err(ImageProcessingError::InvalidDimensions);
    }
    Ok(image.crop_imm(x, y, width, height))
}

pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> ImageResult<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(ImageProcessingError::InvalidDimensions);
    }

    let rgba = image.to_rgba8();
    let src_image = Image::from_vec_u8(
        image.width(),
        image.height(),
        rgba.into_raw(),
        fast_image_resize::PixelType::U8x4,
    )
    .map_err(|e| ImageProcessingError::Resize(e.to_string()))?;

    let mut dst_image = Image::new(width, height, fast_image_resize::PixelType::U8x4);

    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, None)
        .map_err(|e| ImageProcessingError::Resize(e.to_string()))?;

    let resized = RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or(ImageProcessingError::InvalidDimensions)?;
    Ok(DynamicImage::ImageRgba8(resized))
}

/// Encodes the image to `path`. With an explicit `format` the path
/// extension is ignored; otherwise the format is inferred from it.
/// `quality` only affects JPEG output.
pub fn save_image(
    image: &DynamicImage,
    path: &Path,
    format: Option<ImageFormat>,
    quality: u8,
) -> ImageResult<()> {
    let format = match format {
        Some(format) => format,
        None => ImageFormat::from_path(path)?,
    };

    if format == ImageFormat::Jpeg {
        // JPEG has no alpha channel and is the only format with a
        // caller-visible quality knob.
        let file = File::create(path)?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
        image.to_rgb8().write_with_encoder(encoder)?;
    } else {
        image.save_with_format(path, format)?;
    }

    debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}

pub fn is_supported_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tiff" | "tif" | "ico" | "avif"
    )
}
