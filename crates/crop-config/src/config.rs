use crop_types::AspectRatio;
use serde::{Deserialize, Serialize};

/// Outline color of the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionColor {
    Black,
    White,
    Red,
    Green,
    Blue,
    Cyan,
    Yellow,
    Magenta,
}

/// Output encoding. `Source` keeps each image's own extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Source,
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl OutputFormat {
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Source => None,
            OutputFormat::Png => Some("png"),
            OutputFormat::Jpeg => Some("jpg"),
            OutputFormat::Webp => Some("webp"),
            OutputFormat::Bmp => Some("bmp"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropConfig {
    /// Fixed width:height selection constraint; `None` is free-form.
    pub aspect_ratio: Option<AspectRatio>,
    /// Target size every saved crop is resized to.
    pub resize: Option<(u32, u32)>,
    pub selection_color: SelectionColor,
    pub window_size: (u32, u32),
    pub output_format: OutputFormat,
    /// JPEG quality, 1-100.
    pub image_quality: u8,
    /// Subdirectory of the input directory that receives the crops.
    pub output_dir_name: String,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: None,
            resize: None,
            selection_color: SelectionColor::Yellow,
            window_size: (800, 600),
            output_format: OutputFormat::Source,
            image_quality: 90,
            output_dir_name: String::from("crops"),
        }
    }
}

pub fn config() -> CropConfig {
    CropConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = config();
        assert!(cfg.aspect_ratio.is_none());
        assert!(cfg.resize.is_none());
        assert_eq!(cfg.selection_color, SelectionColor::Yellow);
        assert_eq!(cfg.output_dir_name, "crops");
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Source.extension(), None);
        assert_eq!(OutputFormat::Jpeg.extension(), Some("jpg"));
    }
}
