use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tracing::{debug, warn};

use crop_config::{CropConfig, OutputFormat};
use crop_nav::NavState;
use crop_session::SelectionSession;
use crop_types::ImageGeometry;
use shared::image::{crop_image, fit_to_canvas, load_image_from_path, resize_image, save_image};

use crate::BatchcropError;
use crate::output::find_available_name;

/// Drives one cropping session over an input directory: current image,
/// selection state, save flow and navigation. The presentation layer
/// re-reads session coordinates after every call instead of holding
/// its own handles.
pub struct CropEditor {
    config: CropConfig,
    nav: NavState,
    input_dir: PathBuf,
    canvas_size: (u32, u32),
    current_image: Option<DynamicImage>,
    session: Option<SelectionSession>,
}

impl CropEditor {
    pub fn new(config: CropConfig) -> Self {
        let canvas_size = config.window_size;
        Self {
            config,
            nav: NavState::default(),
            input_dir: PathBuf::new(),
            canvas_size,
            current_image: None,
            session: None,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&SelectionSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SelectionSession> {
        self.session.as_mut()
    }

    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    /// Directory receiving saved crops, a subdirectory of the input.
    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(&self.config.output_dir_name)
    }

    /// Scans `dir` for images and loads the first one. Unreadable
    /// entries at the front are skipped the same way navigation skips
    /// them.
    pub fn open_directory(&mut self, dir: &Path) -> Result<(), BatchcropError> {
        self.input_dir = dir.to_path_buf();
        self.nav.set_images(crop_nav::scan_dir_sync(dir));
        self.current_image = None;
        self.session = None;

        if self.nav.current().is_some() && !self.load_current() {
            self.next_image();
        }
        Ok(())
    }

    /// Presentation layer reports its drawable area; the current image
    /// is refitted to it.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_size = (width, height);
        if let Some(image) = self.current_image.take() {
            self.display_image(image);
        }
    }

    pub fn next_image(&mut self) {
        while self.nav.go_next().is_some() {
            if self.load_current() {
                return;
            }
        }
    }

    pub fn previous_image(&mut self) {
        while self.nav.go_prev().is_some() {
            if self.load_current() {
                return;
            }
        }
    }

    /// Rotates the current image by 90 degrees and re-displays it,
    /// which rebuilds the geometry and resets the selection.
    pub fn rotate_image(&mut self) {
        if let Some(image) = self.current_image.take() {
            self.display_image(image.rotate90());
        }
    }

    /// Swaps the configured ratio's axes for this and future images.
    pub fn rotate_aspect_ratio(&mut self) {
        self.config.aspect_ratio = self.config.aspect_ratio.map(|r| r.rotated());
        if let Some(session) = self.session.as_mut() {
            session.rotate_aspect_ratio();
        }
    }

    /// Crops the source image under the current selection and writes it
    /// to the next free `_crop<N>` name in the output directory.
    /// Returns the written path, or `None` when there is no selection
    /// to save.
    pub fn save(&mut self) -> Result<Option<PathBuf>, BatchcropError> {
        let Some(rect) = self.session.as_ref().and_then(|s| s.source_crop_box()) else {
            return Ok(None);
        };
        if rect.width() == 0 || rect.height() == 0 {
            return Ok(None);
        }
        let Some(image) = self.current_image.as_ref() else {
            return Ok(None);
        };
        let Some(source_name) = self
            .nav
            .current()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(str::to_string)
        else {
            return Ok(None);
        };

        let mut cropped = crop_image(
            image,
            rect.left as u32,
            rect.top as u32,
            rect.width() as u32,
            rect.height() as u32,
        )?;
        if let Some((w, h)) = self.config.resize {
            cropped = resize_image(&cropped, w, h)?;
        }

        let out_dir = self.output_dir();
        fs::create_dir_all(&out_dir)?;
        let name = find_available_name(
            &out_dir,
            &source_name,
            self.config.output_format.extension(),
        );
        let target = out_dir.join(&name);

        let format = output_image_format(self.config.output_format);
        save_image(&cropped, &target, format, self.config.image_quality)?;
        debug!(path = %target.display(), "saved crop");
        Ok(Some(target))
    }

    /// Save, then move on to the next image if the save produced a
    /// file.
    pub fn save_next(&mut self) -> Result<Option<PathBuf>, BatchcropError> {
        let saved = self.save()?;
        if saved.is_some() {
            self.next_image();
        }
        Ok(saved)
    }

    /// `"(i/n): name - Dimensions: WxH - Aspect Ratio: a:b"` for the
    /// window title, from the displayed frame.
    pub fn window_title(&self) -> Option<String> {
        let name = self
            .nav
            .current()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())?;
        let geometry = self.session.as_ref()?.geometry();
        let (w, h) = geometry.displayed();
        let (num, den) = reduced_ratio(w, h);
        Some(format!(
            "({}/{}): {} - Dimensions: {}x{} - Aspect Ratio: {}:{}",
            self.nav.index() + 1,
            self.nav.total(),
            name,
            w,
            h,
            num,
            den
        ))
    }

    fn load_current(&mut self) -> bool {
        let Some(path) = self.nav.current() else {
            return false;
        };
        match load_image_from_path(path) {
            Ok(image) => {
                self.display_image(image);
                true
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable image");
                false
            }
        }
    }

    fn display_image(&mut self, image: DynamicImage) {
        let displayed = fit_to_canvas(
            image.width(),
            image.height(),
            self.canvas_size.0,
            self.canvas_size.1,
        );
        let geometry = ImageGeometry::new((image.width(), image.height()), displayed);

        let mut session = SelectionSession::new(geometry, self.config.aspect_ratio);
        if self.config.aspect_ratio.is_some() {
            session.seed_initial_box();
        }

        self.current_image = Some(image);
        self.session = Some(session);
    }
}

/// Decodes image bytes and computes the display geometry for a canvas,
/// for presentation layers that do their own file handling.
pub fn load_image(
    bytes: &[u8],
    canvas: (u32, u32),
) -> Result<(DynamicImage, ImageGeometry), BatchcropError> {
    let image = shared::image::load_image_from_bytes(bytes)?;
    let displayed = fit_to_canvas(image.width(), image.height(), canvas.0, canvas.1);
    let geometry = ImageGeometry::new((image.width(), image.height()), displayed);
    Ok((image, geometry))
}

fn output_image_format(format: OutputFormat) -> Option<ImageFormat> {
    match format {
        OutputFormat::Source => None,
        OutputFormat::Png => Some(ImageFormat::Png),
        OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
        OutputFormat::Webp => Some(ImageFormat::WebP),
        OutputFormat::Bmp => Some(ImageFormat::Bmp),
    }
}

fn reduced_ratio(w: u32, h: u32) -> (u32, u32) {
    let divisor = gcd(w, h);
    if divisor == 0 {
        return (w, h);
    }
    (w / divisor, h / divisor)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_ratio() {
        assert_eq!(reduced_ratio(800, 600), (4, 3));
        assert_eq!(reduced_ratio(1920, 1080), (16, 9));
        assert_eq!(reduced_ratio(0, 0), (0, 0));
    }
}
