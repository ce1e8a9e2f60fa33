use std::{
    fs,
    path::{Path, PathBuf},
};

use shared::image::is_supported_extension;
use shared::natural_cmp;
use tokio::task::spawn_blocking;

/// Position within the ordered list of input images.
///
/// Unlike a looping gallery, navigation clamps at both ends: asking for
/// the image after the last one stays put.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    images: Vec<PathBuf>,
    cur_idx: usize,
}

impl NavState {
    pub fn new(images: Vec<PathBuf>) -> Self {
        Self { images, cur_idx: 0 }
    }

    pub fn current(&self) -> Option<&PathBuf> {
        self.images.get(self.cur_idx)
    }

    pub fn index(&self) -> usize {
        self.cur_idx
    }

    pub fn total(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn set_images(&mut self, images: Vec<PathBuf>) {
        self.images = images;
        self.cur_idx = 0;
    }

    pub fn go_next(&mut self) -> Option<&PathBuf> {
        if self.cur_idx + 1 >= self.images.len() {
            return None;
        }
        self.cur_idx += 1;
        self.current()
    }

    pub fn go_prev(&mut self) -> Option<&PathBuf> {
        if self.cur_idx == 0 {
            return None;
        }
        self.cur_idx -= 1;
        self.current()
    }

    /// Drops the current entry from the list, e.g. after it failed to
    /// decode, keeping the index on the next image.
    pub fn remove_current(&mut self) -> Option<PathBuf> {
        if self.cur_idx >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(self.cur_idx);
        if self.cur_idx >= self.images.len() && self.cur_idx > 0 {
            self.cur_idx -= 1;
        }
        Some(removed)
    }
}

pub async fn scan_dir(dir: &Path) -> Vec<PathBuf> {
    let dir = dir.to_path_buf();

    spawn_blocking(move || scan_dir_sync(&dir))
        .await
        .unwrap_or_default()
}

/// Lists the supported images in `dir` in natural filename order,
/// skipping hidden files.
pub fn scan_dir_sync(dir: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            if let Some(name) = path.file_name().and_then(|name| name.to_str())
                && name.starts_with('.')
            {
                return false;
            }
            is_supported_image(path)
        })
        .collect();

    images.sort_by(|a, b| {
        let a_name = a.file_name().and_then(|name| name.to_str()).unwrap_or("");
        let b_name = b.file_name().and_then(|name| name.to_str()).unwrap_or("");
        natural_cmp(a_name, b_name)
    });

    images
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(is_supported_extension)
        .unwrap_or(false)
}
