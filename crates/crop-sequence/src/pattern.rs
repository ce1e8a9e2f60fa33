//! Recognition of cropped-output filenames. A sequence member looks
//! like `<base>_crop<N><optional-suffix>.<ext>`; anything else in the
//! directory is invisible to the sequence operations.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use shared::image::is_supported_extension;
use shared::natural_cmp;

/// Marker between the image stem and the crop counter.
pub const CROP_MARKER: &str = "_crop";

/// One parsed sequence member. Ephemeral: recomputed on every scan and
/// never persisted apart from the filename itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedFileRecord {
    /// Image stem up to and including the `_crop` marker, so that
    /// `format_name(base, index, ext)` round-trips to a valid filename.
    pub base_name: String,
    pub crop_index: u32,
    /// Trailing text between the counter and the extension. Dropped on
    /// rename.
    pub suffix: String,
    /// Extension including the leading dot, original casing kept.
    pub extension: String,
    pub filename: String,
}

impl CroppedFileRecord {
    pub fn parse(filename: &str) -> Option<Self> {
        let dot = filename.rfind('.')?;
        let (stem, extension) = filename.split_at(dot);
        if !is_supported_extension(&extension[1..]) {
            return None;
        }

        let marker = stem.rfind(CROP_MARKER)?;
        let counter = &stem[marker + CROP_MARKER.len()..];
        let digits = counter
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        let crop_index: u32 = counter[..digits].parse().ok()?;

        Some(Self {
            base_name: stem[..marker + CROP_MARKER.len()].to_string(),
            crop_index,
            suffix: counter[digits..].to_string(),
            extension: extension.to_string(),
            filename: filename.to_string(),
        })
    }
}

/// The canonical sequence filename, `"{base}{index}{extension}"`. Any
/// suffix the source file carried is intentionally not reproduced.
pub fn format_name(base: &str, index: u32, extension: &str) -> String {
    format!("{base}{index}{extension}")
}

/// Disposable intermediate name used while a rename target is still
/// occupied.
pub fn temp_name(base: &str, index: u32, extension: &str) -> String {
    format!("tmp_{base}{index}{extension}")
}

/// Scans one directory for sequence members, grouped by base name.
/// Records within a group are in natural filename order, which for a
/// valid sequence equals crop-index order.
pub fn scan_directory(dir: &Path) -> io::Result<BTreeMap<String, Vec<CroppedFileRecord>>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    names.sort_by(|a, b| natural_cmp(a, b));

    let mut groups: BTreeMap<String, Vec<CroppedFileRecord>> = BTreeMap::new();
    for name in &names {
        if let Some(record) = CroppedFileRecord::parse(name) {
            groups.entry(record.base_name.clone()).or_default().push(record);
        }
    }
    Ok(groups)
}
