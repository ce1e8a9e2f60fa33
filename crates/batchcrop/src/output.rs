use std::path::Path;

use crop_sequence::CROP_MARKER;

/// First free `<stem>_crop<N><ext>` in `dir`, counting up from 1.
/// `forced_extension` (without the dot) overrides the source file's
/// extension when a fixed output format is configured.
pub fn find_available_name(
    dir: &Path,
    source_filename: &str,
    forced_extension: Option<&str>,
) -> String {
    let (stem, ext) = match source_filename.rfind('.') {
        Some(dot) => source_filename.split_at(dot),
        None => (source_filename, ""),
    };
    let ext = match forced_extension {
        Some(forced) => format!(".{forced}"),
        None => ext.to_string(),
    };

    let mut num: u32 = 1;
    loop {
        let candidate = format!("{stem}{CROP_MARKER}{num}{ext}");
        if !dir.join(&candidate).is_file() {
            return candidate;
        }
        num += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_first_name_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            find_available_name(dir.path(), "holiday.png", None),
            "holiday_crop1.png"
        );
    }

    #[test]
    fn test_counts_past_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("holiday_crop1.png")).unwrap();
        File::create(dir.path().join("holiday_crop2.png")).unwrap();
        assert_eq!(
            find_available_name(dir.path(), "holiday.png", None),
            "holiday_crop3.png"
        );
    }

    #[test]
    fn test_gaps_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("holiday_crop2.png")).unwrap();
        assert_eq!(
            find_available_name(dir.path(), "holiday.png", None),
            "holiday_crop1.png"
        );
    }

    #[test]
    fn test_forced_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            find_available_name(dir.path(), "holiday.png", Some("jpg")),
            "holiday_crop1.jpg"
        );
    }
}
