//! Directory-level drivers for the filename-gap operations. Each call
//! scans, plans and applies as one unit; callers must not interleave a
//! second renumbering of the same directory.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crop_sequence::{CroppedFileRecord, apply_plan_in_dir, insert_gaps, remove_gaps, scan_directory};

use crate::BatchcropError;

/// Renumbers crop sequences in `dir` to contiguous `1..=N`. With
/// `process_all` every base-name group is compacted; otherwise only the
/// group containing the most recently modified crop file. Returns the
/// number of renames performed.
pub fn remove_gaps_in_dir(dir: &Path, process_all: bool) -> Result<usize, BatchcropError> {
    let groups = scan_directory(dir)?;

    let selected: Vec<&Vec<CroppedFileRecord>> = if process_all {
        groups.values().collect()
    } else {
        latest_group(dir, &groups).into_iter().collect()
    };

    let mut applied = 0;
    for group in selected {
        let plan = remove_gaps(group);
        applied += apply_plan_in_dir(dir, &plan)?;
    }
    debug!(dir = %dir.display(), applied, "removed filename gaps");
    Ok(applied)
}

/// Opens a gap of `gap_size` indices after `gap_after_index` in the
/// single sequence present in `dir`. Fails before any rename when the
/// directory holds more than one base-name group.
pub fn insert_gaps_in_dir(
    dir: &Path,
    gap_after_index: u32,
    gap_size: u32,
) -> Result<usize, BatchcropError> {
    let groups = scan_directory(dir)?;
    let plan = insert_gaps(&groups, gap_after_index, gap_size)?;
    let applied = apply_plan_in_dir(dir, &plan)?;
    debug!(dir = %dir.display(), applied, gap_after_index, gap_size, "inserted filename gap");
    Ok(applied)
}

/// The group whose member was written most recently.
fn latest_group<'a>(
    dir: &Path,
    groups: &'a std::collections::BTreeMap<String, Vec<CroppedFileRecord>>,
) -> Option<&'a Vec<CroppedFileRecord>> {
    let mut latest: Option<(SystemTime, &str)> = None;
    for (base, group) in groups {
        for record in group {
            let modified = fs::metadata(dir.join(&record.filename))
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if latest.map(|(t, _)| modified > t).unwrap_or(true) {
                latest = Some((modified, base));
            }
        }
    }
    latest.and_then(|(_, base)| groups.get(base))
}
