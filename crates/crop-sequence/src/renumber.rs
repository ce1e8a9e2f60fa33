//! Gap removal and gap insertion over one base-name group.
//!
//! The delicate part is collision avoidance. Both directions reroute
//! through a disposable temporary name when a target is still occupied
//! by a not-yet-renamed member; the temporaries are resolved in a
//! second pass once the occupants have moved on. Removal walks targets
//! in ascending order. Insertion walks positions in descending order so
//! the upward-shifted tail vacates its targets first; only the
//! compacted head can still collide and take the temporary route.
//! A rename must never land on a name that is still occupied, since
//! `std::fs::rename` overwrites silently.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::pattern::{CroppedFileRecord, format_name, temp_name};

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("gap insertion needs exactly one sequence, found {0} base-name groups")]
    MultipleSequencesSelected(usize),

    #[error("failed to rename {from} to {to} after {completed} renames: {source}")]
    Rename {
        from: String,
        to: String,
        /// Renames already applied before the failure; those files are
        /// valid, uniquely named sequence members. No rollback.
        completed: usize,
        #[source]
        source: io::Error,
    },
}

/// An ordered rename schedule. `renames` is the main pass; `deferred`
/// resolves temporary names to their final names afterwards. Both lists
/// must be applied strictly in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    pub renames: Vec<(String, String)>,
    pub deferred: Vec<(String, String)>,
}

impl RenamePlan {
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.deferred.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len() + self.deferred.len()
    }
}

/// Renumbers one naturally-ordered group to the contiguous sequence
/// `1..=N`, preserving relative order. Running the result through
/// `remove_gaps` again yields an empty plan.
pub fn remove_gaps(group: &[CroppedFileRecord]) -> RenamePlan {
    let mut plan = RenamePlan::default();
    let mut present: HashSet<String> = group.iter().map(|r| r.filename.clone()).collect();

    for (pos, record) in group.iter().enumerate() {
        let target_index = pos as u32 + 1;
        let target = format_name(&record.base_name, target_index, &record.extension);
        if target == record.filename {
            continue;
        }

        present.remove(&record.filename);
        if present.contains(&target) {
            // The target name is still held by a member later in the
            // pass; park this file under a temporary name and resolve
            // it once the occupant has been renamed away.
            let tmp = temp_name(&record.base_name, target_index, &record.extension);
            plan.renames.push((record.filename.clone(), tmp.clone()));
            plan.deferred.push((tmp.clone(), target));
            present.insert(tmp);
        } else {
            plan.renames.push((record.filename.clone(), target.clone()));
            present.insert(target);
        }
    }

    plan
}

/// Renumbers the single selected sequence so that members past
/// `gap_after_index` land `gap_size` indices further up, leaving a
/// deliberate hole for future insertions. The head of the sequence is
/// compacted to `1..` like `remove_gaps` would; a scan with no sequence
/// members yields an empty plan.
pub fn insert_gaps(
    groups: &BTreeMap<String, Vec<CroppedFileRecord>>,
    gap_after_index: u32,
    gap_size: u32,
) -> Result<RenamePlan, SequenceError> {
    let mut values = groups.values();
    let Some(group) = values.next() else {
        return Ok(RenamePlan::default());
    };
    if values.next().is_some() {
        return Err(SequenceError::MultipleSequencesSelected(groups.len()));
    }

    let mut plan = RenamePlan::default();
    let mut present: HashSet<String> = group.iter().map(|r| r.filename.clone()).collect();

    // Highest position first: targets above the gap are vacated before
    // lower members are moved toward it.
    for (pos, record) in group.iter().enumerate().rev() {
        let new_index = if record.crop_index > gap_after_index {
            pos as u32 + 1 + gap_size
        } else {
            pos as u32 + 1
        };
        let target = format_name(&record.base_name, new_index, &record.extension);
        if target == record.filename {
            continue;
        }

        present.remove(&record.filename);
        if present.contains(&target) {
            // Head compaction can aim at a name still held by a lower,
            // not-yet-renamed member; park under a temporary name and
            // resolve after the occupant has moved.
            let tmp = temp_name(&record.base_name, new_index, &record.extension);
            plan.renames.push((record.filename.clone(), tmp.clone()));
            plan.deferred.push((tmp.clone(), target));
            present.insert(tmp);
        } else {
            plan.renames.push((record.filename.clone(), target.clone()));
            present.insert(target);
        }
    }

    Ok(plan)
}

/// Executes a plan through an injectable rename function, main pass
/// then deferred pass, strictly in order. Returns the number of renames
/// applied. A failure is surfaced with the failing pair and the number
/// of renames already completed; nothing is rolled back.
pub fn apply_plan<F>(plan: &RenamePlan, mut rename: F) -> Result<usize, SequenceError>
where
    F: FnMut(&str, &str) -> io::Result<()>,
{
    let mut completed = 0;
    for (from, to) in plan.renames.iter().chain(plan.deferred.iter()) {
        rename(from, to).map_err(|source| SequenceError::Rename {
            from: from.clone(),
            to: to.clone(),
            completed,
            source,
        })?;
        debug!(from, to, "renamed sequence member");
        completed += 1;
    }
    Ok(completed)
}

/// `apply_plan` bound to `std::fs::rename` within one directory.
pub fn apply_plan_in_dir(dir: &Path, plan: &RenamePlan) -> Result<usize, SequenceError> {
    apply_plan(plan, |from, to| fs::rename(dir.join(from), dir.join(to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_of(names: &[&str]) -> Vec<CroppedFileRecord> {
        names
            .iter()
            .map(|n| CroppedFileRecord::parse(n).expect("test name must parse"))
            .collect()
    }

    fn apply_to_set(plan: &RenamePlan, names: &[&str]) -> Vec<String> {
        let mut files: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        apply_plan(plan, |from, to| {
            let idx = files
                .iter()
                .position(|f| f == from)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, from.to_string()))?;
            if files.iter().any(|f| f == to) {
                return Err(io::Error::new(io::ErrorKind::AlreadyExists, to.to_string()));
            }
            files[idx] = to.to_string();
            Ok(())
        })
        .expect("plan must apply cleanly");
        files.sort();
        files
    }

    #[test]
    fn test_remove_gaps_compacts_indices() {
        let group = group_of(&["b_crop1.png", "b_crop3.png", "b_crop7.png"]);
        let plan = remove_gaps(&group);
        assert_eq!(
            plan.renames,
            vec![
                ("b_crop3.png".to_string(), "b_crop2.png".to_string()),
                ("b_crop7.png".to_string(), "b_crop3.png".to_string()),
            ]
        );
        assert!(plan.deferred.is_empty());
    }

    #[test]
    fn test_remove_gaps_routes_collisions_through_temp_names() {
        // {1, 1a, 2}: position 1 wants index 2, still occupied by the
        // not-yet-renamed b_crop2.png.
        let names = ["b_crop1.png", "b_crop1a.png", "b_crop2.png"];
        let plan = remove_gaps(&group_of(&names));

        assert_eq!(
            plan.renames,
            vec![
                ("b_crop1a.png".to_string(), "tmp_b_crop2.png".to_string()),
                ("b_crop2.png".to_string(), "b_crop3.png".to_string()),
            ]
        );
        assert_eq!(
            plan.deferred,
            vec![("tmp_b_crop2.png".to_string(), "b_crop2.png".to_string())]
        );

        // No intermediate step ever collides.
        let result = apply_to_set(&plan, &names);
        assert_eq!(result, vec!["b_crop1.png", "b_crop2.png", "b_crop3.png"]);
    }

    #[test]
    fn test_remove_gaps_duplicate_indices() {
        // Duplicate indices collapse: {1, 3, 3, 7} renumbers to {1, 2, 3, 4}.
        let names = [
            "b_crop1.png",
            "b_crop3.png",
            "b_crop3x.png",
            "b_crop7.png",
        ];
        let plan = remove_gaps(&group_of(&names));
        let result = apply_to_set(&plan, &names);
        assert_eq!(
            result,
            vec!["b_crop1.png", "b_crop2.png", "b_crop3.png", "b_crop4.png"]
        );
    }

    #[test]
    fn test_remove_gaps_is_idempotent() {
        let group = group_of(&["b_crop1.png", "b_crop2.png", "b_crop3.png"]);
        assert!(remove_gaps(&group).is_empty());
    }

    #[test]
    fn test_remove_gaps_drops_suffixes() {
        let group = group_of(&["b_crop1_old.png"]);
        let plan = remove_gaps(&group);
        assert_eq!(
            plan.renames,
            vec![("b_crop1_old.png".to_string(), "b_crop1.png".to_string())]
        );
    }

    #[test]
    fn test_insert_gaps_shifts_tail() {
        // {1,2,3,4}, gap after 2, size 100 -> {1,2,103,104}
        let mut groups = BTreeMap::new();
        groups.insert(
            "b_crop".to_string(),
            group_of(&["b_crop1.png", "b_crop2.png", "b_crop3.png", "b_crop4.png"]),
        );
        let plan = insert_gaps(&groups, 2, 100).unwrap();

        // Descending order: the tail moves first.
        assert_eq!(
            plan.renames,
            vec![
                ("b_crop4.png".to_string(), "b_crop104.png".to_string()),
                ("b_crop3.png".to_string(), "b_crop103.png".to_string()),
            ]
        );

        let result = apply_to_set(&plan, &["b_crop1.png", "b_crop2.png", "b_crop3.png", "b_crop4.png"]);
        assert_eq!(
            result,
            vec!["b_crop1.png", "b_crop103.png", "b_crop104.png", "b_crop2.png"]
        );
    }

    #[test]
    fn test_insert_gaps_compacts_head() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "b_crop".to_string(),
            group_of(&["b_crop3.png", "b_crop5.png", "b_crop9.png"]),
        );
        let plan = insert_gaps(&groups, 5, 10).unwrap();
        let result = apply_to_set(&plan, &["b_crop3.png", "b_crop5.png", "b_crop9.png"]);
        assert_eq!(result, vec!["b_crop1.png", "b_crop13.png", "b_crop2.png"]);
    }

    #[test]
    fn test_insert_then_remove_round_trips() {
        let names = ["b_crop1.png", "b_crop2.png", "b_crop3.png", "b_crop4.png"];
        let mut groups = BTreeMap::new();
        groups.insert("b_crop".to_string(), group_of(&names));

        let plan = insert_gaps(&groups, 2, 100).unwrap();
        let gapped = apply_to_set(&plan, &names);

        let mut gapped_sorted: Vec<&str> = gapped.iter().map(|s| s.as_str()).collect();
        gapped_sorted.sort_by(|a, b| shared::natural_cmp(a, b));
        let regroup = group_of(&gapped_sorted);
        let plan = remove_gaps(&regroup);
        let restored = apply_to_set(&plan, &gapped_sorted);
        assert_eq!(
            restored,
            vec!["b_crop1.png", "b_crop2.png", "b_crop3.png", "b_crop4.png"]
        );
    }

    #[test]
    fn test_insert_gaps_head_collision_routes_through_temp_names() {
        // {2, 3}: position 1 compacts to index 2, still occupied by the
        // not-yet-renamed b_crop2.png. A direct rename would overwrite
        // it.
        let names = ["b_crop2.png", "b_crop3.png"];
        let mut groups = BTreeMap::new();
        groups.insert("b_crop".to_string(), group_of(&names));
        let plan = insert_gaps(&groups, 3, 10).unwrap();

        assert_eq!(
            plan.renames,
            vec![
                ("b_crop3.png".to_string(), "tmp_b_crop2.png".to_string()),
                ("b_crop2.png".to_string(), "b_crop1.png".to_string()),
            ]
        );
        assert_eq!(
            plan.deferred,
            vec![("tmp_b_crop2.png".to_string(), "b_crop2.png".to_string())]
        );

        // Both files survive; no intermediate step ever collides.
        let result = apply_to_set(&plan, &names);
        assert_eq!(result, vec!["b_crop1.png", "b_crop2.png"]);
    }

    #[test]
    fn test_insert_gaps_empty_scan_yields_empty_plan() {
        let groups: BTreeMap<String, Vec<CroppedFileRecord>> = BTreeMap::new();
        let plan = insert_gaps(&groups, 1, 5).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_insert_gaps_rejects_multiple_sequences() {
        let mut groups = BTreeMap::new();
        groups.insert("a_crop".to_string(), group_of(&["a_crop1.png"]));
        groups.insert("b_crop".to_string(), group_of(&["b_crop1.png"]));

        let err = insert_gaps(&groups, 1, 5).unwrap_err();
        assert!(matches!(err, SequenceError::MultipleSequencesSelected(2)));
    }

    #[test]
    fn test_apply_plan_reports_partial_completion() {
        let plan = RenamePlan {
            renames: vec![
                ("a_crop2.png".into(), "a_crop1.png".into()),
                ("a_crop5.png".into(), "a_crop2.png".into()),
            ],
            deferred: vec![],
        };

        let mut calls = 0;
        let err = apply_plan(&plan, |_, _| {
            calls += 1;
            if calls == 2 {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                Ok(())
            }
        })
        .unwrap_err();

        match err {
            SequenceError::Rename {
                from, completed, ..
            } => {
                assert_eq!(from, "a_crop5.png");
                assert_eq!(completed, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
