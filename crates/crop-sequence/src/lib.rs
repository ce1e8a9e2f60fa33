pub mod pattern;
pub mod renumber;

pub use pattern::{CROP_MARKER, CroppedFileRecord, format_name, scan_directory, temp_name};
pub use renumber::{
    RenamePlan, SequenceError, apply_plan, apply_plan_in_dir, insert_gaps, remove_gaps,
};
