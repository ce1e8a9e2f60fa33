//! Library facade over the batchcrop crates: the editor flow a
//! presentation layer drives (load, select, save, browse) and the
//! directory-level filename-gap operations.

pub mod editor;
pub mod gaps;
pub mod output;

use thiserror::Error;

pub use editor::{CropEditor, load_image};
pub use gaps::{insert_gaps_in_dir, remove_gaps_in_dir};
pub use output::find_available_name;

#[derive(Error, Debug)]
pub enum BatchcropError {
    #[error(transparent)]
    Image(#[from] shared::ImageProcessingError),

    #[error(transparent)]
    Sequence(#[from] crop_sequence::SequenceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
