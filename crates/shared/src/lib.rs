pub mod image;
pub mod sort;

pub use image::{ImageProcessingError, ImageResult};
pub use sort::natural_cmp;
