pub mod geometry;
pub mod types;

pub use geometry::{
    MIN_ZOOM_DIMENSION, apply_zoom, clamp_translate, derive_box, golden_guides, to_source_box,
};
pub use types::{AspectRatio, GuideLine, ImageGeometry, Point, Rect};
