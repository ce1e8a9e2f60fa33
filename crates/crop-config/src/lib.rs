pub mod config;

pub use config::{CropConfig, OutputFormat, SelectionColor, config};
