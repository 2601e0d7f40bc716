//! Skyrun level previewer
//!
//! Drives a `WorldGenerator` the way a game's streaming loop would and turns
//! the result into text or a RON dump.

pub mod config;
pub mod preview;

pub use config::AppConfig;
pub use preview::{LevelExport, PreviewSink, render_ascii};
