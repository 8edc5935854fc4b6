//! Track metadata as served by the remote library, plus the local file
//! helpers the admin upload form needs.

mod display;
mod files;
mod model;

pub use display::*;
pub use files::{is_audio_file, list_audio_files, probe_duration};
pub use model::*;

#[cfg(test)]
mod tests;
