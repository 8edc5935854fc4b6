//! Playback: the controller that keeps transport state in agreement with the
//! media subsystem, and the `rodio` implementation of that subsystem.

mod audio_player;
mod controller;
mod fetch;
mod format;
mod media;
mod sink;
mod thread;
mod types;

pub use audio_player::AudioPlayer;
pub use controller::{PlaybackController, PlaybackState};
pub use format::format_time;
pub use media::MediaElement;
pub use types::{MediaEvent, MediaEventKind, StreamId, VolumeIcon};

#[cfg(test)]
mod tests;
