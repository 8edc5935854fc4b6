//! Small playback types shared by the controller and the audio thread.

use std::time::Duration;

use crate::error::PlaybackError;

/// Generation number of a loaded stream.
///
/// Every `select` gets a fresh id; notifications tagged with an older id
/// belong to a stream that has already been released and are dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u64);

/// A notification from the media subsystem about one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub stream: StreamId,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(stream: StreamId, kind: MediaEventKind) -> Self {
        Self { stream, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Output actually started (or resumed).
    Started,
    /// The stream could not start: fetch, decode or output failure.
    StartFailed(String),
    /// Periodic elapsed position, seconds.
    TimeAdvance(f64),
    /// Total length became known, seconds.
    MetadataReady(f64),
    /// A seek request finished; carries the requested target, seconds.
    Seeked(f64),
    /// The stream played to its end.
    Ended,
}

/// Glyph choice for the volume control.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

impl VolumeIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            VolumeIcon::Muted => "🔇",
            VolumeIcon::Low => "🔉",
            VolumeIcon::High => "🔊",
        }
    }
}

/// Commands accepted by the audio thread.
#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current stream with `url`, fetched in the background.
    Load { stream: StreamId, url: String },
    /// Payload for `stream` arrived (or failed to).
    Fetched {
        stream: StreamId,
        result: Result<std::sync::Arc<[u8]>, PlaybackError>,
    },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    /// Stop output and drop the current stream.
    Release,
    Quit,
}
