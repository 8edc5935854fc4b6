use std::time::Duration;

use crate::config::PlayerSettings;
use crate::error::PlaybackError;
use crate::library::{Track, TrackId};

use super::media::MediaElement;
use super::types::{MediaEvent, MediaEventKind, StreamId, VolumeIcon};

// Seek acknowledgements are matched against the pending target with this
// tolerance (seconds).
const SEEK_ACK_TOLERANCE: f64 = 0.05;

/// View state of the single active stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub track: Track,
    pub stream: StreamId,
    /// Elapsed seconds, always within `0..=duration` once duration is known.
    pub position: f64,
    /// Total seconds; `None` until the media reports metadata.
    pub duration: Option<f64>,
    pub playing: bool,
    /// The stream reached its end; the next play restarts it.
    pub ended: bool,
    /// The stream could not start; the next play loads it again.
    pub failed: bool,
    pending_seek: Option<f64>,
}

impl PlaybackState {
    fn new(track: Track, stream: StreamId) -> Self {
        Self {
            track,
            stream,
            position: 0.0,
            duration: None,
            playing: false,
            ended: false,
            failed: false,
            pending_seek: None,
        }
    }

    /// Fraction of the track played, 0.0 when the length is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (self.position / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn is_seeking(&self) -> bool {
        self.pending_seek.is_some()
    }

    fn clamp_position(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() {
            return 0.0;
        }
        seconds.clamp(0.0, self.duration.unwrap_or(0.0).max(0.0))
    }
}

/// Drives one media element and mirrors its real-time state for display.
///
/// Caller actions (`select`, `toggle_play`, `seek`, ...) are applied to the
/// view state immediately and forwarded to the media; media notifications
/// arrive through [`PlaybackController::handle_event`].
pub struct PlaybackController<M> {
    media: M,
    state: Option<PlaybackState>,
    next_stream: u64,

    volume: f32,
    muted: bool,
    last_audible: Option<f32>,

    initial_volume: f32,
    unmute_fallback: f32,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M, settings: &PlayerSettings) -> Self {
        let initial_volume = clamp_volume(settings.initial_volume);
        let mut controller = Self {
            media,
            state: None,
            next_stream: 0,
            volume: initial_volume,
            muted: false,
            last_audible: None,
            initial_volume,
            unmute_fallback: clamp_volume(settings.unmute_fallback_volume),
        };
        controller.reset_volume();
        controller
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn current_track_id(&self) -> Option<TrackId> {
        self.state.as_ref().map(|s| s.track.id)
    }

    pub fn is_playing(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.playing)
    }

    /// The user's chosen level, kept while muted.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// The level actually applied to output (0 while muted).
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        if self.muted || self.volume == 0.0 {
            VolumeIcon::Muted
        } else if self.volume < 0.5 {
            VolumeIcon::Low
        } else {
            VolumeIcon::High
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Replace any loaded stream with `track` and start playing it.
    ///
    /// The previous stream is released before the new one is requested.
    /// Start failures surface later as a `StartFailed` event and only leave
    /// the controller paused.
    pub fn select(&mut self, track: Track) {
        if self.state.take().is_some() {
            self.media.release();
        }

        self.next_stream += 1;
        let stream = StreamId(self.next_stream);
        let has_source = track.has_audio_source();
        tracing::debug!(track = %track.id, stream = stream.0, "select track");
        self.state = Some(PlaybackState::new(track, stream));

        if !has_source {
            tracing::error!(stream = stream.0, "playback failed to start: {}", PlaybackError::NoSource);
            if let Some(state) = self.state.as_mut() {
                state.failed = true;
            }
            return;
        }

        if let Some(state) = &self.state {
            self.media.load(stream, &state.track.audio_url);
        }
        self.media.set_volume(self.effective_volume());
        self.media.play();
    }

    /// Pause when playing, resume otherwise. A stream that failed to start
    /// is loaded again and stays paused until the media confirms it started.
    pub fn toggle_play(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.failed {
            let track = state.track.clone();
            self.select(track);
            return;
        }
        if state.playing {
            self.media.pause();
            state.playing = false;
        } else {
            if state.ended {
                state.ended = false;
                state.position = 0.0;
                state.pending_seek = None;
            }
            self.media.play();
            state.playing = true;
        }
    }

    /// Move to `target` seconds, clamped to `[0, duration]`.
    ///
    /// The displayed position updates immediately; time notifications are
    /// ignored until the media acknowledges the seek.
    pub fn seek(&mut self, target: f64) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let clamped = state.clamp_position(target);
        state.position = clamped;
        state.pending_seek = Some(clamped);
        if state.ended && state.duration.is_some_and(|d| clamped < d) {
            state.ended = false;
        }
        self.media.seek(Duration::from_secs_f64(clamped));
    }

    /// Seek relative to the displayed position.
    pub fn seek_by(&mut self, delta: f64) {
        if let Some(position) = self.state.as_ref().map(|s| s.position) {
            self.seek(position + delta);
        }
    }

    /// Set the level, clamped to `[0, 1]`. Zero mutes; anything else unmutes.
    pub fn set_volume(&mut self, level: f32) {
        let level = clamp_volume(level);
        self.volume = level;
        self.muted = level == 0.0;
        if level > 0.0 {
            self.last_audible = Some(level);
        }
        self.media.set_volume(level);
    }

    /// Change the audible level by `delta`, starting from 0 while muted.
    pub fn nudge_volume(&mut self, delta: f32) {
        let base = self.effective_volume();
        self.set_volume(base + delta);
    }

    /// Mute keeps the chosen level; unmute restores the last audible level
    /// (or the configured fallback when there never was one).
    pub fn toggle_mute(&mut self) {
        if self.muted {
            let restore = self
                .last_audible
                .filter(|v| *v > 0.0)
                .unwrap_or(self.unmute_fallback);
            self.volume = restore;
            self.muted = false;
            self.media.set_volume(restore);
        } else {
            if self.volume > 0.0 {
                self.last_audible = Some(self.volume);
            }
            self.muted = true;
            self.media.set_volume(0.0);
        }
    }

    /// Stop, release the stream and clear playback state.
    pub fn close(&mut self) {
        if self.state.take().is_some() {
            self.media.release();
        }
        self.reset_volume();
    }

    /// Apply a notification from the media subsystem.
    pub fn handle_event(&mut self, event: MediaEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if event.stream != state.stream {
            tracing::trace!(stream = event.stream.0, "dropping event for released stream");
            return;
        }

        match event.kind {
            MediaEventKind::Started => {
                state.playing = true;
                state.ended = false;
                state.failed = false;
            }
            MediaEventKind::StartFailed(reason) => {
                tracing::error!(
                    track = %state.track.id,
                    url = state.track.audio_url.as_str(),
                    "playback failed to start: {reason}"
                );
                state.playing = false;
                state.failed = true;
            }
            MediaEventKind::TimeAdvance(seconds) => {
                if state.pending_seek.is_none() && seconds.is_finite() {
                    state.position = match state.duration {
                        Some(d) => seconds.clamp(0.0, d),
                        None => seconds.max(0.0),
                    };
                }
            }
            MediaEventKind::MetadataReady(seconds) => {
                if seconds.is_finite() && seconds > 0.0 {
                    state.duration = Some(seconds);
                    state.position = state.position.min(seconds);
                }
            }
            MediaEventKind::Seeked(seconds) => {
                if let Some(target) = state.pending_seek {
                    if (target - seconds).abs() <= SEEK_ACK_TOLERANCE {
                        state.pending_seek = None;
                        state.position = target;
                    }
                }
            }
            MediaEventKind::Ended => {
                state.playing = false;
                state.ended = true;
                state.pending_seek = None;
                if let Some(d) = state.duration {
                    state.position = d;
                }
            }
        }
    }

    fn reset_volume(&mut self) {
        self.volume = self.initial_volume;
        self.muted = self.initial_volume == 0.0;
        self.last_audible = (self.initial_volume > 0.0).then_some(self.initial_volume);
    }
}

fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) }
}
