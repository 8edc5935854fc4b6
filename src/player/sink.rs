//! Utilities for creating `rodio` sinks from downloaded audio payloads.
//!
//! The helpers here decode an in-memory payload and prepare a paused `Sink`
//! at the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Create a paused `Sink` for `payload` that starts playback at `start_at`.
///
/// Also returns the total length when the decoder knows it.
pub(super) fn create_sink_at(
    output: &OutputStream,
    payload: &Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let decoder = Decoder::new(Cursor::new(payload.clone()))
        .map_err(|e| PlaybackError::Decode(e.to_string()))?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(output.mixer());
    // `skip_duration` is our fallback seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Length read from the container headers, for formats where the decoder
/// cannot tell up front (VBR mp3 without a seek table, mostly).
pub(super) fn probe_total(payload: &Arc<[u8]>) -> Option<Duration> {
    let probe = Probe::new(Cursor::new(payload.clone())).guess_file_type().ok()?;
    let tagged = probe.read().ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}
