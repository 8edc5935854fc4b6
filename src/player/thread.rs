use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::PlaybackError;

use super::fetch::Fetcher;
use super::sink::{create_sink_at, probe_total};
use super::types::{AudioCmd, MediaEvent, MediaEventKind, StreamId};

/// Everything the audio thread knows about the one loaded stream.
pub(super) struct Loaded {
    stream: StreamId,
    payload: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    /// Position the current sink started at (after a rebuild-seek).
    offset: Duration,
    want_play: bool,
    ended: bool,
    /// Why the stream could not start. A failed stream never produces sound.
    failed: Option<String>,
}

impl Loaded {
    pub(super) fn new(stream: StreamId) -> Self {
        Self {
            stream,
            payload: None,
            sink: None,
            offset: Duration::ZERO,
            want_play: false,
            ended: false,
            failed: None,
        }
    }

    /// Note that output is wanted. Fails with the earlier start failure, in
    /// which case nothing will ever play and the request is dropped.
    pub(super) fn request_play(&mut self) -> Result<(), String> {
        if let Some(reason) = &self.failed {
            self.want_play = false;
            return Err(reason.clone());
        }
        self.want_play = true;
        Ok(())
    }

    pub(super) fn mark_failed(&mut self, reason: String) {
        self.want_play = false;
        self.failed = Some(reason);
    }

    pub(super) fn wants_play(&self) -> bool {
        self.want_play
    }

    fn position(&self) -> Duration {
        self.offset + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }
}

struct AudioThread {
    events: Sender<MediaEvent>,
    loopback: Sender<AudioCmd>,
    fetcher: Option<Fetcher>,
    output: Option<OutputStream>,
    loaded: Option<Loaded>,
    volume: f32,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    loopback: Sender<AudioCmd>,
    events: Sender<MediaEvent>,
    fetch_timeout: Duration,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let fetcher = match Fetcher::new(fetch_timeout) {
            Ok(f) => Some(f),
            Err(e) => {
                tracing::error!("audio fetcher unavailable: {e}");
                None
            }
        };

        let mut audio = AudioThread {
            events,
            loopback,
            fetcher,
            output: None,
            loaded: None,
            volume: 1.0,
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit) => {
                    audio.release();
                    break;
                }
                Ok(cmd) => audio.handle(cmd),
                Err(RecvTimeoutError::Timeout) => audio.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

impl AudioThread {
    fn emit(&self, stream: StreamId, kind: MediaEventKind) {
        let _ = self.events.send(MediaEvent::new(stream, kind));
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { stream, url } => self.load(stream, url),
            AudioCmd::Fetched { stream, result } => self.fetched(stream, result),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => {
                if let Some(loaded) = self.loaded.as_mut() {
                    loaded.want_play = false;
                    if let Some(s) = loaded.sink.as_ref() {
                        s.pause();
                    }
                }
            }
            AudioCmd::Seek(target) => self.seek(target),
            AudioCmd::SetVolume(level) => {
                self.volume = level;
                if let Some(s) = self.loaded.as_ref().and_then(|l| l.sink.as_ref()) {
                    s.set_volume(level);
                }
            }
            AudioCmd::Release => self.release(),
            AudioCmd::Quit => {}
        }
    }

    /// Report a start failure and remember it so a later play repeats it.
    fn fail_start(&mut self, stream: StreamId, reason: String) {
        if let Some(loaded) = self.loaded.as_mut().filter(|l| l.stream == stream) {
            loaded.mark_failed(reason.clone());
        }
        self.emit(stream, MediaEventKind::StartFailed(reason));
    }

    fn load(&mut self, stream: StreamId, url: String) {
        self.release();
        self.loaded = Some(Loaded::new(stream));

        let Some(fetcher) = self.fetcher.clone() else {
            self.fail_start(stream, "audio fetcher unavailable".to_string());
            return;
        };

        let loopback = self.loopback.clone();
        thread::spawn(move || {
            let result = fetcher.fetch(&url);
            let _ = loopback.send(AudioCmd::Fetched { stream, result });
        });
    }

    fn fetched(&mut self, stream: StreamId, result: Result<Arc<[u8]>, PlaybackError>) {
        let current = self.loaded.as_ref().map(|l| l.stream);
        if current != Some(stream) {
            tracing::trace!(stream = stream.0, "discarding payload for released stream");
            return;
        }

        let payload = match result {
            Ok(p) => p,
            Err(e) => {
                self.fail_start(stream, e.to_string());
                return;
            }
        };

        if let Err(e) = self.ensure_output() {
            self.fail_start(stream, e.to_string());
            return;
        }
        let Some(output) = self.output.as_ref() else {
            return;
        };

        let (sink, total) = match create_sink_at(output, &payload, Duration::ZERO) {
            Ok(v) => v,
            Err(e) => {
                self.fail_start(stream, e.to_string());
                return;
            }
        };
        sink.set_volume(self.volume);

        if let Some(total) = total.or_else(|| probe_total(&payload)) {
            self.emit(stream, MediaEventKind::MetadataReady(total.as_secs_f64()));
        }

        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        loaded.payload = Some(payload);
        loaded.offset = Duration::ZERO;
        let play = loaded.wants_play();
        if play {
            sink.play();
        }
        loaded.sink = Some(sink);
        if play {
            self.emit(stream, MediaEventKind::Started);
        }
    }

    fn ensure_output(&mut self) -> Result<(), PlaybackError> {
        if self.output.is_some() {
            return Ok(());
        }
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        self.output = Some(stream);
        Ok(())
    }

    fn play(&mut self) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let stream = loaded.stream;
        if let Err(reason) = loaded.request_play() {
            self.emit(stream, MediaEventKind::StartFailed(reason));
            return;
        }
        if loaded.sink.is_none() {
            // Still fetching; `fetched` starts output once the payload lands.
            return;
        }
        if loaded.ended {
            self.rebuild_at(Duration::ZERO);
        }
        if let Some(s) = self.loaded.as_ref().and_then(|l| l.sink.as_ref()) {
            s.play();
            self.emit(stream, MediaEventKind::Started);
        }
    }

    fn seek(&mut self, target: Duration) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let stream = loaded.stream;
        if loaded.sink.is_none() {
            // Nothing decoded yet; acknowledge so the controller resumes
            // following time updates.
            self.emit(stream, MediaEventKind::Seeked(target.as_secs_f64()));
            return;
        }

        let seeked_in_place = !loaded.ended
            && loaded
                .sink
                .as_ref()
                .is_some_and(|s| s.try_seek(target).is_ok());
        if seeked_in_place {
            loaded.offset = Duration::ZERO;
        } else {
            self.rebuild_at(target);
        }
        self.emit(stream, MediaEventKind::Seeked(target.as_secs_f64()));
    }

    /// Replace the sink with a fresh one starting at `start_at`, keeping the
    /// play/pause intent and volume.
    fn rebuild_at(&mut self, start_at: Duration) {
        let volume = self.volume;
        let Some(output) = self.output.as_ref() else {
            return;
        };
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let Some(payload) = loaded.payload.clone() else {
            return;
        };

        loaded.stop();
        match create_sink_at(output, &payload, start_at) {
            Ok((sink, _)) => {
                sink.set_volume(volume);
                if loaded.want_play {
                    sink.play();
                }
                loaded.sink = Some(sink);
                loaded.offset = start_at;
                loaded.ended = false;
            }
            Err(e) => {
                let stream = loaded.stream;
                tracing::warn!(stream = stream.0, "failed to rebuild sink: {e}");
                self.fail_start(stream, e.to_string());
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut loaded) = self.loaded.take() {
            loaded.stop();
        }
    }

    fn tick(&mut self) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        if !loaded.wants_play() || loaded.ended {
            return;
        }
        let Some(sink) = loaded.sink.as_ref() else {
            return;
        };

        let stream = loaded.stream;
        if sink.empty() {
            loaded.ended = true;
            loaded.want_play = false;
            self.emit(stream, MediaEventKind::Ended);
        } else {
            let pos = loaded.position();
            self.emit(stream, MediaEventKind::TimeAdvance(pos.as_secs_f64()));
        }
    }
}
