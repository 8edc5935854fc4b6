use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::media::MediaElement;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaEvent, StreamId};

/// `rodio`-backed media element. Owns the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Notifications are delivered on `events`.
    pub fn new(events: Sender<MediaEvent>, fetch_timeout: Duration, tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let audio_handle = spawn_audio_thread(rx, tx.clone(), events, fetch_timeout, tick);

        Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            tracing::warn!("audio thread is gone; command dropped");
        }
    }

    /// Stop output and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaElement for AudioPlayer {
    fn load(&mut self, stream: StreamId, url: &str) {
        self.send(AudioCmd::Load {
            stream,
            url: url.to_string(),
        });
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(AudioCmd::SetVolume(level));
    }

    fn release(&mut self) {
        self.send(AudioCmd::Release);
    }
}
