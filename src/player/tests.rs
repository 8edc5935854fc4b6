use std::time::Duration;

use super::*;
use crate::config::PlayerSettings;
use crate::library::{Track, TrackId};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(StreamId, String),
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
    Release,
}

/// Records every call; the test plays the part of the media subsystem.
#[derive(Default)]
struct FakeMedia {
    calls: Vec<Call>,
}

impl FakeMedia {
    fn loads(&self) -> Vec<StreamId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(s, _) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn last_volume(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Volume(v) => Some(*v),
            _ => None,
        })
    }
}

impl MediaElement for FakeMedia {
    fn load(&mut self, stream: StreamId, url: &str) {
        self.calls.push(Call::Load(stream, url.to_string()));
    }
    fn play(&mut self) {
        self.calls.push(Call::Play);
    }
    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }
    fn seek(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
    }
    fn set_volume(&mut self, level: f32) {
        self.calls.push(Call::Volume(level));
    }
    fn release(&mut self) {
        self.calls.push(Call::Release);
    }
}

fn track(id: u64) -> Track {
    Track {
        id: TrackId(id),
        title: format!("Track {id}"),
        artist: None,
        album: None,
        duration: None,
        audio_url: format!("https://cdn.example.org/{id}.mp3"),
        uploader: None,
        file_size: None,
    }
}

fn controller() -> PlaybackController<FakeMedia> {
    PlaybackController::new(FakeMedia::default(), &PlayerSettings::default())
}

fn stream_of(c: &PlaybackController<FakeMedia>) -> StreamId {
    c.state().unwrap().stream
}

fn started(c: &mut PlaybackController<FakeMedia>, duration: f64) {
    let s = stream_of(c);
    c.handle_event(MediaEvent::new(s, MediaEventKind::MetadataReady(duration)));
    c.handle_event(MediaEvent::new(s, MediaEventKind::Started));
}

#[test]
fn format_time_pads_seconds_and_handles_nan() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(5.9), "0:05");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(600.0), "10:00");
    assert_eq!(format_time(3725.4), "62:05");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(f64::INFINITY), "0:00");
    assert_eq!(format_time(-3.0), "0:00");
}

#[test]
fn select_loads_and_autoplays() {
    let mut c = controller();
    c.select(track(1));

    let state = c.state().unwrap();
    assert_eq!(state.track.id, TrackId(1));
    assert_eq!(state.position, 0.0);
    assert!(!state.playing, "playing only once the media confirms");
    assert_eq!(
        c.media().calls,
        vec![
            Call::Load(StreamId(1), "https://cdn.example.org/1.mp3".into()),
            Call::Volume(1.0),
            Call::Play,
        ]
    );

    started(&mut c, 120.0);
    assert!(c.is_playing());
    assert_eq!(c.state().unwrap().duration, Some(120.0));
}

#[test]
fn selecting_another_track_replaces_the_stream() {
    let mut c = controller();
    c.select(track(1));
    started(&mut c, 100.0);
    let first = stream_of(&c);
    c.handle_event(MediaEvent::new(first, MediaEventKind::TimeAdvance(42.0)));
    assert_eq!(c.state().unwrap().position, 42.0);

    c.select(track(2));
    let second = stream_of(&c);
    assert_ne!(first, second);
    assert_eq!(c.current_track_id(), Some(TrackId(2)));
    assert_eq!(c.state().unwrap().position, 0.0);
    assert_eq!(c.state().unwrap().duration, None);

    // The old stream was released before the new one was loaded.
    let calls = &c.media().calls;
    let release = calls.iter().position(|x| *x == Call::Release).unwrap();
    let second_load = calls
        .iter()
        .position(|x| matches!(x, Call::Load(s, _) if *s == second))
        .unwrap();
    assert!(release < second_load);
    assert_eq!(c.media().loads(), vec![first, second]);

    // Late notifications from the first stream cannot touch the new state.
    c.handle_event(MediaEvent::new(first, MediaEventKind::TimeAdvance(80.0)));
    c.handle_event(MediaEvent::new(first, MediaEventKind::Started));
    c.handle_event(MediaEvent::new(first, MediaEventKind::MetadataReady(999.0)));
    let state = c.state().unwrap();
    assert_eq!(state.position, 0.0);
    assert!(!state.playing);
    assert_eq!(state.duration, None);
}

#[test]
fn start_failure_leaves_controller_paused() {
    let mut c = controller();
    c.select(track(1));
    let s = stream_of(&c);
    c.handle_event(MediaEvent::new(
        s,
        MediaEventKind::StartFailed("no output device".into()),
    ));
    assert!(!c.is_playing());
    assert_eq!(c.current_track_id(), Some(TrackId(1)));
}

#[test]
fn play_after_start_failure_reloads_and_stays_paused() {
    let mut c = controller();
    c.select(track(1));
    let first = stream_of(&c);
    c.handle_event(MediaEvent::new(
        first,
        MediaEventKind::StartFailed("fetch timed out".into()),
    ));
    assert!(c.state().unwrap().failed);

    c.toggle_play();
    let second = stream_of(&c);
    assert_ne!(first, second);
    assert_eq!(c.media().loads().len(), 2);
    assert!(!c.is_playing());

    c.handle_event(MediaEvent::new(
        second,
        MediaEventKind::StartFailed("fetch timed out".into()),
    ));
    assert!(!c.is_playing());

    // A later success clears the failure.
    c.toggle_play();
    let third = stream_of(&c);
    c.handle_event(MediaEvent::new(third, MediaEventKind::Started));
    assert!(c.is_playing());
    assert!(!c.state().unwrap().failed);
}

#[test]
fn audio_thread_repeats_start_failure_on_play() {
    let mut loaded = super::thread::Loaded::new(StreamId(4));
    assert_eq!(loaded.request_play(), Ok(()));
    assert!(loaded.wants_play());

    loaded.mark_failed("failed to decode audio: bad header".into());
    assert!(!loaded.wants_play());
    assert_eq!(
        loaded.request_play(),
        Err("failed to decode audio: bad header".to_string())
    );
    assert!(!loaded.wants_play());
}

#[test]
fn track_without_url_never_reaches_media() {
    let mut c = controller();
    let mut t = track(1);
    t.audio_url = "  ".into();
    c.select(t);
    assert!(c.media().loads().is_empty());
    assert!(!c.media().calls.contains(&Call::Play));
    assert!(!c.is_playing());

    c.toggle_play();
    assert!(c.media().loads().is_empty());
    assert!(!c.is_playing());
}

#[test]
fn toggle_play_flips_state_immediately() {
    let mut c = controller();
    c.toggle_play();
    assert!(c.state().is_none());

    c.select(track(1));
    started(&mut c, 60.0);
    c.toggle_play();
    assert!(!c.is_playing());
    assert_eq!(c.media().calls.last(), Some(&Call::Pause));
    c.toggle_play();
    assert!(c.is_playing());
    assert_eq!(c.media().calls.last(), Some(&Call::Play));
}

#[test]
fn seek_clamps_to_duration() {
    let mut c = controller();
    c.select(track(1));
    started(&mut c, 90.0);

    c.seek(500.0);
    assert_eq!(c.state().unwrap().position, 90.0);
    assert_eq!(c.media().calls.last(), Some(&Call::Seek(Duration::from_secs(90))));

    c.seek(-4.0);
    assert_eq!(c.state().unwrap().position, 0.0);
    assert_eq!(c.media().calls.last(), Some(&Call::Seek(Duration::ZERO)));

    c.seek(f64::NAN);
    assert_eq!(c.state().unwrap().position, 0.0);
}

#[test]
fn seek_before_metadata_clamps_to_zero() {
    let mut c = controller();
    c.select(track(1));
    c.seek(30.0);
    assert_eq!(c.state().unwrap().position, 0.0);
}

#[test]
fn time_updates_do_not_fight_an_in_flight_seek() {
    let mut c = controller();
    c.select(track(1));
    started(&mut c, 300.0);
    let s = stream_of(&c);

    c.seek(200.0);
    assert!(c.state().unwrap().is_seeking());
    c.handle_event(MediaEvent::new(s, MediaEventKind::TimeAdvance(12.0)));
    assert_eq!(c.state().unwrap().position, 200.0);

    // A stale acknowledgement for an older target does not release the hold.
    c.handle_event(MediaEvent::new(s, MediaEventKind::Seeked(50.0)));
    assert!(c.state().unwrap().is_seeking());

    c.handle_event(MediaEvent::new(s, MediaEventKind::Seeked(200.0)));
    assert!(!c.state().unwrap().is_seeking());
    c.handle_event(MediaEvent::new(s, MediaEventKind::TimeAdvance(200.5)));
    assert_eq!(c.state().unwrap().position, 200.5);
}

#[test]
fn seek_by_moves_relative_to_display_position() {
    let mut c = controller();
    c.select(track(1));
    started(&mut c, 100.0);
    let s = stream_of(&c);
    c.handle_event(MediaEvent::new(s, MediaEventKind::TimeAdvance(10.0)));

    c.seek_by(5.0);
    assert_eq!(c.state().unwrap().position, 15.0);
    c.seek_by(-30.0);
    assert_eq!(c.state().unwrap().position, 0.0);
}

#[test]
fn set_volume_zero_mutes_and_unmute_restores_last_audible() {
    let mut c = controller();
    c.set_volume(0.3);
    assert!(!c.is_muted());
    c.set_volume(0.0);
    assert!(c.is_muted());
    assert_eq!(c.volume_icon(), VolumeIcon::Muted);

    c.toggle_mute();
    assert!(!c.is_muted());
    assert_eq!(c.volume(), 0.3);
    assert_eq!(c.media().last_volume(), Some(0.3));
}

#[test]
fn unmute_falls_back_when_nothing_was_audible() {
    let settings = PlayerSettings {
        initial_volume: 0.0,
        ..PlayerSettings::default()
    };
    let mut c = PlaybackController::new(FakeMedia::default(), &settings);
    c.set_volume(0.0);
    assert!(c.is_muted());
    c.toggle_mute();
    assert!(!c.is_muted());
    assert_eq!(c.volume(), 0.5);
    assert_eq!(c.media().last_volume(), Some(0.5));
}

#[test]
fn mute_keeps_chosen_volume() {
    let mut c = controller();
    c.set_volume(0.7);
    c.toggle_mute();
    assert!(c.is_muted());
    assert_eq!(c.volume(), 0.7);
    assert_eq!(c.effective_volume(), 0.0);
    assert_eq!(c.media().last_volume(), Some(0.0));

    c.toggle_mute();
    assert_eq!(c.effective_volume(), 0.7);
}

#[test]
fn set_volume_clamps() {
    let mut c = controller();
    c.set_volume(1.7);
    assert_eq!(c.volume(), 1.0);
    c.set_volume(-0.2);
    assert_eq!(c.volume(), 0.0);
    assert!(c.is_muted());
    c.set_volume(f32::NAN);
    assert_eq!(c.volume(), 0.0);
}

#[test]
fn nudge_volume_starts_from_silence_while_muted() {
    let mut c = controller();
    c.set_volume(0.8);
    c.toggle_mute();
    c.nudge_volume(0.1);
    assert!(!c.is_muted());
    assert!((c.volume() - 0.1).abs() < 1e-6);
}

#[test]
fn volume_icon_thresholds() {
    let mut c = controller();
    assert_eq!(c.volume_icon(), VolumeIcon::High);
    c.set_volume(0.49);
    assert_eq!(c.volume_icon(), VolumeIcon::Low);
    c.set_volume(0.5);
    assert_eq!(c.volume_icon(), VolumeIcon::High);
    c.toggle_mute();
    assert_eq!(c.volume_icon(), VolumeIcon::Muted);
}

#[test]
fn stream_end_stops_without_advancing() {
    let mut c = controller();
    c.select(track(1));
    started(&mut c, 30.0);
    let s = stream_of(&c);
    c.handle_event(MediaEvent::new(s, MediaEventKind::Ended));

    let state = c.state().unwrap();
    assert!(!state.playing);
    assert!(state.ended);
    assert_eq!(state.position, 30.0);
    assert_eq!(c.current_track_id(), Some(TrackId(1)));
    assert_eq!(c.media().loads().len(), 1);

    c.toggle_play();
    let state = c.state().unwrap();
    assert!(state.playing);
    assert_eq!(state.position, 0.0);
}

#[test]
fn close_releases_and_clears() {
    let mut c = controller();
    c.select(track(1));
    started(&mut c, 30.0);
    c.set_volume(0.2);
    let s = stream_of(&c);

    c.close();
    assert!(c.state().is_none());
    assert_eq!(c.media().calls.last(), Some(&Call::Release));
    assert_eq!(c.volume(), 1.0);

    // Notifications after close are ignored.
    c.handle_event(MediaEvent::new(s, MediaEventKind::Started));
    assert!(c.state().is_none());
}

#[test]
fn progress_is_zero_until_duration_known() {
    let mut c = controller();
    c.select(track(1));
    assert_eq!(c.state().unwrap().progress(), 0.0);
    started(&mut c, 200.0);
    let s = stream_of(&c);
    c.handle_event(MediaEvent::new(s, MediaEventKind::TimeAdvance(50.0)));
    assert_eq!(c.state().unwrap().progress(), 0.25);
}
