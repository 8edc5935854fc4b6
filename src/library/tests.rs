use super::*;

fn track_json(extra: &str) -> String {
    format!(
        r#"{{"id": 42, "title": "Lesson 1", "bunny_url": "https://cdn.example.org/l1.mp3"{extra}}}"#
    )
}

#[test]
fn track_decodes_minimal_and_full_payloads() {
    let t: Track = serde_json::from_str(&track_json("")).unwrap();
    assert_eq!(t.id, TrackId(42));
    assert_eq!(t.audio_url, "https://cdn.example.org/l1.mp3");
    assert!(t.artist.is_none());
    assert!(t.duration.is_none());

    let t: Track = serde_json::from_str(&track_json(
        r#", "artist": "Fr. Smith", "album": "Creed", "duration": 185,
            "uploader": {"id": 1, "name": "Admin"}, "file_size": "1048576""#,
    ))
    .unwrap();
    assert_eq!(t.artist(), Some("Fr. Smith"));
    assert_eq!(t.album(), Some("Creed"));
    assert_eq!(t.duration, Some(185));
    assert_eq!(t.uploader.as_ref().map(|u| u.name.as_str()), Some("Admin"));
    assert_eq!(t.file_size, Some(1_048_576));
}

#[test]
fn file_size_accepts_numbers_and_nulls() {
    let t: Track = serde_json::from_str(&track_json(r#", "file_size": 2048"#)).unwrap();
    assert_eq!(t.file_size, Some(2048));
    let t: Track = serde_json::from_str(&track_json(r#", "file_size": null"#)).unwrap();
    assert_eq!(t.file_size, None);
    let t: Track = serde_json::from_str(&track_json(r#", "file_size": "n/a""#)).unwrap();
    assert_eq!(t.file_size, None);
}

#[test]
fn track_list_accepts_bare_and_wrapped() {
    let bare = format!("[{}]", track_json(""));
    let list: TrackList = serde_json::from_str(&bare).unwrap();
    assert_eq!(list.into_tracks().len(), 1);

    let wrapped = format!(r#"{{"data": [{}, {}]}}"#, track_json(""), track_json(""));
    let list: TrackList = serde_json::from_str(&wrapped).unwrap();
    assert_eq!(list.into_tracks().len(), 2);

    let list: TrackList = serde_json::from_str("[]").unwrap();
    assert!(list.into_tracks().is_empty());
}

#[test]
fn duration_tolerates_floats_strings_and_junk() {
    let t: Track = serde_json::from_str(&track_json(r#", "duration": 185.6"#)).unwrap();
    assert_eq!(t.duration, Some(186));
    let t: Track = serde_json::from_str(&track_json(r#", "duration": "185""#)).unwrap();
    assert_eq!(t.duration, Some(185));
    let t: Track = serde_json::from_str(&track_json(r#", "duration": "12.0""#)).unwrap();
    assert_eq!(t.duration, Some(12));
    let t: Track = serde_json::from_str(&track_json(r#", "duration": -3"#)).unwrap();
    assert_eq!(t.duration, None);
    let t: Track = serde_json::from_str(&track_json(r#", "duration": {"secs": 1}"#)).unwrap();
    assert_eq!(t.duration, None);
}

#[test]
fn null_audio_url_decodes_as_unplayable() {
    let t: Track = serde_json::from_str(
        r#"{"id": 5, "title": "Pending", "bunny_url": null}"#,
    )
    .unwrap();
    assert_eq!(t.audio_url, "");
    assert!(!t.has_audio_source());
}

#[test]
fn malformed_rows_do_not_fail_the_list() {
    let body = format!(
        r#"{{"data": [{}, {{"id": "x"}}, {{"title": "no id"}}, {}]}}"#,
        track_json(""),
        track_json(r#", "duration": 1.5"#)
    );
    let list: TrackList = serde_json::from_str(&body).unwrap();
    let tracks = list.into_tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[1].duration, Some(2));
}

#[test]
fn format_duration_pads_seconds() {
    assert_eq!(format_duration(Some(185)), "3:05");
    assert_eq!(format_duration(Some(59)), "0:59");
    assert_eq!(format_duration(Some(3600)), "60:00");
    assert_eq!(format_duration(Some(0)), "--:--");
    assert_eq!(format_duration(None), "--:--");
}

#[test]
fn format_file_size_in_megabytes() {
    assert_eq!(format_file_size(Some(1_048_576)), "1.00 MB");
    assert_eq!(format_file_size(Some(3_590_324)), "3.42 MB");
    assert_eq!(format_file_size(None), "N/A");
    assert_eq!(format_file_size(Some(0)), "N/A");
}

#[test]
fn subtitles_skip_blank_fields() {
    let mut t: Track = serde_json::from_str(&track_json("")).unwrap();
    assert_eq!(catalog_subtitle(&t), "");
    assert_eq!(admin_subtitle(&t), "Unknown Artist");

    t.artist = Some("  ".into());
    t.album = Some("Creed".into());
    t.uploader = Some(Uploader {
        id: 1,
        name: "Admin".into(),
    });
    assert_eq!(catalog_subtitle(&t), "Creed • Uploaded by Admin");
    assert_eq!(admin_subtitle(&t), "Unknown Artist • Creed");
}

#[test]
fn list_audio_files_filters_by_extension_and_hidden() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.MP3", "a.flac", ".hidden.mp3", "notes.txt", "c.m4a"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("nested.mp3")).unwrap();

    let exts = vec!["mp3".to_string(), ".flac".to_string(), "m4a".to_string()];
    let files = list_audio_files(dir.path(), &exts);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.flac", "b.MP3", "c.m4a"]);
}

#[test]
fn probe_duration_is_best_effort() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("garbage.mp3");
    std::fs::write(&p, b"definitely not audio").unwrap();
    assert_eq!(probe_duration(&p), None);
    assert_eq!(probe_duration(&dir.path().join("missing.mp3")), None);
}
