use super::model::Track;

/// Separator used between artist, album and uploader in list rows.
pub const DOT_SEPARATOR: &str = " • ";

/// Format a stored duration (whole seconds) as `M:SS`.
///
/// Missing or zero durations render as `--:--`; the server stores `0` when it
/// could not determine the length.
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        Some(s) if s > 0 => format!("{}:{:02}", s / 60, s % 60),
        _ => "--:--".to_string(),
    }
}

/// Format a byte count as megabytes with two decimals, e.g. `3.42 MB`.
pub fn format_file_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) if b > 0 => format!("{:.2} MB", b as f64 / (1024.0 * 1024.0)),
        _ => "N/A".to_string(),
    }
}

/// Secondary line for a catalog row: artist and album, then the uploader.
pub fn catalog_subtitle(track: &Track) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(a) = track.artist() {
        parts.push(a.to_string());
    }
    if let Some(a) = track.album() {
        parts.push(a.to_string());
    }
    if let Some(u) = track
        .uploader
        .as_ref()
        .map(|u| u.name.trim())
        .filter(|n| !n.is_empty())
    {
        parts.push(format!("Uploaded by {u}"));
    }
    parts.join(DOT_SEPARATOR)
}

/// Secondary line for the admin management list.
pub fn admin_subtitle(track: &Track) -> String {
    let artist = track.artist().unwrap_or("Unknown Artist");
    match track.album() {
        Some(album) => format!("{artist}{DOT_SEPARATOR}{album}"),
        None => artist.to_string(),
    }
}
