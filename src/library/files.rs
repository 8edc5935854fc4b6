use std::path::{Path, PathBuf};

use lofty::file::AudioFile;
use walkdir::WalkDir;

fn normalized_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Whether `path` carries one of the accepted audio `extensions`.
pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    let exts = normalized_extensions(extensions);
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Candidate upload files directly inside `dir`, sorted by file name.
///
/// Hidden files and anything without an accepted extension are skipped.
/// Unreadable entries are ignored.
pub fn list_audio_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && !is_hidden(p) && is_audio_file(p, extensions))
        .collect();
    files.sort();
    files
}

/// Best-effort duration in whole seconds read from the file's own metadata.
///
/// This is only a hint for the server; any failure yields `None`.
pub fn probe_duration(path: &Path) -> Option<u64> {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let secs = tagged.properties().duration().as_secs();
            (secs > 0).then_some(secs)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), "duration probe failed: {e}");
            None
        }
    }
}
