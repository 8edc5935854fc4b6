use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::api::{NewTrack, TrackUpdate};
use crate::config::AdminSettings;
use crate::error::{ApiError, FormError};
use crate::library::{Track, TrackId, is_audio_file, list_audio_files, probe_duration};

use super::catalog::LOAD_FAILED;
use super::form::{Form, TextField};
use super::request::{Op, Outbox, RequestId};

pub const UPLOAD_SUCCESS: &str = "Track uploaded successfully!";
pub const UPDATE_SUCCESS: &str = "Track updated successfully!";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this track?";
pub const NO_UPLOADS: &str = "No tracks uploaded yet";

pub const TITLE: usize = 0;
pub const ARTIST: usize = 1;
pub const ALBUM: usize = 2;
pub const FILE: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AdminMode {
    /// Moving through the management list.
    Browse,
    Upload,
    Edit(TrackId),
    ConfirmDelete(TrackId),
}

/// A message that disappears on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// `None` when the configured lifetime does not fit in an `Instant`;
    /// the notice then stays until replaced.
    pub until: Option<Instant>,
}

/// Size and duration of the file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub duration: Option<u64>,
}

/// Upload form plus the track management list.
#[derive(Debug)]
pub struct AdminConsole {
    pub mode: AdminMode,
    pub form: Form,
    pub file_info: Option<FileInfo>,
    pub candidates: Vec<PathBuf>,
    candidate: Option<usize>,

    pub submitting: bool,
    pub error: Option<String>,
    pub notice: Option<Notice>,

    pub tracks: Vec<Track>,
    pub cursor: usize,
    pub loading: bool,
    pub list_error: Option<String>,
    pub deleting: Option<TrackId>,

    settings: AdminSettings,
    notice_for: Duration,
    list_request: Option<RequestId>,
    submit_request: Option<RequestId>,
    delete_request: Option<(RequestId, TrackId)>,
}

fn upload_form() -> Form {
    Form::new(vec![
        TextField::new("Title *"),
        TextField::new("Artist"),
        TextField::new("Album"),
        TextField::new("Audio file *"),
    ])
}

impl AdminConsole {
    pub fn new(settings: AdminSettings, notice_for: Duration) -> Self {
        Self {
            mode: AdminMode::Browse,
            form: upload_form(),
            file_info: None,
            candidates: Vec::new(),
            candidate: None,
            submitting: false,
            error: None,
            notice: None,
            tracks: Vec::new(),
            cursor: 0,
            loading: false,
            list_error: None,
            deleting: None,
            settings,
            notice_for,
            list_request: None,
            submit_request: None,
            delete_request: None,
        }
    }

    pub fn settings(&self) -> &AdminSettings {
        &self.settings
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.settings
            .upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Forget everything tied to the current admin (on logout or session
    /// loss). Replies still in flight are ignored when they land.
    pub fn reset(&mut self) {
        self.mode = AdminMode::Browse;
        self.form.clear();
        self.file_info = None;
        self.candidate = None;
        self.submitting = false;
        self.error = None;
        self.notice = None;
        self.tracks.clear();
        self.cursor = 0;
        self.loading = false;
        self.list_error = None;
        self.deleting = None;
        self.list_request = None;
        self.submit_request = None;
        self.delete_request = None;
    }

    // ---- management list -------------------------------------------------

    pub fn load(&mut self, outbox: &mut Outbox) {
        self.loading = true;
        self.list_request = Some(outbox.push(Op::ListTracks));
    }

    pub fn receive_tracks(&mut self, id: RequestId, result: &Result<Vec<Track>, ApiError>) -> bool {
        if self.list_request != Some(id) {
            return false;
        }
        self.list_request = None;
        self.loading = false;
        match result {
            Ok(tracks) => {
                self.tracks = tracks.clone();
                self.list_error = None;
                self.clamp_cursor();
            }
            Err(e) => {
                tracing::warn!("error fetching tracks: {}", e.detail());
                self.list_error = Some(LOAD_FAILED.to_string());
            }
        }
        true
    }

    pub fn next(&mut self) {
        if !self.tracks.is_empty() {
            self.cursor = (self.cursor + 1).min(self.tracks.len() - 1);
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.tracks.len() {
            self.cursor = self.tracks.len().saturating_sub(1);
        }
    }

    // ---- delete ----------------------------------------------------------

    /// Ask to delete the highlighted track. Goes straight to the network
    /// only when confirmation is disabled.
    pub fn request_delete(&mut self, outbox: &mut Outbox) {
        if self.delete_request.is_some() {
            return;
        }
        let Some(id) = self.current().map(|t| t.id) else {
            return;
        };
        if self.settings.confirm_delete {
            self.mode = AdminMode::ConfirmDelete(id);
        } else {
            self.send_delete(id, outbox);
        }
    }

    pub fn confirm_delete(&mut self, outbox: &mut Outbox) {
        if let AdminMode::ConfirmDelete(id) = self.mode {
            self.mode = AdminMode::Browse;
            self.send_delete(id, outbox);
        }
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.mode, AdminMode::ConfirmDelete(_)) {
            self.mode = AdminMode::Browse;
        }
    }

    fn send_delete(&mut self, id: TrackId, outbox: &mut Outbox) {
        self.error = None;
        self.deleting = Some(id);
        let request = outbox.push(Op::DeleteTrack(id));
        self.delete_request = Some((request, id));
    }

    /// Returns the removed id when the delete succeeded.
    pub fn receive_deleted(
        &mut self,
        id: RequestId,
        track: TrackId,
        result: &Result<(), ApiError>,
    ) -> Option<TrackId> {
        if self.delete_request != Some((id, track)) {
            return None;
        }
        self.delete_request = None;
        self.deleting = None;
        match result {
            Ok(()) => {
                tracing::info!(track = %track, "track deleted");
                self.tracks.retain(|t| t.id != track);
                self.clamp_cursor();
                Some(track)
            }
            Err(e) => {
                self.error = Some(format!("Failed to delete track: {}", e.detail()));
                None
            }
        }
    }

    // ---- upload / edit form ----------------------------------------------

    pub fn open_upload(&mut self) {
        if matches!(self.mode, AdminMode::Edit(_)) {
            self.form.clear();
        }
        self.mode = AdminMode::Upload;
        self.error = None;
        self.form.focus = TITLE;
        self.refresh_candidates();
    }

    pub fn open_edit(&mut self) {
        let Some(track) = self.current().cloned() else {
            return;
        };
        self.form.clear();
        self.form.set(TITLE, &track.title);
        self.form.set(ARTIST, track.artist().unwrap_or(""));
        self.form.set(ALBUM, track.album().unwrap_or(""));
        self.file_info = None;
        self.error = None;
        self.mode = AdminMode::Edit(track.id);
    }

    /// Leave the form. Entered values survive for the next upload; edits
    /// are discarded.
    pub fn close_form(&mut self) {
        if matches!(self.mode, AdminMode::Edit(_)) {
            self.form.clear();
        }
        self.mode = AdminMode::Browse;
        self.error = None;
    }

    pub fn in_form(&self) -> bool {
        matches!(self.mode, AdminMode::Upload | AdminMode::Edit(_))
    }

    pub fn input(&mut self, c: char) {
        if !self.submitting {
            self.form.insert(c);
            if self.form.focus == FILE {
                self.file_info = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        if !self.submitting {
            self.form.backspace();
            if self.form.focus == FILE {
                self.file_info = None;
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.form.focus_next();
        if matches!(self.mode, AdminMode::Edit(_)) && self.form.focus == FILE {
            self.form.focus_next();
        }
    }

    pub fn focus_prev(&mut self) {
        self.form.focus_prev();
        if matches!(self.mode, AdminMode::Edit(_)) && self.form.focus == FILE {
            self.form.focus_prev();
        }
    }

    pub fn refresh_candidates(&mut self) {
        self.candidates = list_audio_files(&self.upload_dir(), &self.settings.extensions);
        self.candidate = None;
    }

    /// Step through the files in the upload directory.
    pub fn cycle_file(&mut self, delta: isize) {
        if self.submitting || self.candidates.is_empty() {
            return;
        }
        let len = self.candidates.len() as isize;
        let next = match self.candidate {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        } as usize;
        self.candidate = Some(next);
        let path = self.candidates[next].clone();
        self.form.set(FILE, &path.display().to_string());
        self.file_info = inspect(&path);
    }

    fn resolve_file(&self) -> Option<PathBuf> {
        let raw = self.form.value(FILE).trim();
        if raw.is_empty() {
            return None;
        }
        let path = Path::new(raw);
        Some(if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            self.upload_dir().join(path)
        })
    }

    /// Check the upload form. Nothing is sent unless this succeeds.
    pub fn validate(&self) -> Result<NewTrack, FormError> {
        let title = self.form.value(TITLE).trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        let Some(path) = self.resolve_file() else {
            return Err(FormError::MissingFile);
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let meta = fs::metadata(&path).map_err(|_| FormError::FileNotFound(name.clone()))?;
        if !meta.is_file() {
            return Err(FormError::FileNotFound(name));
        }
        if !is_audio_file(&path, &self.settings.extensions) {
            return Err(FormError::UnsupportedFile(name));
        }
        if meta.len() > self.settings.max_upload_bytes {
            return Err(FormError::FileTooLarge {
                size: meta.len(),
                limit: self.settings.max_upload_bytes,
            });
        }

        let duration = match &self.file_info {
            Some(info) if info.path == path => info.duration,
            _ => probe_duration(&path),
        };

        Ok(NewTrack {
            title: title.to_string(),
            artist: self.form.value(ARTIST).trim().to_string(),
            album: self.form.value(ALBUM).trim().to_string(),
            file: path,
            duration,
        })
    }

    fn validate_edit(&self) -> Result<TrackUpdate, FormError> {
        let title = self.form.value(TITLE).trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        Ok(TrackUpdate {
            title: Some(title.to_string()),
            artist: Some(self.form.value(ARTIST).trim().to_string()),
            album: Some(self.form.value(ALBUM).trim().to_string()),
        })
    }

    pub fn submit(&mut self, outbox: &mut Outbox) {
        if self.submitting {
            return;
        }
        self.error = None;
        self.notice = None;

        let op = match self.mode {
            AdminMode::Upload => self.validate().map(Op::CreateTrack),
            AdminMode::Edit(id) => self.validate_edit().map(|u| Op::UpdateTrack(id, u)),
            _ => return,
        };
        match op {
            Ok(op) => {
                self.submitting = true;
                self.submit_request = Some(outbox.push(op));
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Returns true when the upload succeeded and the catalog should refresh.
    pub fn receive_created(
        &mut self,
        id: RequestId,
        result: &Result<Track, ApiError>,
        now: Instant,
        outbox: &mut Outbox,
    ) -> bool {
        if self.submit_request != Some(id) {
            return false;
        }
        self.submit_request = None;
        self.submitting = false;
        match result {
            Ok(track) => {
                tracing::info!(track = %track.id, title = track.title.as_str(), "track uploaded");
                self.form.clear();
                self.file_info = None;
                self.candidate = None;
                self.mode = AdminMode::Browse;
                self.show_notice(UPLOAD_SUCCESS, now);
                self.load(outbox);
                true
            }
            Err(e) => {
                tracing::warn!("upload error: {}", e.detail());
                self.error = Some(format!("Upload failed. {}", e.detail()));
                false
            }
        }
    }

    /// Returns the updated track on success.
    pub fn receive_updated(
        &mut self,
        id: RequestId,
        result: &Result<Track, ApiError>,
        now: Instant,
    ) -> Option<Track> {
        if self.submit_request != Some(id) {
            return None;
        }
        self.submit_request = None;
        self.submitting = false;
        match result {
            Ok(track) => {
                if let Some(slot) = self.tracks.iter_mut().find(|t| t.id == track.id) {
                    *slot = track.clone();
                }
                self.form.clear();
                self.mode = AdminMode::Browse;
                self.show_notice(UPDATE_SUCCESS, now);
                Some(track.clone())
            }
            Err(e) => {
                self.error = Some(format!("Update failed. {}", e.detail()));
                None
            }
        }
    }

    fn show_notice(&mut self, text: &str, now: Instant) {
        self.notice = Some(Notice {
            text: text.to_string(),
            until: now.checked_add(self.notice_for),
        });
    }

    /// Drop the notice once it has been shown long enough.
    pub fn tick(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.until.is_some_and(|u| now >= u)) {
            self.notice = None;
        }
    }
}

fn inspect(path: &Path) -> Option<FileInfo> {
    let meta = fs::metadata(path).ok()?;
    Some(FileInfo {
        path: path.to_path_buf(),
        size: meta.len(),
        duration: probe_duration(path),
    })
}
