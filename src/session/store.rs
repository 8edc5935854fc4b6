use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::model::Session;

/// Persists the session between runs as a small TOML file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a previously saved session.
    ///
    /// A missing file is an empty session. A corrupt file or one holding a
    /// token without a user is removed and treated as empty.
    pub fn load(&self) -> Session {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Session::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read session: {e}");
                return Session::default();
            }
        };

        match toml::from_str::<Session>(&raw) {
            Ok(session) if session.token.is_some() && session.user.is_some() => session,
            Ok(_) => {
                self.clear();
                Session::default()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "discarding corrupt session: {e}");
                self.clear();
                Session::default()
            }
        }
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = toml::to_string(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // The file holds a bearer token: owner read/write only.
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(0o600);
            let mut file = options.open(&self.path)?;
            // `mode` only applies on creation; tighten a file left by an older run.
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(body.as_bytes())
        }
        #[cfg(not(unix))]
        {
            options.open(&self.path)?.write_all(body.as_bytes())
        }
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), "failed to remove session: {e}"),
        }
    }
}
