use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::PlaybackError;

/// Downloads audio payloads for the audio thread.
///
/// This plays the role of the media element's own resource loader: it only
/// ever fetches the track's public audio URL, never the library API.
#[derive(Clone)]
pub(super) struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub(super) fn new(timeout: Duration) -> Result<Self, PlaybackError> {
        let client = Client::builder()
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PlaybackError::Output(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    pub(super) fn fetch(&self, url: &str) -> Result<Arc<[u8]>, PlaybackError> {
        let fail = |reason: String| PlaybackError::Fetch {
            url: url.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| fail(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fail(format!("status {status}")));
        }
        let bytes = resp.bytes().map_err(|e| fail(e.to_string()))?;
        if bytes.is_empty() {
            return Err(fail("empty body".to_string()));
        }
        tracing::debug!(url, bytes = bytes.len(), "audio fetched");
        Ok(Arc::from(bytes.as_ref()))
    }
}
