//! Opening URLs in the user's browser.

use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

/// Failure to hand a URL to the system.
#[derive(Error, Debug)]
#[error("failed to open {url}: {source}")]
pub struct BrowserError {
    pub url: String,
    #[source]
    pub source: std::io::Error,
}

/// Something that can open a URL.
pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), BrowserError>;
}

/// Opens URLs with the system handler (`xdg-open`, `open`, `start`).
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open_url(&self, url: &str) -> Result<(), BrowserError> {
        info!(url, "opening url in system browser");
        open::that_detached(url).map_err(|source| BrowserError {
            url: url.to_string(),
            source,
        })
    }
}

/// Records URLs instead of opening them.
#[derive(Debug, Default)]
pub struct RecordingBrowser {
    opened: Mutex<Vec<String>>,
}

impl RecordingBrowser {
    /// Every URL passed to [`UrlOpener::open_url`], in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl UrlOpener for RecordingBrowser {
    fn open_url(&self, url: &str) -> Result<(), BrowserError> {
        if let Ok(mut guard) = self.opened.lock() {
            guard.push(url.to_string());
        }
        Ok(())
    }
}
