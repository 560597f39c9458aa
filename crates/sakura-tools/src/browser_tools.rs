//! Tools that open a page in Master's browser.
//!
//! Nothing is fetched; the URL is built from a template and handed to the
//! platform's [`UrlOpener`](sakura_platform::browser::UrlOpener).

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use sakura_core::tools::registry::{Tool, ToolError};
use sakura_platform::Platform;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::required_str;

/// Characters escaped inside a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Substitute `{query}` in `template`, or append when the placeholder is absent.
pub(crate) fn fill_template(template: &str, encoded: &str) -> String {
    if template.contains("{query}") {
        template.replace("{query}", encoded)
    } else {
        format!("{template}{encoded}")
    }
}

/// Form-encode a search query (`tea cakes` becomes `tea+cakes`).
pub(crate) fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Percent-encode a path segment (`bad apple` becomes `bad%20apple`).
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// `search_internet`: open a web search for a query.
pub struct SearchInternetTool<P: Platform> {
    platform: Arc<P>,
    url_template: String,
}

impl<P: Platform> SearchInternetTool<P> {
    pub fn new(platform: Arc<P>, url_template: String) -> Self {
        Self {
            platform,
            url_template,
        }
    }
}

#[async_trait]
impl<P: Platform + 'static> Tool for SearchInternetTool<P> {
    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "Search the internet for information. Opens the results in Master's web browser."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let query = required_str(&args, "query")?;
        let url = fill_template(&self.url_template, &encode_query(query));
        debug!(query, url = %url, "opening web search");

        let reply = match self.platform.browser().open_url(&url) {
            Ok(()) => format!("Master, I've opened a search for '{query}' in your browser! ✨"),
            Err(e) => {
                warn!(error = %e, "web search failed");
                format!("Sorry Master, I couldn't search for that... ({e})")
            }
        };
        Ok(Value::String(reply))
    }
}

/// `play_music_spotify`: open a Spotify search for a song.
pub struct PlayMusicTool<P: Platform> {
    platform: Arc<P>,
    url_template: String,
}

impl<P: Platform> PlayMusicTool<P> {
    pub fn new(platform: Arc<P>, url_template: String) -> Self {
        Self {
            platform,
            url_template,
        }
    }
}

#[async_trait]
impl<P: Platform + 'static> Tool for PlayMusicTool<P> {
    fn name(&self) -> &str {
        "play_music_spotify"
    }

    fn description(&self) -> &str {
        "Play music by opening a Spotify search for a song or artist in the browser."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "song_name": {
                    "type": "string",
                    "description": "Song title and/or artist to search for"
                }
            },
            "required": ["song_name"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let song = required_str(&args, "song_name")?;
        let url = fill_template(&self.url_template, &encode_segment(song));
        debug!(song, url = %url, "opening music search");

        let reply = match self.platform.browser().open_url(&url) {
            Ok(()) => format!("Master, I've opened Spotify to search for '{song}'! 🎵 Enjoy!"),
            Err(e) => {
                warn!(error = %e, "music search failed");
                format!("Sorry Master, I couldn't open Spotify... ({e})")
            }
        };
        Ok(Value::String(reply))
    }
}
