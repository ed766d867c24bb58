//! Streaming-embed providers.
//!
//! Three shapes of provider live here:
//!
//! - embed lookups keyed by a Kinopoisk or IMDb id that answer with an
//!   iframe URL ([`alloha`], [`vibix`], [`hdvb`]) or build one locally
//!   ([`lumex`], [`links`]);
//! - direct-stream lookups keyed by a TMDB id ([`rgshows`]);
//! - the three-step IframeVideo flow ([`iframevideo`]).
//!
//! Every embed ends up in [`render_player_page`], which wraps it in a
//! minimal full-window document.

pub mod alloha;
pub mod hdvb;
pub mod iframevideo;
pub mod links;
pub mod lumex;
pub mod rgshows;
pub mod vibix;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ProviderError;

/// Which external id a player lookup is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Kp,
    Imdb,
}

impl IdType {
    pub fn as_str(self) -> &'static str {
        match self {
            IdType::Kp => "kp",
            IdType::Imdb => "imdb",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kp" | "kinopoisk" => Ok(IdType::Kp),
            "imdb" => Ok(IdType::Imdb),
            _ => Err(ProviderError::InvalidInput(
                "id_type must be 'kp' or 'imdb'".to_string(),
            )),
        }
    }
}

/// Season/episode pair for series playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Episode {
    pub season: i32,
    pub episode: i32,
}

impl Episode {
    /// Both numbers or nothing.
    pub fn from_parts(season: Option<i32>, episode: Option<i32>) -> Option<Self> {
        Some(Episode {
            season: season?,
            episode: episode?,
        })
    }
}

/// What an embed lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEmbed {
    /// A URL to load in an iframe.
    Url(String),
    /// Ready-made iframe markup from the upstream.
    Markup(String),
}

/// Kind of a direct stream URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Direct,
    Hls,
}

/// JSON answer of the direct-stream endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    pub provider: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<StreamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamResult {
    pub fn found(provider: &str, url: String) -> Self {
        Self {
            success: true,
            stream_type: Some(if url.contains(".m3u8") {
                StreamType::Hls
            } else {
                StreamType::Direct
            }),
            stream_url: Some(url),
            provider: provider.to_string(),
            error: None,
        }
    }

    pub fn failed(provider: &str, error: impl fmt::Display) -> Self {
        Self {
            success: false,
            stream_url: None,
            provider: provider.to_string(),
            stream_type: None,
            error: Some(error.to_string()),
        }
    }
}

/// Append `season`/`episode` (plus any extra pairs) to a player URL,
/// choosing `?` or `&` as needed.
pub fn append_episode(url: &str, episode: Option<Episode>, extra: &[(&str, &str)]) -> String {
    let Some(ep) = episode else {
        return url.to_string();
    };
    let mut out = String::from(url);
    out.push(if url.contains('?') { '&' } else { '?' });
    out.push_str(&format!("season={}&episode={}", ep.season, ep.episode));
    for (key, value) in extra {
        out.push_str(&format!("&{key}={value}"));
    }
    out
}

// ---------------------------------------------------------------------------
// HTML wrapper
// ---------------------------------------------------------------------------

const SHIELD_STYLE: &str = "html,body{margin:0;height:100%;background:#000;overflow:hidden;}\
#shield{position:fixed;inset:0;z-index:2;cursor:pointer;background:transparent;}\
#fullscreen{position:fixed;top:12px;right:12px;z-index:3;padding:6px 10px;border:0;border-radius:4px;\
background:rgba(0,0,0,.6);color:#fff;font:14px sans-serif;cursor:pointer;}";

const SHIELD_SCRIPT: &str = "document.getElementById('shield').addEventListener('click',function(e){e.currentTarget.remove();});\
document.getElementById('fullscreen').addEventListener('click',function(){var el=document.documentElement;\
if(document.fullscreenElement){document.exitFullscreen();}else if(el.requestFullscreen){el.requestFullscreen();}});";

/// Render the full-window player document for an embed.
///
/// The first click lands on a transparent shield that removes itself, so
/// pop-unders bound to the iframe's first click never fire.
pub fn render_player_page(name: &str, embed: &PlayerEmbed) -> String {
    let frame = match embed {
        PlayerEmbed::Url(url) => format!(
            r#"<iframe src="{}" allowfullscreen loading="lazy" style="border:none;width:100%;height:100%;"></iframe>"#,
            escape_attr(url)
        ),
        PlayerEmbed::Markup(markup) => markup.replace(r#"\""#, "\"").replace(r"\'", "'"),
    };

    format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'/><title>{name} Player</title>\
<style>{SHIELD_STYLE}</style></head><body>{frame}<div id=\"shield\"></div>\
<button id=\"fullscreen\" type=\"button\">Fullscreen</button><script>{SHIELD_SCRIPT}</script></body></html>"
    )
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
