use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("captions are disabled for video {video_id}")]
    CaptionsDisabled { video_id: String },

    #[error("no '{language}' transcript for video {video_id}")]
    NotFound { video_id: String, language: String },

    #[error("transcript request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not parse transcript data: {0}")]
    Parse(String),
}

/// One timed caption line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    /// Offset from the start of the video, in seconds.
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub fragments: Vec<Fragment>,
}

impl Transcript {
    /// All fragment texts joined by single spaces, blanks dropped.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Source of caption tracks for a video.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str, language: &str) -> Result<Transcript, TranscriptError>;
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklist {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Fetches captions through YouTube's InnerTube player API.
pub struct YoutubeTranscripts {
    client: Client,
}

impl YoutubeTranscripts {
    pub fn new(timeout: Duration) -> Result<Self, TranscriptError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn player_response(&self, video_id: &str, language: &str) -> Result<PlayerResponse, TranscriptError> {
        let page_html = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": language,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(PLAYER_URL)
            .query(&[("key", api_key.as_str()), ("prettyPrint", "false")])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscripts {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str, language: &str) -> Result<Transcript, TranscriptError> {
        let player = self.player_response(video_id, language).await?;

        let tracks = player
            .captions
            .and_then(|c| c.tracklist)
            .and_then(|t| t.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(TranscriptError::CaptionsDisabled {
                video_id: video_id.to_string(),
            });
        }

        let track = tracks
            .iter()
            .find(|t| t.language_code == language)
            .ok_or_else(|| TranscriptError::NotFound {
                video_id: video_id.to_string(),
                language: language.to_string(),
            })?;

        let caption_xml = self
            .client
            .get(&track.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let fragments = parse_caption_xml(&caption_xml)?;
        debug!(fragments = fragments.len(), "Parsed caption track");

        Ok(Transcript {
            video_id: video_id.to_string(),
            language: track.language_code.clone(),
            fragments,
        })
    }
}

static API_KEY_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)
            .expect("Failed to compile INNERTUBE_API_KEY regex"),
        Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)
            .expect("Failed to compile innertubeApiKey regex"),
    ]
});

fn extract_api_key(html: &str) -> Result<String, TranscriptError> {
    for re in API_KEY_PATTERNS.iter() {
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }

    Err(TranscriptError::Parse(
        "could not find InnerTube API key on watch page".into(),
    ))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Fragment>, TranscriptError> {
    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut timing: Option<(f64, f64)> = None;
    let mut has_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) if e.name().as_ref() == b"transcript" => {
                has_root = true;
            }
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match attr.key.as_ref() {
                        b"start" => start = value,
                        b"dur" => dur = value,
                        _ => {}
                    }
                }
                timing = start.map(|s| (s, dur.unwrap_or(0.0)));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = timing.take() {
                    let raw = e
                        .unescape()
                        .map_err(|err| TranscriptError::Parse(err.to_string()))?;
                    // Captions are double-escaped: `&amp;#39;` survives XML unescaping as `&#39;`.
                    let text = html_escape::decode_html_entities(&raw).trim().to_string();
                    if !text.is_empty() {
                        fragments.push(Fragment {
                            text,
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::End(_)) => timing = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(TranscriptError::Parse(e.to_string())),
            _ => {}
        }
    }

    if !has_root {
        return Err(TranscriptError::Parse(
            "caption response has no <transcript> element".into(),
        ));
    }

    Ok(fragments)
}
