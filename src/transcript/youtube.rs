use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::parser::parse_captions;
use super::{CaptionTrack, TranscriptEntry, TranscriptSource};
use crate::config::NetworkConfig;
use crate::utils::base_language;
use crate::TranscriptError;

/// Marker YouTube puts on the watch page when it wants a captcha solved
const BOT_CHALLENGE_MARKER: &str = "class=\"g-recaptcha\"";

/// YouTube transcript retriever speaking the innertube player API
pub struct YoutubeClient {
    client: Client,
    base_url: String,
    client_name: String,
    client_version: String,
    key_patterns: Vec<Regex>,
}

/// The parts of the player response that matter for captions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    caption_tracks: Option<Vec<CaptionTrack>>,
}

impl YoutubeClient {
    pub fn new(network: &NetworkConfig) -> Result<Self, TranscriptError> {
        let key_patterns = network.compiled_key_patterns()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_str(&network.accept_language).map_err(|e| {
                TranscriptError::Unknown(format!("Invalid Accept-Language header: {e}"))
            })?,
        );

        let client = Client::builder()
            .user_agent(network.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(network.timeout_secs))
            .build()
            .map_err(|e| TranscriptError::Unknown(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: network.base_url.trim_end_matches('/').to_string(),
            client_name: network.client_name.clone(),
            client_version: network.client_version.clone(),
            key_patterns,
        })
    }

    /// Step 1: scrape the innertube API key from the public watch page
    async fn fetch_api_key(&self, video_id: &str) -> Result<String, TranscriptError> {
        let page_url = format!("{}/watch?v={}", self.base_url, urlencoding::encode(video_id));
        tracing::debug!("Fetching watch page: {}", page_url);

        let response = self
            .client
            .get(&page_url)
            .send()
            .await
            .map_err(|e| TranscriptError::FetchFailed(format!("watch page request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::RateLimited);
        }
        if !status.is_success() {
            return Err(TranscriptError::FetchFailed(format!("HTTP {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| TranscriptError::FetchFailed(format!("watch page body unreadable: {e}")))?;

        if html.contains(BOT_CHALLENGE_MARKER) {
            return Err(TranscriptError::RateLimited);
        }

        find_api_key(&html, &self.key_patterns).ok_or(TranscriptError::ApiKeyNotFound)
    }

    /// Step 2: ask the player endpoint which caption tracks exist
    async fn list_caption_tracks(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let player_url = format!(
            "{}/youtubei/v1/player?key={}",
            self.base_url,
            urlencoding::encode(api_key)
        );
        tracing::debug!(
            "Requesting caption tracks as {} {}",
            self.client_name,
            self.client_version
        );

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": self.client_name,
                    "clientVersion": self.client_version,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(&player_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptError::PlayerFetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::PlayerFetchFailed(format!("HTTP {status}")));
        }

        let player: PlayerResponse = response.json().await.map_err(|e| {
            TranscriptError::PlayerFetchFailed(format!("unexpected player response: {e}"))
        })?;

        tracks_from_player(player, video_id)
    }

    /// Step 4: download the caption XML of the chosen track
    async fn fetch_caption_xml(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        let track_url = self.caption_url(&track.base_url)?;
        tracing::debug!("Fetching {} captions: {}", track.language_code, track_url);

        let response = self
            .client
            .get(track_url)
            .send()
            .await
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::RateLimited);
        }
        if !status.is_success() {
            return Err(TranscriptError::FetchFailed(format!("HTTP {status}")));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;

        if xml.trim().is_empty() {
            return Err(TranscriptError::FetchFailed("empty caption response".to_string()));
        }

        Ok(xml)
    }

    /// Resolve the track URL against the base URL and drop any `fmt` override
    fn caption_url(&self, base_url: &str) -> Result<Url, TranscriptError> {
        let resolved = Url::parse(&self.base_url)
            .and_then(|base| base.join(base_url))
            .map_err(|e| TranscriptError::FetchFailed(format!("invalid caption track URL: {e}")))?;
        Ok(strip_format_param(resolved))
    }
}

#[async_trait]
impl TranscriptSource for YoutubeClient {
    async fn fetch_transcript(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        let api_key = self.fetch_api_key(video_id).await?;
        let tracks = self.list_caption_tracks(&api_key, video_id).await?;

        let track = select_track(&tracks, language)
            .ok_or_else(|| TranscriptError::NoCaptionTracks(video_id.to_string()))?;
        tracing::info!(
            "Selected {} caption track for {} (wanted {})",
            track.language_code,
            video_id,
            language
        );

        let xml = self.fetch_caption_xml(track).await?;
        parse_captions(&xml, &track.language_code)
    }

    fn platform_name(&self) -> &'static str {
        "YouTube"
    }
}

/// First key any of the patterns finds in the page
fn find_api_key(html: &str, patterns: &[Regex]) -> Option<String> {
    patterns
        .iter()
        .find_map(|pattern| pattern.captures(html))
        .map(|caps| caps[1].to_string())
}

fn tracks_from_player(
    player: PlayerResponse,
    video_id: &str,
) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let tracks = player
        .captions
        .and_then(|captions| captions.player_captions_tracklist_renderer)
        .and_then(|renderer| renderer.caption_tracks);

    let Some(tracks) = tracks else {
        let playable = player
            .playability_status
            .and_then(|status| status.status)
            .is_some_and(|status| status == "OK");
        return Err(if playable {
            TranscriptError::CaptionsDisabled(video_id.to_string())
        } else {
            TranscriptError::TranscriptsUnavailable(video_id.to_string())
        });
    };

    if tracks.is_empty() {
        return Err(TranscriptError::NoCaptionTracks(video_id.to_string()));
    }

    Ok(tracks)
}

type TrackMatcher = fn(&CaptionTrack, &str) -> bool;

fn same_language(track: &CaptionTrack, language: &str) -> bool {
    track.language_code == language
}

fn same_base_language(track: &CaptionTrack, language: &str) -> bool {
    base_language(&track.language_code) == base_language(language)
}

fn any_language(_: &CaptionTrack, _: &str) -> bool {
    true
}

/// Step 3: exact language, then same base language, then whatever comes first
pub fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    const MATCHERS: [TrackMatcher; 3] = [same_language, same_base_language, any_language];

    MATCHERS
        .iter()
        .find_map(|matches| tracks.iter().find(|track| matches(track, language)))
}

/// Drop every `fmt` query parameter so the timedtext endpoint answers in XML
fn strip_format_param(mut url: Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url
}
