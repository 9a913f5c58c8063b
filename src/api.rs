//! Remote feed client and the per-feed decoders.
//!
//! The two endpoints disagree on field naming, so each feed gets its own
//! decoder that maps raw JSON onto [`Record`].

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{BaseStats, Feed, Record};
use crate::sprite::{decode_base64_image, SpriteData};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl FetchError {
    /// Decode failures are deterministic; retrying will not help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Decode(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Both endpoints take an empty POST with a JSON content type.
pub struct HttpFeedClient;

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let response = http_client()
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|err| FetchError::Request(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

/// Fetches and decodes one feed, retrying transport and status failures
/// with exponential backoff.
pub async fn load_feed(
    client: &dyn FeedClient,
    feed: Feed,
    url: &str,
    retry: RetryPolicy,
) -> Result<Vec<Record>, FetchError> {
    let mut attempt = 0;
    loop {
        tracing::debug!(feed = feed.label(), url, attempt, "fetching feed");
        let result = match client.fetch(url).await {
            Ok(body) => decode_feed(feed, body),
            Err(err) => Err(err),
        };
        match result {
            Ok(records) => {
                tracing::info!(feed = feed.label(), count = records.len(), "feed loaded");
                return Ok(records);
            }
            Err(err) if err.is_retryable() && attempt < retry.retries => {
                let delay = retry.delay(attempt);
                tracing::warn!(
                    feed = feed.label(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "feed fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::warn!(feed = feed.label(), error = %err, "feed fetch failed");
                return Err(err);
            }
        }
    }
}

pub fn decode_feed(feed: Feed, body: Value) -> Result<Vec<Record>, FetchError> {
    match feed {
        Feed::Ranked => decode_ranked(body),
        Feed::Gallery => decode_gallery(body),
    }
}

// ============================================================================
// Ranked feed
// ============================================================================

pub fn decode_ranked(body: Value) -> Result<Vec<Record>, FetchError> {
    let entries = expect_array(body, Feed::Ranked)?;
    Ok(entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let Some(object) = entry.as_object() else {
                tracing::warn!(feed = "ranked", position, "skipping non-object entry");
                return None;
            };
            let Some(name) = text(object, &["Pokemon", "Name", "name"]) else {
                tracing::warn!(feed = "ranked", position, "skipping entry without a name");
                return None;
            };
            let stats = BaseStats {
                hp: stat(object, &["HP"]),
                attack: stat(object, &["Attack"]),
                defense: stat(object, &["Defense"]),
                special_attack: stat(object, &["Special Attack"]),
                special_defense: stat(object, &["Special Defense"]),
                speed: stat(object, &["Speed"]),
            };
            let image = image(&name, text(object, &IMAGE_KEYS));
            Some(Record {
                stats,
                types: labels(field(object, &["Type", "Types"])),
                height: measure(object, &["Height (m)", "Height"]),
                weight: measure(object, &["Weight (kg)", "Weight"]),
                abilities: labels(field(object, &["Abilities"])),
                image,
                name,
            })
        })
        .collect())
}

// ============================================================================
// Gallery feed
// ============================================================================

pub fn decode_gallery(body: Value) -> Result<Vec<Record>, FetchError> {
    let entries = expect_array(body, Feed::Gallery)?;
    Ok(entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let Some(wrapper) = entry.as_object() else {
                tracing::warn!(feed = "gallery", position, "skipping non-object entry");
                return None;
            };
            let metadata = wrapper
                .get("metadata")
                .and_then(Value::as_object)
                .unwrap_or(wrapper);
            let Some(name) = text(metadata, &["Pokemon", "Name", "name"]) else {
                tracing::warn!(feed = "gallery", position, "skipping entry without a name");
                return None;
            };
            let stats = BaseStats {
                hp: base_stat(metadata, "HP"),
                attack: base_stat(metadata, "Attack"),
                defense: base_stat(metadata, "Defense"),
                special_attack: base_stat(metadata, "Special Attack"),
                special_defense: base_stat(metadata, "Special Defense"),
                speed: base_stat(metadata, "Speed"),
            };
            let encoded = text(wrapper, &IMAGE_KEYS).or_else(|| text(metadata, &IMAGE_KEYS));
            let image = image(&name, encoded);
            Some(Record {
                stats,
                types: labels(field(metadata, &["Type", "Types"])),
                height: measure(metadata, &["Height (m)", "Height"]),
                weight: measure(metadata, &["Weight (kg)", "Weight"]),
                abilities: labels(field(metadata, &["Abilities"])),
                image,
                name,
            })
        })
        .collect())
}

/// `"Special Attack"` is published as `"Special Attack Base"` or
/// `"SpecialAttackBase"`.
fn base_stat(object: &Map<String, Value>, stat_name: &str) -> u16 {
    let spaced = format!("{stat_name} Base");
    let unspaced = format!("{}Base", stat_name.replace(' ', ""));
    stat(object, &[spaced.as_str(), unspaced.as_str(), stat_name])
}

// ============================================================================
// Shared field helpers
// ============================================================================

/// Both feeds have shipped each of these spellings for the portrait.
const IMAGE_KEYS: [&str; 3] = ["image_data", "image data", "image"];

fn expect_array(body: Value, feed: Feed) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(entries) => Ok(entries),
        other => Err(FetchError::Decode(format!(
            "{} feed: expected an array, got {}",
            feed.label(),
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(object, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Accepts JSON numbers and numeric strings such as `"45"` or `"0.7 m"`.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let raw = raw.trim();
            let end = raw
                .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
                .unwrap_or(raw.len());
            raw[..end].parse().ok()
        }
        _ => None,
    }
}

fn stat(object: &Map<String, Value>, keys: &[&str]) -> u16 {
    field(object, keys)
        .and_then(number)
        .map(|value| value.round().clamp(0.0, f64::from(u16::MAX)) as u16)
        .unwrap_or_default()
}

fn measure(object: &Map<String, Value>, keys: &[&str]) -> f32 {
    field(object, keys)
        .and_then(number)
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or_default() as f32
}

/// A list of labels, or a single comma separated string.
fn labels(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn image(name: &str, encoded: Option<String>) -> Option<SpriteData> {
    let encoded = encoded?;
    match decode_base64_image(&encoded) {
        Ok(sprite) => Some(sprite),
        Err(err) => {
            tracing::warn!(record = name, error = %err, "undecodable image");
            None
        }
    }
}
