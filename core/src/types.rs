//! Request bodies for the control API.
//!
//! # Design
//! Field names serialize to the vendor's camelCase wire names. Optional
//! fields are skipped when `None`: the vendor treats a present field as an
//! explicit override, so absent input must stay absent on the wire.
//! Response bodies are not modelled here; callers receive raw bytes.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Where loaded content goes relative to the current queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueAction {
    Append,
    Insert,
    InsertNext,
    Replace,
}

/// Play modes to apply to a group. Unset modes are left as they are.
///
/// Sent as the vendor's `playModes` object of booleans, not as a list of
/// mode names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayModes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_one: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossfade: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub player_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_context_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadLineIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_on_completion: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFavorite {
    pub favorite_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<QueueAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_on_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_modes: Option<PlayModes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPlaylist {
    pub playlist_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<QueueAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_on_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_modes: Option<PlayModes>,
}

/// Body of `playbackSession/create` and `playbackSession/joinOrCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    pub app_id: String,
    pub app_context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSession {
    pub app_id: String,
    pub app_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCloudQueue {
    pub queue_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_authorization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_on_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_millis: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_http_authorization_for_media: Option<bool>,
}

impl LoadCloudQueue {
    pub fn new(queue_base_url: impl Into<String>) -> Self {
        Self {
            queue_base_url: queue_base_url.into(),
            http_authorization: None,
            item_id: None,
            play_on_completion: None,
            position_millis: None,
            queue_version: None,
            track_metadata: None,
            use_http_authorization_for_media: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStreamUrl {
    pub stream_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_on_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipToItem {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_on_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_millis: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAccount {
    pub user_id_hash_code: String,
    pub nickname: String,
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_device_id: Option<String>,
}

/// Player settings to change. Only the supplied settings are sent, since
/// some players reject settings they do not support.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_mode: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "two_decimals"
    )]
    pub volume_scaling_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mono_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_disable: Option<bool>,
}

/// Rounds to two decimal places the way `%.2f` would, then widens through
/// the decimal text so `0.35f32` goes out as `0.35` rather than
/// `0.3499999940395355`.
fn two_decimals<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if !v.is_finite() => Err(serde::ser::Error::custom(format!(
            "volumeScalingFactor must be finite, got {v}"
        ))),
        Some(v) => {
            let rounded: f64 = format!("{v:.2}").parse().map_err(serde::ser::Error::custom)?;
            serializer.serialize_f64(rounded)
        }
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPlayerVolume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipType {
    Chime,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipPriority {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadAudioClip {
    pub app_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_type: Option<ClipType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_authorization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ClipPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
}

impl LoadAudioClip {
    pub fn new(app_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            name: name.into(),
            clip_type: None,
            http_authorization: None,
            priority: None,
            stream_url: None,
            volume: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeTheaterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhance_dialog: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TvPowerState {
    On,
    Standby,
}
