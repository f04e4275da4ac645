//! In-memory stand-in for the Sonos authorization and control APIs.
//!
//! Serves the subset of endpoints the client integration tests exercise:
//! the OAuth token exchange, households and groups, group and player
//! volume, and playback. Every control route requires the bearer token
//! issued by the token endpoint.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use url::form_urlencoded;
use uuid::Uuid;

pub const ACCESS_TOKEN: &str = "mock-access-token";
pub const REFRESH_TOKEN: &str = "mock-refresh-token";
pub const AUTHORIZATION_CODE: &str = "mock-authorization-code";
/// base64 of `client:secret`.
pub const CLIENT_KEYS: &str = "Y2xpZW50OnNlY3JldA==";

pub const HOUSEHOLD_ID: &str = "HH1";
pub const GROUP_ID: &str = "G1";
pub const PLAYER_IDS: [&str; 2] = ["P1", "P2"];

pub const PLAYBACK_IDLE: &str = "PLAYBACK_STATE_IDLE";
pub const PLAYBACK_PAUSED: &str = "PLAYBACK_STATE_PAUSED";
pub const PLAYBACK_PLAYING: &str = "PLAYBACK_STATE_PLAYING";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub coordinator_id: String,
    pub playback_state: String,
    pub player_ids: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume: u8,
    pub muted: bool,
    pub fixed: bool,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            volume: 20,
            muted: false,
            fixed: false,
        }
    }
}

/// OAuth token grant. Field names are snake_case on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
    pub scope: String,
}

/// One household with its players, groups and volumes.
#[derive(Debug, Clone)]
pub struct Home {
    pub players: Vec<Player>,
    pub groups: BTreeMap<String, Group>,
    pub group_volume: BTreeMap<String, Volume>,
    pub player_volume: BTreeMap<String, Volume>,
}

impl Home {
    /// Two players grouped together under `GROUP_ID`.
    pub fn seeded() -> Self {
        let players: Vec<Player> = PLAYER_IDS
            .iter()
            .enumerate()
            .map(|(i, id)| Player {
                id: id.to_string(),
                name: format!("Room {}", i + 1),
            })
            .collect();
        let group = Group {
            id: GROUP_ID.to_string(),
            name: "Room 1 + 1".to_string(),
            coordinator_id: PLAYER_IDS[0].to_string(),
            playback_state: PLAYBACK_IDLE.to_string(),
            player_ids: PLAYER_IDS.iter().map(|id| id.to_string()).collect(),
        };
        Self {
            player_volume: players.iter().map(|p| (p.id.clone(), Volume::default())).collect(),
            players,
            group_volume: BTreeMap::from([(GROUP_ID.to_string(), Volume::default())]),
            groups: BTreeMap::from([(GROUP_ID.to_string(), group)]),
        }
    }

    fn has_player(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.id == id)
    }
}

pub type Db = Arc<RwLock<Home>>;

/// Error response in the vendor's shape.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    body: Value,
}

impl Failure {
    fn api(status: StatusCode, code: &str) -> Self {
        Self {
            status,
            body: json!({ "errorCode": code }),
        }
    }

    fn oauth(status: StatusCode, error: &str) -> Self {
        Self {
            status,
            body: json!({ "error": error }),
        }
    }

    fn gone() -> Self {
        Self::api(StatusCode::GONE, "ERROR_RESOURCE_GONE")
    }

    fn invalid(code: &str) -> Self {
        Self::api(StatusCode::BAD_REQUEST, code)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult = Result<Json<Value>, Failure>;

pub fn app() -> Router {
    app_with(Home::seeded())
}

pub fn app_with(home: Home) -> Router {
    let db: Db = Arc::new(RwLock::new(home));

    let control = Router::new()
        .route("/households", get(list_households))
        .route("/households/{household_id}/groups", get(list_groups))
        .route("/households/{household_id}/groups/createGroup", post(create_group))
        .route("/groups/{group_id}/groupVolume", get(get_group_volume).post(set_group_volume))
        .route("/groups/{group_id}/groupVolume/relative", post(set_group_relative_volume))
        .route("/groups/{group_id}/groupVolume/mute", post(set_group_mute))
        .route("/groups/{group_id}/playback", get(get_playback))
        .route("/groups/{group_id}/playback/play", post(play))
        .route("/groups/{group_id}/playback/pause", post(pause))
        .route("/groups/{group_id}/playback/togglePlayPause", post(toggle_play_pause))
        .route("/players/{player_id}/playerVolume", get(get_player_volume).post(set_player_volume))
        .route("/players/{player_id}/playerVolume/relative", post(set_player_relative_volume))
        .route("/players/{player_id}/playerVolume/mute", post(set_player_mute))
        .route_layer(middleware::from_fn(require_bearer));

    Router::new()
        .route("/login/v3/oauth/access", post(access_token))
        .nest("/control/api/v1", control)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Sonos API listening");
    }
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == expected);
    if !authorized {
        warn!(path = %request.uri().path(), "rejected request without valid bearer token");
        return Failure::api(StatusCode::UNAUTHORIZED, "ERROR_NOT_AUTHORIZED").into_response();
    }
    next.run(request).await
}

// --- authorization ---

async fn access_token(headers: HeaderMap, body: Bytes) -> Result<Json<TokenResponse>, Failure> {
    let expected = format!("Basic {CLIENT_KEYS}");
    let client_ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == expected);
    if !client_ok {
        return Err(Failure::oauth(StatusCode::UNAUTHORIZED, "invalid_client"));
    }

    let form: BTreeMap<String, String> = form_urlencoded::parse(&body).into_owned().collect();
    let field = |name: &str| form.get(name).map(String::as_str);

    let granted = match field("grant_type") {
        Some("authorization_code") => {
            field("code") == Some(AUTHORIZATION_CODE) && field("redirect_uri").is_some_and(|r| !r.is_empty())
        }
        Some("refresh_token") => field("refresh_token") == Some(REFRESH_TOKEN),
        _ => return Err(Failure::oauth(StatusCode::BAD_REQUEST, "unsupported_grant_type")),
    };
    if !granted {
        return Err(Failure::oauth(StatusCode::BAD_REQUEST, "invalid_grant"));
    }

    debug!(grant_type = ?field("grant_type"), "issued access token");
    Ok(Json(TokenResponse {
        access_token: ACCESS_TOKEN.to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 86_400,
        refresh_token: REFRESH_TOKEN.to_string(),
        scope: "playback-control-all".to_string(),
    }))
}

// --- households and groups ---

fn check_household(household_id: &str) -> Result<(), Failure> {
    if household_id == HOUSEHOLD_ID {
        Ok(())
    } else {
        Err(Failure::gone())
    }
}

async fn list_households() -> Json<Value> {
    Json(json!({ "households": [{ "id": HOUSEHOLD_ID }] }))
}

async fn list_groups(State(db): State<Db>, Path(household_id): Path<String>) -> ApiResult {
    check_household(&household_id)?;
    let home = db.read().await;
    let groups: Vec<&Group> = home.groups.values().collect();
    Ok(Json(json!({ "groups": groups, "players": home.players })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupBody {
    pub player_ids: Vec<String>,
    pub music_context_group_id: Option<String>,
}

async fn create_group(
    State(db): State<Db>,
    Path(household_id): Path<String>,
    Json(input): Json<CreateGroupBody>,
) -> ApiResult {
    check_household(&household_id)?;
    let mut home = db.write().await;

    let Some(coordinator) = input.player_ids.first().cloned() else {
        return Err(Failure::invalid("ERROR_MISSING_PARAMETERS"));
    };
    if !input.player_ids.iter().all(|id| home.has_player(id)) {
        return Err(Failure::invalid("ERROR_INVALID_PARAMETER"));
    }
    if let Some(context) = &input.music_context_group_id {
        if !home.groups.contains_key(context) {
            return Err(Failure::gone());
        }
    }

    for group in home.groups.values_mut() {
        group.player_ids.retain(|id| !input.player_ids.contains(id));
    }
    let emptied: Vec<String> = home
        .groups
        .iter()
        .filter(|(_, g)| g.player_ids.is_empty())
        .map(|(id, _)| id.clone())
        .collect();
    for id in emptied {
        home.groups.remove(&id);
        home.group_volume.remove(&id);
    }

    let group = Group {
        id: format!("{coordinator}:{}", Uuid::new_v4().simple()),
        name: format!("{coordinator} group"),
        coordinator_id: coordinator,
        playback_state: PLAYBACK_IDLE.to_string(),
        player_ids: input.player_ids,
    };
    home.group_volume.insert(group.id.clone(), Volume::default());
    home.groups.insert(group.id.clone(), group.clone());
    debug!(group_id = %group.id, "created group");
    Ok(Json(json!({ "group": group })))
}

// --- volume ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVolumeBody {
    pub volume: Option<i64>,
    pub muted: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeVolumeBody {
    pub volume_delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct MuteBody {
    pub muted: bool,
}

fn absolute(volume: i64) -> Result<u8, Failure> {
    u8::try_from(volume)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| Failure::invalid("ERROR_INVALID_PARAMETER"))
}

fn shifted(current: u8, delta: i64) -> Result<u8, Failure> {
    if !(-100..=100).contains(&delta) {
        return Err(Failure::invalid("ERROR_INVALID_PARAMETER"));
    }
    // In range after clamping, so the cast is lossless.
    Ok((i64::from(current) + delta).clamp(0, 100) as u8)
}

fn volume_json(volume: &Volume) -> Json<Value> {
    Json(json!(volume))
}

async fn get_group_volume(State(db): State<Db>, Path(group_id): Path<String>) -> ApiResult {
    let home = db.read().await;
    home.group_volume.get(&group_id).map(volume_json).ok_or_else(Failure::gone)
}

async fn set_group_volume(
    State(db): State<Db>,
    Path(group_id): Path<String>,
    Json(input): Json<SetVolumeBody>,
) -> ApiResult {
    let level = absolute(input.volume.ok_or_else(|| Failure::invalid("ERROR_MISSING_PARAMETERS"))?)?;
    let mut home = db.write().await;
    let volume = home.group_volume.get_mut(&group_id).ok_or_else(Failure::gone)?;
    volume.volume = level;
    Ok(Json(json!({})))
}

async fn set_group_relative_volume(
    State(db): State<Db>,
    Path(group_id): Path<String>,
    Json(input): Json<RelativeVolumeBody>,
) -> ApiResult {
    let mut home = db.write().await;
    let volume = home.group_volume.get_mut(&group_id).ok_or_else(Failure::gone)?;
    volume.volume = shifted(volume.volume, input.volume_delta)?;
    Ok(Json(json!({})))
}

async fn set_group_mute(
    State(db): State<Db>,
    Path(group_id): Path<String>,
    Json(input): Json<MuteBody>,
) -> ApiResult {
    let mut home = db.write().await;
    let volume = home.group_volume.get_mut(&group_id).ok_or_else(Failure::gone)?;
    volume.muted = input.muted;
    Ok(Json(json!({})))
}

async fn get_player_volume(State(db): State<Db>, Path(player_id): Path<String>) -> ApiResult {
    let home = db.read().await;
    home.player_volume.get(&player_id).map(volume_json).ok_or_else(Failure::gone)
}

async fn set_player_volume(
    State(db): State<Db>,
    Path(player_id): Path<String>,
    Json(input): Json<SetVolumeBody>,
) -> ApiResult {
    if input.volume.is_none() && input.muted.is_none() {
        return Err(Failure::invalid("ERROR_MISSING_PARAMETERS"));
    }
    let level = input.volume.map(absolute).transpose()?;
    let mut home = db.write().await;
    let volume = home.player_volume.get_mut(&player_id).ok_or_else(Failure::gone)?;
    if let Some(level) = level {
        volume.volume = level;
    }
    if let Some(muted) = input.muted {
        volume.muted = muted;
    }
    Ok(Json(json!({})))
}

async fn set_player_relative_volume(
    State(db): State<Db>,
    Path(player_id): Path<String>,
    Json(input): Json<RelativeVolumeBody>,
) -> ApiResult {
    let mut home = db.write().await;
    let volume = home.player_volume.get_mut(&player_id).ok_or_else(Failure::gone)?;
    volume.volume = shifted(volume.volume, input.volume_delta)?;
    Ok(Json(json!({})))
}

async fn set_player_mute(
    State(db): State<Db>,
    Path(player_id): Path<String>,
    Json(input): Json<MuteBody>,
) -> ApiResult {
    let mut home = db.write().await;
    let volume = home.player_volume.get_mut(&player_id).ok_or_else(Failure::gone)?;
    volume.muted = input.muted;
    Ok(Json(json!({})))
}

// --- playback ---

async fn get_playback(State(db): State<Db>, Path(group_id): Path<String>) -> ApiResult {
    let home = db.read().await;
    let group = home.groups.get(&group_id).ok_or_else(Failure::gone)?;
    Ok(Json(json!({
        "playbackState": group.playback_state,
        "positionMillis": 0,
    })))
}

async fn transition(db: &Db, group_id: &str, next: impl FnOnce(&str) -> &'static str) -> ApiResult {
    let mut home = db.write().await;
    let group = home.groups.get_mut(group_id).ok_or_else(Failure::gone)?;
    group.playback_state = next(group.playback_state.as_str()).to_string();
    debug!(group_id, state = %group.playback_state, "playback state changed");
    Ok(Json(json!({})))
}

async fn play(State(db): State<Db>, Path(group_id): Path<String>) -> ApiResult {
    transition(&db, &group_id, |_| PLAYBACK_PLAYING).await
}

async fn pause(State(db): State<Db>, Path(group_id): Path<String>) -> ApiResult {
    transition(&db, &group_id, |_| PLAYBACK_PAUSED).await
}

async fn toggle_play_pause(State(db): State<Db>, Path(group_id): Path<String>) -> ApiResult {
    transition(&db, &group_id, |state| {
        if state == PLAYBACK_PLAYING {
            PLAYBACK_PAUSED
        } else {
            PLAYBACK_PLAYING
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_home_groups_both_players() {
        let home = Home::seeded();
        assert_eq!(home.groups.len(), 1);
        assert_eq!(home.groups[GROUP_ID].player_ids, vec!["P1", "P2"]);
        assert_eq!(home.groups[GROUP_ID].coordinator_id, "P1");
        assert!(home.has_player("P2"));
        assert!(!home.has_player("P3"));
    }

    #[test]
    fn group_serializes_camel_case() {
        let json = serde_json::to_value(&Home::seeded().groups[GROUP_ID]).unwrap();
        assert_eq!(json["coordinatorId"], "P1");
        assert_eq!(json["playbackState"], PLAYBACK_IDLE);
        assert_eq!(json["playerIds"], json!(["P1", "P2"]));
    }

    #[test]
    fn token_response_uses_oauth_field_names() {
        let json = serde_json::to_value(TokenResponse {
            access_token: "a".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 1,
            refresh_token: "r".to_string(),
            scope: "s".to_string(),
        })
        .unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["refresh_token"], "r");
        assert_eq!(json["expires_in"], 1);
        assert!(json.get("accessToken").is_none());
    }

    #[test]
    fn absolute_volume_range() {
        assert_eq!(absolute(0).unwrap(), 0);
        assert_eq!(absolute(100).unwrap(), 100);
        assert_eq!(absolute(101).unwrap_err().status, StatusCode::BAD_REQUEST);
        assert_eq!(absolute(-1).unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn relative_volume_clamps() {
        assert_eq!(shifted(95, 10).unwrap(), 100);
        assert_eq!(shifted(5, -10).unwrap(), 0);
        assert_eq!(shifted(20, 5).unwrap(), 25);
        assert!(shifted(20, 101).is_err());
    }

    #[test]
    fn set_volume_body_fields_optional() {
        let input: SetVolumeBody = serde_json::from_str("{}").unwrap();
        assert!(input.volume.is_none() && input.muted.is_none());
        let input: RelativeVolumeBody = serde_json::from_str(r#"{"volumeDelta":-3}"#).unwrap();
        assert_eq!(input.volume_delta, -3);
    }
}
