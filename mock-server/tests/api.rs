use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ACCESS_TOKEN, AUTHORIZATION_CODE, CLIENT_KEYS, GROUP_ID, HOUSEHOLD_ID, REFRESH_TOKEN};
use serde_json::Value;
use tower::ServiceExt;

const CONTROL: &str = "/control/api/v1";
const TOKEN_PATH: &str = "/login/v3/oauth/access";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn token_request(authorization: &str, form: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(TOKEN_PATH)
        .header(http::header::AUTHORIZATION, authorization)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded;charset=utf-8")
        .body(form.to_string())
        .unwrap()
}

fn control(method: &str, path: &str, body: Option<&str>) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(format!("{CONTROL}{path}"))
        .header(http::header::AUTHORIZATION, format!("Bearer {ACCESS_TOKEN}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.unwrap_or_default().to_string())
        .unwrap()
}

// --- authorization ---

#[tokio::test]
async fn authorization_code_grant_issues_token() {
    let form = format!("grant_type=authorization_code&code={AUTHORIZATION_CODE}&redirect_uri=https%3A%2F%2Fexample.com%2Fcb");
    let resp = app()
        .oneshot(token_request(&format!("Basic {CLIENT_KEYS}"), &form))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let token: Value = body_json(resp).await;
    assert_eq!(token["access_token"], ACCESS_TOKEN);
    assert_eq!(token["refresh_token"], REFRESH_TOKEN);
    assert_eq!(token["token_type"], "Bearer");
    assert_eq!(token["expires_in"], 86_400);
}

#[tokio::test]
async fn refresh_grant_issues_token() {
    let form = format!("grant_type=refresh_token&refresh_token={REFRESH_TOKEN}");
    let resp = app()
        .oneshot(token_request(&format!("Basic {CLIENT_KEYS}"), &form))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_code_is_invalid_grant() {
    let form = "grant_type=authorization_code&code=nope&redirect_uri=x";
    let resp = app()
        .oneshot(token_request(&format!("Basic {CLIENT_KEYS}"), form))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "invalid_grant");
}

#[tokio::test]
async fn wrong_client_keys_are_rejected() {
    let form = format!("grant_type=refresh_token&refresh_token={REFRESH_TOKEN}");
    let resp = app().oneshot(token_request("Basic bm9wZTpub3Bl", &form)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "invalid_client");
}

#[tokio::test]
async fn unknown_grant_type() {
    let resp = app()
        .oneshot(token_request(&format!("Basic {CLIENT_KEYS}"), "grant_type=password"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "unsupported_grant_type");
}

// --- bearer guard ---

#[tokio::test]
async fn control_requires_bearer_token() {
    let req = Request::builder()
        .uri(format!("{CONTROL}/households"))
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errorCode"], "ERROR_NOT_AUTHORIZED");
}

#[tokio::test]
async fn stale_bearer_token_is_rejected() {
    let req = Request::builder()
        .uri(format!("{CONTROL}/households"))
        .header(http::header::AUTHORIZATION, "Bearer expired")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- households and groups ---

#[tokio::test]
async fn lists_the_household() {
    let resp = app().oneshot(control("GET", "/households", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["households"][0]["id"], HOUSEHOLD_ID);
}

#[tokio::test]
async fn lists_seeded_groups_and_players() {
    let resp = app()
        .oneshot(control("GET", &format!("/households/{HOUSEHOLD_ID}/groups"), None))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["groups"][0]["id"], GROUP_ID);
    assert_eq!(body["players"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_household_is_gone() {
    let resp = app()
        .oneshot(control("GET", "/households/HH9/groups", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::GONE);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errorCode"], "ERROR_RESOURCE_GONE");
}

#[tokio::test]
async fn create_group_moves_players() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(control(
            "POST",
            &format!("/households/{HOUSEHOLD_ID}/groups/createGroup"),
            Some(r#"{"playerIds":["P2"]}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    let new_id = body["group"]["id"].as_str().unwrap().to_string();
    assert!(new_id.starts_with("P2:"));
    assert_eq!(body["group"]["coordinatorId"], "P2");

    let resp = app
        .oneshot(control("GET", &format!("/households/{HOUSEHOLD_ID}/groups"), None))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    let original = groups.iter().find(|g| g["id"] == GROUP_ID).unwrap();
    assert_eq!(original["playerIds"], serde_json::json!(["P1"]));
}

#[tokio::test]
async fn create_group_with_unknown_player() {
    let resp = app()
        .oneshot(control(
            "POST",
            &format!("/households/{HOUSEHOLD_ID}/groups/createGroup"),
            Some(r#"{"playerIds":["P7"]}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errorCode"], "ERROR_INVALID_PARAMETER");
}

// --- volume ---

#[tokio::test]
async fn group_volume_set_then_get() {
    let app = app();
    let path = format!("/groups/{GROUP_ID}/groupVolume");
    let resp = app
        .clone()
        .oneshot(control("POST", &path, Some(r#"{"volume":42}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(control("GET", &path, None)).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["volume"], 42);
    assert_eq!(body["muted"], false);
}

#[tokio::test]
async fn group_volume_out_of_range() {
    let resp = app()
        .oneshot(control("POST", &format!("/groups/{GROUP_ID}/groupVolume"), Some(r#"{"volume":101}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn relative_volume_clamps_at_ceiling() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(control("POST", "/players/P1/playerVolume/relative", Some(r#"{"volumeDelta":100}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(control("GET", "/players/P1/playerVolume", None)).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["volume"], 100);
}

#[tokio::test]
async fn player_mute_and_partial_set() {
    let app = app();
    app.clone()
        .oneshot(control("POST", "/players/P2/playerVolume/mute", Some(r#"{"muted":true}"#)))
        .await
        .unwrap();
    app.clone()
        .oneshot(control("POST", "/players/P2/playerVolume", Some(r#"{"volume":7}"#)))
        .await
        .unwrap();

    let resp = app.oneshot(control("GET", "/players/P2/playerVolume", None)).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["volume"], 7);
    assert_eq!(body["muted"], true);
}

#[tokio::test]
async fn unknown_group_volume_is_gone() {
    let resp = app().oneshot(control("GET", "/groups/G9/groupVolume", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::GONE);
}

// --- playback ---

#[tokio::test]
async fn play_pause_and_toggle() {
    let app = app();
    let status = |app: axum::Router| async move {
        let resp = app
            .oneshot(control("GET", &format!("/groups/{GROUP_ID}/playback"), None))
            .await
            .unwrap();
        let body: Value = body_json(resp).await;
        body["playbackState"].as_str().unwrap().to_string()
    };

    assert_eq!(status(app.clone()).await, "PLAYBACK_STATE_IDLE");

    app.clone()
        .oneshot(control("POST", &format!("/groups/{GROUP_ID}/playback/play"), None))
        .await
        .unwrap();
    assert_eq!(status(app.clone()).await, "PLAYBACK_STATE_PLAYING");

    app.clone()
        .oneshot(control("POST", &format!("/groups/{GROUP_ID}/playback/togglePlayPause"), None))
        .await
        .unwrap();
    assert_eq!(status(app.clone()).await, "PLAYBACK_STATE_PAUSED");

    app.clone()
        .oneshot(control("POST", &format!("/groups/{GROUP_ID}/playback/pause"), None))
        .await
        .unwrap();
    assert_eq!(status(app).await, "PLAYBACK_STATE_PAUSED");
}
