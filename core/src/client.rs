//! Typed, stateless request builders for every catalogue endpoint.
//!
//! # Design
//! `SonosClient` holds only a `ClientConfig` and carries no mutable state
//! between calls. Each `build_*` method is a one-line mapping from typed
//! arguments onto an `EndpointSpec` from the catalogue; all validation and
//! header/URL assembly happens in `EndpointRequest::build`. Executing the
//! descriptor is the `Dispatcher`'s job.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::ClientConfig;
use crate::descriptor::Descriptor;
use crate::endpoint::{EndpointRequest, EndpointSpec};
use crate::endpoints::*;
use crate::error::ApiError;
use crate::types::{
    CreateGroup, CreateSession, HomeTheaterOptions, JoinSession, LoadAudioClip, LoadCloudQueue,
    LoadFavorite, LoadLineIn, LoadPlaylist, LoadStreamUrl, MatchAccount, PlayModes, PlayerSettings,
    SetPlayerVolume, SkipToItem, TvPowerState,
};

/// Base64 of `client_id:client_secret`, as the token endpoints expect.
pub fn encode_client_keys(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{client_secret}"))
}

/// Stateless builder of `Descriptor` values for the Sonos APIs.
#[derive(Debug, Clone, Default)]
pub struct SonosClient {
    config: ClientConfig,
}

impl SonosClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn household(spec: &EndpointSpec, token: &str, household_id: &str) -> EndpointRequest {
        spec.request().credential(token).path("householdId", household_id)
    }

    fn group(spec: &EndpointSpec, token: &str, group_id: &str) -> EndpointRequest {
        spec.request().credential(token).path("groupId", group_id)
    }

    fn session(spec: &EndpointSpec, token: &str, session_id: &str) -> EndpointRequest {
        spec.request().credential(token).path("sessionId", session_id)
    }

    fn player(spec: &EndpointSpec, token: &str, player_id: &str) -> EndpointRequest {
        spec.request().credential(token).path("playerId", player_id)
    }

    // Authorization

    /// Exchange an authorization code for an access token.
    pub fn build_create_token(
        &self,
        encoded_keys: &str,
        authorization_code: &str,
        redirect_uri: &str,
    ) -> Result<Descriptor, ApiError> {
        CREATE_TOKEN
            .request()
            .credential(encoded_keys)
            .param("grant_type", "authorization_code")
            .param("code", authorization_code)
            .param("redirect_uri", redirect_uri)
            .build(&self.config)
    }

    pub fn build_refresh_token(&self, encoded_keys: &str, refresh_token: &str) -> Result<Descriptor, ApiError> {
        REFRESH_TOKEN
            .request()
            .credential(encoded_keys)
            .param("grant_type", "refresh_token")
            .param("refresh_token", refresh_token)
            .build(&self.config)
    }

    // Households and groups

    pub fn build_get_households(&self, token: &str) -> Result<Descriptor, ApiError> {
        GET_HOUSEHOLDS.request().credential(token).build(&self.config)
    }

    pub fn build_get_groups(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&GET_GROUPS, token, household_id).build(&self.config)
    }

    pub fn build_create_group(
        &self,
        token: &str,
        household_id: &str,
        input: &CreateGroup,
    ) -> Result<Descriptor, ApiError> {
        Self::household(&CREATE_GROUP, token, household_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_modify_group_members(
        &self,
        token: &str,
        group_id: &str,
        player_ids_to_add: &[String],
        player_ids_to_remove: &[String],
    ) -> Result<Descriptor, ApiError> {
        Self::group(&MODIFY_GROUP_MEMBERS, token, group_id)
            .param("playerIdsToAdd", player_ids_to_add)
            .param("playerIdsToRemove", player_ids_to_remove)
            .build(&self.config)
    }

    pub fn build_set_group_members(
        &self,
        token: &str,
        household_id: &str,
        player_ids: &[String],
    ) -> Result<Descriptor, ApiError> {
        Self::household(&SET_GROUP_MEMBERS, token, household_id)
            .param("playerIds", player_ids)
            .build(&self.config)
    }

    pub fn build_subscribe_groups(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&SUBSCRIBE_GROUPS, token, household_id).build(&self.config)
    }

    pub fn build_unsubscribe_groups(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&UNSUBSCRIBE_GROUPS, token, household_id).build(&self.config)
    }

    // Group volume

    pub fn build_get_group_volume(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&GET_GROUP_VOLUME, token, group_id).build(&self.config)
    }

    pub fn build_set_group_volume(&self, token: &str, group_id: &str, volume: u8) -> Result<Descriptor, ApiError> {
        Self::group(&SET_GROUP_VOLUME, token, group_id)
            .param("volume", volume)
            .build(&self.config)
    }

    pub fn build_set_group_relative_volume(
        &self,
        token: &str,
        group_id: &str,
        volume_delta: i32,
    ) -> Result<Descriptor, ApiError> {
        Self::group(&SET_GROUP_RELATIVE_VOLUME, token, group_id)
            .param("volumeDelta", volume_delta)
            .build(&self.config)
    }

    pub fn build_set_group_mute(&self, token: &str, group_id: &str, muted: bool) -> Result<Descriptor, ApiError> {
        Self::group(&SET_GROUP_MUTE, token, group_id)
            .param("muted", muted)
            .build(&self.config)
    }

    pub fn build_subscribe_group_volume(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&SUBSCRIBE_GROUP_VOLUME, token, group_id).build(&self.config)
    }

    pub fn build_unsubscribe_group_volume(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&UNSUBSCRIBE_GROUP_VOLUME, token, group_id).build(&self.config)
    }

    // Playback

    pub fn build_get_playback_status(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&GET_PLAYBACK_STATUS, token, group_id).build(&self.config)
    }

    pub fn build_load_line_in(&self, token: &str, group_id: &str, input: &LoadLineIn) -> Result<Descriptor, ApiError> {
        Self::group(&LOAD_LINE_IN, token, group_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_play(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&PLAY, token, group_id).build(&self.config)
    }

    pub fn build_pause(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&PAUSE, token, group_id).build(&self.config)
    }

    pub fn build_toggle_play_pause(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&TOGGLE_PLAY_PAUSE, token, group_id).build(&self.config)
    }

    pub fn build_seek(
        &self,
        token: &str,
        group_id: &str,
        position_millis: u64,
        item_id: Option<&str>,
    ) -> Result<Descriptor, ApiError> {
        Self::group(&SEEK, token, group_id)
            .param("positionMillis", position_millis)
            .param("itemId", item_id)
            .build(&self.config)
    }

    pub fn build_seek_relative(
        &self,
        token: &str,
        group_id: &str,
        delta_millis: i64,
        item_id: Option<&str>,
    ) -> Result<Descriptor, ApiError> {
        Self::group(&SEEK_RELATIVE, token, group_id)
            .param("deltaMillis", delta_millis)
            .param("itemId", item_id)
            .build(&self.config)
    }

    pub fn build_set_play_modes(
        &self,
        token: &str,
        group_id: &str,
        play_modes: &PlayModes,
    ) -> Result<Descriptor, ApiError> {
        Self::group(&SET_PLAY_MODES, token, group_id)
            .param("playModes", play_modes)
            .build(&self.config)
    }

    pub fn build_skip_to_next_track(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&SKIP_TO_NEXT_TRACK, token, group_id).build(&self.config)
    }

    pub fn build_skip_to_previous_track(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&SKIP_TO_PREVIOUS_TRACK, token, group_id).build(&self.config)
    }

    pub fn build_subscribe_playback(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&SUBSCRIBE_PLAYBACK, token, group_id).build(&self.config)
    }

    pub fn build_unsubscribe_playback(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&UNSUBSCRIBE_PLAYBACK, token, group_id).build(&self.config)
    }

    // Playback metadata

    pub fn build_get_metadata_status(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&GET_METADATA_STATUS, token, group_id).build(&self.config)
    }

    pub fn build_subscribe_playback_metadata(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&SUBSCRIBE_PLAYBACK_METADATA, token, group_id).build(&self.config)
    }

    pub fn build_unsubscribe_playback_metadata(&self, token: &str, group_id: &str) -> Result<Descriptor, ApiError> {
        Self::group(&UNSUBSCRIBE_PLAYBACK_METADATA, token, group_id).build(&self.config)
    }

    // Playback sessions

    pub fn build_create_session(
        &self,
        token: &str,
        group_id: &str,
        input: &CreateSession,
    ) -> Result<Descriptor, ApiError> {
        Self::group(&CREATE_SESSION, token, group_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_join_session(&self, token: &str, group_id: &str, input: &JoinSession) -> Result<Descriptor, ApiError> {
        Self::group(&JOIN_SESSION, token, group_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_join_or_create_session(
        &self,
        token: &str,
        group_id: &str,
        input: &CreateSession,
    ) -> Result<Descriptor, ApiError> {
        Self::group(&JOIN_OR_CREATE_SESSION, token, group_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_leave_session(&self, token: &str, session_id: &str) -> Result<Descriptor, ApiError> {
        Self::session(&LEAVE_SESSION, token, session_id).build(&self.config)
    }

    pub fn build_load_cloud_queue(
        &self,
        token: &str,
        session_id: &str,
        input: &LoadCloudQueue,
    ) -> Result<Descriptor, ApiError> {
        Self::session(&LOAD_CLOUD_QUEUE, token, session_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_load_stream_url(
        &self,
        token: &str,
        session_id: &str,
        input: &LoadStreamUrl,
    ) -> Result<Descriptor, ApiError> {
        Self::session(&LOAD_STREAM_URL, token, session_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_refresh_cloud_queue(&self, token: &str, session_id: &str) -> Result<Descriptor, ApiError> {
        Self::session(&REFRESH_CLOUD_QUEUE, token, session_id).build(&self.config)
    }

    pub fn build_session_seek(
        &self,
        token: &str,
        session_id: &str,
        item_id: &str,
        position_millis: u64,
    ) -> Result<Descriptor, ApiError> {
        Self::session(&SESSION_SEEK, token, session_id)
            .param("itemId", item_id)
            .param("positionMillis", position_millis)
            .build(&self.config)
    }

    pub fn build_session_seek_relative(
        &self,
        token: &str,
        session_id: &str,
        item_id: &str,
        delta_millis: i64,
    ) -> Result<Descriptor, ApiError> {
        Self::session(&SESSION_SEEK_RELATIVE, token, session_id)
            .param("itemId", item_id)
            .param("deltaMillis", delta_millis)
            .build(&self.config)
    }

    pub fn build_skip_to_item(&self, token: &str, session_id: &str, input: &SkipToItem) -> Result<Descriptor, ApiError> {
        Self::session(&SKIP_TO_ITEM, token, session_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_suspend_session(
        &self,
        token: &str,
        session_id: &str,
        queue_version: Option<&str>,
    ) -> Result<Descriptor, ApiError> {
        Self::session(&SUSPEND_SESSION, token, session_id)
            .param("queueVersion", queue_version)
            .build(&self.config)
    }

    pub fn build_subscribe_session(&self, token: &str, session_id: &str) -> Result<Descriptor, ApiError> {
        Self::session(&SUBSCRIBE_SESSION, token, session_id).build(&self.config)
    }

    pub fn build_unsubscribe_session(&self, token: &str, session_id: &str) -> Result<Descriptor, ApiError> {
        Self::session(&UNSUBSCRIBE_SESSION, token, session_id).build(&self.config)
    }

    // Favorites and playlists

    pub fn build_get_favorites(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&GET_FAVORITES, token, household_id).build(&self.config)
    }

    pub fn build_load_favorite(&self, token: &str, group_id: &str, input: &LoadFavorite) -> Result<Descriptor, ApiError> {
        Self::group(&LOAD_FAVORITE, token, group_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_subscribe_favorites(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&SUBSCRIBE_FAVORITES, token, household_id).build(&self.config)
    }

    pub fn build_unsubscribe_favorites(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&UNSUBSCRIBE_FAVORITES, token, household_id).build(&self.config)
    }

    pub fn build_get_playlists(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&GET_PLAYLISTS, token, household_id).build(&self.config)
    }

    pub fn build_get_playlist(&self, token: &str, household_id: &str, playlist_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&GET_PLAYLIST, token, household_id)
            .param("playlistId", playlist_id)
            .build(&self.config)
    }

    pub fn build_load_playlist(&self, token: &str, group_id: &str, input: &LoadPlaylist) -> Result<Descriptor, ApiError> {
        Self::group(&LOAD_PLAYLIST, token, group_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_subscribe_playlists(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&SUBSCRIBE_PLAYLISTS, token, household_id).build(&self.config)
    }

    pub fn build_unsubscribe_playlists(&self, token: &str, household_id: &str) -> Result<Descriptor, ApiError> {
        Self::household(&UNSUBSCRIBE_PLAYLISTS, token, household_id).build(&self.config)
    }

    pub fn build_match_music_service_account(
        &self,
        token: &str,
        household_id: &str,
        input: &MatchAccount,
    ) -> Result<Descriptor, ApiError> {
        Self::household(&MATCH_MUSIC_SERVICE_ACCOUNT, token, household_id)
            .params(input)
            .build(&self.config)
    }

    // Players

    pub fn build_get_player_settings(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&GET_PLAYER_SETTINGS, token, player_id).build(&self.config)
    }

    pub fn build_set_player_settings(
        &self,
        token: &str,
        player_id: &str,
        input: &PlayerSettings,
    ) -> Result<Descriptor, ApiError> {
        Self::player(&SET_PLAYER_SETTINGS, token, player_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_get_player_volume(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&GET_PLAYER_VOLUME, token, player_id).build(&self.config)
    }

    pub fn build_set_player_volume(
        &self,
        token: &str,
        player_id: &str,
        input: &SetPlayerVolume,
    ) -> Result<Descriptor, ApiError> {
        Self::player(&SET_PLAYER_VOLUME, token, player_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_set_player_mute(&self, token: &str, player_id: &str, muted: bool) -> Result<Descriptor, ApiError> {
        Self::player(&SET_PLAYER_MUTE, token, player_id)
            .param("muted", muted)
            .build(&self.config)
    }

    pub fn build_set_player_relative_volume(
        &self,
        token: &str,
        player_id: &str,
        volume_delta: i32,
    ) -> Result<Descriptor, ApiError> {
        Self::player(&SET_PLAYER_RELATIVE_VOLUME, token, player_id)
            .param("volumeDelta", volume_delta)
            .build(&self.config)
    }

    pub fn build_subscribe_player_volume(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&SUBSCRIBE_PLAYER_VOLUME, token, player_id).build(&self.config)
    }

    pub fn build_unsubscribe_player_volume(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&UNSUBSCRIBE_PLAYER_VOLUME, token, player_id).build(&self.config)
    }

    pub fn build_load_audio_clip(
        &self,
        token: &str,
        player_id: &str,
        input: &LoadAudioClip,
    ) -> Result<Descriptor, ApiError> {
        Self::player(&LOAD_AUDIO_CLIP, token, player_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_cancel_audio_clip(&self, token: &str, player_id: &str, clip_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&CANCEL_AUDIO_CLIP, token, player_id)
            .path("clipId", clip_id)
            .build(&self.config)
    }

    pub fn build_subscribe_audio_clip(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&SUBSCRIBE_AUDIO_CLIP, token, player_id).build(&self.config)
    }

    pub fn build_unsubscribe_audio_clip(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&UNSUBSCRIBE_AUDIO_CLIP, token, player_id).build(&self.config)
    }

    pub fn build_get_home_theater_options(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&GET_HOME_THEATER_OPTIONS, token, player_id).build(&self.config)
    }

    pub fn build_set_home_theater_options(
        &self,
        token: &str,
        player_id: &str,
        input: &HomeTheaterOptions,
    ) -> Result<Descriptor, ApiError> {
        Self::player(&SET_HOME_THEATER_OPTIONS, token, player_id)
            .params(input)
            .build(&self.config)
    }

    pub fn build_load_home_theater_playback(&self, token: &str, player_id: &str) -> Result<Descriptor, ApiError> {
        Self::player(&LOAD_HOME_THEATER_PLAYBACK, token, player_id).build(&self.config)
    }

    pub fn build_set_tv_power_state(
        &self,
        token: &str,
        player_id: &str,
        state: TvPowerState,
    ) -> Result<Descriptor, ApiError> {
        Self::player(&SET_TV_POWER_STATE, token, player_id)
            .param("tvPowerState", state)
            .build(&self.config)
    }
}
