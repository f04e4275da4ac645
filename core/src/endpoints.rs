//! The endpoint catalogue: every supported vendor operation as plain data.
//!
//! Paths are relative to `ClientConfig::control_base_url` (control API) or
//! `ClientConfig::auth_base_url` (token endpoints). Parameter names are the
//! vendor's wire names.

use crate::endpoint::{EndpointSpec, Param};
use crate::http::HttpMethod::{Delete, Get, Post};

const fn req(name: &'static str) -> Param {
    Param::required(name)
}

const fn opt(name: &'static str) -> Param {
    Param::optional(name)
}

// Authorization

pub const CREATE_TOKEN: EndpointSpec = EndpointSpec::authorization(
    "auth.create_token",
    "/oauth/access",
    &[req("grant_type"), req("code"), req("redirect_uri")],
);
pub const REFRESH_TOKEN: EndpointSpec = EndpointSpec::authorization(
    "auth.refresh_token",
    "/oauth/access",
    &[req("grant_type"), req("refresh_token")],
);

// Households and groups

pub const GET_HOUSEHOLDS: EndpointSpec = EndpointSpec::control("households.get", Get, "/households", None);
pub const GET_GROUPS: EndpointSpec =
    EndpointSpec::control("groups.get", Get, "/households/{householdId}/groups", None);
pub const CREATE_GROUP: EndpointSpec = EndpointSpec::control(
    "groups.create",
    Post,
    "/households/{householdId}/groups/createGroup",
    Some(&[req("playerIds"), opt("musicContextGroupId")]),
);
pub const MODIFY_GROUP_MEMBERS: EndpointSpec = EndpointSpec::control(
    "groups.modify_members",
    Post,
    "/groups/{groupId}/groups/modifyGroupMembers",
    Some(&[req("playerIdsToAdd"), req("playerIdsToRemove")]),
);
pub const SET_GROUP_MEMBERS: EndpointSpec = EndpointSpec::control(
    "groups.set_members",
    Post,
    "/households/{householdId}/groups/setGroupMembers",
    Some(&[req("playerIds")]),
);
pub const SUBSCRIBE_GROUPS: EndpointSpec =
    EndpointSpec::control("groups.subscribe", Post, "/households/{householdId}/groups/subscription", None);
pub const UNSUBSCRIBE_GROUPS: EndpointSpec =
    EndpointSpec::control("groups.unsubscribe", Delete, "/households/{householdId}/groups/subscription", None);

// Group volume

pub const GET_GROUP_VOLUME: EndpointSpec =
    EndpointSpec::control("group_volume.get", Get, "/groups/{groupId}/groupVolume", None);
pub const SET_GROUP_VOLUME: EndpointSpec =
    EndpointSpec::control("group_volume.set", Post, "/groups/{groupId}/groupVolume", Some(&[req("volume")]));
pub const SET_GROUP_RELATIVE_VOLUME: EndpointSpec = EndpointSpec::control(
    "group_volume.set_relative",
    Post,
    "/groups/{groupId}/groupVolume/relative",
    Some(&[req("volumeDelta")]),
);
pub const SET_GROUP_MUTE: EndpointSpec = EndpointSpec::control(
    "group_volume.set_mute",
    Post,
    "/groups/{groupId}/groupVolume/mute",
    Some(&[req("muted")]),
);
pub const SUBSCRIBE_GROUP_VOLUME: EndpointSpec =
    EndpointSpec::control("group_volume.subscribe", Post, "/groups/{groupId}/groupVolume/subscription", None);
pub const UNSUBSCRIBE_GROUP_VOLUME: EndpointSpec =
    EndpointSpec::control("group_volume.unsubscribe", Delete, "/groups/{groupId}/groupVolume/subscription", None);

// Playback

pub const GET_PLAYBACK_STATUS: EndpointSpec =
    EndpointSpec::control("playback.get_status", Get, "/groups/{groupId}/playback", None);
pub const LOAD_LINE_IN: EndpointSpec = EndpointSpec::control(
    "playback.load_line_in",
    Post,
    "/groups/{groupId}/playback/lineIn",
    Some(&[opt("deviceId"), opt("playOnCompletion")]),
);
pub const PLAY: EndpointSpec = EndpointSpec::control("playback.play", Post, "/groups/{groupId}/playback/play", None);
pub const PAUSE: EndpointSpec = EndpointSpec::control("playback.pause", Post, "/groups/{groupId}/playback/pause", None);
pub const TOGGLE_PLAY_PAUSE: EndpointSpec = EndpointSpec::control(
    "playback.toggle_play_pause",
    Post,
    "/groups/{groupId}/playback/togglePlayPause",
    None,
);
pub const SEEK: EndpointSpec = EndpointSpec::control(
    "playback.seek",
    Post,
    "/groups/{groupId}/playback/seek",
    Some(&[req("positionMillis"), opt("itemId")]),
);
pub const SEEK_RELATIVE: EndpointSpec = EndpointSpec::control(
    "playback.seek_relative",
    Post,
    "/groups/{groupId}/playback/seekRelative",
    Some(&[req("deltaMillis"), opt("itemId")]),
);
pub const SET_PLAY_MODES: EndpointSpec = EndpointSpec::control(
    "playback.set_play_modes",
    Post,
    "/groups/{groupId}/playback/playMode",
    Some(&[req("playModes")]),
);
pub const SKIP_TO_NEXT_TRACK: EndpointSpec = EndpointSpec::control(
    "playback.skip_to_next_track",
    Post,
    "/groups/{groupId}/playback/skipToNextTrack",
    None,
);
pub const SKIP_TO_PREVIOUS_TRACK: EndpointSpec = EndpointSpec::control(
    "playback.skip_to_previous_track",
    Post,
    "/groups/{groupId}/playback/skipToPreviousTrack",
    None,
);
pub const SUBSCRIBE_PLAYBACK: EndpointSpec =
    EndpointSpec::control("playback.subscribe", Post, "/groups/{groupId}/playback/subscription", None);
pub const UNSUBSCRIBE_PLAYBACK: EndpointSpec =
    EndpointSpec::control("playback.unsubscribe", Delete, "/groups/{groupId}/playback/subscription", None);

// Playback metadata

pub const GET_METADATA_STATUS: EndpointSpec =
    EndpointSpec::control("playback_metadata.get", Get, "/groups/{groupId}/playbackMetadata", None);
pub const SUBSCRIBE_PLAYBACK_METADATA: EndpointSpec = EndpointSpec::control(
    "playback_metadata.subscribe",
    Post,
    "/groups/{groupId}/playbackMetadata/subscription",
    None,
);
pub const UNSUBSCRIBE_PLAYBACK_METADATA: EndpointSpec = EndpointSpec::control(
    "playback_metadata.unsubscribe",
    Delete,
    "/groups/{groupId}/playbackMetadata/subscription",
    None,
);

// Playback sessions

pub const CREATE_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.create",
    Post,
    "/groups/{groupId}/playbackSession/create",
    Some(&[req("appId"), req("appContext"), opt("accountId"), opt("customData")]),
);
pub const JOIN_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.join",
    Post,
    "/groups/{groupId}/playbackSession/join",
    Some(&[req("appId"), req("appContext")]),
);
pub const JOIN_OR_CREATE_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.join_or_create",
    Post,
    "/groups/{groupId}/playbackSession/joinOrCreate",
    Some(&[req("appId"), req("appContext"), opt("accountId"), opt("customData")]),
);
pub const LEAVE_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.leave",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/leave",
    None,
);
pub const LOAD_CLOUD_QUEUE: EndpointSpec = EndpointSpec::control(
    "playback_session.load_cloud_queue",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/loadCloudQueue",
    Some(&[
        req("queueBaseUrl"),
        opt("httpAuthorization"),
        opt("itemId"),
        opt("playOnCompletion"),
        opt("positionMillis"),
        opt("queueVersion"),
        opt("trackMetadata"),
        opt("useHttpAuthorizationForMedia"),
    ]),
);
pub const LOAD_STREAM_URL: EndpointSpec = EndpointSpec::control(
    "playback_session.load_stream_url",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/loadStreamUrl",
    Some(&[req("streamUrl"), opt("itemId"), opt("playOnCompletion"), opt("stationMetadata")]),
);
pub const REFRESH_CLOUD_QUEUE: EndpointSpec = EndpointSpec::control(
    "playback_session.refresh_cloud_queue",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/refreshCloudQueue",
    None,
);
pub const SESSION_SEEK: EndpointSpec = EndpointSpec::control(
    "playback_session.seek",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/seek",
    Some(&[req("itemId"), req("positionMillis")]),
);
pub const SESSION_SEEK_RELATIVE: EndpointSpec = EndpointSpec::control(
    "playback_session.seek_relative",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/seekRelative",
    Some(&[req("itemId"), req("deltaMillis")]),
);
pub const SKIP_TO_ITEM: EndpointSpec = EndpointSpec::control(
    "playback_session.skip_to_item",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/skipToItem",
    Some(&[
        req("itemId"),
        opt("playOnCompletion"),
        opt("positionMillis"),
        opt("queueVersion"),
        opt("trackMetadata"),
    ]),
);
pub const SUSPEND_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.suspend",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/suspend",
    Some(&[opt("queueVersion")]),
);
pub const SUBSCRIBE_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.subscribe",
    Post,
    "/playbackSessions/{sessionId}/playbackSession/subscription",
    None,
);
pub const UNSUBSCRIBE_SESSION: EndpointSpec = EndpointSpec::control(
    "playback_session.unsubscribe",
    Delete,
    "/playbackSessions/{sessionId}/playbackSession/subscription",
    None,
);

// Favorites

pub const GET_FAVORITES: EndpointSpec =
    EndpointSpec::control("favorites.get", Get, "/households/{householdId}/favorites", None);
pub const LOAD_FAVORITE: EndpointSpec = EndpointSpec::control(
    "favorites.load",
    Post,
    "/groups/{groupId}/favorites",
    Some(&[req("favoriteId"), opt("action"), opt("playOnCompletion"), opt("playModes")]),
);
pub const SUBSCRIBE_FAVORITES: EndpointSpec = EndpointSpec::control(
    "favorites.subscribe",
    Post,
    "/households/{householdId}/favorites/subscription",
    None,
);
pub const UNSUBSCRIBE_FAVORITES: EndpointSpec = EndpointSpec::control(
    "favorites.unsubscribe",
    Delete,
    "/households/{householdId}/favorites/subscription",
    None,
);

// Playlists

pub const GET_PLAYLISTS: EndpointSpec =
    EndpointSpec::control("playlists.get", Get, "/households/{householdId}/playlists", None);
pub const GET_PLAYLIST: EndpointSpec = EndpointSpec::control(
    "playlists.get_playlist",
    Post,
    "/households/{householdId}/playlists/getPlaylist",
    Some(&[req("playlistId")]),
);
pub const LOAD_PLAYLIST: EndpointSpec = EndpointSpec::control(
    "playlists.load",
    Post,
    "/groups/{groupId}/playlists",
    Some(&[req("playlistId"), opt("action"), opt("playOnCompletion"), opt("playModes")]),
);
pub const SUBSCRIBE_PLAYLISTS: EndpointSpec = EndpointSpec::control(
    "playlists.subscribe",
    Post,
    "/households/{householdId}/playlists/subscription",
    None,
);
pub const UNSUBSCRIBE_PLAYLISTS: EndpointSpec = EndpointSpec::control(
    "playlists.unsubscribe",
    Delete,
    "/households/{householdId}/playlists/subscription",
    None,
);

// Music service accounts

pub const MATCH_MUSIC_SERVICE_ACCOUNT: EndpointSpec = EndpointSpec::control(
    "music_service_accounts.match",
    Post,
    "/households/{householdId}/musicServiceAccounts/match",
    Some(&[
        req("userIdHashCode"),
        req("nickname"),
        req("serviceId"),
        opt("linkCode"),
        opt("linkDeviceId"),
    ]),
);

// Player settings

pub const GET_PLAYER_SETTINGS: EndpointSpec =
    EndpointSpec::control("player_settings.get", Get, "/players/{playerId}/settings/player", None);
pub const SET_PLAYER_SETTINGS: EndpointSpec = EndpointSpec::control(
    "player_settings.set",
    Post,
    "/players/{playerId}/settings/player",
    Some(&[opt("volumeMode"), opt("volumeScalingFactor"), opt("monoMode"), opt("wifiDisable")]),
);

// Player volume

pub const GET_PLAYER_VOLUME: EndpointSpec =
    EndpointSpec::control("player_volume.get", Get, "/players/{playerId}/playerVolume", None);
pub const SET_PLAYER_VOLUME: EndpointSpec = EndpointSpec::control(
    "player_volume.set",
    Post,
    "/players/{playerId}/playerVolume",
    Some(&[opt("volume"), opt("muted")]),
);
// Mute has its own resource; posting `muted` to `/playerVolume` is not used.
pub const SET_PLAYER_MUTE: EndpointSpec = EndpointSpec::control(
    "player_volume.set_mute",
    Post,
    "/players/{playerId}/playerVolume/mute",
    Some(&[req("muted")]),
);
pub const SET_PLAYER_RELATIVE_VOLUME: EndpointSpec = EndpointSpec::control(
    "player_volume.set_relative",
    Post,
    "/players/{playerId}/playerVolume/relative",
    Some(&[req("volumeDelta")]),
);
pub const SUBSCRIBE_PLAYER_VOLUME: EndpointSpec = EndpointSpec::control(
    "player_volume.subscribe",
    Post,
    "/players/{playerId}/playerVolume/subscription",
    None,
);
pub const UNSUBSCRIBE_PLAYER_VOLUME: EndpointSpec = EndpointSpec::control(
    "player_volume.unsubscribe",
    Delete,
    "/players/{playerId}/playerVolume/subscription",
    None,
);

// Audio clips

pub const LOAD_AUDIO_CLIP: EndpointSpec = EndpointSpec::control(
    "audio_clip.load",
    Post,
    "/players/{playerId}/audioClip",
    Some(&[
        req("appId"),
        req("name"),
        opt("clipType"),
        opt("httpAuthorization"),
        opt("priority"),
        opt("streamUrl"),
        opt("volume"),
    ]),
);
pub const CANCEL_AUDIO_CLIP: EndpointSpec =
    EndpointSpec::control("audio_clip.cancel", Delete, "/players/{playerId}/audioClip/{clipId}", None);
pub const SUBSCRIBE_AUDIO_CLIP: EndpointSpec =
    EndpointSpec::control("audio_clip.subscribe", Post, "/players/{playerId}/audioClip/subscription", None);
pub const UNSUBSCRIBE_AUDIO_CLIP: EndpointSpec =
    EndpointSpec::control("audio_clip.unsubscribe", Delete, "/players/{playerId}/audioClip/subscription", None);

// Home theater

pub const GET_HOME_THEATER_OPTIONS: EndpointSpec =
    EndpointSpec::control("home_theater.get_options", Get, "/players/{playerId}/homeTheater/options", None);
pub const SET_HOME_THEATER_OPTIONS: EndpointSpec = EndpointSpec::control(
    "home_theater.set_options",
    Post,
    "/players/{playerId}/homeTheater/options",
    Some(&[opt("nightMode"), opt("enhanceDialog")]),
);
pub const LOAD_HOME_THEATER_PLAYBACK: EndpointSpec =
    EndpointSpec::control("home_theater.load_playback", Post, "/players/{playerId}/homeTheater", None);
pub const SET_TV_POWER_STATE: EndpointSpec = EndpointSpec::control(
    "home_theater.set_tv_power_state",
    Post,
    "/players/{playerId}/homeTheater/tvPowerState",
    Some(&[req("tvPowerState")]),
);

/// Every endpoint in the catalogue.
pub const ALL: &[EndpointSpec] = &[
    CREATE_TOKEN,
    REFRESH_TOKEN,
    GET_HOUSEHOLDS,
    GET_GROUPS,
    CREATE_GROUP,
    MODIFY_GROUP_MEMBERS,
    SET_GROUP_MEMBERS,
    SUBSCRIBE_GROUPS,
    UNSUBSCRIBE_GROUPS,
    GET_GROUP_VOLUME,
    SET_GROUP_VOLUME,
    SET_GROUP_RELATIVE_VOLUME,
    SET_GROUP_MUTE,
    SUBSCRIBE_GROUP_VOLUME,
    UNSUBSCRIBE_GROUP_VOLUME,
    GET_PLAYBACK_STATUS,
    LOAD_LINE_IN,
    PLAY,
    PAUSE,
    TOGGLE_PLAY_PAUSE,
    SEEK,
    SEEK_RELATIVE,
    SET_PLAY_MODES,
    SKIP_TO_NEXT_TRACK,
    SKIP_TO_PREVIOUS_TRACK,
    SUBSCRIBE_PLAYBACK,
    UNSUBSCRIBE_PLAYBACK,
    GET_METADATA_STATUS,
    SUBSCRIBE_PLAYBACK_METADATA,
    UNSUBSCRIBE_PLAYBACK_METADATA,
    CREATE_SESSION,
    JOIN_SESSION,
    JOIN_OR_CREATE_SESSION,
    LEAVE_SESSION,
    LOAD_CLOUD_QUEUE,
    LOAD_STREAM_URL,
    REFRESH_CLOUD_QUEUE,
    SESSION_SEEK,
    SESSION_SEEK_RELATIVE,
    SKIP_TO_ITEM,
    SUSPEND_SESSION,
    SUBSCRIBE_SESSION,
    UNSUBSCRIBE_SESSION,
    GET_FAVORITES,
    LOAD_FAVORITE,
    SUBSCRIBE_FAVORITES,
    UNSUBSCRIBE_FAVORITES,
    GET_PLAYLISTS,
    GET_PLAYLIST,
    LOAD_PLAYLIST,
    SUBSCRIBE_PLAYLISTS,
    UNSUBSCRIBE_PLAYLISTS,
    MATCH_MUSIC_SERVICE_ACCOUNT,
    GET_PLAYER_SETTINGS,
    SET_PLAYER_SETTINGS,
    GET_PLAYER_VOLUME,
    SET_PLAYER_VOLUME,
    SET_PLAYER_MUTE,
    SET_PLAYER_RELATIVE_VOLUME,
    SUBSCRIBE_PLAYER_VOLUME,
    UNSUBSCRIBE_PLAYER_VOLUME,
    LOAD_AUDIO_CLIP,
    CANCEL_AUDIO_CLIP,
    SUBSCRIBE_AUDIO_CLIP,
    UNSUBSCRIBE_AUDIO_CLIP,
    GET_HOME_THEATER_OPTIONS,
    SET_HOME_THEATER_OPTIONS,
    LOAD_HOME_THEATER_PLAYBACK,
    SET_TV_POWER_STATE,
];

/// Look an endpoint up by its catalogue name, e.g. `"playback.play"`.
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
    ALL.iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::endpoint::{Api, Auth};
    use crate::http::{BodyEncoding, HttpMethod};

    const PATH_PARAMETERS: &[&str] = &["householdId", "groupId", "playerId", "sessionId", "clipId"];

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = ALL.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn find_returns_catalogue_entry() {
        assert_eq!(find("playback.play"), Some(&PLAY));
        assert_eq!(find("auth.refresh_token"), Some(&REFRESH_TOKEN));
        assert!(find("playback.rewind").is_none());
    }

    #[test]
    fn placeholders_are_known_identifiers() {
        for spec in ALL {
            for name in spec.path_parameters() {
                assert!(PATH_PARAMETERS.contains(&name), "{}: {name}", spec.name);
            }
            let braces = spec.path.matches('{').count();
            assert_eq!(braces, spec.path_parameters().len(), "{}", spec.name);
        }
    }

    #[test]
    fn only_token_endpoints_use_basic_auth() {
        for spec in ALL {
            let is_token = spec.api == Api::Authorization;
            assert_eq!(spec.auth == Auth::Basic, is_token, "{}", spec.name);
            assert_eq!(spec.encoding == BodyEncoding::Form, is_token, "{}", spec.name);
        }
    }

    #[test]
    fn reads_and_deletes_carry_no_body() {
        for spec in ALL {
            if matches!(spec.method, HttpMethod::Get | HttpMethod::Delete) {
                assert!(spec.params.is_none(), "{}", spec.name);
            }
        }
    }

    #[test]
    fn subscriptions_come_in_pairs() {
        for spec in ALL.iter().filter(|s| s.path.ends_with("/subscription")) {
            let partner = ALL
                .iter()
                .find(|other| other.path == spec.path && other.method != spec.method);
            assert!(partner.is_some(), "{} has no partner", spec.name);
        }
    }
}
