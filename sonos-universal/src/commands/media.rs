//! Queue, playlist and track helpers shared by the handlers

use crate::error::{Error, Result};
use crate::validation::hhmmss_to_msec;
use serde::Serialize;
use sonos_api::services::{av_transport, content_directory};
use sonos_api::SonosActions;
use sonos_parser::{DidlLite, DidlObject};
use tracing::debug;

/// Browse page size; players cap larger requests at this anyway
const PAGE_SIZE: u32 = 100;

const DIDL_HEADER: &str = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/">"#;

/// Spotify account region used for queueing Spotify content
pub const SPOTIFY_REGION: &str = "2311";

/// A queue entry or Sonos playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Absolute album art URL, when the player has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art_uri: Option<String>,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upnp_class: Option<String>,
}

impl MediaItem {
    fn from_didl(object: &DidlObject, base_url: &str) -> Self {
        Self {
            id: object.id.clone(),
            title: object.title.clone().unwrap_or_default(),
            artist: object.creator.clone(),
            album: object.album.clone(),
            art_uri: object
                .album_art_uri
                .as_deref()
                .map(|uri| absolute_art_uri(uri, base_url)),
            uri: object.uri().to_string(),
            duration: object.duration().map(str::to_string),
            upnp_class: object.class.clone(),
        }
    }
}

/// Prefix player-relative `/getaa` art URIs with the player's base URL.
pub fn absolute_art_uri(uri: &str, base_url: &str) -> String {
    if uri.starts_with("/getaa") {
        format!("{}{}", base_url, uri)
    } else {
        uri.to_string()
    }
}

/// All children of `object_id`, page by page.
fn browse_all(actions: &dyn SonosActions, base_url: &str, object_id: &str) -> Result<DidlLite> {
    let mut all = DidlLite::default();
    let mut start = 0u32;

    loop {
        let page = content_directory::browse(
            actions,
            base_url,
            object_id.to_string(),
            "BrowseDirectChildren".to_string(),
            "*".to_string(),
            start,
            PAGE_SIZE,
            String::new(),
        )?;
        if page.number_returned == 0 || page.result.is_empty() {
            break;
        }

        let didl = DidlLite::from_xml(&page.result).map_err(sonos_api::ApiError::from)?;
        all.items.extend(didl.items);
        all.containers.extend(didl.containers);

        start += page.number_returned;
        if start >= page.total_matches {
            break;
        }
    }

    debug!(object_id, items = all.items.len(), containers = all.containers.len(), "browsed");
    Ok(all)
}

/// The queue of the player at `base_url`, in queue order.
pub fn get_queue(actions: &dyn SonosActions, base_url: &str) -> Result<Vec<MediaItem>> {
    let didl = browse_all(actions, base_url, content_directory::QUEUE_OBJECT_ID)?;
    Ok(didl
        .items
        .iter()
        .map(|item| MediaItem::from_didl(item, base_url))
        .collect())
}

/// The household's Sonos playlists.
pub fn get_sonos_playlists(actions: &dyn SonosActions, base_url: &str) -> Result<Vec<MediaItem>> {
    let didl = browse_all(actions, base_url, content_directory::SONOS_PLAYLISTS_OBJECT_ID)?;
    Ok(didl
        .containers
        .iter()
        .map(|container| MediaItem::from_didl(container, base_url))
        .collect())
}

/// Fail with `queue is empty` unless the queue has entries; returns its length.
pub fn require_queue(actions: &dyn SonosActions, base_url: &str) -> Result<usize> {
    let length = get_queue(actions, base_url)?.len();
    if length == 0 {
        return Err(Error::InvalidState("queue is empty".to_string()));
    }
    Ok(length)
}

/// Playback state in lower case: `playing`, `paused`, `stopped`, ...
pub fn playback_state(actions: &dyn SonosActions, base_url: &str) -> Result<String> {
    let info = av_transport::get_transport_info(actions, base_url)?;
    let state = match info.current_transport_state.as_str() {
        "STOPPED" => "stopped".to_string(),
        "PLAYING" => "playing".to_string(),
        "PAUSED_PLAYBACK" => "paused".to_string(),
        "TRANSITIONING" => "transitioning".to_string(),
        "NO_MEDIA_PRESENT" => "no_media".to_string(),
        other => other.to_lowercase(),
    };
    Ok(state)
}

/// The current track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(rename = "albumArtURI", skip_serializing_if = "Option::is_none")]
    pub album_art_uri: Option<String>,
    /// Seconds into the track
    pub position: u64,
    /// Track length in seconds
    pub duration: u64,
    pub uri: String,
    pub queue_position: u32,
}

/// Title, artist and timing of what the player at `base_url` plays now.
pub fn current_track(actions: &dyn SonosActions, base_url: &str) -> Result<TrackData> {
    let position = av_transport::get_position_info(actions, base_url)?;

    let mut track = TrackData {
        position: hhmmss_to_msec(&position.rel_time) / 1000,
        duration: hhmmss_to_msec(&position.track_duration) / 1000,
        uri: position.track_uri.clone(),
        queue_position: position.track,
        ..TrackData::default()
    };

    let metadata = position.track_meta_data.trim();
    if metadata.is_empty() || metadata == "NOT_IMPLEMENTED" {
        return Ok(track);
    }
    match DidlLite::from_xml(metadata) {
        Ok(didl) => {
            if let Some(item) = didl.first_item() {
                // radio streams put "artist - title" into streamContent
                track.title = item
                    .stream_content
                    .clone()
                    .filter(|content| !content.is_empty())
                    .or_else(|| item.title.clone());
                track.artist = item.creator.clone();
                track.album = item.album.clone();
                track.album_art_uri = item.album_art_uri.clone();
            }
        }
        Err(e) => debug!("track metadata not readable: {}", e),
    }
    Ok(track)
}

/// TuneIn station id of a stream URI, `""` for anything else.
pub fn radio_id(uri: &str) -> String {
    if !(uri.starts_with("x-sonosapi-stream:") && uri.contains("sid=254")) {
        return String::new();
    }
    let rest = &uri["x-sonosapi-stream:".len()..];
    rest.split('?').next().unwrap_or_default().to_string()
}

/// Music service id (`sid=` query value) of a URI, `""` if there is none.
pub fn music_service_id(uri: &str) -> String {
    uri.split_once("sid=")
        .map(|(_, rest)| {
            rest.chars()
                .take_while(|ch| ch.is_ascii_digit())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Name of a music service id, `""` when unknown.
pub fn music_service_name(sid: &str) -> &'static str {
    match sid {
        "2" => "Deezer",
        "9" => "Spotify",
        "12" => "Napster",
        "160" => "SoundCloud",
        "174" => "TIDAL",
        "201" => "Amazon Music",
        "204" => "Apple Music",
        "254" => "TuneIn",
        "284" => "YouTube Music",
        "303" => "Sonos Radio",
        "333" => "TuneIn (New)",
        _ => "",
    }
}

/// `x-rincon-queue:{uuid}#0`, the transport URI that plays a coordinator's queue
pub fn queue_uri(coordinator_uuid: &str) -> String {
    format!("x-rincon-queue:{}#0", coordinator_uuid)
}

/// `x-rincon:{uuid}`, the transport URI that joins a coordinator's group
pub fn group_uri(coordinator_uuid: &str) -> String {
    format!("x-rincon:{}", coordinator_uuid)
}

pub fn play(actions: &dyn SonosActions, base_url: &str) -> Result<()> {
    Ok(av_transport::play(actions, base_url, "1".to_string())?)
}

/// Switch the coordinator to its queue.
pub fn select_queue(actions: &dyn SonosActions, base_url: &str, coordinator_uuid: &str) -> Result<()> {
    av_transport::set_av_transport_uri(actions, base_url, queue_uri(coordinator_uuid), String::new())?;
    Ok(())
}

/// Jump to track `position` (1 based) of the active queue.
pub fn select_track(actions: &dyn SonosActions, base_url: &str, position: u32) -> Result<()> {
    av_transport::seek(actions, base_url, "TRACK_NR".to_string(), position.to_string())?;
    Ok(())
}

/// Append `uri` to the end of the queue.
pub fn queue(actions: &dyn SonosActions, base_url: &str, uri: &str, metadata: &str) -> Result<()> {
    let added = av_transport::add_uri_to_queue(
        actions,
        base_url,
        uri.to_string(),
        metadata.to_string(),
        0,
        false,
    )?;
    debug!(uri, added = added.num_tracks_added, length = added.new_queue_length, "queued");
    Ok(())
}

/// Start a TuneIn station.
pub fn play_tunein(actions: &dyn SonosActions, base_url: &str, radio_id: &str) -> Result<()> {
    let uri = format!("x-sonosapi-stream:{}?sid=254&flags=8224&sn=0", radio_id);
    let metadata = format!(
        r#"{}<item id="F00092020{}" parentID="L" restricted="true"><dc:title>tunein</dc:title><upnp:class>object.item.audioItem.audioBroadcast</upnp:class><desc id="cdudn" nameSpace="urn:schemas-rinconnetworks-com:metadata-1-0/">SA_RINCON65031_</desc></item></DIDL-Lite>"#,
        DIDL_HEADER, radio_id
    );
    av_transport::set_av_transport_uri(actions, base_url, uri, metadata)?;
    play(actions, base_url)
}

/// Queue URI and metadata of a Spotify URI.
///
/// Accepts tracks, albums, artist top tracks and Spotify-owned playlists.
pub fn spotify_queue_item(spotify_uri: &str) -> Result<(String, String)> {
    let encoded = spotify_uri.replace(':', "%3a");

    let (item_id, uri, class) = if spotify_uri.starts_with("spotify:track:") {
        (
            format!("00032020{}", encoded),
            format!("x-sonos-spotify:{}?sid=9&flags=8224&sn=7", encoded),
            "object.item.audioItem.musicTrack",
        )
    } else {
        let (prefix, class) = if spotify_uri.starts_with("spotify:album:") {
            ("1004206c", "object.container.album.musicAlbum")
        } else if spotify_uri.starts_with("spotify:artistTopTracks:") {
            ("100e206c", "object.container.playlistContainer")
        } else if spotify_uri.starts_with("spotify:user:spotify:playlist:") {
            ("10062a6c", "object.container.playlistContainer")
        } else {
            return Err(Error::InvalidInput(
                "not supported type of spotify uri".to_string(),
            ));
        };
        let item_id = format!("{}{}", prefix, encoded);
        (item_id.clone(), format!("x-rincon-cpcontainer:{}", item_id), class)
    };

    let metadata = format!(
        r#"{}<item id="{}" restricted="true"><dc:title></dc:title><upnp:class>{}</upnp:class><desc id="cdudn" nameSpace="urn:schemas-rinconnetworks-com:metadata-1-0/">SA_RINCON{}_X_#Svc{}-0-Token</desc></item></DIDL-Lite>"#,
        DIDL_HEADER, item_id, class, SPOTIFY_REGION, SPOTIFY_REGION
    );
    Ok((uri, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("x-sonosapi-stream:s24896?sid=254&flags=8224&sn=0", "s24896")]
    #[case("x-sonosapi-stream:s24896?sid=303&flags=8224", "")]
    #[case("x-rincon-queue:RINCON_B#0", "")]
    fn test_radio_id(#[case] uri: &str, #[case] expected: &str) {
        assert_eq!(radio_id(uri), expected);
    }

    #[rstest]
    #[case("x-sonos-spotify:spotify%3atrack%3a4?sid=9&flags=8224&sn=7", "9", "Spotify")]
    #[case("x-sonosapi-stream:s24896?sid=254&flags=8224", "254", "TuneIn")]
    #[case("x-rincon-mp3radio://radio.example/stream", "", "")]
    fn test_music_service(#[case] uri: &str, #[case] sid: &str, #[case] name: &str) {
        assert_eq!(music_service_id(uri), sid);
        assert_eq!(music_service_name(sid), name);
    }

    #[test]
    fn test_spotify_track() {
        let (uri, metadata) = spotify_queue_item("spotify:track:5AdoS3gS47x40nBNlNmPQ8").unwrap();
        assert_eq!(
            uri,
            "x-sonos-spotify:spotify%3atrack%3a5AdoS3gS47x40nBNlNmPQ8?sid=9&flags=8224&sn=7"
        );
        assert!(metadata.contains("SA_RINCON2311_X_#Svc2311-0-Token"));
        assert!(metadata.contains("object.item.audioItem.musicTrack"));
    }

    #[rstest]
    #[case("spotify:album:1TIUsv8qmYLpBEhvmBmyBk", "x-rincon-cpcontainer:1004206cspotify%3aalbum%3a1TIUsv8qmYLpBEhvmBmyBk")]
    #[case("spotify:artistTopTracks:1dfeR4HaWDbWqFHLkxsg1d", "x-rincon-cpcontainer:100e206cspotify%3aartistTopTracks%3a1dfeR4HaWDbWqFHLkxsg1d")]
    #[case("spotify:user:spotify:playlist:37i9dQZF1DXcBWIGoYBM5M", "x-rincon-cpcontainer:10062a6cspotify%3auser%3aspotify%3aplaylist%3a37i9dQZF1DXcBWIGoYBM5M")]
    fn test_spotify_containers(#[case] spotify_uri: &str, #[case] expected: &str) {
        assert_eq!(spotify_queue_item(spotify_uri).unwrap().0, expected);
    }

    #[test]
    fn test_spotify_unsupported() {
        let err = spotify_queue_item("spotify:show:123").unwrap_err();
        assert_eq!(err.own_message(), Some("not supported type of spotify uri"));
    }

    #[test]
    fn test_art_uri() {
        assert_eq!(
            absolute_art_uri("/getaa?s=1&u=x", "http://10.0.0.3:1400"),
            "http://10.0.0.3:1400/getaa?s=1&u=x"
        );
        assert_eq!(absolute_art_uri("https://img/x.jpg", "http://10.0.0.3:1400"), "https://img/x.jpg");
    }
}
