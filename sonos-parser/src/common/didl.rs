//! DIDL-Lite structures for media metadata
//!
//! Sonos answers `Browse` with a DIDL-Lite document holding either `item`s
//! (queue entries, tracks) or `container`s (Sonos playlists). Current-track
//! metadata from `GetPositionInfo` and `GetMediaInfo` is a single-item document.

use crate::common::xml_decode;
use crate::error::ParseResult;
use serde::{Deserialize, Serialize};

/// DIDL-Lite root structure.
///
/// ```xml
/// <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" ...>
///   <item id="Q:0/1" parentID="Q:0" restricted="true">
///     <res duration="0:03:58">x-sonos-spotify:spotify%3atrack%3a...</res>
///     <upnp:albumArtURI>/getaa?s=1&amp;u=...</upnp:albumArtURI>
///     <dc:title>Song Title</dc:title>
///     <dc:creator>Artist Name</dc:creator>
///     <upnp:album>Album Name</upnp:album>
///   </item>
/// </DIDL-Lite>
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename = "DIDL-Lite")]
pub struct DidlLite {
    /// Track-like entries
    #[serde(rename = "item", default)]
    pub items: Vec<DidlObject>,

    /// Container entries such as Sonos playlists
    #[serde(rename = "container", default)]
    pub containers: Vec<DidlObject>,
}

impl DidlLite {
    /// Parse DIDL-Lite XML content.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        xml_decode::parse(xml)
    }

    /// First item, the usual shape for current-track metadata.
    pub fn first_item(&self) -> Option<&DidlObject> {
        self.items.first()
    }
}

/// An `item` or `container` in a DIDL-Lite document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DidlObject {
    /// Object ID, e.g. `Q:0/3` or `SQ:12`
    #[serde(rename = "@id", default)]
    pub id: String,

    #[serde(rename = "@parentID", default)]
    pub parent_id: String,

    #[serde(rename = "@restricted", default)]
    pub restricted: Option<String>,

    /// Resource element with URI and duration
    #[serde(rename = "res", default)]
    pub res: Option<DidlResource>,

    /// Album art URI, often relative (`/getaa?...`) to the player base URL
    #[serde(rename = "albumArtURI", default)]
    pub album_art_uri: Option<String>,

    /// UPnP class, e.g. `object.item.audioItem.musicTrack`
    #[serde(rename = "class", default)]
    pub class: Option<String>,

    #[serde(rename = "title", default)]
    pub title: Option<String>,

    /// Track creator/artist
    #[serde(rename = "creator", default)]
    pub creator: Option<String>,

    #[serde(rename = "album", default)]
    pub album: Option<String>,

    /// Radio stream now-playing text
    #[serde(rename = "streamContent", default)]
    pub stream_content: Option<String>,

    /// Radio show metadata
    #[serde(rename = "radioShowMd", default)]
    pub radio_show: Option<String>,
}

impl DidlObject {
    /// The resource URI, empty when the object carries no `res`.
    pub fn uri(&self) -> &str {
        self.res
            .as_ref()
            .and_then(|res| res.uri.as_deref())
            .unwrap_or_default()
    }

    /// The resource duration (`H:MM:SS`), if present.
    pub fn duration(&self) -> Option<&str> {
        self.res.as_ref().and_then(|res| res.duration.as_deref())
    }
}

/// Resource element in DIDL-Lite containing media resource information.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct DidlResource {
    /// Duration in H:MM:SS format
    #[serde(rename = "@duration", default)]
    pub duration: Option<String>,

    #[serde(rename = "@protocolInfo", default)]
    pub protocol_info: Option<String>,

    /// The resource URI
    #[serde(rename = "$value", default)]
    pub uri: Option<String>,
}
