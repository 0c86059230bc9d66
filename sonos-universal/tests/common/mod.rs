//! A recording player household for the integration suites
//!
//! `MockActions` answers every action with canned output arguments and
//! records what was sent. Clones share their recording, so a test keeps one
//! handle while the node owns another.

#![allow(dead_code)]

use sonos_api::{ActionResponse, ApiError, DeviceDescription, SonosActions};
use sonos_discovery::{Device, DiscoveryError};
use sonos_universal::discovery::PlayerScanner;
use sonos_universal::{PlayerAddress, UniversalConfig, UniversalNode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Kitchen coordinates Office and Bath; Living Room is a stereo pair whose
/// right speaker is hidden.
pub const HOUSEHOLD: &str = r#"<ZoneGroupState><ZoneGroups><ZoneGroup Coordinator="RINCON_B" ID="RINCON_B:7"><ZoneGroupMember UUID="RINCON_A" Location="http://10.0.0.2:1400/xml/device_description.xml" ZoneName="Office"/><ZoneGroupMember UUID="RINCON_B" Location="http://10.0.0.3:1400/xml/device_description.xml" ZoneName="Kitchen"/><ZoneGroupMember UUID="RINCON_C" Location="http://10.0.0.4:1400/xml/device_description.xml" ZoneName="Bath"/></ZoneGroup><ZoneGroup Coordinator="RINCON_L" ID="RINCON_L:2"><ZoneGroupMember UUID="RINCON_R" Location="http://10.0.0.6:1400/xml/device_description.xml" ZoneName="Living Room" Invisible="1" ChannelMapSet="RINCON_L:LF,LF;RINCON_R:RF,RF"/><ZoneGroupMember UUID="RINCON_L" Location="http://10.0.0.5:1400/xml/device_description.xml" ZoneName="Living Room" ChannelMapSet="RINCON_L:LF,LF;RINCON_R:RF,RF"/></ZoneGroup></ZoneGroups></ZoneGroupState>"#;

pub const OFFICE: &str = "http://10.0.0.2:1400";
pub const KITCHEN: &str = "http://10.0.0.3:1400";
pub const BATH: &str = "http://10.0.0.4:1400";
pub const LIVING_ROOM: &str = "http://10.0.0.5:1400";

/// One executed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub base_url: String,
    pub endpoint: String,
    pub action: String,
    pub args: Vec<(String, String)>,
}

impl Call {
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Reads never change a player
    pub fn is_write(&self) -> bool {
        !(self.action.starts_with("Get") || self.action == "Browse")
    }
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    responses: HashMap<String, Vec<(String, String)>>,
    faults: HashMap<String, u16>,
    queue_length: usize,
    playlists: Vec<(u32, String)>,
}

#[derive(Clone)]
pub struct MockActions {
    recorder: Arc<Mutex<Recorder>>,
    description: DeviceDescription,
}

impl MockActions {
    /// Kitchen playing its four-track queue at volume 20, unmuted.
    pub fn new() -> Self {
        let recorder = Recorder {
            queue_length: 4,
            playlists: vec![(3, "Morning".to_string()), (7, "Party".to_string())],
            ..Recorder::default()
        };
        Self {
            recorder: Arc::new(Mutex::new(recorder)),
            description: description("Sonos One", "00-0E-58-A0-12-34:5", "RINCON_B", "Kitchen", false),
        }
    }

    /// Replace the output arguments of `action`.
    pub fn respond(self, action: &str, outputs: &[(&str, &str)]) -> Self {
        self.recorder.lock().unwrap().responses.insert(
            action.to_string(),
            outputs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        );
        self
    }

    /// Answer `action` with a SOAP fault.
    pub fn fail(self, action: &str, code: u16) -> Self {
        self.recorder
            .lock()
            .unwrap()
            .faults
            .insert(action.to_string(), code);
        self
    }

    pub fn with_queue_length(self, length: usize) -> Self {
        self.recorder.lock().unwrap().queue_length = length;
        self
    }

    /// Replace the Sonos playlists with `(number, title)` pairs.
    pub fn with_playlists(self, playlists: &[(u32, &str)]) -> Self {
        self.recorder.lock().unwrap().playlists = playlists
            .iter()
            .map(|(number, title)| (*number, title.to_string()))
            .collect();
        self
    }

    pub fn with_description(mut self, description: DeviceDescription) -> Self {
        self.description = description;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    /// Names of the write actions in the order they were sent
    pub fn write_names(&self) -> Vec<String> {
        self.writes().into_iter().map(|call| call.action).collect()
    }

    pub fn calls_named(&self, action: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.action == action)
            .collect()
    }

    fn browse(recorder: &Recorder, object_id: &str) -> Vec<(String, String)> {
        let (count, body) = if object_id == "SQ:" {
            let body: String = recorder
                .playlists
                .iter()
                .map(|(id, title)| {
                    format!(r#"<container id="SQ:{id}" parentID="SQ:"><title>{title}</title></container>"#)
                })
                .collect();
            (recorder.playlists.len(), body)
        } else {
            let body: String = (1..=recorder.queue_length)
                .map(|n| {
                    format!(r#"<item id="Q:0/{n}" parentID="Q:0"><res duration="0:03:00">x-file-cifs://nas/{n}.mp3</res><title>Track {n}</title></item>"#)
                })
                .collect();
            (recorder.queue_length, body)
        };

        let result = if count == 0 {
            String::new()
        } else {
            format!("<DIDL-Lite>{}</DIDL-Lite>", body)
        };
        outputs(&[
            ("Result", &result),
            ("NumberReturned", &count.to_string()),
            ("TotalMatches", &count.to_string()),
            ("UpdateID", "1"),
        ])
    }
}

impl SonosActions for MockActions {
    fn execute_action(
        &self,
        base_url: &str,
        endpoint: &str,
        action: &str,
        args: &[(String, String)],
    ) -> sonos_api::Result<ActionResponse> {
        let mut recorder = self.recorder.lock().unwrap();
        recorder.calls.push(Call {
            base_url: base_url.to_string(),
            endpoint: endpoint.to_string(),
            action: action.to_string(),
            args: args.to_vec(),
        });

        if let Some(code) = recorder.faults.get(action) {
            return Err(ApiError::SoapFault(*code));
        }
        if let Some(outputs) = recorder.responses.get(action) {
            return Ok(ActionResponse::new(outputs.clone()));
        }
        if action == "Browse" {
            let object_id = args
                .iter()
                .find(|(key, _)| key == "ObjectID")
                .map(|(_, value)| value.as_str())
                .unwrap_or_default();
            return Ok(ActionResponse::new(Self::browse(&recorder, object_id)));
        }
        Ok(ActionResponse::new(default_outputs(action)))
    }

    fn device_description(&self, _base_url: &str) -> sonos_api::Result<DeviceDescription> {
        Ok(self.description.clone())
    }
}

fn outputs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn default_outputs(action: &str) -> Vec<(String, String)> {
    match action {
        "GetZoneGroupState" => outputs(&[("ZoneGroupState", HOUSEHOLD)]),
        "GetTransportInfo" => outputs(&[
            ("CurrentTransportState", "PLAYING"),
            ("CurrentTransportStatus", "OK"),
            ("CurrentSpeed", "1"),
        ]),
        "GetMediaInfo" => outputs(&[
            ("NrTracks", "4"),
            ("MediaDuration", "NOT_IMPLEMENTED"),
            ("CurrentURI", "x-rincon-queue:RINCON_B#0"),
            ("CurrentURIMetaData", ""),
        ]),
        "GetPositionInfo" => outputs(&[
            ("Track", "2"),
            ("TrackDuration", "0:03:00"),
            ("TrackMetaData", ""),
            ("TrackURI", "x-file-cifs://nas/2.mp3"),
            ("RelTime", "0:01:10"),
        ]),
        "GetTransportSettings" => outputs(&[("PlayMode", "NORMAL"), ("RecQualityMode", "NOT_IMPLEMENTED")]),
        "GetCurrentTransportActions" => outputs(&[("Actions", "Set, Stop, Pause, Play, Next, Previous")]),
        "GetCrossfadeMode" => outputs(&[("CrossfadeMode", "0")]),
        "GetRemainingSleepTimerDuration" => outputs(&[
            ("RemainingSleepTimerDuration", ""),
            ("CurrentSleepTimerGeneration", "0"),
        ]),
        "GetVolume" | "GetGroupVolume" => outputs(&[("CurrentVolume", "20")]),
        "SetRelativeGroupVolume" => outputs(&[("NewVolume", "30")]),
        "SetRelativeVolume" => outputs(&[("NewVolume", "25")]),
        "GetMute" | "GetGroupMute" => outputs(&[("CurrentMute", "0")]),
        "GetLoudness" => outputs(&[("CurrentLoudness", "1")]),
        "GetBass" => outputs(&[("CurrentBass", "2")]),
        "GetTreble" => outputs(&[("CurrentTreble", "-1")]),
        "GetLEDState" => outputs(&[("CurrentLEDState", "On")]),
        "GetEQ" => outputs(&[("CurrentValue", "1")]),
        "AddURIToQueue" => outputs(&[
            ("FirstTrackNumberEnqueued", "5"),
            ("NumTracksAdded", "1"),
            ("NewQueueLength", "5"),
        ]),
        "RemoveTrackRangeFromQueue" => outputs(&[("NewUpdateID", "2")]),
        "SaveQueue" => outputs(&[("AssignedObjectID", "SQ:9")]),
        _ => Vec::new(),
    }
}

/// A device description as the player would send it
pub fn description(
    model_name: &str,
    serial: &str,
    rincon: &str,
    room_name: &str,
    with_tv: bool,
) -> DeviceDescription {
    let mut services = vec![serde_json::json!({
        "serviceType": "urn:schemas-upnp-org:service:AlarmClock:1",
        "serviceId": "urn:upnp-org:serviceId:AlarmClock",
        "controlURL": "/AlarmClock/Control",
    })];
    if with_tv {
        services.push(serde_json::json!({
            "serviceType": "urn:schemas-upnp-org:service:HTControl:1",
            "serviceId": "urn:upnp-org:serviceId:HTControl",
            "controlURL": "/HTControl/Control",
        }));
    }

    serde_json::from_value(serde_json::json!({
        "deviceType": "urn:schemas-upnp-org:device:ZonePlayer:1",
        "friendlyName": format!("10.0.0.3 - {}", model_name),
        "manufacturer": "Sonos, Inc.",
        "modelName": model_name,
        "serialNum": serial,
        "UDN": format!("uuid:{}", rincon),
        "roomName": room_name,
        "serviceList": { "service": services },
    }))
    .unwrap()
}

/// Scanner reporting a fixed set of players, optionally ending in a fault
pub struct MockScanner {
    pub devices: Vec<Device>,
    pub fault: Option<String>,
}

impl MockScanner {
    pub fn empty() -> Self {
        Self {
            devices: Vec::new(),
            fault: None,
        }
    }

    pub fn with_hosts(hosts: &[&str]) -> Self {
        let devices = hosts.iter().map(|host| device(host, None)).collect();
        Self {
            devices,
            fault: None,
        }
    }

    /// Players as `(host, serial number)` pairs
    pub fn with_serials(players: &[(&str, &str)]) -> Self {
        let devices = players
            .iter()
            .map(|(host, serial)| device(host, Some(serial)))
            .collect();
        Self {
            devices,
            fault: None,
        }
    }

    /// Scanner whose search fails after the players found so far
    pub fn failing(self, message: &str) -> Self {
        Self {
            fault: Some(message.to_string()),
            ..self
        }
    }
}

fn device(host: &str, serial: Option<&str>) -> Device {
    Device {
        id: format!("uuid:RINCON_{}", host.replace('.', "")),
        name: format!("{} - Sonos One", host),
        room_name: "Unknown".to_string(),
        ip_address: host.to_string(),
        port: 1400,
        model_name: "Sonos One".to_string(),
        serial_number: serial.map(str::to_string),
    }
}

impl PlayerScanner for MockScanner {
    fn scan(
        &self,
        _window: Duration,
    ) -> Box<dyn Iterator<Item = Result<Device, DiscoveryError>> + '_> {
        let fault = self
            .fault
            .clone()
            .map(|message| Err(DiscoveryError::NetworkError(message)));
        Box::new(self.devices.iter().cloned().map(Ok).chain(fault))
    }
}

fn no_wait(_: Duration) {}

/// Node bound to Office (10.0.0.2), whose group Kitchen coordinates.
pub fn node(actions: &MockActions) -> UniversalNode {
    node_with_config(actions, UniversalConfig::default())
}

pub fn node_with_config(actions: &MockActions, config: UniversalConfig) -> UniversalNode {
    UniversalNode::with_anchor(config, PlayerAddress::new("10.0.0.2"), Box::new(actions.clone()))
        .with_delay(no_wait)
}
