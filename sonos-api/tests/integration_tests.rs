//! Integration tests for the network client
//!
//! These run `SonosClient` against a local mockito server standing in for a
//! player, covering envelope construction, output argument extraction and
//! fault decoding end to end.

use mockito::{Matcher, Server};
use sonos_api::services::{av_transport, group_rendering_control, rendering_control};
use sonos_api::{ApiError, SonosActions, SonosClient};

fn response_envelope(action: &str, service: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action}Response xmlns:u="urn:schemas-upnp-org:service:{service}:1">{body}</u:{action}Response></s:Body></s:Envelope>"#
    )
}

fn fault_envelope(code: u16) -> String {
    format!(
        r#"<?xml version="1.0"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring><detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0"><errorCode>{code}</errorCode></UPnPError></detail></s:Fault></s:Body></s:Envelope>"#
    )
}

#[test]
fn test_relative_group_volume_round_trip() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/MediaRenderer/GroupRenderingControl/Control")
        .match_header(
            "soapaction",
            "\"urn:schemas-upnp-org:service:GroupRenderingControl:1#SetRelativeGroupVolume\"",
        )
        .match_body(Matcher::Regex("<Adjustment>10</Adjustment>".to_string()))
        .with_status(200)
        .with_body(response_envelope(
            "SetRelativeGroupVolume",
            "GroupRenderingControl",
            "<NewVolume>30</NewVolume>",
        ))
        .create();

    let client = SonosClient::new();
    let response =
        group_rendering_control::set_relative_group_volume(&client, &server.url(), 10).unwrap();

    assert_eq!(response.new_volume, 30);
    mock.assert();
}

#[test]
fn test_fault_with_error_code() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .with_status(500)
        .with_body(fault_envelope(701))
        .create();

    let client = SonosClient::new();
    let result = av_transport::play(&client, &server.url(), "1".to_string());

    assert!(matches!(result, Err(ApiError::SoapFault(701))));
}

#[test]
fn test_fault_without_code_is_500() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .with_status(500)
        .with_body("Internal Server Error")
        .create();

    let client = SonosClient::new();
    let result = av_transport::pause(&client, &server.url());

    assert!(matches!(result, Err(ApiError::SoapFault(500))));
}

#[test]
fn test_raw_action_keeps_output_order() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .with_status(200)
        .with_body(response_envelope(
            "GetTransportInfo",
            "AVTransport",
            "<CurrentTransportState>PLAYING</CurrentTransportState><CurrentTransportStatus>OK</CurrentTransportStatus><CurrentSpeed>1</CurrentSpeed>",
        ))
        .create();

    let client = SonosClient::new();
    let response = client
        .execute_action(
            &server.url(),
            "/MediaRenderer/AVTransport/Control",
            "GetTransportInfo",
            &[("InstanceID".to_string(), "0".to_string())],
        )
        .unwrap();

    let names: Vec<_> = response.arguments().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["CurrentTransportState", "CurrentTransportStatus", "CurrentSpeed"]);
    assert_eq!(response.get("CurrentTransportState"), Some("PLAYING"));
}

#[test]
fn test_argument_values_are_escaped() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/MediaRenderer/AVTransport/Control")
        .match_body(Matcher::Regex(
            "<CurrentURIMetaData>&lt;DIDL-Lite&gt;&lt;/DIDL-Lite&gt;</CurrentURIMetaData>".to_string(),
        ))
        .with_status(200)
        .with_body(response_envelope("SetAVTransportURI", "AVTransport", ""))
        .create();

    let client = SonosClient::new();
    av_transport::set_av_transport_uri(
        &client,
        &server.url(),
        "x-rincon-queue:RINCON_000E58A0123401400#0".to_string(),
        "<DIDL-Lite></DIDL-Lite>".to_string(),
    )
    .unwrap();

    mock.assert();
}

#[test]
fn test_invalid_volume_is_not_sent() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/MediaRenderer/RenderingControl/Control")
        .expect(0)
        .create();

    let client = SonosClient::new();
    let result = rendering_control::set_volume(&client, &server.url(), 150);

    assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
    mock.assert();
}

#[test]
fn test_connection_refused_is_classified() {
    // nothing listens on the discard port of localhost in the test environment
    let client = SonosClient::new();
    let result = av_transport::stop(&client, "http://127.0.0.1:9");

    assert!(matches!(
        result,
        Err(ApiError::ConnectionRefused(_)) | Err(ApiError::NetworkError(_))
    ));
}
