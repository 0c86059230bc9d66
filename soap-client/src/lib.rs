//! Private SOAP client for UPnP action execution
//!
//! This crate provides a minimal blocking SOAP client for Sonos players. It
//! builds the envelope for an arbitrary action, posts it to the control
//! endpoint of a service and hands back either the `{Action}Response`
//! element or the UPnP error code of a SOAP fault.

mod error;

pub use error::SoapError;

use std::time::Duration;
use tracing::trace;
use xmltree::{Element, XMLNode};

/// A minimal SOAP client for UPnP device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a SOAP client with explicit connect and read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// Send a SOAP request and return the parsed response element
    ///
    /// # Arguments
    /// * `base_url` - Player base URL, e.g. `http://192.168.1.100:1400`
    /// * `endpoint` - Control endpoint path, e.g. `/MediaRenderer/AVTransport/Control`
    /// * `service_uri` - UPnP service type used for the envelope and SOAPACTION header
    /// * `action` - Action name, e.g. `Play`
    /// * `args` - Ordered input arguments; values are XML-escaped here
    pub fn call(
        &self,
        base_url: &str,
        endpoint: &str,
        service_uri: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<Element, SoapError> {
        let body = build_envelope(service_uri, action, args);
        let url = control_url(base_url, endpoint);
        let soap_action = format!("\"{}#{}\"", service_uri, action);

        trace!(%url, action, "sending SOAP request");

        let xml_text = match self
            .agent
            .post(&url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body)
        {
            Ok(response) => response
                .into_string()
                .map_err(|e| SoapError::Network(e.to_string()))?,
            // UPnP faults arrive as HTTP 500 with the fault envelope as body
            Err(ureq::Error::Status(status, response)) => {
                let text = response.into_string().unwrap_or_default();
                return Err(fault_from_body(status, &text));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(classify_transport(&transport));
            }
        };

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        extract_response(&xml, action)
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Join base URL and endpoint with exactly one slash between them.
fn control_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn build_envelope(service_uri: &str, action: &str, args: &[(String, String)]) -> String {
    let mut payload = String::new();
    for (name, value) in args {
        payload.push_str(&format!(
            "<{name}>{value}</{name}>",
            name = name,
            value = quick_xml::escape::escape(value.as_str())
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{service_uri}">{payload}</u:{action}></s:Body></s:Envelope>"#,
        action = action,
        service_uri = service_uri,
        payload = payload
    )
}

fn extract_response(xml: &Element, action: &str) -> Result<Element, SoapError> {
    let body = xml
        .get_child("Body")
        .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

    if let Some(fault) = body.get_child("Fault") {
        let error_code = fault
            .get_child("detail")
            .and_then(|d| d.get_child("UPnPError").or_else(|| d.get_child("UpnPError")))
            .and_then(|e| e.get_child("errorCode"))
            .and_then(|c| c.get_text())
            .and_then(|t| t.trim().parse::<u16>().ok())
            .unwrap_or(500);
        return Err(SoapError::Fault(error_code));
    }

    let response_name = format!("{}Response", action);
    body.get_child(response_name.as_str())
        .cloned()
        .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
}

/// Flatten the children of an `{Action}Response` element into ordered
/// `(name, text)` pairs. Empty elements yield an empty string.
pub fn output_arguments(response: &Element) -> Vec<(String, String)> {
    response
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(child) => Some((
                child.name.clone(),
                child.get_text().map(|t| t.into_owned()).unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

/// Extract the text between `<errorCode>` and `</errorCode>` by plain string
/// search. Returns an empty string when the envelope carries no code.
pub fn error_code_from_envelope(data: &str) -> String {
    const OPEN: &str = "<errorCode>";
    const CLOSE: &str = "</errorCode>";

    match (data.find(OPEN), data.find(CLOSE)) {
        (Some(open), Some(close)) if close > open + OPEN.len() => {
            data[open + OPEN.len()..close].trim().to_string()
        }
        _ => String::new(),
    }
}

fn fault_from_body(status: u16, body: &str) -> SoapError {
    let code = error_code_from_envelope(body);
    match code.parse::<u16>() {
        Ok(code) => SoapError::Fault(code),
        Err(_) if status == 500 => SoapError::Fault(500),
        Err(_) => SoapError::Network(format!("HTTP status {}", status)),
    }
}

fn classify_transport(transport: &ureq::Transport) -> SoapError {
    let context = transport.to_string();
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return SoapError::from_io(io, context);
        }
        source = err.source();
    }

    match transport.kind() {
        ureq::ErrorKind::Dns => SoapError::HostUnreachable(context),
        _ => SoapError::Network(context),
    }
}
