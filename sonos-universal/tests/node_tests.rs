//! Dispatch, configuration and discovery through the public node API

mod common;

use common::{node, node_with_config, MockActions, MockScanner, KITCHEN, OFFICE};
use serde_json::json;
use sonos_universal::discovery::{
    discover_all_with_host, discover_all_with_serial, discover_by_serial,
    discover_specific_by_serial,
};
use sonos_universal::report::Fill;
use sonos_universal::{message, Error, Message, Outcome, UniversalConfig, UniversalNode};
use std::time::Duration;

fn msg(value: serde_json::Value) -> Message {
    message::from_value(value).unwrap()
}

fn sent(outcome: Outcome) -> Message {
    match outcome {
        Outcome::Sent { message, .. } => message,
        Outcome::Failed { failure, .. } => panic!("command failed: {:?}", failure),
    }
}

#[test]
fn test_bare_command_gets_group_prefix() {
    let actions = MockActions::new();
    let outcome = node(&actions).process(msg(json!({"topic": "play", "_msgid": "42"})));

    assert_eq!(outcome.status().text, "ok:group.play");
    assert_eq!(outcome.status().fill, Fill::Green);
    let message = sent(outcome);
    assert_eq!(message["universalCmd"], json!("group.play"));
    assert_eq!(message["topic"], json!("group.play"));
    assert_eq!(message["_msgid"], json!("42"));

    let writes = actions.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].action, "Play");
    assert_eq!(writes[0].base_url, KITCHEN);
}

#[test]
fn test_namespaced_command_is_kept() {
    let actions = MockActions::new();
    let message = sent(node(&actions).process(msg(json!({"topic": "player.get.volume"}))));

    assert_eq!(message["universalCmd"], json!("player.get.volume"));
    assert_eq!(message["payload"], json!(20));
    let reads = actions.calls_named("GetVolume");
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].base_url, OFFICE);
}

#[test]
fn test_command_is_case_insensitive() {
    let actions = MockActions::new();
    let message = sent(node(&actions).process(msg(json!({"topic": "GROUP.Get.Volume"}))));

    assert_eq!(message["universalCmd"], json!("group.get.volume"));
    assert_eq!(message["payload"], json!(20));
}

#[test]
fn test_unknown_command() {
    let actions = MockActions::new();
    let outcome = node(&actions).process(msg(json!({"topic": "bogus.command"})));

    let Outcome::Failed { failure, status } = outcome else {
        panic!("unknown command was dispatched");
    };
    assert_eq!(failure.short, "command is invalid >>group.bogus.command ");
    assert_eq!(failure.details, "none");
    assert_eq!(status.fill, Fill::Red);
    assert_eq!(
        status.text,
        "error: group.bogus.command - command is invalid >>group.bogus.command "
    );
    assert!(actions.calls().is_empty());
}

#[test]
fn test_missing_command() {
    let actions = MockActions::new();

    for message in [json!({}), json!({"topic": ""}), json!({"topic": null})] {
        let outcome = node(&actions).process(msg(message));
        assert!(!outcome.is_sent());
        assert_eq!(
            outcome.status().text,
            "error: processing input msg - command is undefined/invalid"
        );
    }
    assert!(actions.calls().is_empty());
}

#[test]
fn test_compatibility_mode_swaps_fields() {
    let actions = MockActions::new();
    let config = UniversalConfig {
        compatibility_mode: true,
        ..Default::default()
    };
    let message = sent(
        node_with_config(&actions, config).process(msg(json!({"payload": "get.volume"}))),
    );

    assert_eq!(message["universalCmd"], json!("group.get.volume"));
    assert_eq!(message["payload"], json!(20));
}

#[test]
fn test_compatibility_mode_reads_value_from_topic() {
    let actions = MockActions::new();
    let config = UniversalConfig {
        compatibility_mode: true,
        ..Default::default()
    };
    sent(node_with_config(&actions, config).process(msg(json!({
        "payload": "player.set.volume",
        "topic": 15
    }))));

    let writes = actions.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].arg("DesiredVolume"), Some("15"));
}

#[test]
fn test_fixed_command_and_state() {
    let actions = MockActions::new();
    let config = UniversalConfig {
        command: "player.set.volume".to_string(),
        state: Some(json!(35)),
        ..Default::default()
    };
    let message = sent(
        node_with_config(&actions, config).process(msg(json!({"topic": "ignored", "payload": 99}))),
    );

    assert_eq!(message["universalCmd"], json!("player.set.volume"));
    assert_eq!(message["payload"], json!(35));
    let writes = actions.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].action, "SetVolume");
    assert_eq!(writes[0].base_url, OFFICE);
    assert_eq!(writes[0].arg("DesiredVolume"), Some("35"));
}

#[test]
fn test_empty_state_does_not_override() {
    let actions = MockActions::new();
    let config = UniversalConfig {
        command: "player.set.volume".to_string(),
        state: Some(json!("")),
        ..Default::default()
    };
    sent(node_with_config(&actions, config).process(msg(json!({"payload": 12}))));

    assert_eq!(actions.writes()[0].arg("DesiredVolume"), Some("12"));
}

#[test]
fn test_soap_fault_is_classified() {
    let actions = MockActions::new().fail("Play", 701);
    let outcome = node(&actions).process(msg(json!({"topic": "group.play"})));

    let Outcome::Failed { failure, status } = outcome else {
        panic!("fault was not reported");
    };
    assert_eq!(failure.short, "statusCode 500 & upnpError 701");
    assert_eq!(failure.details, "Transition not available");
    assert_eq!(status.text, "error: group.play - statusCode 500 & upnpError 701");
}

#[test]
fn test_config_prefers_ip_address() {
    let config = UniversalConfig {
        ip_address: Some("10.0.0.3".to_string()),
        serial_number: Some("00-0E-58-A0-12-34:5".to_string()),
        ..Default::default()
    };

    let scanner = MockScanner::empty().failing("must not scan");
    let address = config.resolve_address(&scanner).unwrap();
    assert_eq!(address.base_url(), KITCHEN);
}

#[test]
fn test_config_discovers_by_serial() {
    let config = UniversalConfig {
        ip_address: Some("not an address".to_string()),
        serial_number: Some("00-0e-58-a0-12-34:5".to_string()),
        ..Default::default()
    };

    let scanner = MockScanner::with_serials(&[
        ("10.0.0.2", "00-0E-58-FF-FF-FF:1"),
        ("10.0.0.3", " 00-0E-58-A0-12-34:5 "),
    ]);
    let address = config.resolve_address(&scanner).unwrap();
    assert_eq!(address.host, "10.0.0.3");
    assert_eq!(address.port, 1400);
}

#[test]
fn test_config_errors() {
    let err = UniversalConfig::default()
        .resolve_address(&MockScanner::empty())
        .unwrap_err();
    assert_eq!(
        err.own_message(),
        Some("both ipaddress and serial number are invalid/missing")
    );

    let err = UniversalConfig::with_serial("00-0E-58-A0-12-34:5")
        .resolve_address(&MockScanner::empty())
        .unwrap_err();
    assert_eq!(err.own_message(), Some("could not find any player by serial"));
}

#[test]
fn test_config_reports_discovery_fault() {
    let scanner = MockScanner::empty().failing("Failed to bind UDP socket: address in use");

    let err = UniversalConfig::with_serial("00-0E-58-A0-12-34:5")
        .resolve_address(&scanner)
        .unwrap_err();
    assert_eq!(
        err.own_message(),
        Some("could not figure out ip address (discovery)")
    );
}

#[test]
fn test_setup_binds_node() {
    let actions = MockActions::new();
    let node = UniversalNode::setup(
        UniversalConfig::with_ip("10.0.0.4"),
        &MockScanner::empty(),
        Box::new(actions.clone()),
    )
    .unwrap();

    assert_eq!(node.anchor().host, "10.0.0.4");
    assert!(node.config().command_from_message());
}

#[test]
fn test_discovery_timeout_is_not_an_error() {
    let found = discover_by_serial(
        &MockScanner::empty(),
        "00-0E-58-A0-12-34:5",
        Duration::from_millis(10),
    )
    .unwrap();

    assert_eq!(found, None);
}

#[test]
fn test_discovery_fault_is_an_error() {
    let scanner = MockScanner::with_serials(&[("10.0.0.2", "00-0E-58-FF-FF-FF:1")])
        .failing("Socket error: network is unreachable");

    let err = discover_by_serial(&scanner, "00-0E-58-A0-12-34:5", Duration::from_secs(1))
        .unwrap_err();
    assert!(matches!(err, Error::Discovery(_)));
    assert_eq!(err.own_message(), None);
}

#[test]
fn test_discovery_fault_before_first_player() {
    let actions = MockActions::new();
    let scanner = MockScanner::empty().failing("Failed to send M-SEARCH: permission denied");

    let err = discover_all_with_host(&scanner, &actions, Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, Error::Discovery(_)));

    let err = discover_specific_by_serial(&scanner, &actions, "00-0E-58-A0-12-34:5", Duration::from_secs(1))
        .unwrap_err();
    assert!(matches!(err, Error::Discovery(_)));
    assert!(actions.calls().is_empty());
}

#[test]
fn test_discover_by_serial_skips_other_players() {
    let scanner = MockScanner::with_serials(&[
        ("10.0.0.3", "00-0E-58-FF-FF-FF:1"),
        ("10.0.0.4", "00-0E-58-EE-EE-EE:2"),
    ]);

    let found = discover_by_serial(&scanner, "00-0E-58-A0-12-34:5", Duration::from_secs(1))
        .unwrap();
    assert_eq!(found, None);
}

#[test]
fn test_discover_specific_by_serial_without_match() {
    let actions = MockActions::new();
    let scanner = MockScanner::with_hosts(&["10.0.0.2"]);

    let err = discover_specific_by_serial(&scanner, &actions, "00-0E-58-A0-12-34:5", Duration::from_secs(1))
        .unwrap_err();
    assert!(matches!(err, Error::DiscoveryNotFound(_)));
}

#[test]
fn test_discover_all_with_host() {
    let actions = MockActions::new();
    let scanner = MockScanner::with_hosts(&["10.0.0.2"]);

    let choices = discover_all_with_host(&scanner, &actions, Duration::from_secs(1)).unwrap();
    let labels: Vec<_> = choices.iter().map(|choice| choice.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "10.0.0.3 for Kitchen",
            "10.0.0.2 for Office",
            "10.0.0.4 for Bath",
            "10.0.0.5 for Living Room"
        ]
    );
    assert_eq!(choices[0].value, "10.0.0.3");

    let none = discover_all_with_host(&MockScanner::empty(), &actions, Duration::from_secs(1)).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_discover_all_with_serial() {
    let actions = MockActions::new();
    let scanner = MockScanner::with_hosts(&["10.0.0.2"]);

    let choices = discover_all_with_serial(&scanner, &actions, Duration::from_secs(1)).unwrap();
    assert_eq!(choices.len(), 4);
    assert_eq!(choices[1].label, "00-0E-58-A0-12-34:5 for Office");
    assert_eq!(choices[1].value, "00-0E-58-A0-12-34:5");
}
