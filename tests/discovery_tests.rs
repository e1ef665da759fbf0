//! Port discovery: automatic matching order and the interactive fallback.

mod common;

use common::{pico_descriptor, plain_descriptor};
use pico_mixer_tools::config::DiscoveryConfig;
use pico_mixer_tools::discovery::{find_candidate, select_port, MatchReason, PortDescriptor};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn run_select(ports: &[PortDescriptor], answer: &str) -> (Option<String>, String) {
    let mut input = answer.as_bytes();
    let mut out = Vec::new();
    let chosen = select_port(ports, &DiscoveryConfig::default(), &mut input, &mut out)
        .expect("writing to memory cannot fail");
    (chosen, String::from_utf8(out).unwrap())
}

#[test]
fn test_empty_list_reports_and_does_not_prompt() {
    let (chosen, out) = run_select(&[], "0\n");

    assert_eq!(chosen, None);
    assert!(out.contains("No serial ports found!"));
    assert!(!out.contains("Enter port number"));
}

#[test]
fn test_auto_match_prefers_keyword_over_path() {
    let ports = vec![
        PortDescriptor::new("/dev/cu.usbmodem1101"),
        pico_descriptor("/dev/cu.usbmodem2101"),
    ];

    let (chosen, out) = run_select(&ports, "");
    assert_eq!(chosen.as_deref(), Some("/dev/cu.usbmodem2101"));
    assert!(out.contains("Found Pico: /dev/cu.usbmodem2101 - Pico"));
}

#[test]
fn test_path_pattern_used_when_no_keyword() {
    let ports = vec![
        plain_descriptor("/dev/cu.Bluetooth-Incoming-Port", "Bluetooth"),
        PortDescriptor::new("/dev/cu.usbmodem14201"),
    ];

    let (chosen, out) = run_select(&ports, "");
    assert_eq!(chosen.as_deref(), Some("/dev/cu.usbmodem14201"));
    assert!(out.contains("Found USB modem device: /dev/cu.usbmodem14201 - n/a"));
}

#[test]
fn test_prompt_returns_selected_entry() {
    let ports = vec![
        plain_descriptor("/dev/ttyUSB0", "FT232R"),
        plain_descriptor("/dev/ttyUSB1", "CH340"),
    ];

    let (chosen, out) = run_select(&ports, "1\n");
    assert_eq!(chosen.as_deref(), Some("/dev/ttyUSB1"));
    assert!(out.contains("Available ports:\n  0: /dev/ttyUSB0 - FT232R\n  1: /dev/ttyUSB1 - CH340\n"));
    assert!(out.contains("Enter port number (or 'q' to quit): "));
}

#[test]
fn test_prompt_cancel() {
    let ports = vec![plain_descriptor("/dev/ttyUSB0", "FT232R")];

    let (chosen, out) = run_select(&ports, "q\n");
    assert_eq!(chosen, None);
    assert!(!out.contains("Invalid selection"));
}

#[test]
fn test_prompt_out_of_range_is_invalid() {
    let ports = vec![plain_descriptor("/dev/ttyUSB0", "FT232R")];

    let (chosen, out) = run_select(&ports, "5\n");
    assert_eq!(chosen, None);
    assert!(out.ends_with("Invalid selection\n"));
}

#[test]
fn test_prompt_garbage_is_invalid() {
    let ports = vec![plain_descriptor("/dev/ttyUSB0", "FT232R")];

    let (chosen, out) = run_select(&ports, "first one\n");
    assert_eq!(chosen, None);
    assert!(out.contains("Invalid selection"));
}

#[test]
fn test_custom_keywords() {
    let config = DiscoveryConfig {
        keywords: vec!["mixer".to_string()],
        path_patterns: Vec::new(),
        vendor_ids: Vec::new(),
    };
    let ports = vec![
        pico_descriptor("/dev/ttyACM0"),
        plain_descriptor("/dev/ttyACM1", "Audio MIXER v2"),
    ];

    let (port, reason) = find_candidate(&ports, &config).unwrap();
    assert_eq!(port.device, "/dev/ttyACM1");
    assert_eq!(reason, MatchReason::Keyword);
}

const DESCRIPTIONS: &[&str] = &[
    "Pico",
    "RP2040 CDC",
    "CP2102 USB Serial",
    "usb SERIAL device",
    "FT232R",
    "Bluetooth",
    "",
];

const DEVICES: &[&str] = &[
    "/dev/ttyS0",
    "/dev/ttyACM0",
    "/dev/cu.usbmodem1101",
    "/dev/cu.UsbModem2",
    "COM3",
];

fn descriptor_strategy() -> impl Strategy<Value = PortDescriptor> {
    (
        0..DEVICES.len(),
        proptest::option::of(0..DESCRIPTIONS.len()),
        proptest::option::of(prop_oneof![Just(0x2E8Au16), Just(0x0403u16), Just(0x1A86u16)]),
    )
        .prop_map(|(device, description, vid)| {
            let mut port = PortDescriptor::new(DEVICES[device]);
            port.description = description.map(|d| DESCRIPTIONS[d].to_string());
            port.vid = vid;
            port
        })
}

proptest! {
    #[test]
    fn prop_keyword_pass_precedes_path_and_vendor(ports in prop::collection::vec(descriptor_strategy(), 0..8)) {
        let config = DiscoveryConfig::default();
        let keywords = ["pico", "rp2040", "usb serial"];

        let expected_keyword = ports.iter().position(|p| {
            p.description
                .as_deref()
                .map(|d| d.to_lowercase())
                .is_some_and(|d| keywords.iter().any(|k| d.contains(k)))
        });
        let expected_path = ports
            .iter()
            .position(|p| p.device.to_lowercase().contains("usbmodem"));
        let expected_vendor = ports.iter().position(|p| p.vid == Some(0x2E8A));

        let found = find_candidate(&ports, &config)
            .map(|(port, reason)| (port as *const PortDescriptor, reason));

        let expected = match (expected_keyword, expected_path, expected_vendor) {
            (Some(i), _, _) => Some((&ports[i] as *const PortDescriptor, MatchReason::Keyword)),
            (None, Some(i), _) => Some((&ports[i] as *const PortDescriptor, MatchReason::DevicePath)),
            (None, None, Some(i)) => Some((&ports[i] as *const PortDescriptor, MatchReason::VendorId)),
            (None, None, None) => None,
        };

        prop_assert_eq!(found, expected);
    }
}
