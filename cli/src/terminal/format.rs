use colored::*;
use nodelink_common::network::device::{Classification, NetworkDevice};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn classification_to_colored(classification: Classification) -> ColoredString {
    match classification {
        Classification::KnownDevice => "ESP device".color(colors::KNOWN_DEVICE).bold(),
        Classification::Unknown => "Unknown".color(colors::UNKNOWN_DEVICE),
    }
}

pub fn device_to_details(device: &NetworkDevice) -> Vec<Detail> {
    vec![
        (
            String::from("IPv4"),
            device.address().to_string().color(colors::IPV4_ADDR),
        ),
        (
            String::from("Type"),
            classification_to_colored(device.classification()),
        ),
    ]
}

/// Short single-line form used by watch mode.
pub fn device_line(device: &NetworkDevice) -> String {
    format!(
        "{} {} ({})",
        device.identity().color(colors::PRIMARY),
        device.address().to_string().color(colors::IPV4_ADDR),
        classification_to_colored(device.classification())
    )
}
