use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use crate::commands::{cancel_on_ctrl_c, resolve_base};
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};
use nodelink_common::config::{Config, ScanConfig};
use nodelink_common::network::device::NetworkDevice;
use nodelink_common::success;
use nodelink_core::scanner::Scanner;

pub async fn discover(base: Option<String>, scan_cfg: ScanConfig, cfg: &Config) -> anyhow::Result<()> {
    let base: String = resolve_base(base);
    let scanner = Scanner::http(scan_cfg)?.on_device_found(spinner::report_discovery_progress);

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());

    if !cfg.json {
        spinner::start();
    }
    let start_time: Instant = Instant::now();
    let result = scanner
        .scan_with_cancel(&base, cancel)
        .instrument(info_span!("discovery", base = %base))
        .await;
    spinner::stop();
    interrupt.abort();

    let mut devices: Vec<NetworkDevice> =
        result.with_context(|| format!("cannot scan the network of '{base}'"))?;
    devices.sort_by_key(NetworkDevice::address);

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    discovery_ends(&devices, start_time.elapsed(), cfg);
    Ok(())
}

fn discovery_ends(devices: &[NetworkDevice], total_time: Duration, cfg: &Config) {
    if devices.is_empty() {
        no_devices_found(cfg);
        return;
    }

    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("Network Discovery", cfg.quiet);
    print_devices(devices, cfg);
    print_summary(devices, total_time, cfg);
}

fn no_devices_found(cfg: &Config) {
    print::header("ZERO DEVICES DETECTED", cfg.quiet);
    print::no_results();
}

fn print_devices(devices: &[NetworkDevice], cfg: &Config) {
    if cfg.quiet >= 2 {
        return;
    }
    for (idx, device) in devices.iter().enumerate() {
        print::tree_head(idx, device.identity());
        print::as_tree_one_level(format::device_to_details(device));
        if idx + 1 != devices.len() {
            mprint!();
        }
    }
}

fn print_summary(devices: &[NetworkDevice], total_time: Duration, cfg: &Config) {
    let known: usize = devices
        .iter()
        .filter(|device| device.classification().is_known())
        .count();

    let active: ColoredString = format!("{} devices", devices.len()).bold().green();
    let esp: ColoredString = format!("{known} ESP").bold().cyan();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Discovery Complete: {active} ({esp}) identified in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            mprint!();
            success!("{}", output)
        }
    }
}
