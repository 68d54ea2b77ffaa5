use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use colored::*;
use serde_json::json;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::commands::{cancel_on_ctrl_c, resolve_base};
use crate::terminal::{colors, format, print, spinner};
use nodelink_common::config::{Config, ScanConfig};
use nodelink_common::network::device::NetworkDevice;
use nodelink_common::network::range::ScanRange;
use nodelink_common::{info, success};
use nodelink_core::scanner::Scanner;

/// Difference between two consecutive scans, keyed by address.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeviceDelta {
    pub appeared: Vec<NetworkDevice>,
    pub vanished: Vec<NetworkDevice>,
}

impl DeviceDelta {
    pub fn between(previous: &BTreeMap<Ipv4Addr, NetworkDevice>, current: &[NetworkDevice]) -> Self {
        let current_map: BTreeMap<Ipv4Addr, &NetworkDevice> =
            current.iter().map(|d| (d.address(), d)).collect();

        let appeared = current_map
            .iter()
            .filter(|(addr, _)| !previous.contains_key(addr))
            .map(|(_, device)| (*device).clone())
            .collect();
        let vanished = previous
            .iter()
            .filter(|(addr, _)| !current_map.contains_key(addr))
            .map(|(_, device)| device.clone())
            .collect();

        Self { appeared, vanished }
    }

    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.vanished.is_empty()
    }
}

pub async fn watch(
    base: Option<String>,
    interval: Duration,
    scan_cfg: ScanConfig,
    cfg: &Config,
) -> anyhow::Result<()> {
    let base: String = resolve_base(base);
    let range = ScanRange::from_base(&base)?;
    let scanner = Scanner::http(scan_cfg)?.on_device_found(spinner::report_discovery_progress);

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Watching {range} every {}s", interval.as_secs());

    let mut known: BTreeMap<Ipv4Addr, NetworkDevice> = BTreeMap::new();
    let mut round: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = cancel.cancelled() => break,
        }

        round += 1;
        if !cfg.json {
            spinner::start();
        }
        let devices = scanner.scan_range(range, cancel.clone()).await;
        spinner::stop();

        if cancel.is_cancelled() {
            break;
        }

        let delta = DeviceDelta::between(&known, &devices);
        report_round(round, &delta, devices.len(), cfg)?;
        known = devices.into_iter().map(|d| (d.address(), d)).collect();
    }

    interrupt.abort();
    success!("Stopped watching after {round} scan(s)");
    Ok(())
}

fn report_round(round: u64, delta: &DeviceDelta, total: usize, cfg: &Config) -> anyhow::Result<()> {
    if cfg.json {
        let line = json!({
            "round": round,
            "total": total,
            "appeared": delta.appeared,
            "vanished": delta.vanished,
        });
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    }

    print::header(&format!("scan #{round}"), cfg.quiet);
    if delta.is_empty() {
        if cfg.quiet < 2 {
            print::print_status(format!("No changes, {total} device(s) online"));
        }
        return Ok(());
    }

    for device in &delta.appeared {
        print::print_status(format!("{} {}", "+".green().bold(), format::device_line(device)));
    }
    for device in &delta.vanished {
        print::print_status(format!(
            "{} {}",
            "-".color(colors::VANISHED).bold(),
            format::device_line(device)
        ));
    }
    success!("{total} device(s) online");
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
