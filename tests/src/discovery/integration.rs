//! Full scans over `127.0.0.0/24`. Linux routes the whole `127.0.0.0/8` to the
//! loopback device, so responders can be bound to arbitrary host suffixes.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use nodelink_common::config::{ReachabilityPolicy, ScanConfig};
use nodelink_common::error::ScanError;
use nodelink_common::network::device::{Classification, NetworkDevice};
use nodelink_core::scanner::{self, Scanner};

use crate::utils::{bind_shared_port, device};

fn loopback(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(127, 0, 0, last)
}

fn cfg(port: u16) -> ScanConfig {
    ScanConfig::default()
        .with_port(port)
        .with_probe_timeout(Duration::from_millis(1_000))
}

#[tokio::test]
async fn malformed_base_is_rejected_before_scanning() {
    let result = scanner::scan("not-an-ip", &ScanConfig::default()).await;
    assert!(matches!(result, Err(ScanError::InvalidRange { .. })), "{result:?}");
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn loopback_scan_finds_three_responders() {
    let addrs = [loopback(5), loopback(10), loopback(200)];
    let Some((port, mut listeners)) = bind_shared_port(&addrs) else {
        eprintln!("Skipping loopback scan: could not bind a shared port.");
        return;
    };

    // .5 answers 404 on purpose: any response counts as reachable.
    let _d200 = device(listeners.remove(2), 200, None).await;
    let _d10 = device(listeners.remove(1), 200, Some("ESP32_Lab")).await;
    let _d5 = device(listeners.remove(0), 404, None).await;

    let mut devices: Vec<NetworkDevice> = scanner::scan("127.0.0.1", &cfg(port)).await.unwrap();
    devices.sort_by_key(NetworkDevice::address);

    let summary: Vec<(Ipv4Addr, &str, Classification)> = devices
        .iter()
        .map(|d| (d.address(), d.identity(), d.classification()))
        .collect();

    assert_eq!(
        summary,
        vec![
            (loopback(5), "Device_5", Classification::Unknown),
            (loopback(10), "ESP32_Lab", Classification::KnownDevice),
            (loopback(200), "Device_200", Classification::Unknown),
        ]
    );
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn strict_policy_ignores_error_statuses() {
    let addrs = [loopback(21), loopback(22)];
    let Some((port, mut listeners)) = bind_shared_port(&addrs) else {
        eprintln!("Skipping strict scan: could not bind a shared port.");
        return;
    };

    let _d22 = device(listeners.remove(1), 200, Some("ESP_Strict")).await;
    let _d21 = device(listeners.remove(0), 404, None).await;

    let strict = cfg(port).with_reachability(ReachabilityPolicy::SuccessOnly);
    let devices = Scanner::http(strict).unwrap().scan("127.0.0.1").await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].address(), loopback(22));
    assert_eq!(devices[0].identity(), "ESP_Strict");
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn silent_host_does_not_stall_the_scan() {
    let addrs = [loopback(9), loopback(10)];
    let Some((port, mut listeners)) = bind_shared_port(&addrs) else {
        eprintln!("Skipping silent host scan: could not bind a shared port.");
        return;
    };

    let _d10 = device(listeners.remove(1), 200, Some("ESP32_Alive")).await;
    // Completes TCP handshakes through the backlog, never answers HTTP.
    let _silent = listeners.remove(0);

    let timeout = Duration::from_millis(300);
    let scan_cfg = cfg(port).with_probe_timeout(timeout);

    let start = Instant::now();
    let devices = scanner::scan("127.0.0.1", &scan_cfg).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].identity(), "ESP32_Alive");
    assert!(elapsed < timeout + Duration::from_secs(2), "scan took {elapsed:?}");
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn empty_network_is_not_an_error() {
    let Some((port, listeners)) = bind_shared_port(&[loopback(1)]) else {
        return;
    };
    // Free the port again: nothing listens anywhere on it.
    drop(listeners);

    let devices = scanner::scan("127.0.0.1", &cfg(port)).await.unwrap();
    assert!(devices.is_empty());
}
