use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use nodelink_common::config::ScanConfig;
use nodelink_common::error::ProbeError;
use nodelink_core::network::http::{HttpProber, MAX_IDENTITY_BYTES, Prober};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn prober_for(server: &MockServer) -> (HttpProber, Ipv4Addr) {
    let SocketAddr::V4(addr) = *server.address() else {
        panic!("mock server should listen on IPv4");
    };
    let cfg = ScanConfig::default()
        .with_port(addr.port())
        .with_probe_timeout(Duration::from_millis(500));
    (HttpProber::new(&cfg).unwrap(), *addr.ip())
}

async fn hostname_server(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hostname"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn identity_body_is_trimmed() {
    let server = hostname_server(ResponseTemplate::new(200).set_body_string("ESP8266_Garage\r\n")).await;
    let (prober, ip) = prober_for(&server).await;

    assert_eq!(prober.identity(ip).await.unwrap(), "ESP8266_Garage");
}

#[tokio::test]
async fn empty_identity_is_unavailable() {
    let server = hostname_server(ResponseTemplate::new(200).set_body_string("  \n")).await;
    let (prober, ip) = prober_for(&server).await;

    assert_eq!(prober.identity(ip).await, Err(ProbeError::IdentityUnavailable));
}

#[tokio::test]
async fn error_status_identity_is_unavailable() {
    let server = hostname_server(ResponseTemplate::new(500).set_body_string("ESP_Broken")).await;
    let (prober, ip) = prober_for(&server).await;

    assert_eq!(prober.identity(ip).await, Err(ProbeError::IdentityUnavailable));
}

#[tokio::test]
async fn slow_identity_times_out() {
    let server = hostname_server(
        ResponseTemplate::new(200)
            .set_body_string("ESP_Sleepy")
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    let (prober, ip) = prober_for(&server).await;

    let result = prober.identity(ip).await;
    assert_eq!(result, Err(ProbeError::Timeout(Duration::from_millis(500))));
}

#[tokio::test]
async fn oversized_identity_is_cut_off() {
    let huge = format!("ESP32_{}", "x".repeat(1024 * 1024));
    let server = hostname_server(ResponseTemplate::new(200).set_body_string(huge)).await;
    let (prober, ip) = prober_for(&server).await;

    let name = prober.identity(ip).await.unwrap();
    assert_eq!(name.len(), MAX_IDENTITY_BYTES);
    assert!(name.starts_with("ESP32_xxx"));
}

#[tokio::test]
async fn any_root_response_is_reachable() {
    // Nothing mounted: every request gets wiremock's 404.
    let server = MockServer::start().await;
    let (prober, ip) = prober_for(&server).await;

    assert_eq!(prober.reachable(ip).await, Ok(()));
}
