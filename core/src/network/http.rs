//! # HTTP Probe Primitive
//!
//! Devices expose a tiny HTTP API: `GET /` answers with anything at all and
//! `GET /hostname` answers with a plain-text identity. Every request made here
//! is raced against its own timer; when the timer wins, the request future is
//! dropped, which closes the underlying connection.

use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use nodelink_common::config::{ReachabilityPolicy, ScanConfig};
use nodelink_common::error::{ProbeError, ScanError};
use reqwest::{Client, Response};
use tokio::time::timeout;

const IDENTITY_PATH: &str = "/hostname";

/// Identity bodies are cut off after this many bytes.
pub const MAX_IDENTITY_BYTES: usize = 256;

/// Outcome of a reachability probe against one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Reachable,
    Unreachable,
    TimedOut,
}

impl From<&Result<(), ProbeError>> for ProbeResult {
    fn from(result: &Result<(), ProbeError>) -> Self {
        match result {
            Ok(()) => Self::Reachable,
            Err(ProbeError::Timeout(_)) => Self::TimedOut,
            Err(_) => Self::Unreachable,
        }
    }
}

/// The network side of a scan. Implementations must bound their own latency.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Succeeds when something at `addr` answers.
    async fn reachable(&self, addr: Ipv4Addr) -> Result<(), ProbeError>;

    /// Asks the device at `addr` for its name.
    async fn identity(&self, addr: Ipv4Addr) -> Result<String, ProbeError>;
}

pub struct HttpProber {
    client: Client,
    port: u16,
    probe_timeout: Duration,
    reachability: ReachabilityPolicy,
}

impl HttpProber {
    pub fn new(cfg: &ScanConfig) -> Result<Self, ScanError> {
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(cfg.probe_timeout)
            .pool_max_idle_per_host(0)
            .user_agent(concat!("nodelink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScanError::Client(e.to_string()))?;

        Ok(Self {
            client,
            port: cfg.port,
            probe_timeout: cfg.probe_timeout,
            reachability: cfg.reachability,
        })
    }

    fn url(&self, addr: Ipv4Addr, path: &str) -> String {
        if self.port == 80 {
            format!("http://{addr}{path}")
        } else {
            format!("http://{addr}:{}{path}", self.port)
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, ProbeError>
    where
        F: Future<Output = Result<T, reqwest::Error>>,
    {
        match timeout(self.probe_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_timeout() => Err(ProbeError::Timeout(self.probe_timeout)),
            Ok(Err(e)) => Err(ProbeError::Transport(e.to_string())),
            Err(_elapsed) => Err(ProbeError::Timeout(self.probe_timeout)),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn reachable(&self, addr: Ipv4Addr) -> Result<(), ProbeError> {
        let url = self.url(addr, "/");
        let response = self.bounded(self.client.get(url).send()).await?;

        let status = response.status().as_u16();
        if self.reachability.accepts(status) {
            Ok(())
        } else {
            Err(ProbeError::Transport(format!("rejected status {status}")))
        }
    }

    async fn identity(&self, addr: Ipv4Addr) -> Result<String, ProbeError> {
        let url = self.url(addr, IDENTITY_PATH);
        let request = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            read_capped(response, MAX_IDENTITY_BYTES).await
        };

        let body: Vec<u8> = self.bounded(request).await.map_err(|e| match e {
            ProbeError::Transport(_) => ProbeError::IdentityUnavailable,
            other => other,
        })?;

        let body = String::from_utf8_lossy(&body);
        let name = body.trim();
        if name.is_empty() {
            return Err(ProbeError::IdentityUnavailable);
        }
        Ok(name.to_string())
    }
}

/// Reads at most `limit` bytes of the body and drops the rest of the stream.
async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        body.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if body.len() >= limit {
            break;
        }
    }
    Ok(body)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
