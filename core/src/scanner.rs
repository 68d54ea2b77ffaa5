//! The central **entry point** for device discovery.
//!
//! A scan fans out one task per host of the /24, each bounded by its own probe
//! timeout and gated by a semaphore. Tasks report devices through a channel to
//! a single collector, which stops when every task has finished, the scan
//! deadline passes, or the caller cancels. Deduplication happens once, after
//! collection, so no state is shared between probes.
//!
//! Results come back in completion order. Callers that want address order
//! must sort.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use nodelink_common::config::{MAX_HOSTS, ScanConfig};
use nodelink_common::error::ScanError;
use nodelink_common::network::device::{NetworkDevice, dedup_by_address};
use nodelink_common::network::range::ScanRange;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::network::http::{HttpProber, Prober};

pub mod resolver;

type FoundCallback = Box<dyn Fn(usize) + Send + Sync>;

pub struct Scanner<P> {
    prober: Arc<P>,
    cfg: ScanConfig,
    on_found: Option<FoundCallback>,
}

impl Scanner<HttpProber> {
    /// A scanner speaking HTTP to real devices.
    pub fn http(cfg: ScanConfig) -> Result<Self, ScanError> {
        let prober = HttpProber::new(&cfg)?;
        Ok(Self::new(prober, cfg))
    }
}

impl<P> Scanner<P>
where
    P: Prober + 'static,
{
    pub fn new(prober: P, cfg: ScanConfig) -> Self {
        Self {
            prober: Arc::new(prober),
            cfg,
            on_found: None,
        }
    }

    /// Registers a callback receiving the running count of devices found.
    pub fn on_device_found(mut self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_found = Some(Box::new(callback));
        self
    }

    /// Scans the /24 of `base`. Fails only when `base` is malformed.
    pub async fn scan(&self, base: &str) -> Result<Vec<NetworkDevice>, ScanError> {
        self.scan_with_cancel(base, CancellationToken::new()).await
    }

    pub async fn scan_with_cancel(
        &self,
        base: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<NetworkDevice>, ScanError> {
        let range = ScanRange::from_base(base)?;
        Ok(self.scan_range(range, cancel).await)
    }

    /// Scans a validated range. Cancellation returns whatever was collected.
    pub async fn scan_range(&self, range: ScanRange, cancel: CancellationToken) -> Vec<NetworkDevice> {
        let started = Instant::now();
        let limit = self.cfg.concurrency_limit();
        let deadline = self.cfg.effective_deadline();
        info!(%range, concurrency = limit, ?deadline, "scanning for devices");

        let (tx, mut rx) = mpsc::channel::<NetworkDevice>(MAX_HOSTS);
        let permits = Arc::new(Semaphore::new(limit));
        let mut probes: JoinSet<()> = JoinSet::new();

        for addr in range.hosts().iter() {
            probes.spawn(probe_task(
                Arc::clone(&self.prober),
                Arc::clone(&permits),
                tx.clone(),
                addr,
                jitter(self.cfg.stagger),
            ));
        }
        // The channel closes once the last task drops its sender.
        drop(tx);

        let collected = self.collect(&mut rx, deadline, &cancel).await;
        probes.abort_all();

        let devices = dedup_by_address(collected);
        info!(
            found = devices.len(),
            elapsed = ?started.elapsed(),
            "scan finished"
        );
        devices
    }

    async fn collect(
        &self,
        rx: &mut mpsc::Receiver<NetworkDevice>,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Vec<NetworkDevice> {
        let deadline = deadline.map(|d| Instant::now() + d);
        let mut found: Vec<NetworkDevice> = Vec::new();

        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(device) => {
                        found.push(device);
                        if let Some(callback) = &self.on_found {
                            callback(found.len());
                        }
                    }
                    None => break,
                },
                _ = deadline_reached(deadline) => {
                    warn!(found = found.len(), "scan deadline reached, abandoning pending probes");
                    break;
                }
                _ = cancel.cancelled() => {
                    info!(found = found.len(), "scan cancelled");
                    break;
                }
            }
        }

        found
    }
}

/// Scans the /24 of `base` with an HTTP prober built from `cfg`.
pub async fn scan(base: &str, cfg: &ScanConfig) -> Result<Vec<NetworkDevice>, ScanError> {
    let range = ScanRange::from_base(base)?;
    let scanner = Scanner::http(cfg.clone())?;
    Ok(scanner.scan_range(range, CancellationToken::new()).await)
}

async fn probe_task<P>(
    prober: Arc<P>,
    permits: Arc<Semaphore>,
    tx: mpsc::Sender<NetworkDevice>,
    addr: Ipv4Addr,
    delay: Duration,
) where
    P: Prober + ?Sized,
{
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let Ok(_permit) = permits.acquire_owned().await else {
        return;
    };

    if let Some(device) = resolver::probe_host(prober.as_ref(), addr).await {
        if tx.send(device).await.is_err() {
            debug!(%addr, "collector gone, dropping result");
        }
    }
}

async fn deadline_reached(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::random_range(0..=max_ms))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
