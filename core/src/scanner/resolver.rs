use std::net::Ipv4Addr;

use nodelink_common::network::device::{NetworkDevice, fallback_identity};
use tracing::{debug, trace};

use crate::network::http::{ProbeResult, Prober};

/// Probes a single address and, if it answers, names and classifies it.
///
/// Returns `None` for hosts that time out or fail at the transport level.
pub async fn probe_host<P>(prober: &P, addr: Ipv4Addr) -> Option<NetworkDevice>
where
    P: Prober + ?Sized,
{
    let outcome = prober.reachable(addr).await;
    match ProbeResult::from(&outcome) {
        ProbeResult::Reachable => {}
        ProbeResult::TimedOut => {
            trace!(%addr, "probe timed out");
            return None;
        }
        ProbeResult::Unreachable => {
            if let Err(e) = outcome {
                trace!(%addr, "probe failed: {e}");
            }
            return None;
        }
    }

    let identity = resolve_identity(prober, addr).await;
    let device = NetworkDevice::new(addr, identity);
    debug!(
        %addr,
        identity = device.identity(),
        classification = %device.classification(),
        "host answered"
    );
    Some(device)
}

/// The device's self-reported name, or the synthesized fallback.
pub async fn resolve_identity<P>(prober: &P, addr: Ipv4Addr) -> String
where
    P: Prober + ?Sized,
{
    match prober.identity(addr).await {
        Ok(name) => name,
        Err(e) => {
            debug!(%addr, "no identity ({e}), using fallback");
            fallback_identity(addr)
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
