pub mod discover;
pub mod watch;

use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use nodelink_common::config::{FALLBACK_BASE_ADDRESS, ReachabilityPolicy, ScanConfig, ScanDeadline};
use nodelink_common::network::interface;
use nodelink_common::{success, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "nodelink")]
#[command(about = "Find ESP devices on your local network.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Hide the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Reduce output (-q hides headers, -qq prints the summary only)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print discovered devices as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Per-probe timeout in milliseconds
    #[arg(long, env = "NODELINK_TIMEOUT_MS", default_value_t = 1_000, global = true)]
    pub timeout_ms: u64,

    /// Whole-scan deadline in milliseconds, 0 disables it [default: derived from
    /// timeout and concurrency, at least 10000]
    #[arg(long, env = "NODELINK_DEADLINE_MS", global = true)]
    pub deadline_ms: Option<u64>,

    /// Maximum number of probes in flight (1-254)
    #[arg(long, env = "NODELINK_CONCURRENCY", default_value_t = 254, global = true)]
    pub concurrency: usize,

    /// Port of the device HTTP API
    #[arg(long, env = "NODELINK_PORT", default_value_t = 80, global = true)]
    pub port: u16,

    /// Only count 2xx answers as a live device
    #[arg(long, global = true)]
    pub strict: bool,
}

impl ScanArgs {
    pub fn to_config(&self) -> ScanConfig {
        let deadline = match self.deadline_ms {
            None => ScanDeadline::Auto,
            Some(0) => ScanDeadline::Unbounded,
            Some(ms) => ScanDeadline::After(Duration::from_millis(ms)),
        };
        let policy = if self.strict {
            ReachabilityPolicy::SuccessOnly
        } else {
            ReachabilityPolicy::AnyResponse
        };

        ScanConfig::default()
            .with_probe_timeout(Duration::from_millis(self.timeout_ms))
            .with_scan_deadline(deadline)
            .with_max_concurrency(self.concurrency)
            .with_port(self.port)
            .with_reachability(policy)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep the /24 of BASE once and list the devices found
    #[command(alias = "d")]
    Discover {
        /// Any address of the network to scan, e.g. 192.168.1.10
        #[arg(env = "NODELINK_BASE")]
        base: Option<String>,
    },
    /// Re-scan periodically and report devices joining or leaving
    #[command(alias = "w")]
    Watch {
        #[arg(env = "NODELINK_BASE")]
        base: Option<String>,

        /// Seconds between scans
        #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Picks the base address: explicit argument, then the LAN interface, then
/// the stock default.
pub fn resolve_base(base: Option<String>) -> String {
    if let Some(base) = base {
        return base;
    }

    match interface::lan_base_address() {
        Ok(addr) => {
            success!("Using LAN address {addr} as scan base");
            addr.to_string()
        }
        Err(e) => {
            warn!("{e}, falling back to {FALLBACK_BASE_ADDRESS}");
            FALLBACK_BASE_ADDRESS.to_string()
        }
    }
}

/// Cancels `token` on the first Ctrl-C.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing early");
            token.cancel();
        }
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
