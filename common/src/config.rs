use std::time::Duration;

/// Upper bound of hosts in a /24 scan, and therefore of useful concurrency.
pub const MAX_HOSTS: usize = 254;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);
/// Lower bound of the derived scan deadline.
pub const DEFAULT_SCAN_DEADLINE: Duration = Duration::from_secs(10);
/// Headroom added on top of the derived worst case.
pub const DEADLINE_SLACK: Duration = Duration::from_secs(1);
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(20);
pub const DEFAULT_PORT: u16 = 80;

/// Base address used when none is given and no LAN interface can be found.
pub const FALLBACK_BASE_ADDRESS: &str = "192.168.1.10";

/// Presentation options of the command-line front end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Suppresses the banner.
    pub no_banner: bool,
    /// 0 = full output, 1 = no headers, 2 = summary only.
    pub quiet: u8,
    /// Emit discovered devices as JSON on stdout.
    pub json: bool,
}

/// Decides what counts as a live host during the reachability probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReachabilityPolicy {
    /// Any completed HTTP response, whatever the status code.
    #[default]
    AnyResponse,
    /// Only 2xx responses.
    SuccessOnly,
}

impl ReachabilityPolicy {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::AnyResponse => true,
            Self::SuccessOnly => (200..300).contains(&status),
        }
    }
}

/// Wall-clock bound of a whole scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanDeadline {
    /// Long enough for every host to get its turn under the configured
    /// concurrency, and never shorter than [`DEFAULT_SCAN_DEADLINE`].
    #[default]
    Auto,
    After(Duration),
    /// Waits for every probe.
    Unbounded,
}

/// Tuning knobs of a single scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Time budget of each individual HTTP probe.
    pub probe_timeout: Duration,
    pub scan_deadline: ScanDeadline,
    /// Probes allowed in flight at once. Read it through
    /// [`ScanConfig::concurrency_limit`], which keeps it within `1..=MAX_HOSTS`.
    pub max_concurrency: usize,
    /// Upper bound of the random delay before each probe starts.
    pub stagger: Duration,
    /// TCP port the device HTTP API listens on.
    pub port: u16,
    pub reachability: ReachabilityPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            scan_deadline: ScanDeadline::Auto,
            max_concurrency: MAX_HOSTS,
            stagger: DEFAULT_STAGGER,
            port: DEFAULT_PORT,
            reachability: ReachabilityPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_scan_deadline(mut self, deadline: ScanDeadline) -> Self {
        self.scan_deadline = deadline;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.clamp(1, MAX_HOSTS);
        self
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_reachability(mut self, policy: ReachabilityPolicy) -> Self {
        self.reachability = policy;
        self
    }

    /// Semaphore size for the scan. The field is public, so it is clamped
    /// again here.
    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrency.clamp(1, MAX_HOSTS)
    }

    /// The deadline actually applied to a scan, `None` when unbounded.
    ///
    /// `Auto` assumes every host holds its permit for a full reachability
    /// probe plus a full identity probe, wave after wave.
    pub fn effective_deadline(&self) -> Option<Duration> {
        match self.scan_deadline {
            ScanDeadline::After(deadline) => Some(deadline),
            ScanDeadline::Unbounded => None,
            ScanDeadline::Auto => {
                let waves = MAX_HOSTS.div_ceil(self.concurrency_limit()) as u32;
                let per_wave = self.probe_timeout.saturating_mul(2).saturating_add(self.stagger);
                let worst_case = per_wave.saturating_mul(waves).saturating_add(DEADLINE_SLACK);
                Some(worst_case.max(DEFAULT_SCAN_DEADLINE))
            }
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
