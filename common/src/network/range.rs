//! # Scan Range Model
//!
//! A scan always covers one /24: the first three octets of a configured base
//! address are kept and the host part walks `1..=254`. The network (`.0`) and
//! broadcast (`.255`) addresses are never probed.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ScanError;

const FIRST_HOST: u8 = 1;
const LAST_HOST: u8 = 254;

/// Represents a continuous range of IPv4 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + use<> {
        let start: u32 = u32::from(self.start_addr);
        let end: u32 = u32::from(self.end_addr);
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> usize {
        let start: u32 = u32::from(self.start_addr);
        let end: u32 = u32::from(self.end_addr);
        if end < start {
            0
        } else {
            (end - start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The /24 subnet derived from a base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanRange {
    prefix: [u8; 3],
}

impl ScanRange {
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { prefix: [a, b, c] }
    }

    /// Builds the range from a dotted-quad base address such as `192.168.1.10`.
    ///
    /// Only the first three octets matter and must be numeric. A three-octet
    /// prefix (`192.168.1`) is accepted, and a fourth part is never inspected,
    /// so `192.168.1.x` scans `192.168.1.0/24` too.
    pub fn from_base(base: &str) -> Result<Self, ScanError> {
        let trimmed = base.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();

        if parts.len() < 3 {
            return Err(ScanError::invalid_range(
                base,
                format!("expected at least 3 octets, found {}", parts.len()),
            ));
        }
        if parts.len() > 4 {
            return Err(ScanError::invalid_range(
                base,
                format!("expected at most 4 octets, found {}", parts.len()),
            ));
        }

        let mut octets = [0u8; 3];
        for (idx, part) in parts.iter().take(3).enumerate() {
            octets[idx] = parse_octet(part)
                .ok_or_else(|| ScanError::invalid_range(base, format!("'{part}' is not an octet")))?;
        }

        Ok(Self::new(octets[0], octets[1], octets[2]))
    }

    /// The probe address for host suffix `host`.
    pub fn addr(&self, host: u8) -> Ipv4Addr {
        let [a, b, c] = self.prefix;
        Ipv4Addr::new(a, b, c, host)
    }

    pub fn hosts(&self) -> Ipv4Range {
        Ipv4Range::new(self.addr(FIRST_HOST), self.addr(LAST_HOST))
    }
}

impl FromStr for ScanRange {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base(s)
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.prefix;
        write!(f, "{a}.{b}.{c}.{FIRST_HOST}-{LAST_HOST}")
    }
}

fn parse_octet(part: &str) -> Option<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u8>().ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
