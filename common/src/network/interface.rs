//! Local interface inspection, used to pick a default base address when the
//! caller does not provide one.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    IsLoopback,
    /// The interface does not support broadcast.
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 address.
    NoPrivateIpv4,
}

/// Finds the private IPv4 address of the primary LAN interface.
pub fn lan_base_address() -> anyhow::Result<Ipv4Addr> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|intf| is_viable_lan_interface(intf).is_ok())
        .collect();

    let Some(interface) = select_best_lan_interface(&interfaces) else {
        anyhow::bail!("No interfaces available for LAN discovery");
    };

    private_ipv4(interface)
        .ok_or_else(|| anyhow::anyhow!("Interface {} has no private IPv4 address", interface.name))
}

fn is_viable_lan_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    if private_ipv4(interface).is_none() {
        return Err(ViabilityError::NoPrivateIpv4);
    }
    Ok(())
}

/// Prefers wired interfaces, otherwise takes the first candidate.
fn select_best_lan_interface(interfaces: &[NetworkInterface]) -> Option<&NetworkInterface> {
    interfaces
        .iter()
        .find(|intf| is_wired(intf))
        .or_else(|| interfaces.first())
}

fn private_ipv4(interface: &NetworkInterface) -> Option<Ipv4Addr> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if v4.ip().is_private() => Some(v4.ip()),
        _ => None,
    })
}

// Name based; good enough for eth*/en*/eno* style naming.
fn is_wired(interface: &NetworkInterface) -> bool {
    interface.name.starts_with('e')
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pnet::datalink::MacAddr;
    use pnet::ipnetwork::Ipv4Network;

    const IFF_UP: u32 = 0x1;
    const IFF_BROADCAST: u32 = 0x2;
    const IFF_LOOPBACK: u32 = 0x8;
    const IFF_POINTOPOINT: u32 = 0x10;

    fn ni(name: &str, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.into(),
            description: "".into(),
            index: 1,
            mac: Some(MacAddr::new(0x02, 0, 0, 0, 0, 1)),
            ips: ips.to_vec(),
            flags,
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
    }

    #[test]
    fn lan_interface_is_viable() {
        let intf = ni("eth0", &[v4(192, 168, 1, 20, 24)], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&intf), Ok(()));
    }

    #[test]
    fn down_interface_is_rejected() {
        let intf = ni("eth0", &[v4(192, 168, 1, 20, 24)], IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&intf), Err(ViabilityError::IsDown));
    }

    #[test]
    fn loopback_is_rejected() {
        let intf = ni("lo", &[v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK);
        assert_eq!(is_viable_lan_interface(&intf), Err(ViabilityError::IsLoopback));
    }

    #[test]
    fn vpn_tunnel_is_rejected() {
        let intf = ni(
            "tun0",
            &[v4(10, 8, 0, 2, 24)],
            IFF_UP | IFF_BROADCAST | IFF_POINTOPOINT,
        );
        assert_eq!(is_viable_lan_interface(&intf), Err(ViabilityError::IsPointToPoint));
    }

    #[test]
    fn public_only_interface_is_rejected() {
        let intf = ni("eth0", &[v4(8, 8, 8, 8, 24)], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&intf), Err(ViabilityError::NoPrivateIpv4));
    }

    #[test]
    fn wired_interface_wins_selection() {
        let candidates = vec![
            ni("wlan0", &[v4(192, 168, 1, 30, 24)], IFF_UP | IFF_BROADCAST),
            ni("eth0", &[v4(10, 0, 0, 4, 24)], IFF_UP | IFF_BROADCAST),
        ];
        let best = select_best_lan_interface(&candidates).unwrap();
        assert_eq!(best.name, "eth0");
        assert_eq!(private_ipv4(best), Some(Ipv4Addr::new(10, 0, 0, 4)));
    }

    #[test]
    fn first_candidate_is_used_without_wired_option() {
        let candidates = vec![
            ni("wlan0", &[v4(192, 168, 1, 30, 24)], IFF_UP | IFF_BROADCAST),
            ni("wlan1", &[v4(192, 168, 2, 30, 24)], IFF_UP | IFF_BROADCAST),
        ];
        assert_eq!(select_best_lan_interface(&candidates).unwrap().name, "wlan0");
        assert!(select_best_lan_interface(&[]).is_none());
    }
}
