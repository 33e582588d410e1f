//! Local network addresses the server is reachable on.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// Loopback plus the address of the interface holding the default route.
///
/// Connecting a UDP socket sends no packets; it only selects a route.
/// Other interfaces (secondary NICs, VPNs, container bridges) are not
/// reported, and neither is IPv6 unless it carries the default route.
pub fn local_addresses() -> Vec<IpAddr> {
    let mut addresses = vec![IpAddr::V4(Ipv4Addr::LOCALHOST)];
    if let Some(ip) = outbound_address() {
        if !addresses.contains(&ip) {
            addresses.push(ip);
        }
    }
    addresses
}

fn outbound_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).ok()?;
    socket.connect(SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 9))).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_includes_loopback() {
        let addresses = local_addresses();
        assert_eq!(addresses[0], IpAddr::V4(Ipv4Addr::LOCALHOST));
        let mut deduped = addresses.clone();
        deduped.dedup();
        assert_eq!(deduped, addresses);
    }
}
