//! Human-readable prefix formatting for logs and reports.

use std::net::{Ipv4Addr, Ipv6Addr};

pub(crate) const IPV4_BITS: usize = 32;
pub(crate) const IPV6_BITS: usize = 128;

/// A key is shown as IPv4 when it is 4 bytes wide, or when everything past the
/// first 4 bytes is zero (an IPv4 address stored in a wider tree).
pub fn is_ipv4(addr: &[u8]) -> bool {
    addr.len() == 4 || (addr.len() >= 4 && addr[4..].iter().all(|b| *b == 0))
}

/// Formats `addr` as dotted quad or IPv6 text, with a `/depth` suffix when the
/// prefix is shorter than the full address.
///
/// # Examples
///
/// ```
/// use iptree::format_prefix;
///
/// assert_eq!(format_prefix(&[10, 1, 0, 0], 16), "10.1.0.0/16");
/// assert_eq!(format_prefix(&[10, 1, 2, 3], 32), "10.1.2.3");
///
/// let mut v6 = [0u8; 16];
/// v6[0] = 0x20;
/// v6[1] = 0x01;
/// v6[2] = 0x0d;
/// v6[3] = 0xb8;
/// v6[15] = 1;
/// assert_eq!(format_prefix(&v6, 128), "2001:db8::1");
/// ```
pub fn format_prefix(addr: &[u8], depth: usize) -> String {
    if is_ipv4(addr) {
        let ip = Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]);
        with_suffix(ip.to_string(), depth, IPV4_BITS)
    } else {
        let mut octets = [0u8; 16];
        let len = addr.len().min(16);
        octets[..len].copy_from_slice(&addr[..len]);
        with_suffix(Ipv6Addr::from(octets).to_string(), depth, IPV6_BITS)
    }
}

fn with_suffix(mut text: String, depth: usize, full: usize) -> String {
    if depth < full {
        text.push('/');
        text.push_str(&depth.to_string());
    }
    text
}
