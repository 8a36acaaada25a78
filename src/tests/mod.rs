mod prune;

/// IPv4 key for a host-order address.
pub(crate) fn v4(addr: u32) -> [u8; 4] {
    addr.to_be_bytes()
}
