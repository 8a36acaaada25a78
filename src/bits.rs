//! Bit access on fixed-width keys, most-significant bit first.

/// Returns bit `i` of `addr`; bit 0 is the MSB of `addr[0]`.
#[inline]
pub fn bit(addr: &[u8], i: usize) -> bool {
    addr[i / 8] & (0x80 >> (i % 8)) != 0
}

/// Sets bit `i` of `addr` to 1.
#[inline]
pub fn set_bit(addr: &mut [u8], i: usize) {
    addr[i / 8] |= 0x80 >> (i % 8);
}

/// Interleaves `a` and `b` bit by bit: bit `i` of `a` lands at `2i` and bit `i`
/// of `b` at `2i + 1`. `out` must hold at least `2 * a.len()` bytes and is
/// expected to be zeroed.
pub fn interleave(a: &[u8], b: &[u8], out: &mut [u8]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert!(out.len() >= a.len() * 2);

    for i in 0..a.len() * 8 {
        if bit(a, i) {
            set_bit(out, i * 2);
        }
        if bit(b, i) {
            set_bit(out, i * 2 + 1);
        }
    }
}

/// Inverse of [`interleave`] over the first `bits` bits of `combined`.
pub fn deinterleave(combined: &[u8], bits: usize, a: &mut [u8], b: &mut [u8]) {
    for i in 0..bits / 2 {
        if bit(combined, i * 2) {
            set_bit(a, i);
        }
        if bit(combined, i * 2 + 1) {
            set_bit(b, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_first() {
        let addr = [0b1000_0000, 0b0000_0001];
        assert!(bit(&addr, 0));
        assert!(!bit(&addr, 1));
        assert!(!bit(&addr, 8));
        assert!(bit(&addr, 15));
    }

    #[test]
    fn set_then_read() {
        let mut addr = [0u8; 4];
        set_bit(&mut addr, 0);
        set_bit(&mut addr, 9);
        set_bit(&mut addr, 31);
        assert_eq!(addr, [0x80, 0x40, 0x00, 0x01]);
        for i in 0..32 {
            assert_eq!(bit(&addr, i), i == 0 || i == 9 || i == 31);
        }
    }

    #[test]
    fn interleave_places_bits() {
        let a = [0xff];
        let b = [0x00];
        let mut out = [0u8; 2];
        interleave(&a, &b, &mut out);
        assert_eq!(out, [0b1010_1010, 0b1010_1010]);

        let mut out = [0u8; 2];
        interleave(&b, &a, &mut out);
        assert_eq!(out, [0b0101_0101, 0b0101_0101]);
    }

    #[test]
    fn deinterleave_recovers_inputs() {
        let a = [10, 0, 0, 1];
        let b = [192, 168, 7, 254];
        let mut combined = [0u8; 8];
        interleave(&a, &b, &mut combined);

        let mut a2 = [0u8; 4];
        let mut b2 = [0u8; 4];
        deinterleave(&combined, 64, &mut a2, &mut b2);
        assert_eq!(a2, a);
        assert_eq!(b2, b);
    }
}
