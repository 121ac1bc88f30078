//! Bit-level helpers for working with register mirrors
//!
//! All registers are little-endian on the wire: bit 0 is the least
//! significant bit of the first byte, bit 8 the least significant bit of the
//! second byte, and so on.


/// Returns whether bit `bit` of `data` is set
///
/// # Panics
///
/// Panics, if `bit` doesn't address a bit within `data`.
pub fn get_bit(data: &[u8], bit: usize) -> bool {
    data[bit / 8] & (1 << (bit % 8)) != 0
}

/// Sets or clears bit `bit` of `data`
///
/// # Panics
///
/// Panics, if `bit` doesn't address a bit within `data`.
pub fn set_bit(data: &mut [u8], bit: usize, value: bool) {
    let mask = 1 << (bit % 8);

    if value {
        data[bit / 8] |= mask;
    }
    else {
        data[bit / 8] &= !mask;
    }
}

/// Writes the low `width` bits of `value` into `data`, starting at bit `first`
///
/// The other bits of `data` are left untouched.
pub fn set_bits(data: &mut [u8], first: usize, width: usize, value: u32) {
    for i in 0..width {
        set_bit(data, first + i, value >> i & 1 != 0);
    }
}

/// Writes the low `len` bytes of `value` into `data`, little-endian
///
/// Negative values are written as their two's complement, so `-1` fills all
/// `len` bytes with `0xff`. Bytes of `data` past `len` are left untouched.
/// At most 8 bytes are written.
pub fn write_value_to_bytes(data: &mut [u8], value: i64, len: usize) {
    let bytes = value.to_le_bytes();
    let len = len.min(bytes.len()).min(data.len());

    data[..len].copy_from_slice(&bytes[..len]);
}

/// Reads up to 8 bytes from `data` as a little-endian unsigned value
pub fn read_value_from_bytes(data: &[u8]) -> u64 {
    data.iter()
        .take(8)
        .rev()
        .fold(0, |value, &byte| value << 8 | byte as u64)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_bit_addresses_bits_across_bytes() {
        assert!(get_bit(&[0x01], 0));
        assert!(!get_bit(&[0x00], 0));
        assert!(get_bit(&[0x80], 7));
        assert!(get_bit(&[0x00, 0x01], 8));
        assert!(get_bit(&[0x00, 0x02], 9));
        assert!(!get_bit(&[0xff, 0x00], 8));
    }

    #[test]
    fn set_bit_modifies_only_the_addressed_bit() {
        let mut data = [0x00];
        set_bit(&mut data, 0, true);
        assert_eq!(data, [0x01]);

        let mut data = [0xff];
        set_bit(&mut data, 0, false);
        assert_eq!(data, [0xfe]);

        let mut data = [0x00];
        set_bit(&mut data, 7, true);
        assert_eq!(data, [0x80]);

        let mut data = [0x00, 0x00];
        set_bit(&mut data, 8, true);
        assert_eq!(data, [0x00, 0x01]);

        let mut data = [0x00, 0x00];
        set_bit(&mut data, 9, true);
        assert_eq!(data, [0x00, 0x02]);
    }

    #[test]
    fn set_then_get_returns_the_written_value_for_every_bit() {
        for bit in 0..40 {
            let mut data = [0x00; 5];
            set_bit(&mut data, bit, true);
            assert!(get_bit(&data, bit));
            assert_eq!(data.iter().map(|b| b.count_ones()).sum::<u32>(), 1);

            let mut data = [0xff; 5];
            set_bit(&mut data, bit, false);
            assert!(!get_bit(&data, bit));
        }
    }

    #[test]
    fn write_value_to_bytes_writes_one_byte() {
        let mut data = [0x00];
        write_value_to_bytes(&mut data, 11, 1);
        assert_eq!(data, [11]);
    }

    #[test]
    fn write_value_to_bytes_leaves_bytes_past_len_untouched() {
        let mut data = [0x00, 0x00];
        write_value_to_bytes(&mut data, 0xff, 1);
        assert_eq!(data, [0xff, 0x00]);
    }

    #[test]
    fn write_value_to_bytes_writes_five_bytes() {
        let mut data = [0x00; 5];
        write_value_to_bytes(&mut data, 0x01020304, 5);
        assert_eq!(data, [0x04, 0x03, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn write_value_to_bytes_writes_negative_numbers_as_twos_complement() {
        let mut data = [0x00; 5];
        write_value_to_bytes(&mut data, -1, 5);
        assert_eq!(data, [0xff; 5]);
    }

    #[test]
    fn read_value_from_bytes_is_little_endian() {
        assert_eq!(read_value_from_bytes(&[0x04, 0x03, 0x02, 0x01, 0x00]), 0x01020304);
        assert_eq!(read_value_from_bytes(&[0xff; 5]), 0xff_ffff_ffff);
        assert_eq!(read_value_from_bytes(&[]), 0);
    }

    #[test]
    fn set_bits_writes_a_field_across_a_byte_boundary() {
        let mut data = [0xff, 0x00];
        set_bits(&mut data, 6, 4, 0b0110);
        assert_eq!(data, [0xbf, 0x01]);

        set_bits(&mut data, 6, 4, 0);
        assert_eq!(data, [0x3f, 0x00]);
    }
}
