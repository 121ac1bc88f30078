//! Time-related types based on the DW1000's system time


use core::{
    fmt,
    ops::{Add, Sub},
};
use serde::{Deserialize, Serialize};


/// The maximum value of 40-bit system time stamps.
pub const TIME_MAX: u64 = 0xffffffffff;

/// Timer ticks per second (63.8976 GHz)
pub const TICKS_PER_SECOND: u64 = 63_897_600_000;


/// A 40-bit DW1000 time value
///
/// Used both for points in time (time stamps read from the TX, RX and system
/// time registers) and for the distances between them (delays, antenna
/// delay). One tick is roughly 15.65 ps.
///
/// The value is stored as the 5 little-endian bytes the DW1000 uses on the
/// wire. The 64-bit and split views are conversions of those bytes, never
/// separate state.
///
/// All arithmetic wraps around at 2^40, just like the DW1000's counters do.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp([u8; 5]);

impl Timestamp {
    /// The zero time stamp
    pub const ZERO: Timestamp = Timestamp([0; 5]);

    /// Creates a new instance of `Timestamp`
    ///
    /// The given value must fit in a 40-bit timestamp, so:
    /// 0 <= `value` <= 2^40 - 1
    ///
    /// Returns `Some(...)`, if `value` is within the valid range, `None` if it
    /// isn't.
    ///
    /// # Example
    ///
    /// ``` rust
    /// use dw1000_core::time::{
    ///     TIME_MAX,
    ///     Timestamp,
    /// };
    ///
    /// assert!(Timestamp::new(TIME_MAX).is_some());
    /// assert!(Timestamp::new(TIME_MAX + 1).is_none());
    /// ```
    pub fn new(value: u64) -> Option<Self> {
        if value <= TIME_MAX {
            Some(Self::from_value_truncated(value))
        }
        else {
            None
        }
    }

    /// Creates a `Timestamp` from the low 40 bits of `value`
    pub fn from_value_truncated(value: u64) -> Self {
        let mut bytes = [0; 5];
        bytes.copy_from_slice(&value.to_le_bytes()[..5]);
        Timestamp(bytes)
    }

    /// Creates a `Timestamp` from the bytes of a time stamp register
    pub const fn from_bytes(bytes: [u8; 5]) -> Self {
        Timestamp(bytes)
    }

    /// Creates a `Timestamp` from its low 32 and high 8 bits
    pub fn from_low32_high8(low32: u32, high8: u8) -> Self {
        let mut bytes = [0; 5];
        bytes[..4].copy_from_slice(&low32.to_le_bytes());
        bytes[4] = high8;
        Timestamp(bytes)
    }

    /// Creates a `Timestamp` from its low 8 and high 32 bits
    pub fn from_low8_high32(low8: u8, high32: u32) -> Self {
        let mut bytes = [0; 5];
        bytes[0] = low8;
        bytes[1..].copy_from_slice(&high32.to_le_bytes());
        Timestamp(bytes)
    }

    /// Converts a number of nanoseconds into timer ticks, rounded to the
    /// nearest tick
    ///
    /// Returns `None`, if the result doesn't fit into 40 bits.
    pub fn from_nanos(nanos: u32) -> Option<Self> {
        // `nanos * 63.8976`, in integer arithmetic
        Self::new((nanos as u64 * 638_976 + 5_000) / 10_000)
    }

    /// The 5 little-endian bytes, as they are written to the DW1000
    pub fn to_bytes(self) -> [u8; 5] {
        self.0
    }

    /// Returns the raw 40-bit timestamp
    ///
    /// The returned value is guaranteed to be in the following range:
    /// 0 <= `value` <= 2^40 - 1
    pub fn value(&self) -> u64 {
        let mut bytes = [0; 8];
        bytes[..5].copy_from_slice(&self.0);
        u64::from_le_bytes(bytes)
    }

    /// The lower 32 bits
    pub fn low32(&self) -> u32 {
        u32::from_le_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// The upper 8 bits
    pub fn high8(&self) -> u8 {
        self.0[4]
    }

    /// The lower 8 bits
    pub fn low8(&self) -> u8 {
        self.0[0]
    }

    /// The upper 32 bits
    pub fn high32(&self) -> u32 {
        u32::from_le_bytes([self.0[1], self.0[2], self.0[3], self.0[4]])
    }

    /// Adds `other`, wrapping around at 2^40
    pub fn wrapping_add(self, other: Timestamp) -> Self {
        Self::from_value_truncated(self.value().wrapping_add(other.value()))
    }

    /// Subtracts `other`, wrapping around at 2^40
    pub fn wrapping_sub(self, other: Timestamp) -> Self {
        Self::from_value_truncated(self.value().wrapping_sub(other.value()))
    }

    /// Adds a signed number of ticks, wrapping around at 2^40
    pub fn wrapping_add_signed(self, ticks: i64) -> Self {
        Self::from_value_truncated(self.value().wrapping_add(ticks as u64))
    }

    /// Returns the amount of time passed between the two time stamps
    ///
    /// Assumes that `&self` represents a later time than the argument
    /// `earlier`. Please make sure that this is the case, as this method has no
    /// way of knowing (DW1000 timestamps can overflow, so comparing the
    /// numerical value of the timestamp doesn't tell anything about order).
    pub fn duration_since(&self, earlier: Timestamp) -> Timestamp {
        self.wrapping_sub(earlier)
    }
}

impl Add for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Timestamp) -> Self::Output {
        self.wrapping_add(rhs)
    }
}

impl Sub for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        self.wrapping_sub(rhs)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Timestamp({:#012x})", self.value())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_share_one_bit_pattern() {
        let t = Timestamp::from_bytes([0x01, 0x02, 0x03, 0x04, 0x05]);

        assert_eq!(t.value(), 0x05_0403_0201);
        assert_eq!(t.low32(), 0x0403_0201);
        assert_eq!(t.high8(), 0x05);
        assert_eq!(t.low8(), 0x01);
        assert_eq!(t.high32(), 0x0504_0302);

        assert_eq!(Timestamp::from_low32_high8(0x0403_0201, 0x05), t);
        assert_eq!(Timestamp::from_low8_high32(0x01, 0x0504_0302), t);
        assert_eq!(Timestamp::new(0x05_0403_0201), Some(t));
        assert_eq!(t.to_bytes(), [0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[test]
    fn new_rejects_values_beyond_40_bits() {
        assert!(Timestamp::new(TIME_MAX).is_some());
        assert!(Timestamp::new(TIME_MAX + 1).is_none());
        assert_eq!(Timestamp::from_value_truncated(TIME_MAX + 2).value(), 1);
    }

    #[test]
    fn arithmetic_wraps_at_40_bits() {
        let max = Timestamp::new(TIME_MAX).unwrap();
        let one = Timestamp::new(1).unwrap();

        assert_eq!(max + one, Timestamp::ZERO);
        assert_eq!(Timestamp::ZERO - one, max);
        assert_eq!(one.wrapping_add_signed(-2), max);
        assert_eq!(max.wrapping_add_signed(2), one);
    }

    #[test]
    fn duration_since_handles_overflow() {
        let instant_1 = Timestamp::new(TIME_MAX - 50).unwrap();
        let instant_2 = Timestamp::new(TIME_MAX).unwrap();
        let instant_3 = Timestamp::new(49).unwrap();

        assert_eq!(instant_2.duration_since(instant_1).value(), 50);
        assert_eq!(instant_3.duration_since(instant_2).value(), 50);
    }

    #[test]
    fn from_nanos_rounds_to_the_nearest_tick() {
        assert_eq!(Timestamp::from_nanos(0).unwrap().value(), 0);
        assert_eq!(Timestamp::from_nanos(1).unwrap().value(), 64);
        assert_eq!(Timestamp::from_nanos(1_000_000).unwrap().value(), 63_897_600);
    }
}
