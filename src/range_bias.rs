//! Range bias correction as described in APS011
//!
//! The DW1000 reports a time of arrival that depends slightly on the strength
//! of the received signal. The tables below give that bias over the receive
//! power, sampled every 2 dBm from -61 dBm down to -95 dBm.

use crate::{
    configs::{PulseFrequency, UwbChannel},
    time::Timestamp,
};


/// Ticks of the DW1000 timer per meter of radio propagation
const DISTANCE_OF_RADIO_INV: f32 = 213.139451293;

/// The range bias table for PRF 16Mhz and a bandwidth of 500Mhz, in mm
///
/// Entries before `BIAS_500_16_ZERO` are negative.
const BIAS_500_16: [i32; 18] = [
    198, 187, 179, 163, 143, 127, 109, 84, 59, 31, 0, 36, 65, 84, 97, 106, 110, 112,
];
const BIAS_500_16_ZERO: usize = 10;

/// The range bias table for PRF 64Mhz and a bandwidth of 500Mhz, in mm
///
/// Entries before `BIAS_500_64_ZERO` are negative.
const BIAS_500_64: [i32; 18] = [
    110, 105, 100, 93, 82, 69, 51, 27, 0, 21, 35, 42, 49, 62, 71, 76, 81, 86,
];
const BIAS_500_64_ZERO: usize = 8;

/// The range bias table for PRF 16Mhz and a bandwidth of 900Mhz, in 2 mm steps
///
/// Entries before `BIAS_900_16_ZERO` are negative.
const BIAS_900_16: [i32; 18] = [
    137, 122, 105, 88, 69, 47, 25, 0, 21, 48, 79, 105, 127, 147, 160, 169, 178, 197,
];
const BIAS_900_16_ZERO: usize = 7;

/// The range bias table for PRF 64Mhz and a bandwidth of 900Mhz, in 2 mm steps
///
/// Entries before `BIAS_900_64_ZERO` are negative.
const BIAS_900_64: [i32; 18] = [
    147, 133, 117, 99, 75, 50, 29, 0, 24, 45, 63, 76, 87, 98, 116, 122, 132, 142,
];
const BIAS_900_64_ZERO: usize = 7;

const LAST_INDEX: usize = 17;


/// Get the range bias for a receive power, in mm
///
/// Returns `None`, if `rx_power` is not a finite number.
pub fn get_range_bias_mm(
    rx_power: f32,
    channel: UwbChannel,
    prf: PulseFrequency,
) -> Option<f32> {
    // Distance from -61 dBm, in 2 dBm steps
    let index = -(rx_power + 61.0) * 0.5;
    if !index.is_finite() {
        return None;
    }

    let (low, high) = match index as i32 {
        low if low <= 0 => (0, 0),
        low if low as usize + 1 >= LAST_INDEX => (LAST_INDEX, LAST_INDEX),
        low => (low as usize, low as usize + 1),
    };

    let (table, zero, scale) = match (channel.is_wide_band(), prf) {
        (false, PulseFrequency::Mhz16) => (&BIAS_500_16, BIAS_500_16_ZERO, 1),
        (false, PulseFrequency::Mhz64) => (&BIAS_500_64, BIAS_500_64_ZERO, 1),
        (true, PulseFrequency::Mhz16) => (&BIAS_900_16, BIAS_900_16_ZERO, 2),
        (true, PulseFrequency::Mhz64) => (&BIAS_900_64, BIAS_900_64_ZERO, 2),
    };
    let bias = |i: usize| {
        let value = table[i] * scale;
        if i < zero { -value } else { value }
    };

    let low_bias = bias(low) as f32;
    let high_bias = bias(high) as f32;

    Some(low_bias + (index - low as f32) * (high_bias - low_bias))
}

/// Corrects a receive time stamp for the range bias
///
/// `rx_power` is the estimated receive power of the frame, in dBm. The
/// antenna delay should already have been removed from `timestamp`.
pub fn correct_timestamp(
    timestamp: Timestamp,
    rx_power: f32,
    channel: UwbChannel,
    prf: PulseFrequency,
) -> Timestamp {
    match get_range_bias_mm(rx_power, channel, prf) {
        Some(bias) => {
            let ticks = (bias * DISTANCE_OF_RADIO_INV * 0.001) as i32;
            timestamp.wrapping_add_signed(ticks as i64)
        }
        None => timestamp,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const TS: u64 = 0x10_0000_0000;

    fn corrected(rx_power: f32, channel: UwbChannel, prf: PulseFrequency) -> i64 {
        let timestamp = Timestamp::new(TS).unwrap();
        correct_timestamp(timestamp, rx_power, channel, prf).value() as i64 - TS as i64
    }

    #[test]
    fn no_bias_at_the_zero_point() {
        assert_eq!(
            get_range_bias_mm(-81.0, UwbChannel::Channel5, PulseFrequency::Mhz16),
            Some(0.0)
        );
        assert_eq!(corrected(-81.0, UwbChannel::Channel5, PulseFrequency::Mhz16), 0);
    }

    #[test]
    fn strong_signals_move_the_time_stamp_back() {
        assert_eq!(
            get_range_bias_mm(-61.0, UwbChannel::Channel5, PulseFrequency::Mhz16),
            Some(-198.0)
        );
        assert_eq!(corrected(-61.0, UwbChannel::Channel5, PulseFrequency::Mhz16), -42);
    }

    #[test]
    fn bias_is_interpolated_between_table_entries() {
        assert_eq!(
            get_range_bias_mm(-82.0, UwbChannel::Channel5, PulseFrequency::Mhz16),
            Some(18.0)
        );
        assert_eq!(corrected(-82.0, UwbChannel::Channel5, PulseFrequency::Mhz16), 3);
    }

    #[test]
    fn wide_band_tables_are_in_two_millimeter_steps() {
        assert_eq!(
            get_range_bias_mm(-82.0, UwbChannel::Channel4, PulseFrequency::Mhz16),
            Some(184.0)
        );
        assert_eq!(corrected(-82.0, UwbChannel::Channel7, PulseFrequency::Mhz16), 39);
    }

    #[test]
    fn weak_signals_are_clamped_to_the_last_entry() {
        assert_eq!(
            get_range_bias_mm(-200.0, UwbChannel::Channel5, PulseFrequency::Mhz16),
            Some(112.0)
        );
        assert_eq!(
            get_range_bias_mm(-200.0, UwbChannel::Channel5, PulseFrequency::Mhz64),
            Some(86.0)
        );
    }

    #[test]
    fn non_finite_power_leaves_the_time_stamp_alone() {
        assert_eq!(corrected(f32::NEG_INFINITY, UwbChannel::Channel5, PulseFrequency::Mhz16), 0);
        assert_eq!(corrected(f32::NAN, UwbChannel::Channel5, PulseFrequency::Mhz64), 0);
    }

    #[test]
    fn correction_wraps_around() {
        let corrected = correct_timestamp(
            Timestamp::ZERO,
            -61.0,
            UwbChannel::Channel5,
            PulseFrequency::Mhz16,
        );
        assert_eq!(corrected, Timestamp::from_value_truncated(0u64.wrapping_sub(42)));
    }
}
