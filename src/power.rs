//! Receive signal power estimation
//!
//! Implements the first path and receive power estimates from section 4.7 of
//! the DW1000 user manual, including the correction from figure 22 for strong
//! signals. The functions here are pure; [`DW1000`] reads the register fields
//! and calls them.
//!
//! [`DW1000`]: ../hl/struct.DW1000.html

use crate::configs::PulseFrequency;


/// The power level above which the estimates become non-linear, in dBm
const LINEAR_LIMIT: f32 = -88.0;

/// The constant `A` from the power estimation formulas, in dB
fn constant_a(prf: PulseFrequency) -> f32 {
    match prf {
        PulseFrequency::Mhz16 => 113.77,
        PulseFrequency::Mhz64 => 121.74,
    }
}

/// Slope of the linear approximation of figure 22 above `LINEAR_LIMIT`
fn correction_factor(prf: PulseFrequency) -> f32 {
    match prf {
        PulseFrequency::Mhz16 => 2.3334,
        PulseFrequency::Mhz64 => 1.1667,
    }
}

fn correct(estimate: f32, prf: PulseFrequency) -> f32 {
    if estimate > LINEAR_LIMIT {
        estimate + (estimate - LINEAR_LIMIT) * correction_factor(prf)
    }
    else {
        estimate
    }
}

/// Extracts the preamble accumulation count (RXPACC) from RX_FINFO
///
/// RXPACC occupies bits 20 to 31 of the register.
pub fn preamble_accumulation_count(rx_finfo: [u8; 4]) -> u16 {
    (rx_finfo[2] >> 4) as u16 | (rx_finfo[3] as u16) << 4
}

/// Estimates the power in the first path, in dBm
///
/// `f1` to `f3` are the FP_AMPL1, FP_AMPL2 and FP_AMPL3 register fields,
/// `n` the preamble accumulation count.
pub fn first_path_power(f1: u16, f2: u16, f3: u16, n: u16, prf: PulseFrequency) -> f32 {
    #[allow(unused_imports)]
    // Not used on x86, but used on mcu target due to f32 core lib sillyness.
    use micromath::F32Ext;

    let f1 = f1 as f32;
    let f2 = f2 as f32;
    let f3 = f3 as f32;
    let n = n as f32;

    let estimate = 10.0 * ((f1 * f1 + f2 * f2 + f3 * f3) / (n * n)).log10() - constant_a(prf);
    correct(estimate, prf)
}

/// Estimates the total receive power, in dBm
///
/// `cir_power` is the CIR_PWR register field, `n` the preamble accumulation
/// count.
pub fn receive_power(cir_power: u16, n: u16, prf: PulseFrequency) -> f32 {
    #[allow(unused_imports)]
    use micromath::F32Ext;

    let c = cir_power as f32;
    let n = n as f32;
    let two_17 = (1u32 << 17) as f32;

    let estimate = 10.0 * (c * two_17 / (n * n)).log10() - constant_a(prf);
    correct(estimate, prf)
}

/// The ratio of the second first path amplitude point to the noise
///
/// Higher is better. Zero noise yields infinity.
pub fn receive_quality(fp_ampl2: u16, std_noise: u16) -> f32 {
    fp_ampl2 as f32 / std_noise as f32
}
