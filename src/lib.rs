//! Driver core for the Decawave DW1000 UWB transceiver
//!
//! The driver talks to the chip through a [`Transport`], which boards
//! implement for their SPI bus, or get from [`SpiTransport`] on top of
//! `embedded-hal`. On top of that, [`ll`] provides register access, and
//! [`DW1000`] the high-level API: configuration, the transmit and receive
//! lifecycle, interrupt dispatch, time stamps and receive power estimates.


#![cfg_attr(not(test), no_std)]

#![deny(missing_docs)]


pub mod configs;
pub mod hl;
pub mod ll;
pub mod power;
pub mod range_bias;
pub mod spi;
pub mod time;
pub mod util;

#[cfg(test)]
mod mock;


pub use ieee802154::mac;

pub use crate::{
    configs::{
        Clock,
        DataRate,
        Mode,
        PreambleLength,
        PulseFrequency,
        Settings,
        UwbChannel,
    },
    hl::{
        str_error,
        Error,
        ErrorCode,
        Handler,
        State,
        DW1000,
    },
    ll::{SpiSpeed, Transport},
    spi::SpiTransport,
    time::{Timestamp, TIME_MAX},
};
