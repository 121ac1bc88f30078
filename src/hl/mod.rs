//! High-level interface to the DW1000
//!
//! The entry point to this API is the [DW1000] struct. Please refer to the
//! documentation there for more details.
//!
//! This module implements a high-level interface to the DW1000. This is the
//! recommended way to access the DW1000 using this crate, unless you need the
//! greater flexibility provided by the [register-level interface].
//!
//! [register-level interface]: ../ll/index.html

use crate::{configs::Settings, ll, ll::Transport};
use core::fmt;

pub use error::*;
pub use interrupts::*;

mod configuration;
mod error;
mod interrupts;
mod ready;
mod receiving;
mod sending;
mod uninitialized;


/// Entry point to the DW1000 driver API
///
/// The driver keeps a copy of the DW1000's configuration registers in memory.
/// Setters only change that copy. [`DW1000::commit_configuration`] then writes
/// every changed register at once, so related fields can be changed together.
/// A typical configuration looks like this:
///
/// ``` rust
/// # use dw1000_core::{configs::Mode, ll::{SpiSpeed, Transport}, DW1000};
/// # struct Board;
/// # impl Transport for Board {
/// #     type Error = ();
/// #     fn read(&mut self, _: &[u8], data: &mut [u8]) -> Result<(), ()> {
/// #         let n = data.len().min(4);
/// #         data[..n].copy_from_slice(&[0x30, 0x01, 0xca, 0xde][..n]);
/// #         Ok(())
/// #     }
/// #     fn write(&mut self, _: &[u8], _: &[u8]) -> Result<(), ()> { Ok(()) }
/// #     fn set_speed(&mut self, _: SpiSpeed) -> Result<(), ()> { Ok(()) }
/// #     fn delay_ms(&mut self, _: u32) {}
/// # }
/// # let mut board = Board;
/// let mut dw1000 = DW1000::new(&mut board);
/// dw1000.configure()?;
///
/// dw1000.new_configuration()?;
/// dw1000.set_defaults()?;
/// dw1000.apply_mode(Mode::SHORTDATA_FAST_ACCURACY)?;
/// dw1000.interrupt_on_received(true);
/// dw1000.commit_configuration()?;
///
/// dw1000.new_receive()?;
/// dw1000.start_receive()?;
/// # Ok::<(), dw1000_core::Error<Board>>(())
/// ```
///
/// From here on, the board's interrupt handler calls
/// [`DW1000::handle_interrupt`], which dispatches to the handlers attached
/// with the `attach_*_handler` methods.
pub struct DW1000<'a, 'h, T: Transport + ?Sized> {
    ll:       ll::DW1000<'a, T>,
    state:    State,
    regs:     Mirrors,
    dirty:    u8,
    settings: Settings,
    handlers: interrupts::Handlers<'a, 'h, T>,
    // Counts lifecycle operations, so dispatch can tell if a handler ran one
    epoch:    u32,
}

/// The state of the driver's transmit/receive lifecycle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Neither transmitting nor receiving
    Idle,
    /// A configuration batch has been started, but not committed yet
    Configuring,
    /// Prepared to receive a single frame, or waiting for it
    ReceiveArmed,
    /// Receiving continuously, re-arming after every frame
    ReceivePermanent,
    /// Prepared to transmit a frame, or transmitting it
    TransmitArmed,
}

impl State {
    fn is_receiving(self) -> bool {
        matches!(self, State::ReceiveArmed | State::ReceivePermanent)
    }

    fn is_idle(self) -> bool {
        matches!(self, State::Idle | State::Configuring)
    }
}

/// In-memory copies of the DW1000's configuration registers
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Mirrors {
    pub sys_ctrl:   [u8; ll::SYS_CTRL.len],
    pub panadr:     [u8; ll::PANADR.len],
    pub sys_cfg:    [u8; ll::SYS_CFG.len],
    pub sys_mask:   [u8; ll::SYS_MASK.len],
    pub chan_ctrl:  [u8; ll::CHAN_CTRL.len],
    pub sys_status: [u8; ll::SYS_STATUS.len],
    pub tx_fctrl:   [u8; ll::TX_FCTRL.len],
}

/// Flags for the mirrors that changed since the last commit
pub(crate) mod dirty {
    pub const PANADR:    u8 = 0b00001;
    pub const SYS_CFG:   u8 = 0b00010;
    pub const CHAN_CTRL: u8 = 0b00100;
    pub const TX_FCTRL:  u8 = 0b01000;
    pub const SYS_MASK:  u8 = 0b10000;
}

impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    /// Get the low-level interface to the DW1000
    pub fn ll(&mut self) -> &mut ll::DW1000<'a, T> {
        &mut self.ll
    }

    /// The current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// The current scalar configuration
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn set_state(&mut self, state: State) {
        self.bump_epoch();
        if self.state != state {
            log::trace!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn mark_dirty(&mut self, flags: u8) {
        self.dirty |= flags;
    }
}

// Can't be derived without putting requirements on `T`.
impl<'a, 'h, T> fmt::Debug for DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DW1000 {{ state: ")?;
        self.state.fmt(f)?;
        write!(f, ", .. }}")?;

        Ok(())
    }
}
