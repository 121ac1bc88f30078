use super::State;
use crate::{
    ll::{self, Transport},
    time::Timestamp,
    util::{get_bit, set_bit, set_bits},
    Error,
    DW1000,
};


/// The largest frame without the extended frame length, including the CRC
pub const MAX_FRAME_LEN: usize = 127;
/// The largest frame with the extended frame length, including the CRC
pub const MAX_EXTENDED_FRAME_LEN: usize = 1023;
/// Length of the CRC the DW1000 appends to each frame
pub const CRC_LEN: usize = 2;

impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    /// Turns the transceiver off
    pub fn idle(&mut self) -> Result<(), Error<T>> {
        self.regs.sys_ctrl = [0; ll::SYS_CTRL.len];
        set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::TRXOFF, true);
        self.set_state(State::Idle);

        self.ll.write(ll::SYS_CTRL, &self.regs.sys_ctrl)?;
        Ok(())
    }

    /// Prepares a transmission
    ///
    /// Follow this with [`DW1000::set_data`], optionally
    /// [`DW1000::set_delay`], and [`DW1000::start_transmit`].
    pub fn new_transmit(&mut self) -> Result<(), Error<T>> {
        self.idle()?;
        self.regs.sys_ctrl = [0; ll::SYS_CTRL.len];
        self.clear_transmit_status()?;
        self.set_state(State::TransmitArmed);

        Ok(())
    }

    /// Starts the prepared transmission
    ///
    /// With permanent receive, the receiver is armed right away. With wait
    /// for response, the DW1000 turns on the receiver after sending.
    pub fn start_transmit(&mut self) -> Result<(), Error<T>> {
        self.bump_epoch();
        self.write_transmit_frame_control()?;

        set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::SFCST, !self.settings.frame_check);
        set_bit(
            &mut self.regs.sys_ctrl,
            ll::sys_ctrl::WAIT4RESP,
            self.settings.wait_for_response,
        );
        set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::TXSTRT, true);
        self.ll.write(ll::SYS_CTRL, &self.regs.sys_ctrl)?;

        if self.settings.permanent_receive {
            self.regs.sys_ctrl = [0; ll::SYS_CTRL.len];
            self.set_state(State::ReceivePermanent);
            self.start_receive()?;
        }
        else if self.settings.wait_for_response {
            self.set_state(State::ReceiveArmed);
        }

        Ok(())
    }

    /// Writes the frame to the TX buffer
    ///
    /// With frame check on, the DW1000 appends a 2-byte CRC, which counts
    /// towards the maximum length.
    pub fn set_data(&mut self, data: &[u8]) -> Result<(), Error<T>> {
        let len = if self.settings.frame_check {
            data.len() + CRC_LEN
        }
        else {
            data.len()
        };
        let max = if self.settings.extended_frame_length {
            MAX_EXTENDED_FRAME_LEN
        }
        else {
            MAX_FRAME_LEN
        };
        if len > max {
            return Err(Error::FrameTooLong { len, max });
        }

        self.ll.write(ll::TX_BUFFER, data)?;
        set_bits(&mut self.regs.tx_fctrl, 0, 10, len as u32);

        Ok(())
    }

    /// Schedules the armed transmission or reception `delay` from now
    ///
    /// Returns the time at which the frame will be sent or the receiver will
    /// be turned on, including the antenna delay. The DW1000 ignores the
    /// lowest 9 bits of the scheduled time, so the result is rounded down
    /// accordingly. Returns `None` without scheduling anything, if neither a
    /// transmission nor a reception is armed.
    pub fn set_delay(&mut self, delay: Timestamp) -> Result<Option<Timestamp>, Error<T>> {
        let bit = match self.delayed_start_bit() {
            Some(bit) => bit,
            None => return Ok(None),
        };
        set_bit(&mut self.regs.sys_ctrl, bit, true);

        let target = self.system_timestamp()? + delay;
        let scheduled = self.write_delayed_time(target)?;

        Ok(Some(scheduled + self.settings.antenna_delay))
    }

    /// Schedules the armed transmission or reception at `time`
    ///
    /// Like [`DW1000::set_delay`], but with an absolute system time. Does
    /// nothing, if neither a transmission nor a reception is armed.
    pub fn set_tx_rx_time(&mut self, time: Timestamp) -> Result<(), Error<T>> {
        if let Some(bit) = self.delayed_start_bit() {
            set_bit(&mut self.regs.sys_ctrl, bit, true);
            self.write_delayed_time(time)?;
        }

        Ok(())
    }

    fn delayed_start_bit(&self) -> Option<usize> {
        match self.state {
            State::TransmitArmed => Some(ll::sys_ctrl::TXDLYS),
            State::ReceiveArmed | State::ReceivePermanent => Some(ll::sys_ctrl::RXDLYE),
            _ => {
                log::warn!("Nothing to delay in state {:?}", self.state);
                None
            }
        }
    }

    fn write_delayed_time(&mut self, time: Timestamp) -> Result<Timestamp, Error<T>> {
        let mut bytes = time.to_bytes();
        bytes[0] = 0;
        bytes[1] &= 0xFE;

        self.ll.write(ll::DX_TIME, &bytes)?;
        Ok(Timestamp::from_bytes(bytes))
    }

    /// The time the last frame was sent, including the antenna delay
    pub fn transmit_timestamp(&mut self) -> Result<Timestamp, Error<T>> {
        let mut bytes = [0; ll::TX_STAMP.len];
        self.ll.read(ll::TX_STAMP, &mut bytes)?;
        Ok(Timestamp::from_bytes(bytes))
    }

    /// The current system time
    pub fn system_timestamp(&mut self) -> Result<Timestamp, Error<T>> {
        let mut bytes = [0; ll::SYS_TIME.len];
        self.ll.read(ll::SYS_TIME, &mut bytes)?;
        Ok(Timestamp::from_bytes(bytes))
    }

    /// Whether the SYS_STATUS mirror shows the frame as sent
    pub fn is_transmit_done(&self) -> bool {
        get_bit(&self.regs.sys_status, ll::sys_status::TXFRS)
    }

    /// Clears the transmit events in SYS_STATUS
    pub fn clear_transmit_status(&mut self) -> Result<(), Error<T>> {
        self.clear_status_bits(&[
            ll::sys_status::AAT,
            ll::sys_status::TXFRB,
            ll::sys_status::TXPRS,
            ll::sys_status::TXPHS,
            ll::sys_status::TXFRS,
        ])
    }

    /// Wait for the transmission to finish
    ///
    /// This method returns an `nb::Result` to indicate whether the transmission
    /// has finished, or whether it is still ongoing. You can use this to busily
    /// wait for the transmission to finish, for example using `nb`'s `block!`
    /// macro, or you can use the interrupt handlers instead.
    ///
    /// Returns the transmit time stamp.
    pub fn wait_transmit(&mut self) -> nb::Result<Timestamp, Error<T>> {
        self.read_system_event_status().map_err(nb::Error::Other)?;

        if !self.is_transmit_done() {
            return Err(nb::Error::WouldBlock);
        }

        self.clear_transmit_status().map_err(nb::Error::Other)?;
        self.transmit_finished();

        Ok(self.transmit_timestamp()?)
    }

    pub(super) fn transmit_finished(&mut self) {
        if self.state != State::TransmitArmed {
            return;
        }

        let next = if self.settings.permanent_receive {
            State::ReceivePermanent
        }
        else if self.settings.wait_for_response {
            State::ReceiveArmed
        }
        else {
            State::Idle
        };
        self.set_state(next);
    }

    pub(super) fn clear_status_bits(&mut self, bits: &[usize]) -> Result<(), Error<T>> {
        let mut status = [0; ll::SYS_STATUS.len];
        for &bit in bits {
            set_bit(&mut status, bit, true);
        }

        self.ll.write(ll::SYS_STATUS, &status)?;
        Ok(())
    }
}
