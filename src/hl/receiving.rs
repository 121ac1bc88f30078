use super::State;
use crate::{
    ll::{self, Transport},
    power,
    range_bias,
    time::Timestamp,
    util::{get_bit, read_value_from_bytes, set_bit},
    Error,
    DW1000,
};
use fixed::types::U10F6;


/// Receive events of a correctly received frame
const RECEIVED: [usize; 5] = [
    ll::sys_status::RXDFR,
    ll::sys_status::RXFCG,
    ll::sys_status::RXPRD,
    ll::sys_status::RXSFDD,
    ll::sys_status::RXPHD,
];

/// Receive error events
const FAILED: [usize; 4] = [
    ll::sys_status::LDEERR,
    ll::sys_status::RXFCE,
    ll::sys_status::RXPHE,
    ll::sys_status::RXRFSL,
];

/// Receive timeout events
const TIMEOUT: [usize; 3] = [
    ll::sys_status::RXRFTO,
    ll::sys_status::RXPTO,
    ll::sys_status::RXSFDTO,
];

/// Clock PLL events
const CLOCK_PROBLEM: [usize; 2] = [ll::sys_status::CLKPLL_LL, ll::sys_status::RFPLL_LL];

impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    /// Prepares a reception
    ///
    /// Clears all receive events. With double buffering, this also swaps the
    /// host side receive buffer on the next [`DW1000::start_receive`].
    pub fn new_receive(&mut self) -> Result<(), Error<T>> {
        self.idle()?;
        self.regs.sys_ctrl = [0; ll::SYS_CTRL.len];
        self.clear_receive_status()?;

        if self.is_double_buffering() {
            set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::HRBPT, true);
        }

        let state = if self.settings.permanent_receive {
            State::ReceivePermanent
        }
        else {
            State::ReceiveArmed
        };
        self.set_state(state);

        Ok(())
    }

    /// Turns on the receiver
    pub fn start_receive(&mut self) -> Result<(), Error<T>> {
        self.bump_epoch();
        set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::SFCST, !self.settings.frame_check);
        set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::RXENAB, true);

        self.ll.write(ll::SYS_CTRL, &self.regs.sys_ctrl)?;
        Ok(())
    }

    /// The length of the frame in the buffer, without the CRC
    ///
    /// While a transmission is armed, this is the length of the frame that
    /// will be sent. Otherwise it's the length of the last received frame,
    /// read from RX_FINFO. That includes the idle state, so a frame can be
    /// read after the driver went idle behind it. The length is 0 only if
    /// nothing was received since reset.
    pub fn get_data_length(&mut self) -> Result<usize, Error<T>> {
        let len = if self.state == State::TransmitArmed {
            read_value_from_bytes(&self.regs.tx_fctrl[..2]) & 0x3FF
        }
        else {
            let mut rx_finfo = [0; ll::RX_FINFO.len];
            self.ll.read(ll::RX_FINFO, &mut rx_finfo)?;
            read_value_from_bytes(&rx_finfo[..2]) & 0x3FF
        };

        let len = len as usize;
        if self.settings.frame_check && len > 2 {
            Ok(len - 2)
        }
        else {
            Ok(len)
        }
    }

    /// Reads the last received frame into `buffer`
    ///
    /// Returns the length of the frame.
    pub fn get_data(&mut self, buffer: &mut [u8]) -> Result<usize, Error<T>> {
        let len = self.get_data_length()?;
        if buffer.len() < len {
            return Err(Error::BufferTooSmall { required_len: len });
        }

        self.ll.read(ll::RX_BUFFER, &mut buffer[..len])?;
        Ok(len)
    }

    /// The receive time stamp, as reported by the DW1000
    pub fn raw_receive_timestamp(&mut self) -> Result<Timestamp, Error<T>> {
        let mut bytes = [0; ll::RX_STAMP.len];
        self.ll.read(ll::RX_STAMP, &mut bytes)?;
        Ok(Timestamp::from_bytes(bytes))
    }

    /// The receive time stamp, without the antenna delay
    pub fn receive_timestamp(&mut self) -> Result<Timestamp, Error<T>> {
        let raw = self.raw_receive_timestamp()?;
        Ok(raw - self.settings.antenna_delay)
    }

    /// Corrects a receive time stamp for the range bias of the last frame
    ///
    /// Apply this to the result of [`DW1000::receive_timestamp`].
    pub fn correct_timestamp(&mut self, timestamp: &mut Timestamp) -> Result<(), Error<T>> {
        let rx_power = self.receive_power()?;

        *timestamp = range_bias::correct_timestamp(
            *timestamp,
            rx_power,
            self.settings.channel,
            self.settings.pulse_frequency,
        );

        Ok(())
    }

    /// The index of the first path in the accumulator
    pub fn first_path_index(&mut self) -> Result<U10F6, Error<T>> {
        Ok(U10F6::from_bits(self.ll.read16(ll::FP_INDEX)?))
    }

    /// The ratio of the first path amplitude to the noise, higher is better
    pub fn receive_quality(&mut self) -> Result<f32, Error<T>> {
        let std_noise = self.ll.read16(ll::STD_NOISE)?;
        let fp_ampl2 = self.ll.read16(ll::FP_AMPL2)?;

        Ok(power::receive_quality(fp_ampl2, std_noise))
    }

    /// The estimated power of the first path of the last frame, in dBm
    pub fn first_path_power(&mut self) -> Result<f32, Error<T>> {
        let f1 = self.ll.read16(ll::FP_AMPL1)?;
        let f2 = self.ll.read16(ll::FP_AMPL2)?;
        let f3 = self.ll.read16(ll::FP_AMPL3)?;
        let n = self.preamble_accumulation_count()?;

        Ok(power::first_path_power(f1, f2, f3, n, self.settings.pulse_frequency))
    }

    /// The estimated receive power of the last frame, in dBm
    pub fn receive_power(&mut self) -> Result<f32, Error<T>> {
        let cir_power = self.ll.read16(ll::CIR_PWR)?;
        let n = self.preamble_accumulation_count()?;

        Ok(power::receive_power(cir_power, n, self.settings.pulse_frequency))
    }

    fn preamble_accumulation_count(&mut self) -> Result<u16, Error<T>> {
        let mut rx_finfo = [0; ll::RX_FINFO.len];
        self.ll.read(ll::RX_FINFO, &mut rx_finfo)?;
        Ok(power::preamble_accumulation_count(rx_finfo))
    }

    /// Whether the receive time stamp is available
    pub fn is_receive_timestamp_available(&self) -> bool {
        get_bit(&self.regs.sys_status, ll::sys_status::LDEDONE)
    }

    /// Whether a frame was received
    ///
    /// With frame check on, this requires a good CRC.
    pub fn is_receive_done(&self) -> bool {
        let bit = if self.settings.frame_check {
            ll::sys_status::RXFCG
        }
        else {
            ll::sys_status::RXDFR
        };
        get_bit(&self.regs.sys_status, bit)
    }

    /// Whether a frame was detected, but not received correctly
    pub fn is_receive_failed(&self) -> bool {
        self.any_status(&FAILED)
    }

    /// Whether the receiver timed out
    pub fn is_receive_timeout(&self) -> bool {
        self.any_status(&TIMEOUT)
    }

    /// Whether one of the PLLs is losing its lock
    pub fn is_clock_problem(&self) -> bool {
        self.any_status(&CLOCK_PROBLEM)
    }

    fn any_status(&self, bits: &[usize]) -> bool {
        bits.iter().any(|&bit| get_bit(&self.regs.sys_status, bit))
    }

    /// Clears the events of a received frame
    pub fn clear_received_status(&mut self) -> Result<(), Error<T>> {
        self.clear_status_bits(&RECEIVED)
    }

    /// Clears the receive error events
    pub fn clear_receive_failed_status(&mut self) -> Result<(), Error<T>> {
        self.clear_status_bits(&FAILED)
    }

    /// Clears the receive timeout events
    pub fn clear_receive_timeout_status(&mut self) -> Result<(), Error<T>> {
        self.clear_status_bits(&TIMEOUT)
    }

    /// Clears the LDE done event
    pub fn clear_receive_timestamp_available_status(&mut self) -> Result<(), Error<T>> {
        self.clear_status_bits(&[ll::sys_status::LDEDONE])
    }

    /// Clears the clock PLL events
    pub fn clear_clock_problem_status(&mut self) -> Result<(), Error<T>> {
        self.clear_status_bits(&CLOCK_PROBLEM)
    }

    /// Clears all receive events at once
    pub fn clear_receive_status(&mut self) -> Result<(), Error<T>> {
        let mut bits = [0; 13];
        bits[..5].copy_from_slice(&RECEIVED);
        bits[5..9].copy_from_slice(&FAILED);
        bits[9..12].copy_from_slice(&TIMEOUT);
        bits[12] = ll::sys_status::LDEDONE;

        self.clear_status_bits(&bits)
    }

    /// Clears every event in SYS_STATUS
    pub fn clear_all_status(&mut self) -> Result<(), Error<T>> {
        self.ll.write(ll::SYS_STATUS, &[0xFF; ll::SYS_STATUS.len])?;
        Ok(())
    }

    /// Wait for a frame
    ///
    /// This method returns an `nb::Result` to indicate whether a frame was
    /// received, or whether the receiver is still waiting. Returns the length
    /// of the frame, which can then be read with [`DW1000::get_data`].
    pub fn wait_receive(&mut self) -> nb::Result<usize, Error<T>> {
        self.read_system_event_status()?;

        if self.is_receive_failed() {
            self.clear_receive_failed_status()?;
            self.receive_finished()?;
            return Err(nb::Error::Other(Error::ReceiveFailed));
        }
        if self.is_receive_timeout() {
            self.clear_receive_timeout_status()?;
            self.receive_finished()?;
            return Err(nb::Error::Other(Error::ReceiveTimeout));
        }
        if !self.is_receive_done() {
            return Err(nb::Error::WouldBlock);
        }

        let len = self.get_data_length()?;
        self.clear_received_status()?;
        self.receive_finished()?;

        Ok(len)
    }

    /// Re-arms the receiver with permanent receive, goes idle otherwise
    pub(super) fn receive_finished(&mut self) -> Result<(), Error<T>> {
        if !self.state.is_receiving() {
            return Ok(());
        }

        if self.settings.permanent_receive {
            self.new_receive()?;
            self.start_receive()
        }
        else {
            self.set_state(State::Idle);
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configs::{PulseFrequency, UwbChannel},
        mock::{MockTransport, Op},
    };

    #[test]
    fn new_receive_clears_the_receive_events() {
        let mut transport = MockTransport::new();
        let state = {
            let mut dw1000 = DW1000::new(&mut transport);
            dw1000.set_double_buffering(false);
            dw1000.new_receive().unwrap();
            dw1000.start_receive().unwrap();
            dw1000.state()
        };

        assert_eq!(state, State::ReceiveArmed);
        assert_eq!(
            transport.take_ops(),
            [
                Op::write(ll::SYS_CTRL, &[0x40, 0x00, 0x00, 0x00]),
                Op::write(ll::SYS_STATUS, &[0x00, 0xFF, 0x27, 0x04, 0x00]),
                Op::write(ll::SYS_CTRL, &[0x00, 0x01, 0x00, 0x00]),
            ]
        );
    }

    #[test]
    fn double_buffering_toggles_the_buffer_pointer() {
        let mut transport = MockTransport::new();
        {
            let mut dw1000 = DW1000::new(&mut transport);
            dw1000.set_double_buffering(true);
            dw1000.suppress_frame_check(true);
            dw1000.receive_permanently(true).unwrap();
            dw1000.new_receive().unwrap();
            dw1000.start_receive().unwrap();
            assert_eq!(dw1000.state(), State::ReceivePermanent);
        }

        assert_eq!(
            transport.writes_to(ll::SYS_CTRL).last(),
            Some(&vec![0x01, 0x01, 0x00, 0x01])
        );
    }

    #[test]
    fn data_length_is_taken_from_the_frame_info() {
        let mut transport = MockTransport::new();
        transport
            .respond(&[0x0C, 0xFC, 0x00, 0x00])
            .respond(&[0x02, 0x00, 0x00, 0x00]);

        let mut dw1000 = DW1000::new(&mut transport);

        assert_eq!(dw1000.get_data_length().unwrap(), 0x0C - 2);
        assert_eq!(dw1000.get_data_length().unwrap(), 2);

        dw1000.suppress_frame_check(true);
        dw1000.new_transmit().unwrap();
        dw1000.set_data(&[0; 5]).unwrap();
        assert_eq!(dw1000.get_data_length().unwrap(), 5);
    }

    #[test]
    fn idle_data_length_is_the_last_received_frame() {
        let mut transport = MockTransport::new();
        transport.respond(&[0x0A, 0x00, 0x00, 0x00]);

        let mut dw1000 = DW1000::new(&mut transport);
        assert_eq!(dw1000.state(), State::Idle);

        assert_eq!(dw1000.get_data_length().unwrap(), 8);
        assert_eq!(dw1000.get_data_length().unwrap(), 0);
        assert_eq!(
            dw1000.ll().transport().take_ops(),
            [Op::read(ll::RX_FINFO), Op::read(ll::RX_FINFO)]
        );
    }

    #[test]
    fn get_data_checks_the_buffer() {
        let mut transport = MockTransport::new();
        transport
            .respond(&[0x07, 0x00, 0x00, 0x00])
            .respond(&[0x07, 0x00, 0x00, 0x00])
            .respond(&[0x01, 0x02, 0x03, 0x04, 0x05]);

        let mut dw1000 = DW1000::new(&mut transport);

        let mut small = [0; 4];
        match dw1000.get_data(&mut small) {
            Err(Error::BufferTooSmall { required_len: 5 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        let mut buffer = [0; 16];
        assert_eq!(dw1000.get_data(&mut buffer).unwrap(), 5);
        assert_eq!(buffer[..6], [0x01, 0x02, 0x03, 0x04, 0x05, 0x00]);
        assert_eq!(
            dw1000.ll().transport().take_ops().last(),
            Some(&Op::read_len(ll::RX_BUFFER, 5))
        );
    }

    #[test]
    fn receive_timestamp_subtracts_the_antenna_delay() {
        let mut transport = MockTransport::new();
        transport
            .respond(&[0x00, 0x50, 0x00, 0x00, 0x00])
            .respond(&[0x00, 0x10, 0x00, 0x00, 0x00]);

        let mut dw1000 = DW1000::new(&mut transport);

        assert_eq!(dw1000.raw_receive_timestamp().unwrap().value(), 0x5000);
        assert_eq!(
            dw1000.receive_timestamp().unwrap(),
            Timestamp::from_value_truncated(0x1000u64.wrapping_sub(16384)),
        );
    }

    #[test]
    fn amplitudes_are_read_before_the_frame_info() {
        let mut transport = MockTransport::new();
        transport
            .respond(&0x6251u16.to_le_bytes())
            .respond(&0x8473u16.to_le_bytes())
            .respond(&0xa695u16.to_le_bytes())
            .respond(&[0x00, 0x00, 0x01, 0xb0]);

        let mut dw1000 = DW1000::new(&mut transport);
        let power = dw1000.first_path_power().unwrap();

        assert!((power - -85.324951).abs() < 85.324951 * 1e-4);
        assert_eq!(
            dw1000.ll().transport().take_ops(),
            [
                Op::read(ll::FP_AMPL1),
                Op::read(ll::FP_AMPL2),
                Op::read(ll::FP_AMPL3),
                Op::read(ll::RX_FINFO),
            ]
        );
    }

    #[test]
    fn receive_power_uses_the_configured_prf() {
        let mut transport = MockTransport::new();
        transport
            .respond(&0x9173u16.to_le_bytes())
            .respond(&[0x00, 0x00, 0x02, 0x40]);

        let mut dw1000 = DW1000::new(&mut transport);
        dw1000.set_pulse_frequency(PulseFrequency::Mhz64);
        let power = dw1000.receive_power().unwrap();

        assert!((power - -81.632904).abs() < 81.632904 * 1e-4);
        assert_eq!(
            dw1000.ll().transport().take_ops(),
            [Op::read(ll::CIR_PWR), Op::read(ll::RX_FINFO)]
        );
    }

    #[test]
    fn receive_quality_reads_noise_then_amplitude() {
        let mut transport = MockTransport::new();
        transport.respond(&[0x40, 0x00]).respond(&[0x00, 0x03]);

        let mut dw1000 = DW1000::new(&mut transport);

        assert_eq!(dw1000.receive_quality().unwrap(), 12.0);
        assert_eq!(
            dw1000.ll().transport().take_ops(),
            [Op::read(ll::STD_NOISE), Op::read(ll::FP_AMPL2)]
        );
    }

    #[test]
    fn first_path_index_has_six_fractional_bits() {
        let mut transport = MockTransport::new();
        transport.respond(&[0x60, 0x02]);

        let index = DW1000::new(&mut transport).first_path_index().unwrap();

        assert_eq!(index, U10F6::from_num(9.5));
    }

    #[test]
    fn correct_timestamp_applies_the_range_bias() {
        let mut transport = MockTransport::new();
        // A weak signal, clamped to the last table entry
        transport.respond(&[0x01, 0x00]).respond(&[0x00, 0x00, 0x00, 0x40]);

        let mut dw1000 = DW1000::new(&mut transport);
        let mut timestamp = Timestamp::new(0x1000).unwrap();
        dw1000.correct_timestamp(&mut timestamp).unwrap();

        let expected = range_bias::correct_timestamp(
            Timestamp::new(0x1000).unwrap(),
            power::receive_power(1, 0x400, PulseFrequency::Mhz16),
            UwbChannel::Channel5,
            PulseFrequency::Mhz16,
        );
        assert_eq!(timestamp, expected);
        assert_eq!(timestamp.value(), 0x1000 + 23);
    }

    #[test]
    fn status_predicates_follow_the_mirror() {
        let mut transport = MockTransport::new();
        let mut dw1000 = DW1000::new(&mut transport);

        dw1000.regs.sys_status = [0x00, 0x20, 0x00, 0x00, 0x00];
        assert!(!dw1000.is_receive_done());
        dw1000.suppress_frame_check(true);
        assert!(dw1000.is_receive_done());

        dw1000.regs.sys_status = [0x00, 0x04, 0x00, 0x00, 0x00];
        assert!(dw1000.is_receive_timestamp_available());
        assert!(!dw1000.is_receive_failed());

        dw1000.regs.sys_status = [0x00, 0x00, 0x01, 0x00, 0x00];
        assert!(dw1000.is_receive_failed());

        dw1000.regs.sys_status = [0x00, 0x00, 0x00, 0x04, 0x00];
        assert!(dw1000.is_receive_timeout());

        dw1000.regs.sys_status = [0x00, 0x00, 0x00, 0x02, 0x00];
        assert!(dw1000.is_clock_problem());
        assert!(!dw1000.is_receive_timeout());
    }

    #[test]
    fn clears_only_touch_their_own_events() {
        let mut transport = MockTransport::new();
        {
            let mut dw1000 = DW1000::new(&mut transport);
            dw1000.clear_received_status().unwrap();
            dw1000.clear_receive_failed_status().unwrap();
            dw1000.clear_receive_timeout_status().unwrap();
            dw1000.clear_receive_timestamp_available_status().unwrap();
            dw1000.clear_clock_problem_status().unwrap();
            dw1000.clear_all_status().unwrap();
        }

        assert_eq!(
            transport.writes_to(ll::SYS_STATUS),
            [
                vec![0x00, 0x6B, 0x00, 0x00, 0x00],
                vec![0x00, 0x90, 0x05, 0x00, 0x00],
                vec![0x00, 0x00, 0x22, 0x04, 0x00],
                vec![0x00, 0x04, 0x00, 0x00, 0x00],
                vec![0x00, 0x00, 0x00, 0x03, 0x00],
                vec![0xFF; 5],
            ]
        );
    }

    #[test]
    fn wait_receive_reports_the_outcome() {
        let mut transport = MockTransport::new();
        transport
            .respond(&[0x00; 5])
            .respond(&[0x00, 0x00, 0x20, 0x00, 0x00])
            .respond(&[0x00, 0x60, 0x00, 0x00, 0x00])
            .respond(&[0x0A, 0x00, 0x00, 0x00]);

        let mut dw1000 = DW1000::new(&mut transport);
        dw1000.state = State::ReceiveArmed;

        assert!(matches!(dw1000.wait_receive(), Err(nb::Error::WouldBlock)));
        assert!(matches!(
            dw1000.wait_receive(),
            Err(nb::Error::Other(Error::ReceiveTimeout))
        ));
        assert_eq!(dw1000.state(), State::Idle);

        dw1000.state = State::ReceiveArmed;
        assert_eq!(dw1000.wait_receive().unwrap(), 8);
        assert_eq!(dw1000.state(), State::Idle);
    }
}
