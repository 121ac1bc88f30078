//! Setters of the configuration mirrors
//!
//! Unless noted otherwise, the setters here only change the in-memory
//! mirrors. They take effect with the next [`DW1000::commit_configuration`].

use super::dirty;
use crate::{
    configs::{DataRate, PreambleLength, PulseFrequency, UwbChannel},
    ll::{self, Transport},
    mac,
    time::Timestamp,
    util::{get_bit, set_bit, set_bits},
    Error,
    DW1000,
};


impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    fn set_sys_cfg_bit(&mut self, bit: usize, value: bool) {
        set_bit(&mut self.regs.sys_cfg, bit, value);
        self.mark_dirty(dirty::SYS_CFG);
    }

    fn set_sys_mask_bits(&mut self, bits: &[usize], value: bool) {
        for &bit in bits {
            set_bit(&mut self.regs.sys_mask, bit, value);
        }
        self.mark_dirty(dirty::SYS_MASK);
    }

    /// Enables frame filtering
    pub fn set_frame_filter(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFEN, value);
    }

    /// Lets the frame filter behave as a PAN coordinator
    pub fn set_frame_filter_behave_coordinator(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFBC, value);
    }

    /// Lets beacon frames pass the frame filter
    pub fn set_frame_filter_allow_beacon(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFAB, value);
    }

    /// Lets data frames pass the frame filter
    pub fn set_frame_filter_allow_data(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFAD, value);
    }

    /// Lets acknowledgement frames pass the frame filter
    pub fn set_frame_filter_allow_acknowledgement(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFAA, value);
    }

    /// Lets MAC command frames pass the frame filter
    pub fn set_frame_filter_allow_mac_command(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFAM, value);
    }

    /// Lets frames with reserved frame types pass the frame filter
    pub fn set_frame_filter_allow_reserved(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::FFAR, value);
    }

    /// Uses both receive buffers alternately
    pub fn set_double_buffering(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::DIS_DRXB, !value);
    }

    /// Whether double buffering is enabled in the SYS_CFG mirror
    pub fn is_double_buffering(&self) -> bool {
        !get_bit(&self.regs.sys_cfg, ll::sys_cfg::DIS_DRXB)
    }

    /// Drives the IRQ line high for active interrupts
    pub fn set_interrupt_polarity(&mut self, active_high: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::HIRQ_POL, active_high);
    }

    /// Re-enables the receiver after a receive error
    pub fn set_receiver_auto_reenable(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::RXAUTR, value);
    }

    /// Raises an interrupt when a frame was sent
    pub fn interrupt_on_sent(&mut self, value: bool) {
        self.set_sys_mask_bits(&[ll::sys_mask::MTXFRS], value);
    }

    /// Raises an interrupt when a frame was received
    pub fn interrupt_on_received(&mut self, value: bool) {
        self.set_sys_mask_bits(&[ll::sys_mask::MRXDFR, ll::sys_mask::MRXFCG], value);
    }

    /// Raises an interrupt when a frame couldn't be received
    pub fn interrupt_on_receive_failed(&mut self, value: bool) {
        self.set_sys_mask_bits(
            &[
                ll::sys_mask::MLDEERR,
                ll::sys_mask::MRXFCE,
                ll::sys_mask::MRXPHE,
                ll::sys_mask::MRXRFSL,
            ],
            value,
        );
    }

    /// Raises an interrupt when the receiver timed out
    ///
    /// Covers the frame wait timeout, the preamble detection timeout and the
    /// SFD timeout.
    pub fn interrupt_on_receive_timeout(&mut self, value: bool) {
        self.set_sys_mask_bits(
            &[
                ll::sys_mask::MRXRFTO,
                ll::sys_mask::MRXPTO,
                ll::sys_mask::MRXSFDTO,
            ],
            value,
        );
    }

    /// Raises an interrupt when the receive time stamp is available
    pub fn interrupt_on_receive_timestamp_available(&mut self, value: bool) {
        self.set_sys_mask_bits(&[ll::sys_mask::MLDEDONE], value);
    }

    /// Raises an interrupt when an acknowledgement is sent automatically
    pub fn interrupt_on_automatic_acknowledge_trigger(&mut self, value: bool) {
        self.set_sys_mask_bits(&[ll::sys_mask::MAAT], value);
    }

    /// Disables all interrupts
    pub fn clear_interrupts(&mut self) {
        self.regs.sys_mask = [0; ll::SYS_MASK.len];
        self.mark_dirty(dirty::SYS_MASK);
    }

    /// Sets the data rate
    ///
    /// Also selects the matching SFD. The length of the SFD is written to the
    /// DW1000 right away.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<T>> {
        set_bits(&mut self.regs.tx_fctrl, ll::tx_fctrl::TXBR, 2, u8::from(rate) as u32);
        set_bit(&mut self.regs.sys_cfg, ll::sys_cfg::RXM110K, rate == DataRate::Kbps110);

        let decawave_sfd = rate.uses_decawave_sfd();
        set_bit(&mut self.regs.chan_ctrl, ll::chan_ctrl::DWSFD, decawave_sfd);
        set_bit(&mut self.regs.chan_ctrl, ll::chan_ctrl::TNSSFD, decawave_sfd);
        set_bit(&mut self.regs.chan_ctrl, ll::chan_ctrl::RNSSFD, decawave_sfd);

        self.mark_dirty(dirty::TX_FCTRL | dirty::SYS_CFG | dirty::CHAN_CTRL);
        self.settings.data_rate = rate;

        self.ll.write8(ll::SFD_LENGTH, rate.get_recommended_sfd_length())?;
        Ok(())
    }

    /// Sets the pulse repetition frequency
    pub fn set_pulse_frequency(&mut self, prf: PulseFrequency) {
        let value = u8::from(prf) as u32;
        set_bits(&mut self.regs.tx_fctrl, ll::tx_fctrl::TXPRF, 2, value);
        set_bits(&mut self.regs.chan_ctrl, ll::chan_ctrl::RXPRF, 2, value);

        self.mark_dirty(dirty::TX_FCTRL | dirty::CHAN_CTRL);
        self.settings.pulse_frequency = prf;
    }

    /// The pulse repetition frequency
    pub fn pulse_frequency(&self) -> PulseFrequency {
        self.settings.pulse_frequency
    }

    /// Sets the preamble length and the matching PAC size
    pub fn set_preamble_length(&mut self, length: PreambleLength) {
        set_bits(&mut self.regs.tx_fctrl, ll::tx_fctrl::TXPSR, 4, u8::from(length) as u32);

        self.mark_dirty(dirty::TX_FCTRL);
        self.settings.preamble_length = length;
        self.settings.pac_size = length.get_recommended_pac_size();
    }

    /// Sets the preamble code, for both transmission and reception
    ///
    /// Only the lower 5 bits of `code` are used.
    pub fn set_preamble_code(&mut self, code: u8) {
        let code = code & 0x1F;
        set_bits(&mut self.regs.chan_ctrl, ll::chan_ctrl::TX_PCODE, 5, code as u32);
        set_bits(&mut self.regs.chan_ctrl, ll::chan_ctrl::RX_PCODE, 5, code as u32);

        self.mark_dirty(dirty::CHAN_CTRL);
        self.settings.preamble_code = code;
    }

    /// Sets the channel, for both transmission and reception
    pub fn set_channel(&mut self, channel: UwbChannel) {
        let value = u8::from(channel) as u32;
        set_bits(&mut self.regs.chan_ctrl, ll::chan_ctrl::TX_CHAN, 4, value);
        set_bits(&mut self.regs.chan_ctrl, ll::chan_ctrl::RX_CHAN, 4, value);

        self.mark_dirty(dirty::CHAN_CTRL);
        self.settings.channel = channel;
    }

    /// Allows frames of up to 1023 bytes
    pub fn use_extended_frame_length(&mut self, value: bool) {
        set_bits(&mut self.regs.sys_cfg, ll::sys_cfg::PHR_MODE, 2, if value { 0b11 } else { 0 });

        self.mark_dirty(dirty::SYS_CFG);
        self.settings.extended_frame_length = value;
    }

    /// Keeps the receiver on after each received frame
    ///
    /// Enabling this also enables the receiver auto re-enable and writes
    /// SYS_CFG right away.
    pub fn receive_permanently(&mut self, value: bool) -> Result<(), Error<T>> {
        self.settings.permanent_receive = value;

        if value {
            self.set_receiver_auto_reenable(true);
            self.write_system_configuration()?;
        }

        Ok(())
    }

    /// Enables smart TX power control
    pub fn use_smart_power(&mut self, value: bool) {
        self.set_sys_cfg_bit(ll::sys_cfg::DIS_STXP, !value);
        self.settings.smart_power = value;
    }

    /// Turns off the automatic generation and checking of the frame CRC
    pub fn suppress_frame_check(&mut self, value: bool) {
        self.settings.frame_check = !value;
    }

    /// Turns on the receiver after each transmission
    pub fn wait_for_response(&mut self, value: bool) {
        set_bit(&mut self.regs.sys_ctrl, ll::sys_ctrl::WAIT4RESP, value);
        self.settings.wait_for_response = value;
    }

    /// Sets the receive frame wait timeout, in units of 512 / 499.2 MHz
    ///
    /// Zero disables the timeout. The value is written right away, but
    /// enabling or disabling the timeout takes a commit.
    pub fn set_receive_wait_timeout(&mut self, timeout: u16) -> Result<(), Error<T>> {
        self.ll.write16(ll::RX_FWTO, timeout)?;

        let enabled = timeout != 0;
        if get_bit(&self.regs.sys_cfg, ll::sys_cfg::RXWTOE) != enabled {
            self.set_sys_cfg_bit(ll::sys_cfg::RXWTOE, enabled);
        }

        Ok(())
    }

    /// Sets the antenna delay
    ///
    /// The delay is added to transmit time stamps by the DW1000, and
    /// subtracted from receive time stamps by [`DW1000::receive_timestamp`].
    pub fn set_antenna_delay(&mut self, delay: Timestamp) {
        self.settings.antenna_delay = delay;
    }

    /// The antenna delay
    pub fn antenna_delay(&self) -> Timestamp {
        self.settings.antenna_delay
    }

    /// Uses `tx_power` as the raw TX_POWER value, instead of the recommended
    /// value for the channel and PRF
    pub fn set_tx_power(&mut self, tx_power: u32) {
        self.settings.tx_power = tx_power;
        self.settings.force_tx_power = true;
    }

    /// Toggles between the value from [`DW1000::set_tx_power`] and the
    /// recommended TX power
    pub fn use_tx_power_override(&mut self, value: bool) {
        self.settings.force_tx_power = value;
    }

    /// Sets the PAN id and the short address
    pub fn set_address(&mut self, pan_id: mac::PanId, addr: mac::ShortAddress) {
        self.regs.panadr[..2].copy_from_slice(&addr.0.to_le_bytes());
        self.regs.panadr[2..].copy_from_slice(&pan_id.0.to_le_bytes());

        self.mark_dirty(dirty::PANADR);
    }

    /// The PAN id and short address in the PANADR mirror
    pub fn address(&self) -> mac::Address {
        let panadr = self.regs.panadr;

        mac::Address::Short(
            mac::PanId(u16::from_le_bytes([panadr[2], panadr[3]])),
            mac::ShortAddress(u16::from_le_bytes([panadr[0], panadr[1]])),
        )
    }
}
