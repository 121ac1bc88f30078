use super::{dirty, State};
use crate::{
    configs::{get_recommended_lde_repc, Mode},
    ll::{self, Transport},
    Error,
    DW1000,
};


/// AGC_TUNE2, see user manual, section 2.5.5.2
const AGC_TUNE2: u32 = 0x2502A907;
/// AGC_TUNE3, see user manual, section 7.2.36.9
const AGC_TUNE3: u16 = 0x0035;
/// LDE_CFG1 with NTM = 13 and PMULT = 3, see user manual, section 2.5.5.4
const LDE_CFG1: u8 = 0x6D;
/// FS_XTALT without trimming the crystal
const FS_XTALT: u8 = 0x60;

impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    /// Refreshes the PAN id and short address mirror
    pub fn read_network_and_address(&mut self) -> Result<(), Error<T>> {
        self.ll.read(ll::PANADR, &mut self.regs.panadr)?;
        Ok(())
    }

    /// Writes the PAN id and short address mirror
    pub fn write_network_and_address(&mut self) -> Result<(), Error<T>> {
        self.ll.write(ll::PANADR, &self.regs.panadr)?;
        Ok(())
    }

    /// Refreshes the SYS_CFG mirror
    pub fn read_system_configuration(&mut self) -> Result<(), Error<T>> {
        self.ll.read(ll::SYS_CFG, &mut self.regs.sys_cfg)?;
        Ok(())
    }

    /// Writes the SYS_CFG mirror
    pub fn write_system_configuration(&mut self) -> Result<(), Error<T>> {
        self.ll.write(ll::SYS_CFG, &self.regs.sys_cfg)?;
        Ok(())
    }

    /// Refreshes the SYS_MASK mirror
    pub fn read_system_event_mask(&mut self) -> Result<(), Error<T>> {
        self.ll.read(ll::SYS_MASK, &mut self.regs.sys_mask)?;
        Ok(())
    }

    /// Writes the SYS_MASK mirror
    pub fn write_system_event_mask(&mut self) -> Result<(), Error<T>> {
        self.ll.write(ll::SYS_MASK, &self.regs.sys_mask)?;
        Ok(())
    }

    /// Refreshes the CHAN_CTRL mirror
    pub fn read_channel_control(&mut self) -> Result<(), Error<T>> {
        self.ll.read(ll::CHAN_CTRL, &mut self.regs.chan_ctrl)?;
        Ok(())
    }

    /// Writes the CHAN_CTRL mirror
    pub fn write_channel_control(&mut self) -> Result<(), Error<T>> {
        self.ll.write(ll::CHAN_CTRL, &self.regs.chan_ctrl)?;
        Ok(())
    }

    /// Refreshes the TX_FCTRL mirror
    pub fn read_transmit_frame_control(&mut self) -> Result<(), Error<T>> {
        self.ll.read(ll::TX_FCTRL, &mut self.regs.tx_fctrl)?;
        Ok(())
    }

    /// Writes the TX_FCTRL mirror
    pub fn write_transmit_frame_control(&mut self) -> Result<(), Error<T>> {
        self.ll.write(ll::TX_FCTRL, &self.regs.tx_fctrl)?;
        Ok(())
    }

    /// Refreshes the SYS_STATUS mirror
    ///
    /// All status predicates, like [`DW1000::is_receive_done`], work on this
    /// mirror.
    pub fn read_system_event_status(&mut self) -> Result<(), Error<T>> {
        self.ll.read(ll::SYS_STATUS, &mut self.regs.sys_status)?;
        Ok(())
    }

    /// Starts a batch of configuration changes
    ///
    /// Turns the transceiver off and refreshes all configuration mirrors from
    /// the DW1000. Call [`DW1000::commit_configuration`] after the setters.
    pub fn new_configuration(&mut self) -> Result<(), Error<T>> {
        self.idle()?;

        self.read_network_and_address()?;
        self.read_system_configuration()?;
        self.read_channel_control()?;
        self.read_transmit_frame_control()?;
        self.read_system_event_mask()?;

        self.dirty = 0;
        self.set_state(State::Configuring);

        Ok(())
    }

    /// Writes all changed configuration to the DW1000
    ///
    /// Only mirrors that a setter changed since the last commit are written.
    /// The tuning registers and the antenna delay are always written.
    pub fn commit_configuration(&mut self) -> Result<(), Error<T>> {
        let dirty = self.dirty;

        if dirty & dirty::PANADR != 0 {
            self.write_network_and_address()?;
        }
        if dirty & dirty::SYS_CFG != 0 {
            self.write_system_configuration()?;
        }
        if dirty & dirty::CHAN_CTRL != 0 {
            self.write_channel_control()?;
        }
        if dirty & dirty::TX_FCTRL != 0 {
            self.write_transmit_frame_control()?;
        }
        if dirty & dirty::SYS_MASK != 0 {
            self.write_system_event_mask()?;
        }
        self.dirty = 0;

        self.tune()?;

        let antenna_delay = self.settings.antenna_delay.to_bytes();
        self.ll.write(ll::TX_ANTD, &antenna_delay[..ll::TX_ANTD.len])?;
        self.ll.write(ll::LDE_RXANTD, &antenna_delay[..ll::LDE_RXANTD.len])?;

        log::debug!("Committed configuration: {:?}", self.settings);

        if self.state == State::Configuring {
            self.set_state(State::Idle);
        }

        Ok(())
    }

    /// Loads the default configuration
    ///
    /// Frame filtering off, interrupts for sent, received and timeout frames,
    /// receiver auto re-enable, and the [`Mode::LONGDATA_RANGE_LOWPOWER`]
    /// preset. Does nothing while a transmission or reception is armed.
    pub fn set_defaults(&mut self) -> Result<(), Error<T>> {
        if !self.state.is_idle() {
            log::debug!("Not loading defaults in state {:?}", self.state);
            return Ok(());
        }

        self.use_extended_frame_length(false);
        self.use_smart_power(false);
        self.suppress_frame_check(false);
        self.set_frame_filter(false);
        self.set_frame_filter_allow_data(false);
        self.set_frame_filter_allow_reserved(false);
        self.interrupt_on_sent(true);
        self.interrupt_on_received(true);
        self.interrupt_on_receive_failed(false);
        self.interrupt_on_receive_timeout(true);
        self.interrupt_on_receive_timestamp_available(false);
        self.interrupt_on_automatic_acknowledge_trigger(false);
        self.set_receiver_auto_reenable(true);

        self.apply_mode(Mode::LONGDATA_RANGE_LOWPOWER)
    }

    /// Applies one of the [`Mode`] presets
    ///
    /// Sets the data rate, PRF, preamble length and preamble code together,
    /// and selects [`Mode::CHANNEL`].
    pub fn apply_mode(&mut self, mode: Mode) -> Result<(), Error<T>> {
        self.set_data_rate(mode.data_rate)?;
        self.set_pulse_frequency(mode.pulse_frequency);
        self.set_preamble_length(mode.preamble_length);
        self.set_channel(Mode::CHANNEL);
        self.set_preamble_code(mode.preamble_code);

        Ok(())
    }

    /// Writes the tuning registers for the current configuration
    ///
    /// [`DW1000::commit_configuration`] calls this. The values are taken from
    /// the tables in section 7.2 of the user manual.
    pub fn tune(&mut self) -> Result<(), Error<T>> {
        let settings = self.settings;
        let prf = settings.pulse_frequency;
        let rate = settings.data_rate;
        let channel = settings.channel;

        self.ll.write16(ll::AGC_TUNE1, prf.get_recommended_agc_tune1())?;
        self.ll.write32(ll::AGC_TUNE2, AGC_TUNE2)?;
        self.ll.write16(ll::AGC_TUNE3, AGC_TUNE3)?;

        self.ll.write16(ll::DRX_TUNE0B, rate.get_recommended_drx_tune0b())?;
        self.ll.write16(ll::DRX_TUNE1A, prf.get_recommended_drx_tune1a())?;
        match settings.preamble_length.get_recommended_drx_tune1b(rate) {
            Some(value) => self.ll.write16(ll::DRX_TUNE1B, value)?,
            None => log::warn!(
                "No DRX_TUNE1b for {:?} at {:?}",
                settings.preamble_length,
                rate,
            ),
        }
        self.ll.write32(ll::DRX_TUNE2, prf.get_recommended_drx_tune2(settings.pac_size))?;
        self.ll.write16(
            ll::DRX_TUNE4H,
            settings.preamble_length.get_recommended_dxr_tune4h(),
        )?;

        self.ll.write8(ll::LDE_CFG1, LDE_CFG1)?;
        match get_recommended_lde_repc(settings.preamble_code, rate) {
            Some(value) => self.ll.write16(ll::LDE_REPC, value)?,
            None => log::warn!("No LDE_REPC for preamble code {}", settings.preamble_code),
        }
        self.ll.write16(ll::LDE_CFG2, prf.get_recommended_lde_cfg2())?;

        let tx_power = if settings.force_tx_power {
            settings.tx_power
        }
        else {
            channel.get_recommended_tx_power(prf, settings.smart_power)
        };
        self.ll.write32(ll::TX_POWER, tx_power)?;

        self.ll.write8(ll::RF_RXCTRLH, channel.get_recommended_rf_rxctrlh())?;
        self.ll.write32(ll::RF_TXCTRL, channel.get_recommended_rf_txctrl())?;
        self.ll.write8(ll::TC_PGDELAY, channel.get_recommended_tc_pgdelay())?;

        self.ll.write32(ll::FS_PLLCFG, channel.get_recommended_fs_pllcfg())?;
        self.ll.write8(ll::FS_PLLTUNE, channel.get_recommended_fs_plltune())?;
        self.ll.write8(ll::FS_XTALT, FS_XTALT)?;

        Ok(())
    }
}
