use super::{interrupts::Handlers, Mirrors, State};
use crate::{
    configs::{Clock, Settings},
    ll::{self, SpiSpeed, Transport},
    util::set_bit,
    Error,
    DW1000,
};


/// The device id of every DW1000
pub const DEVICE_ID: u32 = 0xDECA0130;

impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    /// Create a new instance of `DW1000`
    ///
    /// Requires the transport that connects to the DW1000. Nothing is sent
    /// until [`DW1000::configure`] is called.
    pub fn new(transport: &'a mut T) -> Self {
        DW1000 {
            ll:       ll::DW1000::new(transport),
            state:    State::Idle,
            regs:     Mirrors::default(),
            dirty:    0,
            settings: Settings::default(),
            handlers: Handlers::new(),
            epoch:    0,
        }
    }

    /// Bring the DW1000 into a known state
    ///
    /// Resets the chip, checks its id, loads the LDE microcode and switches
    /// to the PLL clock. Fails with [`Error::WrongDeviceId`] before anything
    /// is configured, if the chip doesn't identify as a DW1000.
    pub fn configure(&mut self) -> Result<(), Error<T>> {
        self.enable_clock(Clock::Auto)?;
        self.ll.delay_ms(5);

        if !self.ll.reset()? {
            self.soft_reset()?;
        }

        let id = self.device_id()?;
        if id != DEVICE_ID {
            log::error!("Wrong device id: {:#010x}", id);
            return Err(Error::WrongDeviceId { found: id });
        }
        log::info!("Found DW1000 with id {:#010x}", id);

        self.regs.panadr = [0xff; ll::PANADR.len];
        self.write_network_and_address()?;

        self.regs.sys_cfg = [0; ll::SYS_CFG.len];
        set_bit(&mut self.regs.sys_cfg, ll::sys_cfg::DIS_DRXB, true);
        set_bit(&mut self.regs.sys_cfg, ll::sys_cfg::HIRQ_POL, true);
        self.write_system_configuration()?;

        self.regs.sys_mask = [0; ll::SYS_MASK.len];
        self.write_system_event_mask()?;

        self.enable_clock(Clock::Xti)?;
        self.ll.delay_ms(5);
        self.manage_lde()?;
        self.ll.delay_ms(5);
        self.enable_clock(Clock::Pll)?;
        self.ll.delay_ms(5);

        Ok(())
    }

    /// Reads the device id
    pub fn device_id(&mut self) -> Result<u32, Error<T>> {
        Ok(self.ll.read32(ll::DEV_ID)?)
    }

    /// Resets every clock domain of the DW1000 over SPI, then goes idle
    pub fn soft_reset(&mut self) -> Result<(), Error<T>> {
        let mut pmsc_ctrl0 = [0; ll::PMSC_CTRL0.len];
        self.ll.read(ll::PMSC_CTRL0, &mut pmsc_ctrl0)?;

        pmsc_ctrl0[0] = 0x01;
        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0)?;
        pmsc_ctrl0[3] = 0x00;
        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0)?;

        self.ll.delay_ms(10);

        pmsc_ctrl0[0] = 0x00;
        pmsc_ctrl0[3] = 0xF0;
        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0)?;

        self.idle()
    }

    /// Selects the system clock
    ///
    /// The SPI bus may only run at high speed while the PLL is the clock
    /// source.
    pub fn enable_clock(&mut self, clock: Clock) -> Result<(), Error<T>> {
        let mut pmsc_ctrl0 = [0; ll::PMSC_CTRL0.len];
        self.ll.read(ll::PMSC_CTRL0, &mut pmsc_ctrl0)?;

        match clock {
            Clock::Auto => {
                self.ll.set_speed(SpiSpeed::Low)?;
                pmsc_ctrl0[0] = Clock::Auto as u8;
                pmsc_ctrl0[1] &= 0xFE;
            }
            Clock::Xti => {
                self.ll.set_speed(SpiSpeed::Low)?;
                pmsc_ctrl0[0] = (pmsc_ctrl0[0] & 0xFC) | Clock::Xti as u8;
            }
            Clock::Pll => {
                self.ll.set_speed(SpiSpeed::High)?;
                pmsc_ctrl0[0] = (pmsc_ctrl0[0] & 0xFC) | Clock::Pll as u8;
            }
        }

        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0[..1])?;
        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0)?;

        Ok(())
    }

    /// Loads the LDE microcode from ROM
    ///
    /// See user manual, section 2.5.5.10.
    pub fn manage_lde(&mut self) -> Result<(), Error<T>> {
        let mut pmsc_ctrl0 = [0x01, 0x03];
        let otp_ctrl = [0x00, 0x80];

        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0)?;
        self.ll.write(ll::OTP_CTRL, &otp_ctrl)?;

        self.ll.delay_ms(1);

        pmsc_ctrl0[0] = 0x00;
        pmsc_ctrl0[1] &= 0x02;
        self.ll.write(ll::PMSC_CTRL0, &pmsc_ctrl0)?;

        Ok(())
    }

    /// Lets the RX and TX LEDs blink once, then keeps them driven by the
    /// radio
    pub fn enable_all_leds(&mut self) -> Result<(), Error<T>> {
        // Route GPIO0 to GPIO3 to the LED outputs
        let mut gpio_mode = self.ll.read32(ll::GPIO_MODE)?;
        gpio_mode &= !0x0000_3FC0;
        gpio_mode |= 0x0000_1540;
        self.ll.write32(ll::GPIO_MODE, gpio_mode)?;

        // GPIO clock and kilohertz clock
        let pmsc_ctrl0 = self.ll.read32(ll::PMSC_CTRL0)? | 0x0084_0000;
        self.ll.write32(ll::PMSC_CTRL0, pmsc_ctrl0)?;

        let mut ledc = 0x0000_0110;
        self.ll.write32(ll::PMSC_LEDC, ledc)?;
        ledc |= 0x000F_0000;
        self.ll.write32(ll::PMSC_LEDC, ledc)?;
        ledc &= !0x000F_0000;
        self.ll.write32(ll::PMSC_LEDC, ledc)?;

        Ok(())
    }
}
