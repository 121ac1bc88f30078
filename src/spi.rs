//! [`Transport`] on top of `embedded-hal` SPI
//!
//! Boards that connect the DW1000 through a plain SPI peripheral and a GPIO
//! chip select can use [`SpiTransport`] instead of implementing [`Transport`]
//! themselves.

use core::fmt;

use embedded_hal::{
    blocking::{delay::DelayMs, spi},
    digital::v2::OutputPin,
};

use crate::ll::{SpiSpeed, Transport};


/// Changes the speed of the SPI peripheral
pub type SpeedHook<SPI> = fn(&mut SPI, SpiSpeed);

/// A [`Transport`] made of an SPI peripheral, chip select pin and delay
pub struct SpiTransport<SPI, CS, D> {
    spi:               SPI,
    chip_select:       CS,
    delay:             D,
    chip_select_delay: u8,
    speed_hook:        Option<SpeedHook<SPI>>,
}

impl<SPI, CS, D> SpiTransport<SPI, CS, D> {
    /// Create a new instance of `SpiTransport`
    ///
    /// Requires the SPI peripheral and the chip select pin that are connected
    /// to the DW1000.
    pub fn new(spi: SPI, chip_select: CS, delay: D) -> Self {
        SpiTransport {
            spi,
            chip_select,
            delay,
            chip_select_delay: 0,
            speed_hook: None,
        }
    }

    /// Set the chip select delay.
    ///
    /// This is the amount of times the cs pin will be set low before any data
    /// is transfered. This way, the chip can be used on fast mcu's just fine.
    pub fn set_chip_select_delay(&mut self, delay: u8) {
        self.chip_select_delay = delay;
    }

    /// Reconfigures the SPI peripheral whenever the driver changes the speed
    ///
    /// Without a hook, speed changes are ignored. The peripheral then has to
    /// run at [`SpiSpeed::Low`] all the time.
    pub fn set_speed_hook(&mut self, hook: SpeedHook<SPI>) {
        self.speed_hook = Some(hook);
    }

    /// Gives back the SPI peripheral, chip select pin and delay
    pub fn free(self) -> (SPI, CS, D) {
        (self.spi, self.chip_select, self.delay)
    }

    fn assert_cs_low(&mut self) -> Result<(), Error<SPI, CS>>
    where
        SPI: spi::Transfer<u8> + spi::Write<u8>,
        CS: OutputPin,
    {
        for _ in 0..=self.chip_select_delay {
            self.chip_select.set_low().map_err(Error::ChipSelect)?;
        }

        Ok(())
    }

    fn assert_cs_high(&mut self) -> Result<(), Error<SPI, CS>>
    where
        SPI: spi::Transfer<u8> + spi::Write<u8>,
        CS: OutputPin,
    {
        self.chip_select.set_high().map_err(Error::ChipSelect)
    }
}

impl<SPI, CS, D> Transport for SpiTransport<SPI, CS, D>
where
    SPI: spi::Transfer<u8> + spi::Write<u8>,
    CS: OutputPin,
    D: DelayMs<u32>,
{
    type Error = Error<SPI, CS>;

    fn read(&mut self, header: &[u8], data: &mut [u8]) -> Result<(), Self::Error> {
        data.iter_mut().for_each(|byte| *byte = 0);

        self.assert_cs_low()?;
        <SPI as spi::Write<u8>>::write(&mut self.spi, header).map_err(Error::Write)?;
        self.spi.transfer(data).map_err(Error::Transfer)?;
        self.assert_cs_high()
    }

    fn write(&mut self, header: &[u8], data: &[u8]) -> Result<(), Self::Error> {
        self.assert_cs_low()?;
        <SPI as spi::Write<u8>>::write(&mut self.spi, header).map_err(Error::Write)?;
        <SPI as spi::Write<u8>>::write(&mut self.spi, data).map_err(Error::Write)?;
        self.assert_cs_high()
    }

    fn set_speed(&mut self, speed: SpiSpeed) -> Result<(), Self::Error> {
        match self.speed_hook {
            Some(hook) => hook(&mut self.spi, speed),
            None => log::debug!("No speed hook, staying at the current SPI speed"),
        }

        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}


/// An SPI error that can occur when communicating with the DW1000
pub enum Error<SPI, CS>
where
    SPI: spi::Transfer<u8> + spi::Write<u8>,
    CS: OutputPin,
{
    /// SPI error occured during a transfer transaction
    Transfer(<SPI as spi::Transfer<u8>>::Error),

    /// SPI error occured during a write transaction
    Write(<SPI as spi::Write<u8>>::Error),

    /// Error occured while changing chip select signal
    ChipSelect(<CS as OutputPin>::Error),
}

// We can't derive this implementation, as the compiler will complain that the
// associated error type doesn't implement `Debug`.
impl<SPI, CS> fmt::Debug for Error<SPI, CS>
where
    SPI: spi::Transfer<u8> + spi::Write<u8>,
    <SPI as spi::Transfer<u8>>::Error: fmt::Debug,
    <SPI as spi::Write<u8>>::Error: fmt::Debug,
    CS: OutputPin,
    <CS as OutputPin>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transfer(error) => write!(f, "Transfer({:?})", error),
            Error::Write(error) => write!(f, "Write({:?})", error),
            Error::ChipSelect(error) => write!(f, "ChipSelect({:?})", error),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ll;
    use core::sync::atomic::{AtomicBool, Ordering};

    use embedded_hal_mock::eh0::{
        pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    #[derive(Default)]
    struct Delays(Vec<u32>);

    impl DelayMs<u32> for Delays {
        fn delay_ms(&mut self, ms: u32) {
            self.0.push(ms);
        }
    }

    fn framed(cs_lows: usize) -> Vec<PinTransaction> {
        (0..cs_lows)
            .map(|_| PinTransaction::set(PinState::Low))
            .chain(Some(PinTransaction::set(PinState::High)))
            .collect()
    }

    #[test]
    fn read_sends_the_header_then_clocks_in_the_data() {
        let spi = SpiMock::new(&[
            SpiTransaction::write(vec![0x00]),
            SpiTransaction::transfer(vec![0x00; 4], vec![0x30, 0x01, 0xCA, 0xDE]),
        ]);
        let cs = PinMock::new(&framed(1));
        let mut transport = SpiTransport::new(spi, cs, Delays::default());

        let mut data = [0xFF; 4];
        transport
            .read(ll::DEV_ID.header(false).as_bytes(), &mut data)
            .unwrap();
        assert_eq!(data, [0x30, 0x01, 0xCA, 0xDE]);

        let (mut spi, mut cs, _) = transport.free();
        spi.done();
        cs.done();
    }

    #[test]
    fn write_keeps_chip_select_low_for_header_and_data() {
        let spi = SpiMock::new(&[
            SpiTransaction::write(vec![0x8D]),
            SpiTransaction::write(vec![0x40, 0x00, 0x00, 0x00]),
        ]);
        let cs = PinMock::new(&framed(3));
        let mut transport = SpiTransport::new(spi, cs, Delays::default());
        transport.set_chip_select_delay(2);

        transport
            .write(ll::SYS_CTRL.header(true).as_bytes(), &[0x40, 0x00, 0x00, 0x00])
            .unwrap();

        let (mut spi, mut cs, _) = transport.free();
        spi.done();
        cs.done();
    }

    #[test]
    fn speed_changes_go_through_the_hook() {
        static HIGH: AtomicBool = AtomicBool::new(false);

        fn hook(_: &mut SpiMock, speed: SpiSpeed) {
            HIGH.store(speed == SpiSpeed::High, Ordering::SeqCst);
        }

        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[]);
        let mut transport = SpiTransport::new(spi, cs, Delays::default());

        transport.set_speed(SpiSpeed::Low).unwrap();
        transport.set_speed_hook(hook);
        transport.set_speed(SpiSpeed::High).unwrap();
        transport.delay_ms(5);

        let (mut spi, mut cs, delays) = transport.free();
        spi.done();
        cs.done();
        assert!(HIGH.load(Ordering::SeqCst));
        assert_eq!(delays.0, [5]);
    }
}
