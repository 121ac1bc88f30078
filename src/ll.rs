//! Low-level interface to the DW1000
//!
//! This module implements the register-level protocol of the DW1000: the
//! variable-length access header, byte-oriented reads and writes of arbitrary
//! register spans, and the register map itself. Users of this library should
//! typically not need to use this. Please consider using the [high-level
//! interface] instead.
//!
//! The bus itself is not driven here. All bytes go through a [`Transport`],
//! which is borrowed for the lifetime of the driver.
//!
//! [high-level interface]: ../hl/index.html

use core::fmt;


/// Capabilities the driver needs from the board it runs on
///
/// Implementations activate the chip select, shift the header and data, and
/// release the chip select again within a single `read` or `write` call.
/// [`SpiTransport`] implements this on top of `embedded-hal`.
///
/// [`SpiTransport`]: ../spi/struct.SpiTransport.html
pub trait Transport {
    /// The error that can occur while talking to the DW1000
    type Error;

    /// Sends `header`, then reads `data.len()` bytes into `data`
    fn read(&mut self, header: &[u8], data: &mut [u8]) -> Result<(), Self::Error>;

    /// Sends `header`, followed by `data`
    fn write(&mut self, header: &[u8], data: &[u8]) -> Result<(), Self::Error>;

    /// Changes the bus speed
    fn set_speed(&mut self, speed: SpiSpeed) -> Result<(), Self::Error>;

    /// Waits for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Pulses the reset line of the DW1000
    ///
    /// Returns `Ok(false)`, if the board has no reset line connected. The
    /// driver then falls back to a soft reset over SPI.
    fn reset(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}


/// SPI bus speed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiSpeed {
    /// At most 4 MHz. Required until the PLL is locked.
    Low,
    /// At most 20 MHz
    High,
}


/// The header that precedes every register access
///
/// Depending on the sub-index, the header is 1, 2 or 3 bytes long.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    buffer: [u8; 3],
    len:    usize,
}

impl Header {
    /// Encodes the header for accessing sub-index `sub_id` of register `id`
    ///
    /// Only the lower 6 bits of `id` and the lower 15 bits of `sub_id` are
    /// used.
    pub fn new(write: bool, id: u8, sub_id: u16) -> Self {
        let mut buffer = [0; 3];
        let has_sub_id = sub_id > 0;

        buffer[0] =
            (((write as u8) << 7) & 0x80) | (((has_sub_id as u8) << 6) & 0x40) | (id & 0x3f);

        if !has_sub_id {
            return Header { buffer, len: 1 };
        }

        let ext_addr = sub_id > 127;

        buffer[1] = (((ext_addr as u8) << 7) & 0x80) | (sub_id as u8 & 0x7f); // lower 7 bits (of 15)

        if !ext_addr {
            return Header { buffer, len: 2 };
        }

        buffer[2] = (sub_id >> 7) as u8; // higher 8 bits (of 15)

        Header { buffer, len: 3 }
    }

    /// The encoded header bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}


/// Identifies an accessible unit in the address space of the DW1000
///
/// The DW1000 user manual, section 7.1, specifies the values for each
/// register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Register {
    /// The register index
    pub id: u8,

    /// The register's sub-index
    pub sub_id: u16,

    /// The length of the register in bytes
    pub len: usize,
}

impl Register {
    /// Describes an arbitrary register span
    pub const fn new(id: u8, sub_id: u16, len: usize) -> Self {
        Register { id, sub_id, len }
    }

    /// The header for this register
    pub fn header(&self, write: bool) -> Header {
        Header::new(write, self.id, self.sub_id)
    }
}


/// Entry point to the DW1000 driver's low-level API
///
/// Please consider using [hl::DW1000] instead.
///
/// [hl::DW1000]: ../hl/struct.DW1000.html
pub struct DW1000<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T> DW1000<'a, T>
where
    T: Transport + ?Sized,
{
    /// Create a new instance of `DW1000`
    pub fn new(transport: &'a mut T) -> Self {
        DW1000 { transport }
    }

    /// Direct access to the transport
    pub fn transport(&mut self) -> &mut T {
        self.transport
    }

    /// Reads `buffer.len()` bytes, starting at the register's sub-index
    pub fn read(&mut self, reg: Register, buffer: &mut [u8]) -> Result<(), Error<T>> {
        let header = reg.header(false);
        self.transport.read(header.as_bytes(), buffer).map_err(Error)
    }

    /// Reads 2 bytes and interprets them as a little-endian value
    pub fn read16(&mut self, reg: Register) -> Result<u16, Error<T>> {
        let mut buffer = [0; 2];
        self.read(reg, &mut buffer)?;
        Ok(u16::from_le_bytes(buffer))
    }

    /// Reads 4 bytes and interprets them as a little-endian value
    pub fn read32(&mut self, reg: Register) -> Result<u32, Error<T>> {
        let mut buffer = [0; 4];
        self.read(reg, &mut buffer)?;
        Ok(u32::from_le_bytes(buffer))
    }

    /// Writes `data`, starting at the register's sub-index
    pub fn write(&mut self, reg: Register, data: &[u8]) -> Result<(), Error<T>> {
        let header = reg.header(true);
        self.transport.write(header.as_bytes(), data).map_err(Error)
    }

    /// Writes a single byte
    pub fn write8(&mut self, reg: Register, value: u8) -> Result<(), Error<T>> {
        self.write(reg, &[value])
    }

    /// Writes a 16-bit value, little-endian
    pub fn write16(&mut self, reg: Register, value: u16) -> Result<(), Error<T>> {
        self.write(reg, &value.to_le_bytes())
    }

    /// Writes a 32-bit value, little-endian
    pub fn write32(&mut self, reg: Register, value: u32) -> Result<(), Error<T>> {
        self.write(reg, &value.to_le_bytes())
    }

    /// Changes the bus speed
    pub fn set_speed(&mut self, speed: SpiSpeed) -> Result<(), Error<T>> {
        self.transport.set_speed(speed).map_err(Error)
    }

    /// Waits for at least `ms` milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.transport.delay_ms(ms)
    }

    /// Pulses the hardware reset line, if there is one
    pub fn reset(&mut self) -> Result<bool, Error<T>> {
        self.transport.reset().map_err(Error)
    }
}


/// An error that occured in the transport while communicating with the DW1000
pub struct Error<T: Transport + ?Sized>(pub T::Error);

// We can't derive this implementation, as the compiler will complain that the
// associated error type doesn't implement `Debug`.
impl<T> fmt::Debug for Error<T>
where
    T: Transport + ?Sized,
    T::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error({:?})", self.0)
    }
}


macro_rules! impl_register {
    (
        $(
            $id:expr,
            $sub_id:expr,
            $len:expr,
            $name:ident($name_lower:ident) {
            #[$doc:meta]
            $(
                $field:ident,
                $bit:expr;
                #[$field_doc:meta]
            )*
            }
        )*
    ) => {
        $(
            #[$doc]
            pub const $name: Register = Register::new($id, $sub_id, $len);

            #[$doc]
            ///
            /// Bit positions within the register.
            pub mod $name_lower {
                $(
                    #[$field_doc]
                    pub const $field: usize = $bit;
                )*
            }
        )*
    }
}

impl_register! {
    0x00, 0x00, 4, DEV_ID(dev_id) { /// Device identifier
    }
    0x03, 0x00, 4, PANADR(panadr) { /// PAN Identifier and Short Address
    }
    0x04, 0x00, 4, SYS_CFG(sys_cfg) { /// System Configuration
        FFEN,      0; /// Frame Filtering Enable
        FFBC,      1; /// Frame Filtering Behave As Coordinator
        FFAB,      2; /// Frame Filtering Allow Beacon
        FFAD,      3; /// Frame Filtering Allow Data
        FFAA,      4; /// Frame Filtering Allow Acknowledgement
        FFAM,      5; /// Frame Filtering Allow MAC Command Frame
        FFAR,      6; /// Frame Filtering Allow Reserved
        HIRQ_POL,  9; /// Host Interrupt Polarity
        DIS_DRXB, 12; /// Disable Double RX Buffer
        PHR_MODE, 16; /// PHR Mode (first of two bits)
        DIS_STXP, 18; /// Disable Smart TX Power Control
        RXM110K,  22; /// Receiver Mode 110 kbps Data Rate
        RXWTOE,   28; /// Receive Wait Timeout Enable
        RXAUTR,   29; /// Receiver Auto-Re-enable
    }
    0x06, 0x00, 5, SYS_TIME(sys_time) { /// System Time Counter
    }
    0x08, 0x00, 5, TX_FCTRL(tx_fctrl) { /// TX Frame Control
        TXBR,     13; /// Transmit Bit Rate (first of two bits)
        TXPRF,    16; /// Transmit Pulse Repetition Frequency (first of two bits)
        TXPSR,    18; /// Transmit Preamble Symbol Repetitions (first of four bits)
    }
    0x09, 0x00, 1024, TX_BUFFER(tx_buffer) { /// Transmit Data Buffer
    }
    0x0A, 0x00, 5, DX_TIME(dx_time) { /// Delayed Send or Receive Time
    }
    0x0C, 0x00, 2, RX_FWTO(rx_fwto) { /// Receive Frame Wait Timeout Period
    }
    0x0D, 0x00, 4, SYS_CTRL(sys_ctrl) { /// System Control Register
        SFCST,      0; /// Suppress Auto-FCS Transmission
        TXSTRT,     1; /// Transmit Start
        TXDLYS,     2; /// Transmitter Delayed Sending
        TRXOFF,     6; /// Transceiver Off
        WAIT4RESP,  7; /// Wait for Response
        RXENAB,     8; /// Enable Receiver
        RXDLYE,     9; /// Receiver Delayed Enable
        HRBPT,     24; /// Host Side RX Buffer Pointer Toggle
    }
    0x0E, 0x00, 4, SYS_MASK(sys_mask) { /// System Event Mask Register
        MAAT,      3; /// Mask Automatic Acknowledge Trigger Event
        MTXFRB,    4; /// Mask Transmit Frame Begins Event
        MTXPRS,    5; /// Mask Transmit Preamble Sent Event
        MTXPHS,    6; /// Mask Transmit PHY Header Sent Event
        MTXFRS,    7; /// Mask Transmit Frame Sent Event
        MLDEDONE, 10; /// Mask LDE Processing Done Event
        MRXPHE,   12; /// Mask Receiver PHY Header Error Event
        MRXDFR,   13; /// Mask Receiver Data Frame Ready Event
        MRXFCG,   14; /// Mask Receiver FCS Good Event
        MRXFCE,   15; /// Mask Receiver FCS Error Event
        MRXRFSL,  16; /// Mask Receiver Reed-Solomon Frame Sync Loss Event
        MRXRFTO,  17; /// Mask Receive Frame Wait Timeout Event
        MLDEERR,  18; /// Mask Leading Edge Detection Error Event
        MRXPTO,   21; /// Mask Preamble Detection Timeout Event
        MRXSFDTO, 26; /// Mask Receive SFD Timeout Event
    }
    0x0F, 0x00, 5, SYS_STATUS(sys_status) { /// System Event Status Register
        CPLOCK,     1; /// Clock PLL Lock
        AAT,        3; /// Automatic Acknowledge Trigger
        TXFRB,      4; /// Transmit Frame Begins
        TXPRS,      5; /// Transmit Preamble Sent
        TXPHS,      6; /// Transmit PHY Header Sent
        TXFRS,      7; /// Transmit Frame Sent
        RXPRD,      8; /// Receiver Preamble Detected Status
        RXSFDD,     9; /// Receiver SFD Detected
        LDEDONE,   10; /// LDE Processing Done
        RXPHD,     11; /// Receiver PHY Header Detect
        RXPHE,     12; /// Receiver PHY Header Error
        RXDFR,     13; /// Receiver Data Frame Ready
        RXFCG,     14; /// Receiver FCS Good
        RXFCE,     15; /// Receiver FCS Error
        RXRFSL,    16; /// Receiver Reed-Solomon Frame Sync Loss
        RXRFTO,    17; /// Receive Frame Wait Timeout
        LDEERR,    18; /// Leading Edge Detection Processing Error
        RXOVRR,    20; /// Receiver Overrun
        RXPTO,     21; /// Preamble Detection Timeout
        RFPLL_LL,  24; /// RF PLL Losing Lock
        CLKPLL_LL, 25; /// Clock PLL Losing Lock
        RXSFDTO,   26; /// Receive SFD Timeout
    }
    0x10, 0x00, 4, RX_FINFO(rx_finfo) { /// RX Frame Information
        RXPACC, 20; /// Preamble Accumulation Count (first of twelve bits)
    }
    0x11, 0x00, 1024, RX_BUFFER(rx_buffer) { /// Receive Data Buffer
    }
    0x12, 0x00, 2, STD_NOISE(std_noise) { /// Standard Deviation of Noise
    }
    0x12, 0x02, 2, FP_AMPL2(fp_ampl2) { /// First Path Amplitude point 2
    }
    0x12, 0x04, 2, FP_AMPL3(fp_ampl3) { /// First Path Amplitude point 3
    }
    0x12, 0x06, 2, CIR_PWR(cir_pwr) { /// Channel Impulse Response Power
    }
    0x15, 0x00, 5, RX_STAMP(rx_stamp) { /// Fully adjusted time stamp of reception
    }
    0x15, 0x05, 2, FP_INDEX(fp_index) { /// First Path Index
    }
    0x15, 0x07, 2, FP_AMPL1(fp_ampl1) { /// First Path Amplitude point 1
    }
    0x17, 0x00, 5, TX_STAMP(tx_stamp) { /// Fully adjusted time of transmission
    }
    0x18, 0x00, 2, TX_ANTD(tx_antd) { /// TX Antenna Delay
    }
    0x1E, 0x00, 4, TX_POWER(tx_power) { /// TX Power Control
    }
    0x1F, 0x00, 4, CHAN_CTRL(chan_ctrl) { /// Channel Control Register
        TX_CHAN,  0; /// Transmit Channel (first of four bits)
        RX_CHAN,  4; /// Receive Channel (first of four bits)
        DWSFD,   17; /// Decawave non-standard SFD
        RXPRF,   18; /// Pulse Repetition Frequency (first of two bits)
        TNSSFD,  20; /// Transmit non-standard SFD
        RNSSFD,  21; /// Receive non-standard SFD
        TX_PCODE, 22; /// Transmit Preamble Code (first of five bits)
        RX_PCODE, 27; /// Receive Preamble Code (first of five bits)
    }
    0x21, 0x00, 1, SFD_LENGTH(sfd_length) { /// Length of the user-defined SFD sequence
    }
    0x23, 0x04, 2, AGC_TUNE1(agc_tune1) { /// AGC Tuning register 1
    }
    0x23, 0x0C, 4, AGC_TUNE2(agc_tune2) { /// AGC Tuning register 2
    }
    0x23, 0x12, 2, AGC_TUNE3(agc_tune3) { /// AGC Tuning register 3
    }
    0x26, 0x00, 4, GPIO_MODE(gpio_mode) { /// GPIO Mode Control Register
    }
    0x27, 0x02, 2, DRX_TUNE0B(drx_tune0b) { /// Digital Tuning Register 0b
    }
    0x27, 0x04, 2, DRX_TUNE1A(drx_tune1a) { /// Digital Tuning Register 1a
    }
    0x27, 0x06, 2, DRX_TUNE1B(drx_tune1b) { /// Digital Tuning Register 1b
    }
    0x27, 0x08, 4, DRX_TUNE2(drx_tune2) { /// Digital Tuning Register 2
    }
    0x27, 0x26, 2, DRX_TUNE4H(drx_tune4h) { /// Digital Tuning Register 4h
    }
    0x28, 0x0B, 1, RF_RXCTRLH(rf_rxctrlh) { /// Analog RX Control Register
    }
    0x28, 0x0C, 4, RF_TXCTRL(rf_txctrl) { /// Analog TX Control Register
    }
    0x2A, 0x0B, 1, TC_PGDELAY(tc_pgdelay) { /// Pulse Generator Delay
    }
    0x2B, 0x07, 4, FS_PLLCFG(fs_pllcfg) { /// Frequency synthesiser - PLL configuration
    }
    0x2B, 0x0B, 1, FS_PLLTUNE(fs_plltune) { /// Frequency synthesiser - PLL Tuning
    }
    0x2B, 0x0E, 1, FS_XTALT(fs_xtalt) { /// Frequency synthesiser - Crystal trim
    }
    0x2D, 0x06, 2, OTP_CTRL(otp_ctrl) { /// OTP Control
        LDELOAD, 15; /// Load the LDE microcode from ROM
    }
    0x2E, 0x0806, 1, LDE_CFG1(lde_cfg1) { /// LDE Configuration Register 1
    }
    0x2E, 0x1804, 2, LDE_RXANTD(lde_rxantd) { /// LDE Receive Antenna Delay configuration
    }
    0x2E, 0x1806, 2, LDE_CFG2(lde_cfg2) { /// LDE Configuration Register 2
    }
    0x2E, 0x2804, 2, LDE_REPC(lde_repc) { /// LDE Replica Coefficient configuration
    }
    0x36, 0x00, 4, PMSC_CTRL0(pmsc_ctrl0) { /// PMSC Control Register 0
        SYSCLKS,     0; /// System Clock Selection (first of two bits)
        SOFTRESET,  28; /// Soft Reset (first of four bits)
    }
    0x36, 0x28, 4, PMSC_LEDC(pmsc_ledc) { /// PMSC LED Control Register
    }
}
