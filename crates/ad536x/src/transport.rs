//! Transport seam between the driver and the bus.
//!
//! [`Transport`] is everything the driver needs from the hardware: send one
//! 24-bit word and toggle three control lines. [`SpiTransport`] implements it
//! over embedded-hal 1.0; host tests use [`crate::mocks::RecordingTransport`].

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::error::{Error, Result};
use crate::registers::CommandWord;

/// Bus and control-line operations used by [`crate::Ad536x`].
///
/// Every call completes (or fails) before it returns.
pub trait Transport {
    /// Shift one command word into the device, MSB first, framed by SYNC.
    fn send_command(&mut self, word: CommandWord) -> Result<()>;

    /// Pulse LDAC low then high, moving pending input registers to the DAC
    /// outputs.
    fn pulse_load(&mut self) -> Result<()>;

    /// Pulse RESET low then high.
    fn pulse_reset(&mut self) -> Result<()>;

    /// Drive CLR. `true` asserts it (line low), `false` releases it.
    fn set_clear(&mut self, active: bool) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_command(&mut self, word: CommandWord) -> Result<()> {
        (**self).send_command(word)
    }

    fn pulse_load(&mut self) -> Result<()> {
        (**self).pulse_load()
    }

    fn pulse_reset(&mut self) -> Result<()> {
        (**self).pulse_reset()
    }

    fn set_clear(&mut self, active: bool) -> Result<()> {
        (**self).set_clear(active)
    }
}

/// [`Transport`] over an [`SpiDevice`] and three [`OutputPin`]s.
///
/// - `SPI` : blocking SPI device; its chip select is the AD536x SYNC line.
/// - `LDAC`: load DAC, active low.
/// - `RST` : reset, active low.
/// - `CLR` : clear, active low.
///
/// Bus configuration is the caller's job; see
/// [`crate::config::SpiSettings`].
pub struct SpiTransport<SPI, LDAC, RST, CLR> {
    spi: SPI,
    ldac: LDAC,
    reset: RST,
    clear: CLR,
}

impl<SPI, LDAC, RST, CLR> SpiTransport<SPI, LDAC, RST, CLR>
where
    SPI: SpiDevice,
    LDAC: OutputPin,
    RST: OutputPin,
    CLR: OutputPin,
{
    /// Take ownership of the bus and control lines and drive LDAC, RESET and
    /// CLR to their idle (high) levels.
    ///
    /// # Errors
    ///
    /// [`Error::Gpio`] if a line cannot be driven.
    pub fn new(spi: SPI, mut ldac: LDAC, mut reset: RST, mut clear: CLR) -> Result<Self> {
        ldac.set_high().map_err(|_| Error::Gpio)?;
        reset.set_high().map_err(|_| Error::Gpio)?;
        clear.set_high().map_err(|_| Error::Gpio)?;
        Ok(Self {
            spi,
            ldac,
            reset,
            clear,
        })
    }

    /// Give back the bus and pins.
    pub fn release(self) -> (SPI, LDAC, RST, CLR) {
        (self.spi, self.ldac, self.reset, self.clear)
    }
}

impl<SPI, LDAC, RST, CLR> Transport for SpiTransport<SPI, LDAC, RST, CLR>
where
    SPI: SpiDevice,
    LDAC: OutputPin,
    RST: OutputPin,
    CLR: OutputPin,
{
    fn send_command(&mut self, word: CommandWord) -> Result<()> {
        self.spi
            .write(&word.to_be_bytes())
            .map_err(|_| Error::Communication)
    }

    fn pulse_load(&mut self) -> Result<()> {
        self.ldac.set_low().map_err(|_| Error::Gpio)?;
        self.ldac.set_high().map_err(|_| Error::Gpio)
    }

    fn pulse_reset(&mut self) -> Result<()> {
        self.reset.set_low().map_err(|_| Error::Gpio)?;
        self.reset.set_high().map_err(|_| Error::Gpio)
    }

    fn set_clear(&mut self, active: bool) -> Result<()> {
        if active {
            self.clear.set_low().map_err(|_| Error::Gpio)
        } else {
            self.clear.set_high().map_err(|_| Error::Gpio)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use embedded_hal_mock::eh1::MockError;

    fn spi_device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    fn idle_high() -> PinTransaction {
        PinTransaction::set(PinState::High)
    }

    fn pulse() -> [PinTransaction; 2] {
        [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]
    }

    #[test]
    fn new_drives_control_lines_idle_high() {
        let mut spi = SpiMock::new(&[]);
        let mut ldac = PinMock::new(&[idle_high()]);
        let mut rst = PinMock::new(&[idle_high()]);
        let mut clr = PinMock::new(&[idle_high()]);

        let t = SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
        drop(t);

        spi.done();
        ldac.done();
        rst.done();
        clr.done();
    }

    #[test]
    fn command_is_three_bytes_msb_first() {
        let mut spi = SpiMock::new(&spi_device_write(&[0xCB, 0x12, 0x34]));
        let mut ldac = PinMock::new(&[idle_high()]);
        let mut rst = PinMock::new(&[idle_high()]);
        let mut clr = PinMock::new(&[idle_high()]);

        let mut t = SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
        t.send_command(CommandWord::new(0xCB_1234)).unwrap();

        spi.done();
        ldac.done();
        rst.done();
        clr.done();
    }

    #[test]
    fn load_and_reset_pulse_low_then_high() {
        let mut spi = SpiMock::new(&[]);
        let [l0, l1] = pulse();
        let mut ldac = PinMock::new(&[idle_high(), l0, l1]);
        let [r0, r1] = pulse();
        let mut rst = PinMock::new(&[idle_high(), r0, r1]);
        let mut clr = PinMock::new(&[idle_high()]);

        let mut t = SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
        t.pulse_load().unwrap();
        t.pulse_reset().unwrap();

        spi.done();
        ldac.done();
        rst.done();
        clr.done();
    }

    #[test]
    fn clear_is_active_low() {
        let mut spi = SpiMock::new(&[]);
        let mut ldac = PinMock::new(&[idle_high()]);
        let mut rst = PinMock::new(&[idle_high()]);
        let mut clr = PinMock::new(&[
            idle_high(),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut t = SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
        t.set_clear(true).unwrap();
        t.set_clear(false).unwrap();

        spi.done();
        ldac.done();
        rst.done();
        clr.done();
    }

    #[test]
    fn pin_failure_maps_to_gpio_error() {
        use std::io::ErrorKind;

        let mut spi = SpiMock::new(&[]);
        let mut ldac = PinMock::new(&[
            idle_high(),
            PinTransaction::set(PinState::Low).with_error(MockError::Io(ErrorKind::NotConnected)),
        ]);
        let mut rst = PinMock::new(&[idle_high()]);
        let mut clr = PinMock::new(&[idle_high()]);

        let mut t = SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
        assert_eq!(t.pulse_load(), Err(Error::Gpio));

        spi.done();
        ldac.done();
        rst.done();
        clr.done();
    }

    #[test]
    fn release_returns_the_parts() {
        let spi = SpiMock::new(&[]);
        let ldac = PinMock::new(&[idle_high(), PinTransaction::set(PinState::Low)]);
        let rst = PinMock::new(&[idle_high()]);
        let clr = PinMock::new(&[idle_high()]);

        let t = SpiTransport::new(spi, ldac, rst, clr).unwrap();
        let (mut s, mut l, mut r, mut c) = t.release();
        l.set_low().unwrap();

        s.done();
        l.done();
        r.done();
        c.done();
    }
}
