//! AD536x driver facade.
//!
//! [`Ad536x`] owns a [`Transport`] and the [`CalibrationStore`] mirroring the
//! device. Every write runs the same transaction:
//!
//! 1. encode the command word (address checks),
//! 2. run the validation gate if enabled,
//! 3. record the code in the store,
//! 4. hand the word to the transport.
//!
//! A failure in steps 1–2 leaves both the store and the bus untouched.

use crate::calibration::{CalibrationStore, CodeBounds};
use crate::config::DeviceConfig;
use crate::encoder;
use crate::error::{Error, Result};
use crate::registers::CommandWord;
use crate::transfer;
use crate::transport::Transport;
use crate::types::{AbSource, Bank, Channel, ReadbackRegister, RegisterKind};

/// Driver for one AD5360/AD5361/AD5362/AD5363.
pub struct Ad536x<T> {
    transport: T,
    store: CalibrationStore,
}

impl<T: Transport> Ad536x<T> {
    /// Take ownership of `transport` and reset the device.
    ///
    /// # Errors
    ///
    /// Transport errors from the reset pulse.
    pub fn new(transport: T, config: DeviceConfig) -> Result<Self> {
        let mut dev = Self {
            transport,
            store: CalibrationStore::new(config),
        };
        dev.reset()?;
        Ok(dev)
    }

    /// Pulse RESET and restore every stored value to its reset default.
    ///
    /// # Errors
    ///
    /// Transport errors; the store is left as it was.
    pub fn reset(&mut self) -> Result<()> {
        self.transport.pulse_reset()?;
        self.store.reset();
        #[cfg(feature = "defmt")]
        defmt::debug!("ad536x: reset ({})", self.store.config().variant().name());
        #[cfg(feature = "tracing")]
        tracing::debug!(variant = self.store.config().variant().name(), "ad536x: reset");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Register writes
    // -----------------------------------------------------------------------

    /// Write one DAC, offset or gain register without pulsing LDAC.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] for an unencodable address.
    /// - [`Error::OutOfRange`] when validation is on and the code is outside
    ///   the channel bounds (single-channel writes only).
    /// - Transport errors. The store already holds the new code in that case.
    pub fn write(
        &mut self,
        kind: RegisterKind,
        bank: Bank,
        channel: Channel,
        code: u16,
    ) -> Result<()> {
        let word = encoder::prepare_write(&self.store, kind, bank, channel, code)
            .map_err(rejected)?;
        self.store.set(bank, channel, kind, code)?;
        self.send_command(word)
    }

    /// Write X1 and pulse LDAC.
    ///
    /// # Errors
    ///
    /// As for [`Ad536x::write`].
    pub fn write_dac(&mut self, bank: Bank, channel: Channel, code: u16) -> Result<()> {
        self.write(RegisterKind::Dac, bank, channel, code)?;
        self.load()
    }

    /// Write X1 and leave it pending until the next [`Ad536x::load`].
    ///
    /// # Errors
    ///
    /// As for [`Ad536x::write`].
    pub fn write_dac_hold(&mut self, bank: Bank, channel: Channel, code: u16) -> Result<()> {
        self.write(RegisterKind::Dac, bank, channel, code)
    }

    /// Convert `volts` with the channel calibration, write it and pulse LDAC.
    /// Returns the code written.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidVoltage`] for NaN, otherwise as for [`Ad536x::write`].
    /// The channel must be concrete: a broadcast has no single calibration.
    pub fn set_voltage(&mut self, bank: Bank, channel: Channel, volts: f64) -> Result<u16> {
        let code = self.voltage_to_code(bank, channel, volts)?;
        self.write_dac(bank, channel, code)?;
        Ok(code)
    }

    /// [`Ad536x::set_voltage`] without the LDAC pulse.
    ///
    /// # Errors
    ///
    /// As for [`Ad536x::set_voltage`].
    pub fn set_voltage_hold(&mut self, bank: Bank, channel: Channel, volts: f64) -> Result<u16> {
        let code = self.voltage_to_code(bank, channel, volts)?;
        self.write_dac_hold(bank, channel, code)?;
        Ok(code)
    }

    /// Write the C (offset trim) register and pulse LDAC.
    ///
    /// # Errors
    ///
    /// As for [`Ad536x::write`].
    pub fn write_offset(&mut self, bank: Bank, channel: Channel, code: u16) -> Result<()> {
        self.write(RegisterKind::Offset, bank, channel, code)?;
        self.load()
    }

    /// Write the M (gain trim) register and pulse LDAC.
    ///
    /// # Errors
    ///
    /// As for [`Ad536x::write`].
    pub fn write_gain(&mut self, bank: Bank, channel: Channel, code: u16) -> Result<()> {
        self.write(RegisterKind::Gain, bank, channel, code)?;
        self.load()
    }

    /// Write OFS0 or OFS1 (14-bit masked).
    ///
    /// The data sheet recommends holding CLR during range changes; combine
    /// with [`Ad536x::set_clear`] when glitches matter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`], transport errors.
    pub fn write_global_offset(&mut self, bank: Bank, code: u16) -> Result<()> {
        let word = encoder::encode_global_offset(bank, code).map_err(rejected)?;
        self.store.set_global_offset(bank, code)?;
        self.send_command(word)
    }

    // -----------------------------------------------------------------------
    // Calibration Store access
    // -----------------------------------------------------------------------

    /// Last written X1 code.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast or out-of-range address.
    pub fn dac(&self, bank: Bank, channel: Channel) -> Result<u16> {
        self.store.get(bank, channel, RegisterKind::Dac)
    }

    /// Last written C code.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast or out-of-range address.
    pub fn offset(&self, bank: Bank, channel: Channel) -> Result<u16> {
        self.store.get(bank, channel, RegisterKind::Offset)
    }

    /// Last written M code.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast or out-of-range address.
    pub fn gain(&self, bank: Bank, channel: Channel) -> Result<u16> {
        self.store.get(bank, channel, RegisterKind::Gain)
    }

    /// Last written OFSx code.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`].
    pub fn global_offset(&self, bank: Bank) -> Result<u16> {
        self.store.global_offset(bank)
    }

    /// Reference voltage used by the transfer function.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`].
    pub fn reference_voltage(&self, bank: Bank) -> Result<f64> {
        self.store.reference_voltage(bank)
    }

    /// Set the reference voltage of one bank, or both with [`Bank::All`].
    pub fn set_reference_voltage(&mut self, bank: Bank, volts: f64) {
        self.store.set_reference_voltage(bank, volts);
    }

    /// Validation bounds of one channel.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast or out-of-range address.
    pub fn bounds(&self, bank: Bank, channel: Channel) -> Result<CodeBounds> {
        self.store.bounds(bank, channel)
    }

    /// Replace validation bounds; broadcast selectors fan out.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `min > max`, [`Error::InvalidAddress`] for an
    /// out-of-range channel.
    pub fn set_bounds(&mut self, bank: Bank, channel: Channel, min: u16, max: u16) -> Result<()> {
        self.store.set_bounds(bank, channel, min, max)
    }

    /// Code that produces `volts` on one channel with its current calibration.
    ///
    /// # Errors
    ///
    /// See [`transfer::voltage_to_code`].
    pub fn voltage_to_code(&self, bank: Bank, channel: Channel, volts: f64) -> Result<u16> {
        transfer::voltage_to_code(&self.store, bank, channel, volts)
    }

    /// Output voltage of `code` on one channel with its current calibration.
    ///
    /// # Errors
    ///
    /// See [`transfer::code_to_voltage`].
    pub fn code_to_voltage(&self, bank: Bank, channel: Channel, code: u16) -> Result<f64> {
        transfer::code_to_voltage(&self.store, bank, channel, code)
    }

    // -----------------------------------------------------------------------
    // Control lines and special functions
    // -----------------------------------------------------------------------

    /// Pulse LDAC, updating every DAC output from its input register.
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub fn load(&mut self) -> Result<()> {
        self.transport.pulse_load()
    }

    /// Assert (`true`) or release (`false`) CLR.
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub fn set_clear(&mut self, active: bool) -> Result<()> {
        self.transport.set_clear(active)
    }

    /// Select `register` for readback and pulse LDAC. The value appears on
    /// SDO during the next frame; this driver does not read it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] when a per-channel register is given a
    /// broadcast or out-of-range address, transport errors.
    pub fn request_readback(
        &mut self,
        register: ReadbackRegister,
        bank: Bank,
        channel: Channel,
    ) -> Result<()> {
        let word = encoder::encode_read_request(self.store.config(), register, bank, channel)
            .map_err(rejected)?;
        self.send_command(word)?;
        self.load()
    }

    /// Make X1A or X1B the active input register.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegisterSelector`] for any other register, transport
    /// errors.
    pub fn select_x1(&mut self, register: ReadbackRegister) -> Result<()> {
        let word = encoder::encode_select_x1(register).map_err(rejected)?;
        self.send_command(word)
    }

    /// Route every channel to X2A or X2B through both A/B select registers.
    ///
    /// # Errors
    ///
    /// Transport errors. The second word is not sent if the first fails.
    pub fn select_x2(&mut self, source: AbSource) -> Result<()> {
        for word in encoder::encode_ab_select(source) {
            self.send_command(word)?;
        }
        Ok(())
    }

    /// Block write of all A/B select registers.
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub fn block_write_ab(&mut self, source: AbSource) -> Result<()> {
        self.send_command(encoder::encode_block_ab(source))
    }

    /// Send a raw word, bypassing the encoder and the store.
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub fn send_command(&mut self, word: CommandWord) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ad536x: command {}", word);
        #[cfg(feature = "tracing")]
        tracing::trace!(word = %word, "ad536x: command");
        self.transport.send_command(word)
    }

    // -----------------------------------------------------------------------
    // Ownership
    // -----------------------------------------------------------------------

    /// Register mirror.
    pub fn store(&self) -> &CalibrationStore {
        &self.store
    }

    /// Configuration the driver was built with.
    pub fn config(&self) -> &DeviceConfig {
        self.store.config()
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the transport.
    pub fn release(self) -> T {
        self.transport
    }
}

/// Log a request rejected before transmission.
fn rejected(err: Error) -> Error {
    #[cfg(feature = "defmt")]
    defmt::warn!("ad536x: request rejected: {}", err);
    #[cfg(feature = "tracing")]
    tracing::warn!(error = %err, "ad536x: request rejected");
    err
}
