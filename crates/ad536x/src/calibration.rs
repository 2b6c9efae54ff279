//! Calibration Store: in-memory mirror of the device registers.
//!
//! The AD536x has no readback decoding in this driver, so the store is the
//! only record of what was last written. It holds, per bank and channel, the
//! X1 (DAC), C (offset) and M (gain) codes and the validation bounds, and per
//! bank the OFSx global offset and the reference voltage used by the transfer
//! function.
//!
//! The three per-channel register tables are independent arrays selected by
//! [`RegisterKind`]. Every code is masked to the configured resolution before
//! it is stored.

use crate::config::{
    DeviceConfig, BANK_COUNT, DEFAULT_REFERENCE_VOLTAGE, GLOBAL_OFFSET_MASK,
    MAX_CHANNELS_PER_BANK,
};
use crate::error::{Error, Result};
use crate::types::{Bank, Channel, RegisterKind};

/// One code per (bank, channel) pair.
type Table = [[u16; MAX_CHANNELS_PER_BANK]; BANK_COUNT];

/// Inclusive validation bounds for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodeBounds {
    /// Lowest accepted code.
    pub min: u16,
    /// Highest accepted code.
    pub max: u16,
}

impl CodeBounds {
    /// Whether `code` lies inside the bounds.
    pub const fn contains(&self, code: u16) -> bool {
        code >= self.min && code <= self.max
    }
}

/// Snapshot of every calibration value that affects one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCalibration {
    /// Last written X1 code.
    pub dac: u16,
    /// C register.
    pub offset: u16,
    /// M register.
    pub gain: u16,
    /// OFSx register of the owning bank.
    pub global_offset: u16,
    /// Reference voltage of the owning bank.
    pub reference_voltage: f64,
    /// Validation bounds.
    pub bounds: CodeBounds,
}

/// Bank-wide state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BankState {
    global_offset: u16,
    reference_voltage: f64,
}

/// Register mirror for one AD536x device.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationStore {
    config: DeviceConfig,
    dac: Table,
    offset: Table,
    gain: Table,
    bounds: [[CodeBounds; MAX_CHANNELS_PER_BANK]; BANK_COUNT],
    banks: [BankState; BANK_COUNT],
}

impl CalibrationStore {
    /// Create a store holding the device reset values.
    pub fn new(config: DeviceConfig) -> Self {
        let d = config.defaults();
        let bank = BankState {
            global_offset: d.global_offset,
            reference_voltage: DEFAULT_REFERENCE_VOLTAGE,
        };
        Self {
            config,
            dac: [[d.dac; MAX_CHANNELS_PER_BANK]; BANK_COUNT],
            offset: [[d.offset; MAX_CHANNELS_PER_BANK]; BANK_COUNT],
            gain: [[d.gain; MAX_CHANNELS_PER_BANK]; BANK_COUNT],
            bounds: [[CodeBounds {
                min: d.min,
                max: d.max,
            }; MAX_CHANNELS_PER_BANK]; BANK_COUNT],
            banks: [bank; BANK_COUNT],
        }
    }

    /// Restore every register mirror, bound and reference voltage to its
    /// reset value.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Configuration the store was built with.
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    fn table(&self, kind: RegisterKind) -> &Table {
        match kind {
            RegisterKind::Dac => &self.dac,
            RegisterKind::Offset => &self.offset,
            RegisterKind::Gain => &self.gain,
        }
    }

    fn table_mut(&mut self, kind: RegisterKind) -> &mut Table {
        match kind {
            RegisterKind::Dac => &mut self.dac,
            RegisterKind::Offset => &mut self.offset,
            RegisterKind::Gain => &mut self.gain,
        }
    }

    /// Resolve a concrete (bank, channel) pair to table indices.
    fn locate(&self, bank: Bank, channel: Channel) -> Result<(usize, usize)> {
        let b = bank.index()?;
        let c = channel.index(self.config.channels_per_bank())?;
        Ok((b, c))
    }

    /// Last known code of one register.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast selector or an out-of-range
    /// channel.
    pub fn get(&self, bank: Bank, channel: Channel, kind: RegisterKind) -> Result<u16> {
        let (b, c) = self.locate(bank, channel)?;
        self.table(kind)
            .get(b)
            .and_then(|row| row.get(c))
            .copied()
            .ok_or(Error::InvalidAddress)
    }

    /// Store a code, masked to the device resolution.
    ///
    /// Broadcast selectors fan the code out to every matching pair.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for an out-of-range channel. Nothing is
    /// stored in that case.
    pub fn set(
        &mut self,
        bank: Bank,
        channel: Channel,
        kind: RegisterKind,
        code: u16,
    ) -> Result<()> {
        let code = code & self.config.resolution().mask();
        let channels = channel.indices(self.config.channels_per_bank())?;
        let table = self.table_mut(kind);
        for b in bank.indices() {
            let row = table.get_mut(b).ok_or(Error::InvalidAddress)?;
            for slot in row.get_mut(channels.clone()).ok_or(Error::InvalidAddress)? {
                *slot = code;
            }
        }
        Ok(())
    }

    /// Validation bounds of one channel.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast selector or an out-of-range
    /// channel.
    pub fn bounds(&self, bank: Bank, channel: Channel) -> Result<CodeBounds> {
        let (b, c) = self.locate(bank, channel)?;
        self.bounds
            .get(b)
            .and_then(|row| row.get(c))
            .copied()
            .ok_or(Error::InvalidAddress)
    }

    /// Replace the validation bounds, fanning out over broadcast selectors.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `min > max` after masking,
    /// [`Error::InvalidAddress`] for an out-of-range channel.
    pub fn set_bounds(&mut self, bank: Bank, channel: Channel, min: u16, max: u16) -> Result<()> {
        let mask = self.config.resolution().mask();
        let bounds = CodeBounds {
            min: min & mask,
            max: max & mask,
        };
        if bounds.min > bounds.max {
            return Err(Error::OutOfRange {
                code: bounds.min,
                min: bounds.min,
                max: bounds.max,
            });
        }
        let channels = channel.indices(self.config.channels_per_bank())?;
        for b in bank.indices() {
            let row = self.bounds.get_mut(b).ok_or(Error::InvalidAddress)?;
            for slot in row.get_mut(channels.clone()).ok_or(Error::InvalidAddress)? {
                *slot = bounds;
            }
        }
        Ok(())
    }

    /// Check `code` against one channel's bounds.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the code falls outside,
    /// [`Error::InvalidAddress`] for a broadcast selector.
    pub fn validate(&self, bank: Bank, channel: Channel, code: u16) -> Result<()> {
        let bounds = self.bounds(bank, channel)?;
        if bounds.contains(code) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                code,
                min: bounds.min,
                max: bounds.max,
            })
        }
    }

    fn bank_state(&self, bank: Bank) -> Result<&BankState> {
        self.banks.get(bank.index()?).ok_or(Error::InvalidAddress)
    }

    /// OFSx code of a bank.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`].
    pub fn global_offset(&self, bank: Bank) -> Result<u16> {
        self.bank_state(bank).map(|s| s.global_offset)
    }

    /// Store an OFSx code (always 14-bit masked).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`]; the device has no
    /// broadcast form of the OFSx write.
    pub fn set_global_offset(&mut self, bank: Bank, code: u16) -> Result<()> {
        let state = self
            .banks
            .get_mut(bank.index()?)
            .ok_or(Error::InvalidAddress)?;
        state.global_offset = code & GLOBAL_OFFSET_MASK;
        Ok(())
    }

    /// Reference voltage of a bank.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`].
    pub fn reference_voltage(&self, bank: Bank) -> Result<f64> {
        self.bank_state(bank).map(|s| s.reference_voltage)
    }

    /// Set the reference voltage of one bank, or both with [`Bank::All`].
    ///
    /// The value is not range-checked.
    pub fn set_reference_voltage(&mut self, bank: Bank, volts: f64) {
        for b in bank.indices() {
            if let Some(state) = self.banks.get_mut(b) {
                state.reference_voltage = volts;
            }
        }
    }

    /// Every value the transfer function needs for one channel.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for a broadcast selector or an out-of-range
    /// channel.
    pub fn channel(&self, bank: Bank, channel: Channel) -> Result<ChannelCalibration> {
        let state = self.bank_state(bank)?;
        Ok(ChannelCalibration {
            dac: self.get(bank, channel, RegisterKind::Dac)?,
            offset: self.get(bank, channel, RegisterKind::Offset)?,
            gain: self.get(bank, channel, RegisterKind::Gain)?,
            global_offset: state.global_offset,
            reference_voltage: state.reference_voltage,
            bounds: self.bounds(bank, channel)?,
        })
    }
}
