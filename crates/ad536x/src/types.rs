//! Address and register selector types.
//!
//! - [`Bank`] / [`Channel`]: a write target; `All` selects a broadcast address.
//! - [`RegisterKind`]: which per-channel register table a write lands in.
//! - [`ReadbackRegister`]: registers that can be selected for readback.
//! - [`AbSource`]: X2A/X2B selection for the A/B select registers.

use core::str::FromStr;

use crate::config::BANK_COUNT;
use crate::error::{Error, Result};

// ── Bank ─────────────────────────────────────────────────────────────────────

/// Bank (channel group) selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Group 0.
    Bank0,
    /// Group 1.
    Bank1,
    /// Both groups (broadcast).
    All,
}

impl Bank {
    /// Both concrete banks, in index order.
    pub const BOTH: [Bank; BANK_COUNT] = [Bank::Bank0, Bank::Bank1];

    /// Table index of a concrete bank.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Bank::All`].
    pub const fn index(self) -> Result<usize> {
        match self {
            Self::Bank0 => Ok(0),
            Self::Bank1 => Ok(1),
            Self::All => Err(Error::InvalidAddress),
        }
    }

    /// Concrete banks covered by this selector.
    pub fn indices(self) -> core::ops::Range<usize> {
        match self {
            Self::Bank0 => 0..1,
            Self::Bank1 => 1..2,
            Self::All => 0..BANK_COUNT,
        }
    }
}

impl TryFrom<u8> for Bank {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Bank0),
            1 => Ok(Self::Bank1),
            _ => Err(Error::InvalidAddress),
        }
    }
}

// ── Channel ──────────────────────────────────────────────────────────────────

/// Channel selector within a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// One channel, zero-based.
    Index(u8),
    /// Every channel of the selected bank(s) (broadcast).
    All,
}

impl Channel {
    /// Index of a concrete channel, checked against `channels_per_bank`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for [`Channel::All`] or an index that is not
    /// below `channels_per_bank`.
    pub fn index(self, channels_per_bank: u8) -> Result<usize> {
        match self {
            Self::Index(ch) if ch < channels_per_bank => Ok(usize::from(ch)),
            _ => Err(Error::InvalidAddress),
        }
    }

    /// Concrete channels covered by this selector.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if a concrete index is out of range.
    #[allow(clippy::arithmetic_side_effects)] // index < 8
    pub fn indices(self, channels_per_bank: u8) -> Result<core::ops::Range<usize>> {
        match self {
            Self::All => Ok(0..usize::from(channels_per_bank)),
            Self::Index(_) => {
                let ch = self.index(channels_per_bank)?;
                Ok(ch..ch + 1)
            }
        }
    }
}

impl From<u8> for Channel {
    fn from(ch: u8) -> Self {
        Self::Index(ch)
    }
}

// ── RegisterKind ─────────────────────────────────────────────────────────────

/// Per-channel register written by a data write (mode bits M1..M0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterKind {
    /// X1 input data register (`M1M0 = 11`).
    Dac,
    /// C offset trim register (`M1M0 = 10`).
    Offset,
    /// M gain trim register (`M1M0 = 01`).
    Gain,
}

impl RegisterKind {
    /// Mode bits M1..M0 for this register.
    pub const fn mode_bits(self) -> u8 {
        match self {
            Self::Dac => 0b11,
            Self::Offset => 0b10,
            Self::Gain => 0b01,
        }
    }
}

impl TryFrom<u8> for RegisterKind {
    type Error = Error;

    /// Decode raw mode bits. `00` is the special-function space, not a
    /// per-channel register.
    fn try_from(mode: u8) -> Result<Self> {
        match mode {
            0b11 => Ok(Self::Dac),
            0b10 => Ok(Self::Offset),
            0b01 => Ok(Self::Gain),
            _ => Err(Error::InvalidRegisterSelector),
        }
    }
}

// ── ReadbackRegister ─────────────────────────────────────────────────────────

/// Registers that can be selected for readback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadbackRegister {
    /// Channel input register X1A.
    X1A,
    /// Channel input register X1B.
    X1B,
    /// Channel offset trim register C.
    C,
    /// Channel gain trim register M.
    M,
    /// Control register.
    Control,
    /// Bank 0 global offset.
    Ofs0,
    /// Bank 1 global offset.
    Ofs1,
    /// A/B select register 0.
    AbSelect0,
    /// A/B select register 1.
    AbSelect1,
    /// GPIO register.
    Gpio,
}

impl ReadbackRegister {
    /// Every readback register, in selector order.
    pub const ALL: [ReadbackRegister; 10] = [
        Self::X1A,
        Self::X1B,
        Self::C,
        Self::M,
        Self::Control,
        Self::Ofs0,
        Self::Ofs1,
        Self::AbSelect0,
        Self::AbSelect1,
        Self::Gpio,
    ];

    /// Whether the selector carries a channel address.
    pub const fn is_per_channel(self) -> bool {
        matches!(self, Self::X1A | Self::X1B | Self::C | Self::M)
    }

    /// Short name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::X1A => "x1a",
            Self::X1B => "x1b",
            Self::C => "c",
            Self::M => "m",
            Self::Control => "cr",
            Self::Ofs0 => "ofs0",
            Self::Ofs1 => "ofs1",
            Self::AbSelect0 => "ab0",
            Self::AbSelect1 => "ab1",
            Self::Gpio => "gpio",
        }
    }
}

impl FromStr for ReadbackRegister {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(s))
            .ok_or(Error::InvalidRegisterSelector)
    }
}

// ── AbSource ─────────────────────────────────────────────────────────────────

/// Which X2 register feeds the DAC when A/B toggling is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbSource {
    /// X2A for every channel (select bits cleared).
    X2A,
    /// X2B for every channel (select bits set).
    X2B,
}

impl AbSource {
    /// Select-register byte applying this source to all eight channels.
    pub const fn select_bits(self) -> u8 {
        match self {
            Self::X2A => 0x00,
            Self::X2B => 0xFF,
        }
    }
}
