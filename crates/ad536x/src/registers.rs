//! AD536x register map
//!
//! Source: Analog Devices AD5360/AD5361 and AD5362/AD5363 data sheets,
//! "Serial Interface" and "Register Update Rates" sections.
//!
//! # Input shift register
//!
//! Every write is one 24-bit word, clocked MSB first while SYNC is low:
//!
//! ```text
//!  23 22 | 21 20 19 18 17 16 | 15 ............................ 0
//!  M1 M0 | A5 A4 A3 A2 A1 A0 | D15 ........................... D0
//! ```
//!
//! - `M1 M0` selects the register: X1 input data, C offset, M gain, or the
//!   special-function space (`00`).
//! - `A5..A0` is the address. `A5..A3` pick the group (bank), `A2..A0` the
//!   channel inside the group. In the special-function space the same six
//!   bits carry the function code `S5..S0`.
//! - 14-bit parts take data in `D15..D2`; `D1..D0` are don't-care.

use crate::error::Error;
use crate::types::RegisterKind;

// ---------------------------------------------------------------------------
// Field positions
// ---------------------------------------------------------------------------

/// Shift of the `M1 M0` mode field.
pub const MODE_SHIFT: u32 = 22;

/// Shift of the `A5..A0` address / `S5..S0` function field.
pub const ADDRESS_SHIFT: u32 = 16;

/// Mask of the `A5..A0` field (before shifting).
pub const ADDRESS_MASK: u32 = 0x3F;

/// Mask of the 16-bit data field.
pub const DATA_MASK: u32 = 0xFFFF;

/// Width of one command word in bytes.
pub const COMMAND_BYTES: usize = 3;

// ---------------------------------------------------------------------------
// Mode bits (already shifted)
// ---------------------------------------------------------------------------

/// Write X1 input data register.
pub const WRITE_DAC: u32 = 0b11 << MODE_SHIFT;

/// Write C (offset trim) register.
pub const WRITE_OFFSET: u32 = 0b10 << MODE_SHIFT;

/// Write M (gain trim) register.
pub const WRITE_GAIN: u32 = 0b01 << MODE_SHIFT;

/// Special-function space.
pub const SPECIAL_FUNCTION: u32 = 0b00 << MODE_SHIFT;

// ---------------------------------------------------------------------------
// Address field (already shifted)
// ---------------------------------------------------------------------------

/// All channels of both groups. The address field is zero.
pub const ADDR_ALL_BANKS: u32 = 0b000_000 << ADDRESS_SHIFT;

/// All channels of group 0.
pub const ADDR_ALL_BANK0: u32 = 0b000_001 << ADDRESS_SHIFT;

/// All channels of group 1.
pub const ADDR_ALL_BANK1: u32 = 0b000_010 << ADDRESS_SHIFT;

/// Group 0, single channel. OR in `channel << ADDRESS_SHIFT`.
pub const ADDR_BANK0: u32 = 0b001_000 << ADDRESS_SHIFT;

/// Group 1, single channel. OR in `channel << ADDRESS_SHIFT`.
pub const ADDR_BANK1: u32 = 0b010_000 << ADDRESS_SHIFT;

// ---------------------------------------------------------------------------
// Special function codes S5..S0 (already shifted)
// ---------------------------------------------------------------------------

/// NOP; clocks out the readback register on SDO.
pub const SF_NOP: u32 = 0b000_000 << ADDRESS_SHIFT;

/// Write control register.
pub const SF_WRITE_CONTROL: u32 = 0b000_001 << ADDRESS_SHIFT;

/// Write OFS0 (group 0 global offset, 14 bits).
pub const SF_WRITE_OFS0: u32 = 0b000_010 << ADDRESS_SHIFT;

/// Write OFS1 (group 1 global offset, 14 bits).
pub const SF_WRITE_OFS1: u32 = 0b000_011 << ADDRESS_SHIFT;

/// Select a register for readback.
pub const SF_READBACK_SELECT: u32 = 0b000_101 << ADDRESS_SHIFT;

/// Write A/B select register 0.
pub const SF_WRITE_AB_SELECT0: u32 = 0b000_110 << ADDRESS_SHIFT;

/// Write A/B select register 1.
pub const SF_WRITE_AB_SELECT1: u32 = 0b000_111 << ADDRESS_SHIFT;

/// Block write to every A/B select register.
pub const SF_BLOCK_WRITE_AB_SELECT: u32 = 0b001_011 << ADDRESS_SHIFT;

// ---------------------------------------------------------------------------
// Control register bits
// ---------------------------------------------------------------------------

/// Control register F2: `0` = X1A is the active input register, `1` = X1B.
pub const CONTROL_X1B: u32 = 1 << 2;

// ---------------------------------------------------------------------------
// Readback selector (data field of SF_READBACK_SELECT)
// ---------------------------------------------------------------------------

/// Shift of the `F15..F13` register-class field.
pub const READBACK_CLASS_SHIFT: u32 = 13;

/// Shift of the `F12..F7` address field.
pub const READBACK_ADDRESS_SHIFT: u32 = 7;

/// `F15..F13` for X1A.
pub const READBACK_X1A: u32 = 0b000 << READBACK_CLASS_SHIFT;
/// `F15..F13` for X1B.
pub const READBACK_X1B: u32 = 0b001 << READBACK_CLASS_SHIFT;
/// `F15..F13` for C.
pub const READBACK_C: u32 = 0b010 << READBACK_CLASS_SHIFT;
/// `F15..F13` for M.
pub const READBACK_M: u32 = 0b011 << READBACK_CLASS_SHIFT;
/// `F15..F13` for the special-register class.
pub const READBACK_SPECIAL: u32 = 0b100 << READBACK_CLASS_SHIFT;

/// `F12..F7` for the control register.
pub const READBACK_CONTROL: u32 = READBACK_SPECIAL | (0b000_001 << READBACK_ADDRESS_SHIFT);
/// `F12..F7` for OFS0.
pub const READBACK_OFS0: u32 = READBACK_SPECIAL | (0b000_010 << READBACK_ADDRESS_SHIFT);
/// `F12..F7` for OFS1.
pub const READBACK_OFS1: u32 = READBACK_SPECIAL | (0b000_011 << READBACK_ADDRESS_SHIFT);
/// `F12..F7` for A/B select register 0.
pub const READBACK_AB_SELECT0: u32 = READBACK_SPECIAL | (0b000_110 << READBACK_ADDRESS_SHIFT);
/// `F12..F7` for A/B select register 1.
pub const READBACK_AB_SELECT1: u32 = READBACK_SPECIAL | (0b000_111 << READBACK_ADDRESS_SHIFT);
/// `F12..F7` for the GPIO register.
pub const READBACK_GPIO: u32 = READBACK_SPECIAL | (0b001_101 << READBACK_ADDRESS_SHIFT);

// ---------------------------------------------------------------------------
// Command word
// ---------------------------------------------------------------------------

/// One 24-bit instruction for the input shift register.
///
/// Only the low 24 bits are ever set; construction masks the rest away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct CommandWord(u32);

impl CommandWord {
    /// Mask of the 24 significant bits.
    pub const MASK: u32 = 0x00FF_FFFF;

    /// Wrap a raw word, discarding bits above bit 23.
    pub const fn new(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    /// Raw 24-bit value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// `M1 M0` field.
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)] // two bits
    pub const fn mode(self) -> u8 {
        (self.0 >> MODE_SHIFT) as u8
    }

    /// `A5..A0` (or `S5..S0`) field.
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)] // six bits
    pub const fn address(self) -> u8 {
        ((self.0 >> ADDRESS_SHIFT) & ADDRESS_MASK) as u8
    }

    /// `D15..D0` field.
    #[allow(clippy::cast_possible_truncation)] // sixteen bits
    pub const fn payload(self) -> u16 {
        (self.0 & DATA_MASK) as u16
    }

    /// Per-channel register addressed by the mode field.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegisterSelector`] for a special-function word.
    pub fn register_kind(self) -> Result<RegisterKind, Error> {
        RegisterKind::try_from(self.mode())
    }

    /// Bytes in transmission order (MSB first).
    pub const fn to_be_bytes(self) -> [u8; COMMAND_BYTES] {
        let [_, hi, mid, lo] = self.0.to_be_bytes();
        [hi, mid, lo]
    }
}

impl From<CommandWord> for u32 {
    fn from(word: CommandWord) -> Self {
        word.0
    }
}

impl core::fmt::Display for CommandWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}
