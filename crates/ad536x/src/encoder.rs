//! Command encoder: (register, address, data) → [`CommandWord`].
//!
//! Pure functions. Nothing here touches the Calibration Store except
//! [`prepare_write`], which only reads the channel bounds.

use crate::calibration::CalibrationStore;
use crate::config::{DeviceConfig, GLOBAL_OFFSET_MASK};
use crate::error::{Error, Result};
use crate::registers::{
    CommandWord, ADDRESS_SHIFT, ADDR_ALL_BANK0, ADDR_ALL_BANK1, ADDR_ALL_BANKS, ADDR_BANK0,
    ADDR_BANK1, CONTROL_X1B, DATA_MASK, MODE_SHIFT, READBACK_AB_SELECT0, READBACK_AB_SELECT1,
    READBACK_ADDRESS_SHIFT, READBACK_C, READBACK_CONTROL, READBACK_GPIO, READBACK_M,
    READBACK_OFS0, READBACK_OFS1, READBACK_X1A, READBACK_X1B, SF_BLOCK_WRITE_AB_SELECT,
    SF_READBACK_SELECT, SF_WRITE_AB_SELECT0, SF_WRITE_AB_SELECT1, SF_WRITE_CONTROL,
    SF_WRITE_OFS0, SF_WRITE_OFS1, SPECIAL_FUNCTION,
};
use crate::types::{AbSource, Bank, Channel, ReadbackRegister, RegisterKind};

/// Unshifted `A5..A0` value of one concrete channel: group bits | channel.
///
/// # Errors
///
/// [`Error::InvalidAddress`] for a broadcast selector or a channel index at
/// or above the variant's channel count.
#[allow(clippy::arithmetic_side_effects)] // constant shift of a six-bit field
pub fn channel_address(config: &DeviceConfig, bank: Bank, channel: Channel) -> Result<u8> {
    let group = match bank {
        Bank::Bank0 => ADDR_BANK0 >> ADDRESS_SHIFT,
        Bank::Bank1 => ADDR_BANK1 >> ADDRESS_SHIFT,
        Bank::All => return Err(Error::InvalidAddress),
    };
    let Channel::Index(ch) = channel else {
        return Err(Error::InvalidAddress);
    };
    channel.index(config.channels_per_bank())?;
    #[allow(clippy::cast_possible_truncation)] // group is a six-bit field
    let group = group as u8;
    Ok(group | ch)
}

/// Shifted address field for a data write.
///
/// | bank     | channel    | field        |
/// |----------|------------|--------------|
/// | `All`    | `All`      | `000000`     |
/// | `Bank0`  | `All`      | `000001`     |
/// | `Bank1`  | `All`      | `000010`     |
/// | `Bank0`  | `Index(c)` | `001ccc`     |
/// | `Bank1`  | `Index(c)` | `010ccc`     |
/// | `All`    | `Index(_)` | no encoding  |
///
/// # Errors
///
/// [`Error::InvalidAddress`] for the last row or an out-of-range index.
#[allow(clippy::arithmetic_side_effects)] // six-bit field shifted below bit 22
pub fn address_field(config: &DeviceConfig, bank: Bank, channel: Channel) -> Result<u32> {
    match (bank, channel) {
        (Bank::All, Channel::All) => Ok(ADDR_ALL_BANKS),
        (Bank::Bank0, Channel::All) => Ok(ADDR_ALL_BANK0),
        (Bank::Bank1, Channel::All) => Ok(ADDR_ALL_BANK1),
        (Bank::All, Channel::Index(_)) => Err(Error::InvalidAddress),
        (Bank::Bank0 | Bank::Bank1, Channel::Index(_)) => {
            let addr = channel_address(config, bank, channel)?;
            Ok(u32::from(addr) << ADDRESS_SHIFT)
        }
    }
}

/// Assemble a DAC, offset or gain write.
///
/// `data` is masked to the configured resolution; 14-bit data is moved up
/// into `D15..D2`.
///
/// # Errors
///
/// [`Error::InvalidAddress`] as for [`address_field`].
#[allow(clippy::arithmetic_side_effects)] // 16-bit data shifted by at most 2, then masked
pub fn encode_write(
    config: &DeviceConfig,
    kind: RegisterKind,
    bank: Bank,
    channel: Channel,
    data: u16,
) -> Result<CommandWord> {
    let resolution = config.resolution();
    let data = u32::from(data & resolution.mask());
    let payload = (data << resolution.payload_shift()) & DATA_MASK;
    let mode = u32::from(kind.mode_bits()) << MODE_SHIFT;
    let address = address_field(config, bank, channel)?;
    Ok(CommandWord::new(mode | address | payload))
}

/// Encode a write and, when the configuration enables it, run the
/// validation gate.
///
/// Only single-channel writes are checked; broadcast writes skip the gate.
/// The store is read, never written.
///
/// # Errors
///
/// [`Error::InvalidAddress`] as for [`address_field`], [`Error::OutOfRange`]
/// when the masked code falls outside the channel bounds.
pub fn prepare_write(
    store: &CalibrationStore,
    kind: RegisterKind,
    bank: Bank,
    channel: Channel,
    data: u16,
) -> Result<CommandWord> {
    let config = store.config();
    let word = encode_write(config, kind, bank, channel, data)?;
    let single = bank != Bank::All && channel != Channel::All;
    if config.validate() && single {
        store.validate(bank, channel, data & config.resolution().mask())?;
    }
    Ok(word)
}

/// Readback selector for `F15..F7`.
///
/// Per-channel registers (X1A, X1B, C, M) need a concrete bank and channel;
/// every other register ignores them.
///
/// # Errors
///
/// [`Error::InvalidAddress`] when a per-channel register is given a
/// broadcast or out-of-range address.
#[allow(clippy::arithmetic_side_effects)] // six-bit address shifted into F12..F7
pub fn readback_selector(
    config: &DeviceConfig,
    register: ReadbackRegister,
    bank: Bank,
    channel: Channel,
) -> Result<u32> {
    let class = match register {
        ReadbackRegister::X1A => READBACK_X1A,
        ReadbackRegister::X1B => READBACK_X1B,
        ReadbackRegister::C => READBACK_C,
        ReadbackRegister::M => READBACK_M,
        ReadbackRegister::Control => return Ok(READBACK_CONTROL),
        ReadbackRegister::Ofs0 => return Ok(READBACK_OFS0),
        ReadbackRegister::Ofs1 => return Ok(READBACK_OFS1),
        ReadbackRegister::AbSelect0 => return Ok(READBACK_AB_SELECT0),
        ReadbackRegister::AbSelect1 => return Ok(READBACK_AB_SELECT1),
        ReadbackRegister::Gpio => return Ok(READBACK_GPIO),
    };
    let addr = channel_address(config, bank, channel)?;
    Ok(class | (u32::from(addr) << READBACK_ADDRESS_SHIFT))
}

/// Assemble the special-function word that selects `register` for readback.
///
/// # Errors
///
/// As for [`readback_selector`].
pub fn encode_read_request(
    config: &DeviceConfig,
    register: ReadbackRegister,
    bank: Bank,
    channel: Channel,
) -> Result<CommandWord> {
    let selector = readback_selector(config, register, bank, channel)?;
    Ok(CommandWord::new(
        SPECIAL_FUNCTION | SF_READBACK_SELECT | selector,
    ))
}

/// Assemble an OFS0/OFS1 write. The code is masked to 14 bits.
///
/// # Errors
///
/// [`Error::InvalidAddress`] for [`Bank::All`].
pub fn encode_global_offset(bank: Bank, code: u16) -> Result<CommandWord> {
    let function = match bank {
        Bank::Bank0 => SF_WRITE_OFS0,
        Bank::Bank1 => SF_WRITE_OFS1,
        Bank::All => return Err(Error::InvalidAddress),
    };
    let data = u32::from(code & GLOBAL_OFFSET_MASK);
    Ok(CommandWord::new(SPECIAL_FUNCTION | function | data))
}

/// Control-register write selecting X1A or X1B as the active input register.
///
/// # Errors
///
/// [`Error::InvalidRegisterSelector`] for anything but X1A or X1B.
pub fn encode_select_x1(register: ReadbackRegister) -> Result<CommandWord> {
    let bits = match register {
        ReadbackRegister::X1A => 0,
        ReadbackRegister::X1B => CONTROL_X1B,
        _ => return Err(Error::InvalidRegisterSelector),
    };
    Ok(CommandWord::new(SPECIAL_FUNCTION | SF_WRITE_CONTROL | bits))
}

/// Writes to A/B select registers 0 and 1, in that order, routing every
/// channel to `source`.
pub fn encode_ab_select(source: AbSource) -> [CommandWord; 2] {
    let bits = u32::from(source.select_bits());
    [
        CommandWord::new(SPECIAL_FUNCTION | SF_WRITE_AB_SELECT0 | bits),
        CommandWord::new(SPECIAL_FUNCTION | SF_WRITE_AB_SELECT1 | bits),
    ]
}

/// Block write of every A/B select register.
pub fn encode_block_ab(source: AbSource) -> CommandWord {
    let bits = u32::from(source.select_bits());
    CommandWord::new(SPECIAL_FUNCTION | SF_BLOCK_WRITE_AB_SELECT | bits)
}
