//! Voltage/code transfer function.
//!
//! The AD536x output for an X1 input code is
//!
//! ```text
//! DAC_CODE = X1 · (M + 1) / 2^N + (C − 2^(N−1))
//! VOUT     = 4 · VREF · (DAC_CODE − k · OFS) / 2^N
//! ```
//!
//! with `N` the resolution, `k = 4` on 16-bit parts (OFS is a 14-bit register)
//! and `k = 1` on 14-bit parts.
//!
//! [`voltage_to_code`] solves this for X1:
//!
//! ```text
//! DAC_CODE = V · 2^N / (4 · VREF) + k · OFS
//! mm       = (m + 1) / 2^N
//! cc       = c − 2^(N−1)
//! X1       = (DAC_CODE − cc) / mm
//! ```
//!
//! where `m = M − M_default` and `c = C − C_default`, except that a register
//! still holding its reset value contributes the reset value itself instead of
//! zero. At reset calibration this gives `mm = 1` and `cc = 0`, the identity
//! trim. The substitution is kept as is; its behaviour away from reset
//! calibration has not been checked against hardware.
//!
//! The result is truncated and clamped to the device code range, never to the
//! per-channel validation bounds.
//!
//! [`code_to_voltage`] applies the same `mm`/`cc` in the forward direction, so
//! the two functions invert each other for every calibration. The 14-bit form
//! is derived by analogy with the 16-bit one and needs hardware confirmation.

use crate::calibration::{CalibrationStore, ChannelCalibration};
use crate::config::{Defaults, Resolution};
use crate::error::{Error, Result};
use crate::types::{Bank, Channel};

/// Resolution-dependent constants of the transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scale {
    /// 2^N.
    full: f64,
    /// 2^(N−1).
    half: f64,
    /// Weight of the OFS code inside DAC_CODE.
    global_offset_weight: f64,
}

impl Scale {
    const fn of(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Bits16 => Self {
                full: 65_536.0,
                half: 32_768.0,
                global_offset_weight: 4.0,
            },
            Resolution::Bits14 => Self {
                full: 16_384.0,
                half: 8_192.0,
                global_offset_weight: 1.0,
            },
        }
    }
}

/// Gain slope `mm` and offset intercept `cc` for one channel.
fn slope_and_intercept(cal: &ChannelCalibration, defaults: &Defaults, scale: Scale) -> (f64, f64) {
    let m = if cal.gain == defaults.gain {
        f64::from(defaults.gain)
    } else {
        f64::from(cal.gain) - f64::from(defaults.gain)
    };
    let c = if cal.offset == defaults.offset {
        f64::from(defaults.offset)
    } else {
        f64::from(cal.offset) - f64::from(defaults.offset)
    };
    ((m + 1.0) / scale.full, c - scale.half)
}

/// Convert a voltage to the X1 code for one channel's calibration.
///
/// # Errors
///
/// [`Error::InvalidVoltage`] when the arithmetic yields NaN (NaN input, or a
/// degenerate calibration such as a zero slope at the intercept).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped first
pub fn voltage_to_code_with(
    cal: &ChannelCalibration,
    resolution: Resolution,
    volts: f64,
) -> Result<u16> {
    let defaults = resolution.defaults();
    let scale = Scale::of(resolution);
    let (mm, cc) = slope_and_intercept(cal, &defaults, scale);

    let dac_code = volts * scale.full / (4.0 * cal.reference_voltage)
        + scale.global_offset_weight * f64::from(cal.global_offset);
    let code = (dac_code - cc) / mm;

    if code.is_nan() {
        return Err(Error::InvalidVoltage);
    }
    Ok(code.clamp(f64::from(defaults.min), f64::from(defaults.max)) as u16)
}

/// Convert an X1 code back to the output voltage for one channel's
/// calibration. No clamping is applied.
pub fn code_to_voltage_with(cal: &ChannelCalibration, resolution: Resolution, code: u16) -> f64 {
    let defaults = resolution.defaults();
    let scale = Scale::of(resolution);
    let (mm, cc) = slope_and_intercept(cal, &defaults, scale);

    let dac_code = f64::from(code) * mm + cc;
    4.0 * cal.reference_voltage
        * (dac_code - scale.global_offset_weight * f64::from(cal.global_offset))
        / scale.full
}

/// Convert a voltage to the X1 code using the stored calibration of
/// (`bank`, `channel`).
///
/// # Errors
///
/// [`Error::InvalidAddress`] for a broadcast or out-of-range address,
/// [`Error::InvalidVoltage`] as for [`voltage_to_code_with`].
pub fn voltage_to_code(
    store: &CalibrationStore,
    bank: Bank,
    channel: Channel,
    volts: f64,
) -> Result<u16> {
    let cal = store.channel(bank, channel)?;
    voltage_to_code_with(&cal, store.config().resolution(), volts)
}

/// Convert an X1 code to volts using the stored calibration of
/// (`bank`, `channel`).
///
/// # Errors
///
/// [`Error::InvalidAddress`] for a broadcast or out-of-range address.
pub fn code_to_voltage(
    store: &CalibrationStore,
    bank: Bank,
    channel: Channel,
    code: u16,
) -> Result<f64> {
    let cal = store.channel(bank, channel)?;
    Ok(code_to_voltage_with(&cal, store.config().resolution(), code))
}

/// Voltage step of one code at reset calibration: `4 · VREF / 2^N`.
pub fn lsb_volts(resolution: Resolution, reference_voltage: f64) -> f64 {
    4.0 * reference_voltage / Scale::of(resolution).full
}
