//! Driver error type.
//!
//! Every rejected request is reported; nothing is dropped silently. An error
//! returned before transmission guarantees the Calibration Store was left
//! untouched.

/// Errors returned by the AD536x driver.
#[derive(Debug, thiserror_no_std::Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The bank/channel combination has no encoding, or the channel index is
    /// beyond the variant's channel count.
    #[error("no encoding for this bank/channel address")]
    InvalidAddress,
    /// Unknown register-mode bits or readback register name.
    #[error("unrecognised register selector")]
    InvalidRegisterSelector,
    /// The code is outside the channel's validation bounds.
    #[error("code {code} outside channel bounds [{min}, {max}]")]
    OutOfRange {
        /// Rejected code.
        code: u16,
        /// Inclusive lower bound.
        min: u16,
        /// Inclusive upper bound.
        max: u16,
    },
    /// Resolution is neither 14 nor 16 bits.
    #[error("unsupported resolution: {0} bits")]
    UnsupportedResolution(u8),
    /// The transfer function produced no defined code.
    #[error("voltage does not map to a code")]
    InvalidVoltage,
    /// SPI transfer failed.
    #[error("SPI communication error")]
    Communication,
    /// A control line (LDAC, RESET, CLR) could not be driven.
    #[error("GPIO error")]
    Gpio,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_bounds() {
        let e = Error::OutOfRange {
            code: 50,
            min: 100,
            max: 60000,
        };
        assert_eq!(e.to_string(), "code 50 outside channel bounds [100, 60000]");
    }

    #[test]
    fn display_names_the_resolution() {
        assert_eq!(
            Error::UnsupportedResolution(12).to_string(),
            "unsupported resolution: 12 bits"
        );
    }
}
