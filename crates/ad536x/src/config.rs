//! Device configuration for the AD536x family.
//!
//! The variant and resolution are fixed when the driver is built. They decide
//! the channel count per bank, the data mask, the reset values of every
//! register and the constants used by the transfer function.
//!
//! | Variant | Channels | Per bank | Resolution |
//! |---------|----------|----------|------------|
//! | AD5360  | 16       | 8        | 16-bit     |
//! | AD5361  | 16       | 8        | 14-bit     |
//! | AD5362  | 8        | 4        | 16-bit     |
//! | AD5363  | 8        | 4        | 14-bit     |

use crate::error::Error;

/// Number of independent banks (groups) on every AD536x part.
pub const BANK_COUNT: usize = 2;

/// Largest channel count per bank across the family (AD5360/AD5361).
pub const MAX_CHANNELS_PER_BANK: usize = 8;

/// Global offset (OFS0/OFS1) registers are 14 bits wide on every variant.
pub const GLOBAL_OFFSET_MASK: u16 = 0x3FFF;

/// Power-on reference voltage assumed for both banks.
pub const DEFAULT_REFERENCE_VOLTAGE: f64 = 5.0;

/// Recommended SPI settings for board bring-up.
///
/// The driver never configures the bus; these are for the code that does.
pub struct SpiSettings;

impl SpiSettings {
    /// CPOL=0, CPHA=1: data is sampled on the falling SCLK edge.
    pub const MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_1;
    /// Maximum SCLK for write cycles.
    pub const MAX_WRITE_HZ: u32 = 50_000_000;
    /// Maximum SCLK for readback cycles.
    pub const MAX_READ_HZ: u32 = 20_000_000;
}

/// AD536x part number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// 16 channels, 16-bit.
    Ad5360,
    /// 16 channels, 14-bit.
    Ad5361,
    /// 8 channels, 16-bit.
    Ad5362,
    /// 8 channels, 14-bit.
    Ad5363,
}

impl Variant {
    /// Channels addressable within one bank.
    pub const fn channels_per_bank(self) -> u8 {
        match self {
            Self::Ad5360 | Self::Ad5361 => 8,
            Self::Ad5362 | Self::Ad5363 => 4,
        }
    }

    /// Native resolution of the part.
    pub const fn resolution(self) -> Resolution {
        match self {
            Self::Ad5360 | Self::Ad5362 => Resolution::Bits16,
            Self::Ad5361 | Self::Ad5363 => Resolution::Bits14,
        }
    }

    /// Part name as printed on the package.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ad5360 => "AD5360",
            Self::Ad5361 => "AD5361",
            Self::Ad5362 => "AD5362",
            Self::Ad5363 => "AD5363",
        }
    }
}

/// DAC data resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 14-bit parts (AD5361, AD5363).
    Bits14,
    /// 16-bit parts (AD5360, AD5362).
    Bits16,
}

impl Resolution {
    /// Build a resolution from a raw bit count.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedResolution`] for anything other than 14 or 16.
    pub const fn from_bits(bits: u8) -> Result<Self, Error> {
        match bits {
            14 => Ok(Self::Bits14),
            16 => Ok(Self::Bits16),
            other => Err(Error::UnsupportedResolution(other)),
        }
    }

    /// Bit count.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits14 => 14,
            Self::Bits16 => 16,
        }
    }

    /// Mask applied to every code before storage or transmission.
    pub const fn mask(self) -> u16 {
        match self {
            Self::Bits14 => 0x3FFF,
            Self::Bits16 => 0xFFFF,
        }
    }

    /// Left shift that aligns a code inside the 16-bit payload field.
    ///
    /// 14-bit parts take their data in D15..D2.
    pub const fn payload_shift(self) -> u32 {
        match self {
            Self::Bits14 => 2,
            Self::Bits16 => 0,
        }
    }

    /// Register values after a hardware reset.
    pub const fn defaults(self) -> Defaults {
        match self {
            Self::Bits14 => Defaults {
                dac: 0x2000,
                offset: 0x2000,
                gain: 0x3FFF,
                global_offset: 0x2000,
                min: 0,
                max: 0x3FFF,
            },
            Self::Bits16 => Defaults {
                dac: 0x8000,
                offset: 0x8000,
                gain: 0xFFFF,
                global_offset: 0x2000,
                min: 0,
                max: 0xFFFF,
            },
        }
    }
}

/// Power-on register values for one resolution.
///
/// `min`/`max` double as the absolute device code limits used for clamping
/// and as the default per-channel validation bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Defaults {
    /// X1 input register.
    pub dac: u16,
    /// C (offset trim) register.
    pub offset: u16,
    /// M (gain trim) register.
    pub gain: u16,
    /// OFS0/OFS1 register.
    pub global_offset: u16,
    /// Lowest device code.
    pub min: u16,
    /// Highest device code.
    pub max: u16,
}

/// Build-time driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    variant: Variant,
    resolution: Resolution,
    validate: bool,
}

impl DeviceConfig {
    /// Configuration for `variant` at its native resolution, validation off.
    pub const fn new(variant: Variant) -> Self {
        Self {
            variant,
            resolution: variant.resolution(),
            validate: false,
        }
    }

    /// Override the resolution with a raw bit count.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedResolution`] for anything other than 14 or 16.
    pub const fn with_resolution_bits(self, bits: u8) -> Result<Self, Error> {
        match Resolution::from_bits(bits) {
            Ok(resolution) => Ok(Self { resolution, ..self }),
            Err(e) => Err(e),
        }
    }

    /// Enable or disable the per-channel min/max validation gate.
    pub const fn with_validation(self, validate: bool) -> Self {
        Self { validate, ..self }
    }

    /// Part number.
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Data resolution.
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Whether single-channel writes are checked against channel bounds.
    pub const fn validate(&self) -> bool {
        self.validate
    }

    /// Channels addressable within one bank.
    pub const fn channels_per_bank(&self) -> u8 {
        self.variant.channels_per_bank()
    }

    /// Reset values for the configured resolution.
    pub const fn defaults(&self) -> Defaults {
        self.resolution.defaults()
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(Variant::Ad5360)
    }
}
