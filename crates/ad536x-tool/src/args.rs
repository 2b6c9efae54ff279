//! Command-line surface.

use ad536x::{Bank, Channel, DeviceConfig, ReadbackRegister, RegisterKind, Variant};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ad536x")]
#[command(about = "AD536x command-word and transfer-function calculator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub device: DeviceArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a DAC, offset or gain register write
    EncodeWrite {
        #[arg(long, value_enum)]
        register: RegisterArg,
        #[command(flatten)]
        target: Target,
        /// Register code (decimal or 0x-prefixed hex)
        #[arg(long, value_parser = parse_u16)]
        code: u16,
        /// Lower validation bound (needs --validate)
        #[arg(long, value_parser = parse_u16)]
        min: Option<u16>,
        /// Upper validation bound (needs --validate)
        #[arg(long, value_parser = parse_u16)]
        max: Option<u16>,
    },
    /// Convert a voltage to a code and show the bus traffic of setting it
    Voltage {
        #[command(flatten)]
        target: Target,
        /// Output voltage
        #[arg(long, allow_negative_numbers = true)]
        volts: f64,
        /// Leave the value pending (no LDAC pulse)
        #[arg(long)]
        hold: bool,
        #[command(flatten)]
        calibration: Calibration,
    },
    /// Convert a code back to the output voltage
    CodeToVoltage {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_parser = parse_u16)]
        code: u16,
        #[command(flatten)]
        calibration: Calibration,
    },
    /// Encode a readback select word
    ReadRequest {
        /// x1a, x1b, c, m, cr, ofs0, ofs1, ab0, ab1 or gpio
        #[arg(long, value_parser = parse_readback)]
        register: ReadbackRegister,
        #[arg(long, value_parser = parse_bank, default_value = "all")]
        bank: Bank,
        #[arg(long, value_parser = parse_channel, default_value = "all")]
        channel: Channel,
    },
    /// Split a 24-bit word into its fields
    Decode {
        /// Command word (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_u32)]
        word: u32,
    },
}

/// Part and build options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    #[arg(long, value_enum, default_value_t = VariantArg::Ad5360, global = true)]
    pub variant: VariantArg,
    /// Resolution override in bits (14 or 16)
    #[arg(long, global = true)]
    pub bits: Option<u8>,
    /// Check single-channel writes against channel bounds
    #[arg(long, global = true)]
    pub validate: bool,
}

impl DeviceArgs {
    pub fn config(&self) -> Result<DeviceConfig> {
        let mut config = DeviceConfig::new(self.variant.into()).with_validation(self.validate);
        if let Some(bits) = self.bits {
            config = config
                .with_resolution_bits(bits)
                .map_err(|e| anyhow::anyhow!("--bits {bits}: {e}"))?;
        }
        Ok(config)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct Target {
    /// 0, 1 or all
    #[arg(long, value_parser = parse_bank)]
    pub bank: Bank,
    /// Channel index or all
    #[arg(long, value_parser = parse_channel)]
    pub channel: Channel,
}

/// Calibration applied before a conversion. Unset values keep reset defaults.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct Calibration {
    /// M (gain) register
    #[arg(long, value_parser = parse_u16)]
    pub gain: Option<u16>,
    /// C (offset) register
    #[arg(long, value_parser = parse_u16)]
    pub offset: Option<u16>,
    /// OFSx register of the target bank
    #[arg(long, value_parser = parse_u16)]
    pub global_offset: Option<u16>,
    /// Reference voltage of the target bank
    #[arg(long)]
    pub vref: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantArg {
    Ad5360,
    Ad5361,
    Ad5362,
    Ad5363,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Ad5360 => Variant::Ad5360,
            VariantArg::Ad5361 => Variant::Ad5361,
            VariantArg::Ad5362 => Variant::Ad5362,
            VariantArg::Ad5363 => Variant::Ad5363,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterArg {
    Dac,
    Offset,
    Gain,
}

impl From<RegisterArg> for RegisterKind {
    fn from(r: RegisterArg) -> Self {
        match r {
            RegisterArg::Dac => RegisterKind::Dac,
            RegisterArg::Offset => RegisterKind::Offset,
            RegisterArg::Gain => RegisterKind::Gain,
        }
    }
}

fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("'{s}': {e}"))
}

pub fn parse_u16(s: &str) -> Result<u16, String> {
    let n = parse_number(s)?;
    u16::try_from(n).map_err(|_| format!("'{s}' does not fit in 16 bits"))
}

pub fn parse_u32(s: &str) -> Result<u32, String> {
    let n = parse_number(s)?;
    u32::try_from(n).map_err(|_| format!("'{s}' does not fit in 32 bits"))
}

pub fn parse_bank(s: &str) -> Result<Bank, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(Bank::All);
    }
    let n: u8 = s.parse().map_err(|_| format!("bank '{s}': expected 0, 1 or all"))?;
    Bank::try_from(n).map_err(|e| format!("bank '{s}': {e}"))
}

pub fn parse_channel(s: &str) -> Result<Channel, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(Channel::All);
    }
    s.parse::<u8>()
        .map(Channel::Index)
        .map_err(|_| format!("channel '{s}': expected an index or all"))
}

pub fn parse_readback(s: &str) -> Result<ReadbackRegister, String> {
    s.parse().map_err(|e| format!("register '{s}': {e}"))
}
