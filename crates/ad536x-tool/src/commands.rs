//! Subcommand implementations.
//!
//! Each command returns labelled lines; `main` decides how to print them.

use ad536x::encoder;
use ad536x::mocks::{Event, RecordingTransport};
use ad536x::transfer;
use ad536x::{
    Ad536x, Bank, CalibrationStore, Channel, CommandWord, DeviceConfig, ReadbackRegister,
    RegisterKind,
};
use anyhow::{Context, Result};

use crate::args::{Calibration, Target};

/// One line of output.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: &'static str,
    pub value: String,
}

impl Line {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Driver errors are `Copy` enums without a std `Error` impl; carry the text.
fn dac_error(e: ad536x::Error) -> anyhow::Error {
    anyhow::anyhow!("{e}")
}

fn word_lines(word: CommandWord) -> Vec<Line> {
    let [b0, b1, b2] = word.to_be_bytes();
    vec![
        Line::new("word", word.to_string()),
        Line::new("bytes", format!("{b0:02X} {b1:02X} {b2:02X}")),
        Line::new("mode", format!("{:02b}", word.mode())),
        Line::new("address", format!("{:06b}", word.address())),
        Line::new("payload", format!("0x{:04X}", word.payload())),
    ]
}

fn event_line(event: &Event) -> Line {
    match event {
        Event::Command(word) => Line::new("spi", word.to_string()),
        Event::Load => Line::new("ldac", "pulse"),
        Event::Reset => Line::new("reset", "pulse"),
        Event::Clear(true) => Line::new("clr", "assert"),
        Event::Clear(false) => Line::new("clr", "release"),
    }
}

pub fn encode_write(
    config: DeviceConfig,
    kind: RegisterKind,
    target: Target,
    code: u16,
    bounds: (Option<u16>, Option<u16>),
) -> Result<Vec<Line>> {
    let mut store = CalibrationStore::new(config);
    let defaults = config.defaults();
    if bounds.0.is_some() || bounds.1.is_some() {
        let min = bounds.0.unwrap_or(defaults.min);
        let max = bounds.1.unwrap_or(defaults.max);
        store
            .set_bounds(target.bank, target.channel, min, max)
            .map_err(dac_error)
            .context("setting validation bounds")?;
    }
    let word = encoder::prepare_write(&store, kind, target.bank, target.channel, code)
        .map_err(dac_error)
        .context("encoding write")?;
    tracing::debug!(%word, "encoded write");
    Ok(word_lines(word))
}

/// Driver over a recording transport with `calibration` applied to `target`.
fn simulated_driver(
    config: DeviceConfig,
    target: Target,
    calibration: Calibration,
) -> Result<Ad536x<RecordingTransport>> {
    let mut dev = Ad536x::new(RecordingTransport::new(), config).map_err(dac_error)?;
    if let Some(gain) = calibration.gain {
        dev.write_gain(target.bank, target.channel, gain)
            .map_err(dac_error)
            .context("applying --gain")?;
    }
    if let Some(offset) = calibration.offset {
        dev.write_offset(target.bank, target.channel, offset)
            .map_err(dac_error)
            .context("applying --offset")?;
    }
    if let Some(code) = calibration.global_offset {
        dev.write_global_offset(target.bank, code)
            .map_err(dac_error)
            .context("applying --global-offset")?;
    }
    if let Some(vref) = calibration.vref {
        dev.set_reference_voltage(target.bank, vref);
    }
    Ok(dev)
}

pub fn voltage(
    config: DeviceConfig,
    target: Target,
    volts: f64,
    hold: bool,
    calibration: Calibration,
) -> Result<Vec<Line>> {
    let mut dev = simulated_driver(config, target, calibration)?;
    let code = if hold {
        dev.set_voltage_hold(target.bank, target.channel, volts)
    } else {
        dev.set_voltage(target.bank, target.channel, volts)
    }
    .map_err(dac_error)
    .with_context(|| format!("setting {volts} V"))?;
    let actual = dev
        .code_to_voltage(target.bank, target.channel, code)
        .map_err(dac_error)?;

    let mut lines = vec![
        Line::new("code", format!("0x{code:04X} ({code})")),
        Line::new("output", format!("{actual:.6} V")),
    ];
    lines.extend(dev.transport().events().iter().map(event_line));
    Ok(lines)
}

pub fn code_to_voltage(
    config: DeviceConfig,
    target: Target,
    code: u16,
    calibration: Calibration,
) -> Result<Vec<Line>> {
    let dev = simulated_driver(config, target, calibration)?;
    let volts = dev
        .code_to_voltage(target.bank, target.channel, code)
        .map_err(dac_error)
        .context("converting code")?;
    let step = transfer::lsb_volts(
        config.resolution(),
        dev.reference_voltage(target.bank).map_err(dac_error)?,
    );
    Ok(vec![
        Line::new("output", format!("{volts:.6} V")),
        Line::new("step", format!("{:.3} mV", step * 1000.0)),
    ])
}

pub fn read_request(
    config: DeviceConfig,
    register: ReadbackRegister,
    bank: Bank,
    channel: Channel,
) -> Result<Vec<Line>> {
    let word = encoder::encode_read_request(&config, register, bank, channel)
        .map_err(dac_error)
        .with_context(|| format!("readback of {}", register.name()))?;
    Ok(word_lines(word))
}

pub fn decode(word: u32) -> Result<Vec<Line>> {
    if word > CommandWord::MASK {
        anyhow::bail!("0x{word:X} is wider than 24 bits");
    }
    let word = CommandWord::new(word);
    let mut lines = word_lines(word);
    let register = match word.register_kind() {
        Ok(RegisterKind::Dac) => "X1 (DAC)",
        Ok(RegisterKind::Offset) => "C (offset)",
        Ok(RegisterKind::Gain) => "M (gain)",
        Err(_) => "special function",
    };
    lines.push(Line::new("register", register));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad536x::Variant;

    fn value<'a>(lines: &'a [Line], label: &str) -> &'a str {
        lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
            .unwrap()
    }

    fn target(bank: Bank, channel: Channel) -> Target {
        Target { bank, channel }
    }

    #[test]
    fn encode_write_prints_the_word() {
        let lines = encode_write(
            DeviceConfig::new(Variant::Ad5360),
            RegisterKind::Dac,
            target(Bank::Bank0, Channel::Index(3)),
            0x1234,
            (None, None),
        )
        .unwrap();
        assert_eq!(value(&lines, "word"), "0xCB1234");
        assert_eq!(value(&lines, "bytes"), "CB 12 34");
        assert_eq!(value(&lines, "address"), "001011");
    }

    #[test]
    fn encode_write_honours_validation_bounds() {
        let config = DeviceConfig::new(Variant::Ad5360).with_validation(true);
        let t = target(Bank::Bank0, Channel::Index(0));
        let err = encode_write(config, RegisterKind::Dac, t, 50, (Some(100), Some(60000)))
            .unwrap_err();
        assert!(format!("{err:#}").contains("outside channel bounds [100, 60000]"));
        assert!(encode_write(config, RegisterKind::Dac, t, 100, (Some(100), None)).is_ok());
    }

    #[test]
    fn voltage_shows_the_bus_traffic() {
        let lines = voltage(
            DeviceConfig::new(Variant::Ad5360),
            target(Bank::Bank0, Channel::Index(1)),
            5.0,
            false,
            Calibration::default(),
        )
        .unwrap();
        assert_eq!(value(&lines, "code"), "0xC000 (49152)");
        let traffic: Vec<&str> = lines
            .iter()
            .filter(|l| matches!(l.label, "spi" | "ldac" | "reset"))
            .map(|l| l.label)
            .collect();
        assert_eq!(traffic, ["reset", "spi", "ldac"]);
        assert_eq!(value(&lines, "spi"), "0xC9C000");
    }

    #[test]
    fn voltage_applies_calibration_first() {
        let lines = voltage(
            DeviceConfig::new(Variant::Ad5360),
            target(Bank::Bank0, Channel::Index(0)),
            0.0,
            true,
            Calibration {
                global_offset: Some(0x1000),
                ..Calibration::default()
            },
        )
        .unwrap();
        assert_eq!(value(&lines, "code"), "0x4000 (16384)");
        let words: Vec<&str> = lines
            .iter()
            .filter(|l| l.label == "spi")
            .map(|l| l.value.as_str())
            .collect();
        assert_eq!(words, ["0x021000", "0xC84000"]);
    }

    #[test]
    fn voltage_needs_a_concrete_channel() {
        let err = voltage(
            DeviceConfig::new(Variant::Ad5360),
            target(Bank::Bank0, Channel::All),
            1.0,
            false,
            Calibration::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("no encoding"));
    }

    #[test]
    fn code_to_voltage_at_reset() {
        let lines = code_to_voltage(
            DeviceConfig::new(Variant::Ad5361),
            target(Bank::Bank1, Channel::Index(0)),
            0x2000,
            Calibration::default(),
        )
        .unwrap();
        assert_eq!(value(&lines, "output"), "0.000000 V");
        assert_eq!(value(&lines, "step"), "1.221 mV");
    }

    #[test]
    fn read_request_word() {
        let lines = read_request(
            DeviceConfig::new(Variant::Ad5360),
            ReadbackRegister::Ofs1,
            Bank::All,
            Channel::All,
        )
        .unwrap();
        assert_eq!(value(&lines, "word"), "0x058180");
    }

    #[test]
    fn decode_names_the_register() {
        assert_eq!(value(&decode(0xCB_1234).unwrap(), "register"), "X1 (DAC)");
        assert_eq!(value(&decode(0x05_8180).unwrap(), "register"), "special function");
        assert!(decode(0x100_0000).is_err());
    }
}
