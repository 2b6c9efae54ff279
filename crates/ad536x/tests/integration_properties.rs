//! Driver-level behaviour through the public API.
//!
//! A minimal in-file transport records command words so these tests do not
//! depend on the `std` feature.
//!
//! Run with: cargo test -p ad536x --test integration_properties

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use ad536x::{
    Ad536x, Bank, Channel, CodeBounds, CommandWord, DeviceConfig, Error, RegisterKind, Transport,
    Variant,
};

#[derive(Default)]
struct Log {
    words: Vec<u32>,
    loads: usize,
    resets: usize,
}

impl Transport for Log {
    fn send_command(&mut self, word: CommandWord) -> ad536x::Result<()> {
        self.words.push(word.raw());
        Ok(())
    }

    fn pulse_load(&mut self) -> ad536x::Result<()> {
        self.loads += 1;
        Ok(())
    }

    fn pulse_reset(&mut self) -> ad536x::Result<()> {
        self.resets += 1;
        Ok(())
    }

    fn set_clear(&mut self, _active: bool) -> ad536x::Result<()> {
        Ok(())
    }
}

fn device(config: DeviceConfig) -> Ad536x<Log> {
    Ad536x::new(Log::default(), config).unwrap()
}

const VARIANTS: [Variant; 4] = [
    Variant::Ad5360,
    Variant::Ad5361,
    Variant::Ad5362,
    Variant::Ad5363,
];

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_restores_documented_defaults_for_every_variant() {
    for variant in VARIANTS {
        let mut dev = device(DeviceConfig::new(variant));
        dev.write(RegisterKind::Dac, Bank::All, Channel::All, 1).unwrap();
        dev.write(RegisterKind::Offset, Bank::All, Channel::All, 2).unwrap();
        dev.write(RegisterKind::Gain, Bank::All, Channel::All, 3).unwrap();
        dev.write_global_offset(Bank::Bank0, 4).unwrap();
        dev.set_bounds(Bank::All, Channel::All, 5, 6).unwrap();
        dev.reset().unwrap();

        let d = variant.resolution().defaults();
        for bank in Bank::BOTH {
            assert_eq!(dev.global_offset(bank), Ok(0x2000));
            assert_eq!(dev.reference_voltage(bank), Ok(5.0));
            for ch in 0..variant.channels_per_bank() {
                let ch = Channel::Index(ch);
                assert_eq!(dev.dac(bank, ch), Ok(d.dac), "{variant:?}");
                assert_eq!(dev.offset(bank, ch), Ok(d.offset));
                assert_eq!(dev.gain(bank, ch), Ok(d.gain));
                assert_eq!(dev.bounds(bank, ch), Ok(CodeBounds { min: d.min, max: d.max }));
            }
        }
        assert_eq!(dev.transport().resets, 2);
    }
}

// ---------------------------------------------------------------------------
// Broadcast writes
// ---------------------------------------------------------------------------

#[test]
fn bank0_broadcast_leaves_bank1_untouched() {
    let mut dev = device(DeviceConfig::new(Variant::Ad5360));
    dev.write_dac(Bank::Bank0, Channel::All, 0x1111).unwrap();
    for ch in 0..8 {
        assert_eq!(dev.dac(Bank::Bank0, Channel::Index(ch)), Ok(0x1111));
        assert_eq!(dev.dac(Bank::Bank1, Channel::Index(ch)), Ok(0x8000));
    }
    assert_eq!(dev.transport().words, [0xC1_1111]);
}

#[test]
fn all_banks_broadcast_reaches_every_pair() {
    let mut dev = device(DeviceConfig::new(Variant::Ad5362));
    dev.write_dac(Bank::All, Channel::All, 0x2222).unwrap();
    for bank in Bank::BOTH {
        for ch in 0..4 {
            assert_eq!(dev.dac(bank, Channel::Index(ch)), Ok(0x2222));
        }
    }
    assert_eq!(dev.transport().words, [0xC0_2222]);
}

// ---------------------------------------------------------------------------
// Rejected writes
// ---------------------------------------------------------------------------

#[test]
fn concrete_channel_with_all_banks_is_invalid() {
    let mut dev = device(DeviceConfig::new(Variant::Ad5360));
    let before = dev.store().clone();
    assert_eq!(
        dev.write(RegisterKind::Dac, Bank::All, Channel::Index(1), 0x1234),
        Err(Error::InvalidAddress)
    );
    assert_eq!(dev.store(), &before);
    assert!(dev.transport().words.is_empty());
}

#[test]
fn validation_gate_with_bounds_100_to_60000() {
    let mut dev = device(DeviceConfig::new(Variant::Ad5360).with_validation(true));
    dev.set_bounds(Bank::Bank0, Channel::Index(2), 100, 60000).unwrap();
    let before = dev.store().clone();

    assert!(matches!(
        dev.write(RegisterKind::Dac, Bank::Bank0, Channel::Index(2), 50),
        Err(Error::OutOfRange { .. })
    ));
    assert_eq!(dev.store(), &before);
    assert!(dev.transport().words.is_empty());

    dev.write(RegisterKind::Dac, Bank::Bank0, Channel::Index(2), 100).unwrap();
    assert_eq!(dev.dac(Bank::Bank0, Channel::Index(2)), Ok(100));
    assert_eq!(dev.transport().words, [0xCA_0064]);
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn dac_bank0_channel3_word() {
    let mut dev = device(DeviceConfig::new(Variant::Ad5360));
    dev.write(RegisterKind::Dac, Bank::Bank0, Channel::Index(3), 0x1234).unwrap();
    assert_eq!(dev.transport().words, [0xCB_1234]);
    assert_eq!(dev.transport().loads, 0);
}

// ---------------------------------------------------------------------------
// Transfer function
// ---------------------------------------------------------------------------

#[test]
fn round_trip_across_the_output_range() {
    for variant in [Variant::Ad5360, Variant::Ad5363] {
        let dev = device(DeviceConfig::new(variant));
        let step = ad536x::transfer::lsb_volts(variant.resolution(), 5.0);
        for i in -100..100 {
            let v = f64::from(i) / 10.0;
            let code = dev.voltage_to_code(Bank::Bank1, Channel::Index(0), v).unwrap();
            let back = dev.code_to_voltage(Bank::Bank1, Channel::Index(0), code).unwrap();
            assert!((back - v).abs() <= step, "{variant:?} {v}");
        }
    }
}

#[test]
fn far_out_of_range_clamps_exactly() {
    for variant in VARIANTS {
        let dev = device(DeviceConfig::new(variant));
        let max = variant.resolution().defaults().max;
        let ch = Channel::Index(0);
        assert_eq!(dev.voltage_to_code(Bank::Bank0, ch, 1.0e9), Ok(max));
        assert_eq!(dev.voltage_to_code(Bank::Bank0, ch, -1.0e9), Ok(0));
    }
}
