//! Byte-level checks of the driver over `SpiTransport` with embedded-hal mocks.
//!
//! Run with: cargo test -p ad536x --test integration_spi

#![allow(clippy::unwrap_used)]

use ad536x::{AbSource, Ad536x, Bank, Channel, DeviceConfig, Error, SpiTransport, Variant};
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

/// Expectations for one `SpiDevice::write` call.
fn spi_device_write(data: &[u8]) -> Vec<SpiTransaction<u8>> {
    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(data.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// Idle-high drive from `SpiTransport::new` followed by `pulses` low/high pulses.
fn pulsed_pin(pulses: usize) -> PinMock {
    let mut txns = vec![PinTransaction::set(PinState::High)];
    for _ in 0..pulses {
        txns.push(PinTransaction::set(PinState::Low));
        txns.push(PinTransaction::set(PinState::High));
    }
    PinMock::new(&txns)
}

#[test]
fn set_voltage_clocks_one_word_then_pulses_ldac() {
    // 0 V on bank 1 channel 2 is mid-scale: 0xD2_8000.
    let mut spi = SpiMock::new(&spi_device_write(&[0xD2, 0x80, 0x00]));
    let mut ldac = pulsed_pin(1);
    let mut rst = pulsed_pin(1);
    let mut clr = pulsed_pin(0);

    let transport =
        SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
    let mut dev = Ad536x::new(transport, DeviceConfig::new(Variant::Ad5360)).unwrap();
    let code = dev
        .set_voltage(Bank::Bank1, Channel::Index(2), 0.0)
        .unwrap();
    assert_eq!(code, 0x8000);

    spi.done();
    ldac.done();
    rst.done();
    clr.done();
}

#[test]
fn fourteen_bit_word_is_left_aligned() {
    // AD5361 bank 0 channel 7, code 0x3FFF → payload 0xFFFC.
    let mut spi = SpiMock::new(&spi_device_write(&[0xCF, 0xFF, 0xFC]));
    let mut ldac = pulsed_pin(0);
    let mut rst = pulsed_pin(1);
    let mut clr = pulsed_pin(0);

    let transport =
        SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
    let mut dev = Ad536x::new(transport, DeviceConfig::new(Variant::Ad5361)).unwrap();
    dev.write_dac_hold(Bank::Bank0, Channel::Index(7), 0x3FFF)
        .unwrap();

    spi.done();
    ldac.done();
    rst.done();
    clr.done();
}

#[test]
fn rejected_write_never_reaches_the_bus() {
    let mut spi = SpiMock::new(&[]);
    let mut ldac = pulsed_pin(0);
    let mut rst = pulsed_pin(1);
    let mut clr = pulsed_pin(0);

    let transport =
        SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
    let mut dev = Ad536x::new(transport, DeviceConfig::new(Variant::Ad5362)).unwrap();
    assert_eq!(
        dev.write_dac(Bank::Bank0, Channel::Index(4), 1),
        Err(Error::InvalidAddress)
    );
    assert_eq!(
        dev.write_dac(Bank::All, Channel::Index(0), 1),
        Err(Error::InvalidAddress)
    );

    spi.done();
    ldac.done();
    rst.done();
    clr.done();
}

#[test]
fn select_x2_writes_both_select_registers() {
    let mut expectations = spi_device_write(&[0x06, 0x00, 0xFF]);
    expectations.extend(spi_device_write(&[0x07, 0x00, 0xFF]));
    let mut spi = SpiMock::new(&expectations);
    let mut ldac = pulsed_pin(0);
    let mut rst = pulsed_pin(1);
    let mut clr = pulsed_pin(0);

    let transport =
        SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
    let mut dev = Ad536x::new(transport, DeviceConfig::new(Variant::Ad5360)).unwrap();
    dev.select_x2(AbSource::X2B).unwrap();

    spi.done();
    ldac.done();
    rst.done();
    clr.done();
}

#[test]
fn global_offset_under_clear() {
    let mut spi = SpiMock::new(&spi_device_write(&[0x02, 0x1F, 0xFF]));
    let mut ldac = pulsed_pin(0);
    let mut rst = pulsed_pin(1);
    // Idle high, then assert (low) and release (high).
    let mut clr = pulsed_pin(1);

    let transport =
        SpiTransport::new(spi.clone(), ldac.clone(), rst.clone(), clr.clone()).unwrap();
    let mut dev = Ad536x::new(transport, DeviceConfig::new(Variant::Ad5360)).unwrap();
    dev.set_clear(true).unwrap();
    dev.write_global_offset(Bank::Bank0, 0x1FFF).unwrap();
    dev.set_clear(false).unwrap();
    assert_eq!(dev.global_offset(Bank::Bank0), Ok(0x1FFF));

    spi.done();
    ldac.done();
    rst.done();
    clr.done();
}
