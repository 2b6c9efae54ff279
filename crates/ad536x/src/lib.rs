//! Driver for the Analog Devices AD5360/AD5361/AD5362/AD5363 DACs
//!
//! 16- or 8-channel, 16- or 14-bit voltage-output DACs in two banks, written
//! through a 24-bit SPI input shift register.
//!
//! # Layers
//!
//! ```text
//! Ad536x<T: Transport>          driver facade (this crate)
//!     ↓
//! transfer / encoder            pure voltage↔code math and word assembly
//!     ↓
//! CalibrationStore              in-memory register mirror
//!     ↓
//! Transport                     SpiTransport over embedded-hal 1.0, or a mock
//! ```
//!
//! Every request is checked before anything reaches the bus: an invalid
//! address or a code outside the channel bounds returns an [`Error`] and
//! leaves the store and the device as they were.
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` on public types and on-target log statements
//! - `tracing`: host-side log statements
//! - `std`: exposes [`mocks`] outside of unit tests
//!
//! # Example
//!
//! ```no_run
//! use ad536x::{Ad536x, Bank, Channel, Error, Transport};
//!
//! fn ramp<T: Transport>(dac: &mut Ad536x<T>) -> Result<(), Error> {
//!     dac.set_reference_voltage(Bank::All, 5.0);
//!     for step in 0..=10 {
//!         dac.set_voltage_hold(Bank::Bank0, Channel::Index(0), f64::from(step))?;
//!         dac.load()?;
//!     }
//!     dac.write_dac(Bank::Bank1, Channel::All, 0x8000)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this driver crate:
#![allow(clippy::doc_markdown)] // register names (X1A, OFS0, LDAC) in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)] // 24-bit words are grouped by field, not by three

pub mod calibration;
pub mod config;
pub mod driver;
pub mod encoder;
pub mod error;
#[cfg(any(test, feature = "std"))]
pub mod mocks;
pub mod registers;
pub mod transfer;
pub mod transport;
pub mod types;

pub use calibration::{CalibrationStore, ChannelCalibration, CodeBounds};
pub use config::{DeviceConfig, Resolution, SpiSettings, Variant};
pub use driver::Ad536x;
pub use error::{Error, Result};
pub use registers::CommandWord;
pub use transport::{SpiTransport, Transport};
pub use types::{AbSource, Bank, Channel, ReadbackRegister, RegisterKind};
