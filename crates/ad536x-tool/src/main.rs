// Host tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use args::{Cli, Command};
use commands::Line;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_lines(lines: &[Line]) {
    let width = lines.iter().map(|l| l.label.len()).max().unwrap_or(0);
    for line in lines {
        println!(
            "  {:>width$}  {}",
            line.label.cyan().bold(),
            line.value,
            width = width
        );
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.device.config()?;
    tracing::debug!(
        variant = config.variant().name(),
        bits = config.resolution().bits(),
        validate = config.validate(),
        "device configuration"
    );

    let lines = match cli.command {
        Command::EncodeWrite {
            register,
            target,
            code,
            min,
            max,
        } => commands::encode_write(config, register.into(), target, code, (min, max)),
        Command::Voltage {
            target,
            volts,
            hold,
            calibration,
        } => commands::voltage(config, target, volts, hold, calibration),
        Command::CodeToVoltage {
            target,
            code,
            calibration,
        } => commands::code_to_voltage(config, target, code, calibration),
        Command::ReadRequest {
            register,
            bank,
            channel,
        } => commands::read_request(config, register, bank, channel),
        Command::Decode { word } => commands::decode(word),
    }?;

    println!("{}", config.variant().name().green().bold());
    print_lines(&lines);
    Ok(())
}
