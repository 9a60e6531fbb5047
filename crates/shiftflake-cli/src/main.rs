#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Command};
use shiftflake::{IdGenerator, Options};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;

    let options = Options::from(&args);
    let generator = IdGenerator::new(options)?;

    if cfg!(debug_assertions) {
        tracing::debug!("Starting with full config: {:#?}", options);
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match args.command {
        Command::Generate { count } => {
            for _ in 0..count {
                writeln!(out, "{}", generator.next_id())?;
            }
        }
        Command::Decode { ids } => {
            for id in ids {
                let parts = generator.decompose(id);
                writeln!(
                    out,
                    "{id}\tunix_ms={}\tworker_id={}\tsequence={}",
                    generator.extract_millis(id),
                    parts.worker_id,
                    parts.sequence
                )?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
