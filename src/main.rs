mod cli;
mod config;
mod inventory;
mod terraform;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use serde::Serialize;
use serde_json::ser::Formatter;

use cli::{Args, Mode};
use config::Config;
use terraform::{OutputSource, TerraformCli};

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Anything but `--list`/`--host` is a usage error, `--help` included:
            // stderr only, status 1 rather than clap's 0 or 2.
            eprint!("{e}");
            return ExitCode::from(1);
        }
    };

    let config = Config::load(args.config.as_deref());
    let dir = terraform::resolve_dir(
        args.terraform_dir.as_deref(),
        config.terraform_dir.as_deref(),
    );
    let source = TerraformCli::new(config.terraform_bin.clone(), dir);

    let mut stdout = io::stdout().lock();
    match run(&args.mode(), &config, &source, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Answer one inventory request, writing the JSON reply to `out`.
fn run<W: Write>(
    mode: &Mode,
    config: &Config,
    source: &dyn OutputSource,
    out: &mut W,
) -> Result<()> {
    match mode {
        Mode::List => match source.fetch() {
            Some(outputs) => {
                let inv = inventory::build_inventory(Some(&outputs), config);
                serde_json::to_writer_pretty(&mut *out, &inv)
                    .context("Failed to write inventory")?;
            }
            None => {
                let mut ser = serde_json::Serializer::with_formatter(&mut *out, SpacedFormatter);
                inventory::empty_inventory()
                    .serialize(&mut ser)
                    .context("Failed to write inventory")?;
            }
        },
        Mode::Host(name) => {
            // Everything is already served through `_meta.hostvars`.
            debug!("host lookup for {name}");
            out.write_all(b"{}").context("Failed to write host vars")?;
        }
    }

    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Single-line JSON with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
    ) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
