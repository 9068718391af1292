// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{crate_version, Parser, Subcommand};
use rcode::{Decoded, DecodedRcode, Diagnostic, ModuleLines, RcodeDecoder};
use serde::Serialize;
use srcmap::{assemble_decoded, Config, SourceMap};

#[derive(Parser, Debug)]
struct Opt {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the source map of an r-code file.
    Dump { rcode: PathBuf },

    /// Print the decoded include records of an r-code file.
    Includes { rcode: PathBuf },

    /// Translate a source position to a debug listing position.
    ToListing {
        rcode: PathBuf,
        source_path: PathBuf,
        line: u32,

        #[arg(long, default_value_t = 0)]
        column: u32,
    },

    /// Translate a debug listing position to a source position.
    ToSource {
        rcode: PathBuf,
        line: u32,

        #[arg(long, default_value_t = 0)]
        column: u32,
    },

    Version,
}

#[derive(Serialize)]
struct DumpOutput<'a> {
    source_map: &'a SourceMap,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct IncludesOutput<'a> {
    module_lines: &'a ModuleLines,
    diagnostics: &'a [Diagnostic],
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::parse();

    let config = match &opt.config {
        Some(path) => Config::load(path).await?,
        None => Config::default(),
    };

    let decoder = RcodeDecoder::new(config.decode);

    match opt.command {
        Command::Dump { rcode } => {
            let decoded = decode(&decoder, &rcode).await?;
            let map = assemble_decoded(&rcode, decoded);

            print_json(&DumpOutput {
                source_map: &map.value,
                diagnostics: &map.diagnostics,
            })?;
        }
        Command::Includes { rcode } => {
            let decoded = decode(&decoder, &rcode).await?;

            print_json(&IncludesOutput {
                module_lines: &decoded.value.module_lines,
                diagnostics: &decoded.diagnostics,
            })?;
        }
        Command::ToListing {
            rcode,
            source_path,
            line,
            column,
        } => {
            let map = source_map(&decoder, &rcode).await?;
            let listing = map
                .translator()
                .to_listing_position(&source_path, line, column)?;

            print_json(&listing)?;
        }
        Command::ToSource {
            rcode,
            line,
            column,
        } => {
            let map = source_map(&decoder, &rcode).await?;
            let source = map.translator().to_source_position(line, column)?;

            print_json(&source)?;
        }
        Command::Version => version(),
    }

    Ok(())
}

fn version() {
    println!("{}", crate_version!());
}

async fn decode(decoder: &RcodeDecoder, rcode: &Path) -> Result<Decoded<DecodedRcode>> {
    decoder
        .decode_file(rcode)
        .await
        .with_context(|| format!("unable to decode r-code: {}", rcode.display()))
}

async fn source_map(decoder: &RcodeDecoder, rcode: &Path) -> Result<SourceMap> {
    let decoded = decode(decoder, rcode).await?;
    Ok(assemble_decoded(rcode, decoded).value)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
