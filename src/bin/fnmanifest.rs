// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line tool that expands a deployment manifest and prints it as YAML.
//!
//! ```bash
//! fnmanifest manifest.yaml
//! fnmanifest manifest.yaml --section FunctionConfiguration -v
//! ```

use clap::Parser;
use fnmanifest::adapters::yaml_file::to_yaml_string;
use fnmanifest::adapters::{ManifestFile, YamlParser};
use fnmanifest::domain::expander::DEFAULT_MAX_DEPTH;
use fnmanifest::domain::{ConfigValue, Expander, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Expand dotted keys in a deployment manifest.
#[derive(Debug, Parser)]
#[command(name = "fnmanifest", version, about)]
struct Cli {
    /// Manifest file to expand
    manifest: PathBuf,

    /// Print only this top-level section
    #[arg(short, long)]
    section: Option<String>,

    /// Maximum document nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let file = ManifestFile::with_parser(
        &cli.manifest,
        Box::new(YamlParser::new()),
        Expander::new().with_max_depth(cli.max_depth),
    )?;
    let manifest = file.manifest();

    let document = match &cli.section {
        Some(name) => manifest.section(name)?.clone(),
        None => ConfigValue::Mapping(manifest.root().clone()),
    };
    to_yaml_string(&document)
}
