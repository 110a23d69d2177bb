use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use roxmltree::Document;
use sbml2escher_rs::{
    convert_model, identify_format, parse_model, render, write_json, ConvertOptions, InputFormat,
    LabelOffset,
};

const DEFAULT_INPUT: &str = "sbml.xml";
const DEFAULT_OUTPUT: &str = "sbml2escher_output.json";

#[derive(Parser)]
#[command(author, version, about = "Convert SBML layout maps to Escher JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(name = "sbml2escher")]
    Sbml2Escher {
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = LabelPlacement::Raised)]
        label_offset: LabelPlacement,
        /// Write single-line JSON instead of indented output.
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LabelPlacement {
    Raised,
    Midpoint,
}

impl From<LabelPlacement> for LabelOffset {
    fn from(placement: LabelPlacement) -> Self {
        match placement {
            LabelPlacement::Raised => LabelOffset::Raised,
            LabelPlacement::Midpoint => LabelOffset::Midpoint,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Sbml2Escher {
            input,
            output,
            label_offset,
            compact,
        } => {
            let options = ConvertOptions {
                label_offset: label_offset.into(),
            };
            sbml2escher(&input, &output, &options, compact)
        }
    }
}

fn sbml2escher(input: &Path, output: &Path, options: &ConvertOptions, compact: bool) -> Result<()> {
    let started = Instant::now();
    let xml = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let doc = Document::parse(&xml).with_context(|| format!("Failed to parse XML in {:?}", input))?;
    match identify_format(&doc) {
        Some(InputFormat::Sbml) => {}
        Some(InputFormat::CellDesigner) => bail!(
            "{:?} is a CellDesigner file; convert it to SBML with layout first",
            input
        ),
        None => bail!("{:?} is not a valid CellDesigner or SBML XML file", input),
    }

    let model = parse_model(&doc).context("Failed to read SBML model")?;
    let graph = convert_model(&model, options).context("Failed to build map graph")?;
    let map = render(&graph).context("Failed to render Escher map")?;

    if output.extension().map_or(true, |ext| ext != "json") {
        log::warn!(
            "Output file {:?} does not have a .json extension; JSON readers may not open it",
            output
        );
    }
    let file = fs::File::create(output).with_context(|| format!("Failed to create {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_json(&map, &mut writer, compact)
        .with_context(|| format!("Failed to write {:?}", output))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {:?}", output))?;

    log::info!(
        "Converted {:?} to {:?} in {:.2}s",
        input,
        output,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
