use anyhow::{Context, Result};
use clap::{App, Arg};
use log::{info, LevelFilter};
use simplelog::{Config, SimpleLogger};
use std::fs;
use std::path::Path;
use ts2cairo::transpiler::synthesizer::EmptyAccessPolicy;
use ts2cairo::transpiler::TranspileOptions;
use ts2cairo::{generator, parser, transpiler};

fn main() -> Result<()> {
    let matches = App::new("ts2cairo")
        .version("0.1.0")
        .about("Converts annotated TypeScript classes to Cairo StarkNet contracts")
        .arg(
            Arg::with_name("INPUT")
                .help("Input TypeScript file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("Output directory for Cairo files")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Fail when a function needs a state read but never accesses a field"),
        )
        .arg(
            Arg::with_name("stdout")
                .long("stdout")
                .help("Print the generated contract instead of writing a file"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::init(level, Config::default()).context("Failed to initialize logger")?;

    let input_file = matches
        .value_of("INPUT")
        .context("Missing input file argument")?;
    let output_dir = matches.value_of("output").unwrap_or(".");

    let options = TranspileOptions {
        policy: if matches.is_present("strict") {
            EmptyAccessPolicy::Reject
        } else {
            EmptyAccessPolicy::Omit
        },
        ..TranspileOptions::default()
    };

    // Read input file
    let source = fs::read_to_string(input_file)
        .with_context(|| format!("Failed to read input file: {}", input_file))?;

    // Parse TypeScript code
    let tree = parser::parse(&source).with_context(|| "Failed to parse TypeScript code")?;

    // Convert to contract model
    let contract = transpiler::convert(&tree, &options)
        .with_context(|| format!("Failed to convert {} to Cairo", input_file))?;
    info!(
        "Built contract {} with {} storage fields and {} functions",
        contract.name,
        contract.storage.len(),
        contract.functions.len()
    );

    // Generate Cairo code
    let cairo_code = generator::generate(&contract);

    if matches.is_present("stdout") {
        print!("{}", cairo_code);
        return Ok(());
    }

    // Create output file path
    let file_stem = if contract.name.is_empty() {
        "contract".to_string()
    } else {
        contract.name.to_lowercase()
    };
    let output_file = Path::new(output_dir).join(format!("{}.cairo", file_stem));

    // Write output file
    fs::write(&output_file, cairo_code)
        .with_context(|| format!("Failed to write output file: {}", output_file.display()))?;

    println!("Successfully converted {} to {}", contract.name, output_file.display());

    Ok(())
}
