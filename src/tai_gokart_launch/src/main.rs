//! tai_gokart_launch CLI

use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    process,
};
use tai_gokart_launch::{
    generate_launch_description, AmentIndexLocator, PackageLocator, RecordGenerator,
};

#[derive(Parser)]
#[command(name = "tai_gokart_launch")]
#[command(about = "Launch description for the go-kart controller node", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    /// Install prefixes to search instead of AMENT_PREFIX_PATH
    #[arg(long = "prefix-path", global = true)]
    prefix_path: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the launch description as JSON
    Describe,

    /// Write the launch record for a process supervisor
    Record {
        /// Output file path (default: record.json)
        #[arg(short, long, default_value = "record.json")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let locator = if cli.prefix_path.is_empty() {
        AmentIndexLocator::from_env()
    } else {
        AmentIndexLocator::with_prefixes(cli.prefix_path)
    };
    log::debug!("Package search prefixes: {:?}", locator.prefixes());

    let result = match cli.command {
        Commands::Describe => describe(&locator),
        Commands::Record { output } => write_record(&locator, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn describe(locator: &dyn PackageLocator) -> Result<(), Box<dyn std::error::Error>> {
    let description = generate_launch_description(locator)?;
    println!("{}", description.to_json()?);
    Ok(())
}

fn write_record(
    locator: &dyn PackageLocator,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let description = generate_launch_description(locator)?;
    let record = RecordGenerator::generate(&description, locator)?;

    let json = record.to_json()?;
    std::fs::write(output, json)?;

    log::info!("Generated record.json: {}", output.display());
    log::info!(
        "  {} nodes, {} parameter files",
        record.node.len(),
        record.file_data.len()
    );

    Ok(())
}
