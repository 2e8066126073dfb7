//! Tartan CLI - generate a tartan SVG (and optional PNG) from a named pattern
//!
//! Prints a JSON summary to stdout on success.
//! Errors go to stderr with a non-zero exit status.

use clap::{ArgAction, CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use tartan_core::{
    library::{catalog_listing, PatternCatalog, CONFIG_EXTENSION},
    GenerateRequest, GenerationPipeline, OutputTarget, PatternLibrary, PatternSource, RenderSize,
};

#[derive(Parser)]
#[command(name = "tartan-cli", version)]
#[command(about = "Tartan Weave Generator - tiled plain-weave SVG patterns")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Pattern name, or a path to a .json pattern file
    pattern: Option<String>,

    /// Where to save the SVG (defaults to ./output/<pattern>[_<size>].svg)
    #[arg(short, long)]
    output: Option<String>,

    /// Square output of <repeat> x <repeat> setts
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..), conflicts_with_all = ["width", "height"])]
    repeat: Option<u32>,

    /// Output width in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Also write a PNG with the same base name
    #[arg(long)]
    png: bool,

    /// Also write <base>.manifest.json
    #[arg(long)]
    manifest: bool,

    /// Path to the pattern library directory
    #[arg(short = 'd', long, default_value = "patterns")]
    patterns_dir: PathBuf,

    /// Print help and the available patterns
    #[arg(short, long, action = ArgAction::SetTrue)]
    help: bool,
}

impl Cli {
    fn size(&self) -> RenderSize {
        match (self.repeat, self.width, self.height) {
            (Some(repeat), _, _) => RenderSize::Square { repeat },
            (None, None, None) => RenderSize::Sett,
            (None, width, height) => RenderSize::Pixels { width, height },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Usage,
    Generate(String),
    MissingPattern,
}

/// Usage only for `-h` or a bare invocation; flags without a pattern are an error.
fn invocation(cli: &Cli, no_args: bool) -> Invocation {
    if cli.help || no_args {
        return Invocation::Usage;
    }
    match cli.pattern.as_deref() {
        Some(pattern) => Invocation::Generate(normalize_pattern_arg(pattern)),
        None => Invocation::MissingPattern,
    }
}

fn print_usage(catalog: &dyn PatternCatalog) {
    println!("{}", Cli::command().render_help());
    match catalog_listing(catalog) {
        Ok(listing) => println!("\nAvailable patterns:\n{listing}"),
        Err(e) => eprintln!("Failed to list patterns: {e}"),
    }
}

/// Bare names are case-insensitive; paths are taken as given.
fn normalize_pattern_arg(pattern: &str) -> String {
    if pattern.ends_with(&format!(".{CONFIG_EXTENSION}")) {
        pattern.to_string()
    } else {
        pattern.to_lowercase()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let no_args = std::env::args_os().len() == 1;
    let cli = Cli::parse();
    let library = PatternLibrary::new(&cli.patterns_dir);

    let pattern = match invocation(&cli, no_args) {
        Invocation::Usage => {
            print_usage(&library);
            return ExitCode::SUCCESS;
        }
        Invocation::MissingPattern => {
            eprintln!("Error generating tartan: pattern name is required");
            return ExitCode::FAILURE;
        }
        Invocation::Generate(pattern) => pattern,
    };

    let output = match &cli.output {
        Some(output) => OutputTarget::Path(output.clone()),
        None => OutputTarget::Default {
            root: PathBuf::from("."),
            stem: Path::new(&pattern)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(pattern.as_str())
                .to_string(),
        },
    };

    let request = GenerateRequest {
        source: PatternSource::Named(pattern),
        size: cli.size(),
        output,
        png: cli.png,
        manifest: cli.manifest,
    };

    let pipeline = GenerationPipeline::new(library);
    match pipeline.generate(&request) {
        Ok(artifact) => match serde_json::to_string_pretty(&artifact) {
            Ok(summary) => {
                println!("{summary}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error generating tartan: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error generating tartan: {e}");
            ExitCode::FAILURE
        }
    }
}
