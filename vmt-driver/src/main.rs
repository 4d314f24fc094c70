//! Hack VM Translator Driver
//!
//! Translates one `.vm` file, or every `.vm` file of a directory, into a
//! single Hack assembly file.

mod source;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use source::VmFile;
use std::fs;
use std::path::PathBuf;
use summary::TranslationSummary;
use vmt_backend::{translate_program, TranslatorOptions, VmSource};
use vmt_codegen::abi::{DEFAULT_ENTRY, STACK_BASE};

#[derive(Parser, Debug)]
#[command(name = "vmt")]
#[command(about = "Hack VM to Hack assembly translator")]
#[command(version = "0.1.0")]
struct Cli {
    /// A .vm file, or a directory of .vm files
    source: PathBuf,

    /// Output assembly file (default: X.asm, or D/D.asm for a directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Always emit the bootstrap sequence (default: only for several files)
    #[arg(long, conflicts_with = "no_bootstrap")]
    bootstrap: bool,

    /// Never emit the bootstrap sequence
    #[arg(long)]
    no_bootstrap: bool,

    /// Function called by the bootstrap sequence
    #[arg(long, default_value = DEFAULT_ENTRY)]
    entry: String,

    /// Initial stack pointer set by the bootstrap sequence
    #[arg(long, default_value_t = STACK_BASE)]
    stack_base: u16,

    /// Emit each VM command as a comment before its code
    #[arg(long)]
    annotate: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    summary_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn wants_bootstrap(&self, files: &[VmFile]) -> bool {
        if self.bootstrap {
            true
        } else if self.no_bootstrap {
            false
        } else {
            files.len() > 1
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let summary = run(&cli)?;
    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

/// `RUST_LOG` wins over `-v`
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: &Cli) -> Result<TranslationSummary> {
    let files = source::discover(&cli.source)?;
    let output = match &cli.output {
        Some(path) => path.clone(),
        None => source::default_output(&cli.source)?,
    };

    let options = TranslatorOptions {
        bootstrap: cli.wants_bootstrap(&files),
        entry_function: cli.entry.clone(),
        stack_base: cli.stack_base,
        annotate: cli.annotate,
    };
    let bootstrap = options.bootstrap;

    let mut texts = Vec::with_capacity(files.len());
    for file in &files {
        let text = fs::read_to_string(&file.path)
            .with_context(|| format!("Failed to read {}", file.path.display()))?;
        texts.push(text);
    }
    let filenames: Vec<String> = files.iter().map(|f| f.path.display().to_string()).collect();
    let sources: Vec<VmSource<'_>> = files
        .iter()
        .zip(&texts)
        .zip(&filenames)
        .map(|((file, text), filename)| VmSource {
            filename,
            namespace: &file.namespace,
            text,
        })
        .collect();

    // Nothing touches the output path unless the whole run succeeded
    let (asm, stats) = translate_program(&sources, options)
        .with_context(|| format!("Failed to translate {}", cli.source.display()))?;
    fs::write(&output, asm)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Wrote {} ({} instructions from {} commands)",
        output.display(),
        stats.instructions,
        stats.commands
    );
    Ok(TranslationSummary::new(
        files.into_iter().map(|f| f.path).collect(),
        &output,
        bootstrap,
        stats,
    ))
}
