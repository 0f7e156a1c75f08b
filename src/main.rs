use std::time::Instant;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::ProgressStyle;
use less_task::{LessOptions, LessTask, Task, as_overhead};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every compiled file and written destination
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the configured source sets
    Run(RunArgs),

    /// Print the task name, description and options
    Describe,
}

#[derive(Args)]
struct RunArgs {
    /// Path to the JSON options file
    #[arg(short, long, default_value = "less.json")]
    config: Utf8PathBuf,

    /// Directory relative paths resolve against
    #[arg(short = 'C', long)]
    dir: Option<Utf8PathBuf>,

    /// Remove whitespace and comments
    #[arg(long)]
    compress: bool,

    /// Create a source map
    #[arg(long)]
    source_map: bool,

    /// Where to write the source map
    #[arg(long)]
    source_map_write_to: Option<Utf8PathBuf>,

    /// Url to use for the source map
    #[arg(long)]
    source_map_url: Option<String>,
}

impl RunArgs {
    fn apply(&self, options: &mut LessOptions) {
        if self.compress {
            options.compress = Some(true);
        }
        if self.source_map {
            options.source_map = Some(true);
        }
        if let Some(path) = &self.source_map_write_to {
            options.source_map_write_to = Some(path.clone());
        }
        if let Some(url) = &self.source_map_url {
            options.source_map_url = Some(url.clone());
        }
    }
}

const PROGRESS_TEMPLATE: &str =
    "{span_child_prefix}{spinner:.green} [{elapsed}] {span_name}{{{span_fields}}} {wide_msg}";

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    let indicatif_layer = IndicatifLayer::new().with_progress_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .expect("Error setting progress bar template"),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let s = Instant::now();

    let mut options = LessOptions::from_path(&args.config)
        .with_context(|| format!("Couldn't load options from {}", args.config))?;
    args.apply(&mut options);

    let mut task = LessTask::new(options);
    if let Some(dir) = &args.dir {
        task = task.with_working_dir(dir.clone());
    }

    let spec = task.configure();
    eprintln!(
        "Running task {} from {}.",
        style(spec.name).red(),
        style(&args.config).blue()
    );

    task.run()?;

    eprintln!("Done {}", as_overhead(s));

    Ok(())
}

fn describe() {
    let spec = LessTask::new(LessOptions::default()).configure();

    println!("{} - {}", style(spec.name).bold(), spec.description);
    println!();
    for option in &spec.options {
        let marker = match option.required {
            true => style("required").red(),
            false => style("optional").dim(),
        };
        println!("  {:<18} {:<8}  {}", option.name, marker, option.description);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Describe => describe(),
    }

    Ok(())
}
