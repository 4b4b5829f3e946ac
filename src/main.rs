use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;

use morphseq_config::SequenceConfig;
use morphseq_fetch::FsFetcher;
use morphseq_loader::{LoadOutcome, SequenceLoader};
use morphseq_plan::build_plan;

/// morphseq - preload node-to-node morphing image sequences
#[derive(Parser)]
#[command(name = "morphseq")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.morphseq)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to a sequence config file (JSON). Defaults to the built-in sequence.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Increase log verbosity (-v for debug, -vv for trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the flattened resource plan
  Plan {
    /// Print every entry as JSON instead of a summary
    #[arg(long)]
    json: bool,
  },

  /// Load every image of the sequence and report progress
  Load {
    /// Asset root holding node images and the transition directory
    /// (default: <data-dir>/assets)
    #[arg(long)]
    root: Option<PathBuf>,
  },
}

#[derive(Serialize)]
struct LoadSummary {
  root: PathBuf,
  total: usize,
  placeholders: usize,
  size_mismatches: usize,
  progress: u8,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = load_config(cli.config.as_deref())?;

  match cli.command {
    Some(Commands::Plan { json }) => print_plan(&config, json)?,
    Some(Commands::Load { root }) => {
      let root = match root {
        Some(root) => root,
        None => data_dir(cli.data_dir)?.join("assets"),
      };
      run_load(config, root)?;
    }
    None => {
      println!("morphseq - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => Level::INFO,
    1 => Level::DEBUG,
    _ => Level::TRACE,
  };
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_writer(std::io::stderr)
    .init();
}

fn data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
  match data_dir {
    Some(dir) => Ok(dir),
    None => Ok(
      dirs::home_dir()
        .context("could not determine home directory")?
        .join(".morphseq"),
    ),
  }
}

fn load_config(path: Option<&Path>) -> Result<SequenceConfig> {
  match path {
    Some(path) => SequenceConfig::from_json_file(path)
      .with_context(|| format!("failed to load config file: {}", path.display())),
    None => Ok(SequenceConfig::default()),
  }
}

fn print_plan(config: &SequenceConfig, json: bool) -> Result<()> {
  let plan = build_plan(config).context("failed to build resource plan")?;

  if json {
    println!("{}", serde_json::to_string_pretty(plan.entries())?);
    return Ok(());
  }

  println!("{} resources, {} nodes", plan.len(), plan.node_count());
  for index in 0..plan.node_count() {
    if let Some(position) = plan.node_position(index) {
      println!("  node {index} at {position}: {}", config.nodes[index]);
    }
    if let (Some(range), Some(run)) = (plan.transition_range(index), config.transitions.get(index))
    {
      println!(
        "  run {} at {}..{}: {} frames",
        run.name, range.start, range.end, run.count
      );
    }
  }

  Ok(())
}

fn run_load(config: SequenceConfig, root: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_load_async(config, root).await })
}

async fn run_load_async(config: SequenceConfig, root: PathBuf) -> Result<()> {
  eprintln!("Loading sequence from: {}", root.display());

  let loader = SequenceLoader::new(config, FsFetcher::new(&root));

  let last = AtomicU8::new(0);
  let notifier = |percent: u8| {
    if last.swap(percent, Ordering::Relaxed) != percent {
      eprintln!("progress: {percent}%");
    }
  };

  let (total, placeholders) = match loader
    .load(&notifier)
    .await
    .context("sequence load failed")?
  {
    LoadOutcome::Completed {
      total,
      placeholders,
    } => (total, placeholders),
    // Fresh loader, so this cannot happen.
    LoadOutcome::AlreadyLoading | LoadOutcome::AlreadyLoaded => {
      anyhow::bail!("sequence loader was already in use")
    }
  };

  // The last 10% is ours: check every frame against the nominal size.
  let expected = (loader.config().frame_width, loader.config().frame_height);
  let size_mismatches = (0..loader.total_images())
    .filter_map(|i| loader.get_image(i))
    .filter(|frame| (frame.width(), frame.height()) != expected)
    .count();
  notifier(100);

  let summary = LoadSummary {
    root,
    total,
    placeholders,
    size_mismatches,
    progress: 100,
  };
  println!("{}", serde_json::to_string_pretty(&summary)?);

  Ok(())
}
