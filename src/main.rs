use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use change_chunks::git::{DiffSource, GitCli};
use change_chunks::review::{FileReviewInput, ReviewOptions, apply_context_limit, prepare_file_input};
use clap::{Parser, Subcommand};
use context_pack::{AssembleOptions, Assembler, ContextConfig, config, snapshot_repo};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Bounded prompt context for UI components and changed files
#[derive(Parser, Debug)]
#[command(name = "context-engine", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gather an entry file, its local imports and its behavior as JSON
    Assemble {
        /// Component file the import walk starts from
        entry: PathBuf,
        /// Behavior descriptor to use instead of the discovered sibling
        #[arg(long, value_name = "FILE")]
        behavior: Option<PathBuf>,
        /// Skip behavior descriptors and state files
        #[arg(long, conflicts_with = "behavior")]
        no_behavior: bool,
    },
    /// Render annotated chunks for every file changed against a base ref
    Review {
        /// Directory inside the repository
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Baseline ref (defaults to CTX_BASE_REF or origin/main)
        #[arg(long, value_name = "REF")]
        base: Option<String>,
    },
    /// Print every source file under a root
    Snapshot {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,context_pack=info,change_chunks=info"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cfg = config::load_from_env_or_default()?;

    match cli.command {
        Command::Assemble {
            entry,
            behavior,
            no_behavior,
        } => run_assemble(&cfg, entry, behavior, no_behavior),
        Command::Review { dir, base } => run_review(&cfg, dir, base).await,
        Command::Snapshot { root } => run_snapshot(&cfg, root),
    }
}

fn run_assemble(
    cfg: &ContextConfig,
    entry: PathBuf,
    behavior: Option<PathBuf>,
    no_behavior: bool,
) -> Result<()> {
    let mut opts = AssembleOptions::from_config(cfg);
    if no_behavior {
        opts.include_behavior = false;
    }

    let package = Assembler::from_config(cfg).assemble(&entry, behavior.as_deref(), &opts);
    println!("{}", serde_json::to_string_pretty(&package)?);
    Ok(())
}

async fn run_review(cfg: &ContextConfig, dir: PathBuf, base: Option<String>) -> Result<()> {
    let mut opts = ReviewOptions::from_config(cfg);
    if let Some(base) = base {
        opts.base_ref = base;
    }

    let git = GitCli::new(dir);
    if !git.is_repo() {
        bail!("{} is not inside a git repository", git.workdir().display());
    }
    let files = git
        .changed_files(&opts.base_ref)
        .with_context(|| format!("listing changes against {}", opts.base_ref))?;
    info!(changed = files.len(), base = %opts.base_ref, "review: rendering");

    // One owned task per file; results are re-ordered to the listing order.
    let mut set = JoinSet::new();
    for (idx, file) in files.into_iter().enumerate() {
        let git = git.clone();
        let opts = opts.clone();
        set.spawn_blocking(move || (idx, prepare_file_input(&git, &file, &opts)));
    }

    let mut rendered: Vec<(usize, FileReviewInput)> = Vec::new();
    while let Some(res) = set.join_next().await {
        match res {
            Ok((idx, Some(input))) => rendered.push((idx, input)),
            Ok((_, None)) => {}
            Err(err) => warn!(error = %err, "review: render task failed"),
        }
    }
    rendered.sort_by_key(|(idx, _)| *idx);

    let inputs = apply_context_limit(
        rendered.into_iter().map(|(_, i)| i).collect(),
        opts.context_limit,
    );
    for input in &inputs {
        println!("{}\n", input.chunks);
        if let Some(b) = &input.behavior {
            println!("// Behavior for {}:\n{b}\n", input.display_path);
        }
    }
    Ok(())
}

fn run_snapshot(cfg: &ContextConfig, root: PathBuf) -> Result<()> {
    let snap = snapshot_repo(&root, cfg)?;
    info!(files = snap.files.len(), tokens = snap.estimated_tokens, "snapshot: rendering");
    print!("{}", snap.render());
    Ok(())
}
