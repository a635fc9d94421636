mod script;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};
use tree_layout::{Forest, ForestLayout, Hierarchical, HierarchicalLayout, LayoutEngine};

use script::{run, Script};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Hierarchical,
    Forest,
}

/// Replay a recorded graph session and print the positions each layout
/// step publishes
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// RON list of graph events, root changes and compute requests
    script: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Strategy::Hierarchical)]
    strategy: Strategy,

    /// RON file with the settings of the chosen strategy
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Roots to start with, comma separated
    #[arg(short, long, value_delimiter = ',')]
    roots: Vec<String>,
}

fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    ron::from_str(&source).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn engine(args: &Args) -> Result<Box<dyn LayoutEngine<String, String>>> {
    let config = args.config.as_deref();
    let engine: Box<dyn LayoutEngine<String, String>> = match args.strategy {
        Strategy::Hierarchical => {
            let strategy: Hierarchical = load_config(config)?;
            debug!("Hierarchical layout: {strategy:?}");
            Box::new(HierarchicalLayout::<String, String>::new(strategy))
        }
        Strategy::Forest => {
            let strategy: Forest = load_config(config)?;
            debug!("Forest layout: {strategy:?}");
            Box::new(ForestLayout::<String, String>::new(strategy))
        }
    };
    Ok(engine)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let script = Script::load(&args.script)?;
    let mut engine = engine(&args)?;
    if !args.roots.is_empty() {
        engine.set_roots(args.roots.clone());
    }

    run(engine.as_mut(), &script, &mut std::io::stdout().lock())
}
