use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};
use tree_layout::{GraphEvent, LayoutEngine, PositionChanged};

/// One entry of a recorded host session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Event(GraphEvent<String, String>),
    SetRoots(Vec<String>),
    Compute,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script(pub Vec<Command>);

impl Script {
    pub fn parse(source: &str) -> Result<Self> {
        let commands = ron::from_str(source).context("Invalid script")?;
        Ok(Self(commands))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Play the script against the engine, writing what every compute publishes
pub fn run(
    engine: &mut dyn LayoutEngine<String, String>,
    script: &Script,
    out: &mut impl Write,
) -> Result<()> {
    let mut computes = 0;

    for command in &script.0 {
        debug!("Running {command:?}");
        match command {
            Command::Event(event) => engine.notify(event.clone())?,
            Command::SetRoots(roots) => engine.set_roots(roots.clone()),
            Command::Compute => {
                let mut moved: Vec<PositionChanged<String>> = Vec::new();
                let step = engine.compute(&mut moved)?;
                let metrics = engine.metrics();

                writeln!(
                    out,
                    "# {} step {computes}: {}, {} moved, stabilization {:.3}",
                    engine.algorithm_name(),
                    step.status,
                    step.moved,
                    metrics.stabilization()
                )?;
                for event in &moved {
                    writeln!(out, "{} {} {} {}", event.node, event.x, event.y, event.z)?;
                }
                if !step.unreachable.is_empty() {
                    warn!("Unreachable nodes: {}", step.unreachable.join(", "));
                }

                computes += 1;
            }
        }
    }

    Ok(())
}
