use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One agent definition from the line-delimited JSON roster. Only `name` is
/// required; the core treats names as opaque log fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Load the roster, skipping blank and corrupted lines rather than failing
/// the whole file.
pub fn load_roster(path: &Path) -> Result<Vec<AgentRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open agent roster at {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut agents = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AgentRecord>(&line) {
            Ok(agent) => agents.push(agent),
            Err(e) => tracing::warn!("Skipping corrupted roster line: {}", e),
        }
    }
    Ok(agents)
}

/// Write the stock roster shipped with a fresh install.
pub fn write_default_roster(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let defaults = [
        AgentRecord {
            name: "CodeHealer".to_string(),
            description: "Refactors legacy code.".to_string(),
        },
        AgentRecord {
            name: "FusionForge".to_string(),
            description: "Analyzes and merges modules.".to_string(),
        },
        AgentRecord {
            name: "LoopGuardian".to_string(),
            description: "Monitors token usage and ethics.".to_string(),
        },
        AgentRecord {
            name: "QuanaSage".to_string(),
            description: "Manages agent governance and rules.".to_string(),
        },
    ];

    let mut file = std::fs::File::create(path)?;
    for agent in &defaults {
        writeln!(file, "{}", serde_json::to_string(agent)?)?;
    }
    Ok(())
}
