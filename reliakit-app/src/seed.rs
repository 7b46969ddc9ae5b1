use crate::roster;
use anyhow::Result;
use reliakit_store::{LogStatus, LogStore};
use std::path::Path;

/// Seed the log with sample rows on first run and make sure the agent
/// roster file exists. Returns true if rows were inserted; a database that
/// already has entries is left untouched.
pub fn seed(store: &LogStore, agents_path: &Path) -> Result<bool> {
    if !agents_path.exists() {
        roster::write_default_roster(agents_path)?;
        println!("Created default agent roster at {}", agents_path.display());
    }

    if store.has_entries()? {
        return Ok(false);
    }

    store.insert(
        "EchoLens",
        "gemini-pro",
        "Seed prompt: What is ReliaKit?",
        "ReliaKit is a modular automation framework for resilient AI/DevOps workflows.",
        LogStatus::Seed,
    )?;
    store.insert(
        "LoopGuardian",
        "gemma:2b",
        "Seed prompt: Why use fallback logic?",
        "Fallback logic ensures LLM continuity and prevents quota exhaustion disruptions.",
        LogStatus::Seed,
    )?;

    Ok(true)
}
