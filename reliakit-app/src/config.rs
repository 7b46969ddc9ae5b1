use anyhow::{Context, Result};
use reliakit_backends::{Backend, CliBackend, PromptMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub db_path: PathBuf,
    pub agents_path: PathBuf,
    /// Fallback order: tried top to bottom.
    pub backends: Vec<BackendConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub prompt: PromptDelivery,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptDelivery {
    Stdin,
    Arg,
}

impl From<PromptDelivery> for PromptMode {
    fn from(delivery: PromptDelivery) -> Self {
        match delivery {
            PromptDelivery::Stdin => PromptMode::Stdin,
            PromptDelivery::Arg => PromptMode::Arg,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/memory.db"),
            agents_path: PathBuf::from("generated_configs/new_agents.jsonl"),
            backends: vec![
                BackendConfig {
                    name: "gemini".to_string(),
                    program: "npx".to_string(),
                    args: vec!["@google/gemini-cli".to_string()],
                    prompt: PromptDelivery::Stdin,
                    timeout_secs: 15,
                },
                BackendConfig {
                    name: "gemini-flash".to_string(),
                    program: "npx".to_string(),
                    args: vec![
                        "@google/gemini-cli".to_string(),
                        "--model".to_string(),
                        "gemini-flash".to_string(),
                    ],
                    prompt: PromptDelivery::Stdin,
                    timeout_secs: 15,
                },
                // Local inference: slower, so a longer deadline.
                BackendConfig {
                    name: "ollama:gemma:2b".to_string(),
                    program: "ollama".to_string(),
                    args: vec!["run".to_string(), "gemma:2b".to_string()],
                    prompt: PromptDelivery::Arg,
                    timeout_secs: 30,
                },
            ],
        }
    }
}

impl Config {
    pub fn exists() -> bool {
        PathBuf::from(CONFIG_PATH).exists()
    }

    pub fn load() -> Result<Self> {
        let content =
            std::fs::read_to_string(CONFIG_PATH).context("Failed to read config.toml")?;
        toml::from_str(&content).context("Failed to parse config.toml")
    }

    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(CONFIG_PATH, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backends.is_empty() {
            anyhow::bail!("At least one backend must be configured");
        }
        for backend in &self.backends {
            if backend.name.trim().is_empty() || backend.program.trim().is_empty() {
                anyhow::bail!("Backend name and program must be non-empty");
            }
            if backend.timeout_secs == 0 {
                anyhow::bail!("Backend '{}' has a zero timeout", backend.name);
            }
        }
        Ok(())
    }

    /// Materialize the configured fallback order.
    pub fn build_backends(&self) -> Vec<Box<dyn Backend>> {
        self.backends
            .iter()
            .map(|b| {
                Box::new(CliBackend::new(
                    b.name.clone(),
                    b.program.clone(),
                    b.args.clone(),
                    b.prompt.into(),
                    Duration::from_secs(b.timeout_secs),
                )) as Box<dyn Backend>
            })
            .collect()
    }
}
