//! Model arbitration: try an ordered list of backends, fall back on
//! failure, and write exactly one audit row per top-level call.

mod healer;

pub use healer::Healer;

use reliakit_backends::{Backend, InvokeError};
use reliakit_store::{LogStatus, LogStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Returned to the caller (and logged) when every backend has been tried and
/// failed. Downstream viewers pattern-match on the `LLM ERROR:` prefix.
pub const EXHAUSTED_RESPONSE: &str =
    "LLM ERROR: All configured model backends failed to provide a valid response.";

#[derive(Debug, Error)]
pub enum ArbiterError {
    /// The outcome could not be persisted. An unlogged outcome breaks the
    /// audit trail, so this is the one hard failure surfaced to callers.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("No backends configured")]
    NoBackends,
}

/// Stateless across calls apart from its fixed fallback order; safe to share
/// behind an `Arc` between concurrent callers.
pub struct Arbiter {
    backends: Vec<Box<dyn Backend>>,
    store: Arc<LogStore>,
}

impl Arbiter {
    pub fn new(backends: Vec<Box<dyn Backend>>, store: Arc<LogStore>) -> Self {
        Self { backends, store }
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Run one prompt through the fallback order.
    ///
    /// Backend failures never surface here; they advance the fallback. On
    /// exhaustion the sentinel string is returned as a normal value with
    /// `status = ERROR`. Exactly one log row is written on every exit path.
    pub async fn run(&self, agent_name: &str, prompt: &str) -> Result<String, ArbiterError> {
        if self.backends.is_empty() {
            return Err(ArbiterError::NoBackends);
        }

        let mut outcome: Option<(usize, String)> = None;

        for (index, backend) in self.backends.iter().enumerate() {
            info!("Attempting query with backend '{}'", backend.name());
            match backend.invoke(prompt, backend.timeout()).await {
                Ok(response) => {
                    info!("Backend '{}' succeeded", backend.name());
                    outcome = Some((index, response));
                    break;
                }
                Err(e) => {
                    warn!("Backend '{}' failed: {}", backend.name(), describe(&e));
                }
            }
        }

        let (model_used, response, status) = match outcome {
            Some((0, response)) => (self.backends[0].name(), response, LogStatus::Success),
            Some((index, response)) => (self.backends[index].name(), response, LogStatus::Fallback),
            None => {
                let last = &self.backends[self.backends.len() - 1];
                (last.name(), EXHAUSTED_RESPONSE.to_string(), LogStatus::Error)
            }
        };

        self.store
            .insert(agent_name, model_used, prompt, &response, status)?;

        Ok(response)
    }
}

fn describe(e: &InvokeError) -> String {
    match e {
        InvokeError::Unavailable(msg) => format!("unavailable ({})", msg),
        InvokeError::Transient(msg) => format!("transient ({})", msg),
        InvokeError::Timeout(secs) => format!("timed out after {}s", secs),
    }
}
