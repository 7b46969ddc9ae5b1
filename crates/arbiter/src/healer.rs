use crate::{Arbiter, ArbiterError};
use reliakit_store::LogStatus;
use std::sync::Arc;
use tracing::info;

/// Resubmits failed calls through the arbiter. The original ERROR rows stay
/// in the log as history; each re-attempt appends its own row. No backoff:
/// bounded-retry policy belongs to whoever invokes `heal`.
pub struct Healer {
    arbiter: Arc<Arbiter>,
}

impl Healer {
    pub fn new(arbiter: Arc<Arbiter>) -> Self {
        Self { arbiter }
    }

    /// Re-run every logged ERROR entry, returning how many were resubmitted.
    pub async fn heal(&self) -> Result<usize, ArbiterError> {
        let failed = self.arbiter.store().list_by_status(LogStatus::Error)?;
        info!("Healing {} failed entries", failed.len());

        for entry in &failed {
            self.arbiter.run(&entry.agent_name, &entry.prompt).await?;
        }

        Ok(failed.len())
    }
}
