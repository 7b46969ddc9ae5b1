use serde::{Deserialize, Serialize};

/// Terminal outcome of one arbitration call, stored as text in the `status`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    /// First backend in the fallback order answered.
    Success,
    /// A backend after the first answered.
    Fallback,
    /// Every configured backend failed.
    Error,
    /// Sample row written by the seeder, not by the arbiter.
    Seed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "SUCCESS",
            LogStatus::Fallback => "FALLBACK",
            LogStatus::Error => "ERROR",
            LogStatus::Seed => "SEED",
        }
    }

    /// Lenient parse: rows written by older tooling may carry status text we
    /// do not recognize; they are surfaced as `Error` instead of failing the
    /// whole listing.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "SUCCESS" => LogStatus::Success,
            "FALLBACK" => LogStatus::Fallback,
            "SEED" => LogStatus::Seed,
            _ => LogStatus::Error,
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One durable record of a completed arbitration call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    /// ISO-8601 UTC, assigned by the store at insertion.
    pub timestamp: String,
    pub agent_name: String,
    /// Backend that produced the response, or the last one attempted when
    /// every backend failed.
    pub model_used: String,
    pub prompt: String,
    pub response: String,
    pub status: LogStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            LogStatus::Success,
            LogStatus::Fallback,
            LogStatus::Error,
            LogStatus::Seed,
        ] {
            assert_eq!(LogStatus::from_str_lossy(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_maps_to_error() {
        assert_eq!(LogStatus::from_str_lossy("RETRYING"), LogStatus::Error);
        assert_eq!(LogStatus::from_str_lossy(""), LogStatus::Error);
    }
}
