use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Recoverable backend failures. Each one triggers fallback to the next
/// backend in the arbiter's order; none of them is surfaced to callers.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Transient failure: {0}")]
    Transient(String),
    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Output markers that mean "retry elsewhere", not "here is your answer".
const TRANSIENT_MARKERS: [&str; 3] = ["quota", "rate_limit", "error"];

/// True when the backend ran but its output should trigger fallback: empty
/// stdout, or a quota/rate-limit/error marker on the error channel
/// (case-insensitive substring match).
pub fn is_transient_output(stdout: &str, stderr: &str) -> bool {
    if stdout.trim().is_empty() {
        return true;
    }
    let stderr = stderr.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| stderr.contains(m))
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    /// Configured per-call deadline for this backend. Remote backends get a
    /// short one, local inference a longer one.
    fn timeout(&self) -> Duration;

    /// Run one prompt. The implementation enforces `timeout` itself; a hung
    /// backend must resolve to `InvokeError::Timeout`, not block forever.
    async fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, InvokeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stdout_is_transient() {
        assert!(is_transient_output("", ""));
        assert!(is_transient_output("   \n", ""));
    }

    #[test]
    fn test_markers_on_stderr_are_transient() {
        assert!(is_transient_output("some text", "Quota exceeded for project"));
        assert!(is_transient_output("some text", "RATE_LIMIT hit"));
        assert!(is_transient_output("some text", "internal ERROR: retry later"));
    }

    #[test]
    fn test_clean_output_is_not_transient() {
        assert!(!is_transient_output("a real answer", ""));
        assert!(!is_transient_output("a real answer", "warning: slow model load"));
    }

    #[test]
    fn test_markers_on_stdout_do_not_count() {
        // Markers matter on the error channel only; an answer that merely
        // mentions the word "error" is still an answer.
        assert!(!is_transient_output("here is how to handle an error in Rust", ""));
    }
}
