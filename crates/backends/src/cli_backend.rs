use crate::traits::{is_transient_output, Backend, InvokeError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// How the prompt reaches the external CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Written to the child's standard input (e.g. the Gemini CLI).
    Stdin,
    /// Appended as the final argv element (e.g. `ollama run <model> <prompt>`).
    Arg,
}

/// A model backend reached by shelling out to a command-line tool. Standard
/// output is the candidate response, standard error the failure signal.
pub struct CliBackend {
    name: String,
    program: String,
    args: Vec<String>,
    prompt_mode: PromptMode,
    timeout: Duration,
}

impl CliBackend {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
        prompt_mode: PromptMode,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            prompt_mode,
            timeout,
        }
    }
}

#[async_trait]
impl Backend for CliBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, InvokeError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if self.prompt_mode == PromptMode::Arg {
            cmd.arg(prompt);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("Invoking backend '{}' via {}", self.name, self.program);

        let mut child = cmd
            .spawn()
            .map_err(|e| InvokeError::Unavailable(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if self.prompt_mode == PromptMode::Stdin {
                stdin
                    .write_all(prompt.as_bytes())
                    .await
                    .map_err(|e| InvokeError::Transient(format!("stdin write failed: {}", e)))?;
            }
            // Dropping closes the pipe so the child sees EOF.
            drop(stdin);
        }

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| InvokeError::Timeout(timeout.as_secs()))?
            .map_err(|e| InvokeError::Unavailable(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(InvokeError::Transient(if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            }));
        }

        if is_transient_output(&stdout, &stderr) {
            return Err(InvokeError::Transient(if stderr.is_empty() {
                "empty response".to_string()
            } else {
                stderr
            }));
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(program: &str, args: &[&str], mode: PromptMode) -> CliBackend {
        CliBackend::new(
            "test",
            program,
            args.iter().map(|s| s.to_string()).collect(),
            mode,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_prompt_as_argument() {
        let b = backend("echo", &[], PromptMode::Arg);
        let out = b.invoke("hello", b.timeout()).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_prompt_on_stdin() {
        let b = backend("cat", &[], PromptMode::Stdin);
        let out = b.invoke("from stdin", b.timeout()).await.unwrap();
        assert_eq!(out, "from stdin");
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let b = backend("definitely-not-a-real-binary", &[], PromptMode::Arg);
        let err = b.invoke("p", b.timeout()).await.unwrap_err();
        assert!(matches!(err, InvokeError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_hung_backend_times_out() {
        let b = backend("sh", &["-c", "sleep 5"], PromptMode::Stdin);
        let err = b.invoke("p", Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, InvokeError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_empty_output_is_transient() {
        let b = backend("true", &[], PromptMode::Arg);
        let err = b.invoke("p", b.timeout()).await.unwrap_err();
        assert!(matches!(err, InvokeError::Transient(_)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_transient() {
        let b = backend("sh", &["-c", "echo out; exit 3"], PromptMode::Stdin);
        let err = b.invoke("p", b.timeout()).await.unwrap_err();
        assert!(matches!(err, InvokeError::Transient(_)));
    }

    #[tokio::test]
    async fn test_quota_marker_on_stderr_is_transient() {
        let b = backend("sh", &["-c", "echo answer; echo 'quota exceeded' >&2"], PromptMode::Stdin);
        let err = b.invoke("p", b.timeout()).await.unwrap_err();
        assert!(matches!(err, InvokeError::Transient(_)));
    }
}
