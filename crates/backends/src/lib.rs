//! Model backend invocation.
//!
//! A backend is an external model-serving CLI wrapped as a single
//! prompt-in/text-out call with an enforced wall-clock timeout. Failures are
//! values (`InvokeError`), never panics, so the arbiter can branch on them.

mod cli_backend;
mod traits;

pub use cli_backend::{CliBackend, PromptMode};
pub use traits::{is_transient_output, Backend, InvokeError};
