//! Reasoning loop, its per-session state, and the long-lived context it runs in.

use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod memory;
pub mod prompts;
pub mod react;
pub mod runtime;
pub mod session;

pub use react::{ReactAgent, StopPolicy};
pub use runtime::ExecutionContext;
pub use session::{Session, SessionStore};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Reasoning loop timed out after {0:?}")]
    Timeout(Duration),

    #[error("Execution context has been shut down")]
    Cancelled,

    #[error("No answer after {0} iterations")]
    IterationLimit(usize),

    #[error("Reasoning task failed: {0}")]
    Join(String),
}
