use std::sync::Arc;

use crate::agent::{ExecutionContext, ReactAgent, SessionStore, StopPolicy};
use crate::documents::DocumentStore;
use crate::indexes::IndexStore;
use crate::llm_client::LanguageModel;
use crate::router::Dispatcher;
use crate::tools::{build_all_tools, ToolContext};

/// Shared application state injected into all route handlers via Axum extractors.
/// Every service here is built once at startup and lives for the process.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub sessions: Arc<SessionStore>,
    pub indexes: Arc<IndexStore>,
    pub tool_count: usize,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn DocumentStore>,
        exec: ExecutionContext,
        max_iterations: usize,
        stop_policy: StopPolicy,
        memory_token_limit: usize,
    ) -> Self {
        let indexes = Arc::new(IndexStore::new(store.clone(), llm.clone()));
        let tools = Arc::new(build_all_tools(ToolContext {
            store: store.clone(),
            indexes: indexes.clone(),
            llm: llm.clone(),
        }));
        let tool_count = tools.len();
        let agent = Arc::new(ReactAgent::new(llm.clone(), tools));
        let sessions = Arc::new(SessionStore::new(agent, memory_token_limit));
        let dispatcher = Arc::new(Dispatcher::new(
            llm,
            store,
            sessions.clone(),
            exec,
            max_iterations,
            stop_policy,
        ));
        Self {
            dispatcher,
            sessions,
            indexes,
            tool_count,
        }
    }
}
