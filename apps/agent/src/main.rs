mod agent;
mod config;
mod documents;
mod errors;
mod indexes;
mod llm_client;
mod matching;
mod router;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod tools;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::ExecutionContext;
use crate::config::Config;
use crate::documents::QdrantStore;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("career_agent={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting career agent v{}", env!("CARGO_PKG_VERSION"));

    let llm = OllamaClient::new(&config.ollama_base_url, &config.llm_model, config.llm_timeout)?;
    info!("LLM client initialized (model: {})", llm.model());

    let store = QdrantStore::new(&config.qdrant_url, config.llm_timeout)?;
    info!("Document store at {}", config.qdrant_url);

    let exec = ExecutionContext::current(config.llm_timeout);

    let state = AppState::new(
        Arc::new(llm),
        Arc::new(store),
        exec.clone(),
        config.agent_max_iterations,
        config.agent_stop_policy,
        config.memory_token_limit,
    );
    info!("{} tools registered", state.tool_count);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    exec.shutdown();
    info!("Server stopped");
    Ok(())
}
