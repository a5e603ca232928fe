pub mod assistant;
pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod safety;

use assistant::AssistantProxy;
use cli::Args;
use log::info;
use safety::MockSafetyData;
use server::{ api::AppState, Server };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("adapter default"));
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("adapter default"));
    info!("Chat API Key: {}", if args.chat_api_key().is_some() { "set" } else { "not set" });
    info!("Upstream Timeout: {}s", args.upstream_timeout_secs);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let llm_config = args.llm_config()?;
    let chat_client = llm::chat::new_client(&llm_config)?;
    let prompts = config::prompt::resolve_prompts(args.prompts_path.as_deref())?;
    let proxy = AssistantProxy::new(
        chat_client,
        prompts,
        Duration::from_secs(args.upstream_timeout_secs)
    );

    let state = AppState {
        proxy: Arc::new(proxy),
        data: Arc::new(MockSafetyData::new()),
    };

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, state, args);
    server.run().await?;

    Ok(())
}
