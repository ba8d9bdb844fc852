//! Serve command handler.
//!
//! Builds the chat service and runs the HTTP endpoint.

use crate::server;
use crate::service::ChatService;
use cdp_core::{AppConfig, AppResult};
use clap::Args;
use std::sync::Arc;

/// Run the HTTP chat endpoint
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Bind address (host:port)
    #[arg(short, long, env = "CDP_SUPPORT_BIND")]
    pub bind: Option<String>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        if let Some(ref bind) = self.bind {
            config.bind = bind.clone();
        }

        // Corpus load and index build happen here, before the listener
        // binds; the service accepts no queries until both complete.
        let service = ChatService::from_config(&config)?;

        server::serve(Arc::new(service), &config.bind).await
    }
}
