//! Ask command handler.
//!
//! Answers a single question on the command line, using the same
//! classifier → retrieval → generation path as the HTTP endpoint.

use crate::service::{ChatService, ANSWER_SOURCE};
use cdp_core::{AppConfig, AppResult};
use clap::Args;

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Number of documentation chunks to retrieve
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }

        let service = ChatService::from_config(&config)?;
        let answer = service.answer(&self.question).await;

        if self.json {
            let output = serde_json::json!({
                "response": answer,
                "source": ANSWER_SOURCE,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
