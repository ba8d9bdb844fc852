//! Chat orchestration: classifier → retrieval → prompt → generation.
//!
//! `ChatService` wires the startup-built collaborators together and answers
//! one query per call. It is constructed once during process startup and
//! shared read-only across requests; nothing in it is mutated after
//! construction, so concurrent requests need no coordination.

use cdp_core::{AppConfig, AppResult};
use cdp_knowledge::{DomainClassifier, Platform, RelevanceIndex};
use cdp_llm::{LlmClient, LlmRequest};
use cdp_prompt::{build_support_prompt, format_documentation, PromptDefinition};
use std::sync::Arc;

/// Fixed redirect for out-of-domain queries. Returned without touching the
/// index or the generation service.
pub const REDIRECT_MESSAGE: &str = "I'm a CDP support agent focused on Segment, mParticle, \
     Lytics, and Zeotap. I can help with questions about these platforms. Is there something \
     specific about these CDPs you'd like to know?";

/// Fixed user-safe reply when the generation service fails. The underlying
/// cause is logged for operators, never shown to the user.
pub const APOLOGY_MESSAGE: &str =
    "I'm having trouble processing your request right now. Please try again later.";

/// Source label reported alongside every chat response.
pub const ANSWER_SOURCE: &str = "gemini";

/// The request-handling core of the chatbot.
pub struct ChatService {
    classifier: DomainClassifier,
    index: RelevanceIndex,
    prompt: PromptDefinition,
    client: Arc<dyn LlmClient>,
    model: String,
    top_n: usize,
    min_score: f32,
}

impl ChatService {
    /// Assemble a service from already-built collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        classifier: DomainClassifier,
        index: RelevanceIndex,
        prompt: PromptDefinition,
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        top_n: usize,
        min_score: f32,
    ) -> Self {
        Self {
            classifier,
            index,
            prompt,
            client,
            model: model.into(),
            top_n,
            min_score,
        }
    }

    /// Build the full service from configuration.
    ///
    /// Loads the corpus (snapshot or built-in), builds the relevance index,
    /// and creates the generation client. A missing API key or a corrupt
    /// snapshot fails here, before any query is accepted.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        let api_key = config.require_api_key()?;

        let corpus = cdp_knowledge::load_corpus(&config.cache_path)?;
        for platform in Platform::ALL {
            tracing::debug!(
                "{}: {} chunks (source: {})",
                platform,
                corpus.get(platform).len(),
                platform.docs_url()
            );
        }

        let index = RelevanceIndex::build(&corpus);
        let classifier = DomainClassifier::new()?;
        let prompt = cdp_prompt::load_prompt(&config.workspace)?;

        let client = cdp_llm::create_client(
            &config.provider,
            config.endpoint.as_deref(),
            Some(&api_key),
        )?;

        Ok(Self::new(
            classifier,
            index,
            prompt,
            client,
            config.model.clone(),
            config.top_n,
            config.min_score,
        ))
    }

    /// Answer a single query.
    ///
    /// Out-of-domain queries get the fixed redirect. In-domain queries are
    /// answered by the generation service over a documentation-grounded
    /// prompt; any generation failure degrades to the apology text rather
    /// than propagating.
    pub async fn answer(&self, query: &str) -> String {
        if !self.classifier.is_in_domain(query) {
            tracing::info!("Query classified out of domain");
            return REDIRECT_MESSAGE.to_string();
        }

        let results = self.index.retrieve(query, self.top_n, self.min_score);
        tracing::info!("Retrieved {} relevant chunks", results.len());

        let documentation = format_documentation(
            results
                .iter()
                .map(|(chunk, _)| (chunk.platform.as_str(), chunk.content.as_str())),
        );

        let platforms = Platform::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let prompt =
            match build_support_prompt(&self.prompt, &platforms, &documentation, query) {
                Ok(prompt) => prompt,
                Err(e) => {
                    tracing::error!("Prompt rendering failed: {}", e);
                    return APOLOGY_MESSAGE.to_string();
                }
            };

        let request = LlmRequest::new(prompt, &self.model)
            .with_temperature(0.3)
            .with_max_tokens(1024);

        match self.client.complete(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::error!("Generation failed: {}", e);
                APOLOGY_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdp_core::{AppError, AppResult};
    use cdp_knowledge::corpus::builtin_corpus;
    use cdp_llm::LlmResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generation client double that records calls and prompts, and replies
    /// with a fixed payload or a fixed error.
    struct MockClient {
        reply: Option<String>,
        calls: AtomicUsize,
        prompts: std::sync::Mutex<Vec<String>>,
    }

    impl MockClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
                prompts: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for MockClient {
        fn provider_name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());

            match &self.reply {
                Some(reply) => Ok(LlmResponse {
                    content: reply.clone(),
                    model: request.model.clone(),
                    usage: Default::default(),
                }),
                None => Err(AppError::Llm("mock generation failure".to_string())),
            }
        }
    }

    fn service_with(client: Arc<MockClient>) -> ChatService {
        ChatService::new(
            DomainClassifier::new().unwrap(),
            RelevanceIndex::build(&builtin_corpus()),
            cdp_prompt::default_prompt(),
            client,
            "gemini-1.5-flash",
            5,
            0.1,
        )
    }

    #[tokio::test]
    async fn test_in_domain_query_returns_generated_text_verbatim() {
        let client = Arc::new(MockClient::replying("Here is how you build a segment."));
        let service = service_with(Arc::clone(&client));

        let answer = service
            .answer("How do I create a new audience segment in Lytics?")
            .await;

        assert_eq!(answer, "Here is how you build a segment.");
        assert_eq!(client.call_count(), 1);

        // The assembled prompt is grounded in the retrieved Lytics chunk
        let prompt = client.last_prompt().unwrap();
        assert!(prompt.contains("Lytics"));
        assert!(prompt.contains("Building an audience segment"));
    }

    #[tokio::test]
    async fn test_out_of_domain_query_redirects_without_generation() {
        let client = Arc::new(MockClient::replying("should never be used"));
        let service = service_with(Arc::clone(&client));

        let answer = service.answer("What's your favorite color?").await;

        assert_eq!(answer, REDIRECT_MESSAGE);
        assert_eq!(client.call_count(), 0, "generation must not be invoked");
    }

    #[tokio::test]
    async fn test_generation_failure_degrades_to_apology() {
        let client = Arc::new(MockClient::failing());
        let service = service_with(Arc::clone(&client));

        let answer = service.answer("tell me about Segment").await;

        assert_eq!(answer, APOLOGY_MESSAGE);
        assert_eq!(client.call_count(), 1);
    }
}
