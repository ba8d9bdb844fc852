//! Prompt loader with an embedded default definition.
//!
//! Operators can override the support prompt by placing a YAML definition at
//! `.cdp-support/prompts/support.yml` in the workspace; otherwise the
//! embedded default is used.

use crate::types::PromptDefinition;
use cdp_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the built-in support prompt.
const DEFAULT_PROMPT_ID: &str = "support.answer.default";

/// The built-in support prompt template.
///
/// Instructs the agent to ground its answer in the retrieved documentation,
/// admit uncertainty rather than fabricate, and format with markdown.
const DEFAULT_TEMPLATE: &str = "\
You are a helpful Customer Data Platform (CDP) support agent.
Answer the user's question about {{platforms}} based on the following documentation:

{{documentation}}

If the question asks for a comparison between CDPs, highlight the key differences.
If you don't know the answer, say so honestly and suggest where they might find more information.
Your response should be clear, concise, and directly address the user's question.
Format your response with markdown to improve readability when appropriate.

User question: {{question}}
";

/// The embedded default prompt definition.
pub fn default_prompt() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_PROMPT_ID.to_string(),
        title: "CDP support answer".to_string(),
        template: DEFAULT_TEMPLATE.to_string(),
    }
}

/// Load the support prompt definition for a workspace.
///
/// Returns the override at `.cdp-support/prompts/support.yml` when present,
/// the embedded default otherwise. An override that exists but does not
/// parse or validate is an error rather than a silent fallback.
pub fn load_prompt(workspace_path: &Path) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path.join(".cdp-support/prompts/support.yml");

    if !prompt_file.exists() {
        tracing::debug!("No prompt override; using built-in definition");
        return Ok(default_prompt());
    }

    tracing::debug!("Loading prompt override from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt override: {}", definition.id);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if !def.template.contains("{{question}}") {
        return Err(AppError::Prompt(
            "Prompt template must reference {{question}}".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_prompt_mentions_required_variables() {
        let def = default_prompt();
        assert_eq!(def.id, DEFAULT_PROMPT_ID);
        assert!(def.template.contains("{{platforms}}"));
        assert!(def.template.contains("{{documentation}}"));
        assert!(def.template.contains("{{question}}"));
    }

    #[test]
    fn test_load_prompt_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let def = load_prompt(temp.path()).unwrap();
        assert_eq!(def.id, DEFAULT_PROMPT_ID);
    }

    #[test]
    fn test_load_prompt_override() {
        let temp = TempDir::new().unwrap();
        let prompts_dir = temp.path().join(".cdp-support/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("support.yml"),
            "id: support.custom\ntemplate: \"Q: {{question}}\"\n",
        )
        .unwrap();

        let def = load_prompt(temp.path()).unwrap();
        assert_eq!(def.id, "support.custom");
        assert_eq!(def.template, "Q: {{question}}");
    }

    #[test]
    fn test_load_prompt_rejects_template_without_question() {
        let temp = TempDir::new().unwrap();
        let prompts_dir = temp.path().join(".cdp-support/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("support.yml"),
            "id: support.custom\ntemplate: \"no variables here\"\n",
        )
        .unwrap();

        assert!(load_prompt(temp.path()).is_err());
    }
}
