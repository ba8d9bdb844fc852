//! Prompt types for the CDP support chatbot.

use serde::{Deserialize, Serialize};

/// A prompt definition, loaded from YAML or built in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Template string with Handlebars syntax. Available variables:
    /// `platforms`, `documentation`, `question`.
    pub template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: support.answer
title: Support Answer
template: "{{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "support.answer");
        assert_eq!(def.title, "Support Answer");
        assert_eq!(def.template, "{{question}}");
    }
}
