//! Prompt builder for rendering the grounded support prompt.

use crate::types::PromptDefinition;
use cdp_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Marker rendered into the prompt when retrieval returned nothing.
pub const NO_DOCUMENTATION_FOUND: &str = "No specific documentation found for this query.";

/// Format retrieved documentation chunks into a labeled block.
///
/// One `**<platform>**:` paragraph per chunk, in ranked order. An empty
/// result set renders the literal no-documentation marker so the template
/// still carries an explicit context section.
pub fn format_documentation<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let paragraphs: Vec<String> = chunks
        .into_iter()
        .map(|(platform, content)| format!("**{}**:\n{}\n", platform, content))
        .collect();

    if paragraphs.is_empty() {
        NO_DOCUMENTATION_FOUND.to_string()
    } else {
        paragraphs.join("\n")
    }
}

/// Render the support prompt from a definition and request context.
///
/// # Arguments
/// * `definition` - Prompt definition (loaded override or built-in default)
/// * `platforms` - Comma-separated supported platform names
/// * `documentation` - Pre-formatted documentation block
/// * `question` - The user's question
pub fn build_support_prompt(
    definition: &PromptDefinition,
    platforms: &str,
    documentation: &str,
    question: &str,
) -> AppResult<String> {
    tracing::debug!("Building prompt: {}", definition.id);

    let mut variables = HashMap::new();
    variables.insert("platforms".to_string(), platforms.to_string());
    variables.insert("documentation".to_string(), documentation.to_string());
    variables.insert("question".to_string(), question.to_string());

    render_template(&definition.template, &variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::default_prompt;

    #[test]
    fn test_format_documentation_labels_platforms() {
        let block = format_documentation(vec![
            ("Lytics", "Building an audience segment in Lytics."),
            ("Segment", "Setting up a new source in Segment."),
        ]);

        assert!(block.starts_with("**Lytics**:\n"));
        assert!(block.contains("Building an audience segment in Lytics."));
        assert!(block.contains("**Segment**:\n"));
    }

    #[test]
    fn test_format_documentation_empty_renders_marker() {
        let block = format_documentation(Vec::<(&str, &str)>::new());
        assert_eq!(block, NO_DOCUMENTATION_FOUND);
    }

    #[test]
    fn test_build_support_prompt_embeds_context() {
        let definition = default_prompt();
        let documentation =
            format_documentation(vec![("Lytics", "Building an audience segment in Lytics.")]);

        let prompt = build_support_prompt(
            &definition,
            "Segment, mParticle, Lytics, Zeotap",
            &documentation,
            "How do I create a new audience segment in Lytics?",
        )
        .unwrap();

        assert!(prompt.contains("Lytics"));
        assert!(prompt.contains("Building an audience segment in Lytics."));
        assert!(prompt.contains("How do I create a new audience segment in Lytics?"));
        assert!(prompt.contains("Segment, mParticle, Lytics, Zeotap"));
    }

    #[test]
    fn test_bad_template_is_an_error() {
        let definition = PromptDefinition {
            id: "broken".to_string(),
            title: String::new(),
            template: "{{#if}}".to_string(),
        };

        let result = build_support_prompt(&definition, "", "", "");
        assert!(result.is_err());
    }
}
