//! Prompt construction for generative fallbacks

/// Minimal `{{var}}` substitution template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Fill in the template with (name, value) pairs.
    #[must_use]
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut result = self.template.clone();
        for (name, value) in values {
            result = result.replace(&format!("{{{{{name}}}}}"), value);
        }
        result
    }
}

/// Fallback generation when retrieval returned nothing: the model may answer,
/// but only with knowledge-base material.
#[must_use]
pub fn grounded(question: &str) -> String {
    PromptTemplate::new("{{question}} Please include only information from the knowledge base.")
        .render(&[("question", question)])
}

/// Fallback generation when retrieval itself failed: ask for sources so the
/// answer stays attributable.
#[must_use]
pub fn sourced(question: &str) -> String {
    PromptTemplate::new(
        "{{question}} Please include only information from the knowledge base with sources.",
    )
    .render(&[("question", question)])
}
