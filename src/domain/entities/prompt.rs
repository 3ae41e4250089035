use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Grounding policy handed to the completion provider.
///
/// `system` and `glossary` form the preamble; `user` is rendered per request
/// and must contain both `{context}` and `{question}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub version: String,
    pub system: String,
    pub glossary: String,
    pub user: String,
    pub empty_context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

impl PromptTemplate {
    pub fn validate(&self) -> Result<(), DomainError> {
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !self.user.contains(slot) {
                return Err(DomainError::validation(format!(
                    "prompt template {} is missing the {slot} placeholder",
                    self.version
                )));
            }
        }
        if self.system.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "prompt template {} has an empty system section",
                self.version
            )));
        }
        Ok(())
    }

    pub fn preamble(&self) -> String {
        let system = self.system.trim_end();
        let glossary = self.glossary.trim();
        if glossary.is_empty() {
            system.to_string()
        } else {
            format!("{system}\n\n{glossary}")
        }
    }

    /// Joins contexts in the order given, one blank line between sections.
    pub fn context_block(&self, contexts: &[String]) -> String {
        if contexts.is_empty() {
            self.empty_context.clone()
        } else {
            contexts.join(CONTEXT_SEPARATOR)
        }
    }

    pub fn render(&self, question: &str, contexts: &[String]) -> RenderedPrompt {
        let block = self.context_block(contexts);
        RenderedPrompt {
            system: self.preamble(),
            user: fill(&self.user, &block, question),
        }
    }
}

// Single pass so placeholder-looking text inside evidence is left alone.
fn fill(template: &str, context: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    loop {
        let next = [(CONTEXT_SLOT, context), (QUESTION_SLOT, question)]
            .into_iter()
            .filter_map(|(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, slot, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + slot.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
