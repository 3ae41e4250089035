use std::path::Path;

use crate::domain::PromptTemplate;
use crate::infrastructure::config::ConfigError;

const BUILTIN_PROMPTS: &str = include_str!("../../config/prompts.yaml");

/// Loads the grounding prompt, from `path` when given, else the built-in copy.
pub fn load_prompts(path: Option<&Path>) -> Result<PromptTemplate, ConfigError> {
    let source = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Prompts(format!("{}: {e}", path.display())))?,
        None => BUILTIN_PROMPTS.to_string(),
    };

    let template = parse_prompts(&source)?;
    tracing::info!(version = %template.version, custom = path.is_some(), "prompt template loaded");
    Ok(template)
}

pub fn parse_prompts(source: &str) -> Result<PromptTemplate, ConfigError> {
    let template: PromptTemplate =
        serde_yaml::from_str(source).map_err(|e| ConfigError::Prompts(e.to_string()))?;
    template
        .validate()
        .map_err(|e| ConfigError::Prompts(e.to_string()))?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_prompts_are_valid() {
        let template = load_prompts(None).unwrap();

        assert_eq!(template.version, "regs-grounding-v1");
        assert!(template.system.contains("자료 내에서 확인 불가"));
        assert!(template.system.contains("[시트명(행번호)]"));
        assert!(template.preamble().contains("소융과"));
    }

    #[test]
    fn test_builtin_render_places_context_and_question() {
        let template = load_prompts(None).unwrap();
        let rendered = template.render("소융과 졸업 요건은?", &["졸업 요건: 140학점".into()]);

        let context_at = rendered.user.find("졸업 요건: 140학점").unwrap();
        let question_at = rendered.user.find("소융과 졸업 요건은?").unwrap();
        assert!(context_at < question_at);
    }

    #[test]
    fn test_template_without_placeholders_rejected() {
        let source = "version: bad\nsystem: s\nglossary: g\nuser: no slots\nempty_context: none\n";
        assert!(matches!(parse_prompts(source), Err(ConfigError::Prompts(_))));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = load_prompts(Some(Path::new("/nonexistent/prompts.yaml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/prompts.yaml"));
    }
}
