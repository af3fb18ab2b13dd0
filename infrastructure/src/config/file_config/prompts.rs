//! Prompt overrides from TOML (`[prompts]` section)

use magi_domain::PersonaPrompts;
use serde::{Deserialize, Serialize};

/// Raw prompt overrides; absent or blank entries keep the built-in prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub melchior: Option<String>,
    pub balthasar: Option<String>,
    pub casper: Option<String>,
    pub yes_no: Option<String>,
}

impl FilePromptsConfig {
    pub fn to_prompts(&self) -> PersonaPrompts {
        PersonaPrompts::default().with_overrides(
            self.melchior.clone(),
            self.balthasar.clone(),
            self.casper.clone(),
            self.yes_no.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::PromptTemplate;

    #[test]
    fn test_partial_override() {
        let toml_str = r#"
casper = "You are CASPER-3. Answer with your heart."
"#;
        let config: FilePromptsConfig = toml::from_str(toml_str).unwrap();
        let prompts = config.to_prompts();
        assert_eq!(prompts.casper, "You are CASPER-3. Answer with your heart.");
        assert_eq!(prompts.melchior, PromptTemplate::melchior_system());
    }
}
