use crate::core::engine::FailurePolicy;
use crate::core::launch::{default_launch_command, default_targets, LaunchTarget, DEFAULT_TAGS};
use crate::core::resolver::{DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use crate::core::template::{default_sections, DEFAULT_HEADING};
use crate::core::title::default_separators;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SafariError};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_positive_number,
    validate_separators, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub resolver: Option<ResolverConfig>,
    pub template: Option<TemplateConfig>,
    pub launch: Option<LaunchConfig>,
    pub batch: Option<BatchConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub separators: Option<Vec<String>>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub heading: Option<String>,
    pub sections: Option<Vec<String>>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub targets: Option<Vec<String>>,
    pub command: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub on_failure: Option<FailurePolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SafariError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SafariError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SAFARI_GOLD_TAGS})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| SafariError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_separators("resolver.separators", &self.separators())?;
        validate_non_empty_string("resolver.user_agent", &self.user_agent())?;
        validate_positive_number("resolver.timeout_seconds", self.timeout_seconds(), 1)?;

        validate_non_empty_string("template.heading", &self.heading())?;
        let sections = self.sections();
        validate_non_empty_list("template.sections", &sections)?;
        for (index, section) in sections.iter().enumerate() {
            validate_non_empty_string(&format!("template.sections[{}]", index), section)?;
        }

        validate_non_empty_string("launch.command", &self.launch_command())?;
        let targets = self.launch_targets()?;
        validate_non_empty_list("launch.targets", &targets)?;

        Ok(())
    }

    /// 把設定中的名稱解析成 LaunchTarget
    pub fn launch_targets(&self) -> Result<Vec<LaunchTarget>> {
        self.launch_target_names()
            .iter()
            .map(|t| t.parse())
            .collect()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.batch
            .as_ref()
            .and_then(|b| b.on_failure)
            .unwrap_or_default()
    }

    pub fn resolver_mut(&mut self) -> &mut ResolverConfig {
        self.resolver.get_or_insert_with(Default::default)
    }

    pub fn launch_mut(&mut self) -> &mut LaunchConfig {
        self.launch.get_or_insert_with(Default::default)
    }

    pub fn batch_mut(&mut self) -> &mut BatchConfig {
        self.batch.get_or_insert_with(Default::default)
    }
}

impl ConfigProvider for TomlConfig {
    fn separators(&self) -> Vec<String> {
        self.resolver
            .as_ref()
            .and_then(|r| r.separators.clone())
            .unwrap_or_else(default_separators)
    }

    fn user_agent(&self) -> String {
        self.resolver
            .as_ref()
            .and_then(|r| r.user_agent.clone())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    fn timeout_seconds(&self) -> u64 {
        self.resolver
            .as_ref()
            .and_then(|r| r.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn heading(&self) -> String {
        self.template
            .as_ref()
            .and_then(|t| t.heading.clone())
            .unwrap_or_else(|| DEFAULT_HEADING.to_string())
    }

    fn sections(&self) -> Vec<String> {
        self.template
            .as_ref()
            .and_then(|t| t.sections.clone())
            .unwrap_or_else(default_sections)
    }

    fn placeholder(&self) -> String {
        self.template
            .as_ref()
            .and_then(|t| t.placeholder.clone())
            .unwrap_or_default()
    }

    fn launch_target_names(&self) -> Vec<String> {
        self.launch
            .as_ref()
            .and_then(|l| l.targets.clone())
            .unwrap_or_else(default_targets)
    }

    fn launch_command(&self) -> String {
        self.launch
            .as_ref()
            .and_then(|l| l.command.clone())
            .unwrap_or_else(default_launch_command)
    }

    fn tags(&self) -> String {
        self.launch
            .as_ref()
            .and_then(|l| l.tags.clone())
            .unwrap_or_else(|| DEFAULT_TAGS.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_any_sections() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.separators(), vec![" |", " : ", " - "]);
        assert_eq!(config.timeout_seconds(), 20);
        assert!(config.user_agent().starts_with("safari-gold/"));
        assert_eq!(config.heading(), "Safari Gold: (Summary)");
        assert_eq!(config.sections().len(), 6);
        assert_eq!(config.placeholder(), "");
        assert_eq!(
            config.launch_targets().unwrap(),
            vec![LaunchTarget::DevonthinkMarkdown, LaunchTarget::IaWriter]
        );
        assert_eq!(config.tags(), "Safari Gold");
        assert_eq!(config.failure_policy(), FailurePolicy::Skip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[resolver]
separators = [" | ", " ~ "]
user_agent = "notes-bot/2.0"
timeout_seconds = 5

[template]
heading = "Reading Notes"
sections = ["Summary", "Quotes"]
placeholder = "(unknown)"

[launch]
targets = ["ia-writer", "obsidian://new?content={text}"]
command = "open"
tags = "Research"

[batch]
on_failure = "abort"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.separators(), vec![" | ", " ~ "]);
        assert_eq!(config.user_agent(), "notes-bot/2.0");
        assert_eq!(config.timeout_seconds(), 5);
        assert_eq!(config.sections(), vec!["Summary", "Quotes"]);
        assert_eq!(config.placeholder(), "(unknown)");
        assert_eq!(config.launch_command(), "open");
        assert_eq!(config.tags(), "Research");
        assert_eq!(config.failure_policy(), FailurePolicy::Abort);

        let targets = config.launch_targets().unwrap();
        assert_eq!(targets[0], LaunchTarget::IaWriter);
        assert!(matches!(targets[1], LaunchTarget::Custom(_)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SAFARI_GOLD_TEST_TAGS", "Forum Research");

        let toml_content = r#"
[launch]
tags = "${SAFARI_GOLD_TEST_TAGS}"
command = "${SAFARI_GOLD_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.tags(), "Forum Research");
        assert_eq!(config.launch_command(), "${SAFARI_GOLD_TEST_UNSET_VARIABLE}");

        std::env::remove_var("SAFARI_GOLD_TEST_TAGS");
    }

    #[test]
    fn test_config_validation() {
        let empty_separator = TomlConfig::from_toml_str("[resolver]\nseparators = [\" |\", \"\"]\n")
            .unwrap();
        assert!(empty_separator.validate().is_err());

        let zero_timeout = TomlConfig::from_toml_str("[resolver]\ntimeout_seconds = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());

        let no_sections = TomlConfig::from_toml_str("[template]\nsections = []\n").unwrap();
        assert!(no_sections.validate().is_err());

        let bad_target = TomlConfig::from_toml_str("[launch]\ntargets = [\"notes-app\"]\n").unwrap();
        assert!(bad_target.validate().is_err());

        assert!(TomlConfig::from_toml_str("[batch]\non_failure = \"retry\"\n").is_err());
    }

    #[test]
    fn test_target_names_are_parsed_in_config_layer() {
        let config =
            TomlConfig::from_toml_str("[launch]\ntargets = [\"devonthink\", \"notes-app\"]\n")
                .unwrap();

        // 介面只回傳原始名稱，解析錯誤由 TomlConfig::launch_targets 回報
        assert_eq!(config.launch_target_names(), vec!["devonthink", "notes-app"]);
        assert!(matches!(
            config.launch_targets(),
            Err(SafariError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[template]
heading = "File Test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.heading(), "File Test");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TomlConfig::from_file("/definitely/not/here/safari-gold.toml");
        assert!(matches!(result, Err(SafariError::IoError(_))));
    }
}
