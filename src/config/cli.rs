use crate::config::toml_config::TomlConfig;
use crate::core::engine::FailurePolicy;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "safari-gold")]
#[command(about = "Turns shared page URLs into Safari Gold note templates")]
pub struct CliConfig {
    /// URLs to combine into a single note. Reads one URL per line from stdin when omitted.
    pub urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Launch targets to try in order (devonthink, devonthink-clip, ia-writer, or a URL template)
    #[arg(long = "target", value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Print notes to stdout instead of opening an app
    #[arg(long)]
    pub print: bool,

    /// Only resolve titles; nothing is rendered or launched
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first URL that fails
    #[arg(long)]
    pub fail_fast: bool,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入設定檔 (沒有指定就用預設值)，再套用命令列覆蓋
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(user_agent) = &self.user_agent {
            config.resolver_mut().user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.timeout {
            config.resolver_mut().timeout_seconds = Some(timeout);
        }
        if !self.targets.is_empty() {
            config.launch_mut().targets = Some(self.targets.clone());
        }
        if self.fail_fast {
            config.batch_mut().on_failure = Some(FailurePolicy::Abort);
        }
    }

    pub fn is_share_mode(&self) -> bool {
        !self.urls.is_empty()
    }
}
