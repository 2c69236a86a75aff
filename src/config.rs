use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::cli_args::Cli;
use crate::error::ReviewError;

/// Which review backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    OpenAi,
}

impl FromStr for Service {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Service::OpenAi),
            other => Err(ReviewError::Configuration(format!(
                "unsupported review service {other:?} (supported: openai)"
            ))),
        }
    }
}

/// Final resolved configuration for reviewbot.
#[derive(Debug, Clone)]
pub struct Config {
    pub service: Service,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub template_path: PathBuf,
    pub token_budget: usize,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--service`, ...)
    ///   2. Env vars `REVIEWBOT_MODEL`, `REVIEWBOT_SERVICE`, `REVIEWBOT_TEMPLATE`
    ///   3. TOML `~/.config/reviewbot.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Result<Self, ReviewError> {
        let file_cfg = load_file_config().unwrap_or_default();

        let service_str = cli
            .service
            .clone()
            .or(env::var("REVIEWBOT_SERVICE").ok())
            .or(file_cfg.service)
            .unwrap_or_else(|| "openai".to_string());
        let service = Service::from_str(&service_str)?;

        let model = cli
            .model
            .clone()
            .or(env::var("REVIEWBOT_MODEL").ok())
            .or(file_cfg.model)
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        let api_key = cli.api_key.clone().or(file_cfg.openai_api_key);

        let template_path = cli
            .template
            .clone()
            .or(env::var("REVIEWBOT_TEMPLATE").ok().map(PathBuf::from))
            .or(file_cfg.template.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("prompt.txt"));

        Ok(Config {
            service,
            model,
            api_key,
            api_base_url: file_cfg
                .api_base_url
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            template_path,
            token_budget: cli.token_budget.or(file_cfg.token_budget).unwrap_or(16_000),
            max_tokens: cli.max_tokens.or(file_cfg.max_tokens).unwrap_or(2_048),
            timeout_secs: cli.timeout.or(file_cfg.timeout_secs).unwrap_or(45),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    pub service: Option<String>,
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub template: Option<String>,
    pub token_budget: Option<usize>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Return `~/.config/reviewbot.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("reviewbot.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    toml::from_str::<FileConfig>(&data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_parses_known_selector() {
        assert_eq!(Service::from_str("openai").unwrap(), Service::OpenAi);
        assert_eq!(Service::from_str(" OpenAI ").unwrap(), Service::OpenAi);
    }

    #[test]
    fn service_rejects_unknown_selector() {
        let err = Service::from_str("anthropic").unwrap_err();
        assert!(matches!(err, ReviewError::Configuration(_)));
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn file_config_parses_partial_toml() {
        let cfg: FileConfig = toml::from_str(
            r#"
            model = "gpt-4o"
            token_budget = 9000
            "#,
        )
        .unwrap();

        assert_eq!(cfg.model.as_deref(), Some("gpt-4o"));
        assert_eq!(cfg.token_budget, Some(9000));
        assert!(cfg.openai_api_key.is_none());
    }
}
