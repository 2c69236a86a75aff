use log::debug;

use crate::config::{Config, Service};
use crate::error::ReviewError;
use crate::llm::ReviewClient;
use crate::llm::openai::OpenAiClient;

/// Build the review client based on the resolved config.
///
/// Runs before any repository inspection so that a bad service selector or
/// a missing credential fails the invocation up front.
pub fn build_review_client(cfg: &Config) -> Result<Box<dyn ReviewClient>, ReviewError> {
    match cfg.service {
        Service::OpenAi => {
            let key = cfg.api_key.clone().ok_or_else(|| {
                ReviewError::Configuration(
                    "OPENAI_API_KEY (or --api-key, or openai_api_key in the config file) is required"
                        .to_string(),
                )
            })?;

            debug!("Using OpenAiClient with model: {}", cfg.model);

            Ok(Box::new(OpenAiClient::new(
                key,
                cfg.model.clone(),
                cfg.api_base_url.clone(),
                cfg.timeout_secs,
            )))
        }
    }
}
