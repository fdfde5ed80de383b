//! CLI command implementations.

pub mod chapter;
pub mod context;
pub mod doctor;
pub mod init;
pub mod outline;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use storyloom_config::AppConfig;
use storyloom_context::ContextBuilder;
use storyloom_providers::DeepSeekClient;
use storyloom_writer::ChapterWriter;

/// Build a writer from loaded config. Fails fast when no API key is set.
pub(crate) fn build_writer(
    config: &AppConfig,
) -> Result<ChapterWriter, Box<dyn std::error::Error>> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Err(
            "No API key configured. Set STORYLOOM_API_KEY or DEEPSEEK_API_KEY, \
             or add api_key to config.toml"
                .into(),
        );
    };

    let client = DeepSeekClient::with_base_url(api_key, &config.api_base_url).with_retry(
        config.retry.max_retries,
        Duration::from_millis(config.retry.retry_delay_ms),
    );

    let builder = ContextBuilder::new(config.context.token_budget, config.context.core_ratio);

    Ok(
        ChapterWriter::new(Arc::new(client), builder, &config.default_model).with_sampling(
            config.default_temperature,
            Some(config.default_max_tokens),
        ),
    )
}
