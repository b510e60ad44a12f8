//! Environment overrides applied on top of file config.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_USER_ID: &str = "ARCADE_USER_ID";
pub(super) const ENV_MODEL: &str = "OPENAI_MODEL";
const ENV_ARCADE_API_KEY: &str = "ARCADE_API_KEY";
const ENV_ARCADE_BASE_URL: &str = "ARCADE_BASE_URL";
const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_API_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_API_TIMEOUT_SECS: &str = "TOOLGATE_API_TIMEOUT_SECS";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(user_id) = non_empty(env_lookup, ENV_USER_ID) {
        config.arcade.user_id = user_id;
    }
    if let Some(model) = non_empty(env_lookup, ENV_MODEL) {
        config.agent.model = model;
    }
    if let Some(key) = non_empty(env_lookup, ENV_ARCADE_API_KEY) {
        config.arcade.api_key = key;
    }
    if let Some(url) = non_empty(env_lookup, ENV_ARCADE_BASE_URL) {
        config.arcade.base_url = url;
    }
    if let Some(key) = non_empty(env_lookup, ENV_API_KEY) {
        config.api.api_key = key;
    }
    if let Some(url) = non_empty(env_lookup, ENV_API_BASE_URL) {
        config.api.base_url = url;
    }
    if let Some(timeout) = non_empty(env_lookup, ENV_API_TIMEOUT_SECS) {
        // Clamp to at least 1 second to avoid an accidental "no timeout".
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_API_TIMEOUT_SECS} value `{timeout}`: expected whole seconds"
            ))
        })?;
        config.api.timeout_secs = parsed.max(1);
    }
    Ok(())
}

/// Blank values count as unset.
fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
