//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`ARCADE_USER_ID`, `OPENAI_MODEL`, ...)
//! 3. TOML file given via `--config`
//! 4. `./toolgate.toml` in the current directory
//! 5. `$XDG_CONFIG_HOME/toolgate/toolgate.toml` (or `~/.config/...`)
//! 6. Built-in defaults
//!
//! The user identity and model id have no defaults; [`validate_required`]
//! rejects a config missing either before any turn starts.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

mod defaults;
mod env;
mod types;

pub use defaults::DEFAULT_SYSTEM_PROMPT;
pub use types::{AgentConfig, ApiConfig, ArcadeConfig, Config, DisplayConfig, ToolsConfig};

use env::{apply_env_overrides, ENV_MODEL, ENV_USER_ID};

/// Where the effective config file text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local,
    Global(PathBuf),
    BuiltInDefaults,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&str>) -> Result<(Config, ConfigSource), ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<(Config, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    Ok((config, source))
}

fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist; the implicit ones are optional.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }
    if let Ok(text) = read_file(Path::new("toolgate.toml")) {
        return Ok((text, ConfigSource::Local));
    }
    if let Some(dir) = config_root() {
        let global = dir.join("toolgate").join("toolgate.toml");
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }
    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

/// Reject configs that lack the caller identity or the model id.
pub fn validate_required(config: &Config) -> Result<(), ConfigError> {
    if config.arcade.user_id.trim().is_empty() {
        return Err(ConfigError::Missing {
            env: ENV_USER_ID,
            what: "user id",
        });
    }
    if config.agent.model.trim().is_empty() {
        return Err(ConfigError::Missing {
            env: ENV_MODEL,
            what: "model id",
        });
    }
    if config.tools.limit == 0 {
        return Err(ConfigError::Invalid(
            "tools.limit must be at least 1".to_string(),
        ));
    }
    if config.agent.max_rounds == Some(0) {
        return Err(ConfigError::Invalid(
            "agent.max_rounds must be at least 1 when set".to_string(),
        ));
    }
    Ok(())
}

/// Global config directory root (`$XDG_CONFIG_HOME` or `~/.config`).
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    fn no_file(_: &Path) -> Result<String, io::Error> {
        Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_no_file_exists() {
        let (config, source) =
            load_config_from_sources(None, no_file, env_from(&[]), || None).unwrap();
        assert_eq!(source, ConfigSource::BuiltInDefaults);
        assert_eq!(config.tools.toolkits, vec!["GoogleShopping".to_string()]);
        assert!(config.tools.tools.is_empty());
        assert_eq!(config.tools.limit, 100);
        assert_eq!(config.agent.session_id, "1");
        assert!(config.agent.max_rounds.is_none());
        assert!(config.display.color);
    }

    #[test]
    fn env_supplies_required_values() {
        let (config, _) = load_config_from_sources(
            None,
            no_file,
            env_from(&[("ARCADE_USER_ID", "me@example.com"), ("OPENAI_MODEL", "gpt-4o")]),
            || None,
        )
        .unwrap();
        assert_eq!(config.arcade.user_id, "me@example.com");
        assert_eq!(config.agent.model, "gpt-4o");
        validate_required(&config).unwrap();
    }

    #[test]
    fn missing_user_id_fails_validation() {
        let (config, _) = load_config_from_sources(
            None,
            no_file,
            env_from(&[("OPENAI_MODEL", "gpt-4o")]),
            || None,
        )
        .unwrap();
        let err = validate_required(&config).unwrap_err();
        assert!(err.to_string().contains("ARCADE_USER_ID"), "got: {err}");
    }

    #[test]
    fn missing_model_fails_validation() {
        let (config, _) = load_config_from_sources(
            None,
            no_file,
            env_from(&[("ARCADE_USER_ID", "me")]),
            || None,
        )
        .unwrap();
        let err = validate_required(&config).unwrap_err();
        assert!(err.to_string().contains("OPENAI_MODEL"), "got: {err}");
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let file = r#"
            [agent]
            model = "from-file"
            max_rounds = 5

            [tools]
            toolkits = ["Gmail", "Slack"]
            require_approval = ["Gmail_SendEmail"]
            limit = 20

            [arcade]
            user_id = "file-user"
        "#;
        let read = |path: &Path| {
            if path == Path::new("toolgate.toml") {
                Ok(file.to_string())
            } else {
                no_file(path)
            }
        };
        let (config, source) = load_config_from_sources(
            None,
            read,
            env_from(&[("OPENAI_MODEL", "from-env")]),
            || None,
        )
        .unwrap();
        assert_eq!(source, ConfigSource::Local);
        assert_eq!(config.agent.model, "from-env");
        assert_eq!(config.agent.max_rounds, Some(5));
        assert_eq!(config.arcade.user_id, "file-user");
        assert_eq!(config.tools.toolkits, vec!["Gmail", "Slack"]);
        assert_eq!(config.tools.require_approval, vec!["Gmail_SendEmail"]);
        assert_eq!(config.tools.limit, 20);
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let root = PathBuf::from("/cfg");
        let expected = root.join("toolgate").join("toolgate.toml");
        let expected_clone = expected.clone();
        let read = move |path: &Path| {
            if path == expected_clone.as_path() {
                Ok("[display]\ncolor = false\n".to_string())
            } else {
                no_file(path)
            }
        };
        let (config, source) =
            load_config_from_sources(None, read, env_from(&[]), || Some(root.clone())).unwrap();
        assert_eq!(source, ConfigSource::Global(expected));
        assert!(!config.display.color);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from_sources(Some("/nope.toml"), no_file, env_from(&[]), || None)
            .unwrap_err();
        assert!(err.to_string().starts_with("io:"), "got: {err}");
    }

    #[test]
    fn zero_limit_and_zero_rounds_are_invalid() {
        let mut config = Config::default();
        config.arcade.user_id = "me".into();
        config.agent.model = "m".into();
        config.tools.limit = 0;
        assert!(validate_required(&config).is_err());
        config.tools.limit = 1;
        config.agent.max_rounds = Some(0);
        assert!(validate_required(&config).is_err());
    }
}
