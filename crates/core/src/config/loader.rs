use crate::config::types::{ConfigFile, LoggingConfig, Profile, ResolvedConfig};
use crate::generator::BUILTIN_LATENCY;
use crate::sections::{RegistryError, Section};
use shellexpand::full;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("invalid [prompts] entry: {0}")]
    UnknownPromptSection(#[source] RegistryError),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        let config_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let prompts = resolve_prompts(&cf.prompts)?;
        let resolved = Self::resolve_profile(&active, prof, &config_dir, prompts, &cf.logging)?;

        debug!(path = %path.display(), profile = %active, "loaded config");
        Ok(resolved)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        config_dir: &Path,
        prompts: HashMap<Section, String>,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let sub = |s: &str| s.replace("{{config_dir}}", &config_dir.to_string_lossy());

        let responses_dir = match &prof.responses_dir {
            Some(dir) => Some(expand_path(&sub(dir))?),
            None => None,
        };
        // Built-in texts default to the delay of a remote call.
        let latency_ms = prof.latency_ms.unwrap_or(match responses_dir {
            Some(_) => 0,
            None => BUILTIN_LATENCY.as_millis() as u64,
        });

        let logging = if let Some(ref file) = log_cfg.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expanded_file),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            responses_dir,
            fallback_anchor: prof.fallback_anchor,
            latency_ms,
            prompts,
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("reggen").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("reggen").join("config.toml")
}

fn resolve_prompts(
    raw: &HashMap<String, String>,
) -> Result<HashMap<Section, String>, ConfigError> {
    raw.iter()
        .map(|(key, prompt)| {
            let section = key.parse::<Section>().map_err(ConfigError::UnknownPromptSection)?;
            Ok((section, prompt.clone()))
        })
        .collect()
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
