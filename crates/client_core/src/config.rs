use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::progress::ProgressConfig;

pub const CONFIG_FILE_NAME: &str = "dashboard.toml";
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";
const CONFIG_DIR_NAME: &str = "store-insights";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub progress: ProgressConfig,
    /// Placeholder cards shown while a competitor search is pending.
    pub competitor_slots: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse("http://localhost:8000/").expect("static default url"),
            request_timeout: Duration::from_secs(120),
            progress: ProgressConfig::default(),
            competitor_slots: 3,
        }
    }
}

impl Settings {
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, SettingsError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid api base url '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    progress_step: Option<u8>,
    progress_period_ms: Option<u64>,
    progress_ceiling: Option<u8>,
    completion_hold_ms: Option<u64>,
    competitor_slots: Option<usize>,
}

/// Resolves settings from defaults, the settings file and `APP__*` variables.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let path = settings_path(|name| std::env::var(name).ok());
    load_settings_from(path.as_deref(), |name| std::env::var(name).ok())
}

pub fn settings_path(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(explicit) = env(CONFIG_PATH_ENV).filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(explicit));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

pub fn load_settings_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let file_cfg = match path {
        Some(path) => read_file_settings(path)?,
        None => FileSettings::default(),
    };

    let mut settings = Settings::default();

    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = parse_base_url(&v)?;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(v);
    }
    if let Some(v) = file_cfg.progress_step {
        settings.progress.step = v;
    }
    if let Some(v) = file_cfg.progress_period_ms {
        settings.progress.period = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.progress_ceiling {
        settings.progress.ceiling = v;
    }
    if let Some(v) = file_cfg.completion_hold_ms {
        settings.progress.completion_hold = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.competitor_slots {
        settings.competitor_slots = v;
    }

    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = parse_base_url(&v)?;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = Duration::from_secs(parse_env("APP__REQUEST_TIMEOUT_SECS", &v)?);
    }
    if let Some(v) = env("APP__PROGRESS_STEP") {
        settings.progress.step = parse_env("APP__PROGRESS_STEP", &v)?;
    }
    if let Some(v) = env("APP__PROGRESS_PERIOD_MS") {
        settings.progress.period = Duration::from_millis(parse_env("APP__PROGRESS_PERIOD_MS", &v)?);
    }
    if let Some(v) = env("APP__PROGRESS_CEILING") {
        settings.progress.ceiling = parse_env("APP__PROGRESS_CEILING", &v)?;
    }
    if let Some(v) = env("APP__COMPLETION_HOLD_MS") {
        settings.progress.completion_hold =
            Duration::from_millis(parse_env("APP__COMPLETION_HOLD_MS", &v)?);
    }
    if let Some(v) = env("APP__COMPETITOR_SLOTS") {
        settings.competitor_slots = parse_env("APP__COMPETITOR_SLOTS", &v)?;
    }

    validate(&settings)?;
    Ok(settings)
}

fn read_file_settings(path: &Path) -> Result<FileSettings, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(FileSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_env<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, SettingsError> {
    raw.trim().parse().map_err(|_| SettingsError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

/// Parses the service base url and normalizes it to end with `/` so endpoint
/// paths join underneath it instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, SettingsError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|err| SettingsError::InvalidUrl {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::InvalidUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn validate(settings: &Settings) -> Result<(), SettingsError> {
    let progress = &settings.progress;
    if progress.step == 0 {
        return Err(SettingsError::InvalidValue {
            name: "progress_step",
            value: progress.step.to_string(),
        });
    }
    if progress.ceiling == 0 || progress.ceiling >= 100 {
        return Err(SettingsError::InvalidValue {
            name: "progress_ceiling",
            value: progress.ceiling.to_string(),
        });
    }
    if progress.period.is_zero() {
        return Err(SettingsError::InvalidValue {
            name: "progress_period_ms",
            value: "0".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_dashboard_behavior() {
        let settings = load_settings_from(None, env_from(&[])).expect("defaults");
        assert_eq!(settings.api_base_url.as_str(), "http://localhost:8000/");
        assert_eq!(settings.progress.step, 10);
        assert_eq!(settings.progress.ceiling, 90);
        assert_eq!(settings.progress.period, Duration::from_millis(500));
        assert_eq!(settings.competitor_slots, 3);
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "api_base_url = \"http://insights.internal:9000/api\"\nprogress_step = 5\ncompetitor_slots = 4"
        )
        .expect("write");

        let settings = load_settings_from(
            Some(file.path()),
            env_from(&[("APP__PROGRESS_STEP", "20")]),
        )
        .expect("settings");

        assert_eq!(
            settings.api_base_url.as_str(),
            "http://insights.internal:9000/api/"
        );
        assert_eq!(settings.progress.step, 20);
        assert_eq!(settings.competitor_slots, 4);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = load_settings_from(Some(&dir.path().join("absent.toml")), env_from(&[]))
            .expect("settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "bind_addr = \"0.0.0.0:1\"").expect("write");
        let err = load_settings_from(Some(file.path()), env_from(&[])).expect_err("must fail");
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = parse_base_url("ftp://example.com").expect_err("must fail");
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn rejects_ceiling_that_reaches_completion() {
        let err = load_settings_from(None, env_from(&[("APP__PROGRESS_CEILING", "100")]))
            .expect_err("must fail");
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                name: "progress_ceiling",
                ..
            }
        ));
    }

    #[test]
    fn explicit_config_path_wins() {
        let path = settings_path(env_from(&[(CONFIG_PATH_ENV, "/etc/insights/dashboard.toml")]));
        assert_eq!(path, Some(PathBuf::from("/etc/insights/dashboard.toml")));
    }
}
