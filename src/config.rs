use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::StaticCredentials;
use crate::error::{PredictorError, Result};
use crate::utils::io::ArtifactPaths;

pub const ENV_USERNAME: &str = "SLEEP_PREDICTOR_USERNAME";
pub const ENV_PASSWORD: &str = "SLEEP_PREDICTOR_PASSWORD";
pub const ENV_REPORT_DIR: &str = "SLEEP_PREDICTOR_REPORT_DIR";

/// Resolved settings: defaults < config file < environment < command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub artifacts: ArtifactPaths,
    pub username: String,
    pub password: String,
    pub report_dir: PathBuf,
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<PathBuf>,
    pub encoders: Option<PathBuf>,
    pub features: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    artifacts: Option<FileArtifacts>,
    auth: Option<FileAuth>,
    report: Option<FileReport>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileArtifacts {
    model: Option<PathBuf>,
    encoders: Option<PathBuf>,
    features: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileAuth {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileReport {
    dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            artifacts: ArtifactPaths::default(),
            username: "admin".to_string(),
            password: "1234".to_string(),
            report_dir: std::env::temp_dir(),
        }
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = AppConfig::default();
        if let Some(path) = config_path {
            let raw = std::fs::read_to_string(path)?;
            config.apply_toml(&raw).map_err(|e| {
                PredictorError::Config(format!("{}: {}", path.display(), e))
            })?;
        }
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials::new(self.username.clone(), self.password.clone())
    }

    fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: FileConfig =
            toml::from_str(raw).map_err(|e| PredictorError::Config(e.to_string()))?;

        if let Some(artifacts) = file.artifacts {
            set_path(&mut self.artifacts.model, artifacts.model);
            set_path(&mut self.artifacts.encoders, artifacts.encoders);
            set_path(&mut self.artifacts.features, artifacts.features);
        }
        if let Some(auth) = file.auth {
            set_string(&mut self.username, auth.username);
            set_string(&mut self.password, auth.password);
        }
        if let Some(report) = file.report {
            set_path(&mut self.report_dir, report.dir);
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        set_string(&mut self.username, lookup(ENV_USERNAME));
        set_string(&mut self.password, lookup(ENV_PASSWORD));
        set_path(&mut self.report_dir, lookup(ENV_REPORT_DIR).map(PathBuf::from));
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        set_path(&mut self.artifacts.model, overrides.model.clone());
        set_path(&mut self.artifacts.encoders, overrides.encoders.clone());
        set_path(&mut self.artifacts.features, overrides.features.clone());
        set_path(&mut self.report_dir, overrides.report_dir.clone());
    }

    fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(PredictorError::Config("username must not be empty".into()));
        }
        Ok(())
    }
}

fn set_string(slot: &mut String, value: Option<String>) {
    if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        *slot = v;
    }
}

fn set_path(slot: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(v) = value.filter(|v| !v.as_os_str().is_empty()) {
        *slot = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_credentials() {
        let config = AppConfig::default();
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "1234");
        assert_eq!(config.artifacts.model, PathBuf::from("ensemble_model.bin"));
    }

    #[test]
    fn layers_apply_in_order() {
        let mut config = AppConfig::default();
        config
            .apply_toml(
                r#"
                [artifacts]
                model = "models/rf.json"
                features = ""

                [auth]
                username = "doctor"
                password = "secret"

                [report]
                dir = "reports"
                "#,
            )
            .unwrap();
        assert_eq!(config.artifacts.model, PathBuf::from("models/rf.json"));
        assert_eq!(config.artifacts.features, PathBuf::from("features.bin"));
        assert_eq!(config.username, "doctor");

        config.apply_env(|key| match key {
            ENV_PASSWORD => Some("from-env".into()),
            ENV_USERNAME => Some("   ".into()),
            _ => None,
        });
        assert_eq!(config.username, "doctor");
        assert_eq!(config.password, "from-env");

        config.apply_overrides(&Overrides {
            report_dir: Some(PathBuf::from("/tmp/out")),
            ..Overrides::default()
        });
        assert_eq!(config.report_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.artifacts.model, PathBuf::from("models/rf.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_toml("[auth]\nuser = \"x\"\n").is_err());
    }

    #[test]
    fn config_file_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, "[report\n").unwrap();
        let err = AppConfig::load(Some(&path), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("app.toml"));
    }
}
