//! Runtime settings loaded via OrthoConfig.
//!
//! Every value can come from `REGISTRO_*` environment variables or a
//! configuration file; anything missing falls back to the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::UPDATE_CHECK_INTERVAL;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const APP_DIR: &str = "registro-fse";

/// Settings for the Registro FSE client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRO")]
pub struct RegistroSettings {
    /// Base URL of the REST API.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 15)]
    pub request_timeout_secs: u64,
    /// Release manifest URL; automatic updates are off when unset.
    pub update_feed_url: Option<String>,
    /// Seconds between update checks.
    #[ortho_config(default = 600)]
    pub update_check_interval_secs: u64,
    /// Folder holding `FSEIMAGES`; the desktop when unset.
    pub images_root: Option<PathBuf>,
    /// Where the session token is kept.
    pub token_file: Option<PathBuf>,
    /// Where installers are downloaded to.
    pub staging_dir: Option<PathBuf>,
}

impl RegistroSettings {
    /// Configured API base URL, falling back to the local development API.
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Configured request timeout. Zero falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Release manifest URL, when updates are enabled.
    pub fn update_feed_url(&self) -> Option<&str> {
        self.update_feed_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Interval between update checks. Zero falls back to the default.
    pub fn update_check_interval(&self) -> Duration {
        match self.update_check_interval_secs {
            0 => UPDATE_CHECK_INTERVAL,
            secs => Duration::from_secs(secs),
        }
    }

    /// Folder that receives `FSEIMAGES`.
    pub fn images_root(&self) -> PathBuf {
        self.images_root
            .clone()
            .or_else(dirs::desktop_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Token file path.
    pub fn token_file(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("token")
        })
    }

    /// Installer staging folder.
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR).join("updates"))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 7] = [
        "REGISTRO_API_URL",
        "REGISTRO_REQUEST_TIMEOUT_SECS",
        "REGISTRO_UPDATE_FEED_URL",
        "REGISTRO_UPDATE_CHECK_INTERVAL_SECS",
        "REGISTRO_IMAGES_ROOT",
        "REGISTRO_TOKEN_FILE",
        "REGISTRO_STAGING_DIR",
    ];

    fn load_from_empty_args() -> RegistroSettings {
        RegistroSettings::load_from_iter([OsString::from("registro")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.api_url(), DEFAULT_API_URL);
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.update_feed_url(), None);
        assert_eq!(settings.update_check_interval(), Duration::from_secs(600));
        assert!(settings.token_file().ends_with("registro-fse/token"));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("REGISTRO_API_URL", Some("https://fse.example/api/v1".to_owned())),
            ("REGISTRO_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            (
                "REGISTRO_UPDATE_FEED_URL",
                Some("https://fse.example/latest.json".to_owned()),
            ),
            ("REGISTRO_UPDATE_CHECK_INTERVAL_SECS", Some("30".to_owned())),
            ("REGISTRO_IMAGES_ROOT", Some("/srv/fse".to_owned())),
            ("REGISTRO_TOKEN_FILE", Some("/tmp/fse-token".to_owned())),
            ("REGISTRO_STAGING_DIR", Some("/tmp/fse-updates".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_url(), "https://fse.example/api/v1");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            settings.update_feed_url(),
            Some("https://fse.example/latest.json")
        );
        assert_eq!(settings.update_check_interval(), Duration::from_secs(30));
        assert_eq!(settings.images_root(), PathBuf::from("/srv/fse"));
        assert_eq!(settings.token_file(), PathBuf::from("/tmp/fse-token"));
        assert_eq!(settings.staging_dir(), PathBuf::from("/tmp/fse-updates"));
    }

    #[rstest]
    #[case(Some("0"))]
    #[case(None)]
    fn interval_falls_back_to_ten_minutes(#[case] raw: Option<&str>) {
        let _guard = lock_env([(
            "REGISTRO_UPDATE_CHECK_INTERVAL_SECS",
            raw.map(str::to_owned),
        )]);

        assert_eq!(
            load_from_empty_args().update_check_interval(),
            UPDATE_CHECK_INTERVAL
        );
    }

    #[rstest]
    fn zero_timeout_falls_back_to_default() {
        let _guard = lock_env([("REGISTRO_REQUEST_TIMEOUT_SECS", Some("0".to_owned()))]);

        assert_eq!(
            load_from_empty_args().request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[rstest]
    fn blank_feed_url_disables_updates() {
        let _guard = lock_env([("REGISTRO_UPDATE_FEED_URL", Some("  ".to_owned()))]);

        assert_eq!(load_from_empty_args().update_feed_url(), None);
    }
}
