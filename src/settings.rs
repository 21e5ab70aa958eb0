use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::oauth::AuthType;

/// Marker prefixing the registered URL scheme of a Facebook-enabled app
const SCHEME_MARKER: &str = "fb";

static FACEBOOK_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^fb\d+").expect("invalid scheme regex"));
static CLIENT_ID_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("invalid client id regex"));

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FbLoginSettings {
    pub application: ApplicationSettings,
    pub login: LoginSettings,
    pub logging: LoggingSettings,
}

/// Host-application configuration
///
/// `url_schemes` mirrors the scheme list a mobile app registers with the OS;
/// the Facebook login scheme (`fb<app id>`) is discovered from it rather than
/// configured separately.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplicationSettings {
    pub url_schemes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSettings {
    /// Facebook `auth_type` extension parameter
    pub auth_type: AuthType,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            auth_type: AuthType::None,
            scopes: vec!["email".to_string(), "public_profile".to_string()],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FbLoginSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        settings.initialize_logging();

        Ok(settings)
    }

    /// Initialize the logger from the resolved settings
    ///
    /// The configured `logging.level` is the default filter; `RUST_LOG`
    /// overrides it when set. Safe to call more than once.
    fn initialize_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.logging.level.as_str());
        let _ = env_logger::Builder::from_env(env).try_init();
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `FBLOGIN_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> Result<Self> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            log::info!(
                "Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("FBLOGIN_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                settings = basic_toml::from_str(&secrets_toml_content)?;
                log::info!("Overriding settings from {}", secrets_path.display());
            } else {
                log::info!(
                    "FBLOGIN_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut Self) {
        if let Ok(schemes) = std::env::var("FBLOGIN_URL_SCHEMES") {
            settings.application.url_schemes =
                schemes.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(auth_type) = std::env::var("FBLOGIN_AUTH_TYPE") {
            if let Some(parsed) = AuthType::from_param(&auth_type) {
                settings.login.auth_type = parsed;
            }
        }
        if let Ok(scopes) = std::env::var("FBLOGIN_SCOPES") {
            settings.login.scopes = scopes.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(level) = std::env::var("FBLOGIN_LOG_LEVEL") {
            settings.logging.level = level;
        }
    }

    /// Find the registered Facebook URL scheme (`fb<digits>`)
    ///
    /// # Panics
    ///
    /// Panics if no registered scheme matches the `fb<digits>` marker. A
    /// missing scheme means the app build is misconfigured; there is no
    /// runtime recovery from it.
    #[must_use]
    pub fn facebook_scheme(&self) -> &str {
        self.application
            .url_schemes
            .iter()
            .find(|scheme| FACEBOOK_SCHEME.is_match(scheme))
            .unwrap_or_else(|| {
                panic!(
                    "no registered URL scheme starts with \"{SCHEME_MARKER}<app id>\"; \
                     add the Facebook scheme to application.url_schemes"
                )
            })
    }

    /// Extract the numeric Facebook client id from the registered scheme
    ///
    /// # Panics
    ///
    /// Panics if no registered scheme matches the `fb<digits>` marker.
    #[must_use]
    pub fn client_id(&self) -> &str {
        let scheme = self.facebook_scheme();
        CLIENT_ID_DIGITS
            .find(scheme)
            .map_or_else(
                || unreachable!("matched scheme always contains digits"),
                |digits| digits.as_str(),
            )
    }
}
