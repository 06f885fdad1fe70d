use std::path::{Path, PathBuf};
use std::time::Duration;

use humantime::{format_duration, parse_duration};
use serde::Deserialize;
use serde_with::{DeserializeAs, SerializeAs, serde_as};

use crate::Result;
use crate::error::ConfigError;

/// Accepted range for the reported SDK level, shared with the CLI override.
pub const SDK_LEVEL_BOUNDS: std::ops::RangeInclusive<u32> = 1..=100;
const DEFAULT_SDK_LEVEL: u32 = 34;

#[derive(Debug, Clone)]
pub struct Config {
    /// App package identifier; doubles as the notification channel id.
    pub package_id: String,
    /// Reported OS SDK level, the single input to capability branching.
    pub sdk_level: u32,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub appname: String,
    /// Directory standing in for the app icon-resource table on desktop
    /// hosts.
    pub resource_dir: Option<PathBuf>,
    pub toast_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from an optional TOML file, the `APPNOTIFY__`
    /// environment tree, and explicit override variables, then validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unreadable or unparsable sources,
    /// missing required fields, or out-of-range values.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        let path = path.as_ref();
        builder = builder.add_source(::config::File::from(path).required(false));
        builder = builder.add_source(
            ::config::Environment::with_prefix("APPNOTIFY")
                .separator("__")
                .try_parsing(true),
        );

        let mut raw: RawConfig = builder
            .build()
            .map_err(|err| ConfigError::Other(err.to_string()))?
            .try_deserialize()
            .map_err(|err| ConfigError::Parse(err.to_string()))?;

        raw.apply_env_overrides()?;
        raw.validate_and_build()
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    notify: RawNotify,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct RawApp {
    package_id: Option<String>,
    #[serde(default = "default_sdk_level")]
    sdk_level: u32,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct RawNotify {
    #[serde(default = "default_appname")]
    appname: String,
    #[serde(default)]
    resource_dir: Option<PathBuf>,
    #[serde(default)]
    #[serde_as(as = "Option<HumantimeDuration>")]
    toast_timeout: Option<Duration>,
}

impl Default for RawApp {
    fn default() -> Self {
        Self {
            package_id: None,
            sdk_level: default_sdk_level(),
        }
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            appname: default_appname(),
            resource_dir: None,
            toast_timeout: None,
        }
    }
}

impl RawConfig {
    fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(package_id) = env_string("APP_PACKAGE_ID")? {
            self.app.package_id = Some(package_id);
        }
        if let Some(sdk_level) = env_parse::<u32>("APP_SDK_LEVEL")? {
            self.app.sdk_level = sdk_level;
        }
        if let Some(appname) = env_string("NOTIFY_APPNAME")? {
            self.notify.appname = appname;
        }
        if let Some(dir) = env_string("NOTIFY_RESOURCE_DIR")? {
            self.notify.resource_dir = Some(PathBuf::from(dir));
        }
        if let Some(timeout) = env_duration("NOTIFY_TOAST_TIMEOUT")? {
            self.notify.toast_timeout = Some(timeout);
        }
        Ok(())
    }

    fn validate_and_build(self) -> Result<Config> {
        let package_id = self.app.package_id.ok_or(ConfigError::MissingField {
            field: "app.package_id",
        })?;
        if package_id.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "app.package_id",
                message: "package id cannot be empty".to_string(),
            }
            .into());
        }

        if !SDK_LEVEL_BOUNDS.contains(&self.app.sdk_level) {
            return Err(ConfigError::InvalidField {
                field: "app.sdk_level",
                message: format!(
                    "expected between {} and {}, got {}",
                    SDK_LEVEL_BOUNDS.start(),
                    SDK_LEVEL_BOUNDS.end(),
                    self.app.sdk_level
                ),
            }
            .into());
        }

        if let Some(timeout) = self.notify.toast_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidField {
                    field: "notify.toast_timeout",
                    message: "toast timeout must be greater than zero".to_string(),
                }
                .into());
            }
        }

        Ok(Config {
            package_id,
            sdk_level: self.app.sdk_level,
            notify: NotifySettings {
                appname: self.notify.appname,
                resource_dir: self.notify.resource_dir,
                toast_timeout: self.notify.toast_timeout,
            },
        })
    }
}

struct HumantimeDuration;

impl<'de> DeserializeAs<'de, Duration> for HumantimeDuration {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

impl SerializeAs<Duration> for HumantimeDuration {
    fn serialize_as<S>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format_duration(*value).to_string())
    }
}

fn env_string(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(err.to_string())),
    }
}

fn env_parse<T>(key: &'static str) -> std::result::Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = env_string(key)? {
        if value.trim().is_empty() {
            return Ok(None);
        }
        return value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            });
    }
    Ok(None)
}

fn env_duration(key: &'static str) -> std::result::Result<Option<Duration>, ConfigError> {
    if let Some(value) = env_string(key)? {
        if value.trim().is_empty() {
            return Ok(None);
        }
        return parse_duration(value.trim())
            .map(Some)
            .map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            });
    }
    Ok(None)
}

const fn default_sdk_level() -> u32 {
    DEFAULT_SDK_LEVEL
}

fn default_appname() -> String {
    "appnotify".to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::{RawConfig, default_sdk_level};
    use crate::error::{ConfigError, Error};
    use std::time::Duration;

    fn raw_from_toml(toml: &str) -> RawConfig {
        ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn full_document_builds() {
        let raw = raw_from_toml(
            r#"
            [app]
            package_id = "org.example.app"
            sdk_level = 31

            [notify]
            appname = "Example"
            toast_timeout = "2s"
            "#,
        );
        let config = raw.validate_and_build().unwrap();
        assert_eq!(config.package_id, "org.example.app");
        assert_eq!(config.sdk_level, 31);
        assert_eq!(config.notify.appname, "Example");
        assert_eq!(config.notify.toast_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn missing_package_id_is_rejected() {
        let raw = raw_from_toml("[app]\nsdk_level = 30\n");
        match raw.validate_and_build() {
            Err(Error::Config(ConfigError::MissingField { field })) => {
                assert_eq!(field, "app.package_id");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn zero_sdk_level_is_rejected() {
        let raw = raw_from_toml("[app]\npackage_id = \"a.b\"\nsdk_level = 0\n");
        assert!(matches!(
            raw.validate_and_build(),
            Err(Error::Config(ConfigError::InvalidField { field, .. })) if field == "app.sdk_level"
        ));
    }

    #[test]
    fn sdk_level_defaults_when_absent() {
        let raw = raw_from_toml("[app]\npackage_id = \"a.b\"\n");
        let config = raw.validate_and_build().unwrap();
        assert_eq!(config.sdk_level, default_sdk_level());
    }
}
