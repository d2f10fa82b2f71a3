//! Typed settings and their sources
//!
//! Sources are applied in priority order: built-in defaults, then a TOML
//! document, then environment variables carrying the [`ENV_PREFIX`] prefix.
//!
//! ```toml
//! [submit]
//! accept = "application/json"
//! timeout_secs = 30
//! user_agent = "my-app/1.0"
//!
//! [validation]
//! strict = true
//! abort_early = false
//! level = "warning"
//! ```

use formulary_core::ValidationLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables read by [`Settings::apply_env`].
pub const ENV_PREFIX: &str = "FORMULARY_";

/// Default `Accept` header sent with every submission.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Error type for loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {value}")]
	InvalidValue { key: String, value: String },
}

/// Settings of the submission dispatcher's transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitSettings {
	/// Value of the `Accept` header.
	pub accept: String,
	/// Whole-request timeout in seconds. `None` disables the timeout.
	pub timeout_secs: Option<u64>,
	/// `User-Agent` sent by the default transport.
	pub user_agent: Option<String>,
}

impl SubmitSettings {
	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_secs.map(Duration::from_secs)
	}
}

impl Default for SubmitSettings {
	fn default() -> Self {
		Self {
			accept: DEFAULT_ACCEPT.to_string(),
			timeout_secs: None,
			user_agent: None,
		}
	}
}

/// Defaults used by schema validation adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
	/// Validate without coercing values first.
	pub strict: bool,
	/// Stop at the first violation instead of collecting all of them.
	pub abort_early: bool,
	/// Level used when an adapter does not choose one.
	pub level: ValidationLevel,
}

impl Default for ValidationSettings {
	fn default() -> Self {
		Self {
			strict: true,
			abort_early: false,
			level: ValidationLevel::Error,
		}
	}
}

/// Root settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub submit: SubmitSettings,
	pub validation: ValidationSettings,
}

impl Settings {
	/// Parses a TOML document. Missing keys keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use formulary_conf::Settings;
	///
	/// let settings = Settings::from_toml_str("[submit]\ntimeout_secs = 5").unwrap();
	/// assert_eq!(settings.submit.timeout_secs, Some(5));
	/// assert_eq!(settings.submit.accept, "application/json");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	/// Reads and parses a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = fs::read_to_string(path)?;
		tracing::debug!("Loading settings from {}", path.display());
		Self::from_toml_str(&source)
	}

	/// Loads defaults, then `path` when given, then the process environment.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env()?;
		Ok(settings)
	}

	/// Overrides values from `FORMULARY_*` environment variables.
	pub fn apply_env(&mut self) -> Result<(), SettingsError> {
		self.apply_env_vars(std::env::vars())
	}

	/// Overrides values from the given `(name, value)` pairs.
	///
	/// Names without the [`ENV_PREFIX`] prefix and unknown names are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use formulary_conf::Settings;
	/// use formulary_core::ValidationLevel;
	///
	/// let mut settings = Settings::default();
	/// settings
	///     .apply_env_vars([("FORMULARY_VALIDATION_LEVEL", "warning")])
	///     .unwrap();
	/// assert_eq!(settings.validation.level, ValidationLevel::Warning);
	/// ```
	pub fn apply_env_vars<I, K, V>(&mut self, vars: I) -> Result<(), SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let key = key.as_ref();
			let Some(name) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.as_ref();
			let invalid = || SettingsError::InvalidValue {
				key: key.to_string(),
				value: value.to_string(),
			};

			match name.to_ascii_lowercase().as_str() {
				"submit_accept" => self.submit.accept = value.to_string(),
				"submit_timeout_secs" => {
					self.submit.timeout_secs = if value.trim().is_empty() {
						None
					} else {
						Some(value.trim().parse().map_err(|_| invalid())?)
					};
				}
				"submit_user_agent" => self.submit.user_agent = Some(value.to_string()),
				"validation_strict" => {
					self.validation.strict = parse_bool(value).ok_or_else(invalid)?;
				}
				"validation_abort_early" => {
					self.validation.abort_early = parse_bool(value).ok_or_else(invalid)?;
				}
				"validation_level" => {
					self.validation.level = value.parse().map_err(|_| invalid())?;
				}
				_ => {
					tracing::debug!("Ignoring unknown setting {}", key);
				}
			}
		}
		Ok(())
	}
}

/// Parses the boolean spellings accepted in environment variables.
pub fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}
