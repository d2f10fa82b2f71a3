//! Configuration for formulary
//!
//! Settings cover the submission transport (`Accept` header, timeout, user
//! agent) and the defaults of schema validation adapters. They are layered:
//! environment variables > TOML file > built-in defaults.
//!
//! ```
//! use formulary_conf::Settings;
//!
//! let mut settings = Settings::from_toml_str("[validation]\nabort_early = true").unwrap();
//! settings.apply_env_vars([("FORMULARY_SUBMIT_TIMEOUT_SECS", "15")]).unwrap();
//!
//! assert!(settings.validation.abort_early);
//! assert_eq!(settings.submit.timeout_secs, Some(15));
//! ```

pub mod settings;

pub use settings::{
	DEFAULT_ACCEPT, ENV_PREFIX, Settings, SettingsError, SubmitSettings, ValidationSettings,
	parse_bool,
};
