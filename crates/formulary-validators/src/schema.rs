//! Schema abstraction
//!
//! [`Schema`] is the seam to an external schema library. Implementations
//! report invalid values as [`SchemaError::Invalid`] with one [`Violation`]
//! per failed rule, and reserve [`SchemaError::Fault`] for problems with the
//! schema itself.

use async_trait::async_trait;
use formulary_conf::ValidationSettings;
use serde_json::Value;
use std::fmt;

/// Options forwarded to [`Schema::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateOptions {
	/// Validate the values as given, without coercing them first.
	pub strict: bool,
	/// Stop at the first violation.
	pub abort_early: bool,
	/// Drop keys the schema does not know about.
	pub strip_unknown: bool,
	/// Extra data made available to schema rules.
	pub context: Option<Value>,
}

impl Default for ValidateOptions {
	fn default() -> Self {
		Self {
			strict: true,
			abort_early: false,
			strip_unknown: false,
			context: None,
		}
	}
}

impl ValidateOptions {
	pub fn with_context(mut self, context: Value) -> Self {
		self.context = Some(context);
		self
	}
}

impl From<&ValidationSettings> for ValidateOptions {
	fn from(settings: &ValidationSettings) -> Self {
		Self {
			strict: settings.strict,
			abort_early: settings.abort_early,
			..Self::default()
		}
	}
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
	/// Dot/bracket path of the offending field. `None` for failures that do
	/// not belong to a field.
	pub path: Option<String>,
	pub message: String,
}

impl Violation {
	pub fn new(path: Option<String>, message: impl Into<String>) -> Self {
		Self {
			path,
			message: message.into(),
		}
	}

	/// A violation of the field at `path`.
	pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(Some(path.into()), message)
	}

	/// A violation without a field path.
	pub fn root(message: impl Into<String>) -> Self {
		Self::new(None, message)
	}
}

/// Every violation found in one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
	pub inner: Vec<Violation>,
}

impl ValidationFailure {
	pub fn new(inner: Vec<Violation>) -> Self {
		Self { inner }
	}

	pub fn push(&mut self, violation: Violation) {
		self.inner.push(violation);
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl FromIterator<Violation> for ValidationFailure {
	fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

impl fmt::Display for ValidationFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.inner.as_slice() {
			[single] => f.write_str(&single.message),
			violations => write!(f, "{} errors occurred", violations.len()),
		}
	}
}

impl std::error::Error for ValidationFailure {}

/// Error reported by a [`Schema`].
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
	/// The values broke one or more rules.
	#[error(transparent)]
	Invalid(#[from] ValidationFailure),

	/// The schema could not run, e.g. because it is malformed.
	#[error("Schema fault: {0}")]
	Fault(String),
}

/// Schema object of an external validation library.
#[async_trait]
pub trait Schema: Send + Sync {
	/// Validates `values`, returning the validated values on success.
	async fn validate(&self, values: &Value, options: &ValidateOptions)
	-> Result<Value, SchemaError>;

	/// Coerces `values` to the schema's types.
	fn cast(&self, values: Value) -> Result<Value, SchemaError>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use formulary_core::ValidationLevel;
	use rstest::rstest;

	#[rstest]
	fn test_default_options_are_strict_and_exhaustive() {
		let options = ValidateOptions::default();

		assert!(options.strict);
		assert!(!options.abort_early);
		assert!(!options.strip_unknown);
		assert_eq!(options.context, None);
	}

	#[rstest]
	fn test_options_from_settings() {
		let settings = ValidationSettings {
			strict: false,
			abort_early: true,
			level: ValidationLevel::Warning,
		};

		let options = ValidateOptions::from(&settings);

		assert!(!options.strict);
		assert!(options.abort_early);
		assert!(!options.strip_unknown);
	}

	#[rstest]
	#[case(vec![Violation::at("name", "is required")], "is required")]
	#[case(vec![Violation::at("a", "x"), Violation::root("y")], "2 errors occurred")]
	#[case(vec![], "0 errors occurred")]
	fn test_failure_display(#[case] inner: Vec<Violation>, #[case] expected: &str) {
		let err = SchemaError::from(ValidationFailure::new(inner));
		assert_eq!(err.to_string(), expected);
	}
}
