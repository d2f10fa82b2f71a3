//! Severity tag attached to registered validators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a registered validator.
///
/// `Error` results block submission. `Warning` results are advisory and must
/// never block it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
	/// Blocks submission.
	#[default]
	Error,
	/// Advisory only.
	Warning,
}

impl ValidationLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Error => "error",
			Self::Warning => "warning",
		}
	}

	/// Returns true when results at this level prevent submission.
	pub fn blocks_submission(&self) -> bool {
		matches!(self, Self::Error)
	}
}

impl fmt::Display for ValidationLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown validation level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for ValidationLevel {
	type Err = ParseLevelError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"error" => Ok(Self::Error),
			"warning" => Ok(Self::Warning),
			_ => Err(ParseLevelError(s.to_string())),
		}
	}
}
