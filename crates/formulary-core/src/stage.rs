//! Controller lifecycle stages.
//!
//! A controller invokes its extenders more than once over its life. Only the
//! [`Stage::Setup`] invocation may register validators or transformers;
//! extenders must treat every other stage as a no-op.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a form controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
	/// One-time registration stage. The only stage that gates extender actions.
	#[default]
	Setup,
	/// The form has been attached to its source.
	Mount,
	/// The form source changed after mounting.
	Update,
}

impl Stage {
	/// Returns the canonical upper-case name of the stage.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Setup => "SETUP",
			Self::Mount => "MOUNT",
			Self::Update => "UPDATE",
		}
	}

	/// Returns true for the stage in which extenders register.
	pub fn is_setup(&self) -> bool {
		matches!(self, Self::Setup)
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown stage name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle stage: {0}")]
pub struct ParseStageError(pub String);

impl FromStr for Stage {
	type Err = ParseStageError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"SETUP" => Ok(Self::Setup),
			"MOUNT" => Ok(Self::Mount),
			"UPDATE" => Ok(Self::Update),
			_ => Err(ParseStageError(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("SETUP", Stage::Setup)]
	#[case("mount", Stage::Mount)]
	#[case("Update", Stage::Update)]
	fn test_parse_stage(#[case] input: &str, #[case] expected: Stage) {
		assert_eq!(input.parse::<Stage>().unwrap(), expected);
	}

	#[rstest]
	fn test_parse_unknown_stage() {
		let err = "teardown".parse::<Stage>().unwrap_err();
		assert_eq!(err.to_string(), "unknown lifecycle stage: teardown");
	}

	#[rstest]
	fn test_only_setup_is_setup() {
		assert!(Stage::Setup.is_setup());
		assert!(!Stage::Mount.is_setup());
		assert!(!Stage::Update.is_setup());
	}

	#[rstest]
	fn test_stage_serializes_upper_case() {
		let json = serde_json::to_string(&Stage::Setup).unwrap();
		assert_eq!(json, "\"SETUP\"");
	}
}
