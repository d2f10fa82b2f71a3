//! Extension contract for formulary form controllers
//!
//! This crate holds the pieces shared by every other formulary crate:
//!
//! - [`Stage`]: lifecycle stage a controller is in when it invokes extenders
//! - [`ValidationLevel`]: severity tag attached to registered validators
//! - [`ErrorTree`]: nested error messages mirroring the shape of form values
//! - [`Extender`] / [`FormHandle`]: the capability-passing plugin interface
//! - [`FormController`]: a minimal host that owns and runs registrations
//!
//! ## Example
//!
//! ```
//! use formulary_core::{
//!     ExtenderHandler, FormController, FormHandle, ValidationLevel, ValidatorOptions,
//! };
//! use futures::FutureExt;
//! use std::sync::Arc;
//!
//! let mut controller = FormController::new();
//! controller.extend(|form: &mut dyn FormHandle| {
//!     if form.stage().is_setup() {
//!         form.add_validator(
//!             Arc::new(|_values: serde_json::Value| async { Ok(None) }.boxed()),
//!             ValidatorOptions::new(ValidationLevel::Warning),
//!         );
//!     }
//!     ExtenderHandler::default()
//! });
//! controller.setup();
//!
//! assert_eq!(controller.validator_levels(), vec![ValidationLevel::Warning]);
//! ```

pub mod controller;
pub mod error_tree;
pub mod extender;
pub mod level;
pub mod stage;

pub use controller::{FormController, ValidationReport};
pub use error_tree::{ErrorTree, path_segments};
pub use extender::{
	DestroyFn, Extender, ExtenderHandler, FormHandle, FormValues, TransformFn, ValidationFn,
	ValidatorOptions,
};
pub use level::{ParseLevelError, ValidationLevel};
pub use stage::{ParseStageError, Stage};
