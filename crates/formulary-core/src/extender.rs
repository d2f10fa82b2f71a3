//! Extension contract between a form controller and its extenders
//!
//! An extender is handed a [`FormHandle`] every time the controller changes
//! stage. During [`Stage::Setup`] it may register validators and
//! transformers; in any other stage it must do nothing and return an empty
//! [`ExtenderHandler`].
//!
//! ```
//! use formulary_core::{ExtenderHandler, FormController, FormHandle};
//! use std::sync::Arc;
//!
//! let mut controller = FormController::new();
//! controller.extend(|form: &mut dyn FormHandle| {
//!     if !form.stage().is_setup() {
//!         return ExtenderHandler::default();
//!     }
//!     form.add_transformer(Arc::new(
//!         |values: serde_json::Value| -> anyhow::Result<serde_json::Value> { Ok(values) },
//!     ));
//!     ExtenderHandler::default()
//! });
//! controller.setup();
//!
//! assert_eq!(controller.transformer_count(), 1);
//! ```

use crate::error_tree::ErrorTree;
use crate::level::ValidationLevel;
use crate::stage::Stage;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Form values as seen by validators and transformers.
pub type FormValues = Value;

/// Asynchronous validation function.
///
/// Resolves to `Ok(None)` when the values are valid and `Ok(Some(tree))`
/// when they are not. `Err` is reserved for faults of the validator itself.
pub type ValidationFn =
	Arc<dyn Fn(FormValues) -> BoxFuture<'static, anyhow::Result<Option<ErrorTree>>> + Send + Sync>;

/// Value transformer applied before values reach downstream consumers.
pub type TransformFn = Arc<dyn Fn(FormValues) -> anyhow::Result<FormValues> + Send + Sync>;

/// Callback run when the controller is torn down.
pub type DestroyFn = Box<dyn FnOnce() + Send>;

/// Options attached to a registered validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatorOptions {
	pub level: ValidationLevel,
}

impl ValidatorOptions {
	pub fn new(level: ValidationLevel) -> Self {
		Self { level }
	}
}

/// Capability handed to extenders.
///
/// The controller owns the registration lists; an extender only appends to
/// them while [`FormHandle::stage`] is [`Stage::Setup`] and keeps no
/// reference to the handle afterwards.
pub trait FormHandle {
	/// Current lifecycle stage of the controller.
	fn stage(&self) -> Stage;

	/// Registers a validator tagged with `options.level`.
	fn add_validator(&mut self, validator: ValidationFn, options: ValidatorOptions);

	/// Registers a value transformer.
	fn add_transformer(&mut self, transformer: TransformFn);
}

/// Optional callbacks returned by an extender.
///
/// `ExtenderHandler::default()` is the empty registration set.
#[derive(Default)]
pub struct ExtenderHandler {
	/// Invoked once when the controller is destroyed.
	pub destroy: Option<DestroyFn>,
}

impl ExtenderHandler {
	/// Handler with a teardown callback.
	pub fn with_destroy(destroy: impl FnOnce() + Send + 'static) -> Self {
		Self {
			destroy: Some(Box::new(destroy)),
		}
	}

	/// Returns true when no callback was registered.
	pub fn is_empty(&self) -> bool {
		self.destroy.is_none()
	}
}

impl fmt::Debug for ExtenderHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ExtenderHandler")
			.field("destroy", &self.destroy.is_some())
			.finish()
	}
}

/// Pluggable unit that registers validators and transformers on a controller.
///
/// Implemented for every `Fn(&mut dyn FormHandle) -> ExtenderHandler`
/// closure, so simple extenders need no dedicated type.
pub trait Extender: Send + Sync {
	fn extend(&self, form: &mut dyn FormHandle) -> ExtenderHandler;
}

impl<F> Extender for F
where
	F: Fn(&mut dyn FormHandle) -> ExtenderHandler + Send + Sync,
{
	fn extend(&self, form: &mut dyn FormHandle) -> ExtenderHandler {
		self(form)
	}
}
