//! # Formulary
//!
//! Submission and validation extensions for form controllers.
//!
//! Formulary covers two jobs of a form library that sit outside the form's own
//! state handling:
//!
//! - **Submission dispatching**: derive an HTTP request from a form (method
//!   override, encoding selection, query or body shaping), send it and
//!   classify the response.
//! - **Schema validation**: plug an external schema into a controller's
//!   lifecycle so validation and value casting run automatically.
//!
//! ## Feature Flags
//!
//! - `conf` - Settings loaded from defaults, TOML and environment variables
//! - `forms` - Submission dispatcher (implies `conf`)
//! - `validators` - Schema validation adapter and extender (implies `conf`)
//! - `full` (default) - Everything above
//!
//! The extension contract in [`core`] is always available.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use formulary::prelude::*;
//! use serde_json::Value;
//!
//! struct ContactSchema;
//!
//! #[async_trait]
//! impl Schema for ContactSchema {
//!     async fn validate(&self, values: &Value, _: &ValidateOptions) -> Result<Value, SchemaError> {
//!         match values.get("email").and_then(Value::as_str) {
//!             Some(email) if email.contains('@') => Ok(values.clone()),
//!             _ => Err(ValidationFailure::new(vec![Violation::at("email", "is invalid")]).into()),
//!         }
//!     }
//!
//!     fn cast(&self, values: Value) -> Result<Value, SchemaError> {
//!         Ok(values)
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let mut controller = FormController::new();
//! controller.extend(validator(ValidatorConfig::new(ContactSchema)));
//! controller.setup();
//!
//! let form = HtmlForm::new("https://example.com/contact")
//!     .method("post")
//!     .element(FormElement::text("email", "ada@example.com"));
//!
//! let report = controller.validate(&serde_json::json!({ "email": "ada@example.com" })).await?;
//! if !report.is_blocking() {
//!     let settings = Settings::load(None)?;
//!     let transport = ReqwestTransport::from_settings(&settings.submit)?;
//!     if let Some(handler) = create_submit_handler(Some(form), transport) {
//!         handler.with_settings(settings.submit).submit().await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use formulary_core as core;

#[cfg(feature = "conf")]
pub use formulary_conf as conf;

#[cfg(feature = "forms")]
pub use formulary_forms as forms;

#[cfg(feature = "validators")]
pub use formulary_validators as validators;

// Extension contract
pub use formulary_core::{
	ErrorTree, Extender, ExtenderHandler, FormController, FormHandle, FormValues, Stage,
	TransformFn, ValidationFn, ValidationLevel, ValidationReport, ValidatorOptions,
};

// Settings
#[cfg(feature = "conf")]
pub use formulary_conf::{Settings, SettingsError, SubmitSettings, ValidationSettings};

// Submission dispatcher
#[cfg(feature = "forms")]
pub use formulary_forms::{
	DispatchError, Enctype, FetchResponse, FilePart, FormData, FormDataValue, FormElement,
	FormMethod, FormSource, HtmlForm, ReqwestTransport, ShapedBody, SubmitError, SubmitHandler,
	SubmitRequest, SuccessResponse, Transport, TransportError, create_submit_handler,
};

// Schema validation
#[cfg(feature = "validators")]
pub use formulary_validators::{
	Schema, SchemaError, SchemaValidator, ValidateOptions, ValidationFailure, ValidatorConfig,
	Violation, validate_schema, validator,
};

/// Commonly used types, re-exported for glob imports.
pub mod prelude {
	pub use crate::{
		ErrorTree, Extender, ExtenderHandler, FormController, FormHandle, Stage, ValidationLevel,
		ValidatorOptions,
	};

	#[cfg(feature = "conf")]
	pub use crate::{Settings, SubmitSettings, ValidationSettings};

	#[cfg(feature = "forms")]
	pub use crate::{
		DispatchError, FormElement, FormSource, HtmlForm, ReqwestTransport, SubmitError,
		SubmitHandler, Transport, create_submit_handler,
	};

	#[cfg(feature = "validators")]
	pub use crate::{
		Schema, SchemaError, ValidateOptions, ValidationFailure, ValidatorConfig, Violation,
		validate_schema, validator,
	};

	// External
	pub use async_trait::async_trait;
}
