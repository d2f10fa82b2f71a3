//! Schema validator extender

use crate::adapter::validate_schema;
use crate::schema::{Schema, ValidateOptions};
use formulary_conf::ValidationSettings;
use formulary_core::{
	Extender, ExtenderHandler, FormHandle, FormValues, TransformFn, ValidationLevel,
	ValidatorOptions,
};
use std::fmt;
use std::sync::Arc;

/// Configuration of a [`SchemaValidator`].
#[derive(Clone)]
pub struct ValidatorConfig {
	pub schema: Arc<dyn Schema>,
	/// Level the validator is registered with.
	pub level: ValidationLevel,
	/// Also register a transformer that casts values through the schema.
	pub cast_values: bool,
	/// Options forwarded to the schema. `None` uses [`ValidateOptions::default`].
	pub options: Option<ValidateOptions>,
}

impl ValidatorConfig {
	/// Error-level configuration without value casting.
	pub fn new(schema: impl Schema + 'static) -> Self {
		Self::shared(Arc::new(schema))
	}

	/// Same as [`ValidatorConfig::new`] for a schema that is already shared.
	pub fn shared(schema: Arc<dyn Schema>) -> Self {
		Self {
			schema,
			level: ValidationLevel::Error,
			cast_values: false,
			options: None,
		}
	}

	/// Configuration whose level and options come from `settings`.
	pub fn from_settings(schema: Arc<dyn Schema>, settings: &ValidationSettings) -> Self {
		Self {
			level: settings.level,
			options: Some(ValidateOptions::from(settings)),
			..Self::shared(schema)
		}
	}

	pub fn with_level(mut self, level: ValidationLevel) -> Self {
		self.level = level;
		self
	}

	pub fn cast_values(mut self, cast_values: bool) -> Self {
		self.cast_values = cast_values;
		self
	}

	pub fn with_options(mut self, options: ValidateOptions) -> Self {
		self.options = Some(options);
		self
	}
}

impl fmt::Debug for ValidatorConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValidatorConfig")
			.field("level", &self.level)
			.field("cast_values", &self.cast_values)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

/// Creates an extender that validates form values with a schema.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use formulary_core::{FormController, ValidationLevel};
/// use formulary_validators::{Schema, SchemaError, ValidateOptions, ValidatorConfig, validator};
/// use serde_json::Value;
///
/// struct AnySchema;
///
/// #[async_trait]
/// impl Schema for AnySchema {
///     async fn validate(&self, values: &Value, _: &ValidateOptions) -> Result<Value, SchemaError> {
///         Ok(values.clone())
///     }
///
///     fn cast(&self, values: Value) -> Result<Value, SchemaError> {
///         Ok(values)
///     }
/// }
///
/// let mut controller = FormController::new();
/// controller.extend(validator(
///     ValidatorConfig::new(AnySchema)
///         .with_level(ValidationLevel::Warning)
///         .cast_values(true),
/// ));
/// controller.setup();
///
/// assert_eq!(controller.validator_levels(), vec![ValidationLevel::Warning]);
/// assert_eq!(controller.transformer_count(), 1);
/// ```
pub fn validator(config: ValidatorConfig) -> SchemaValidator {
	SchemaValidator { config }
}

/// Extender registering a schema-backed validator, and optionally a casting
/// transformer, during setup.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
	config: ValidatorConfig,
}

impl SchemaValidator {
	pub fn config(&self) -> &ValidatorConfig {
		&self.config
	}

	fn cast_transformer(&self) -> TransformFn {
		let schema = Arc::clone(&self.config.schema);
		Arc::new(move |values: FormValues| -> anyhow::Result<FormValues> {
			Ok(schema.cast(values)?)
		})
	}
}

impl Extender for SchemaValidator {
	fn extend(&self, form: &mut dyn FormHandle) -> ExtenderHandler {
		if !form.stage().is_setup() {
			return ExtenderHandler::default();
		}

		let validate = validate_schema(
			Arc::clone(&self.config.schema),
			self.config.options.clone(),
		);
		form.add_validator(validate, ValidatorOptions::new(self.config.level));
		tracing::debug!(
			level = %self.config.level,
			cast_values = self.config.cast_values,
			"registered schema validator"
		);

		if !self.config.cast_values {
			return ExtenderHandler::default();
		}
		form.add_transformer(self.cast_transformer());
		ExtenderHandler::default()
	}
}
