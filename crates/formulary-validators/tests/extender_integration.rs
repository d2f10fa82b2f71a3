//! Schema validators running inside a form controller.

use async_trait::async_trait;
use formulary_conf::Settings;
use formulary_core::{FormController, FormHandle, Stage, ValidationLevel};
use formulary_validators::{
	Schema, SchemaError, ValidateOptions, ValidationFailure, ValidatorConfig, Violation, validator,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

/// Requires `user.email` to contain an `@` and `user.age` to be a number.
/// Casting turns numeric strings into numbers.
struct SignupSchema;

#[async_trait]
impl Schema for SignupSchema {
	async fn validate(&self, values: &Value, options: &ValidateOptions) -> Result<Value, SchemaError> {
		let Some(user) = values.get("user").and_then(Value::as_object) else {
			return Err(SchemaError::Fault("expected a `user` object".to_string()));
		};

		let mut failure = ValidationFailure::default();
		let email = user.get("email").and_then(Value::as_str).unwrap_or_default();
		if !email.contains('@') {
			failure.push(Violation::at("user.email", "must be a valid email"));
		}
		if !(options.abort_early && !failure.is_empty())
			&& !user.get("age").is_some_and(Value::is_number)
		{
			failure.push(Violation::at("user.age", "must be a number"));
		}

		if failure.is_empty() {
			Ok(values.clone())
		} else {
			Err(failure.into())
		}
	}

	fn cast(&self, mut values: Value) -> Result<Value, SchemaError> {
		if let Some(age) = values.pointer_mut("/user/age")
			&& let Some(parsed) = age.as_str().and_then(|raw| raw.trim().parse::<u64>().ok())
		{
			*age = json!(parsed);
		}
		Ok(values)
	}
}

/// Flags disposable email domains without blocking submission.
struct DisposableEmailSchema;

#[async_trait]
impl Schema for DisposableEmailSchema {
	async fn validate(&self, values: &Value, _: &ValidateOptions) -> Result<Value, SchemaError> {
		let email = values.pointer("/user/email").and_then(Value::as_str).unwrap_or_default();
		if email.ends_with("@mailinator.com") {
			return Err(ValidationFailure::new(vec![Violation::at(
				"user.email",
				"looks like a disposable address",
			)])
			.into());
		}
		Ok(values.clone())
	}

	fn cast(&self, values: Value) -> Result<Value, SchemaError> {
		Ok(values)
	}
}

#[fixture]
fn controller() -> FormController {
	let mut controller = FormController::new();
	controller
		.extend(validator(ValidatorConfig::new(SignupSchema).cast_values(true)))
		.extend(validator(
			ValidatorConfig::new(DisposableEmailSchema).with_level(ValidationLevel::Warning),
		));
	controller.setup();
	controller
}

#[rstest]
fn test_setup_registers_in_order(controller: FormController) {
	assert_eq!(controller.stage(), Stage::Mount);
	assert_eq!(
		controller.validator_levels(),
		vec![ValidationLevel::Error, ValidationLevel::Warning]
	);
	assert_eq!(controller.transformer_count(), 1);
}

#[rstest]
fn test_refresh_after_setup_adds_nothing(mut controller: FormController) {
	controller.set_stage(Stage::Update);
	controller.refresh();

	assert_eq!(controller.validator_count(), 2);
	assert_eq!(controller.transformer_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_valid_values_produce_clean_report(controller: FormController) {
	let report = controller
		.validate(&json!({ "user": { "email": "ada@example.com", "age": 36 } }))
		.await
		.unwrap();

	assert!(report.is_clean());
}

#[rstest]
#[tokio::test]
async fn test_errors_block_and_mirror_value_shape(controller: FormController) {
	let report = controller
		.validate(&json!({ "user": { "email": "ada", "age": 36 } }))
		.await
		.unwrap();

	assert!(report.is_blocking());
	assert_eq!(
		Value::from(report.errors),
		json!({ "user": { "email": "must be a valid email" } })
	);
	assert!(report.warnings.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_warnings_never_block(controller: FormController) {
	let report = controller
		.validate(&json!({ "user": { "email": "ada@mailinator.com", "age": 36 } }))
		.await
		.unwrap();

	assert!(!report.is_blocking());
	assert_eq!(
		Value::from(report.warnings),
		json!({ "user": { "email": "looks like a disposable address" } })
	);
}

#[rstest]
#[tokio::test]
async fn test_transform_then_validate(controller: FormController) {
	let raw = json!({ "user": { "email": "ada@example.com", "age": "36" } });

	let before = controller.validate(&raw).await.unwrap();
	let cast = controller.transform(raw).unwrap();
	let after = controller.validate(&cast).await.unwrap();

	assert_eq!(
		Value::from(before.errors),
		json!({ "user": { "age": "must be a number" } })
	);
	assert_eq!(cast, json!({ "user": { "email": "ada@example.com", "age": 36 } }));
	assert!(after.is_clean());
}

#[rstest]
#[tokio::test]
async fn test_validate_transformed_checks_cast_values(controller: FormController) {
	let (cast, report) = controller
		.validate_transformed(json!({ "user": { "email": "ada@example.com", "age": " 36 " } }))
		.await
		.unwrap();

	assert_eq!(cast["user"]["age"], json!(36));
	assert!(report.is_clean());
}

#[rstest]
fn test_repeated_setup_keeps_single_registration(mut controller: FormController) {
	controller.setup();

	assert_eq!(controller.validator_count(), 2);
	assert_eq!(controller.transformer_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_schema_fault_aborts_validation(controller: FormController) {
	let err = controller.validate(&json!({ "email": "ada" })).await.unwrap_err();

	assert_eq!(err.to_string(), "Schema fault: expected a `user` object");
}

#[rstest]
#[tokio::test]
async fn test_settings_drive_validator_config() {
	let settings = Settings::from_toml_str(
		r#"
		[validation]
		abort_early = true
		level = "warning"
		"#,
	)
	.unwrap();

	let mut controller = FormController::new();
	controller.extend(validator(ValidatorConfig::from_settings(
		Arc::new(SignupSchema),
		&settings.validation,
	)));
	controller.setup();

	let report = controller
		.validate(&json!({ "user": { "email": "ada" } }))
		.await
		.unwrap();

	assert_eq!(controller.validator_levels(), vec![ValidationLevel::Warning]);
	assert!(!report.is_blocking());
	assert_eq!(
		Value::from(report.warnings),
		json!({ "user": { "email": "must be a valid email" } })
	);
}
