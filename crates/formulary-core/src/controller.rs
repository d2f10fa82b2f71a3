//! Minimal host controller for extenders
//!
//! [`FormController`] owns the extender list and the validator/transformer
//! registrations. It does not track field state; it only honours the
//! extension contract:
//!
//! - extenders are invoked sequentially, in insertion order, so registration
//!   order (and therefore execution order) is deterministic
//! - only the [`Stage::Setup`] invocation is expected to register anything,
//!   and [`FormController::setup`] runs it at most once
//! - [`ValidationLevel::Warning`] results are reported but never block

use crate::error_tree::ErrorTree;
use crate::extender::{
	DestroyFn, Extender, ExtenderHandler, FormHandle, FormValues, TransformFn, ValidationFn,
	ValidatorOptions,
};
use crate::level::ValidationLevel;
use crate::stage::Stage;
use std::fmt;

struct RegisteredValidator {
	validator: ValidationFn,
	options: ValidatorOptions,
}

/// Outcome of running every registered validator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
	/// Merged results of `error`-level validators.
	pub errors: ErrorTree,
	/// Merged results of `warning`-level validators.
	pub warnings: ErrorTree,
}

impl ValidationReport {
	/// True when at least one `error`-level validator reported a problem.
	pub fn is_blocking(&self) -> bool {
		!self.errors.is_empty()
	}

	/// True when neither errors nor warnings were reported.
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty() && self.warnings.is_empty()
	}
}

/// Form controller owning extender registrations.
pub struct FormController {
	stage: Stage,
	set_up: bool,
	extenders: Vec<Box<dyn Extender>>,
	validators: Vec<RegisteredValidator>,
	transformers: Vec<TransformFn>,
	destroy_callbacks: Vec<DestroyFn>,
}

impl FormController {
	/// Creates a controller in the [`Stage::Setup`] stage.
	pub fn new() -> Self {
		Self {
			stage: Stage::Setup,
			set_up: false,
			extenders: Vec::new(),
			validators: Vec::new(),
			transformers: Vec::new(),
			destroy_callbacks: Vec::new(),
		}
	}

	/// Adds an extender. It is first invoked by [`FormController::setup`].
	pub fn extend(&mut self, extender: impl Extender + 'static) -> &mut Self {
		self.extenders.push(Box::new(extender));
		self
	}

	/// Runs every extender in the setup stage, then moves to
	/// [`Stage::Mount`].
	///
	/// Only the first call does anything, so registrations are never
	/// duplicated.
	pub fn setup(&mut self) {
		if self.set_up {
			tracing::debug!("form controller already set up");
			return;
		}
		self.set_up = true;
		self.stage = Stage::Setup;
		self.run_extenders();
		self.stage = Stage::Mount;
		tracing::debug!(
			validators = self.validators.len(),
			transformers = self.transformers.len(),
			"form controller setup finished"
		);
	}

	/// True once [`FormController::setup`] has run.
	pub fn is_set_up(&self) -> bool {
		self.set_up
	}

	/// Changes the current stage without invoking extenders.
	pub fn set_stage(&mut self, stage: Stage) {
		self.stage = stage;
	}

	/// Re-invokes every extender with the current stage.
	pub fn refresh(&mut self) {
		self.run_extenders();
	}

	fn run_extenders(&mut self) {
		let extenders = std::mem::take(&mut self.extenders);
		for extender in &extenders {
			let handler = extender.extend(self);
			self.collect(handler);
		}
		// Extenders added while running are kept after the existing ones.
		let added = std::mem::replace(&mut self.extenders, extenders);
		self.extenders.extend(added);
	}

	fn collect(&mut self, handler: ExtenderHandler) {
		if let Some(destroy) = handler.destroy {
			self.destroy_callbacks.push(destroy);
		}
	}

	/// Runs the registered validators in registration order.
	///
	/// Trees reported by `error` validators are merged into
	/// [`ValidationReport::errors`], those of `warning` validators into
	/// [`ValidationReport::warnings`]. A validator fault aborts the run.
	///
	/// Values are validated as given. Use
	/// [`FormController::validate_transformed`] to cast them first.
	pub async fn validate(&self, values: &FormValues) -> anyhow::Result<ValidationReport> {
		let mut report = ValidationReport::default();
		for registered in &self.validators {
			let Some(tree) = (registered.validator)(values.clone()).await? else {
				continue;
			};
			match registered.options.level {
				ValidationLevel::Error => report.errors.merge(tree),
				ValidationLevel::Warning => report.warnings.merge(tree),
			}
		}
		if report.is_blocking() {
			tracing::debug!(fields = report.errors.len(), "validation reported errors");
		}
		Ok(report)
	}

	/// Applies the transformers, then validates the transformed values.
	///
	/// Returns the transformed values with the report, so a caller submits
	/// exactly what was validated.
	pub async fn validate_transformed(
		&self,
		values: FormValues,
	) -> anyhow::Result<(FormValues, ValidationReport)> {
		let values = self.transform(values)?;
		let report = self.validate(&values).await?;
		Ok((values, report))
	}

	/// Applies the registered transformers in registration order.
	pub fn transform(&self, values: FormValues) -> anyhow::Result<FormValues> {
		self.transformers
			.iter()
			.try_fold(values, |values, transformer| transformer(values))
	}

	/// Runs every collected teardown callback once.
	pub fn destroy(&mut self) {
		for destroy in self.destroy_callbacks.drain(..) {
			destroy();
		}
	}

	pub fn validator_count(&self) -> usize {
		self.validators.len()
	}

	pub fn transformer_count(&self) -> usize {
		self.transformers.len()
	}

	/// Levels of the registered validators, in registration order.
	pub fn validator_levels(&self) -> Vec<ValidationLevel> {
		self.validators.iter().map(|v| v.options.level).collect()
	}
}

impl Default for FormController {
	fn default() -> Self {
		Self::new()
	}
}

impl FormHandle for FormController {
	fn stage(&self) -> Stage {
		self.stage
	}

	fn add_validator(&mut self, validator: ValidationFn, options: ValidatorOptions) {
		self.validators.push(RegisteredValidator { validator, options });
	}

	fn add_transformer(&mut self, transformer: TransformFn) {
		self.transformers.push(transformer);
	}
}

impl fmt::Debug for FormController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormController")
			.field("stage", &self.stage)
			.field("set_up", &self.set_up)
			.field("extenders", &self.extenders.len())
			.field("validators", &self.validator_levels())
			.field("transformers", &self.transformers.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::FutureExt;
	use rstest::{fixture, rstest};
	use serde_json::{Value, json};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::{Arc, Mutex};

	fn reporting(path: &'static str, message: &'static str) -> ValidationFn {
		Arc::new(move |_values| {
			async move { Ok(Some([(path, message)].into_iter().collect())) }.boxed()
		})
	}

	fn passing() -> ValidationFn {
		Arc::new(|_values| async { Ok(None) }.boxed())
	}

	fn registering(
		validator: fn() -> ValidationFn,
		level: ValidationLevel,
	) -> impl Fn(&mut dyn FormHandle) -> ExtenderHandler + Send + Sync {
		move |form: &mut dyn FormHandle| {
			if form.stage().is_setup() {
				form.add_validator(validator(), ValidatorOptions::new(level));
			}
			ExtenderHandler::default()
		}
	}

	#[fixture]
	fn controller() -> FormController {
		FormController::new()
	}

	#[rstest]
	fn test_setup_runs_extenders_and_moves_to_mount(mut controller: FormController) {
		controller.extend(registering(passing, ValidationLevel::Error));
		assert_eq!(controller.stage(), Stage::Setup);

		controller.setup();

		assert_eq!(controller.stage(), Stage::Mount);
		assert_eq!(controller.validator_count(), 1);
	}

	#[rstest]
	fn test_refresh_outside_setup_registers_nothing(mut controller: FormController) {
		controller.extend(registering(passing, ValidationLevel::Error));
		controller.setup();

		controller.set_stage(Stage::Update);
		controller.refresh();
		controller.refresh();

		assert_eq!(controller.validator_count(), 1);
	}

	#[rstest]
	fn test_second_setup_registers_nothing(mut controller: FormController) {
		controller.extend(registering(passing, ValidationLevel::Error));

		controller.setup();
		controller.setup();

		assert!(controller.is_set_up());
		assert_eq!(controller.stage(), Stage::Mount);
		assert_eq!(controller.validator_count(), 1);
	}

	#[rstest]
	fn test_extenders_run_in_insertion_order(mut controller: FormController) {
		let order = Arc::new(Mutex::new(Vec::new()));
		for name in ["first", "second", "third"] {
			let order = order.clone();
			controller.extend(move |_form: &mut dyn FormHandle| {
				order.lock().unwrap().push(name);
				ExtenderHandler::default()
			});
		}

		controller.setup();

		assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_warnings_do_not_block(mut controller: FormController) {
		controller.add_validator(
			reporting("email", "looks unusual"),
			ValidatorOptions::new(ValidationLevel::Warning),
		);

		let report = controller.validate(&json!({})).await.unwrap();

		assert!(!report.is_blocking());
		assert_eq!(report.warnings.get("email"), Some(&json!("looks unusual")));
		assert!(report.errors.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_errors_block_and_merge(mut controller: FormController) {
		controller.add_validator(
			reporting("user.email", "required"),
			ValidatorOptions::default(),
		);
		controller.add_validator(
			reporting("user.name", "required"),
			ValidatorOptions::default(),
		);
		controller.add_validator(passing(), ValidatorOptions::default());

		let report = controller.validate(&json!({})).await.unwrap();

		assert!(report.is_blocking());
		assert_eq!(
			Value::from(report.errors),
			json!({ "user": { "email": "required", "name": "required" } })
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_validator_fault_propagates(mut controller: FormController) {
		controller.add_validator(
			Arc::new(|_values| async { Err(anyhow::anyhow!("broken schema")) }.boxed()),
			ValidatorOptions::default(),
		);

		let err = controller.validate(&json!({})).await.unwrap_err();

		assert_eq!(err.to_string(), "broken schema");
	}

	#[rstest]
	fn test_transformers_apply_in_order(mut controller: FormController) {
		controller.add_transformer(Arc::new(|mut values: Value| {
			values["steps"] = json!(["trim"]);
			Ok(values)
		}));
		controller.add_transformer(Arc::new(|mut values: Value| {
			if let Some(steps) = values["steps"].as_array_mut() {
				steps.push(json!("cast"));
			}
			Ok(values)
		}));

		let values = controller.transform(json!({})).unwrap();

		assert_eq!(values["steps"], json!(["trim", "cast"]));
	}

	#[rstest]
	#[tokio::test]
	async fn test_validate_transformed_sees_cast_values(mut controller: FormController) {
		controller.add_transformer(Arc::new(|mut values: Value| {
			if let Some(age) = values["age"].as_str().and_then(|raw| raw.parse::<u64>().ok()) {
				values["age"] = json!(age);
			}
			Ok(values)
		}));
		controller.add_validator(
			Arc::new(|values: Value| {
				async move {
					if values["age"].is_number() {
						Ok(None)
					} else {
						Ok(Some([("age", "must be a number")].into_iter().collect()))
					}
				}
				.boxed()
			}),
			ValidatorOptions::default(),
		);

		let (values, report) = controller
			.validate_transformed(json!({ "age": "36" }))
			.await
			.unwrap();

		assert_eq!(values, json!({ "age": 36 }));
		assert!(report.is_clean());
	}

	#[rstest]
	fn test_destroy_runs_callbacks_once(mut controller: FormController) {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		controller.extend(move |_form: &mut dyn FormHandle| {
			let counter = counter.clone();
			ExtenderHandler::with_destroy(move || {
				counter.fetch_add(1, Ordering::SeqCst);
			})
		});
		controller.setup();

		controller.destroy();
		controller.destroy();

		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
