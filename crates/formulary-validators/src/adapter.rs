//! Schema validation adapter

use crate::schema::{Schema, SchemaError, ValidateOptions, ValidationFailure};
use formulary_core::{ErrorTree, FormValues, ValidationFn};
use futures::FutureExt;
use std::sync::Arc;

/// Folds the violations of a failed run into an [`ErrorTree`].
///
/// Violations without a path are dropped. A later violation on the same path
/// replaces an earlier one.
///
/// # Examples
///
/// ```
/// use formulary_validators::{ValidationFailure, Violation, shape_errors};
/// use serde_json::json;
///
/// let failure = ValidationFailure::new(vec![
///     Violation::at("user.email", "must be a valid email"),
///     Violation::root("form is invalid"),
/// ]);
///
/// assert_eq!(
///     serde_json::Value::from(shape_errors(&failure)),
///     json!({ "user": { "email": "must be a valid email" } })
/// );
/// ```
pub fn shape_errors(failure: &ValidationFailure) -> ErrorTree {
	failure
		.inner
		.iter()
		.fold(ErrorTree::new(), |mut tree, violation| {
			if let Some(path) = &violation.path {
				tree.set(path, violation.message.clone());
			}
			tree
		})
}

/// Builds a validation function backed by `schema`.
///
/// The schema runs with `options`, or with [`ValidateOptions::default`]
/// (strict, collecting every violation) when none are given. Valid values
/// resolve to `Ok(None)`, invalid ones to `Ok(Some(tree))`. Only a
/// [`SchemaError::Fault`] resolves to `Err`.
pub fn validate_schema(schema: Arc<dyn Schema>, options: Option<ValidateOptions>) -> ValidationFn {
	let options = options.unwrap_or_default();
	Arc::new(move |values: FormValues| {
		let schema = Arc::clone(&schema);
		let options = options.clone();
		async move {
			match schema.validate(&values, &options).await {
				Ok(_) => Ok(None),
				Err(SchemaError::Invalid(failure)) => {
					tracing::debug!(
						violations = failure.inner.len(),
						"schema validation failed"
					);
					Ok(Some(shape_errors(&failure)))
				}
				Err(err @ SchemaError::Fault(_)) => Err(anyhow::Error::from(err)),
			}
		}
		.boxed()
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::Violation;
	use async_trait::async_trait;
	use mockall::mock;
	use mockall::predicate::eq;
	use rstest::rstest;
	use serde_json::{Value, json};

	mock! {
		pub AccountSchema {}

		#[async_trait]
		impl Schema for AccountSchema {
			async fn validate(&self, values: &Value, options: &ValidateOptions) -> Result<Value, SchemaError>;
			fn cast(&self, values: Value) -> Result<Value, SchemaError>;
		}
	}

	fn failing(violations: Vec<Violation>) -> MockAccountSchema {
		let mut schema = MockAccountSchema::new();
		schema
			.expect_validate()
			.returning(move |_, _| Err(ValidationFailure::new(violations.clone()).into()));
		schema
	}

	#[rstest]
	#[tokio::test]
	async fn test_valid_values_resolve_to_none() {
		let mut schema = MockAccountSchema::new();
		schema
			.expect_validate()
			.with(eq(json!({ "name": "Ada" })), eq(ValidateOptions::default()))
			.times(1)
			.returning(|values, _| Ok(values.clone()));

		let validate = validate_schema(Arc::new(schema), None);

		assert_eq!(validate(json!({ "name": "Ada" })).await.unwrap(), None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_nested_violation_mirrors_path() {
		let schema = failing(vec![Violation::at("user.email", "must be a valid email")]);

		let validate = validate_schema(Arc::new(schema), None);
		let tree = validate(json!({ "user": { "email": "nope" } }))
			.await
			.unwrap()
			.unwrap();

		assert_eq!(
			Value::from(tree),
			json!({ "user": { "email": "must be a valid email" } })
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_pathless_violations_are_dropped() {
		let schema = failing(vec![
			Violation::root("object is invalid"),
			Violation::at("", "empty path"),
			Violation::at("name", "is required"),
		]);

		let validate = validate_schema(Arc::new(schema), None);
		let tree = validate(json!({})).await.unwrap().unwrap();

		assert_eq!(Value::from(tree), json!({ "name": "is required" }));
	}

	#[rstest]
	#[tokio::test]
	async fn test_only_pathless_violations_give_empty_tree() {
		let schema = failing(vec![Violation::root("object is invalid")]);

		let validate = validate_schema(Arc::new(schema), None);
		let tree = validate(json!({})).await.unwrap().unwrap();

		assert!(tree.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_caller_options_replace_defaults() {
		let options = ValidateOptions {
			strict: false,
			abort_early: true,
			..ValidateOptions::default()
		};
		let mut schema = MockAccountSchema::new();
		schema
			.expect_validate()
			.withf(|_, options| !options.strict && options.abort_early)
			.times(1)
			.returning(|values, _| Ok(values.clone()));

		let validate = validate_schema(Arc::new(schema), Some(options));

		assert!(validate(json!({})).await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_fault_is_an_error() {
		let mut schema = MockAccountSchema::new();
		schema
			.expect_validate()
			.returning(|_, _| Err(SchemaError::Fault("unknown rule `emial`".to_string())));

		let validate = validate_schema(Arc::new(schema), None);
		let err = validate(json!({})).await.unwrap_err();

		assert_eq!(err.to_string(), "Schema fault: unknown rule `emial`");
		assert!(matches!(
			err.downcast_ref::<SchemaError>(),
			Some(SchemaError::Fault(_))
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_function_can_run_repeatedly() {
		let mut schema = MockAccountSchema::new();
		schema
			.expect_validate()
			.times(2)
			.returning(|values, _| Ok(values.clone()));

		let validate = validate_schema(Arc::new(schema), None);

		assert!(validate(json!({ "n": 1 })).await.unwrap().is_none());
		assert!(validate(json!({ "n": 2 })).await.unwrap().is_none());
	}

	#[rstest]
	fn test_shape_errors_last_message_wins() {
		let failure = ValidationFailure::new(vec![
			Violation::at("items[0].qty", "must be positive"),
			Violation::at("items[0].qty", "must be an integer"),
		]);

		assert_eq!(
			Value::from(shape_errors(&failure)),
			json!({ "items": [{ "qty": "must be an integer" }] })
		);
	}
}
