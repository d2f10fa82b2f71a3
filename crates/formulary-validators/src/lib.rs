//! Schema validation for formulary forms
//!
//! Plugs an external schema object into a form controller's lifecycle:
//!
//! - [`validate_schema`] wraps a [`Schema`] into a validation function that
//!   reports violations as an [`ErrorTree`](formulary_core::ErrorTree)
//! - [`validator`] builds a [`SchemaValidator`] extender that registers that
//!   function, and optionally a value-casting transformer, during setup
//!
//! Schema libraries are integrated by implementing [`Schema`].

pub mod adapter;
pub mod extender;
pub mod schema;

pub use adapter::{shape_errors, validate_schema};
pub use extender::{SchemaValidator, ValidatorConfig, validator};
pub use schema::{Schema, SchemaError, ValidateOptions, ValidationFailure, Violation};
