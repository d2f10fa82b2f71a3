//! Form submission dispatcher
//!
//! Turns a form's current state into an HTTP request and sends it:
//!
//! - **Method resolution**: `get` forms always use `GET`; other forms honour a
//!   `_method` query parameter on the action URL.
//! - **Encoding resolution**: any file input forces `multipart/form-data`.
//! - **Request assembly**: `GET` requests carry the fields in the query string;
//!   other requests carry a url-encoded or multipart body.
//! - **Classification**: 2xx responses succeed; anything else becomes a
//!   [`SubmitError`] carrying the raw response.
//!
//! ## Example
//!
//! ```no_run
//! use formulary_forms::{FormElement, HtmlForm, ReqwestTransport, create_submit_handler};
//!
//! # async fn run() -> Result<(), formulary_forms::DispatchError> {
//! let form = HtmlForm::new("https://example.com/articles/7?_method=patch")
//!     .method("post")
//!     .element(FormElement::text("title", "Hello"));
//!
//! if let Some(handler) = create_submit_handler(Some(form), ReqwestTransport::new()) {
//!     let success = handler.submit().await?;
//!     println!("saved: {}", success.status());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod form;
pub mod form_data;
pub mod handler;
pub mod request;
pub mod resolution;
pub mod transport;

pub use error::{DispatchError, SUBMIT_ERROR_MESSAGE, SubmitError};
pub use form::{ElementKind, Enctype, FormElement, FormMethod, FormSource, HtmlForm};
pub use form_data::{DEFAULT_FILE_CONTENT_TYPE, FilePart, FormData, FormDataValue};
pub use handler::{SubmitHandler, SubmitOutcome, SuccessResponse, create_submit_handler};
pub use request::SubmitRequest;
pub use resolution::{
	METHOD_OVERRIDE_PARAM, ShapedBody, resolve_encoding, resolve_method, shape_body,
};
pub use transport::{FetchResponse, ReqwestTransport, Transport, TransportError};
