//! Method and encoding resolution, body shaping

use crate::error::DispatchError;
use crate::form::{Enctype, FormMethod};
use crate::form_data::FormData;
use http::Method;
use url::Url;

/// Query parameter of the action URL that overrides the HTTP method.
pub const METHOD_OVERRIDE_PARAM: &str = "_method";

/// Body of a submission, shaped once from the form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapedBody {
	/// Query-string shaped pairs.
	UrlEncoded(Vec<(String, String)>),
	/// Multi-part capable form data.
	Multipart(FormData),
}

impl ShapedBody {
	pub fn is_multipart(&self) -> bool {
		matches!(self, Self::Multipart(_))
	}
}

/// Resolves the effective HTTP method.
///
/// A declared `get` always dispatches `GET`. Any other declared method can be
/// overridden by a non-empty `_method` query parameter on the action URL.
/// The resulting token is upper-cased.
///
/// # Examples
///
/// ```
/// use formulary_forms::{FormMethod, resolve_method};
/// use http::Method;
/// use url::Url;
///
/// let action = Url::parse("https://example.com/posts/1?_method=delete").unwrap();
/// assert_eq!(resolve_method(FormMethod::Post, &action).unwrap(), Method::DELETE);
/// assert_eq!(resolve_method(FormMethod::Get, &action).unwrap(), Method::GET);
/// ```
pub fn resolve_method(declared: FormMethod, action: &Url) -> Result<Method, DispatchError> {
	if declared == FormMethod::Get {
		return Ok(Method::GET);
	}

	let token = action
		.query_pairs()
		.find(|(name, _)| name == METHOD_OVERRIDE_PARAM)
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.is_empty())
		.unwrap_or_else(|| declared.as_str().to_string());

	Method::from_bytes(token.to_ascii_uppercase().as_bytes())
		.map_err(|_| DispatchError::InvalidMethod(token))
}

/// Resolves the effective encoding. Any file input forces multipart.
pub fn resolve_encoding(declared: Enctype, has_file_input: bool) -> Enctype {
	if has_file_input {
		Enctype::Multipart
	} else {
		declared
	}
}

/// Chooses the body shape for the effective method and encoding.
pub fn shape_body(data: FormData, method: &Method, encoding: Enctype) -> ShapedBody {
	if *method == Method::GET || encoding == Enctype::UrlEncoded {
		ShapedBody::UrlEncoded(data.to_url_encoded_pairs())
	} else {
		ShapedBody::Multipart(data)
	}
}
