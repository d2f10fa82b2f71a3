//! Submission request assembly

use crate::error::DispatchError;
use crate::form::FormSource;
use crate::resolution::{ShapedBody, resolve_encoding, resolve_method, shape_body};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use url::Url;

/// A request derived from a form's current state. Built once per submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
	pub url: Url,
	pub method: Method,
	pub headers: HeaderMap,
	pub body: Option<ShapedBody>,
}

impl SubmitRequest {
	/// Derives the request for `form`.
	///
	/// `GET` requests carry the shaped entries in the URL query and no body.
	/// Other methods carry the shaped body and, unless the encoding is
	/// multipart, a `Content-Type` equal to the effective encoding.
	///
	/// # Examples
	///
	/// ```
	/// use formulary_forms::{FormElement, HtmlForm, SubmitRequest};
	/// use http::Method;
	///
	/// let form = HtmlForm::new("https://example.com/search?page=2")
	///     .element(FormElement::text("q", "rust forms"));
	///
	/// let request = SubmitRequest::from_form(&form, "application/json").unwrap();
	///
	/// assert_eq!(request.method, Method::GET);
	/// assert_eq!(request.url.as_str(), "https://example.com/search?page=2&q=rust+forms");
	/// assert!(request.body.is_none());
	/// ```
	pub fn from_form<F>(form: &F, accept: &str) -> Result<Self, DispatchError>
	where
		F: FormSource + ?Sized,
	{
		let mut url = form.action()?;
		let method = resolve_method(form.method(), &url)?;
		let encoding = resolve_encoding(form.enctype(), form.has_file_input());
		tracing::debug!(
			"Resolved submission of {} as {} ({})",
			url,
			method,
			encoding
		);

		let mut headers = HeaderMap::new();
		headers.insert(ACCEPT, HeaderValue::from_str(accept)?);

		let body = shape_body(form.form_data(), &method, encoding);

		if method == Method::GET {
			if let ShapedBody::UrlEncoded(pairs) = body
				&& !pairs.is_empty()
			{
				url.query_pairs_mut().extend_pairs(pairs);
			}
			return Ok(Self {
				url,
				method,
				headers,
				body: None,
			});
		}

		if !encoding.is_multipart() {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static(encoding.as_str()));
		}

		Ok(Self {
			url,
			method,
			headers,
			body: Some(body),
		})
	}

	/// Value of the `Content-Type` header, if one is set.
	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
	}
}
