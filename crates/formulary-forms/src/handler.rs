//! Submission handler

use crate::error::{DispatchError, SubmitError};
use crate::form::FormSource;
use crate::request::SubmitRequest;
use crate::transport::{FetchResponse, Transport};
use bytes::Bytes;
use formulary_conf::SubmitSettings;
use http::StatusCode;

/// Successful submission.
#[derive(Debug)]
pub struct SuccessResponse {
	pub response: FetchResponse,
}

impl SuccessResponse {
	pub fn status(&self) -> StatusCode {
		self.response.status()
	}

	pub fn body(&self) -> &Bytes {
		self.response.body()
	}

	pub fn into_response(self) -> FetchResponse {
		self.response
	}
}

/// Result of a single submission.
pub type SubmitOutcome = Result<SuccessResponse, DispatchError>;

/// Creates a submit handler for `form`.
///
/// Without a form there is nothing to submit and `None` is returned.
///
/// # Examples
///
/// ```
/// use formulary_forms::{HtmlForm, ReqwestTransport, create_submit_handler};
///
/// let disabled = create_submit_handler(None::<HtmlForm>, ReqwestTransport::new());
/// assert!(disabled.is_none());
///
/// let form = HtmlForm::new("https://example.com/contact").method("post");
/// assert!(create_submit_handler(Some(form), ReqwestTransport::new()).is_some());
/// ```
pub fn create_submit_handler<F, T>(form: Option<F>, transport: T) -> Option<SubmitHandler<F, T>>
where
	F: FormSource,
	T: Transport,
{
	form.map(|form| SubmitHandler::new(form, transport))
}

/// Dispatches a form's current state through a [`Transport`].
#[derive(Debug, Clone)]
pub struct SubmitHandler<F, T> {
	form: F,
	transport: T,
	settings: SubmitSettings,
}

impl<F, T> SubmitHandler<F, T>
where
	F: FormSource,
	T: Transport,
{
	pub fn new(form: F, transport: T) -> Self {
		Self {
			form,
			transport,
			settings: SubmitSettings::default(),
		}
	}

	/// Replaces the submission settings. Only `accept` is read here; the
	/// timeout and user agent belong to the transport.
	pub fn with_settings(mut self, settings: SubmitSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn form(&self) -> &F {
		&self.form
	}

	pub fn form_mut(&mut self) -> &mut F {
		&mut self.form
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub fn settings(&self) -> &SubmitSettings {
		&self.settings
	}

	/// Builds the request from the form's current state, sends it and
	/// classifies the response.
	///
	/// Any 2xx status is a success. Other statuses yield
	/// [`DispatchError::Rejected`]; transport failures are returned unchanged
	/// as [`DispatchError::Transport`].
	pub async fn submit(&self) -> SubmitOutcome {
		let request = SubmitRequest::from_form(&self.form, &self.settings.accept)?;
		let method = request.method.clone();
		let url = request.url.clone();

		let response = self.transport.fetch(request).await?;
		let status = response.status();

		if status.is_success() {
			tracing::debug!("{} {} succeeded with {}", method, url, status);
			Ok(SuccessResponse { response })
		} else {
			tracing::warn!("{} {} was rejected with {}", method, url, status);
			Err(SubmitError::new(response).into())
		}
	}
}
