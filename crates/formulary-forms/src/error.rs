//! Dispatch errors

use crate::transport::{FetchResponse, TransportError};
use http::StatusCode;

/// Message carried by every [`SubmitError`].
pub const SUBMIT_ERROR_MESSAGE: &str = "An error occurred while submitting the form";

/// A submission that reached the server but was answered with a non-success
/// status. The raw response is kept for inspection.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SubmitError {
	pub message: String,
	pub response: FetchResponse,
}

impl SubmitError {
	pub fn new(response: FetchResponse) -> Self {
		Self {
			message: SUBMIT_ERROR_MESSAGE.to_string(),
			response,
		}
	}

	pub fn status(&self) -> StatusCode {
		self.response.status()
	}
}

/// Error returned by [`SubmitHandler::submit`](crate::SubmitHandler::submit).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
	/// The server answered with a non-success status.
	#[error(transparent)]
	Rejected(#[from] SubmitError),

	/// The transport failed before a response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error("Invalid form action: {0}")]
	InvalidAction(#[from] url::ParseError),

	#[error("Invalid HTTP method: {0}")]
	InvalidMethod(String),

	#[error("Invalid header value: {0}")]
	InvalidHeader(#[from] http::header::InvalidHeaderValue),
}

impl DispatchError {
	/// The rejected submission, if the server answered.
	pub fn as_submit_error(&self) -> Option<&SubmitError> {
		match self {
			Self::Rejected(err) => Some(err),
			_ => None,
		}
	}

	/// The transport failure, if no response was received.
	pub fn as_transport_error(&self) -> Option<&TransportError> {
		match self {
			Self::Transport(err) => Some(err),
			_ => None,
		}
	}
}
