//! Request transports
//!
//! A [`Transport`] performs the network call for a [`SubmitRequest`]. The
//! default [`ReqwestTransport`] is built on `reqwest`; tests and embedders can
//! provide their own implementation.

use crate::form_data::{FormData, FormDataValue};
use crate::request::SubmitRequest;
use crate::resolution::ShapedBody;
use async_trait::async_trait;
use bytes::Bytes;
use formulary_conf::SubmitSettings;
use reqwest::multipart::{Form, Part};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Raw response handed back by a transport.
pub type FetchResponse = http::Response<Bytes>;

/// Opaque error raised by a transport.
///
/// The original error is kept as-is and can be recovered with
/// [`TransportError::downcast_ref`].
#[derive(Debug)]
pub struct TransportError(Box<dyn StdError + Send + Sync>);

impl TransportError {
	pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
		Self(err.into())
	}

	pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
		self.0.downcast_ref::<E>()
	}

	pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
		self.0
	}
}

impl fmt::Display for TransportError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl StdError for TransportError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.0.source()
	}
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		Self::new(err)
	}
}

impl From<serde_urlencoded::ser::Error> for TransportError {
	fn from(err: serde_urlencoded::ser::Error) -> Self {
		Self::new(err)
	}
}

/// Performs the network call of a submission.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn fetch(&self, request: SubmitRequest) -> Result<FetchResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
	async fn fetch(&self, request: SubmitRequest) -> Result<FetchResponse, TransportError> {
		(**self).fetch(request).await
	}
}

/// Default transport backed by a `reqwest::Client`.
///
/// Url-encoded bodies are serialized with `serde_urlencoded`; multipart bodies
/// are streamed through `reqwest::multipart`, which attaches the boundary.
/// Headers of the request are applied last and replace any header reqwest set.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a client honouring the timeout and user agent of `settings`.
	pub fn from_settings(settings: &SubmitSettings) -> Result<Self, reqwest::Error> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = settings.timeout() {
			builder = builder.timeout(timeout);
		}
		if let Some(user_agent) = &settings.user_agent {
			builder = builder.user_agent(user_agent.as_str());
		}
		Ok(Self {
			client: builder.build()?,
		})
	}

	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}

	pub fn client(&self) -> &reqwest::Client {
		&self.client
	}
}

#[async_trait]
impl Transport for ReqwestTransport {
	async fn fetch(&self, request: SubmitRequest) -> Result<FetchResponse, TransportError> {
		let SubmitRequest {
			url,
			method,
			headers,
			body,
		} = request;

		let mut builder = self.client.request(method, url);
		match body {
			Some(ShapedBody::UrlEncoded(pairs)) => {
				builder = builder.body(serde_urlencoded::to_string(&pairs)?);
			}
			Some(ShapedBody::Multipart(data)) => {
				builder = builder.multipart(multipart_form(data)?);
			}
			None => {}
		}

		let response = builder.headers(headers).send().await?;

		let status = response.status();
		let version = response.version();
		let headers = response.headers().clone();
		let body = response.bytes().await?;

		let mut converted = http::Response::new(body);
		*converted.status_mut() = status;
		*converted.version_mut() = version;
		*converted.headers_mut() = headers;
		Ok(converted)
	}
}

fn multipart_form(data: FormData) -> Result<Form, reqwest::Error> {
	let mut form = Form::new();
	for (name, value) in data.into_entries() {
		form = match value {
			FormDataValue::Text(text) => form.text(name, text),
			FormDataValue::File(file) => {
				let part = Part::bytes(file.bytes.to_vec())
					.file_name(file.file_name)
					.mime_str(&file.content_type)?;
				form.part(name, part)
			}
		};
	}
	Ok(form)
}
