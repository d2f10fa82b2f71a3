//! Form sources
//!
//! The dispatcher only reads forms through the [`FormSource`] trait. The
//! [`HtmlForm`] type is a plain-data implementation that mirrors an HTML
//! `<form>` element: its `method` and `enctype` attributes are normalised the
//! way browsers normalise them, and its serialization follows the form data
//! set rules (disabled and unnamed controls are skipped, unchecked
//! checkboxes contribute nothing, buttons are never included).
//!
//! ## Example
//!
//! ```
//! use formulary_forms::{FilePart, FormElement, FormSource, HtmlForm};
//!
//! let form = HtmlForm::new("https://example.com/profile?_method=put")
//!     .method("post")
//!     .element(FormElement::text("name", "Ada"))
//!     .element(FormElement::checkbox("newsletter", "yes", false))
//!     .element(FormElement::file(
//!         "avatar",
//!         vec![FilePart::new("ada.png", "image/png", vec![0x89, 0x50])],
//!     ));
//!
//! assert!(form.has_file_input());
//! let data = form.form_data();
//! assert_eq!(data.len(), 2);
//! assert!(data.get("newsletter").is_none());
//! ```

use crate::form_data::{FilePart, FormData};
use std::fmt;
use url::Url;

/// Normalised value of a form's `method` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormMethod {
	#[default]
	Get,
	Post,
	Dialog,
}

impl FormMethod {
	/// Normalises a raw attribute value. Missing or unknown values map to
	/// [`FormMethod::Get`].
	pub fn from_attribute(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"post" => Self::Post,
			"dialog" => Self::Dialog,
			_ => Self::Get,
		}
	}

	/// Lower-case attribute spelling.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "get",
			Self::Post => "post",
			Self::Dialog => "dialog",
		}
	}
}

impl fmt::Display for FormMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Normalised value of a form's `enctype` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Enctype {
	#[default]
	UrlEncoded,
	Multipart,
	TextPlain,
}

impl Enctype {
	pub const URL_ENCODED: &'static str = "application/x-www-form-urlencoded";
	pub const MULTIPART: &'static str = "multipart/form-data";
	pub const TEXT_PLAIN: &'static str = "text/plain";

	/// Normalises a raw attribute value. Missing or unknown values map to
	/// [`Enctype::UrlEncoded`].
	pub fn from_attribute(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			Self::MULTIPART => Self::Multipart,
			Self::TEXT_PLAIN => Self::TextPlain,
			_ => Self::UrlEncoded,
		}
	}

	/// MIME type string.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::UrlEncoded => Self::URL_ENCODED,
			Self::Multipart => Self::MULTIPART,
			Self::TextPlain => Self::TEXT_PLAIN,
		}
	}

	pub fn is_multipart(&self) -> bool {
		matches!(self, Self::Multipart)
	}
}

impl fmt::Display for Enctype {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Read-only view of a form used by the submission dispatcher.
pub trait FormSource: Send + Sync {
	/// Absolute action URL.
	fn action(&self) -> Result<Url, url::ParseError>;

	/// Declared HTML method.
	fn method(&self) -> FormMethod;

	/// Declared encoding type.
	fn enctype(&self) -> Enctype;

	/// Returns true when the form contains at least one file-type control.
	fn has_file_input(&self) -> bool;

	/// Serializes the form's controls.
	fn form_data(&self) -> FormData;
}

/// Kind of a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
	/// Textual `<input>` (`text`, `email`, `hidden`, `number`, ...).
	Input(String),
	Checkbox,
	Radio,
	File,
	Textarea,
	Select,
	/// `submit`, `reset`, `button` and `image` controls.
	Button,
}

impl ElementKind {
	/// Maps an `<input type>` value to its kind.
	pub fn from_input_type(input_type: &str) -> Self {
		let input_type = input_type.trim().to_ascii_lowercase();
		match input_type.as_str() {
			"checkbox" => Self::Checkbox,
			"radio" => Self::Radio,
			"file" => Self::File,
			"submit" | "reset" | "button" | "image" => Self::Button,
			"" => Self::Input("text".to_string()),
			_ => Self::Input(input_type),
		}
	}
}

/// A single control of an [`HtmlForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormElement {
	pub name: String,
	pub kind: ElementKind,
	/// Current value(s). Selects may carry several selected values.
	pub values: Vec<String>,
	/// Chosen files of a file control.
	pub files: Vec<FilePart>,
	pub checked: bool,
	pub disabled: bool,
}

impl FormElement {
	fn new(name: impl Into<String>, kind: ElementKind, values: Vec<String>) -> Self {
		Self {
			name: name.into(),
			kind,
			values,
			files: Vec::new(),
			checked: false,
			disabled: false,
		}
	}

	/// An `<input>` of the given type.
	pub fn input(input_type: &str, name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(
			name,
			ElementKind::from_input_type(input_type),
			vec![value.into()],
		)
	}

	pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::input("text", name, value)
	}

	pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::input("hidden", name, value)
	}

	pub fn textarea(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(name, ElementKind::Textarea, vec![value.into()])
	}

	pub fn checkbox(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
		Self {
			checked,
			..Self::new(name, ElementKind::Checkbox, vec![value.into()])
		}
	}

	pub fn radio(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
		Self {
			checked,
			..Self::new(name, ElementKind::Radio, vec![value.into()])
		}
	}

	/// A `<select>` with the given selected values.
	pub fn select<I, S>(name: impl Into<String>, selected: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(
			name,
			ElementKind::Select,
			selected.into_iter().map(Into::into).collect(),
		)
	}

	/// An `<input type="file">` with the chosen files.
	pub fn file(name: impl Into<String>, files: Vec<FilePart>) -> Self {
		Self {
			files,
			..Self::new(name, ElementKind::File, Vec::new())
		}
	}

	/// A submit button. Buttons are never serialized.
	pub fn submit(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::input("submit", name, value)
	}

	/// Marks the control as disabled.
	pub fn disabled(mut self) -> Self {
		self.disabled = true;
		self
	}

	pub fn is_file(&self) -> bool {
		self.kind == ElementKind::File
	}

	/// Appends the entries this control contributes to `data`.
	fn write_to(&self, data: &mut FormData) {
		if self.disabled || self.name.is_empty() {
			return;
		}
		match &self.kind {
			ElementKind::Button => {}
			ElementKind::Checkbox | ElementKind::Radio => {
				if self.checked {
					let value = self.values.first().map_or("on", String::as_str);
					data.append(self.name.clone(), value);
				}
			}
			ElementKind::File => {
				if self.files.is_empty() {
					data.append(self.name.clone(), FilePart::empty());
				}
				for file in &self.files {
					data.append(self.name.clone(), file.clone());
				}
			}
			ElementKind::Select => {
				for value in &self.values {
					data.append(self.name.clone(), value.clone());
				}
			}
			ElementKind::Input(_) | ElementKind::Textarea => {
				let value = self.values.first().cloned().unwrap_or_default();
				data.append(self.name.clone(), value);
			}
		}
	}
}

/// Plain-data form mirroring an HTML `<form>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlForm {
	action: String,
	base_url: Option<Url>,
	method: FormMethod,
	enctype: Enctype,
	elements: Vec<FormElement>,
}

impl HtmlForm {
	/// Creates a `get`, url-encoded form targeting `action`.
	pub fn new(action: impl Into<String>) -> Self {
		Self {
			action: action.into(),
			..Self::default()
		}
	}

	/// Base URL used to resolve a relative action, like a document URL.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);
		self
	}

	/// Sets the raw `method` attribute.
	pub fn method(mut self, method: &str) -> Self {
		self.method = FormMethod::from_attribute(method);
		self
	}

	/// Sets the raw `enctype` attribute.
	pub fn enctype(mut self, enctype: &str) -> Self {
		self.enctype = Enctype::from_attribute(enctype);
		self
	}

	pub fn element(mut self, element: FormElement) -> Self {
		self.elements.push(element);
		self
	}

	pub fn elements(&self) -> &[FormElement] {
		&self.elements
	}

	pub fn elements_mut(&mut self) -> &mut Vec<FormElement> {
		&mut self.elements
	}
}

impl FormSource for HtmlForm {
	fn action(&self) -> Result<Url, url::ParseError> {
		match &self.base_url {
			Some(base) => base.join(&self.action),
			None => Url::parse(&self.action),
		}
	}

	fn method(&self) -> FormMethod {
		self.method
	}

	fn enctype(&self) -> Enctype {
		self.enctype
	}

	fn has_file_input(&self) -> bool {
		self.elements.iter().any(FormElement::is_file)
	}

	fn form_data(&self) -> FormData {
		let mut data = FormData::new();
		for element in &self.elements {
			element.write_to(&mut data);
		}
		data
	}
}
