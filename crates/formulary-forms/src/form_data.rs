//! Ordered multi-value form data
//!
//! [`FormData`] keeps entries in insertion order and allows the same name to
//! appear several times, exactly like a serialized HTML form.

use bytes::Bytes;

/// Content type used for files without a declared type.
pub const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// A file selected in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
	pub file_name: String,
	pub content_type: String,
	pub bytes: Bytes,
}

impl FilePart {
	pub fn new(
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		bytes: impl Into<Bytes>,
	) -> Self {
		Self {
			file_name: file_name.into(),
			content_type: content_type.into(),
			bytes: bytes.into(),
		}
	}

	/// The placeholder submitted for a file input with no file chosen.
	pub fn empty() -> Self {
		Self::new("", DEFAULT_FILE_CONTENT_TYPE, Bytes::new())
	}
}

/// Value of a single form data entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataValue {
	Text(String),
	File(FilePart),
}

impl FormDataValue {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::File(_) => None,
		}
	}

	pub fn as_file(&self) -> Option<&FilePart> {
		match self {
			Self::Text(_) => None,
			Self::File(file) => Some(file),
		}
	}

	/// Value used when the entry is url-encoded. Files contribute their name.
	pub fn to_url_encoded(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::File(file) => file.file_name.clone(),
		}
	}
}

impl From<&str> for FormDataValue {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for FormDataValue {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<FilePart> for FormDataValue {
	fn from(file: FilePart) -> Self {
		Self::File(file)
	}
}

/// Key-ordered multi-value form data.
///
/// # Examples
///
/// ```
/// use formulary_forms::FormData;
///
/// let mut data = FormData::new();
/// data.append("tag", "rust");
/// data.append("tag", "forms");
/// data.append("title", "Hello");
///
/// assert_eq!(data.len(), 3);
/// assert_eq!(data.get_all("tag").count(), 2);
/// assert_eq!(
///     data.to_url_encoded_pairs()[0],
///     ("tag".to_string(), "rust".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
	entries: Vec<(String, FormDataValue)>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an entry, keeping any existing entries with the same name.
	pub fn append(&mut self, name: impl Into<String>, value: impl Into<FormDataValue>) {
		self.entries.push((name.into(), value.into()));
	}

	/// First value stored under `name`.
	pub fn get(&self, name: &str) -> Option<&FormDataValue> {
		self.get_all(name).next()
	}

	/// Every value stored under `name`, in insertion order.
	pub fn get_all<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a FormDataValue> + use<'a, 'b> {
		self.entries
			.iter()
			.filter(move |(key, _)| key == name)
			.map(|(_, value)| value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FormDataValue)> {
		self.entries
			.iter()
			.map(|(name, value)| (name.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns true when at least one entry is a file.
	pub fn has_files(&self) -> bool {
		self.entries
			.iter()
			.any(|(_, value)| matches!(value, FormDataValue::File(_)))
	}

	/// Converts the entries into ordered query-string pairs.
	pub fn to_url_encoded_pairs(&self) -> Vec<(String, String)> {
		self.entries
			.iter()
			.map(|(name, value)| (name.clone(), value.to_url_encoded()))
			.collect()
	}

	pub fn into_entries(self) -> Vec<(String, FormDataValue)> {
		self.entries
	}
}

impl<K, V> FromIterator<(K, V)> for FormData
where
	K: Into<String>,
	V: Into<FormDataValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut data = Self::new();
		for (name, value) in iter {
			data.append(name, value);
		}
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_get_returns_first_value() {
		let data: FormData = [("a", "1"), ("a", "2")].into_iter().collect();

		assert_eq!(data.get("a").and_then(FormDataValue::as_text), Some("1"));
		assert_eq!(data.get("missing"), None);
	}

	#[rstest]
	fn test_files_url_encode_to_file_name() {
		let mut data = FormData::new();
		data.append("title", "Report");
		data.append("attachment", FilePart::new("report.pdf", "application/pdf", "%PDF"));

		assert!(data.has_files());
		assert_eq!(
			data.to_url_encoded_pairs(),
			vec![
				("title".to_string(), "Report".to_string()),
				("attachment".to_string(), "report.pdf".to_string()),
			]
		);
	}

	#[rstest]
	fn test_empty_file_placeholder() {
		let file = FilePart::empty();

		assert_eq!(file.file_name, "");
		assert_eq!(file.content_type, DEFAULT_FILE_CONTENT_TYPE);
		assert!(file.bytes.is_empty());
	}

	#[rstest]
	fn test_insertion_order_is_kept() {
		let data: FormData = [("b", "1"), ("a", "2"), ("b", "3")].into_iter().collect();

		let names: Vec<&str> = data.iter().map(|(name, _)| name).collect();
		assert_eq!(names, vec!["b", "a", "b"]);
	}
}
