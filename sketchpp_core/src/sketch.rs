use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

/// One physical source file belonging to a sketch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
	/// The path the fragment was loaded from. This is the name written into
	/// line markers, so diagnostics point back at it verbatim.
	pub name: String,
	/// The full text of the fragment.
	pub source: String,
}

impl Fragment {
	pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			source: source.into(),
		}
	}
}

/// A user program made of one main fragment and zero or more satellite
/// fragments. The order of `other_files` decides the merge order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sketch {
	pub main_file: Fragment,
	#[serde(default)]
	pub other_files: Vec<Fragment>,
}

impl Sketch {
	pub fn new(main_file: Fragment) -> Self {
		Self {
			main_file,
			other_files: vec![],
		}
	}

	/// Append a satellite fragment after the existing ones.
	#[must_use]
	pub fn with_file(mut self, fragment: Fragment) -> Self {
		self.other_files.push(fragment);
		self
	}

	/// All fragments in merge order: the main fragment first.
	pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
		std::iter::once(&self.main_file).chain(self.other_files.iter())
	}

	/// The quoted name of every fragment, as it appears inside line markers.
	pub fn quoted_names(&self) -> HashSet<String> {
		self.fragments()
			.map(|fragment| quote_cpp_string(&fragment.name))
			.collect()
	}
}

/// Render `value` as a C string literal: wrapped in double quotes with
/// backslashes and double quotes escaped.
pub fn quote_cpp_string(value: &str) -> String {
	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push('"');

	for ch in value.chars() {
		match ch {
			'\\' => quoted.push_str("\\\\"),
			'"' => quoted.push_str("\\\""),
			_ => quoted.push(ch),
		}
	}

	quoted.push('"');
	quoted
}

/// Parse a C string literal at the start of `text`.
///
/// Returns the unescaped value and the text following the closing quote. A
/// backslash takes the next character verbatim. Returns `None` when `text`
/// does not start with `"` or the literal is never closed.
pub fn parse_cpp_string(text: &str) -> Option<(String, &str)> {
	let body = text.strip_prefix('"')?;
	let mut value = String::new();
	let mut chars = body.char_indices();

	while let Some((index, ch)) = chars.next() {
		match ch {
			'\\' => {
				let (_, escaped) = chars.next()?;
				value.push(escaped);
			}
			'"' => return Some((value, &body[index + 1..])),
			_ => value.push(ch),
		}
	}

	None
}
