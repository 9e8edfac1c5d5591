use serde::Serialize;

use crate::parse_cpp_string;
use crate::quote_cpp_string;

/// A preprocessor line marker such as `# 12 "sketch.ino" 2`, asserting that
/// the following lines originate at `line_number` of `filename`.
///
/// The grammar is the one gcc documents for its preprocessed output:
/// `# <line> "<file>" [flags...]`. The `#line <n> "<file>"` form written by
/// the merger is recognized as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMarker {
	/// The leading token, verbatim (`#` or `#line`).
	pub directive: String,
	pub line_number: i64,
	/// The line up to the opening quote of the filename, verbatim. Keeps the
	/// line number token and its separators exactly as written.
	pub prefix: String,
	/// The unescaped filename.
	pub filename: String,
	/// Everything after the closing quote of the filename, verbatim.
	pub flags: String,
	/// Whether the last whitespace separated token after the line number is
	/// an integer. This stands in for the "returning to file" flag that
	/// compilers append when an include ends.
	pub is_return_marker: bool,
}

impl LineMarker {
	/// Render the marker with a freshly quoted filename. Only the filename is
	/// rewritten. When `strip_flags` is set, everything after it is dropped.
	pub fn render(&self, strip_flags: bool) -> String {
		let filename = quote_cpp_string(&self.filename);

		if strip_flags {
			format!("{}{filename}", self.prefix)
		} else {
			format!("{}{filename}{}", self.prefix, self.flags)
		}
	}
}

/// Parse `line` as a line marker. Anything that does not follow the grammar
/// returns `None` and should be treated as ordinary content.
pub fn parse_line_marker(line: &str) -> Option<LineMarker> {
	let (directive, rest) = split_token(line)?;
	if !directive.starts_with('#') {
		return None;
	}

	let (number, remainder) = split_token(rest)?;
	let line_number = number.parse::<i64>().ok()?;

	if remainder.is_empty() {
		return None;
	}

	let is_return_marker = remainder
		.split_ascii_whitespace()
		.last()
		.is_some_and(|token| token.parse::<i64>().is_ok());

	let prefix = &line[..line.len() - remainder.len()];
	let (filename, flags) = parse_cpp_string(remainder)?;
	if !(flags.is_empty() || flags.starts_with(is_blank)) {
		return None;
	}

	Some(LineMarker {
		directive: directive.to_string(),
		line_number,
		prefix: prefix.to_string(),
		filename,
		flags: flags.to_string(),
		is_return_marker,
	})
}

/// Split off the first token at a run of spaces or tabs.
fn split_token(text: &str) -> Option<(&str, &str)> {
	let (token, rest) = text.split_once(is_blank)?;
	Some((token, rest.trim_start_matches(is_blank)))
}

fn is_blank(ch: char) -> bool {
	ch == ' ' || ch == '\t'
}
