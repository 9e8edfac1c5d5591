use crate::comment_scanner::first_code_offset;
use crate::comment_scanner::trim_space_start;

/// Keyword that marks a build directive comment, e.g.
/// `// #arduino build.board=uno`.
pub const DEFAULT_DIRECTIVE_KEYWORD: &str = "#arduino";

/// Pulls `key=value` build configuration overrides out of the comment header
/// of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveExtractor {
	keyword: String,
}

impl Default for DirectiveExtractor {
	fn default() -> Self {
		Self::new(DEFAULT_DIRECTIVE_KEYWORD)
	}
}

impl DirectiveExtractor {
	pub fn new(keyword: impl Into<String>) -> Self {
		Self {
			keyword: keyword.into(),
		}
	}

	pub fn keyword(&self) -> &str {
		&self.keyword
	}

	/// Extract the directives declared before the first line of code in
	/// `text`, in textual order. Duplicates are kept.
	pub fn extract(&self, text: &str) -> Vec<String> {
		self.extract_before(text, first_code_offset(text))
	}

	/// Extract directives from lines starting strictly before `cutoff`. The
	/// cutoff must come from [`first_code_offset`] over the same, unmodified
	/// text.
	pub fn extract_before(&self, text: &str, cutoff: usize) -> Vec<String> {
		let mut directives = vec![];
		let mut line_start = 0;

		for line in text.split('\n') {
			let start = line_start;
			line_start += line.len() + 1;

			if start >= cutoff {
				break;
			}

			if let Some(directive) = self.match_line(line) {
				tracing::trace!(%directive, offset = start, "found build directive");
				directives.push(directive);
			}
		}

		tracing::debug!(cutoff, count = directives.len(), "extracted build directives");
		directives
	}

	/// Match `<ws>// <ws><keyword><ws>key=value` and return the trimmed
	/// remainder after the keyword.
	fn match_line(&self, line: &str) -> Option<String> {
		let rest = trim_space_start(line).strip_prefix("//")?;
		let rest = trim_space_start(rest).strip_prefix(self.keyword.as_str())?;

		if !rest.contains('=') {
			return None;
		}

		Some(rest.trim().to_string())
	}
}

/// Extract directives using the default `#arduino` keyword.
pub fn extract_directives(text: &str) -> Vec<String> {
	DirectiveExtractor::default().extract(text)
}
