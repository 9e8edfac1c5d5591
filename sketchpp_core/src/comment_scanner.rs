/// Classification of a single fragment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
	/// Empty or whitespace only.
	Blank,
	/// `// ...` with optional leading whitespace.
	LineComment,
	/// `/* ... */` opened and closed on the same line with nothing but
	/// whitespace after the close.
	BlockComment,
	/// `/* ...` opening a block comment that continues on later lines.
	BlockCommentOpen,
	/// `... */` closing the block comment currently open.
	BlockCommentClose,
	/// Any line inside an open block comment.
	InsideBlockComment,
	/// Real code.
	Code,
}

impl LineKind {
	pub fn is_code(self) -> bool {
		self == Self::Code
	}
}

/// Line-by-line state machine separating leading comments from code.
///
/// The only state carried between lines is whether a block comment is open.
#[derive(Debug, Default, Clone)]
pub struct CommentScanner {
	inside_block_comment: bool,
}

impl CommentScanner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether the lines fed so far left a block comment open.
	pub fn is_inside_block_comment(&self) -> bool {
		self.inside_block_comment
	}

	/// Classify one line (without its terminating `\n`) and advance the state.
	pub fn classify(&mut self, line: &str) -> LineKind {
		let leading = trim_space_start(line);

		if leading.is_empty() {
			return LineKind::Blank;
		}

		if leading.starts_with("//") {
			return LineKind::LineComment;
		}

		if is_self_contained_block_comment(leading) {
			return LineKind::BlockComment;
		}

		if let Some(after_open) = leading.strip_prefix("/*") {
			if !self.inside_block_comment && after_open.contains("*/") {
				return LineKind::Code;
			}

			self.inside_block_comment = true;
			return LineKind::BlockCommentOpen;
		}

		if self.inside_block_comment {
			if trim_space_end(line).ends_with("*/") {
				self.inside_block_comment = false;
				return LineKind::BlockCommentClose;
			}

			return LineKind::InsideBlockComment;
		}

		LineKind::Code
	}
}

/// Return the offset where real code begins in `text`.
///
/// The offset is the summed byte length of every line before the first code
/// line, not counting the `\n` separators. It is meant as a cutoff to compare
/// match positions against and is not guaranteed to land on a line boundary.
/// When no code line exists (including an unterminated block comment) the
/// sum covers every line.
pub fn first_code_offset(text: &str) -> usize {
	let mut scanner = CommentScanner::new();
	let mut offset = 0;

	for line in text.split('\n') {
		if scanner.classify(line).is_code() {
			break;
		}

		offset += line.len();
	}

	tracing::trace!(offset, unterminated = scanner.is_inside_block_comment(), "first code offset");
	offset
}

/// `/*`, anything, `*/`, then only whitespace. The open and close markers may
/// not overlap, so `/*/` is not a complete comment.
fn is_self_contained_block_comment(leading: &str) -> bool {
	let trimmed = trim_space_end(leading);
	trimmed.len() >= 4 && trimmed.starts_with("/*") && trimmed.ends_with("*/")
}

pub(crate) fn is_space(ch: char) -> bool {
	ch.is_ascii_whitespace()
}

pub(crate) fn trim_space_start(text: &str) -> &str {
	text.trim_start_matches(is_space)
}

pub(crate) fn trim_space_end(text: &str) -> &str {
	text.trim_end_matches(is_space)
}
