use serde::Serialize;

use crate::Fragment;
use crate::Sketch;
use crate::comment_scanner::trim_space_start;
use crate::quote_cpp_string;

/// An `#include` line recorded together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeRecord {
	/// The full physical line containing the include, verbatim.
	pub content: String,
	/// Name of the fragment the include was found in.
	pub origin_file: String,
	/// 1-indexed line of the first physical line containing the include.
	pub origin_line: usize,
	/// `# <origin_line> "<origin_file>"`, placed ahead of `content` when the
	/// include is restored.
	pub line_marker: String,
}

/// An include directive matched at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeDirective<'a> {
	/// The line text from its start through the closing delimiter.
	pub matched: &'a str,
	/// The header path between the delimiters.
	pub path: &'a str,
}

/// Match `<ws>#<ws>include<ws>` followed by a header delimited by `<` or `"`
/// and closed by the first `>` or `"`.
pub fn match_include(line: &str) -> Option<IncludeDirective<'_>> {
	let rest = trim_space_start(line).strip_prefix('#')?;
	let rest = trim_space_start(rest).strip_prefix("include")?;
	let rest = trim_space_start(rest);
	let path_and_rest = rest.strip_prefix(['<', '"'])?;
	let path_len = path_and_rest.find(['>', '"'])?;

	let path = &path_and_rest[..path_len];
	let matched_len = line.len() - path_and_rest.len() + path_len + 1;

	Some(IncludeDirective {
		matched: &line[..matched_len],
		path,
	})
}

/// Whether `text` has a line including `header`, in either delimiter style.
/// The comparison is case sensitive.
pub fn sketch_includes_header(text: &str, header: &str) -> bool {
	text.split('\n')
		.filter_map(match_include)
		.any(|include| include.path == header)
}

/// The line injected when a sketch does not include its platform header.
pub fn default_include_line(header: &str) -> String {
	format!("#include <{header}>\n")
}

/// Record every include directive in `fragment`.
///
/// Each match is attributed to the first physical line that contains its
/// trimmed text, so repeated identical includes all point at the first one.
pub fn extract_includes(fragment: &Fragment) -> Vec<IncludeRecord> {
	let lines: Vec<&str> = fragment.source.split('\n').collect();
	let quoted_name = quote_cpp_string(&fragment.name);
	let mut records = vec![];

	for line in &lines {
		let Some(include) = match_include(line) else {
			continue;
		};

		let needle = include.matched.trim();
		let Some(index) = lines.iter().position(|candidate| candidate.contains(needle)) else {
			continue;
		};

		let origin_line = index + 1;
		records.push(IncludeRecord {
			content: lines[index].to_string(),
			origin_file: fragment.name.clone(),
			origin_line,
			line_marker: format!("# {origin_line} {quoted_name}"),
		});
	}

	tracing::debug!(fragment = %fragment.name, count = records.len(), "extracted includes");
	records
}

/// Put recorded includes back ahead of `source`.
///
/// The platform header comes first unless the main fragment already includes
/// it, then each record as its line marker followed by the original include
/// line, in recorded order.
pub fn restore_includes(
	sketch: &Sketch,
	includes: &[IncludeRecord],
	source: &str,
	header: &str,
) -> String {
	let mut restored = String::new();

	if !sketch_includes_header(&sketch.main_file.source, header) {
		restored.push_str(&default_include_line(header));
	}

	for include in includes {
		restored.push_str(&include.line_marker);
		restored.push('\n');
		restored.push_str(&include.content);
		restored.push('\n');
	}

	restored.push_str(source);
	restored
}

/// Turn every `#include` into `//#include` so the includes are ignored by a
/// later pass. Only the first occurrence on each line is replaced.
pub fn comment_includes(text: &str) -> String {
	replace_first_per_line(text, "#include", "//#include")
}

/// Undo [`comment_includes`].
pub fn uncomment_includes(text: &str) -> String {
	replace_first_per_line(text, "//#include", "#include")
}

fn replace_first_per_line(text: &str, from: &str, to: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for line in text.lines() {
		if line.contains(from) {
			out.push_str(&line.replacen(from, to, 1));
		} else {
			out.push_str(line);
		}
		out.push('\n');
	}

	out
}
