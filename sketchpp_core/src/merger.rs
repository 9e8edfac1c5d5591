use serde::Serialize;

use crate::Fragment;
use crate::Sketch;
use crate::includes::default_include_line;
use crate::includes::sketch_includes_header;
use crate::quote_cpp_string;

/// Platform header every sketch is compiled against.
pub const DEFAULT_HEADER: &str = "Arduino.h";

/// The single translation unit built from a sketch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
	/// The merged text handed to the compiler.
	pub text: String,
	/// Number of synthetic lines ahead of the main fragment's first line: the
	/// leading marker, the injected include (if any) and the marker that
	/// resets numbering for the main fragment.
	pub line_offset: usize,
	/// The synthetic prefix before the main fragment's reset marker.
	pub include_section: String,
}

/// Concatenates sketch fragments into one compilation unit with a line
/// marker ahead of each fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMerger {
	default_header: String,
}

impl Default for SourceMerger {
	fn default() -> Self {
		Self::new(DEFAULT_HEADER)
	}
}

impl SourceMerger {
	pub fn new(default_header: impl Into<String>) -> Self {
		Self {
			default_header: default_header.into(),
		}
	}

	pub fn default_header(&self) -> &str {
		&self.default_header
	}

	pub fn merge(&self, sketch: &Sketch) -> CompilationUnit {
		let mut include_section = line_directive(&sketch.main_file.name);
		let mut line_offset = 1;

		let injected = !sketch_includes_header(&sketch.main_file.source, &self.default_header);
		if injected {
			include_section.push_str(&default_include_line(&self.default_header));
			line_offset += 1;
		}

		let mut text = include_section.clone();
		push_wrapped(&mut text, &sketch.main_file);
		line_offset += 1;

		for fragment in &sketch.other_files {
			push_wrapped(&mut text, fragment);
		}

		tracing::debug!(
			main = %sketch.main_file.name,
			fragments = sketch.other_files.len() + 1,
			injected,
			line_offset,
			"merged sketch"
		);

		CompilationUnit {
			text,
			line_offset,
			include_section,
		}
	}
}

/// Merge `sketch` against the default platform header.
pub fn merge_sketch(sketch: &Sketch) -> CompilationUnit {
	SourceMerger::default().merge(sketch)
}

fn line_directive(name: &str) -> String {
	format!("#line 1 {}\n", quote_cpp_string(name))
}

fn push_wrapped(text: &mut String, fragment: &Fragment) {
	text.push_str(&line_directive(&fragment.name));
	text.push_str(&fragment.source);
	text.push('\n');
}
