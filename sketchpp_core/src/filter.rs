use std::borrow::Cow;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::Sketch;
use crate::parse_line_marker;
use crate::quote_cpp_string;

/// Switches controlling how retained line markers are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
	/// Drop every line marker from the output.
	pub remove_line_markers: bool,
	/// Strip the trailing flags from markers that return from an include.
	pub remove_end_line_markers: bool,
}

/// Keeps only the preprocessed lines that originate from the sketch's own
/// fragments.
///
/// The filter is either in-sketch or not. Only line markers change the state:
/// a marker naming a sketch fragment enters the sketch, any other marker
/// leaves it. Every other line is kept exactly when the filter is in-sketch.
#[derive(Debug, Clone)]
pub struct SketchSourceFilter {
	file_names: HashSet<String>,
	options: FilterOptions,
	in_sketch: bool,
}

impl SketchSourceFilter {
	pub fn new(sketch: &Sketch, options: FilterOptions) -> Self {
		Self {
			file_names: sketch.quoted_names(),
			options,
			in_sketch: false,
		}
	}

	pub fn is_in_sketch(&self) -> bool {
		self.in_sketch
	}

	/// Feed one line and return what should be written for it, if anything.
	pub fn filter_line<'a>(&mut self, line: &'a str) -> Option<Cow<'a, str>> {
		let Some(marker) = parse_line_marker(line) else {
			return self.in_sketch.then_some(Cow::Borrowed(line));
		};

		let in_sketch = self.file_names.contains(&quote_cpp_string(&marker.filename));
		if in_sketch != self.in_sketch {
			tracing::trace!(filename = %marker.filename, in_sketch, "filter state changed");
		}
		self.in_sketch = in_sketch;

		if !self.in_sketch || self.options.remove_line_markers {
			return None;
		}

		let strip_flags = self.options.remove_end_line_markers && marker.is_return_marker;
		Some(Cow::Owned(marker.render(strip_flags)))
	}
}

/// Filter `preprocessed` down to the lines attributable to `sketch`. Each
/// retained line is terminated by `\n`.
pub fn filter_sketch_source(sketch: &Sketch, preprocessed: &str, options: FilterOptions) -> String {
	let mut filter = SketchSourceFilter::new(sketch, options);
	let mut filtered = String::with_capacity(preprocessed.len());

	for line in preprocessed.lines() {
		if let Some(kept) = filter.filter_line(line) {
			filtered.push_str(&kept);
			filtered.push('\n');
		}
	}

	tracing::debug!(
		input_len = preprocessed.len(),
		output_len = filtered.len(),
		?options,
		"filtered sketch source"
	);
	filtered
}
