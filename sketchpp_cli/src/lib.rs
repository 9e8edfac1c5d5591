use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use sketchpp_core::FilterOptions;
use sketchpp_core::Fragment;
use sketchpp_core::Sketch;
use sketchpp_core::SketchError;
use sketchpp_core::SketchResult;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Merge sketch fragments into one compilation unit and map preprocessed output back to them.",
	long_about = "sketchpp prepares a multi-file sketch for a native compiler.\n\nIt merges the \
	              fragments into a single translation unit annotated with line markers, extracts \
	              `// #arduino key=value` build directives, and filters the compiler's \
	              preprocessed output down to the lines that came from the sketch.\n\nQuick \
	              start:\n  sketchpp merge blink.ino helpers.ino\n  sketchpp directives \
	              blink.ino\n  sketchpp filter --input blink.ino.pp blink.ino"
)]
pub struct SketchCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for `sketchpp.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose (debug) logging on stderr.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// The fragments making up a sketch: the main fragment first.
#[derive(clap::Args, Debug, Clone)]
pub struct SketchArgs {
	/// The main sketch fragment.
	pub main: PathBuf,

	/// Satellite fragments, merged after the main fragment in the given
	/// order.
	pub others: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the compilation unit built from the sketch fragments.
	///
	/// Every fragment is preceded by a `#line 1 "<file>"` marker. The
	/// platform header is included ahead of the main fragment unless the
	/// main fragment already includes it.
	Merge {
		#[command(flatten)]
		sketch: SketchArgs,

		/// Output format. `json` also reports the line offset and the
		/// include section.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the build directives declared in the main fragment's leading
	/// comments, one `key=value` per line.
	Directives {
		#[command(flatten)]
		sketch: SketchArgs,

		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Keep only the preprocessed lines that originate from the sketch.
	Filter {
		#[command(flatten)]
		sketch: SketchArgs,

		/// Preprocessed compiler output. Use `-` to read from stdin.
		#[arg(long, short)]
		input: PathBuf,

		#[command(flatten)]
		switches: FilterSwitches,
	},
	/// List the include directives of every fragment with their origin.
	Includes {
		#[command(flatten)]
		sketch: SketchArgs,

		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Put the sketch's include directives back ahead of generated source.
	Restore {
		#[command(flatten)]
		sketch: SketchArgs,

		/// The generated source. Use `-` to read from stdin.
		#[arg(long, short)]
		input: PathBuf,
	},
}

/// Filter switches. Each one overrides the matching `[filter]` setting when
/// given; the last of a `--x` / `--no-x` pair wins.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct FilterSwitches {
	/// Drop every line marker from the output.
	#[arg(long, overrides_with = "no_remove_line_markers")]
	pub remove_line_markers: bool,

	/// Keep line markers even when the config removes them.
	#[arg(long, overrides_with = "remove_line_markers")]
	pub no_remove_line_markers: bool,

	/// Strip the trailing flags from markers that return from an include.
	#[arg(long, overrides_with = "no_remove_end_line_markers")]
	pub remove_end_line_markers: bool,

	/// Keep the trailing flags even when the config strips them.
	#[arg(long, overrides_with = "remove_end_line_markers")]
	pub no_remove_end_line_markers: bool,
}

impl FilterSwitches {
	/// Apply the switches on top of the configured options.
	pub fn apply(&self, configured: FilterOptions) -> FilterOptions {
		FilterOptions {
			remove_line_markers: resolve_switch(
				self.remove_line_markers,
				self.no_remove_line_markers,
				configured.remove_line_markers,
			),
			remove_end_line_markers: resolve_switch(
				self.remove_end_line_markers,
				self.no_remove_end_line_markers,
				configured.remove_end_line_markers,
			),
		}
	}
}

fn resolve_switch(enable: bool, disable: bool, configured: bool) -> bool {
	match (enable, disable) {
		(true, _) => true,
		(_, true) => false,
		_ => configured,
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

/// Read one fragment. The path as given becomes the fragment name.
pub fn load_fragment(path: &Path) -> SketchResult<Fragment> {
	let bytes = std::fs::read(path).map_err(|e| SketchError::UnreadableFragment {
		path: path.display().to_string(),
		reason: e.to_string(),
	})?;

	Ok(Fragment::new(path.display().to_string(), decode_lossy(path, bytes)))
}

impl SketchArgs {
	/// Load every fragment, failing on the first one that cannot be read.
	pub fn load(&self) -> SketchResult<Sketch> {
		let mut sketch = Sketch::new(load_fragment(&self.main)?);

		for path in &self.others {
			sketch.other_files.push(load_fragment(path)?);
		}

		Ok(sketch)
	}
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> SketchResult<String> {
	let bytes = if path == Path::new("-") {
		let mut content = Vec::new();
		std::io::stdin().read_to_end(&mut content)?;
		content
	} else {
		std::fs::read(path)?
	};

	Ok(decode_lossy(path, bytes))
}

/// Decode `bytes` as UTF-8, replacing invalid sequences with U+FFFD.
fn decode_lossy(path: &Path, bytes: Vec<u8>) -> String {
	String::from_utf8(bytes).unwrap_or_else(|error| {
		tracing::warn!(path = %path.display(), "input is not valid UTF-8, decoding lossily");
		String::from_utf8_lossy(error.as_bytes()).into_owned()
	})
}
