use derive_more::Deref;
use derive_more::DerefMut;

use crate::DirectiveExtractor;
use crate::FilterOptions;
use crate::IncludeRecord;
use crate::Sketch;
use crate::SketchConfig;
use crate::SketchError;
use crate::SketchResult;
use crate::SourceMerger;
use crate::extract_includes;
use crate::filter_sketch_source;
use crate::first_code_offset;
use crate::restore_includes;

/// Build configuration overrides gathered during one build, in the order
/// they were found. Only ever appended to while a build runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct BuildProperties(Vec<String>);

impl BuildProperties {
	pub fn into_inner(self) -> Vec<String> {
		self.0
	}
}

/// Per-build state passed by reference through every pipeline stage.
#[derive(Debug, Clone)]
pub struct BuildSession {
	pub sketch: Sketch,
	pub merger: SourceMerger,
	pub extractor: DirectiveExtractor,
	/// Directives extracted from the sketch plus any supplied by the caller.
	pub custom_build_properties: BuildProperties,
	/// Cutoff computed by the scan stage over the main fragment.
	pub first_code_offset: Option<usize>,
	/// The working text: the compilation unit after merging, or whatever
	/// the caller assigned (e.g. preprocessed compiler output).
	pub source: Option<String>,
	pub line_offset: usize,
	pub include_section: String,
	pub includes: Vec<IncludeRecord>,
}

impl BuildSession {
	pub fn new(sketch: Sketch) -> Self {
		Self::with_config(sketch, &SketchConfig::default())
	}

	pub fn with_config(sketch: Sketch, config: &SketchConfig) -> Self {
		Self {
			sketch,
			merger: SourceMerger::new(config.merge.default_header.as_str()),
			extractor: DirectiveExtractor::new(config.directives.keyword.as_str()),
			custom_build_properties: BuildProperties::default(),
			first_code_offset: None,
			source: None,
			line_offset: 0,
			include_section: String::new(),
			includes: vec![],
		}
	}

	/// Clear everything derived from the sketch so the next run starts from
	/// scratch. The sketch and the build properties are kept.
	pub fn reset(&mut self) {
		self.first_code_offset = None;
		self.source = None;
		self.line_offset = 0;
		self.include_section.clear();
		self.includes.clear();
	}

	fn take_source(&mut self, stage: &Stage) -> SketchResult<String> {
		self.source
			.take()
			.ok_or_else(|| SketchError::MissingSource(stage.name()))
	}
}

/// One step of the sketch preprocessing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// Find where code starts in the main fragment.
	Scan,
	/// Append the main fragment's build directives to the build properties.
	Extract,
	/// Build the compilation unit into the working source.
	Merge,
	/// Reduce the working source to the lines from the sketch's fragments.
	Filter(FilterOptions),
	/// Record the include lines of every fragment.
	IncludeExtract,
	/// Put the recorded includes back ahead of the working source.
	IncludeRestore,
}

/// Scan, extract directives and merge.
pub const PREPROCESS_STAGES: &[Stage] = &[Stage::Scan, Stage::Extract, Stage::Merge];

impl Stage {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Scan => "scan",
			Self::Extract => "extract",
			Self::Merge => "merge",
			Self::Filter(_) => "filter",
			Self::IncludeExtract => "include_extract",
			Self::IncludeRestore => "include_restore",
		}
	}

	pub fn run(&self, session: &mut BuildSession) -> SketchResult<()> {
		match self {
			Self::Scan => {
				session.first_code_offset = Some(first_code_offset(&session.sketch.main_file.source));
			}
			Self::Extract => {
				let text = &session.sketch.main_file.source;
				let cutoff = session
					.first_code_offset
					.unwrap_or_else(|| first_code_offset(text));
				let directives = session.extractor.extract_before(text, cutoff);
				session.custom_build_properties.extend(directives);
			}
			Self::Merge => {
				let unit = session.merger.merge(&session.sketch);
				session.line_offset = unit.line_offset;
				session.include_section = unit.include_section;
				session.source = Some(unit.text);
			}
			Self::Filter(options) => {
				let source = session.take_source(self)?;
				session.source = Some(filter_sketch_source(&session.sketch, &source, *options));
			}
			Self::IncludeExtract => {
				let includes: Vec<_> = session.sketch.fragments().flat_map(extract_includes).collect();
				session.includes = includes;
			}
			Self::IncludeRestore => {
				let source = session.take_source(self)?;
				session.source = Some(restore_includes(
					&session.sketch,
					&session.includes,
					&source,
					session.merger.default_header(),
				));
			}
		}

		Ok(())
	}
}

/// Run `stages` in order against `session`, stopping at the first error.
pub fn run_pipeline(session: &mut BuildSession, stages: &[Stage]) -> SketchResult<()> {
	for stage in stages {
		tracing::debug!(stage = stage.name(), "running stage");
		stage.run(session)?;
	}

	Ok(())
}
