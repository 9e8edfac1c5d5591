use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SketchError {
	#[error(transparent)]
	#[diagnostic(code(sketchpp::io_error))]
	Io(#[from] std::io::Error),

	#[error("unable to read sketch fragment `{path}`: {reason}")]
	#[diagnostic(
		code(sketchpp::unreadable_fragment),
		help("check that every fragment passed to the build exists and is readable")
	)]
	UnreadableFragment { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(sketchpp::config_parse),
		help("check that sketchpp.toml is valid TOML with [merge], [directives] and/or [filter] sections")
	)]
	ConfigParse(String),

	#[error("stage `{0}` needs a working source but none has been set")]
	#[diagnostic(
		code(sketchpp::missing_source),
		help("run the `merge` stage first or assign the preprocessed text to the session source")
	)]
	MissingSource(&'static str),
}

pub type SketchResult<T> = Result<T, SketchError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
