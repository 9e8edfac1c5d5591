use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_DIRECTIVE_KEYWORD;
use crate::DEFAULT_HEADER;
use crate::FilterOptions;
use crate::SketchError;
use crate::SketchResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"sketchpp.toml",
	".sketchpp.toml",
	".config/sketchpp.toml",
];

/// Configuration loaded from a `sketchpp.toml` file.
///
/// ```toml
/// [merge]
/// default_header = "Arduino.h"
///
/// [directives]
/// keyword = "#arduino"
///
/// [filter]
/// remove_line_markers = false
/// remove_end_line_markers = false
/// ```
///
/// Every section and key is optional. Missing values fall back to the
/// defaults shown above.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SketchConfig {
	/// Settings for building the compilation unit.
	#[serde(default)]
	pub merge: MergeConfig,
	/// Settings for the build directive extractor.
	#[serde(default)]
	pub directives: DirectivesConfig,
	/// Default switches for filtering preprocessed output.
	#[serde(default)]
	pub filter: FilterOptions,
}

/// Configuration for the `[merge]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
	/// Platform header injected ahead of the main fragment when the fragment
	/// does not include it itself.
	#[serde(default = "default_header")]
	pub default_header: String,
}

impl Default for MergeConfig {
	fn default() -> Self {
		Self {
			default_header: default_header(),
		}
	}
}

/// Configuration for the `[directives]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DirectivesConfig {
	/// Keyword that follows the `//` marker on a directive line.
	#[serde(default = "default_keyword")]
	pub keyword: String,
}

impl Default for DirectivesConfig {
	fn default() -> Self {
		Self {
			keyword: default_keyword(),
		}
	}
}

fn default_header() -> String {
	DEFAULT_HEADER.to_string()
}

fn default_keyword() -> String {
	DEFAULT_DIRECTIVE_KEYWORD.to_string()
}

impl SketchConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SketchResult<Option<SketchConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse config from TOML text.
	pub fn parse(content: &str) -> SketchResult<SketchConfig> {
		toml::from_str(content).map_err(|e| SketchError::ConfigParse(e.to_string()))
	}
}
