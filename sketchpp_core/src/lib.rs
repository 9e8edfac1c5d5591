//! `sketchpp_core` prepares a multi-fragment sketch for a native compiler and
//! maps the compiler's preprocessed output back to the sketch. It never runs
//! the compiler itself.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Sketch (main fragment + satellite fragments)
//!   → Comment scanner (offset where real code starts)
//!   → Directive extractor (`// #arduino key=value` lines before that offset)
//!   → Source merger (one compilation unit, `#line` marker per fragment)
//!   → external compiler / preprocessor
//!   → Output filter (keeps only lines whose line marker names a fragment)
//! ```
//!
//! Include extraction and restoration form a separate path used when includes
//! have to be moved ahead of separately generated code.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `sketchpp.toml`.
//! - [`session`]: The per-build [`BuildSession`] and the [`Stage`] pipeline
//!   driver.
//!
//! ## Quick Start
//!
//! ```rust
//! use sketchpp_core::BuildSession;
//! use sketchpp_core::Fragment;
//! use sketchpp_core::PREPROCESS_STAGES;
//! use sketchpp_core::Sketch;
//! use sketchpp_core::run_pipeline;
//!
//! let sketch = Sketch::new(Fragment::new(
//! 	"blink.ino",
//! 	"// #arduino build.board=uno\nvoid setup() {}\nvoid loop() {}",
//! ));
//! let mut session = BuildSession::new(sketch);
//! run_pipeline(&mut session, PREPROCESS_STAGES).unwrap();
//!
//! assert_eq!(*session.custom_build_properties, vec!["build.board=uno"]);
//! assert_eq!(session.line_offset, 3);
//! ```

pub use comment_scanner::*;
pub use config::*;
pub use directives::*;
pub use error::*;
pub use filter::*;
pub use includes::*;
pub use line_marker::*;
pub use merger::*;
pub use session::*;
pub use sketch::*;

mod comment_scanner;
pub mod config;
mod directives;
mod error;
mod filter;
mod includes;
mod line_marker;
mod merger;
pub mod session;
mod sketch;
