use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn sketchpp_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("sketchpp"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

/// A `sketchpp` command running inside `dir`, so fragment names stay
/// relative.
pub fn sketchpp_in(dir: &Path) -> Command {
	let mut cmd = sketchpp_cmd();
	cmd.current_dir(dir);
	cmd
}
