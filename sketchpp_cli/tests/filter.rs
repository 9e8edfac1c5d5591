mod common;

use rstest::rstest;
use similar_asserts::assert_eq;
use sketchpp_core::AnyEmptyResult;

const PREPROCESSED: &str = "# 1 \"a.ino\"\nint a;\n# 1 \"/opt/core/Arduino.h\" 1\nint \
                            foreign;\n# 2 \"a.ino\" 2\nint b;\n# 1 \"b.ino\"\nint c;\n";

#[rstest]
#[case::keep_markers(&[], "# 1 \"a.ino\"\nint a;\n# 2 \"a.ino\" 2\nint b;\n# 1 \"b.ino\"\nint c;\n")]
#[case::remove_markers(&["--remove-line-markers"], "int a;\nint b;\nint c;\n")]
#[case::strip_end_markers(
	&["--remove-end-line-markers"],
	"# 1 \"a.ino\"\nint a;\n# 2 \"a.ino\"\nint b;\n# 1 \"b.ino\"\nint c;\n"
)]
fn filter_preprocessed_file(#[case] flags: &[&str], #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.ino"), "int a;\nint b;")?;
	std::fs::write(tmp.path().join("b.ino"), "int c;")?;
	std::fs::write(tmp.path().join("a.ino.pp"), PREPROCESSED)?;

	let output = common::sketchpp_in(tmp.path())
		.args(["filter", "--input", "a.ino.pp"])
		.args(flags)
		.args(["a.ino", "b.ino"])
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, expected);

	Ok(())
}

#[test]
fn filter_reads_stdin_and_config_switches() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.ino"), "int a;\nint b;")?;
	std::fs::write(tmp.path().join("b.ino"), "int c;")?;
	std::fs::write(
		tmp.path().join("sketchpp.toml"),
		"[filter]\nremove_line_markers = true\n",
	)?;

	let output = common::sketchpp_in(tmp.path())
		.args(["filter", "--input", "-", "a.ino", "b.ino"])
		.write_stdin(PREPROCESSED)
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, "int a;\nint b;\nint c;\n");

	Ok(())
}

#[rstest]
#[case::keep_markers(
	&["--no-remove-line-markers"],
	"# 1 \"a.ino\"\nint a;\n# 2 \"a.ino\"\nint b;\n# 1 \"b.ino\"\nint c;\n"
)]
#[case::last_switch_wins(
	&["--no-remove-line-markers", "--remove-line-markers"],
	"int a;\nint b;\nint c;\n"
)]
#[case::keep_end_flags(
	&["--no-remove-line-markers", "--no-remove-end-line-markers"],
	"# 1 \"a.ino\"\nint a;\n# 2 \"a.ino\" 2\nint b;\n# 1 \"b.ino\"\nint c;\n"
)]
fn filter_switches_override_config(
	#[case] flags: &[&str],
	#[case] expected: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.ino"), "int a;\nint b;")?;
	std::fs::write(tmp.path().join("b.ino"), "int c;")?;
	std::fs::write(tmp.path().join("a.ino.pp"), PREPROCESSED)?;
	std::fs::write(
		tmp.path().join("sketchpp.toml"),
		"[filter]\nremove_line_markers = true\nremove_end_line_markers = true\n",
	)?;

	let output = common::sketchpp_in(tmp.path())
		.args(["filter", "--input", "a.ino.pp"])
		.args(flags)
		.args(["a.ino", "b.ino"])
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, expected);

	Ok(())
}

#[test]
fn filter_decodes_invalid_utf8_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.ino"), "int a;")?;

	let output = common::sketchpp_in(tmp.path())
		.args(["filter", "--input", "-", "a.ino"])
		.write_stdin(b"# 1 \"a.ino\"\nchar c = '\xb5';\n".to_vec())
		.output()?;

	assert!(output.status.success());
	assert_eq!(
		String::from_utf8(output.stdout)?,
		"# 1 \"a.ino\"\nchar c = '\u{FFFD}';\n"
	);

	Ok(())
}

#[test]
fn includes_are_listed_with_origin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("a.ino"),
		"#include <Wire.h>\n\nvoid setup() {}\n",
	)?;
	std::fs::write(tmp.path().join("b.ino"), "int b;\n  #include \"b.h\"\n")?;

	let output = common::sketchpp_in(tmp.path())
		.args(["includes", "a.ino", "b.ino"])
		.output()?;
	assert!(output.status.success());
	assert_eq!(
		String::from_utf8(output.stdout)?,
		"a.ino:1: #include <Wire.h>\nb.ino:2:   #include \"b.h\"\n"
	);

	let output = common::sketchpp_in(tmp.path())
		.args(["includes", "--format", "json", "a.ino"])
		.output()?;
	let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value[0]["origin_line"], 1);
	assert_eq!(value[0]["line_marker"], "# 1 \"a.ino\"");

	Ok(())
}

#[test]
fn restore_prepends_includes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.ino"), "#include <Wire.h>\nvoid setup() {}\n")?;
	std::fs::write(tmp.path().join("generated.cpp"), "void setup();\n")?;

	let output = common::sketchpp_in(tmp.path())
		.args(["restore", "--input", "generated.cpp", "a.ino"])
		.output()?;

	assert!(output.status.success());
	assert_eq!(
		String::from_utf8(output.stdout)?,
		"#include <Arduino.h>\n# 1 \"a.ino\"\n#include <Wire.h>\nvoid setup();\n"
	);

	Ok(())
}
