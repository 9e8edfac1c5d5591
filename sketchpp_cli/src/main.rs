use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use sketchpp_cli::Commands;
use sketchpp_cli::FilterSwitches;
use sketchpp_cli::OutputFormat;
use sketchpp_cli::SketchArgs;
use sketchpp_cli::SketchCli;
use sketchpp_cli::read_input;
use sketchpp_core::BuildSession;
use sketchpp_core::SketchConfig;
use sketchpp_core::Stage;
use sketchpp_core::run_pipeline;
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = SketchCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Merge { sketch, format }) => run_merge(&args, sketch, *format),
		Some(Commands::Directives { sketch, format }) => run_directives(&args, sketch, *format),
		Some(Commands::Filter {
			sketch,
			input,
			switches,
		}) => run_filter(&args, sketch, input, *switches),
		Some(Commands::Includes { sketch, format }) => run_includes(&args, sketch, *format),
		Some(Commands::Restore { sketch, input }) => run_restore(&args, sketch, input),
		None => {
			eprintln!("No subcommand specified. Run `sketchpp --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<sketchpp_core::SketchError>() {
			Ok(sketch_err) => {
				let report: miette::Report = (*sketch_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				if use_color {
					eprintln!("{} {e}", "error:".red());
				} else {
					eprintln!("error: {e}");
				}
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();
}

fn resolve_root(args: &SketchCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &SketchCli) -> Result<SketchConfig, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = SketchConfig::load(&root)?.unwrap_or_default();
	tracing::debug!(root = %root.display(), ?config, "resolved config");
	Ok(config)
}

fn load_session(
	args: &SketchCli,
	sketch: &SketchArgs,
) -> Result<(BuildSession, SketchConfig), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let session = BuildSession::with_config(sketch.load()?, &config);
	Ok((session, config))
}

fn run_merge(args: &SketchCli, sketch: &SketchArgs, format: OutputFormat) -> CliResult {
	let (session, _) = load_session(args, sketch)?;
	let unit = session.merger.merge(&session.sketch);

	match format {
		OutputFormat::Text => print!("{}", unit.text),
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&unit)?),
	}

	Ok(())
}

fn run_directives(args: &SketchCli, sketch: &SketchArgs, format: OutputFormat) -> CliResult {
	let (mut session, _) = load_session(args, sketch)?;
	run_pipeline(&mut session, &[Stage::Scan, Stage::Extract])?;
	let directives = session.custom_build_properties.into_inner();

	match format {
		OutputFormat::Text => {
			for directive in &directives {
				println!("{directive}");
			}
		}
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&directives)?),
	}

	Ok(())
}

fn run_filter(
	args: &SketchCli,
	sketch: &SketchArgs,
	input: &Path,
	switches: FilterSwitches,
) -> CliResult {
	let (mut session, config) = load_session(args, sketch)?;
	let options = switches.apply(config.filter);

	session.source = Some(read_input(input)?);
	run_pipeline(&mut session, &[Stage::Filter(options)])?;
	print!("{}", session.source.unwrap_or_default());

	Ok(())
}

fn run_includes(args: &SketchCli, sketch: &SketchArgs, format: OutputFormat) -> CliResult {
	let (mut session, _) = load_session(args, sketch)?;
	run_pipeline(&mut session, &[Stage::IncludeExtract])?;

	match format {
		OutputFormat::Text => {
			if session.includes.is_empty() {
				println!("No includes found.");
			}
			for include in &session.includes {
				println!(
					"{}:{}: {}",
					include.origin_file,
					include.origin_line,
					include.content.trim_end()
				);
			}
		}
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session.includes)?),
	}

	Ok(())
}

fn run_restore(args: &SketchCli, sketch: &SketchArgs, input: &Path) -> CliResult {
	let (mut session, _) = load_session(args, sketch)?;
	session.source = Some(read_input(input)?);
	run_pipeline(&mut session, &[Stage::IncludeExtract, Stage::IncludeRestore])?;
	print!("{}", session.source.unwrap_or_default());

	Ok(())
}
