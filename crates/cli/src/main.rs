mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rolypoly_lib::consts::APP_NAME;
use rolypoly_lib::lifecycle::RecipeError;

use cmd::{CreateArgs, EvalArgs, cmd_create, cmd_info, cmd_inspect, cmd_requirements, cmd_toolchain};
use output::print_error;

/// rolypoly - recipe driver for the roly-poly-engine package
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Profile file with settings and option overrides
  #[arg(long, global = true, value_name = "FILE")]
  profile: Option<PathBuf>,

  /// Override a setting (os, arch, build_type, compiler)
  #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE")]
  settings: Vec<String>,

  /// Override a recipe option
  #[arg(short = 'o', long = "option", global = true, value_name = "KEY=VALUE")]
  options: Vec<String>,

  /// Print machine-readable JSON instead of text
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the detected host platform
  Info,

  /// Show the recipe descriptor, settings, finalized options and package id
  Inspect,

  /// List the dependencies this configuration declares
  Requirements,

  /// Print the toolchain variables this configuration generates
  Toolchain,

  /// Run the full lifecycle and package the engine
  Create {
    /// Recipe root holding the source folder and LICENSE (default: current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Build tool program
    #[arg(long, default_value = "cmake")]
    cmake: String,

    /// Root of pre-installed dependencies laid out as <root>/<name>/<version>
    #[arg(long)]
    deps_root: Option<PathBuf>,
  },
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::from(exit_status(&err))
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let eval = EvalArgs {
    profile: cli.profile,
    settings: cli.settings,
    options: cli.options,
  };

  match cli.command {
    Commands::Info => cmd_info(cli.json),
    Commands::Inspect => cmd_inspect(&eval, cli.json),
    Commands::Requirements => cmd_requirements(&eval, cli.json),
    Commands::Toolchain => cmd_toolchain(&eval, cli.json),
    Commands::Create { cwd, cmake, deps_root } => cmd_create(
      &eval,
      CreateArgs {
        cwd,
        cmake,
        deps_root,
      },
      cli.json,
    ),
  }
}

/// Exit status for a failed command.
///
/// A build tool's own non-zero status is passed through; everything else
/// exits with 1.
fn exit_status(err: &anyhow::Error) -> u8 {
  err
    .chain()
    .find_map(|cause| cause.downcast_ref::<RecipeError>())
    .and_then(RecipeError::host_error)
    .and_then(|host| host.status)
    .and_then(|status| u8::try_from(status).ok())
    .filter(|status| *status != 0)
    .unwrap_or(1)
}
