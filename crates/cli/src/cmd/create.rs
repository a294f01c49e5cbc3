//! Implementation of the `rolypoly create` command.
//!
//! Drives the whole lifecycle with the local host: dependency options,
//! requirements, toolchain generation, `cmake` configure/build/install and
//! library collection.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use rolypoly_lib::host::local::{LocalHost, LocalHostConfig};

use super::eval::{EvalArgs, PACKAGE_FOLDER, current_dir};
use crate::output::{format_duration, print_json, print_stat, print_success, symbols, truncate_hash};

pub struct CreateArgs {
  pub cwd: Option<PathBuf>,
  pub cmake: String,
  pub deps_root: Option<PathBuf>,
}

pub fn cmd_create(eval: &EvalArgs, args: CreateArgs, json: bool) -> Result<()> {
  let start = Instant::now();

  let root = match args.cwd {
    Some(dir) => dir,
    None => current_dir()?,
  };
  let root = dunce::canonicalize(&root).with_context(|| format!("Recipe root not found: {}", root.display()))?;

  let mut recipe = eval.recipe(&root)?;

  let mut config = LocalHostConfig::new(&root, &root.join(PACKAGE_FOLDER));
  config.cmake = args.cmake;
  config.deps_root = args.deps_root;
  config.build_type = recipe.settings().build_type;
  let mut host = LocalHost::new(config);

  info!(root = %root.display(), "creating package");
  recipe.run(&mut host).context("Failed to create package")?;

  let package_id = recipe.package_id()?;
  let install_dir = recipe.install_dir().context("Package was not installed")?;
  let libs = recipe.cpp_info().map(|info| info.libs.clone()).unwrap_or_default();
  let elapsed = start.elapsed();

  if json {
    let json_output = serde_json::json!({
      "reference": recipe.descriptor().reference(),
      "package_id": package_id,
      "install_dir": install_dir,
      "libs": libs,
      "duration_secs": elapsed.as_secs_f64(),
    });
    return print_json(&json_output);
  }

  print_success(&format!(
    "Created {} ({})",
    recipe.descriptor().reference(),
    truncate_hash(&package_id.0)
  ));
  print_stat("Package", &install_dir.display().to_string());
  print_stat("Libraries", &libs.len().to_string());
  for lib in &libs {
    println!("    {} {}", symbols::INFO, lib);
  }
  print_stat("Time", &format_duration(elapsed));
  Ok(())
}
