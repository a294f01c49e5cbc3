//! Implementation of the `rolypoly requirements` command.
//!
//! Runs the lifecycle up to requirement declaration and stops there; nothing
//! is resolved or built.

use anyhow::{Context, Result};

use rolypoly_lib::host::local::{LocalHost, LocalHostConfig};
use rolypoly_lib::lifecycle::Stage;

use super::eval::{EvalArgs, PACKAGE_FOLDER, current_dir};
use crate::output::{print_json, print_success, symbols};

pub fn cmd_requirements(eval: &EvalArgs, json: bool) -> Result<()> {
  let root = current_dir()?;
  let mut recipe = eval.recipe(&root)?;
  let mut host = LocalHost::new(LocalHostConfig::new(&root, &root.join(PACKAGE_FOLDER)));

  recipe
    .run_until(Stage::RequirementsDeclared, &mut host)
    .context("Failed to declare requirements")?;

  let requirements = recipe
    .declared_requirements()
    .context("Requirements were not declared")?;

  if json {
    let json_output = serde_json::json!({
      "requires": requirements.requires.iter().map(ToString::to_string).collect::<Vec<_>>(),
      "runtime_requires": requirements.runtime_requires.iter().map(ToString::to_string).collect::<Vec<_>>(),
      "dependency_options": recipe.dependency_options().iter().map(ToString::to_string).collect::<Vec<_>>(),
    });
    return print_json(&json_output);
  }

  print_success(&format!("Requirements: {}", requirements.len()));
  for requirement in requirements {
    println!("  {} {}", symbols::INFO, requirement);
  }

  if !requirements.runtime_requires.is_empty() {
    println!();
    println!("Runtime requirements: {}", requirements.runtime_requires.len());
    for requirement in &requirements.runtime_requires {
      println!("  {} {}", symbols::INFO, requirement);
    }
  }

  if !recipe.dependency_options().is_empty() {
    println!();
    println!("Dependency options:");
    for request in recipe.dependency_options() {
      println!("  {} {}", symbols::ARROW, request);
    }
  }
  Ok(())
}
