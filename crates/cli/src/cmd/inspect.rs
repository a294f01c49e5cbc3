//! Implementation of the `rolypoly inspect` command.
//!
//! Finalizes the options for the requested settings without running any
//! host collaborator, then reports what identifies the resulting binary.

use anyhow::{Context, Result};

use rolypoly_lib::consts::CONSUMER_GENERATORS;

use super::eval::{EvalArgs, current_dir};
use crate::output::{print_info, print_json, print_stat, print_success};

pub fn cmd_inspect(eval: &EvalArgs, json: bool) -> Result<()> {
  let mut recipe = eval.recipe(&current_dir()?)?;
  let fpic_removed = recipe.config_options().context("Failed to finalize options")?;
  let package_id = recipe.package_id()?;

  if json {
    let json_output = serde_json::json!({
      "reference": recipe.descriptor().reference(),
      "descriptor": recipe.descriptor(),
      "settings": recipe.settings(),
      "options": recipe.options(),
      "package_id": package_id,
      "generators": CONSUMER_GENERATORS,
    });
    return print_json(&json_output);
  }

  let descriptor = recipe.descriptor();
  print_success(&format!("Recipe: {}", descriptor.reference()));
  print_stat("Description", &descriptor.description);
  print_stat("License", &descriptor.license);
  print_stat("Author", &descriptor.author);
  print_stat("Topics", &descriptor.topics.join(", "));
  println!();

  let settings = recipe.settings();
  println!("Settings:");
  print_stat("os", settings.os.as_str());
  print_stat("arch", settings.arch.as_str());
  print_stat("build_type", settings.build_type.as_str());
  if let Some(compiler) = &settings.compiler {
    print_stat("compiler", compiler);
  }
  println!();

  println!("Options:");
  for (name, value) in recipe.options().present() {
    print_stat(name.as_str(), if value { "True" } else { "False" });
  }
  if fpic_removed {
    print_info("fPIC removed for this platform");
  }
  println!();

  print_stat("Package id", &package_id.0);
  print_stat("Generators", &CONSUMER_GENERATORS.join(", "));
  Ok(())
}
