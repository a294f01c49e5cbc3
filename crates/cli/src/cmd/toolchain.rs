use anyhow::{Context, Result};

use rolypoly_lib::toolchain;

use super::eval::{EvalArgs, current_dir};
use crate::output::print_json;

pub fn cmd_toolchain(eval: &EvalArgs, json: bool) -> Result<()> {
  let mut recipe = eval.recipe(&current_dir()?)?;
  recipe.config_options().context("Failed to finalize options")?;

  let config = toolchain::generate(recipe.options()).context("Failed to generate toolchain")?;

  if json {
    return print_json(config.variables());
  }
  print!("{}", config.to_cmake());
  Ok(())
}
