//! Building a recipe from the global command-line flags.
//!
//! Settings start from the detected host platform. A profile is applied on
//! top, then `-s`/`-o` flags in the order given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use rolypoly_lib::lifecycle::Recipe;
use rolypoly_lib::platform::Settings;
use rolypoly_lib::profile::Profile;

/// Build folder used for a recipe root.
pub const BUILD_FOLDER: &str = "build";

/// Package folder used for a recipe root.
pub const PACKAGE_FOLDER: &str = "package";

pub struct EvalArgs {
  pub profile: Option<PathBuf>,
  pub settings: Vec<String>,
  pub options: Vec<String>,
}

impl EvalArgs {
  fn load_profile(&self) -> Result<Profile> {
    match &self.profile {
      Some(path) => Profile::load(path).with_context(|| format!("Failed to load profile: {}", path.display())),
      None => Ok(Profile::default()),
    }
  }

  pub fn settings(&self, profile: &Profile) -> Result<Settings> {
    let detected = Settings::detect().context("Could not detect the host platform")?;
    let mut settings = profile.settings(detected);
    for raw in &self.settings {
      let (key, value) = parse_pair(raw)?;
      settings
        .set(key, value)
        .with_context(|| format!("Invalid setting: {}", raw))?;
    }
    Ok(settings)
  }

  /// A recipe for `recipe_root`, with every override applied.
  pub fn recipe(&self, recipe_root: &Path) -> Result<Recipe> {
    let profile = self.load_profile()?;
    let settings = self.settings(&profile)?;
    debug!(settings = ?settings, "evaluation settings");

    let mut recipe = Recipe::roly_poly_engine(settings, &recipe_root.join(BUILD_FOLDER))?;
    for (name, value) in profile.option_overrides() {
      recipe
        .set_option(&name, &value)
        .with_context(|| format!("Invalid option in profile: {}={}", name, value))?;
    }
    for raw in &self.options {
      let (name, value) = parse_pair(raw)?;
      recipe
        .set_option(name, value)
        .with_context(|| format!("Invalid option: {}", raw))?;
    }
    Ok(recipe)
  }
}

fn parse_pair(raw: &str) -> Result<(&str, &str)> {
  let Some((key, value)) = raw.split_once('=') else {
    bail!("Expected KEY=VALUE, got '{}'", raw);
  };
  let key = key.trim();
  if key.is_empty() {
    bail!("Expected KEY=VALUE, got '{}'", raw);
  }
  Ok((key, value.trim()))
}

/// The directory commands operate in.
pub fn current_dir() -> Result<PathBuf> {
  std::env::current_dir().context("Failed to determine current directory")
}
