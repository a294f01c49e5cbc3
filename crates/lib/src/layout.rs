//! Folder layout of a recipe evaluation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{GENERATORS_FOLDER, SOURCE_FOLDER};

/// Where the host finds sources and writes build and generator output.
///
/// Declaring a layout only records intent. Creating the folders is up to the
/// host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPolicy {
  pub source: PathBuf,
  pub build: PathBuf,
  pub generators: PathBuf,
}

/// Declare the layout for a recipe evaluated from `working_dir`.
pub fn declare_layout(working_dir: &Path) -> LayoutPolicy {
  let build = working_dir.to_path_buf();
  LayoutPolicy {
    source: PathBuf::from(SOURCE_FOLDER),
    generators: build.join(GENERATORS_FOLDER),
    build,
  }
}

impl LayoutPolicy {
  /// Source folder resolved against the recipe root.
  pub fn source_dir(&self, recipe_root: &Path) -> PathBuf {
    recipe_root.join(&self.source)
  }
}
