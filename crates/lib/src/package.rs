//! Package identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
  #[error("package name cannot be empty")]
  EmptyName,
}

/// Immutable identity of the package a recipe produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
  pub name: String,
  pub version: Option<String>,
  pub license: String,
  pub author: String,
  pub homepage: String,
  pub description: String,
  pub topics: Vec<String>,
}

impl PackageDescriptor {
  /// The Vulkan engine this repository packages.
  pub fn roly_poly_engine() -> Self {
    Self {
      name: "roly-poly-engine".to_string(),
      version: None,
      license: "MIT".to_string(),
      author: "garry".to_string(),
      homepage: String::new(),
      description: "A Vulkan 3D graphics engine.".to_string(),
      topics: vec!["Vulkan".to_string(), "graphics".to_string(), "3D".to_string()],
    }
  }

  pub fn validate(&self) -> Result<(), DescriptorError> {
    if self.name.trim().is_empty() {
      return Err(DescriptorError::EmptyName);
    }
    Ok(())
  }

  /// `name/version`, or just the name for unversioned recipes.
  pub fn reference(&self) -> String {
    match &self.version {
      Some(version) => format!("{}/{}", self.name, version),
      None => self.name.clone(),
    }
  }
}
