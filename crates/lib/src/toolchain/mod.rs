//! Translation of recipe options into build-tool variables.
//!
//! The toolchain configuration is a pure projection of four options. `fPIC`
//! is never exported, so generation works the same whether or not
//! finalization removed it.
//!
//! # Submodules
//!
//! - [`cmake`] - Rendering of a configuration as a CMake toolchain fragment

pub mod cmake;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::{OptionError, OptionName, OptionSet};

/// Variables handed to the native build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolchainVariable {
  WithValidationLayers,
  BuildShared,
  VerboseOutput,
  BuildTests,
}

impl ToolchainVariable {
  pub const ALL: [ToolchainVariable; 4] = [
    ToolchainVariable::WithValidationLayers,
    ToolchainVariable::BuildShared,
    ToolchainVariable::VerboseOutput,
    ToolchainVariable::BuildTests,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::WithValidationLayers => "WITH_VALIDATION_LAYERS",
      Self::BuildShared => "BUILD_SHARED",
      Self::VerboseOutput => "VERBOSE_OUTPUT",
      Self::BuildTests => "BUILD_TESTS",
    }
  }

  /// The option whose value this variable carries.
  pub fn source_option(&self) -> OptionName {
    match self {
      Self::WithValidationLayers => OptionName::WithValidationLayers,
      Self::BuildShared => OptionName::Shared,
      Self::VerboseOutput => OptionName::Verbose,
      Self::BuildTests => OptionName::BuildTests,
    }
  }
}

impl fmt::Display for ToolchainVariable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Build variables derived from one option snapshot.
///
/// Only [`generate`] constructs a configuration; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
  variables: BTreeMap<String, bool>,
}

impl ToolchainConfig {
  pub fn get(&self, name: &str) -> Option<bool> {
    self.variables.get(name).copied()
  }

  pub fn variables(&self) -> &BTreeMap<String, bool> {
    &self.variables
  }

  pub fn len(&self) -> usize {
    self.variables.len()
  }

  pub fn is_empty(&self) -> bool {
    self.variables.is_empty()
  }
}

/// Project the option set onto the toolchain variables.
pub fn generate(options: &OptionSet) -> Result<ToolchainConfig, OptionError> {
  let variables = ToolchainVariable::ALL
    .into_iter()
    .map(|var| Ok((var.as_str().to_string(), options.get(var.source_option())?)))
    .collect::<Result<BTreeMap<_, _>, OptionError>>()?;
  Ok(ToolchainConfig { variables })
}
