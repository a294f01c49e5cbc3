//! Evaluation profiles.
//!
//! A profile pins the settings and option overrides for one evaluation so
//! that the same configuration can be reproduced from a file.
//!
//! # Profile Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "settings": { "os": "Windows", "arch": "x86_64", "build_type": "Debug" },
//!   "options": { "shared": true, "build_tests": "False" }
//! }
//! ```
//!
//! Every section is optional. Settings left out keep the detected host
//! values; options left out keep the recipe defaults.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::arch::Arch;
use crate::platform::os::Os;
use crate::platform::{BuildType, Settings};

/// Current profile format version.
pub const PROFILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProfileError {
  #[error("failed to read profile {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse profile: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("unsupported profile version {0}, expected {PROFILE_VERSION}")]
  UnsupportedVersion(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub os: Option<Os>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub arch: Option<Arch>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_type: Option<BuildType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compiler: Option<String>,
}

/// An option value as written in a profile: a JSON boolean or a string
/// such as `"True"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionLiteral {
  Bool(bool),
  Text(String),
}

impl OptionLiteral {
  pub fn to_text(&self) -> String {
    match self {
      Self::Bool(true) => "True".to_string(),
      Self::Bool(false) => "False".to_string(),
      Self::Text(text) => text.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub version: u32,
  #[serde(default)]
  pub settings: ProfileSettings,
  #[serde(default)]
  pub options: BTreeMap<String, OptionLiteral>,
}

impl Default for Profile {
  fn default() -> Self {
    Self {
      version: PROFILE_VERSION,
      settings: ProfileSettings::default(),
      options: BTreeMap::new(),
    }
  }
}

impl Profile {
  pub fn parse(content: &str) -> Result<Self, ProfileError> {
    let profile: Profile = serde_json::from_str(content).map_err(ProfileError::Parse)?;
    if profile.version != PROFILE_VERSION {
      return Err(ProfileError::UnsupportedVersion(profile.version));
    }
    Ok(profile)
  }

  pub fn load(path: &Path) -> Result<Self, ProfileError> {
    let content = fs::read_to_string(path).map_err(|source| ProfileError::Read {
      path: path.display().to_string(),
      source,
    })?;
    Self::parse(&content)
  }

  /// Overlay this profile's settings onto `base`.
  pub fn settings(&self, base: Settings) -> Settings {
    let mut settings = base;
    if let Some(os) = self.settings.os {
      settings.os = os;
    }
    if let Some(arch) = self.settings.arch {
      settings.arch = arch;
    }
    if let Some(build_type) = self.settings.build_type {
      settings.build_type = build_type;
    }
    if let Some(compiler) = &self.settings.compiler {
      settings.compiler = Some(compiler.clone());
    }
    settings
  }

  /// Option overrides as `(name, value)` pairs, in name order.
  pub fn option_overrides(&self) -> Vec<(String, String)> {
    self
      .options
      .iter()
      .map(|(name, value)| (name.clone(), value.to_text()))
      .collect()
  }
}
