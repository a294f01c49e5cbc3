use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
  #[error("requirement '{0}' must be written as name/version")]
  MissingVersion(String),

  #[error("requirement '{reference}' has an invalid name")]
  InvalidName { reference: String },

  #[error("requirement '{reference}' has an invalid version")]
  InvalidVersion { reference: String },

  #[error("requirement '{0}' must not carry a user/channel")]
  UserChannel(String),
}

/// A pinned dependency on another package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Requirement {
  pub name: String,
  pub version: String,
}

impl Requirement {
  /// Parse a `name/version` reference.
  pub fn parse(reference: &str) -> Result<Self, RequirementError> {
    if reference.contains('@') {
      return Err(RequirementError::UserChannel(reference.to_string()));
    }

    let (name, version) = reference
      .split_once('/')
      .ok_or_else(|| RequirementError::MissingVersion(reference.to_string()))?;

    let name_ok = !name.is_empty()
      && name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '+' | '-'));
    if !name_ok {
      return Err(RequirementError::InvalidName {
        reference: reference.to_string(),
      });
    }

    let version_ok =
      !version.is_empty() && version.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'));
    if !version_ok {
      return Err(RequirementError::InvalidVersion {
        reference: reference.to_string(),
      });
    }

    Ok(Self {
      name: name.to_string(),
      version: version.to_string(),
    })
  }
}

impl FromStr for Requirement {
  type Err = RequirementError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.name, self.version)
  }
}

/// The dependencies declared for one recipe evaluation.
///
/// `requires` are linked libraries handed to the resolver in declaration
/// order. `runtime_requires` are loaded by the engine at runtime and never
/// linked, so they are kept apart and do not count towards [`len`]. The
/// resolver still needs both; [`all`] walks them together.
///
/// [`len`]: RequirementSet::len
/// [`all`]: RequirementSet::all
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSet {
  pub requires: Vec<Requirement>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub runtime_requires: Vec<Requirement>,
}

impl RequirementSet {
  /// Parse every reference, failing the whole set on the first bad entry.
  pub fn from_references(references: &[&str]) -> Result<Self, RequirementError> {
    let requires = references
      .iter()
      .map(|reference| Requirement::parse(reference))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self {
      requires,
      runtime_requires: Vec::new(),
    })
  }

  pub fn len(&self) -> usize {
    self.requires.len()
  }

  pub fn is_empty(&self) -> bool {
    self.requires.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
    self.requires.iter()
  }

  /// Linked requirements followed by runtime requirements.
  pub fn all(&self) -> impl Iterator<Item = &Requirement> + '_ {
    self.requires.iter().chain(self.runtime_requires.iter())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.requires.iter().any(|r| r.name == name)
  }

  pub fn get(&self, name: &str) -> Option<&Requirement> {
    self.requires.iter().find(|r| r.name == name)
  }
}

impl<'a> IntoIterator for &'a RequirementSet {
  type Item = &'a Requirement;
  type IntoIter = std::slice::Iter<'a, Requirement>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
