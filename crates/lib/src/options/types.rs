use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors raised when option state is read or written incorrectly.
///
/// Every variant is a configuration error: a removed option being consulted
/// is a bug in the consulting stage, not a value to fall back from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
  #[error("option '{0}' is not available for this configuration")]
  Removed(OptionName),

  #[error("unknown option '{0}'")]
  Unknown(String),

  #[error("invalid value '{value}' for option '{name}', expected True or False")]
  InvalidValue { name: OptionName, value: String },

  #[error("option '{0}' cannot change after options are finalized")]
  Frozen(OptionName),
}

/// The options this recipe recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionName {
  Shared,
  Fpic,
  WithValidationLayers,
  BuildTests,
  Verbose,
}

impl OptionName {
  /// Schema order. Also the order options are listed and serialized in.
  pub const ALL: [OptionName; 5] = [
    OptionName::Shared,
    OptionName::Fpic,
    OptionName::WithValidationLayers,
    OptionName::BuildTests,
    OptionName::Verbose,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Shared => "shared",
      Self::Fpic => "fPIC",
      Self::WithValidationLayers => "with_validation_layers",
      Self::BuildTests => "build_tests",
      Self::Verbose => "verbose",
    }
  }

  fn default_value(&self) -> bool {
    match self {
      Self::Shared => false,
      Self::Fpic => true,
      Self::WithValidationLayers => true,
      Self::BuildTests => true,
      Self::Verbose => false,
    }
  }

  fn index(&self) -> usize {
    *self as usize
  }
}

impl fmt::Display for OptionName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for OptionName {
  type Err = OptionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|name| name.as_str() == s)
      .ok_or_else(|| OptionError::Unknown(s.to_string()))
  }
}

/// Parse an option literal the way recipe profiles spell booleans.
pub fn parse_bool(name: OptionName, value: &str) -> Result<bool, OptionError> {
  match value {
    "True" | "true" | "1" => Ok(true),
    "False" | "false" | "0" => Ok(false),
    _ => Err(OptionError::InvalidValue {
      name,
      value: value.to_string(),
    }),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OptionSlot {
  value: bool,
  present: bool,
}

/// Fixed-schema option storage.
///
/// Every recognized option has a slot. Platform-conditional options are
/// removed by clearing the slot's `present` flag, and every read checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
  slots: [OptionSlot; 5],
  frozen: bool,
}

impl Default for OptionSet {
  fn default() -> Self {
    Self::new()
  }
}

impl OptionSet {
  /// An option set holding every option at its default value.
  pub fn new() -> Self {
    Self {
      slots: OptionName::ALL.map(|name| OptionSlot {
        value: name.default_value(),
        present: true,
      }),
      frozen: false,
    }
  }

  pub fn get(&self, name: OptionName) -> Result<bool, OptionError> {
    let slot = self.slots[name.index()];
    if !slot.present {
      return Err(OptionError::Removed(name));
    }
    Ok(slot.value)
  }

  pub fn is_present(&self, name: OptionName) -> bool {
    self.slots[name.index()].present
  }

  pub fn set(&mut self, name: OptionName, value: bool) -> Result<(), OptionError> {
    if self.frozen {
      return Err(OptionError::Frozen(name));
    }
    let slot = &mut self.slots[name.index()];
    if !slot.present {
      return Err(OptionError::Removed(name));
    }
    slot.value = value;
    Ok(())
  }

  /// Apply a textual `name=value` override, e.g. from a profile or the CLI.
  pub fn set_from_str(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
    let name: OptionName = name.parse()?;
    let value = parse_bool(name, value)?;
    self.set(name, value)
  }

  /// Remove an option from this configuration.
  ///
  /// Returns whether the option was present. Removing an absent option is a
  /// no-op.
  pub fn remove(&mut self, name: OptionName) -> Result<bool, OptionError> {
    if self.frozen {
      return Err(OptionError::Frozen(name));
    }
    let slot = &mut self.slots[name.index()];
    let was_present = slot.present;
    slot.present = false;
    Ok(was_present)
  }

  pub fn freeze(&mut self) {
    self.frozen = true;
  }

  pub fn is_frozen(&self) -> bool {
    self.frozen
  }

  /// Present options with their values, in schema order.
  pub fn present(&self) -> impl Iterator<Item = (OptionName, bool)> + '_ {
    OptionName::ALL
      .into_iter()
      .filter(|name| self.is_present(*name))
      .map(|name| (name, self.slots[name.index()].value))
  }
}

impl Serialize for OptionSet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    for (name, value) in self.present() {
      map.serialize_entry(name.as_str(), &value)?;
    }
    map.end()
  }
}

/// A request to set an option on one of our dependencies.
///
/// The recipe never touches another package's options itself; it hands these
/// to the host, which owns every package's option namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyOption {
  pub package: String,
  pub option: String,
  pub value: String,
}

impl DependencyOption {
  pub fn new(package: &str, option: &str, value: &str) -> Self {
    Self {
      package: package.to_string(),
      option: option.to_string(),
      value: value.to_string(),
    }
  }
}

impl fmt::Display for DependencyOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}={}", self.package, self.option, self.value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_recipe() {
    let options = OptionSet::new();
    assert!(!options.get(OptionName::Shared).unwrap());
    assert!(options.get(OptionName::Fpic).unwrap());
    assert!(options.get(OptionName::WithValidationLayers).unwrap());
    assert!(options.get(OptionName::BuildTests).unwrap());
    assert!(!options.get(OptionName::Verbose).unwrap());
  }

  #[test]
  fn removed_option_cannot_be_read_or_written() {
    let mut options = OptionSet::new();
    assert!(options.remove(OptionName::Fpic).unwrap());

    assert_eq!(options.get(OptionName::Fpic), Err(OptionError::Removed(OptionName::Fpic)));
    assert_eq!(
      options.set(OptionName::Fpic, true),
      Err(OptionError::Removed(OptionName::Fpic))
    );
    assert!(!options.is_present(OptionName::Fpic));
  }

  #[test]
  fn remove_is_idempotent() {
    let mut options = OptionSet::new();
    assert!(options.remove(OptionName::Fpic).unwrap());
    assert!(!options.remove(OptionName::Fpic).unwrap());
  }

  #[test]
  fn frozen_set_rejects_writes() {
    let mut options = OptionSet::new();
    options.freeze();
    assert_eq!(
      options.set(OptionName::Verbose, true),
      Err(OptionError::Frozen(OptionName::Verbose))
    );
    assert_eq!(
      options.remove(OptionName::Fpic),
      Err(OptionError::Frozen(OptionName::Fpic))
    );
  }

  #[test]
  fn set_from_str_accepts_profile_spellings() {
    let mut options = OptionSet::new();
    options.set_from_str("shared", "True").unwrap();
    options.set_from_str("build_tests", "0").unwrap();
    assert!(options.get(OptionName::Shared).unwrap());
    assert!(!options.get(OptionName::BuildTests).unwrap());
  }

  #[test]
  fn set_from_str_rejects_unknown_names_and_values() {
    let mut options = OptionSet::new();
    assert_eq!(
      options.set_from_str("with_ray_tracing", "True"),
      Err(OptionError::Unknown("with_ray_tracing".to_string()))
    );
    assert!(matches!(
      options.set_from_str("verbose", "yes"),
      Err(OptionError::InvalidValue {
        name: OptionName::Verbose,
        ..
      })
    ));
  }

  #[test]
  fn option_names_round_trip_through_strings() {
    for name in OptionName::ALL {
      assert_eq!(name.as_str().parse::<OptionName>().unwrap(), name);
    }
  }

  #[test]
  fn serialization_skips_removed_options() {
    let mut options = OptionSet::new();
    options.remove(OptionName::Fpic).unwrap();
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(
      json,
      r#"{"shared":false,"with_validation_layers":true,"build_tests":true,"verbose":false}"#
    );
  }

  #[test]
  fn dependency_option_display() {
    let request = DependencyOption::new("unity", "fixture_extension", "True");
    assert_eq!(request.to_string(), "unity:fixture_extension=True");
  }
}
