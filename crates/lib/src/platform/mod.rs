//! Target platform and recipe settings.
//!
//! Settings are the inputs a host evaluates a recipe for: operating system,
//! architecture, build type and (optionally) the compiler. The recipe reads
//! them but never changes them.

pub mod arch;
pub mod os;

use std::fmt;
use std::str::FromStr;

use arch::Arch;
use os::Os;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing platform settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
  #[error("unsupported operating system: {0}")]
  UnknownOs(String),

  #[error("unsupported architecture: {0}")]
  UnknownArch(String),

  #[error("unknown build type: {0}")]
  UnknownBuildType(String),

  #[error("unknown setting: {0}")]
  UnknownSetting(String),
}

/// Platform identifier combining architecture and OS (e.g., "x86_64-Linux")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the platform triple string (e.g., "armv8-Macos")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

/// CMake-style build configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
  Debug,
  #[default]
  Release,
  RelWithDebInfo,
  MinSizeRel,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
      Self::RelWithDebInfo => "RelWithDebInfo",
      Self::MinSizeRel => "MinSizeRel",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Debug" => Ok(Self::Debug),
      "Release" => Ok(Self::Release),
      "RelWithDebInfo" => Ok(Self::RelWithDebInfo),
      "MinSizeRel" => Ok(Self::MinSizeRel),
      _ => Err(PlatformError::UnknownBuildType(s.to_string())),
    }
  }
}

/// The settings a recipe is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
  pub os: Os,
  pub arch: Arch,
  #[serde(default)]
  pub build_type: BuildType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compiler: Option<String>,
}

impl Settings {
  pub fn new(os: Os, arch: Arch) -> Self {
    Self {
      os,
      arch,
      build_type: BuildType::default(),
      compiler: None,
    }
  }

  /// Settings for the machine we're running on, in Release mode.
  ///
  /// Returns `None` if the current platform is not supported
  pub fn detect() -> Option<Self> {
    let platform = Platform::current()?;
    Some(Self::new(platform.os, platform.arch))
  }

  pub fn platform(&self) -> Platform {
    Platform::new(self.arch, self.os)
  }

  /// Apply a single `key=value` setting override.
  pub fn set(&mut self, key: &str, value: &str) -> Result<(), PlatformError> {
    match key {
      "os" => self.os = value.parse()?,
      "arch" => self.arch = value.parse()?,
      "build_type" => self.build_type = value.parse()?,
      "compiler" => self.compiler = Some(value.to_string()),
      _ => return Err(PlatformError::UnknownSetting(key.to_string())),
    }
    Ok(())
  }
}
