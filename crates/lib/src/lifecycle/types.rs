//! Types for recipe lifecycle evaluation.
//!
//! This module defines the lifecycle stages, the hooks that move a recipe
//! between them, the typed outcome each hook produces, and the error type
//! shared by every hook.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::HostError;
use crate::layout::LayoutPolicy;
use crate::options::{DependencyOption, OptionError};
use crate::package::DescriptorError;
use crate::requirements::{DeclareError, RequirementError, RequirementSet};
use crate::toolchain::ToolchainConfig;

/// Where a recipe evaluation currently stands.
///
/// Stages only ever advance, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
  Constructed,
  OptionsFinalized,
  RequirementsDeclared,
  LayoutDeclared,
  Generated,
  Built,
  Packaged,
  InfoExported,
  Done,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Constructed => "constructed",
      Self::OptionsFinalized => "options finalized",
      Self::RequirementsDeclared => "requirements declared",
      Self::LayoutDeclared => "layout declared",
      Self::Generated => "generated",
      Self::Built => "built",
      Self::Packaged => "packaged",
      Self::InfoExported => "info exported",
      Self::Done => "done",
    };
    f.write_str(name)
  }
}

/// The callbacks a host invokes on a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
  ConfigOptions,
  Configure,
  Requirements,
  Layout,
  Generate,
  Build,
  Package,
  PackageInfo,
}

impl fmt::Display for Hook {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::ConfigOptions => "config_options",
      Self::Configure => "configure",
      Self::Requirements => "requirements",
      Self::Layout => "layout",
      Self::Generate => "generate",
      Self::Build => "build",
      Self::Package => "package",
      Self::PackageInfo => "package_info",
    };
    f.write_str(name)
  }
}

/// Coarse classification of a [`RecipeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// Malformed or contradictory option, requirement, or descriptor state.
  Configuration,
  /// A host collaborator failed; the host's error is carried unchanged.
  HostDelegation,
  /// A hook ran without the stages it depends on having completed.
  PartialState,
}

/// Errors that can occur while evaluating a recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
  #[error("configuration error: {0}")]
  Option(#[from] OptionError),

  #[error("configuration error: {0}")]
  Requirement(#[from] RequirementError),

  #[error("configuration error: {0}")]
  Descriptor(#[from] DescriptorError),

  /// The host could not apply our dependency option requests.
  #[error("configuration error: dependency options were not applied: {0}")]
  DependencyOptions(#[source] HostError),

  #[error("configuration error: failed to compute package id: {0}")]
  PackageId(#[from] serde_json::Error),

  #[error(transparent)]
  Host(#[from] HostError),

  #[error("cannot run {hook} while {current}")]
  OutOfOrder { hook: Hook, current: Stage },

  /// The package id was requested before `config_options` ran.
  #[error("options are not finalized yet, run config_options first")]
  OptionsNotFinalized,

  /// Packaging had to build first and that build failed.
  #[error("package could not build missing stages: {source}")]
  LazyBuild {
    #[source]
    source: Box<RecipeError>,
  },

  /// An earlier hook failed; the recipe refuses to continue.
  #[error("recipe halted after {hook} failed while {stage}")]
  Halted { hook: Hook, stage: Stage },
}

impl From<DeclareError> for RecipeError {
  fn from(err: DeclareError) -> Self {
    match err {
      DeclareError::Option(e) => Self::Option(e),
      DeclareError::Requirement(e) => Self::Requirement(e),
    }
  }
}

impl RecipeError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Option(_)
      | Self::Requirement(_)
      | Self::Descriptor(_)
      | Self::DependencyOptions(_)
      | Self::PackageId(_) => ErrorKind::Configuration,
      Self::Host(_) => ErrorKind::HostDelegation,
      Self::OutOfOrder { .. } | Self::OptionsNotFinalized | Self::LazyBuild { .. } | Self::Halted { .. } => {
        ErrorKind::PartialState
      }
    }
  }

  /// The host error at the root of this failure, if any.
  pub fn host_error(&self) -> Option<&HostError> {
    match self {
      Self::Host(e) | Self::DependencyOptions(e) => Some(e),
      Self::LazyBuild { source } => source.host_error(),
      _ => None,
    }
  }
}

/// Consumer-facing information exported by the last stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInfo {
  pub libs: Vec<String>,
}

/// What a single driver step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
  OptionsFinalized { fpic_removed: bool },
  Configured { requests: Vec<DependencyOption> },
  RequirementsDeclared(RequirementSet),
  LayoutDeclared(LayoutPolicy),
  Generated(ToolchainConfig),
  Built,
  Packaged { install_dir: PathBuf },
  InfoExported(CppInfo),
  Done,
}

impl StageOutcome {
  pub fn hook(&self) -> Option<Hook> {
    match self {
      Self::OptionsFinalized { .. } => Some(Hook::ConfigOptions),
      Self::Configured { .. } => Some(Hook::Configure),
      Self::RequirementsDeclared(_) => Some(Hook::Requirements),
      Self::LayoutDeclared(_) => Some(Hook::Layout),
      Self::Generated(_) => Some(Hook::Generate),
      Self::Built => Some(Hook::Build),
      Self::Packaged { .. } => Some(Hook::Package),
      Self::InfoExported(_) => Some(Hook::PackageInfo),
      Self::Done => None,
    }
  }
}
