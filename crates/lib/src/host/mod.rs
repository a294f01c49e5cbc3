//! Host collaborators.
//!
//! The recipe never performs I/O itself. Dependency resolution, toolchain
//! files, compilation, installation and library discovery all happen through
//! the traits below, implemented by whoever drives the lifecycle. Their
//! errors reach the caller unchanged.
//!
//! # Submodules
//!
//! - [`local`] - A host for local development builds driven by `cmake`

pub mod local;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutPolicy;
use crate::options::DependencyOption;
use crate::requirements::RequirementSet;
use crate::toolchain::ToolchainConfig;

/// Which collaborator produced a [`HostError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collaborator {
  Resolver,
  ToolchainWriter,
  BuildExecutor,
  Installer,
  LibraryCollector,
}

impl fmt::Display for Collaborator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Resolver => "dependency resolver",
      Self::ToolchainWriter => "toolchain writer",
      Self::BuildExecutor => "build executor",
      Self::Installer => "artifact installer",
      Self::LibraryCollector => "library collector",
    };
    f.write_str(name)
  }
}

/// A failure reported by a host collaborator.
///
/// `status` carries the exit status of an external tool verbatim when there
/// is one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{collaborator} failed: {message}")]
pub struct HostError {
  pub collaborator: Collaborator,
  pub message: String,
  pub status: Option<i32>,
}

impl HostError {
  pub fn new(collaborator: Collaborator, message: impl Into<String>) -> Self {
    Self {
      collaborator,
      message: message.into(),
      status: None,
    }
  }

  pub fn with_status(mut self, status: Option<i32>) -> Self {
    self.status = status;
    self
  }
}

/// Where the resolver found one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
  pub name: String,
  pub version: String,
  pub prefix: PathBuf,
  pub include_dir: PathBuf,
  pub lib_dir: PathBuf,
}

pub trait DependencyResolver {
  /// Apply option requests to the named dependencies before resolution.
  fn apply_dependency_options(&mut self, requests: &[DependencyOption]) -> Result<(), HostError>;

  fn resolve(&mut self, requirements: &RequirementSet) -> Result<Vec<ResolvedDependency>, HostError>;
}

pub trait ToolchainWriter {
  /// Write the toolchain description into `generators_dir`, returning its path.
  fn write_toolchain(&mut self, config: &ToolchainConfig, generators_dir: &Path) -> Result<PathBuf, HostError>;
}

pub trait BuildExecutor {
  fn configure(&mut self, layout: &LayoutPolicy) -> Result<(), HostError>;

  fn build(&mut self, layout: &LayoutPolicy) -> Result<(), HostError>;
}

pub trait ArtifactInstaller {
  fn copy_license(&mut self, layout: &LayoutPolicy) -> Result<(), HostError>;

  /// Install the build output, returning the install tree.
  fn install(&mut self, layout: &LayoutPolicy) -> Result<PathBuf, HostError>;
}

pub trait LibraryCollector {
  fn collect_libs(&self, install_dir: &Path) -> Result<Vec<String>, HostError>;
}

/// Everything a recipe needs from its driver.
pub trait Host: DependencyResolver + ToolchainWriter + BuildExecutor + ArtifactInstaller + LibraryCollector {}

impl<T> Host for T where T: DependencyResolver + ToolchainWriter + BuildExecutor + ArtifactInstaller + LibraryCollector {}
