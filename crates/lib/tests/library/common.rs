//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use rolypoly_lib::host::{
  ArtifactInstaller, BuildExecutor, Collaborator, DependencyResolver, HostError, LibraryCollector, ResolvedDependency,
  ToolchainWriter,
};
use rolypoly_lib::layout::LayoutPolicy;
use rolypoly_lib::lifecycle::Recipe;
use rolypoly_lib::options::DependencyOption;
use rolypoly_lib::platform::Settings;
use rolypoly_lib::platform::arch::Arch;
use rolypoly_lib::platform::os::Os;
use rolypoly_lib::requirements::RequirementSet;
use rolypoly_lib::toolchain::ToolchainConfig;

/// A collaborator call observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  ApplyOptions(Vec<DependencyOption>),
  Resolve(usize),
  WriteToolchain(PathBuf),
  Configure,
  Build,
  CopyLicense,
  Install,
}

/// In-memory host that records every call and fails on request.
#[derive(Debug, Default)]
pub struct RecordingHost {
  pub calls: Vec<Call>,
  pub toolchains: Vec<ToolchainConfig>,
  pub resolved_names: Vec<String>,
  pub fail_apply: Option<HostError>,
  pub fail_resolve: Option<HostError>,
  pub fail_build: Option<HostError>,
  pub fail_install: Option<HostError>,
  pub libs: Vec<String>,
}

impl RecordingHost {
  pub fn new() -> Self {
    Self {
      libs: vec!["roly-poly-engine".to_string()],
      ..Default::default()
    }
  }

  pub fn count(&self, call: fn(&Call) -> bool) -> usize {
    self.calls.iter().filter(|c| call(c)).count()
  }
}

pub fn install_dir() -> PathBuf {
  PathBuf::from("/packages/roly-poly-engine")
}

impl DependencyResolver for RecordingHost {
  fn apply_dependency_options(&mut self, requests: &[DependencyOption]) -> Result<(), HostError> {
    self.calls.push(Call::ApplyOptions(requests.to_vec()));
    match self.fail_apply.clone() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }

  fn resolve(&mut self, requirements: &RequirementSet) -> Result<Vec<ResolvedDependency>, HostError> {
    self.calls.push(Call::Resolve(requirements.len()));
    if let Some(err) = self.fail_resolve.clone() {
      return Err(err);
    }
    let resolved: Vec<ResolvedDependency> = requirements
      .all()
      .map(|req| {
        let prefix = PathBuf::from("/deps").join(&req.name);
        ResolvedDependency {
          name: req.name.clone(),
          version: req.version.clone(),
          include_dir: prefix.join("include"),
          lib_dir: prefix.join("lib"),
          prefix,
        }
      })
      .collect();
    self.resolved_names = resolved.iter().map(|dep| dep.name.clone()).collect();
    Ok(resolved)
  }
}

impl ToolchainWriter for RecordingHost {
  fn write_toolchain(&mut self, config: &ToolchainConfig, generators_dir: &Path) -> Result<PathBuf, HostError> {
    self.calls.push(Call::WriteToolchain(generators_dir.to_path_buf()));
    self.toolchains.push(config.clone());
    Ok(generators_dir.join("conan_toolchain.cmake"))
  }
}

impl BuildExecutor for RecordingHost {
  fn configure(&mut self, _layout: &LayoutPolicy) -> Result<(), HostError> {
    self.calls.push(Call::Configure);
    Ok(())
  }

  fn build(&mut self, _layout: &LayoutPolicy) -> Result<(), HostError> {
    self.calls.push(Call::Build);
    match self.fail_build.clone() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }
}

impl ArtifactInstaller for RecordingHost {
  fn copy_license(&mut self, _layout: &LayoutPolicy) -> Result<(), HostError> {
    self.calls.push(Call::CopyLicense);
    Ok(())
  }

  fn install(&mut self, _layout: &LayoutPolicy) -> Result<PathBuf, HostError> {
    self.calls.push(Call::Install);
    match self.fail_install.clone() {
      Some(err) => Err(err),
      None => Ok(install_dir()),
    }
  }
}

impl LibraryCollector for RecordingHost {
  fn collect_libs(&self, _install_dir: &Path) -> Result<Vec<String>, HostError> {
    Ok(self.libs.clone())
  }
}

pub fn recipe_for(os: Os) -> Recipe {
  Recipe::roly_poly_engine(Settings::new(os, Arch::X86_64), Path::new("/work/engine/build")).unwrap()
}

pub fn build_failure(status: i32) -> HostError {
  HostError::new(Collaborator::BuildExecutor, format!("cmake exited with status {status}")).with_status(Some(status))
}
