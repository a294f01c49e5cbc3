//! Local development host.
//!
//! Drives `cmake` on the current machine. Dependencies are expected to be
//! pre-installed under a prefix root as `<root>/<name>/<version>`; this host
//! never downloads or caches anything.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{
  ArtifactInstaller, BuildExecutor, Collaborator, DependencyResolver, HostError, LibraryCollector, ResolvedDependency,
  ToolchainWriter,
};
use crate::consts::{DEPENDENCY_OPTIONS_FILENAME, LICENSE_FILENAME, LICENSES_FOLDER, TOOLCHAIN_FILENAME};
use crate::layout::LayoutPolicy;
use crate::options::DependencyOption;
use crate::platform::BuildType;
use crate::requirements::RequirementSet;
use crate::toolchain::ToolchainConfig;

/// File extensions recognized as libraries in an install tree.
const LIB_EXTENSIONS: &[&str] = &["a", "so", "dylib", "lib", "dll"];

/// Install-tree folders searched for libraries.
const LIB_FOLDERS: &[&str] = &["lib", "bin"];

#[derive(Debug, Clone)]
pub struct LocalHostConfig {
  /// Folder holding the recipe, its `LICENSE`, and the source folder.
  pub recipe_root: PathBuf,
  /// Install prefix for the packaged artifacts.
  pub package_dir: PathBuf,
  /// Root of pre-installed dependency prefixes.
  pub deps_root: Option<PathBuf>,
  /// Program used for configure, build and install.
  pub cmake: String,
  pub build_type: BuildType,
}

impl LocalHostConfig {
  pub fn new(recipe_root: &Path, package_dir: &Path) -> Self {
    Self {
      recipe_root: recipe_root.to_path_buf(),
      package_dir: package_dir.to_path_buf(),
      deps_root: None,
      cmake: "cmake".to_string(),
      build_type: BuildType::default(),
    }
  }
}

pub struct LocalHost {
  config: LocalHostConfig,
  dependency_options: BTreeMap<String, BTreeMap<String, String>>,
  resolved: Vec<ResolvedDependency>,
  toolchain_file: Option<PathBuf>,
  installed: bool,
}

impl LocalHost {
  pub fn new(config: LocalHostConfig) -> Self {
    Self {
      config,
      dependency_options: BTreeMap::new(),
      resolved: Vec::new(),
      toolchain_file: None,
      installed: false,
    }
  }

  pub fn config(&self) -> &LocalHostConfig {
    &self.config
  }

  /// Option values requested for each dependency so far.
  pub fn dependency_options(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
    &self.dependency_options
  }

  pub fn resolved(&self) -> &[ResolvedDependency] {
    &self.resolved
  }

  fn run_cmake(&self, collaborator: Collaborator, args: Vec<OsString>) -> Result<(), HostError> {
    info!(cmake = %self.config.cmake, args = ?args, "running build tool");

    let status = Command::new(&self.config.cmake)
      .args(&args)
      .status()
      .map_err(|e| HostError::new(collaborator, format!("failed to run {}: {}", self.config.cmake, e)))?;

    if !status.success() {
      return Err(
        HostError::new(collaborator, format!("{} exited with {}", self.config.cmake, status)).with_status(status.code()),
      );
    }
    Ok(())
  }
}

impl DependencyResolver for LocalHost {
  fn apply_dependency_options(&mut self, requests: &[DependencyOption]) -> Result<(), HostError> {
    for request in requests {
      if request.package.is_empty() || request.option.is_empty() {
        return Err(HostError::new(
          Collaborator::Resolver,
          format!("malformed dependency option request '{}'", request),
        ));
      }
      debug!(request = %request, "recording dependency option");
      self
        .dependency_options
        .entry(request.package.clone())
        .or_default()
        .insert(request.option.clone(), request.value.clone());
    }
    Ok(())
  }

  fn resolve(&mut self, requirements: &RequirementSet) -> Result<Vec<ResolvedDependency>, HostError> {
    let Some(root) = &self.config.deps_root else {
      debug!("no dependency root configured, relying on the build tool's search paths");
      self.resolved.clear();
      return Ok(Vec::new());
    };

    let resolved: Vec<ResolvedDependency> = requirements
      .all()
      .map(|req| {
        let prefix = root.join(&req.name).join(&req.version);
        if !prefix.exists() {
          warn!(dependency = %req, prefix = %prefix.display(), "dependency prefix does not exist");
        }
        ResolvedDependency {
          name: req.name.clone(),
          version: req.version.clone(),
          include_dir: prefix.join("include"),
          lib_dir: prefix.join("lib"),
          prefix,
        }
      })
      .collect();

    self.resolved = resolved.clone();
    Ok(resolved)
  }
}

impl ToolchainWriter for LocalHost {
  fn write_toolchain(&mut self, config: &ToolchainConfig, generators_dir: &Path) -> Result<PathBuf, HostError> {
    let io_err = |what: &str, path: &Path, e: std::io::Error| {
      HostError::new(
        Collaborator::ToolchainWriter,
        format!("failed to {} {}: {}", what, path.display(), e),
      )
    };

    fs::create_dir_all(generators_dir).map_err(|e| io_err("create", generators_dir, e))?;

    let toolchain_path = generators_dir.join(TOOLCHAIN_FILENAME);
    let content = config.to_cmake_with_prefixes(self.resolved.iter().map(|dep| dep.prefix.as_path()));
    fs::write(&toolchain_path, content).map_err(|e| io_err("write", &toolchain_path, e))?;

    let options_path = generators_dir.join(DEPENDENCY_OPTIONS_FILENAME);
    let options_json = serde_json::to_string_pretty(&self.dependency_options).map_err(|e| {
      HostError::new(
        Collaborator::ToolchainWriter,
        format!("failed to serialize dependency options: {}", e),
      )
    })?;
    fs::write(&options_path, format!("{}\n", options_json)).map_err(|e| io_err("write", &options_path, e))?;

    info!(path = %toolchain_path.display(), "toolchain written");
    self.toolchain_file = Some(toolchain_path.clone());
    Ok(toolchain_path)
  }
}

impl BuildExecutor for LocalHost {
  fn configure(&mut self, layout: &LayoutPolicy) -> Result<(), HostError> {
    let toolchain = self
      .toolchain_file
      .clone()
      .unwrap_or_else(|| layout.generators.join(TOOLCHAIN_FILENAME));

    let mut toolchain_arg = OsString::from("-DCMAKE_TOOLCHAIN_FILE=");
    toolchain_arg.push(&toolchain);

    self.run_cmake(
      Collaborator::BuildExecutor,
      vec![
        "-S".into(),
        layout.source_dir(&self.config.recipe_root).into_os_string(),
        "-B".into(),
        layout.build.clone().into_os_string(),
        toolchain_arg,
        format!("-DCMAKE_BUILD_TYPE={}", self.config.build_type).into(),
      ],
    )
  }

  fn build(&mut self, layout: &LayoutPolicy) -> Result<(), HostError> {
    self.run_cmake(
      Collaborator::BuildExecutor,
      vec![
        "--build".into(),
        layout.build.clone().into_os_string(),
        "--config".into(),
        self.config.build_type.as_str().into(),
      ],
    )
  }
}

impl ArtifactInstaller for LocalHost {
  fn copy_license(&mut self, _layout: &LayoutPolicy) -> Result<(), HostError> {
    let source = self.config.recipe_root.join(LICENSE_FILENAME);
    if !source.is_file() {
      warn!(path = %source.display(), "no license file to package");
      return Ok(());
    }

    let dest_dir = self.config.package_dir.join(LICENSES_FOLDER);
    let copy = || -> std::io::Result<()> {
      fs::create_dir_all(&dest_dir)?;
      fs::copy(&source, dest_dir.join(LICENSE_FILENAME))?;
      Ok(())
    };
    copy().map_err(|e| HostError::new(Collaborator::Installer, format!("failed to copy license: {}", e)))?;

    debug!(dest = %dest_dir.display(), "license copied");
    Ok(())
  }

  fn install(&mut self, layout: &LayoutPolicy) -> Result<PathBuf, HostError> {
    if self.installed {
      debug!(prefix = %self.config.package_dir.display(), "already installed");
      return Ok(self.config.package_dir.clone());
    }

    self.run_cmake(
      Collaborator::Installer,
      vec![
        "--install".into(),
        layout.build.clone().into_os_string(),
        "--config".into(),
        self.config.build_type.as_str().into(),
        "--prefix".into(),
        self.config.package_dir.clone().into_os_string(),
      ],
    )?;

    self.installed = true;
    Ok(self.config.package_dir.clone())
  }
}

impl LibraryCollector for LocalHost {
  fn collect_libs(&self, install_dir: &Path) -> Result<Vec<String>, HostError> {
    let mut libs = Vec::new();

    for folder in LIB_FOLDERS {
      let dir = install_dir.join(folder);
      if !dir.is_dir() {
        continue;
      }
      for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
          HostError::new(
            Collaborator::LibraryCollector,
            format!("failed to walk {}: {}", dir.display(), e),
          )
        })?;
        if !entry.file_type().is_file() {
          continue;
        }
        if let Some(name) = entry.file_name().to_str().and_then(library_name) {
          libs.push(name);
        }
      }
    }

    libs.sort();
    libs.dedup();
    debug!(libs = ?libs, "collected libraries");
    Ok(libs)
  }
}

/// Link name of a library file, e.g. `libktx.so.4.0` -> `ktx`.
fn library_name(file_name: &str) -> Option<String> {
  let stem = match file_name.find(".so.") {
    Some(idx) => &file_name[..idx],
    None => {
      let (stem, ext) = file_name.rsplit_once('.')?;
      if !LIB_EXTENSIONS.contains(&ext) {
        return None;
      }
      stem
    }
  };

  let name = stem.strip_prefix("lib").filter(|s| !s.is_empty()).unwrap_or(stem);
  if name.is_empty() {
    return None;
  }
  Some(name.to_string())
}
