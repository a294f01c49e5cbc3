//! The recipe state machine.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::types::{CppInfo, Hook, RecipeError, Stage, StageOutcome};
use crate::host::{ArtifactInstaller, BuildExecutor, DependencyResolver, Host, LibraryCollector, ToolchainWriter};
use crate::layout::{LayoutPolicy, declare_layout};
use crate::options::{self, DependencyOption, OptionSet};
use crate::package::PackageDescriptor;
use crate::platform::Settings;
use crate::requirements::{RequirementSet, declare_requirements};
use crate::toolchain::{self, ToolchainConfig};
use crate::util::hash::{Hashable, ObjectHash};

/// One evaluation of a recipe for one set of settings.
///
/// Each hook may run once, in lifecycle order. Hooks called out of order fail
/// with [`RecipeError::OutOfOrder`] and leave the recipe untouched. A hook
/// that fails halts the recipe: every later call fails with
/// [`RecipeError::Halted`].
///
/// Everything a stage produced stays readable afterwards, so tooling that
/// only needs the first few stages can stop early and inspect the result.
#[derive(Debug)]
pub struct Recipe {
  descriptor: PackageDescriptor,
  settings: Settings,
  working_dir: PathBuf,
  options: OptionSet,
  stage: Stage,
  configured: bool,
  dependency_options: Vec<DependencyOption>,
  requirements: Option<RequirementSet>,
  layout: Option<LayoutPolicy>,
  toolchain: Option<ToolchainConfig>,
  built: bool,
  install_dir: Option<PathBuf>,
  cpp_info: Option<CppInfo>,
  halted: Option<(Hook, Stage)>,
}

#[derive(Serialize)]
struct PackageIdInput<'a> {
  settings: &'a Settings,
  options: &'a OptionSet,
}

impl Hashable for PackageIdInput<'_> {}

impl Recipe {
  pub fn new(descriptor: PackageDescriptor, settings: Settings, working_dir: &Path) -> Result<Self, RecipeError> {
    descriptor.validate()?;
    Ok(Self {
      descriptor,
      settings,
      working_dir: working_dir.to_path_buf(),
      options: OptionSet::new(),
      stage: Stage::Constructed,
      configured: false,
      dependency_options: Vec::new(),
      requirements: None,
      layout: None,
      toolchain: None,
      built: false,
      install_dir: None,
      cpp_info: None,
      halted: None,
    })
  }

  /// The roly-poly-engine recipe.
  pub fn roly_poly_engine(settings: Settings, working_dir: &Path) -> Result<Self, RecipeError> {
    Self::new(PackageDescriptor::roly_poly_engine(), settings, working_dir)
  }

  /// Override an option before finalization.
  pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), RecipeError> {
    self.options.set_from_str(name, value)?;
    debug!(option = name, value, "option overridden");
    Ok(())
  }

  pub fn descriptor(&self) -> &PackageDescriptor {
    &self.descriptor
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn working_dir(&self) -> &Path {
    &self.working_dir
  }

  pub fn stage(&self) -> Stage {
    self.stage
  }

  pub fn options(&self) -> &OptionSet {
    &self.options
  }

  pub fn is_configured(&self) -> bool {
    self.configured
  }

  pub fn dependency_options(&self) -> &[DependencyOption] {
    &self.dependency_options
  }

  pub fn declared_requirements(&self) -> Option<&RequirementSet> {
    self.requirements.as_ref()
  }

  pub fn declared_layout(&self) -> Option<&LayoutPolicy> {
    self.layout.as_ref()
  }

  pub fn toolchain_config(&self) -> Option<&ToolchainConfig> {
    self.toolchain.as_ref()
  }

  pub fn is_built(&self) -> bool {
    self.built
  }

  pub fn install_dir(&self) -> Option<&Path> {
    self.install_dir.as_deref()
  }

  pub fn cpp_info(&self) -> Option<&CppInfo> {
    self.cpp_info.as_ref()
  }

  /// The hook that halted this recipe and the stage it was in, if any.
  pub fn halted(&self) -> Option<(Hook, Stage)> {
    self.halted
  }

  /// Identifier of the binary this evaluation produces.
  ///
  /// Only meaningful once options are final.
  pub fn package_id(&self) -> Result<ObjectHash, RecipeError> {
    if self.stage == Stage::Constructed {
      return Err(RecipeError::OptionsNotFinalized);
    }
    let input = PackageIdInput {
      settings: &self.settings,
      options: &self.options,
    };
    Ok(input.compute_hash()?)
  }

  fn enter(&self, hook: Hook, allowed: bool) -> Result<(), RecipeError> {
    if let Some((failed, stage)) = self.halted {
      return Err(RecipeError::Halted { hook: failed, stage });
    }
    if !allowed {
      return Err(RecipeError::OutOfOrder {
        hook,
        current: self.stage,
      });
    }
    Ok(())
  }

  fn track<T>(&mut self, hook: Hook, result: Result<T, RecipeError>) -> Result<T, RecipeError> {
    if let Err(err) = &result {
      warn!(hook = %hook, stage = %self.stage, error = %err, "hook failed, halting recipe");
      self.halted = Some((hook, self.stage));
    }
    result
  }

  fn advance(&mut self, hook: Hook, to: Stage) {
    info!(recipe = %self.descriptor.name, hook = %hook, stage = %to, "stage complete");
    self.stage = to;
  }

  fn require_layout(&self, hook: Hook) -> Result<&LayoutPolicy, RecipeError> {
    self.layout.as_ref().ok_or(RecipeError::OutOfOrder {
      hook,
      current: self.stage,
    })
  }

  /// Remove options the target platform has no use for, then freeze them.
  ///
  /// Returns whether `fPIC` was removed.
  pub fn config_options(&mut self) -> Result<bool, RecipeError> {
    self.enter(Hook::ConfigOptions, self.stage == Stage::Constructed)?;
    let result = options::finalize(&mut self.options, self.settings.os).map_err(RecipeError::from);
    let removed = self.track(Hook::ConfigOptions, result)?;
    self.advance(Hook::ConfigOptions, Stage::OptionsFinalized);
    Ok(removed)
  }

  /// Ask the host to set the options this configuration needs on its
  /// dependencies. Does not change the stage.
  pub fn configure<H: DependencyResolver + ?Sized>(&mut self, host: &mut H) -> Result<Vec<DependencyOption>, RecipeError> {
    self.enter(Hook::Configure, self.stage == Stage::OptionsFinalized && !self.configured)?;
    let result = self.run_configure(host);
    let requests = self.track(Hook::Configure, result)?;

    info!(requests = requests.len(), "dependency options applied");
    self.configured = true;
    self.dependency_options = requests.clone();
    Ok(requests)
  }

  fn run_configure<H: DependencyResolver + ?Sized>(&self, host: &mut H) -> Result<Vec<DependencyOption>, RecipeError> {
    let requests = options::conditional_defaults(&self.options)?;
    host
      .apply_dependency_options(&requests)
      .map_err(RecipeError::DependencyOptions)?;
    Ok(requests)
  }

  /// Declare this configuration's dependencies.
  pub fn requirements(&mut self) -> Result<&RequirementSet, RecipeError> {
    self.enter(
      Hook::Requirements,
      self.stage == Stage::OptionsFinalized && self.configured,
    )?;
    let result = declare_requirements(&self.options).map_err(RecipeError::from);
    let requirements = self.track(Hook::Requirements, result)?;
    self.advance(Hook::Requirements, Stage::RequirementsDeclared);
    Ok(&*self.requirements.insert(requirements))
  }

  /// Record where sources, build output and generated files live.
  pub fn layout(&mut self) -> Result<&LayoutPolicy, RecipeError> {
    self.enter(Hook::Layout, self.stage == Stage::RequirementsDeclared)?;
    let layout = declare_layout(&self.working_dir);
    debug!(build = %layout.build.display(), generators = %layout.generators.display(), "layout declared");
    self.advance(Hook::Layout, Stage::LayoutDeclared);
    Ok(&*self.layout.insert(layout))
  }

  /// Derive the toolchain variables, resolve dependencies and hand both to
  /// the host's toolchain writer.
  pub fn generate<H: DependencyResolver + ToolchainWriter + ?Sized>(
    &mut self,
    host: &mut H,
  ) -> Result<&ToolchainConfig, RecipeError> {
    self.enter(Hook::Generate, self.stage == Stage::LayoutDeclared)?;
    let result = self.run_generate(host);
    let config = self.track(Hook::Generate, result)?;
    self.advance(Hook::Generate, Stage::Generated);
    Ok(&*self.toolchain.insert(config))
  }

  fn run_generate<H: DependencyResolver + ToolchainWriter + ?Sized>(
    &self,
    host: &mut H,
  ) -> Result<ToolchainConfig, RecipeError> {
    let layout = self.require_layout(Hook::Generate)?;
    let requirements = self.requirements.as_ref().ok_or(RecipeError::OutOfOrder {
      hook: Hook::Generate,
      current: self.stage,
    })?;

    let config = toolchain::generate(&self.options)?;
    let resolved = host.resolve(requirements)?;
    debug!(resolved = resolved.len(), "dependencies resolved");

    let path = host.write_toolchain(&config, &layout.generators)?;
    debug!(path = %path.display(), "toolchain handed to host");
    Ok(config)
  }

  /// Configure and compile through the host's build executor.
  pub fn build<H: BuildExecutor + ?Sized>(&mut self, host: &mut H) -> Result<(), RecipeError> {
    self.enter(Hook::Build, self.stage == Stage::Generated)?;
    let result = self.run_build(host);
    self.track(Hook::Build, result)?;
    self.built = true;
    self.advance(Hook::Build, Stage::Built);
    Ok(())
  }

  fn run_build<H: BuildExecutor + ?Sized>(&self, host: &mut H) -> Result<(), RecipeError> {
    let layout = self.require_layout(Hook::Build)?;
    host.configure(layout)?;
    host.build(layout)?;
    Ok(())
  }

  /// Copy the license and install the build output.
  ///
  /// When nothing was built in this evaluation, every missing stage up to
  /// and including the build runs first. A failure there is reported as
  /// [`RecipeError::LazyBuild`].
  pub fn package<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<&Path, RecipeError> {
    self.enter(
      Hook::Package,
      self.stage >= Stage::OptionsFinalized && self.stage <= Stage::Built,
    )?;

    if !self.built {
      info!(stage = %self.stage, "nothing built yet, building before packaging");
      self
        .build_missing_stages(host)
        .map_err(|err| RecipeError::LazyBuild { source: Box::new(err) })?;
    }

    let result = self.run_package(host);
    let install_dir = self.track(Hook::Package, result)?;
    self.advance(Hook::Package, Stage::Packaged);
    Ok(self.install_dir.insert(install_dir).as_path())
  }

  fn build_missing_stages<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), RecipeError> {
    if !self.configured {
      self.configure(host)?;
    }
    if self.stage == Stage::OptionsFinalized {
      self.requirements()?;
    }
    if self.stage == Stage::RequirementsDeclared {
      self.layout()?;
    }
    if self.stage == Stage::LayoutDeclared {
      self.generate(host)?;
    }
    if self.stage == Stage::Generated {
      self.build(host)?;
    }
    Ok(())
  }

  fn run_package<H: ArtifactInstaller + ?Sized>(&self, host: &mut H) -> Result<PathBuf, RecipeError> {
    let layout = self.require_layout(Hook::Package)?;
    host.copy_license(layout)?;
    Ok(host.install(layout)?)
  }

  /// Collect the library names consumers link against.
  pub fn package_info<H: LibraryCollector + ?Sized>(&mut self, host: &mut H) -> Result<&CppInfo, RecipeError> {
    self.enter(Hook::PackageInfo, self.stage == Stage::Packaged)?;
    let result = self.run_package_info(host);
    let info = self.track(Hook::PackageInfo, result)?;
    self.advance(Hook::PackageInfo, Stage::InfoExported);
    Ok(&*self.cpp_info.insert(info))
  }

  fn run_package_info<H: LibraryCollector + ?Sized>(&self, host: &mut H) -> Result<CppInfo, RecipeError> {
    let install_dir = self.install_dir.as_deref().ok_or(RecipeError::OutOfOrder {
      hook: Hook::PackageInfo,
      current: self.stage,
    })?;
    let libs = host.collect_libs(install_dir)?;
    Ok(CppInfo { libs })
  }

  /// Run the next hook in lifecycle order.
  ///
  /// Returns `Ok(None)` once the recipe is done.
  pub fn next_stage<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Option<StageOutcome>, RecipeError> {
    if let Some((hook, stage)) = self.halted {
      return Err(RecipeError::Halted { hook, stage });
    }

    let outcome = match self.stage {
      Stage::Constructed => StageOutcome::OptionsFinalized {
        fpic_removed: self.config_options()?,
      },
      Stage::OptionsFinalized if !self.configured => StageOutcome::Configured {
        requests: self.configure(host)?,
      },
      Stage::OptionsFinalized => StageOutcome::RequirementsDeclared(self.requirements()?.clone()),
      Stage::RequirementsDeclared => StageOutcome::LayoutDeclared(self.layout()?.clone()),
      Stage::LayoutDeclared => StageOutcome::Generated(self.generate(host)?.clone()),
      Stage::Generated => {
        self.build(host)?;
        StageOutcome::Built
      }
      Stage::Built => StageOutcome::Packaged {
        install_dir: self.package(host)?.to_path_buf(),
      },
      Stage::Packaged => StageOutcome::InfoExported(self.package_info(host)?.clone()),
      Stage::InfoExported => {
        info!(recipe = %self.descriptor.name, "recipe evaluation done");
        self.stage = Stage::Done;
        StageOutcome::Done
      }
      Stage::Done => return Ok(None),
    };
    Ok(Some(outcome))
  }

  /// Drive the recipe until it reaches `target`, returning every outcome.
  pub fn run_until<H: Host + ?Sized>(&mut self, target: Stage, host: &mut H) -> Result<Vec<StageOutcome>, RecipeError> {
    let mut outcomes = Vec::new();
    while self.stage < target {
      match self.next_stage(host)? {
        Some(outcome) => outcomes.push(outcome),
        None => break,
      }
    }
    Ok(outcomes)
  }

  /// Drive the recipe to completion.
  pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Vec<StageOutcome>, RecipeError> {
    self.run_until(Stage::Done, host)
  }
}
