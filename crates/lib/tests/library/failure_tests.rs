use rolypoly_lib::host::{Collaborator, HostError};
use rolypoly_lib::lifecycle::{ErrorKind, Hook, RecipeError, Stage};
use rolypoly_lib::platform::os::Os;

use super::common::{Call, RecordingHost, build_failure, recipe_for};

#[test]
fn build_failure_status_reaches_caller_and_halts() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  host.fail_build = Some(build_failure(2));

  recipe.run_until(Stage::Generated, &mut host).unwrap();
  let err = recipe.build(&mut host).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::HostDelegation);
  assert_eq!(err.host_error(), Some(&build_failure(2)));
  assert_eq!(recipe.halted(), Some((Hook::Build, Stage::Generated)));
  assert!(!recipe.is_built());

  let err = recipe.package(&mut host).unwrap_err();
  assert!(matches!(
    err,
    RecipeError::Halted {
      hook: Hook::Build,
      stage: Stage::Generated
    }
  ));
  assert!(matches!(recipe.next_stage(&mut host), Err(RecipeError::Halted { .. })));
  assert_eq!(host.count(|c| matches!(c, Call::Install)), 0);
}

#[test]
fn lazy_build_failure_is_partial_state() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  host.fail_build = Some(build_failure(1));
  recipe.config_options().unwrap();

  let err = recipe.package(&mut host).unwrap_err();
  assert!(matches!(err, RecipeError::LazyBuild { .. }));
  assert_eq!(err.kind(), ErrorKind::PartialState);
  assert_eq!(err.host_error().and_then(|e| e.status), Some(1));

  // everything before the failing build is kept
  assert!(recipe.declared_requirements().is_some());
  assert!(recipe.toolchain_config().is_some());
  assert_eq!(recipe.stage(), Stage::Generated);
  assert_eq!(recipe.halted(), Some((Hook::Build, Stage::Generated)));
}

#[test]
fn rejected_dependency_options_are_configuration_errors() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  host.fail_apply = Some(HostError::new(Collaborator::Resolver, "unity has no option fixture_extension"));

  recipe.config_options().unwrap();
  let err = recipe.configure(&mut host).unwrap_err();
  assert!(matches!(err, RecipeError::DependencyOptions(_)));
  assert_eq!(err.kind(), ErrorKind::Configuration);
  assert!(!recipe.is_configured());
  assert_eq!(recipe.halted(), Some((Hook::Configure, Stage::OptionsFinalized)));
}

#[test]
fn resolver_failure_stops_before_toolchain() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  host.fail_resolve = Some(HostError::new(Collaborator::Resolver, "glfw/3.3.8 not found"));

  let err = recipe.run(&mut host).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::HostDelegation);
  assert_eq!(recipe.stage(), Stage::LayoutDeclared);
  assert!(host.toolchains.is_empty());
}

#[test]
fn install_failure_leaves_build_done() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  host.fail_install = Some(HostError::new(Collaborator::Installer, "permission denied"));

  recipe.run_until(Stage::Built, &mut host).unwrap();
  let err = recipe.package(&mut host).unwrap_err();
  assert!(matches!(err, RecipeError::Host(_)));
  assert!(recipe.is_built());
  assert!(recipe.install_dir().is_none());
  assert_eq!(recipe.halted(), Some((Hook::Package, Stage::Built)));
}
