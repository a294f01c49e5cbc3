use std::path::PathBuf;

use rolypoly_lib::lifecycle::{ErrorKind, Hook, RecipeError, Stage};
use rolypoly_lib::options::{DependencyOption, OptionError, OptionName};
use rolypoly_lib::platform::os::Os;

use super::common::{Call, RecordingHost, install_dir, recipe_for};

#[test]
fn linux_with_tests_runs_every_stage() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();

  assert!(!recipe.config_options().unwrap());
  assert_eq!(recipe.options().get(OptionName::Fpic), Ok(true));

  let requests = recipe.configure(&mut host).unwrap();
  assert_eq!(requests, vec![DependencyOption::new("unity", "fixture_extension", "True")]);

  let requirements = recipe.requirements().unwrap();
  assert_eq!(requirements.len(), 15);
  assert_eq!(requirements.get("unity").map(|r| r.version.as_str()), Some("2.6.0"));
  assert!(requirements.runtime_requires.iter().any(|r| r.name == "vulkan-validationlayers"));

  let layout = recipe.layout().unwrap();
  assert_eq!(layout.generators, PathBuf::from("/work/engine/build/Conan"));

  let toolchain = recipe.generate(&mut host).unwrap();
  assert_eq!(toolchain.get("WITH_VALIDATION_LAYERS"), Some(true));
  assert_eq!(toolchain.get("BUILD_SHARED"), Some(false));
  assert_eq!(toolchain.get("VERBOSE_OUTPUT"), Some(false));
  assert_eq!(toolchain.get("BUILD_TESTS"), Some(true));
  assert_eq!(toolchain.len(), 4);

  recipe.build(&mut host).unwrap();
  assert_eq!(recipe.package(&mut host).unwrap(), install_dir());
  let info = recipe.package_info(&mut host).unwrap();
  assert_eq!(info.libs, vec!["roly-poly-engine".to_string()]);
  assert_eq!(recipe.stage(), Stage::InfoExported);

  assert_eq!(
    host.calls,
    vec![
      Call::ApplyOptions(requests),
      Call::Resolve(15),
      Call::WriteToolchain(PathBuf::from("/work/engine/build/Conan")),
      Call::Configure,
      Call::Build,
      Call::CopyLicense,
      Call::Install,
    ]
  );
}

#[test]
fn windows_without_tests_drops_fpic_and_unity() {
  let mut recipe = recipe_for(Os::Windows);
  let mut host = RecordingHost::new();
  recipe.set_option("build_tests", "False").unwrap();

  assert!(recipe.config_options().unwrap());
  assert!(!recipe.options().is_present(OptionName::Fpic));
  assert_eq!(
    recipe.options().get(OptionName::Fpic),
    Err(OptionError::Removed(OptionName::Fpic))
  );

  assert!(recipe.configure(&mut host).unwrap().is_empty());
  assert_eq!(host.calls, vec![Call::ApplyOptions(Vec::new())]);

  let requirements = recipe.requirements().unwrap();
  assert_eq!(requirements.len(), 14);
  assert!(!requirements.contains("unity"));

  recipe.layout().unwrap();
  let toolchain = recipe.generate(&mut host).unwrap();
  assert_eq!(toolchain.get("BUILD_TESTS"), Some(false));
  assert_eq!(toolchain.get("fPIC"), None);
}

#[test]
fn removed_option_read_is_a_configuration_error() {
  let mut recipe = recipe_for(Os::Windows);
  recipe.config_options().unwrap();

  let err = RecipeError::from(recipe.options().get(OptionName::Fpic).unwrap_err());
  assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn options_are_frozen_after_finalization() {
  let mut recipe = recipe_for(Os::Linux);
  recipe.config_options().unwrap();

  let err = recipe.set_option("shared", "True").unwrap_err();
  assert!(matches!(err, RecipeError::Option(OptionError::Frozen(OptionName::Shared))));
}

#[test]
fn invalid_option_value_is_rejected() {
  let mut recipe = recipe_for(Os::Linux);
  let err = recipe.set_option("shared", "maybe").unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Configuration);

  let err = recipe.set_option("lto", "True").unwrap_err();
  assert!(matches!(err, RecipeError::Option(OptionError::Unknown(_))));
}

#[test]
fn validation_layers_reach_resolver_whatever_the_option() {
  for layers in ["True", "False"] {
    let mut recipe = recipe_for(Os::Linux);
    let mut host = RecordingHost::new();
    recipe.set_option("with_validation_layers", layers).unwrap();

    recipe.config_options().unwrap();
    recipe.configure(&mut host).unwrap();
    let requirements = recipe.requirements().unwrap();
    assert_eq!(requirements.runtime_requires.len(), 1);
    assert_eq!(requirements.len(), 15);

    recipe.layout().unwrap();
    recipe.generate(&mut host).unwrap();
    assert_eq!(host.resolved_names.len(), 16);
    assert_eq!(host.resolved_names.last().map(String::as_str), Some("vulkan-validationlayers"));
  }
}

#[test]
fn hooks_out_of_order_are_rejected_without_halting() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();

  let err = recipe.requirements().unwrap_err();
  assert!(matches!(
    err,
    RecipeError::OutOfOrder {
      hook: Hook::Requirements,
      current: Stage::Constructed
    }
  ));
  assert_eq!(err.kind(), ErrorKind::PartialState);
  assert!(recipe.halted().is_none());

  recipe.config_options().unwrap();

  // requirements needs configure first
  assert!(matches!(recipe.requirements(), Err(RecipeError::OutOfOrder { .. })));
  assert!(matches!(recipe.config_options(), Err(RecipeError::OutOfOrder { .. })));
  assert!(matches!(recipe.build(&mut host), Err(RecipeError::OutOfOrder { .. })));
  assert!(matches!(
    recipe.package_info(&mut host),
    Err(RecipeError::OutOfOrder { .. })
  ));

  recipe.configure(&mut host).unwrap();
  assert!(matches!(recipe.configure(&mut host), Err(RecipeError::OutOfOrder { .. })));
  recipe.requirements().unwrap();
  assert!(host.calls.iter().all(|c| matches!(c, Call::ApplyOptions(_))));
}

#[test]
fn package_id_depends_on_settings_and_options() {
  let mut linux = recipe_for(Os::Linux);
  let err = linux.package_id().unwrap_err();
  assert!(matches!(err, RecipeError::OptionsNotFinalized));
  assert_eq!(err.kind(), ErrorKind::PartialState);
  assert_eq!(err.to_string(), "options are not finalized yet, run config_options first");
  linux.config_options().unwrap();

  let mut again = recipe_for(Os::Linux);
  again.config_options().unwrap();
  assert_eq!(linux.package_id().unwrap(), again.package_id().unwrap());
  assert_eq!(linux.package_id().unwrap().0.len(), 20);

  let mut shared = recipe_for(Os::Linux);
  shared.set_option("shared", "True").unwrap();
  shared.config_options().unwrap();
  assert_ne!(linux.package_id().unwrap(), shared.package_id().unwrap());

  let mut windows = recipe_for(Os::Windows);
  windows.config_options().unwrap();
  assert_ne!(linux.package_id().unwrap(), windows.package_id().unwrap());
}
