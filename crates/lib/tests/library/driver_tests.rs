use rolypoly_lib::lifecycle::{Hook, Stage, StageOutcome};
use rolypoly_lib::platform::os::Os;

use super::common::{Call, RecordingHost, install_dir, recipe_for};

#[test]
fn run_visits_every_hook_in_order() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();

  let outcomes = recipe.run(&mut host).unwrap();
  let hooks: Vec<Option<Hook>> = outcomes.iter().map(StageOutcome::hook).collect();
  assert_eq!(
    hooks,
    vec![
      Some(Hook::ConfigOptions),
      Some(Hook::Configure),
      Some(Hook::Requirements),
      Some(Hook::Layout),
      Some(Hook::Generate),
      Some(Hook::Build),
      Some(Hook::Package),
      Some(Hook::PackageInfo),
      None,
    ]
  );
  assert_eq!(recipe.stage(), Stage::Done);
  assert_eq!(host.count(|c| matches!(c, Call::Build)), 1);
  assert!(recipe.next_stage(&mut host).unwrap().is_none());
}

#[test]
fn run_until_leaves_partial_state_inspectable() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();

  let outcomes = recipe.run_until(Stage::RequirementsDeclared, &mut host).unwrap();
  assert_eq!(outcomes.len(), 3);
  assert!(matches!(outcomes.last(), Some(StageOutcome::RequirementsDeclared(set)) if set.len() == 15));

  assert_eq!(recipe.stage(), Stage::RequirementsDeclared);
  assert!(recipe.declared_requirements().is_some());
  assert!(recipe.declared_layout().is_none());
  assert!(recipe.toolchain_config().is_none());
  assert_eq!(host.count(|c| matches!(c, Call::Resolve(_))), 0);
}

#[test]
fn package_builds_missing_stages_lazily() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  recipe.config_options().unwrap();

  assert_eq!(recipe.package(&mut host).unwrap(), install_dir());
  assert!(recipe.is_configured());
  assert!(recipe.is_built());
  assert!(recipe.toolchain_config().is_some());
  assert_eq!(recipe.stage(), Stage::Packaged);
  assert_eq!(
    host.calls,
    vec![
      Call::ApplyOptions(recipe.dependency_options().to_vec()),
      Call::Resolve(15),
      Call::WriteToolchain(recipe.declared_layout().unwrap().generators.clone()),
      Call::Configure,
      Call::Build,
      Call::CopyLicense,
      Call::Install,
    ]
  );
}

#[test]
fn package_does_not_rebuild() {
  let mut recipe = recipe_for(Os::Linux);
  let mut host = RecordingHost::new();
  recipe.run_until(Stage::Built, &mut host).unwrap();
  assert_eq!(host.count(|c| matches!(c, Call::Build)), 1);

  recipe.package(&mut host).unwrap();
  assert_eq!(host.count(|c| matches!(c, Call::Build)), 1);
  assert_eq!(host.count(|c| matches!(c, Call::Configure)), 1);
}

#[test]
fn outcomes_carry_stage_results() {
  let mut recipe = recipe_for(Os::Windows);
  let mut host = RecordingHost::new();

  let outcomes = recipe.run(&mut host).unwrap();
  assert_eq!(outcomes[0], StageOutcome::OptionsFinalized { fpic_removed: true });
  assert!(outcomes.contains(&StageOutcome::Packaged {
    install_dir: install_dir()
  }));
  assert_eq!(recipe.cpp_info().map(|info| info.libs.len()), Some(1));
}
