//! Recipe options and the rules that derive option state.
//!
//! Options are user-selectable knobs with typed values. Two rules act on them:
//!
//! - **Finalization** removes options that make no sense for the target
//!   platform (`fPIC` on Windows) and then freezes the set.
//! - **Conditional defaults** turn option state into option requests for our
//!   dependencies (`unity:fixture_extension` when tests are built).

mod types;

pub use types::*;

use tracing::{debug, info};

use crate::platform::os::Os;

/// The test framework whose options we drive when tests are enabled.
pub const TEST_FRAMEWORK: &str = "unity";

/// Remove platform-conditional options for `os` and freeze the set.
///
/// Returns whether `fPIC` was removed by this call.
pub fn finalize(options: &mut OptionSet, os: Os) -> Result<bool, OptionError> {
  let mut removed = false;
  if os.is_windows_family() {
    removed = options.remove(OptionName::Fpic)?;
    if removed {
      info!(option = %OptionName::Fpic, os = %os, "removed option for target platform");
    }
  }
  options.freeze();
  debug!(options = ?options.present().collect::<Vec<_>>(), "options finalized");
  Ok(removed)
}

/// Option requests this configuration makes of its dependencies.
pub fn conditional_defaults(options: &OptionSet) -> Result<Vec<DependencyOption>, OptionError> {
  let mut requests = Vec::new();
  if options.get(OptionName::BuildTests)? {
    requests.push(DependencyOption::new(TEST_FRAMEWORK, "fixture_extension", "True"));
  }
  Ok(requests)
}
