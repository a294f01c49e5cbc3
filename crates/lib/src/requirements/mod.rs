//! Dependency declaration.
//!
//! The engine links a fixed set of graphics, windowing, shader, image, model,
//! parsing, logging, texture and UI libraries. The test framework is added
//! only when tests are built. The Vulkan validation layers are always
//! declared, as a runtime requirement outside the linked set.
//!
//! Declaration is deterministic: the same options always produce the same
//! list in the same order, which the host's resolver relies on for
//! reproducible builds.

mod types;

pub use types::*;

use tracing::debug;

use crate::options::{OptionError, OptionName, OptionSet};

/// Libraries every configuration links against, in declaration order.
pub const BASE_REQUIREMENTS: &[&str] = &[
  "vulkan-headers/1.3.236.0",
  "vulkan-loader/1.3.236.0",
  "vulkan-memory-allocator/3.0.1",
  "volk/1.3.268.0",
  "glfw/3.3.8",
  "glslang/1.3.236.0",
  "spirv-cross/1.3.236.0",
  "stb/cci.20240531",
  "cgltf/1.12",
  "jsmn/1.1.0",
  "log.c/cci.20200620",
  "ktx/4.0.0",
  "parg/1.0.3",
  "nuklear/4.12.0",
];

pub const TEST_REQUIREMENT: &str = "unity/2.6.0";

pub const VALIDATION_LAYERS_REQUIREMENT: &str = "vulkan-validationlayers/1.3.236.0";

/// Errors from requirement declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclareError {
  #[error(transparent)]
  Option(#[from] OptionError),

  #[error(transparent)]
  Requirement(#[from] RequirementError),
}

/// Declare the requirements for a finalized option set.
pub fn declare_requirements(options: &OptionSet) -> Result<RequirementSet, DeclareError> {
  let mut references = BASE_REQUIREMENTS.to_vec();
  if options.get(OptionName::BuildTests)? {
    references.push(TEST_REQUIREMENT);
  }

  let mut set = RequirementSet::from_references(&references)?;
  set
    .runtime_requires
    .push(Requirement::parse(VALIDATION_LAYERS_REQUIREMENT)?);

  debug!(
    requires = set.len(),
    runtime_requires = set.runtime_requires.len(),
    "requirements declared"
  );
  Ok(set)
}
