//! rolypoly-lib: recipe lifecycle engine for the roly-poly-engine package.
//!
//! This crate describes how to configure, build and package the engine for a
//! package-management host:
//! - `OptionSet`: the recipe's build options and the rules that derive them
//! - `RequirementSet`: the pinned dependencies a configuration declares
//! - `LayoutPolicy`: where sources, build output and generated files live
//! - `ToolchainConfig`: the build-tool variables derived from options
//! - `Recipe`: the lifecycle state machine that ties them together
//!
//! All I/O goes through the collaborator traits in [`host`].

pub mod consts;
pub mod host;
pub mod layout;
pub mod lifecycle;
pub mod options;
pub mod package;
pub mod platform;
pub mod profile;
pub mod requirements;
pub mod toolchain;
pub mod util;
