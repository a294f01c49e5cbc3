//! Recipe lifecycle.
//!
//! A recipe moves through a fixed sequence of stages:
//!
//! ```text
//! Constructed -> OptionsFinalized -> RequirementsDeclared -> LayoutDeclared
//!   -> Generated -> Built -> Packaged -> InfoExported -> Done
//! ```
//!
//! The host either calls the hooks on [`Recipe`] itself, or lets
//! [`Recipe::next_stage`] pick the next one. The `configure` hook runs
//! between option finalization and requirement declaration without changing
//! the stage.
//!
//! # Submodules
//!
//! - [`recipe`] - The [`Recipe`] state machine
//! - `types` - Stages, hooks, outcomes and errors

pub mod recipe;
mod types;

pub use recipe::Recipe;
pub use types::*;
