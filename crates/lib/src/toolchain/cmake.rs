//! CMake toolchain rendering.

use std::fmt::Write;
use std::path::Path;

use super::ToolchainConfig;

const HEADER: &str = "# Generated by rolypoly. Changes are overwritten on the next generate.\n";

fn cmake_bool(value: bool) -> &'static str {
  if value { "ON" } else { "OFF" }
}

/// Escape a path for use inside a quoted CMake argument.
fn cmake_path(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/").replace('"', "\\\"")
}

impl ToolchainConfig {
  /// Render the variables as cache entries, in name order.
  pub fn to_cmake(&self) -> String {
    let mut out = String::from(HEADER);
    for (name, value) in self.variables() {
      let _ = writeln!(out, "set({} {} CACHE BOOL \"\" FORCE)", name, cmake_bool(*value));
    }
    out
  }

  /// Render the variables followed by one prefix path entry per dependency.
  pub fn to_cmake_with_prefixes<'a>(&self, prefixes: impl IntoIterator<Item = &'a Path>) -> String {
    let mut out = self.to_cmake();
    for prefix in prefixes {
      let _ = writeln!(out, "list(APPEND CMAKE_PREFIX_PATH \"{}\")", cmake_path(prefix));
    }
    out
  }
}
