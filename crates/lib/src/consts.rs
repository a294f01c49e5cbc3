//! Shared constants.

pub const APP_NAME: &str = "rolypoly";

/// Number of hex characters kept from a SHA-256 digest for package ids.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Source folder, relative to the recipe root.
pub const SOURCE_FOLDER: &str = "./src";

/// Generators folder name, appended to the build folder.
pub const GENERATORS_FOLDER: &str = "Conan";

/// Toolchain file written into the generators folder.
pub const TOOLCHAIN_FILENAME: &str = "conan_toolchain.cmake";

/// Dependency option requests written next to the toolchain file.
pub const DEPENDENCY_OPTIONS_FILENAME: &str = "dependency_options.json";

pub const LICENSE_FILENAME: &str = "LICENSE";

/// Folder inside the package tree that receives license files.
pub const LICENSES_FOLDER: &str = "licenses";

/// Generators the host runs for consumers of this package.
pub const CONSUMER_GENERATORS: &[&str] = &["CMakeDeps"];
