//! Config module.
//! Provides configuration types, config file discovery, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{find_config_path, path_has_symlink_ancestor, CONFIG_ENV, PROJECT_CONFIG_NAME};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config_from_xml_path};

/// Defaults for the baked-in migration run.
pub const OLD_PACKAGE_DEFAULT: &str = "com.simplexray.an";
pub const NEW_PACKAGE_DEFAULT: &str = "com.clearpath.spx";
pub const PACKAGE_ROOT_DEFAULT: &str = "app/src/main";
pub const CODE_ROOTS_DEFAULT: &[&str] = &["app/src/main/kotlin"];
pub const KEEP_PATHS_DEFAULT: &[&str] = &["app/src/main", "app/build.gradle", "build.gradle"];
pub const DESCRIPTOR_DEFAULT: &str = "app/build.gradle";
pub const RULES_FILE_DEFAULT: &str = "app/proguard-rules.pro";
pub const PERFORMANCE_FILE_DEFAULT: &str = "gradle.properties";
pub const TEXT_EXTENSIONS_DEFAULT: &[&str] = &[
    "kt", "java", "xml", "gradle", "kts", "properties", "json", "txt", "mk",
];
pub const BINARY_EXTENSIONS_DEFAULT: &[&str] = &[
    "aar", "so", "dll", "dylib", "exe", "bin", "apk", "ipa", "app", "xctest", "jar",
];
