//! User-facing bundle settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Build folder created inside the service directory.
pub const DEFAULT_BUILD_FOLDER: &str = ".build";

/// Bundler target when none is configured.
pub const DEFAULT_TARGET: &str = "node";

/// Bundler program used by the command-line collaborator.
pub const DEFAULT_COMMAND: &str = "parcel";

/// Settings read from the `[custom.bundle]` table.
///
/// Every field is optional. Keys this layer does not know are kept in
/// [`BundleSettings::extra`] and forwarded verbatim to the collaborator.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_serverless::bundler::BundleSettings;
///
/// let settings: BundleSettings = toml::from_str(
///     r#"
///     build_folder = "dist"
///     minify = true
///     "#,
/// ).unwrap();
///
/// assert_eq!(settings.build_folder(), "dist");
/// assert_eq!(settings.target(), "node");
/// assert!(settings.extra.contains_key("minify"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleSettings {
    /// Name of the temporary build folder.
    ///
    /// Default: `.build`
    #[serde(default, alias = "buildFolder")]
    pub build_folder: Option<String>,

    /// Bundler target.
    ///
    /// Default: `node`
    #[serde(default)]
    pub target: Option<String>,

    /// Enable the bundler's cache.
    ///
    /// Default: `false`
    #[serde(default)]
    pub cache: Option<bool>,

    /// Bundler program for the command-line collaborator.
    ///
    /// Default: `parcel`
    #[serde(default)]
    pub command: Option<String>,

    /// Pass-through options.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BundleSettings {
    pub fn build_folder(&self) -> &str {
        self.build_folder.as_deref().unwrap_or(DEFAULT_BUILD_FOLDER)
    }

    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_TARGET)
    }

    pub fn cache(&self) -> bool {
        self.cache.unwrap_or(false)
    }

    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_COMMAND)
    }
}
