//! In-memory model of the host pipeline's service.
//!
//! The host owns this model for the life of the process. Stage functions
//! borrow it mutably to virtualize the service path and rewrite artifact
//! references after packaging.

use crate::bundler::BundleSettings;
use std::path::PathBuf;

/// Packaging directives for the whole service or for a single function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Glob patterns added to the package. Informational only.
    pub include: Vec<String>,

    /// Glob patterns removed from the package. Informational only.
    pub exclude: Vec<String>,

    /// Packaged artifact, rewritten after relocation.
    pub artifact: Option<PathBuf>,

    /// Package every function into its own artifact.
    pub individually: Option<bool>,
}

impl PackageDescriptor {
    /// Returns `true` when the host packages functions individually.
    pub fn is_individually(&self) -> bool {
        self.individually.unwrap_or(false)
    }
}

/// A deployable function declared by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDescriptor {
    /// Logical name, unique within the service.
    pub name: String,

    /// Handler reference such as `src/handler.hello`.
    pub handler: String,

    /// Per-function packaging directives.
    pub package: PackageDescriptor,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: handler.into(),
            package: PackageDescriptor::default(),
        }
    }

    /// Sets the function's artifact path.
    pub fn with_artifact(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.package.artifact = Some(artifact.into());
        self
    }
}

/// Pipeline-level custom settings.
#[derive(Debug, Clone, Default)]
pub struct CustomSettings {
    /// Settings from the `[custom.bundle]` table.
    pub bundle: Option<BundleSettings>,
}

/// The host pipeline's live service model.
#[derive(Debug, Clone, Default)]
pub struct Service {
    /// Working directory the host packages from.
    ///
    /// Points at the build directory while a build cycle is active.
    pub service_path: PathBuf,

    /// Functions in declaration order.
    pub functions: Vec<FunctionDescriptor>,

    /// Service-wide packaging directives.
    pub package: PackageDescriptor,

    /// Custom settings consumed by the bundler layer.
    pub custom: CustomSettings,
}

impl Service {
    pub fn new(service_path: impl Into<PathBuf>) -> Self {
        Self {
            service_path: service_path.into(),
            ..Default::default()
        }
    }

    /// Appends a function, keeping declaration order.
    pub fn with_function(mut self, function: FunctionDescriptor) -> Self {
        self.functions.push(function);
        self
    }

    /// Looks up a function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Looks up a function by name for mutation.
    pub fn function_mut(&mut self, name: &str) -> Option<&mut FunctionDescriptor> {
        self.functions.iter_mut().find(|f| f.name == name)
    }

    /// Function names in declaration order.
    pub fn function_names(&self) -> Vec<String> {
        self.functions.iter().map(|f| f.name.clone()).collect()
    }

    /// Bundle settings, falling back to defaults when none are configured.
    pub fn bundle_settings(&self) -> BundleSettings {
        self.custom.bundle.clone().unwrap_or_default()
    }
}
