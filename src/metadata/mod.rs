//! Service definition loading from a single TOML file.

use crate::bundler::{BundleSettings, Error as BundlerError};
use crate::error::Result;
use crate::service::{CustomSettings, FunctionDescriptor, PackageDescriptor, Service};
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default service definition file name.
pub const SERVICE_FILE: &str = "serverless.toml";

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    artifact: Option<PathBuf>,
    individually: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    handler: String,
    #[serde(default)]
    package: RawPackage,
}

#[derive(Debug, Default, Deserialize)]
struct RawCustom {
    bundle: Option<BundleSettings>,
}

/// Load a service definition (single read + parse)
///
/// Function tables keep their file order, which decides build order and the
/// order artifacts are rewritten in. Relative `service_path` and `artifact`
/// values are resolved against the file's directory.
pub fn load_service(path: &Path) -> Result<Service> {
    let contents = std::fs::read_to_string(path).map_err(|e| config_error(path, e))?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let base_dir = base_dir.absolutize()?.into_owned();
    parse_service(&contents, path, &base_dir)
}

/// Parse a service definition already read into memory.
pub fn parse_service(contents: &str, path: &Path, base_dir: &Path) -> Result<Service> {
    let mut table: toml::Table = toml::from_str(contents).map_err(|e| config_error(path, e))?;

    let service_path = match table.remove("service_path") {
        Some(value) => {
            let raw = value
                .as_str()
                .ok_or_else(|| config_error(path, "`service_path` must be a string"))?;
            base_dir.join(raw)
        }
        None => base_dir.to_path_buf(),
    };

    let package = match table.remove("package") {
        Some(value) => {
            let raw: RawPackage = value.try_into().map_err(|e| config_error(path, e))?;
            package_descriptor(raw, &service_path, path)?
        }
        None => PackageDescriptor::default(),
    };

    let custom = match table.remove("custom") {
        Some(value) => {
            let raw: RawCustom = value.try_into().map_err(|e| config_error(path, e))?;
            CustomSettings { bundle: raw.bundle }
        }
        None => CustomSettings::default(),
    };

    let mut functions = Vec::new();
    if let Some(value) = table.remove("functions") {
        let toml::Value::Table(entries) = value else {
            return Err(config_error(path, "`functions` must be a table").into());
        };
        // `preserve_order` keeps declaration order here
        for (name, value) in entries {
            let raw: RawFunction = value
                .try_into()
                .map_err(|e| config_error(path, format!("function `{name}`: {e}")))?;
            functions.push(FunctionDescriptor {
                name,
                handler: raw.handler,
                package: package_descriptor(raw.package, &service_path, path)?,
            });
        }
    }

    for key in table.keys() {
        log::debug!("Ignoring unrecognized service key `{key}`");
    }

    Ok(Service {
        service_path,
        functions,
        package,
        custom,
    })
}

fn package_descriptor(raw: RawPackage, service_path: &Path, path: &Path) -> Result<PackageDescriptor> {
    for pattern in raw.include.iter().chain(&raw.exclude) {
        glob::Pattern::new(pattern)
            .map_err(|e| config_error(path, format!("invalid pattern `{pattern}`: {e}")))?;
    }

    Ok(PackageDescriptor {
        include: raw.include,
        exclude: raw.exclude,
        artifact: raw.artifact.map(|artifact| service_path.join(artifact)),
        individually: raw.individually,
    })
}

fn config_error(path: &Path, reason: impl std::fmt::Display) -> BundlerError {
    BundlerError::Config {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
