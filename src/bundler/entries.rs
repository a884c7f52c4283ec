//! Entry point derivation from function handlers.

use super::{Error, Result};
use crate::service::{FunctionDescriptor, Service};

/// Placeholder matching any supported source extension.
pub const SOURCE_EXTENSION_PATTERN: &str = ".[jt]s";

/// Derives the bundler entry for one handler.
///
/// The extension of the handler's file name (text from its last `.`) is
/// replaced by [`SOURCE_EXTENSION_PATTERN`]. Handlers without an extension
/// get the pattern appended. Leading dots of a file name are not extensions.
///
/// ```
/// use kodegen_bundler_serverless::bundler::entries::entry_for_handler;
///
/// assert_eq!(entry_for_handler("src/handler.js"), "src/handler.[jt]s");
/// assert_eq!(entry_for_handler("src/handler.hello"), "src/handler.[jt]s");
/// assert_eq!(entry_for_handler("handler"), "handler.[jt]s");
/// ```
pub fn entry_for_handler(handler: &str) -> String {
    let file_start = handler.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let file_name = &handler[file_start..];

    let stem_len = match file_name.rfind('.') {
        Some(dot) if dot > 0 && !file_name[..dot].chars().all(|c| c == '.') => dot,
        _ => file_name.len(),
    };

    format!(
        "{}{}",
        &handler[..file_start + stem_len],
        SOURCE_EXTENSION_PATTERN
    )
}

/// Resolves entries for `functions`, preserving their order.
pub fn resolve_entries<'a, I>(functions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a FunctionDescriptor>,
{
    functions
        .into_iter()
        .map(|function| entry_for_handler(&function.handler))
        .collect()
}

/// Functions in scope for a build.
///
/// With a target only that function is returned; otherwise every function in
/// declaration order.
///
/// # Errors
///
/// [`Error::UnknownFunction`] when `target` is not declared by the service.
pub fn select_functions<'a>(
    service: &'a Service,
    target: Option<&str>,
) -> Result<Vec<&'a FunctionDescriptor>> {
    match target {
        Some(name) => service
            .function(name)
            .map(|function| vec![function])
            .ok_or_else(|| Error::UnknownFunction(name.to_string())),
        None => Ok(service.functions.iter().collect()),
    }
}
