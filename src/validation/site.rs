//! Validation of the bind address and document-root subdirectory.

use std::net::IpAddr;
use std::path::{Component, Path, PathBuf};

use crate::error::{ValidationErrorKind, VhostError};

/// Validates the address a vhost binds to: `*` or an IP address.
pub fn validate_bind_ip(ip: &str) -> Result<&str, VhostError> {
    if ip == "*" || ip.parse::<IpAddr>().is_ok() {
        return Ok(ip);
    }
    Err(VhostError::invalid_parameter(
        "ip",
        format!("'{}' is neither '*' nor an IP address", ip),
    ))
}

/// Normalizes the optional subdirectory under `www/`.
///
/// Returns `""` when no subdirectory is given, otherwise the path with a
/// single leading `/` (e.g. `public` becomes `/public`). Parent references
/// are rejected.
pub fn normalize_subdir(subdir: Option<&str>) -> Result<String, VhostError> {
    let Some(raw) = subdir.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(String::new());
    };

    let path = Path::new(raw);
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(VhostError::Validation {
                    kind: ValidationErrorKind::PathTraversal {
                        path: PathBuf::from(raw),
                    },
                });
            }
        }
    }

    if parts.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("/{}", parts.join("/")))
}
