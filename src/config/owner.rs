//! Owner resolution from configured user and group names.

use nix::unistd::{Group, User};
use tracing::debug;

use crate::error::VhostError;
use crate::fs::Ownership;

/// Resolve the configured user and group names to numeric ids.
///
/// Called once at startup; an unknown user or group is a configuration error.
pub fn resolve_owner(user: &str, group: &str) -> Result<Ownership, VhostError> {
    let uid = User::from_name(user)
        .map_err(|e| VhostError::config(format!("Failed to look up user '{}': {}", user, e)))?
        .ok_or_else(|| VhostError::config(format!("Unknown user '{}'", user)))?
        .uid
        .as_raw();

    let gid = Group::from_name(group)
        .map_err(|e| VhostError::config(format!("Failed to look up group '{}': {}", group, e)))?
        .ok_or_else(|| VhostError::config(format!("Unknown group '{}'", group)))?
        .gid
        .as_raw();

    debug!(user, group, uid, gid, "Resolved owner");

    Ok(Ownership { uid, gid })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_root() {
        let owner = resolve_owner("root", "root").unwrap();
        assert_eq!(owner, Ownership { uid: 0, gid: 0 });
    }

    #[test]
    fn test_unknown_user() {
        let result = resolve_owner("no-such-user-vhostctl", "root");
        assert!(matches!(result, Err(VhostError::Config { .. })));
    }

    #[test]
    fn test_unknown_group() {
        let result = resolve_owner("root", "no-such-group-vhostctl");
        assert!(matches!(result, Err(VhostError::Config { .. })));
    }
}
