//! Mount matching logic.
//!
//! # Responsibilities
//! - Decide whether a binding's mount point accepts a request path
//! - Produce the path remainder the route group matches against
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A prefix matches on segment boundaries only: `/customer` accepts
//!   `/customer` and `/customer/7`, never `/customers`
//! - Root mounts accept every path unchanged
//! - No regex to guarantee O(n) matching

use std::fmt;

/// Where a route group is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountMatcher {
    /// Unprefixed: the group sees every path.
    Root,
    /// Mounted under a fixed prefix, stored without a trailing slash.
    Prefix(String),
}

impl MountMatcher {
    /// Build a matcher from a mount path. `""` and `"/"` mean root.
    pub fn new(mount: &str) -> Self {
        let trimmed = mount.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::Root;
        }
        if trimmed.starts_with('/') {
            Self::Prefix(trimmed.to_string())
        } else {
            Self::Prefix(format!("/{trimmed}"))
        }
    }

    /// Returns the path relative to the mount point, or `None` when the
    /// mount does not accept `path`. The remainder always starts with `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            Self::Root => Some(path),
            Self::Prefix(prefix) => {
                let rest = path.strip_prefix(prefix.as_str())?;
                if rest.is_empty() {
                    Some("/")
                } else if rest.starts_with('/') {
                    Some(rest)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for MountMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("/"),
            Self::Prefix(prefix) => f.write_str(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_accepts_everything() {
        let matcher = MountMatcher::new("/");
        assert!(matcher.is_root());
        assert_eq!(matcher.strip("/anything/at/all"), Some("/anything/at/all"));
        assert_eq!(MountMatcher::new(""), MountMatcher::Root);
    }

    #[test]
    fn prefix_respects_segment_boundaries() {
        let matcher = MountMatcher::new("/customer");
        assert_eq!(matcher.strip("/customer"), Some("/"));
        assert_eq!(matcher.strip("/customer/"), Some("/"));
        assert_eq!(matcher.strip("/customer/42/debts"), Some("/42/debts"));
        assert_eq!(matcher.strip("/customers"), None);
        assert_eq!(matcher.strip("/login"), None);
    }

    #[test]
    fn prefix_is_case_sensitive() {
        let matcher = MountMatcher::new("/email");
        assert_eq!(matcher.strip("/Email/send"), None);
    }

    #[test]
    fn mount_paths_are_normalized() {
        assert_eq!(MountMatcher::new("schedule/"), MountMatcher::Prefix("/schedule".into()));
        assert_eq!(MountMatcher::new("/notifications").to_string(), "/notifications");
    }
}
