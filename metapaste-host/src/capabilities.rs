//! Capability checks for the current user.
//!
//! The host owns authentication. All the editor needs is a yes/no answer for
//! a named capability such as `manage_options`.

use std::collections::HashSet;

/// Answers capability questions about the user making the current request.
pub trait CapabilityChecker: Send + Sync {
    fn current_user_can(&self, capability: &str) -> bool;
}

/// Fixed capability table for a single user.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    granted: HashSet<String>,
}

impl StaticCapabilities {
    /// A user with no capabilities at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// An administrator: site options plus the usual editing capabilities.
    pub fn administrator() -> Self {
        Self::from_iter([
            "manage_options",
            "edit_posts",
            "edit_others_posts",
            "edit_pages",
            "publish_posts",
        ])
    }

    /// An editor: may edit content but not manage site options.
    pub fn editor() -> Self {
        Self::from_iter(["edit_posts", "edit_others_posts", "edit_pages", "publish_posts"])
    }

    pub fn grant(&mut self, capability: impl Into<String>) {
        self.granted.insert(capability.into());
    }

    pub fn revoke(&mut self, capability: &str) {
        self.granted.remove(capability);
    }

    pub fn granted(&self) -> &HashSet<String> {
        &self.granted
    }
}

impl<S: Into<String>> FromIterator<S> for StaticCapabilities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl CapabilityChecker for StaticCapabilities {
    fn current_user_can(&self, capability: &str) -> bool {
        self.granted.contains(capability)
    }
}
