//! Application identity keys.
//!
//! An icon is cached per launchable component *and* per user space, since
//! the same application can carry different badging for different users.
//! [`AppIdentity`] combines the two and produces the deterministic string
//! key the cache indexes by.

use std::fmt;

/// A (package, entry point) pair naming one launchable component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    package: String,
    entry: String,
}

impl ComponentKey {
    /// Create a component key from a package and an entry point name.
    pub fn new(package: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            entry: entry.into(),
        }
    }

    /// The package the component lives in.
    #[inline]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The entry point within the package.
    #[inline]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Flatten to the canonical `package/entry` form.
    pub fn flatten(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.entry)
    }
}

/// Serial number identifying a user space on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserSerial(pub u64);

impl fmt::Display for UserSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one application entry for one user.
///
/// Equal components under equal user serials always produce the same
/// [`cache_key`](Self::cache_key), so repeated lookups for the same entry
/// land on the same cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppIdentity {
    component: ComponentKey,
    user: UserSerial,
}

impl AppIdentity {
    /// Create an identity from a component and the user it belongs to.
    pub fn new(component: ComponentKey, user: UserSerial) -> Self {
        Self { component, user }
    }

    /// The launchable component.
    #[inline]
    pub fn component(&self) -> &ComponentKey {
        &self.component
    }

    /// The owning user space.
    #[inline]
    pub fn user(&self) -> UserSerial {
        self.user
    }

    /// The cache key, `package/entry:serial`.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.component, self.user)
    }
}
