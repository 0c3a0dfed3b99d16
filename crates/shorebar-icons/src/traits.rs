//! Host environment contracts.
//!
//! The icon engine never touches the platform directly. Everything it
//! needs from the host arrives through these traits, injected as
//! `Arc<dyn ...>` when the [`IconResolver`](crate::IconResolver) is built:
//!
//! - [`PreferenceStore`]: the user's icon pack selection
//! - [`AppCatalog`]: installed packages and their platform icons
//! - [`IconPackProvider`]: third-party icon pack artwork
//! - [`RefreshNotifier`]: a hook fired when cached icons go stale

use shorebar_raster::{Bitmap, IconImage};

use crate::identity::{AppIdentity, ComponentKey};

/// Preference key holding the selected icon pack package.
pub const PREF_ICON_PACK: &str = "icon_pack";

/// Preference key holding whether pack icons are masked over app icons.
pub const PREF_ICON_PACK_USE_MASK: &str = "icon_pack_use_mask";

/// Read/write access to the host's user preferences.
pub trait PreferenceStore: Send + Sync {
    /// Read a string preference, returning `default` when unset.
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Read a boolean preference, returning `default` when unset.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Persist a string preference.
    fn set_string(&self, key: &str, value: &str);
}

/// The host platform's view of installed applications.
pub trait AppCatalog: Send + Sync {
    /// Whether a package is currently installed.
    fn is_installed(&self, package: &str) -> bool;

    /// The badged icon for an application entry, if the platform can
    /// produce one.
    fn badged_icon(&self, id: &AppIdentity) -> Option<IconImage>;

    /// The platform's generic activity icon. Always available.
    fn default_activity_icon(&self) -> IconImage;
}

/// Access to third-party icon pack artwork.
pub trait IconPackProvider: Send + Sync {
    /// The pack's own icon for a component, if it ships one.
    fn icon_for(&self, pack: &str, component: &ComponentKey) -> Option<IconImage>;

    /// A masked variant built from the application's own bitmap, if the
    /// pack supports masking.
    fn masked_icon_for(
        &self,
        pack: &str,
        component: &ComponentKey,
        base: &Bitmap,
    ) -> Option<Bitmap>;

    /// Drop any pack state the provider caches internally.
    fn drop_cached_state(&self);
}

/// Receiver for icon refresh notifications.
///
/// Fired when the stored icon pack selection was reset, meaning pinned
/// and previously rendered icons should be re-resolved. Fire and forget;
/// implementations must not call back into the engine synchronously.
pub trait RefreshNotifier: Send + Sync {
    /// Pinned and rendered icons should be re-resolved.
    fn icons_changed(&self);
}
