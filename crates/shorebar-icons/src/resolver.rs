//! Icon resolution.
//!
//! [`IconResolver`] turns an [`AppIdentity`] into an [`IconImage`] by
//! consulting the user's selected icon pack, falling back to the
//! platform's badged icon and finally its generic activity icon.
//! Resolution never fails: every absent source falls through to the next
//! one, so callers always receive an image.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use shorebar_raster::IconImage;

use crate::identity::AppIdentity;
use crate::traits::{
    AppCatalog, IconPackProvider, PreferenceStore, RefreshNotifier, PREF_ICON_PACK,
    PREF_ICON_PACK_USE_MASK,
};

/// Resolves application icons according to the user's icon pack selection.
///
/// The selection is read fresh from the [`PreferenceStore`] on every call,
/// so preference changes take effect without rebuilding the resolver. A
/// selection naming a package that is no longer installed is healed back
/// to the host package (the "no icon pack" sentinel) before any lookup,
/// and the [`RefreshNotifier`] is told that rendered icons went stale.
///
/// # Fallback order
///
/// 1. No pack selected: the platform's badged icon, then its generic
///    activity icon.
/// 2. Pack selected, masking off: the pack's icon for the component, then
///    the platform chain above.
/// 3. Pack selected, masking on: the pack's masked variant of the
///    platform icon, then the pack's plain icon, then the unmasked
///    platform icon.
pub struct IconResolver {
    host_package: String,
    prefs: Arc<dyn PreferenceStore>,
    catalog: Arc<dyn AppCatalog>,
    packs: Arc<dyn IconPackProvider>,
    refresh: Arc<dyn RefreshNotifier>,
}

impl IconResolver {
    /// Create a resolver for a host whose own package name serves as the
    /// "no icon pack" sentinel.
    pub fn new(
        host_package: impl Into<String>,
        prefs: Arc<dyn PreferenceStore>,
        catalog: Arc<dyn AppCatalog>,
        packs: Arc<dyn IconPackProvider>,
        refresh: Arc<dyn RefreshNotifier>,
    ) -> Self {
        Self {
            host_package: host_package.into(),
            prefs,
            catalog,
            packs,
            refresh,
        }
    }

    /// The host package name acting as the "no icon pack" sentinel.
    #[inline]
    pub fn host_package(&self) -> &str {
        &self.host_package
    }

    /// The icon pack provider this resolver consults.
    #[inline]
    pub fn icon_pack_provider(&self) -> &Arc<dyn IconPackProvider> {
        &self.packs
    }

    /// Resolve the icon for an application entry.
    pub fn resolve(&self, id: &AppIdentity) -> IconImage {
        let mut pack = self.prefs.get_string(PREF_ICON_PACK, &self.host_package);
        let use_mask = self.prefs.get_bool(PREF_ICON_PACK_USE_MASK, false);

        // A selection pointing at an uninstalled pack heals back to the
        // host package before any pack lookup. Re-resetting to the same
        // value under concurrent resolution is harmless.
        if !self.catalog.is_installed(&pack) {
            info!(
                target: "shorebar_icons::resolver",
                pack = %pack,
                "selected icon pack is not installed, resetting preference"
            );
            pack = self.host_package.clone();
            self.prefs.set_string(PREF_ICON_PACK, &pack);
            self.refresh.icons_changed();
        }

        if pack == self.host_package {
            return self.platform_icon(id);
        }

        if !use_mask {
            return match self.packs.icon_for(&pack, id.component()) {
                Some(icon) => icon,
                None => self.platform_icon(id),
            };
        }

        match self.platform_icon(id) {
            IconImage::Bitmap(base) => {
                if let Some(masked) = self.packs.masked_icon_for(&pack, id.component(), &base) {
                    return IconImage::Bitmap(masked);
                }
                self.packs
                    .icon_for(&pack, id.component())
                    .unwrap_or(IconImage::Bitmap(base))
            }
            other => self
                .packs
                .icon_for(&pack, id.component())
                .unwrap_or(other),
        }
    }

    /// The platform's icon for the entry: badged when available, the
    /// generic activity icon otherwise.
    fn platform_icon(&self, id: &AppIdentity) -> IconImage {
        match self.catalog.badged_icon(id) {
            Some(icon) => icon,
            None => {
                debug!(
                    target: "shorebar_icons::resolver",
                    id = %id.cache_key(),
                    "no badged icon, using default activity icon"
                );
                self.catalog.default_activity_icon()
            }
        }
    }
}

impl fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconResolver")
            .field("host_package", &self.host_package)
            .finish()
    }
}
