//! Application icon resolution and caching for the Shorebar shell.
//!
//! The crate answers one question: given an application entry and the user
//! it belongs to, what icon should the shell draw right now? The answer
//! depends on the selected icon pack, the mask preference, what the pack
//! actually ships for that entry, and what the platform reports as the
//! badged default. [`IconResolver`] walks that fallback chain and always
//! produces an icon; [`IconCache`] keeps the resolved bitmaps behind a
//! size-weighted LRU so repeated lookups stay cheap.
//!
//! Hosts plug in their environment through four traits: [`PreferenceStore`]
//! for settings, [`AppCatalog`] for installed apps and platform icons,
//! [`IconPackProvider`] for pack lookups, and [`RefreshNotifier`] for
//! change broadcasts.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use shorebar_icons::{AppIdentity, ComponentKey, IconCache, IconCacheConfig,
//!                      IconResolver, UserSerial};
//!
//! let resolver = IconResolver::new(
//!     "org.shorebar.shell",
//!     Arc::new(prefs),
//!     Arc::new(catalog),
//!     Arc::new(packs),
//!     Arc::new(refresh),
//! );
//! let cache = IconCache::new(IconCacheConfig::for_memory_class(192), resolver);
//!
//! let id = AppIdentity::new(
//!     ComponentKey::new("org.mail.app", "org.mail.app.Inbox"),
//!     UserSerial(0),
//! );
//! let icon = cache.get_icon(&id);
//! ```

mod cache;
mod identity;
mod resolver;
mod traits;

#[cfg(test)]
pub(crate) mod test_util;

pub use cache::{CachedIcon, IconCache, IconCacheConfig, IconCacheStats};
pub use identity::{AppIdentity, ComponentKey, UserSerial};
pub use resolver::IconResolver;
pub use traits::{
    AppCatalog, IconPackProvider, PreferenceStore, RefreshNotifier, PREF_ICON_PACK,
    PREF_ICON_PACK_USE_MASK,
};

// Raster types that appear in this crate's public signatures.
pub use shorebar_raster::{Bitmap, IconImage, IconPainter};
