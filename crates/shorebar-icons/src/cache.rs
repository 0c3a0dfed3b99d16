//! Icon caching with size-weighted LRU eviction.
//!
//! [`IconCache`] is the engine's front door. [`get_icon`](IconCache::get_icon)
//! returns the cached icon for an identity, or resolves, normalizes, and
//! caches one on a miss. Entries are weighted by their decoded byte size
//! and evicted least recently used first once the byte budget is exceeded.
//!
//! # Example
//!
//! ```ignore
//! use shorebar_icons::{IconCache, IconCacheConfig, IconResolver};
//!
//! let resolver = IconResolver::new("org.shorebar.shell", prefs, catalog, packs, refresh);
//! let cache = IconCache::new(IconCacheConfig::for_memory_class(192), resolver);
//!
//! let icon = cache.get_icon(&identity);
//! println!("{}x{} ({} bytes)", icon.width(), icon.height(), icon.byte_count());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use shorebar_raster::{to_bitmap, to_monochrome, Bitmap, IconImage};

use crate::identity::AppIdentity;
use crate::resolver::IconResolver;

/// Fraction of the host's memory class granted to the icon cache.
const MEMORY_CLASS_FRACTION: usize = 8;

/// Configuration for the icon cache.
#[derive(Debug, Clone)]
pub struct IconCacheConfig {
    /// Byte budget for decoded icon bitmaps. Fixed for the cache's
    /// lifetime.
    pub capacity_bytes: usize,
}

impl Default for IconCacheConfig {
    fn default() -> Self {
        Self::for_memory_class(256)
    }
}

impl IconCacheConfig {
    /// Budget derived from the host's declared memory class in megabytes:
    /// one eighth of the class.
    pub fn for_memory_class(mem_class_mb: usize) -> Self {
        Self {
            capacity_bytes: mem_class_mb * 1024 * 1024 / MEMORY_CLASS_FRACTION,
        }
    }

    /// Set an explicit byte budget.
    #[must_use]
    pub fn with_capacity_bytes(mut self, bytes: usize) -> Self {
        self.capacity_bytes = bytes;
        self
    }
}

/// A resolved, normalized icon held by the cache.
///
/// Entries are shared as `Arc<CachedIcon>`, so repeated lookups between
/// evictions hand out the same allocation.
#[derive(Debug)]
pub struct CachedIcon {
    bitmap: Bitmap,
    byte_count: usize,
}

impl CachedIcon {
    fn new(bitmap: Bitmap) -> Self {
        let byte_count = bitmap.byte_count();
        Self { bitmap, byte_count }
    }

    /// The decoded bitmap.
    #[inline]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Decoded size in bytes, the entry's weight against the cache budget.
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// Node in the LRU recency list.
struct LruNode {
    prev: Option<String>,
    next: Option<String>,
}

/// Cache state guarded by the single lock.
struct CacheInner {
    capacity_bytes: usize,
    entries: HashMap<String, Arc<CachedIcon>>,
    lru_nodes: HashMap<String, LruNode>,
    lru_head: Option<String>,
    lru_tail: Option<String>,
    current_size: usize,
    hits: u64,
    misses: u64,
}

impl CacheInner {
    fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            entries: HashMap::new(),
            lru_nodes: HashMap::new(),
            lru_head: None,
            lru_tail: None,
            current_size: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn get(&mut self, key: &str) -> Option<Arc<CachedIcon>> {
        if self.entries.contains_key(key) {
            self.hits += 1;
            self.lru_move_to_front(key);
            self.entries.get(key).cloned()
        } else {
            self.misses += 1;
            None
        }
    }

    /// Insert at most-recently-used, then trim from the tail while over
    /// budget. An entry bigger than the whole budget is trimmed right back
    /// out, so such icons are handed to the caller but never retained.
    fn insert(&mut self, key: String, icon: Arc<CachedIcon>) {
        if self.entries.contains_key(&key) {
            self.remove(&key);
        }

        self.current_size += icon.byte_count();
        self.entries.insert(key.clone(), icon);
        self.lru_push_front(key);

        while self.current_size > self.capacity_bytes && !self.entries.is_empty() {
            let Some(tail_key) = self.lru_tail.clone() else {
                break;
            };
            if let Some(evicted) = self.remove(&tail_key) {
                debug!(
                    target: "shorebar_icons::cache",
                    key = %tail_key,
                    bytes = evicted.byte_count(),
                    "evicted least recently used icon"
                );
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<Arc<CachedIcon>> {
        let icon = self.entries.remove(key)?;
        self.current_size -= icon.byte_count();
        self.lru_remove(key);
        Some(icon)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.entries.shrink_to_fit();
        self.lru_nodes.clear();
        self.lru_nodes.shrink_to_fit();
        self.lru_head = None;
        self.lru_tail = None;
        self.current_size = 0;
    }

    fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // ========================================================================
    // LRU LIST OPERATIONS
    // ========================================================================

    fn lru_push_front(&mut self, key: String) {
        let node = LruNode {
            prev: None,
            next: self.lru_head.clone(),
        };

        if let Some(old_head) = &self.lru_head
            && let Some(old_node) = self.lru_nodes.get_mut(old_head)
        {
            old_node.prev = Some(key.clone());
        }

        if self.lru_tail.is_none() {
            self.lru_tail = Some(key.clone());
        }

        self.lru_head = Some(key.clone());
        self.lru_nodes.insert(key, node);
    }

    fn lru_move_to_front(&mut self, key: &str) {
        if self.lru_head.as_deref() == Some(key) {
            return;
        }
        self.lru_remove(key);
        self.lru_push_front(key.to_string());
    }

    fn lru_remove(&mut self, key: &str) {
        if let Some(node) = self.lru_nodes.remove(key) {
            if let Some(prev_key) = &node.prev {
                if let Some(prev_node) = self.lru_nodes.get_mut(prev_key) {
                    prev_node.next = node.next.clone();
                }
            } else {
                // This was the head.
                self.lru_head = node.next.clone();
            }

            if let Some(next_key) = &node.next {
                if let Some(next_node) = self.lru_nodes.get_mut(next_key) {
                    next_node.prev = node.prev.clone();
                }
            } else {
                // This was the tail.
                self.lru_tail = node.prev.clone();
            }
        }
    }
}

/// A size-weighted LRU cache over resolved application icons.
///
/// The cache is a single exclusion domain: one internal lock guards the
/// whole lookup-or-populate path, including icon resolution itself, so at
/// most one resolution pipeline runs at a time and populations for
/// different identities serialize. All methods take `&self`; the cache is
/// shared by reference (or inside an `Arc`) across threads.
///
/// # Weights
///
/// Each entry is charged its decoded pixel size (width × height × 4
/// bytes). The running total never exceeds
/// [`capacity_bytes`](Self::capacity_bytes) once a public call returns.
pub struct IconCache {
    inner: Mutex<CacheInner>,
    resolver: IconResolver,
}

impl IconCache {
    /// Create a cache that populates misses through `resolver`.
    pub fn new(config: IconCacheConfig, resolver: IconResolver) -> Self {
        debug!(
            target: "shorebar_icons::cache",
            capacity_bytes = config.capacity_bytes,
            "created icon cache"
        );
        Self {
            inner: Mutex::new(CacheInner::new(config.capacity_bytes)),
            resolver,
        }
    }

    /// The resolver this cache populates from.
    #[inline]
    pub fn resolver(&self) -> &IconResolver {
        &self.resolver
    }

    /// The icon for an application entry.
    ///
    /// A hit promotes the entry to most recently used and returns the
    /// shared instance. A miss resolves the icon, normalizes it to a
    /// bitmap, and caches it, evicting least recently used entries until
    /// the byte total is back within budget. An icon bigger than the whole
    /// budget is still returned, just not retained.
    pub fn get_icon(&self, id: &AppIdentity) -> Arc<CachedIcon> {
        let key = id.cache_key();
        let mut inner = self.inner.lock();

        if let Some(icon) = inner.get(&key) {
            return icon;
        }

        // Populate under the same lock: one resolution at a time.
        let image = self.resolver.resolve(id);
        let icon = Arc::new(CachedIcon::new(to_bitmap(image)));
        debug!(
            target: "shorebar_icons::cache",
            key = %key,
            bytes = icon.byte_count(),
            "resolved and cached icon"
        );
        inner.insert(key, icon.clone());
        icon
    }

    /// Remove one identity's icon, returning it if it was cached.
    pub fn remove(&self, id: &AppIdentity) -> Option<Arc<CachedIcon>> {
        self.inner.lock().remove(&id.cache_key())
    }

    /// Whether an identity's icon is currently cached.
    ///
    /// Does not affect recency order.
    pub fn contains(&self, id: &AppIdentity) -> bool {
        self.inner.lock().entries.contains_key(&id.cache_key())
    }

    /// Evict every entry and drop the icon pack provider's cached state.
    ///
    /// The internal maps release their allocations. The next
    /// [`get_icon`](Self::get_icon) for any identity re-resolves.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.clear();
        self.resolver.icon_pack_provider().drop_cached_state();
        debug!(target: "shorebar_icons::cache", "cleared icon cache");
    }

    /// Number of cached icons.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no icons.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Current byte total of all cached icons.
    pub fn size_bytes(&self) -> usize {
        self.inner.lock().current_size
    }

    /// The fixed byte budget.
    pub fn capacity_bytes(&self) -> usize {
        self.inner.lock().capacity_bytes
    }

    /// A snapshot of cache statistics.
    pub fn stats(&self) -> IconCacheStats {
        let inner = self.inner.lock();
        IconCacheStats {
            entries: inner.entries.len(),
            size_bytes: inner.current_size,
            capacity_bytes: inner.capacity_bytes,
            hits: inner.hits,
            misses: inner.misses,
            hit_rate: inner.hit_rate(),
        }
    }

    /// Normalize an icon image to a decoded bitmap without caching it.
    pub fn convert_to_bitmap(image: IconImage) -> Bitmap {
        to_bitmap(image)
    }

    /// Monochrome rendition of an icon image without caching it.
    pub fn convert_to_monochrome(image: IconImage, threshold: f32) -> Bitmap {
        to_monochrome(image, threshold)
    }
}

impl std::fmt::Debug for IconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("IconCache")
            .field("entries", &inner.entries.len())
            .field("size_bytes", &inner.current_size)
            .field("capacity_bytes", &inner.capacity_bytes)
            .field("hit_rate", &format!("{:.1}%", inner.hit_rate() * 100.0))
            .finish()
    }
}

/// Statistics about the icon cache.
#[derive(Debug, Clone)]
pub struct IconCacheStats {
    /// Number of cached icons.
    pub entries: usize,
    /// Current byte total.
    pub size_bytes: usize,
    /// Fixed byte budget.
    pub capacity_bytes: usize,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate (0.0 to 1.0).
    pub hit_rate: f64,
}

impl IconCacheStats {
    /// Budget usage as a percentage (0.0 to 100.0).
    pub fn usage_percent(&self) -> f64 {
        if self.capacity_bytes == 0 {
            0.0
        } else {
            (self.size_bytes as f64 / self.capacity_bytes as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_util::{
        bitmap_image, identity, CountingNotifier, FakeCatalog, FakePacks, MemPrefs, HOST_PACKAGE,
    };

    struct Harness {
        catalog: Arc<FakeCatalog>,
        packs: Arc<FakePacks>,
        cache: IconCache,
    }

    fn harness(capacity_bytes: usize, catalog: FakeCatalog) -> Harness {
        let catalog = Arc::new(catalog);
        let packs = Arc::new(FakePacks::new());
        let resolver = IconResolver::new(
            HOST_PACKAGE,
            Arc::new(MemPrefs::new()),
            catalog.clone(),
            packs.clone(),
            Arc::new(CountingNotifier::default()),
        );
        let cache = IconCache::new(
            IconCacheConfig::default().with_capacity_bytes(capacity_bytes),
            resolver,
        );
        Harness {
            catalog,
            packs,
            cache,
        }
    }

    #[test]
    fn test_miss_resolves_normalizes_and_caches() {
        let id = identity("mail");
        let hx = harness(1 << 20, FakeCatalog::new().icon(&id, bitmap_image(100, 100)));

        let icon = hx.cache.get_icon(&id);

        assert_eq!((icon.width(), icon.height()), (100, 100));
        assert_eq!(icon.byte_count(), 40_000);
        assert_eq!(hx.cache.len(), 1);
        assert_eq!(hx.cache.size_bytes(), 40_000);
        assert_eq!(hx.catalog.badged_calls(&id), 1);
    }

    #[test]
    fn test_hit_returns_the_same_instance() {
        let id = identity("mail");
        let hx = harness(1 << 20, FakeCatalog::new().icon(&id, bitmap_image(100, 100)));

        let first = hx.cache.get_icon(&id);
        let second = hx.cache.get_icon(&id);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(hx.catalog.badged_calls(&id), 1);
    }

    #[test]
    fn test_painter_icons_are_normalized_to_bitmaps() {
        let id = identity("vector");
        let hx = harness(1 << 20, FakeCatalog::new().painter_icon(&id, 24, 24));

        let icon = hx.cache.get_icon(&id);

        assert_eq!((icon.width(), icon.height()), (24, 24));
        assert_eq!(icon.byte_count(), 24 * 24 * 4);
    }

    #[test]
    fn test_eviction_respects_byte_budget() {
        let a = identity("a");
        let b = identity("b");
        // Budget fits exactly one 100x100 icon.
        let hx = harness(
            40_000,
            FakeCatalog::new()
                .icon(&a, bitmap_image(100, 100))
                .icon(&b, bitmap_image(100, 100)),
        );

        hx.cache.get_icon(&a);
        hx.cache.get_icon(&b);

        assert!(!hx.cache.contains(&a));
        assert!(hx.cache.contains(&b));
        assert_eq!(hx.cache.size_bytes(), 40_000);
    }

    #[test]
    fn test_recent_access_changes_eviction_order() {
        let a = identity("a");
        let b = identity("b");
        let c = identity("c");
        let hx = harness(
            80_000,
            FakeCatalog::new()
                .icon(&a, bitmap_image(100, 100))
                .icon(&b, bitmap_image(100, 100))
                .icon(&c, bitmap_image(100, 100)),
        );

        hx.cache.get_icon(&a);
        hx.cache.get_icon(&b);
        // Touch a so b becomes the eviction candidate.
        hx.cache.get_icon(&a);
        hx.cache.get_icon(&c);

        assert!(hx.cache.contains(&a));
        assert!(!hx.cache.contains(&b));
        assert!(hx.cache.contains(&c));
    }

    #[test]
    fn test_oversized_icon_is_returned_but_not_retained() {
        let id = identity("huge");
        let hx = harness(1024, FakeCatalog::new().icon(&id, bitmap_image(100, 100)));

        let icon = hx.cache.get_icon(&id);

        assert_eq!(icon.byte_count(), 40_000);
        assert!(hx.cache.is_empty());
        assert_eq!(hx.cache.size_bytes(), 0);
    }

    #[test]
    fn test_remove() {
        let id = identity("mail");
        let hx = harness(1 << 20, FakeCatalog::new().icon(&id, bitmap_image(10, 10)));

        hx.cache.get_icon(&id);
        let removed = hx.cache.remove(&id);

        assert!(removed.is_some());
        assert!(!hx.cache.contains(&id));
        assert_eq!(hx.cache.size_bytes(), 0);
        assert!(hx.cache.remove(&id).is_none());
    }

    #[test]
    fn test_clear_empties_and_drops_pack_state() {
        let a = identity("a");
        let b = identity("b");
        let hx = harness(
            1 << 20,
            FakeCatalog::new()
                .icon(&a, bitmap_image(10, 10))
                .icon(&b, bitmap_image(10, 10)),
        );

        hx.cache.get_icon(&a);
        hx.cache.get_icon(&b);
        hx.cache.clear();

        assert!(hx.cache.is_empty());
        assert_eq!(hx.cache.size_bytes(), 0);
        assert_eq!(hx.packs.drops(), 1);

        // A fresh lookup resolves again instead of reusing stale state.
        hx.cache.get_icon(&a);
        assert_eq!(hx.catalog.badged_calls(&a), 2);
    }

    #[test]
    fn test_contains_does_not_promote() {
        let a = identity("a");
        let b = identity("b");
        let c = identity("c");
        let hx = harness(
            80_000,
            FakeCatalog::new()
                .icon(&a, bitmap_image(100, 100))
                .icon(&b, bitmap_image(100, 100))
                .icon(&c, bitmap_image(100, 100)),
        );

        hx.cache.get_icon(&a);
        hx.cache.get_icon(&b);
        // contains() must not refresh a's recency.
        assert!(hx.cache.contains(&a));
        hx.cache.get_icon(&c);

        assert!(!hx.cache.contains(&a));
        assert!(hx.cache.contains(&b));
        assert!(hx.cache.contains(&c));
    }

    #[test]
    fn test_memory_class_budget() {
        let config = IconCacheConfig::for_memory_class(48);
        assert_eq!(config.capacity_bytes, 48 * 1024 * 1024 / 8);

        let default = IconCacheConfig::default();
        assert_eq!(default.capacity_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn test_stats() {
        let id = identity("mail");
        let hx = harness(1 << 20, FakeCatalog::new().icon(&id, bitmap_image(100, 100)));

        hx.cache.get_icon(&id);
        hx.cache.get_icon(&id);

        let stats = hx.cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.size_bytes, 40_000);
        assert_eq!(stats.capacity_bytes, 1 << 20);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.5);
        assert!(stats.usage_percent() > 0.0);
    }

    #[test]
    fn test_convert_passthroughs() {
        let bitmap = IconCache::convert_to_bitmap(bitmap_image(7, 3));
        assert_eq!(bitmap.dimensions(), (7, 3));

        let mono = IconCache::convert_to_monochrome(bitmap_image(2, 2), 0.5);
        // The test image is pure red, value 1.0, so every pixel lights up.
        assert_eq!(mono.get_pixel(0, 0), Some(0xffff_ffff));
    }
}
