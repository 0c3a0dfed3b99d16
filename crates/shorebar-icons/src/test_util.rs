//! Shared test doubles for the host environment contracts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use shorebar_raster::{Bitmap, IconImage, IconPainter};

use crate::identity::{AppIdentity, ComponentKey, UserSerial};
use crate::traits::{AppCatalog, IconPackProvider, PreferenceStore, RefreshNotifier};

pub(crate) const HOST_PACKAGE: &str = "org.shorebar.shell";

/// An identity under the primary user, derived from a short name.
pub(crate) fn identity(name: &str) -> AppIdentity {
    AppIdentity::new(
        ComponentKey::new(
            format!("org.example.{name}"),
            format!("org.example.{name}.Main"),
        ),
        UserSerial(0),
    )
}

/// A solid red bitmap image of the given size.
pub(crate) fn bitmap_image(width: u32, height: u32) -> IconImage {
    IconImage::Bitmap(Bitmap::filled(width, height, 0xffff_0000))
}

/// A painter image with the given intrinsic size.
pub(crate) fn painter_image(width: i32, height: i32) -> IconImage {
    IconImage::Painter(Arc::new(TestPainter { width, height }))
}

pub(crate) struct TestPainter {
    width: i32,
    height: i32,
}

impl IconPainter for TestPainter {
    fn intrinsic_width(&self) -> i32 {
        self.width
    }

    fn intrinsic_height(&self) -> i32 {
        self.height
    }

    fn paint(&self, target: &mut Bitmap) {
        for y in 0..target.height() {
            for x in 0..target.width() {
                target.put_pixel(x, y, 0xff00_66ff);
            }
        }
    }
}

/// In-memory preference store.
#[derive(Default)]
pub(crate) struct MemPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl MemPrefs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed a preference before the store is handed out.
    pub(crate) fn with(self, key: &str, value: &str) -> Self {
        self.values.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// The raw stored value, bypassing defaults.
    pub(crate) fn stored(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

impl PreferenceStore for MemPrefs {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .lock()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.lock().get(key).map_or(default, |v| v == "true")
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }
}

/// Catalog double mapping identities to fixed icons.
///
/// The host package counts as installed from the start; everything else
/// must be added with [`installed`](Self::installed). Calls to
/// `badged_icon` are counted per identity so tests can assert how often
/// resolution actually ran.
pub(crate) struct FakeCatalog {
    installed: Vec<String>,
    icons: HashMap<String, IconImage>,
    default_icon: IconImage,
    badged_calls: Mutex<HashMap<String, usize>>,
}

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        Self {
            installed: vec![HOST_PACKAGE.to_string()],
            icons: HashMap::new(),
            default_icon: bitmap_image(16, 16),
            badged_calls: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn installed(mut self, package: &str) -> Self {
        self.installed.push(package.to_string());
        self
    }

    pub(crate) fn icon(mut self, id: &AppIdentity, image: IconImage) -> Self {
        self.icons.insert(id.cache_key(), image);
        self
    }

    pub(crate) fn painter_icon(self, id: &AppIdentity, width: i32, height: i32) -> Self {
        self.icon(id, painter_image(width, height))
    }

    pub(crate) fn badged_calls(&self, id: &AppIdentity) -> usize {
        self.badged_calls
            .lock()
            .get(&id.cache_key())
            .copied()
            .unwrap_or(0)
    }
}

impl AppCatalog for FakeCatalog {
    fn is_installed(&self, package: &str) -> bool {
        self.installed.iter().any(|p| p == package)
    }

    fn badged_icon(&self, id: &AppIdentity) -> Option<IconImage> {
        *self.badged_calls.lock().entry(id.cache_key()).or_insert(0) += 1;
        self.icons.get(&id.cache_key()).cloned()
    }

    fn default_activity_icon(&self) -> IconImage {
        self.default_icon.clone()
    }
}

/// Icon pack double with optional per-component artwork.
#[derive(Default)]
pub(crate) struct FakePacks {
    icons: HashMap<(String, String), IconImage>,
    masked: HashMap<(String, String), Bitmap>,
    icon_calls: AtomicUsize,
    drops: AtomicUsize,
}

impl FakePacks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn icon(mut self, pack: &str, component: &ComponentKey, image: IconImage) -> Self {
        self.icons
            .insert((pack.to_string(), component.flatten()), image);
        self
    }

    pub(crate) fn masked(mut self, pack: &str, component: &ComponentKey, bitmap: Bitmap) -> Self {
        self.masked
            .insert((pack.to_string(), component.flatten()), bitmap);
        self
    }

    pub(crate) fn icon_calls(&self) -> usize {
        self.icon_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

impl IconPackProvider for FakePacks {
    fn icon_for(&self, pack: &str, component: &ComponentKey) -> Option<IconImage> {
        self.icon_calls.fetch_add(1, Ordering::SeqCst);
        self.icons
            .get(&(pack.to_string(), component.flatten()))
            .cloned()
    }

    fn masked_icon_for(
        &self,
        pack: &str,
        component: &ComponentKey,
        _base: &Bitmap,
    ) -> Option<Bitmap> {
        self.masked
            .get(&(pack.to_string(), component.flatten()))
            .cloned()
    }

    fn drop_cached_state(&self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier double counting refresh requests.
#[derive(Default)]
pub(crate) struct CountingNotifier {
    count: AtomicUsize,
}

impl CountingNotifier {
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl RefreshNotifier for CountingNotifier {
    fn icons_changed(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
