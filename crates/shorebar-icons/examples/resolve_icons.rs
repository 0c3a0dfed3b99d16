//! Icon resolution and caching walkthrough.
//!
//! Wires the resolver up to small in-memory collaborators, resolves a few
//! application icons, switches to an icon pack, and prints cache statistics
//! along the way.
//!
//! Run with: cargo run -p shorebar-icons --example resolve_icons

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use shorebar_icons::{
    AppCatalog, AppIdentity, Bitmap, ComponentKey, IconCache, IconCacheConfig, IconImage,
    IconPackProvider, IconResolver, PreferenceStore, RefreshNotifier, UserSerial,
    PREF_ICON_PACK,
};

const HOST: &str = "org.shorebar.shell";
const PACK: &str = "org.packs.paperwork";

struct DemoPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl PreferenceStore for DemoPrefs {
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

struct DemoCatalog;

impl AppCatalog for DemoCatalog {
    fn is_installed(&self, package: &str) -> bool {
        package == HOST || package == PACK
    }

    fn badged_icon(&self, id: &AppIdentity) -> Option<IconImage> {
        // Every app gets a solid tile whose color depends on its name.
        let seed = id.component().package().bytes().map(u32::from).sum::<u32>();
        let argb = 0xff00_0000 | (seed.wrapping_mul(2_654_435_761) & 0x00ff_ffff);
        Some(IconImage::Bitmap(Bitmap::filled(96, 96, argb)))
    }

    fn default_activity_icon(&self) -> IconImage {
        IconImage::Bitmap(Bitmap::filled(48, 48, 0xff88_8888))
    }
}

struct DemoPacks;

impl IconPackProvider for DemoPacks {
    fn icon_for(&self, pack: &str, component: &ComponentKey) -> Option<IconImage> {
        // The pack only themes the mail app.
        if pack == PACK && component.package() == "org.example.mail" {
            Some(IconImage::Bitmap(Bitmap::filled(128, 128, 0xffff_7700)))
        } else {
            None
        }
    }

    fn masked_icon_for(
        &self,
        _pack: &str,
        _component: &ComponentKey,
        _base: &Bitmap,
    ) -> Option<Bitmap> {
        None
    }

    fn drop_cached_state(&self) {
        println!("  (icon pack provider dropped its cached state)");
    }
}

struct PrintNotifier;

impl RefreshNotifier for PrintNotifier {
    fn icons_changed(&self) {
        println!("  (refresh broadcast: icons changed)");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Icon resolution example");
    println!("=======================");
    println!();

    let prefs = Arc::new(DemoPrefs {
        values: Mutex::new(HashMap::new()),
    });
    let resolver = IconResolver::new(
        HOST,
        prefs.clone(),
        Arc::new(DemoCatalog),
        Arc::new(DemoPacks),
        Arc::new(PrintNotifier),
    );
    let cache = IconCache::new(IconCacheConfig::for_memory_class(64), resolver);
    println!("Cache budget: {} bytes", cache.capacity_bytes());
    println!();

    let apps = [
        AppIdentity::new(
            ComponentKey::new("org.example.mail", "org.example.mail.Inbox"),
            UserSerial(0),
        ),
        AppIdentity::new(
            ComponentKey::new("org.example.maps", "org.example.maps.Main"),
            UserSerial(0),
        ),
        AppIdentity::new(
            ComponentKey::new("org.example.camera", "org.example.camera.Main"),
            UserSerial(0),
        ),
    ];

    // First pass resolves every icon through the platform catalog.
    println!("Resolving {} icons:", apps.len());
    for id in &apps {
        let icon = cache.get_icon(id);
        println!(
            "  {} -> {}x{} ({} bytes)",
            id.component(),
            icon.width(),
            icon.height(),
            icon.byte_count()
        );
    }
    println!();

    // Second pass is served from the cache: same instances, no resolution.
    let again = cache.get_icon(&apps[0]);
    let cached = cache.get_icon(&apps[0]);
    println!(
        "Repeated lookup shares the cached instance: {}",
        Arc::ptr_eq(&again, &cached)
    );
    println!();

    // Select an icon pack. Clearing drops the stale renditions so the next
    // lookups pick up the themed icons.
    println!("Selecting icon pack {PACK} and clearing the cache:");
    prefs.set_string(PREF_ICON_PACK, PACK);
    cache.clear();
    for id in &apps {
        let icon = cache.get_icon(id);
        println!(
            "  {} -> {}x{} ({} bytes)",
            id.component(),
            icon.width(),
            icon.height(),
            icon.byte_count()
        );
    }
    println!();

    let stats = cache.stats();
    println!("Cache statistics:");
    println!("  entries:   {}", stats.entries);
    println!(
        "  size:      {} / {} bytes ({:.1}%)",
        stats.size_bytes,
        stats.capacity_bytes,
        stats.usage_percent()
    );
    println!("  hits:      {}", stats.hits);
    println!("  misses:    {}", stats.misses);
    println!("  hit rate:  {:.1}%", stats.hit_rate * 100.0);
    println!();

    // Monochrome rendition, as used for themed notification badges.
    let mono = IconCache::convert_to_monochrome(
        IconImage::Bitmap(cache.get_icon(&apps[0]).bitmap().clone()),
        0.5,
    );
    println!(
        "Monochrome rendition of {}: {}x{}",
        apps[0].component(),
        mono.width(),
        mono.height()
    );
}
