use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

use recentsguard::common::config::DEFAULT_SETTINGS_KEY;
use recentsguard::privacy::{decode, encode, PrivacySet, PrivacyToggleService};
use recentsguard::settings::{read_seeded, FileSettingsStore, MemorySettingsStore, SettingsStore};
use recentsguard::GuardError;

const KEY: &str = DEFAULT_SETTINGS_KEY;

fn service_with(value: Option<&str>) -> (Arc<MemorySettingsStore>, PrivacyToggleService) {
    let store = Arc::new(match value {
        Some(v) => MemorySettingsStore::with_value(KEY, v),
        None => MemorySettingsStore::new(),
    });
    let service = PrivacyToggleService::new(store.clone(), KEY);
    (store, service)
}

// ─── Codec ────────────────────────────────────────────────────────────────────

#[test]
fn test_codec_round_trip_preserves_order() {
    let sets: Vec<PrivacySet> = vec![
        PrivacySet::new(),
        ["com.a"].into_iter().collect(),
        ["org.z", "com.a", "net.m.long.name"].into_iter().collect(),
    ];
    for set in sets {
        assert_eq!(decode(Some(&encode(&set))), set);
    }
}

/// xorshift64, so generated cases are the same on every run
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: u64) -> usize {
        (self.next() % n) as usize
    }

    fn identifier(&mut self) -> String {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._";
        let len = 1 + self.below(24);
        (0..len)
            .map(|_| ALPHABET[self.below(ALPHABET.len() as u64)] as char)
            .collect()
    }
}

#[test]
fn test_codec_round_trip_generated_sets() {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    for _ in 0..500 {
        let count = rng.below(12);
        let mut seen = HashSet::new();
        let mut set = PrivacySet::new();
        while set.len() < count {
            let id = rng.identifier();
            if seen.insert(id.clone()) {
                assert!(set.insert(&id));
            }
        }

        let raw = encode(&set);
        let decoded = decode(Some(&raw));
        assert_eq!(decoded, set, "round trip failed for {raw:?}");
        assert_eq!(decoded.iter().collect::<Vec<_>>(), set.iter().collect::<Vec<_>>());
    }
}

// ─── Store seeding ────────────────────────────────────────────────────────────

#[test]
fn test_read_seeded_creates_empty_key() {
    let store = MemorySettingsStore::new();
    assert_eq!(read_seeded(&store, KEY).unwrap(), "");
    assert_eq!(store.get(KEY).unwrap(), Some(String::new()));
    assert_eq!(store.write_count(), 1);

    // second read finds the key and writes nothing
    read_seeded(&store, KEY).unwrap();
    assert_eq!(store.write_count(), 1);
}

#[test]
fn test_read_seeded_keeps_existing_value() {
    let store = MemorySettingsStore::with_value(KEY, "com.a");
    assert_eq!(read_seeded(&store, KEY).unwrap(), "com.a");
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_file_store_seeds_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let store = FileSettingsStore::new(&path);

    assert_eq!(read_seeded(&store, KEY).unwrap(), "");
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some(""));

    store.put(KEY, "com.a").unwrap();
    assert_eq!(read_seeded(&store, KEY).unwrap(), "com.a");
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some("com.a"));
}

// ─── setEnabled / isEnabled ───────────────────────────────────────────────────

#[test]
fn test_enable_absent_package() {
    let (store, service) = service_with(Some("com.a"));
    assert!(service.set_enabled("com.b", true).unwrap());
    assert!(service.is_enabled("com.b").unwrap());

    let raw = store.get(KEY).unwrap().unwrap();
    assert_eq!(raw, "com.a,com.b");
    assert_eq!(raw.split(',').filter(|p| *p == "com.b").count(), 1);
}

#[test]
fn test_enable_on_missing_key_has_no_leading_comma() {
    let (store, service) = service_with(None);
    assert!(service.set_enabled("com.a", true).unwrap());
    assert_eq!(store.get(KEY).unwrap().unwrap(), "com.a");
}

#[test]
fn test_disable_present_package() {
    let (store, service) = service_with(Some("com.a,com.b,com.c"));
    assert!(!service.set_enabled("com.b", false).unwrap());
    assert!(!service.is_enabled("com.b").unwrap());
    assert_eq!(store.get(KEY).unwrap().unwrap(), "com.a,com.c");
}

#[test]
fn test_enable_when_already_enabled_returns_false_without_write() {
    let (store, service) = service_with(Some("com.a"));
    let writes = store.write_count();

    assert!(!service.set_enabled("com.a", true).unwrap());
    assert_eq!(store.write_count(), writes);
    assert_eq!(store.get(KEY).unwrap().unwrap(), "com.a");
    assert!(service.is_enabled("com.a").unwrap());
}

#[test]
fn test_disable_when_absent_returns_true_without_write() {
    let (store, service) = service_with(Some("com.a"));
    let writes = store.write_count();

    assert!(service.set_enabled("com.zzz", false).unwrap());
    assert_eq!(store.write_count(), writes);
    assert!(!service.is_enabled("com.zzz").unwrap());
}

#[test]
fn test_reset_clears_all() {
    let (store, service) = service_with(Some("com.a,com.b"));
    service.reset().unwrap();
    assert!(!service.is_enabled("com.a").unwrap());
    assert!(!service.is_enabled("com.b").unwrap());
    assert_eq!(store.get(KEY).unwrap().unwrap(), "");
}

#[test]
fn test_stale_packages_are_kept() {
    let (_store, service) = service_with(Some("com.uninstalled,com.a"));
    service.set_enabled("com.a", false).unwrap();
    assert!(service.is_enabled("com.uninstalled").unwrap());
}

#[test]
fn test_toggle_updates_entry() {
    let (_store, service) = service_with(Some(""));
    let mut entry = recentsguard::AppEntry {
        title: "Bank".to_string(),
        package: "com.bank".to_string(),
        uid: 10100,
        enabled: true,
        privacy_hidden: false,
    };

    assert!(service.toggle(&mut entry).unwrap());
    assert!(entry.privacy_hidden);
    assert!(service.is_enabled("com.bank").unwrap());

    assert!(!service.toggle(&mut entry).unwrap());
    assert!(!entry.privacy_hidden);
    assert!(!service.is_enabled("com.bank").unwrap());
}

// ─── File-backed store ────────────────────────────────────────────────────────

#[test]
fn test_file_store_persists_between_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/settings.json");

    let first = PrivacyToggleService::new(Arc::new(FileSettingsStore::new(&path)), KEY);
    first.set_enabled("com.a", true).unwrap();
    first.set_enabled("com.b", true).unwrap();

    let second = PrivacyToggleService::new(Arc::new(FileSettingsStore::new(&path)), KEY);
    assert!(second.is_enabled("com.a").unwrap());
    assert_eq!(second.current().unwrap().encode(), "com.a,com.b");
}

#[test]
fn test_file_store_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileSettingsStore::new(dir.path().join("settings.json"));
    store.put("other", "value").unwrap();
    store.put(KEY, "com.a").unwrap();

    assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some("com.a"));
    assert_eq!(store.get("missing").unwrap(), None);
}

#[test]
fn test_file_store_corrupt_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let service = PrivacyToggleService::new(Arc::new(FileSettingsStore::new(&path)), KEY);
    let err = service.is_enabled("com.a").unwrap_err();
    assert!(matches!(err, GuardError::StoreUnavailable { .. }));
}

#[test]
fn test_file_store_write_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let store = FileSettingsStore::new(dir.path().join("settings.json"));
    for i in 0..10 {
        store.put(KEY, &format!("com.app{i}")).unwrap();
    }

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("settings.json")]);
}

// ─── Concurrent access ────────────────────────────────────────────────────────

#[test]
fn test_reads_during_writes_never_lose_membership() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    // separate store instances share no lock, like two processes
    let writer = PrivacyToggleService::new(Arc::new(FileSettingsStore::new(&path)), KEY);
    let reader = PrivacyToggleService::new(Arc::new(FileSettingsStore::new(&path)), KEY);
    writer.set_enabled("com.keep", true).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let flipper = {
        let stop = stop.clone();
        thread::spawn(move || {
            let mut hidden = true;
            while !stop.load(Ordering::SeqCst) {
                writer.set_enabled("com.flip", hidden).unwrap();
                hidden = !hidden;
            }
        })
    };

    for _ in 0..2000 {
        assert!(reader.is_enabled("com.keep").unwrap());
    }
    stop.store(true, Ordering::SeqCst);
    flipper.join().unwrap();

    assert!(reader.current().unwrap().contains("com.keep"));
}

#[test]
fn test_concurrent_toggles_of_one_package_keep_others() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let service = PrivacyToggleService::new(Arc::new(FileSettingsStore::new(&path)), KEY);
    service.set_enabled("com.keep", true).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|n| {
            let service = service.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    service.set_enabled("com.flip", (i + n) % 2 == 0).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let set = service.current().unwrap();
    assert!(set.contains("com.keep"));
    assert!(set.len() <= 2);
}
