//! File lifecycle: loading, saving, flush-on-drop, and the registry.

use std::fs;
use std::path::PathBuf;

use conftree::{Registry, Store};

fn temp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "config.yaml");

    let mut store = Store::new();
    store.set_item("menu/page_size", 9).unwrap();
    store.set_item("menu/keys/@next", "A").unwrap();
    assert!(store.dirty());

    store.save_to_file(&file).unwrap();
    assert!(!store.dirty());
    assert_eq!(store.source(), file.as_path());

    let mut reread = Store::new();
    reread.load_from_file(&file).unwrap();
    assert_eq!(reread.root(), store.root());
    assert!(!reread.dirty());
}

#[test]
fn loading_a_missing_file_leaves_an_empty_bound_store() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "absent.yaml");

    let mut store = Store::new();
    store.set_item("stale", 1).unwrap();

    let err = store.load_from_file(&file).unwrap_err();
    assert!(err.is_io());
    // previous content is gone, the source is remembered
    assert!(store.root().is_null());
    assert!(!store.dirty());
    assert_eq!(store.source(), file.as_path());

    // a later write and save target the remembered source
    store.set_item("fresh", 2).unwrap();
    store.save().unwrap();
    assert!(file.exists());
}

#[test]
fn parse_failure_keeps_the_source_and_clears_the_tree() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "broken.yaml");
    fs::write(&file, "key: [oops\n").unwrap();

    let mut store = Store::new();
    let err = store.load_from_file(&file).unwrap_err();
    assert!(err.is_parse());
    assert!(store.root().is_null());
    assert_eq!(store.source(), file.as_path());
}

#[test]
fn open_tolerates_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "new.yaml");

    let store = Store::open(&file);
    assert!(store.root().is_null());
    assert!(!store.dirty());
    assert_eq!(store.source(), file.as_path());
}

#[test]
fn dirty_stores_flush_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "user.yaml");

    {
        let mut store = Store::open(&file);
        store.set_item("style/color_scheme", "aqua").unwrap();
        assert!(store.dirty());
    }

    let mut reread = Store::new();
    reread.load_from_file(&file).unwrap();
    assert_eq!(reread.get_str("style/color_scheme"), Some("aqua"));
}

#[test]
fn clean_stores_do_not_flush() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "untouched.yaml");

    {
        let store = Store::open(&file);
        assert!(!store.dirty());
    }
    assert!(!file.exists());
}

#[test]
fn explicit_save_disarms_the_drop_flush() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "explicit.yaml");

    {
        let mut store = Store::open(&file);
        store.set_item("a", 1).unwrap();
        store.save().unwrap();
        // clean after saving; drop rewrites nothing
        assert!(!store.dirty());
        fs::write(&file, "b: 2\n").unwrap();
    }
    assert_eq!(fs::read_to_string(&file).unwrap(), "b: 2\n");
}

#[test]
fn unbound_stores_cannot_save() {
    let mut store = Store::new();
    store.set_item("a", 1).unwrap();
    let err = store.save().unwrap_err();
    assert!(matches!(err, conftree::Error::NoSource));
}

#[test]
fn streams_do_not_touch_the_binding() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "bound.yaml");
    fs::write(&file, "a: 1\n").unwrap();

    let mut store = Store::new();
    store.load_from_file(&file).unwrap();
    store.set_item("b", 2).unwrap();
    assert!(store.dirty());

    // reading a stream replaces the tree but not source or dirty flag
    store.load_from_reader("c: 3\n".as_bytes()).unwrap();
    assert_eq!(store.get_int("c"), Some(3));
    assert!(store.dirty());
    assert_eq!(store.source(), file.as_path());

    // writing a stream changes nothing either
    let mut out = Vec::new();
    store.save_to_writer(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "c: 3\n");
    assert!(store.dirty());

    // keep the drop flush from clobbering the fixture
    store.load_from_file(&file).unwrap();
}

#[test]
fn registry_shares_one_store_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "shared.yaml");
    fs::write(&file, "count: 1\n").unwrap();
    let name = file.to_str().unwrap();

    let mut registry = Registry::new();
    let first = registry.open(name);
    let second = registry.open(name);

    first.lock().unwrap().set_item("count", 2).unwrap();
    assert_eq!(second.lock().unwrap().get_int("count"), Some(2));
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_reload_discards_unsaved_changes() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_path(&dir, "reload.yaml");
    fs::write(&file, "count: 1\n").unwrap();
    let name = file.to_str().unwrap();

    let mut registry = Registry::new();
    let handle = registry.open(name);
    handle.lock().unwrap().set_item("count", 99).unwrap();

    registry.reload(name).unwrap();
    let store = handle.lock().unwrap();
    assert_eq!(store.get_int("count"), Some(1));
    assert!(!store.dirty());
}
