//! Path-addressed reads and auto-vivifying writes.

use conftree::{Node, NodeKind, Store};

use crate::helpers::store_from;

const SCHEMA: &str = "\
menu:
  page_size: 9
  alternative_select_keys: ABCDEF
style:
  color_scheme: aqua
  font_point: 14
switches:
  - name: ascii_mode
    reset: 0
  - name: full_shape
    states: [half, full]
";

#[test]
fn reads_resolve_nested_paths() {
    let store = store_from(SCHEMA);

    assert_eq!(store.get_int("menu/page_size"), Some(9));
    assert_eq!(store.get_str("style/color_scheme"), Some("aqua"));
    assert_eq!(store.get_str("switches/@0/name"), Some("ascii_mode"));
    assert_eq!(store.get_str("switches/@last/name"), Some("full_shape"));
    assert_eq!(store.get_str("switches/@1/states/@1"), Some("full"));
    assert_eq!(store.kind_at("switches"), Some(NodeKind::List));
    assert_eq!(store.kind_at("menu"), Some(NodeKind::Map));
}

#[test]
fn reads_fail_soft() {
    let store = store_from(SCHEMA);

    // absent key, out-of-range index, wrong-kind step
    assert_eq!(store.traverse("menu/missing"), None);
    assert_eq!(store.traverse("switches/@9"), None);
    assert_eq!(store.traverse("menu/page_size/deeper"), None);
    // absence and explicit null both read as null
    assert!(store.is_null("menu/missing"));
    // typed reads on the wrong spelling
    assert_eq!(store.get_bool("menu/page_size"), None);
    assert_eq!(store.get_int("style/color_scheme"), None);
}

#[test]
fn reads_never_create_anything() {
    let mut store = store_from(SCHEMA);
    let before = store.root().clone();

    assert!(store.traverse("ghost/child/@3").is_none());
    assert!(store.traverse_mut("ghost/child/@3").is_none());

    assert_eq!(store.root(), &before);
    assert!(!store.dirty());
}

#[test]
fn scalar_spellings_are_interpreted_lazily() {
    let store = store_from("hex: 0x1F\nupper: True\nfloaty: 2.5\nplain: hello\n");

    assert_eq!(store.get_int("hex"), Some(0x1F));
    assert_eq!(store.get_str("hex"), Some("0x1F"));
    assert_eq!(store.get_bool("upper"), Some(true));
    assert_eq!(store.get_f64("floaty"), Some(2.5));
    assert_eq!(store.get_int("plain"), None);
}

#[test]
fn root_path_replaces_wholesale() {
    let mut store = store_from(SCHEMA);

    store.set_item("/", Node::Scalar("flat".to_string())).unwrap();
    assert_eq!(store.get_str(""), Some("flat"));
    assert!(store.dirty());

    store.set_item("", Node::Null).unwrap();
    assert!(store.root().is_null());
}

#[test]
fn writes_nest_maps_on_an_empty_store() {
    let mut store = Store::new();

    store.set_item("a/b/c", "v").unwrap();

    assert_eq!(store.kind_at("a"), Some(NodeKind::Map));
    assert_eq!(store.kind_at("a/b"), Some(NodeKind::Map));
    assert_eq!(store.get_str("a/b/c"), Some("v"));
}

#[test]
fn writes_vivify_by_lookahead() {
    let mut store = Store::new();

    store.set_item("schema/dependencies/@1/name", "luna_pinyin").unwrap();

    assert_eq!(store.kind_at("schema"), Some(NodeKind::Map));
    assert_eq!(store.kind_at("schema/dependencies"), Some(NodeKind::List));
    // slot 0 was grown as a null placeholder
    assert!(store.is_null("schema/dependencies/@0"));
    assert_eq!(store.get_str("schema/dependencies/@1/name"), Some("luna_pinyin"));
    assert!(store.dirty());
}

#[test]
fn next_appends_and_last_overwrites() {
    let mut store = Store::new();

    store.set_item("keys/@next", "A").unwrap();
    store.set_item("keys/@next", "B").unwrap();
    store.set_item("keys/@next", "C").unwrap();
    assert_eq!(store.entry("keys").len(), 3);

    store.set_item("keys/@last", "Z").unwrap();
    assert_eq!(store.entry("keys").len(), 3);
    assert_eq!(store.get_str("keys/@2"), Some("Z"));
}

#[test]
fn before_and_after_insert_new_slots() {
    let mut store = store_from("keys: [a, b, c]\n");

    store.set_item("keys/@before 1", "x").unwrap();
    assert_eq!(store.get_str("keys/@0"), Some("a"));
    assert_eq!(store.get_str("keys/@1"), Some("x"));
    assert_eq!(store.get_str("keys/@2"), Some("b"));

    store.set_item("keys/@after last", "y").unwrap();
    assert_eq!(store.entry("keys").len(), 5);
    assert_eq!(store.get_str("keys/@last"), Some("y"));
}

#[test]
fn inserting_directives_work_on_empty_lists() {
    let mut store = Store::new();
    store.set_item("items", Node::list()).unwrap();

    store.set_item("items/@before last", "first").unwrap();
    assert_eq!(store.entry("items").len(), 1);
    assert_eq!(store.get_str("items/@0"), Some("first"));
}

#[test]
fn bare_indices_grow_sparsely() {
    let mut store = Store::new();

    store.set_item("slots/@4", "e").unwrap();
    assert_eq!(store.entry("slots").len(), 5);
    for i in 0..4 {
        assert!(store.is_null(&format!("slots/@{i}")));
    }
    assert_eq!(store.get_str("slots/@4"), Some("e"));
}

#[test]
fn oversized_directive_indices_stay_bounded() {
    let mut store = Store::new();

    // out-of-range tails read as zero instead of forcing absurd growth
    store.set_item("l/@18446744073709551615", "x").unwrap();
    assert_eq!(store.get_str("l/@0"), Some("x"));
    assert_eq!(store.entry("l").len(), 1);

    store.set_item("l/@4294967295", "y").unwrap();
    assert_eq!(store.get_str("l/@0"), Some("y"));
    assert_eq!(store.entry("l").len(), 1);
}

#[test]
fn kind_mismatch_aborts_the_write() {
    let mut store = store_from(SCHEMA);

    // scalar in the middle of the path
    let err = store.set_item("menu/page_size/deeper", 1).unwrap_err();
    assert!(err.is_type_mismatch());

    // directive against a map
    let err = store.set_item("menu/@0", 1).unwrap_err();
    assert!(err.is_type_mismatch());

    // key against a list
    let err = store.set_item("switches/name", 1).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn failed_write_keeps_earlier_steps() {
    // vivifying the root succeeds before the directive mismatch is found,
    // and nothing rolls it back
    let mut store = Store::new();

    let err = store.set_item("@0", 1).unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(store.root().is_map());
    assert!(!store.dirty());
}

#[test]
fn empty_segments_are_map_keys() {
    let mut store = Store::new();

    store.set_item("a//b", 1).unwrap();
    assert_eq!(store.get_int("a//b"), Some(1));
    assert!(store.traverse("a").is_some_and(|n| n.contains_key("")));
}

#[test]
fn null_overwrite_tombstones_without_removing() {
    let mut store = store_from(SCHEMA);

    store.set_item("style/font_point", Node::Null).unwrap();
    assert!(store.is_null("style/font_point"));
    assert!(store.traverse("style").is_some_and(|n| n.contains_key("font_point")));
    assert!(store.dirty());
}
