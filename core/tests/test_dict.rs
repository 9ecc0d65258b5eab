//! Mapping view.

mod common;

use py11::{Dict, Handle, SequenceOps};

#[test]
fn test_basic_access() {
    let _py = common::python();

    let d = Dict::new().unwrap();
    assert_eq!(d.size().unwrap(), 0);
    d.set_item("a", 1).unwrap();
    d.set_item("b", 2).unwrap();
    assert_eq!(d.size().unwrap(), 2);
    assert!(d.has("a").unwrap());
    assert!(!d.has("z").unwrap());
    assert_eq!(d.get("b").unwrap().as_long().unwrap(), 2);
}

#[test]
fn test_missing_key_is_index_error() {
    let _py = common::python();

    let d = py11::dict! { "a" => 1 }.unwrap();
    assert!(d.get("z").unwrap_err().is_index());
    assert!(d.del_item("z").unwrap_err().is_index());
    d.del_item("a").unwrap();
    assert_eq!(d.size().unwrap(), 0);
}

#[test]
fn test_unhashable_key_is_type_error() {
    let _py = common::python();

    let d = Dict::new().unwrap();
    let key = py11::list![1].unwrap();
    assert!(d.set_item(&key, 1).unwrap_err().is_type());
    assert!(d.get(&key).unwrap_err().is_type());
}

#[test]
fn test_snapshots() {
    let _py = common::python();

    let d = py11::dict! { "a" => 1, "b" => 2 }.unwrap();
    let keys = d.keys().unwrap();
    let values = d.values().unwrap();
    let items = d.items().unwrap();
    assert_eq!(keys.size().unwrap(), 2);
    assert!(keys.has("a").unwrap());
    assert!(values.has(2).unwrap());
    assert_eq!(items.get(0).unwrap().len().unwrap(), 2);

    // Snapshots do not follow later changes.
    d.set_item("c", 3).unwrap();
    assert_eq!(keys.size().unwrap(), 2);
}

#[test]
fn test_update_overwrites() {
    let _py = common::python();

    let d = py11::dict! { "a" => 1, "b" => 2 }.unwrap();
    let other = py11::dict! { "b" => 20, "c" => 30 }.unwrap();
    d.update(&other).unwrap();
    assert_eq!(d.size().unwrap(), 3);
    assert_eq!(d.get("b").unwrap().as_long().unwrap(), 20);

    assert!(d.update(&Dict::default()).unwrap_err().is_value());
}

#[test]
fn test_copy_is_shallow() {
    let _py = common::python();

    let inner = py11::list![1].unwrap();
    let d = py11::dict! { "inner" => &inner }.unwrap();
    let copy = d.copy().unwrap();
    assert!(!copy.is(&d));
    assert!(copy.get("inner").unwrap().is(&inner));

    copy.clear().unwrap();
    assert_eq!(copy.size().unwrap(), 0);
    assert_eq!(d.size().unwrap(), 1);
}

#[test]
fn test_mapping_view_requires_dict() {
    let _py = common::python();

    let h: Handle = py11::list![].unwrap().into();
    let err = h.cast::<Dict>().unwrap_err();
    assert_eq!(err.message(), "object is not a dict");
}
