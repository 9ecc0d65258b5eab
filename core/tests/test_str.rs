//! Str view.

mod common;

use py11::{Handle, SequenceOps, Str};

#[test]
fn test_size_counts_code_points() {
    let _py = common::python();

    let s = Str::new("héllo").unwrap();
    assert_eq!(s.size().unwrap(), 5);
    assert_eq!(s.as_utf8().unwrap().len(), 6);
}

#[test]
fn test_indexing_and_slicing_yield_str() {
    let _py = common::python();

    let s = Str::new("abcdef").unwrap();
    let c: Str = s.get(2).unwrap();
    assert_eq!(c.as_utf8().unwrap(), "c");
    assert_eq!(s.get(-1).unwrap().as_utf8().unwrap(), "f");
    assert!(s.get(10).unwrap_err().is_index());

    assert_eq!(s.sub(1..3).unwrap().as_utf8().unwrap(), "bc");
    assert_eq!(s.sub(4..).unwrap().as_utf8().unwrap(), "ef");
    assert_eq!(s.find("d").unwrap(), Some(3));
}

#[test]
fn test_push_str_concatenates() {
    let _py = common::python();

    let mut s = Str::new("foo").unwrap();
    s.push_str("bar").unwrap();
    assert_eq!(s.as_utf8().unwrap(), "foobar");
    assert!(s.push_str(1).unwrap_err().is_type());
    assert_eq!(s.as_utf8().unwrap(), "foobar");
}

#[test]
fn test_format() {
    let _py = common::python();

    let template = Str::new("%s=%d").unwrap();
    let out = template.format(py11::tuple!["x", 3]).unwrap();
    assert_eq!(out.as_utf8().unwrap(), "x=3");
    assert!(template.format(py11::tuple!["x"]).unwrap_err().is_type());
}

#[test]
fn test_encode_and_decode() {
    let _py = common::python();

    let s = Str::new("naïve").unwrap();
    let latin1 = s.encode("latin-1", "strict").unwrap();
    assert_eq!(latin1.len().unwrap(), 5);
    let back = Str::decode(&latin1, "latin-1", "strict").unwrap();
    assert!(back.eq(&s).unwrap());

    assert!(s.encode("ascii", "strict").unwrap_err().is_value());
    assert_eq!(s.encode("ascii", "replace").unwrap().as_utf8().unwrap(), "na?ve");
    assert!(s.encode("no-such-codec", "strict").unwrap_err().is_value());
}

#[test]
fn test_display_matches_text() {
    let _py = common::python();

    let s = Str::new("shown").unwrap();
    assert_eq!(s.to_string(), "shown");
    assert_eq!(format!("{s:?}"), "Str(Handle('shown'))");
}

#[test]
fn test_str_view_rejects_bytes() {
    let _py = common::python();

    let bytes: Handle = Str::new("x").unwrap().encode("utf-8", "strict").unwrap();
    assert!(bytes.cast::<Str>().unwrap_err().is_type());
}
