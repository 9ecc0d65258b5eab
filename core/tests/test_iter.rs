//! Iteration protocol: priming, exhaustion, equality, error surfacing.

mod common;

use py11::{Handle, Iter};

#[test]
fn test_yields_values_in_order_then_equals_end() {
    let _py = common::python();

    let source: Handle = py11::list![10, 20, 30].unwrap().into();
    let mut it = source.begin().unwrap();
    let mut seen = Vec::new();
    while it != source.end() {
        seen.push(it.current().as_long().unwrap());
        it.advance().unwrap();
    }
    assert_eq!(seen, vec![10, 20, 30]);
    assert!(it.is_exhausted());
    assert!(it.current().is_null());
}

#[test]
fn test_empty_sequence_begins_at_end() {
    let _py = common::python();

    let empty: Handle = py11::list![].unwrap().into();
    assert!(empty.begin().unwrap() == empty.end());
    assert_eq!(empty.iter().unwrap().count(), 0);
}

#[test]
fn test_exhaustion_is_sticky() {
    let _py = common::python();

    let source: Handle = py11::tuple![1].unwrap().into();
    let mut it = source.begin().unwrap();
    it.advance().unwrap();
    assert!(it.is_exhausted());
    it.advance().unwrap();
    assert!(it.is_exhausted());
    assert!(it.next().is_none());
}

#[test]
fn test_rust_iterator_adapter() {
    let _py = common::python();

    let text = py11::Str::new("abc").unwrap();
    let chars = text
        .iter()
        .unwrap()
        .map(|c| c.and_then(|c| c.as_utf8()))
        .collect::<py11::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(chars, vec!["a", "b", "c"]);
}

#[test]
fn test_same_iterator_object_compares_equal() {
    let _py = common::python();

    // An iterator is its own iterator, so both adapters share it.
    let source = py11::import("builtins")
        .unwrap()
        .attr("iter")
        .unwrap()
        .call_with([py11::list![1, 2, 3]])
        .unwrap();
    let a = source.begin().unwrap();
    let b = source.begin().unwrap();
    assert!(a == b);

    let fresh: Handle = py11::list![1, 2, 3].unwrap().into();
    assert!(fresh.begin().unwrap() != fresh.begin().unwrap());
}

#[test]
fn test_non_iterable_is_type_error() {
    let _py = common::python();

    let err = Handle::int(5).unwrap().begin().unwrap_err();
    assert!(err.is_type());
    assert!(Handle::null().begin().unwrap_err().is_type());
}

#[test]
fn test_mid_iteration_error_surfaces_once() {
    let _py = common::python();

    let ns = common::exec(
        "def gen():\n    yield 1\n    raise RuntimeError('boom')\n",
    );
    let generator = ns.get_item("gen").unwrap().call0().unwrap();

    let mut it = generator.iter().unwrap();
    assert_eq!(it.next().unwrap().unwrap().as_long().unwrap(), 1);
    let err = it.next().unwrap().unwrap_err();
    assert!(err.detail().unwrap_or_default().contains("boom"));
    assert!(it.next().is_none());
    assert!(it == Iter::end());
}

#[test]
fn test_error_during_priming_fails_construction() {
    let _py = common::python();

    let ns = common::exec("def gen():\n    raise ValueError('first')\n    yield 1\n");
    let generator = ns.get_item("gen").unwrap().call0().unwrap();
    assert!(generator.begin().is_err());
}
