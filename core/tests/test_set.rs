//! Set view and set algebra.

mod common;

use py11::{Handle, Set};

fn ints(values: &[i64]) -> Set {
    py11::make_set(values.iter().map(|&v| Handle::int(v).unwrap())).unwrap()
}

#[test]
fn test_add_discard_remove() {
    let _py = common::python();

    let s = Set::new(None).unwrap();
    s.add(1).unwrap();
    s.add(1).unwrap();
    s.add(2).unwrap();
    assert_eq!(s.size().unwrap(), 2);

    assert!(s.discard(1).unwrap());
    assert!(!s.discard(1).unwrap());
    assert_eq!(s.size().unwrap(), 1);

    s.remove(2).unwrap();
    assert!(s.remove(2).unwrap_err().is_index());
}

#[test]
fn test_pop_empty_is_index_error() {
    let _py = common::python();

    let s = ints(&[7]);
    assert_eq!(s.pop().unwrap().as_long().unwrap(), 7);
    assert!(s.pop().unwrap_err().is_index());
}

#[test]
fn test_union_bounds_and_membership() {
    let _py = common::python();

    let s = ints(&[1, 2, 3]);
    let s1 = ints(&[3, 4]);
    let u = s.union(&s1).unwrap();
    assert!(u.size().unwrap() <= s.size().unwrap() + s1.size().unwrap());
    assert_eq!(u.size().unwrap(), 4);
    for v in 1..=4 {
        assert!(u.has(v).unwrap());
    }
}

#[test]
fn test_difference_in_place_removes_common() {
    let _py = common::python();

    let mut s = ints(&[1, 2, 3]);
    let s1 = ints(&[2, 3, 9]);
    s.difference_with(&s1).unwrap();
    assert_eq!(s.size().unwrap(), 1);
    assert!(s.has(1).unwrap());
    assert!(!s.has(2).unwrap());
    assert_eq!(s1.size().unwrap(), 3);
}

#[test]
fn test_intersection_and_in_place_forms() {
    let _py = common::python();

    let s = ints(&[1, 2, 3]);
    let s1 = ints(&[2, 3, 4]);
    let i = s.intersection(&s1).unwrap();
    assert_eq!(i.size().unwrap(), 2);
    assert_eq!(s.difference(&s1).unwrap().size().unwrap(), 1);

    let mut acc = ints(&[1]);
    acc.union_with(&s1).unwrap();
    assert_eq!(acc.size().unwrap(), 4);
    acc.intersect_with(&s).unwrap();
    assert_eq!(acc.size().unwrap(), 3);
}

#[test]
fn test_extend_from_iterable() {
    let _py = common::python();

    let s = Set::new(None).unwrap();
    s.extend(&py11::list![1, 2, 2, 3].unwrap()).unwrap();
    assert_eq!(s.size().unwrap(), 3);
    assert!(s.extend(&Handle::int(4).unwrap()).unwrap_err().is_type());
}

#[test]
fn test_new_from_iterable() {
    let _py = common::python();

    let source: Handle = py11::tuple!["a", "b", "a"].unwrap().into();
    let s = Set::new(Some(&source)).unwrap();
    assert_eq!(s.size().unwrap(), 2);
    assert!(Set::new(Some(&Handle::int(1).unwrap())).unwrap_err().is_type());
}

#[test]
fn test_unhashable_element() {
    let _py = common::python();

    let s = Set::new(None).unwrap();
    assert!(s.add(py11::list![]).unwrap_err().is_type());
    assert!(py11::set![py11::list![]].unwrap_err().is_value());
}
