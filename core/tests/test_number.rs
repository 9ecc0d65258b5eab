//! Number view arithmetic.

mod common;

use py11::{Handle, Number};

fn num(v: i64) -> Number {
    Handle::int(v).unwrap().cast_into().unwrap()
}

#[test]
fn test_binary_operators() {
    let _py = common::python();

    let a = num(6);
    assert_eq!(a.add(4).unwrap().as_long().unwrap(), 10);
    assert_eq!(a.subtract(4).unwrap().as_long().unwrap(), 2);
    assert_eq!(a.multiply(4).unwrap().as_long().unwrap(), 24);
    assert_eq!(a.and(3).unwrap().as_long().unwrap(), 2);
    assert_eq!(a.or(1).unwrap().as_long().unwrap(), 7);
    assert_eq!(a.as_long().unwrap(), 6);
}

#[test]
fn test_in_place_rebinds_immutable_numbers() {
    let _py = common::python();

    let original = num(5);
    let mut n = original.clone();
    n.add_in_place(1).unwrap();
    assert_eq!(n.as_long().unwrap(), 6);
    assert_eq!(original.as_long().unwrap(), 5);

    n.multiply_in_place(2).unwrap();
    n.subtract_in_place(2).unwrap();
    n.or_in_place(1).unwrap();
    n.and_in_place(7).unwrap();
    assert_eq!(n.as_long().unwrap(), 3);
}

#[test]
fn test_mixed_float_arithmetic() {
    let _py = common::python();

    let half: Number = Handle::float(0.5).unwrap().cast_into().unwrap();
    assert_eq!(half.add(1).unwrap().as_double().unwrap(), 1.5);
}

#[test]
fn test_rejected_operand_is_type_error() {
    let _py = common::python();

    let n = num(1);
    assert!(n.add("x").unwrap_err().is_type());
    assert!(num(1).and(0.5).unwrap_err().is_type());

    let mut m = num(1);
    assert!(m.subtract_in_place("x").unwrap_err().is_type());
    assert_eq!(m.as_long().unwrap(), 1);
}

#[test]
fn test_number_view_rejects_non_numbers() {
    let _py = common::python();

    let err = Handle::string("1").unwrap().cast::<Number>().unwrap_err();
    assert!(err.is_type());
}
