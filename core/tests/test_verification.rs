//! Unchecked narrowing when type verification is off.
//!
//! Lives in its own test binary: the toggle is process-wide.

mod common;

use py11::{set_type_verification, type_verification, Handle, List, SequenceOps};

#[test]
fn test_str_as_list_depends_on_verification() {
    let _py = common::python();

    let text = Handle::string("abc").unwrap();

    assert!(type_verification());
    let err = text.cast::<List>().unwrap_err();
    assert!(err.is_type());

    set_type_verification(false);
    let unchecked: List = text.cast().unwrap();
    // Read access through the sequence protocol still works on a str.
    assert_eq!(unchecked.get(0).unwrap().as_utf8().unwrap(), "a");
    // A list-only operation fails at first use instead.
    assert!(unchecked.append(1).is_err());

    set_type_verification(true);
    assert!(text.cast::<List>().is_err());
}
