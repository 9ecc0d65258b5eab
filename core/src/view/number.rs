//! Number view

use pyo3::ffi;

use crate::error::{ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// Any object supporting the number protocol
    Number,
    super::Kind::Number,
    |h| unsafe { ffi::PyNumber_Check(h.as_ptr()) } != 0
);

type BinaryFn = unsafe extern "C" fn(*mut ffi::PyObject, *mut ffi::PyObject) -> *mut ffi::PyObject;

macro_rules! binary_ops {
    ($($(#[$meta:meta])* $name:ident, $in_place:ident => $op:ident, $iop:ident, $msg:literal, $imsg:literal;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self, other: impl IntoHandle) -> Result<Number> {
                self.apply(other, ffi::$op, $msg)
            }

            $(#[$meta])*
            ///
            /// In place: rebinds this view to the interpreter's result, which
            /// is a new object for immutable numbers.
            pub fn $in_place(&mut self, other: impl IntoHandle) -> Result<()> {
                *self = self.apply(other, ffi::$iop, $imsg)?;
                Ok(())
            }
        )*
    };
}

impl Number {
    binary_ops! {
        /// `self + other`.
        add, add_in_place => PyNumber_Add, PyNumber_InPlaceAdd, "op + failed", "op += failed";
        /// `self - other`.
        subtract, subtract_in_place => PyNumber_Subtract, PyNumber_InPlaceSubtract, "op - failed", "op -= failed";
        /// `self * other`.
        multiply, multiply_in_place => PyNumber_Multiply, PyNumber_InPlaceMultiply, "op * failed", "op *= failed";
        /// `self & other`.
        and, and_in_place => PyNumber_And, PyNumber_InPlaceAnd, "op & failed", "op &= failed";
        /// `self | other`.
        or, or_in_place => PyNumber_Or, PyNumber_InPlaceOr, "op | failed", "op |= failed";
    }

    fn apply(&self, other: impl IntoHandle, f: BinaryFn, message: &'static str) -> Result<Number> {
        let other = other.into_handle()?;
        let p = unsafe { f(self.checked()?, other.checked()?) };
        Ok(Number(unsafe { Handle::adopt_or(p, ErrorKind::Type, message)? }))
    }
}
