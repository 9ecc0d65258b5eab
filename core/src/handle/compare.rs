//! Rich comparison with null ordering
//!
//! Two non-null handles compare through the interpreter's rich comparison.
//! Pointer identity short-circuits first. A null handle sorts before every
//! non-null handle and equals only another null handle.

use std::cmp::Ordering;
use std::os::raw::c_int;

use pyo3::ffi;

use super::Handle;
use crate::error::{fetch, ErrorKind, Result};

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CompareOp {
    fn raw(self) -> c_int {
        match self {
            CompareOp::Lt => ffi::Py_LT,
            CompareOp::Le => ffi::Py_LE,
            CompareOp::Eq => ffi::Py_EQ,
            CompareOp::Ne => ffi::Py_NE,
            CompareOp::Gt => ffi::Py_GT,
            CompareOp::Ge => ffi::Py_GE,
        }
    }

    /// Outcome implied by a known ordering of the operands.
    fn holds_for(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }

    fn failure(self) -> &'static str {
        match self {
            CompareOp::Lt => "op < failed",
            CompareOp::Le => "op <= failed",
            CompareOp::Eq => "op == failed",
            CompareOp::Ne => "op != failed",
            CompareOp::Gt => "op > failed",
            CompareOp::Ge => "op >= failed",
        }
    }
}

impl Handle {
    /// Compare with `op`.
    ///
    /// # Errors
    /// Value if the interpreter's comparison raises.
    pub fn compare(&self, other: &Handle, op: CompareOp) -> Result<bool> {
        let (a, b) = (self.as_ptr(), other.as_ptr());
        if a == b {
            return Ok(op.holds_for(Ordering::Equal));
        }
        if a.is_null() {
            return Ok(op.holds_for(Ordering::Less));
        }
        if b.is_null() {
            return Ok(op.holds_for(Ordering::Greater));
        }
        match unsafe { ffi::PyObject_RichCompareBool(a, b, op.raw()) } {
            -1 => Err(fetch(ErrorKind::Value, op.failure())),
            r => Ok(r == 1),
        }
    }

    pub fn lt(&self, other: &Handle) -> Result<bool> {
        self.compare(other, CompareOp::Lt)
    }

    pub fn le(&self, other: &Handle) -> Result<bool> {
        self.compare(other, CompareOp::Le)
    }

    pub fn eq(&self, other: &Handle) -> Result<bool> {
        self.compare(other, CompareOp::Eq)
    }

    pub fn ne(&self, other: &Handle) -> Result<bool> {
        self.compare(other, CompareOp::Ne)
    }

    pub fn gt(&self, other: &Handle) -> Result<bool> {
        self.compare(other, CompareOp::Gt)
    }

    pub fn ge(&self, other: &Handle) -> Result<bool> {
        self.compare(other, CompareOp::Ge)
    }
}
