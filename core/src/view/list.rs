//! `list` view

use std::os::raw::c_int;

use pyo3::ffi;

use super::{MutableSequence, SequenceOps, Tuple, View};
use crate::error::{fetch, fetch_classified, ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// A `list`
    List,
    super::Kind::List,
    |h| unsafe { ffi::PyList_Check(h.as_ptr()) } != 0
);

impl List {
    /// A new empty list.
    pub fn new() -> Result<List> {
        let p = unsafe { ffi::PyList_New(0) };
        Ok(List(unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating list failed")? }))
    }

    pub fn append(&self, value: impl IntoHandle) -> Result<()> {
        let value = value.into_handle()?;
        let r = unsafe { ffi::PyList_Append(self.checked()?, value.checked()?) };
        status(r, "append failed")
    }

    /// Insert before position `index` (clamped like `list.insert`).
    pub fn insert(&self, index: isize, value: impl IntoHandle) -> Result<()> {
        let value = value.into_handle()?;
        let r = unsafe { ffi::PyList_Insert(self.checked()?, index, value.checked()?) };
        status(r, "insert failed")
    }

    /// Sort in place with the elements' own ordering.
    ///
    /// # Errors
    /// Type if two elements are not orderable against each other.
    pub fn sort(&self) -> Result<()> {
        let r = unsafe { ffi::PyList_Sort(self.checked()?) };
        status(r, "sort failed")
    }

    /// Reverse in place.
    pub fn reverse(&self) -> Result<()> {
        let r = unsafe { ffi::PyList_Reverse(self.checked()?) };
        status(r, "reverse failed")
    }
}

fn status(r: c_int, message: &'static str) -> Result<()> {
    if r == -1 {
        return Err(fetch_classified(ErrorKind::Runtime, message));
    }
    Ok(())
}

impl SequenceOps for List {
    type Item = Handle;
    type Slice = List;

    fn size(&self) -> Result<usize> {
        let r = unsafe { ffi::PyList_Size(self.checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }

    fn to_tuple(&self) -> Result<Tuple> {
        let p = unsafe { ffi::PyList_AsTuple(self.checked()?) };
        Ok(Tuple::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Type, "to_tuple failed")? }))
    }
}

impl MutableSequence for List {}
