//! `tuple` view
//!
//! Tuples are immutable: only the read side of the sequence protocol is
//! implemented.

use pyo3::ffi;

use super::SequenceOps;
use crate::error::{fetch, fetch_lookup, ErrorKind, Result};
use crate::handle::Handle;

view_type!(
    /// A `tuple`
    Tuple,
    super::Kind::Tuple,
    |h| unsafe { ffi::PyTuple_Check(h.as_ptr()) } != 0
);

impl Tuple {
    /// The empty tuple.
    pub fn empty() -> Result<Tuple> {
        let p = unsafe { ffi::PyTuple_New(0) };
        Ok(Tuple(unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating tuple failed")? }))
    }
}

impl SequenceOps for Tuple {
    type Item = Handle;
    type Slice = Tuple;

    fn size(&self) -> Result<usize> {
        let r = unsafe { ffi::PyTuple_Size(self.checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }

    fn get(&self, i: isize) -> Result<Handle> {
        let p = self.checked()?;
        let len = unsafe { ffi::PyTuple_Size(p) };
        let i = if i < 0 { i + len } else { i };
        // PyTuple_GetItem hands back a borrowed reference.
        let item = unsafe { ffi::PyTuple_GetItem(p, i) };
        if item.is_null() {
            return Err(fetch_lookup("non-existing item"));
        }
        Ok(unsafe { Handle::borrow(item) })
    }
}
