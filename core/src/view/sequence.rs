//! Sequence protocol shared by `Sequence`, `List`, `Tuple` and `Str`

use std::ops::{Bound, RangeBounds};

use pyo3::ffi;

use super::{List, Tuple, View};
use crate::error::{clear_pending, fetch, fetch_lookup, pending_matches, Error, ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// Any object supporting the sequence protocol
    Sequence,
    super::Kind::Sequence,
    |h| unsafe { ffi::PySequence_Check(h.as_ptr()) } != 0
);

/// Convert a Rust range into `[i, j)` slice bounds; an open end means "to
/// the end".
fn slice_bounds(range: impl RangeBounds<isize>) -> (ffi::Py_ssize_t, ffi::Py_ssize_t) {
    let start = match range.start_bound() {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        // `..=-1` runs through the last element.
        Bound::Included(&-1) => ffi::Py_ssize_t::MAX,
        Bound::Included(&j) => j.saturating_add(1),
        Bound::Excluded(&j) => j,
        Bound::Unbounded => ffi::Py_ssize_t::MAX,
    };
    (start, end)
}

/// Read access through the sequence protocol
///
/// Indices follow the interpreter's rules: negative values count from the
/// end.
pub trait SequenceOps: View {
    /// What indexing yields (a `Str` for strings, a plain handle otherwise).
    type Item: View;

    /// What slicing, concatenation and repetition yield.
    type Slice: View;

    /// `len(seq)`.
    fn size(&self) -> Result<usize> {
        let r = unsafe { ffi::PySequence_Size(self.as_handle().checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }

    /// `x in seq`.
    fn has(&self, x: impl IntoHandle) -> Result<bool> {
        let x = x.into_handle()?;
        match unsafe { ffi::PySequence_Contains(self.as_handle().checked()?, x.checked()?) } {
            -1 => Err(fetch(ErrorKind::Type, "has failed")),
            r => Ok(r == 1),
        }
    }

    /// Position of the first element equal to `x`, or `None`.
    fn find(&self, x: impl IntoHandle) -> Result<Option<usize>> {
        let x = x.into_handle()?;
        let r = unsafe { ffi::PySequence_Index(self.as_handle().checked()?, x.checked()?) };
        if r >= 0 {
            return Ok(Some(r as usize));
        }
        if pending_matches(unsafe { ffi::PyExc_ValueError }) {
            clear_pending();
            return Ok(None);
        }
        Err(fetch(ErrorKind::Type, "find failed"))
    }

    /// Position of the first element equal to `x`.
    ///
    /// # Errors
    /// Index if no element matches.
    fn index(&self, x: impl IntoHandle) -> Result<usize> {
        self.find(x)?.ok_or_else(|| Error::index("index failed"))
    }

    /// `seq[i]`, a new reference.
    fn get(&self, i: isize) -> Result<Self::Item> {
        let p = unsafe { ffi::PySequence_GetItem(self.as_handle().checked()?, i) };
        Ok(Self::Item::wrap(unsafe { Handle::adopt_lookup(p, "non-existing item")? }))
    }

    /// `seq[i:j]`; `sub(2..)` and `sub(..=-1)` slice to the end.
    fn sub(&self, range: impl RangeBounds<isize>) -> Result<Self::Slice> {
        let (i, j) = slice_bounds(range);
        let p = unsafe { ffi::PySequence_GetSlice(self.as_handle().checked()?, i, j) };
        Ok(Self::Slice::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Type, "sub failed")? }))
    }

    /// A new list with the same elements.
    fn to_list(&self) -> Result<List> {
        let p = unsafe { ffi::PySequence_List(self.as_handle().checked()?) };
        Ok(List::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Type, "to_list failed")? }))
    }

    /// A new tuple with the same elements.
    fn to_tuple(&self) -> Result<Tuple> {
        let p = unsafe { ffi::PySequence_Tuple(self.as_handle().checked()?) };
        Ok(Tuple::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Type, "to_tuple failed")? }))
    }

    /// `seq + other`.
    fn concat(&self, other: impl IntoHandle) -> Result<Self::Slice> {
        let other = other.into_handle()?;
        let p = unsafe { ffi::PySequence_Concat(self.as_handle().checked()?, other.checked()?) };
        Ok(Self::Slice::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Type, "op + failed")? }))
    }

    /// `seq * count`.
    fn repeat(&self, count: usize) -> Result<Self::Slice> {
        let count = isize::try_from(count).map_err(|_| Error::value("repeat count out of range"))?;
        let p = unsafe { ffi::PySequence_Repeat(self.as_handle().checked()?, count) };
        Ok(Self::Slice::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Type, "op * failed")? }))
    }
}

/// Positional writes through the sequence protocol
pub trait MutableSequence: SequenceOps {
    /// `seq[i] = value`.
    fn set_item(&self, i: isize, value: impl IntoHandle) -> Result<()> {
        let value = value.into_handle()?;
        let r = unsafe { ffi::PySequence_SetItem(self.as_handle().checked()?, i, value.checked()?) };
        if r == -1 {
            return Err(fetch_lookup("set_item failed"));
        }
        Ok(())
    }

    /// `del seq[i]`.
    fn del_item(&self, i: isize) -> Result<()> {
        let r = unsafe { ffi::PySequence_DelItem(self.as_handle().checked()?, i) };
        if r == -1 {
            return Err(fetch_lookup("del_item failed"));
        }
        Ok(())
    }

    /// `seq += other`, rebinding to whatever the interpreter returns.
    fn concat_in_place(&mut self, other: impl IntoHandle) -> Result<()> {
        let other = other.into_handle()?;
        let p = unsafe { ffi::PySequence_InPlaceConcat(self.as_handle().checked()?, other.checked()?) };
        let result = unsafe { Handle::adopt_or(p, ErrorKind::Type, "op += failed")? };
        *self = Self::wrap(result);
        Ok(())
    }

    /// `seq *= count`.
    fn repeat_in_place(&mut self, count: usize) -> Result<()> {
        let count = isize::try_from(count).map_err(|_| Error::value("repeat count out of range"))?;
        let p = unsafe { ffi::PySequence_InPlaceRepeat(self.as_handle().checked()?, count) };
        let result = unsafe { Handle::adopt_or(p, ErrorKind::Type, "op *= failed")? };
        *self = Self::wrap(result);
        Ok(())
    }
}

impl SequenceOps for Sequence {
    type Item = Handle;
    type Slice = Handle;
}

impl MutableSequence for Sequence {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_bounds_open_end() {
        assert_eq!(slice_bounds(2..), (2, ffi::Py_ssize_t::MAX));
        assert_eq!(slice_bounds(..), (0, ffi::Py_ssize_t::MAX));
    }

    #[test]
    fn test_slice_bounds_inclusive() {
        assert_eq!(slice_bounds(1..=3), (1, 4));
        assert_eq!(slice_bounds(1..3), (1, 3));
        assert_eq!(slice_bounds(-2..), (-2, ffi::Py_ssize_t::MAX));
    }

    #[test]
    fn test_slice_bounds_inclusive_last() {
        assert_eq!(slice_bounds(..=-1), (0, ffi::Py_ssize_t::MAX));
        assert_eq!(slice_bounds(1..=-2), (1, -1));
    }
}
