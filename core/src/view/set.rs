//! `set` view
//!
//! Set algebra goes through the number protocol (`&`, `|`, `-`), the same
//! slots the interpreter uses for the operators. In-place forms rebind the
//! view to the result.

use pyo3::ffi;

use crate::error::{fetch, fetch_classified, Error, ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// A `set` or `frozenset`
    Set,
    super::Kind::Set,
    |h| unsafe { ffi::PyAnySet_Check(h.as_ptr()) } != 0
);

type BinaryFn = unsafe extern "C" fn(*mut ffi::PyObject, *mut ffi::PyObject) -> *mut ffi::PyObject;

impl Set {
    /// `set(iterable)`, or an empty set for `None`.
    ///
    /// # Errors
    /// Type if `iterable` is not iterable.
    pub fn new(iterable: Option<&Handle>) -> Result<Set> {
        let source = iterable.map_or(std::ptr::null_mut(), Handle::as_ptr);
        let p = unsafe { ffi::PySet_New(source) };
        Ok(Set(unsafe { Handle::adopt_or(p, ErrorKind::Type, "creating set failed")? }))
    }

    pub fn size(&self) -> Result<usize> {
        let r = unsafe { ffi::PySet_Size(self.checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }

    /// `x in set`.
    pub fn has(&self, x: impl IntoHandle) -> Result<bool> {
        let x = x.into_handle()?;
        match unsafe { ffi::PySet_Contains(self.checked()?, x.checked()?) } {
            -1 => Err(fetch(ErrorKind::Type, "has failed")),
            r => Ok(r == 1),
        }
    }

    pub fn add(&self, x: impl IntoHandle) -> Result<()> {
        let x = x.into_handle()?;
        if unsafe { ffi::PySet_Add(self.checked()?, x.checked()?) } == -1 {
            return Err(fetch_classified(ErrorKind::Value, "add failed"));
        }
        Ok(())
    }

    /// Remove `x` if present. Returns whether it was present.
    pub fn discard(&self, x: impl IntoHandle) -> Result<bool> {
        let x = x.into_handle()?;
        match unsafe { ffi::PySet_Discard(self.checked()?, x.checked()?) } {
            -1 => Err(fetch_classified(ErrorKind::Value, "discard failed")),
            r => Ok(r == 1),
        }
    }

    /// Remove `x`.
    ///
    /// # Errors
    /// Index if `x` is absent.
    pub fn remove(&self, x: impl IntoHandle) -> Result<()> {
        if self.discard(x)? {
            Ok(())
        } else {
            Err(Error::index("remove failed"))
        }
    }

    /// Remove and return an arbitrary element.
    ///
    /// # Errors
    /// Index if the set is empty.
    pub fn pop(&self) -> Result<Handle> {
        let p = unsafe { ffi::PySet_Pop(self.checked()?) };
        unsafe { Handle::adopt_lookup(p, "pop from an empty set") }
    }

    /// Add every element of an arbitrary iterable.
    pub fn extend(&self, iterable: &Handle) -> Result<()> {
        for item in iterable.iter()? {
            self.add(item?)?;
        }
        Ok(())
    }

    /// `self & other`.
    pub fn intersection(&self, other: &Set) -> Result<Set> {
        self.binary(other, ffi::PyNumber_And, "op & failed")
    }

    /// `self | other`.
    pub fn union(&self, other: &Set) -> Result<Set> {
        self.binary(other, ffi::PyNumber_Or, "op | failed")
    }

    /// `self - other`.
    pub fn difference(&self, other: &Set) -> Result<Set> {
        self.binary(other, ffi::PyNumber_Subtract, "op - failed")
    }

    /// `self &= other`.
    pub fn intersect_with(&mut self, other: &Set) -> Result<()> {
        *self = self.binary(other, ffi::PyNumber_InPlaceAnd, "op &= failed")?;
        Ok(())
    }

    /// `self |= other`.
    pub fn union_with(&mut self, other: &Set) -> Result<()> {
        *self = self.binary(other, ffi::PyNumber_InPlaceOr, "op |= failed")?;
        Ok(())
    }

    /// `self -= other`.
    pub fn difference_with(&mut self, other: &Set) -> Result<()> {
        *self = self.binary(other, ffi::PyNumber_InPlaceSubtract, "op -= failed")?;
        Ok(())
    }

    fn binary(&self, other: &Set, f: BinaryFn, message: &'static str) -> Result<Set> {
        let p = unsafe { f(self.checked()?, other.checked()?) };
        Ok(Set(unsafe { Handle::adopt_or(p, ErrorKind::Type, message)? }))
    }
}
