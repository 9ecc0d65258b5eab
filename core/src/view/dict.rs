//! `dict` view (the mapping category)

use std::os::raw::c_int;

use pyo3::ffi;

use super::List;
use crate::error::{fetch, fetch_classified, Error, ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// A `dict`
    Dict,
    super::Kind::Mapping,
    |h| unsafe { ffi::PyDict_Check(h.as_ptr()) } != 0
);

impl Dict {
    /// A new empty dict.
    pub fn new() -> Result<Dict> {
        let p = unsafe { ffi::PyDict_New() };
        Ok(Dict(unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating dict failed")? }))
    }

    /// Number of entries.
    pub fn size(&self) -> Result<usize> {
        let r = unsafe { ffi::PyDict_Size(self.checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }

    /// `key in dict`.
    pub fn has(&self, key: impl IntoHandle) -> Result<bool> {
        let key = key.into_handle()?;
        match unsafe { ffi::PyDict_Contains(self.checked()?, key.checked()?) } {
            -1 => Err(fetch(ErrorKind::Type, "has failed")),
            r => Ok(r == 1),
        }
    }

    /// `dict[key]`.
    ///
    /// # Errors
    /// Index if the key is absent, Type if it is unhashable.
    pub fn get(&self, key: impl IntoHandle) -> Result<Handle> {
        let key = key.into_handle()?;
        let p = unsafe { ffi::PyDict_GetItemWithError(self.checked()?, key.checked()?) };
        if p.is_null() {
            if unsafe { ffi::PyErr_Occurred() }.is_null() {
                return Err(Error::index("non-existing item"));
            }
            return Err(fetch_classified(ErrorKind::Value, "get failed"));
        }
        // Borrowed from the dict.
        Ok(unsafe { Handle::borrow(p) })
    }

    pub fn set_item(&self, key: impl IntoHandle, value: impl IntoHandle) -> Result<()> {
        let key = key.into_handle()?;
        let value = value.into_handle()?;
        let r = unsafe { ffi::PyDict_SetItem(self.checked()?, key.checked()?, value.checked()?) };
        status(r, ErrorKind::Value, "set_item failed")
    }

    /// `del dict[key]`.
    ///
    /// # Errors
    /// Index if the key is absent.
    pub fn del_item(&self, key: impl IntoHandle) -> Result<()> {
        let key = key.into_handle()?;
        let r = unsafe { ffi::PyDict_DelItem(self.checked()?, key.checked()?) };
        status(r, ErrorKind::Value, "del_item failed")
    }

    /// Snapshot of `(key, value)` pairs.
    pub fn items(&self) -> Result<List> {
        self.snapshot(ffi::PyDict_Items, "items failed")
    }

    /// Snapshot of the keys.
    pub fn keys(&self) -> Result<List> {
        self.snapshot(ffi::PyDict_Keys, "keys failed")
    }

    /// Snapshot of the values.
    pub fn values(&self) -> Result<List> {
        self.snapshot(ffi::PyDict_Values, "values failed")
    }

    fn snapshot(
        &self,
        f: unsafe extern "C" fn(*mut ffi::PyObject) -> *mut ffi::PyObject,
        message: &'static str,
    ) -> Result<List> {
        let p = self.checked().map_err(|_| Error::value(message))?;
        let p = unsafe { f(p) };
        unsafe { Handle::adopt_or(p, ErrorKind::Value, message) }?.cast_into()
    }

    /// Merge every entry of `other`; its keys overwrite existing ones.
    pub fn update(&self, other: &Dict) -> Result<()> {
        let (Ok(a), Ok(b)) = (self.checked(), other.checked()) else {
            return Err(Error::value("update failed"));
        };
        let r = unsafe { ffi::PyDict_Update(a, b) };
        status(r, ErrorKind::Value, "update failed")
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<()> {
        let p = self.checked().map_err(|_| Error::value("clear failed"))?;
        unsafe { ffi::PyDict_Clear(p) };
        Ok(())
    }

    /// Shallow copy.
    pub fn copy(&self) -> Result<Dict> {
        let p = self.checked().map_err(|_| Error::value("copy failed"))?;
        let p = unsafe { ffi::PyDict_Copy(p) };
        Ok(Dict(unsafe { Handle::adopt_or(p, ErrorKind::Value, "copy failed")? }))
    }
}

fn status(r: c_int, default: ErrorKind, message: &'static str) -> Result<()> {
    if r == -1 {
        return Err(fetch_classified(default, message));
    }
    Ok(())
}
