//! Conversions between native values and handles

use std::os::raw::{c_char, c_long};

use pyo3::ffi;

use super::Handle;
use crate::error::{fetch, Error, ErrorKind, Result};

impl Handle {
    /// New foreign integer.
    pub fn int(v: i64) -> Result<Handle> {
        unsafe { Handle::adopt_or(ffi::PyLong_FromLongLong(v), ErrorKind::Value, "int failed") }
    }

    /// New foreign float.
    pub fn float(v: f64) -> Result<Handle> {
        unsafe { Handle::adopt_or(ffi::PyFloat_FromDouble(v), ErrorKind::Value, "float failed") }
    }

    /// New foreign string from UTF-8 text.
    pub fn string(s: &str) -> Result<Handle> {
        let p = unsafe { ffi::PyUnicode_FromStringAndSize(s.as_ptr() as *const c_char, s.len() as ffi::Py_ssize_t) };
        unsafe { Handle::adopt_or(p, ErrorKind::Value, "str failed") }
    }

    /// The `True`/`False` singleton.
    pub fn bool(v: bool) -> Result<Handle> {
        unsafe { Handle::adopt_or(ffi::PyBool_FromLong(v as c_long), ErrorKind::Value, "bool failed") }
    }

    /// The `None` singleton.
    pub fn none() -> Handle {
        unsafe { Handle::borrow(ffi::Py_None()) }
    }

    /// Native integer value.
    ///
    /// -1 is also the failure sentinel, so only the error indicator decides.
    ///
    /// # Errors
    /// Type if the object has no integer value or it does not fit an `i64`.
    pub fn as_long(&self) -> Result<i64> {
        let r = unsafe { ffi::PyLong_AsLongLong(self.checked()?) };
        if r == -1 && unsafe { !ffi::PyErr_Occurred().is_null() } {
            return Err(fetch(ErrorKind::Type, "as_long failed"));
        }
        Ok(r)
    }

    /// Native float value.
    ///
    /// # Errors
    /// Type if the object has no float value.
    pub fn as_double(&self) -> Result<f64> {
        let r = unsafe { ffi::PyFloat_AsDouble(self.checked()?) };
        if r == -1.0 && unsafe { !ffi::PyErr_Occurred().is_null() } {
            return Err(fetch(ErrorKind::Type, "as_double failed"));
        }
        Ok(r)
    }

    /// Text of a `str`, or of `bytes`/`bytearray` holding UTF-8.
    ///
    /// # Errors
    /// Type for any other object or for bytes that are not UTF-8.
    pub fn as_utf8(&self) -> Result<String> {
        let p = self.checked()?;
        unsafe {
            if ffi::PyUnicode_Check(p) != 0 {
                let mut size: ffi::Py_ssize_t = 0;
                let data = ffi::PyUnicode_AsUTF8AndSize(p, &mut size);
                if data.is_null() {
                    return Err(fetch(ErrorKind::Type, "as_utf8 failed"));
                }
                let bytes = std::slice::from_raw_parts(data as *const u8, size as usize);
                return Ok(String::from_utf8_lossy(bytes).into_owned());
            }
            let (data, size) = if ffi::PyBytes_Check(p) != 0 {
                (ffi::PyBytes_AsString(p), ffi::PyBytes_Size(p))
            } else if ffi::PyByteArray_Check(p) != 0 {
                (ffi::PyByteArray_AsString(p), ffi::PyByteArray_Size(p))
            } else {
                return Err(Error::type_error("as_utf8 failed"));
            };
            if data.is_null() || size < 0 {
                return Err(fetch(ErrorKind::Type, "as_utf8 failed"));
            }
            let bytes = std::slice::from_raw_parts(data as *const u8, size as usize);
            String::from_utf8(bytes.to_vec()).map_err(|_| Error::type_error("as_utf8 failed: not UTF-8"))
        }
    }
}

/// Values that can become a handle, consumed in the process.
///
/// Literal macros and every argument slot of the handle API accept these,
/// so native values and handles mix freely:
///
/// ```no_run
/// # fn demo() -> py11::Result<()> {
/// let d = py11::dict! { "a" => 1, "b" => 2.5 }?;
/// d.set_item("c", "text")?;
/// # Ok(())
/// # }
/// ```
pub trait IntoHandle {
    fn into_handle(self) -> Result<Handle>;
}

impl IntoHandle for Handle {
    fn into_handle(self) -> Result<Handle> {
        Ok(self)
    }
}

impl IntoHandle for &Handle {
    fn into_handle(self) -> Result<Handle> {
        Ok(self.clone())
    }
}

impl<T: IntoHandle> IntoHandle for Result<T> {
    fn into_handle(self) -> Result<Handle> {
        self.and_then(IntoHandle::into_handle)
    }
}

impl IntoHandle for i64 {
    fn into_handle(self) -> Result<Handle> {
        Handle::int(self)
    }
}

impl IntoHandle for i32 {
    fn into_handle(self) -> Result<Handle> {
        Handle::int(i64::from(self))
    }
}

impl IntoHandle for u32 {
    fn into_handle(self) -> Result<Handle> {
        Handle::int(i64::from(self))
    }
}

impl IntoHandle for usize {
    fn into_handle(self) -> Result<Handle> {
        let v = i64::try_from(self).map_err(|_| Error::value("integer out of range"))?;
        Handle::int(v)
    }
}

impl IntoHandle for f64 {
    fn into_handle(self) -> Result<Handle> {
        Handle::float(self)
    }
}

impl IntoHandle for bool {
    fn into_handle(self) -> Result<Handle> {
        Handle::bool(self)
    }
}

impl IntoHandle for &str {
    fn into_handle(self) -> Result<Handle> {
        Handle::string(self)
    }
}

impl IntoHandle for String {
    fn into_handle(self) -> Result<Handle> {
        Handle::string(&self)
    }
}

impl IntoHandle for &String {
    fn into_handle(self) -> Result<Handle> {
        Handle::string(self)
    }
}
