//! File object view
//!
//! Anything deriving from `io.IOBase` counts as a file. Every failure at a
//! file site is an Io error, or Eof when the interpreter signals end of
//! input.

use std::ffi::CString;
use std::os::raw::c_int;
use std::ptr;

use pyo3::ffi;

use super::{Str, View};
use crate::error::{clear_pending, fetch_io, Error, ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// An open file object
    File,
    super::Kind::File,
    |h| is_io_base(h)
);

/// `Py_PRINT_RAW`: write `str(obj)` instead of `repr(obj)`.
const PRINT_RAW: c_int = 1;

fn is_io_base(h: &Handle) -> bool {
    unsafe {
        let io = Handle::adopt(ffi::PyImport_ImportModule(c"io".as_ptr()));
        if io.is_null() {
            clear_pending();
            return false;
        }
        let base = Handle::adopt(ffi::PyObject_GetAttrString(io.as_ptr(), c"IOBase".as_ptr()));
        if base.is_null() {
            clear_pending();
            return false;
        }
        match ffi::PyObject_IsInstance(h.as_ptr(), base.as_ptr()) {
            -1 => {
                clear_pending();
                false
            }
            r => r == 1,
        }
    }
}

impl File {
    /// `io.open(path, mode)`.
    ///
    /// # Errors
    /// Io if the file cannot be opened (missing, permissions, bad mode).
    pub fn open(path: &str, mode: &str) -> Result<File> {
        let open = unsafe {
            let io = Handle::adopt_or(ffi::PyImport_ImportModule(c"io".as_ptr()), ErrorKind::Io, "open failed")?;
            Handle::adopt_or(
                ffi::PyObject_GetAttrString(io.as_ptr(), c"open".as_ptr()),
                ErrorKind::Io,
                "open failed",
            )?
        };
        let args = crate::functions::make_tuple([Handle::string(path)?, Handle::string(mode)?])?;
        let p = unsafe { ffi::PyObject_CallObject(open.as_ptr(), args.as_ptr()) };
        if p.is_null() {
            return Err(fetch_io("open failed"));
        }
        tracing::debug!(path, mode, "file opened");
        Ok(File(unsafe { Handle::adopt(p) }))
    }

    /// Read one line of at most `max_chars` characters (`0` for no limit).
    /// Returns an empty string at end of file. Lines from a binary-mode
    /// file are decoded as UTF-8, undecodable bytes escaped as surrogates.
    pub fn read_line(&self, max_chars: usize) -> Result<Str> {
        let limit = c_int::try_from(max_chars).map_err(|_| Error::new(ErrorKind::Io, "line limit too large"))?;
        self.get_line(limit)
    }

    /// Read one line of any length, without its trailing newline.
    ///
    /// # Errors
    /// Eof at end of file.
    pub fn read_line_or_eof(&self) -> Result<Str> {
        self.get_line(-1)
    }

    fn get_line(&self, n: c_int) -> Result<Str> {
        let f = self.checked().map_err(|_| Error::new(ErrorKind::Io, "read failed"))?;
        let p = unsafe { ffi::PyFile_GetLine(f, n) };
        if p.is_null() {
            return Err(fetch_io("read failed"));
        }
        let line = unsafe { Handle::adopt(p) };
        if line.is_str() {
            return Ok(Str::wrap(line));
        }
        if unsafe { ffi::PyBytes_Check(line.as_ptr()) } == 0 {
            return Err(Error::new(ErrorKind::Io, "readline returned neither str nor bytes"));
        }
        Str::decode(&line, "utf-8", "surrogateescape").map_err(|err| {
            let io = Error::new(ErrorKind::Io, "read failed");
            match err.detail() {
                Some(detail) => io.with_detail(detail),
                None => io,
            }
        })
    }

    /// Write `str(value)` when `raw`, else `repr(value)`.
    pub fn write(&self, value: impl IntoHandle, raw: bool) -> Result<()> {
        let value = value.into_handle()?;
        let f = self.checked().map_err(|_| Error::new(ErrorKind::Io, "write failed"))?;
        let flags = if raw { PRINT_RAW } else { 0 };
        if unsafe { ffi::PyFile_WriteObject(value.checked()?, f, flags) } == -1 {
            return Err(fetch_io("write failed"));
        }
        Ok(())
    }

    pub fn write_str(&self, text: &str) -> Result<()> {
        let text = CString::new(text).map_err(|_| Error::value("text contains NUL"))?;
        let f = self.checked().map_err(|_| Error::new(ErrorKind::Io, "write failed"))?;
        if unsafe { ffi::PyFile_WriteString(text.as_ptr(), f) } == -1 {
            return Err(fetch_io("write failed"));
        }
        Ok(())
    }

    /// The `name` attribute: a path, or a descriptor number.
    pub fn name(&self) -> Result<Handle> {
        self.attr("name")
    }

    /// Flush and close. Closing twice is harmless.
    pub fn close(&self) -> Result<()> {
        let close = self.attr("close").map_err(|_| Error::new(ErrorKind::Io, "close failed"))?;
        let p = unsafe { ffi::PyObject_CallObject(close.as_ptr(), ptr::null_mut()) };
        if p.is_null() {
            return Err(fetch_io("close failed"));
        }
        drop(unsafe { Handle::adopt(p) });
        tracing::debug!("file closed");
        Ok(())
    }
}
