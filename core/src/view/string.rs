//! `str` view
//!
//! Lengths and indices count code points, as the interpreter does.
//! Indexing and slicing yield `Str` again.

use std::ffi::CString;

use pyo3::ffi;

use super::SequenceOps;
use crate::error::{fetch, Error, ErrorKind, Result};
use crate::handle::{Handle, IntoHandle};

view_type!(
    /// A `str`
    Str,
    super::Kind::Str,
    |h| unsafe { ffi::PyUnicode_Check(h.as_ptr()) } != 0
);

impl Str {
    /// New string from UTF-8 text.
    pub fn new(text: &str) -> Result<Str> {
        Ok(Str(Handle::string(text)?))
    }

    /// `self += other`; rebinds to the concatenation.
    ///
    /// # Errors
    /// Type if `other` is not a `str`.
    pub fn push_str(&mut self, other: impl IntoHandle) -> Result<()> {
        let other = other.into_handle()?;
        let p = unsafe { ffi::PyUnicode_Concat(self.checked()?, other.checked()?) };
        self.0 = unsafe { Handle::adopt_or(p, ErrorKind::Type, "op += failed")? };
        Ok(())
    }

    /// `self % args`, with `args` a tuple (or a single value).
    pub fn format(&self, args: impl IntoHandle) -> Result<Str> {
        let args = args.into_handle()?;
        let p = unsafe { ffi::PyUnicode_Format(self.checked()?, args.checked()?) };
        Ok(Str(unsafe { Handle::adopt_or(p, ErrorKind::Type, "op % failed")? }))
    }

    /// `self.encode(encoding, errors)`, yielding `bytes`.
    pub fn encode(&self, encoding: &str, errors: &str) -> Result<Handle> {
        let encoding = codec_arg(encoding)?;
        let errors = codec_arg(errors)?;
        let p = unsafe { ffi::PyUnicode_AsEncodedString(self.checked()?, encoding.as_ptr(), errors.as_ptr()) };
        unsafe { Handle::adopt_or(p, ErrorKind::Value, "encode failed") }
    }

    /// `data.decode(encoding, errors)` for a bytes-like `data`.
    pub fn decode(data: &Handle, encoding: &str, errors: &str) -> Result<Str> {
        let encoding = codec_arg(encoding)?;
        let errors = codec_arg(errors)?;
        let p = unsafe { ffi::PyUnicode_FromEncodedObject(data.checked()?, encoding.as_ptr(), errors.as_ptr()) };
        Ok(Str(unsafe { Handle::adopt_or(p, ErrorKind::Value, "decode failed")? }))
    }
}

fn codec_arg(arg: &str) -> Result<CString> {
    CString::new(arg).map_err(|_| Error::value("codec argument contains NUL"))
}

impl SequenceOps for Str {
    type Item = Str;
    type Slice = Str;

    fn size(&self) -> Result<usize> {
        let r = unsafe { ffi::PyUnicode_GetLength(self.checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }
}
