//! Forward-only iteration over foreign iterables
//!
//! [`Iter`] wraps the iterator protocol: it is primed on construction, so
//! [`Iter::current`] is the first value right away, and it moves to a
//! sticky exhausted state when the foreign iterator runs dry. Two iterators
//! compare equal when they share the same foreign iterator or are both
//! exhausted, which makes `handle.begin()? == handle.end()` the emptiness
//! test.
//!
//! `Iter` is also a Rust [`Iterator`] yielding `Result<Handle>`. A failure
//! raised mid-iteration is yielded once; the iterator is exhausted after.

use pyo3::ffi;

use crate::error::{fetch, Error, ErrorKind, Result};
use crate::handle::Handle;

/// Single-pass iterator over a foreign iterable
pub struct Iter {
    it: Handle,
    current: Handle,
    exhausted: bool,
    failed: Option<Error>,
}

impl Iter {
    /// Obtain an iterator from `source` and fetch its first value.
    ///
    /// # Errors
    /// Type if `source` is null or not iterable.
    pub fn new(source: &Handle) -> Result<Iter> {
        let source = source.checked().map_err(|_| Error::type_error("object is not iterable"))?;
        let p = unsafe { ffi::PyObject_GetIter(source) };
        let it = unsafe { Handle::adopt_or(p, ErrorKind::Type, "object is not iterable")? };
        let mut iter = Iter {
            it,
            current: Handle::null(),
            exhausted: false,
            failed: None,
        };
        iter.advance()?;
        Ok(iter)
    }

    /// The exhausted end marker.
    pub fn end() -> Iter {
        Iter {
            it: Handle::null(),
            current: Handle::null(),
            exhausted: true,
            failed: None,
        }
    }

    /// The last fetched value; null once exhausted.
    pub fn current(&self) -> &Handle {
        &self.current
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next value. A no-op once exhausted.
    ///
    /// # Errors
    /// Whatever the foreign iterator raises; the iterator is exhausted
    /// afterwards.
    pub fn advance(&mut self) -> Result<()> {
        if self.exhausted {
            return Ok(());
        }
        let p = unsafe { ffi::PyIter_Next(self.it.as_ptr()) };
        if !p.is_null() {
            self.current = unsafe { Handle::adopt(p) };
            return Ok(());
        }
        self.current.release();
        self.exhausted = true;
        if unsafe { ffi::PyErr_Occurred() }.is_null() {
            return Ok(());
        }
        Err(fetch(ErrorKind::Value, "iteration failed"))
    }
}

impl PartialEq for Iter {
    fn eq(&self, other: &Iter) -> bool {
        (self.exhausted && other.exhausted) || (!self.it.is_null() && self.it.is(&other.it))
    }
}

impl Iterator for Iter {
    type Item = Result<Handle>;

    fn next(&mut self) -> Option<Result<Handle>> {
        if let Some(err) = self.failed.take() {
            return Some(Err(err));
        }
        if self.exhausted {
            return None;
        }
        let value = self.current.take();
        if let Err(err) = self.advance() {
            self.failed = Some(err);
        }
        Some(Ok(value))
    }
}

impl std::fmt::Debug for Iter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("current", &self.current)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
