//! Error taxonomy for the foreign runtime boundary
//!
//! Every call that crosses into the interpreter is checked at the call site.
//! When the interpreter signals failure, the pending exception is consumed
//! here and turned into exactly one [`Error`] before control returns to the
//! caller. The pending indicator is never left set.
//!
//! # Kinds
//!
//! - **Runtime**: base kind, a foreign operation failed
//! - **Index**: a requested attribute, item or position does not exist
//! - **Type**: a type check or conversion failed, or an object is not
//!   callable/iterable/sliceable as required (includes view mismatches)
//! - **Value**: the call was structurally valid but semantically rejected
//! - **Io** and its specialization **Eof**: file object failures
//!
//! Errors carry a static diagnostic message and, when the interpreter
//! supplied one, a native copy of the exception text. They never own a
//! foreign object. The last failure translated on each thread is kept as
//! native text too, for [`print_last_error`](crate::print_last_error); the
//! exception itself is released as soon as translation ends.

use std::cell::RefCell;
use std::fmt;
use std::ptr;

use pyo3::ffi;
use thiserror::Error;

use crate::handle::Handle;
use crate::view::Kind;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kind, from general to specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Base kind: a foreign operation failed
    Runtime,

    /// Attribute, item or position does not exist
    Index,

    /// Type check, conversion, or protocol support failed
    Type,

    /// Argument or operation semantically rejected
    Value,

    /// File object failure
    Io,

    /// End of file reached where a line was required
    Eof,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Runtime => "runtime error",
            ErrorKind::Index => "index error",
            ErrorKind::Type => "type error",
            ErrorKind::Value => "value error",
            ErrorKind::Io => "io error",
            ErrorKind::Eof => "eof error",
        };
        f.write_str(name)
    }
}

/// A failed operation on the foreign runtime
///
/// # Example
/// ```
/// use py11::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::Index, "non-existing attr");
/// assert!(err.is_index());
/// assert_eq!(err.to_string(), "index error: non-existing attr");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}{}", detail_suffix(.detail))]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
    detail: Option<String>,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(text) => format!(" ({text})"),
        None => String::new(),
    }
}

impl Error {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            detail: None,
        }
    }

    pub fn index(message: &'static str) -> Self {
        Self::new(ErrorKind::Index, message)
    }

    pub fn type_error(message: &'static str) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn value(message: &'static str) -> Self {
        Self::new(ErrorKind::Value, message)
    }

    /// A view was requested over an object of the wrong category.
    pub fn type_mismatch(kind: Kind) -> Self {
        Self::type_error(kind.mismatch_message())
    }

    /// Attach a native description of the underlying failure.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Foreign exception text (`TypeName: message`), when one was pending.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn is_index(&self) -> bool {
        self.kind == ErrorKind::Index
    }

    pub fn is_type(&self) -> bool {
        self.kind == ErrorKind::Type
    }

    pub fn is_value(&self) -> bool {
        self.kind == ErrorKind::Value
    }

    /// True for both `Io` and its `Eof` specialization.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io | ErrorKind::Eof)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == ErrorKind::Eof
    }
}

// ========================================================================
// Translation of the pending foreign exception
// ========================================================================

/// Foreign exception categories that decide the kind at lookup and file sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Lookup,
    Type,
    Eof,
    Os,
    Other,
}

/// The exception fetched off the interpreter, owned until translation ends.
struct Pending {
    ptype: Handle,
    pvalue: Handle,
    ptraceback: Handle,
}

impl Pending {
    /// Take the pending exception, clearing the indicator.
    #[allow(deprecated)]
    fn take() -> Option<Self> {
        unsafe {
            if ffi::PyErr_Occurred().is_null() {
                return None;
            }
            let mut ptype = ptr::null_mut();
            let mut pvalue = ptr::null_mut();
            let mut ptraceback = ptr::null_mut();
            ffi::PyErr_Fetch(&mut ptype, &mut pvalue, &mut ptraceback);
            ffi::PyErr_NormalizeException(&mut ptype, &mut pvalue, &mut ptraceback);
            if !pvalue.is_null() && !ptraceback.is_null() {
                ffi::PyException_SetTraceback(pvalue, ptraceback);
            }
            Some(Self {
                ptype: Handle::adopt(ptype),
                pvalue: Handle::adopt(pvalue),
                ptraceback: Handle::adopt(ptraceback),
            })
        }
    }

    fn matches(&self, exc: *mut ffi::PyObject) -> bool {
        !self.ptype.is_null()
            && unsafe { ffi::PyErr_GivenExceptionMatches(self.ptype.as_ptr(), exc) } != 0
    }

    fn signal(&self) -> Signal {
        unsafe {
            if self.matches(ffi::PyExc_AttributeError) || self.matches(ffi::PyExc_LookupError) {
                Signal::Lookup
            } else if self.matches(ffi::PyExc_TypeError) {
                Signal::Type
            } else if self.matches(ffi::PyExc_EOFError) {
                Signal::Eof
            } else if self.matches(ffi::PyExc_OSError) {
                Signal::Os
            } else {
                Signal::Other
            }
        }
    }

    /// `TypeName: message`, computed with raw calls so a failure here never
    /// re-enters translation.
    fn describe(&self) -> Option<String> {
        let name = unsafe {
            let attr = ffi::PyObject_GetAttrString(self.ptype.as_ptr(), c"__name__".as_ptr());
            let attr = Handle::adopt(attr);
            text_of(&attr)
        }?;
        match text_of(&self.pvalue) {
            Some(message) if !message.is_empty() => Some(format!("{name}: {message}")),
            _ => Some(name),
        }
    }

    /// `traceback.format_exception(...)` joined into one native string.
    /// Raw calls only, as in [`Pending::describe`].
    fn format_traceback(&self) -> Option<String> {
        unsafe {
            let module = Handle::adopt(ffi::PyImport_ImportModule(c"traceback".as_ptr()));
            if module.is_null() {
                ffi::PyErr_Clear();
                return None;
            }
            let format = Handle::adopt(ffi::PyObject_GetAttrString(module.as_ptr(), c"format_exception".as_ptr()));
            let args = Handle::adopt(ffi::PyTuple_New(3));
            if format.is_null() || args.is_null() {
                ffi::PyErr_Clear();
                return None;
            }
            for (i, part) in [&self.ptype, &self.pvalue, &self.ptraceback].into_iter().enumerate() {
                let item = if part.is_null() { ffi::Py_None() } else { part.as_ptr() };
                // SetItem steals the reference.
                ffi::Py_IncRef(item);
                ffi::PyTuple_SetItem(args.as_ptr(), i as ffi::Py_ssize_t, item);
            }
            let lines = Handle::adopt(ffi::PyObject_CallObject(format.as_ptr(), args.as_ptr()));
            let empty = Handle::adopt(ffi::PyUnicode_FromString(c"".as_ptr()));
            if lines.is_null() || empty.is_null() {
                ffi::PyErr_Clear();
                return None;
            }
            let joined = Handle::adopt(ffi::PyUnicode_Join(empty.as_ptr(), lines.as_ptr()));
            if joined.is_null() {
                ffi::PyErr_Clear();
                return None;
            }
            text_of(&joined)
        }
    }
}

/// Native copy of the most recently translated failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LastFailure {
    /// `TypeName: message` line.
    pub(crate) summary: String,
    /// Full formatted traceback, when formatting succeeded.
    pub(crate) traceback: Option<String>,
}

thread_local! {
    static LAST_FAILURE: RefCell<Option<LastFailure>> = const { RefCell::new(None) };
}

/// The last failure translated on this thread, if any.
pub(crate) fn last_failure() -> Option<LastFailure> {
    LAST_FAILURE.with(|slot| slot.borrow().clone())
}

/// `str(obj)` as a native string, swallowing any failure.
fn text_of(obj: &Handle) -> Option<String> {
    if obj.is_null() {
        return None;
    }
    unsafe {
        let text = Handle::adopt(ffi::PyObject_Str(obj.as_ptr()));
        if text.is_null() {
            ffi::PyErr_Clear();
            return None;
        }
        let mut size: ffi::Py_ssize_t = 0;
        let data = ffi::PyUnicode_AsUTF8AndSize(text.as_ptr(), &mut size);
        if data.is_null() {
            ffi::PyErr_Clear();
            return None;
        }
        let bytes = std::slice::from_raw_parts(data as *const u8, size as usize);
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn translate(message: &'static str, classify: impl FnOnce(Option<Signal>) -> ErrorKind) -> Error {
    let pending = Pending::take();
    let kind = classify(pending.as_ref().map(Pending::signal));
    let mut err = Error::new(kind, message);
    if let Some(pending) = pending {
        let detail = pending.describe();
        let failure = LastFailure {
            summary: format!("{}\n", detail.as_deref().unwrap_or(message)),
            traceback: pending.format_traceback(),
        };
        LAST_FAILURE.with(|slot| *slot.borrow_mut() = Some(failure));
        if let Some(detail) = detail {
            err = err.with_detail(detail);
        }
    }
    tracing::debug!(%kind, message, detail = ?err.detail(), "foreign call failed");
    err
}

/// Translate the pending exception into a fixed kind chosen by the call site.
pub(crate) fn fetch(kind: ErrorKind, message: &'static str) -> Error {
    translate(message, |_| kind)
}

/// Translate at an attribute/item site: missing → Index, TypeError → Type,
/// anything else → Value.
pub(crate) fn fetch_lookup(message: &'static str) -> Error {
    translate(message, |signal| match signal {
        Some(Signal::Lookup) => ErrorKind::Index,
        Some(Signal::Type) => ErrorKind::Type,
        _ => ErrorKind::Value,
    })
}

/// Translate with the foreign signal deciding, falling back to `default`.
pub(crate) fn fetch_classified(default: ErrorKind, message: &'static str) -> Error {
    translate(message, |signal| match signal {
        Some(Signal::Lookup) => ErrorKind::Index,
        Some(Signal::Type) => ErrorKind::Type,
        _ => default,
    })
}

/// Translate at a file site: EOFError → Eof, anything else → Io.
pub(crate) fn fetch_io(message: &'static str) -> Error {
    translate(message, |signal| match signal {
        Some(Signal::Eof) => ErrorKind::Eof,
        _ => ErrorKind::Io,
    })
}

/// True when the pending exception is `exc`; leaves the indicator untouched.
pub(crate) fn pending_matches(exc: *mut ffi::PyObject) -> bool {
    unsafe { !ffi::PyErr_Occurred().is_null() && ffi::PyErr_ExceptionMatches(exc) != 0 }
}

/// Drop the pending exception without translating it.
pub(crate) fn clear_pending() {
    unsafe { ffi::PyErr_Clear() };
}
