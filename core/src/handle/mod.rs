//! Ownership handle for foreign objects
//!
//! [`Handle`] wraps one `PyObject*` (or null) and mirrors the interpreter's
//! own reference counting:
//!
//! - a non-null handle always holds exactly one counted reference
//! - `clone` increments (aliasing, shared ownership)
//! - a Rust move transfers the reference without touching the count;
//!   [`Handle::take`] does the same while leaving a null handle behind
//! - `drop` (or [`Handle::release`]) decrements, once
//!
//! The two raw construction paths are kept apart on purpose: [`Handle::adopt`]
//! for new references returned by the C API, [`Handle::borrow`] for
//! references owned elsewhere.
//!
//! # Preconditions
//!
//! The runtime must be initialized and the calling thread must hold the
//! interpreter lock (see [`crate::runtime`]). Handles are `!Send` and
//! `!Sync`.

mod compare;
mod convert;

use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::os::raw::c_int;
use std::ptr;

use pyo3::ffi;

use crate::error::{fetch, fetch_lookup, Error, ErrorKind, Result};
use crate::iter::Iter;
use crate::view::{Dict, Str, Tuple, View};

pub use compare::CompareOp;
pub use convert::IntoHandle;

/// Shared-ownership reference to one foreign object
pub struct Handle {
    ptr: *mut ffi::PyObject,
    /// Keeps the handle on the thread that holds the interpreter lock.
    _unsend: PhantomData<*mut ()>,
}

impl Handle {
    /// The null handle.
    pub const fn null() -> Self {
        Self {
            ptr: ptr::null_mut(),
            _unsend: PhantomData,
        }
    }

    /// Wrap a reference the caller already owns (a "new reference").
    ///
    /// # Safety
    /// `ptr` must be null or a valid object pointer whose reference is
    /// transferred to the returned handle.
    pub unsafe fn adopt(ptr: *mut ffi::PyObject) -> Self {
        Self {
            ptr,
            _unsend: PhantomData,
        }
    }

    /// Wrap a reference owned elsewhere (a "borrowed reference"),
    /// incrementing its count.
    ///
    /// # Safety
    /// `ptr` must be null or a valid object pointer.
    pub unsafe fn borrow(ptr: *mut ffi::PyObject) -> Self {
        if !ptr.is_null() {
            ffi::Py_IncRef(ptr);
        }
        Self::adopt(ptr)
    }

    /// Adopt the result of a C API call, translating a null result with a
    /// fixed error kind.
    pub(crate) unsafe fn adopt_or(
        ptr: *mut ffi::PyObject,
        kind: ErrorKind,
        message: &'static str,
    ) -> Result<Self> {
        if ptr.is_null() {
            Err(fetch(kind, message))
        } else {
            Ok(Self::adopt(ptr))
        }
    }

    /// Adopt the result of an attribute/item lookup.
    pub(crate) unsafe fn adopt_lookup(ptr: *mut ffi::PyObject, message: &'static str) -> Result<Self> {
        if ptr.is_null() {
            Err(fetch_lookup(message))
        } else {
            Ok(Self::adopt(ptr))
        }
    }

    /// Raw pointer without any ownership transfer.
    pub fn as_ptr(&self) -> *mut ffi::PyObject {
        self.ptr
    }

    /// Give up ownership: the caller becomes responsible for the reference.
    pub fn into_raw(self) -> *mut ffi::PyObject {
        ManuallyDrop::new(self).ptr
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Pointer for a C API call that must not receive null.
    pub(crate) fn checked(&self) -> Result<*mut ffi::PyObject> {
        if self.ptr.is_null() {
            Err(Error::value("operation on a null handle"))
        } else {
            Ok(self.ptr)
        }
    }

    /// Drop the held reference now. Releasing a null handle is a no-op.
    pub fn release(&mut self) {
        let ptr = std::mem::replace(&mut self.ptr, ptr::null_mut());
        if !ptr.is_null() {
            unsafe { ffi::Py_DecRef(ptr) };
        }
    }

    /// Move the reference out, leaving this handle null.
    pub fn take(&mut self) -> Handle {
        std::mem::take(self)
    }

    /// Rebind to alias `other`. Binding to the pointer already held is a
    /// no-op, so the count never transiently drops.
    pub fn assign(&mut self, other: &Handle) {
        if self.ptr == other.ptr {
            return;
        }
        let next = other.clone();
        self.release();
        self.ptr = next.into_raw();
    }

    /// Current reference count of the object (0 for null). Diagnostic only.
    pub fn refcount(&self) -> isize {
        if self.ptr.is_null() {
            0
        } else {
            unsafe { ffi::Py_REFCNT(self.ptr) }
        }
    }

    /// Pointer identity (`is`).
    pub fn is(&self, other: &Handle) -> bool {
        self.ptr == other.ptr
    }

    // ====================================================================
    // Introspection
    // ====================================================================

    /// `type(obj)`; null for a null handle.
    pub fn type_of(&self) -> Result<Handle> {
        if self.ptr.is_null() {
            return Ok(Handle::null());
        }
        unsafe { Handle::adopt_or(ffi::PyObject_Type(self.ptr), ErrorKind::Type, "type failed") }
    }

    /// `isinstance(obj, class)`.
    pub fn is_instance(&self, class: &Handle) -> Result<bool> {
        let class = match class.checked() {
            Ok(class) => class,
            Err(_) => return Err(Error::type_error("is_instance with null type")),
        };
        let r = unsafe { ffi::PyObject_IsInstance(self.checked()?, class) };
        if r == -1 {
            return Err(fetch(ErrorKind::Value, "is_instance failed"));
        }
        Ok(r == 1)
    }

    pub fn is_callable(&self) -> bool {
        !self.ptr.is_null() && unsafe { ffi::PyCallable_Check(self.ptr) } != 0
    }

    pub fn is_int(&self) -> bool {
        !self.ptr.is_null() && unsafe { ffi::PyLong_Check(self.ptr) } != 0
    }

    pub fn is_float(&self) -> bool {
        !self.ptr.is_null() && unsafe { ffi::PyFloat_Check(self.ptr) } != 0
    }

    pub fn is_str(&self) -> bool {
        !self.ptr.is_null() && unsafe { ffi::PyUnicode_Check(self.ptr) } != 0
    }

    pub fn is_none(&self) -> bool {
        !self.ptr.is_null() && self.ptr == unsafe { ffi::Py_None() }
    }

    /// Truth value; a null handle is false.
    pub fn is_true(&self) -> Result<bool> {
        if self.ptr.is_null() {
            return Ok(false);
        }
        match unsafe { ffi::PyObject_IsTrue(self.ptr) } {
            -1 => Err(fetch(ErrorKind::Value, "truth test failed")),
            r => Ok(r == 1),
        }
    }

    /// `not obj`; a null handle counts as false, so this is true.
    pub fn not(&self) -> Result<bool> {
        Ok(!self.is_true()?)
    }

    pub fn hash(&self) -> Result<isize> {
        let r = unsafe { ffi::PyObject_Hash(self.checked()?) };
        if r == -1 {
            return Err(fetch(ErrorKind::Type, "hash failed"));
        }
        Ok(r)
    }

    pub fn repr(&self) -> Result<Str> {
        let p = unsafe { ffi::PyObject_Repr(self.checked()?) };
        Ok(Str::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Value, "repr failed")? }))
    }

    /// `str(obj)`.
    pub fn to_str(&self) -> Result<Str> {
        let p = unsafe { ffi::PyObject_Str(self.checked()?) };
        Ok(Str::wrap(unsafe { Handle::adopt_or(p, ErrorKind::Value, "str failed")? }))
    }

    /// `dir(obj)`.
    pub fn dir(&self) -> Result<Handle> {
        unsafe { Handle::adopt_or(ffi::PyObject_Dir(self.checked()?), ErrorKind::Value, "dir failed") }
    }

    // ====================================================================
    // Attributes
    // ====================================================================

    pub fn has_attr(&self, name: &str) -> bool {
        let Ok(name) = CString::new(name) else {
            return false;
        };
        !self.ptr.is_null() && unsafe { ffi::PyObject_HasAttrString(self.ptr, name.as_ptr()) } == 1
    }

    /// Look up an attribute by name.
    ///
    /// # Errors
    /// Index if the attribute does not exist.
    pub fn attr(&self, name: &str) -> Result<Handle> {
        let name = attr_name(name)?;
        unsafe {
            Handle::adopt_lookup(
                ffi::PyObject_GetAttrString(self.checked()?, name.as_ptr()),
                "non-existing attr",
            )
        }
    }

    /// Look up an attribute named by a foreign string object.
    pub fn attr_by(&self, name: &Handle) -> Result<Handle> {
        unsafe {
            Handle::adopt_lookup(
                ffi::PyObject_GetAttr(self.checked()?, name.checked()?),
                "non-existing attr",
            )
        }
    }

    pub fn set_attr(&self, name: &str, value: impl IntoHandle) -> Result<()> {
        let name = attr_name(name)?;
        let value = value.into_handle()?;
        let r = unsafe { ffi::PyObject_SetAttrString(self.checked()?, name.as_ptr(), value.checked()?) };
        lookup_status(r, "set_attr failed")
    }

    pub fn del_attr(&self, name: &str) -> Result<()> {
        let name = attr_name(name)?;
        // A null value deletes.
        let r = unsafe { ffi::PyObject_SetAttrString(self.checked()?, name.as_ptr(), ptr::null_mut()) };
        lookup_status(r, "del_attr failed")
    }

    // ====================================================================
    // Items
    // ====================================================================

    /// `obj[key]`. The result is a new handle, not a view into the container.
    pub fn get_item(&self, key: impl IntoHandle) -> Result<Handle> {
        let key = key.into_handle()?;
        unsafe { Handle::adopt_lookup(ffi::PyObject_GetItem(self.checked()?, key.checked()?), "non-existing item") }
    }

    pub fn set_item(&self, key: impl IntoHandle, value: impl IntoHandle) -> Result<()> {
        let key = key.into_handle()?;
        let value = value.into_handle()?;
        let r = unsafe { ffi::PyObject_SetItem(self.checked()?, key.checked()?, value.checked()?) };
        lookup_status(r, "set_item failed")
    }

    pub fn del_item(&self, key: impl IntoHandle) -> Result<()> {
        let key = key.into_handle()?;
        let r = unsafe { ffi::PyObject_DelItem(self.checked()?, key.checked()?) };
        lookup_status(r, "del_item failed")
    }

    /// `len(obj)`.
    pub fn len(&self) -> Result<usize> {
        let r = unsafe { ffi::PyObject_Size(self.checked()?) };
        if r < 0 {
            return Err(fetch(ErrorKind::Type, "len failed"));
        }
        Ok(r as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// `x in obj`.
    pub fn contains(&self, x: impl IntoHandle) -> Result<bool> {
        let x = x.into_handle()?;
        match unsafe { ffi::PySequence_Contains(self.checked()?, x.checked()?) } {
            -1 => Err(fetch(ErrorKind::Type, "has failed")),
            r => Ok(r == 1),
        }
    }

    // ====================================================================
    // Calls
    // ====================================================================

    /// Call with an argument tuple and optional keyword dict.
    ///
    /// # Errors
    /// Type if the object is not callable or the call raises.
    pub fn call(&self, args: &Tuple, kwargs: Option<&Dict>) -> Result<Handle> {
        let kwargs = kwargs.map_or(ptr::null_mut(), |kw| kw.as_ptr());
        let p = unsafe { ffi::PyObject_Call(self.checked()?, args.checked()?, kwargs) };
        unsafe { Handle::adopt_or(p, ErrorKind::Type, "call failed") }
    }

    /// Call with positional values converted on the fly.
    ///
    /// # Example
    /// ```no_run
    /// # fn demo() -> py11::Result<()> {
    /// let math = py11::import("math")?;
    /// let r = math.attr("pow")?.call_with([2, 10])?;
    /// assert_eq!(r.as_double()?, 1024.0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn call_with<I>(&self, args: I) -> Result<Handle>
    where
        I: IntoIterator,
        I::Item: IntoHandle,
    {
        let args = args
            .into_iter()
            .map(IntoHandle::into_handle)
            .collect::<Result<Vec<_>>>()?;
        let args = crate::functions::make_tuple(args)?;
        self.call(&args, None)
    }

    /// Call with no arguments.
    pub fn call0(&self) -> Result<Handle> {
        let p = unsafe { ffi::PyObject_CallObject(self.checked()?, ptr::null_mut()) };
        unsafe { Handle::adopt_or(p, ErrorKind::Type, "call failed") }
    }

    /// `obj.name(*args)`.
    pub fn call_method<I>(&self, name: &str, args: I) -> Result<Handle>
    where
        I: IntoIterator,
        I::Item: IntoHandle,
    {
        self.attr(name)?.call_with(args)
    }

    // ====================================================================
    // Iteration
    // ====================================================================

    /// Fresh primed iterator over this object.
    ///
    /// # Errors
    /// Type if the object is not iterable.
    pub fn begin(&self) -> Result<Iter> {
        Iter::new(self)
    }

    /// The exhausted end marker.
    pub fn end(&self) -> Iter {
        Iter::end()
    }

    /// Same as [`Handle::begin`], named for `for` loops.
    pub fn iter(&self) -> Result<Iter> {
        self.begin()
    }

    // ====================================================================
    // Views
    // ====================================================================

    /// Narrow to a view, aliasing this handle.
    ///
    /// # Errors
    /// Type mismatch when verification is on and the object is not a `V`.
    pub fn cast<V: View>(&self) -> Result<V> {
        crate::view::verify::<V>(self)?;
        Ok(V::wrap(self.clone()))
    }

    /// Narrow to a view, consuming this handle.
    pub fn cast_into<V: View>(self) -> Result<V> {
        crate::view::verify::<V>(&self)?;
        Ok(V::wrap(self))
    }

    /// Runtime tag check for a view, independent of the verification toggle.
    pub fn is_a<V: View>(&self) -> bool {
        !self.ptr.is_null() && V::matches(self)
    }
}

fn attr_name(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| Error::value("attribute name contains NUL"))
}

fn lookup_status(r: c_int, message: &'static str) -> Result<()> {
    if r == -1 {
        Err(fetch_lookup(message))
    } else {
        Ok(())
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::null()
    }
}

impl Clone for Handle {
    fn clone(&self) -> Self {
        unsafe { Handle::borrow(self.ptr) }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ptr.is_null() {
            return f.write_str("<NULL>");
        }
        match self.to_str().and_then(|s| s.as_utf8()) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<unprintable object>"),
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ptr.is_null() {
            return f.write_str("Handle(<NULL>)");
        }
        match self.repr().and_then(|s| s.as_utf8()) {
            Ok(text) => write!(f, "Handle({text})"),
            Err(_) => write!(f, "Handle({:p})", self.ptr),
        }
    }
}
