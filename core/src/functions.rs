//! Free functions: module import and container literals
//!
//! The `make_*` builders consume their elements: each handle's reference is
//! handed to the new container. The [`tuple!`](crate::tuple),
//! [`list!`](crate::list), [`set!`](crate::set) and [`dict!`](crate::dict)
//! macros convert native values on the way in.

use std::ffi::CString;

use pyo3::ffi;

use crate::error::{fetch, Error, ErrorKind, Result};
use crate::handle::Handle;
use crate::view::{Dict, List, Set, Tuple, View};

/// `import name`.
///
/// # Errors
/// Value if the module cannot be imported.
pub fn import(name: &str) -> Result<Handle> {
    let cname = CString::new(name).map_err(|_| Error::value("module name contains NUL"))?;
    let p = unsafe { ffi::PyImport_ImportModule(cname.as_ptr()) };
    let module = unsafe { Handle::adopt_or(p, ErrorKind::Value, "import failed")? };
    tracing::debug!(module = name, "imported");
    Ok(module)
}

fn element(item: Handle) -> Result<*mut ffi::PyObject> {
    if item.is_null() {
        return Err(Error::value("null element"));
    }
    Ok(item.into_raw())
}

fn collect<I: IntoIterator<Item = Handle>>(items: I) -> Result<Vec<Handle>> {
    let items: Vec<Handle> = items.into_iter().collect();
    if items.iter().any(Handle::is_null) {
        return Err(Error::value("null element"));
    }
    Ok(items)
}

/// Tuple of the given handles, in order.
pub fn make_tuple<I: IntoIterator<Item = Handle>>(items: I) -> Result<Tuple> {
    let items = collect(items)?;
    let p = unsafe { ffi::PyTuple_New(items.len() as ffi::Py_ssize_t) };
    let tuple = unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating tuple failed")? };
    for (i, item) in items.into_iter().enumerate() {
        // Steals the element's reference.
        if unsafe { ffi::PyTuple_SetItem(tuple.as_ptr(), i as ffi::Py_ssize_t, element(item)?) } != 0 {
            return Err(fetch(ErrorKind::Value, "creating tuple failed"));
        }
    }
    Ok(Tuple::wrap(tuple))
}

/// List of the given handles, in order.
pub fn make_list<I: IntoIterator<Item = Handle>>(items: I) -> Result<List> {
    let items = collect(items)?;
    let p = unsafe { ffi::PyList_New(items.len() as ffi::Py_ssize_t) };
    let list = unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating list failed")? };
    for (i, item) in items.into_iter().enumerate() {
        if unsafe { ffi::PyList_SetItem(list.as_ptr(), i as ffi::Py_ssize_t, element(item)?) } != 0 {
            return Err(fetch(ErrorKind::Value, "creating list failed"));
        }
    }
    Ok(List::wrap(list))
}

/// Set of the given handles; duplicates collapse.
pub fn make_set<I: IntoIterator<Item = Handle>>(items: I) -> Result<Set> {
    let items = collect(items)?;
    let p = unsafe { ffi::PySet_New(std::ptr::null_mut()) };
    let set = unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating set failed")? };
    for item in &items {
        if unsafe { ffi::PySet_Add(set.as_ptr(), item.as_ptr()) } != 0 {
            return Err(fetch(ErrorKind::Value, "bad set element"));
        }
    }
    Ok(Set::wrap(set))
}

/// Dict of the given pairs; a later key overwrites an earlier one.
pub fn make_dict<I: IntoIterator<Item = (Handle, Handle)>>(pairs: I) -> Result<Dict> {
    let p = unsafe { ffi::PyDict_New() };
    let dict = unsafe { Handle::adopt_or(p, ErrorKind::Value, "creating dict failed")? };
    for (key, value) in pairs {
        if key.is_null() || value.is_null() {
            return Err(Error::value("null element"));
        }
        if unsafe { ffi::PyDict_SetItem(dict.as_ptr(), key.as_ptr(), value.as_ptr()) } != 0 {
            return Err(fetch(ErrorKind::Value, "bad key/value"));
        }
    }
    Ok(Dict::wrap(dict))
}

// Targets of the literal macros. Conversions are evaluated first, then the
// first failure (if any) is returned.

#[doc(hidden)]
pub fn tuple_of<const N: usize>(items: [Result<Handle>; N]) -> Result<Tuple> {
    make_tuple(items.into_iter().collect::<Result<Vec<_>>>()?)
}

#[doc(hidden)]
pub fn list_of<const N: usize>(items: [Result<Handle>; N]) -> Result<List> {
    make_list(items.into_iter().collect::<Result<Vec<_>>>()?)
}

#[doc(hidden)]
pub fn set_of<const N: usize>(items: [Result<Handle>; N]) -> Result<Set> {
    make_set(items.into_iter().collect::<Result<Vec<_>>>()?)
}

#[doc(hidden)]
pub fn dict_of<const N: usize>(pairs: [(Result<Handle>, Result<Handle>); N]) -> Result<Dict> {
    let pairs = pairs
        .into_iter()
        .map(|(k, v)| -> Result<(Handle, Handle)> { Ok((k?, v?)) })
        .collect::<Result<Vec<_>>>()?;
    make_dict(pairs)
}

/// Tuple literal: `tuple!["abc", 2, handle]`.
#[macro_export]
macro_rules! tuple {
    ($($x:expr),* $(,)?) => {
        $crate::functions::tuple_of([$($crate::IntoHandle::into_handle($x)),*])
    };
}

/// List literal: `list![1, 2, 3]`.
#[macro_export]
macro_rules! list {
    ($($x:expr),* $(,)?) => {
        $crate::functions::list_of([$($crate::IntoHandle::into_handle($x)),*])
    };
}

/// Set literal: `set![1, 2, 3]`.
#[macro_export]
macro_rules! set {
    ($($x:expr),* $(,)?) => {
        $crate::functions::set_of([$($crate::IntoHandle::into_handle($x)),*])
    };
}

/// Dict literal: `dict!{"a" => 1, "b" => 2}`.
#[macro_export]
macro_rules! dict {
    ($($k:expr => $v:expr),* $(,)?) => {
        $crate::functions::dict_of([$(($crate::IntoHandle::into_handle($k), $crate::IntoHandle::into_handle($v))),*])
    };
}
