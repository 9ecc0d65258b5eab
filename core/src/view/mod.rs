//! Typed views over handles
//!
//! A view is a [`Handle`] narrowed to one foreign category. Views are thin
//! newtypes: they hold the handle itself, never a second reference, and
//! dereference to [`Handle`] for the general surface.
//!
//! Narrowing goes through [`Handle::cast`], which runs the category
//! predicate while type verification is enabled (the default) and fails with
//! a Type error on mismatch. With verification disabled the cast is
//! unchecked; a mismatched view then fails at first use with whatever the
//! interpreter reports for the operation.
//!
//! Shared capabilities are traits: [`SequenceOps`] for read access to
//! sequences, [`MutableSequence`] for positional writes.

/// Declare a view newtype with its `View`, `Deref`, formatting and
/// `IntoHandle` plumbing.
macro_rules! view_type {
    ($(#[$meta:meta])* $name:ident, $kind:expr, |$h:ident| $matches:expr) => {
        $(#[$meta])*
        #[derive(Clone, Default)]
        pub struct $name(crate::handle::Handle);

        impl crate::view::View for $name {
            const KIND: crate::view::Kind = $kind;

            fn matches($h: &crate::handle::Handle) -> bool {
                $matches
            }

            fn wrap(handle: crate::handle::Handle) -> Self {
                Self(handle)
            }

            fn as_handle(&self) -> &crate::handle::Handle {
                &self.0
            }

            fn into_inner(self) -> crate::handle::Handle {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::handle::Handle;

            fn deref(&self) -> &crate::handle::Handle {
                &self.0
            }
        }

        impl From<$name> for crate::handle::Handle {
            fn from(view: $name) -> Self {
                view.0
            }
        }

        impl TryFrom<crate::handle::Handle> for $name {
            type Error = crate::error::Error;

            fn try_from(handle: crate::handle::Handle) -> crate::error::Result<Self> {
                handle.cast_into()
            }
        }

        impl crate::handle::IntoHandle for $name {
            fn into_handle(self) -> crate::error::Result<crate::handle::Handle> {
                Ok(self.0)
            }
        }

        impl crate::handle::IntoHandle for &$name {
            fn into_handle(self) -> crate::error::Result<crate::handle::Handle> {
                Ok(self.0.clone())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

mod dict;
mod file;
mod list;
mod number;
mod sequence;
mod set;
mod string;
mod tuple;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::handle::Handle;

pub use self::dict::Dict;
pub use self::file::File;
pub use self::list::List;
pub use self::number::Number;
pub use self::sequence::{MutableSequence, Sequence, SequenceOps};
pub use self::set::Set;
pub use self::string::Str;
pub use self::tuple::Tuple;

static VERIFY_TYPES: AtomicBool = AtomicBool::new(true);

/// Enable or disable the category check run by [`Handle::cast`].
pub fn set_type_verification(enabled: bool) {
    VERIFY_TYPES.store(enabled, Ordering::Relaxed);
    tracing::debug!(enabled, "type verification toggled");
}

/// Whether [`Handle::cast`] checks categories.
pub fn type_verification() -> bool {
    VERIFY_TYPES.load(Ordering::Relaxed)
}

/// Foreign category tag of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Any object (the plain handle)
    Any,
    Sequence,
    Mapping,
    Set,
    Number,
    Str,
    Tuple,
    List,
    File,
}

impl Kind {
    pub(crate) fn mismatch_message(self) -> &'static str {
        match self {
            Kind::Any => "object is null",
            Kind::Sequence => "object is not a sequence",
            Kind::Mapping => "object is not a dict",
            Kind::Set => "object is not a set",
            Kind::Number => "object is not a number",
            Kind::Str => "object is not a str",
            Kind::Tuple => "object is not a tuple",
            Kind::List => "object is not a list",
            Kind::File => "object is not a file",
        }
    }
}

/// A handle narrowed to one foreign category
pub trait View: Sized {
    const KIND: Kind;

    /// Category predicate on a non-null handle.
    fn matches(handle: &Handle) -> bool;

    /// Wrap without checking. Prefer [`Handle::cast`].
    fn wrap(handle: Handle) -> Self;

    fn as_handle(&self) -> &Handle;

    fn into_inner(self) -> Handle;
}

impl View for Handle {
    const KIND: Kind = Kind::Any;

    fn matches(_: &Handle) -> bool {
        true
    }

    fn wrap(handle: Handle) -> Self {
        handle
    }

    fn as_handle(&self) -> &Handle {
        self
    }

    fn into_inner(self) -> Handle {
        self
    }
}

/// Run the category check for `V` if verification is on. Null passes.
pub(crate) fn verify<V: View>(handle: &Handle) -> Result<()> {
    if type_verification() && !handle.is_null() && !V::matches(handle) {
        tracing::trace!(kind = ?V::KIND, "view mismatch");
        return Err(Error::type_mismatch(V::KIND));
    }
    Ok(())
}
