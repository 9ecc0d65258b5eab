//! py11 - Safe handles for an embedded Python interpreter
//!
//! Reference-counted ownership of interpreter objects, typed views over them
//! and translation of interpreter failures into Rust errors.
//!
//! # Architecture
//!
//! - **error**: Error kinds and translation of pending interpreter exceptions
//! - **handle**: The ownership handle, comparisons, native conversions
//! - **iter**: Forward-only iteration over iterables
//! - **view**: Typed views (sequence, list, tuple, str, dict, set, number, file)
//! - **functions**: Module import and container literals
//! - **runtime**: Interpreter lifecycle, the interpreter lock, `sys` plumbing
//!
//! # Critical Invariants
//!
//! 1. A non-null handle owns exactly one reference; it is released exactly once
//! 2. Every interpreter call is checked on return; a pending exception never
//!    outlives the call that raised it
//! 3. Handles stay on the thread holding the interpreter lock (`!Send`)
//!
//! # Example
//!
//! ```no_run
//! use py11::{Runtime, SequenceOps};
//!
//! # fn main() -> py11::Result<()> {
//! let runtime = Runtime::init(Some("demo"))?;
//! let values = py11::list![3, 1, 2]?;
//! values.sort()?;
//! assert_eq!(values.get(0)?.as_long()?, 1);
//! drop(values);
//! runtime.shutdown()
//! # }
//! ```

// Module declarations
pub mod error;
pub mod functions;
pub mod handle;
pub mod iter;
pub mod runtime;
pub mod view;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};
pub use functions::{import, make_dict, make_list, make_set, make_tuple};
pub use handle::{CompareOp, Handle, IntoHandle};
pub use iter::Iter;
pub use runtime::{print_last_error, set_argv, ConfigError, Gil, Runtime, RuntimeConfig};
pub use view::{
    set_type_verification, type_verification, Dict, File, Kind, List, MutableSequence, Number,
    Sequence, SequenceOps, Set, Str, Tuple, View,
};
