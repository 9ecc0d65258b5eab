//! `sys` module plumbing: argv and last-error reporting

use std::path::Path;

use pyo3::ffi;

use crate::error::{fetch, last_failure, ErrorKind, Result};
use crate::functions::{import, make_list};
use crate::handle::Handle;
use crate::view::List;

/// Install `sys.argv`. With `update_path`, the directory of `args[0]` (or
/// `""` when it has none) is prepended to `sys.path`.
pub fn set_argv<S: AsRef<str>>(args: &[S], update_path: bool) -> Result<()> {
    let items = args
        .iter()
        .map(|a| Handle::string(a.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let argv = make_list(items)?;
    if unsafe { ffi::PySys_SetObject(c"argv".as_ptr(), argv.as_ptr()) } < 0 {
        return Err(fetch(ErrorKind::Value, "setting sys.argv failed"));
    }

    if update_path {
        let first = args.first().map_or("", AsRef::as_ref);
        let dir = script_dir(first);
        let p = unsafe { ffi::PySys_GetObject(c"path".as_ptr()) };
        if !p.is_null() {
            // Borrowed from the sys module.
            let path: List = unsafe { Handle::borrow(p) }.cast_into()?;
            path.insert(0, dir.as_str())?;
        }
    }
    tracing::debug!(argc = args.len(), update_path, "sys.argv set");
    Ok(())
}

fn script_dir(argv0: &str) -> String {
    Path::new(argv0)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Print the most recently translated foreign failure on this thread to
/// `sys.stderr`: the full traceback with `include_traceback`, else the
/// `TypeName: message` line.
///
/// Returns `false` when no failure has been recorded. A successful print
/// leaves the record as it was.
pub fn print_last_error(include_traceback: bool) -> Result<bool> {
    let Some(failure) = last_failure() else {
        return Ok(false);
    };
    let text = match failure.traceback {
        Some(traceback) if include_traceback => traceback,
        _ => failure.summary,
    };

    let stderr = import("sys")?.attr("stderr")?;
    stderr.call_method("write", [text.as_str()])?;
    stderr.call_method("flush", [] as [Handle; 0])?;
    Ok(true)
}
