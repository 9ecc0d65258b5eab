//! Shared setup for the integration tests
//!
//! The interpreter is started once per test binary and detached, so each
//! test thread takes the interpreter lock through its own `Gil`.

#![allow(dead_code)]

use std::sync::Once;

use py11::{Gil, Handle, Runtime};

static INIT: Once = Once::new();

/// Start the interpreter if needed and hold its lock for the caller.
pub fn python() -> Gil {
    INIT.call_once(|| {
        Runtime::init(Some("py11-tests"))
            .expect("interpreter should start")
            .detach();
    });
    Gil::acquire().expect("interpreter lock")
}

/// Run a snippet in a fresh namespace and return that namespace.
pub fn exec(source: &str) -> Handle {
    let builtins = py11::import("builtins").unwrap();
    let namespace = py11::make_dict([]).unwrap();
    builtins
        .attr("exec")
        .unwrap()
        .call_with([
            Handle::string(source).unwrap(),
            Handle::from(namespace.clone()),
        ])
        .unwrap();
    namespace.into()
}
