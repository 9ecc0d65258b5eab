//! Interpreter lifecycle and the interpreter lock
//!
//! One interpreter per process. [`Runtime::init`] starts it on the calling
//! thread, which then holds the interpreter lock; [`Runtime::shutdown`] (or
//! dropping the [`Runtime`]) finalizes it. A second `init`, or an `init`
//! after shutdown, is refused with a Value error and touches nothing.
//!
//! Every other operation in this crate assumes the interpreter is running
//! and the calling thread holds the lock. Threads other than the
//! initializing one take it with a [`Gil`] guard, after the owner has
//! released it with [`Runtime::detach`] or inside [`Runtime::allow_threads`].

mod config;
mod sys;

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};

use pyo3::ffi;

use crate::error::{Error, ErrorKind, Result};

pub use config::{ConfigError, RuntimeConfig};
pub use sys::{print_last_error, set_argv};

const UNINIT: u8 = 0;
const ACTIVE: u8 = 1;
const FINALIZED: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNINIT);

/// Owner of the embedded interpreter
///
/// Lives on the thread that initialized it. Dropping it finalizes the
/// interpreter unless it was detached.
pub struct Runtime {
    owned: bool,
    _unsend: PhantomData<*mut ()>,
}

impl Runtime {
    /// Start the interpreter with default options.
    ///
    /// # Errors
    /// Value if the interpreter is already running or was shut down.
    pub fn init(program_name: Option<&str>) -> Result<Runtime> {
        let config = match program_name {
            Some(name) => RuntimeConfig::named(name),
            None => RuntimeConfig::default(),
        };
        Self::with_config(&config)
    }

    /// Start the interpreter with explicit options.
    pub fn with_config(config: &RuntimeConfig) -> Result<Runtime> {
        if let Err(state) = STATE.compare_exchange(UNINIT, ACTIVE, Ordering::AcqRel, Ordering::Acquire) {
            let message = if state == ACTIVE {
                "runtime already initialized"
            } else {
                "runtime was shut down"
            };
            tracing::warn!(message, "init refused");
            return Err(Error::value(message));
        }
        if unsafe { ffi::Py_IsInitialized() } != 0 {
            STATE.store(UNINIT, Ordering::Release);
            tracing::warn!("interpreter started outside this crate");
            return Err(Error::value("runtime initialized elsewhere"));
        }

        let install_signals = if config.install_signal_handlers { 1 } else { 0 };
        unsafe { ffi::Py_InitializeEx(install_signals) };
        let runtime = Runtime {
            owned: true,
            _unsend: PhantomData,
        };

        crate::view::set_type_verification(config.verify_types);
        if let Some(argv) = config.effective_argv() {
            set_argv(argv.as_slice(), config.update_path)?;
        }
        tracing::debug!(program = ?config.program_name, "runtime initialized");
        Ok(runtime)
    }

    /// Whether the interpreter is running.
    pub fn is_active() -> bool {
        STATE.load(Ordering::Acquire) == ACTIVE
    }

    /// Finalize the interpreter. Every handle must be gone by now.
    ///
    /// # Errors
    /// Runtime if finalization reports a failure (e.g. flushing buffered
    /// output); the interpreter is gone either way.
    pub fn shutdown(mut self) -> Result<()> {
        self.owned = false;
        finalize()
    }

    /// Release the interpreter lock and keep the interpreter running for
    /// the rest of the process. Any thread may then enter with a [`Gil`].
    pub fn detach(mut self) {
        self.owned = false;
        // The saved thread state is never restored.
        let _ = unsafe { ffi::PyEval_SaveThread() };
        tracing::debug!("runtime detached");
    }

    /// Run `f` with the interpreter lock released, so other threads can
    /// enter meanwhile. `f` must not touch handles.
    pub fn allow_threads<T>(&self, f: impl FnOnce() -> T) -> T {
        struct Restore(*mut ffi::PyThreadState);

        impl Drop for Restore {
            fn drop(&mut self) {
                unsafe { ffi::PyEval_RestoreThread(self.0) };
            }
        }

        let _restore = Restore(unsafe { ffi::PyEval_SaveThread() });
        f()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if self.owned {
            if let Err(err) = finalize() {
                tracing::warn!(%err, "finalize on drop failed");
            }
        }
    }
}

fn finalize() -> Result<()> {
    STATE.store(FINALIZED, Ordering::Release);
    let r = unsafe { ffi::Py_FinalizeEx() };
    tracing::debug!(status = r, "runtime finalized");
    if r < 0 {
        return Err(Error::new(ErrorKind::Runtime, "finalize failed"));
    }
    Ok(())
}

/// Scoped hold of the interpreter lock
///
/// Nests: a thread that already holds the lock may acquire again.
pub struct Gil {
    state: ffi::PyGILState_STATE,
    _unsend: PhantomData<*mut ()>,
}

impl Gil {
    /// Take the interpreter lock for the current thread, blocking until it
    /// is free.
    ///
    /// # Errors
    /// Value if the interpreter is not running.
    pub fn acquire() -> Result<Gil> {
        if !Runtime::is_active() {
            return Err(Error::value("runtime not initialized"));
        }
        let state = unsafe { ffi::PyGILState_Ensure() };
        Ok(Gil {
            state,
            _unsend: PhantomData,
        })
    }
}

impl Drop for Gil {
    fn drop(&mut self) {
        unsafe { ffi::PyGILState_Release(self.state) };
    }
}
