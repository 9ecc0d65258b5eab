//! Lifecycle guards, the interpreter lock, sys plumbing and error
//! reporting.

mod common;

use py11::{print_last_error, set_argv, Gil, Runtime, SequenceOps};

#[test]
fn test_double_init_is_refused() {
    let _py = common::python();

    assert!(Runtime::is_active());
    let err = Runtime::init(Some("again")).err().unwrap();
    assert!(err.is_value());
    assert_eq!(err.message(), "runtime already initialized");
    // Still usable afterwards.
    assert!(Runtime::is_active());
    assert!(py11::import("math").is_ok());
}

#[test]
fn test_gil_nests() {
    let _py = common::python();

    let inner = Gil::acquire().unwrap();
    let value = py11::Handle::int(3).unwrap();
    drop(value);
    drop(inner);
    assert!(py11::Handle::int(4).is_ok());
}

#[test]
fn test_other_threads_enter_with_gil() {
    let _py = common::python();
    drop(_py);

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            std::thread::spawn(move || {
                let _gil = Gil::acquire().unwrap();
                py11::Handle::int(i).unwrap().as_long().unwrap() * 2
            })
        })
        .collect();
    let results: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![0, 2, 4, 6]);
}

#[test]
fn test_set_argv_updates_argv_and_path() {
    let _py = common::python();

    let sys = py11::import("sys").unwrap();
    let original_argv = sys.attr("argv").unwrap();
    let path: py11::List = sys.attr("path").unwrap().cast_into().unwrap();
    let path_len = path.size().unwrap();

    set_argv(&["/opt/tools/script.py", "-v"], true).unwrap();
    let argv: py11::List = sys.attr("argv").unwrap().cast_into().unwrap();
    assert_eq!(argv.size().unwrap(), 2);
    assert_eq!(argv.get(1).unwrap().as_utf8().unwrap(), "-v");
    assert_eq!(path.size().unwrap(), path_len + 1);
    assert_eq!(path.get(0).unwrap().as_utf8().unwrap(), "/opt/tools");

    set_argv(&["plain"], false).unwrap();
    assert_eq!(path.size().unwrap(), path_len + 1);

    // Restore.
    py11::MutableSequence::del_item(&path, 0).unwrap();
    sys.set_attr("argv", &original_argv).unwrap();
}

#[test]
fn test_print_last_error_reports_recorded_failure() {
    let _py = common::python();

    let ns = common::exec("def fail():\n    raise KeyError('reported')\n");
    assert!(ns.get_item("fail").unwrap().call0().is_err());

    let sys = py11::import("sys").unwrap();
    let original = sys.attr("stderr").unwrap();
    let capture = py11::import("io").unwrap().attr("StringIO").unwrap().call0().unwrap();
    sys.set_attr("stderr", &capture).unwrap();
    let short = print_last_error(false);
    let long = print_last_error(true);
    sys.set_attr("stderr", &original).unwrap();

    assert!(short.unwrap());
    assert!(long.unwrap());
    let text = capture.call_method("getvalue", [] as [py11::Handle; 0]).unwrap().as_utf8().unwrap();
    assert!(text.starts_with("KeyError: 'reported'\n"));
    assert!(text.contains("Traceback (most recent call last)"));
    assert!(text.contains("in fail"));
}

#[test]
fn test_print_last_error_without_failure_on_thread() {
    // Failures are recorded per thread; a fresh thread has none.
    let reported = std::thread::spawn(|| {
        let _py = common::python();
        print_last_error(true).unwrap()
    })
    .join()
    .unwrap();
    assert!(!reported);
}
