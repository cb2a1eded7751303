use steward_core::{DuplicateInstance, Label};

use crate::{ErrorHandler, ErrorSink, HookInstallError};

fn label() -> Label {
    "com.test.errors".parse().unwrap()
}

#[test]
fn test_install_once() {
    let handler = ErrorHandler::new(label()).with_write_to_stderr(false);
    handler.install().unwrap();
    assert_eq!(label(), ErrorHandler::installed().unwrap().label);

    let other: Label = "com.test.other".parse().unwrap();
    let second = ErrorHandler::new(other).with_write_to_stderr(false).install();
    assert!(matches!(
        second,
        Err(HookInstallError::AlreadyInstalled(installed)) if installed == label()
    ));
}

#[test]
fn test_sink_keeps_source() {
    let sink = ErrorSink::new(DuplicateInstance { attempt: 2 });
    assert_eq!(
        DuplicateInstance { attempt: 2 }.to_string(),
        sink.report().to_string()
    );

    let boxed: steward_core::BoxedError = "boxed failure".into();
    let sink = ErrorSink::from_error(boxed);
    assert_eq!("boxed failure", sink.report().to_string());
}
