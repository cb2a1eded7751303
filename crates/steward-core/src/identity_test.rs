use std::sync::Arc;
use std::thread;

use crate::{DuplicateInstance, ProcessContext};

#[test]
fn test_second_registration_fails() {
    let context = ProcessContext::new();
    assert!(context.register().is_ok());
    assert_eq!(
        DuplicateInstance { attempt: 2 },
        context.register().unwrap_err()
    );
    assert_eq!(
        DuplicateInstance { attempt: 3 },
        context.register().unwrap_err()
    );
    assert_eq!(3, context.attempts());
}

#[test]
fn test_single_winner_across_threads() {
    let context = Arc::new(ProcessContext::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let context = context.clone();
            thread::spawn(move || context.register().is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(1, winners);
}

#[test]
fn test_global_is_shared() {
    assert!(std::ptr::eq(ProcessContext::global(), ProcessContext::global()));
}
