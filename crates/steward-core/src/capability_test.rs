use std::sync::Arc;
use std::thread;

use crate::PauseResumeCapability;

#[test]
fn test_defaults_to_false() {
    let capability = PauseResumeCapability::new();
    assert!(!capability.get());
    assert!(!capability.is_latched());
}

#[test]
fn test_latch_once() {
    for accepts in [true, false] {
        let capability = PauseResumeCapability::new();
        assert!(capability.latch(accepts));
        assert_eq!(accepts, capability.get());
        assert!(!capability.latch(!accepts));
        assert_eq!(accepts, capability.get());
        assert!(capability.is_latched());
    }
}

#[test]
fn test_visible_across_threads() {
    let capability = Arc::new(PauseResumeCapability::new());
    let writer = capability.clone();
    thread::spawn(move || writer.latch(true)).join().unwrap();
    assert!(capability.get());
}
