//! Interrupt flag tests.

use ptysim_core::host::Interrupt;

#[test]
fn new_flag_is_clear() {
    assert!(!Interrupt::new().is_raised());
}

#[test]
fn raise_is_visible_through_clones() {
    let interrupt = Interrupt::new();
    let observer = interrupt.clone();
    interrupt.raise();
    assert!(observer.is_raised());
    // Polling never clears the flag.
    assert!(observer.is_raised());
}

#[test]
fn installed_listener_starts_clear() {
    // Delivery is covered by the CLI process tests; raising SIGINT here would trip
    // every listener installed by tests running in parallel.
    let interrupt = Interrupt::install().unwrap();
    assert!(!interrupt.is_raised());
}
