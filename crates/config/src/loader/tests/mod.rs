//! Loader tests. Anything reading or writing process environment holds
//! `env_lock()` and runs `#[serial]`.

use std::sync::Mutex;

pub mod env_tests;
pub mod validation_tests;

pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
