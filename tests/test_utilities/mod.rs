#![allow(dead_code)]

#[cfg(unix)]
pub mod fake_scanner;
pub mod fixtures;
pub mod mocks;
