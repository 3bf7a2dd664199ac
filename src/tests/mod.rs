//! integrated tests
pub mod toolkit;

mod compression;
