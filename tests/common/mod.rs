//! Integration test common infrastructure.
//!
//! Provides an in-process bot wired over the memory platform and memory
//! store, plus helpers for driving it with platform events.

pub mod bot;

#[allow(unused_imports)]
pub use bot::TestBot;
