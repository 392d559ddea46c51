//! QA Assistant - AI-generated test cases and bug reports
//!
//! The library wires four pieces together: credential storage,
//! configuration, prompt templating, and the remote completion adapters.
//! The CLI in `main.rs` is a thin shell over these.

pub mod ai;
pub mod config;
pub mod credentials;
pub mod generator;
pub mod prompt;
