//! Testing utilities and mock implementations
//!
//! Mock intent, store and model implementations so the resolution chain can be
//! tested without a Postgres instance or a model API key.

pub mod mocks;

pub use mocks::*;
