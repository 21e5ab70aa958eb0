//! Testing utilities
//!
//! Available to unit tests and, behind the `testing` feature, to the
//! integration tests under `tests/`.

pub mod fixtures;

pub use fixtures::{StubProfileFetcher, TestFixtures};
