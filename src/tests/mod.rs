//! Cross-module kernel tests.
//!
//! - `proptest.rs` - Property-based tests: backend equivalence and the
//!   algebraic laws the incremental updates rely on

mod proptest;
