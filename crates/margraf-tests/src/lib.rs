//! Integration test crate for the Margraf workspace; see `tests/`.
