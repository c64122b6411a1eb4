//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, repository, cache and pipeline option tests
//! - `loading`: End-to-end loading from CLI arguments and environment

mod helpers;
