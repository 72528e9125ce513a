// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use statebased_types::error::{
    DecodeError, ErrorCode, PolicyError, StateError, TxValidationError, ValidationParameterError,
};
