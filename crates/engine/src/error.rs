//! The module contains the errors the engine can return.
//!
//! An error is the engine's rejection sentinel: the mutation that produced
//! it left the snapshot untouched. Expected bad input never panics.

use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("name must not be blank")]
    BlankName,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
}
