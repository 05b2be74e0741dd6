use thiserror::Error;

/// Errors that abort a construction before any primitive is emitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrushError {
    #[error("insufficient input: {got} points supplied, at least {min} required")]
    InsufficientPoints { got: usize, min: usize },

    #[error("unusable configuration: no leaf callback supplied")]
    MissingLeafFn,

    #[error("unusable configuration: {0}")]
    InvalidConfig(&'static str),
}
