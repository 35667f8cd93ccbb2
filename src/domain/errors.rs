use thiserror::Error;

/// Failure kinds of a total-spent run. Details (selector, url, raw text) are
/// attached to the report rather than stored in the variant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorError {
    #[error("Login could not be confirmed")]
    Authentication,
    #[error("A required page or element did not appear")]
    Navigation,
    #[error("A price did not match the expected currency format")]
    Parse,
}

pub type AggregatorResult<T> = error_stack::Result<T, AggregatorError>;
