use thiserror::Error;

pub type OzResult<T> = Result<T, OzError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OzError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Unknown {what}: {value}")]
    Unknown { what: &'static str, value: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

impl OzError {
    pub fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidArg { what: what.into() }
    }
}
