use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown override label: {0}")]
    UnknownLabel(String),
    #[error("override table has more than one entry for ({country}, {district})")]
    DuplicateOverrideKey { country: String, district: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
