use thiserror::Error;

/// Errors produced while normalizing or assembling submitted EXIF field values.
///
/// `InvalidFractionFormat` never aborts a save: the write path logs it and
/// leaves the affected field at its previously stored value. The other two
/// are raised before a submission is applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("invalid fraction format: {input:?}")]
    InvalidFractionFormat { input: String },

    #[error("invalid field assignment {input:?}, expected FIELD=VALUE")]
    InvalidAssignment { input: String },

    #[error("unknown field {name:?}")]
    UnknownField { name: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
