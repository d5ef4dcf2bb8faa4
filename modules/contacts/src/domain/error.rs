use thiserror::Error;

/// Input rejected before any network call. Display strings are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("ERROR: Please enter at least one name.")]
    MissingName,

    #[error("ERROR: Uploaded file can only be of type: png, jpg, gif, or jpeg.")]
    InvalidImageExtension { file_name: Option<String> },

    #[error("ERROR: {field} is too long: {len} characters (max: {max}).")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl DomainError {
    pub fn missing_name() -> Self {
        Self::MissingName
    }

    pub fn invalid_image_extension(file_name: Option<String>) -> Self {
        Self::InvalidImageExtension { file_name }
    }

    pub fn field_too_long(field: &'static str, len: usize, max: usize) -> Self {
        Self::FieldTooLong { field, len, max }
    }
}
