use thiserror::Error;

/// Errors of positional operations on array fields.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArrayError {
    #[error("index {index} is out of bounds for an array of length {len}")]
    OutOfBounds { index: usize, len: usize },
    /// The element is borrowed elsewhere and can not be detached.
    #[error("element at index {index} is in use and can not be detached")]
    InUse { index: usize },
}

#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<(), ArrayError> {
    if index < len {
        Ok(())
    } else {
        Err(ArrayError::OutOfBounds { index, len })
    }
}

/// Like [`check_index`], also accepting `len` as an insertion position.
#[inline]
pub(crate) fn check_position(index: usize, len: usize) -> Result<(), ArrayError> {
    if index <= len {
        Ok(())
    } else {
        Err(ArrayError::OutOfBounds { index, len })
    }
}
