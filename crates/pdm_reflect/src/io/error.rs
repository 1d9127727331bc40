use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;
use uuid::Uuid;

use crate::field::{ArrayError, ValidationError};
use crate::io::ObjectPath;
use crate::registry::RegistrationError;

// -----------------------------------------------------------------------------
// InitError

/// Returned by `ObjectIoCapability::init_after_read` to reject a read object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct InitError {
    message: Cow<'static, str>,
}

impl InitError {
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// -----------------------------------------------------------------------------
// ReferenceError

/// A uuid could not be turned into a typed pointer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReferenceError {
    #[error("no object with uuid {uuid} in the document")]
    Dangling { uuid: Uuid },
    #[error("object {uuid} is a `{found}`, expected `{expected}`")]
    TypeMismatch {
        uuid: Uuid,
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ErrorKind

/// Coarse classification of an [`IoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A class failed to register its fields.
    Registration,
    /// The document is malformed: bad syntax, names, headers or uuids.
    Format,
    /// The document is well formed but does not match the classes.
    Schema,
    /// A reference can not be written or resolved.
    Reference,
    /// An array index is out of range.
    Bounds,
    /// A field validator rejected a value.
    Validation,
    /// `init_after_read` rejected an object.
    Finalize,
    /// An object was borrowed while the graph was traversed.
    Borrow,
    /// The underlying stream or file failed.
    Io,
}

// -----------------------------------------------------------------------------
// IoError

/// Errors of reading and writing object graphs.
///
/// Variants raised while walking a document carry the [`ObjectPath`] of
/// the offending object or field.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("invalid element name `{name}` at `{path}`")]
    InvalidElementName { path: ObjectPath, name: String },
    #[error("invalid field keyword `{keyword}` at `{path}`")]
    InvalidKeyword { path: ObjectPath, keyword: String },
    #[error("missing `{entry}` entry at `{path}`")]
    MissingHeader { path: ObjectPath, entry: &'static str },
    #[error("unexpected entry `{entry}` at `{path}`")]
    UnexpectedEntry { path: ObjectPath, entry: String },
    #[error("malformed uuid `{value}` at `{path}`")]
    InvalidUuid { path: ObjectPath, value: String },
    #[error("no class registered for keyword `{class}`")]
    UnknownClass { class: String },
    #[error("an object factory is required to create objects of unknown class")]
    MissingFactory,
    #[error("class mismatch at `{path}`: expected `{expected}`, found `{found}`")]
    ClassMismatch {
        path: ObjectPath,
        expected: String,
        found: String,
    },
    #[error("class `{class}` has no field `{keyword}` (at `{path}`)")]
    UnknownField {
        path: ObjectPath,
        class: &'static str,
        keyword: String,
    },
    #[error("unresolved reference at `{path}`: {source}")]
    Reference {
        path: ObjectPath,
        #[source]
        source: ReferenceError,
    },
    #[error("reference at `{path}` points to object {uuid} outside of the document")]
    ExternalReference { path: ObjectPath, uuid: Uuid },
    #[error("object {uuid} appears more than once in the document (at `{path}`)")]
    DuplicateIdentity { path: ObjectPath, uuid: Uuid },
    #[error("field #{index} of class `{class}` was never registered (at `{path}`)")]
    UninitializedField {
        path: ObjectPath,
        class: &'static str,
        index: usize,
    },
    #[error("invalid value at `{path}`: {source}")]
    Validation {
        path: ObjectPath,
        #[source]
        source: ValidationError,
    },
    #[error("object at `{path}` is borrowed elsewhere")]
    ObjectBorrowed { path: ObjectPath },
    #[error("init_after_read failed at `{path}`: {source}")]
    InitAfterRead {
        path: ObjectPath,
        #[source]
        source: InitError,
    },
    #[error(transparent)]
    Array(#[from] ArrayError),
    /// Syntax or type errors reported by the data format.
    #[error("parse error: {0}")]
    Parse(String),
    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registration(_) | Self::UninitializedField { .. } => ErrorKind::Registration,
            Self::InvalidElementName { .. }
            | Self::InvalidKeyword { .. }
            | Self::MissingHeader { .. }
            | Self::UnexpectedEntry { .. }
            | Self::InvalidUuid { .. }
            | Self::Parse(_) => ErrorKind::Format,
            Self::UnknownClass { .. }
            | Self::MissingFactory
            | Self::ClassMismatch { .. }
            | Self::UnknownField { .. } => ErrorKind::Schema,
            Self::Reference { .. }
            | Self::ExternalReference { .. }
            | Self::DuplicateIdentity { .. } => ErrorKind::Reference,
            Self::Array(_) => ErrorKind::Bounds,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InitAfterRead { .. } => ErrorKind::Finalize,
            Self::ObjectBorrowed { .. } => ErrorKind::Borrow,
            #[cfg(feature = "std")]
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// The location the error was raised at, if any.
    pub fn path(&self) -> Option<&ObjectPath> {
        match self {
            Self::InvalidElementName { path, .. }
            | Self::InvalidKeyword { path, .. }
            | Self::MissingHeader { path, .. }
            | Self::UnexpectedEntry { path, .. }
            | Self::InvalidUuid { path, .. }
            | Self::ClassMismatch { path, .. }
            | Self::UnknownField { path, .. }
            | Self::Reference { path, .. }
            | Self::ExternalReference { path, .. }
            | Self::DuplicateIdentity { path, .. }
            | Self::UninitializedField { path, .. }
            | Self::Validation { path, .. }
            | Self::ObjectBorrowed { path }
            | Self::InitAfterRead { path, .. } => Some(path),
            _ => None,
        }
    }
}
