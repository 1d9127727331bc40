use thiserror::Error;

/// Errors raised while registering fields on an object or classes on a factory.
///
/// These are programming errors: they surface from `ObjectClass::create`
/// and `ObjectFactory::register`, never from the contents of a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    /// Two fields of one class share a keyword.
    #[error("keyword `{keyword}` is already registered on class `{class}`")]
    DuplicateKeyword {
        class: &'static str,
        keyword: &'static str,
    },
    /// The keyword can not be used as an element name in a document.
    #[error("keyword `{keyword}` on class `{class}` is not a valid element name")]
    InvalidKeyword {
        class: &'static str,
        keyword: &'static str,
    },
    /// The field was already registered under another keyword.
    #[error("field `{bound}` of class `{class}` can not be registered again as `{keyword}`")]
    AlreadyBound {
        class: &'static str,
        keyword: &'static str,
        bound: &'static str,
    },
    /// The class keyword can not be used as an element name in a document.
    #[error("class keyword `{0}` is not a valid element name")]
    InvalidClassKeyword(&'static str),
    /// The factory already holds a constructor for this class keyword.
    #[error("class `{0}` is already registered")]
    DuplicateClass(&'static str),
}
