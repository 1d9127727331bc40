use alloc::borrow::Cow;
use alloc::format;
use core::fmt;

use thiserror::Error;

/// A value was rejected by a field validator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: Cow<'static, str>,
}

impl ValidationError {
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
// Validator

/// Checks a value before it is assigned to a [`Field`](crate::field::Field).
///
/// Closures of the form `Fn(&T) -> Result<(), ValidationError>` are validators.
pub trait Validator<T>: 'static {
    fn validate(&self, value: &T) -> Result<(), ValidationError>;
}

impl<T, F> Validator<T> for F
where
    F: Fn(&T) -> Result<(), ValidationError> + 'static,
{
    #[inline]
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        self(value)
    }
}

/// Accepts values in the closed range `min..=max`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeValidator<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd> RangeValidator<T> {
    #[inline]
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + fmt::Debug + 'static> Validator<T> for RangeValidator<T> {
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        if *value < self.min || *value > self.max {
            return Err(ValidationError::new(format!(
                "{value:?} is outside of the range {:?}..={:?}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
