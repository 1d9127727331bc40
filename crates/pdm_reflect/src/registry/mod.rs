//! Class registration.
//!
//! - [`RegistrationError`]: failures while an object registers its fields
//!   or while a class is added to a factory.
//! - [`ObjectFactory`]: maps class keywords to constructors, used to
//!   create objects whose concrete type is only known from a document.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod factory;

// -----------------------------------------------------------------------------
// Exports

pub use error::RegistrationError;
pub use factory::ObjectFactory;
