use crate::object::Object;
use crate::registry::RegistrationError;

/// The static side of an object class.
///
/// `create` builds a default instance and registers its fields. It is
/// what the factory and the reader call for every object of this class.
///
/// # Examples
///
/// ```ignore
/// impl ObjectClass for Item {
///     const CLASS_KEYWORD: &'static str = "Item";
///
///     fn create() -> Result<Self, RegistrationError> {
///         let mut this = Self { handle: ObjectHandle::new(Self::CLASS_KEYWORD), name: Field::new() };
///         this.handle.init_field(&mut this.name, "name")?;
///         Ok(this)
///     }
/// }
/// ```
pub trait ObjectClass: Object + Sized {
    /// The keyword written as the `class` entry of each object.
    const CLASS_KEYWORD: &'static str;

    /// Keywords of the classes this class derives from, nearest first.
    ///
    /// Only used to decide whether two classes are related, e.g. by
    /// `copy_and_cast_by_serialization`.
    const PARENT_CLASS_KEYWORDS: &'static [&'static str] = &[];

    /// Creates a default instance with all fields registered.
    fn create() -> Result<Self, RegistrationError>;
}
