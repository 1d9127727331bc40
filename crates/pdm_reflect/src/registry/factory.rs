use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use pdm_utils::hash::HashMap;

use crate::io::{IoError, is_valid_element_name};
use crate::object::{Object, ObjectClass};
use crate::registry::RegistrationError;

type Constructor = fn() -> Result<Box<dyn Object>, RegistrationError>;

fn construct<T: ObjectClass>() -> Result<Box<dyn Object>, RegistrationError> {
    Ok(Box::new(T::create()?))
}

struct ClassEntry {
    create: Constructor,
    parents: &'static [&'static str],
}

// -----------------------------------------------------------------------------
// ObjectFactory

/// Creates objects from their class keyword.
///
/// Registration order is kept, [`keywords`](ObjectFactory::keywords)
/// yields classes in the order they were added.
///
/// # Examples
///
/// ```ignore
/// let mut factory = ObjectFactory::new();
/// factory.register::<Item>()?;
///
/// let object = factory.create("Item")?;
/// assert_eq!(object.class_keyword(), "Item");
/// ```
#[derive(Default)]
pub struct ObjectFactory {
    classes: HashMap<&'static str, ClassEntry>,
    order: Vec<&'static str>,
    #[cfg(feature = "auto_register")]
    auto_registered: bool,
}

impl ObjectFactory {
    /// Creates an empty factory.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the constructor of `T` under [`ObjectClass::CLASS_KEYWORD`].
    pub fn register<T: ObjectClass>(&mut self) -> Result<(), RegistrationError> {
        let keyword = T::CLASS_KEYWORD;
        if !is_valid_element_name(keyword) {
            return Err(RegistrationError::InvalidClassKeyword(keyword));
        }
        if self.classes.contains_key(keyword) {
            return Err(RegistrationError::DuplicateClass(keyword));
        }

        self.classes.insert(
            keyword,
            ClassEntry {
                create: construct::<T>,
                parents: T::PARENT_CLASS_KEYWORDS,
            },
        );
        self.order.push(keyword);
        log::debug!("registered class `{keyword}`");
        Ok(())
    }

    /// Returns `true` if a constructor exists for `keyword`.
    #[inline]
    pub fn contains(&self, keyword: &str) -> bool {
        self.classes.contains_key(keyword)
    }

    /// Number of registered classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered class keywords, in registration order.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// The parent class keywords declared by `keyword`, nearest first.
    pub fn parent_keywords(&self, keyword: &str) -> Option<&'static [&'static str]> {
        self.classes.get(keyword).map(|entry| entry.parents)
    }

    /// Creates a default-constructed object of class `keyword`.
    pub fn create(&self, keyword: &str) -> Result<Box<dyn Object>, IoError> {
        let entry = self.classes.get(keyword).ok_or_else(|| IoError::UnknownClass {
            class: keyword.to_string(),
        })?;
        Ok((entry.create)()?)
    }

    /// Registers every class submitted with [`auto_register_object!`].
    ///
    /// Returns `false` if the platform does not support automatic
    /// registration, in which case classes must be registered by hand.
    ///
    /// [`auto_register_object!`]: crate::auto_register_object
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        crate::__macro_exports::auto_register::__register_classes(self);
        self.auto_registered
    }

    #[cfg(feature = "auto_register")]
    #[inline]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::io::ErrorKind;
    use crate::object::ObjectClass;
    use crate::registry::{ObjectFactory, RegistrationError};
    use crate::test_objects::{Broken, Container, DerivedItem, Item};

    #[test]
    fn register_and_create() {
        let mut factory = ObjectFactory::new();
        factory.register::<Item>().unwrap();
        factory.register::<Container>().unwrap();

        assert!(factory.contains("Item"));
        assert!(!factory.contains("Missing"));
        assert_eq!(factory.keywords().collect::<alloc::vec::Vec<_>>(), ["Item", "Container"]);

        let object = factory.create("Container").unwrap();
        assert_eq!(object.class_keyword(), Container::CLASS_KEYWORD);
        assert!(object.downcast_ref::<Container>().is_some());
    }

    #[test]
    fn duplicate_class() {
        let mut factory = ObjectFactory::new();
        factory.register::<Item>().unwrap();
        assert_eq!(
            factory.register::<Item>(),
            Err(RegistrationError::DuplicateClass("Item"))
        );
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn unknown_class() {
        let factory = ObjectFactory::new();
        let err = factory.create("Item").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn failing_constructor() {
        let mut factory = ObjectFactory::new();
        factory.register::<Broken>().unwrap();
        let err = factory.create("Broken").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Registration);
    }

    #[test]
    fn parent_keywords() {
        let mut factory = ObjectFactory::new();
        factory.register::<DerivedItem>().unwrap();
        assert_eq!(factory.parent_keywords("DerivedItem"), Some(&["Item"][..]));
        assert_eq!(factory.parent_keywords("Item"), None);
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register() {
        let mut factory = ObjectFactory::new();
        if factory.auto_register() {
            assert!(factory.contains("Item"));
            assert!(factory.contains("Container"));
        }
    }
}
