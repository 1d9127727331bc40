use alloc::vec::Vec;

use uuid::Uuid;

use crate::field::{Field, FieldHandle, FieldValue};
use crate::io::is_valid_element_name;
use crate::registry::RegistrationError;

// -----------------------------------------------------------------------------
// ObjectHandle

/// Per-object bookkeeping: class keyword, identity and field registry.
///
/// The registry holds field keywords in registration order, which is the
/// order fields are written in. Keywords are unique within one class.
#[derive(Debug, Clone)]
pub struct ObjectHandle {
    class_keyword: &'static str,
    uuid: Uuid,
    keywords: Vec<&'static str>,
}

impl ObjectHandle {
    /// Creates a handle with a fresh random uuid and an empty registry.
    pub fn new(class_keyword: &'static str) -> Self {
        Self {
            class_keyword,
            uuid: Uuid::new_v4(),
            keywords: Vec::new(),
        }
    }

    #[inline]
    pub fn class_keyword(&self) -> &'static str {
        self.class_keyword
    }

    /// The identity written to documents and used to resolve pointers.
    #[inline]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Overrides the identity, used when an object is read from a document.
    #[inline]
    pub fn set_uuid(&mut self, uuid: Uuid) {
        self.uuid = uuid;
    }

    /// Registered keywords, in registration order.
    #[inline]
    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.keywords.len()
    }

    #[inline]
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| *k == keyword)
    }

    /// Binds `field` to `keyword` and appends it to the registry.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidKeyword`] if `keyword` is not a valid element name.
    /// - [`RegistrationError::DuplicateKeyword`] if another field already uses `keyword`.
    /// - [`RegistrationError::AlreadyBound`] if `field` was registered before.
    pub fn init_field<F: FieldHandle>(
        &mut self,
        field: &mut F,
        keyword: &'static str,
    ) -> Result<(), RegistrationError> {
        let class = self.class_keyword;
        if field.meta().is_bound() {
            return Err(RegistrationError::AlreadyBound {
                class,
                keyword,
                bound: field.keyword(),
            });
        }
        if !is_valid_element_name(keyword) {
            return Err(RegistrationError::InvalidKeyword { class, keyword });
        }
        if self.contains_keyword(keyword) {
            return Err(RegistrationError::DuplicateKeyword { class, keyword });
        }

        field.meta_mut().bind(keyword);
        self.keywords.push(keyword);
        Ok(())
    }

    /// Like [`init_field`](Self::init_field), also setting the default value.
    ///
    /// The field's current value is replaced by `default`.
    pub fn init_field_with_default<T: FieldValue>(
        &mut self,
        field: &mut Field<T>,
        keyword: &'static str,
        default: T,
    ) -> Result<(), RegistrationError> {
        self.init_field(field, keyword)?;
        field.set_default(default);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
