use alloc::vec::Vec;
use core::any::Any;

use uuid::Uuid;

use crate::field::FieldHandle;
use crate::io::ObjectIoCapability;
use crate::object::ObjectHandle;
use crate::pointer::{AnyPointer, Pointer};

// -----------------------------------------------------------------------------
// Object

/// A reflective object: an ordered set of keyword-addressable fields.
///
/// Implemented through [`impl_object!`](crate::impl_object), which lists
/// the fields in declaration order. `field_at(i)` must return the field
/// registered `i`-th on the handle.
///
/// Methods that only read the field list are provided, see also the
/// inherent methods on `dyn Object` for typed traversal and downcasting.
pub trait Object: ObjectIoCapability + Any {
    /// The class keyword, equal to `ObjectClass::CLASS_KEYWORD`.
    fn class_keyword(&self) -> &'static str;

    /// Keywords of the parent classes, nearest first.
    fn parent_class_keywords(&self) -> &'static [&'static str];

    fn handle(&self) -> &ObjectHandle;

    fn handle_mut(&mut self) -> &mut ObjectHandle;

    /// Number of declared fields.
    fn field_len(&self) -> usize;

    /// The `index`-th declared field.
    fn field_at(&self, index: usize) -> Option<&dyn FieldHandle>;

    /// The `index`-th declared field, mutably.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn FieldHandle>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Shorthand for `self.handle().uuid()`.
    #[inline]
    fn uuid(&self) -> Uuid {
        self.handle().uuid()
    }

    /// Returns `true` if `keyword` is this class or one of its parents.
    fn matches_class_keyword(&self, keyword: &str) -> bool {
        self.class_keyword() == keyword || self.parent_class_keywords().contains(&keyword)
    }

    /// Finds a field by keyword.
    fn find_field(&self, keyword: &str) -> Option<&dyn FieldHandle> {
        (0..self.field_len())
            .filter_map(|index| self.field_at(index))
            .find(|field| field.keyword() == keyword)
    }

    /// Finds a field by keyword, mutably.
    fn find_field_mut(&mut self, keyword: &str) -> Option<&mut dyn FieldHandle> {
        let index = (0..self.field_len()).find(|&index| {
            self.field_at(index)
                .is_some_and(|field| field.keyword() == keyword)
        })?;
        self.field_at_mut(index)
    }

    /// Direct children, in field order and then element order.
    fn children(&self) -> Vec<AnyPointer> {
        let mut out = Vec::new();
        for index in 0..self.field_len() {
            if let Some(field) = self.field_at(index) {
                field.child_objects(&mut out);
            }
        }
        out
    }

    /// Visits every descendant depth-first, parents before children.
    ///
    /// Descendants that are currently mutably borrowed are skipped together
    /// with their subtree.
    fn visit_descendants(&self, f: &mut dyn FnMut(&AnyPointer, &dyn Object)) {
        for child in self.children() {
            child.with(|object| {
                f(&child, object);
                object.visit_descendants(f);
            });
        }
    }
}

impl dyn Object {
    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &dyn FieldHandle> + '_ {
        (0..self.field_len()).filter_map(|index| self.field_at(index))
    }

    /// Registered field keywords, in registration order.
    #[inline]
    pub fn keywords(&self) -> &[&'static str] {
        self.handle().keywords()
    }

    /// The class keyword followed by its parents, nearest first.
    pub fn class_inheritance(&self) -> Vec<&'static str> {
        let mut stack = Vec::with_capacity(1 + self.parent_class_keywords().len());
        stack.push(self.class_keyword());
        stack.extend_from_slice(self.parent_class_keywords());
        stack
    }

    /// All descendants accepted by `predicate`.
    pub fn matching_descendants(
        &self,
        mut predicate: impl FnMut(&dyn Object) -> bool,
    ) -> Vec<AnyPointer> {
        let mut out = Vec::new();
        self.visit_descendants(&mut |pointer, object| {
            if predicate(object) {
                out.push(pointer.clone());
            }
        });
        out
    }

    /// All descendants of concrete type `T`.
    pub fn descendants_of_type<T: Object>(&self) -> Vec<Pointer<T>> {
        let mut out = Vec::new();
        self.visit_descendants(&mut |pointer, _| {
            if let Some(typed) = pointer.downcast::<T>() {
                out.push(typed);
            }
        });
        out
    }

    /// Finds a descendant by uuid.
    pub fn find_object(&self, uuid: Uuid) -> Option<AnyPointer> {
        let mut found = None;
        self.visit_descendants(&mut |pointer, object| {
            if found.is_none() && object.uuid() == uuid {
                found = Some(pointer.clone());
            }
        });
        found
    }

    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Returns `true` if the declared fields match the keyword registry.
    #[cfg(any(test, all(debug_assertions, feature = "debug")))]
    pub(crate) fn is_registry_consistent(&self) -> bool {
        self.field_len() == self.handle().field_len()
            && self
                .fields()
                .zip(self.keywords())
                .all(|(field, keyword)| field.keyword() == *keyword)
    }
}

/// Compares two objects field by field.
///
/// Classes must match, data fields compare by value, child fields compare
/// their children recursively and pointer fields compare referent uuids.
/// Object uuids themselves are not compared.
pub fn objects_data_equal(a: &dyn Object, b: &dyn Object) -> bool {
    a.class_keyword() == b.class_keyword()
        && a.field_len() == b.field_len()
        && a.fields()
            .zip(b.fields())
            .all(|(x, y)| x.keyword() == y.keyword() && x.is_data_equal(y))
}

// -----------------------------------------------------------------------------
// Tests
