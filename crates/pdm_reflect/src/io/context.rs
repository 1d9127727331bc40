use alloc::string::{String, ToString};
use core::cell::RefCell;

use pdm_utils::hash::{HashMap, HashSet};
use uuid::Uuid;

use crate::field::FieldHandle;
use crate::io::{IoError, ObjectPath, PathSegment, ReferenceError};
use crate::object::ObjectClass;
use crate::pointer::{AnyPointer, Pointer};

/// Decides which fields take part in a read or write.
///
/// Fields rejected by the selector are skipped as if they were not
/// readable or writable.
pub type FieldSelector<'a> = dyn Fn(&dyn FieldHandle) -> bool + 'a;

// -----------------------------------------------------------------------------
// WriteContext

/// State shared by all serializers while one document is written.
///
/// Serializers only see `&WriteContext`, the path and the first error
/// live in cells.
pub struct WriteContext<'a> {
    document: HashSet<Uuid>,
    selector: Option<&'a FieldSelector<'a>>,
    path: RefCell<ObjectPath>,
    error: RefCell<Option<IoError>>,
}

impl<'a> WriteContext<'a> {
    pub(crate) fn new(document: HashSet<Uuid>, selector: Option<&'a FieldSelector<'a>>) -> Self {
        Self {
            document,
            selector,
            path: RefCell::new(ObjectPath::new()),
            error: RefCell::new(None),
        }
    }

    /// The location currently being written.
    pub fn path(&self) -> ObjectPath {
        self.path.borrow().clone()
    }

    #[inline]
    pub(crate) fn push(&self, segment: PathSegment) {
        self.path.borrow_mut().push(segment);
    }

    #[inline]
    pub(crate) fn pop(&self) {
        self.path.borrow_mut().pop();
    }

    /// Returns `true` if `uuid` names an object written as part of this
    /// document, i.e. a valid reference target.
    #[inline]
    pub fn is_addressable(&self, uuid: Uuid) -> bool {
        self.document.contains(&uuid)
    }

    #[inline]
    pub fn selects(&self, field: &dyn FieldHandle) -> bool {
        self.selector.is_none_or(|select| select(field))
    }

    /// Records `error` and returns a format error carrying its message.
    ///
    /// Only the first recorded error is kept, it is what the write returns.
    pub fn fail<E: serde_core::ser::Error>(&self, error: IoError) -> E {
        let message = error.to_string();
        let mut slot = self.error.borrow_mut();
        if slot.is_none() {
            *slot = Some(error);
        }
        E::custom(message)
    }

    pub(crate) fn into_error(self, message: String) -> IoError {
        self.error
            .into_inner()
            .unwrap_or(IoError::Parse(message))
    }
}

// -----------------------------------------------------------------------------
// ReadPhase

/// The phases of reading a document, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadPhase {
    /// Reading the `class` and `uuid` entries of an object.
    ParsingHeader,
    /// Reading the `fields` entry of an object.
    ReadingFields,
    /// Turning uuids into pointers, after the whole document was parsed.
    ResolvingReferences,
    /// Running `init_after_read`, children first.
    Finalizing,
}

// -----------------------------------------------------------------------------
// IdentityTable

struct Identity {
    pointer: AnyPointer,
    class: &'static str,
}

/// The objects created while reading a document, by uuid.
#[derive(Default)]
pub struct IdentityTable {
    objects: HashMap<Uuid, Identity>,
}

impl IdentityTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn contains(&self, uuid: Uuid) -> bool {
        self.objects.contains_key(&uuid)
    }

    #[inline]
    pub fn get(&self, uuid: Uuid) -> Option<&AnyPointer> {
        self.objects.get(&uuid).map(|identity| &identity.pointer)
    }

    pub(crate) fn insert(&mut self, uuid: Uuid, pointer: AnyPointer, class: &'static str) {
        self.objects.insert(uuid, Identity { pointer, class });
    }

    /// Looks up `uuid` and checks that the object is a `T`.
    pub fn resolve<T: ObjectClass>(&self, uuid: Uuid) -> Result<Pointer<T>, ReferenceError> {
        let identity = self
            .objects
            .get(&uuid)
            .filter(|identity| !identity.pointer.is_null())
            .ok_or(ReferenceError::Dangling { uuid })?;

        identity
            .pointer
            .downcast::<T>()
            .ok_or(ReferenceError::TypeMismatch {
                uuid,
                expected: T::CLASS_KEYWORD,
                found: identity.class,
            })
    }
}

// -----------------------------------------------------------------------------
// ReadContext

/// State of one read, threaded through every deserializer.
pub struct ReadContext<'a> {
    phase: ReadPhase,
    path: ObjectPath,
    identities: IdentityTable,
    seen: HashSet<Uuid>,
    error: Option<IoError>,
    selector: Option<&'a FieldSelector<'a>>,
    ignore_unknown_fields: bool,
    root_class: Option<&'a str>,
}

impl<'a> ReadContext<'a> {
    pub(crate) fn new(
        selector: Option<&'a FieldSelector<'a>>,
        ignore_unknown_fields: bool,
        root_class: Option<&'a str>,
    ) -> Self {
        Self {
            phase: ReadPhase::ParsingHeader,
            path: ObjectPath::new(),
            identities: IdentityTable::default(),
            seen: HashSet::default(),
            error: None,
            selector,
            ignore_unknown_fields,
            root_class,
        }
    }

    #[inline]
    pub fn phase(&self) -> ReadPhase {
        self.phase
    }

    #[inline]
    pub(crate) fn set_phase(&mut self, phase: ReadPhase) {
        log::trace!("read phase {:?} -> {phase:?}", self.phase);
        self.phase = phase;
    }

    /// The location currently being read.
    #[inline]
    pub fn path(&self) -> ObjectPath {
        self.path.clone()
    }

    #[inline]
    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.path.push(segment);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    #[inline]
    pub fn identities(&self) -> &IdentityTable {
        &self.identities
    }

    #[inline]
    pub fn selects(&self, field: &dyn FieldHandle) -> bool {
        self.selector.is_none_or(|select| select(field))
    }

    #[inline]
    pub(crate) fn ignores_unknown_fields(&self) -> bool {
        self.ignore_unknown_fields
    }

    /// The class accepted for the root object in place of its own, used
    /// once by the first header.
    #[inline]
    pub(crate) fn take_root_class(&mut self) -> Option<&'a str> {
        self.root_class.take()
    }

    /// Enters a child object into the identity table.
    pub(crate) fn register<T: ObjectClass>(
        &mut self,
        uuid: Uuid,
        pointer: Pointer<T>,
    ) -> Result<(), IoError> {
        self.mark_seen(uuid)?;
        self.identities.insert(uuid, pointer.to_any(), T::CLASS_KEYWORD);
        Ok(())
    }

    /// Records an identity that can not be referenced, i.e. the root.
    pub(crate) fn mark_seen(&mut self, uuid: Uuid) -> Result<(), IoError> {
        if self.seen.insert(uuid) {
            Ok(())
        } else {
            Err(IoError::DuplicateIdentity {
                path: self.path(),
                uuid,
            })
        }
    }

    /// Parses a uuid in its text form.
    pub fn parse_uuid<E: serde_core::de::Error>(&mut self, text: &str) -> Result<Uuid, E> {
        Uuid::parse_str(text).map_err(|_| {
            let path = self.path();
            self.fail(IoError::InvalidUuid {
                path,
                value: text.to_string(),
            })
        })
    }

    /// Records `error` and returns a format error carrying its message.
    ///
    /// Only the first recorded error is kept, it is what the read returns.
    pub fn fail<E: serde_core::de::Error>(&mut self, error: IoError) -> E {
        let message = error.to_string();
        if self.error.is_none() {
            self.error = Some(error);
        }
        E::custom(message)
    }

    pub(crate) fn take_error(&mut self, message: String) -> IoError {
        self.error.take().unwrap_or(IoError::Parse(message))
    }
}
