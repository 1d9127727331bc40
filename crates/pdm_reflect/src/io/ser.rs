use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use pdm_utils::hash::HashSet;
use serde_core::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde_core::{Serialize, Serializer};
use uuid::Uuid;

use crate::field::FieldHandle;
use crate::io::{
    FieldSelector, IoError, ObjectPath, PathSegment, WriteContext, is_valid_element_name,
};
use crate::object::Object;
use crate::pointer::Target;

/// Struct name and entries of a persisted object.
pub(crate) const OBJECT_STRUCT: &str = "Object";
pub(crate) const OBJECT_ENTRIES: &[&str] = &["class", "uuid", "fields"];

/// Collects the uuids of every object written below `root`.
///
/// These are the objects a pointer may refer to in the written document.
/// Children of skipped fields are not written and so not collected. The
/// root itself is only checked for collisions.
pub(crate) fn document_identities(
    root: &dyn Object,
    selector: Option<&FieldSelector<'_>>,
) -> Result<HashSet<Uuid>, IoError> {
    let mut identities = HashSet::default();
    identities.insert(root.uuid());

    let mut path = ObjectPath::new();
    path.push(PathSegment::Object(String::from(root.class_keyword())));
    collect_identities(root, selector, &mut identities, &mut path)?;

    identities.remove(&root.uuid());
    Ok(identities)
}

fn collect_identities(
    object: &dyn Object,
    selector: Option<&FieldSelector<'_>>,
    identities: &mut HashSet<Uuid>,
    path: &mut ObjectPath,
) -> Result<(), IoError> {
    for field in object.fields() {
        if !field.is_io_writable() || !selector.is_none_or(|select| select(field)) {
            continue;
        }

        let mut children = Vec::new();
        field.child_objects(&mut children);
        path.push(PathSegment::Field(field.keyword()));
        for (index, child) in children.iter().enumerate() {
            path.push(PathSegment::Index(index));
            let result = child.with(|child| {
                path.push(PathSegment::Object(String::from(child.class_keyword())));
                let uuid = child.uuid();
                let result = if identities.insert(uuid) {
                    collect_identities(child, selector, identities, path)
                } else {
                    Err(IoError::DuplicateIdentity {
                        path: path.clone(),
                        uuid,
                    })
                };
                path.pop();
                result
            });
            match result {
                Some(result) => result?,
                None => return Err(IoError::ObjectBorrowed { path: path.clone() }),
            }
            path.pop();
        }
        path.pop();
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// ObjectSerializeDriver

/// Writes one object: header entries, then its fields.
pub(crate) struct ObjectSerializeDriver<'a> {
    object: &'a dyn Object,
    ctx: &'a WriteContext<'a>,
}

impl<'a> ObjectSerializeDriver<'a> {
    #[inline]
    pub fn new(object: &'a dyn Object, ctx: &'a WriteContext<'a>) -> Self {
        Self { object, ctx }
    }
}

impl Serialize for ObjectSerializeDriver<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let class = self.object.class_keyword();
        if !is_valid_element_name(class) {
            return Err(self.ctx.fail(IoError::InvalidElementName {
                path: self.ctx.path(),
                name: String::from(class),
            }));
        }

        self.ctx.push(PathSegment::Object(String::from(class)));

        let mut buffer = Uuid::encode_buffer();
        let uuid = self.object.uuid().hyphenated().encode_lower(&mut buffer);

        let mut state = serializer.serialize_struct(OBJECT_STRUCT, OBJECT_ENTRIES.len())?;
        state.serialize_field("class", class)?;
        state.serialize_field("uuid", &*uuid)?;
        state.serialize_field(
            "fields",
            &FieldsSerializer {
                object: self.object,
                ctx: self.ctx,
            },
        )?;
        let ok = state.end()?;

        self.ctx.pop();
        Ok(ok)
    }
}

// -----------------------------------------------------------------------------
// FieldsSerializer

/// Writes the `fields` map of an object in declaration order.
struct FieldsSerializer<'a> {
    object: &'a dyn Object,
    ctx: &'a WriteContext<'a>,
}

impl FieldsSerializer<'_> {
    fn check(&self) -> Result<Vec<&dyn FieldHandle>, IoError> {
        let object = self.object;

        #[cfg(all(debug_assertions, feature = "debug"))]
        debug_assert!(
            object.is_registry_consistent(),
            "fields of `{}` are not declared in registration order",
            object.class_keyword()
        );

        let mut fields = Vec::with_capacity(object.field_len());
        for (index, field) in object.fields().enumerate() {
            let keyword = field.keyword();
            if keyword.is_empty() {
                return Err(IoError::UninitializedField {
                    path: self.ctx.path(),
                    class: object.class_keyword(),
                    index,
                });
            }
            if field.is_io_writable() && self.ctx.selects(field) {
                fields.push(field);
            }
        }
        Ok(fields)
    }
}

impl Serialize for FieldsSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.check().map_err(|e| self.ctx.fail::<S::Error>(e))?;

        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            let keyword = field.keyword();
            self.ctx.push(PathSegment::Field(keyword));
            let value = field.serialize_value(self.ctx);
            map.serialize_entry(keyword, &*value)?;
            self.ctx.pop();
        }
        map.end()
    }
}

// -----------------------------------------------------------------------------
// Child serializers

/// Writes one owned child object.
pub(crate) struct ChildSerializer<'a, T> {
    child: &'a Rc<RefCell<T>>,
    ctx: &'a WriteContext<'a>,
}

impl<'a, T: Object> ChildSerializer<'a, T> {
    #[inline]
    pub fn new(child: &'a Rc<RefCell<T>>, ctx: &'a WriteContext<'a>) -> Self {
        Self { child, ctx }
    }
}

impl<T: Object> Serialize for ChildSerializer<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Ok(child) = self.child.try_borrow() else {
            return Err(self.ctx.fail(IoError::ObjectBorrowed {
                path: self.ctx.path(),
            }));
        };
        ObjectSerializeDriver::new(&*child, self.ctx).serialize(serializer)
    }
}

/// Writes a sequence of owned child objects.
pub(crate) struct ChildrenSerializer<'a, T> {
    children: &'a [Rc<RefCell<T>>],
    ctx: &'a WriteContext<'a>,
}

impl<'a, T: Object> ChildrenSerializer<'a, T> {
    #[inline]
    pub fn new(children: &'a [Rc<RefCell<T>>], ctx: &'a WriteContext<'a>) -> Self {
        Self { children, ctx }
    }
}

impl<T: Object> Serialize for ChildrenSerializer<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.children.len()))?;
        for (index, child) in self.children.iter().enumerate() {
            self.ctx.push(PathSegment::Index(index));
            seq.serialize_element(&ChildSerializer::new(child, self.ctx))?;
            self.ctx.pop();
        }
        seq.end()
    }
}

// -----------------------------------------------------------------------------
// Reference serializers

/// Writes one reference as a uuid string, or `null`.
pub(crate) struct ReferenceSerializer<'a> {
    target: Target,
    ctx: &'a WriteContext<'a>,
}

impl<'a> ReferenceSerializer<'a> {
    #[inline]
    pub fn new(target: Target, ctx: &'a WriteContext<'a>) -> Self {
        Self { target, ctx }
    }
}

impl Serialize for ReferenceSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let uuid = match self.target {
            Target::Null => return serializer.serialize_none(),
            Target::Object(uuid) => uuid,
            Target::Borrowed => {
                return Err(self.ctx.fail(IoError::ObjectBorrowed {
                    path: self.ctx.path(),
                }));
            }
        };
        if !self.ctx.is_addressable(uuid) {
            return Err(self.ctx.fail(IoError::ExternalReference {
                path: self.ctx.path(),
                uuid,
            }));
        }
        let mut buffer = Uuid::encode_buffer();
        serializer.serialize_some(&*uuid.hyphenated().encode_lower(&mut buffer))
    }
}

/// Writes a sequence of references.
pub(crate) struct ReferencesSerializer<'a> {
    targets: Vec<Target>,
    ctx: &'a WriteContext<'a>,
}

impl<'a> ReferencesSerializer<'a> {
    #[inline]
    pub fn new(targets: Vec<Target>, ctx: &'a WriteContext<'a>) -> Self {
        Self { targets, ctx }
    }
}

impl Serialize for ReferencesSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.targets.len()))?;
        for (index, target) in self.targets.iter().enumerate() {
            self.ctx.push(PathSegment::Index(index));
            seq.serialize_element(&ReferenceSerializer::new(*target, self.ctx))?;
            self.ctx.pop();
        }
        seq.end()
    }
}
