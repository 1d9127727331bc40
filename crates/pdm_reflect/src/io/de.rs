use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;

use serde_core::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_core::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::field::FieldHandle;
use crate::io::ser::{OBJECT_ENTRIES, OBJECT_STRUCT};
use crate::io::{IoError, PathSegment, ReadContext, ReadPhase, is_valid_element_name};
use crate::object::{Object, ObjectClass};
use crate::pointer::Pointer;
use crate::registry::ObjectFactory;

// -----------------------------------------------------------------------------
// Ident

/// A map key read as an identifier.
struct Ident(String);

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdentVisitor;

        impl<'de> Visitor<'de> for IdentVisitor {
            type Value = Ident;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("identifier")
            }

            #[inline]
            fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Ident(value.to_string()))
            }

            #[inline]
            fn visit_string<E: Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(Ident(value))
            }
        }

        deserializer.deserialize_identifier(IdentVisitor)
    }
}

// -----------------------------------------------------------------------------
// Object entries

/// Reads the entries of an object map after `class` may have been consumed.
///
/// `class_seen` is `true` when the caller already read and checked the
/// `class` entry.
fn visit_object_entries<'de, A: MapAccess<'de>>(
    map: &mut A,
    object: &mut dyn Object,
    ctx: &mut ReadContext<'_>,
    mut class_seen: bool,
) -> Result<(), A::Error> {
    while let Some(Ident(key)) = map.next_key::<Ident>()? {
        match key.as_str() {
            "class" if !class_seen => {
                let class = map.next_value::<String>()?;
                check_class::<A::Error>(object, &class, ctx)?;
                class_seen = true;
            }
            "uuid" => {
                let text = map.next_value::<String>()?;
                let uuid: Uuid = ctx.parse_uuid::<A::Error>(&text)?;
                object.handle_mut().set_uuid(uuid);
            }
            "fields" if class_seen => {
                ctx.set_phase(ReadPhase::ReadingFields);
                map.next_value_seed(FieldsSeed {
                    object: &mut *object,
                    ctx: &mut *ctx,
                })?;
            }
            "fields" => {
                let path = ctx.path();
                return Err(ctx.fail(IoError::MissingHeader {
                    path,
                    entry: "class",
                }));
            }
            _ => {
                let path = ctx.path();
                return Err(ctx.fail(IoError::UnexpectedEntry { path, entry: key }));
            }
        }
    }

    if !class_seen {
        let path = ctx.path();
        return Err(ctx.fail(IoError::MissingHeader {
            path,
            entry: "class",
        }));
    }
    Ok(())
}

/// Checks the `class` entry against the object being filled.
fn check_class<E: Error>(
    object: &dyn Object,
    class: &str,
    ctx: &mut ReadContext<'_>,
) -> Result<(), E> {
    if !is_valid_element_name(class) {
        let path = ctx.path();
        return Err(ctx.fail(IoError::InvalidElementName {
            path,
            name: class.to_string(),
        }));
    }

    let expected = object.class_keyword();
    let accepted = ctx.take_root_class();
    if class != expected && accepted != Some(class) {
        let path = ctx.path();
        return Err(ctx.fail(IoError::ClassMismatch {
            path,
            expected: expected.to_string(),
            found: class.to_string(),
        }));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// ObjectVisitor

/// Fills an existing object from an object map.
pub(crate) struct ObjectVisitor<'a, 'c> {
    object: &'a mut dyn Object,
    ctx: &'a mut ReadContext<'c>,
}

impl<'a, 'c> ObjectVisitor<'a, 'c> {
    #[inline]
    pub fn new(object: &'a mut dyn Object, ctx: &'a mut ReadContext<'c>) -> Self {
        Self { object, ctx }
    }

    /// Reads `deserializer` into the object.
    pub fn read<'de, D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_struct(OBJECT_STRUCT, OBJECT_ENTRIES, self)
    }
}

impl<'de> Visitor<'de> for ObjectVisitor<'_, '_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an object of class `{}`", self.object.class_keyword())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        self.ctx.set_phase(ReadPhase::ParsingHeader);
        self.ctx
            .push(PathSegment::Object(String::from(self.object.class_keyword())));
        visit_object_entries(&mut map, self.object, self.ctx, false)?;
        self.ctx.pop();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// UnknownObjectVisitor

/// Creates an object through a factory from the leading `class` entry,
/// then fills it.
pub(crate) struct UnknownObjectVisitor<'a, 'c> {
    factory: &'a ObjectFactory,
    ctx: &'a mut ReadContext<'c>,
}

impl<'a, 'c> UnknownObjectVisitor<'a, 'c> {
    #[inline]
    pub fn new(factory: &'a ObjectFactory, ctx: &'a mut ReadContext<'c>) -> Self {
        Self { factory, ctx }
    }

    pub fn read<'de, D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Box<dyn Object>, D::Error> {
        deserializer.deserialize_struct(OBJECT_STRUCT, OBJECT_ENTRIES, self)
    }
}

impl<'de> Visitor<'de> for UnknownObjectVisitor<'_, '_> {
    type Value = Box<dyn Object>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object starting with a `class` entry")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        self.ctx.set_phase(ReadPhase::ParsingHeader);

        let class = match map.next_key::<Ident>()? {
            Some(Ident(key)) if key == "class" => map.next_value::<String>()?,
            _ => {
                let path = self.ctx.path();
                return Err(self.ctx.fail(IoError::MissingHeader {
                    path,
                    entry: "class",
                }));
            }
        };
        if !is_valid_element_name(&class) {
            let path = self.ctx.path();
            return Err(self.ctx.fail(IoError::InvalidElementName { path, name: class }));
        }

        let mut object = self
            .factory
            .create(&class)
            .map_err(|e| self.ctx.fail::<A::Error>(e))?;

        self.ctx.push(PathSegment::Object(class));
        visit_object_entries(&mut map, &mut *object, self.ctx, true)?;
        self.ctx.pop();
        Ok(object)
    }
}

// -----------------------------------------------------------------------------
// Fields

struct FieldsSeed<'a, 'c> {
    object: &'a mut dyn Object,
    ctx: &'a mut ReadContext<'c>,
}

impl<'de> DeserializeSeed<'de> for FieldsSeed<'_, '_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for FieldsSeed<'_, '_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field keywords to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let ctx = self.ctx;
        let object = self.object;
        let class = object.class_keyword();

        while let Some(keyword) = map.next_key::<String>()? {
            if !is_valid_element_name(&keyword) {
                let path = ctx.path();
                return Err(ctx.fail(IoError::InvalidKeyword { path, keyword }));
            }

            let Some(field) = object.find_field_mut(&keyword) else {
                if ctx.ignores_unknown_fields() {
                    log::warn!("skipping unknown field `{keyword}` of class `{class}`");
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
                let path = ctx.path();
                return Err(ctx.fail(IoError::UnknownField {
                    path,
                    class,
                    keyword,
                }));
            };

            if !field.is_io_readable() || !ctx.selects(field) {
                map.next_value::<IgnoredAny>()?;
                continue;
            }

            ctx.push(PathSegment::Field(field.keyword()));
            map.next_value_seed(FieldSeed {
                field,
                ctx: &mut *ctx,
            })?;
            ctx.pop();
        }
        Ok(())
    }
}

struct FieldSeed<'a, 'c> {
    field: &'a mut dyn FieldHandle,
    ctx: &'a mut ReadContext<'c>,
}

impl<'de> DeserializeSeed<'de> for FieldSeed<'_, '_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        self.field
            .deserialize_value(&mut erased, self.ctx)
            .map_err(D::Error::custom)
    }
}

// -----------------------------------------------------------------------------
// Children

/// Creates one child object and reads it.
struct ChildSeed<'a, 'c, T> {
    ctx: &'a mut ReadContext<'c>,
    marker: PhantomData<fn() -> T>,
}

impl<'de, T: ObjectClass> DeserializeSeed<'de> for ChildSeed<'_, '_, T> {
    type Value = Rc<RefCell<T>>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let ctx = self.ctx;
        let mut object = T::create().map_err(|e| ctx.fail::<D::Error>(IoError::from(e)))?;
        ObjectVisitor::new(&mut object, &mut *ctx).read(deserializer)?;

        let uuid = object.uuid();
        let child = Rc::new(RefCell::new(object));
        if let Err(e) = ctx.register(uuid, Pointer::from_rc(&child)) {
            return Err(ctx.fail(e));
        }
        Ok(child)
    }
}

/// Reads a sequence of child objects.
pub(crate) struct ChildSeqVisitor<'a, 'c, T> {
    ctx: &'a mut ReadContext<'c>,
    marker: PhantomData<fn() -> T>,
}

impl<'a, 'c, T: ObjectClass> ChildSeqVisitor<'a, 'c, T> {
    #[inline]
    pub fn new(ctx: &'a mut ReadContext<'c>) -> Self {
        Self {
            ctx,
            marker: PhantomData,
        }
    }
}

impl<'de, T: ObjectClass> Visitor<'de> for ChildSeqVisitor<'_, '_, T> {
    type Value = Vec<Rc<RefCell<T>>>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a sequence of `{}` objects", T::CLASS_KEYWORD)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let ctx = self.ctx;
        let mut children = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        loop {
            ctx.push(PathSegment::Index(children.len()));
            let child = seq.next_element_seed(ChildSeed::<T> {
                ctx: &mut *ctx,
                marker: PhantomData,
            })?;
            ctx.pop();
            match child {
                Some(child) => children.push(child),
                None => break,
            }
        }
        Ok(children)
    }
}

/// Reads an optional child object.
pub(crate) struct ChildOptionVisitor<'a, 'c, T> {
    ctx: &'a mut ReadContext<'c>,
    marker: PhantomData<fn() -> T>,
}

impl<'a, 'c, T: ObjectClass> ChildOptionVisitor<'a, 'c, T> {
    #[inline]
    pub fn new(ctx: &'a mut ReadContext<'c>) -> Self {
        Self {
            ctx,
            marker: PhantomData,
        }
    }
}

impl<'de, T: ObjectClass> Visitor<'de> for ChildOptionVisitor<'_, '_, T> {
    type Value = Option<Rc<RefCell<T>>>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an optional `{}` object", T::CLASS_KEYWORD)
    }

    #[inline]
    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    #[inline]
    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        ChildSeed::<T> {
            ctx: self.ctx,
            marker: PhantomData,
        }
        .deserialize(deserializer)
        .map(Some)
    }
}
