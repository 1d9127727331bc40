use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_core::{Deserializer, Serialize, Serializer};

use crate::io::de::{ObjectVisitor, UnknownObjectVisitor};
use crate::io::ser::{ObjectSerializeDriver, document_identities};
use crate::io::walk::{discard_unresolved_references_recursively, renew_uuids_recursively};
use crate::io::{
    FieldSelector, IoError, ObjectPath, PathSegment, ReadContext, ReadPhase, WriteContext,
    init_after_read_recursively, resolve_references_recursively,
};
use crate::object::{Object, ObjectClass};
use crate::registry::ObjectFactory;

// -----------------------------------------------------------------------------
// ObjectSerializer

/// Reads and writes object graphs.
///
/// Configured with a builder, every read and write is independent. The
/// string, stream and file methods use JSON; [`write`](Self::write) and
/// [`read`](Self::read) accept any self-describing `serde` format.
///
/// # Examples
///
/// ```ignore
/// let serializer = ObjectSerializer::new().with_factory(&factory).pretty(true);
///
/// let text = serializer.write_to_string(&container)?;
/// let object = serializer.create_object_from_str(&text)?;
/// assert_eq!(object.class_keyword(), "Container");
/// ```
#[derive(Clone, Copy, Default)]
pub struct ObjectSerializer<'a> {
    factory: Option<&'a ObjectFactory>,
    field_selector: Option<&'a FieldSelector<'a>>,
    ignore_unknown_fields: bool,
    renew_uuids: bool,
    pretty: bool,
}

impl<'a> ObjectSerializer<'a> {
    /// Creates a serializer without factory or field selector.
    #[inline]
    pub const fn new() -> Self {
        Self {
            factory: None,
            field_selector: None,
            ignore_unknown_fields: false,
            renew_uuids: false,
            pretty: false,
        }
    }

    /// Sets the factory used to create objects from their class keyword.
    #[inline]
    pub fn with_factory(mut self, factory: &'a ObjectFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Restricts reading and writing to the fields accepted by `selector`.
    #[inline]
    pub fn with_field_selector(mut self, selector: &'a FieldSelector<'a>) -> Self {
        self.field_selector = Some(selector);
        self
    }

    /// Skips unknown field keywords instead of failing.
    #[inline]
    pub fn ignore_unknown_fields(mut self, ignore: bool) -> Self {
        self.ignore_unknown_fields = ignore;
        self
    }

    /// Whether objects read keep the uuids stored in the document, `true`
    /// by default.
    ///
    /// When disabled, every object read gets a fresh uuid once references
    /// are resolved. Documents still carry uuids to link pointers.
    #[inline]
    pub fn serialize_uuids(mut self, keep: bool) -> Self {
        self.renew_uuids = !keep;
        self
    }

    /// Indents JSON output.
    #[inline]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    // -------------------------------------------------------------------------
    // Generic

    /// Writes `object` and its descendants to `serializer`.
    ///
    /// # Errors
    ///
    /// Fails if the graph can not be represented: a class or field keyword
    /// is invalid, a field was never registered, two objects share a uuid,
    /// or a pointer refers to a live object outside the written subtree.
    pub fn write<S: Serializer>(&self, object: &dyn Object, serializer: S) -> Result<S::Ok, IoError> {
        let document = document_identities(object, self.field_selector)?;
        log::trace!(
            "writing `{}` with {} addressable objects",
            object.class_keyword(),
            document.len()
        );

        let ctx = WriteContext::new(document, self.field_selector);
        let result = ObjectSerializeDriver::new(object, &ctx).serialize(serializer);
        result.map_err(|e| ctx.into_error(e.to_string()))
    }

    /// Reads `deserializer` into `object`, which must be of the document's
    /// root class.
    ///
    /// Fields absent from the document keep their current values.
    pub fn read<'de, D: Deserializer<'de>>(
        &self,
        object: &mut dyn Object,
        deserializer: D,
    ) -> Result<(), IoError> {
        self.read_with(object, None, |reader, object| reader.parse(object, deserializer))
    }

    // -------------------------------------------------------------------------
    // JSON strings

    /// Writes `object` as a JSON string.
    pub fn write_to_string(&self, object: &dyn Object) -> Result<String, IoError> {
        let mut out = Vec::new();
        if self.pretty {
            self.write(object, &mut serde_json::Serializer::pretty(&mut out))?;
        } else {
            self.write(object, &mut serde_json::Serializer::new(&mut out))?;
        }
        String::from_utf8(out).map_err(|e| IoError::Parse(e.to_string()))
    }

    /// Reads the JSON document `text` into `object`.
    pub fn read_from_str(&self, object: &mut dyn Object, text: &str) -> Result<(), IoError> {
        self.read_with(object, None, |reader, object| {
            let mut deserializer = serde_json::Deserializer::from_str(text);
            reader.parse(object, &mut deserializer)?;
            deserializer.end().map_err(|e| IoError::Parse(e.to_string()))
        })
    }

    /// Creates an object of the class named by the document, then reads it.
    ///
    /// The `class` entry must come first. Requires a factory.
    pub fn create_object_from_str(&self, text: &str) -> Result<Box<dyn Object>, IoError> {
        let factory = self.factory.ok_or(IoError::MissingFactory)?;
        let mut reader = self.reader(None);
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let mut object = reader.parse_unknown(factory, &mut deserializer)?;
        deserializer.end().map_err(|e| IoError::Parse(e.to_string()))?;
        reader.finish(&mut *object)?;
        Ok(object)
    }

    // -------------------------------------------------------------------------
    // Copies

    /// Deep-copies `object` by writing and reading it back.
    ///
    /// Every object of the copy gets a fresh uuid, so the copy can be
    /// added next to the original. Pointers inside the copied subtree refer
    /// to the copied objects.
    pub fn copy_by_serialization<T: ObjectClass>(&self, object: &T) -> Result<T, IoError> {
        let text = self.write_to_string(object)?;
        let mut copy = T::create()?;
        self.serialize_uuids(false).read_from_str(&mut copy, &text)?;
        Ok(copy)
    }

    /// Copies `object` into a new object of class `destination`.
    ///
    /// The two classes must be related: one of them lists the other in its
    /// class inheritance. Fields the destination does not know are skipped.
    /// Like [`copy_by_serialization`](Self::copy_by_serialization), the
    /// copy gets fresh uuids. Requires a factory.
    pub fn copy_and_cast_by_serialization(
        &self,
        object: &dyn Object,
        destination: &str,
    ) -> Result<Box<dyn Object>, IoError> {
        let factory = self.factory.ok_or(IoError::MissingFactory)?;
        let mut copy = factory.create(destination)?;

        let source = object.class_keyword();
        if !object.matches_class_keyword(destination) && !copy.matches_class_keyword(source) {
            let mut path = ObjectPath::new();
            path.push(PathSegment::Object(String::from(source)));
            return Err(IoError::ClassMismatch {
                path,
                expected: String::from(destination),
                found: String::from(source),
            });
        }

        let text = self.write_to_string(object)?;
        self.ignore_unknown_fields(true).serialize_uuids(false).read_with(
            &mut *copy,
            Some(source),
            |reader, object| {
                let mut deserializer = serde_json::Deserializer::from_str(&text);
                reader.parse(object, &mut deserializer)?;
                deserializer.end().map_err(|e| IoError::Parse(e.to_string()))
            },
        )?;
        Ok(copy)
    }

    // -------------------------------------------------------------------------
    // Streams and files

    /// Runs `setup_before_save` on the graph, then writes it as JSON.
    #[cfg(feature = "std")]
    pub fn write_stream<W: std::io::Write>(
        &self,
        object: &mut dyn Object,
        writer: W,
    ) -> Result<(), IoError> {
        crate::io::setup_before_save_recursively(object)?;
        if self.pretty {
            self.write(&*object, &mut serde_json::Serializer::pretty(writer))?;
        } else {
            self.write(&*object, &mut serde_json::Serializer::new(writer))?;
        }
        Ok(())
    }

    /// Reads a JSON document from `reader` into `object`.
    #[cfg(feature = "std")]
    pub fn read_stream<R: std::io::Read>(
        &self,
        object: &mut dyn Object,
        reader: R,
    ) -> Result<(), IoError> {
        self.read_with(object, None, |document, object| {
            let mut deserializer = serde_json::Deserializer::from_reader(reader);
            document.parse(object, &mut deserializer)?;
            deserializer.end().map_err(|e| IoError::Parse(e.to_string()))
        })
    }

    /// Writes `object` to the file at `path`, replacing its content.
    #[cfg(feature = "std")]
    pub fn write_file(
        &self,
        object: &mut dyn Object,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), IoError> {
        use std::io::Write;

        let file = std::fs::File::create(path.as_ref())?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_stream(object, &mut writer)?;
        writer.flush()?;
        log::debug!("wrote `{}` to {}", object.class_keyword(), path.as_ref().display());
        Ok(())
    }

    /// Reads the file at `path` into `object`.
    #[cfg(feature = "std")]
    pub fn read_file(
        &self,
        object: &mut dyn Object,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), IoError> {
        let file = std::fs::File::open(path.as_ref())?;
        self.read_stream(object, std::io::BufReader::new(file))
    }

    #[inline]
    fn reader(&self, root_class: Option<&'a str>) -> DocumentReader<'a> {
        DocumentReader {
            ctx: ReadContext::new(self.field_selector, self.ignore_unknown_fields, root_class),
            renew_uuids: self.renew_uuids,
        }
    }

    /// Runs `parse` and finishes the read, or clears the uuids a failed
    /// read left pending in `object`.
    fn read_with(
        &self,
        object: &mut dyn Object,
        root_class: Option<&'a str>,
        parse: impl FnOnce(&mut DocumentReader<'a>, &mut dyn Object) -> Result<(), IoError>,
    ) -> Result<(), IoError> {
        let mut reader = self.reader(root_class);
        let result = match parse(&mut reader, &mut *object) {
            Ok(()) => reader.finish(&mut *object),
            Err(e) => Err(e),
        };
        if result.is_err() {
            discard_unresolved_references_recursively(object);
        }
        result
    }
}

// -----------------------------------------------------------------------------
// DocumentReader

/// One read: parsing, then resolution and finalization.
///
/// Split in two so callers can check for trailing input between parsing
/// and finalizing.
struct DocumentReader<'a> {
    ctx: ReadContext<'a>,
    renew_uuids: bool,
}

impl DocumentReader<'_> {
    fn parse<'de, D: Deserializer<'de>>(
        &mut self,
        object: &mut dyn Object,
        deserializer: D,
    ) -> Result<(), IoError> {
        if let Err(e) = ObjectVisitor::new(object, &mut self.ctx).read(deserializer) {
            return Err(self.ctx.take_error(e.to_string()));
        }
        self.ctx.mark_seen(object.uuid())
    }

    fn parse_unknown<'de, D: Deserializer<'de>>(
        &mut self,
        factory: &ObjectFactory,
        deserializer: D,
    ) -> Result<Box<dyn Object>, IoError> {
        match UnknownObjectVisitor::new(factory, &mut self.ctx).read(deserializer) {
            Ok(object) => {
                self.ctx.mark_seen(object.uuid())?;
                Ok(object)
            }
            Err(e) => Err(self.ctx.take_error(e.to_string())),
        }
    }

    fn finish(mut self, object: &mut dyn Object) -> Result<(), IoError> {
        log::trace!(
            "resolving references of `{}` against {} objects",
            object.class_keyword(),
            self.ctx.identities().len()
        );
        self.ctx.set_phase(ReadPhase::ResolvingReferences);
        resolve_references_recursively(object, self.ctx.identities())?;
        if self.renew_uuids {
            renew_uuids_recursively(object)?;
        }

        self.ctx.set_phase(ReadPhase::Finalizing);
        init_after_read_recursively(object)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::vec;

    use uuid::Uuid;

    use crate::field::FieldHandle;
    use crate::io::{ErrorKind, IoError, ObjectSerializer, ReferenceError};
    use crate::object::{Object, ObjectClass, objects_data_equal};
    use crate::pointer::Pointer;
    use crate::registry::ObjectFactory;
    use crate::test_objects::{Checked, Container, DerivedItem, Item};

    const ROOT: &str = "00000000-0000-4000-8000-000000000001";
    const A: &str = "00000000-0000-4000-8000-00000000000a";
    const B: &str = "00000000-0000-4000-8000-00000000000b";
    const SUB: &str = "00000000-0000-4000-8000-0000000000c0";

    struct Sample {
        root: Container,
        a: Pointer<Item>,
        b: Pointer<Item>,
        main: Pointer<Item>,
    }

    /// `root.refs` points forward into `root.subs`, `sub.refs` points back
    /// into `root.items`.
    fn sample() -> Sample {
        let mut root = Container::create().unwrap();
        root.name.set_value(String::from("root"));

        let mut a = Item::named("a");
        a.value.set_value(7);
        a.tags.set_value(vec![String::from("x"), String::from("y")]);
        let a = root.items.push_back(a);
        let main = root.main.set(Item::named("main"));

        let mut sub = Container::create().unwrap();
        sub.name.set_value(String::from("sub"));
        let b = sub.items.push_back(Item::named("b"));
        sub.refs.push_back(a.clone());
        root.subs.push_back(sub);

        root.refs.push_back(b.clone());
        root.refs.push_back(Pointer::null());
        root.refs.push_back(a.clone());
        root.favourite.set(main.clone());

        Sample { root, a, b, main }
    }

    fn read_container(text: &str) -> Result<Container, IoError> {
        let mut container = Container::create().unwrap();
        ObjectSerializer::new().read_from_str(&mut container, text)?;
        Ok(container)
    }

    fn item_doc(uuid: &str, fields: &str) -> String {
        format!(r#"{{"class":"Item","uuid":"{uuid}","fields":{{{fields}}}}}"#)
    }

    fn container_doc(uuid: &str, fields: &str) -> String {
        format!(r#"{{"class":"Container","uuid":"{uuid}","fields":{{{fields}}}}}"#)
    }

    #[test]
    fn round_trip() {
        let sample = sample();
        let serializer = ObjectSerializer::new();
        let text = serializer.write_to_string(&sample.root).unwrap();

        let copy = read_container(&text).unwrap();
        assert!(objects_data_equal(&sample.root, &copy));
        assert_eq!(copy.handle.uuid(), sample.root.handle.uuid());

        // References resolve to the objects of the copy.
        let sub = copy.subs.get(0).unwrap();
        let copy_a = copy.items.pointer(0).unwrap();
        let copy_b = sub.items.pointer(0).unwrap();
        assert!(copy.refs.get(0).unwrap().ptr_eq(&copy_b));
        assert!(copy.refs.get(1).unwrap().is_null());
        assert!(copy.refs.get(2).unwrap().ptr_eq(&copy_a));
        assert!(sub.refs.get(0).unwrap().ptr_eq(&copy_a));
        assert!(copy.favourite.get().ptr_eq(&copy.main.pointer().unwrap()));

        assert!(!copy_a.ptr_eq(&sample.a));
        assert_eq!(copy_a.uuid(), sample.a.uuid());
        assert_eq!(copy_b.uuid(), sample.b.uuid());
        assert_eq!(copy.main.pointer().unwrap().uuid(), sample.main.uuid());
    }

    #[test]
    fn deterministic_output() {
        let sample = sample();
        let serializer = ObjectSerializer::new().pretty(true);

        let first = serializer.write_to_string(&sample.root).unwrap();
        let second = serializer.write_to_string(&sample.root).unwrap();
        assert_eq!(first, second);

        let mut copy = Container::create().unwrap();
        serializer.read_from_str(&mut copy, &first).unwrap();
        assert_eq!(serializer.write_to_string(&copy).unwrap(), first);
    }

    #[test]
    fn document_layout() {
        let mut item = Item::named("a");
        item.handle.set_uuid(Uuid::parse_str(A).unwrap());
        item.value.set_value(3);

        let text = ObjectSerializer::new().write_to_string(&item).unwrap();
        assert_eq!(
            text,
            item_doc(A, r#""name":"a","value":3,"tags":[]"#)
        );
    }

    #[test]
    fn ron_round_trip() {
        let sample = sample();
        let serializer = ObjectSerializer::new();

        let mut output = String::new();
        let mut ser = ron::Serializer::new(&mut output, None).unwrap();
        serializer.write(&sample.root, &mut ser).unwrap();

        let mut copy = Container::create().unwrap();
        let mut de = ron::Deserializer::from_str(&output).unwrap();
        serializer.read(&mut copy, &mut de).unwrap();

        assert!(objects_data_equal(&sample.root, &copy));
        assert!(copy.refs.get(2).unwrap().ptr_eq(&copy.items.pointer(0).unwrap()));
    }

    #[test]
    fn forward_reference_across_subtrees() {
        let text = container_doc(
            ROOT,
            &format!(
                r#""refs":["{B}"],"subs":[{}]"#,
                container_doc(SUB, &format!(r#""items":[{}]"#, item_doc(B, "")))
            ),
        );

        let root = read_container(&text).unwrap();
        let b = root.subs.get(0).unwrap().items.pointer(0).unwrap();
        assert!(root.refs.get(0).unwrap().ptr_eq(&b));
        assert_eq!(b.with(|item| item.name.value().clone()).unwrap(), "unnamed");
    }

    #[test]
    fn finalize_children_first() {
        let text = container_doc(
            ROOT,
            &format!(
                r#""items":[{},{}]"#,
                item_doc(A, r#""name":"a""#),
                item_doc(B, r#""name":"b""#)
            ),
        );

        let root = read_container(&text).unwrap();
        assert_eq!(root.read_order, ["a", "b"]);
        assert_eq!(root.items.get(0).unwrap().read_count, 1);
    }

    #[test]
    fn unknown_field() {
        let text = item_doc(A, r#""name":"a","colour":"red""#);

        let mut item = Item::create().unwrap();
        let err = ObjectSerializer::new()
            .read_from_str(&mut item, &text)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(matches!(&err, IoError::UnknownField { keyword, .. } if keyword == "colour"));
        assert_eq!(item.read_count, 0);

        let mut item = Item::create().unwrap();
        ObjectSerializer::new()
            .ignore_unknown_fields(true)
            .read_from_str(&mut item, &text)
            .unwrap();
        assert_eq!(item.name.value(), "a");
    }

    #[test]
    fn dangling_reference() {
        let text = container_doc(
            ROOT,
            &format!(r#""items":[{}],"refs":["{B}"]"#, item_doc(A, "")),
        );

        let err = read_container(&text).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(matches!(
            err,
            IoError::Reference {
                source: ReferenceError::Dangling { .. },
                ..
            }
        ));
        assert_eq!(err.path().unwrap().to_string(), "Container.refs");
    }

    #[test]
    fn no_finalize_on_failure() {
        let mut root = Container::create().unwrap();
        let text = container_doc(
            ROOT,
            &format!(r#""items":[{}],"refs":["{B}"]"#, item_doc(A, "")),
        );
        assert!(ObjectSerializer::new().read_from_str(&mut root, &text).is_err());
        assert!(root.items.iter().all(|item| item.read_count == 0));
    }

    #[test]
    fn reference_type_mismatch() {
        let text = container_doc(
            ROOT,
            &format!(r#""refs":["{SUB}"],"subs":[{}]"#, container_doc(SUB, "")),
        );

        let err = read_container(&text).err().unwrap();
        assert!(matches!(
            err,
            IoError::Reference {
                source: ReferenceError::TypeMismatch {
                    expected: "Item",
                    found: "Container",
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn root_is_not_addressable() {
        let text = container_doc(ROOT, &format!(r#""favourite":"{ROOT}""#));
        let err = read_container(&text).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn external_reference() {
        let mut other = Container::create().unwrap();
        let outside = other.items.push_back(Item::named("outside"));

        let mut root = Container::create().unwrap();
        root.refs.push_back(outside);

        let err = ObjectSerializer::new().write_to_string(&root).unwrap_err();
        assert!(matches!(err, IoError::ExternalReference { .. }));
        assert_eq!(err.path().unwrap().to_string(), "Container.refs[0]");

        // Destroyed referents are written as null.
        other.items.clear();
        let text = ObjectSerializer::new().write_to_string(&root).unwrap();
        assert!(text.contains(r#""refs":[null]"#));
    }

    #[test]
    fn duplicate_identity() {
        let mut root = Container::create().unwrap();
        let a = root.items.push_back(Item::named("a"));
        let b = root.items.push_back(Item::named("b"));
        let uuid = a.uuid().unwrap();
        b.with_mut(|item| item.handle.set_uuid(uuid));

        let err = ObjectSerializer::new().write_to_string(&root).unwrap_err();
        assert!(matches!(err, IoError::DuplicateIdentity { .. }));

        let text = container_doc(
            ROOT,
            &format!(r#""items":[{},{}]"#, item_doc(A, ""), item_doc(A, "")),
        );
        let err = read_container(&text).err().unwrap();
        assert!(matches!(err, IoError::DuplicateIdentity { .. }));
    }

    #[test]
    fn format_errors() {
        let cases = [
            String::from("{"),
            String::from(r#"{"uuid":"00000000-0000-4000-8000-000000000001"}"#),
            String::from(r#"{"fields":{},"class":"Item"}"#),
            String::from(r#"{"class":"Item","extra":1}"#),
            String::from(r#"{"class":"Item","uuid":"not-a-uuid"}"#),
            String::from(r#"{"class":"Item","fields":{"bad name":1}}"#),
            String::from(r#"{"class":"1Item"}"#),
            format!("{} trailing", item_doc(A, "")),
        ];
        for text in cases {
            let mut item = Item::create().unwrap();
            let err = ObjectSerializer::new()
                .read_from_str(&mut item, &text)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{text}: {err}");
        }
    }

    #[test]
    fn invalid_uuid_in_reference() {
        let text = container_doc(ROOT, r#""refs":["nope"]"#);
        let err = read_container(&text).err().unwrap();
        assert!(matches!(&err, IoError::InvalidUuid { value, .. } if value == "nope"));
        assert_eq!(err.path().unwrap().to_string(), "Container.refs");
    }

    #[test]
    fn class_mismatch() {
        let mut item = Item::create().unwrap();
        let err = ObjectSerializer::new()
            .read_from_str(&mut item, &container_doc(ROOT, ""))
            .unwrap_err();
        assert!(matches!(err, IoError::ClassMismatch { .. }));
        assert_eq!(err.kind(), ErrorKind::Schema);

        let text = container_doc(ROOT, &format!(r#""items":[{}]"#, container_doc(SUB, "")));
        assert!(matches!(
            read_container(&text),
            Err(IoError::ClassMismatch { .. })
        ));
    }

    #[test]
    fn validation_error() {
        let text = container_doc(
            ROOT,
            &format!(r#""items":[{}]"#, item_doc(A, r#""value":5000"#)),
        );
        let err = read_container(&text).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.path().unwrap().to_string(),
            "Container.items[0](Item).value"
        );
    }

    #[test]
    fn finalize_error() {
        let mut checked = Checked::create().unwrap();
        let err = ObjectSerializer::new()
            .read_from_str(&mut checked, r#"{"class":"Checked","fields":{"limit":-1}}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Finalize);

        ObjectSerializer::new()
            .read_from_str(&mut checked, r#"{"class":"Checked","fields":{"limit":4}}"#)
            .unwrap();
        assert_eq!(*checked.limit.value(), 4);
    }

    #[test]
    fn absent_fields_keep_values() {
        let mut item = Item::create().unwrap();
        item.value.set_value(9);
        ObjectSerializer::new()
            .read_from_str(&mut item, &item_doc(A, r#""tags":["t"]"#))
            .unwrap();

        assert_eq!(*item.value.value(), 9);
        assert_eq!(item.name.value(), "unnamed");
        assert_eq!(item.tags.value(), &["t"]);
        assert_eq!(item.handle.uuid().to_string(), A);
    }

    #[test]
    fn io_flags_and_selector() {
        let mut item = Item::named("a");
        item.value.set_value(3);
        item.value.meta_mut().set_io_writable(false);

        let text = ObjectSerializer::new().write_to_string(&item).unwrap();
        assert!(!text.contains("value"));

        let only_name = |field: &dyn FieldHandle| field.keyword() == "name";
        let text = ObjectSerializer::new()
            .with_field_selector(&only_name)
            .write_to_string(&Item::named("b"))
            .unwrap();
        assert!(text.contains(r#""fields":{"name":"b"}"#));

        let mut target = Item::create().unwrap();
        target.value.meta_mut().set_io_readable(false);
        ObjectSerializer::new()
            .read_from_str(&mut target, &item_doc(A, r#""value":8"#))
            .unwrap();
        assert_eq!(*target.value.value(), 0);
    }

    #[test]
    fn skipped_child_field_is_not_addressable() {
        let mut root = Container::create().unwrap();
        let a = root.items.push_back(Item::named("a"));
        root.refs.push_back(a);
        root.items.meta_mut().set_io_writable(false);

        let err = ObjectSerializer::new().write_to_string(&root).unwrap_err();
        assert!(matches!(err, IoError::ExternalReference { .. }));
    }

    #[test]
    fn create_from_factory() {
        let sample = sample();
        let mut factory = ObjectFactory::new();
        factory.register::<Item>().unwrap();
        factory.register::<Container>().unwrap();

        let text = ObjectSerializer::new().write_to_string(&sample.root).unwrap();

        let err = ObjectSerializer::new()
            .create_object_from_str(&text)
            .err()
            .unwrap();
        assert!(matches!(err, IoError::MissingFactory));

        let serializer = ObjectSerializer::new().with_factory(&factory);
        let object = serializer.create_object_from_str(&text).unwrap();
        assert_eq!(object.class_keyword(), "Container");
        assert!(objects_data_equal(&sample.root, &*object));

        let container = object.downcast_ref::<Container>().unwrap();
        assert!(container.refs.get(2).unwrap().ptr_eq(&container.items.pointer(0).unwrap()));

        let err = serializer
            .create_object_from_str(r#"{"class":"Missing","fields":{}}"#)
            .err()
            .unwrap();
        assert!(matches!(err, IoError::UnknownClass { .. }));

        let err = serializer
            .create_object_from_str(r#"{"uuid":null,"class":"Item"}"#)
            .err()
            .unwrap();
        assert!(matches!(err, IoError::MissingHeader { .. }));
    }

    #[test]
    fn copy_gets_fresh_identities() {
        let mut sample = sample();
        let copy = ObjectSerializer::new()
            .copy_by_serialization(&sample.root)
            .unwrap();

        assert_ne!(copy.handle.uuid(), sample.root.handle.uuid());
        assert_eq!(copy.name.value(), "root");
        let copy_a = copy.items.pointer(0).unwrap();
        assert_ne!(copy_a.uuid(), sample.a.uuid());
        assert!(copy.refs.get(2).unwrap().ptr_eq(&copy_a));
        assert!(copy.favourite.get().ptr_eq(&copy.main.pointer().unwrap()));
        assert!(!copy.favourite.get().ptr_eq(&sample.main));

        // A copied element can be added next to its original.
        let item = sample
            .a
            .with(|a| ObjectSerializer::new().copy_by_serialization(a))
            .unwrap()
            .unwrap();
        assert_eq!(item.name.value(), "a");
        sample.root.items.push_back(item);
        let text = ObjectSerializer::new().write_to_string(&sample.root).unwrap();

        let mut kept = Container::create().unwrap();
        ObjectSerializer::new().read_from_str(&mut kept, &text).unwrap();
        assert_eq!(kept.handle.uuid(), sample.root.handle.uuid());

        let mut renewed = Container::create().unwrap();
        ObjectSerializer::new()
            .serialize_uuids(false)
            .read_from_str(&mut renewed, &text)
            .unwrap();
        assert_ne!(renewed.handle.uuid(), sample.root.handle.uuid());
        assert_eq!(renewed.items.len(), 2);
        assert!(renewed.refs.get(2).unwrap().ptr_eq(&renewed.items.pointer(0).unwrap()));
    }

    #[test]
    fn failed_read_keeps_references() {
        let mut root = Container::create().unwrap();
        let a = root.items.push_back(Item::named("a"));
        let b = root.items.push_back(Item::named("b"));
        root.refs.push_back(a.clone());
        root.favourite.set(a.clone());
        let a_uuid = a.uuid().unwrap().to_string();
        let b_uuid = b.uuid().unwrap().to_string();

        let text = container_doc(ROOT, &format!(r#""refs":["{a_uuid}"],"bogus":1"#));
        let err = ObjectSerializer::new()
            .read_from_str(&mut root, &text)
            .unwrap_err();
        assert!(matches!(err, IoError::UnknownField { .. }));
        assert!(root.refs.is_resolved());
        assert!(root.refs.get(0).unwrap().ptr_eq(&a));

        // Edits after the failed read are what gets written.
        root.refs.push_back(b.clone());
        let text = ObjectSerializer::new().write_to_string(&root).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["fields"]["refs"], serde_json::json!([a_uuid, b_uuid]));

        // Failed resolution leaves every pointer field as it was.
        let text = container_doc(ROOT, &format!(r#""refs":["{B}"],"favourite":"{B}""#));
        let err = ObjectSerializer::new()
            .read_from_str(&mut root, &text)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(root.refs.is_resolved());
        assert!(root.favourite.is_resolved());
        assert_eq!(root.refs.len(), 2);
        assert!(root.refs.get(1).unwrap().ptr_eq(&b));
        assert!(root.favourite.get().ptr_eq(&a));
        assert!(ObjectSerializer::new().write_to_string(&root).unwrap().contains(&b_uuid));
    }

    #[test]
    fn busy_referent_is_an_error() {
        let mut other = Container::create().unwrap();
        let outside = other.items.push_back(Item::named("outside"));

        let mut root = Container::create().unwrap();
        root.refs.push_back(outside.clone());

        let err = outside
            .with_mut(|_| ObjectSerializer::new().write_to_string(&root))
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, IoError::ObjectBorrowed { .. }));
        assert_eq!(err.path().unwrap().to_string(), "Container.refs[0]");
    }

    #[test]
    fn copy_and_cast() {
        let mut factory = ObjectFactory::new();
        factory.register::<Item>().unwrap();
        factory.register::<DerivedItem>().unwrap();
        factory.register::<Container>().unwrap();
        let serializer = ObjectSerializer::new().with_factory(&factory);

        let mut item = Item::named("a");
        item.value.set_value(3);
        let derived = serializer
            .copy_and_cast_by_serialization(&item, "DerivedItem")
            .unwrap();
        let derived = derived.downcast_ref::<DerivedItem>().unwrap();
        assert_eq!(derived.name.value(), "a");
        assert_eq!(*derived.value.value(), 3);
        assert_eq!(*derived.weight.value(), 1.5);

        let mut source = DerivedItem::create().unwrap();
        source.weight.set_value(4.0);
        source.name.set_value(String::from("d"));
        let back = serializer
            .copy_and_cast_by_serialization(&source, "Item")
            .unwrap();
        assert_eq!(back.downcast_ref::<Item>().unwrap().name.value(), "d");

        let err = serializer
            .copy_and_cast_by_serialization(&item, "Container")
            .err()
            .unwrap();
        assert!(matches!(err, IoError::ClassMismatch { .. }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn file_round_trip() {
        let mut sample = sample();
        let path = std::env::temp_dir().join(format!("pdm_reflect_{}.json", Uuid::new_v4()));

        let serializer = ObjectSerializer::new().pretty(true);
        serializer.write_file(&mut sample.root, &path).unwrap();
        assert_eq!(sample.a.with(|item| item.save_count), Some(1));
        assert_eq!(sample.main.with(|item| item.save_count), Some(1));

        let mut copy = Container::create().unwrap();
        serializer.read_file(&mut copy, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(objects_data_equal(&sample.root, &copy));

        let err = serializer.read_file(&mut copy, &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn generic_object_access() {
        let sample = sample();
        let object: &dyn Object = &sample.root;
        assert_eq!(
            object.keywords(),
            ["name", "items", "refs", "main", "favourite", "subs"]
        );
        assert_eq!(object.find_field("refs").unwrap().data_type(), "pointer[]:Item");
        assert_eq!(object.descendants_of_type::<Item>().len(), 3);
    }
}
