use alloc::string::String;
use alloc::vec::Vec;

use uuid::Uuid;

use crate::io::{IdentityTable, IoError, ObjectPath, PathSegment};
use crate::object::Object;
use crate::pointer::AnyPointer;

/// Direct children of `object` with their paths.
fn children_with_paths(object: &dyn Object, path: &ObjectPath) -> Vec<(ObjectPath, AnyPointer)> {
    let mut out = Vec::new();
    for field in object.fields() {
        let mut children = Vec::new();
        field.child_objects(&mut children);
        for (index, child) in children.into_iter().enumerate() {
            let mut child_path = path.join(PathSegment::Field(field.keyword()));
            child_path.push(PathSegment::Index(index));
            if let Some(class) = child.class_keyword() {
                child_path.push(PathSegment::Object(String::from(class)));
            }
            out.push((child_path, child));
        }
    }
    out
}

/// Runs `f` on every descendant of `object`, children before their parent.
fn walk_post_order(
    object: &mut dyn Object,
    path: &ObjectPath,
    f: &mut dyn FnMut(&mut dyn Object, &ObjectPath) -> Result<(), IoError>,
) -> Result<(), IoError> {
    for (child_path, child) in children_with_paths(object, path) {
        child
            .with_mut(|child| {
                walk_post_order(child, &child_path, f)?;
                f(child, &child_path)
            })
            .ok_or_else(|| IoError::ObjectBorrowed {
                path: child_path.clone(),
            })??;
    }
    Ok(())
}

fn root_path(object: &dyn Object) -> ObjectPath {
    let mut path = ObjectPath::new();
    path.push(PathSegment::Object(String::from(object.class_keyword())));
    path
}

/// Resolves the pending references of `object` and all its descendants
/// against `table`.
pub fn resolve_references_recursively(
    object: &mut dyn Object,
    table: &IdentityTable,
) -> Result<(), IoError> {
    let mut resolve = |object: &mut dyn Object, path: &ObjectPath| -> Result<(), IoError> {
        for index in 0..object.field_len() {
            let Some(field) = object.field_at_mut(index) else {
                continue;
            };
            if !field.has_unresolved_references() {
                continue;
            }
            let keyword = field.keyword();
            field
                .resolve_references(table)
                .map_err(|source| IoError::Reference {
                    path: path.join(PathSegment::Field(keyword)),
                    source,
                })?;
        }
        Ok(())
    };

    let path = root_path(object);
    walk_post_order(object, &path, &mut resolve)?;
    resolve(object, &path)
}

/// Runs [`init_after_read`] on every descendant of `object`, then on
/// `object` itself.
///
/// Stops at the first failing object.
///
/// [`init_after_read`]: crate::io::ObjectIoCapability::init_after_read
pub fn init_after_read_recursively(object: &mut dyn Object) -> Result<(), IoError> {
    let mut init = |object: &mut dyn Object, path: &ObjectPath| -> Result<(), IoError> {
        object
            .init_after_read()
            .map_err(|source| IoError::InitAfterRead {
                path: path.clone(),
                source,
            })
    };

    let path = root_path(object);
    walk_post_order(object, &path, &mut init)?;
    init(object, &path)
}

/// Runs [`setup_before_save`] on every descendant of `object`, then on
/// `object` itself.
///
/// [`setup_before_save`]: crate::io::ObjectIoCapability::setup_before_save
pub fn setup_before_save_recursively(object: &mut dyn Object) -> Result<(), IoError> {
    let mut setup = |object: &mut dyn Object, _: &ObjectPath| -> Result<(), IoError> {
        object.setup_before_save();
        Ok(())
    };

    let path = root_path(object);
    walk_post_order(object, &path, &mut setup)?;
    setup(object, &path)
}

fn discard_fields(object: &mut dyn Object) {
    for index in 0..object.field_len() {
        if let Some(field) = object.field_at_mut(index) {
            field.discard_unresolved_references();
        }
    }
}

/// Drops the uuids still pending in `object` and its descendants after a
/// failed read, so pointer fields go back to the references they held.
pub(crate) fn discard_unresolved_references_recursively(object: &mut dyn Object) {
    let mut discard = |object: &mut dyn Object, _: &ObjectPath| -> Result<(), IoError> {
        discard_fields(object);
        Ok(())
    };

    let path = root_path(object);
    if let Err(e) = walk_post_order(object, &path, &mut discard) {
        log::warn!("pending references left in place: {e}");
    }
    discard_fields(object);
}

/// Gives `object` and every descendant a fresh uuid.
///
/// Pointers are weak references, so resolved pointer fields keep their
/// targets.
pub(crate) fn renew_uuids_recursively(object: &mut dyn Object) -> Result<(), IoError> {
    let mut renew = |object: &mut dyn Object, _: &ObjectPath| -> Result<(), IoError> {
        object.handle_mut().set_uuid(Uuid::new_v4());
        Ok(())
    };

    let path = root_path(object);
    walk_post_order(object, &path, &mut renew)?;
    renew(object, &path)
}
