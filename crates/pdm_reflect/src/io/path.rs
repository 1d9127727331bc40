use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One step of an [`ObjectPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object, by class keyword.
    Object(String),
    /// A field, by keyword.
    Field(&'static str),
    /// An element of an array field.
    Index(usize),
}

/// Location of an object or field inside a document.
///
/// Displayed like `Container.items[1](Item).value`: the root class, then
/// field keywords, element indices and the class of each nested object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPath {
    segments: Vec<PathSegment>,
}

impl ObjectPath {
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Returns a copy of `self` extended by `segment`.
    pub fn join(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Object(class) if index == 0 => f.write_str(class)?,
                PathSegment::Object(class) => write!(f, "({class})")?,
                PathSegment::Field(keyword) if index == 0 => f.write_str(keyword)?,
                PathSegment::Field(keyword) => write!(f, ".{keyword}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}
