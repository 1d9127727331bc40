use bitflags::bitflags;

bitflags! {
    /// Whether a field takes part in reading and writing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IoFlags: u8 {
        /// The field is assigned from documents.
        const READABLE = 1 << 0;
        /// The field is written to documents.
        const WRITABLE = 1 << 1;
    }
}

impl Default for IoFlags {
    #[inline]
    fn default() -> Self {
        Self::all()
    }
}

// -----------------------------------------------------------------------------
// FieldMeta

/// Keyword and IO flags of a field.
///
/// A new field is unbound, its keyword is the empty string until the
/// owning object registers it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    keyword: &'static str,
    io: IoFlags,
}

impl FieldMeta {
    #[inline]
    pub const fn new() -> Self {
        Self {
            keyword: "",
            io: IoFlags::all(),
        }
    }

    #[inline]
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Returns `true` once the field has been registered on an object.
    #[inline]
    pub fn is_bound(&self) -> bool {
        !self.keyword.is_empty()
    }

    #[inline]
    pub(crate) fn bind(&mut self, keyword: &'static str) {
        self.keyword = keyword;
    }

    #[inline]
    pub fn io_flags(&self) -> IoFlags {
        self.io
    }

    #[inline]
    pub fn set_io_flags(&mut self, flags: IoFlags) {
        self.io = flags;
    }

    #[inline]
    pub fn is_io_readable(&self) -> bool {
        self.io.contains(IoFlags::READABLE)
    }

    #[inline]
    pub fn is_io_writable(&self) -> bool {
        self.io.contains(IoFlags::WRITABLE)
    }

    #[inline]
    pub fn set_io_readable(&mut self, readable: bool) {
        self.io.set(IoFlags::READABLE, readable);
    }

    #[inline]
    pub fn set_io_writable(&mut self, writable: bool) {
        self.io.set(IoFlags::WRITABLE, writable);
    }
}
