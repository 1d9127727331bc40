//! Classes shared by the unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use crate::field::{ChildArrayField, ChildField, Field, PtrArrayField, PtrField, RangeValidator};
use crate::io::{InitError, ObjectIoCapability};
use crate::object::{ObjectClass, ObjectHandle};
use crate::registry::RegistrationError;

// -----------------------------------------------------------------------------
// Item

pub(crate) struct Item {
    pub handle: ObjectHandle,
    pub name: Field<String>,
    pub value: Field<i32>,
    pub tags: Field<Vec<String>>,
    pub read_count: usize,
    pub save_count: usize,
}

impl Item {
    pub fn named(name: &str) -> Self {
        let mut item = Self::create().unwrap();
        item.name.set_value(String::from(name));
        item
    }
}

impl ObjectClass for Item {
    const CLASS_KEYWORD: &'static str = "Item";

    fn create() -> Result<Self, RegistrationError> {
        let mut this = Self {
            handle: ObjectHandle::new(Self::CLASS_KEYWORD),
            name: Field::new(),
            value: Field::new(),
            tags: Field::new(),
            read_count: 0,
            save_count: 0,
        };
        this.handle
            .init_field_with_default(&mut this.name, "name", String::from("unnamed"))?;
        this.handle.init_field(&mut this.value, "value")?;
        this.handle.init_field(&mut this.tags, "tags")?;
        this.value.add_validator(RangeValidator::new(-1000, 1000));
        Ok(this)
    }
}

impl ObjectIoCapability for Item {
    fn init_after_read(&mut self) -> Result<(), InitError> {
        self.read_count += 1;
        Ok(())
    }

    fn setup_before_save(&mut self) {
        self.save_count += 1;
    }
}

crate::impl_object!(Item { name, value, tags });
crate::auto_register_object!(Item);

// -----------------------------------------------------------------------------
// DerivedItem

pub(crate) struct DerivedItem {
    pub handle: ObjectHandle,
    pub name: Field<String>,
    pub value: Field<i32>,
    pub tags: Field<Vec<String>>,
    pub weight: Field<f64>,
}

impl ObjectClass for DerivedItem {
    const CLASS_KEYWORD: &'static str = "DerivedItem";
    const PARENT_CLASS_KEYWORDS: &'static [&'static str] = &["Item"];

    fn create() -> Result<Self, RegistrationError> {
        let mut this = Self {
            handle: ObjectHandle::new(Self::CLASS_KEYWORD),
            name: Field::new(),
            value: Field::new(),
            tags: Field::new(),
            weight: Field::new(),
        };
        this.handle
            .init_field_with_default(&mut this.name, "name", String::from("unnamed"))?;
        this.handle.init_field(&mut this.value, "value")?;
        this.handle.init_field(&mut this.tags, "tags")?;
        this.handle.init_field_with_default(&mut this.weight, "weight", 1.5)?;
        Ok(this)
    }
}

impl ObjectIoCapability for DerivedItem {}
crate::impl_object!(DerivedItem { name, value, tags, weight });

// -----------------------------------------------------------------------------
// Container

pub(crate) struct Container {
    pub handle: ObjectHandle,
    pub name: Field<String>,
    pub items: ChildArrayField<Item>,
    pub refs: PtrArrayField<Item>,
    pub main: ChildField<Item>,
    pub favourite: PtrField<Item>,
    pub subs: ChildArrayField<Container>,
    pub read_order: Vec<String>,
}

impl ObjectClass for Container {
    const CLASS_KEYWORD: &'static str = "Container";

    fn create() -> Result<Self, RegistrationError> {
        let mut this = Self {
            handle: ObjectHandle::new(Self::CLASS_KEYWORD),
            name: Field::new(),
            items: ChildArrayField::new(),
            refs: PtrArrayField::new(),
            main: ChildField::new(),
            favourite: PtrField::new(),
            subs: ChildArrayField::new(),
            read_order: Vec::new(),
        };
        this.handle.init_field(&mut this.name, "name")?;
        this.handle.init_field(&mut this.items, "items")?;
        this.handle.init_field(&mut this.refs, "refs")?;
        this.handle.init_field(&mut this.main, "main")?;
        this.handle.init_field(&mut this.favourite, "favourite")?;
        this.handle.init_field(&mut this.subs, "subs")?;
        Ok(this)
    }
}

impl ObjectIoCapability for Container {
    /// Records which children were already finalized, and checks that every
    /// reference is resolved by then.
    fn init_after_read(&mut self) -> Result<(), InitError> {
        if !self.refs.is_resolved() || !self.favourite.is_resolved() {
            return Err(InitError::new("references are not resolved"));
        }
        self.read_order = self
            .items
            .iter()
            .filter(|item| item.read_count > 0)
            .map(|item| item.name.value().clone())
            .collect();
        Ok(())
    }
}

crate::impl_object!(Container { name, items, refs, main, favourite, subs });
crate::auto_register_object!(Container);

// -----------------------------------------------------------------------------
// Checked

/// Rejects negative limits after reading.
pub(crate) struct Checked {
    pub handle: ObjectHandle,
    pub limit: Field<i64>,
}

impl ObjectClass for Checked {
    const CLASS_KEYWORD: &'static str = "Checked";

    fn create() -> Result<Self, RegistrationError> {
        let mut this = Self {
            handle: ObjectHandle::new(Self::CLASS_KEYWORD),
            limit: Field::new(),
        };
        this.handle.init_field(&mut this.limit, "limit")?;
        Ok(this)
    }
}

impl ObjectIoCapability for Checked {
    fn init_after_read(&mut self) -> Result<(), InitError> {
        if *self.limit.value() < 0 {
            return Err(InitError::new("limit must not be negative"));
        }
        Ok(())
    }
}

crate::impl_object!(Checked { limit });

// -----------------------------------------------------------------------------
// Broken

/// Registers two fields under one keyword.
pub(crate) struct Broken {
    pub handle: ObjectHandle,
    pub a: Field<i32>,
    pub b: Field<i32>,
}

impl ObjectClass for Broken {
    const CLASS_KEYWORD: &'static str = "Broken";

    fn create() -> Result<Self, RegistrationError> {
        let mut this = Self {
            handle: ObjectHandle::new(Self::CLASS_KEYWORD),
            a: Field::new(),
            b: Field::new(),
        };
        this.handle.init_field(&mut this.a, "value")?;
        this.handle.init_field(&mut this.b, "value")?;
        Ok(this)
    }
}

impl ObjectIoCapability for Broken {}
crate::impl_object!(Broken { a, b });
