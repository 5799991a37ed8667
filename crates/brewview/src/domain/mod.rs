//! Brewing records observed by the models.
//!
//! Every record embeds an [`ElementBase`] and exposes its fields through
//! getters and setters. A setter that actually changes a value emits an
//! [`ElementChange`] on the record's `changed` signal, naming the property
//! and carrying the new value. Records are shared as `Arc<T>`; pointer
//! identity is what the models use for membership.
//!
//! ```
//! use std::sync::Arc;
//! use brewview::domain::{Element, Fermentable};
//!
//! let malt = Arc::new(Fermentable::new("Maris Otter").with_amount_kg(4.0));
//! malt.changed().connect(|change| println!("{} -> {:?}", change.property, change.value));
//! malt.set_amount_kg(4.5);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};

use brewview_core::{Property, Signal};

use crate::model::ItemData;

/// Generates getter, notifying setter and consuming builder for `Property` fields.
macro_rules! element_fields {
    ($(
        $(#[$meta:meta])*
        $field:ident, $setter:ident, $builder:ident: $ty:ty => $prop:literal;
    )*) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> $ty {
                self.$field.get()
            }

            #[doc = concat!("Sets `", $prop, "`, notifying observers if it changed.")]
            pub fn $setter(&self, value: $ty) {
                if self.$field.set(value.clone()) {
                    self.base.notify($prop, $crate::model::ItemData::from(value));
                }
            }

            #[doc = concat!(
                "Builder form of [`", stringify!($setter), "`](Self::", stringify!($setter), "); ",
                "does not notify."
            )]
            pub fn $builder(self, value: $ty) -> Self {
                self.$field.set_silent(value);
                self
            }
        )*
    };
}

/// Generates a closed enumeration with user-visible names.
macro_rules! display_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in presentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The user-visible name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Looks a variant up by its user-visible name, ignoring case.
            pub fn from_display(text: &str) -> Option<Self> {
                let text = text.trim();
                Self::ALL.iter().copied().find(|v| v.as_str().eq_ignore_ascii_case(text))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for $crate::model::ItemData {
            fn from(value: $name) -> Self {
                $crate::model::ItemData::String(value.as_str().to_string())
            }
        }
    };
}

mod ingredients;
mod records;

pub use ingredients::{
    Fermentable, FermentableType, Hop, HopForm, HopUse, Misc, MiscType, MiscUse, Yeast, YeastForm,
    YeastType,
};
pub use records::{BrewNote, Equipment, Folder, Mash, Recipe, Style};

static ELEMENT_KEY_COUNTER: AtomicI64 = AtomicI64::new(1);

fn next_key() -> i64 {
    ELEMENT_KEY_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Describes one field mutation delivered on a record's change channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementChange {
    /// The property name, e.g. `"amount_kg"`.
    pub property: &'static str,
    /// The value after the change.
    pub value: ItemData,
}

/// State shared by every stored record.
#[derive(Debug)]
pub struct ElementBase {
    key: i64,
    deleted: Property<bool>,
    display: Property<bool>,
    folder: Property<String>,
    changed: Signal<ElementChange>,
}

impl Default for ElementBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementBase {
    /// Creates a base with a fresh key, displayed, in no folder.
    pub fn new() -> Self {
        Self {
            key: next_key(),
            deleted: Property::new(false),
            display: Property::new(true),
            folder: Property::new(String::new()),
            changed: Signal::new(),
        }
    }

    /// The record's unique key.
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Whether the record is marked deleted.
    pub fn deleted(&self) -> bool {
        self.deleted.get()
    }

    /// Whether the record is shown in browsers.
    pub fn display(&self) -> bool {
        self.display.get()
    }

    /// The folder the record is filed under.
    pub fn folder(&self) -> String {
        self.folder.get()
    }

    /// Marks the record deleted or restored.
    pub fn set_deleted(&self, deleted: bool) {
        if self.deleted.set(deleted) {
            self.notify("deleted", ItemData::from(deleted));
        }
    }

    /// Shows or hides the record.
    pub fn set_display(&self, display: bool) {
        if self.display.set(display) {
            self.notify("display", ItemData::from(display));
        }
    }

    /// Files the record under a folder.
    pub fn set_folder(&self, folder: impl Into<String>) {
        let folder = folder.into();
        if self.folder.set(folder.clone()) {
            self.notify("folder", ItemData::from(folder));
        }
    }

    /// The record's change channel.
    pub fn changed(&self) -> &Signal<ElementChange> {
        &self.changed
    }

    /// Emits a change for `property`.
    pub fn notify(&self, property: &'static str, value: ItemData) {
        self.changed.emit(ElementChange { property, value });
    }
}

/// Common interface of every brewing record.
pub trait Element: Send + Sync + 'static {
    /// The embedded base state.
    fn base(&self) -> &ElementBase;

    /// The record's display name.
    fn name(&self) -> String;

    /// The record's change channel.
    fn changed(&self) -> &Signal<ElementChange> {
        self.base().changed()
    }

    /// The record's unique key.
    fn key(&self) -> i64 {
        self.base().key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_keys_are_unique() {
        let a = ElementBase::new();
        let b = ElementBase::new();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_base_flags_notify_once() {
        let base = ElementBase::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        base.changed().connect(move |change| {
            seen_clone.lock().push(change.property);
        });

        base.set_deleted(true);
        base.set_deleted(true);
        base.set_display(false);
        base.set_folder("Lagers");
        base.set_folder("Lagers");

        assert_eq!(*seen.lock(), vec!["deleted", "display", "folder"]);
        assert_eq!(base.folder(), "Lagers");
        assert!(base.deleted());
        assert!(!base.display());
    }
}
