//! Property cells for domain record fields.
//!
//! A [`Property<T>`] wraps one field and reports whether a write actually
//! changed it, so the owning record only emits its change signal for real
//! mutations.
//!
//! # Example
//!
//! ```
//! use brewview_core::{Property, Signal};
//!
//! struct Kettle {
//!     boil_time: Property<f64>,
//!     changed: Signal<f64>,
//! }
//!
//! impl Kettle {
//!     fn set_boil_time(&self, minutes: f64) {
//!         if self.boil_time.set(minutes) {
//!             self.changed.emit(minutes);
//!         }
//!     }
//! }
//!
//! let kettle = Kettle { boil_time: Property::new(60.0), changed: Signal::new() };
//! kettle.set_boil_time(90.0);
//! assert_eq!(kettle.boil_time.get(), 90.0);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A field value with change detection.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is. The lock is released before `set` returns, so callers can
/// emit notifications without holding it.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Mutate the value in place under a single write lock.
    ///
    /// Read-modify-write sequences go through here so concurrent writers
    /// cannot interleave between the read and the write.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.value.write())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification when this returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
