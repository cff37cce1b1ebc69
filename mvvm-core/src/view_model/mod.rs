pub mod property_changed;

pub use property_changed::PropertyChanged;

/// Base behaviour of an observable view-model.
///
/// Property keys are plain strings, `#[derive(PropertyNames)]` generates a
/// `PROP_<FIELD>` constant per field so they never need to be typed by hand.
pub trait ViewModel {
    fn property_changed(&self) -> &PropertyChanged;

    fn notify(&self, property: &str) {
        self.property_changed().raise(property)
    }
}

/// Assign `value` to `field` and notify `property` if it actually changed.
pub fn set_and_notify<T>(changed: &PropertyChanged, field: &mut T, value: T, property: &str) -> bool
    where
        T: PartialEq,
{
    if *field == value {
        return false;
    }
    *field = value;
    changed.raise(property);
    true
}
