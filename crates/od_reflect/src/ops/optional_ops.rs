use crate::Reflect;

/// A value that may be absent.
pub trait Optional: Reflect {
    fn inner(&self) -> Option<&dyn Reflect>;

    fn inner_mut(&mut self) -> Option<&mut dyn Reflect>;
}
