use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{TypeInfo, Typed};

/// Wraps an optional inner value, returning the inner value back on type mismatch.
pub type FromInnerFn =
    fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>;

/// Information of an optional type such as `Option<T>`.
#[derive(Clone, Debug)]
pub struct OptionalInfo {
    inner: fn() -> &'static TypeInfo,
    from_inner: FromInnerFn,
}

impl OptionalInfo {
    #[inline]
    pub fn new<T: Typed>(from_inner: FromInnerFn) -> Self {
        Self {
            inner: T::type_info,
            from_inner,
        }
    }

    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    #[inline]
    pub fn from_inner(
        &self,
        inner: Option<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.from_inner)(inner)
    }
}
