use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::TypeInfo;
use crate::ops::{ReflectMut, ReflectRef};

/// The object-safe introspection capability of a value.
///
/// Implemented by `#[derive(Reflect)]` for host structs and unit enums, and by
/// this crate for the built-in primitives, `String`, `Vec<T>`, `VecDeque<T>`,
/// `[T; N]` and `Option<T>`. The static counterpart is
/// [`Typed`](crate::info::Typed).
///
/// [`reflect_ref`](Reflect::reflect_ref) and [`reflect_mut`](Reflect::reflect_mut)
/// must return the variant matching the kind of [`reflect_type_info`](Reflect::reflect_type_info).
pub trait Reflect: Any + Send + Sync {
    /// The [`TypeInfo`] of the underlying (runtime) type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Kind specific immutable access.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Kind specific mutable access.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Replaces `self` with `value`.
    ///
    /// Returns `value` back if it has a different type.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Deep copy of the value, `None` if the type cannot be copied.
    fn reflect_clone(&self) -> Option<Box<dyn Reflect>>;

    /// The [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        Any::type_id(self)
    }

    /// The type path of the underlying type.
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    ///
    /// ```
    /// # use od_reflect::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(10_i32);
    /// assert!(x.is::<i32>());
    /// ```
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to `Box<T>`, returning it back on mismatch.
    ///
    /// ```
    /// # use od_reflect::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(10_i32);
    /// let x = x.downcast::<u8>().unwrap_err();
    /// assert_eq!(*x.downcast::<i32>().unwrap(), 10);
    /// ```
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            Ok(any
                .downcast::<T>()
                .unwrap_or_else(|_| unreachable!("type checked above")))
        } else {
            Err(self)
        }
    }

    /// Downcasts and unboxes the value, returning it back on mismatch.
    ///
    /// ```
    /// # use od_reflect::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(String::from("hi"));
    /// assert_eq!(x.take::<String>().unwrap(), "hi");
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|boxed| *boxed)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reflect_ref() {
            ReflectRef::Primitive(p) => write!(f, "{:?}", p.to_value()),
            ReflectRef::Enum(e) => f.write_str(e.variant_name()),
            ReflectRef::Optional(o) => match o.inner() {
                Some(inner) => f.debug_tuple("Some").field(&inner).finish(),
                None => f.write_str("None"),
            },
            ReflectRef::List(l) => f.debug_list().entries(l.iter()).finish(),
            ReflectRef::Struct(s) => {
                let info = self.reflect_type_info();
                let mut debug = f.debug_struct(info.type_name());
                if let Some(info) = info.as_struct() {
                    for field in info.fields() {
                        if let Some(value) = s.field(field.name()) {
                            debug.field(field.name(), &value);
                        }
                    }
                }
                debug.finish()
            }
            ReflectRef::Opaque(_) => write!(f, "Opaque({})", self.reflect_type_path()),
        }
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implements `set`, `reflect_ref` and `reflect_mut` for a given kind.
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        fn set(
            &mut self,
            value: ::alloc::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::alloc::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

pub(crate) use impl_reflect_cast_fn;
