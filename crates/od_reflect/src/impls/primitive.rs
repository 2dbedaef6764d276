use alloc::boxed::Box;
use alloc::string::String;

use crate::Reflect;
use crate::document::{Value, ValueError};
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{PrimitiveInfo, PrimitiveKind, TypeInfo, TypeKind, TypePath, Typed};
use crate::ops::Primitive;
use crate::reflection::impl_reflect_cast_fn;

/// Conversion of a leaf type from and to [`Value`].
trait LeafValue: Sized {
    fn read(value: &Value) -> Result<Self, ValueError>;

    fn write(&self) -> Value;
}

fn boxed_read<T: LeafValue + Reflect>(value: &Value) -> Result<Box<dyn Reflect>, ValueError> {
    T::read(value).map(|v| Box::new(v) as Box<dyn Reflect>)
}

macro_rules! impl_leaf_int {
    ($($ty:ty),*) => {$(
        impl LeafValue for $ty {
            #[inline]
            fn read(value: &Value) -> Result<Self, ValueError> {
                value.to_int::<$ty>(stringify!($ty))
            }

            #[inline]
            fn write(&self) -> Value {
                Value::from(*self)
            }
        }
    )*};
}

impl_leaf_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl LeafValue for f64 {
    #[inline]
    fn read(value: &Value) -> Result<Self, ValueError> {
        value.to_f64()
    }

    #[inline]
    fn write(&self) -> Value {
        Value::Float(*self)
    }
}

impl LeafValue for f32 {
    fn read(value: &Value) -> Result<Self, ValueError> {
        let v = value.to_f64()?;
        if v.is_finite() && v.abs() > f32::MAX as f64 {
            return Err(ValueError::OutOfRange {
                value: alloc::format!("{v}"),
                target: "f32",
            });
        }
        Ok(v as f32)
    }

    #[inline]
    fn write(&self) -> Value {
        Value::from(*self)
    }
}

impl LeafValue for bool {
    #[inline]
    fn read(value: &Value) -> Result<Self, ValueError> {
        value.to_bool()
    }

    #[inline]
    fn write(&self) -> Value {
        Value::Bool(*self)
    }
}

impl LeafValue for char {
    fn read(value: &Value) -> Result<Self, ValueError> {
        let mismatch = || ValueError::Mismatch {
            expected: "single character string",
            found: value.kind_name(),
        };
        let s = value.as_str().ok_or_else(mismatch)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(mismatch()),
        }
    }

    #[inline]
    fn write(&self) -> Value {
        Value::from(*self)
    }
}

impl LeafValue for String {
    fn read(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(ValueError::Mismatch {
                expected: "string",
                found: value.kind_name(),
            }),
        }
    }

    #[inline]
    fn write(&self) -> Value {
        Value::String(self.clone())
    }
}

impl LeafValue for () {
    fn read(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(()),
            _ => Err(ValueError::Mismatch {
                expected: "null",
                found: value.kind_name(),
            }),
        }
    }

    #[inline]
    fn write(&self) -> Value {
        Value::Null
    }
}

// -----------------------------------------------------------------------------
// Reflect impls

macro_rules! impl_primitive {
    ($ty:ty, $path:expr, $name:expr, $module:expr, $kind:ident $(, bounds($min:expr, $max:expr))?) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $name
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = PrimitiveInfo::new(PrimitiveKind::$kind, boxed_read::<$ty>)
                        $(.with_bounds($min, $max))?;
                    TypeInfo::new::<Self>(TypeKind::Primitive(info))
                        .with_default(|| Box::new(<$ty as Default>::default()))
                })
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            impl_reflect_cast_fn!(Primitive);

            #[inline]
            fn reflect_clone(&self) -> Option<Box<dyn Reflect>> {
                Some(Box::new(self.clone()))
            }
        }

        impl Primitive for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                LeafValue::write(self)
            }

            #[inline]
            fn set_value(&mut self, value: &Value) -> Result<(), ValueError> {
                *self = <$ty as LeafValue>::read(value)?;
                Ok(())
            }
        }
    };
}

impl_primitive!((), "()", "()", None, Unit);
impl_primitive!(bool, "bool", "bool", None, Bool);
impl_primitive!(char, "char", "char", None, Char);
impl_primitive!(f32, "f32", "f32", None, Float);
impl_primitive!(f64, "f64", "f64", None, Float);
impl_primitive!(String, "alloc::string::String", "String", Some("alloc::string"), String);

impl_primitive!(i8, "i8", "i8", None, Signed, bounds(i8::MIN as i64, i8::MAX as u64));
impl_primitive!(i16, "i16", "i16", None, Signed, bounds(i16::MIN as i64, i16::MAX as u64));
impl_primitive!(i32, "i32", "i32", None, Signed, bounds(i32::MIN as i64, i32::MAX as u64));
impl_primitive!(i64, "i64", "i64", None, Signed, bounds(i64::MIN, i64::MAX as u64));
impl_primitive!(isize, "isize", "isize", None, Signed, bounds(isize::MIN as i64, isize::MAX as u64));
impl_primitive!(u8, "u8", "u8", None, Unsigned, bounds(0, u8::MAX as u64));
impl_primitive!(u16, "u16", "u16", None, Unsigned, bounds(0, u16::MAX as u64));
impl_primitive!(u32, "u32", "u32", None, Unsigned, bounds(0, u32::MAX as u64));
impl_primitive!(u64, "u64", "u64", None, Unsigned, bounds(0, u64::MAX));
impl_primitive!(usize, "usize", "usize", None, Unsigned, bounds(0, usize::MAX as u64));

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;
    use crate::document::{Value, ValueError};
    use crate::info::{PrimitiveKind, Typed};
    use crate::ops::{Primitive, ReflectMut};

    #[test]
    fn primitive_info() {
        let info = <u8 as Typed>::type_info().as_primitive().unwrap();
        assert_eq!(info.kind(), PrimitiveKind::Unsigned);
        assert_eq!(info.bounds().map(|b| (b.min, b.max)), Some((0, 255)));

        let built = info.from_value(&Value::Int(7)).unwrap();
        assert_eq!(built.take::<u8>().unwrap(), 7);
        assert_eq!(<String as Typed>::type_info().type_path(), "alloc::string::String");
    }

    #[test]
    fn set_value_keeps_old_value_on_error() {
        let mut x = 5_i8;
        assert!(x.set_value(&Value::Int(1000)).is_err());
        assert_eq!(x, 5);
        x.set_value(&Value::from("-3")).unwrap();
        assert_eq!(x, -3);

        let mut c = 'a';
        assert!(matches!(
            c.set_value(&Value::from("ab")),
            Err(ValueError::Mismatch { .. })
        ));
        c.set_value(&Value::from("z")).unwrap();
        assert_eq!(c, 'z');
    }

    #[test]
    fn reflect_mut_and_set() {
        let mut value: Box<dyn Reflect> = Box::new(1.5_f64);
        match value.reflect_mut() {
            ReflectMut::Primitive(p) => p.set_value(&Value::Int(2)).unwrap(),
            _ => panic!("f64 is a primitive"),
        }
        assert_eq!(value.downcast_ref::<f64>(), Some(&2.0));

        let rejected = value.set(Box::new(3_i32)).unwrap_err();
        assert!(rejected.is::<i32>());
        value.set(Box::new(4.0_f64)).unwrap();
        assert_eq!(value.downcast_ref::<f64>(), Some(&4.0));
    }
}
