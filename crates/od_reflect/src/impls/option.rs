use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{OptionalInfo, TypeInfo, TypeKind, TypePath, Typed};
use crate::ops::Optional;
use crate::reflection::impl_reflect_cast_fn;
use crate::registry::TypeRegistry;

fn option_from_inner<T: Typed>(
    inner: Option<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    match inner {
        None => Ok(Box::new(None::<T>)),
        Some(value) => value.take::<T>().map(|v| Box::new(Some(v)) as Box<dyn Reflect>),
    }
}

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let info = OptionalInfo::new::<T>(option_from_inner::<T>);
            TypeInfo::new::<Self>(TypeKind::Optional(info)).with_default(|| Box::new(None::<T>))
        })
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Typed> Reflect for Option<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!(Optional);

    fn reflect_clone(&self) -> Option<Box<dyn Reflect>> {
        let copy = match self {
            None => None::<T>,
            Some(value) => Some(value.reflect_clone()?.take::<T>().ok()?),
        };
        Some(Box::new(copy))
    }
}

impl<T: Typed> Optional for Option<T> {
    #[inline]
    fn inner(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn inner_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|v| v as &mut dyn Reflect)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn option_info() {
        assert_eq!(<Option<i32>>::type_path(), "core::option::Option<i32>");
        let info = <Option<i32>>::type_info().as_optional().unwrap();
        assert_eq!(info.inner_info().type_path(), "i32");

        let some = info.from_inner(Some(Box::new(3_i32) as Box<dyn Reflect>)).unwrap();
        assert_eq!(some.take::<Option<i32>>().unwrap(), Some(3));
        let none = info.from_inner(None).unwrap();
        assert_eq!(none.take::<Option<i32>>().unwrap(), None);
        assert!(info.from_inner(Some(Box::new(3_u8) as Box<dyn Reflect>)).is_err());
    }
}
