use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, ListShape, TypeInfo, TypeKind, TypePath, Typed};
use crate::ops::List;
use crate::reflection::impl_reflect_cast_fn;
use crate::registry::TypeRegistry;

/// Unboxes every item as `T`, reporting the index of the first mismatch.
fn collect_items<T: Typed>(items: Vec<Box<dyn Reflect>>) -> Result<Vec<T>, Option<usize>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.take::<T>().map_err(|_| Some(index)))
        .collect()
}

fn clone_item<T: Typed>(item: &T) -> Option<T> {
    item.reflect_clone()?.take::<T>().ok()
}

// -----------------------------------------------------------------------------
// Vec<T>

fn vec_from_items<T: Typed>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Option<usize>> {
    collect_items::<T>(items).map(|v| Box::new(v) as Box<dyn Reflect>)
}

impl<T: TypePath> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Vec"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::vec")
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let info = ListInfo::new::<T>(ListShape::Vec, vec_from_items::<T>);
            TypeInfo::new::<Self>(TypeKind::List(info)).with_default(|| Box::new(Vec::<T>::new()))
        })
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Typed> Reflect for Vec<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!(List);

    fn reflect_clone(&self) -> Option<Box<dyn Reflect>> {
        let items = self.iter().map(clone_item).collect::<Option<Vec<T>>>()?;
        Some(Box::new(items))
    }
}

impl<T: Typed> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }
}

// -----------------------------------------------------------------------------
// VecDeque<T>

fn deque_from_items<T: Typed>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Option<usize>> {
    collect_items::<T>(items).map(|v| Box::new(VecDeque::from(v)) as Box<dyn Reflect>)
}

impl<T: TypePath> TypePath for VecDeque<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&["alloc::collections::VecDeque<", T::type_path(), ">"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["VecDeque<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "VecDeque"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::collections")
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let info = ListInfo::new::<T>(ListShape::Sequence, deque_from_items::<T>);
            TypeInfo::new::<Self>(TypeKind::List(info))
                .with_default(|| Box::new(VecDeque::<T>::new()))
        })
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Typed> Reflect for VecDeque<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!(List);

    fn reflect_clone(&self) -> Option<Box<dyn Reflect>> {
        let items = self.iter().map(clone_item).collect::<Option<VecDeque<T>>>()?;
        Some(Box::new(items))
    }
}

impl<T: Typed> List for VecDeque<T> {
    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        VecDeque::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }
}

// -----------------------------------------------------------------------------
// [T; N]

fn array_from_items<T: Typed, const N: usize>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Option<usize>> {
    let items: [T; N] = collect_items::<T>(items)?.try_into().map_err(|_| None::<usize>)?;
    Ok(Box::new(items))
}

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_path(), "; ", &N.to_string(), "]"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_name(), "; ", &N.to_string(), "]"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "array"
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let info = ListInfo::new::<T>(ListShape::Array(N), array_from_items::<T, N>);
            TypeInfo::new::<Self>(TypeKind::List(info))
        })
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Typed, const N: usize> Reflect for [T; N] {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!(List);

    fn reflect_clone(&self) -> Option<Box<dyn Reflect>> {
        let items = self.iter().map(clone_item).collect::<Option<Vec<T>>>()?;
        let items: [T; N] = items.try_into().ok()?;
        Some(Box::new(items))
    }
}

impl<T: Typed, const N: usize> List for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|item| item as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|item| item as &mut dyn Reflect)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{ListShape, TypePath, Typed};
    use crate::ops::ReflectRef;

    #[test]
    fn list_type_paths() {
        assert_eq!(<Vec<u8>>::type_path(), "alloc::vec::Vec<u8>");
        assert_eq!(<[i32; 3]>::type_path(), "[i32; 3]");
        assert_eq!(<VecDeque<bool>>::type_name(), "VecDeque<bool>");
        assert_eq!(<Vec<Vec<u8>>>::type_name(), "Vec<Vec<u8>>");
    }

    #[test]
    fn list_shapes() {
        let shape = |info: &'static crate::info::TypeInfo| info.as_list().unwrap().shape();
        assert_eq!(shape(<Vec<u8>>::type_info()), ListShape::Vec);
        assert_eq!(shape(<VecDeque<u8>>::type_info()), ListShape::Sequence);
        assert_eq!(shape(<[u8; 4]>::type_info()), ListShape::Array(4));
    }

    #[test]
    fn array_from_items_checks_length() {
        let info = <[u8; 2]>::type_info().as_list().unwrap();

        let ok = info.from_items(vec![Box::new(1_u8) as Box<dyn Reflect>, Box::new(2_u8)]);
        assert_eq!(ok.unwrap().take::<[u8; 2]>().unwrap(), [1, 2]);

        let short = info.from_items(vec![Box::new(1_u8) as Box<dyn Reflect>]);
        assert_eq!(short.err(), Some(None));

        let wrong = info.from_items(vec![Box::new(1_u8) as Box<dyn Reflect>, Box::new(2_i32)]);
        assert_eq!(wrong.err(), Some(Some(1)));
    }

    #[test]
    fn list_access() {
        let value: Box<dyn Reflect> = Box::new(vec![1_i32, 2, 3]);
        let ReflectRef::List(list) = value.reflect_ref() else {
            panic!("Vec is a list");
        };
        assert_eq!(list.len(), 3);
        let items: Vec<i32> = list
            .iter()
            .map(|item| *item.downcast_ref::<i32>().unwrap())
            .collect();
        assert_eq!(items, vec![1, 2, 3]);

        let copy = value.reflect_clone().unwrap();
        assert_eq!(copy.take::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
    }
}
