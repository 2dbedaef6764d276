use alloc::vec::Vec;
use core::any::TypeId;
use core::cell::RefCell;
use core::marker::PhantomData;

use crate::ops::ReflectRef;
use crate::{Reflect, ReflectError};

/// Identity of a value being visited: its address and type.
///
/// A struct and its first field share an address, the type tells them apart.
type VisitKey = (usize, TypeId);

std::thread_local! {
    static VISITING: RefCell<Vec<Option<VisitKey>>> = const { RefCell::new(Vec::new()) };
}

fn visit_key(value: &dyn Reflect) -> Option<VisitKey> {
    // Zero-sized values may share addresses, primitives cannot hold references.
    if size_of_val(value) == 0 || matches!(value.reflect_ref(), ReflectRef::Primitive(_)) {
        return None;
    }
    Some((core::ptr::from_ref(value).cast::<()>().addr(), value.ty_id()))
}

/// One entry of the per-thread visit stack, popped on drop.
///
/// Detects values re-entered while they are still being visited and bounds
/// the nesting depth.
pub(crate) struct Visit {
    // The stack is thread local.
    _marker: PhantomData<*const ()>,
}

impl Visit {
    /// Pushes `value` on the stack.
    pub(crate) fn enter(value: &dyn Reflect, max_depth: usize) -> Result<Self, ReflectError> {
        Self::push(visit_key(value), value.reflect_type_path(), max_depth)
    }

    /// Pushes a level without identity, used when building new values.
    pub(crate) fn enter_anonymous(max_depth: usize) -> Result<Self, ReflectError> {
        Self::push(None, "", max_depth)
    }

    fn push(key: Option<VisitKey>, type_path: &'static str, max_depth: usize) -> Result<Self, ReflectError> {
        VISITING.with_borrow_mut(|stack| {
            if stack.len() >= max_depth {
                return Err(ReflectError::DepthLimit(max_depth));
            }
            if key.is_some() && stack.contains(&key) {
                return Err(ReflectError::Cycle(type_path));
            }
            stack.push(key);
            Ok(Self {
                _marker: PhantomData,
            })
        })
    }

    /// Current nesting depth of this thread.
    #[cfg(test)]
    pub(crate) fn depth() -> usize {
        VISITING.with_borrow(Vec::len)
    }
}

impl Drop for Visit {
    fn drop(&mut self) {
        VISITING.with_borrow_mut(|stack| {
            stack.pop();
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Visit;
    use crate::ReflectError;

    #[test]
    fn reentering_a_value_is_a_cycle() {
        let list: Vec<u8> = vec![1, 2];
        let outer = Visit::enter(&list, 8).unwrap();
        assert_eq!(Visit::depth(), 1);
        assert!(matches!(Visit::enter(&list, 8), Err(ReflectError::Cycle(_))));
        drop(outer);
        assert_eq!(Visit::depth(), 0);
    }

    #[test]
    fn primitives_are_not_tracked() {
        let x = 3_i32;
        let _a = Visit::enter(&x, 8).unwrap();
        let _b = Visit::enter(&x, 8).unwrap();
        assert_eq!(Visit::depth(), 2);
    }

    #[test]
    fn depth_is_bounded() {
        let _a = Visit::enter_anonymous(2).unwrap();
        let _b = Visit::enter_anonymous(2).unwrap();
        assert_eq!(Visit::enter_anonymous(2).err(), Some(ReflectError::DepthLimit(2)));
    }
}
