use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{TypeInfo, Typed};

/// How a list type stores its items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListShape {
    /// Fixed length, e.g. `[T; N]`.
    Array(usize),
    /// Contiguous growable storage, `Vec<T>`.
    Vec,
    /// Any other ordered sequence, e.g. `VecDeque<T>`.
    Sequence,
}

/// Builds a list from already converted items.
///
/// On failure, returns the index of the first rejected item, or `None` when
/// the item count itself is wrong.
pub type FromItemsFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Option<usize>>;

/// Information of a list-like type.
#[derive(Clone, Debug)]
pub struct ListInfo {
    item: fn() -> &'static TypeInfo,
    shape: ListShape,
    from_items: FromItemsFn,
}

impl ListInfo {
    #[inline]
    pub fn new<T: Typed>(shape: ListShape, from_items: FromItemsFn) -> Self {
        Self {
            item: T::type_info,
            shape,
            from_items,
        }
    }

    /// The declared item type.
    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline]
    pub fn shape(&self) -> ListShape {
        self.shape
    }

    /// The fixed length of an array shape.
    #[inline]
    pub fn fixed_len(&self) -> Option<usize> {
        match self.shape {
            ListShape::Array(len) => Some(len),
            _ => None,
        }
    }

    #[inline]
    pub fn from_items(
        &self,
        items: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Option<usize>> {
        (self.from_items)(items)
    }
}
