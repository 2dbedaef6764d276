//! Built-in implementations and helpers for implementing the reflection traits.
//!
//! - [`concat`]: string concatenation used by generic [`TypePath`](crate::info::TypePath) impls.
//! - [`NonGenericTypeInfoCell`], [`GenericTypeInfoCell`], [`GenericTypePathCell`]:
//!   static storage for [`Typed`](crate::info::Typed) impls.
//!
//! ## Implemented Menu
//!
//! - primitives: `()`, `bool`, `char`, `i8`-`i64`, `isize`, `u8`-`u64`, `usize`,
//!   `f32`, `f64`, `String`
//! - lists: `Vec<T>`, `VecDeque<T>`, `[T; N]`
//! - optional: `Option<T>`

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod list;
mod option;
mod primitive;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};

/// An efficient string concatenation function.
///
/// ```
/// use od_reflect::impls;
///
/// let s = impls::concat(&["module", "::", "name", "<", "T", ">"]);
/// assert_eq!(s, "module::name<T>");
/// assert_eq!(s.capacity(), 15);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> alloc::string::String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = alloc::string::String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}
