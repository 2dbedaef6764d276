use crate::Reflect;

/// An enum whose variants carry no data.
pub trait Enum: Reflect {
    fn variant_name(&self) -> &'static str;

    fn variant_index(&self) -> usize;
}
