use bitflags::bitflags;

use crate::info::FieldInfo;

bitflags! {
    /// Selects which members of a struct are visited by serialization and
    /// schema derivation.
    ///
    /// A member is visited when its category (`FIELDS` or `PROPERTIES`) is set
    /// and its visibility (`PUBLIC` or `NON_PUBLIC`) is set.
    ///
    /// ```
    /// use od_reflect::info::AccessFlags;
    ///
    /// let flags = AccessFlags::default();
    /// assert!(flags.contains(AccessFlags::PUBLIC | AccessFlags::FIELDS));
    /// assert!(!flags.contains(AccessFlags::NON_PUBLIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u8 {
        const PUBLIC = 1 << 0;
        const NON_PUBLIC = 1 << 1;
        const FIELDS = 1 << 2;
        const PROPERTIES = 1 << 3;
    }
}

impl AccessFlags {
    /// Public fields and properties.
    pub const DEFAULT: Self = Self::PUBLIC.union(Self::FIELDS).union(Self::PROPERTIES);

    /// Whether `field` is selected.
    #[inline]
    pub fn allows_field(self, field: &FieldInfo) -> bool {
        self.contains(Self::FIELDS) && self.allows_visibility(field.is_public())
    }

    /// Whether properties are selected.
    ///
    /// Properties are accessor based, they count as public members.
    #[inline]
    pub fn allows_properties(self) -> bool {
        self.contains(Self::PROPERTIES | Self::PUBLIC)
    }

    #[inline]
    fn allows_visibility(self, public: bool) -> bool {
        if public {
            self.contains(Self::PUBLIC)
        } else {
            self.contains(Self::NON_PUBLIC)
        }
    }
}

impl Default for AccessFlags {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_selection() {
        let public = FieldInfo::new::<i32>("a");
        let private = FieldInfo::new::<i32>("b").with_public(false);

        assert!(AccessFlags::DEFAULT.allows_field(&public));
        assert!(!AccessFlags::DEFAULT.allows_field(&private));
        assert!(AccessFlags::all().allows_field(&private));
        assert!(!AccessFlags::PROPERTIES.allows_field(&public));
        assert!(!AccessFlags::FIELDS.allows_properties());
    }
}
