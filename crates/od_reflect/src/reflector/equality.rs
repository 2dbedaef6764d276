use crate::document::Value;
use crate::ops::ReflectRef;
use crate::reflector::guard::Visit;
use crate::{Reflect, ReflectError, Reflector};

/// Leaf equality where NaN equals NaN.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        _ => a == b,
    }
}

impl Reflector {
    /// Structural deep equality.
    ///
    /// Values are equal when they have the same runtime type and all their
    /// fields, readable properties, items and leaf values are equal. Opaque
    /// values are only equal to themselves.
    ///
    /// ```
    /// use od_reflect::Reflector;
    ///
    /// let reflector = Reflector::new();
    /// assert!(reflector.are_equal(&vec![Some(1)], &vec![Some(1)]).unwrap());
    /// assert!(!reflector.are_equal(&vec![Some(1)], &vec![None::<i32>]).unwrap());
    /// assert!(!reflector.are_equal(&1_u8, &1_i8).unwrap());
    /// ```
    pub fn are_equal(&self, a: &dyn Reflect, b: &dyn Reflect) -> Result<bool, ReflectError> {
        if a.ty_id() != b.ty_id() {
            return Ok(false);
        }
        let _visit = Visit::enter(a, self.config.max_depth)?;

        match (a.reflect_ref(), b.reflect_ref()) {
            (ReflectRef::Primitive(x), ReflectRef::Primitive(y)) => {
                Ok(same_value(&x.to_value(), &y.to_value()))
            }
            (ReflectRef::Enum(x), ReflectRef::Enum(y)) => Ok(x.variant_index() == y.variant_index()),
            (ReflectRef::Optional(x), ReflectRef::Optional(y)) => match (x.inner(), y.inner()) {
                (None, None) => Ok(true),
                (Some(x), Some(y)) => self.are_equal(x, y),
                _ => Ok(false),
            },
            (ReflectRef::List(x), ReflectRef::List(y)) => {
                if x.len() != y.len() {
                    return Ok(false);
                }
                for (x, y) in x.iter().zip(y.iter()) {
                    if !self.are_equal(x, y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (ReflectRef::Struct(x), ReflectRef::Struct(y)) => {
                let Some(info) = a.reflect_type_info().as_struct() else {
                    return Ok(false);
                };
                for field in info.fields() {
                    let equal = match (x.field(field.name()), y.field(field.name())) {
                        (Some(x), Some(y)) => self.are_equal(x, y)?,
                        (None, None) => true,
                        _ => false,
                    };
                    if !equal {
                        return Ok(false);
                    }
                }
                for property in info.properties().iter().filter(|p| p.is_readable()) {
                    let equal = match (x.property(property.name()), y.property(property.name())) {
                        (Some(x), Some(y)) => self.are_equal(&*x, &*y)?,
                        (None, None) => true,
                        _ => false,
                    };
                    if !equal {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (ReflectRef::Opaque(_), ReflectRef::Opaque(_)) => Ok(core::ptr::addr_eq(a, b)),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;

    use crate::Reflector;

    #[test]
    fn compares_nested_values() {
        let reflector = Reflector::new();
        let a: VecDeque<Option<String>> = [Some(String::from("x")), None].into();
        let mut b = a.clone();
        assert!(reflector.are_equal(&a, &b).unwrap());

        b[1] = Some(String::new());
        assert!(!reflector.are_equal(&a, &b).unwrap());
        assert!(!reflector.are_equal(&[1_u8, 2], &[1_u8, 3]).unwrap());
    }

    #[test]
    fn nan_survives_a_round_trip() {
        let reflector = Reflector::new();
        let node = reflector.to_document(&f64::NAN).unwrap();
        let back = reflector.from_document::<f64>(&node).unwrap();
        assert!(reflector.are_equal(&back, &f64::NAN).unwrap());

        let node = reflector.to_document(&f32::NAN).unwrap();
        let back = reflector.from_document::<f32>(&node).unwrap();
        assert!(reflector.are_equal(&back, &f32::NAN).unwrap());

        assert!(!reflector.are_equal(&f64::NAN, &0.0_f64).unwrap());
        assert!(reflector.are_equal(&Some(f32::NAN), &Some(f32::NAN)).unwrap());
    }
}
