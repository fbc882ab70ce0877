use std::any::TypeId;

use strum::{EnumCount, EnumIter};

use crate::metadata::value::Value;

/// The primitive value types known to every [`crate::metadata::typesystem::TypeRegistry`].
///
/// Each kind is bound to exactly one Rust type. Primitives are not reference types: they never
/// accept a null value and are not assignable to the root object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, strum::Display)]
pub enum PrimitiveKind {
    /// `bool`
    #[strum(to_string = "boolean")]
    Boolean,
    /// `char`
    #[strum(to_string = "char")]
    Char,
    /// `i8`
    #[strum(to_string = "byte")]
    I8,
    /// `i16`
    #[strum(to_string = "short")]
    I16,
    /// `i32`
    #[strum(to_string = "int")]
    I32,
    /// `i64`
    #[strum(to_string = "long")]
    I64,
    /// `f32`
    #[strum(to_string = "float")]
    F32,
    /// `f64`
    #[strum(to_string = "double")]
    F64,
}

impl PrimitiveKind {
    /// The Rust type this primitive is bound to
    #[must_use]
    pub fn rust_type(&self) -> TypeId {
        match self {
            PrimitiveKind::Boolean => TypeId::of::<bool>(),
            PrimitiveKind::Char => TypeId::of::<char>(),
            PrimitiveKind::I8 => TypeId::of::<i8>(),
            PrimitiveKind::I16 => TypeId::of::<i16>(),
            PrimitiveKind::I32 => TypeId::of::<i32>(),
            PrimitiveKind::I64 => TypeId::of::<i64>(),
            PrimitiveKind::F32 => TypeId::of::<f32>(),
            PrimitiveKind::F64 => TypeId::of::<f64>(),
        }
    }

    /// Position in the widening order, `None` for `boolean` which never widens
    fn widening_rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Boolean => None,
            PrimitiveKind::I8 => Some(0),
            PrimitiveKind::I16 => Some(1),
            PrimitiveKind::Char => Some(2),
            PrimitiveKind::I32 => Some(3),
            PrimitiveKind::I64 => Some(4),
            PrimitiveKind::F32 => Some(5),
            PrimitiveKind::F64 => Some(6),
        }
    }

    /// Number of widening steps needed to convert `self` into `target`.
    ///
    /// Returns `Some(0)` for identical kinds and `None` if no widening conversion exists.
    /// `char` widens to `int` and above, and nothing widens to `char`.
    #[must_use]
    pub fn widening_distance(self, target: PrimitiveKind) -> Option<u8> {
        if self == target {
            return Some(0);
        }
        if target == PrimitiveKind::Char {
            return None;
        }
        if self == PrimitiveKind::Char && matches!(target, PrimitiveKind::I8 | PrimitiveKind::I16)
        {
            return None;
        }

        let from = self.widening_rank()?;
        let to = target.widening_rank()?;
        (from < to).then(|| to - from)
    }

    /// Returns `true` if a value of kind `self` may be passed where `target` is expected
    #[must_use]
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        self.widening_distance(target).is_some()
    }

    /// Widens `value` to the Rust type bound to this primitive.
    ///
    /// Values that already have the target type, values that are not numeric primitives, and
    /// values for which no widening conversion exists are returned unchanged; the method body
    /// then reports the argument mismatch.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn coerce(self, value: Value) -> Value {
        if value.is_null() || value.rust_type() == Some(self.rust_type()) {
            return value;
        }

        macro_rules! widen {
            ($value:expr, $target:ty, [$($source:ty),*]) => {{
                $(
                    if let Some(v) = $value.downcast_ref::<$source>() {
                        return Value::new(<$target>::from(*v));
                    }
                )*
                $value
            }};
        }

        match self {
            PrimitiveKind::I16 => widen!(value, i16, [i8]),
            PrimitiveKind::I32 => {
                if let Some(c) = value.downcast_ref::<char>() {
                    return Value::new(u32::from(*c) as i32);
                }
                widen!(value, i32, [i8, i16])
            }
            PrimitiveKind::I64 => {
                if let Some(c) = value.downcast_ref::<char>() {
                    return Value::new(i64::from(u32::from(*c)));
                }
                widen!(value, i64, [i8, i16, i32])
            }
            PrimitiveKind::F32 => {
                if let Some(c) = value.downcast_ref::<char>() {
                    return Value::new(u32::from(*c) as f32);
                }
                if let Some(v) = value.downcast_ref::<i32>() {
                    return Value::new(*v as f32);
                }
                if let Some(v) = value.downcast_ref::<i64>() {
                    return Value::new(*v as f32);
                }
                widen!(value, f32, [i8, i16])
            }
            PrimitiveKind::F64 => {
                if let Some(c) = value.downcast_ref::<char>() {
                    return Value::new(f64::from(u32::from(*c)));
                }
                if let Some(v) = value.downcast_ref::<i64>() {
                    return Value::new(*v as f64);
                }
                widen!(value, f64, [i8, i16, i32, f32])
            }
            PrimitiveKind::Boolean | PrimitiveKind::Char | PrimitiveKind::I8 => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_widens_to_itself() {
        for kind in PrimitiveKind::iter() {
            assert_eq!(kind.widening_distance(kind), Some(0));
        }
        assert_eq!(PrimitiveKind::iter().count(), PrimitiveKind::COUNT);
    }

    #[test]
    fn test_widening_rules() {
        assert_eq!(
            PrimitiveKind::I32.widening_distance(PrimitiveKind::I64),
            Some(1)
        );
        assert_eq!(
            PrimitiveKind::I8.widening_distance(PrimitiveKind::F64),
            Some(6)
        );
        assert!(PrimitiveKind::Char.widens_to(PrimitiveKind::I32));
        assert!(!PrimitiveKind::Char.widens_to(PrimitiveKind::I16));
        assert!(!PrimitiveKind::I16.widens_to(PrimitiveKind::Char));
        assert!(!PrimitiveKind::I64.widens_to(PrimitiveKind::I32));
        assert!(!PrimitiveKind::Boolean.widens_to(PrimitiveKind::I32));
        assert!(!PrimitiveKind::I32.widens_to(PrimitiveKind::Boolean));
    }

    #[test]
    fn test_coerce_widens_numeric_values() {
        let widened = PrimitiveKind::I64.coerce(Value::new(5i32));
        assert_eq!(widened.downcast::<i64>().ok(), Some(5));

        let widened = PrimitiveKind::F64.coerce(Value::new(1.5f32));
        assert_eq!(widened.downcast::<f64>().ok(), Some(1.5));

        let widened = PrimitiveKind::I32.coerce(Value::new('A'));
        assert_eq!(widened.downcast::<i32>().ok(), Some(65));
    }

    #[test]
    fn test_coerce_leaves_other_values_untouched() {
        let same = PrimitiveKind::I32.coerce(Value::new(7i32));
        assert_eq!(same.downcast::<i32>().ok(), Some(7));

        let narrowing = PrimitiveKind::I32.coerce(Value::new(7i64));
        assert!(narrowing.is::<i64>());

        let null = PrimitiveKind::I32.coerce(Value::null());
        assert!(null.is_null());
    }
}
