use std::sync::{Arc, Weak};

use crate::metadata::{
    token::TypeToken,
    typesystem::{PrimitiveKind, ReflectType, TypeRc},
};

/// A smart reference to a `ReflectType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API.
///
/// Method signatures refer to their parameter, return and declaring types through this
/// handle, since signatures may be cyclic (`Node getNext()`).
#[derive(Clone, Debug)]
pub struct TypeRef {
    weak_ref: Weak<ReflectType>,
}

impl TypeRef {
    /// Create a new `TypeRef` from a strong reference
    pub fn new(strong_ref: &TypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    pub(crate) fn from_weak(weak_ref: Weak<ReflectType>) -> Self {
        Self { weak_ref }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<TypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Returns `true` if both handles point to the same type
    #[must_use]
    pub fn ptr_eq(&self, other: &TypeRef) -> bool {
        Weak::ptr_eq(&self.weak_ref, &other.weak_ref)
    }

    /// Returns `true` if this handle points to `ty`
    #[must_use]
    pub fn points_to(&self, ty: &ReflectType) -> bool {
        std::ptr::eq(self.weak_ref.as_ptr(), ty)
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<TypeToken> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the name of the referenced type (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|t| t.name.clone())
    }
}

impl From<TypeRc> for TypeRef {
    fn from(strong_ref: TypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

impl From<&TypeRc> for TypeRef {
    fn from(strong_ref: &TypeRc) -> Self {
        Self::new(strong_ref)
    }
}

/// Represents the flavor of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    /// The universal root type every class derives from
    Object,
    /// A primitive value type
    Primitive(PrimitiveKind),
    /// The built-in string type
    String,
    /// A user registered class
    Class,
    /// A user registered interface
    Interface,
}

impl TypeFlavor {
    /// Check if this is a primitive type
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeFlavor::Primitive(_))
    }

    /// Check if this is a reference type, i.e. accepts a null value
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        !self.is_primitive()
    }

    /// Check if this is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self, TypeFlavor::Interface)
    }

    /// Check if instances of this flavor can derive from other classes
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(
            self,
            TypeFlavor::Object | TypeFlavor::String | TypeFlavor::Class
        )
    }

    /// The primitive kind, if this is a primitive type
    #[must_use]
    pub fn to_primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeFlavor::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The token table types of this flavor are registered in
    #[must_use]
    pub fn table(&self) -> u8 {
        match self {
            TypeFlavor::Object | TypeFlavor::Primitive(_) | TypeFlavor::String => {
                TypeToken::TABLE_BUILTIN
            }
            TypeFlavor::Class => TypeToken::TABLE_CLASS,
            TypeFlavor::Interface => TypeToken::TABLE_INTERFACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_classification() {
        let int = TypeFlavor::Primitive(PrimitiveKind::I32);
        assert!(int.is_primitive());
        assert!(!int.is_reference_type());
        assert_eq!(int.to_primitive_kind(), Some(PrimitiveKind::I32));
        assert_eq!(int.table(), TypeToken::TABLE_BUILTIN);

        assert!(TypeFlavor::String.is_reference_type());
        assert!(TypeFlavor::String.is_class());
        assert!(TypeFlavor::Interface.is_interface());
        assert!(!TypeFlavor::Interface.is_class());
        assert_eq!(TypeFlavor::Class.table(), TypeToken::TABLE_CLASS);
        assert_eq!(TypeFlavor::Interface.table(), TypeToken::TABLE_INTERFACE);
    }

    #[test]
    fn test_type_ref_does_not_keep_type_alive() {
        let registry = crate::metadata::typesystem::TypeRegistry::new().expect("registry should build");
        let ty = registry
            .class("test", "Transient")
            .build()
            .expect("type should build");
        let weak = TypeRef::new(&ty);
        assert!(weak.is_valid());
        assert_eq!(weak.name().as_deref(), Some("Transient"));
        assert!(weak.points_to(&ty));

        registry.unregister(ty.token);
        drop(ty);
        assert!(!weak.is_valid());
        assert!(weak.upgrade().is_none());
        assert!(weak.token().is_none());
    }
}
