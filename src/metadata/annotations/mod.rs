//! Type-level annotations and their inheritance-aware lookup.
//!
//! Annotations are attached to registered types, either while building them
//! ([`crate::metadata::typesystem::TypeBuilder::annotate`]) or later
//! ([`crate::metadata::typesystem::ReflectType::annotate`]).
//!
//! # Key Components
//!
//! - [`AnnotationKind`]: The annotation type, optionally carrying the inheritance marker
//! - [`Annotation`]: An annotation instance with named [`AnnotationValue`] arguments
//! - [`TypeHierarchy`]: What the lookup needs to know about a type hierarchy
//! - [`find_annotation`]: The lookup itself
//!
//! # Inheritance Semantics
//!
//! The annotation present on a class includes those declared on its superclasses. Annotations
//! declared on interfaces are only found from implementing classes if their kind is marked as
//! inherited; the interfaces implemented anywhere along the superclass chain are searched.

mod resolver;
mod types;

pub use resolver::{find_annotation, TypeHierarchy};
pub use types::*;

use crate::metadata::typesystem::TypeRc;

impl TypeHierarchy for TypeRc {
    fn declared_annotation(&self, kind: &AnnotationKind) -> Option<AnnotationRc> {
        self.as_ref().declared_annotation(kind)
    }

    fn superclass(&self) -> Option<Self> {
        self.base()
    }

    fn direct_interfaces(&self) -> Vec<Self> {
        self.interfaces().to_vec()
    }

    fn is_interface(&self) -> bool {
        self.as_ref().is_interface()
    }

    fn is_root_object(&self) -> bool {
        self.is_root()
    }
}
