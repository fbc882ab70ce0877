//! Runtime type model for reflective property access.
//!
//! Rust has no runtime reflection, so the information a property lookup needs is registered
//! explicitly: which types exist, how they inherit from each other, which methods they declare
//! and how to invoke them, and which annotations they carry.
//!
//! # Key Components
//!
//! - [`typesystem`] - [`typesystem::ReflectType`], [`typesystem::TypeRegistry`] and
//!   [`typesystem::TypeBuilder`]
//! - [`method`] - [`method::MethodDescriptor`] and invocable method bodies
//! - [`annotations`] - Annotations and [`annotations::find_annotation`]
//! - [`value`] - [`value::Value`], the dynamically typed argument and return value
//! - [`token`] - [`token::TypeToken`], the identifier of a registered type
//!
//! # Examples
//!
//! ```rust
//! use propscope::metadata::{
//!     annotations::{Annotation, AnnotationKind},
//!     typesystem::TypeRegistry,
//! };
//! use std::sync::Arc;
//!
//! let registry = TypeRegistry::new()?;
//! let entity = Arc::new(AnnotationKind::new("orm", "Entity"));
//!
//! let base = registry
//!     .class("model", "Base")
//!     .annotate(Annotation::new(&entity))
//!     .build()?;
//! let derived = registry.class("model", "Derived").extends(&base).build()?;
//!
//! assert!(base.is_assignable_from(&derived));
//! assert!(propscope::metadata::annotations::find_annotation(derived, &entity).is_some());
//! # Ok::<(), propscope::Error>(())
//! ```

/// Implementation of type-level annotations and their lookup
pub mod annotations;
/// Implementation of method descriptors, signatures and bodies
pub mod method;
/// Implementation of the identifiers of registered types
pub mod token;
/// Implementation of the runtime type system
pub mod typesystem;
/// Implementation of dynamically typed values
pub mod value;
