//! # propscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the propscope library. Import this module to get quick access to the essential
//! types for registering types and reflecting on their properties.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all propscope operations
pub use crate::Error;

/// The result type used throughout propscope
pub use crate::Result;

/// Where an invocation failure originated
pub use crate::FailureOrigin;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Entry point for property lookups
pub use crate::reflect::Reflector;

/// Configuration of the property lookups
pub use crate::reflect::{NullSetterResolution, ReflectionConfig};

// ================================================================================================
// Property Handles and Surfaces
// ================================================================================================

/// Typed handles to a resolved getter or setter
pub use crate::reflect::{PropertyAccessor, PropertyMutator};

/// Property surfaces and their cache
pub use crate::reflect::{
    AccessorKind, ClassDetails, ClassInspector, PropertyCache, PropertyNames, TypeIntrospector,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::metadata::typesystem::{
    Object, PrimitiveKind, ReflectType, TypeBuilder, TypeFlavor, TypeRc, TypeRegistry,
};

/// Type identifiers
pub use crate::metadata::token::TypeToken;

/// Methods and their invocation
pub use crate::metadata::method::{InvocationFailure, MethodBuilder, MethodDescriptor, MethodRc};

/// Dynamically typed values
pub use crate::metadata::value::Value;

// ================================================================================================
// Annotations
// ================================================================================================

/// Annotation model and lookup
pub use crate::metadata::annotations::{
    find_annotation, Annotation, AnnotationKind, AnnotationKindRc, AnnotationRc, AnnotationValue,
};
