//! Reflected methods: signatures, modifiers and executable bodies.
//!
//! A [`MethodDescriptor`] is what the property lookups work on. It exposes the name, the
//! parameter and return types and the declaring type of a method, and it can be invoked on a
//! receiver passed as `&dyn Any`.
//!
//! # Key Components
//! - [`MethodDescriptor`]: A method declared on a [`crate::metadata::typesystem::ReflectType`]
//! - [`MethodBuilder`]: Fluent construction of descriptors, including typed getter/setter bodies
//! - [`MethodBody`]: The type-erased implementation
//! - [`InvocationFailure`]: Why a call failed, and whether the body or the mechanism raised it
//!
//! # Argument Coercion
//!
//! Arguments passed to a parameter of primitive type are widened to the parameter's Rust type
//! before the body runs, following [`crate::metadata::typesystem::PrimitiveKind::coerce`]. Null
//! is rejected for primitive parameters, and for every parameter of a method marked
//! [`MethodModifiers::REJECTS_NULL`].

mod body;
mod builder;
mod types;

pub use body::*;
pub use builder::{MethodBuilder, SignatureType};
pub use types::*;

use std::{any::Any, any::TypeId, fmt, sync::Arc};

use crate::metadata::{
    typesystem::{ReflectType, TypeRc, TypeRef},
    value::Value,
};

/// A reference to a `MethodDescriptor`
pub type MethodRc = Arc<MethodDescriptor>;

/// A method declared on a registered type
pub struct MethodDescriptor {
    /// Method name, e.g. `getX`
    pub name: String,
    /// Visibility and abstractness
    pub modifiers: MethodModifiers,
    pub(crate) params: Vec<TypeRef>,
    pub(crate) return_type: Option<TypeRef>,
    pub(crate) declaring_type: TypeRef,
    pub(crate) receiver: Option<TypeId>,
    pub(crate) body: MethodBody,
}

impl MethodDescriptor {
    /// Returns `true` if the method is visible to reflective lookups
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(MethodModifiers::PUBLIC)
    }

    /// Returns `true` if the method has no body
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(MethodModifiers::ABSTRACT)
    }

    /// Returns `true` if null may be passed for the parameter at `index`: the parameter has a
    /// reference type and the body does not reject null
    #[must_use]
    pub fn accepts_null(&self, index: usize) -> bool {
        !self.modifiers.contains(MethodModifiers::REJECTS_NULL)
            && self
                .parameter_type(index)
                .is_some_and(|param| param.is_reference_type())
    }

    /// Number of declared parameters
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Declared type of the parameter at `index`
    #[must_use]
    pub fn parameter_type(&self, index: usize) -> Option<TypeRc> {
        self.params.get(index).and_then(TypeRef::upgrade)
    }

    /// Declared return type, `None` for methods returning nothing
    #[must_use]
    pub fn return_type(&self) -> Option<TypeRc> {
        self.return_type.as_ref().and_then(TypeRef::upgrade)
    }

    /// Returns `true` if the method returns nothing
    #[must_use]
    pub fn returns_void(&self) -> bool {
        self.return_type.is_none()
    }

    /// The type declaring this method
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeRc> {
        self.declaring_type.upgrade()
    }

    /// Simple name of the declaring type, `<unloaded>` if it has been dropped
    #[must_use]
    pub fn declaring_type_name(&self) -> String {
        self.declaring_type
            .name()
            .unwrap_or_else(|| "<unloaded>".to_string())
    }

    /// Returns `true` if `ty` declares this method
    #[must_use]
    pub fn is_declared_by(&self, ty: &ReflectType) -> bool {
        self.declaring_type.points_to(ty)
    }

    /// The Rust type the body expects as receiver, `None` if it accepts any receiver
    #[must_use]
    pub fn receiver(&self) -> Option<TypeId> {
        self.receiver
    }

    /// The implementation
    #[must_use]
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Returns `true` if both methods have the same name and the same parameter types, i.e. one
    /// overrides the other
    #[must_use]
    pub fn has_same_signature(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(mine, theirs)| mine.ptr_eq(theirs))
    }

    /// Invoke the method on an immutably borrowed receiver.
    ///
    /// # Errors
    /// Returns [`InvocationFailure::IllegalAccess`] for abstract methods and for methods whose
    /// body needs a mutable receiver, [`InvocationFailure::IllegalArgument`] for argument or
    /// receiver mismatches and [`InvocationFailure::Target`] if the body fails.
    pub fn invoke(&self, target: &dyn Any, args: Vec<Value>) -> InvokeResult {
        let args = self.coerce_arguments(args)?;
        match &self.body {
            MethodBody::Abstract => Err(self.abstract_failure()),
            MethodBody::Shared(body) => body(target, args),
            MethodBody::Exclusive(_) => Err(InvocationFailure::IllegalAccess(format!(
                "method {}.{} requires a mutable receiver",
                self.declaring_type_name(),
                self.name
            ))),
        }
    }

    /// Invoke the method on a mutably borrowed receiver.
    ///
    /// # Errors
    /// Same as [`MethodDescriptor::invoke`], except that exclusive bodies are accepted.
    pub fn invoke_mut(&self, target: &mut dyn Any, args: Vec<Value>) -> InvokeResult {
        let args = self.coerce_arguments(args)?;
        match &self.body {
            MethodBody::Abstract => Err(self.abstract_failure()),
            MethodBody::Shared(body) => body(&*target, args),
            MethodBody::Exclusive(body) => body(target, args),
        }
    }

    fn abstract_failure(&self) -> InvocationFailure {
        InvocationFailure::IllegalAccess(format!(
            "cannot invoke abstract method {}.{}",
            self.declaring_type_name(),
            self.name
        ))
    }

    fn coerce_arguments(&self, args: Vec<Value>) -> Result<Vec<Value>, InvocationFailure> {
        if args.len() != self.params.len() {
            return Err(InvocationFailure::IllegalArgument(format!(
                "wrong number of arguments: expected {}, got {}",
                self.params.len(),
                args.len()
            )));
        }

        args.into_iter()
            .zip(&self.params)
            .map(|(arg, param)| {
                if arg.is_null() && self.modifiers.contains(MethodModifiers::REJECTS_NULL) {
                    return Err(InvocationFailure::IllegalArgument(format!(
                        "null passed to {}.{}, which does not accept null",
                        self.declaring_type_name(),
                        self.name
                    )));
                }
                let Some(kind) = param.upgrade().and_then(|ty| ty.primitive_kind()) else {
                    return Ok(arg);
                };
                if arg.is_null() {
                    return Err(InvocationFailure::IllegalArgument(format!(
                        "null passed for parameter of primitive type {kind}"
                    )));
                }
                Ok(kind.coerce(arg))
            })
            .collect()
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("modifiers", &self.modifiers)
            .field("declaring_type", &self.declaring_type.name())
            .field("params", &self.params.iter().map(TypeRef::name).collect::<Vec<_>>())
            .field("return_type", &self.return_type.as_ref().map(TypeRef::name))
            .field("body", &self.body)
            .finish()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|param| param.name().unwrap_or_else(|| "?".to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = self
            .return_type
            .as_ref()
            .map_or_else(|| "void".to_string(), |ret| {
                ret.name().unwrap_or_else(|| "?".to_string())
            });
        write!(
            f,
            "{} {}.{}({})",
            ret,
            self.declaring_type_name(),
            self.name,
            params
        )
    }
}
