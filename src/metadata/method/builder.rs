//! Fluent construction of method descriptors.
//!
//! A [`MethodBuilder`] collects the signature and the body of one method. It is handed to a
//! [`crate::metadata::typesystem::TypeBuilder`], which turns it into a
//! [`crate::metadata::method::MethodDescriptor`] once the declaring type exists.
//!
//! # Examples
//!
//! ```rust,ignore
//! let get_x = MethodBuilder::getter("getX", &registry.primitive(PrimitiveKind::I32), |p: &Point| p.x);
//! let set_label = MethodBuilder::setter("setLabel", &registry.string_type(), |p: &mut Point, v: String| p.label = v);
//! ```

use std::{
    any::{Any, TypeId},
    sync::{Arc, Weak},
};

use crate::{
    error::BoxError,
    metadata::{
        method::{
            argument, nullable_argument, receiver, receiver_mut, InvocationFailure, InvokeResult,
            MethodBody, MethodDescriptor, MethodModifiers,
        },
        typesystem::{ReflectType, TypeRc, TypeRef},
        value::Value,
    },
};

/// A type used in a method signature
#[derive(Clone, Debug)]
pub enum SignatureType {
    /// An already registered type
    Type(TypeRc),
    /// The type declaring the method, which does not exist yet while building it
    DeclaringType,
}

impl SignatureType {
    fn resolve(&self, declaring: &Weak<ReflectType>) -> TypeRef {
        match self {
            SignatureType::Type(ty) => TypeRef::new(ty),
            SignatureType::DeclaringType => TypeRef::from_weak(declaring.clone()),
        }
    }
}

/// Builder for a single method
pub struct MethodBuilder {
    name: String,
    modifiers: MethodModifiers,
    params: Vec<SignatureType>,
    return_type: Option<SignatureType>,
    receiver: Option<TypeId>,
    body: MethodBody,
}

impl MethodBuilder {
    /// Start a public, abstract method without parameters returning nothing
    pub fn new(name: impl Into<String>) -> Self {
        MethodBuilder {
            name: name.into(),
            modifiers: MethodModifiers::PUBLIC,
            params: Vec::new(),
            return_type: None,
            receiver: None,
            body: MethodBody::Abstract,
        }
    }

    /// Name of the method being built
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, ty: &TypeRc) -> Self {
        self.params.push(SignatureType::Type(ty.clone()));
        self
    }

    /// Append a parameter of the declaring type
    #[must_use]
    pub fn param_self(mut self) -> Self {
        self.params.push(SignatureType::DeclaringType);
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, ty: &TypeRc) -> Self {
        self.return_type = Some(SignatureType::Type(ty.clone()));
        self
    }

    /// Return the declaring type
    #[must_use]
    pub fn returns_self(mut self) -> Self {
        self.return_type = Some(SignatureType::DeclaringType);
        self
    }

    /// Hide the method from reflective lookups
    #[must_use]
    pub fn private(mut self) -> Self {
        self.modifiers.remove(MethodModifiers::PUBLIC);
        self
    }

    /// Declare that the body fails when it is passed null.
    ///
    /// Setters built this way are never chosen for a null value.
    #[must_use]
    pub fn rejects_null(mut self) -> Self {
        self.modifiers.insert(MethodModifiers::REJECTS_NULL);
        self
    }

    /// Declare the Rust type the body expects as receiver.
    ///
    /// Inherited methods are invoked on a subclass instance by upcasting the instance until it
    /// has this type.
    #[must_use]
    pub fn receiver<T: Any>(mut self) -> Self {
        self.receiver = Some(TypeId::of::<T>());
        self
    }

    /// Use a body borrowing the receiver immutably
    #[must_use]
    pub fn shared<F>(mut self, body: F) -> Self
    where
        F: Fn(&dyn Any, Vec<Value>) -> InvokeResult + Send + Sync + 'static,
    {
        self.body = MethodBody::Shared(Arc::new(body));
        self
    }

    /// Use a body borrowing the receiver mutably
    #[must_use]
    pub fn exclusive<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut dyn Any, Vec<Value>) -> InvokeResult + Send + Sync + 'static,
    {
        self.body = MethodBody::Exclusive(Arc::new(body));
        self
    }

    /// A zero-parameter method returning `f(receiver)`
    pub fn getter<T, R, F>(name: impl Into<String>, return_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        R: Any + Send + Sync,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        MethodBuilder::new(name)
            .returns(return_type)
            .receiver::<T>()
            .shared(move |target, _args| Ok(Value::new(f(receiver::<T>(target)?))))
    }

    /// A zero-parameter method returning `f(receiver)`, where `None` is returned as null
    pub fn nullable_getter<T, R, F>(name: impl Into<String>, return_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        R: Any + Send + Sync,
        F: Fn(&T) -> Option<R> + Send + Sync + 'static,
    {
        MethodBuilder::new(name)
            .returns(return_type)
            .receiver::<T>()
            .shared(move |target, _args| Ok(Value::from_option(f(receiver::<T>(target)?))))
    }

    /// A zero-parameter method whose body may fail
    pub fn try_getter<T, R, E, F>(name: impl Into<String>, return_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        R: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&T) -> std::result::Result<R, E> + Send + Sync + 'static,
    {
        MethodBuilder::new(name)
            .returns(return_type)
            .receiver::<T>()
            .shared(move |target, _args| {
                f(receiver::<T>(target)?)
                    .map(Value::new)
                    .map_err(InvocationFailure::target)
            })
    }

    /// A single-parameter method returning nothing, rejecting null
    pub fn setter<T, P, F>(name: impl Into<String>, param_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        P: Any,
        F: Fn(&mut T, P) + Send + Sync + 'static,
    {
        MethodBuilder::new(name)
            .param(param_type)
            .receiver::<T>()
            .rejects_null()
            .exclusive(move |target, args| {
                let value = argument::<P>(args)?;
                f(receiver_mut::<T>(target)?, value);
                Ok(Value::null())
            })
    }

    /// A single-parameter method returning nothing, receiving null as `None`
    pub fn nullable_setter<T, P, F>(name: impl Into<String>, param_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        P: Any,
        F: Fn(&mut T, Option<P>) + Send + Sync + 'static,
    {
        MethodBuilder::new(name)
            .param(param_type)
            .receiver::<T>()
            .exclusive(move |target, args| {
                let value = nullable_argument::<P>(args)?;
                f(receiver_mut::<T>(target)?, value);
                Ok(Value::null())
            })
    }

    /// A single-parameter method returning nothing whose body may fail, rejecting null
    pub fn try_setter<T, P, E, F>(name: impl Into<String>, param_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        P: Any,
        E: Into<BoxError>,
        F: Fn(&mut T, P) -> std::result::Result<(), E> + Send + Sync + 'static,
    {
        MethodBuilder::new(name)
            .param(param_type)
            .receiver::<T>()
            .rejects_null()
            .exclusive(move |target, args| {
                let value = argument::<P>(args)?;
                f(receiver_mut::<T>(target)?, value)
                    .map(|()| Value::null())
                    .map_err(InvocationFailure::target)
            })
    }

    pub(crate) fn build(self, declaring: &Weak<ReflectType>) -> MethodDescriptor {
        let mut modifiers = self.modifiers;
        if self.body.is_abstract() {
            modifiers.insert(MethodModifiers::ABSTRACT);
        }

        MethodDescriptor {
            name: self.name,
            modifiers,
            params: self
                .params
                .iter()
                .map(|param| param.resolve(declaring))
                .collect(),
            return_type: self.return_type.map(|ret| ret.resolve(declaring)),
            declaring_type: TypeRef::from_weak(declaring.clone()),
            receiver: self.receiver,
            body: self.body,
        }
    }
}
