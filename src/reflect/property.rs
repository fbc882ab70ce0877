//! Typed handles to a single resolved accessor or mutator.
//!
//! A [`PropertyAccessor`] wraps a getter and checks its result against the Rust type the
//! caller expects. A [`PropertyMutator`] wraps a setter and reports the setter's own parameter
//! type, independent of the value type it was looked up with.
//!
//! Both handles accept instances of the type they were resolved on as well as instances of its
//! registered subclasses; the receiver is adapted to what the underlying method expects before
//! the call. Failures are reported as [`Error::PropertyInvocation`], keeping apart failures
//! raised inside the method body ([`crate::FailureOrigin::Target`]) from failures of the call
//! itself ([`crate::FailureOrigin::Mechanism`]).

use std::{
    any::{type_name, Any},
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use crate::{
    metadata::{
        method::{InvocationFailure, MethodRc},
        typesystem::{TypeRc, TypeRegistry},
        value::Value,
    },
    Error, Result,
};

/// What both handles share: the property, the method and where to find receiver types
#[derive(Clone)]
struct BoundMethod {
    property: String,
    method: MethodRc,
    owner: TypeRc,
    registry: Arc<TypeRegistry>,
}

impl BoundMethod {
    /// The registered type of `target`, falling back to the type the lookup was made on
    fn receiver_type(&self, target: &dyn Any) -> TypeRc {
        self.registry
            .get_by_rust_type((*target).type_id())
            .unwrap_or_else(|| self.owner.clone())
    }

    fn adapt_ref<'a>(&self, target: &'a dyn Any) -> Result<&'a dyn Any> {
        self.receiver_type(target)
            .adapt_ref(target, self.method.receiver())
            .ok_or_else(|| self.not_an_instance())
    }

    fn adapt_mut<'a>(&self, target: &'a mut dyn Any) -> Result<&'a mut dyn Any> {
        let ty = self.receiver_type(&*target);
        ty.adapt_mut(target, self.method.receiver())
            .ok_or_else(|| self.not_an_instance())
    }

    fn not_an_instance(&self) -> Error {
        self.failure(InvocationFailure::IllegalArgument(format!(
            "object is not an instance of declaring class {}",
            self.method.declaring_type_name()
        )))
    }

    fn failure(&self, failure: InvocationFailure) -> Error {
        Error::PropertyInvocation {
            property: self.property.clone(),
            type_name: self.owner.name.clone(),
            origin: failure.origin(),
            source: failure.into_source(),
        }
    }
}

impl fmt::Display for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property {}.{}",
            self.method.declaring_type_name(),
            self.property
        )
    }
}

/// A readable property of `T` with values of type `F`
pub struct PropertyAccessor<T, F> {
    bound: BoundMethod,
    _types: PhantomData<fn(&T) -> F>,
}

impl<T: Any, F: Any> PropertyAccessor<T, F> {
    pub(crate) fn new(
        property: &str,
        method: MethodRc,
        owner: TypeRc,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        PropertyAccessor {
            bound: BoundMethod {
                property: property.to_string(),
                method,
                owner,
                registry,
            },
            _types: PhantomData,
        }
    }

    /// The property name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.bound.property
    }

    /// The Rust type name of the property values
    #[must_use]
    pub fn get_type_name(&self) -> &'static str {
        type_name::<F>()
    }

    /// The declared return type of the getter
    #[must_use]
    pub fn property_type(&self) -> Option<TypeRc> {
        self.bound.method.return_type()
    }

    /// The getter
    #[must_use]
    pub fn method(&self) -> &MethodRc {
        &self.bound.method
    }

    /// Read the property of `target`.
    ///
    /// # Errors
    /// Returns [`Error::PropertyInvocation`] if the getter fails and [`Error::TypeMismatch`] if
    /// it returns null or something other than an `F`
    pub fn get_value(&self, target: &T) -> Result<F> {
        let value = self.invoke(target)?;
        value
            .downcast::<F>()
            .map_err(|value| self.type_mismatch(&value))
    }

    /// Read the property of `target`, mapping a null result to `None`.
    ///
    /// # Errors
    /// Returns [`Error::PropertyInvocation`] if the getter fails and [`Error::TypeMismatch`] if
    /// it returns something other than an `F`
    pub fn get_value_opt(&self, target: &T) -> Result<Option<F>> {
        let value = self.invoke(target)?;
        value
            .downcast_opt::<F>()
            .map_err(|value| self.type_mismatch(&value))
    }

    fn invoke(&self, target: &T) -> Result<Value> {
        let receiver = self.bound.adapt_ref(target)?;
        self.bound
            .method
            .invoke(receiver, Vec::new())
            .map_err(|failure| self.bound.failure(failure))
    }

    fn type_mismatch(&self, value: &Value) -> Error {
        Error::TypeMismatch {
            property: self.bound.property.clone(),
            type_name: self.bound.owner.name.clone(),
            expected: type_name::<F>(),
            actual: value.type_name(),
        }
    }
}

impl<T, F> Clone for PropertyAccessor<T, F> {
    fn clone(&self) -> Self {
        PropertyAccessor {
            bound: self.bound.clone(),
            _types: PhantomData,
        }
    }
}

impl<T, F> fmt::Display for PropertyAccessor<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bound, f)
    }
}

impl<T, F> fmt::Debug for PropertyAccessor<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("property", &self.bound.property)
            .field("method", &self.bound.method.to_string())
            .field("value_type", &type_name::<F>())
            .finish()
    }
}

/// A writable property
#[derive(Clone)]
pub struct PropertyMutator {
    bound: BoundMethod,
    widening: bool,
}

impl PropertyMutator {
    pub(crate) fn new(
        property: &str,
        method: MethodRc,
        owner: TypeRc,
        registry: Arc<TypeRegistry>,
        widening: bool,
    ) -> Self {
        PropertyMutator {
            bound: BoundMethod {
                property: property.to_string(),
                method,
                owner,
                registry,
            },
            widening,
        }
    }

    /// The property name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.bound.property
    }

    /// The declared parameter type of the setter
    #[must_use]
    pub fn get_type(&self) -> Option<TypeRc> {
        self.bound.method.parameter_type(0)
    }

    /// The setter
    #[must_use]
    pub fn method(&self) -> &MethodRc {
        &self.bound.method
    }

    /// Write `value` to the property of `target`.
    ///
    /// # Errors
    /// Returns [`Error::PropertyInvocation`] if the setter fails, if `target` is not an
    /// instance of the declaring type or if `value` is not accepted by the setter parameter
    pub fn set_value(&self, target: &mut dyn Any, value: Value) -> Result<()> {
        if !self.widening {
            self.check_exact_primitive(&value)?;
        }

        let receiver = self.bound.adapt_mut(target)?;
        self.bound
            .method
            .invoke_mut(receiver, vec![value])
            .map(|_| ())
            .map_err(|failure| self.bound.failure(failure))
    }

    /// Write a concrete value, see [`PropertyMutator::set_value`]
    ///
    /// # Errors
    /// Same as [`PropertyMutator::set_value`]
    pub fn set<V: Any + Send + Sync>(&self, target: &mut dyn Any, value: V) -> Result<()> {
        self.set_value(target, Value::new(value))
    }

    fn check_exact_primitive(&self, value: &Value) -> Result<()> {
        let Some(kind) = self.get_type().and_then(|param| param.primitive_kind()) else {
            return Ok(());
        };
        match value.rust_type() {
            Some(actual) if actual != kind.rust_type() => {
                Err(self.bound.failure(InvocationFailure::IllegalArgument(format!(
                    "argument type mismatch: expected {kind}, got {}",
                    value.type_name()
                ))))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PropertyMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bound, f)
    }
}

impl fmt::Debug for PropertyMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMutator")
            .field("property", &self.bound.property)
            .field("method", &self.bound.method.to_string())
            .field("widening", &self.widening)
            .finish()
    }
}
