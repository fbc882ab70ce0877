//! Executable bodies of reflected methods.
//!
//! A body is a type-erased closure receiving the receiver as `&dyn Any` (or `&mut dyn Any`) and
//! the already coerced arguments. The helpers in this module recover the concrete receiver and
//! argument types inside such closures and report mismatches as
//! [`InvocationFailure::IllegalArgument`].

use std::{
    any::{type_name, Any},
    fmt,
    sync::Arc,
};

use crate::metadata::{method::InvocationFailure, value::Value};

/// Result of invoking a method body
pub type InvokeResult = std::result::Result<Value, InvocationFailure>;

/// Body that only reads its receiver
pub type SharedBody = Arc<dyn Fn(&dyn Any, Vec<Value>) -> InvokeResult + Send + Sync>;

/// Body that mutates its receiver
pub type ExclusiveBody = Arc<dyn Fn(&mut dyn Any, Vec<Value>) -> InvokeResult + Send + Sync>;

/// The implementation of a reflected method
#[derive(Clone)]
pub enum MethodBody {
    /// No implementation, invoking fails with an access failure
    Abstract,
    /// Implementation borrowing the receiver immutably
    Shared(SharedBody),
    /// Implementation borrowing the receiver mutably
    Exclusive(ExclusiveBody),
}

impl MethodBody {
    /// Returns `true` if there is no implementation
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        matches!(self, MethodBody::Abstract)
    }

    /// Returns `true` if the body needs a mutable receiver
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        matches!(self, MethodBody::Exclusive(_))
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodBody::Abstract => write!(f, "Abstract"),
            MethodBody::Shared(_) => write!(f, "Shared(..)"),
            MethodBody::Exclusive(_) => write!(f, "Exclusive(..)"),
        }
    }
}

/// Borrow the receiver of a shared body as a `T`
///
/// # Errors
/// Returns [`InvocationFailure::IllegalArgument`] if the receiver is not a `T`
pub fn receiver<T: Any>(target: &dyn Any) -> Result<&T, InvocationFailure> {
    target
        .downcast_ref::<T>()
        .ok_or_else(|| not_an_instance::<T>())
}

/// Borrow the receiver of an exclusive body as a `T`
///
/// # Errors
/// Returns [`InvocationFailure::IllegalArgument`] if the receiver is not a `T`
pub fn receiver_mut<T: Any>(target: &mut dyn Any) -> Result<&mut T, InvocationFailure> {
    target
        .downcast_mut::<T>()
        .ok_or_else(|| not_an_instance::<T>())
}

/// Take the single argument of a body as a `P`
///
/// # Errors
/// Returns [`InvocationFailure::IllegalArgument`] if no argument was passed, if it is null or
/// if it holds a different type
pub fn argument<P: Any>(args: Vec<Value>) -> Result<P, InvocationFailure> {
    nullable_argument::<P>(args)?.ok_or_else(|| {
        InvocationFailure::IllegalArgument(format!(
            "argument type mismatch: expected {}, got null",
            type_name::<P>()
        ))
    })
}

/// Take the single argument of a body as an optional `P`, mapping null to `None`
///
/// # Errors
/// Returns [`InvocationFailure::IllegalArgument`] if no argument was passed or if it holds a
/// different type
pub fn nullable_argument<P: Any>(args: Vec<Value>) -> Result<Option<P>, InvocationFailure> {
    let value = args.into_iter().next().ok_or_else(|| {
        InvocationFailure::IllegalArgument("wrong number of arguments".to_string())
    })?;
    value.downcast_opt::<P>().map_err(|value| {
        InvocationFailure::IllegalArgument(format!(
            "argument type mismatch: expected {}, got {}",
            type_name::<P>(),
            value.type_name()
        ))
    })
}

fn not_an_instance<T>() -> InvocationFailure {
    InvocationFailure::IllegalArgument(format!(
        "object is not an instance of declaring class {}",
        type_name::<T>()
    ))
}
