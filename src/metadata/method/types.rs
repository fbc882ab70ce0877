//! Method modifier flags and invocation failures for reflected methods.
//!
//! # Key Types
//! - [`MethodModifiers`]: Visibility, abstractness and null handling of a method
//! - [`InvocationFailure`]: Why a call through a [`crate::metadata::method::MethodBody`] failed

use bitflags::bitflags;
use thiserror::Error;

use crate::{error::BoxError, error::FailureOrigin};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method modifier flags
    pub struct MethodModifiers: u32 {
        /// Method is visible to reflective lookups
        const PUBLIC = 0x0001;
        /// Method has no body and must be implemented by a subtype
        const ABSTRACT = 0x0400;
        /// The body rejects null for its reference typed parameters
        const REJECTS_NULL = 0x0800;
    }
}

impl Default for MethodModifiers {
    fn default() -> Self {
        MethodModifiers::PUBLIC
    }
}

/// A failed call of a reflected method.
///
/// `Target` carries the failure raised by the method body itself; every other variant describes
/// a failure of the invocation mechanism.
#[derive(Debug, Error)]
pub enum InvocationFailure {
    /// The method body ran and returned an error
    #[error(transparent)]
    Target(BoxError),

    /// The method cannot be called (abstract, or the body requires exclusive access)
    #[error("illegal access: {0}")]
    IllegalAccess(String),

    /// The receiver or an argument did not match the method signature
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
}

impl InvocationFailure {
    /// Wrap an error raised inside a method body
    pub fn target<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        InvocationFailure::Target(error.into())
    }

    /// Where this failure originated
    #[must_use]
    pub fn origin(&self) -> FailureOrigin {
        match self {
            InvocationFailure::Target(_) => FailureOrigin::Target,
            InvocationFailure::IllegalAccess(_) | InvocationFailure::IllegalArgument(_) => {
                FailureOrigin::Mechanism
            }
        }
    }

    /// Unwraps one level: the body's own error for `Target`, the failure itself otherwise
    #[must_use]
    pub fn into_source(self) -> BoxError {
        match self {
            InvocationFailure::Target(source) => source,
            other => Box::new(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_modifiers_are_public() {
        let modifiers = MethodModifiers::default();
        assert!(modifiers.contains(MethodModifiers::PUBLIC));
        assert!(!modifiers.contains(MethodModifiers::ABSTRACT));
    }

    #[test]
    fn test_target_failure_unwraps_one_level() {
        let failure = InvocationFailure::target(std::fmt::Error);
        assert_eq!(failure.origin(), FailureOrigin::Target);
        let source = failure.into_source();
        assert!(source.downcast_ref::<std::fmt::Error>().is_some());
    }

    #[test]
    fn test_mechanism_failure_keeps_itself() {
        let failure = InvocationFailure::IllegalAccess("abstract method".to_string());
        assert_eq!(failure.origin(), FailureOrigin::Mechanism);
        let source = failure.into_source();
        assert_eq!(source.to_string(), "illegal access: abstract method");
        assert!(source.downcast_ref::<InvocationFailure>().is_some());
    }
}
