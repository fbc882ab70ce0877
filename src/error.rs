use std::{error::Error as StdError, fmt};

use thiserror::Error;

/// Boxed error raised by a method body or by the invocation machinery.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

macro_rules! internal_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InternalConsistency {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InternalConsistency {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Describes which accessor was requested when a property lookup failed.
///
/// The `Display` implementation renders the part of the [`Error::NoSuchProperty`] message
/// that names the accessor, e.g. `setter method for property 'label' of type String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyLookup {
    /// A `get`/`is` style getter was requested
    Getter {
        /// Requested property name
        property: String,
    },
    /// A `set` style mutator was requested
    Setter {
        /// Requested property name
        property: String,
        /// Simple name of the requested value type, `None` when a null value was requested
        value_type: Option<String>,
    },
}

impl PropertyLookup {
    /// The property name this lookup was performed for
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            PropertyLookup::Getter { property } | PropertyLookup::Setter { property, .. } => {
                property
            }
        }
    }

    /// Returns `true` if the lookup asked for a setter accepting a null value
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        matches!(
            self,
            PropertyLookup::Setter {
                value_type: None,
                ..
            }
        )
    }
}

impl fmt::Display for PropertyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyLookup::Getter { property } => {
                write!(f, "getter method for property '{property}'")
            }
            PropertyLookup::Setter {
                property,
                value_type: Some(value_type),
            } => write!(
                f,
                "setter method for property '{property}' of type {value_type}"
            ),
            PropertyLookup::Setter {
                property,
                value_type: None,
            } => write!(
                f,
                "setter method for property '{property}' accepting null value"
            ),
        }
    }
}

/// Where an invocation failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FailureOrigin {
    /// The failure was raised inside the invoked method body. The source is the original
    /// failure, unwrapped, and can be recovered with [`Error::original`].
    #[strum(to_string = "raised by method body")]
    Target,
    /// The invocation itself could not be performed (abstract method, wrong receiver,
    /// illegal argument, ...). The source describes the mechanism failure.
    #[strum(to_string = "raised by invocation")]
    Mechanism,
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Lookup Errors
/// - [`Error::NoSuchProperty`] - Requested getter or setter could not be located
/// - [`Error::InvalidPropertyName`] - Empty property name supplied
///
/// ## Invocation Errors
/// - [`Error::TypeMismatch`] - Getter returned a value not assignable to the expected type
/// - [`Error::PropertyInvocation`] - Invoking the accessor or mutator failed
///
/// ## Type System Errors
/// - [`Error::TypeNotRegistered`] - A Rust type has no registered runtime type
/// - [`Error::TypeInsert`] - Failed to register a new type
/// - [`Error::TypeError`] - Invalid type definition
///
/// ## Internal Errors
/// - [`Error::InternalConsistency`] - A condition that should be unreachable
/// - [`Error::LockError`] - Thread synchronization failure
///
/// # Examples
///
/// ```rust,no_run
/// use propscope::{Error, Reflector};
/// # #[derive(Default)] struct Point { x: i32 }
///
/// let reflector = Reflector::new()?;
/// match reflector.readable_property::<Point, i32>("x") {
///     Ok(accessor) => println!("found {accessor}"),
///     Err(Error::NoSuchProperty { lookup, type_name }) => {
///         eprintln!("no {lookup} on {type_name}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok::<(), propscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The requested getter or setter could not be located on the target type.
    ///
    /// # Fields
    ///
    /// * `lookup` - Which accessor was requested, for which property
    /// * `type_name` - Simple name of the type that was searched
    #[error("Could not find {lookup} on class {type_name}.")]
    NoSuchProperty {
        /// The accessor that was searched for
        lookup: PropertyLookup,
        /// Simple name of the searched type
        type_name: String,
    },

    /// A resolved getter returned a value that is not assignable to the caller's expected type.
    #[error("Value of property '{property}' on class {type_name} is a {actual}, expected {expected}")]
    TypeMismatch {
        /// Property name
        property: String,
        /// Simple name of the declaring type
        type_name: String,
        /// Rust type name the caller asked for
        expected: &'static str,
        /// Rust type name of the returned value (`null` for a null value)
        actual: &'static str,
    },

    /// Invoking the underlying accessor or mutator failed.
    ///
    /// When `origin` is [`FailureOrigin::Target`], `source` is the failure raised by the
    /// method body itself and can be recovered with [`Error::original`].
    #[error("Invocation of property '{property}' on class {type_name} failed ({origin}): {source}")]
    PropertyInvocation {
        /// Property name
        property: String,
        /// Simple name of the declaring type
        type_name: String,
        /// Whether the failure originated inside the body or from the invocation itself
        origin: FailureOrigin,
        /// The underlying failure
        #[source]
        source: BoxError,
    },

    /// A condition that should be unreachable was hit.
    ///
    /// The error includes the source location where the inconsistency was detected.
    #[error("Internal consistency failure - {file}:{line}: {message}")]
    InternalConsistency {
        /// The message to be printed for the failure
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Property names must contain at least one character.
    #[error("Property name must not be empty")]
    InvalidPropertyName,

    /// The Rust type has not been bound to any registered runtime type.
    #[error("Type is not registered - {0}")]
    TypeNotRegistered(String),

    /// Failed to insert new type into the `TypeRegistry`.
    ///
    /// The associated string is the full name of the conflicting type.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(String),

    /// General error for invalid type definitions.
    #[error("{0}")]
    TypeError(String),

    /// Failed to lock target.
    ///
    /// This error occurs when a mutex was poisoned by a panicking thread.
    #[error("Failed to lock target")]
    LockError,
}

impl Error {
    /// Returns the failure raised inside an invoked method body, downcast to `E`.
    ///
    /// Returns `None` for every other error, for mechanism failures and when the original
    /// failure is of a different type.
    #[must_use]
    pub fn original<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Error::PropertyInvocation {
                origin: FailureOrigin::Target,
                source,
                ..
            } => source.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns the property name this error refers to, if any
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self {
            Error::NoSuchProperty { lookup, .. } => Some(lookup.property()),
            Error::TypeMismatch { property, .. } | Error::PropertyInvocation { property, .. } => {
                Some(property)
            }
            _ => None,
        }
    }
}
