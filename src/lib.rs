// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # propscope
//!
//! [![Crates.io](https://img.shields.io/crates/v/propscope.svg)](https://crates.io/crates/propscope)
//! [![Documentation](https://docs.rs/propscope/badge.svg)](https://docs.rs/propscope)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/propscope/blob/main/LICENSE-APACHE)
//!
//! Bean-style property reflection for Rust. Types are registered once in a runtime type model,
//! together with their superclass, interfaces, methods and annotations. `propscope` then finds
//! the getter or setter of a property by naming convention, hands out typed handles to read and
//! write it, enumerates and caches the full property surface of a type, and looks up annotations
//! along the inheritance hierarchy.
//!
//! ## Features
//!
//! - **🔍 Property lookup** - `getX`, `isFlag` and `setX` accessors located by name
//! - **🧩 Overload resolution** - Deterministic choice among setter overloads, including for null values
//! - **📦 Weak-keyed caching** - Property surfaces are memoized without keeping types alive
//! - **🏷️ Annotation inheritance** - Superclass and interface propagation, per annotation kind
//! - **🛡️ Typed failures** - Failures raised by accessor bodies stay recoverable as their original type
//! - **⚡ Thread-safe** - Registry, cache and handles can be shared across threads
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use propscope::prelude::*;
//!
//! struct Point { x: i32 }
//!
//! let registry = Arc::new(TypeRegistry::new()?);
//! registry
//!     .class("geom", "Point")
//!     .binds::<Point>()
//!     .getter("getX", &registry.primitive(PrimitiveKind::I32), |p: &Point| p.x)
//!     .build()?;
//!
//! let reflector = Reflector::with_registry(registry);
//! let x = reflector.readable_property::<Point, i32>("x")?;
//! assert_eq!(x.get_value(&Point { x: 5 })?, 5);
//!
//! let names = reflector.property_names(&Point { x: 1 })?;
//! assert!(names.contains("x"));
//! # Ok::<(), propscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - The runtime type model: types, methods, values and annotations
//! - [`reflect`] - Property lookups, typed handles, property surfaces and the [`Reflector`]
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust,no_run
//! use propscope::{Error, Reflector};
//! # struct Point;
//!
//! let reflector = Reflector::new()?;
//! match reflector.readable_property::<Point, i32>("x") {
//!     Ok(accessor) => println!("found {accessor}"),
//!     Err(Error::NoSuchProperty { lookup, type_name }) => println!("no {lookup} on {type_name}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! # Ok::<(), propscope::Error>(())
//! ```
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use propscope::prelude::*;
///
/// let reflector = Reflector::new()?;
/// assert!(reflector.has_default_string_representation(&Object)?);
/// # Ok::<(), propscope::Error>(())
/// ```
pub mod prelude;

/// The runtime type model the property lookups work on
///
/// # Key Components
///
/// - [`metadata::typesystem`] - Registered types, the registry and the type builder
/// - [`metadata::method`] - Method descriptors and their invocable bodies
/// - [`metadata::annotations`] - Type-level annotations and their inheritance-aware lookup
/// - [`metadata::value`] - Dynamically typed argument and return values
/// - [`metadata::token`] - Identifiers of registered types
pub mod metadata;

/// Bean-style property reflection
///
/// See [`Reflector`] for the entry point.
pub mod reflect;

/// `propscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `propscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Error details: the failed lookup, the origin of an invocation failure and boxed sources
pub use error::{BoxError, FailureOrigin, PropertyLookup};

/// The entry point for property lookups, see [`reflect::Reflector`]
pub use reflect::Reflector;

/// Typed property handles and lookup configuration
pub use reflect::{
    NullSetterResolution, PropertyAccessor, PropertyCache, PropertyMutator, ReflectionConfig,
};

/// The root object type and dynamically typed values
pub use metadata::{typesystem::Object, value::Value};
