//! Configuration of the property lookups
//!
//! This module provides the options controlling how setters are matched against a requested
//! value type and whether discovered property names are memoized.

/// How a setter is chosen among overloads when a null value is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullSetterResolution {
    /// Choose the overload whose parameter type is assignable to every other candidate's
    /// parameter type, falling back to the first candidate if there is none
    #[default]
    Narrowest,
    /// Choose the first candidate in public method order
    FirstDeclared,
}

/// Configuration for property lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionConfig {
    /// Allow primitive widening (`int` to `long`, `char` to `int`, ...) when matching a setter
    /// against a requested value type and when passing values to a setter
    pub primitive_widening: bool,

    /// Tie-break among setter overloads accepting a null value
    pub null_setter_resolution: NullSetterResolution,

    /// Memoize discovered property names per type in the property cache
    pub cache_property_names: bool,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            primitive_widening: true,
            null_setter_resolution: NullSetterResolution::Narrowest,
            cache_property_names: true,
        }
    }
}

impl ReflectionConfig {
    /// Creates a strict configuration
    ///
    /// Setter parameters must match the requested value type without primitive widening, and
    /// null values resolve to the first declared overload.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            primitive_widening: false,
            null_setter_resolution: NullSetterResolution::FirstDeclared,
            cache_property_names: true,
        }
    }

    /// Creates a configuration that recomputes property names on every call
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_property_names: false,
            ..Self::default()
        }
    }
}
