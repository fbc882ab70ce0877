//! Accessor classification and property name derivation.
//!
//! A method is a property accessor purely by naming convention:
//!
//! | Kind                        | Name            | Parameters | Return type      |
//! |-----------------------------|-----------------|------------|------------------|
//! | [`AccessorKind::GetGetter`] | `get` + Name    | 0          | any              |
//! | [`AccessorKind::IsGetter`]  | `is` + Name     | 0          | `boolean`        |
//! | [`AccessorKind::Setter`]    | `set` + Name    | 1          | any              |
//!
//! Method names for a property are derived by capitalizing the first character of the property
//! name, property names of a method by decapitalizing what follows the prefix.

use std::fmt;

use crate::{
    metadata::method::MethodDescriptor,
    Error::InvalidPropertyName,
    Result,
};

/// Prefix of `get` style getters
pub const GET_PREFIX: &str = "get";
/// Prefix of `is` style boolean getters
pub const IS_PREFIX: &str = "is";
/// Prefix of setters
pub const SET_PREFIX: &str = "set";

/// The accessor kind of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// `getName()`
    GetGetter,
    /// `isName()` returning `boolean`
    IsGetter,
    /// `setName(value)`
    Setter,
    /// A property with more than one setter overload
    Overloaded,
    /// Not an accessor
    None,
}

impl AccessorKind {
    /// Classify a method by name, parameter count and whether it returns `boolean`
    #[must_use]
    pub fn classify(name: &str, param_count: usize, returns_boolean: bool) -> AccessorKind {
        let has_prefix =
            |prefix: &str| name.len() > prefix.len() && name.starts_with(prefix);

        if param_count == 0 && has_prefix(GET_PREFIX) {
            AccessorKind::GetGetter
        } else if param_count == 0 && returns_boolean && has_prefix(IS_PREFIX) {
            AccessorKind::IsGetter
        } else if param_count == 1 && has_prefix(SET_PREFIX) {
            AccessorKind::Setter
        } else {
            AccessorKind::None
        }
    }

    /// Classify a method descriptor
    #[must_use]
    pub fn of(method: &MethodDescriptor) -> AccessorKind {
        let returns_boolean = method
            .return_type()
            .is_some_and(|ret| ret.is_boolean());
        AccessorKind::classify(&method.name, method.param_count(), returns_boolean)
    }

    /// Returns `true` for both getter kinds
    #[must_use]
    pub fn is_getter(&self) -> bool {
        matches!(self, AccessorKind::GetGetter | AccessorKind::IsGetter)
    }

    /// Returns `true` for setters and overloaded setters
    #[must_use]
    pub fn is_setter(&self) -> bool {
        matches!(self, AccessorKind::Setter | AccessorKind::Overloaded)
    }

    /// The method name prefix of this kind
    #[must_use]
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            AccessorKind::GetGetter => Some(GET_PREFIX),
            AccessorKind::IsGetter => Some(IS_PREFIX),
            AccessorKind::Setter | AccessorKind::Overloaded => Some(SET_PREFIX),
            AccessorKind::None => None,
        }
    }

    /// The property a method of this kind called `method_name` accesses
    #[must_use]
    pub fn property_name(&self, method_name: &str) -> Option<String> {
        let rest = method_name.strip_prefix(self.prefix()?)?;
        (!rest.is_empty()).then(|| decapitalize(rest))
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessorKind::GetGetter => "getter",
            AccessorKind::IsGetter => "boolean getter",
            AccessorKind::Setter => "setter",
            AccessorKind::Overloaded => "overloaded setter",
            AccessorKind::None => "none",
        };
        write!(f, "{name}")
    }
}

/// `prefix` followed by `property` with its first character upper-cased.
///
/// # Errors
/// Returns [`crate::Error::InvalidPropertyName`] for an empty property name
pub fn method_name(prefix: &str, property: &str) -> Result<String> {
    let mut chars = property.chars();
    let first = chars.next().ok_or(InvalidPropertyName)?;

    let mut name = String::with_capacity(prefix.len() + property.len());
    name.push_str(prefix);
    name.extend(first.to_uppercase());
    name.push_str(chars.as_str());
    Ok(name)
}

/// Bean-style decapitalization: `Name` becomes `name`, but a name starting with two upper-case
/// characters is kept as is (`URL` stays `URL`).
#[must_use]
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }

    let mut result = String::with_capacity(name.len());
    result.extend(first.to_lowercase());
    result.push_str(&name[first.len_utf8()..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_getters() {
        assert_eq!(AccessorKind::classify("getX", 0, false), AccessorKind::GetGetter);
        assert_eq!(AccessorKind::classify("getFlag", 0, true), AccessorKind::GetGetter);
        assert_eq!(AccessorKind::classify("isFlag", 0, true), AccessorKind::IsGetter);
        assert_eq!(AccessorKind::classify("isFlag", 0, false), AccessorKind::None);
        assert_eq!(AccessorKind::classify("getX", 1, false), AccessorKind::None);
        assert_eq!(AccessorKind::classify("get", 0, false), AccessorKind::None);
        assert_eq!(AccessorKind::classify("is", 0, true), AccessorKind::None);
    }

    #[test]
    fn test_classify_setters() {
        assert_eq!(AccessorKind::classify("setX", 1, false), AccessorKind::Setter);
        assert_eq!(AccessorKind::classify("setX", 0, false), AccessorKind::None);
        assert_eq!(AccessorKind::classify("setX", 2, false), AccessorKind::None);
        assert_eq!(AccessorKind::classify("set", 1, false), AccessorKind::None);
        assert_eq!(AccessorKind::classify("reset", 1, false), AccessorKind::None);
    }

    #[test]
    fn test_kind_predicates() {
        assert!(AccessorKind::IsGetter.is_getter());
        assert!(AccessorKind::Overloaded.is_setter());
        assert!(!AccessorKind::None.is_getter());
        assert_eq!(AccessorKind::Overloaded.prefix(), Some(SET_PREFIX));
        assert_eq!(AccessorKind::None.prefix(), None);
        assert_eq!(AccessorKind::IsGetter.to_string(), "boolean getter");
    }

    #[test]
    fn test_method_name() {
        assert_eq!(method_name(GET_PREFIX, "x").ok().as_deref(), Some("getX"));
        assert_eq!(method_name(IS_PREFIX, "flag").ok().as_deref(), Some("isFlag"));
        assert_eq!(method_name(SET_PREFIX, "fooBar").ok().as_deref(), Some("setFooBar"));
        assert_eq!(method_name(GET_PREFIX, "URL").ok().as_deref(), Some("getURL"));
        assert_eq!(method_name(GET_PREFIX, "ärger").ok().as_deref(), Some("getÄrger"));
        assert!(matches!(method_name(GET_PREFIX, ""), Err(InvalidPropertyName)));
    }

    #[test]
    fn test_property_name() {
        assert_eq!(
            AccessorKind::GetGetter.property_name("getFirstName").as_deref(),
            Some("firstName")
        );
        assert_eq!(
            AccessorKind::IsGetter.property_name("isActive").as_deref(),
            Some("active")
        );
        assert_eq!(
            AccessorKind::Setter.property_name("setURL").as_deref(),
            Some("URL")
        );
        assert_eq!(AccessorKind::Setter.property_name("set"), None);
        assert_eq!(AccessorKind::None.property_name("getX"), None);
    }

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("Name"), "name");
        assert_eq!(decapitalize("X"), "x");
        assert_eq!(decapitalize("URL"), "URL");
        assert_eq!(decapitalize("Url"), "url");
        assert_eq!(decapitalize("x"), "x");
        assert_eq!(decapitalize(""), "");
    }
}
