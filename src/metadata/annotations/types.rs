//! Annotation kinds, instances and argument values.

use std::{fmt, sync::Arc};

/// A reference-counted pointer to an `AnnotationKind`
pub type AnnotationKindRc = Arc<AnnotationKind>;
/// A reference-counted pointer to an `Annotation`
pub type AnnotationRc = Arc<Annotation>;
/// A vector that holds a list of `Annotation` instances for storage on types
pub type AnnotationList = Arc<boxcar::Vec<AnnotationRc>>;

/// The declaration of an annotation type.
///
/// Kinds are identified by namespace and name. A kind marked as inherited propagates from
/// interfaces to the classes implementing them during annotation lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationKind {
    /// Namespace of the annotation type
    pub namespace: String,
    /// Simple name of the annotation type
    pub name: String,
    inherited: bool,
}

impl AnnotationKind {
    /// Declare a kind that is not marked as inherited
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        AnnotationKind {
            namespace: namespace.into(),
            name: name.into(),
            inherited: false,
        }
    }

    /// Mark the kind as inherited
    #[must_use]
    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Returns `true` if the kind carries the inheritance marker
    #[must_use]
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    /// `namespace.name`, or `name` if the namespace is empty
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns `true` if both declarations denote the same annotation type
    #[must_use]
    pub fn matches(&self, other: &AnnotationKind) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.fullname())
    }
}

/// Represents a single annotation argument value
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Type reference (as full name)
    Type(String),
    /// Enum constant (enum type full name + constant name)
    Enum(String, String),
    /// Array of values
    Array(Vec<AnnotationValue>),
}

/// A named annotation argument
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArgument {
    /// Name of the annotation element
    pub name: String,
    /// Value of the element
    pub value: AnnotationValue,
}

/// An annotation instance declared on a type
#[derive(Debug, Clone)]
pub struct Annotation {
    /// The annotation type
    pub kind: AnnotationKindRc,
    /// Arguments in declaration order
    pub arguments: Vec<AnnotationArgument>,
}

impl Annotation {
    /// Create an annotation of `kind` without arguments
    #[must_use]
    pub fn new(kind: &AnnotationKindRc) -> Self {
        Annotation {
            kind: kind.clone(),
            arguments: Vec::new(),
        }
    }

    /// Add a named argument
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.arguments.push(AnnotationArgument {
            name: name.into(),
            value,
        });
        self
    }

    /// Value of the argument called `name`
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&AnnotationValue> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.arguments.is_empty() {
            return Ok(());
        }

        let arguments = self
            .arguments
            .iter()
            .map(|argument| format!("{}={:?}", argument.name, argument.value))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({arguments})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_identity_ignores_marker() {
        let plain = AnnotationKind::new("app", "Audited");
        let inherited = AnnotationKind::new("app", "Audited").inherited();
        assert!(plain.matches(&inherited));
        assert!(!plain.is_inherited());
        assert!(inherited.is_inherited());
        assert!(!plain.matches(&AnnotationKind::new("other", "Audited")));
        assert_eq!(plain.to_string(), "@app.Audited");
    }

    #[test]
    fn test_annotation_arguments() {
        let kind = Arc::new(AnnotationKind::new("", "Since"));
        let annotation = Annotation::new(&kind)
            .with("version", AnnotationValue::String("1.2".to_string()))
            .with("level", AnnotationValue::Int(3));

        assert_eq!(
            annotation.argument("level"),
            Some(&AnnotationValue::Int(3))
        );
        assert!(annotation.argument("missing").is_none());
        assert_eq!(
            annotation.to_string(),
            "@Since(version=String(\"1.2\"), level=Int(3))"
        );
    }
}
