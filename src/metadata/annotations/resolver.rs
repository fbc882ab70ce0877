//! Inheritance-aware annotation lookup.
//!
//! The search runs as an explicit depth-first state machine over a [`TypeHierarchy`]. For the
//! type the search starts on, the annotation present on the type itself is checked first. Then,
//! if the kind is marked as inherited, every directly implemented interface is searched in
//! declaration order, each of them again including its own superinterfaces. Last, the
//! superclass is visited without checking it directly (that check was already part of the
//! first step, which covers the whole superclass chain) so that the interfaces implemented at
//! every level of the chain are searched too.
//!
//! Traversal order: self, own interfaces, superclass, superclass's interfaces, and so on. The
//! first match wins.

use crate::metadata::annotations::{AnnotationKind, AnnotationRc};

/// The view of a type hierarchy the annotation lookup needs.
pub trait TypeHierarchy: Clone {
    /// The annotation of `kind` declared directly on this type
    fn declared_annotation(&self, kind: &AnnotationKind) -> Option<AnnotationRc>;

    /// The direct superclass, `None` for interfaces and the root object type
    fn superclass(&self) -> Option<Self>;

    /// The directly implemented (or extended) interfaces in declaration order
    fn direct_interfaces(&self) -> Vec<Self>;

    /// Returns `true` for interfaces
    fn is_interface(&self) -> bool;

    /// Returns `true` for the universal root object type
    fn is_root_object(&self) -> bool;

    /// The annotation of `kind` present on this type: declared on it or, for classes, on any
    /// class of its superclass chain.
    fn annotation(&self, kind: &AnnotationKind) -> Option<AnnotationRc> {
        if let Some(found) = self.declared_annotation(kind) {
            return Some(found);
        }
        if self.is_interface() {
            return None;
        }

        let mut current = self.superclass();
        while let Some(ty) = current {
            if let Some(found) = ty.declared_annotation(kind) {
                return Some(found);
            }
            current = ty.superclass();
        }
        None
    }
}

/// Pending work of the search
enum Step<H> {
    /// Check the annotations present on the type
    CheckSelf(H),
    /// Queue the interfaces of the type, if the kind is inherited
    Interfaces(H),
    /// Queue the superclass of the type
    Superclass(H),
}

/// Find the annotation of `kind` on `ty`, searching the hierarchy as described in the module
/// documentation. Returns `None` if nothing is found anywhere.
pub fn find_annotation<H: TypeHierarchy>(ty: H, kind: &AnnotationKind) -> Option<AnnotationRc> {
    let mut stack = Vec::new();
    push_visit(&mut stack, ty, true);

    while let Some(step) = stack.pop() {
        match step {
            Step::CheckSelf(ty) => {
                if let Some(found) = ty.annotation(kind) {
                    return Some(found);
                }
            }
            Step::Interfaces(ty) => {
                if kind.is_inherited() {
                    for interface in ty.direct_interfaces().into_iter().rev() {
                        push_visit(&mut stack, interface, true);
                    }
                }
            }
            Step::Superclass(ty) => {
                if ty.is_interface() || ty.is_root_object() {
                    continue;
                }
                if let Some(superclass) = ty.superclass() {
                    push_visit(&mut stack, superclass, false);
                }
            }
        }
    }

    None
}

/// Schedule a visit of `ty`. Steps are pushed in reverse so they pop in visiting order.
fn push_visit<H: TypeHierarchy>(stack: &mut Vec<Step<H>>, ty: H, check_self: bool) {
    stack.push(Step::Superclass(ty.clone()));
    if check_self {
        stack.push(Step::Interfaces(ty.clone()));
        stack.push(Step::CheckSelf(ty));
    } else {
        stack.push(Step::Interfaces(ty));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
        sync::Arc,
    };

    use super::*;
    use crate::metadata::annotations::Annotation;

    /// Hierarchy node recording every direct annotation query
    #[derive(Clone)]
    struct Node {
        name: &'static str,
        interface: bool,
        superclass: Option<Box<Node>>,
        interfaces: Vec<Node>,
        annotations: Vec<AnnotationRc>,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Node {
        fn class(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Self {
            Node {
                name,
                interface: false,
                superclass: None,
                interfaces: Vec::new(),
                annotations: Vec::new(),
                log: log.clone(),
            }
        }

        fn interface(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Self {
            Node {
                interface: true,
                ..Node::class(name, log)
            }
        }

        fn extends(mut self, superclass: Node) -> Self {
            self.superclass = Some(Box::new(superclass));
            self
        }

        fn implements(mut self, interface: Node) -> Self {
            self.interfaces.push(interface);
            self
        }

        fn annotated(mut self, kind: &Arc<AnnotationKind>) -> Self {
            self.annotations.push(Arc::new(Annotation::new(kind)));
            self
        }
    }

    impl TypeHierarchy for Node {
        fn declared_annotation(&self, kind: &AnnotationKind) -> Option<AnnotationRc> {
            self.log.borrow_mut().push(self.name);
            self.annotations
                .iter()
                .find(|annotation| annotation.kind.matches(kind))
                .cloned()
        }

        fn superclass(&self) -> Option<Self> {
            self.superclass.as_deref().cloned()
        }

        fn direct_interfaces(&self) -> Vec<Self> {
            self.interfaces.clone()
        }

        fn is_interface(&self) -> bool {
            self.interface
        }

        fn is_root_object(&self) -> bool {
            self.name == "Object"
        }
    }

    fn hierarchy(
        log: &Rc<RefCell<Vec<&'static str>>>,
        on_base_interface: Option<&Arc<AnnotationKind>>,
    ) -> Node {
        let mut j = Node::interface("J", log);
        if let Some(kind) = on_base_interface {
            j = j.annotated(kind);
        }
        let object = Node::class("Object", log);
        let base = Node::class("Base", log).extends(object).implements(j);
        let mid = Node::class("Mid", log)
            .extends(base)
            .implements(Node::interface("I", log).implements(Node::interface("K", log)));
        Node::class("Leaf", log).extends(mid)
    }

    #[test]
    fn test_inherited_kind_visits_interfaces_depth_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let kind = AnnotationKind::new("test", "Missing").inherited();

        assert!(find_annotation(hierarchy(&log, None), &kind).is_none());
        assert_eq!(
            *log.borrow(),
            vec!["Leaf", "Mid", "Base", "Object", "I", "K", "J"]
        );
    }

    #[test]
    fn test_plain_kind_skips_interfaces() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let kind = AnnotationKind::new("test", "Missing");

        assert!(find_annotation(hierarchy(&log, None), &kind).is_none());
        assert_eq!(*log.borrow(), vec!["Leaf", "Mid", "Base", "Object"]);
    }

    #[test]
    fn test_inherited_kind_found_on_superclass_interface() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let kind = Arc::new(AnnotationKind::new("test", "Tagged").inherited());

        let found = find_annotation(hierarchy(&log, Some(&kind)), &kind);
        assert!(found.is_some_and(|annotation| annotation.kind.matches(&kind)));
        assert_eq!(log.borrow().last(), Some(&"J"));
    }

    #[test]
    fn test_plain_kind_on_interface_is_not_found_from_class() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let kind = Arc::new(AnnotationKind::new("test", "Tagged"));

        assert!(find_annotation(hierarchy(&log, Some(&kind)), &kind).is_none());
    }

    #[test]
    fn test_interface_checks_only_itself() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let kind = AnnotationKind::new("test", "Missing");
        let interface = Node::interface("I", &log).implements(Node::interface("K", &log));

        assert!(find_annotation(interface, &kind).is_none());
        assert_eq!(*log.borrow(), vec!["I"]);
    }
}
