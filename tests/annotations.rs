//! Integration tests for inheritance-aware annotation lookup.
//!
//! The hierarchy used throughout:
//!
//! ```text
//! @Table("accounts")                   interface Auditable   @Tracked(inherited) @Marker
//! class Account                        interface Exported extends Auditable
//! class Savings extends Account
//!     implements Auditable
//! class Bonus extends Savings
//!     implements Exported
//! ```

use std::sync::Arc;

use propscope::prelude::*;

struct Model {
    registry: Arc<TypeRegistry>,
    auditable: TypeRc,
    exported: TypeRc,
    account: TypeRc,
    savings: TypeRc,
    bonus: TypeRc,
    table: AnnotationKindRc,
    tracked: AnnotationKindRc,
    marker: AnnotationKindRc,
}

fn model() -> Result<Model> {
    let registry = Arc::new(TypeRegistry::new()?);
    let table = Arc::new(AnnotationKind::new("orm", "Table"));
    let tracked = Arc::new(AnnotationKind::new("audit", "Tracked").inherited());
    let marker = Arc::new(AnnotationKind::new("audit", "Marker"));

    let auditable = registry
        .interface("audit", "Auditable")
        .annotate(
            Annotation::new(&tracked).with("source", AnnotationValue::String("auditable".into())),
        )
        .annotate(Annotation::new(&marker))
        .build()?;
    let exported = registry
        .interface("audit", "Exported")
        .implements(&auditable)
        .build()?;

    let account = registry
        .class("bank", "Account")
        .annotate(Annotation::new(&table).with("name", AnnotationValue::String("accounts".into())))
        .build()?;
    let savings = registry
        .class("bank", "Savings")
        .extends(&account)
        .implements(&auditable)
        .build()?;
    let bonus = registry
        .class("bank", "Bonus")
        .extends(&savings)
        .implements(&exported)
        .build()?;

    Ok(Model {
        registry,
        auditable,
        exported,
        account,
        savings,
        bonus,
        table,
        tracked,
        marker,
    })
}

fn source(annotation: &AnnotationRc) -> Option<&str> {
    match annotation.argument("source") {
        Some(AnnotationValue::String(source)) => Some(source.as_str()),
        _ => None,
    }
}

/// Plain annotations of a superclass are present on every subclass
#[test]
fn test_plain_annotation_through_superclass_chain() -> Result<()> {
    let model = model()?;
    let reflector = Reflector::with_registry(model.registry.clone());

    for ty in [&model.account, &model.savings, &model.bonus] {
        let found = reflector
            .get_annotation(ty, &model.table)
            .expect("declared on Account");
        assert_eq!(
            found.argument("name"),
            Some(&AnnotationValue::String("accounts".to_string()))
        );
    }
    assert!(reflector
        .get_annotation(&model.auditable, &model.table)
        .is_none());
    Ok(())
}

/// Inherited annotations propagate from interfaces, plain ones do not
#[test]
fn test_interface_annotations_need_the_inherited_marker() -> Result<()> {
    let model = model()?;

    assert!(find_annotation(model.savings.clone(), &model.tracked).is_some());
    assert!(find_annotation(model.bonus.clone(), &model.tracked).is_some());
    assert!(find_annotation(model.account.clone(), &model.tracked).is_none());

    assert!(find_annotation(model.auditable.clone(), &model.marker).is_some());
    assert!(find_annotation(model.savings.clone(), &model.marker).is_none());
    assert!(find_annotation(model.bonus.clone(), &model.marker).is_none());
    Ok(())
}

/// Superinterfaces are searched too
#[test]
fn test_inherited_annotation_through_superinterface() -> Result<()> {
    let model = model()?;

    let found = find_annotation(model.exported.clone(), &model.tracked).expect("via Auditable");
    assert_eq!(source(&found), Some("auditable"));
    Ok(())
}

/// A type's own interfaces are searched before those of its superclass
#[test]
fn test_own_interfaces_before_superclass_interfaces() -> Result<()> {
    let model = model()?;
    model.exported.annotate(
        Annotation::new(&model.tracked).with("source", AnnotationValue::String("exported".into())),
    );

    let found = find_annotation(model.bonus.clone(), &model.tracked).expect("found");
    assert_eq!(source(&found), Some("exported"));

    let found = find_annotation(model.savings.clone(), &model.tracked).expect("found");
    assert_eq!(source(&found), Some("auditable"));
    Ok(())
}

/// The superclass chain is checked before any interface
#[test]
fn test_superclass_annotation_before_interfaces() -> Result<()> {
    let model = model()?;
    model.account.annotate(
        Annotation::new(&model.tracked).with("source", AnnotationValue::String("account".into())),
    );

    let found = find_annotation(model.bonus.clone(), &model.tracked).expect("found");
    assert_eq!(source(&found), Some("account"));
    Ok(())
}

/// Annotation kinds are compared by name, not by identity
#[test]
fn test_kinds_match_by_name() -> Result<()> {
    let model = model()?;
    let table = AnnotationKind::new("orm", "Table");
    let other = AnnotationKind::new("orm", "View");

    assert!(find_annotation(model.bonus.clone(), &table).is_some());
    assert!(find_annotation(model.bonus.clone(), &other).is_none());
    Ok(())
}

/// Nothing is found on the root object type
#[test]
fn test_root_object_has_no_annotations() -> Result<()> {
    let model = model()?;
    let object = model.registry.object_type();

    assert!(find_annotation(object.clone(), &model.table).is_none());
    assert!(find_annotation(object, &model.tracked).is_none());
    Ok(())
}
