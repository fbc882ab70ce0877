//! Shared fixtures for unit tests.
//!
//! [`Fixture::new`] registers the following types in a fresh registry:
//!
//! ```text
//! @Audited @Documented(inherited)
//! interface Named { getTitle(); getName() }
//!
//! @Entity(table = "bases")
//! class Base                      getId, isActive, setActive, getTag, (private) secret
//! class Mid extends Base
//!     implements Named            getLevel, getName
//! class Leaf extends Mid          getDepth, toString
//!
//! class Point                     getX, getY, setX, getLabel, setLabel, setWeight(long),
//!                                 getBroken, setBroken
//! class Widget                    setter overloads and non-accessors
//! ```

mod types;

use std::{
    any::Any,
    collections::BTreeSet,
    sync::{atomic::AtomicUsize, atomic::Ordering, Arc},
};

pub use types::*;

use crate::{
    metadata::{
        annotations::{Annotation, AnnotationKind, AnnotationKindRc, AnnotationValue},
        method::{receiver_mut, InvokeResult, MethodBuilder},
        typesystem::{PrimitiveKind, TypeRc, TypeRegistry},
        value::Value,
    },
    reflect::{ClassInspector, PropertyCache, Reflector, TypeIntrospector},
    Result,
};

pub struct Fixture {
    pub registry: Arc<TypeRegistry>,
    pub named: TypeRc,
    pub base: TypeRc,
    pub mid: TypeRc,
    pub leaf: TypeRc,
    pub point: TypeRc,
    pub widget: TypeRc,
    /// Plain annotation declared on `Base`
    pub entity: AnnotationKindRc,
    /// Inherited annotation declared on `Named`
    pub documented: AnnotationKindRc,
    /// Plain annotation declared on `Named`
    pub audited: AnnotationKindRc,
}

impl Fixture {
    pub fn new() -> Self {
        let registry = Arc::new(TypeRegistry::new().expect("registry should build"));
        let boolean = registry.primitive(PrimitiveKind::Boolean);
        let int = registry.primitive(PrimitiveKind::I32);
        let long = registry.primitive(PrimitiveKind::I64);
        let double = registry.primitive(PrimitiveKind::F64);
        let string = registry.string_type();
        let object = registry.object_type();

        let entity = Arc::new(AnnotationKind::new("test", "Entity"));
        let documented = Arc::new(AnnotationKind::new("test", "Documented").inherited());
        let audited = Arc::new(AnnotationKind::new("test", "Audited"));

        let named = registry
            .interface("test", "Named")
            .annotate(Annotation::new(&audited))
            .annotate(Annotation::new(&documented))
            .method(MethodBuilder::new("getTitle").returns(&string))
            .method(MethodBuilder::new("getName").returns(&string))
            .build()
            .expect("Named should build");

        let base = registry
            .class("test", "Base")
            .binds::<Base>()
            .annotate(
                Annotation::new(&entity)
                    .with("table", AnnotationValue::String("bases".to_string())),
            )
            .getter("getId", &int, |b: &Base| b.id)
            .getter("isActive", &boolean, |b: &Base| b.active)
            .setter("setActive", &boolean, |b: &mut Base, v: bool| b.active = v)
            .nullable_getter("getTag", &string, |b: &Base| b.tag.clone())
            .method(MethodBuilder::getter("secret", &int, |b: &Base| b.id * 2).private())
            .build()
            .expect("Base should build");

        let mid = registry
            .class("test", "Mid")
            .extends_via(&base, |m: &Mid| &m.base, |m: &mut Mid| &mut m.base)
            .implements(&named)
            .getter("getLevel", &long, |m: &Mid| m.level)
            .getter("getName", &string, |m: &Mid| m.name.clone())
            .build()
            .expect("Mid should build");

        let leaf = registry
            .class("test", "Leaf")
            .extends_via(&mid, |l: &Leaf| &l.mid, |l: &mut Leaf| &mut l.mid)
            .getter("getDepth", &int, |l: &Leaf| l.depth)
            .to_string_method(|l: &Leaf| format!("Leaf({})", l.depth))
            .build()
            .expect("Leaf should build");

        let point = registry
            .class("geom", "Point")
            .binds::<Point>()
            .getter("getX", &int, |p: &Point| p.x)
            .getter("getY", &int, |p: &Point| p.y)
            .setter("setX", &int, |p: &mut Point, v: i32| p.x = v)
            .nullable_getter("getLabel", &string, |p: &Point| p.label.clone())
            .nullable_setter("setLabel", &string, |p: &mut Point, v: Option<String>| {
                p.label = v;
            })
            .setter("setWeight", &long, |p: &mut Point, v: i64| p.weight = v)
            .try_getter("getBroken", &int, |_: &Point| {
                Err::<i32, _>(Broken("getter".to_string()))
            })
            .try_setter("setBroken", &int, |_: &mut Point, _: i32| {
                Err(Broken("setter".to_string()))
            })
            .build()
            .expect("Point should build");

        let widget = registry
            .class("ui", "Widget")
            .binds::<Widget>()
            .nullable_getter("getValue", &string, |w: &Widget| w.value.clone())
            .method(
                MethodBuilder::new("setValue")
                    .param(&object)
                    .receiver::<Widget>()
                    .exclusive(record("setValue(Object)")),
            )
            .nullable_setter("setValue", &string, |w: &mut Widget, v: Option<String>| {
                w.value = v;
                w.last_setter = "setValue(String)";
            })
            .setter("setValue", &long, |w: &mut Widget, v: i64| {
                w.value = Some(v.to_string());
                w.last_setter = "setValue(long)";
            })
            .setter("setCount", &long, |w: &mut Widget, v: i64| {
                w.count = v as f64;
                w.last_setter = "setCount(long)";
            })
            .setter("setCount", &double, |w: &mut Widget, v: f64| {
                w.count = v;
                w.last_setter = "setCount(double)";
            })
            .method(
                MethodBuilder::new("setOwner")
                    .param(&base)
                    .receiver::<Widget>()
                    .exclusive(record("setOwner(Base)")),
            )
            .method(
                MethodBuilder::new("setOwner")
                    .param(&named)
                    .receiver::<Widget>()
                    .exclusive(record("setOwner(Named)")),
            )
            .getter("isEnabled", &boolean, |w: &Widget| w.enabled)
            .setter("setURL", &string, |w: &mut Widget, v: String| w.url = v)
            .getter("isBusy", &int, |_: &Widget| 0)
            .method(
                MethodBuilder::new("reset")
                    .receiver::<Widget>()
                    .exclusive(record("reset")),
            )
            .build()
            .expect("Widget should build");

        Fixture {
            registry,
            named,
            base,
            mid,
            leaf,
            point,
            widget,
            entity,
            documented,
            audited,
        }
    }

    /// A reflector over the fixture registry with its own cache
    pub fn reflector(&self) -> Reflector {
        Reflector::with_registry(self.registry.clone()).with_cache(Arc::new(PropertyCache::new()))
    }
}

fn record(
    setter: &'static str,
) -> impl Fn(&mut dyn Any, Vec<Value>) -> InvokeResult + Send + Sync + 'static {
    move |target: &mut dyn Any, _args: Vec<Value>| {
        receiver_mut::<Widget>(target)?.last_setter = setter;
        Ok(Value::null())
    }
}

/// A [`ClassInspector`] counting its invocations
#[derive(Default)]
pub struct CountingIntrospector {
    pub calls: AtomicUsize,
}

impl TypeIntrospector for CountingIntrospector {
    fn property_names(&self, ty: &TypeRc) -> Result<BTreeSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ClassInspector::new().property_names(ty)
    }
}
