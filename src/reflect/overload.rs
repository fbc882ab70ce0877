//! Setter overload resolution.
//!
//! Candidates are the public methods of a type with the requested setter name and exactly one
//! parameter, in public method order.
//!
//! With a value type, an exact parameter type match wins. Otherwise every candidate whose
//! parameter accepts the value type is ranked by its transformation cost:
//!
//! | Step                                           | Cost                 |
//! |------------------------------------------------|----------------------|
//! | One superclass step                            | 1.0                  |
//! | Reaching an interface the type implements      | 0.25                 |
//! | Leaving the superclass chain (root `Object`)   | 1.5                  |
//! | One primitive widening step                    | 0.1                  |
//!
//! The cheapest candidate wins, the earlier one on a tie.
//!
//! With a null value, only candidates with a reference typed parameter whose body accepts null
//! qualify and the tie is broken by [`NullSetterResolution`].

use std::iter;

use tracing::trace;

use crate::{
    metadata::{
        method::MethodRc,
        typesystem::{ReflectType, TypeRc},
    },
    reflect::config::{NullSetterResolution, ReflectionConfig},
};

const SUPERCLASS_STEP_COST: f32 = 1.0;
const INTERFACE_COST: f32 = 0.25;
const OUTSIDE_CHAIN_COST: f32 = 1.5;
const WIDENING_STEP_COST: f32 = 0.1;

/// A one-parameter public method and its parameter type
struct Candidate<'a> {
    method: &'a MethodRc,
    param: TypeRc,
}

/// Find the setter `name` of `ty` accepting a value of `value_type`, or a null value if
/// `value_type` is `None`.
pub(crate) fn find_setter(
    ty: &ReflectType,
    name: &str,
    value_type: Option<&TypeRc>,
    config: &ReflectionConfig,
) -> Option<MethodRc> {
    let candidates: Vec<Candidate<'_>> = ty
        .public_methods()
        .iter()
        .filter(|method| method.name == name && method.param_count() == 1)
        .filter_map(|method| {
            method
                .parameter_type(0)
                .map(|param| Candidate { method, param })
        })
        .collect();

    let chosen = match value_type {
        Some(value_type) => best_match(&candidates, value_type, config),
        None => null_match(&candidates, config.null_setter_resolution),
    }?;

    trace!(
        setter = %chosen.method,
        candidates = candidates.len(),
        "resolved setter overload"
    );
    Some(chosen.method.clone())
}

fn best_match<'c, 'a>(
    candidates: &'c [Candidate<'a>],
    value_type: &TypeRc,
    config: &ReflectionConfig,
) -> Option<&'c Candidate<'a>> {
    if let Some(exact) = candidates
        .iter()
        .find(|candidate| candidate.param == *value_type)
    {
        return Some(exact);
    }

    let mut best: Option<(&Candidate<'a>, f32)> = None;
    for candidate in candidates {
        let Some(cost) = transformation_cost(value_type, &candidate.param, config) else {
            continue;
        };
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((candidate, cost));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn null_match<'c, 'a>(
    candidates: &'c [Candidate<'a>],
    resolution: NullSetterResolution,
) -> Option<&'c Candidate<'a>> {
    let nullable: Vec<&Candidate<'a>> = candidates
        .iter()
        .filter(|candidate| candidate.method.accepts_null(0))
        .collect();

    match resolution {
        NullSetterResolution::FirstDeclared => nullable.first().copied(),
        NullSetterResolution::Narrowest => nullable
            .iter()
            .find(|narrow| {
                nullable
                    .iter()
                    .all(|other| other.param.is_assignable_from(&narrow.param))
            })
            .or_else(|| nullable.first())
            .copied(),
    }
}

/// The cost of passing a `source` where a `dest` is expected, `None` if it is not possible
fn transformation_cost(
    source: &TypeRc,
    dest: &ReflectType,
    config: &ReflectionConfig,
) -> Option<f32> {
    if let (Some(from), Some(to)) = (source.primitive_kind(), dest.primitive_kind()) {
        if from != to && !config.primitive_widening {
            return None;
        }
        return from
            .widening_distance(to)
            .map(|steps| f32::from(steps) * WIDENING_STEP_COST);
    }
    if !dest.is_assignable_from(source) {
        return None;
    }

    let mut cost = 0.0;
    for ty in iter::once(source.clone()).chain(source.superclasses()) {
        if ty.as_ref() == dest {
            return Some(cost);
        }
        if dest.is_interface() && dest.is_assignable_from(&ty) {
            return Some(cost + INTERFACE_COST);
        }
        cost += SUPERCLASS_STEP_COST;
    }
    Some(cost + OUTSIDE_CHAIN_COST)
}
