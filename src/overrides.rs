//! Caller-supplied values for specific parameter slots
//!
//! Some types reject random arguments (an account number with a checksum, a
//! currency code). An override pins the value used for one parameter of one
//! initializer, addressed by a [`Coordinate`]. Arity 0 addresses mutator
//! arguments by position.

use std::cell::Cell;
use std::fmt;

use crate::descriptor::TypeDescriptor;
use crate::error::{UsageError, VerifyResult};
use crate::reflect::{IntoValue, Reflect};
use crate::registry::TypeRegistry;
use crate::report::{Diagnostics, Warning};
use crate::types::TypeRef;
use crate::value::Value;

/// `(arity, ordinal, declared type)` of one parameter slot.
///
/// The declared type is part of the key, so an `i32` slot and an
/// `Option<i32>` slot of two same-arity initializers are told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    arity: usize,
    ordinal: usize,
    declared: TypeRef,
}

impl Coordinate {
    /// `ordinal` is 1-based and must not exceed `arity` unless `arity` is 0.
    pub fn new(arity: usize, ordinal: usize, declared: TypeRef) -> VerifyResult<Coordinate> {
        if ordinal == 0 {
            return Err(UsageError::InvalidCoordinate {
                arity,
                ordinal,
                reason: "ordinals start at 1".to_string(),
            }
            .into());
        }
        if arity != 0 && ordinal > arity {
            return Err(UsageError::InvalidCoordinate {
                arity,
                ordinal,
                reason: "ordinal exceeds the number of parameters".to_string(),
            }
            .into());
        }
        Ok(Coordinate {
            arity,
            ordinal,
            declared,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn declared(&self) -> &TypeRef {
        &self.declared
    }

    /// Whether this coordinate addresses a mutator argument.
    pub fn is_mutator_slot(&self) -> bool {
        self.arity == 0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(arity {}, ordinal {}, {})", self.arity, self.ordinal, self.declared)
    }
}

/// Source of override values.
///
/// Lookups for one initializer are bracketed by [`begin_initializer`]; the
/// resolver remembers that arity so [`lookup_current`] needs only the ordinal.
///
/// [`begin_initializer`]: OverrideResolver::begin_initializer
/// [`lookup_current`]: OverrideResolver::lookup_current
pub trait OverrideResolver {
    fn lookup(&self, arity: usize, ordinal: usize, declared: &TypeRef) -> Option<Value>;

    /// Every coordinate the resolver can answer for.
    fn coordinates(&self) -> Vec<Coordinate>;

    fn begin_initializer(&self, arity: usize);

    fn lookup_current(&self, ordinal: usize, declared: &TypeRef) -> Option<Value>;
}

/// Map-backed [`OverrideResolver`].
///
/// Not `Sync`: the current-arity context is plain interior state, so one
/// store serves one verification at a time.
#[derive(Debug, Default)]
pub struct OverrideStore {
    entries: Vec<(Coordinate, Value)>,
    current_arity: Cell<usize>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that never overrides anything.
    pub fn none() -> Self {
        Self::default()
    }

    /// Pin `value` for the slot `(arity, ordinal)` whose declared type is `V`'s.
    pub fn with<V: IntoValue + Reflect>(self, arity: usize, ordinal: usize, value: V) -> VerifyResult<Self> {
        let coordinate = Coordinate::new(arity, ordinal, V::type_ref())?;
        Ok(self.with_value(coordinate, value.into_value()))
    }

    /// Pin a raw value at an explicit coordinate. A later value for the same
    /// coordinate replaces an earlier one.
    pub fn with_value(mut self, coordinate: Coordinate, value: Value) -> Self {
        self.entries.retain(|(existing, _)| *existing != coordinate);
        self.entries.push((coordinate, value));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OverrideResolver for OverrideStore {
    fn lookup(&self, arity: usize, ordinal: usize, declared: &TypeRef) -> Option<Value> {
        self.entries
            .iter()
            .find(|(c, _)| c.arity == arity && c.ordinal == ordinal && c.declared == *declared)
            .map(|(_, value)| value.clone())
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        self.entries.iter().map(|(c, _)| c.clone()).collect()
    }

    fn begin_initializer(&self, arity: usize) {
        self.current_arity.set(arity);
    }

    fn lookup_current(&self, ordinal: usize, declared: &TypeRef) -> Option<Value> {
        self.lookup(self.current_arity.get(), ordinal, declared)
    }
}

fn slot_accepts(registry: &TypeRegistry, param: &TypeRef, declared: &TypeRef) -> bool {
    match (param, declared) {
        (TypeRef::Named(target), TypeRef::Named(candidate)) => registry.is_assignable(target, candidate),
        _ => param == declared,
    }
}

/// Warn about overrides that match no initializer or mutator of `descriptor`.
pub(crate) fn validate(
    resolver: &dyn OverrideResolver,
    descriptor: &TypeDescriptor,
    registry: &TypeRegistry,
    diagnostics: &mut Diagnostics,
) {
    for coordinate in resolver.coordinates() {
        let index = coordinate.ordinal - 1;
        let used = if coordinate.is_mutator_slot() {
            descriptor
                .methods()
                .iter()
                .filter(|m| m.is_accessible())
                .filter_map(|m| m.params.get(index))
                .any(|param| slot_accepts(registry, param, &coordinate.declared))
        } else {
            descriptor
                .initializers()
                .iter()
                .filter(|init| init.arity() == coordinate.arity)
                .filter_map(|init| init.params.get(index))
                .any(|param| slot_accepts(registry, param, &coordinate.declared))
        };
        if !used {
            diagnostics.warn(Warning::UnusedOverride {
                coordinate: coordinate.to_string(),
            });
        }
    }
}
