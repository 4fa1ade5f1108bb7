//! Arrays, collections, maps and enumerations
//!
//! Container slots hold one element per pair that nested synthesis yields for
//! the element type, so left and right containers line up element by element.

use crate::descriptor::TypeDescriptor;
use crate::error::{Defect, InternalFailure, UsageError, VerifyResult};
use crate::synthesis::{InstancePair, Synthesizer};
use crate::types::{CollectionKind, MapKind, TypeRef};
use crate::value::Value;

fn unzip(pairs: Vec<InstancePair>) -> (Vec<Value>, Vec<Value>) {
    pairs.into_iter().map(|p| (p.left, p.right)).unzip()
}

/// Whether `value` supports a three-way comparison.
fn is_ordered(value: &Value) -> bool {
    match value {
        Value::Object(instance) => instance.descriptor().is_ordered(),
        Value::F16(_) | Value::F32(_) | Value::F64(_) => false,
        _ => true,
    }
}

impl<'a> Synthesizer<'a> {
    pub(crate) fn fill_array(&mut self, declared: &TypeRef, elem: &TypeRef) -> VerifyResult<InstancePair> {
        let items = match elem {
            TypeRef::Array(_) => {
                return Err(InternalFailure::MultiDimensionalArray {
                    declared: declared.to_string(),
                }
                .into())
            }
            TypeRef::Scalar(kind) | TypeRef::Boxed(kind) => {
                let generator = self.generator();
                let len = generator.array_len();
                (0..len).map(|_| generator.scalar(*kind)).collect()
            }
            TypeRef::Builtin(kind) => {
                let generator = self.generator();
                let len = generator.array_len();
                (0..len).map(|_| generator.builtin(*kind)).collect()
            }
            other => {
                let (left, right) = unzip(self.fill_many(other)?);
                return Ok(InstancePair::new(Value::Array(left), Value::Array(right)));
            }
        };
        Ok(InstancePair::mirrored(Value::Array(items)))
    }

    pub(crate) fn fill_collection(&mut self, kind: CollectionKind, elem: &TypeRef) -> VerifyResult<InstancePair> {
        let kind = kind.concrete();
        let pairs = self.fill_many(elem)?;
        if kind.requires_ordering() {
            for pair in &pairs {
                require_ordering(&pair.left, kind.name())?;
            }
        }
        let (left, right) = unzip(pairs);
        Ok(InstancePair::new(
            Value::Collection { kind, items: left },
            Value::Collection { kind, items: right },
        ))
    }

    /// Values are synthesized first; each value then gets the first key pair
    /// of a fresh key synthesis.
    pub(crate) fn fill_map(&mut self, kind: MapKind, key: &TypeRef, value: &TypeRef) -> VerifyResult<InstancePair> {
        let kind = kind.concrete();
        let values = self.fill_many(value)?;
        let mut left = Vec::with_capacity(values.len());
        let mut right = Vec::with_capacity(values.len());
        for value in values {
            let key = match self.fill_many(key)?.into_iter().next() {
                Some(key) => key,
                None => continue,
            };
            if kind.requires_ordering() {
                require_ordering(&key.left, kind.name())?;
            }
            left.push((key.left, value.left));
            right.push((key.right, value.right));
        }
        Ok(InstancePair::new(
            Value::Map { kind, entries: left },
            Value::Map { kind, entries: right },
        ))
    }

    /// A uniformly chosen enumerator, the same on both sides.
    pub(crate) fn pick_enumerator(&mut self, descriptor: &TypeDescriptor) -> VerifyResult<InstancePair> {
        let enumerators = descriptor.enumerators();
        if enumerators.is_empty() {
            return Err(UsageError::EmptyEnumeration {
                type_name: descriptor.name().to_string(),
            }
            .into());
        }
        let index = self.generator().index(enumerators.len());
        Ok(InstancePair::mirrored(Value::Enum(enumerators[index].clone())))
    }
}

fn require_ordering(value: &Value, container: &str) -> VerifyResult<()> {
    if is_ordered(value) {
        Ok(())
    } else {
        Err(Defect::MissingOrdering {
            type_name: value.kind_name(),
            container: container.to_string(),
        }
        .into())
    }
}
