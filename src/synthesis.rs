//! Instance synthesis
//!
//! Builds pairs of value-equal instances from nothing but registered type
//! descriptors. Each initializer is called twice with argument lists that are
//! equal but share no object, so mutating one side never leaks into the other.
//!
//! Recursion into parameter types is guarded by a stack of the types under
//! construction along the active chain: an initializer that needs a type
//! already on the stack is skipped. Matching is by exact name, so a shared
//! supertype used as a parameter in unrelated places does not cause skips.

use std::rc::Rc;

use crate::contracts::equality::{check_equality_sanity, Severity};
use crate::descriptor::{Initializer, TypeDescriptor, Visibility};
use crate::error::{invocation, InternalFailure, UsageError, VerifyError, VerifyResult};
use crate::fault::guard;
use crate::generation::scalars::ScalarGenerator;
use crate::instance::Instance;
use crate::overrides::OverrideResolver;
use crate::registry::TypeRegistry;
use crate::report::{Diagnostics, Warning};
use crate::types::{is_platform_path, BuiltinKind, TypeRef};
use crate::value::Value;

/// Two value-equal instances built by the same initializer.
#[derive(Debug, Clone)]
pub struct InstancePair {
    pub left: Value,
    pub right: Value,
}

impl InstancePair {
    pub fn new(left: Value, right: Value) -> Self {
        InstancePair { left, right }
    }

    /// A pair whose right side is a clone of `value`.
    pub(crate) fn mirrored(value: Value) -> Self {
        InstancePair {
            right: value.clone(),
            left: value,
        }
    }

    pub fn null() -> Self {
        InstancePair::new(Value::Null, Value::Null)
    }
}

/// Argument lists for one call on each side of a pair.
#[derive(Debug, Clone, Default)]
pub struct ArgumentPair {
    pub left: Vec<Value>,
    pub right: Vec<Value>,
}

pub struct Synthesizer<'a> {
    registry: &'a TypeRegistry,
    generator: &'a mut ScalarGenerator,
    diagnostics: &'a mut Diagnostics,
    implementations: &'a [String],
    overrides: Option<&'a dyn OverrideResolver>,
    constructed: Vec<String>,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        generator: &'a mut ScalarGenerator,
        diagnostics: &'a mut Diagnostics,
        implementations: &'a [String],
    ) -> Self {
        Synthesizer {
            registry,
            generator,
            diagnostics,
            implementations,
            overrides: None,
            constructed: Vec::new(),
        }
    }

    /// Resolve top-level initializer parameters and mutator arguments through
    /// `overrides` first.
    pub fn with_overrides(mut self, overrides: &'a dyn OverrideResolver) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub(crate) fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub(crate) fn generator(&mut self) -> &mut ScalarGenerator {
        &mut *self.generator
    }

    pub(crate) fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diagnostics
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        self.diagnostics.warn(warning);
    }

    /// Pairs of the named type.
    ///
    /// With `want_all`, every viable initializer must succeed and contributes
    /// one pair. Without it, failures are remembered and the next initializer
    /// is tried; the call fails only if none succeeds.
    pub fn synthesize(&mut self, name: &str, want_all: bool) -> VerifyResult<Vec<InstancePair>> {
        self.synthesize_at(name, want_all, true)
    }

    /// Overrides reach only the initializer of the type asked for at the top
    /// level; everything built to fill its slots is nested.
    fn synthesize_at(&mut self, name: &str, want_all: bool, top_level: bool) -> VerifyResult<Vec<InstancePair>> {
        if is_platform_path(name) {
            return match BuiltinKind::from_path(name) {
                Some(kind) => Ok(vec![self.builtin_pair(kind, &TypeRef::named(name))]),
                None => Err(InternalFailure::UnsupportedBuiltin { path: name.to_string() }.into()),
            };
        }
        let descriptor = self.registry.resolve(name)?;
        if descriptor.is_enumeration() {
            return Ok(vec![self.pick_enumerator(&descriptor)?]);
        }
        if descriptor.is_abstract() {
            return self.synthesize_implementation(&descriptor, want_all, top_level);
        }
        let initializers = self.select_initializers(&descriptor);
        self.construct_at(&descriptor, &initializers, want_all, top_level)
    }

    fn synthesize_implementation(
        &mut self,
        descriptor: &TypeDescriptor,
        want_all: bool,
        top_level: bool,
    ) -> VerifyResult<Vec<InstancePair>> {
        let implementation = self
            .registry
            .implementation_for(descriptor.name(), self.implementations)
            .ok_or_else(|| UsageError::NoImplementationFound {
                type_name: descriptor.name().to_string(),
            })?;
        log::debug!(
            "Using {} as implementation of {}",
            implementation.name(),
            descriptor.name()
        );
        self.constructed.push(descriptor.name().to_string());
        let result = self.synthesize_at(implementation.name(), want_all, top_level);
        self.constructed.pop();
        result
    }

    /// Public initializers that cannot receive an instance of the declaring
    /// type, or every initializer when no public one qualifies.
    fn select_initializers(&self, descriptor: &TypeDescriptor) -> Vec<Initializer> {
        let viable: Vec<Initializer> = descriptor
            .initializers()
            .iter()
            .filter(|init| init.visibility == Visibility::Public)
            .filter(|init| !init.params.iter().any(|p| self.accepts_instance_of(p, descriptor.name())))
            .cloned()
            .collect();
        if viable.is_empty() {
            descriptor.initializers().to_vec()
        } else {
            viable
        }
    }

    fn accepts_instance_of(&self, param: &TypeRef, type_name: &str) -> bool {
        match param {
            TypeRef::Named(target) => self.registry.is_assignable(target, type_name),
            _ => false,
        }
    }

    /// Pairs built with exactly `initializers`, skipping those that would
    /// recurse into a type already under construction.
    pub fn construct_with(
        &mut self,
        descriptor: &Rc<TypeDescriptor>,
        initializers: &[Initializer],
        want_all: bool,
    ) -> VerifyResult<Vec<InstancePair>> {
        self.construct_at(descriptor, initializers, want_all, true)
    }

    fn construct_at(
        &mut self,
        descriptor: &Rc<TypeDescriptor>,
        initializers: &[Initializer],
        want_all: bool,
        top_level: bool,
    ) -> VerifyResult<Vec<InstancePair>> {
        self.constructed.push(descriptor.name().to_string());
        let outcome = self.construct_each(descriptor, initializers, want_all, top_level);
        self.constructed.pop();

        let (pairs, failure) = outcome?;
        if pairs.is_empty() {
            if let Some(failure) = failure {
                return Err(failure);
            }
            self.warn(Warning::CycleSkipped {
                type_name: descriptor.name().to_string(),
            });
        }
        Ok(pairs)
    }

    fn construct_each(
        &mut self,
        descriptor: &Rc<TypeDescriptor>,
        initializers: &[Initializer],
        want_all: bool,
        top_level: bool,
    ) -> VerifyResult<(Vec<InstancePair>, Option<VerifyError>)> {
        let mut pairs = Vec::new();
        let mut failure = None;
        for initializer in initializers {
            if let Some(cyclic) = self.cyclic_parameter(initializer) {
                log::debug!(
                    "Skipping {}/{}: {} is already under construction",
                    descriptor.name(),
                    initializer.arity(),
                    cyclic
                );
                continue;
            }
            match self.construct(descriptor, initializer, top_level) {
                Ok(pair) => pairs.push(pair),
                Err(error) if want_all => return Err(error),
                Err(error) => {
                    log::debug!(
                        "Initializer {}/{} failed, trying the next one: {}",
                        descriptor.name(),
                        initializer.arity(),
                        error
                    );
                    failure = Some(error);
                }
            }
        }
        Ok((pairs, failure))
    }

    fn cyclic_parameter(&self, initializer: &Initializer) -> Option<String> {
        initializer
            .params
            .iter()
            .flat_map(TypeRef::named_types)
            .find(|name| self.constructed.iter().any(|c| c == name))
            .map(str::to_string)
    }

    fn construct(
        &mut self,
        descriptor: &Rc<TypeDescriptor>,
        initializer: &Initializer,
        top_level: bool,
    ) -> VerifyResult<InstancePair> {
        if top_level {
            if let Some(overrides) = self.overrides {
                overrides.begin_initializer(initializer.arity());
            }
        }
        let arguments = self.fill_slots(&initializer.params, top_level)?;
        let member = format!("initializer/{}", initializer.arity());
        let left = guard(|| (initializer.body)(arguments.left.as_slice())).map_err(invocation(descriptor.name(), &member))?;
        let right = guard(|| (initializer.body)(arguments.right.as_slice())).map_err(invocation(descriptor.name(), &member))?;
        Ok(InstancePair::new(
            Value::Object(Instance::new(descriptor.clone(), left)),
            Value::Object(Instance::new(descriptor.clone(), right)),
        ))
    }

    /// Arguments for a mutator, resolving overrides at arity 0.
    pub fn mutator_arguments(&mut self, params: &[TypeRef]) -> VerifyResult<ArgumentPair> {
        if let Some(overrides) = self.overrides {
            overrides.begin_initializer(0);
        }
        self.fill_slots(params, true)
    }

    fn fill_slots(&mut self, params: &[TypeRef], use_overrides: bool) -> VerifyResult<ArgumentPair> {
        let mut arguments = ArgumentPair::default();
        for (index, ty) in params.iter().enumerate() {
            let pinned = if use_overrides {
                self.overrides.and_then(|o| o.lookup_current(index + 1, ty))
            } else {
                None
            };
            let pair = match pinned {
                Some(value) => {
                    log::debug!("Using override for parameter {} ({})", index + 1, ty);
                    detached_pair(&value)?
                }
                None => self.fill(ty)?,
            };
            arguments.left.push(pair.left);
            arguments.right.push(pair.right);
        }
        Ok(arguments)
    }

    /// One pair for a slot of type `ty`.
    pub fn fill(&mut self, ty: &TypeRef) -> VerifyResult<InstancePair> {
        match ty {
            TypeRef::Scalar(kind) | TypeRef::Boxed(kind) => Ok(InstancePair::mirrored(self.generator.scalar(*kind))),
            TypeRef::Builtin(kind) => Ok(self.builtin_pair(*kind, ty)),
            TypeRef::Array(elem) => self.fill_array(ty, elem),
            TypeRef::Collection { kind, elem } => self.fill_collection(*kind, elem),
            TypeRef::Map { kind, key, value } => self.fill_map(*kind, key, value),
            TypeRef::Named(name) => self.fill_object(name),
        }
    }

    /// Every pair nested synthesis yields for `ty`; one pair for non-object
    /// slots.
    pub fn fill_many(&mut self, ty: &TypeRef) -> VerifyResult<Vec<InstancePair>> {
        match ty {
            TypeRef::Named(name) => self.synthesize_at(name, false, false),
            other => Ok(vec![self.fill(other)?]),
        }
    }

    fn fill_object(&mut self, name: &str) -> VerifyResult<InstancePair> {
        let pair = match self.synthesize_at(name, false, false)?.into_iter().next() {
            Some(pair) => pair,
            None => return Ok(InstancePair::null()),
        };
        let checked = pair
            .left
            .as_instance()
            .map_or(false, |instance| instance.descriptor().declares_equality());
        if checked {
            check_equality_sanity(&pair, Severity::Warning, &mut *self.diagnostics)?;
        }
        Ok(pair)
    }

    fn builtin_pair(&mut self, kind: BuiltinKind, declared: &TypeRef) -> InstancePair {
        if kind == BuiltinKind::ByteStream {
            self.warn(Warning::StreamParameter {
                declared: declared.to_string(),
            });
        }
        InstancePair::mirrored(self.generator.builtin(kind))
    }
}

fn detached_pair(value: &Value) -> VerifyResult<InstancePair> {
    let copy = |v: &Value| {
        v.detached()
            .map_err(|fault| InternalFailure::from_fault(&v.kind_name(), "override copy", fault))
    };
    Ok(InstancePair::new(copy(value)?, copy(value)?))
}
