//! Registry of verifiable types
//!
//! Maps type names to their descriptors and answers the assignability
//! questions the synthesizer asks: which supplied implementation stands in for
//! an abstract type, and whether a parameter could hold an instance of the
//! type being built.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::descriptor::{descriptor_of, DataObject, Enumeration, TypeDescriptor};
use crate::error::{UsageError, VerifyResult};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Rc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object type.
    pub fn register<T: DataObject>(&mut self) -> &mut Self {
        self.insert(descriptor_of::<T>())
    }

    pub fn register_enum<E: Enumeration>(&mut self) -> &mut Self {
        self.insert(Rc::new(TypeDescriptor::for_enumeration::<E>()))
    }

    /// Register an interface by name.
    pub fn register_interface(&mut self, name: &str) -> &mut Self {
        self.insert(Rc::new(TypeDescriptor::interface(name)))
    }

    pub fn register_descriptor(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.insert(Rc::new(descriptor))
    }

    fn insert(&mut self, descriptor: Rc<TypeDescriptor>) -> &mut Self {
        log::debug!("Registering type {} ({:?})", descriptor.name(), descriptor.kind());
        self.types.insert(descriptor.name().to_string(), descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<Rc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Like [`get`](Self::get), but an unknown name is a usage error.
    pub fn resolve(&self, name: &str) -> VerifyResult<Rc<TypeDescriptor>> {
        self.get(name).ok_or_else(|| {
            UsageError::UnknownType {
                type_name: name.to_string(),
            }
            .into()
        })
    }

    /// Names of every registered type, sorted.
    pub fn registered_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether a slot declared as `target` can hold an instance of `candidate`.
    pub fn is_assignable(&self, target: &str, candidate: &str) -> bool {
        let mut pending = vec![candidate.to_string()];
        let mut visited = HashSet::new();
        while let Some(name) = pending.pop() {
            if name == target {
                return true;
            }
            if !visited.insert(name.clone()) {
                continue;
            }
            if let Some(descriptor) = self.types.get(&name) {
                pending.extend(descriptor.supertypes().iter().cloned());
            }
        }
        false
    }

    /// The first supplied implementation that can stand in for `target`.
    pub fn implementation_for(&self, target: &str, implementations: &[String]) -> Option<Rc<TypeDescriptor>> {
        implementations
            .iter()
            .filter(|candidate| candidate.as_str() != target)
            .filter(|candidate| self.is_assignable(target, candidate))
            .filter_map(|candidate| self.get(candidate))
            .find(|descriptor| !descriptor.is_abstract())
    }
}
