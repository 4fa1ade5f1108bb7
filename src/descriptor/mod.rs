//! Type descriptors
//!
//! A `TypeDescriptor` is the registered shape of a type under test: its
//! initializers with their parameter types, its fields, its methods, and the
//! equality, hash and string functions it declares. Rust has no runtime
//! introspection, so each type describes itself once through
//! [`DataObject::describe`] or [`Enumeration`], and the descriptor is cached
//! per thread.

mod builder;
pub mod naming;

pub use self::builder::{Args, TypeBuilder};

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::fault::Fault;
use crate::types::TypeRef;
use crate::value::{EnumValue, Value};

pub(crate) type InitFn = Rc<dyn Fn(&[Value]) -> Result<Box<dyn Any>, Fault>>;
pub(crate) type ReadFn = Rc<dyn Fn(&dyn Any) -> Result<Value, Fault>>;
pub(crate) type WriteFn = Rc<dyn Fn(&mut dyn Any, &Value) -> Result<(), Fault>>;
pub(crate) type MethodFn = Rc<dyn Fn(&mut dyn Any, &[Value]) -> Result<Value, Fault>>;
pub(crate) type EqualsFn = Rc<dyn Fn(&dyn Any, &Value) -> Result<bool, Fault>>;
pub(crate) type HashFn = Rc<dyn Fn(&dyn Any) -> Result<i32, Fault>>;
pub(crate) type TextFn = Rc<dyn Fn(&dyn Any) -> Result<String, Fault>>;
pub(crate) type CloneFn = Rc<dyn Fn(&dyn Any) -> Result<Box<dyn Any>, Fault>>;

/// A Rust type that can be verified as a data object.
///
/// ```ignore
/// impl DataObject for Point {
///     const NAME: &'static str = "Point";
///
///     fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
///         builder
///             .constructor(params![i32, i32], |args| Ok(Point::new(args.get(0)?, args.get(1)?)))
///             .property("x", |p| p.x, |p, v| p.x = v)
///             .partial_eq()
///             .hashed()
///     }
/// }
/// data_object!(Point);
/// ```
pub trait DataObject: Any + Clone {
    const NAME: &'static str;

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self>;
}

/// A Rust enum whose values are picked rather than constructed.
pub trait Enumeration: Any + Clone + PartialEq {
    const NAME: &'static str;

    /// Every enumerator, in declaration order.
    fn variants() -> Vec<Self>;

    fn variant_name(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Concrete,
    Abstract,
    Interface,
    Enumeration,
}

/// One way of constructing the type.
#[derive(Clone)]
pub struct Initializer {
    pub params: Vec<TypeRef>,
    pub visibility: Visibility,
    pub(crate) body: InitFn,
}

impl Initializer {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .finish()
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    /// Type that declares the field; differs from the owner for inherited fields.
    pub declared_by: String,
    pub(crate) read: ReadFn,
    pub(crate) write: Option<WriteFn>,
}

impl FieldDescriptor {
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("declared_by", &self.declared_by)
            .field("writable", &self.is_writable())
            .finish()
    }
}

#[derive(Clone)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub returns: Option<TypeRef>,
    pub visibility: Visibility,
    pub declared_by: String,
    pub(crate) body: MethodFn,
}

impl MethodDescriptor {
    pub fn is_accessible(&self) -> bool {
        self.visibility != Visibility::Hidden
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("visibility", &self.visibility)
            .field("declared_by", &self.declared_by)
            .finish()
    }
}

/// The registered shape of one type.
pub struct TypeDescriptor {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) supertypes: Vec<String>,
    pub(crate) initializers: Vec<Initializer>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) methods: Vec<MethodDescriptor>,
    pub(crate) equality: Option<EqualsFn>,
    pub(crate) hash: Option<HashFn>,
    pub(crate) text: Option<TextFn>,
    pub(crate) ordered: bool,
    pub(crate) duplicate: Option<CloneFn>,
    pub(crate) enumerators: Vec<EnumValue>,
}

impl TypeDescriptor {
    fn bare(name: &str, kind: TypeKind) -> TypeDescriptor {
        TypeDescriptor {
            name: name.to_string(),
            kind,
            supertypes: Vec::new(),
            initializers: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            equality: None,
            hash: None,
            text: None,
            ordered: false,
            duplicate: None,
            enumerators: Vec::new(),
        }
    }

    /// An interface: no members, resolved through supplied implementations.
    pub fn interface(name: &str) -> TypeDescriptor {
        TypeDescriptor::bare(name, TypeKind::Interface)
    }

    /// An abstract type with optional supertypes of its own.
    pub fn abstract_type(name: &str, supertypes: &[&str]) -> TypeDescriptor {
        let mut descriptor = TypeDescriptor::bare(name, TypeKind::Abstract);
        descriptor.supertypes = supertypes.iter().map(|s| s.to_string()).collect();
        descriptor
    }

    /// Descriptor of the placeholder object used to probe equality against a
    /// foreign type.
    pub(crate) fn opaque() -> TypeDescriptor {
        TypeDescriptor::bare("object", TypeKind::Concrete)
    }

    pub fn for_enumeration<E: Enumeration>() -> TypeDescriptor {
        let mut descriptor = TypeDescriptor::bare(E::NAME, TypeKind::Enumeration);
        descriptor.ordered = true;
        descriptor.enumerators = E::variants()
            .iter()
            .enumerate()
            .map(|(ordinal, variant)| EnumValue {
                type_name: E::NAME.to_string(),
                name: variant.variant_name(),
                ordinal,
            })
            .collect();
        descriptor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Abstract types and interfaces cannot be constructed directly.
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Abstract | TypeKind::Interface)
    }

    pub fn is_enumeration(&self) -> bool {
        self.kind == TypeKind::Enumeration
    }

    /// Every supertype and interface, nearest first.
    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }

    /// Declared and inherited fields.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared and inherited methods of every visibility.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn methods_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MethodDescriptor> + 'a {
        let name = name.to_owned();
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn declares_equality(&self) -> bool {
        self.equality.is_some()
    }

    pub fn declares_hash(&self) -> bool {
        self.hash.is_some()
    }

    pub fn declares_string_conversion(&self) -> bool {
        self.text.is_some()
    }

    /// Whether instances support a three-way comparison.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn enumerators(&self) -> &[EnumValue] {
        &self.enumerators
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("supertypes", &self.supertypes)
            .field("initializers", &self.initializers)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("equality", &self.declares_equality())
            .field("hash", &self.declares_hash())
            .field("string_conversion", &self.declares_string_conversion())
            .field("enumerators", &self.enumerators.len())
            .finish()
    }
}

thread_local! {
    static DESCRIPTORS: RefCell<HashMap<TypeId, Rc<TypeDescriptor>>> = RefCell::new(HashMap::new());
}

/// The descriptor of `T`, built on first use.
pub fn descriptor_of<T: DataObject>() -> Rc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    if let Some(found) = DESCRIPTORS.with(|cache| cache.borrow().get(&id).cloned()) {
        return found;
    }
    // Built outside the borrow: describing a subtype looks up its base.
    let built = Rc::new(T::describe(TypeBuilder::new()).build());
    DESCRIPTORS.with(|cache| {
        cache
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| built.clone())
            .clone()
    })
}
