//! Declared slot shapes
//!
//! A `TypeRef` describes the declared type of an initializer parameter, a field
//! or a method argument. It is the unit the synthesizer dispatches on and the
//! key (together with arity and ordinal) that override coordinates match.

use std::fmt;

/// Scalar kinds generated directly by the scalar generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    F16,
    F32,
    F64,
    Char,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::I128 => "i128",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F16 => "f16",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
        }
    }
}

/// Well-known library value types that are generated rather than walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Text,
    Uuid,
    Date,
    Time,
    DateTime,
    Timestamp,
    Duration,
    Path,
    IpAddr,
    SocketAddr,
    ByteStream,
}

impl BuiltinKind {
    /// Resolve a fully qualified platform path to a builtin kind.
    ///
    /// Returns `None` for paths outside the platform namespaces and for
    /// platform types that have no generator.
    pub fn from_path(path: &str) -> Option<BuiltinKind> {
        let kind = match path {
            "std::string::String" | "alloc::string::String" => BuiltinKind::Text,
            "uuid::Uuid" => BuiltinKind::Uuid,
            "chrono::NaiveDate" => BuiltinKind::Date,
            "chrono::NaiveTime" => BuiltinKind::Time,
            "chrono::NaiveDateTime" => BuiltinKind::DateTime,
            "chrono::DateTime<chrono::Utc>" => BuiltinKind::Timestamp,
            "std::time::Duration" | "core::time::Duration" => BuiltinKind::Duration,
            "std::path::PathBuf" => BuiltinKind::Path,
            "std::net::IpAddr" | "core::net::IpAddr" => BuiltinKind::IpAddr,
            "std::net::SocketAddr" | "core::net::SocketAddr" => BuiltinKind::SocketAddr,
            "std::io::Cursor<alloc::vec::Vec<u8>>" | "std::io::Cursor<std::vec::Vec<u8>>" => {
                BuiltinKind::ByteStream
            }
            _ => return None,
        };
        Some(kind)
    }

    /// Builtins whose textual form depends on the instant they were made.
    pub fn is_calendar(self) -> bool {
        matches!(
            self,
            BuiltinKind::Date | BuiltinKind::Time | BuiltinKind::DateTime | BuiltinKind::Timestamp
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Text => "String",
            BuiltinKind::Uuid => "Uuid",
            BuiltinKind::Date => "NaiveDate",
            BuiltinKind::Time => "NaiveTime",
            BuiltinKind::DateTime => "NaiveDateTime",
            BuiltinKind::Timestamp => "DateTime<Utc>",
            BuiltinKind::Duration => "Duration",
            BuiltinKind::Path => "PathBuf",
            BuiltinKind::IpAddr => "IpAddr",
            BuiltinKind::SocketAddr => "SocketAddr",
            BuiltinKind::ByteStream => "Cursor<Vec<u8>>",
        }
    }
}

/// Namespaces whose types are never constructed structurally.
pub const PLATFORM_PREFIXES: &[&str] = &["std::", "core::", "alloc::", "chrono::", "uuid::", "half::"];

/// Whether `name` lives in one of the platform namespaces.
pub fn is_platform_path(name: &str) -> bool {
    PLATFORM_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Collection shapes: abstractions first, then concrete containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Any insertion-ordered sequence.
    Sequence,
    /// Any set.
    Set,
    /// Any queue.
    Queue,
    /// A set ordered by its elements' natural ordering.
    OrderedSet,
    Vec,
    VecDeque,
    LinkedList,
    HashSet,
    BTreeSet,
    BinaryHeap,
}

impl CollectionKind {
    pub fn is_abstract(self) -> bool {
        matches!(
            self,
            CollectionKind::Sequence | CollectionKind::Set | CollectionKind::Queue | CollectionKind::OrderedSet
        )
    }

    /// Canonical container for an abstraction; concrete kinds map to themselves.
    pub fn concrete(self) -> CollectionKind {
        match self {
            CollectionKind::Sequence => CollectionKind::Vec,
            CollectionKind::Set => CollectionKind::HashSet,
            CollectionKind::Queue => CollectionKind::BinaryHeap,
            CollectionKind::OrderedSet => CollectionKind::BTreeSet,
            other => other,
        }
    }

    /// Containers that need a three-way comparison on their elements.
    pub fn requires_ordering(self) -> bool {
        matches!(
            self.concrete(),
            CollectionKind::BTreeSet | CollectionKind::BinaryHeap
        )
    }

    /// Containers whose equality ignores element order.
    pub fn is_unordered(self) -> bool {
        matches!(
            self.concrete(),
            CollectionKind::HashSet | CollectionKind::BTreeSet | CollectionKind::BinaryHeap
        )
    }

    /// Containers whose iteration order varies from run to run.
    pub fn is_hash_based(self) -> bool {
        self.concrete() == CollectionKind::HashSet
    }

    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Sequence => "Sequence",
            CollectionKind::Set => "Set",
            CollectionKind::Queue => "Queue",
            CollectionKind::OrderedSet => "OrderedSet",
            CollectionKind::Vec => "Vec",
            CollectionKind::VecDeque => "VecDeque",
            CollectionKind::LinkedList => "LinkedList",
            CollectionKind::HashSet => "HashSet",
            CollectionKind::BTreeSet => "BTreeSet",
            CollectionKind::BinaryHeap => "BinaryHeap",
        }
    }
}

/// Map shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    Map,
    OrderedMap,
    HashMap,
    BTreeMap,
}

impl MapKind {
    pub fn is_abstract(self) -> bool {
        matches!(self, MapKind::Map | MapKind::OrderedMap)
    }

    pub fn concrete(self) -> MapKind {
        match self {
            MapKind::Map => MapKind::HashMap,
            MapKind::OrderedMap => MapKind::BTreeMap,
            other => other,
        }
    }

    pub fn requires_ordering(self) -> bool {
        self.concrete() == MapKind::BTreeMap
    }

    pub fn is_hash_based(self) -> bool {
        self.concrete() == MapKind::HashMap
    }

    pub fn name(self) -> &'static str {
        match self {
            MapKind::Map => "Map",
            MapKind::OrderedMap => "OrderedMap",
            MapKind::HashMap => "HashMap",
            MapKind::BTreeMap => "BTreeMap",
        }
    }
}

/// Declared type of a parameter, field or method argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Non-nullable scalar.
    Scalar(ScalarKind),
    /// Nullable form of a scalar. Distinct from `Scalar` for override matching.
    Boxed(ScalarKind),
    Builtin(BuiltinKind),
    Array(Box<TypeRef>),
    Collection {
        kind: CollectionKind,
        elem: Box<TypeRef>,
    },
    Map {
        kind: MapKind,
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    /// A registered type, looked up by name.
    Named(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef::Named(name.into())
    }

    pub fn array(elem: TypeRef) -> TypeRef {
        TypeRef::Array(Box::new(elem))
    }

    pub fn collection(kind: CollectionKind, elem: TypeRef) -> TypeRef {
        TypeRef::Collection {
            kind,
            elem: Box::new(elem),
        }
    }

    pub fn map(kind: MapKind, key: TypeRef, value: TypeRef) -> TypeRef {
        TypeRef::Map {
            kind,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Every registered type name this shape mentions, including element,
    /// key and value types of containers.
    pub fn named_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            TypeRef::Named(name) => names.push(name.as_str()),
            TypeRef::Array(elem) => elem.collect_names(names),
            TypeRef::Collection { elem, .. } => elem.collect_names(names),
            TypeRef::Map { key, value, .. } => {
                key.collect_names(names);
                value.collect_names(names);
            }
            TypeRef::Scalar(_) | TypeRef::Boxed(_) | TypeRef::Builtin(_) => {}
        }
    }

    /// Members of these shapes are blanked before string representations are
    /// compared, since their text depends on hashing order or the clock.
    pub fn is_run_dependent(&self) -> bool {
        match self {
            TypeRef::Collection { kind, .. } => kind.is_hash_based(),
            TypeRef::Map { kind, .. } => kind.is_hash_based(),
            TypeRef::Builtin(kind) => kind.is_calendar(),
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => write!(f, "{}", kind.name()),
            TypeRef::Boxed(kind) => write!(f, "Option<{}>", kind.name()),
            TypeRef::Builtin(kind) => write!(f, "{}", kind.name()),
            TypeRef::Array(elem) => write!(f, "[{}]", elem),
            TypeRef::Collection { kind, elem } => write!(f, "{}<{}>", kind.name(), elem),
            TypeRef::Map { kind, key, value } => write!(f, "{}<{}, {}>", kind.name(), key, value),
            TypeRef::Named(name) => write!(f, "{}", name),
        }
    }
}
