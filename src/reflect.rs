//! Conversions between Rust types and [`Value`]s
//!
//! Registered types describe their members with ordinary Rust types; these
//! traits carry values across that boundary and report the declared shape of
//! each Rust type as a [`TypeRef`]. Object and enumeration types get their
//! impls from the `data_object!` and `enumeration!` macros.

use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use std::io::Cursor;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use half::f16;
use uuid::Uuid;

use crate::descriptor::{DataObject, Enumeration};
use crate::fault::Fault;
use crate::instance::Instance;
use crate::types::{BuiltinKind, CollectionKind, MapKind, ScalarKind, TypeRef};
use crate::value::{EnumValue, Value};

/// The declared shape of a Rust type.
pub trait Reflect {
    fn type_ref() -> TypeRef;
}

/// Build a Rust value from a dynamic value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, Fault>;
}

/// Turn a Rust value into a dynamic value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

fn null_for(type_name: &str) -> Fault {
    Fault::NullReference(format!("null passed where {} was expected", type_name))
}

macro_rules! scalar_value {
    ($($t:ty => $variant:ident;)*) => {
        $(
            impl Reflect for $t {
                fn type_ref() -> TypeRef {
                    TypeRef::Scalar(ScalarKind::$variant)
                }
            }

            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self, Fault> {
                    match value {
                        Value::$variant(v) => Ok(*v),
                        Value::Null => Err(null_for(stringify!($t))),
                        other => Err(Fault::mismatch(stringify!($t), other.kind_name())),
                    }
                }
            }

            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

scalar_value! {
    bool => Bool;
    i8 => I8;
    i16 => I16;
    i32 => I32;
    i64 => I64;
    i128 => I128;
    u8 => U8;
    u16 => U16;
    u32 => U32;
    u64 => U64;
    f16 => F16;
    f32 => F32;
    f64 => F64;
    char => Char;
}

macro_rules! builtin_value {
    ($($t:ty => $variant:ident;)*) => {
        $(
            impl Reflect for $t {
                fn type_ref() -> TypeRef {
                    TypeRef::Builtin(BuiltinKind::$variant)
                }
            }

            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

builtin_value! {
    Uuid => Uuid;
    NaiveDate => Date;
    NaiveTime => Time;
    NaiveDateTime => DateTime;
    DateTime<Utc> => Timestamp;
    Duration => Duration;
    PathBuf => Path;
    IpAddr => IpAddr;
    SocketAddr => SocketAddr;
}

macro_rules! builtin_from_value {
    ($($t:ty => $variant:ident;)*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self, Fault> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        Value::Null => Err(null_for(stringify!($t))),
                        other => Err(Fault::mismatch(stringify!($t), other.kind_name())),
                    }
                }
            }
        )*
    };
}

builtin_from_value! {
    Uuid => Uuid;
    Duration => Duration;
    PathBuf => Path;
    IpAddr => IpAddr;
    SocketAddr => SocketAddr;
}

// Calendar values accept null as the epoch so that string comparison can blank
// them on a working copy.
fn epoch() -> Result<NaiveDateTime, Fault> {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Fault::Other("epoch is not representable".to_string()))
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Date(v) => Ok(*v),
            Value::Null => Ok(epoch()?.date()),
            other => Err(Fault::mismatch("NaiveDate", other.kind_name())),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Time(v) => Ok(*v),
            Value::Null => Ok(epoch()?.time()),
            other => Err(Fault::mismatch("NaiveTime", other.kind_name())),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::DateTime(v) => Ok(*v),
            Value::Null => epoch(),
            other => Err(Fault::mismatch("NaiveDateTime", other.kind_name())),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Timestamp(v) => Ok(*v),
            Value::Null => Ok(Utc.from_utc_datetime(&epoch()?)),
            other => Err(Fault::mismatch("DateTime<Utc>", other.kind_name())),
        }
    }
}

impl Reflect for String {
    fn type_ref() -> TypeRef {
        TypeRef::Builtin(BuiltinKind::Text)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Null => Err(null_for("String")),
            other => Err(Fault::mismatch("String", other.kind_name())),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl Reflect for Cursor<Vec<u8>> {
    fn type_ref() -> TypeRef {
        TypeRef::Builtin(BuiltinKind::ByteStream)
    }
}

impl FromValue for Cursor<Vec<u8>> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::ByteStream(bytes) => Ok(Cursor::new(bytes.clone())),
            Value::Null => Err(null_for("Cursor<Vec<u8>>")),
            other => Err(Fault::mismatch("Cursor<Vec<u8>>", other.kind_name())),
        }
    }
}

impl IntoValue for Cursor<Vec<u8>> {
    fn into_value(self) -> Value {
        Value::ByteStream(self.into_inner())
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_ref() -> TypeRef {
        match T::type_ref() {
            TypeRef::Scalar(kind) => TypeRef::Boxed(kind),
            other => other,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(value.clone())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Instance {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Object(instance) => Ok(instance.clone()),
            Value::Null => Err(null_for("object")),
            other => Err(Fault::mismatch("object", other.kind_name())),
        }
    }
}

impl IntoValue for Instance {
    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

fn items_of<'a>(value: &'a Value, expected: &str) -> Result<&'a [Value], Fault> {
    match value {
        Value::Collection { items, .. } | Value::Array(items) => Ok(items),
        Value::Null => Err(null_for(expected)),
        other => Err(Fault::mismatch(expected, other.kind_name())),
    }
}

fn convert_items<T: FromValue>(items: &[Value]) -> Result<Vec<T>, Fault> {
    items.iter().map(T::from_value).collect()
}

fn collection_value<T: IntoValue>(kind: CollectionKind, items: impl IntoIterator<Item = T>) -> Value {
    Value::Collection {
        kind,
        items: items.into_iter().map(IntoValue::into_value).collect(),
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn type_ref() -> TypeRef {
        TypeRef::array(T::type_ref())
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(convert_items(items_of(value, "array")?)?.into_boxed_slice())
    }
}

impl<T: IntoValue> IntoValue for Box<[T]> {
    fn into_value(self) -> Value {
        Value::Array(self.into_vec().into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::Vec, T::type_ref())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        convert_items(items_of(value, "Vec")?)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        collection_value(CollectionKind::Vec, self)
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::VecDeque, T::type_ref())
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(convert_items(items_of(value, "VecDeque")?)?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        collection_value(CollectionKind::VecDeque, self)
    }
}

impl<T: Reflect> Reflect for LinkedList<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::LinkedList, T::type_ref())
    }
}

impl<T: FromValue> FromValue for LinkedList<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(convert_items(items_of(value, "LinkedList")?)?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for LinkedList<T> {
    fn into_value(self) -> Value {
        collection_value(CollectionKind::LinkedList, self)
    }
}

impl<T: Reflect> Reflect for HashSet<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::HashSet, T::type_ref())
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Null => Ok(HashSet::new()),
            other => Ok(convert_items(items_of(other, "HashSet")?)?.into_iter().collect()),
        }
    }
}

impl<T: IntoValue> IntoValue for HashSet<T> {
    fn into_value(self) -> Value {
        collection_value(CollectionKind::HashSet, self)
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::BTreeSet, T::type_ref())
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(convert_items(items_of(value, "BTreeSet")?)?.into_iter().collect())
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        collection_value(CollectionKind::BTreeSet, self)
    }
}

impl<T: Reflect> Reflect for BinaryHeap<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::BinaryHeap, T::type_ref())
    }
}

impl<T: FromValue + Ord> FromValue for BinaryHeap<T> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(convert_items(items_of(value, "BinaryHeap")?)?.into_iter().collect())
    }
}

impl<T: IntoValue + Ord> IntoValue for BinaryHeap<T> {
    fn into_value(self) -> Value {
        collection_value(CollectionKind::BinaryHeap, self.into_sorted_vec())
    }
}

fn entries_of<'a>(value: &'a Value, expected: &str) -> Result<&'a [(Value, Value)], Fault> {
    match value {
        Value::Map { entries, .. } => Ok(entries),
        Value::Null => Err(null_for(expected)),
        other => Err(Fault::mismatch(expected, other.kind_name())),
    }
}

fn convert_entries<K: FromValue, V: FromValue>(entries: &[(Value, Value)]) -> Result<Vec<(K, V)>, Fault> {
    entries
        .iter()
        .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
        .collect()
}

fn map_value<K: IntoValue, V: IntoValue>(kind: MapKind, entries: impl IntoIterator<Item = (K, V)>) -> Value {
    Value::Map {
        kind,
        entries: entries
            .into_iter()
            .map(|(k, v)| (k.into_value(), v.into_value()))
            .collect(),
    }
}

impl<K: Reflect, V: Reflect> Reflect for HashMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(MapKind::HashMap, K::type_ref(), V::type_ref())
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        match value {
            Value::Null => Ok(HashMap::new()),
            other => Ok(convert_entries(entries_of(other, "HashMap")?)?.into_iter().collect()),
        }
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        map_value(MapKind::HashMap, self)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(MapKind::BTreeMap, K::type_ref(), V::type_ref())
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, Fault> {
        Ok(convert_entries(entries_of(value, "BTreeMap")?)?.into_iter().collect())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        map_value(MapKind::BTreeMap, self)
    }
}

/// Clone a registered object out of an object value.
pub fn object_from_value<T: DataObject>(value: &Value) -> Result<T, Fault> {
    match value {
        Value::Object(instance) => instance.get::<T>(),
        Value::Null => Err(null_for(T::NAME)),
        other => Err(Fault::mismatch(T::NAME, other.kind_name())),
    }
}

/// Look up the enumerator an enum value refers to.
pub fn enumerator_from_value<E: Enumeration>(value: &Value) -> Result<E, Fault> {
    match value {
        Value::Enum(e) if e.type_name == E::NAME => E::variants()
            .into_iter()
            .nth(e.ordinal)
            .ok_or_else(|| Fault::NotFound(format!("{} has no enumerator #{}", E::NAME, e.ordinal))),
        Value::Null => Err(null_for(E::NAME)),
        other => Err(Fault::mismatch(E::NAME, other.kind_name())),
    }
}

/// Describe an enumerator as a dynamic value.
pub fn enumerator_value<E: Enumeration>(variant: &E) -> Value {
    let ordinal = E::variants().iter().position(|v| v == variant).unwrap_or(0);
    Value::Enum(EnumValue {
        type_name: E::NAME.to_string(),
        name: variant.variant_name(),
        ordinal,
    })
}

/// Implement the value conversions for types that implement `DataObject`.
#[macro_export]
macro_rules! data_object {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::reflect::Reflect for $t {
                fn type_ref() -> $crate::types::TypeRef {
                    $crate::types::TypeRef::named(<$t as $crate::descriptor::DataObject>::NAME)
                }
            }

            impl $crate::reflect::FromValue for $t {
                fn from_value(value: &$crate::value::Value) -> ::std::result::Result<Self, $crate::fault::Fault> {
                    $crate::reflect::object_from_value::<$t>(value)
                }
            }

            impl $crate::reflect::IntoValue for $t {
                fn into_value(self) -> $crate::value::Value {
                    $crate::value::Value::Object($crate::instance::Instance::adopt(self))
                }
            }
        )+
    };
}

/// Implement the value conversions for types that implement `Enumeration`.
#[macro_export]
macro_rules! enumeration {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::reflect::Reflect for $t {
                fn type_ref() -> $crate::types::TypeRef {
                    $crate::types::TypeRef::named(<$t as $crate::descriptor::Enumeration>::NAME)
                }
            }

            impl $crate::reflect::FromValue for $t {
                fn from_value(value: &$crate::value::Value) -> ::std::result::Result<Self, $crate::fault::Fault> {
                    $crate::reflect::enumerator_from_value::<$t>(value)
                }
            }

            impl $crate::reflect::IntoValue for $t {
                fn into_value(self) -> $crate::value::Value {
                    $crate::reflect::enumerator_value(&self)
                }
            }
        )+
    };
}

/// Build a parameter list from Rust types: `params![String, Option<i32>]`.
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::types::TypeRef>::new()
    };
    ($($t:ty),+ $(,)?) => {
        vec![$(<$t as $crate::reflect::Reflect>::type_ref()),+]
    };
}
