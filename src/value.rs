//! Dynamic values flowing through synthesis and verification
//!
//! Every argument handed to an initializer or mutator, and every value read
//! back from a field or accessor, is a `Value`. Object values are shared
//! handles: cloning a `Value::Object` aliases the same instance.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use half::f16;
use uuid::Uuid;

use crate::fault::Fault;
use crate::instance::Instance;
use crate::types::{CollectionKind, MapKind};

/// One enumerator of a registered enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub name: String,
    pub ordinal: usize,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F16(f16),
    F32(f32),
    F64(f64),
    Char(char),
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Duration(Duration),
    Path(PathBuf),
    IpAddr(IpAddr),
    SocketAddr(SocketAddr),
    ByteStream(Vec<u8>),
    Array(Vec<Value>),
    Collection {
        kind: CollectionKind,
        items: Vec<Value>,
    },
    Map {
        kind: MapKind,
        entries: Vec<(Value, Value)>,
    },
    Enum(EnumValue),
    Object(Instance),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Short description of the value's shape, used in mismatch reports.
    pub fn kind_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::I8(_) => "i8".to_string(),
            Value::I16(_) => "i16".to_string(),
            Value::I32(_) => "i32".to_string(),
            Value::I64(_) => "i64".to_string(),
            Value::I128(_) => "i128".to_string(),
            Value::U8(_) => "u8".to_string(),
            Value::U16(_) => "u16".to_string(),
            Value::U32(_) => "u32".to_string(),
            Value::U64(_) => "u64".to_string(),
            Value::F16(_) => "f16".to_string(),
            Value::F32(_) => "f32".to_string(),
            Value::F64(_) => "f64".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Text(_) => "String".to_string(),
            Value::Uuid(_) => "Uuid".to_string(),
            Value::Date(_) => "NaiveDate".to_string(),
            Value::Time(_) => "NaiveTime".to_string(),
            Value::DateTime(_) => "NaiveDateTime".to_string(),
            Value::Timestamp(_) => "DateTime<Utc>".to_string(),
            Value::Duration(_) => "Duration".to_string(),
            Value::Path(_) => "PathBuf".to_string(),
            Value::IpAddr(_) => "IpAddr".to_string(),
            Value::SocketAddr(_) => "SocketAddr".to_string(),
            Value::ByteStream(_) => "Cursor<Vec<u8>>".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Collection { kind, .. } => kind.name().to_string(),
            Value::Map { kind, .. } => kind.name().to_string(),
            Value::Enum(e) => e.type_name.clone(),
            Value::Object(instance) => instance.type_name().to_string(),
        }
    }

    /// Value equality as the type under test sees it.
    ///
    /// Floats compare by bit pattern, so NaN equals NaN and `0.0` differs from
    /// `-0.0`. Sets, heaps and maps ignore order. Objects defer to their
    /// declared equality, or to identity when none is declared.
    pub fn equals(&self, other: &Value) -> Result<bool, Fault> {
        let equal = match (self, other) {
            (Value::Object(left), _) => return left.equals(other),
            (_, Value::Object(_)) => false,
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::I128(a), Value::I128(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F16(a), Value::F16(b)) => a.to_bits() == b.to_bits(),
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::IpAddr(a), Value::IpAddr(b)) => a == b,
            (Value::SocketAddr(a), Value::SocketAddr(b)) => a == b,
            (Value::ByteStream(a), Value::ByteStream(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => return sequence_eq(a, b),
            (
                Value::Collection { kind: ka, items: a },
                Value::Collection { kind: kb, items: b },
            ) => {
                return if ka.is_unordered() || kb.is_unordered() {
                    multiset_eq(a, b)
                } else {
                    sequence_eq(a, b)
                };
            }
            (Value::Map { entries: a, .. }, Value::Map { entries: b, .. }) => return map_eq(a, b),
            (Value::Enum(a), Value::Enum(b)) => a.type_name == b.type_name && a.ordinal == b.ordinal,
            _ => false,
        };
        Ok(equal)
    }

    /// A copy that shares no object instance with `self`.
    pub fn detached(&self) -> Result<Value, Fault> {
        Ok(match self {
            Value::Object(instance) => Value::Object(instance.duplicate()?),
            Value::Array(items) => Value::Array(detach_all(items)?),
            Value::Collection { kind, items } => Value::Collection {
                kind: *kind,
                items: detach_all(items)?,
            },
            Value::Map { kind, entries } => {
                let mut copied = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    copied.push((key.detached()?, value.detached()?));
                }
                Value::Map {
                    kind: *kind,
                    entries: copied,
                }
            }
            other => other.clone(),
        })
    }

    /// Textual form, using the declared string conversion for objects.
    pub fn to_text(&self) -> Result<String, Fault> {
        match self {
            Value::Object(instance) => instance.to_text(),
            Value::Array(items) | Value::Collection { items, .. } => {
                let parts = items.iter().map(Value::to_text).collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", parts.join(", ")))
            }
            Value::Map { entries, .. } => {
                let mut parts = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    parts.push(format!("{}={}", key.to_text()?, value.to_text()?));
                }
                Ok(format!("{{{}}}", parts.join(", ")))
            }
            other => Ok(other.scalar_text()),
        }
    }

    fn scalar_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::I128(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F16(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            Value::Text(v) => v.clone(),
            Value::Uuid(v) => v.to_string(),
            Value::Date(v) => v.to_string(),
            Value::Time(v) => v.to_string(),
            Value::DateTime(v) => v.to_string(),
            Value::Timestamp(v) => v.to_rfc3339(),
            Value::Duration(v) => format!("{:?}", v),
            Value::Path(v) => v.display().to_string(),
            Value::IpAddr(v) => v.to_string(),
            Value::SocketAddr(v) => v.to_string(),
            Value::ByteStream(v) => format!("Cursor({} bytes)", v.len()),
            Value::Enum(e) => e.name.clone(),
            Value::Array(_) | Value::Collection { .. } | Value::Map { .. } | Value::Object(_) => {
                self.kind_name()
            }
        }
    }
}

fn detach_all(items: &[Value]) -> Result<Vec<Value>, Fault> {
    items.iter().map(Value::detached).collect()
}

fn sequence_eq(a: &[Value], b: &[Value]) -> Result<bool, Fault> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !x.equals(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn multiset_eq(a: &[Value], b: &[Value]) -> Result<bool, Fault> {
    if a.len() != b.len() {
        return Ok(false);
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && x.equals(y)? {
                used[i] = true;
                continue 'outer;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

fn map_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> Result<bool, Fault> {
    if a.len() != b.len() {
        return Ok(false);
    }
    'outer: for (key, value) in a {
        for (other_key, other_value) in b {
            if key.equals(other_key)? {
                if value.equals(other_value)? {
                    continue 'outer;
                }
                return Ok(false);
            }
        }
        return Ok(false);
    }
    Ok(true)
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => write!(f, "{}", text),
            Err(fault) => write!(f, "<{}>", fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_equality_uses_bits() {
        assert!(Value::F64(f64::NAN).equals(&Value::F64(f64::NAN)).unwrap());
        assert!(!Value::F64(0.0).equals(&Value::F64(-0.0)).unwrap());
        assert!(Value::F32(1.5).equals(&Value::F32(1.5)).unwrap());
    }

    #[test]
    fn test_sets_ignore_order_but_sequences_do_not() {
        let set = |items: Vec<i32>| Value::Collection {
            kind: CollectionKind::HashSet,
            items: items.into_iter().map(Value::I32).collect(),
        };
        let seq = |items: Vec<i32>| Value::Collection {
            kind: CollectionKind::Vec,
            items: items.into_iter().map(Value::I32).collect(),
        };
        assert_eq!(set(vec![1, 2, 3]), set(vec![3, 1, 2]));
        assert_ne!(seq(vec![1, 2, 3]), seq(vec![3, 1, 2]));
        assert_ne!(set(vec![1, 1]), set(vec![1, 2]));
    }

    #[test]
    fn test_map_equality_matches_keys() {
        let left = Value::Map {
            kind: MapKind::HashMap,
            entries: vec![(Value::I32(1), Value::Text("a".into())), (Value::I32(2), Value::Text("b".into()))],
        };
        let right = Value::Map {
            kind: MapKind::HashMap,
            entries: vec![(Value::I32(2), Value::Text("b".into())), (Value::I32(1), Value::Text("a".into()))],
        };
        let different = Value::Map {
            kind: MapKind::HashMap,
            entries: vec![(Value::I32(2), Value::Text("a".into())), (Value::I32(1), Value::Text("b".into()))],
        };
        assert_eq!(left, right);
        assert_ne!(left, different);
    }

    #[test]
    fn test_null_only_equals_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Null, Value::I32(0));
        assert_ne!(Value::Text(String::new()), Value::Null);
    }

    #[test]
    fn test_text_rendering() {
        let value = Value::Array(vec![Value::I32(1), Value::Text("x".into())]);
        assert_eq!(value.to_string(), "[1, x]");
    }
}
