//! Host values and the literals they coerce into.
use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};
use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumTryAs};

/// Host object the compiler knows nothing about. It can only be handed to a
/// serializer, which may downcast it back to its concrete type.
pub trait OpaqueObject: DowncastSync + std::fmt::Debug {}
impl_downcast!(sync OpaqueObject);

/// A dynamically typed value as supplied by the host.
///
/// Integers are arbitrary precision so that out-of-range host integers can be
/// rejected rather than silently truncated.
#[derive(Debug, Clone, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(HostValueKind))]
pub enum HostValue {
    Nil,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Str(String),
    /// Immutable byte buffer shared with the host; never copied.
    Bytes(Arc<[u8]>),
    /// Mutable host byte array. Goes through the serializer.
    ByteArray(Vec<u8>),
    List(Vec<HostValue>),
    /// Ordered key/value pairs.
    Map(Vec<(HostValue, HostValue)>),
    /// Geospatial object wrapping its raw geo data.
    Geo(Box<HostValue>),
    /// Matches any value in CDT comparisons.
    Wildcard,
    /// Sorts after every other value in CDT comparisons.
    Infinite,
    Object(Arc<dyn OpaqueObject>),
}

impl HostValue {
    pub fn int(value: impl Into<BigInt>) -> Self {
        HostValue::Int(value.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        HostValue::Str(value.into())
    }

    pub fn bytes(value: impl Into<Arc<[u8]>>) -> Self {
        HostValue::Bytes(value.into())
    }

    /// Look up `key` in a map value keyed by strings.
    pub fn get(&self, key: &str) -> Option<&HostValue> {
        match self {
            HostValue::Map(entries) => entries.iter().find_map(|(k, v)| match k {
                HostValue::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }
}

macro_rules! define_host_int_from {
    ($($typ:ty),* $(,)?) => {
        $(
            impl From<$typ> for HostValue {
                fn from(value: $typ) -> Self {
                    HostValue::Int(BigInt::from(value))
                }
            }
        )*
    };
}

define_host_int_from!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Str(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl<T: Into<HostValue>> From<Vec<T>> for HostValue {
    fn from(values: Vec<T>) -> Self {
        HostValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Serialized host value together with the type tag recorded by the serializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blob {
    pub type_tag: u8,
    pub bytes: Arc<[u8]>,
}

/// A typed value embedded in the instruction stream.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    Nil,
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// Unpacked string such as a bin name or a regular expression.
    RawStr(String),
    Bytes(Arc<[u8]>),
    Blob(Blob),
    GeoJson(String),
    List(Vec<Literal>),
    Map(Vec<(Literal, Literal)>),
    Wildcard,
    Infinite,
}

impl Literal {
    /// Structural nesting depth. Scalars have depth 0 and every container
    /// level adds one, so `[[1, 2], [3]]` has depth 2.
    pub fn depth(&self) -> usize {
        match self {
            Literal::List(items) => 1 + items.iter().map(Literal::depth).max().unwrap_or(0),
            Literal::Map(entries) => {
                1 + entries
                    .iter()
                    .map(|(k, v)| k.depth().max(v.depth()))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Uint(v) => write!(f, "{}u", v),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::RawStr(s) => write!(f, "raw{:?}", s),
            Literal::Bytes(b) => write!(f, "bytes[{}]", b.len()),
            Literal::Blob(blob) => write!(f, "blob<{}>[{}]", blob.type_tag, blob.bytes.len()),
            Literal::GeoJson(s) => write!(f, "geojson{:?}", s),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Literal::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Literal::Wildcard => write!(f, "*"),
            Literal::Infinite => write!(f, "inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(Literal::Int(1).depth(), 0);
        assert_eq!(Literal::List(vec![]).depth(), 1);
        let nested = Literal::List(vec![
            Literal::List(vec![Literal::Int(1), Literal::Int(2)]),
            Literal::List(vec![Literal::Int(3)]),
        ]);
        assert_eq!(nested.depth(), 2);
        let map = Literal::Map(vec![(Literal::Str("a".into()), nested)]);
        assert_eq!(map.depth(), 3);
    }

    #[test]
    fn test_host_map_lookup() {
        let map = HostValue::Map(vec![
            (HostValue::from("id"), HostValue::from(3)),
            (HostValue::from(7), HostValue::from("ignored")),
        ]);
        assert!(matches!(map.get("id"), Some(HostValue::Int(_))));
        assert!(map.get("value").is_none());
        assert!(HostValue::Nil.get("id").is_none());
    }

    #[test]
    fn test_display() {
        let lit = Literal::List(vec![Literal::Int(-4), Literal::Str("x".into()), Literal::Wildcard]);
        assert_eq!(lit.to_string(), "[-4, \"x\", *]");
    }
}
