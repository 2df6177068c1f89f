//! Conversion of host values into literals.
use std::sync::Arc;

use pxinstr::value::{Blob, HostValue, HostValueKind, Literal};

use crate::utils::error::{CompileError, CompileResult, ErrorKind, SerializerError};

/// Turns host values the compiler cannot represent natively (booleans,
/// mutable byte arrays, opaque objects) into a tagged byte blob.
pub trait Serializer: Send + Sync {
    fn serialize(&self, value: &HostValue) -> Result<Blob, SerializerError>;
}

/// Serializer used when the host installs none. Rejects every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSerializer;

impl Serializer for NoSerializer {
    fn serialize(&self, value: &HostValue) -> Result<Blob, SerializerError> {
        Err(SerializerError::new(
            ErrorKind::Parameter,
            format!(
                "no serializer installed for {:?} values",
                HostValueKind::from(value)
            ),
        ))
    }
}

/// Renders the geo data of a geospatial value as GeoJSON text.
pub trait GeoJsonDump: Send + Sync {
    fn dump(&self, geo_data: &HostValue) -> Result<String, SerializerError>;
}

/// Accepts geo data that is already GeoJSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextGeoJson;

impl GeoJsonDump for TextGeoJson {
    fn dump(&self, geo_data: &HostValue) -> Result<String, SerializerError> {
        match geo_data {
            HostValue::Str(text) => Ok(text.clone()),
            other => Err(SerializerError::new(
                ErrorKind::Parameter,
                format!(
                    "geo data must be GeoJSON text, found {:?}",
                    HostValueKind::from(other)
                ),
            )),
        }
    }
}

/// Converts one host value into exactly one literal.
#[derive(Clone, Copy)]
pub struct ValueCoercion<'a> {
    serializer: &'a dyn Serializer,
    geojson: &'a dyn GeoJsonDump,
}

impl<'a> ValueCoercion<'a> {
    pub fn new(serializer: &'a dyn Serializer, geojson: &'a dyn GeoJsonDump) -> Self {
        Self {
            serializer,
            geojson,
        }
    }

    /// Coerce an argument that may be missing from its bag.
    pub fn coerce(&self, value: Option<&HostValue>) -> CompileResult<Literal> {
        let value = value.ok_or(CompileError::NullValue)?;
        self.coerce_value(value)
    }

    /// Coerce a present value. Containers are converted element by element;
    /// the first failing element aborts the whole conversion.
    pub fn coerce_value(&self, value: &HostValue) -> CompileResult<Literal> {
        match value {
            HostValue::Nil => Ok(Literal::Nil),
            HostValue::Int(i) => i64::try_from(i)
                .map(Literal::Int)
                .map_err(|_| CompileError::IntegerOverflow),
            HostValue::Float(f) => Ok(Literal::Float(*f)),
            HostValue::Str(s) => Ok(Literal::Str(s.clone())),
            // Shared with the host, the buffer must outlive the compiled expression.
            HostValue::Bytes(bytes) => Ok(Literal::Bytes(Arc::clone(bytes))),
            HostValue::List(items) => items
                .iter()
                .map(|item| self.coerce_value(item))
                .collect::<CompileResult<Vec<_>>>()
                .map(Literal::List),
            HostValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| -> CompileResult<(Literal, Literal)> {
                    Ok((self.coerce_value(k)?, self.coerce_value(v)?))
                })
                .collect::<CompileResult<Vec<_>>>()
                .map(Literal::Map),
            HostValue::Geo(data) => Ok(Literal::GeoJson(self.geojson.dump(data)?)),
            HostValue::Wildcard => Ok(Literal::Wildcard),
            HostValue::Infinite => Ok(Literal::Infinite),
            HostValue::Bool(_) | HostValue::ByteArray(_) | HostValue::Object(_) => {
                Ok(Literal::Blob(self.serializer.serialize(value)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;

    fn coercion() -> ValueCoercion<'static> {
        ValueCoercion::new(&NoSerializer, &TextGeoJson)
    }

    #[test]
    fn test_integer_bounds() {
        let c = coercion();
        assert_eq!(
            c.coerce_value(&HostValue::from(i64::MIN)).unwrap(),
            Literal::Int(i64::MIN)
        );
        let above = HostValue::Int(BigInt::from(i64::MAX) + 1);
        assert!(matches!(
            c.coerce_value(&above),
            Err(CompileError::IntegerOverflow)
        ));
    }

    #[test]
    fn test_missing_value_is_client_error() {
        let err = coercion().coerce(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.to_string(), "value is null");
    }

    #[test]
    fn test_default_serializer_rejects_bool() {
        let err = coercion().coerce_value(&HostValue::Bool(true)).unwrap_err();
        assert!(matches!(err, CompileError::Serializer(_)));
        assert_eq!(err.kind(), ErrorKind::Parameter);
    }

    #[test]
    fn test_geo_text() {
        let geo = HostValue::Geo(Box::new(HostValue::from("{\"type\":\"Point\"}")));
        assert_eq!(
            coercion().coerce_value(&geo).unwrap(),
            Literal::GeoJson("{\"type\":\"Point\"}".into())
        );
    }
}
