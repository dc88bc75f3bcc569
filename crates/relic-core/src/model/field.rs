use crate::{model::codec::FieldCodec, value::Value};
use std::{fmt, sync::Arc};

///
/// FieldType
///
/// Logical column type. This is a lossy projection of host-language
/// types; it exists so the query layer can coerce bare filter literals
/// and validate bind values without reflection.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Bytes,
    /// Composite value stored as an encoded scalar; requires a codec.
    Json,
}

impl FieldType {
    /// Coerce a bare (unquoted) filter literal into a bind value.
    ///
    /// Returns `None` when the literal does not fit the column type.
    #[must_use]
    pub fn parse_literal(self, raw: &str) -> Option<Value> {
        if raw.eq_ignore_ascii_case("null") {
            return Some(Value::Null);
        }

        match self {
            Self::Bool => match raw {
                _ if raw.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
                _ if raw.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
                _ => None,
            },
            Self::Int => raw.parse::<i64>().ok().map(Value::Int),
            Self::Uint => raw.parse::<u64>().ok().map(Value::Uint),
            Self::Float => raw.parse::<f64>().ok().map(Value::Float),
            Self::Text | Self::Json => Some(Value::Text(raw.to_string())),
            Self::Bytes => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Json => "json",
        };
        write!(f, "{label}")
    }
}

///
/// FieldMapping
///
/// One mapped column. Owned by its [`super::EntityMapping`]; never
/// mutated post-build.
///

#[derive(Clone)]
pub struct FieldMapping {
    /// Field name as used in filters, expands, and parameter bags.
    pub name: String,
    /// Physical column name.
    pub column: String,
    pub ty: FieldType,
    pub nullable: bool,
    /// Codec for composite values stored as encoded scalars.
    pub codec: Option<Arc<dyn FieldCodec>>,
    /// Opaque value-generator id consumed by write-side collaborators.
    pub generator: Option<String>,
}

impl fmt::Debug for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .field("codec", &self.codec.is_some())
            .field("generator", &self.generator)
            .finish()
    }
}
