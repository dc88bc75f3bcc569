use crate::value::Value;
use std::fmt;
use thiserror::Error as ThisError;

///
/// CodecError
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("cannot decode stored value of type {0}")]
    DecodeType(&'static str),

    #[error("invalid encoded payload: {0}")]
    Payload(String),

    #[error("cannot encode value of type {0}")]
    Unsupported(&'static str),
}

///
/// FieldCodec
///
/// Encodes a composite value into a scalar column representation and
/// decodes it back during row materialization. Implementations must be
/// pure; the engine calls them concurrently without locks.
///

pub trait FieldCodec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Value, CodecError>;
    fn decode(&self, stored: Value) -> Result<Value, CodecError>;
}

impl fmt::Debug for dyn FieldCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldCodec")
    }
}

///
/// JsonFieldCodec
///
/// Default codec: composite values round-trip through a JSON text
/// column. Maps/objects are rejected because `Value` has no map
/// variant.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFieldCodec;

impl FieldCodec for JsonFieldCodec {
    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        let json = to_json(value)?;
        let text = serde_json::to_string(&json).map_err(|e| CodecError::Payload(e.to_string()))?;

        Ok(Value::Text(text))
    }

    fn decode(&self, stored: Value) -> Result<Value, CodecError> {
        match stored {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => {
                let json: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|e| CodecError::Payload(e.to_string()))?;

                from_json(json)
            }
            other => Err(CodecError::DecodeType(other.type_name())),
        }
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value, CodecError> {
    use serde_json::Value as Json;

    let json = match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::Int(v) => Json::from(*v),
        Value::Uint(v) => Json::from(*v),
        Value::Float(v) => serde_json::Number::from_f64(*v)
            .map(Json::Number)
            .ok_or(CodecError::Unsupported("float"))?,
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(_) => return Err(CodecError::Unsupported("bytes")),
        Value::List(vs) => Json::Array(vs.iter().map(to_json).collect::<Result<_, _>>()?),
    };

    Ok(json)
}

fn from_json(json: serde_json::Value) -> Result<Value, CodecError> {
    use serde_json::Value as Json;

    let value = match json {
        Json::Null => Value::Null,
        Json::Bool(v) => Value::Bool(v),
        Json::Number(n) => {
            if let Some(v) = n.as_i64() {
                Value::Int(v)
            } else if let Some(v) = n.as_u64() {
                Value::Uint(v)
            } else if let Some(v) = n.as_f64() {
                Value::Float(v)
            } else {
                return Err(CodecError::Payload(format!("unrepresentable number {n}")));
            }
        }
        Json::String(s) => Value::Text(s),
        Json::Array(vs) => Value::List(vs.into_iter().map(from_json).collect::<Result<_, _>>()?),
        Json::Object(_) => return Err(CodecError::DecodeType("object")),
    };

    Ok(value)
}
