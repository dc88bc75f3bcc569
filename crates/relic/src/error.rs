use relic_core::{
    model::CodecError,
    params::ParamError,
};
use thiserror::Error as ThisError;

///
/// ParseError
///
/// Malformed filter or expand text. Carries the byte offset of the
/// offending token; the whole expression is rejected, there is no
/// recovery.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("unbalanced parenthesis at byte {position}")]
    UnbalancedParen { position: usize },

    #[error("unexpected end of input at byte {position}")]
    UnexpectedEnd { position: usize },

    #[error("unexpected token '{token}' at byte {position}")]
    UnexpectedToken { position: usize, token: String },

    #[error("unknown operator '{token}' at byte {position}")]
    UnknownOperator { position: usize, token: String },

    #[error("unterminated quote opened at byte {position}")]
    UnterminatedQuote { position: usize },
}

///
/// ValidationError
///
/// A free-text SQL fragment failed the safety scanner.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("unexpected character '{ch}' at byte {position}")]
    UnexpectedChar { position: usize, ch: char },

    #[error("unexpected end of fragment at byte {position}")]
    UnexpectedEnd { position: usize },

    #[error("unexpected word '{word}' at byte {position}; expected 'asc' or 'desc'")]
    UnexpectedWord { position: usize, word: String },
}

///
/// QueryError
///
/// A filter/expand reference could not be resolved against the mapping
/// graph, or a literal does not fit its column.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("literal '{literal}' does not fit field '{field}' ({ty})")]
    InvalidLiteral {
        field: String,
        literal: String,
        ty: String,
    },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("unsupported expand path '{path}' on entity '{entity}': {reason}")]
    UnsupportedExpand {
        entity: String,
        path: String,
        reason: String,
    },
}

///
/// BackendError
///
/// Failure reported by the external SQL execution collaborator. Never
/// retried here; retry policy belongs to the caller.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("backend failure: {0}")]
pub struct BackendError(pub String);

///
/// EngineError
///
/// Aggregate returned from executor entry points. Every variant is a
/// caller-input or collaborator failure; mapping-graph faults abort
/// startup long before an executor exists.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum EngineError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
