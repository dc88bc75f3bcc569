//! Related-object expansion lists.
//!
//! `author, publisher(id,name)` requests two expansions, the second
//! with a nested field selection. The select text is copied verbatim;
//! the executor re-parses it against the target entity.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};

///
/// Expand
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Expand {
    pub name: String,
    /// Raw nested field list, without the surrounding parentheses.
    pub select: Option<String>,
}

impl Expand {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            select: None,
        }
    }

    #[must_use]
    pub fn with_select(name: impl Into<String>, select: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            select: Some(select.into()),
        }
    }
}

/// Parse an expansion list.
///
/// Splits on top-level commas only; commas nested inside matching
/// parentheses do not split. Empty or absent input yields an empty
/// list. Blank segments are skipped.
pub fn parse(text: Option<&str>) -> Result<Vec<Expand>, ParseError> {
    let Some(text) = text else {
        return Ok(Vec::new());
    };

    let mut expands = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (position, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedParen { position })?;
            }
            ',' if depth == 0 => {
                push_segment(&mut expands, &text[start..position], start)?;
                start = position + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::UnbalancedParen {
            position: text.len(),
        });
    }

    push_segment(&mut expands, &text[start..], start)?;

    Ok(expands)
}

fn push_segment(expands: &mut Vec<Expand>, segment: &str, offset: usize) -> Result<(), ParseError> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let Some(open) = trimmed.find('(') else {
        expands.push(Expand::new(trimmed));
        return Ok(());
    };

    // `name(select)` -- the close paren must end the segment.
    let Some(rest) = trimmed[open..].strip_suffix(')') else {
        return Err(ParseError::UnexpectedToken {
            position: offset + segment.len(),
            token: trimmed[open..].to_string(),
        });
    };

    let name = trimmed[..open].trim();
    if name.is_empty() {
        return Err(ParseError::UnexpectedToken {
            position: offset + open,
            token: "(".to_string(),
        });
    }

    expands.push(Expand::with_select(name, rest[1..].trim()));

    Ok(())
}
