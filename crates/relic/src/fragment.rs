//! SQL fragment safety scanner.
//!
//! Caller-supplied fragments (order-by clauses) are concatenated into
//! generated SQL, so they are validated character by character against
//! an identifier grammar instead of being parsed as SQL. Deliberately
//! conservative: function calls and nested expressions are rejected
//! outright; only dotted identifiers and the two sort keywords pass.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

///
/// OrderBy
///
/// One validated sort term.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderBy {
    /// Dotted identifier exactly as written.
    pub field: String,
    pub descending: bool,
}

/// Validate an order-by fragment without keeping the parts.
pub fn validate_order_by(fragment: &str) -> Result<(), ValidationError> {
    parse_order_by(fragment).map(|_| ())
}

/// Scan an order-by fragment into sort terms.
///
/// Grammar per term: dotted identifier, optional `asc`/`desc`
/// (case-insensitive), then `,` or end of input.
pub fn parse_order_by(fragment: &str) -> Result<Vec<OrderBy>, ValidationError> {
    let mut scanner = Scanner::new(fragment);
    let mut terms = Vec::new();

    loop {
        scanner.skip_whitespace();
        if scanner.at_end() {
            return Ok(terms);
        }

        let field = scanner.scan_name()?;

        scanner.skip_whitespace();
        let descending = if scanner.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            let position = scanner.position;
            let word = scanner.scan_word();
            if word.eq_ignore_ascii_case("asc") {
                false
            } else if word.eq_ignore_ascii_case("desc") {
                true
            } else {
                return Err(ValidationError::UnexpectedWord { position, word });
            }
        } else {
            false
        };

        terms.push(OrderBy { field, descending });

        scanner.skip_whitespace();
        match scanner.peek() {
            None => return Ok(terms),
            Some(',') => {
                scanner.advance();
                scanner.skip_whitespace();
                if scanner.at_end() {
                    return Err(ValidationError::UnexpectedEnd {
                        position: scanner.position,
                    });
                }
            }
            Some(ch) => {
                return Err(ValidationError::UnexpectedChar {
                    position: scanner.position,
                    ch,
                });
            }
        }
    }
}

///
/// Scanner
///
/// Single-pass character scanner with the two primitive productions
/// `scan_name` and `scan_word`.
///

struct Scanner<'a> {
    input: &'a str,
    position: usize,
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.position += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    // Consume a dotted identifier until a comma, whitespace, or end of
    // input. Any other character inside the token is fatal.
    fn scan_name(&mut self) -> Result<String, ValidationError> {
        let start = self.position;

        loop {
            match self.peek() {
                None => break,
                Some(c) if c.is_whitespace() || c == ',' => break,
                Some(c) if is_ident_char(c) || c == '.' => self.advance(),
                Some(ch) => {
                    return Err(ValidationError::UnexpectedChar {
                        position: self.position,
                        ch,
                    });
                }
            }
        }

        if start == self.position {
            // The current character terminated the name before it
            // started, e.g. a leading comma.
            return Err(ValidationError::UnexpectedChar {
                position: self.position,
                ch: self.peek().unwrap_or(','),
            });
        }

        Ok(self.input[start..self.position].to_string())
    }

    // Consume a run of letters.
    fn scan_word(&mut self) -> String {
        let start = self.position;

        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }

        self.input[start..self.position].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fragment_validates() {
        validate_order_by("name asc, created_at desc").unwrap();
        validate_order_by("name").unwrap();
        validate_order_by("author.name desc").unwrap();
        validate_order_by("").unwrap();
    }

    #[test]
    fn direction_defaults_to_ascending() {
        let terms = parse_order_by("name, age desc").unwrap();

        assert_eq!(
            terms,
            [
                OrderBy {
                    field: "name".into(),
                    descending: false
                },
                OrderBy {
                    field: "age".into(),
                    descending: true
                },
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let terms = parse_order_by("name ASC, age DESC").unwrap();

        assert!(!terms[0].descending);
        assert!(terms[1].descending);
    }

    #[test]
    fn function_calls_are_rejected() {
        let err = validate_order_by("name(evil)").unwrap_err();

        assert_eq!(err, ValidationError::UnexpectedChar { position: 4, ch: '(' });
    }

    #[test]
    fn stray_parenthesis_is_rejected() {
        let err = validate_order_by("age, )").unwrap_err();

        assert_eq!(err, ValidationError::UnexpectedChar { position: 5, ch: ')' });
    }

    #[test]
    fn unknown_sort_keyword_is_rejected() {
        let err = validate_order_by("name sideways").unwrap_err();

        assert_eq!(
            err,
            ValidationError::UnexpectedWord {
                position: 5,
                word: "sideways".into()
            }
        );
    }

    #[test]
    fn trailing_comma_is_rejected() {
        assert!(matches!(
            validate_order_by("name asc,").unwrap_err(),
            ValidationError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn injection_shapes_are_rejected() {
        for fragment in ["name; drop table users", "name--", "1=1", "name asc, (select 1)"] {
            assert!(validate_order_by(fragment).is_err(), "accepted {fragment:?}");
        }
    }
}
