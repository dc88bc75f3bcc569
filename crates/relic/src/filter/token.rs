use crate::error::ParseError;

///
/// Tok
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Tok {
    Word(String),
    Quoted(String),
    Colon,
    Comma,
    LParen,
    RParen,
}

impl Tok {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Word(w) => w.clone(),
            Self::Quoted(q) => format!("'{q}'"),
            Self::Colon => ":".to_string(),
            Self::Comma => ",".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
        }
    }
}

///
/// Spanned
///

#[derive(Clone, Debug)]
pub(crate) struct Spanned {
    pub tok: Tok,
    /// Byte offset into the source expression.
    pub position: usize,
}

// Word characters are anything that does not terminate a token.
const fn is_word_char(c: char) -> bool {
    !(c.is_whitespace() || matches!(c, '(' | ')' | ',' | ':' | '\''))
}

pub(crate) fn lex(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let tok = match c {
            '(' => {
                chars.next();
                Tok::LParen
            }
            ')' => {
                chars.next();
                Tok::RParen
            }
            ',' => {
                chars.next();
                Tok::Comma
            }
            ':' => {
                chars.next();
                Tok::Colon
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for (_, qc) in chars.by_ref() {
                    if qc == '\'' {
                        closed = true;
                        break;
                    }
                    text.push(qc);
                }
                if !closed {
                    return Err(ParseError::UnterminatedQuote { position });
                }
                Tok::Quoted(text)
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, wc)) = chars.peek() {
                    if !is_word_char(wc) {
                        break;
                    }
                    word.push(wc);
                    chars.next();
                }
                Tok::Word(word)
            }
        };

        out.push(Spanned { tok, position });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_splits_without_spaces() {
        let toks = lex("a:10").unwrap();
        let kinds: Vec<&Tok> = toks.iter().map(|s| &s.tok).collect();

        assert_eq!(
            kinds,
            [
                &Tok::Word("a".into()),
                &Tok::Colon,
                &Tok::Word("10".into())
            ]
        );
    }

    #[test]
    fn quoted_text_preserves_interior_spaces() {
        let toks = lex("name eq 'ada lovelace'").unwrap();

        assert_eq!(toks[2].tok, Tok::Quoted("ada lovelace".into()));
    }

    #[test]
    fn unterminated_quote_reports_open_position() {
        let err = lex("name eq 'ada").unwrap_err();

        assert_eq!(err, ParseError::UnterminatedQuote { position: 8 });
    }

    #[test]
    fn positions_are_byte_offsets() {
        let toks = lex("ab (cd)").unwrap();

        assert_eq!(toks[0].position, 0);
        assert_eq!(toks[1].position, 3);
        assert_eq!(toks[2].position, 4);
        assert_eq!(toks[3].position, 6);
    }
}
