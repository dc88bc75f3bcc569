use crate::{
    error::ParseError,
    filter::{
        CompareOp, Comparison, FilterNode, FilterValue,
        token::{Spanned, Tok, lex},
    },
};

/// Parse a filter expression into a [`FilterNode`].
///
/// Precedence: `and` (and its `,` alias) binds tighter than `or`, so
/// `a eq b or c ge 10 and d eq e` groups as
/// `a eq b or (c ge 10 and d eq e)`. Both operators associate left.
pub fn parse(input: &str) -> Result<FilterNode, ParseError> {
    let tokens = lex(input)?;
    let mut parser = Parser {
        tokens,
        index: 0,
        end: input.len(),
    };

    let node = parser.expr()?;

    match parser.peek() {
        Some(spanned) => Err(ParseError::UnexpectedToken {
            position: spanned.position,
            token: spanned.tok.describe(),
        }),
        None => Ok(node),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
    /// Byte length of the source, used for end-of-input positions.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.index).cloned();
        if spanned.is_some() {
            self.index += 1;
        }
        spanned
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if let Some(Spanned {
            tok: Tok::Word(w), ..
        }) = self.peek()
            && w.eq_ignore_ascii_case(keyword)
        {
            self.index += 1;
            return true;
        }
        false
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek().is_some_and(|s| &s.tok == tok) {
            self.index += 1;
            return true;
        }
        false
    }

    // expr := term ("or" term)*
    fn expr(&mut self) -> Result<FilterNode, ParseError> {
        let mut node = self.term()?;

        while self.eat_keyword("or") {
            let right = self.term()?;
            node = FilterNode::or(node, right);
        }

        Ok(node)
    }

    // term := factor (("and" | ",") factor)*
    fn term(&mut self) -> Result<FilterNode, ParseError> {
        let mut node = self.factor()?;

        loop {
            if self.eat_keyword("and") || self.eat(&Tok::Comma) {
                let right = self.factor()?;
                node = FilterNode::and(node, right);
            } else {
                return Ok(node);
            }
        }
    }

    // factor := "(" expr ")" | comparison
    fn factor(&mut self) -> Result<FilterNode, ParseError> {
        let Some(spanned) = self.peek() else {
            return Err(ParseError::UnexpectedEnd { position: self.end });
        };

        if spanned.tok == Tok::LParen {
            let open = spanned.position;
            self.index += 1;

            let inner = self.expr()?;

            if !self.eat(&Tok::RParen) {
                return Err(ParseError::UnbalancedParen { position: open });
            }

            return Ok(FilterNode::group(inner));
        }

        self.comparison()
    }

    // comparison := identifier operator value
    fn comparison(&mut self) -> Result<FilterNode, ParseError> {
        let field = match self.next() {
            Some(Spanned {
                tok: Tok::Word(w), ..
            }) => w,
            Some(spanned) => {
                return Err(ParseError::UnexpectedToken {
                    position: spanned.position,
                    token: spanned.tok.describe(),
                });
            }
            None => return Err(ParseError::UnexpectedEnd { position: self.end }),
        };

        let op = match self.next() {
            Some(Spanned {
                tok: Tok::Colon, ..
            }) => CompareOp::Eq,
            Some(Spanned {
                tok: Tok::Word(w),
                position,
            }) => CompareOp::from_keyword(&w).ok_or(ParseError::UnknownOperator {
                position,
                token: w,
            })?,
            Some(spanned) => {
                return Err(ParseError::UnexpectedToken {
                    position: spanned.position,
                    token: spanned.tok.describe(),
                });
            }
            None => return Err(ParseError::UnexpectedEnd { position: self.end }),
        };

        let value = match self.next() {
            Some(Spanned {
                tok: Tok::Word(w), ..
            }) => FilterValue::Word(w),
            Some(Spanned {
                tok: Tok::Quoted(q),
                ..
            }) => FilterValue::Quoted(q),
            Some(spanned) => {
                return Err(ParseError::UnexpectedToken {
                    position: spanned.position,
                    token: spanned.tok.describe(),
                });
            }
            None => return Err(ParseError::UnexpectedEnd { position: self.end }),
        };

        Ok(FilterNode::Comparison(Comparison { field, op, value }))
    }
}
