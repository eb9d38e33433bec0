use delegate::delegate;

use crate::position::Position;
use crate::scanner::{LexicalError, Scanner};
use crate::token::TokenKind;
use crate::value::{marker, Value};

/// A structurally invalid token sequence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("{0} unexpected {1}")]
    UnexpectedClose(Position, &'static str),
    #[error("{0} unexpected eof")]
    UnexpectedEof(Position),
}

impl SyntaxError {
    pub fn position(&self) -> Position {
        match self {
            SyntaxError::UnexpectedClose(pos, _) => *pos,
            SyntaxError::UnexpectedEof(pos) => *pos,
        }
    }
}

/// Any failure while decoding a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl DecodeError {
    pub fn position(&self) -> Position {
        match self {
            DecodeError::Lexical(err) => err.position(),
            DecodeError::Syntax(err) => err.position(),
        }
    }
}

/// The kind of collection the decoder is currently inside, used only to
/// validate that a closing delimiter or end-of-input is legal there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Document,
    List,
    ListLiteral,
    DictLiteral,
    Quote,
}

/// The outcome of one recursive decode step: either a value, or the end
/// of the enclosing scope.
enum Decoded {
    Value(Value),
    End,
}

/// Recursive-descent decoder over a scanner's token stream.
///
/// Single-use and single-threaded; after an error the instance must be
/// discarded.
pub struct Decoder<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Decoder {
            scanner: Scanner::new(input),
        }
    }

    delegate! {
        to self.scanner {
            pub fn position(&self) -> Position;
        }
    }

    /// Decodes the next top-level value, or `None` once the document is
    /// exhausted. Can be called repeatedly to stream several values off
    /// one input.
    pub fn decode(&mut self) -> Result<Option<Value>, DecodeError> {
        match self.decode_value(Scope::Document)? {
            Decoded::Value(value) => Ok(Some(value)),
            Decoded::End => Ok(None),
        }
    }

    fn decode_value(&mut self, scope: Scope) -> Result<Decoded, DecodeError> {
        loop {
            let token = self.scanner.scan()?;

            match token.kind {
                TokenKind::Integer(val) => return Ok(Decoded::Value(Value::Integer(val))),
                TokenKind::Float(val) => return Ok(Decoded::Value(Value::float(val))),
                TokenKind::String(text) => return Ok(Decoded::Value(Value::String(text))),
                TokenKind::Symbol(name) => return Ok(Decoded::Value(Value::Symbol(name))),

                TokenKind::LeftParen => {
                    return self.decode_list(Scope::List, Vec::new()).map(Decoded::Value);
                }
                TokenKind::LeftSquare => {
                    return self
                        .decode_list(Scope::ListLiteral, vec![Value::symbol(marker::LIST)])
                        .map(Decoded::Value);
                }
                TokenKind::LeftCurly => {
                    return self
                        .decode_list(Scope::DictLiteral, vec![Value::symbol(marker::DICT)])
                        .map(Decoded::Value);
                }

                TokenKind::RightParen => {
                    return self.close_scope(scope == Scope::List, token.pos, ")");
                }
                TokenKind::RightSquare => {
                    return self.close_scope(scope == Scope::ListLiteral, token.pos, "]");
                }
                TokenKind::RightCurly => {
                    return self.close_scope(scope == Scope::DictLiteral, token.pos, "}");
                }

                TokenKind::Quote => return self.decode_quoted(marker::QUOTE).map(Decoded::Value),
                TokenKind::Unquote => {
                    return self.decode_quoted(marker::UNQUOTE).map(Decoded::Value);
                }

                TokenKind::Whitespace(_) | TokenKind::Comment(_) | TokenKind::Newline => continue,

                TokenKind::End => {
                    return if scope == Scope::Document {
                        Ok(Decoded::End)
                    } else {
                        Err(SyntaxError::UnexpectedEof(token.pos).into())
                    };
                }
            }
        }
    }

    /// Collects elements until the scope's closing delimiter. Element
    /// count is not validated, so curly sugar admits an odd number of
    /// entries.
    fn decode_list(&mut self, scope: Scope, mut list: Vec<Value>) -> Result<Value, DecodeError> {
        loop {
            match self.decode_value(scope)? {
                Decoded::Value(value) => list.push(value),
                Decoded::End => return Ok(Value::List(list)),
            }
        }
    }

    fn close_scope(
        &self,
        expected: bool,
        pos: Position,
        delimiter: &'static str,
    ) -> Result<Decoded, DecodeError> {
        if expected {
            Ok(Decoded::End)
        } else {
            Err(SyntaxError::UnexpectedClose(pos, delimiter).into())
        }
    }

    fn decode_quoted(&mut self, name: &'static str) -> Result<Value, DecodeError> {
        match self.decode_value(Scope::Quote)? {
            Decoded::Value(value) => Ok(Value::List(vec![Value::symbol(name), value])),
            // No closing delimiter matches a quote scope and eof is
            // rejected there, so the recursive step can only yield a
            // value.
            Decoded::End => unreachable!("quote scope has no closing delimiter"),
        }
    }
}

/// Decodes the first value in a string.
pub fn from_str(input: &str) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(input);

    match decoder.decode()? {
        Some(value) => Ok(value),
        None => Err(SyntaxError::UnexpectedEof(decoder.position()).into()),
    }
}

/// Decodes the first value in a byte buffer.
pub fn unmarshal(input: &[u8]) -> Result<Value, DecodeError> {
    let text = std::str::from_utf8(input).map_err(|err| {
        let mut pos = Position::start();
        // The prefix up to the offending byte is valid by construction.
        if let Ok(prefix) = std::str::from_utf8(&input[..err.valid_up_to()]) {
            for ch in prefix.chars() {
                pos.advance(ch);
            }
        }
        pos.advance_end();
        DecodeError::Lexical(LexicalError::InvalidUtf8(pos))
    })?;

    from_str(text)
}

#[cfg(test)]
mod test {
    use super::{from_str, unmarshal, Decoder};
    use crate::value::Value;
    use rstest::rstest;

    fn sym(name: &str) -> Value {
        Value::symbol(name)
    }

    #[test]
    fn decodes_atoms() {
        assert_eq!(from_str("42").unwrap(), Value::Integer(42));
        assert_eq!(from_str("0.5").unwrap(), Value::float(0.5));
        assert_eq!(from_str("\"hi\"").unwrap(), Value::string("hi"));
        assert_eq!(from_str("foo").unwrap(), sym("foo"));
    }

    #[test]
    fn decodes_nested_lists() {
        assert_eq!(
            from_str("(a (b 1) ())").unwrap(),
            Value::list(vec![
                sym("a"),
                Value::list(vec![sym("b"), Value::Integer(1)]),
                Value::list(vec![]),
            ])
        );
    }

    #[rstest]
    #[case("[1 2 3]", "(list 1 2 3)")]
    #[case("{a 1}", "(dict a 1)")]
    #[case("'x", "(quote x)")]
    #[case(",x", "(unquote x)")]
    #[case("''x", "(quote (quote x))")]
    #[case("'[1]", "(quote (list 1))")]
    #[case("[[]]", "(list (list))")]
    fn sugar_equivalence(#[case] sugared: &str, #[case] plain: &str) {
        assert_eq!(from_str(sugared).unwrap(), from_str(plain).unwrap());
    }

    #[test]
    fn marker_symbol_outside_head_is_ordinary() {
        assert_eq!(
            from_str("(1 list)").unwrap(),
            Value::list(vec![Value::Integer(1), sym("list")])
        );
    }

    #[test]
    fn dict_sugar_is_arity_permissive() {
        assert_eq!(
            from_str("{a 1 b}").unwrap(),
            Value::list(vec![sym("dict"), sym("a"), Value::Integer(1), sym("b")])
        );
    }

    #[test]
    fn skips_whitespace_comments_and_newlines() {
        assert_eq!(
            from_str("; doc\n( 1 ; mid\n\t2 )").unwrap(),
            Value::list(vec![Value::Integer(1), Value::Integer(2)])
        );
    }

    #[rstest]
    #[case("(]", "[1:2] unexpected ]")]
    #[case(")", "[1:1] unexpected )")]
    #[case("[}", "[1:2] unexpected }")]
    #[case("{)", "[1:2] unexpected )")]
    #[case("(", "[1:2] unexpected eof")]
    #[case("[1 2", "[1:5] unexpected eof")]
    #[case("'", "[1:2] unexpected eof")]
    #[case("(')", "[1:3] unexpected )")]
    #[case("", "[1:1] unexpected eof")]
    #[case("  \n", "[2:1] unexpected eof")]
    fn syntax_errors(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(from_str(input).unwrap_err().to_string(), expected);
    }

    #[test]
    fn lexical_errors_bubble_up() {
        assert_eq!(
            from_str("(01)").unwrap_err().to_string(),
            "[1:3] unexpected '1' after '0'"
        );
    }

    #[test]
    fn streams_multiple_values() {
        let mut decoder = Decoder::new("1 two \"three\"");
        assert_eq!(decoder.decode().unwrap(), Some(Value::Integer(1)));
        assert_eq!(decoder.decode().unwrap(), Some(sym("two")));
        assert_eq!(decoder.decode().unwrap(), Some(Value::string("three")));
        assert_eq!(decoder.decode().unwrap(), None);
        assert_eq!(decoder.decode().unwrap(), None);
    }

    #[test]
    fn unmarshal_reads_bytes() {
        assert_eq!(unmarshal(b"(1 2)").unwrap(), from_str("(1 2)").unwrap());
    }

    #[test]
    fn unmarshal_rejects_invalid_utf8() {
        assert_eq!(
            unmarshal(b"ab\xff").unwrap_err().to_string(),
            "[1:3] invalid utf-8 in input"
        );
    }

    #[test]
    fn unmarshal_ignores_trailing_values() {
        assert_eq!(unmarshal(b"1 2").unwrap(), Value::Integer(1));
    }
}
