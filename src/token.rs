use std::fmt;

use smol_str::SmolStr;

use crate::position::Position;

/// A classified lexeme produced by the scanner.
///
/// `pos` is the position of the token's first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, pos: Position) -> Self {
        Token { kind, pos }
    }
}

/// Token kinds, with decoded payloads where the lexeme carries one.
///
/// String tokens hold decoded text: escape sequences are already
/// resolved, and raw (backtick) strings produce the same kind. Comment
/// payloads exclude the leading `;`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Integer(i64),
    Float(f64),
    String(SmolStr),
    Symbol(SmolStr),
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    LeftCurly,
    RightCurly,
    Quote,
    Unquote,
    Whitespace(SmolStr),
    Comment(SmolStr),
    Newline,
    End,
}

impl fmt::Display for Token {
    /// Debug dump: a fixed 3-letter kind tag, the position, and the
    /// payload where applicable, e.g. `INT [1:1] 0` or `SYM [1:1] "foo"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.pos;
        match &self.kind {
            TokenKind::Integer(val) => write!(f, "INT {pos} {val}"),
            TokenKind::Float(val) => write!(f, "FLT {pos} {val}"),
            TokenKind::String(val) => write!(f, "STR {pos} {:?}", val.as_str()),
            TokenKind::Symbol(val) => write!(f, "SYM {pos} {:?}", val.as_str()),
            TokenKind::LeftParen => write!(f, "LPA {pos}"),
            TokenKind::RightParen => write!(f, "RPA {pos}"),
            TokenKind::LeftSquare => write!(f, "LSQ {pos}"),
            TokenKind::RightSquare => write!(f, "RSQ {pos}"),
            TokenKind::LeftCurly => write!(f, "LCU {pos}"),
            TokenKind::RightCurly => write!(f, "RCU {pos}"),
            TokenKind::Quote => write!(f, "QUO {pos}"),
            TokenKind::Unquote => write!(f, "UNQ {pos}"),
            TokenKind::Whitespace(val) => write!(f, "WHI {pos} {:?}", val.as_str()),
            TokenKind::Comment(val) => write!(f, "CMT {pos} {:?}", val.as_str()),
            TokenKind::Newline => write!(f, "NEW {pos}"),
            TokenKind::End => write!(f, "END {pos}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Token, TokenKind};
    use crate::position::Position;
    use rstest::rstest;

    #[rstest]
    #[case(TokenKind::Integer(0), "INT [1:1] 0")]
    #[case(TokenKind::Float(0.5), "FLT [1:1] 0.5")]
    #[case(TokenKind::String("a\nb".into()), "STR [1:1] \"a\\nb\"")]
    #[case(TokenKind::Symbol("foo".into()), "SYM [1:1] \"foo\"")]
    #[case(TokenKind::LeftParen, "LPA [1:1]")]
    #[case(TokenKind::RightSquare, "RSQ [1:1]")]
    #[case(TokenKind::Quote, "QUO [1:1]")]
    #[case(TokenKind::Whitespace("  ".into()), "WHI [1:1] \"  \"")]
    #[case(TokenKind::Comment(" note".into()), "CMT [1:1] \" note\"")]
    #[case(TokenKind::End, "END [1:1]")]
    fn dump_format(#[case] kind: TokenKind, #[case] expected: &str) {
        let token = Token::new(kind, Position { line: 1, col: 1 });
        assert_eq!(token.to_string(), expected);
    }
}
