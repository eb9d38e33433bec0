use std::str::Chars;

use crate::escape::unescape_char;
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// An error raised while scanning a malformed character sequence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexicalError {
    #[error("{0} unexpected {1}")]
    Unexpected(Position, String),
    #[error("{0} integer literal out of range")]
    IntegerOverflow(Position),
    #[error("{0} invalid utf-8 in input")]
    InvalidUtf8(Position),
}

impl LexicalError {
    pub fn position(&self) -> Position {
        match self {
            LexicalError::Unexpected(pos, _) => *pos,
            LexicalError::IntegerOverflow(pos) => *pos,
            LexicalError::InvalidUtf8(pos) => *pos,
        }
    }
}

/// Characters that legally terminate a multi-character lexeme. `None`
/// stands for end-of-input.
fn is_delimiter(ch: Option<char>) -> bool {
    matches!(ch, None | Some(')' | ']' | '}' | ' ' | '\t' | ';' | '\n' | '\r'))
}

/// Punctuation allowed anywhere in a symbol, signs and dots excluded.
fn is_symbol_punct(ch: char) -> bool {
    matches!(
        ch,
        '!' | '#' | '$' | '%' | '&' | '*' | '/' | ':' | '<' | '=' | '>' | '?' | '@' | '\\' | '^'
            | '_' | '|' | '~'
    )
}

/// Characters that may open a symbol.
fn is_symbol_start(ch: char) -> bool {
    is_symbol_punct(ch) || ch.is_alphabetic()
}

/// Characters that may continue a symbol past its first character.
fn is_symbol_extend(ch: char) -> bool {
    is_symbol_start(ch) || matches!(ch, '+' | '-' | '.') || ch.is_numeric()
}

fn is_control(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{1f}' | '\u{7f}')
}

/// Converts a character stream into a sequence of positioned tokens.
///
/// A scanner is a single-use instance bound to one input; after an error
/// its buffers are undefined and it must not be reused.
pub struct Scanner<'a> {
    input: Chars<'a>,
    char: Option<char>,
    pos: Position,
    buf: String,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut scanner = Scanner {
            input: input.chars(),
            char: None,
            pos: Position::start(),
            buf: String::new(),
        };
        scanner.read();
        scanner
    }

    /// The position of the most recently consumed character, or one past
    /// the end of input once the stream is exhausted.
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Extracts the next token. Whitespace, comments and newlines are
    /// tokens in their own right; callers that only care about structure
    /// skip them. Once the input is exhausted every further call yields
    /// the End token again.
    pub fn scan(&mut self) -> Result<Token, LexicalError> {
        match self.char {
            Some('+' | '-') => self.scan_sign(),
            Some('0') => self.scan_zero(self.pos),
            Some('1'..='9') => self.scan_digit(self.pos),
            Some('"') => self.scan_string(),
            Some('`') => self.scan_raw_string(),
            Some('.') => self.scan_dot(self.pos),
            Some('(') => Ok(self.scan_single(TokenKind::LeftParen)),
            Some(')') => self.scan_single_term(TokenKind::RightParen, ')'),
            Some('[') => Ok(self.scan_single(TokenKind::LeftSquare)),
            Some(']') => self.scan_single_term(TokenKind::RightSquare, ']'),
            Some('{') => Ok(self.scan_single(TokenKind::LeftCurly)),
            Some('}') => self.scan_single_term(TokenKind::RightCurly, '}'),
            Some('\'') => Ok(self.scan_single(TokenKind::Quote)),
            Some(',') => Ok(self.scan_single(TokenKind::Unquote)),
            Some(' ' | '\t') => Ok(self.scan_whitespace()),
            Some(';') => self.scan_comment(),
            Some('\n') => Ok(self.scan_single(TokenKind::Newline)),
            Some('\r') => self.scan_carriage_return(),
            Some(ch) if is_symbol_start(ch) => self.scan_symbol(self.pos),
            Some(_) => Err(self.unexpected("")),
            None => Ok(Token::new(TokenKind::End, self.pos)),
        }
    }

    /// A `+` or `-` opens a number, a symbol, or stands alone as a
    /// one-character symbol when a delimiter follows.
    fn scan_sign(&mut self) -> Result<Token, LexicalError> {
        let pos = self.pos;
        self.consume();

        match self.char {
            Some('0') => self.scan_zero(pos),
            Some('1'..='9') => self.scan_digit(pos),
            Some('.') => self.scan_dot(pos),
            Some(ch) if is_symbol_start(ch) || matches!(ch, '+' | '-') => self.scan_symbol(pos),
            ch if is_delimiter(ch) => Ok(Token::new(TokenKind::Symbol(self.extract().into()), pos)),
            _ => Err(self.unexpected("in symbol")),
        }
    }

    /// A leading zero admits no further digits: only `.`, an exponent,
    /// or a delimiter may follow.
    fn scan_zero(&mut self, pos: Position) -> Result<Token, LexicalError> {
        self.consume();

        match self.char {
            Some('.') => self.scan_decimal(pos),
            Some('e' | 'E') => self.scan_exponent(pos),
            ch if is_delimiter(ch) => {
                self.buf.clear();
                Ok(Token::new(TokenKind::Integer(0), pos))
            }
            _ => Err(self.unexpected("after '0'")),
        }
    }

    fn scan_digit(&mut self, pos: Position) -> Result<Token, LexicalError> {
        loop {
            self.consume();

            match self.char {
                Some('0'..='9') => continue,
                Some('.') => return self.scan_decimal(pos),
                Some('e' | 'E') => return self.scan_exponent(pos),
                ch if is_delimiter(ch) => {
                    let val = self
                        .extract()
                        .parse::<i64>()
                        .map_err(|_| LexicalError::IntegerOverflow(pos))?;
                    return Ok(Token::new(TokenKind::Integer(val), pos));
                }
                _ => return Err(self.unexpected("after digit")),
            }
        }
    }

    /// Consumes the `.` and requires at least one fractional digit.
    fn scan_decimal(&mut self, pos: Position) -> Result<Token, LexicalError> {
        self.consume();

        match self.char {
            Some('0'..='9') => loop {
                self.consume();

                match self.char {
                    Some('0'..='9') => continue,
                    Some('e' | 'E') => return self.scan_exponent(pos),
                    ch if is_delimiter(ch) => return Ok(self.float_token(pos)),
                    _ => return Err(self.unexpected("in decimal")),
                }
            },
            _ => Err(self.unexpected("after '.'")),
        }
    }

    /// Consumes the `e`/`E`, then an optional sign and at least one digit.
    fn scan_exponent(&mut self, pos: Position) -> Result<Token, LexicalError> {
        self.consume();

        match self.char {
            Some('0'..='9') => self.consume(),
            Some('+' | '-') => {
                self.consume();

                match self.char {
                    Some('0'..='9') => self.consume(),
                    _ => return Err(self.unexpected("after exponent sign")),
                }
            }
            _ => return Err(self.unexpected("after exponent")),
        }

        loop {
            match self.char {
                Some('0'..='9') => self.consume(),
                ch if is_delimiter(ch) => return Ok(self.float_token(pos)),
                _ => return Err(self.unexpected("in exponent")),
            }
        }
    }

    fn float_token(&mut self, pos: Position) -> Token {
        // The accumulated text matches the float grammar, so parsing can
        // only saturate, never fail.
        let val = self.extract().parse::<f64>().unwrap_or(f64::INFINITY);
        Token::new(TokenKind::Float(val), pos)
    }

    fn scan_symbol(&mut self, pos: Position) -> Result<Token, LexicalError> {
        loop {
            self.consume();

            match self.char {
                Some(ch) if is_symbol_extend(ch) => continue,
                ch if is_delimiter(ch) => {
                    return Ok(Token::new(TokenKind::Symbol(self.extract().into()), pos));
                }
                _ => return Err(self.unexpected("in symbol")),
            }
        }
    }

    /// A `.` continues as a symbol (`.`, `...`, `.foo`) unless a digit
    /// follows, which would read like a fraction with no integer part.
    fn scan_dot(&mut self, pos: Position) -> Result<Token, LexicalError> {
        self.consume();

        match self.char {
            Some('0'..='9') => Err(LexicalError::Unexpected(
                self.pos,
                "digit after '.'".to_owned(),
            )),
            Some(ch) if is_symbol_start(ch) || matches!(ch, '+' | '-' | '.') => {
                self.scan_symbol(pos)
            }
            ch if is_delimiter(ch) => Ok(Token::new(TokenKind::Symbol(self.extract().into()), pos)),
            _ => Err(self.unexpected("in symbol")),
        }
    }

    fn scan_string(&mut self) -> Result<Token, LexicalError> {
        let pos = self.pos;

        loop {
            self.read();

            match self.char {
                Some('"') => {
                    self.read();

                    return if is_delimiter(self.char) {
                        Ok(Token::new(TokenKind::String(self.extract().into()), pos))
                    } else {
                        Err(self.unexpected("after closing '\"'"))
                    };
                }
                Some('\\') => {
                    self.read();

                    match self.char.and_then(unescape_char) {
                        Some(ch) => self.buf.push(ch),
                        None => return Err(self.unexpected("in escape sequence")),
                    }
                }
                Some(ch) if is_control(ch) => return Err(self.unexpected("in string")),
                Some(ch) => self.buf.push(ch),
                None => return Err(self.unexpected("in string")),
            }
        }
    }

    /// Backtick strings span lines; a doubled backtick is the only
    /// escape and denotes a literal backtick.
    fn scan_raw_string(&mut self) -> Result<Token, LexicalError> {
        let pos = self.pos;

        loop {
            self.read();

            match self.char {
                Some('`') => {
                    self.read();

                    match self.char {
                        Some('`') => self.buf.push('`'),
                        ch if is_delimiter(ch) => {
                            return Ok(Token::new(TokenKind::String(self.extract().into()), pos));
                        }
                        _ => return Err(self.unexpected("after closing '`'")),
                    }
                }
                Some(ch) if is_control(ch) && !matches!(ch, '\n' | '\t') => {
                    return Err(self.unexpected("in raw string"));
                }
                Some(ch) => self.buf.push(ch),
                None => return Err(self.unexpected("in raw string")),
            }
        }
    }

    fn scan_whitespace(&mut self) -> Token {
        let pos = self.pos;

        loop {
            self.consume();

            match self.char {
                Some(' ' | '\t') => continue,
                _ => return Token::new(TokenKind::Whitespace(self.extract().into()), pos),
            }
        }
    }

    /// The terminating newline (or end of input) is left unconsumed; the
    /// leading `;` is not part of the payload.
    fn scan_comment(&mut self) -> Result<Token, LexicalError> {
        let pos = self.pos;

        loop {
            self.read();

            match self.char {
                Some('\n' | '\r') | None => {
                    return Ok(Token::new(TokenKind::Comment(self.extract().into()), pos));
                }
                Some(ch) if is_control(ch) && ch != '\t' => {
                    return Err(self.unexpected("in comment"));
                }
                Some(ch) => self.buf.push(ch),
            }
        }
    }

    /// A carriage return is only valid as part of a `\r\n` pair, which
    /// normalizes to a single Newline token.
    fn scan_carriage_return(&mut self) -> Result<Token, LexicalError> {
        self.read();

        match self.char {
            Some('\n') => Ok(self.scan_single(TokenKind::Newline)),
            _ => Err(self.unexpected("after '\\r'")),
        }
    }

    fn scan_single(&mut self, kind: TokenKind) -> Token {
        let pos = self.pos;
        self.read();
        Token::new(kind, pos)
    }

    /// Closing delimiters must themselves be followed by a delimiter;
    /// opening delimiters perform no such look-ahead.
    fn scan_single_term(&mut self, kind: TokenKind, closer: char) -> Result<Token, LexicalError> {
        let pos = self.pos;
        self.read();

        if is_delimiter(self.char) {
            Ok(Token::new(kind, pos))
        } else {
            Err(self.unexpected(&format!("after {closer:?}")))
        }
    }

    fn read(&mut self) {
        self.char = self.input.next();

        match self.char {
            Some(ch) => self.pos.advance(ch),
            None => self.pos.advance_end(),
        }
    }

    fn consume(&mut self) {
        if let Some(ch) = self.char {
            self.buf.push(ch);
        }

        self.read();
    }

    fn extract(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    fn unexpected(&self, context: &str) -> LexicalError {
        let found = match self.char {
            Some(ch) => format!("{ch:?}"),
            None => "eof".to_owned(),
        };
        let what = if context.is_empty() {
            found
        } else {
            format!("{found} {context}")
        };

        LexicalError::Unexpected(self.pos, what)
    }
}
