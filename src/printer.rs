use crate::encoder::EncodeError;
use crate::escape::escape_string;
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Emits exact lexeme text into an owned buffer, advancing an output
/// position per written character exactly as the scanner advances on
/// input. Regenerated text can therefore be verified
/// position-for-position against the stream it came from.
pub struct Printer {
    out: String,
    pos: Position,
}

impl Printer {
    pub fn new() -> Self {
        Printer {
            out: String::new(),
            pos: Position::start(),
        }
    }

    /// The position of the most recently written character.
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    /// Echoes a scanned token. End carries no lexeme and cannot be
    /// printed.
    pub fn print_token(&mut self, token: &Token) -> Result<(), EncodeError> {
        match &token.kind {
            TokenKind::Integer(val) => self.print_integer(*val),
            TokenKind::Float(val) => self.print_float(*val),
            TokenKind::String(val) => self.print_string(val),
            TokenKind::Symbol(val) => self.print_symbol(val),
            TokenKind::LeftParen => self.print_left_paren(),
            TokenKind::RightParen => self.print_right_paren(),
            TokenKind::LeftSquare => self.print_left_square(),
            TokenKind::RightSquare => self.print_right_square(),
            TokenKind::LeftCurly => self.print_left_curly(),
            TokenKind::RightCurly => self.print_right_curly(),
            TokenKind::Quote => self.print_quote(),
            TokenKind::Unquote => self.print_unquote(),
            TokenKind::Whitespace(val) => self.print_whitespace(val),
            TokenKind::Comment(val) => self.print_comment(val),
            TokenKind::Newline => self.print_newline(),
            TokenKind::End => return Err(EncodeError::UnsupportedToken(self.pos)),
        }

        Ok(())
    }

    pub fn print_integer(&mut self, val: i64) {
        self.write_str(&val.to_string());
    }

    /// Writes the shortest decimal text that parses back to the same
    /// float.
    pub fn print_float(&mut self, val: f64) {
        self.write_str(&float_lexeme(val));
    }

    pub fn print_string(&mut self, val: &str) {
        self.write_str(&escape_string(val));
    }

    /// Backtick form; the only escape is a doubled backtick.
    pub fn print_raw_string(&mut self, val: &str) {
        self.write_char('`');

        for ch in val.chars() {
            if ch == '`' {
                self.write_char('`');
            }

            self.write_char(ch);
        }

        self.write_char('`');
    }

    pub fn print_symbol(&mut self, val: &str) {
        self.write_str(val);
    }

    pub fn print_left_paren(&mut self) {
        self.write_char('(');
    }

    pub fn print_right_paren(&mut self) {
        self.write_char(')');
    }

    pub fn print_left_square(&mut self) {
        self.write_char('[');
    }

    pub fn print_right_square(&mut self) {
        self.write_char(']');
    }

    pub fn print_left_curly(&mut self) {
        self.write_char('{');
    }

    pub fn print_right_curly(&mut self) {
        self.write_char('}');
    }

    pub fn print_quote(&mut self) {
        self.write_char('\'');
    }

    pub fn print_unquote(&mut self) {
        self.write_char(',');
    }

    pub fn print_whitespace(&mut self, val: &str) {
        self.write_str(val);
    }

    pub fn print_comment(&mut self, val: &str) {
        self.write_char(';');
        self.write_str(val);
    }

    pub fn print_newline(&mut self) {
        self.write_char('\n');
    }

    fn write_char(&mut self, ch: char) {
        self.out.push(ch);
        self.pos.advance(ch);
    }

    fn write_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.write_char(ch);
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new()
    }
}

/// The canonical text of a float: shortest round-trip decimal form,
/// with `.0` appended when the text would otherwise re-scan as an
/// integer.
pub(crate) fn float_lexeme(val: f64) -> String {
    let mut text = val.to_string();

    if !text.contains('.') {
        text.push_str(".0");
    }

    text
}

#[cfg(test)]
mod test {
    use super::Printer;
    use crate::position::Position;
    use crate::scanner::Scanner;
    use crate::token::TokenKind;
    use rstest::rstest;

    fn pos(line: u32, col: u32) -> Position {
        Position { line, col }
    }

    #[rstest]
    #[case(0.5, "0.5")]
    #[case(-0.5, "-0.5")]
    #[case(3.0, "3.0")]
    #[case(-3.0, "-3.0")]
    #[case(0.0, "0.0")]
    #[case(1e10, "10000000000.0")]
    #[case(6.25e-2, "0.0625")]
    fn float_lexemes(#[case] val: f64, #[case] expected: &str) {
        let mut printer = Printer::new();
        printer.print_float(val);
        assert_eq!(printer.as_str(), expected);
    }

    #[test]
    fn string_lexeme_is_escaped() {
        let mut printer = Printer::new();
        printer.print_string("a\n\"b\"");
        assert_eq!(printer.as_str(), "\"a\\n\\\"b\\\"\"");
    }

    #[test]
    fn raw_string_doubles_backticks() {
        let mut printer = Printer::new();
        printer.print_raw_string("a`b");
        assert_eq!(printer.as_str(), "`a``b`");
    }

    #[test]
    fn raw_string_advances_through_newlines() {
        let mut printer = Printer::new();
        printer.print_raw_string("a\nbc");
        assert_eq!(printer.as_str(), "`a\nbc`");
        assert_eq!(printer.position(), pos(2, 3));
    }

    #[test]
    fn position_tracks_output() {
        let mut printer = Printer::new();
        printer.print_symbol("ab");
        assert_eq!(printer.position(), pos(1, 2));
        printer.print_newline();
        assert_eq!(printer.position(), pos(2, 0));
        printer.print_integer(7);
        assert_eq!(printer.position(), pos(2, 1));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let mut printer = Printer::new();
        printer.print_symbol("λλ");
        assert_eq!(printer.position(), pos(1, 2));
    }

    #[test]
    fn end_token_has_no_lexeme() {
        let mut scanner = Scanner::new("");
        let end = scanner.scan().unwrap();
        assert_eq!(end.kind, TokenKind::End);
        assert!(Printer::new().print_token(&end).is_err());
    }

    /// Scanning a canonical document and echoing every token must
    /// reproduce it exactly, with the output position landing where the
    /// input position did.
    #[test]
    fn token_echo_round_trip() {
        let input = "(foo [1 2.5] \"a\\nb\" ; note\n 'x {k ,v})\n";
        let mut scanner = Scanner::new(input);
        let mut printer = Printer::new();

        loop {
            let token = scanner.scan().unwrap();
            if token.kind == TokenKind::End {
                break;
            }
            printer.print_token(&token).unwrap();
        }

        assert_eq!(printer.as_str(), input);
        assert_eq!(printer.position().line, scanner.position().line);
    }
}
