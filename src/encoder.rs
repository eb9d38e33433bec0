use delegate::delegate;

use crate::position::Position;
use crate::printer::Printer;
use crate::value::{marker, Value};

/// A value tree that violates the encoder's contracts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("{0} wrong number of arguments in {1}")]
    WrongArity(Position, &'static str),
    #[error("{0} non-finite float {1} has no literal form")]
    NonFiniteFloat(Position, f64),
    #[error("{0} unsupported token kind")]
    UnsupportedToken(Position),
}

impl EncodeError {
    pub fn position(&self) -> Position {
        match self {
            EncodeError::WrongArity(pos, _) => *pos,
            EncodeError::NonFiniteFloat(pos, _) => *pos,
            EncodeError::UnsupportedToken(pos) => *pos,
        }
    }
}

/// Walks a value tree and drives a printer to produce canonical text,
/// the inverse of the decoder.
pub struct Encoder {
    printer: Printer,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            printer: Printer::new(),
        }
    }

    delegate! {
        to self.printer {
            pub fn position(&self) -> Position;
            pub fn as_str(&self) -> &str;
        }
    }

    pub fn into_string(self) -> String {
        self.printer.into_string()
    }

    pub fn encode(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Integer(val) => self.printer.print_integer(*val),
            Value::Float(val) => {
                if !val.is_finite() {
                    return Err(EncodeError::NonFiniteFloat(self.printer.position(), val.0));
                }

                self.printer.print_float(val.0);
            }
            Value::String(text) => self.printer.print_string(text),
            Value::Symbol(name) => self.printer.print_symbol(name),
            Value::List(items) => return self.encode_list(items),
        }

        Ok(())
    }

    /// A marker symbol at the head selects the literal syntax the list
    /// regenerates as; any other list prints parenthesized.
    fn encode_list(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        if let Some(Value::Symbol(head)) = items.first() {
            match head.as_str() {
                marker::LIST => {
                    return self.encode_delimited(
                        &items[1..],
                        Printer::print_left_square,
                        Printer::print_right_square,
                    );
                }
                marker::DICT => {
                    return self.encode_delimited(
                        &items[1..],
                        Printer::print_left_curly,
                        Printer::print_right_curly,
                    );
                }
                marker::QUOTE => {
                    return self.encode_quoted(&items[1..], Printer::print_quote, marker::QUOTE);
                }
                marker::UNQUOTE => {
                    return self.encode_quoted(&items[1..], Printer::print_unquote, marker::UNQUOTE);
                }
                _ => {}
            }
        }

        self.encode_delimited(
            items,
            Printer::print_left_paren,
            Printer::print_right_paren,
        )
    }

    fn encode_delimited(
        &mut self,
        items: &[Value],
        open: fn(&mut Printer),
        close: fn(&mut Printer),
    ) -> Result<(), EncodeError> {
        open(&mut self.printer);

        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.printer.print_whitespace(" ");
            }

            self.encode(item)?;
        }

        close(&mut self.printer);
        Ok(())
    }

    fn encode_quoted(
        &mut self,
        items: &[Value],
        sigil: fn(&mut Printer),
        name: &'static str,
    ) -> Result<(), EncodeError> {
        let [value] = items else {
            return Err(EncodeError::WrongArity(self.printer.position(), name));
        };

        sigil(&mut self.printer);
        self.encode(value)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

/// Encodes a value tree to canonical text.
pub fn to_string(value: &Value) -> Result<String, EncodeError> {
    let mut encoder = Encoder::new();
    encoder.encode(value)?;
    Ok(encoder.into_string())
}

/// Encodes a value tree to canonical bytes.
pub fn marshal(value: &Value) -> Result<Vec<u8>, EncodeError> {
    Ok(to_string(value)?.into_bytes())
}

#[cfg(test)]
mod test {
    use super::{marshal, to_string, EncodeError};
    use crate::decoder::from_str;
    use crate::value::Value;
    use rstest::rstest;

    fn sym(name: &str) -> Value {
        Value::symbol(name)
    }

    #[rstest]
    #[case(Value::Integer(0), "0")]
    #[case(Value::Integer(-5), "-5")]
    #[case(Value::float(0.5), "0.5")]
    #[case(Value::float(3.0), "3.0")]
    #[case(Value::float(1e10), "10000000000.0")]
    #[case(Value::string("a b"), "\"a b\"")]
    #[case(Value::symbol("foo"), "foo")]
    #[case(Value::symbol("-"), "-")]
    #[case(Value::list(vec![]), "()")]
    fn atoms_and_empty_list(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(to_string(&value).unwrap(), expected);
    }

    #[test]
    fn elements_are_space_separated() {
        let value = Value::list(vec![sym("a"), Value::Integer(1), Value::Integer(2)]);
        assert_eq!(to_string(&value).unwrap(), "(a 1 2)");
    }

    #[rstest]
    #[case("[1 2 3]")]
    #[case("{a 1}")]
    #[case("'x")]
    #[case(",x")]
    #[case("'[1 {k v}]")]
    #[case("(f 'x [])")]
    fn sugar_regenerates(#[case] text: &str) {
        assert_eq!(to_string(&from_str(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn marker_symbol_outside_head_stays_parenthesized() {
        let value = Value::list(vec![Value::Integer(1), sym("list")]);
        assert_eq!(to_string(&value).unwrap(), "(1 list)");
    }

    #[rstest]
    #[case(vec![sym("quote")], "quote")]
    #[case(vec![sym("quote"), sym("a"), sym("b")], "quote")]
    #[case(vec![sym("unquote")], "unquote")]
    fn quoting_arity_is_enforced(#[case] items: Vec<Value>, #[case] name: &str) {
        let err = to_string(&Value::list(items)).unwrap_err();
        assert!(matches!(err, EncodeError::WrongArity(_, got) if got == name));
        assert!(err
            .to_string()
            .ends_with(&format!("wrong number of arguments in {name}")));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let err = to_string(&Value::float(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, EncodeError::NonFiniteFloat(_, _)));
    }

    #[test]
    fn string_escape_fidelity() {
        let original = Value::string("\" \\ \u{8} \u{c} \n \r \t");
        let bytes = marshal(&original).unwrap();
        assert_eq!(from_str(std::str::from_utf8(&bytes).unwrap()).unwrap(), original);
    }

    #[test]
    fn whole_floats_survive_a_round_trip() {
        let original = Value::float(3.0);
        let text = to_string(&original).unwrap();
        assert_eq!(from_str(&text).unwrap(), original);
    }

    #[test]
    fn marshal_yields_bytes() {
        assert_eq!(marshal(&sym("ok")).unwrap(), b"ok".to_vec());
    }
}
