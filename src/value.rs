use ordered_float::OrderedFloat;
use proptest::arbitrary::Arbitrary;
use smol_str::SmolStr;

/// Head symbols that record which literal syntax produced a list, so the
/// encoder can regenerate the sugar losslessly. They are only meaningful
/// at the head of a list; a symbol named `list` anywhere else is an
/// ordinary symbol.
pub mod marker {
    pub const LIST: &str = "list";
    pub const DICT: &str = "dict";
    pub const QUOTE: &str = "quote";
    pub const UNQUOTE: &str = "unquote";
}

/// A decoded value tree.
///
/// Floats are wrapped in [`OrderedFloat`] so the whole tree is `Eq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(SmolStr),
    Symbol(SmolStr),
    List(Vec<Value>),
}

impl Value {
    pub fn symbol(name: impl Into<SmolStr>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn string(text: impl Into<SmolStr>) -> Self {
        Value::String(text.into())
    }

    pub fn float(val: f64) -> Self {
        Value::Float(OrderedFloat(val))
    }

    pub fn list(items: impl Into<Vec<Value>>) -> Self {
        Value::List(items.into())
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::Integer(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::float(val)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Strings whose characters survive an encode/decode round trip: the
/// seven escapable characters plus anything the scanner accepts raw.
fn encodable_string() -> impl proptest::strategy::Strategy<Value = String> {
    use proptest::prelude::*;

    any::<String>().prop_map(|text| {
        text.chars()
            .filter(|ch| !ch.is_control() || matches!(ch, '\u{8}' | '\u{c}' | '\n' | '\r' | '\t'))
            .collect()
    })
}

/// Symbol names drawn from the lexical grammar. The quoting markers are
/// excluded because they constrain list arity when re-encoded.
fn symbol_name() -> impl proptest::strategy::Strategy<Value = String> {
    use proptest::prelude::*;

    let head = prop_oneof![
        proptest::char::range('a', 'z'),
        proptest::char::range('A', 'Z'),
        proptest::sample::select(vec![
            '!', '#', '$', '%', '&', '*', '/', ':', '<', '=', '>', '?', '@', '^', '_', '|', '~',
        ]),
    ];
    let tail = proptest::collection::vec(
        prop_oneof![
            proptest::char::range('a', 'z'),
            proptest::char::range('0', '9'),
            proptest::sample::select(vec!['+', '-', '.', '<', '>', '=', '*', '_']),
        ],
        0..8,
    );

    (head, tail)
        .prop_map(|(head, tail)| std::iter::once(head).chain(tail).collect::<String>())
        .prop_filter("quoting markers constrain arity", |name| {
            name != marker::QUOTE && name != marker::UNQUOTE
        })
}

impl Arbitrary for Value {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::Integer),
            (-1.0e15..1.0e15f64).prop_map(Value::float),
            encodable_string().prop_map(|text| Value::String(text.into())),
            symbol_name().prop_map(|name| Value::Symbol(name.into())),
        ];
        leaf.prop_recursive(6, 128, 8, |inner| {
            proptest::collection::vec(inner, 0..8)
                .prop_map(Value::List)
                .boxed()
        })
        .boxed()
    }
}

#[cfg(test)]
mod test {
    use super::Value;
    use crate::decoder::{from_str, unmarshal};
    use crate::encoder::marshal;
    use crate::pretty::to_string_pretty;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn encode_then_decode(value: Value) {
            let bytes = marshal(&value).unwrap();
            let parsed = unmarshal(&bytes).unwrap();
            prop_assert_eq!(value, parsed);
        }

        #[test]
        fn pretty_print_then_parse(value: Value, width in 0..120usize) {
            let text = to_string_pretty(&value, width).unwrap();
            let parsed = from_str(&text).unwrap();
            prop_assert_eq!(value, parsed);
        }
    }

    #[test]
    fn constructors() {
        assert_eq!(Value::from(3), Value::Integer(3));
        assert_eq!(Value::from(0.5), Value::float(0.5));
        assert_eq!(Value::symbol("x"), Value::Symbol("x".into()));
        assert_eq!(
            Value::list(vec![Value::from(1)]),
            Value::List(vec![Value::Integer(1)])
        );
    }
}
