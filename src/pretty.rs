//! Width-aware layout for value trees.
//!
//! The canonical encoder never breaks lines; this module lays the same
//! text out over multiple lines when it would exceed a target width.
//! Whitespace and newlines are ignored between tokens, so the output
//! decodes to a value structurally equal to the input.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::encoder::EncodeError;
use crate::escape::escape_string;
use crate::position::Position;
use crate::printer::float_lexeme;
use crate::value::{marker, Value};

/// Pretty prints a value tree within the given line width.
pub fn to_string_pretty(value: &Value, width: usize) -> Result<String, EncodeError> {
    let arena = Arena::new();
    let doc = build(&arena, value)?;

    let mut out = String::new();
    let _ = doc.render_fmt(width, &mut out);
    Ok(out)
}

fn build<'a>(
    arena: &'a Arena<'a>,
    value: &Value,
) -> Result<DocBuilder<'a, Arena<'a>>, EncodeError> {
    match value {
        Value::Integer(val) => Ok(arena.text(val.to_string())),
        Value::Float(val) => {
            if !val.is_finite() {
                // Contract checks run before layout, so errors carry
                // the start position.
                return Err(EncodeError::NonFiniteFloat(Position::start(), val.0));
            }

            Ok(arena.text(float_lexeme(val.0)))
        }
        Value::String(text) => Ok(arena.text(escape_string(text))),
        Value::Symbol(name) => Ok(arena.text(name.to_string())),
        Value::List(items) => build_list(arena, items),
    }
}

fn build_list<'a>(
    arena: &'a Arena<'a>,
    items: &[Value],
) -> Result<DocBuilder<'a, Arena<'a>>, EncodeError> {
    if let Some(Value::Symbol(head)) = items.first() {
        match head.as_str() {
            marker::LIST => return build_delimited(arena, &items[1..], "[", "]", 1),
            marker::DICT => return build_delimited(arena, &items[1..], "{", "}", 1),
            marker::QUOTE => return build_quoted(arena, &items[1..], "'", marker::QUOTE),
            marker::UNQUOTE => return build_quoted(arena, &items[1..], ",", marker::UNQUOTE),
            _ => {}
        }
    }

    build_delimited(arena, items, "(", ")", 2)
}

fn build_delimited<'a>(
    arena: &'a Arena<'a>,
    items: &[Value],
    open: &'static str,
    close: &'static str,
    indent: isize,
) -> Result<DocBuilder<'a, Arena<'a>>, EncodeError> {
    let docs = items
        .iter()
        .map(|item| build(arena, item))
        .collect::<Result<Vec<_>, _>>()?;

    let body = arena
        .intersperse(docs, arena.line())
        .nest(indent)
        .group();

    Ok(arena.text(open).append(body).append(arena.text(close)))
}

fn build_quoted<'a>(
    arena: &'a Arena<'a>,
    items: &[Value],
    sigil: &'static str,
    name: &'static str,
) -> Result<DocBuilder<'a, Arena<'a>>, EncodeError> {
    let [value] = items else {
        return Err(EncodeError::WrongArity(Position::start(), name));
    };

    Ok(arena.text(sigil).append(build(arena, value)?))
}

#[cfg(test)]
mod test {
    use super::to_string_pretty;
    use crate::decoder::from_str;
    use crate::value::Value;

    #[test]
    fn short_forms_stay_on_one_line() {
        let value = from_str("(a [1 2] 'x)").unwrap();
        assert_eq!(to_string_pretty(&value, 80).unwrap(), "(a [1 2] 'x)");
    }

    #[test]
    fn narrow_width_breaks_lines() {
        let value = from_str("(alpha beta gamma)").unwrap();
        let text = to_string_pretty(&value, 10).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(from_str(&text).unwrap(), value);
    }

    #[test]
    fn quoting_arity_is_enforced() {
        let value = Value::list(vec![Value::symbol("quote")]);
        assert!(to_string_pretty(&value, 80).is_err());
    }
}
