//! A Lisp-like textual data-interchange notation.
//!
//! # Syntax
//!
//! A document is a sequence of values separated by whitespace:
//!
//! - **Atoms** are integers (`42`, `-7`; no leading zeros), floats
//!   (`0.5`, `1e10`), double-quoted strings with the escapes `\"`,
//!   `\\`, `\b`, `\f`, `\n`, `\r` and `\t`, backtick-delimited raw
//!   strings (which span lines; a doubled backtick stands for a literal
//!   backtick), and symbols built from letters, digits and the
//!   punctuation `! # $ % & * + - . / : < = > ? @ \ ^ _ | ~`.
//!
//! - **Lists** are sequences of values inside `(` and `)`. The literal
//!   forms `[...]` and `{...}` abbreviate `(list ...)` and `(dict ...)`,
//!   and the sigils `'x` and `,x` abbreviate `(quote x)` and
//!   `(unquote x)`; decoding records the marker symbol at the head of
//!   the list so encoding regenerates the original notation.
//!
//! - **Comments** begin with `;` and extend to the end of the line.
//!
//! Decoding tracks exact line/column positions, and every error carries
//! the position it was raised at.
//!
//! # Entry points
//!
//! [`unmarshal`]/[`marshal`] convert between byte buffers and [`Value`]
//! trees; [`from_str`]/[`to_string`] are their string-level equivalents,
//! and [`to_string_pretty`] lays the text out within a line width. The
//! [`Scanner`], [`Decoder`], [`Encoder`] and [`Printer`] types behind
//! them are public for token-level work; each instance is single-use
//! and bound to one input or output stream.

pub(crate) mod escape;

pub mod decoder;
pub mod encoder;
pub mod position;
pub mod pretty;
pub mod printer;
pub mod scanner;
pub mod token;
pub mod value;

pub use decoder::{from_str, unmarshal, DecodeError, Decoder, SyntaxError};
pub use encoder::{marshal, to_string, EncodeError, Encoder};
pub use position::Position;
pub use pretty::to_string_pretty;
pub use printer::Printer;
pub use scanner::{LexicalError, Scanner};
pub use token::{Token, TokenKind};
pub use value::{marker, Value};
