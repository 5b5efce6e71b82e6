//! The low-level token stream a document writer is built on.
//!
//! A [`TokenWriter`] knows how to put one structural or scalar token on the
//! wire for a single encoding. It does not know about nodes, groups, versions
//! or absent values; [`DocumentWriter`](crate::DocumentWriter) decides which
//! tokens to emit and in which order.
//!
//! Three implementations ship with the crate:
//!
//! - [`JsonTokenWriter`](crate::JsonTokenWriter): JSON text on any `io::Write`
//! - [`ValueTokenWriter`](crate::ValueTokenWriter): an in-memory [`Value`](crate::Value) tree
//! - [`TokenRecorder`]: the raw token sequence, for inspecting structure

use crate::Result;

/// Text standing in for a non-finite float, for encodings with no literal.
pub(crate) fn non_finite_label(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_negative() {
        "-Infinity"
    } else {
        "Infinity"
    }
}

/// A sink for encoding tokens.
///
/// Object members are written as a field name token followed by exactly one
/// value (a scalar, an object or an array). Array members are values with no
/// field name.
pub trait TokenWriter {
    fn write_field_name(&mut self, name: &str) -> Result<()>;

    fn write_start_object(&mut self) -> Result<()>;

    fn write_end_object(&mut self) -> Result<()>;

    fn write_start_array(&mut self) -> Result<()>;

    fn write_end_array(&mut self) -> Result<()>;

    fn write_str(&mut self, value: &str) -> Result<()>;

    fn write_bool(&mut self, value: bool) -> Result<()>;

    fn write_i32(&mut self, value: i32) -> Result<()>;

    fn write_f32(&mut self, value: f32) -> Result<()>;

    fn write_f64(&mut self, value: f64) -> Result<()>;

    /// Flushes and releases the underlying output.
    ///
    /// Called exactly once by the owning document writer.
    fn close(&mut self) -> Result<()>;
}

/// A single recorded token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    FieldName(String),
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Str(String),
    Bool(bool),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl Token {
    /// Returns `true` for object and array start tokens.
    #[inline]
    #[must_use]
    pub const fn is_start(&self) -> bool {
        matches!(self, Token::StartObject | Token::StartArray)
    }

    /// Returns `true` for object and array end tokens.
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self, Token::EndObject | Token::EndArray)
    }
}

/// A [`TokenWriter`] that keeps every token in order.
///
/// # Examples
///
/// ```rust
/// use treedata::{DocumentWriter, Token, TokenRecorder, TreeDataWriter};
///
/// let mut writer = DocumentWriter::new(TokenRecorder::new(), "1.0");
/// writer.set_extension_versions(Vec::<(String, String)>::new()).unwrap();
/// writer.begin_node("", "network").unwrap();
/// writer.end_node().unwrap();
/// writer.close().unwrap();
///
/// let tokens = writer.into_inner().into_tokens();
/// assert_eq!(tokens.first(), Some(&Token::StartObject));
/// assert_eq!(tokens.last(), Some(&Token::EndObject));
/// ```
#[derive(Debug, Default)]
pub struct TokenRecorder {
    tokens: Vec<Token>,
    closed: bool,
}

impl TokenRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn push(&mut self, token: Token) -> Result<()> {
        self.tokens.push(token);
        Ok(())
    }
}

impl TokenWriter for TokenRecorder {
    fn write_field_name(&mut self, name: &str) -> Result<()> {
        self.push(Token::FieldName(name.to_string()))
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.push(Token::StartObject)
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.push(Token::EndObject)
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.push(Token::StartArray)
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.push(Token::EndArray)
    }

    fn write_str(&mut self, value: &str) -> Result<()> {
        self.push(Token::Str(value.to_string()))
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.push(Token::Bool(value))
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.push(Token::I32(value))
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.push(Token::F32(value))
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.push(Token::F64(value))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
