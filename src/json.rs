//! JSON token stream.
//!
//! [`JsonTokenWriter`] drives a [`serde_json`] formatter directly, so a
//! document is written token by token without ever building a
//! `serde_json::Value`. Compact and pretty output share one code path; only
//! the formatter differs.
//!
//! ## Examples
//!
//! ```rust
//! use treedata::{JsonTokenWriter, TokenWriter};
//!
//! let mut out = Vec::new();
//! let mut json = JsonTokenWriter::new(&mut out, false);
//! json.write_start_object().unwrap();
//! json.write_field_name("id").unwrap();
//! json.write_str("N1").unwrap();
//! json.write_end_object().unwrap();
//! json.close().unwrap();
//!
//! assert_eq!(String::from_utf8(out).unwrap(), r#"{"id":"N1"}"#);
//! ```

use crate::token::{non_finite_label, TokenWriter};
use crate::{Error, Result};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io;

enum JsonFormatter {
    Compact(CompactFormatter),
    Pretty(PrettyFormatter<'static>),
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Object { first: bool },
    Array { first: bool },
}

/// Dispatches a formatter call on the open output, or fails once closed.
macro_rules! format_with {
    ($self:ident, $method:ident $(, $arg:expr)*) => {{
        let writer = match $self.writer.as_mut() {
            Some(writer) => writer,
            None => return Err(Error::contract("JSON output is already closed")),
        };
        let result = match &mut $self.formatter {
            JsonFormatter::Compact(f) => f.$method(writer $(, $arg)*),
            JsonFormatter::Pretty(f) => f.$method(writer $(, $arg)*),
        };
        result?
    }};
}

/// A [`TokenWriter`] producing JSON text.
///
/// The output handle is held until [`TokenWriter::close`], which flushes it and
/// drops it. Non-finite floats are written as the strings `"Infinity"`,
/// `"-Infinity"` and `"NaN"` because JSON has no literal for them.
pub struct JsonTokenWriter<W: io::Write> {
    writer: Option<W>,
    formatter: JsonFormatter,
    frames: Vec<Frame>,
    key_pending: bool,
    root_written: bool,
}

impl<W: io::Write> JsonTokenWriter<W> {
    /// Creates a JSON token writer, indented with two spaces when `pretty` is set.
    pub fn new(writer: W, pretty: bool) -> Self {
        let formatter = if pretty {
            JsonFormatter::Pretty(PrettyFormatter::new())
        } else {
            JsonFormatter::Compact(CompactFormatter)
        };
        JsonTokenWriter {
            writer: Some(writer),
            formatter,
            frames: Vec::with_capacity(16),
            key_pending: false,
            root_written: false,
        }
    }

    /// Returns `true` once the output handle has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    fn before_value(&mut self) -> Result<()> {
        match self.frames.last_mut() {
            Some(Frame::Array { first }) => {
                let is_first = *first;
                *first = false;
                format_with!(self, begin_array_value, is_first);
            }
            Some(Frame::Object { .. }) => {
                if !self.key_pending {
                    return Err(Error::contract("object member written without a field name"));
                }
                self.key_pending = false;
                format_with!(self, begin_object_value);
            }
            None => {
                if self.root_written {
                    return Err(Error::contract("JSON output already holds a top-level value"));
                }
                self.root_written = true;
            }
        }
        Ok(())
    }

    fn after_value(&mut self) -> Result<()> {
        match self.frames.last() {
            Some(Frame::Array { .. }) => format_with!(self, end_array_value),
            Some(Frame::Object { .. }) => format_with!(self, end_object_value),
            None => {}
        }
        Ok(())
    }

    fn write_escaped(&mut self, value: &str) -> Result<()> {
        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => return Err(Error::contract("JSON output is already closed")),
        };
        serde_json::to_writer(writer, value).map_err(|e| Error::io(&e.to_string()))
    }

    fn write_non_finite(&mut self, value: f64) -> Result<()> {
        self.write_escaped(non_finite_label(value))
    }
}

impl<W: io::Write> TokenWriter for JsonTokenWriter<W> {
    fn write_field_name(&mut self, name: &str) -> Result<()> {
        if self.key_pending {
            return Err(Error::contract("field name written where a value was expected"));
        }
        let first = match self.frames.last_mut() {
            Some(Frame::Object { first }) => std::mem::replace(first, false),
            _ => return Err(Error::contract("field name written outside an object")),
        };
        format_with!(self, begin_object_key, first);
        self.write_escaped(name)?;
        format_with!(self, end_object_key);
        self.key_pending = true;
        Ok(())
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.before_value()?;
        format_with!(self, begin_object);
        self.frames.push(Frame::Object { first: true });
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        match self.frames.last() {
            Some(Frame::Object { .. }) if !self.key_pending => {}
            _ => return Err(Error::contract("object end written while no object is open")),
        }
        format_with!(self, end_object);
        self.frames.pop();
        self.after_value()
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.before_value()?;
        format_with!(self, begin_array);
        self.frames.push(Frame::Array { first: true });
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        if !matches!(self.frames.last(), Some(Frame::Array { .. })) {
            return Err(Error::contract("array end written while no array is open"));
        }
        format_with!(self, end_array);
        self.frames.pop();
        self.after_value()
    }

    fn write_str(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        self.write_escaped(value)?;
        self.after_value()
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        format_with!(self, write_bool, value);
        self.after_value()
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.before_value()?;
        format_with!(self, write_i32, value);
        self.after_value()
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.before_value()?;
        if value.is_finite() {
            format_with!(self, write_f32, value);
        } else {
            self.write_non_finite(value as f64)?;
        }
        self.after_value()
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.before_value()?;
        if value.is_finite() {
            format_with!(self, write_f64, value);
        } else {
            self.write_non_finite(value)?;
        }
        self.after_value()
    }

    fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush().map_err(Error::from),
            None => Ok(()),
        }
    }
}
