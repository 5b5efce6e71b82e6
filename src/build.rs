//! Token stream that builds an in-memory [`Value`].

use crate::token::{non_finite_label, TokenWriter};
use crate::value::Number;
use crate::{Error, Map, Result, Value};

enum Partial {
    Object { map: Map, key: Option<String> },
    Array(Vec<Value>),
}

/// A [`TokenWriter`] assembling the document as a [`Value`] tree.
///
/// Useful when a document has to be inspected or re-encoded through serde
/// rather than streamed to an output.
///
/// # Examples
///
/// ```rust
/// use treedata::{DocumentWriter, TreeDataWriter, ValueTokenWriter};
///
/// let mut writer = DocumentWriter::new(ValueTokenWriter::new(), "1.0");
/// writer.set_extension_versions([("foo", "2")]).unwrap();
/// writer.begin_node("", "network").unwrap();
/// writer.write_string_attribute("id", "N1").unwrap();
/// writer.end_node().unwrap();
/// writer.close().unwrap();
///
/// let doc = writer.into_inner().into_value().unwrap();
/// assert_eq!(doc.get("version").and_then(|v| v.as_str()), Some("1.0"));
/// assert_eq!(doc.get("id").and_then(|v| v.as_str()), Some("N1"));
/// ```
#[derive(Default)]
pub struct ValueTokenWriter {
    stack: Vec<Partial>,
    root: Option<Value>,
}

impl ValueTokenWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished document, if a complete top-level value was written.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.root
    }

    fn check_slot(&self) -> Result<()> {
        match self.stack.last() {
            Some(Partial::Object { key: None, .. }) => {
                Err(Error::contract("object member written without a field name"))
            }
            None if self.root.is_some() => {
                Err(Error::contract("document already holds a top-level value"))
            }
            _ => Ok(()),
        }
    }

    fn complete(&mut self, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            Some(Partial::Object { map, key }) => match key.take() {
                Some(key) => {
                    map.insert(key, value);
                    Ok(())
                }
                None => Err(Error::contract("object member written without a field name")),
            },
            Some(Partial::Array(items)) => {
                items.push(value);
                Ok(())
            }
            None => {
                if self.root.is_some() {
                    return Err(Error::contract("document already holds a top-level value"));
                }
                self.root = Some(value);
                Ok(())
            }
        }
    }

    fn scalar(&mut self, value: Value) -> Result<()> {
        self.check_slot()?;
        self.complete(value)
    }
}

impl TokenWriter for ValueTokenWriter {
    fn write_field_name(&mut self, name: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Partial::Object { key: key @ None, .. }) => {
                *key = Some(name.to_string());
                Ok(())
            }
            Some(Partial::Object { .. }) => Err(Error::contract(
                "field name written where a value was expected",
            )),
            _ => Err(Error::contract("field name written outside an object")),
        }
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.check_slot()?;
        self.stack.push(Partial::Object {
            map: Map::new(),
            key: None,
        });
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Partial::Object { map, key: None }) => self.complete(Value::Object(map)),
            Some(other) => {
                self.stack.push(other);
                Err(Error::contract("object end written while no object is open"))
            }
            None => Err(Error::contract("object end written while no object is open")),
        }
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.check_slot()?;
        self.stack.push(Partial::Array(Vec::new()));
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Partial::Array(items)) => self.complete(Value::Array(items)),
            Some(other) => {
                self.stack.push(other);
                Err(Error::contract("array end written while no array is open"))
            }
            None => Err(Error::contract("array end written while no array is open")),
        }
    }

    fn write_str(&mut self, value: &str) -> Result<()> {
        self.scalar(Value::String(value.to_string()))
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.scalar(Value::Bool(value))
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.scalar(Value::Number(Number::Integer(value as i64)))
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_f64(value as f64)
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        if value.is_finite() {
            self.scalar(Value::Number(Number::Float(value)))
        } else {
            // Same text the JSON encoding uses
            self.scalar(Value::String(non_finite_label(value).to_string()))
        }
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
