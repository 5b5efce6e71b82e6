//! # treedata
//!
//! A streaming writer for self-describing hierarchical documents, used to
//! persist and exchange large network models and their extension data.
//!
//! ## What does it do?
//!
//! Domain code describes a model as nested **nodes** (single objects),
//! **groups** (repeated sequences of sibling nodes) and typed **attributes**,
//! through the [`TreeDataWriter`] trait. The writer turns those calls into the
//! tokens of a concrete encoding as they arrive, so the document is never held
//! in memory.
//!
//! ## Key Features
//!
//! - **Version Envelope**: The first node opens the document's only top-level
//!   object and writes `version` and the `extensionVersions` table into it,
//!   ahead of the root node's own fields
//! - **Absent Attributes**: NaN floats, `None` values and values equal to a
//!   caller supplied default are left out of the document
//! - **Lazy Groups**: A group's array is opened on its first member, so an empty
//!   group and a missing one look the same on the wire
//! - **Format Agnostic**: Encodings plug in through [`TokenWriter`]; JSON ships
//!   with the crate
//!
//! ## Quick Start
//!
//! ```rust
//! use treedata::{to_string, TreeDataWriter};
//!
//! let json = to_string("1.0", |w| {
//!     w.set_extension_versions([("foo", "2")])?;
//!     w.begin_node("", "network")?;
//!     w.write_string_attribute("id", "N1")?;
//!     w.write_int_attribute_or("sections", 1, 1)?;
//!     w.begin_group("substations")?;
//!     w.begin_node("", "substation")?;
//!     w.write_string_attribute("id", "S1")?;
//!     w.end_node()?;
//!     w.end_group()?;
//!     w.end_node()
//! })
//! .unwrap();
//!
//! assert_eq!(
//!     json,
//!     r#"{"version":"1.0","extensionVersions":[{"extensionName":"foo","version":"2"}],"id":"N1","substations":[{"id":"S1"}]}"#
//! );
//! ```
//!
//! ## Streaming To An Output
//!
//! ```rust
//! use treedata::{DocumentWriter, TreeDataWriter};
//!
//! let mut out = Vec::new();
//! let mut writer = DocumentWriter::json(&mut out, true, "1.0");
//! writer.set_extension_versions(Vec::<(String, String)>::new()).unwrap();
//! writer.begin_node("", "network").unwrap();
//! writer.write_double_attribute("p0", 12.5).unwrap();
//! writer.end_node().unwrap();
//! writer.close().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Calling protocol mistakes (unbalanced `begin`/`end` calls, attributes
//! outside a node, writes after `close`) are reported as
//! [`Error::ContractViolation`]; output failures as [`Error::Io`]. A writer is
//! not usable for a valid document after either.

pub mod attribute;
pub mod build;
pub mod context;
pub mod envelope;
pub mod error;
pub mod json;
pub mod map;
pub mod options;
pub mod token;
pub mod value;
pub mod writer;

pub use attribute::{AttributeEncoder, CONTENT};
pub use build::ValueTokenWriter;
pub use context::{Context, ContextStack, State};
pub use envelope::{EXTENSION_NAME, EXTENSION_VERSIONS, VERSION};
pub use error::{Error, Result};
pub use json::JsonTokenWriter;
pub use map::Map;
pub use options::{NanPolicy, WriterOptions};
pub use token::{Token, TokenRecorder, TokenWriter};
pub use value::{Number, Value};
pub use writer::{DocumentWriter, JsonWriter, TreeDataWriter};

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

/// Runs `write` against `writer`, then closes it whatever the outcome.
///
/// The closure's own error wins over a close error.
fn write_and_close<T, F>(writer: &mut DocumentWriter<T>, write: F) -> Result<()>
where
    T: TokenWriter,
    F: FnOnce(&mut DocumentWriter<T>) -> Result<()>,
{
    let result = write(writer);
    let closed = writer.close();
    result.and(closed)
}

/// Writes a compact JSON document to a `String`.
///
/// The closure receives a fresh writer; it must set the extension versions
/// and write a balanced document. The writer is closed afterwards.
///
/// # Errors
///
/// Returns the first error raised by the closure, or a contract violation if
/// the closure left scopes open.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<F>(root_version: &str, write: F) -> Result<String>
where
    F: FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> Result<()>,
{
    to_string_with_options(root_version, &WriterOptions::default(), write)
}

/// Writes an indented JSON document to a `String`.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<F>(root_version: &str, write: F) -> Result<String>
where
    F: FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> Result<()>,
{
    to_string_with_options(root_version, &WriterOptions::pretty(), write)
}

/// Writes a JSON document to a `String` with custom options.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<F>(
    root_version: &str,
    options: &WriterOptions,
    write: F,
) -> Result<String>
where
    F: FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> Result<()>,
{
    let mut buffer = Vec::with_capacity(256);
    to_writer_with_options(&mut buffer, root_version, options, write)?;
    String::from_utf8(buffer).map_err(|e| Error::custom(e.to_string()))
}

/// Writes a JSON document to `out`.
///
/// # Errors
///
/// Returns the first error raised by the closure, an [`Error::Io`] if the
/// output fails, or a contract violation if the closure left scopes open.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, F>(
    out: W,
    root_version: &str,
    options: &WriterOptions,
    write: F,
) -> Result<()>
where
    W: io::Write,
    F: FnOnce(&mut JsonWriter<W>) -> Result<()>,
{
    let mut writer = DocumentWriter::json_with_options(out, root_version, options);
    write_and_close(&mut writer, write)
}

/// Writes a JSON document to a new file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written, and
/// otherwise behaves like [`to_writer_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_file<P, F>(path: P, pretty: bool, root_version: &str, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut JsonWriter<BufWriter<File>>) -> Result<()>,
{
    let mut writer = DocumentWriter::json_file(path, pretty, root_version)?;
    write_and_close(&mut writer, write)
}

/// Writes a document into an in-memory [`Value`].
///
/// # Errors
///
/// Returns the first error raised by the closure, or a contract violation if
/// the closure did not write a complete document.
///
/// # Examples
///
/// ```rust
/// use treedata::{to_value, TreeDataWriter};
///
/// let doc = to_value("1.0", |w| {
///     w.set_extension_versions([("foo", "2")])?;
///     w.begin_node("", "network")?;
///     w.write_int_array_attribute("nodes", &[1, 2])?;
///     w.end_node()
/// })
/// .unwrap();
///
/// assert_eq!(doc.members("nodes").len(), 2);
/// assert_eq!(doc.members("extensionVersions").len(), 1);
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<F>(root_version: &str, write: F) -> Result<Value>
where
    F: FnOnce(&mut DocumentWriter<ValueTokenWriter>) -> Result<()>,
{
    let mut writer = DocumentWriter::new(ValueTokenWriter::new(), root_version);
    write_and_close(&mut writer, write)?;
    writer
        .into_inner()
        .into_value()
        .ok_or_else(|| Error::contract("no document was written"))
}
