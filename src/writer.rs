//! Streaming document writer.
//!
//! [`TreeDataWriter`] is the format-agnostic contract domain code writes
//! against: nested nodes, repeated groups of nodes, and typed attributes.
//! [`DocumentWriter`] implements it on top of any [`TokenWriter`].
//!
//! ## Usage
//!
//! ```rust
//! use treedata::{DocumentWriter, TreeDataWriter};
//!
//! let mut out = Vec::new();
//! let mut writer = DocumentWriter::json(&mut out, false, "1.0");
//! writer.set_extension_versions([("foo", "2")]).unwrap();
//!
//! writer.begin_node("", "network").unwrap();
//! writer.write_string_attribute("id", "N1").unwrap();
//! writer.write_double_attribute("p0", f64::NAN).unwrap(); // absent, elided
//! writer.begin_group("lines").unwrap();                   // no members, elided
//! writer.end_group().unwrap();
//! writer.end_node().unwrap();
//! writer.close().unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     r#"{"version":"1.0","extensionVersions":[{"extensionName":"foo","version":"2"}],"id":"N1"}"#
//! );
//! ```

use crate::attribute::AttributeEncoder;
use crate::context::{Context, ContextStack, NodeOpening, State};
use crate::envelope::{write_envelope, Envelope};
use crate::json::JsonTokenWriter;
use crate::token::TokenWriter;
use crate::{Error, Result, WriterOptions};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::{debug, trace, warn};

/// The streaming contract for writing a hierarchical document.
///
/// Every `begin_*` call must be balanced by the matching `end_*` call.
/// Attributes may only be written while a node is the innermost open scope.
/// Operations with an `absent` value, and the `Option` taking variants, omit
/// the attribute entirely instead of writing a default.
pub trait TreeDataWriter {
    /// Supplies the extension version table. Must happen before the first node.
    fn set_extension_versions<I, K, V>(&mut self, versions: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;

    /// Opens a repeated group of sibling nodes under `name`.
    fn begin_group(&mut self, name: &str) -> Result<()>;

    fn end_group(&mut self) -> Result<()>;

    /// Opens a node. The namespace only matters to encodings with prefixes.
    fn begin_node(&mut self, namespace: &str, name: &str) -> Result<()>;

    fn end_node(&mut self) -> Result<()>;

    /// Declares a namespace prefix. Encodings without namespaces ignore it.
    fn write_namespace(&mut self, prefix: &str, uri: &str) -> Result<()>;

    /// Writes free-text content of the current node.
    fn write_content(&mut self, text: &str) -> Result<()>;

    fn write_string_attribute<'a>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'a str>>,
    ) -> Result<()>;

    fn write_float_attribute(&mut self, name: &str, value: f32) -> Result<()>;

    fn write_float_attribute_or(&mut self, name: &str, value: f32, absent: f32) -> Result<()>;

    fn write_optional_float_attribute(&mut self, name: &str, value: Option<f32>) -> Result<()>;

    fn write_double_attribute(&mut self, name: &str, value: f64) -> Result<()>;

    fn write_double_attribute_or(&mut self, name: &str, value: f64, absent: f64) -> Result<()>;

    fn write_optional_double_attribute(&mut self, name: &str, value: Option<f64>) -> Result<()>;

    fn write_int_attribute(&mut self, name: &str, value: i32) -> Result<()>;

    fn write_int_attribute_or(&mut self, name: &str, value: i32, absent: i32) -> Result<()>;

    fn write_optional_int_attribute(&mut self, name: &str, value: Option<i32>) -> Result<()>;

    fn write_int_array_attribute(&mut self, name: &str, values: &[i32]) -> Result<()>;

    fn write_bool_attribute(&mut self, name: &str, value: bool) -> Result<()>;

    fn write_bool_attribute_or(&mut self, name: &str, value: bool, absent: bool) -> Result<()>;

    fn write_optional_bool_attribute(&mut self, name: &str, value: Option<bool>) -> Result<()>;

    /// Writes the symbolic name of an enumeration value, if there is one.
    fn write_enum_attribute<E: AsRef<str>>(&mut self, name: &str, value: Option<E>) -> Result<()>;

    /// Releases the underlying output.
    fn close(&mut self) -> Result<()>;
}

/// A JSON document writer.
pub type JsonWriter<W> = DocumentWriter<JsonTokenWriter<W>>;

/// Writes a document onto a [`TokenWriter`].
///
/// The first [`begin_node`](TreeDataWriter::begin_node) opens the document's
/// only top-level object and writes the version envelope into it; the root
/// node's content follows in that same object.
///
/// `close` is idempotent: closing twice returns `Ok(())` the second time. Any
/// other operation after `close` is a contract violation.
pub struct DocumentWriter<T: TokenWriter> {
    tokens: T,
    stack: ContextStack,
    envelope: Envelope,
    encoder: AttributeEncoder,
    closed: bool,
}

impl<T: TokenWriter> DocumentWriter<T> {
    /// Creates a writer with default options.
    pub fn new(tokens: T, root_version: impl Into<String>) -> Self {
        Self::with_options(tokens, root_version, &WriterOptions::default())
    }

    /// Creates a writer with custom options.
    ///
    /// Only the encoding independent options apply here; indentation is a
    /// property of the token writer.
    pub fn with_options(
        tokens: T,
        root_version: impl Into<String>,
        options: &WriterOptions,
    ) -> Self {
        DocumentWriter {
            tokens,
            stack: ContextStack::new(),
            envelope: Envelope::new(root_version),
            encoder: AttributeEncoder::new(options.nan_policy),
            closed: false,
        }
    }

    #[must_use]
    pub fn root_version(&self) -> &str {
        self.envelope.root_version()
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.stack.state()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn token_writer(&self) -> &T {
        &self.tokens
    }

    /// Consumes the writer and returns the token writer.
    pub fn into_inner(self) -> T {
        self.tokens
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::contract("writer is closed"));
        }
        Ok(())
    }

    fn check_attribute(&self) -> Result<()> {
        self.check_open()?;
        self.stack.check_node()
    }

    fn bootstrap(&mut self, name: &str) -> Result<()> {
        let (root_version, extension_versions) = self.envelope.seal()?;
        debug!(
            root = name,
            version = %root_version,
            extensions = extension_versions.len(),
            "writing document envelope"
        );
        self.tokens.write_start_object()?;
        self.stack.push_node(name);
        write_envelope(self, &root_version, &extension_versions)
    }
}

impl<W: io::Write> DocumentWriter<JsonTokenWriter<W>> {
    /// Creates a JSON writer on `out`, indented when `pretty` is set.
    pub fn json(out: W, pretty: bool, root_version: impl Into<String>) -> Self {
        let options = WriterOptions::new().with_pretty(pretty);
        Self::json_with_options(out, root_version, &options)
    }

    pub fn json_with_options(
        out: W,
        root_version: impl Into<String>,
        options: &WriterOptions,
    ) -> Self {
        Self::with_options(JsonTokenWriter::new(out, options.pretty), root_version, options)
    }
}

impl DocumentWriter<JsonTokenWriter<BufWriter<File>>> {
    /// Creates a buffered JSON writer on a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be created.
    pub fn json_file<P: AsRef<Path>>(
        path: P,
        pretty: bool,
        root_version: impl Into<String>,
    ) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened document output");
        Ok(Self::json(BufWriter::new(file), pretty, root_version))
    }
}

impl<T: TokenWriter> TreeDataWriter for DocumentWriter<T> {
    fn set_extension_versions<I, K, V>(&mut self, versions: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.check_open()?;
        let table: IndexMap<String, String> = versions
            .into_iter()
            .map(|(name, version)| (name.into(), version.into()))
            .collect();
        self.envelope.set_extension_versions(table)
    }

    fn begin_group(&mut self, name: &str) -> Result<()> {
        self.check_open()?;
        self.stack.push_group(name);
        Ok(())
    }

    fn end_group(&mut self) -> Result<()> {
        self.check_open()?;
        if self.stack.pop_group()? > 0 {
            self.tokens.write_end_array()?;
        }
        Ok(())
    }

    fn begin_node(&mut self, _namespace: &str, name: &str) -> Result<()> {
        self.check_open()?;
        // Before the envelope, only an empty stack can take the root node.
        if !self.envelope.is_written() && !self.stack.is_empty() {
            return Err(Error::contract(format!(
                "node `{}` opened inside a group before the root node",
                name
            )));
        }
        match self.stack.open_node() {
            NodeOpening::Root => {
                if self.envelope.is_written() {
                    return Err(Error::contract(format!(
                        "node `{}` would be a second top-level structure",
                        name
                    )));
                }
                // The envelope object doubles as the root node.
                return self.bootstrap(name);
            }
            NodeOpening::FirstMember(group) => {
                trace!(group, "opening group array");
                self.tokens.write_field_name(group)?;
                self.tokens.write_start_array()?;
            }
            NodeOpening::Member => {}
            NodeOpening::Child => self.tokens.write_field_name(name)?,
        }
        self.tokens.write_start_object()?;
        self.stack.push_node(name);
        Ok(())
    }

    fn end_node(&mut self) -> Result<()> {
        self.check_open()?;
        self.stack.pop_node()?;
        self.tokens.write_end_object()
    }

    fn write_namespace(&mut self, _prefix: &str, _uri: &str) -> Result<()> {
        self.check_open()
    }

    fn write_content(&mut self, text: &str) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_content(&mut self.tokens, text)
    }

    fn write_string_attribute<'a>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'a str>>,
    ) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_string(&mut self.tokens, name, value.into())
    }

    fn write_float_attribute(&mut self, name: &str, value: f32) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_f32(&mut self.tokens, name, value)
    }

    fn write_float_attribute_or(&mut self, name: &str, value: f32, absent: f32) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_f32_or(&mut self.tokens, name, value, absent)
    }

    fn write_optional_float_attribute(&mut self, name: &str, value: Option<f32>) -> Result<()> {
        self.check_attribute()?;
        match value {
            Some(value) => self.encoder.encode_f32(&mut self.tokens, name, value),
            None => Ok(()),
        }
    }

    fn write_double_attribute(&mut self, name: &str, value: f64) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_f64(&mut self.tokens, name, value)
    }

    fn write_double_attribute_or(&mut self, name: &str, value: f64, absent: f64) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_f64_or(&mut self.tokens, name, value, absent)
    }

    fn write_optional_double_attribute(&mut self, name: &str, value: Option<f64>) -> Result<()> {
        self.check_attribute()?;
        match value {
            Some(value) => self.encoder.encode_f64(&mut self.tokens, name, value),
            None => Ok(()),
        }
    }

    fn write_int_attribute(&mut self, name: &str, value: i32) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_i32(&mut self.tokens, name, value)
    }

    fn write_int_attribute_or(&mut self, name: &str, value: i32, absent: i32) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_i32_or(&mut self.tokens, name, value, absent)
    }

    fn write_optional_int_attribute(&mut self, name: &str, value: Option<i32>) -> Result<()> {
        self.check_attribute()?;
        match value {
            Some(value) => self.encoder.encode_i32(&mut self.tokens, name, value),
            None => Ok(()),
        }
    }

    fn write_int_array_attribute(&mut self, name: &str, values: &[i32]) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_i32_sequence(&mut self.tokens, name, values)
    }

    fn write_bool_attribute(&mut self, name: &str, value: bool) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_bool(&mut self.tokens, name, value)
    }

    fn write_bool_attribute_or(&mut self, name: &str, value: bool, absent: bool) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_bool_or(&mut self.tokens, name, value, absent)
    }

    fn write_optional_bool_attribute(&mut self, name: &str, value: Option<bool>) -> Result<()> {
        self.check_attribute()?;
        match value {
            Some(value) => self.encoder.encode_bool(&mut self.tokens, name, value),
            None => Ok(()),
        }
    }

    fn write_enum_attribute<E: AsRef<str>>(&mut self, name: &str, value: Option<E>) -> Result<()> {
        self.check_attribute()?;
        self.encoder.encode_enum(&mut self.tokens, name, value)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Release first so the output is freed even for a malformed document.
        self.tokens.close()?;
        if let Some(innermost) = self.stack.top().map(Context::field_name) {
            warn!(
                depth = self.stack.depth(),
                innermost,
                "document closed with open scopes"
            );
            return Err(Error::contract(format!(
                "writer closed with {} open scope(s), innermost `{}`",
                self.stack.depth(),
                innermost
            )));
        }
        debug!("document closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{EXTENSION_NAME, EXTENSION_VERSIONS, VERSION};
    use crate::token::{Token, TokenRecorder};
    use crate::{NanPolicy, ValueTokenWriter};

    fn recorder() -> DocumentWriter<TokenRecorder> {
        let mut writer = DocumentWriter::new(TokenRecorder::new(), "1.0");
        writer
            .set_extension_versions(Vec::<(String, String)>::new())
            .unwrap();
        writer
    }

    fn field(name: &str) -> Token {
        Token::FieldName(name.to_string())
    }

    fn text(value: &str) -> Token {
        Token::Str(value.to_string())
    }

    #[test]
    fn test_envelope_merged_with_root() {
        let mut writer = DocumentWriter::new(ValueTokenWriter::new(), "1.0");
        writer.set_extension_versions([("foo", "2")]).unwrap();
        writer.begin_node("", "network").unwrap();
        writer.write_string_attribute("id", "N1").unwrap();
        writer.end_node().unwrap();
        writer.close().unwrap();

        let doc = writer.into_inner().into_value().unwrap();
        let fields: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(fields, vec![VERSION, EXTENSION_VERSIONS, "id"]);
        assert_eq!(doc.get(VERSION).and_then(|v| v.as_str()), Some("1.0"));

        let extensions = doc.members(EXTENSION_VERSIONS);
        assert_eq!(extensions.len(), 1);
        assert_eq!(
            extensions[0].get(EXTENSION_NAME).and_then(|v| v.as_str()),
            Some("foo")
        );
        assert_eq!(extensions[0].get(VERSION).and_then(|v| v.as_str()), Some("2"));
        assert!(doc.get("network").is_none());
    }

    #[test]
    fn test_empty_extension_table_is_elided() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.end_node().unwrap();
        let tokens = writer.into_inner().into_tokens();
        assert_eq!(
            tokens,
            vec![Token::StartObject, field(VERSION), text("1.0"), Token::EndObject]
        );
    }

    #[test]
    fn test_group_members_share_one_array() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.begin_group("lines").unwrap();
        for id in ["L1", "L2", "L3"] {
            writer.begin_node("", "line").unwrap();
            writer.write_string_attribute("id", id).unwrap();
            writer.end_node().unwrap();
        }
        writer.end_group().unwrap();
        writer.end_node().unwrap();

        let tokens = writer.into_inner().into_tokens();
        let count = |wanted: &Token| tokens.iter().filter(|t| *t == wanted).count();
        assert_eq!(count(&field("lines")), 1);
        assert_eq!(count(&Token::StartArray), 1);
        assert_eq!(count(&Token::EndArray), 1);
        assert_eq!(count(&field("line")), 0);
    }

    #[test]
    fn test_child_node_is_named() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.begin_node("", "owner").unwrap();
        writer.end_node().unwrap();
        writer.end_node().unwrap();

        let tokens = writer.into_inner().into_tokens();
        assert_eq!(
            &tokens[3..],
            &[
                field("owner"),
                Token::StartObject,
                Token::EndObject,
                Token::EndObject
            ]
        );
    }

    #[test]
    fn test_states_follow_nesting() {
        let mut writer = recorder();
        assert_eq!(writer.state(), State::Empty);
        writer.begin_node("", "network").unwrap();
        assert_eq!(writer.state(), State::InNode);
        writer.begin_group("lines").unwrap();
        assert_eq!(writer.state(), State::InGroup);
        assert_eq!(writer.depth(), 2);
        writer.end_group().unwrap();
        writer.end_node().unwrap();
        assert_eq!(writer.state(), State::Empty);
    }

    #[test]
    fn test_missing_extension_versions() {
        let mut writer = DocumentWriter::new(TokenRecorder::new(), "1.0");
        let err = writer.begin_node("", "network").unwrap_err();
        assert!(err.is_contract_violation());
        assert!(writer.token_writer().tokens().is_empty());
    }

    #[test]
    fn test_extension_versions_after_first_node() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        assert!(writer.set_extension_versions([("foo", "2")]).is_err());
    }

    #[test]
    fn test_unbalanced_calls() {
        let mut writer = recorder();
        assert!(writer.end_group().unwrap_err().is_contract_violation());
        assert!(writer.end_node().unwrap_err().is_contract_violation());

        writer.begin_node("", "network").unwrap();
        assert!(writer.end_group().unwrap_err().is_contract_violation());
        writer.begin_group("lines").unwrap();
        assert!(writer.end_node().unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_attribute_outside_node() {
        let mut writer = recorder();
        assert!(writer.write_int_attribute("x", 1).is_err());
        writer.begin_node("", "network").unwrap();
        writer.begin_group("lines").unwrap();
        assert!(writer
            .write_string_attribute("id", "L1")
            .unwrap_err()
            .is_contract_violation());
        assert!(writer.write_content("text").is_err());
    }

    #[test]
    fn test_second_root_rejected() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.end_node().unwrap();
        assert!(writer.begin_node("", "network").unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_group_before_root_node_rejected() {
        let mut writer = recorder();
        writer.begin_group("g").unwrap();
        assert!(writer.begin_node("", "x").unwrap_err().is_contract_violation());
        assert!(!writer.envelope.is_written());
        assert!(writer.token_writer().tokens().is_empty());
    }

    #[test]
    fn test_writes_after_close() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.end_node().unwrap();
        writer.close().unwrap();
        assert!(writer.is_closed());
        assert!(writer.token_writer().is_closed());

        assert!(writer.begin_group("g").unwrap_err().is_contract_violation());
        assert!(writer.write_namespace("iidm", "urn:x").is_err());
        assert!(writer.write_int_attribute_or("x", 5, 5).is_err());
        assert!(writer.write_optional_double_attribute("p", None).is_err());
        assert!(writer.close().is_ok());
    }

    #[test]
    fn test_close_with_open_scopes() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.begin_group("lines").unwrap();
        let err = writer.close().unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("innermost `lines`"));
        assert!(writer.token_writer().is_closed());
    }

    #[test]
    fn test_optional_attributes() {
        let mut writer = recorder();
        writer.begin_node("", "network").unwrap();
        writer.write_optional_double_attribute("p", None).unwrap();
        writer.write_optional_float_attribute("q", None).unwrap();
        writer.write_optional_int_attribute("n", None).unwrap();
        writer.write_optional_bool_attribute("b", None).unwrap();
        writer.write_optional_int_attribute("k", Some(0)).unwrap();
        writer.write_optional_bool_attribute("open", Some(false)).unwrap();
        writer.end_node().unwrap();

        let tokens = writer.into_inner().into_tokens();
        assert_eq!(
            &tokens[3..],
            &[
                field("k"),
                Token::I32(0),
                field("open"),
                Token::Bool(false),
                Token::EndObject
            ]
        );
    }

    #[test]
    fn test_reject_policy_through_writer() {
        let options = WriterOptions::new().with_nan_policy(NanPolicy::Reject);
        let mut writer = DocumentWriter::with_options(TokenRecorder::new(), "1.0", &options);
        writer
            .set_extension_versions(Vec::<(String, String)>::new())
            .unwrap();
        writer.begin_node("", "network").unwrap();
        assert!(matches!(
            writer.write_double_attribute("p", f64::NAN),
            Err(Error::EncodingConstraint { .. })
        ));
        assert!(writer.write_optional_double_attribute("p", Some(f64::NAN)).is_err());
        writer.write_double_attribute_or("p", f64::NAN, f64::NAN).unwrap();
    }

    #[test]
    fn test_namespace_is_ignored() {
        let mut writer = recorder();
        writer.write_namespace("iidm", "urn:x").unwrap();
        writer.begin_node("iidm", "network").unwrap();
        writer.write_namespace("ext", "urn:y").unwrap();
        writer.end_node().unwrap();
        assert_eq!(writer.token_writer().tokens().len(), 4);
    }
}
