//! Version metadata written at the top of every document.
//!
//! The envelope is not a wrapper. Its fields share the top-level object with
//! the root node's own content, so a single-root document stays flat:
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "extensionVersions": [ { "extensionName": "foo", "version": "2" } ],
//!   "id": "N1"
//! }
//! ```
//!
//! The root node's name never appears; readers know it from context.

use crate::writer::TreeDataWriter;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Field holding the document version, and each extension's version.
pub const VERSION: &str = "version";
/// Group holding the extension version table.
pub const EXTENSION_VERSIONS: &str = "extensionVersions";
/// Field holding an extension's name inside the version table.
pub const EXTENSION_NAME: &str = "extensionName";

/// Document version and extension version table.
#[derive(Debug, Clone)]
pub struct Envelope {
    root_version: String,
    extension_versions: Option<IndexMap<String, String>>,
    written: bool,
}

impl Envelope {
    pub fn new(root_version: impl Into<String>) -> Self {
        Envelope {
            root_version: root_version.into(),
            extension_versions: None,
            written: false,
        }
    }

    #[must_use]
    pub fn root_version(&self) -> &str {
        &self.root_version
    }

    #[must_use]
    pub fn extension_versions(&self) -> Option<&IndexMap<String, String>> {
        self.extension_versions.as_ref()
    }

    #[must_use]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Replaces the extension version table.
    ///
    /// Fails once the envelope has been written, since the table can no longer
    /// reach the document.
    pub fn set_extension_versions(&mut self, versions: IndexMap<String, String>) -> Result<()> {
        if self.written {
            return Err(Error::contract(
                "extension versions set after the document envelope was written",
            ));
        }
        self.extension_versions = Some(versions);
        Ok(())
    }

    /// Marks the envelope as written and hands out what has to be written.
    ///
    /// Fails when no extension version table was supplied, or when the
    /// envelope was already written.
    pub fn seal(&mut self) -> Result<(String, IndexMap<String, String>)> {
        if self.written {
            return Err(Error::contract("document envelope already written"));
        }
        let versions = self.extension_versions.clone().ok_or_else(|| {
            Error::contract("extension versions must be set before the first node")
        })?;
        self.written = true;
        Ok((self.root_version.clone(), versions))
    }
}

/// Writes the envelope fields into the node currently open on `writer`.
///
/// The extension table goes through the ordinary group and node operations,
/// so an empty table leaves no `extensionVersions` field at all.
pub fn write_envelope<W>(
    writer: &mut W,
    root_version: &str,
    extension_versions: &IndexMap<String, String>,
) -> Result<()>
where
    W: TreeDataWriter + ?Sized,
{
    writer.write_string_attribute(VERSION, root_version)?;
    writer.begin_group(EXTENSION_VERSIONS)?;
    for (name, version) in extension_versions {
        writer.begin_node("", "")?;
        writer.write_string_attribute(EXTENSION_NAME, name.as_str())?;
        writer.write_string_attribute(VERSION, version.as_str())?;
        writer.end_node()?;
    }
    writer.end_group()
}
