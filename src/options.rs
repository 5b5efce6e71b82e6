//! Configuration options for document writers.
//!
//! This module provides types to customize how a document is written:
//!
//! - [`WriterOptions`]: Main configuration struct
//! - [`NanPolicy`]: What to do when a NaN reaches a floating point attribute
//!
//! ## Examples
//!
//! ```rust
//! use treedata::{NanPolicy, WriterOptions};
//!
//! // Indented JSON output
//! let options = WriterOptions::pretty();
//!
//! // Refuse NaN instead of treating it as an absent value
//! let options = WriterOptions::new().with_nan_policy(NanPolicy::Reject);
//! assert_eq!(options.nan_policy, NanPolicy::Reject);
//! ```

/// How floating point attributes treat NaN.
///
/// NaN doubles as the in-band marker for "this optional numeric attribute is
/// absent". A legitimate NaN domain value therefore cannot be told apart from
/// a missing one on the wire.
///
/// - **Elide**: Default, NaN is dropped like any absent value
/// - **Reject**: NaN fails with [`Error::EncodingConstraint`](crate::Error::EncodingConstraint)
///
/// With `Reject`, callers express absence through the `Option` based
/// operations or an explicit absent value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NanPolicy {
    #[default]
    Elide,
    Reject,
}

/// Configuration options for a [`DocumentWriter`](crate::DocumentWriter).
///
/// # Examples
///
/// ```rust
/// use treedata::{NanPolicy, WriterOptions};
///
/// let options = WriterOptions::new()
///     .with_pretty(true)
///     .with_nan_policy(NanPolicy::Reject);
/// assert!(options.pretty);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WriterOptions {
    pub pretty: bool,
    pub nan_policy: NanPolicy,
}

impl WriterOptions {
    /// Creates default options (compact output, NaN elided).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treedata::{NanPolicy, WriterOptions};
    ///
    /// let options = WriterOptions::new();
    /// assert!(!options.pretty);
    /// assert_eq!(options.nan_policy, NanPolicy::Elide);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for indented output.
    #[must_use]
    pub fn pretty() -> Self {
        WriterOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Turns indentation on or off. Only encodings with a text form use it.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets how NaN floating point values are handled.
    #[must_use]
    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }
}
