//! Attribute encoding and elision rules.
//!
//! Each attribute becomes one field name token followed by one value token,
//! unless the value is absent. Absence is decided here:
//!
//! | Kind | Elided when |
//! |------|-------------|
//! | string, enumeration | `None` |
//! | float, double | NaN (see [`NanPolicy`]) |
//! | any kind with an absent value | `value == absent` |
//! | optional number or boolean | `None` |
//! | integer, boolean, integer sequence | never |
//!
//! An elided attribute leaves nothing on the wire. The reader restores it from
//! the same default, which is schema knowledge and not part of the document.

use crate::options::NanPolicy;
use crate::token::TokenWriter;
use crate::{Error, Result};
use tracing::trace;

/// Reserved attribute name carrying free-text node content.
pub const CONTENT: &str = "content";

/// Writes attribute token pairs into a [`TokenWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeEncoder {
    nan_policy: NanPolicy,
}

impl AttributeEncoder {
    #[must_use]
    pub const fn new(nan_policy: NanPolicy) -> Self {
        AttributeEncoder { nan_policy }
    }

    #[must_use]
    pub const fn nan_policy(&self) -> NanPolicy {
        self.nan_policy
    }

    pub fn encode_string<T>(&self, tokens: &mut T, name: &str, value: Option<&str>) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        match value {
            Some(value) => {
                tokens.write_field_name(name)?;
                tokens.write_str(value)
            }
            None => {
                trace!(attribute = name, "absent string attribute elided");
                Ok(())
            }
        }
    }

    pub fn encode_f32<T>(&self, tokens: &mut T, name: &str, value: f32) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        if value.is_nan() {
            return self.on_nan(name);
        }
        tokens.write_field_name(name)?;
        tokens.write_f32(value)
    }

    pub fn encode_f64<T>(&self, tokens: &mut T, name: &str, value: f64) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        if value.is_nan() {
            return self.on_nan(name);
        }
        tokens.write_field_name(name)?;
        tokens.write_f64(value)
    }

    /// Writes a float unless it equals `absent`.
    ///
    /// Equality is exact. A NaN value matches a NaN absent value.
    pub fn encode_f32_or<T>(
        &self,
        tokens: &mut T,
        name: &str,
        value: f32,
        absent: f32,
    ) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        if value == absent || (value.is_nan() && absent.is_nan()) {
            trace!(attribute = name, "default float attribute elided");
            return Ok(());
        }
        self.encode_f32(tokens, name, value)
    }

    /// Writes a double unless it equals `absent`.
    ///
    /// Equality is exact. A NaN value matches a NaN absent value.
    pub fn encode_f64_or<T>(
        &self,
        tokens: &mut T,
        name: &str,
        value: f64,
        absent: f64,
    ) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        if value == absent || (value.is_nan() && absent.is_nan()) {
            trace!(attribute = name, "default double attribute elided");
            return Ok(());
        }
        self.encode_f64(tokens, name, value)
    }

    pub fn encode_i32<T>(&self, tokens: &mut T, name: &str, value: i32) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        tokens.write_field_name(name)?;
        tokens.write_i32(value)
    }

    pub fn encode_i32_or<T>(
        &self,
        tokens: &mut T,
        name: &str,
        value: i32,
        absent: i32,
    ) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        if value == absent {
            trace!(attribute = name, "default int attribute elided");
            return Ok(());
        }
        self.encode_i32(tokens, name, value)
    }

    pub fn encode_bool<T>(&self, tokens: &mut T, name: &str, value: bool) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        tokens.write_field_name(name)?;
        tokens.write_bool(value)
    }

    pub fn encode_bool_or<T>(
        &self,
        tokens: &mut T,
        name: &str,
        value: bool,
        absent: bool,
    ) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        if value == absent {
            trace!(attribute = name, "default boolean attribute elided");
            return Ok(());
        }
        self.encode_bool(tokens, name, value)
    }

    /// Writes the symbolic name of an enumeration value.
    pub fn encode_enum<T, E>(&self, tokens: &mut T, name: &str, value: Option<E>) -> Result<()>
    where
        T: TokenWriter + ?Sized,
        E: AsRef<str>,
    {
        self.encode_string(tokens, name, value.as_ref().map(|v| v.as_ref()))
    }

    /// Writes an inline integer array. Empty sequences are written too.
    pub fn encode_i32_sequence<T>(&self, tokens: &mut T, name: &str, values: &[i32]) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        tokens.write_field_name(name)?;
        tokens.write_start_array()?;
        for value in values {
            tokens.write_i32(*value)?;
        }
        tokens.write_end_array()
    }

    pub fn encode_content<T>(&self, tokens: &mut T, text: &str) -> Result<()>
    where
        T: TokenWriter + ?Sized,
    {
        self.encode_string(tokens, CONTENT, Some(text))
    }

    fn on_nan(&self, name: &str) -> Result<()> {
        match self.nan_policy {
            NanPolicy::Elide => {
                trace!(attribute = name, "NaN attribute elided");
                Ok(())
            }
            NanPolicy::Reject => Err(Error::encoding(
                name,
                "NaN is reserved for absent values and cannot be written",
            )),
        }
    }
}
