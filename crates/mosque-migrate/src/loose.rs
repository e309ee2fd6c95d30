//! Loosely-typed field values.
//!
//! Seed rows accept any scalar for any field: `id = 1` and `id = "1"` are
//! the same thing. Everything is carried as text and coerced per column by
//! [`crate::coerce`].

use serde::{Deserialize, Deserializer};

/// A scalar field value as text. Absent and blank values are both `None`
/// as far as [`Text::get`] is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(Option<String>);

impl Text {
  /// The value, or `None` if absent or only whitespace.
  pub fn get(&self) -> Option<&str> {
    self.0.as_deref().filter(|s| !s.trim().is_empty())
  }

  /// The raw value, including blanks, for error messages.
  pub fn raw(&self) -> &str { self.0.as_deref().unwrap_or_default() }
}

impl From<&str> for Text {
  fn from(s: &str) -> Self { Self(Some(s.to_owned())) }
}

impl<'de> Deserialize<'de> for Text {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    use serde::de::Error as _;

    let value = Option::<toml::Value>::deserialize(deserializer)?;
    let text = match value {
      None => None,
      Some(toml::Value::String(s)) => Some(s),
      Some(toml::Value::Integer(i)) => Some(i.to_string()),
      Some(toml::Value::Float(f)) => Some(f.to_string()),
      Some(toml::Value::Boolean(b)) => Some(b.to_string()),
      Some(toml::Value::Datetime(dt)) => Some(dt.to_string()),
      Some(other) => {
        return Err(D::Error::custom(format!(
          "expected a scalar field value, found {}",
          other.type_str()
        )));
      }
    };
    Ok(Self(text))
  }
}
