//! String-to-column coercion.
//!
//! Every helper takes the field name (for error messages) and the loose
//! [`Text`] value, and yields a SQL [`Value`]. Blank input means `NULL`
//! unless the helper names a default; anything else that does not parse is
//! an error.

use chrono::{DateTime, NaiveDate, Utc};
use mosque_core::{MosqueId, enums::{Declared, Sex}};
use rusqlite::types::Value;
use rust_decimal::Decimal;

use crate::{Error, Result, loose::Text};

fn invalid(field: &'static str, v: &Text, expected: impl Into<String>) -> Error {
  Error::Coerce { field, value: v.raw().to_owned(), expected: expected.into() }
}

/// Plain text column. Blank becomes `NULL`; other values are kept verbatim.
pub fn string(v: &Text) -> Value {
  v.get().map_or(Value::Null, |s| Value::Text(s.to_owned()))
}

/// Text column that must be present.
pub fn required(field: &'static str, v: &Text) -> Result<Value> {
  v.get()
    .map(|s| Value::Text(s.to_owned()))
    .ok_or(Error::MissingField(field))
}

// ─── Numbers ─────────────────────────────────────────────────────────────────

pub fn parse_long(field: &'static str, v: &Text) -> Result<Option<i64>> {
  v.get()
    .map(|s| s.trim().parse::<i64>().map_err(|_| invalid(field, v, "an integer")))
    .transpose()
}

pub fn to_long(field: &'static str, v: &Text) -> Result<Value> {
  Ok(parse_long(field, v)?.map_or(Value::Null, Value::Integer))
}

/// Like [`to_long`], but blank is a missing-field error.
pub fn required_long(field: &'static str, v: &Text) -> Result<Value> {
  parse_long(field, v)?
    .map(Value::Integer)
    .ok_or(Error::MissingField(field))
}

/// 32-bit integer column. Blank becomes `NULL`.
pub fn to_int(field: &'static str, v: &Text) -> Result<Value> {
  v.get()
    .map(|s| {
      s.trim()
        .parse::<i32>()
        .map(|n| Value::Integer(n.into()))
        .map_err(|_| invalid(field, v, "a 32-bit integer"))
    })
    .transpose()
    .map(|n| n.unwrap_or(Value::Null))
}

/// 32-bit integer column with a default for blank input.
pub fn to_int_or(field: &'static str, v: &Text, default: i32) -> Result<Value> {
  match to_int(field, v)? {
    Value::Null => Ok(Value::Integer(default.into())),
    n => Ok(n),
  }
}

pub fn parse_decimal(field: &'static str, v: &Text) -> Result<Option<Decimal>> {
  v.get()
    .map(|s| s.trim().parse::<Decimal>().map_err(|_| invalid(field, v, "a decimal")))
    .transpose()
}

/// Stored as normalised text, so `35.00` and `35` are the same value.
fn decimal_value(d: Decimal) -> Value { Value::Text(d.normalize().to_string()) }

/// Decimal column. Blank becomes `NULL`.
pub fn to_decimal(field: &'static str, v: &Text) -> Result<Value> {
  Ok(parse_decimal(field, v)?.map_or(Value::Null, decimal_value))
}

/// Money amount that must be present and greater than zero.
pub fn required_amount(field: &'static str, v: &Text) -> Result<Value> {
  match parse_decimal(field, v)? {
    None => Err(Error::MissingField(field)),
    Some(d) if d <= Decimal::ZERO => Err(invalid(field, v, "a positive amount")),
    Some(d) => Ok(decimal_value(d)),
  }
}

/// Tenant reference carried on a seed row.
pub fn mosque_id(v: &Text) -> Result<Option<MosqueId>> {
  Ok(parse_long("mosque_id", v)?.map(MosqueId))
}

// ─── Folded identifiers ──────────────────────────────────────────────────────

/// The 32-bit string hash used by the legacy importer: `s[0]*31^(n-1) + ...`
/// over UTF-16 code units, wrapping on overflow.
pub fn legacy_string_hash(s: &str) -> i32 {
  s.encode_utf16()
    .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Numeric surrogate key that may arrive as a UUID.
///
/// Decimal strings parse as-is; surrounding whitespace makes them fold. Anything containing `-` (a UUID) or that
/// fails to parse folds into the absolute value of [`legacy_string_hash`].
/// The fold is lossy but deterministic, so references to the same UUID land
/// on the same id.
pub fn fold_id(v: &Text) -> Option<i64> {
  let s = v.get()?;
  if !s.contains('-')
    && let Ok(n) = s.parse::<i64>()
  {
    return Some(n);
  }
  Some(i64::from(legacy_string_hash(s)).abs())
}

pub fn required_fold_id(field: &'static str, v: &Text) -> Result<Value> {
  fold_id(v).map(Value::Integer).ok_or(Error::MissingField(field))
}

pub fn to_fold_id(v: &Text) -> Value { fold_id(v).map_or(Value::Null, Value::Integer) }

// ─── Booleans ────────────────────────────────────────────────────────────────

fn parse_bool(field: &'static str, v: &Text) -> Result<Option<bool>> {
  let Some(s) = v.get() else { return Ok(None) };
  match s.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" => Ok(Some(true)),
    "false" | "0" | "no" => Ok(Some(false)),
    _ => Err(invalid(field, v, "a boolean (true/false/1/0/yes/no)")),
  }
}

fn bool_value(b: bool) -> Value { Value::Integer(b.into()) }

/// Boolean column. Blank becomes `NULL`.
pub fn to_bool(field: &'static str, v: &Text) -> Result<Value> {
  Ok(parse_bool(field, v)?.map_or(Value::Null, bool_value))
}

/// Boolean column with a default for blank input.
pub fn to_bool_or(field: &'static str, v: &Text, default: bool) -> Result<Value> {
  Ok(bool_value(parse_bool(field, v)?.unwrap_or(default)))
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn parse_date(field: &'static str, v: &Text) -> Result<Option<NaiveDate>> {
  v.get()
    .map(|s| {
      NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(field, v, "a date (YYYY-MM-DD)"))
    })
    .transpose()
}

/// Calendar date column, stored as ISO text.
pub fn to_date(field: &'static str, v: &Text) -> Result<Value> {
  Ok(date_value(parse_date(field, v)?))
}

/// Like [`to_date`], but blank is a missing-field error.
pub fn required_date(field: &'static str, v: &Text) -> Result<Value> {
  let d = parse_date(field, v)?.ok_or(Error::MissingField(field))?;
  Ok(date_value(Some(d)))
}

pub fn date_value(d: Option<NaiveDate>) -> Value {
  d.map_or(Value::Null, |d| Value::Text(d.to_string()))
}

/// RFC 3339 instant, normalised to UTC.
pub fn parse_timestamp(
  field: &'static str,
  v: &Text,
) -> Result<Option<DateTime<Utc>>> {
  v.get()
    .map(|s| {
      DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid(field, v, "an RFC 3339 timestamp"))
    })
    .transpose()
}

/// Timestamp column, stored in the same RFC 3339 form the run stamps with.
pub fn to_timestamp(field: &'static str, v: &Text) -> Result<Value> {
  Ok(
    parse_timestamp(field, v)?
      .map_or(Value::Null, |dt| Value::Text(dt.to_rfc3339())),
  )
}

// ─── Enumerations ────────────────────────────────────────────────────────────

fn parse_enum<T: Declared>(field: &'static str, v: &Text) -> Result<Option<T>> {
  v.get()
    .map(|s| {
      T::parse(s).map_err(|_| {
        invalid(field, v, format!("one of {}", T::declared().join(", ")))
      })
    })
    .transpose()
}

/// Enumerated column. Blank becomes `NULL`; undeclared values are errors.
pub fn to_enum<T: Declared>(field: &'static str, v: &Text) -> Result<Value> {
  Ok(
    parse_enum::<T>(field, v)?
      .map_or(Value::Null, |t| Value::Text(t.as_str().to_owned())),
  )
}

/// Enumerated column with a default for blank input.
pub fn to_enum_or<T: Declared>(
  field: &'static str,
  v: &Text,
  default: T,
) -> Result<Value> {
  let t = parse_enum::<T>(field, v)?.unwrap_or(default);
  Ok(Value::Text(t.as_str().to_owned()))
}

/// Enumerated column that must be present.
pub fn required_enum<T: Declared>(field: &'static str, v: &Text) -> Result<Value> {
  match to_enum::<T>(field, v)? {
    Value::Null => Err(Error::MissingField(field)),
    t => Ok(t),
  }
}

/// Individual `sex`: a GEDCOM value, or a legacy gender code mapped onto
/// one (`V` is female, anything unrecognised is unknown).
pub fn sex(v: &Text) -> Value {
  v.get().map_or(Value::Null, |s| {
    let sex = Sex::parse(s).unwrap_or_else(|_| Sex::from_gender(s));
    Value::Text(sex.as_str().to_owned())
  })
}
