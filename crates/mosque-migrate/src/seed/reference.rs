use serde::Deserialize;

use crate::{
  Result,
  coerce::{mosque_id, required, required_long, string, to_bool_or, to_int_or},
  loose::Text,
  upsert::{Mode, Upsert},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosqueRow {
  pub id:          Text,
  pub name:        Text,
  pub short_name:  Text,
  pub address:     Text,
  pub city:        Text,
  pub country:     Text,
  pub postal_code: Text,
  pub phone:       Text,
  pub email:       Text,
  pub website:     Text,
  /// Blank means active.
  pub active:      Text,
}

impl MosqueRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("mosques", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("name", required("name", &self.name)?)
        .field("short_name", string(&self.short_name))
        .field("address", string(&self.address))
        .field("city", string(&self.city))
        .field("country", string(&self.country))
        .field("postal_code", string(&self.postal_code))
        .field("phone", string(&self.phone))
        .field("email", string(&self.email))
        .field("website", string(&self.website))
        .field("active", to_bool_or("active", &self.active, true)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencyRow {
  pub id:             Text,
  pub code:           Text,
  pub name:           Text,
  pub symbol:         Text,
  /// Blank means 2.
  pub decimal_places: Text,
}

impl CurrencyRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("currencies", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("code", required("code", &self.code)?)
        .field("name", required("name", &self.name)?)
        .field("symbol", string(&self.symbol))
        .field(
          "decimal_places",
          to_int_or("decimal_places", &self.decimal_places, 2)?,
        ),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosqueCurrencyRow {
  pub id:          Text,
  pub mosque_id:   Text,
  pub currency_id: Text,
  pub is_primary:  Text,
  pub is_active:   Text,
}

impl MosqueCurrencyRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("mosque_currencies", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("currency_id", required_long("currency_id", &self.currency_id)?)
        .field("is_primary", to_bool_or("is_primary", &self.is_primary, false)?)
        .field("is_active", to_bool_or("is_active", &self.is_active, true)?)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}
