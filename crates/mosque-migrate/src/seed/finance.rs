use mosque_core::enums::{
  ContributionFrequency, Declared as _, DonationType, ExemptionType, FeeStatus,
  PaymentMethod, SubscriptionFrequency, SubscriptionStatus,
};
use rusqlite::types::Value;
use serde::Deserialize;

use super::CREATED;
use crate::{
  Error, Result,
  coerce::{
    mosque_id, required, required_amount, required_date, required_enum,
    required_fold_id, required_long, string, to_bool_or, to_date, to_decimal,
    to_enum, to_enum_or, to_long,
  },
  loose::Text,
  upsert::{Mode, Upsert},
};

// ─── Contribution types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContributionTypeRow {
  pub id:          Text,
  pub code:        Text,
  pub is_required: Text,
  pub is_active:   Text,
  pub mosque_id:   Text,
}

impl ContributionTypeRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("contribution_types", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("code", required("code", &self.code)?)
        .field("is_required", to_bool_or("is_required", &self.is_required, false)?)
        .field("is_active", to_bool_or("is_active", &self.is_active, true)?)
        .timestamps(CREATED, &[])
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

/// Keyed by `(contribution_type_id, locale)`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContributionTypeTranslationRow {
  pub contribution_type_id: Text,
  pub locale:               Text,
  pub name:                 Text,
  pub description:          Text,
}

impl ContributionTypeTranslationRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("contribution_type_translations", Mode::Upsert)
        .key(
          "contribution_type_id",
          required_long("contribution_type_id", &self.contribution_type_id)?,
        )
        .key("locale", required("locale", &self.locale)?)
        .field("name", required("name", &self.name)?)
        .field("description", string(&self.description)),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContributionObligationRow {
  pub id:                   Text,
  pub contribution_type_id: Text,
  pub amount:               Text,
  pub frequency:            Text,
  pub start_date:           Text,
  pub currency_id:          Text,
  pub mosque_id:            Text,
}

impl ContributionObligationRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("contribution_obligations", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field(
          "contribution_type_id",
          required_long("contribution_type_id", &self.contribution_type_id)?,
        )
        .field("amount", required_amount("amount", &self.amount)?)
        .field(
          "frequency",
          required_enum::<ContributionFrequency>("frequency", &self.frequency)?,
        )
        .field("start_date", required_date("start_date", &self.start_date)?)
        .field("currency_id", to_long("currency_id", &self.currency_id)?)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExemptionRow {
  pub id:                   Text,
  pub person_id:            Text,
  pub contribution_type_id: Text,
  pub exemption_type:       Text,
  pub amount:               Text,
  pub reason:               Text,
  pub start_date:           Text,
  pub end_date:             Text,
  pub is_active:            Text,
  pub mosque_id:            Text,
}

impl ExemptionRow {
  /// Every type but `FULL` needs an amount.
  pub fn plan(&self) -> Result<Upsert> {
    let exemption_type =
      required_enum::<ExemptionType>("exemption_type", &self.exemption_type)?;
    let amount = to_decimal("amount", &self.amount)?;
    let full = Value::Text(ExemptionType::Full.as_str().to_owned());
    if amount == Value::Null && exemption_type != full {
      return Err(Error::MissingField("amount"));
    }
    Ok(
      Upsert::new("member_contribution_exemptions", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .field(
          "contribution_type_id",
          required_long("contribution_type_id", &self.contribution_type_id)?,
        )
        .field("exemption_type", exemption_type)
        .field("amount", amount)
        .field("reason", string(&self.reason))
        .field("start_date", required_date("start_date", &self.start_date)?)
        .field("end_date", to_date("end_date", &self.end_date)?)
        .field("is_active", to_bool_or("is_active", &self.is_active, true)?)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

// ─── Money received ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentRow {
  pub id:                   Text,
  pub person_id:            Text,
  pub contribution_type_id: Text,
  pub amount:               Text,
  pub payment_date:         Text,
  pub reference:            Text,
  pub notes:                Text,
  pub created_by:           Text,
  pub currency_id:          Text,
  pub mosque_id:            Text,
}

impl PaymentRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("member_payments", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .field(
          "contribution_type_id",
          required_long("contribution_type_id", &self.contribution_type_id)?,
        )
        .field("amount", required_amount("amount", &self.amount)?)
        .field("payment_date", required_date("payment_date", &self.payment_date)?)
        .field("reference", string(&self.reference))
        .field("notes", string(&self.notes))
        .field("created_by", to_long("created_by", &self.created_by)?)
        .field("currency_id", to_long("currency_id", &self.currency_id)?)
        .timestamps(CREATED, &[])
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

/// No tenant column; a fee belongs to its member's mosque.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MembershipFeeRow {
  pub id:                    Text,
  pub member_id:             Text,
  pub amount:                Text,
  pub due_date:              Text,
  pub paid_date:             Text,
  pub status:                Text,
  pub payment_method:        Text,
  pub transaction_reference: Text,
  pub notes:                 Text,
}

impl MembershipFeeRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("membership_fees", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("member_id", required_long("member_id", &self.member_id)?)
        .field("amount", required_amount("amount", &self.amount)?)
        .field("due_date", required_date("due_date", &self.due_date)?)
        .field("paid_date", to_date("paid_date", &self.paid_date)?)
        .field("status", to_enum_or("status", &self.status, FeeStatus::Pending)?)
        .field(
          "payment_method",
          to_enum::<PaymentMethod>("payment_method", &self.payment_method)?,
        )
        .field("transaction_reference", string(&self.transaction_reference))
        .field("notes", string(&self.notes))
        .timestamps(CREATED, &[]),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DonationRow {
  pub id:             Text,
  pub person_id:      Text,
  pub amount:         Text,
  pub donation_type:  Text,
  pub donation_date:  Text,
  pub receipt_number: Text,
  pub notes:          Text,
  pub anonymous:      Text,
  pub mosque_id:      Text,
}

impl DonationRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("donations", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .field("amount", required_amount("amount", &self.amount)?)
        .field(
          "donation_type",
          required_enum::<DonationType>("donation_type", &self.donation_type)?,
        )
        .field("donation_date", required_date("donation_date", &self.donation_date)?)
        .field("receipt_number", string(&self.receipt_number))
        .field("notes", string(&self.notes))
        .field("anonymous", to_bool_or("anonymous", &self.anonymous, false)?)
        .timestamps(CREATED, &[])
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubscriptionRow {
  pub id:        Text,
  pub person_id: Text,
  pub frequency: Text,
  pub status:    Text,
}

impl SubscriptionRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("subscriptions", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .field(
          "frequency",
          required_enum::<SubscriptionFrequency>("frequency", &self.frequency)?,
        )
        .field(
          "status",
          to_enum_or("status", &self.status, SubscriptionStatus::Active)?,
        ),
    )
  }
}

// ─── Exchange rates ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeRateRow {
  pub id:               Text,
  pub from_currency_id: Text,
  pub to_currency_id:   Text,
  pub rate:             Text,
  pub effective_date:   Text,
  pub mosque_id:        Text,
}

impl ExchangeRateRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("exchange_rates", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field(
          "from_currency_id",
          required_long("from_currency_id", &self.from_currency_id)?,
        )
        .field("to_currency_id", required_long("to_currency_id", &self.to_currency_id)?)
        .field("rate", required_amount("rate", &self.rate)?)
        .field(
          "effective_date",
          required_date("effective_date", &self.effective_date)?,
        )
        .timestamps(CREATED, &[])
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}
