//! Contributions, payments, fees, donations and exchange rates.
//!
//! Amounts are exact decimals. A [`ContributionType`] names something
//! members pay towards; its [`ContributionObligation`]s say how much and how
//! often, and a [`MemberContributionExemption`] lowers what one person owes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  enums::{
    ContributionFrequency, DonationType, ExemptionType, FeeStatus, PaymentMethod,
    SubscriptionFrequency, SubscriptionStatus,
  },
  tenant::{MosqueId, impl_mosque_aware},
};

/// Locale used when a translation for the requested one is missing.
pub const FALLBACK_LOCALE: &str = "en";

// ─── Contribution types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionType {
  pub id:          i64,
  pub code:        String,
  pub is_required: bool,
  pub is_active:   bool,
  pub created_at:  DateTime<Utc>,
  pub mosque_id:   Option<MosqueId>,
}

/// Localised name of a contribution type. Unique per `(type, locale)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTypeTranslation {
  pub id:                   i64,
  pub contribution_type_id: i64,
  pub locale:               String,
  pub name:                 String,
  pub description:          Option<String>,
}

/// The translation for `locale`, else the [`FALLBACK_LOCALE`] one.
pub fn translation<'a>(
  translations: &'a [ContributionTypeTranslation],
  locale: &str,
) -> Option<&'a ContributionTypeTranslation> {
  translations
    .iter()
    .find(|t| t.locale == locale)
    .or_else(|| translations.iter().find(|t| t.locale == FALLBACK_LOCALE))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionObligation {
  pub id:                   i64,
  pub contribution_type_id: i64,
  pub amount:               Decimal,
  pub frequency:            ContributionFrequency,
  pub start_date:           NaiveDate,
  pub currency_id:          Option<i64>,
  pub mosque_id:            Option<MosqueId>,
}

impl ContributionObligation {
  pub fn is_active_on(&self, day: NaiveDate) -> bool { self.start_date <= day }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberContributionExemption {
  pub id:                   i64,
  pub person_id:            i64,
  pub contribution_type_id: i64,
  pub exemption_type:       ExemptionType,
  /// Fixed amount, discount, or percentage, depending on the type. Unused
  /// for [`ExemptionType::Full`].
  pub amount:               Option<Decimal>,
  pub reason:               Option<String>,
  pub start_date:           NaiveDate,
  pub end_date:             Option<NaiveDate>,
  pub is_active:            bool,
  pub mosque_id:            Option<MosqueId>,
}

impl MemberContributionExemption {
  /// Active flag set and `day` within the dates, both ends inclusive.
  pub fn is_active_on(&self, day: NaiveDate) -> bool {
    self.is_active
      && self.start_date <= day
      && self.end_date.is_none_or(|end| day <= end)
  }

  /// What is owed on `due` once this exemption applies. Never negative.
  pub fn apply(&self, due: Decimal) -> Decimal {
    let amount = self.amount;
    match self.exemption_type {
      ExemptionType::Full => Decimal::ZERO,
      ExemptionType::FixedAmount => amount.unwrap_or(due),
      ExemptionType::DiscountAmount => {
        (due - amount.unwrap_or_default()).max(Decimal::ZERO)
      }
      ExemptionType::DiscountPercentage => {
        let pct = amount.unwrap_or_default();
        (due * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED).max(Decimal::ZERO)
      }
    }
  }
}

// ─── Money received ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPayment {
  pub id:                   i64,
  pub person_id:            i64,
  pub contribution_type_id: i64,
  pub amount:               Decimal,
  pub payment_date:         NaiveDate,
  pub reference:            Option<String>,
  pub notes:                Option<String>,
  /// Id of the user who recorded the payment.
  pub created_by:           Option<i64>,
  pub currency_id:          Option<i64>,
  pub created_at:           DateTime<Utc>,
  pub mosque_id:            Option<MosqueId>,
}

/// A fee billed to a member record. Carries no tenant column of its own;
/// it belongs to its member's mosque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipFee {
  pub id:                    i64,
  pub member_id:             i64,
  pub amount:                Decimal,
  pub due_date:              NaiveDate,
  pub paid_date:             Option<NaiveDate>,
  pub status:                FeeStatus,
  pub payment_method:        Option<PaymentMethod>,
  pub transaction_reference: Option<String>,
  pub notes:                 Option<String>,
  pub created_at:            Option<DateTime<Utc>>,
}

impl MembershipFee {
  pub fn is_paid(&self) -> bool { self.status == FeeStatus::Paid }

  /// Still pending after its due date.
  pub fn is_overdue(&self, today: NaiveDate) -> bool {
    self.status == FeeStatus::Pending && self.due_date < today
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
  pub id:             i64,
  pub person_id:      i64,
  pub amount:         Decimal,
  pub donation_type:  DonationType,
  pub donation_date:  NaiveDate,
  pub receipt_number: Option<String>,
  pub notes:          Option<String>,
  pub anonymous:      bool,
  pub created_at:     DateTime<Utc>,
  pub mosque_id:      Option<MosqueId>,
}

/// A recurring commitment of a person. Scoped through the person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
  pub id:        i64,
  pub person_id: i64,
  pub frequency: SubscriptionFrequency,
  pub status:    SubscriptionStatus,
}

// ─── Exchange rates ──────────────────────────────────────────────────────────

/// `1 from = rate to`, from `effective_date` on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
  pub id:               i64,
  pub from_currency_id: i64,
  pub to_currency_id:   i64,
  pub rate:             Decimal,
  pub effective_date:   NaiveDate,
  pub created_at:       Option<DateTime<Utc>>,
  pub mosque_id:        Option<MosqueId>,
}

impl ExchangeRate {
  pub fn convert(&self, amount: Decimal) -> Decimal { amount * self.rate }
}

/// The rate in effect on `day`: the latest one that is not in the future.
pub fn rate_on(rates: &[ExchangeRate], day: NaiveDate) -> Option<&ExchangeRate> {
  rates
    .iter()
    .filter(|r| r.effective_date <= day)
    .max_by_key(|r| r.effective_date)
}

impl_mosque_aware!(
  ContributionType,
  ContributionObligation,
  MemberContributionExemption,
  MemberPayment,
  Donation,
  ExchangeRate,
);

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn dec(s: &str) -> Decimal { s.parse().unwrap() }

  fn exemption(exemption_type: ExemptionType, amount: Option<&str>) -> MemberContributionExemption {
    MemberContributionExemption {
      id: 1,
      person_id: 1,
      contribution_type_id: 1,
      exemption_type,
      amount: amount.map(dec),
      reason: None,
      start_date: day(2024, 1, 1),
      end_date: Some(day(2024, 12, 31)),
      is_active: true,
      mosque_id: None,
    }
  }

  #[test]
  fn exemptions_lower_the_amount_due() {
    let due = dec("35.00");
    assert_eq!(exemption(ExemptionType::Full, None).apply(due), Decimal::ZERO);
    assert_eq!(exemption(ExemptionType::FixedAmount, Some("10")).apply(due), dec("10"));
    assert_eq!(exemption(ExemptionType::FixedAmount, None).apply(due), due);
    assert_eq!(exemption(ExemptionType::DiscountAmount, Some("5")).apply(due), dec("30"));
    assert_eq!(exemption(ExemptionType::DiscountAmount, Some("50")).apply(due), Decimal::ZERO);
    assert_eq!(
      exemption(ExemptionType::DiscountPercentage, Some("20")).apply(due),
      dec("28")
    );
  }

  #[test]
  fn exemption_window_and_flag() {
    let mut e = exemption(ExemptionType::Full, None);
    assert!(e.is_active_on(day(2024, 12, 31)));
    assert!(!e.is_active_on(day(2025, 1, 1)));
    assert!(!e.is_active_on(day(2023, 12, 31)));
    e.is_active = false;
    assert!(!e.is_active_on(day(2024, 6, 1)));
  }

  #[test]
  fn translation_falls_back_to_english() {
    let t = |locale: &str, name: &str| ContributionTypeTranslation {
      id:                   0,
      contribution_type_id: 1,
      locale:               locale.into(),
      name:                 name.into(),
      description:          None,
    };
    let all = [t("en", "Monthly dues"), t("nl", "Maandelijkse contributie")];
    assert_eq!(translation(&all, "nl").unwrap().name, "Maandelijkse contributie");
    assert_eq!(translation(&all, "ar").unwrap().name, "Monthly dues");
    assert!(translation(&all[1..], "ar").is_none());
  }

  #[test]
  fn rate_in_effect() {
    let r = |id, date, rate: &str| ExchangeRate {
      id,
      from_currency_id: 1,
      to_currency_id: 2,
      rate: dec(rate),
      effective_date: date,
      created_at: None,
      mosque_id: None,
    };
    let rates = [r(1, day(2024, 1, 1), "38.5"), r(2, day(2024, 6, 1), "40")];
    assert_eq!(rate_on(&rates, day(2024, 3, 1)).unwrap().id, 1);
    assert_eq!(rate_on(&rates, day(2024, 6, 1)).unwrap().id, 2);
    assert!(rate_on(&rates, day(2023, 12, 31)).is_none());
    assert_eq!(rates[1].convert(dec("2.5")), dec("100"));
  }

  #[test]
  fn overdue_only_while_pending() {
    let mut fee = MembershipFee {
      id:                    1,
      member_id:             1,
      amount:                dec("35"),
      due_date:              day(2024, 1, 31),
      paid_date:             None,
      status:                FeeStatus::Pending,
      payment_method:        None,
      transaction_reference: None,
      notes:                 None,
      created_at:            None,
    };
    assert!(fee.is_overdue(day(2024, 2, 1)));
    assert!(!fee.is_overdue(day(2024, 1, 31)));
    fee.status = FeeStatus::Paid;
    assert!(fee.is_paid());
    assert!(!fee.is_overdue(day(2024, 2, 1)));
  }
}
