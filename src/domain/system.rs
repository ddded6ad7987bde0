//! Installation-wide calls: statistics, version, settings and reporting.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::ExtraParams;
use crate::xml::coerce;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Dashboard figures for today (`quickstats_get`).
pub struct GetQuickStats;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuickStats {
    pub today: TodayStats,
    pub active_calls: ActiveCallStats,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TodayStats {
    #[serde(deserialize_with = "coerce::int")]
    pub calls: i64,
    /// Seconds.
    #[serde(deserialize_with = "coerce::int")]
    pub duration: i64,
    #[serde(deserialize_with = "coerce::float")]
    pub revenue: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub self_cost: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub profit: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub margin: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActiveCallStats {
    #[serde(deserialize_with = "coerce::int")]
    pub total: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub answered_calls: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// MOR version string (`system_version_get`).
pub struct GetSystemVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Change installation settings (`conflines_update`).
///
/// Keys are MOR setting names such as `default_user_password_length`.
pub struct UpdateSettings {
    settings: ExtraParams,
}

impl UpdateSettings {
    pub fn new(settings: ExtraParams) -> Result<Self, ValidationError> {
        if settings.is_empty() {
            return Err(ValidationError::Empty { field: "settings" });
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &ExtraParams {
        &self.settings
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Set the exchange rate of one currency (`exchange_rate_update`).
pub struct UpdateExchangeRate {
    currency: String,
    rate: f64,
}

impl UpdateExchangeRate {
    pub fn new(currency: impl Into<String>, rate: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            currency: validation::non_empty("currency", currency)?,
            rate: validation::positive_f64("rate", rate)?,
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Aggregated call statistics (`aggregate_get`).
///
/// Filters (`from`, `till`, `s_user`, `s_terminator`, ...) are passed through as
/// given.
pub struct GetAggregates {
    pub filters: ExtraParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    /// One entry per `aggregates/aggregate` row.
    pub aggregates: Vec<Value>,
    pub totals: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Send one of the configured email templates (`email_send`).
pub struct SendEmail {
    email_name: String,
    to_user_id: Option<u64>,
    extra: ExtraParams,
}

impl SendEmail {
    pub fn new(email_name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            email_name: validation::non_empty("email_name", email_name)?,
            to_user_id: None,
            extra: ExtraParams::new(),
        })
    }

    pub fn to_user(mut self, user_id: u64) -> Result<Self, ValidationError> {
        self.to_user_id = Some(validation::positive("email_to_user_id", user_id)?);
        Ok(self)
    }

    /// Template variables and other parameters.
    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }

    pub fn email_name(&self) -> &str {
        &self.email_name
    }

    pub fn to_user_id(&self) -> Option<u64> {
        self.to_user_id
    }

    pub fn extra(&self) -> &ExtraParams {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Invoices, payments and credit notes of a period (`financial_statements_get`).
///
/// Dates are passed as MOR expects them, e.g. `2024-01-31`.
pub struct GetFinancialStatements {
    date_from: String,
    date_till: String,
    user_id: Option<u64>,
    extra: ExtraParams,
}

impl GetFinancialStatements {
    pub fn new(
        date_from: impl Into<String>,
        date_till: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            date_from: validation::non_empty("date_from", date_from)?,
            date_till: validation::non_empty("date_till", date_till)?,
            user_id: None,
            extra: ExtraParams::new(),
        })
    }

    pub fn for_user(mut self, user_id: u64) -> Result<Self, ValidationError> {
        self.user_id = Some(validation::positive("user_id", user_id)?);
        Ok(self)
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }

    pub fn date_from(&self) -> &str {
        &self.date_from
    }

    pub fn date_till(&self) -> &str {
        &self.date_till
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    pub fn extra(&self) -> &ExtraParams {
        &self.extra
    }
}
