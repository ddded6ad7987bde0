//! Tariffs, their rates, and single-destination rate lookups.

use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::xml::coerce;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Rates of one tariff (`tariff_rates_get`).
///
/// With neither id set MOR answers for the caller's own tariff.
pub struct GetTariffRates {
    pub tariff_id: Option<u64>,
    pub user_id: Option<u64>,
}

impl GetTariffRates {
    pub fn for_tariff(tariff_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            tariff_id: Some(validation::positive("tariff_id", tariff_id)?),
            user_id: None,
        })
    }

    pub fn for_user(user_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            tariff_id: None,
            user_id: Some(validation::positive("user_id", user_id)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A tariff's rates, shaped by its purpose.
pub enum TariffRates {
    /// Rates grouped by destination group (`rates/destination`).
    Retail(RetailTariff),
    /// One flat row per prefix (`rates/rate`).
    Wholesale(WholesaleTariff),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetailTariff {
    #[serde(rename = "tariff_name", deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(rename = "purpose", deserialize_with = "coerce::string")]
    pub kind: String,
    #[serde(deserialize_with = "coerce::string")]
    pub currency: String,
    #[serde(skip)]
    pub destinations: Vec<RetailDestinationGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetailDestinationGroup {
    #[serde(rename = "destination_group_name", deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::list")]
    pub destinations: Vec<RetailDestination>,
    #[serde(rename = "rate", deserialize_with = "coerce::list")]
    pub rates: Vec<RetailRate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetailDestination {
    #[serde(rename = "destination_name", deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetailRate {
    #[serde(deserialize_with = "coerce::int")]
    pub duration: i64,
    #[serde(rename = "type", deserialize_with = "coerce::string")]
    pub kind: String,
    #[serde(deserialize_with = "coerce::int")]
    pub round_by: i64,
    #[serde(rename = "tariff_rate", deserialize_with = "coerce::float")]
    pub rate: f64,
    #[serde(deserialize_with = "coerce::string")]
    pub start_time: String,
    #[serde(deserialize_with = "coerce::string")]
    pub end_time: String,
    #[serde(deserialize_with = "coerce::string")]
    pub from: String,
    #[serde(deserialize_with = "coerce::string")]
    pub daytype: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WholesaleTariff {
    #[serde(rename = "tariff_name", deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(rename = "purpose", deserialize_with = "coerce::string")]
    pub kind: String,
    #[serde(deserialize_with = "coerce::string")]
    pub currency: String,
    #[serde(skip)]
    pub rates: Vec<WholesaleRate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WholesaleRate {
    #[serde(deserialize_with = "coerce::string")]
    pub direction: String,
    #[serde(deserialize_with = "coerce::string")]
    pub destination: String,
    #[serde(deserialize_with = "coerce::string")]
    pub prefix: String,
    #[serde(deserialize_with = "coerce::string")]
    pub code: String,
    #[serde(rename = "tariff_rate", deserialize_with = "coerce::float")]
    pub rate: f64,
    #[serde(rename = "con_fee", deserialize_with = "coerce::float")]
    pub connection_fee: f64,
    #[serde(deserialize_with = "coerce::int")]
    pub increment: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub min_time: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub start_time: String,
    #[serde(deserialize_with = "coerce::string")]
    pub end_time: String,
    #[serde(deserialize_with = "coerce::string")]
    pub daytype: String,
    #[serde(deserialize_with = "coerce::string")]
    pub effective_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Import a retail tariff from MOR's tariff XML (`tariff_retail_import`).
pub struct ImportRetailTariff {
    xml: String,
}

impl ImportRetailTariff {
    pub fn new(xml: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            xml: validation::non_empty("xml", xml)?,
        })
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TariffImported {
    #[serde(deserialize_with = "coerce::opt_int")]
    pub tariff_id: Option<i64>,
    #[serde(deserialize_with = "coerce::opt_string")]
    pub tariff_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Create a wholesale tariff, or rename one when `id` is set
/// (`tariff_wholesale_update`).
pub struct SaveWholesaleTariff {
    id: Option<u64>,
    name: String,
    currency: String,
}

impl SaveWholesaleTariff {
    pub fn new(
        name: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            name: validation::non_empty("name", name)?,
            currency: validation::non_empty("currency", currency)?,
        })
    }

    pub fn with_id(mut self, id: u64) -> Result<Self, ValidationError> {
        self.id = Some(validation::positive("id", id)?);
        Ok(self)
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WholesaleTariffSaved {
    Created { tariff_id: i64 },
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// `tariffs_get`.
pub struct GetTariffs;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TariffSummary {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub purpose: String,
    #[serde(deserialize_with = "coerce::string")]
    pub currency: String,
    #[serde(deserialize_with = "coerce::opt_string")]
    pub last_update_date: Option<String>,
    #[serde(deserialize_with = "coerce::opt_float")]
    pub delta_value: Option<f64>,
    #[serde(deserialize_with = "coerce::opt_float")]
    pub delta_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Price a destination for a user (`rate_get`).
pub struct GetRate {
    username: String,
    prefix: String,
    by_full_dst: bool,
}

impl GetRate {
    pub fn new(
        username: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: validation::non_empty("username", username)?,
            prefix: validation::non_empty("prefix", prefix)?,
            by_full_dst: false,
        })
    }

    /// Treat `prefix` as a full dialed number and match its longest prefix.
    pub fn by_full_destination(mut self) -> Self {
        self.by_full_dst = true;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_by_full_destination(&self) -> bool {
        self.by_full_dst
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub rate: f64,
    pub destination: String,
    pub prefix: String,
}
