//! Invoices, credit notes, services and subscriptions.

use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::{ExtraParams, UnixTimestamp};
use crate::xml::coerce;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Invoices issued in a period (`invoices_get`).
pub struct GetInvoices {
    from: UnixTimestamp,
    till: UnixTimestamp,
    lang: Option<String>,
}

impl GetInvoices {
    pub fn new(from: UnixTimestamp, till: UnixTimestamp) -> Result<Self, ValidationError> {
        validation::ordered("from", Some(from), "till", Some(till))?;
        Ok(Self {
            from,
            till,
            lang: None,
        })
    }

    /// Language of product names, e.g. `en`.
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn from(&self) -> UnixTimestamp {
        self.from
    }

    pub fn till(&self) -> UnixTimestamp {
        self.till
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceList {
    /// Period as echoed by the server.
    pub from: String,
    pub till: String,
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub user_id: i64,
    pub agreement_number: String,
    pub client_id: String,
    pub number: String,
    pub paid: bool,
    pub total_time: String,
    pub products: Vec<InvoiceProduct>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvoiceProduct {
    #[serde(rename = "Name", deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(rename = "Quantity", deserialize_with = "coerce::float")]
    pub quantity: f64,
    #[serde(rename = "Price", deserialize_with = "coerce::float")]
    pub price: f64,
    #[serde(rename = "Discount", deserialize_with = "coerce::float")]
    pub discount: f64,
    #[serde(rename = "Sum", deserialize_with = "coerce::float")]
    pub sum: f64,
    #[serde(rename = "Date_added", deserialize_with = "coerce::string")]
    pub date_added: String,
    #[serde(rename = "Issue_date", deserialize_with = "coerce::string")]
    pub issue_date: String,
    #[serde(rename = "Service_id", deserialize_with = "coerce::int")]
    pub service_id: i64,
    #[serde(rename = "Prefix", deserialize_with = "coerce::string")]
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Invoice fields `invoice_update` may change.
pub struct InvoiceUpdateOptions {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub state: Option<String>,
    pub country_id: Option<u64>,
    pub phone: Option<String>,
    pub tax_reg_number: Option<String>,
    pub comment: Option<String>,
    pub invoice_sent_manually: bool,
    /// Mark the invoice paid.
    pub pay: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInvoice {
    id: u64,
    options: InvoiceUpdateOptions,
}

impl UpdateInvoice {
    pub fn new(id: u64, options: InvoiceUpdateOptions) -> Result<Self, ValidationError> {
        if let Some(country_id) = options.country_id {
            validation::positive("country_id", country_id)?;
        }
        Ok(Self {
            id: validation::positive("id", id)?,
            options,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn options(&self) -> &InvoiceUpdateOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Which credit notes `credit_notes_get` returns.
pub enum CreditNoteFilter {
    #[default]
    All,
    User(u64),
    CreditNote(u64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetCreditNotes {
    filter: CreditNoteFilter,
}

impl GetCreditNotes {
    pub fn new(filter: CreditNoteFilter) -> Result<Self, ValidationError> {
        match filter {
            CreditNoteFilter::User(id) => validation::positive("user_id", id).map(drop)?,
            CreditNoteFilter::CreditNote(id) => {
                validation::positive("credit_note_id", id).map(drop)?
            }
            CreditNoteFilter::All => {}
        }
        Ok(Self { filter })
    }

    pub fn filter(&self) -> CreditNoteFilter {
        self.filter
    }
}

#[derive(Debug, Clone, PartialEq)]
/// `credit_note_create`.
pub struct CreateCreditNote {
    user_id: u64,
    price: f64,
    issue_date: UnixTimestamp,
    number: Option<String>,
    extra: ExtraParams,
}

impl CreateCreditNote {
    pub fn new(
        user_id: u64,
        price: f64,
        issue_date: UnixTimestamp,
    ) -> Result<Self, ValidationError> {
        validation::positive("issue_date", issue_date.value())?;
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            price: validation::positive_f64("price", price)?,
            issue_date,
            number: None,
            extra: ExtraParams::new(),
        })
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Other credit note fields, e.g. `comment`.
    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn issue_date(&self) -> UnixTimestamp {
        self.issue_date
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn extra(&self) -> &ExtraParams {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCreditNote {
    credit_note_id: u64,
    status: Option<String>,
    comment: Option<String>,
}

impl UpdateCreditNote {
    pub fn new(credit_note_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            credit_note_id: validation::positive("credit_note_id", credit_note_id)?,
            status: None,
            comment: None,
        })
    }

    /// `paid` or `unpaid`.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn credit_note_id(&self) -> u64 {
        self.credit_note_id
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

id_request! {
    /// `credit_note_delete`.
    DeleteCreditNote { credit_note_id: "credit_note_id" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    PeriodicFee,
    OneTimeFee,
    DynamicFlatRate,
    FlatRate,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PeriodicFee => "periodic_fee",
            Self::OneTimeFee => "one_time_fee",
            Self::DynamicFlatRate => "dynamic_flat_rate",
            Self::FlatRate => "flat_rate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServicePeriod {
    Month,
    Day,
}

impl ServicePeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceOptions {
    pub sell_price: Option<f64>,
    pub self_cost: Option<f64>,
    pub period: Option<ServicePeriod>,
    /// Flat-rate services only.
    pub minutes_per_month: Option<u64>,
}

impl ServiceOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("service_sell_price", self.sell_price),
            ("service_self_cost", self.self_cost),
        ] {
            if let Some(value) = value.filter(|value| !value.is_finite()) {
                return Err(ValidationError::InvalidFormat {
                    field,
                    input: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateService {
    name: String,
    service_type: ServiceType,
    owner_id: Option<u64>,
    options: ServiceOptions,
}

impl CreateService {
    pub fn new(
        name: impl Into<String>,
        service_type: ServiceType,
        options: ServiceOptions,
    ) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self {
            name: validation::non_empty("new_service_name", name)?,
            service_type,
            owner_id: None,
            options,
        })
    }

    /// Create the service on behalf of a reseller.
    pub fn owned_by(mut self, owner_id: u64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn owner_id(&self) -> Option<u64> {
        self.owner_id
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCreated {
    pub status: String,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateService {
    service_id: u64,
    name: Option<String>,
    service_type: Option<ServiceType>,
    options: ServiceOptions,
}

impl UpdateService {
    pub fn new(service_id: u64, options: ServiceOptions) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self {
            service_id: validation::positive("service_id", service_id)?,
            name: None,
            service_type: None,
            options,
        })
    }

    pub fn rename(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(validation::non_empty("service_name", name)?);
        Ok(self)
    }

    pub fn with_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn service_id(&self) -> u64 {
        self.service_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.service_type
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }
}

id_request! {
    /// `service_delete`. Fails while subscriptions to the service exist.
    DeleteService { service_id: "service_id" }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetServices;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub memo: String,
    #[serde(rename = "type", deserialize_with = "coerce::string")]
    pub kind: String,
    #[serde(deserialize_with = "coerce::string")]
    pub period: String,
    #[serde(deserialize_with = "coerce::float")]
    pub price: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub self_cost: f64,
    #[serde(deserialize_with = "coerce::string")]
    pub currency: String,
    #[serde(deserialize_with = "coerce::opt_int")]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// `subscriptions_get` filters.
pub struct GetSubscriptions {
    pub service_id: Option<u64>,
    pub activation_start: Option<UnixTimestamp>,
    pub activation_end: Option<UnixTimestamp>,
    pub memo: Option<String>,
    pub until_canceled: Option<bool>,
    pub user_id: Option<u64>,
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Subscription fields shared by create, bulk create and update.
pub struct SubscriptionOptions {
    pub activation_start: Option<UnixTimestamp>,
    pub activation_end: Option<UnixTimestamp>,
    pub memo: Option<String>,
    pub until_canceled: Option<bool>,
    pub extra: ExtraParams,
}

impl SubscriptionOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::ordered(
            "activation_start",
            self.activation_start,
            "activation_end",
            self.activation_end,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Subscribe a user to a service (`subscription_create`).
pub struct CreateSubscription {
    user_id: u64,
    service_id: u64,
    options: SubscriptionOptions,
}

impl CreateSubscription {
    pub fn new(
        user_id: u64,
        service_id: u64,
        options: SubscriptionOptions,
    ) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            service_id: validation::positive("service_id", service_id)?,
            options,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn service_id(&self) -> u64 {
        self.service_id
    }

    pub fn options(&self) -> &SubscriptionOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCreated {
    pub status: String,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `subscription_create_bulk`: same input as [`CreateSubscription`], but
/// MOR may create several subscriptions and returns all their ids.
pub struct CreateSubscriptionBulk(pub CreateSubscription);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionsCreated {
    pub status: String,
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSubscription {
    subscription_id: u64,
    options: SubscriptionOptions,
}

impl UpdateSubscription {
    pub fn new(
        subscription_id: u64,
        options: SubscriptionOptions,
    ) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self {
            subscription_id: validation::positive("subscription_id", subscription_id)?,
            options,
        })
    }

    pub fn subscription_id(&self) -> u64 {
        self.subscription_id
    }

    pub fn options(&self) -> &SubscriptionOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSubscription {
    subscription_id: u64,
    delete_action: String,
}

impl DeleteSubscription {
    /// `delete_action` decides what happens to charges already applied.
    pub fn new(
        subscription_id: u64,
        delete_action: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            subscription_id: validation::positive("subscription_id", subscription_id)?,
            delete_action: validation::non_empty("subscription_delete_action", delete_action)?,
        })
    }

    pub fn subscription_id(&self) -> u64 {
        self.subscription_id
    }

    pub fn delete_action(&self) -> &str {
        &self.delete_action
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Whether a number is covered by the user's flat-rate subscriptions
/// (`subscription_flat_rate_number_status_get`).
pub struct GetFlatRateNumberStatus {
    user_id: u64,
    number: String,
}

impl GetFlatRateNumberStatus {
    pub fn new(user_id: u64, number: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            number: validation::non_empty("number", number)?,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlatRateNumberStatus {
    #[serde(deserialize_with = "coerce::string")]
    pub number: String,
    #[serde(deserialize_with = "coerce::string")]
    pub status: String,
    #[serde(deserialize_with = "coerce::opt_string")]
    pub prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_period_is_ordered() {
        let err = GetInvoices::new(UnixTimestamp::new(20), UnixTimestamp::new(10)).unwrap_err();
        assert_eq!(err.to_string(), "from must not be later than till");
        assert!(GetInvoices::new(UnixTimestamp::new(10), UnixTimestamp::new(10)).is_ok());
    }

    #[test]
    fn credit_note_input_is_checked() {
        assert!(CreateCreditNote::new(1, 0.0, UnixTimestamp::new(100)).is_err());
        assert!(matches!(
            CreateCreditNote::new(1, 5.0, UnixTimestamp::new(0)),
            Err(ValidationError::NotPositive { field: "issue_date" })
        ));
        assert!(GetCreditNotes::new(CreditNoteFilter::User(0)).is_err());
    }

    #[test]
    fn subscription_window_is_ordered() {
        let options = SubscriptionOptions {
            activation_start: Some(UnixTimestamp::new(200)),
            activation_end: Some(UnixTimestamp::new(100)),
            ..SubscriptionOptions::default()
        };
        assert!(matches!(
            CreateSubscription::new(1, 2, options),
            Err(ValidationError::RangeOrder { .. })
        ));
    }

    #[test]
    fn service_prices_must_be_finite() {
        let options = ServiceOptions {
            sell_price: Some(f64::NAN),
            ..ServiceOptions::default()
        };
        assert!(CreateService::new("Support", ServiceType::OneTimeFee, options).is_err());
    }
}
