//! Users, balances, payments and vouchers.

use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::{ExtraParams, UnixTimestamp};
use crate::xml::coerce;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Log in as a MOR user (`user_login`).
///
/// Unlike every other call, the credentials sent as `u`/`p` are the ones given
/// here rather than the client's configured account.
pub struct UserLogin {
    username: String,
    password: String,
}

impl UserLogin {
    /// `username` may be an email address when email login is enabled.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = validation::non_empty("username", username)?;
        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Log out the configured user (`user_logout`).
pub struct UserLogout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub name: String,
    pub status: String,
    pub status_message: String,
    /// Only reported by MOR 11 and newer.
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutResponse {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Balance of a user looked up by username (`user_balance_get`).
pub struct GetUserBalance {
    username: String,
    currency: Option<String>,
}

impl GetUserBalance {
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            username: validation::non_empty("username", username)?,
            currency: None,
        })
    }

    /// Report the balance in this currency. Blank values are ignored.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        self.currency = (!currency.trim().is_empty()).then(|| currency.trim().to_owned());
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Set a user's balance (`user_balance_update`).
pub struct UpdateUserBalance {
    user_id: u64,
    balance: f64,
}

impl UpdateUserBalance {
    pub fn new(user_id: u64, balance: f64) -> Result<Self, ValidationError> {
        let user_id = validation::positive("user_id", user_id)?;
        if !balance.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "balance",
                input: balance.to_string(),
            });
        }
        Ok(Self { user_id, balance })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceUpdateResponse {
    pub status: String,
    pub username: String,
    pub user_id: i64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Balance looked up by the user's unique hash (`user_simple_balance_get`).
pub struct GetSimpleBalance {
    id: String,
    currency: Option<String>,
}

impl GetSimpleBalance {
    pub fn new(unique_hash: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: validation::non_empty("id", unique_hash)?,
            currency: None,
        })
    }

    /// Report the balance in this currency. Blank values are ignored.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        self.currency = (!currency.trim().is_empty()).then(|| currency.trim().to_owned());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Balance looked up by the user's password (`user_balance_get_by_psw/{password}`).
///
/// The password travels in the URL path.
pub struct GetUserBalanceByPassword {
    password: String,
}

impl GetUserBalanceByPassword {
    pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(Self { password })
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Payment types accepted by the payment endpoints.
pub enum PaymentType {
    Card,
    Paypal,
    Webmoney,
    Ouroboros,
    Manual,
    GatewayPaypal,
    GatewayAuthorizeNet,
    IntegrationMoneybooker,
    IntegrationTwoCheckout,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::Paypal => "paypal",
            Self::Webmoney => "webmoney",
            Self::Ouroboros => "ouroboros",
            Self::Manual => "manual",
            Self::GatewayPaypal => "gateways_paypal",
            Self::GatewayAuthorizeNet => "gateways_authorize_net",
            Self::IntegrationMoneybooker => "integrations_moneybooker",
            Self::IntegrationTwoCheckout => "integrations_two_checkout",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentOptions {
    pub payment_type: Option<PaymentType>,
    /// Whether `amount` already includes tax.
    pub tax_in_amount: Option<bool>,
    pub transaction: Option<String>,
    pub payer_email: Option<String>,
    pub comments_for_user: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Register a payment for a user (`payment_create`).
pub struct CreatePayment {
    user_id: u64,
    currency: String,
    amount: f64,
    options: PaymentOptions,
}

impl CreatePayment {
    pub fn new(
        user_id: u64,
        currency: impl Into<String>,
        amount: f64,
        options: PaymentOptions,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            currency: validation::non_empty("p_currency", currency)?,
            amount: validation::positive_f64("amount", amount)?,
            options,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn options(&self) -> &PaymentOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCreated {
    pub status: String,
    pub confirmed: bool,
    pub payment: CreatedPayment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPayment {
    pub id: i64,
    pub currency: String,
    pub tax: f64,
    pub amount: f64,
    pub gross: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// List payments (`payments_get`).
pub struct GetPayments {
    pub from: Option<UnixTimestamp>,
    pub till: Option<UnixTimestamp>,
    pub completed: Option<bool>,
    pub payment_type: Option<PaymentType>,
    /// Any other filter MOR accepts.
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Payment {
    #[serde(deserialize_with = "coerce::string")]
    pub user: String,
    #[serde(deserialize_with = "coerce::string")]
    pub payer: String,
    #[serde(deserialize_with = "coerce::string")]
    pub transaction_id: String,
    #[serde(deserialize_with = "coerce::string")]
    pub date: String,
    #[serde(deserialize_with = "coerce::string")]
    pub confirm_date: String,
    #[serde(rename = "type", deserialize_with = "coerce::string")]
    pub payment_type: String,
    #[serde(deserialize_with = "coerce::float")]
    pub amount: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub fee: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub amount_with_tax: f64,
    #[serde(deserialize_with = "coerce::string")]
    pub currency: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub completed: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub confirmed_by_admin: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub comments_for_user: String,
    #[serde(deserialize_with = "coerce::float")]
    pub user_balance_before_payment: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub user_balance_after_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Redeem a voucher (`voucher_use`).
pub struct UseVoucher {
    voucher_number: String,
    user_id: Option<u64>,
}

impl UseVoucher {
    pub fn new(voucher_number: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            voucher_number: validation::non_empty("voucher_number", voucher_number)?,
            user_id: None,
        })
    }

    /// Credit the voucher to this user instead of the caller.
    pub fn for_user(mut self, user_id: u64) -> Result<Self, ValidationError> {
        self.user_id = Some(validation::positive("user_id", user_id)?);
        Ok(self)
    }

    pub fn voucher_number(&self) -> &str {
        &self.voucher_number
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VoucherUseResponse {
    #[serde(deserialize_with = "coerce::string")]
    pub status: String,
    #[serde(deserialize_with = "coerce::string")]
    pub voucher_number: String,
    #[serde(deserialize_with = "coerce::int")]
    pub voucher_id: i64,
    #[serde(deserialize_with = "coerce::float")]
    pub credit_with_tax: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub credit_without_tax: f64,
    #[serde(deserialize_with = "coerce::string")]
    pub currency: String,
    #[serde(deserialize_with = "coerce::float")]
    pub credit_in_default_currency: f64,
    #[serde(deserialize_with = "coerce::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "coerce::float")]
    pub balance_after_voucher_use: f64,
    #[serde(deserialize_with = "coerce::int")]
    pub payment_id: i64,
}
