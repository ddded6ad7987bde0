//! SMS sending and history, and user phonebooks.

use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::{ExtraParams, RawPhoneNumber, UnixTimestamp};
use crate::xml::coerce;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Send one SMS through an SMS LCR (`sms_send`).
pub struct SendSms {
    lcr_id: u64,
    dst: RawPhoneNumber,
    src: String,
    message: String,
}

impl SendSms {
    /// `dst` may be built from a parsed [`crate::domain::PhoneNumber`] to send
    /// the digits-only international form.
    pub fn new(
        lcr_id: u64,
        dst: impl Into<RawPhoneNumber>,
        src: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ValidationError::Empty { field: "message" });
        }
        Ok(Self {
            lcr_id: validation::positive("lcr_id", lcr_id)?,
            dst: dst.into(),
            src: validation::non_empty("src", src)?,
            message,
        })
    }

    pub fn lcr_id(&self) -> u64 {
        self.lcr_id
    }

    pub fn dst(&self) -> &RawPhoneNumber {
        &self.dst
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Message text as given, before wire encoding.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmsSent {
    pub status: String,
    pub message_id: String,
    pub sms_status_code_tip: String,
    pub price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enable SMS for a user (`user_sms_service_subscribe`).
pub struct SubscribeSmsService {
    user_id: u64,
    sms_tariff_id: u64,
    sms_lcr_id: Option<u64>,
}

impl SubscribeSmsService {
    pub fn new(user_id: u64, sms_tariff_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            sms_tariff_id: validation::positive("sms_tariff_id", sms_tariff_id)?,
            sms_lcr_id: None,
        })
    }

    pub fn with_lcr(mut self, sms_lcr_id: u64) -> Result<Self, ValidationError> {
        self.sms_lcr_id = Some(validation::positive("sms_lcr_id", sms_lcr_id)?);
        Ok(self)
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn sms_tariff_id(&self) -> u64 {
        self.sms_tariff_id
    }

    pub fn sms_lcr_id(&self) -> Option<u64> {
        self.sms_lcr_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// SMS history filters (`user_sms_get`). Every filter is optional.
pub struct GetUserSms {
    pub from: Option<UnixTimestamp>,
    pub till: Option<UnixTimestamp>,
    pub user_id: Option<u64>,
    pub status_code: Option<i64>,
    pub provider_id: Option<u64>,
    pub reseller_id: Option<u64>,
    pub destination: Option<String>,
    pub number: Option<String>,
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmsMessage {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub sending_date: String,
    #[serde(deserialize_with = "coerce::int")]
    pub status_code: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub provider_id: String,
    #[serde(deserialize_with = "coerce::float")]
    pub provider_rate: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub provider_price: f64,
    #[serde(deserialize_with = "coerce::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "coerce::float")]
    pub user_rate: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub user_price: f64,
    #[serde(deserialize_with = "coerce::int")]
    pub reseller_id: i64,
    #[serde(deserialize_with = "coerce::float")]
    pub reseller_rate: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub reseller_price: f64,
    #[serde(deserialize_with = "coerce::string")]
    pub prefix: String,
    #[serde(deserialize_with = "coerce::string")]
    pub number: String,
    #[serde(deserialize_with = "coerce::string")]
    pub clickatell_message_id: String,
}

id_request! {
    /// Phonebook entries of one user (`phonebooks_get`).
    GetPhonebooks { user_id: "user_id" }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Phonebook {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub number: String,
    #[serde(deserialize_with = "coerce::string")]
    pub speeddial: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonebookChanges {
    pub name: Option<String>,
    pub number: Option<String>,
    pub speeddial: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `phonebook_edit`.
pub struct UpdatePhonebook {
    phonebook_id: u64,
    changes: PhonebookChanges,
}

impl UpdatePhonebook {
    pub fn new(phonebook_id: u64, changes: PhonebookChanges) -> Result<Self, ValidationError> {
        Ok(Self {
            phonebook_id: validation::positive("phonebook_id", phonebook_id)?,
            changes,
        })
    }

    pub fn phonebook_id(&self) -> u64 {
        self.phonebook_id
    }

    pub fn changes(&self) -> &PhonebookChanges {
        &self.changes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Add a speed dial record to a user's phonebook (`phonebook_record_create`).
///
/// `number` is digits only and `speeddial` is at least two digits.
pub struct CreatePhonebookRecord {
    user_id: u64,
    name: String,
    number: String,
    speeddial: String,
}

impl CreatePhonebookRecord {
    pub fn new(
        user_id: u64,
        name: impl Into<String>,
        number: impl Into<String>,
        speeddial: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let user_id = validation::positive("user_id", user_id)?;
        let name = validation::non_empty("name", name)?;
        let number = validation::non_empty("number", number)?;
        let speeddial = validation::non_empty("speeddial", speeddial)?;
        validation::digits("number", &number)?;
        validation::digits("speeddial", &speeddial)?;
        validation::at_least("speeddial", speeddial.len() as i64, 2)?;
        Ok(Self {
            user_id,
            name,
            number,
            speeddial,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn speeddial(&self) -> &str {
        &self.speeddial
    }
}
