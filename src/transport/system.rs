use serde::Deserialize;
use serde_json::Value;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, section,
    section_value, status_success, text,
};
use crate::domain::{
    Aggregates, GetAggregates, GetFinancialStatements, GetQuickStats, GetSystemVersion,
    KnownApiError, QuickStats, SendEmail, UpdateExchangeRate, UpdateSettings,
};
use crate::xml::{XmlNode, coerce};

const QUICKSTATS_GET: Endpoint = Endpoint {
    path: "/api/quickstats_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[
        ("API Requests are disabled", KnownApiError::ApiRequestsDisabled),
        ("GET Requests are disabled", KnownApiError::GetRequestsDisabled),
        ("Access Denied", KnownApiError::AccessDenied),
        ("Incorrect hash", KnownApiError::IncorrectHash),
        ("Cannot connect to Elasticsearch", KnownApiError::ElasticsearchUnavailable),
    ],
};

const SYSTEM_VERSION_GET: Endpoint = Endpoint {
    path: "/api/system_version_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[
        ("Access Denied", KnownApiError::AccessDenied),
        ("Incorrect hash", KnownApiError::IncorrectHash),
    ],
};

const CONFLINES_UPDATE: Endpoint = Endpoint {
    path: "/api/conflines_update",
    credentials: Credentials::Username,
    error_at: STATUS_ERROR,
    errors: &[
        ("Incorrect hash", KnownApiError::IncorrectHash),
        ("Access Denied", KnownApiError::AccessDenied),
        ("Device was not found", KnownApiError::DeviceNotFound),
        (
            "default_user_password_length must be between 6 and 30",
            KnownApiError::InvalidDefaultUserPasswordLength,
        ),
        (
            "default_user_credit must be positive number or -1 for infinity",
            KnownApiError::InvalidDefaultUserCredit,
        ),
        (
            "default_user_credit must be positive integer",
            KnownApiError::InvalidDefaultUserCredit,
        ),
        (
            "default_user_balance must be number",
            KnownApiError::InvalidDefaultUserBalance,
        ),
        (
            "default_user_postpaid must be 0 or 1",
            KnownApiError::InvalidDefaultUserPostpaid,
        ),
        (
            "default_user_allow_loss_calls must be 0 or 1",
            KnownApiError::InvalidDefaultUserAllowLossCalls,
        ),
        (
            "default_user_time_zone name was not correct",
            KnownApiError::InvalidDefaultUserTimeZone,
        ),
        (
            "default_user_currency name was not correct",
            KnownApiError::InvalidDefaultUserCurrency,
        ),
        (
            "default_user_quickforwards_rule_id was not found",
            KnownApiError::DefaultQuickforwardsRuleNotFound,
        ),
        (
            "default_user_recording_enabled must be 0 or 1",
            KnownApiError::InvalidDefaultUserRecordingEnabled,
        ),
        (
            "default_user_recording_forced_enabled must be 0 or 1",
            KnownApiError::InvalidDefaultUserRecordingForcedEnabled,
        ),
        (
            "default_device_call_limit must be positive integer",
            KnownApiError::InvalidDefaultDeviceCallLimit,
        ),
        (
            "default_device_canreinvite can only be one of the following: 'yes', 'no', 'nonat', 'update', 'update,nonat'",
            KnownApiError::InvalidDefaultDeviceCanreinvite,
        ),
        (
            "default_device_nat can only be one of the following: 'yes', 'no', 'force_rport', 'comedia'",
            KnownApiError::InvalidDefaultDeviceNat,
        ),
        (
            "default_device_qualify can only be 'no' or >= 1000 integer",
            KnownApiError::InvalidDefaultDeviceQualify,
        ),
        (
            "default_device_grace_time must be positive integer",
            KnownApiError::InvalidDefaultDeviceGraceTime,
        ),
        (
            "default_device_location_id was not found",
            KnownApiError::DefaultDeviceLocationNotFound,
        ),
        (
            "default_user_tariff_id was not found",
            KnownApiError::DefaultUserTariffNotFound,
        ),
        ("allow_api must be 0 or 1", KnownApiError::InvalidAllowApi),
        (
            "api_secret_key length must be higher than 5",
            KnownApiError::ApiSecretKeyTooShort,
        ),
    ],
};

const EXCHANGE_RATE_UPDATE: Endpoint = Endpoint {
    path: "/api/exchange_rate_update",
    credentials: Credentials::Username,
    error_at: STATUS_ERROR,
    errors: &[
        ("Access Denied", KnownApiError::AccessDenied),
        ("Incorrect hash", KnownApiError::IncorrectHash),
        ("Exchange rate is invalid", KnownApiError::InvalidExchangeRate),
        ("Currency was not found", KnownApiError::CurrencyNotFound),
    ],
};

const AGGREGATE_GET: Endpoint = Endpoint {
    path: "/api/aggregate_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[
        (
            "You are not authorized to use this functionality",
            KnownApiError::NotAuthorized,
        ),
        ("Access Denied", KnownApiError::AccessDenied),
        ("Device was not found", KnownApiError::DeviceNotFound),
        ("Terminator was not found", KnownApiError::TerminatorNotFound),
        ("Provider was not found", KnownApiError::ProviderNotFound),
        ("User was not found", KnownApiError::UserNotFound),
    ],
};

// Neither endpoint documents its error strings; everything surfaces as unknown.
const EMAIL_SEND: Endpoint = Endpoint {
    path: "/api/email_send",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[],
};

const FINANCIAL_STATEMENTS_GET: Endpoint = Endpoint {
    path: "/api/financial_statements_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[],
};

impl Operation for GetQuickStats {
    type Output = QuickStats;
    const ENDPOINT: &'static Endpoint = &QUICKSTATS_GET;

    fn encode(&self) -> Form {
        Form::new(&["u"]).with_admin_hash_keys(&[])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        section(root, &["quickstats"])
    }
}

impl Operation for GetSystemVersion {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &SYSTEM_VERSION_GET;

    fn encode(&self) -> Form {
        Form::new(&["u"])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["version"]))
    }
}

impl Operation for UpdateSettings {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &CONFLINES_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.extend(self.settings());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for UpdateExchangeRate {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &EXCHANGE_RATE_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["currency", "rate"]);
        form.set("currency", self.currency());
        form.set("rate", self.rate());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AggregateList {
    #[serde(deserialize_with = "coerce::list")]
    aggregate: Vec<Value>,
}

impl Operation for GetAggregates {
    type Output = Aggregates;
    const ENDPOINT: &'static Endpoint = &AGGREGATE_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.extend(&self.filters);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(Aggregates {
            aggregates: section::<AggregateList>(root, &["aggregates"])?.aggregate,
            totals: section_value(root, &["totals"]),
        })
    }
}

impl Operation for SendEmail {
    type Output = Value;
    const ENDPOINT: &'static Endpoint = &EMAIL_SEND;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["email_name", "email_to_user_id"]);
        form.set("email_name", self.email_name());
        form.set_opt("email_to_user_id", self.to_user_id());
        form.extend(self.extra());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(root.to_value())
    }
}

impl Operation for GetFinancialStatements {
    type Output = Value;
    const ENDPOINT: &'static Endpoint = &FINANCIAL_STATEMENTS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id", "date_from", "date_till"]);
        form.set_opt("user_id", self.user_id());
        form.set("date_from", self.date_from());
        form.set("date_till", self.date_till());
        form.extend(self.extra());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section_value(root, &["financial_statement"]))
    }
}
