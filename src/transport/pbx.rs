use chrono::Weekday;
use serde::Deserialize;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, int_at,
    section, status_success, text,
};
use crate::domain::{
    ActivateMonitoring, AddPoolNumbers, CreateNumberPool, CreatePbxPool, CreateResellerGroup,
    DeleteNumberPool, GetNumberPools, GetResellerGroups, KnownApiError, MonitoredUser,
    MonitoringActivation, NumberPool, NumberPoolCreated, PeriodBound, PoolNumber,
    PoolNumberSelection, PoolNumberUser, PoolUsers, RemovePoolNumbers, ResellerGroup,
    UpdateIvrDialPlan, UpdateIvrTimePeriod, UpdateNumberPool,
};
use crate::xml::{XmlNode, coerce};

const DIAL_PLAN_ERRORS: &[(&str, KnownApiError)] = &[
    ("Dial plan was not found", KnownApiError::DialPlanNotFound),
    ("time_period1 was not found", KnownApiError::DialPlanTimePeriodNotFound),
    ("time_period2 was not found", KnownApiError::DialPlanTimePeriodNotFound),
    ("time_period3 was not found", KnownApiError::DialPlanTimePeriodNotFound),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const TIME_PERIOD_ERRORS: &[(&str, KnownApiError)] = &[
    ("Time period was not found", KnownApiError::TimePeriodNotFound),
    ("Time period was not updated", KnownApiError::TimePeriodNotUpdated),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const PBX_POOL_ERRORS: &[(&str, KnownApiError)] = &[
    ("PbxPool must have name", KnownApiError::PbxPoolNameMissing),
    ("PbxPool name must be unique", KnownApiError::PbxPoolNameNotUnique),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    (
        "You are not authorised to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("Access Denied", KnownApiError::AccessDenied),
];

const RESELLER_GROUP_ERRORS: &[(&str, KnownApiError)] = &[
    ("Incorrect hash", KnownApiError::IncorrectHash),
    (
        "Registration over API is disabled",
        KnownApiError::RegistrationDisabled,
    ),
    ("Access Denied", KnownApiError::AccessDenied),
    (
        "Reseller Group Name must be specified",
        KnownApiError::ResellerGroupNameMissing,
    ),
    ("Group name must be unique", KnownApiError::ResellerGroupNameNotUnique),
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("No Reseller Groups found", KnownApiError::NoResellerGroupsFound),
];

const MONITORING_ERRORS: &[(&str, KnownApiError)] = &[
    (
        "Such monitoring was not found. Verify master-slave database integrity.",
        KnownApiError::MonitoringNotFound,
    ),
    (
        "You must supply these params: monitoring_id, users, block, email, mtype",
        KnownApiError::MissingMonitoringParams,
    ),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const NUMBER_POOL_ERRORS: &[(&str, KnownApiError)] = &[
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Number Pool was not found", KnownApiError::NumberPoolNotFound),
    ("Numbers cannot be empty", KnownApiError::NumbersEmpty),
    ("Invalid numbers format", KnownApiError::InvalidNumbersFormat),
    (
        "Number Pool Numbers not found",
        KnownApiError::NumberPoolNumbersNotFound,
    ),
    (
        "Number Pool Numbers are in use",
        KnownApiError::NumberPoolNumbersInUse,
    ),
];

const fn pbx_endpoint(
    path: &'static str,
    errors: &'static [(&'static str, KnownApiError)],
) -> Endpoint {
    Endpoint {
        path,
        credentials: Credentials::Username,
        error_at: TOP_ERROR,
        errors,
    }
}

// IVR updates report errors inside `status`.
const IVR_DIAL_PLAN_UPDATE: Endpoint = Endpoint {
    error_at: STATUS_ERROR,
    ..pbx_endpoint("/api/ivr_dial_plan_update", DIAL_PLAN_ERRORS)
};
const IVR_TIME_PERIOD_UPDATE: Endpoint = Endpoint {
    error_at: STATUS_ERROR,
    ..pbx_endpoint("/api/ivr_time_period_update", TIME_PERIOD_ERRORS)
};

const PBX_POOL_CREATE: Endpoint = pbx_endpoint("/api/pbx_pool_create", PBX_POOL_ERRORS);
const RESELLER_GROUP_CREATE: Endpoint =
    pbx_endpoint("/api/reseller_group_create", RESELLER_GROUP_ERRORS);
const RESELLER_GROUPS_GET: Endpoint =
    pbx_endpoint("/api/reseller_groups_get", RESELLER_GROUP_ERRORS);
const MONITORING_ADDON_ACTIVATE: Endpoint =
    pbx_endpoint("/api/monitoring_addon_activate", MONITORING_ERRORS);

const NUMBER_POOLS_GET: Endpoint = pbx_endpoint("/api/number_pools_get", NUMBER_POOL_ERRORS);
const NUMBER_POOL_CREATE: Endpoint = pbx_endpoint("/api/number_pool_create", NUMBER_POOL_ERRORS);
const NUMBER_POOL_UPDATE: Endpoint = pbx_endpoint("/api/number_pool_update", NUMBER_POOL_ERRORS);
const NUMBER_POOL_DELETE: Endpoint = pbx_endpoint("/api/number_pool_delete", NUMBER_POOL_ERRORS);
const NUMBER_POOL_NUMBERS_CREATE: Endpoint =
    pbx_endpoint("/api/number_pool_numbers_create", NUMBER_POOL_ERRORS);
const NUMBER_POOL_NUMBERS_DELETE: Endpoint =
    pbx_endpoint("/api/number_pool_numbers_delete", NUMBER_POOL_ERRORS);

impl Operation for UpdateIvrDialPlan {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &IVR_DIAL_PLAN_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u", "ivr_dial_plan_id"]);
        form.set("ivr_dial_plan_id", self.ivr_dial_plan_id());
        for (index, slot) in self.time_periods().iter().enumerate() {
            let key = format!("time_period{}", index + 1);
            match slot {
                Some(Some(id)) => form.set(&key, id),
                Some(None) => form.set(&key, ""),
                None => {}
            }
        }
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// `Any` goes on the wire as an empty value.
fn bound_text<T>(bound: PeriodBound<T>, render: impl Fn(T) -> String) -> String {
    match bound {
        PeriodBound::Any => String::new(),
        PeriodBound::Only(value) => render(value),
    }
}

impl Operation for UpdateIvrTimePeriod {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &IVR_TIME_PERIOD_UPDATE;

    fn encode(&self) -> Form {
        let changes = self.changes();
        let mut form = Form::new(&["u", "ivr_time_period_id"]);
        form.set("ivr_time_period_id", self.ivr_time_period_id());
        form.set_opt("name", changes.name.as_deref());
        form.set_opt("start_hour", changes.start_hour);
        form.set_opt("end_hour", changes.end_hour);
        form.set_opt("start_minute", changes.start_minute);
        form.set_opt("end_minute", changes.end_minute);

        let weekday = |day: Weekday| weekday_code(day).to_owned();
        form.set_opt(
            "start_weekday",
            changes.start_weekday.map(|bound| bound_text(bound, weekday)),
        );
        form.set_opt(
            "end_weekday",
            changes.end_weekday.map(|bound| bound_text(bound, weekday)),
        );
        for (key, bound) in [
            ("start_month", changes.start_month),
            ("end_month", changes.end_month),
            ("start_day", changes.start_day),
            ("end_day", changes.end_day),
        ] {
            form.set_opt(key, bound.map(|bound| bound_text(bound, |value| value.to_string())));
        }
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status", "message"]))
    }
}

impl Operation for CreatePbxPool {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &PBX_POOL_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["name"]);
        form.set("name", self.name());
        form.set_opt("comment", self.comment());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for CreateResellerGroup {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &RESELLER_GROUP_CREATE;

    fn encode(&self) -> Form {
        let features = self.features();
        let mut form = Form::new(&["name"]);
        form.set("name", self.name());
        form.set_opt("rg_description", self.description());
        form.set_opt_bool("calling_cards", features.calling_cards);
        form.set_opt_bool("call_shop", features.call_shop);
        form.set_opt_bool("sms_addon", features.sms_addon);
        form.set_opt_bool("payment_gateways", features.payment_gateways);
        form.set_opt_bool("autodialer", features.autodialer);
        form.set_opt_bool("pbx_functions", features.pbx_functions);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResellerGroupList {
    #[serde(deserialize_with = "coerce::list")]
    reseller_group: Vec<ResellerGroup>,
}

impl Operation for GetResellerGroups {
    type Output = Vec<ResellerGroup>;
    const ENDPOINT: &'static Endpoint = &RESELLER_GROUPS_GET;

    fn encode(&self) -> Form {
        Form::new(&["u"])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<ResellerGroupList>(root, &["reseller_groups"])?.reseller_group)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MonitoringStatus {
    #[serde(deserialize_with = "coerce::string")]
    monitoring_found: String,
    users: MonitoredUserList,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MonitoredUserList {
    #[serde(deserialize_with = "coerce::list")]
    user: Vec<MonitoredUser>,
}

impl Operation for ActivateMonitoring {
    type Output = MonitoringActivation;
    const ENDPOINT: &'static Endpoint = &MONITORING_ADDON_ACTIVATE;

    fn encode(&self) -> Form {
        let flag = |value: bool| if value { "true" } else { "false" };
        let mut form = Form::new(&[]);
        form.set("monitoring_id", self.monitoring_id());
        form.set("users", self.users());
        form.set("block", flag(self.block()));
        form.set("email", flag(self.email()));
        form.set("mtype", self.monitoring_type().code());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let status = section::<MonitoringStatus>(root, &["status"])?;
        Ok(MonitoringActivation {
            monitoring_found: status.monitoring_found,
            users: status.users.user,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PoolList {
    #[serde(deserialize_with = "coerce::list")]
    number_pool: Vec<PoolEntry>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PoolEntry {
    #[serde(deserialize_with = "coerce::int")]
    id: i64,
    #[serde(deserialize_with = "coerce::string")]
    name: String,
    #[serde(deserialize_with = "coerce::string")]
    comment: String,
    #[serde(deserialize_with = "coerce::int")]
    owner_id: i64,
    numbers: Option<PoolNumberList>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PoolNumberList {
    #[serde(deserialize_with = "coerce::list")]
    number: Vec<PoolNumberEntry>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PoolNumberEntry {
    #[serde(deserialize_with = "coerce::string")]
    number: String,
    #[serde(deserialize_with = "coerce::string")]
    comment: String,
    users: Option<PoolNumberUserList>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PoolNumberUserList {
    #[serde(deserialize_with = "coerce::list")]
    user: Vec<PoolNumberUser>,
}

impl From<PoolNumberEntry> for PoolNumber {
    fn from(entry: PoolNumberEntry) -> Self {
        Self {
            number: entry.number,
            comment: entry.comment,
            users: entry
                .users
                .map(|users| users.user)
                .filter(|users| !users.is_empty()),
        }
    }
}

impl From<PoolEntry> for NumberPool {
    fn from(entry: PoolEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            comment: entry.comment,
            owner_id: entry.owner_id,
            numbers: entry
                .numbers
                .map(|numbers| numbers.number)
                .filter(|numbers| !numbers.is_empty())
                .map(|numbers| numbers.into_iter().map(PoolNumber::from).collect()),
        }
    }
}

impl Operation for GetNumberPools {
    type Output = Vec<NumberPool>;
    const ENDPOINT: &'static Endpoint = &NUMBER_POOLS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_opt("number_pool_id", self.number_pool_id());
        if let Some(listing) = self.numbers() {
            form.set("show_numbers", "1");
            form.set_opt("number_limit_row_count", listing.limit);
            form.set_opt("number_limit_offset", listing.offset);
            match &listing.users {
                Some(PoolUsers::All) => form.set("user_ids", "all"),
                Some(PoolUsers::Ids(ids)) => form.set(
                    "user_ids",
                    ids.iter()
                        .map(u64::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                ),
                None => {}
            }
        }
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let pools = section::<PoolList>(root, &["status", "number_pools"])?;
        Ok(pools.number_pool.into_iter().map(NumberPool::from).collect())
    }
}

impl Operation for CreateNumberPool {
    type Output = NumberPoolCreated;
    const ENDPOINT: &'static Endpoint = &NUMBER_POOL_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["name"]);
        form.set("name", self.name());
        form.set_opt("comment", self.comment());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(NumberPoolCreated {
            status: status_success(root),
            number_pool_id: int_at(root, &["status", "number_pool_id"]),
        })
    }
}

impl Operation for UpdateNumberPool {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &NUMBER_POOL_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["number_pool_id"]);
        form.set("number_pool_id", self.number_pool_id());
        form.set_opt("name", self.name());
        form.set_opt("comment", self.comment());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

single_id_operation!(
    DeleteNumberPool,
    NUMBER_POOL_DELETE,
    "number_pool_id" => number_pool_id,
    String,
    status_success
);

impl Operation for AddPoolNumbers {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &NUMBER_POOL_NUMBERS_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["number_pool_id", "numbers"]);
        form.set("number_pool_id", self.number_pool_id());
        form.set("numbers", self.numbers());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for RemovePoolNumbers {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &NUMBER_POOL_NUMBERS_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["number_pool_id"]);
        form.set("number_pool_id", self.number_pool_id());
        match self.selection() {
            PoolNumberSelection::All => form.set("delete_all", "1"),
            PoolNumberSelection::Matching {
                number_ids,
                numbers,
            } => {
                form.set_opt("number_ids", number_ids.as_deref());
                form.set_opt("numbers", numbers.as_deref());
            }
        }
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}
