//! IVR plans and time periods, PBX pools, reseller groups, monitoring and
//! number pools.

use chrono::Weekday;
use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::xml::coerce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Point an IVR dial plan at up to three time periods (`ivr_dial_plan_update`).
pub struct UpdateIvrDialPlan {
    ivr_dial_plan_id: u64,
    /// `None`: leave as is. `Some(None)`: detach. `Some(Some(id))`: attach.
    time_periods: [Option<Option<u64>>; 3],
}

impl UpdateIvrDialPlan {
    pub fn new(ivr_dial_plan_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            ivr_dial_plan_id: validation::positive("ivr_dial_plan_id", ivr_dial_plan_id)?,
            time_periods: [None; 3],
        })
    }

    /// Set slot `slot` (1 to 3); `None` detaches the slot's period.
    pub fn time_period(
        mut self,
        slot: usize,
        period: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validation::in_range("time_period", slot as i64, 1, 3)?;
        if let Some(id) = period {
            validation::positive("time_period", id)?;
        }
        self.time_periods[slot - 1] = Some(period);
        Ok(self)
    }

    pub fn ivr_dial_plan_id(&self) -> u64 {
        self.ivr_dial_plan_id
    }

    pub fn time_periods(&self) -> &[Option<Option<u64>>; 3] {
        &self.time_periods
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A recurrence bound of a time period: any value, or one specific value.
pub enum PeriodBound<T> {
    Any,
    Only(T),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Fields `ivr_time_period_update` may change. Unset fields are not sent.
pub struct IvrTimePeriodChanges {
    pub name: Option<String>,
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
    pub start_minute: Option<u8>,
    pub end_minute: Option<u8>,
    pub start_weekday: Option<PeriodBound<Weekday>>,
    pub end_weekday: Option<PeriodBound<Weekday>>,
    pub start_month: Option<PeriodBound<u8>>,
    pub end_month: Option<PeriodBound<u8>>,
    pub start_day: Option<PeriodBound<u8>>,
    pub end_day: Option<PeriodBound<u8>>,
}

impl IvrTimePeriodChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validation::non_empty("name", name.as_str())?;
        }
        let clock = [
            ("start_hour", self.start_hour, 23),
            ("end_hour", self.end_hour, 23),
            ("start_minute", self.start_minute, 59),
            ("end_minute", self.end_minute, 59),
        ];
        for (field, value, max) in clock {
            if let Some(value) = value {
                validation::in_range(field, i64::from(value), 0, max)?;
            }
        }
        let calendar = [
            ("start_month", self.start_month, 12),
            ("end_month", self.end_month, 12),
            ("start_day", self.start_day, 31),
            ("end_day", self.end_day, 31),
        ];
        for (field, value, max) in calendar {
            if let Some(PeriodBound::Only(value)) = value {
                validation::in_range(field, i64::from(value), 1, max)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIvrTimePeriod {
    ivr_time_period_id: u64,
    changes: IvrTimePeriodChanges,
}

impl UpdateIvrTimePeriod {
    pub fn new(
        ivr_time_period_id: u64,
        changes: IvrTimePeriodChanges,
    ) -> Result<Self, ValidationError> {
        changes.validate()?;
        Ok(Self {
            ivr_time_period_id: validation::positive("ivr_time_period_id", ivr_time_period_id)?,
            changes,
        })
    }

    pub fn ivr_time_period_id(&self) -> u64 {
        self.ivr_time_period_id
    }

    pub fn changes(&self) -> &IvrTimePeriodChanges {
        &self.changes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePbxPool {
    name: String,
    comment: Option<String>,
}

impl CreatePbxPool {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("name", name)?,
            comment: None,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Reseller add-ons; unset features keep the server default.
pub struct ResellerFeatures {
    pub calling_cards: Option<bool>,
    pub call_shop: Option<bool>,
    pub sms_addon: Option<bool>,
    pub payment_gateways: Option<bool>,
    pub autodialer: Option<bool>,
    pub pbx_functions: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResellerGroup {
    name: String,
    description: Option<String>,
    features: ResellerFeatures,
}

impl CreateResellerGroup {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("name", name)?,
            description: None,
            features: ResellerFeatures::default(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_features(mut self, features: ResellerFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn features(&self) -> &ResellerFeatures {
        &self.features
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetResellerGroups;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResellerGroup {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringType {
    IncreasesMoreThan,
    DropsBelow,
}

impl MonitoringType {
    pub fn code(self) -> u8 {
        match self {
            Self::IncreasesMoreThan => 1,
            Self::DropsBelow => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Attach users to a monitoring (`monitoring_addon_activate`).
pub struct ActivateMonitoring {
    monitoring_id: u64,
    users: String,
    block: bool,
    email: bool,
    monitoring_type: MonitoringType,
}

impl ActivateMonitoring {
    pub fn new(
        monitoring_id: u64,
        user_ids: impl IntoIterator<Item = u64>,
        block: bool,
        email: bool,
        monitoring_type: MonitoringType,
    ) -> Result<Self, ValidationError> {
        let users = join(user_ids);
        if users.is_empty() {
            return Err(ValidationError::Empty { field: "users" });
        }
        Ok(Self {
            monitoring_id: validation::positive("monitoring_id", monitoring_id)?,
            users,
            block,
            email,
            monitoring_type,
        })
    }

    pub fn monitoring_id(&self) -> u64 {
        self.monitoring_id
    }

    /// Comma-separated user ids.
    pub fn users(&self) -> &str {
        &self.users
    }

    pub fn block(&self) -> bool {
        self.block
    }

    pub fn email(&self) -> bool {
        self.email
    }

    pub fn monitoring_type(&self) -> MonitoringType {
        self.monitoring_type
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoringActivation {
    pub monitoring_found: String,
    pub users: Vec<MonitoredUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitoredUser {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::trimmed")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Which users' assignments to include with pool numbers.
pub enum PoolUsers {
    #[default]
    All,
    Ids(Vec<u64>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Include pool numbers in `number_pools_get`, optionally paged.
pub struct PoolNumberListing {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub users: Option<PoolUsers>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetNumberPools {
    number_pool_id: Option<u64>,
    numbers: Option<PoolNumberListing>,
}

impl GetNumberPools {
    /// Every pool, without numbers.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn pool(mut self, number_pool_id: u64) -> Result<Self, ValidationError> {
        self.number_pool_id = Some(validation::positive("number_pool_id", number_pool_id)?);
        Ok(self)
    }

    pub fn show_numbers(mut self, listing: PoolNumberListing) -> Result<Self, ValidationError> {
        if let Some(limit) = listing.limit {
            validation::positive("number_limit_row_count", limit)?;
        }
        if listing.users == Some(PoolUsers::Ids(Vec::new())) {
            return Err(ValidationError::Empty { field: "user_ids" });
        }
        self.numbers = Some(listing);
        Ok(self)
    }

    pub fn number_pool_id(&self) -> Option<u64> {
        self.number_pool_id
    }

    pub fn numbers(&self) -> Option<&PoolNumberListing> {
        self.numbers.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberPool {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub owner_id: i64,
    /// Present only when numbers were requested and the pool has some.
    pub numbers: Option<Vec<PoolNumber>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolNumber {
    pub number: String,
    pub comment: String,
    pub users: Option<Vec<PoolNumberUser>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolNumberUser {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub username: String,
    /// `whitelist` or `blacklist`.
    #[serde(deserialize_with = "coerce::string")]
    pub list_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNumberPool {
    name: String,
    comment: Option<String>,
}

impl CreateNumberPool {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("name", name)?,
            comment: None,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPoolCreated {
    pub status: String,
    pub number_pool_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNumberPool {
    number_pool_id: u64,
    name: Option<String>,
    comment: Option<String>,
}

impl UpdateNumberPool {
    pub fn new(number_pool_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            number_pool_id: validation::positive("number_pool_id", number_pool_id)?,
            name: None,
            comment: None,
        })
    }

    pub fn rename(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(validation::non_empty("name", name)?);
        Ok(self)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn number_pool_id(&self) -> u64 {
        self.number_pool_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

id_request! {
    DeleteNumberPool { number_pool_id: "number_pool_id" }
}

/// Pool numbers may be patterns: letters, digits, `#` and `%`.
fn pool_numbers<S: Into<String>>(
    numbers: impl IntoIterator<Item = S>,
) -> Result<String, ValidationError> {
    let numbers = numbers
        .into_iter()
        .map(Into::into)
        .collect::<Vec<String>>()
        .join(",");
    if numbers.is_empty() {
        return Err(ValidationError::Empty { field: "numbers" });
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '#' | '%' | ',');
    if !numbers.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: "numbers",
            input: numbers,
        });
    }
    Ok(numbers)
}

fn join(ids: impl IntoIterator<Item = u64>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `number_pool_numbers_create`.
pub struct AddPoolNumbers {
    number_pool_id: u64,
    numbers: String,
}

impl AddPoolNumbers {
    pub fn new<S: Into<String>>(
        number_pool_id: u64,
        numbers: impl IntoIterator<Item = S>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            number_pool_id: validation::positive("number_pool_id", number_pool_id)?,
            numbers: pool_numbers(numbers)?,
        })
    }

    pub fn number_pool_id(&self) -> u64 {
        self.number_pool_id
    }

    /// Comma-separated numbers as sent.
    pub fn numbers(&self) -> &str {
        &self.numbers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolNumberSelection {
    All,
    /// By number id, by number, or both. At least one side is non-empty.
    Matching {
        number_ids: Option<String>,
        numbers: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `number_pool_numbers_delete`.
pub struct RemovePoolNumbers {
    number_pool_id: u64,
    selection: PoolNumberSelection,
}

impl RemovePoolNumbers {
    pub fn all(number_pool_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            number_pool_id: validation::positive("number_pool_id", number_pool_id)?,
            selection: PoolNumberSelection::All,
        })
    }

    pub fn matching<S: Into<String>>(
        number_pool_id: u64,
        number_ids: impl IntoIterator<Item = u64>,
        numbers: impl IntoIterator<Item = S>,
    ) -> Result<Self, ValidationError> {
        let number_pool_id = validation::positive("number_pool_id", number_pool_id)?;
        let number_ids = Some(join(number_ids)).filter(|ids| !ids.is_empty());
        let numbers: Vec<String> = numbers.into_iter().map(Into::into).collect();
        let numbers = if numbers.is_empty() {
            None
        } else {
            Some(pool_numbers(numbers)?)
        };
        if number_ids.is_none() && numbers.is_none() {
            return Err(ValidationError::MissingOneOf {
                fields: &["number_ids", "numbers", "delete_all"],
            });
        }
        Ok(Self {
            number_pool_id,
            selection: PoolNumberSelection::Matching {
                number_ids,
                numbers,
            },
        })
    }

    pub fn number_pool_id(&self) -> u64 {
        self.number_pool_id
    }

    pub fn selection(&self) -> &PoolNumberSelection {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_plan_slots_are_one_based() {
        let plan = UpdateIvrDialPlan::new(1)
            .unwrap()
            .time_period(1, Some(5))
            .unwrap()
            .time_period(3, None)
            .unwrap();
        assert_eq!(plan.time_periods(), &[Some(Some(5)), None, Some(None)]);
        assert!(matches!(
            UpdateIvrDialPlan::new(1).unwrap().time_period(4, Some(1)),
            Err(ValidationError::OutOfRange { field: "time_period", .. })
        ));
        assert!(UpdateIvrDialPlan::new(1).unwrap().time_period(2, Some(0)).is_err());
    }

    #[test]
    fn time_period_bounds_are_checked() {
        let changes = IvrTimePeriodChanges {
            end_minute: Some(60),
            ..Default::default()
        };
        assert!(matches!(
            UpdateIvrTimePeriod::new(2, changes),
            Err(ValidationError::OutOfRange { field: "end_minute", max: 59, .. })
        ));

        let changes = IvrTimePeriodChanges {
            start_month: Some(PeriodBound::Only(0)),
            ..Default::default()
        };
        assert!(UpdateIvrTimePeriod::new(2, changes).is_err());

        let changes = IvrTimePeriodChanges {
            start_month: Some(PeriodBound::Any),
            start_weekday: Some(PeriodBound::Only(Weekday::Sat)),
            ..Default::default()
        };
        assert!(UpdateIvrTimePeriod::new(2, changes).is_ok());
    }

    #[test]
    fn pool_numbers_allow_patterns_only() {
        let request = AddPoolNumbers::new(1, ["370%", "44#1"]).unwrap();
        assert_eq!(request.numbers(), "370%,44#1");
        assert!(matches!(
            AddPoolNumbers::new(1, ["37 0"]),
            Err(ValidationError::InvalidFormat { field: "numbers", .. })
        ));
        assert!(matches!(
            AddPoolNumbers::new(1, Vec::<String>::new()),
            Err(ValidationError::Empty { field: "numbers" })
        ));
    }

    #[test]
    fn removing_numbers_needs_a_selection() {
        assert!(matches!(
            RemovePoolNumbers::matching(1, Vec::new(), Vec::<String>::new()),
            Err(ValidationError::MissingOneOf { .. })
        ));
        let request = RemovePoolNumbers::matching(1, [4, 5], Vec::<String>::new()).unwrap();
        assert_eq!(
            request.selection(),
            &PoolNumberSelection::Matching {
                number_ids: Some("4,5".to_owned()),
                numbers: None,
            }
        );
    }

    #[test]
    fn monitoring_needs_users() {
        assert!(matches!(
            ActivateMonitoring::new(1, Vec::new(), true, false, MonitoringType::DropsBelow),
            Err(ValidationError::Empty { field: "users" })
        ));
        let request =
            ActivateMonitoring::new(1, [3, 9], true, false, MonitoringType::DropsBelow).unwrap();
        assert_eq!(request.users(), "3,9");
    }
}
