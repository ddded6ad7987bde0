//! Call records, active calls, queue logs and recordings.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::{ExtraParams, UnixTimestamp};
use crate::xml::coerce;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Whose calls `user_calls_get` lists.
pub enum CallOwner {
    /// `s_user`.
    User(String),
    /// `s_reseller`.
    Reseller(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filters for `user_calls_get`. Unset fields take MOR's defaults.
pub struct UserCallsOptions {
    /// Defaults to today 00:00 local time.
    pub period_start: Option<UnixTimestamp>,
    /// Defaults to today 23:59 local time.
    pub period_end: Option<UnixTimestamp>,
    /// `all`, `answered`, `no_answer`, `failed`, ... Defaults to `all`.
    pub call_type: Option<String>,
    pub device: Option<String>,
    pub provider: Option<String>,
    pub hgc: Option<String>,
    pub did: Option<String>,
    pub destination: Option<String>,
    /// Defaults to `time`.
    pub order_by: Option<String>,
    pub order_desc: bool,
    pub only_did: bool,
    pub uniqueid: Option<String>,
    pub callback_uniqueid: Option<String>,
    pub originator_codec_name: Option<String>,
    pub terminator_codec_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Call detail records of one user or reseller (`user_calls_get`).
pub struct GetUserCalls {
    owner: CallOwner,
    period_start: UnixTimestamp,
    period_end: UnixTimestamp,
    options: UserCallsOptions,
}

impl GetUserCalls {
    /// The reporting window is fixed here, so a request built before midnight
    /// still covers the day it was built on.
    pub fn new(owner: CallOwner, options: UserCallsOptions) -> Result<Self, ValidationError> {
        let owner = match owner {
            CallOwner::User(id) => CallOwner::User(validation::non_empty("s_user", id)?),
            CallOwner::Reseller(id) => {
                CallOwner::Reseller(validation::non_empty("s_reseller", id)?)
            }
        };
        // Only a window the caller gave in full is checked; a lone bound is
        // paired with today's default and sent as is.
        validation::ordered(
            "period_start",
            options.period_start,
            "period_end",
            options.period_end,
        )?;
        let period_start = options
            .period_start
            .unwrap_or_else(|| UnixTimestamp::today_at(0, 0));
        let period_end = options
            .period_end
            .unwrap_or_else(|| UnixTimestamp::today_at(23, 59));
        Ok(Self {
            owner,
            period_start,
            period_end,
            options,
        })
    }

    pub fn owner(&self) -> &CallOwner {
        &self.owner
    }

    pub fn period_start(&self) -> UnixTimestamp {
        self.period_start
    }

    pub fn period_end(&self) -> UnixTimestamp {
        self.period_end
    }

    pub fn options(&self) -> &UserCallsOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Answer of `user_calls_get`.
pub struct UserCalls {
    /// Every `calls/call` record, in document order.
    pub calls: Vec<Value>,
    /// The other `calls_stat` elements, such as totals and the queried period.
    pub summary: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Calls between users of the same installation (`local_calls_get`).
pub struct GetLocalCalls {
    user_id: u64,
    from: Option<UnixTimestamp>,
    till: Option<UnixTimestamp>,
}

impl GetLocalCalls {
    pub fn new(
        user_id: u64,
        from: Option<UnixTimestamp>,
        till: Option<UnixTimestamp>,
    ) -> Result<Self, ValidationError> {
        validation::ordered("from", from, "till", till)?;
        Ok(Self {
            user_id: validation::positive("s_user", user_id)?,
            from,
            till,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn from(&self) -> Option<UnixTimestamp> {
        self.from
    }

    pub fn till(&self) -> Option<UnixTimestamp> {
        self.till
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Calls in progress (`active_calls_get`).
pub struct GetActiveCalls {
    /// `s_status`, `s_user`, `s_server`, ...
    pub filters: ExtraParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Listen in on an active call from the caller's spy device (`spy_call`).
pub struct SpyCall {
    active_call_id: u64,
}

impl SpyCall {
    pub fn new(active_call_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            active_call_id: validation::positive("active_call_id", active_call_id)?,
        })
    }

    pub fn active_call_id(&self) -> u64 {
        self.active_call_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpyCallResponse {
    #[serde(rename = "success", deserialize_with = "coerce::string")]
    pub status: String,
    #[serde(deserialize_with = "coerce::string")]
    pub spy_device: String,
    #[serde(deserialize_with = "coerce::string")]
    pub channel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Queue events (`queue_log_get`).
pub struct GetQueueLog {
    pub from: Option<UnixTimestamp>,
    pub till: Option<UnixTimestamp>,
    pub filters: ExtraParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueueLogEntry {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub call_id: String,
    #[serde(deserialize_with = "coerce::string")]
    pub queue_name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub agent: String,
    #[serde(deserialize_with = "coerce::string")]
    pub event: String,
    #[serde(deserialize_with = "coerce::string")]
    pub data1: String,
    #[serde(deserialize_with = "coerce::string")]
    pub data2: String,
    #[serde(deserialize_with = "coerce::string")]
    pub data3: String,
    #[serde(deserialize_with = "coerce::string")]
    pub data4: String,
    #[serde(deserialize_with = "coerce::string")]
    pub data5: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// List call recordings (`recordings_get`).
pub struct GetRecordings {
    date_from: Option<UnixTimestamp>,
    date_till: Option<UnixTimestamp>,
    filters: ExtraParams,
}

impl GetRecordings {
    pub fn new(
        date_from: Option<UnixTimestamp>,
        date_till: Option<UnixTimestamp>,
        filters: ExtraParams,
    ) -> Result<Self, ValidationError> {
        validation::ordered("date_from", date_from, "date_till", date_till)?;
        Ok(Self {
            date_from,
            date_till,
            filters,
        })
    }

    pub fn date_from(&self) -> Option<UnixTimestamp> {
        self.date_from
    }

    pub fn date_till(&self) -> Option<UnixTimestamp> {
        self.date_till
    }

    pub fn filters(&self) -> &ExtraParams {
        &self.filters
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Recording {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub dst_user_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub src_device_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub dst_device_id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub date: String,
    #[serde(deserialize_with = "coerce::string")]
    pub comment: String,
    /// Seconds.
    #[serde(deserialize_with = "coerce::int")]
    pub duration: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub destination: String,
    /// Bytes.
    #[serde(deserialize_with = "coerce::int")]
    pub size: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub mp3_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Change a recording's comment (`recording_update`).
pub struct UpdateRecording {
    recording_id: u64,
    comment: Option<String>,
}

impl UpdateRecording {
    pub fn new(recording_id: u64, comment: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            recording_id: validation::positive("recording_id", recording_id)?,
            comment,
        })
    }

    pub fn recording_id(&self) -> u64 {
        self.recording_id
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteRecordingsOptions {
    pub recording_id: Option<u64>,
    pub user_id: Option<u64>,
    /// Only valid together with `user_id`.
    pub device_id: Option<u64>,
    pub date_from: Option<UnixTimestamp>,
    pub date_till: Option<UnixTimestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Delete one recording or every recording matching a filter (`recordings_delete`).
pub struct DeleteRecordings {
    options: DeleteRecordingsOptions,
}

impl DeleteRecordings {
    pub fn new(options: DeleteRecordingsOptions) -> Result<Self, ValidationError> {
        validation::ordered("date_from", options.date_from, "date_till", options.date_till)?;
        if options.device_id.is_some() && options.user_id.is_none() {
            return Err(ValidationError::Requires {
                field: "s_device_id",
                requires: "s_user_id",
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &DeleteRecordingsOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingsDeleted {
    pub status: String,
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_calls_default_to_today() {
        let request =
            GetUserCalls::new(CallOwner::User("12".into()), UserCallsOptions::default()).unwrap();
        assert!(request.period_end() > request.period_start());
        // 23:59 after midnight, give or take a DST shift.
        let span = request.period_end().value() - request.period_start().value();
        assert!((22 * 3600..=25 * 3600).contains(&span), "span was {span}");
    }

    #[test]
    fn user_calls_accept_a_lone_early_end() {
        let yesterday = UnixTimestamp::new(UnixTimestamp::today_at(0, 0).value() - 3600);
        let options = UserCallsOptions {
            period_end: Some(yesterday),
            ..UserCallsOptions::default()
        };
        let request = GetUserCalls::new(CallOwner::User("12".into()), options).unwrap();
        assert_eq!(request.period_end(), yesterday);
    }

    #[test]
    fn user_calls_reject_a_reversed_window() {
        let options = UserCallsOptions {
            period_start: Some(UnixTimestamp::new(2000)),
            period_end: Some(UnixTimestamp::new(1000)),
            ..UserCallsOptions::default()
        };
        assert!(matches!(
            GetUserCalls::new(CallOwner::User("12".into()), options),
            Err(ValidationError::RangeOrder {
                from: "period_start",
                till: "period_end"
            })
        ));
    }

    #[test]
    fn user_calls_need_an_owner() {
        assert!(matches!(
            GetUserCalls::new(CallOwner::Reseller(" ".into()), UserCallsOptions::default()),
            Err(ValidationError::Empty {
                field: "s_reseller"
            })
        ));
    }

    #[test]
    fn recordings_window_must_be_ordered() {
        assert!(matches!(
            GetRecordings::new(
                Some(UnixTimestamp::new(20)),
                Some(UnixTimestamp::new(10)),
                ExtraParams::new()
            ),
            Err(ValidationError::RangeOrder {
                from: "date_from",
                till: "date_till"
            })
        ));
        assert!(GetRecordings::new(Some(UnixTimestamp::new(20)), None, ExtraParams::new()).is_ok());
    }

    #[test]
    fn deleting_by_device_requires_user() {
        let options = DeleteRecordingsOptions {
            device_id: Some(4),
            ..DeleteRecordingsOptions::default()
        };
        assert!(matches!(
            DeleteRecordings::new(options),
            Err(ValidationError::Requires {
                field: "s_device_id",
                requires: "s_user_id"
            })
        ));
        let options = DeleteRecordingsOptions {
            user_id: Some(2),
            ..options
        };
        assert!(DeleteRecordings::new(options).is_ok());
    }

    #[test]
    fn local_calls_reject_zero_user() {
        assert!(GetLocalCalls::new(0, None, None).is_err());
    }
}
