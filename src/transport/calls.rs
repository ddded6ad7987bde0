use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, int_at, section,
    section_value, status_success, text,
};
use crate::domain::{
    CallOwner, DeleteRecordings, GetActiveCalls, GetLocalCalls, GetQueueLog, GetRecordings,
    GetUserCalls, KnownApiError, QueueLogEntry, Recording, RecordingsDeleted, SpyCall,
    SpyCallResponse, UpdateRecording, UserCalls,
};
use crate::xml::{XmlNode, coerce};

const RECORDING_ERRORS: &[(&str, KnownApiError)] = &[
    ("API Requests are disabled", KnownApiError::ApiRequestsDisabled),
    ("GET Requests are disabled", KnownApiError::GetRequestsDisabled),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("No Recordings found", KnownApiError::NoRecordingsFound),
    ("Date from is incorrect format", KnownApiError::InvalidDateFrom),
    ("Date till is incorrect format", KnownApiError::InvalidDateTill),
    (
        "Date from is greater than date till",
        KnownApiError::DateFromAfterDateTill,
    ),
    ("Recording was not found", KnownApiError::RecordingNotFound),
    ("Recordings were not found", KnownApiError::RecordingsNotFound),
    ("s_user_id must be present", KnownApiError::UserIdMissing),
];

const USER_CALLS_GET: Endpoint = Endpoint {
    path: "/api/user_calls_get",
    credentials: Credentials::Username,
    error_at: STATUS_ERROR,
    errors: &[
        ("Incorrect hash", KnownApiError::IncorrectHash),
        ("User was not found", KnownApiError::UserNotFound),
        ("Access Denied", KnownApiError::AccessDenied),
    ],
};

const LOCAL_CALLS_GET: Endpoint = Endpoint {
    path: "/api/local_calls_get",
    credentials: Credentials::Username,
    error_at: STATUS_ERROR,
    errors: &[
        ("API Requests are disabled", KnownApiError::ApiRequestsDisabled),
        ("Access Denied", KnownApiError::AccessDenied),
        ("Incorrect hash", KnownApiError::IncorrectHash),
        ("User was not found", KnownApiError::UserNotFound),
    ],
};

const ACTIVE_CALLS_GET: Endpoint = Endpoint {
    path: "/api/active_calls_get",
    credentials: Credentials::Username,
    error_at: STATUS_ERROR,
    errors: &[
        ("Server was not found", KnownApiError::ServerNotFound),
        (
            "Status value must be Ringing or Answered",
            KnownApiError::InvalidCallStatus,
        ),
    ],
};

const SPY_CALL: Endpoint = Endpoint {
    path: "/api/spy_call",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[
        ("Chanspy is disabled", KnownApiError::ChanspyDisabled),
        ("Active call was not found", KnownApiError::ActiveCallNotFound),
        (
            "No Spy Device assigned. Select it under User edit preferences.",
            KnownApiError::NoSpyDevice,
        ),
        (
            "Cannot connect to Asterisk Server",
            KnownApiError::AsteriskUnavailable,
        ),
        (
            "Spy Device is registered on different Server than this Call. Spying on this Call is not possible.",
            KnownApiError::SpyDeviceOnDifferentServer,
        ),
        (
            "Unable to spy virtual device",
            KnownApiError::CannotSpyVirtualDevice,
        ),
        (
            "You are not authorized to use this functionality",
            KnownApiError::NotAuthorized,
        ),
        ("Access denied", KnownApiError::AccessDenied),
        ("Incorrect hash", KnownApiError::IncorrectHash),
    ],
};

const QUEUE_LOG_GET: Endpoint = Endpoint {
    path: "/api/queue_log_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: &[
        ("No data found", KnownApiError::NoDataFound),
        ("Access Denied", KnownApiError::AccessDenied),
        ("Incorrect hash", KnownApiError::IncorrectHash),
    ],
};

const RECORDINGS_GET: Endpoint = Endpoint {
    path: "/api/recordings_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: RECORDING_ERRORS,
};

const RECORDING_UPDATE: Endpoint = Endpoint {
    path: "/api/recording_update",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: RECORDING_ERRORS,
};

const RECORDINGS_DELETE: Endpoint = Endpoint {
    path: "/api/recordings_delete",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: RECORDING_ERRORS,
};

const USER_CALLS_HASH: &[&str] = &[
    "period_start",
    "period_end",
    "s_user",
    "s_call_type",
    "s_device",
    "s_provider",
    "s_hgc",
    "s_did",
    "s_destination",
    "order_by",
    "order_desc",
    "only_did",
    "s_uniqueid",
    "s_callback_uniqueid",
    "originator_codec_name",
    "terminator_codec_name",
];

#[derive(Deserialize, Default)]
#[serde(default)]
struct CallList {
    #[serde(deserialize_with = "coerce::list")]
    call: Vec<Value>,
}

impl Operation for GetUserCalls {
    type Output = UserCalls;
    const ENDPOINT: &'static Endpoint = &USER_CALLS_GET;

    /// Every hashed key is sent, with its default when unset, so the server
    /// recomputes the same digest.
    fn encode(&self) -> Form {
        let options = self.options();
        let or = |value: &Option<String>, default: &'static str| {
            value.clone().unwrap_or_else(|| default.to_owned())
        };

        let mut form = Form::new(USER_CALLS_HASH);
        form.set("period_start", self.period_start());
        form.set("period_end", self.period_end());
        match self.owner() {
            CallOwner::User(id) => form.set("s_user", id),
            CallOwner::Reseller(id) => {
                form.set("s_user", "");
                form.set("s_reseller", id);
            }
        }
        form.set("s_call_type", or(&options.call_type, "all"));
        form.set("s_device", or(&options.device, "all"));
        form.set("s_provider", or(&options.provider, "all"));
        form.set("s_hgc", or(&options.hgc, "all"));
        form.set("s_did", or(&options.did, "all"));
        form.set("s_destination", or(&options.destination, ""));
        form.set("order_by", or(&options.order_by, "time"));
        form.set_bool("order_desc", options.order_desc);
        form.set_bool("only_did", options.only_did);
        form.set("s_uniqueid", or(&options.uniqueid, ""));
        form.set("s_callback_uniqueid", or(&options.callback_uniqueid, ""));
        form.set(
            "originator_codec_name",
            or(&options.originator_codec_name, ""),
        );
        form.set(
            "terminator_codec_name",
            or(&options.terminator_codec_name, ""),
        );
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let calls = section::<CallList>(root, &["calls_stat", "calls"])?.call;
        let summary = match section_value(root, &["calls_stat"]) {
            Value::Object(mut fields) => {
                fields.remove("calls");
                fields
            }
            _ => Map::new(),
        };
        Ok(UserCalls { calls, summary })
    }
}

impl Operation for GetLocalCalls {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &LOCAL_CALLS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["from", "till", "s_user"]);
        form.set("s_user", self.user_id());
        form.set_opt("from", self.from());
        form.set_opt("till", self.till());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<CallList>(root, &["local_calls"])?.call)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ActiveCallList {
    #[serde(deserialize_with = "coerce::list")]
    active_call: Vec<Value>,
}

impl Operation for GetActiveCalls {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &ACTIVE_CALLS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u"]);
        form.extend(&self.filters);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<ActiveCallList>(root, &[])?.active_call)
    }
}

impl Operation for SpyCall {
    type Output = SpyCallResponse;
    const ENDPOINT: &'static Endpoint = &SPY_CALL;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u", "active_call_id"]);
        form.set("active_call_id", self.active_call_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        section(root, &["status"])
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct QueueList {
    #[serde(deserialize_with = "coerce::list")]
    queue: Vec<QueueLogEntry>,
}

impl Operation for GetQueueLog {
    type Output = Vec<QueueLogEntry>;
    const ENDPOINT: &'static Endpoint = &QUEUE_LOG_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_opt("from", self.from);
        form.set_opt("till", self.till);
        form.extend(&self.filters);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let list: QueueList = section(root, &["queues"])?;
        Ok(list.queue)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RecordingList {
    #[serde(deserialize_with = "coerce::list")]
    recording: Vec<Recording>,
}

impl Operation for GetRecordings {
    type Output = Vec<Recording>;
    const ENDPOINT: &'static Endpoint = &RECORDINGS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_opt("date_from", self.date_from());
        form.set_opt("date_till", self.date_till());
        form.extend(self.filters());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let list: RecordingList = section(root, &["status", "recordings"])?;
        Ok(list.recording)
    }
}

impl Operation for UpdateRecording {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &RECORDING_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["recording_id"]);
        form.set("recording_id", self.recording_id());
        form.set_opt("comment", self.comment());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for DeleteRecordings {
    type Output = RecordingsDeleted;
    const ENDPOINT: &'static Endpoint = &RECORDINGS_DELETE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&[
            "recording_id",
            "s_user_id",
            "s_device_id",
            "date_from",
            "date_till",
        ]);
        form.set_opt("recording_id", options.recording_id);
        form.set_opt("s_user_id", options.user_id);
        form.set_opt("s_device_id", options.device_id);
        form.set_opt("date_from", options.date_from);
        form.set_opt("date_till", options.date_till);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(RecordingsDeleted {
            status: text(root, &["status", "success"]),
            amount: int_at(root, &["status", "amount"]),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{doc, failure_code};
    use super::*;
    use crate::domain::{DeleteRecordingsOptions, ExtraParams, UnixTimestamp, UserCallsOptions};
    use crate::transport::sign;

    #[test]
    fn user_calls_send_every_hashed_key() {
        let options = UserCallsOptions {
            period_start: Some(UnixTimestamp::new(100)),
            period_end: Some(UnixTimestamp::new(200)),
            order_desc: true,
            ..UserCallsOptions::default()
        };
        let form = GetUserCalls::new(CallOwner::User("7".into()), options)
            .unwrap()
            .encode();
        for key in USER_CALLS_HASH {
            assert!(form.contains(key), "missing {key}");
        }
        assert_eq!(form.get("s_call_type"), Some("all"));
        assert_eq!(form.get("order_by"), Some("time"));
        assert_eq!(form.get("order_desc"), Some("1"));
        assert_eq!(form.get("only_did"), Some("0"));
        assert_eq!(
            sign(form.params(), form.hash_keys("admin"), "k"),
            sign(
                &[(
                    "x".to_owned(),
                    "1002007allallallallalltime10".to_owned()
                )],
                &["x"],
                "k"
            )
        );
    }

    #[test]
    fn reseller_calls_leave_user_blank() {
        let form = GetUserCalls::new(
            CallOwner::Reseller("3".into()),
            UserCallsOptions::default(),
        )
        .unwrap()
        .encode();
        assert_eq!(form.get("s_user"), Some(""));
        assert_eq!(form.get("s_reseller"), Some("3"));
    }

    #[test]
    fn user_calls_errors_live_in_status() {
        assert_eq!(
            failure_code::<GetUserCalls>(
                "<page><status><error>User was not found</error></status></page>"
            ),
            Some(KnownApiError::UserNotFound)
        );
        assert_eq!(
            failure_code::<GetUserCalls>("<page><error>User was not found</error></page>"),
            None
        );
    }

    #[test]
    fn user_calls_split_records_from_summary() {
        let one = GetUserCalls::decode(&doc(
            "<page><calls_stat><period><period_start>100</period_start></period>\
             <calls><call><id>1</id></call></calls>\
             <total_calls>1</total_calls></calls_stat></page>",
        ))
        .unwrap();
        assert_eq!(one.calls, vec![json!({"id": "1"})]);
        assert_eq!(one.summary.get("total_calls"), Some(&json!("1")));
        assert!(!one.summary.contains_key("calls"));

        let two = GetUserCalls::decode(&doc(
            "<page><calls_stat><calls><call><id>1</id></call><call><id>2</id></call>\
             </calls></calls_stat></page>",
        ))
        .unwrap();
        assert_eq!(two.calls, vec![json!({"id": "1"}), json!({"id": "2"})]);

        let none = GetUserCalls::decode(&doc("<page><calls_stat/></page>")).unwrap();
        assert!(none.calls.is_empty());
        assert!(none.summary.is_empty());
    }

    #[test]
    fn local_calls_are_listed() {
        let one = GetLocalCalls::decode(&doc(
            "<page><local_calls><call><src>101</src></call></local_calls></page>",
        ))
        .unwrap();
        assert_eq!(one, vec![json!({"src": "101"})]);

        let two = GetLocalCalls::decode(&doc(
            "<page><local_calls><call><src>101</src></call><call><src>102</src></call>\
             </local_calls></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"src": "101"}), json!({"src": "102"})]);
        assert!(GetLocalCalls::decode(&doc("<page><local_calls/></page>")).unwrap().is_empty());
    }

    #[test]
    fn active_calls_are_root_children() {
        let one = GetActiveCalls::decode(&doc(
            "<page><active_call><uniqueid>a1</uniqueid></active_call></page>",
        ))
        .unwrap();
        assert_eq!(one, vec![json!({"uniqueid": "a1"})]);

        let two = GetActiveCalls::decode(&doc(
            "<page><active_call><uniqueid>a1</uniqueid></active_call>\
             <active_call><uniqueid>a2</uniqueid></active_call></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"uniqueid": "a1"}), json!({"uniqueid": "a2"})]);
    }

    #[test]
    fn spy_call_reads_status_block() {
        let response = SpyCall::decode(&doc(
            "<page><status><success>Calling</success><spy_device>SIP/101</spy_device>\
             <channel>SIP/101-0001</channel></status></page>",
        ))
        .unwrap();
        assert_eq!(response.status, "Calling");
        assert_eq!(response.channel, "SIP/101-0001");
    }

    #[test]
    fn active_call_errors() {
        assert_eq!(
            failure_code::<GetActiveCalls>(
                "<page><status><error>Server was not found</error></status></page>"
            ),
            Some(KnownApiError::ServerNotFound)
        );
        let form = GetActiveCalls {
            filters: ExtraParams::new().with("s_status", "Answered"),
        }
        .encode();
        assert_eq!(form.get("s_status"), Some("Answered"));
    }

    #[test]
    fn queue_log_handles_one_entry() {
        let entries = GetQueueLog::decode(&doc(
            "<page><queues><queue><id>5</id><event>CONNECT</event></queue></queues></page>",
        ))
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 5);
        assert_eq!(entries[0].event, "CONNECT");
    }

    #[test]
    fn recordings_are_nested_in_status() {
        let recordings = GetRecordings::decode(&doc(
            "<page><status><recordings>\
             <recording><id>1</id><duration>30</duration></recording>\
             <recording><id>2</id><mp3_url>http://x/2.mp3</mp3_url></recording>\
             </recordings></status></page>",
        ))
        .unwrap();
        assert_eq!(recordings.len(), 2);
        assert_eq!(recordings[0].duration, 30);
        assert_eq!(recordings[1].mp3_url, "http://x/2.mp3");

        assert!(GetRecordings::decode(&doc("<page/>")).unwrap().is_empty());
    }

    #[test]
    fn recordings_delete_result() {
        let options = DeleteRecordingsOptions {
            user_id: Some(2),
            ..DeleteRecordingsOptions::default()
        };
        let form = DeleteRecordings::new(options).unwrap().encode();
        assert_eq!(form.get("s_user_id"), Some("2"));
        assert!(!form.contains("recording_id"));

        let result = DeleteRecordings::decode(&doc(
            "<page><status><success>Recordings deleted</success><amount>4</amount></status></page>",
        ))
        .unwrap();
        assert_eq!(result.amount, 4);
        assert_eq!(
            failure_code::<DeleteRecordings>(
                "<page><error>Recordings were not found</error></page>"
            ),
            Some(KnownApiError::RecordingsNotFound)
        );
    }
}
