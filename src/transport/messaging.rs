use serde::Deserialize;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, TOP_ERROR, float_at, section,
    status_success, text,
};
use crate::domain::{
    CreatePhonebookRecord, GetPhonebooks, GetUserSms, KnownApiError, Phonebook, SendSms,
    SmsMessage, SmsSent, SubscribeSmsService, UpdatePhonebook,
};
use crate::xml::{XmlNode, coerce};

const SMS_ERRORS: &[(&str, KnownApiError)] = &[
    ("There is no message or it is empty", KnownApiError::EmptyMessage),
    ("Wrong source", KnownApiError::WrongSource),
    ("Wrong destination", KnownApiError::WrongDestination),
    ("There is no such LCR", KnownApiError::NoSuchLcr),
    (
        "User is not subscribed to sms service",
        KnownApiError::NotSubscribedToSms,
    ),
    (
        "System owner does not have rate for this destination",
        KnownApiError::NoRateForDestination,
    ),
    ("Bad login", KnownApiError::BadLogin),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Insufficient balance", KnownApiError::InsufficientBalance),
    ("SMS Tariff was not found", KnownApiError::SmsTariffNotFound),
    ("SMS LCR was not found", KnownApiError::SmsLcrNotFound),
    ("User was not found", KnownApiError::UserNotFound),
    (
        "User is already subscribed to SMS service",
        KnownApiError::AlreadySubscribedToSms,
    ),
    ("API must have Secret Key", KnownApiError::ApiSecretKeyMissing),
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    (
        "Reseller does not have SMS Subscription",
        KnownApiError::ResellerWithoutSmsSubscription,
    ),
    ("API Requests are disabled", KnownApiError::ApiRequestsDisabled),
    // Misspelled on the server side.
    ("Sms Mesagges were not found", KnownApiError::SmsMessagesNotFound),
];

const PHONEBOOK_ERRORS: &[(&str, KnownApiError)] = &[
    ("No Phonebooks", KnownApiError::NoPhonebooks),
    ("User was not found", KnownApiError::UserNotFound),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Phonebook was not found", KnownApiError::PhonebookNotFound),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Phonebook was not saved", KnownApiError::PhonebookNotSaved),
    (
        "Speed Dial name must be provided",
        KnownApiError::SpeedDialNameMissing,
    ),
    (
        "Speed Dial should have at least two digits",
        KnownApiError::SpeedDialTooShort,
    ),
    (
        "Record number should have at least one digit",
        KnownApiError::RecordNumberTooShort,
    ),
    ("Speed Dial must be numeric", KnownApiError::SpeedDialNotNumeric),
    ("Record number must be numeric", KnownApiError::RecordNumberNotNumeric),
    ("Speed dial must be unique", KnownApiError::SpeedDialNotUnique),
];

// SMS endpoints check the login itself and need the password.
const fn sms_endpoint(path: &'static str) -> Endpoint {
    Endpoint {
        path,
        credentials: Credentials::UsernamePassword,
        error_at: TOP_ERROR,
        errors: SMS_ERRORS,
    }
}

const fn phonebook_endpoint(path: &'static str) -> Endpoint {
    Endpoint {
        path,
        credentials: Credentials::Username,
        error_at: TOP_ERROR,
        errors: PHONEBOOK_ERRORS,
    }
}

const SMS_SEND: Endpoint = sms_endpoint("/api/sms_send");
const USER_SMS_SERVICE_SUBSCRIBE: Endpoint = sms_endpoint("/api/user_sms_service_subscribe");
const USER_SMS_GET: Endpoint = sms_endpoint("/api/user_sms_get");

const PHONEBOOKS_GET: Endpoint = phonebook_endpoint("/api/phonebooks_get");
const PHONEBOOK_EDIT: Endpoint = phonebook_endpoint("/api/phonebook_edit");
const PHONEBOOK_RECORD_CREATE: Endpoint = phonebook_endpoint("/api/phonebook_record_create");

/// MOR expects the message percent-encoded before form encoding, and signs
/// the encoded form. Only ASCII alphanumerics and `-_.` pass through; a space
/// becomes `+` and every other byte is written as uppercase `%XX`.
fn encode_message(message: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut encoded = String::with_capacity(message.len());
    for byte in message.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                encoded.push(char::from(byte));
            }
            b' ' => encoded.push('+'),
            _ => {
                encoded.push('%');
                encoded.push(char::from(HEX[usize::from(byte >> 4)]));
                encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
            }
        }
    }
    encoded
}

impl Operation for SendSms {
    type Output = SmsSent;
    const ENDPOINT: &'static Endpoint = &SMS_SEND;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["lcr_id", "dst", "src", "message"]);
        form.set("lcr_id", self.lcr_id());
        form.set("dst", self.dst().raw());
        form.set("src", self.src());
        form.set("message", encode_message(self.message()));
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let field = |name: &'static str| ["response", "message", name];

        Ok(SmsSent {
            status: text(root, &["response", "status"]),
            message_id: text(root, &field("message_id")),
            sms_status_code_tip: text(root, &field("sms_status_code_tip")),
            price: float_at(root, &field("price")),
            currency: text(root, &field("currency")),
        })
    }
}

impl Operation for SubscribeSmsService {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &USER_SMS_SERVICE_SUBSCRIBE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id", "sms_tariff_id"]);
        form.set("user_id", self.user_id());
        form.set("sms_tariff_id", self.sms_tariff_id());
        form.set_opt("sms_lcr_id", self.sms_lcr_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SmsMessageList {
    #[serde(deserialize_with = "coerce::list")]
    sms_message: Vec<SmsMessage>,
}

impl Operation for GetUserSms {
    type Output = Vec<SmsMessage>;
    const ENDPOINT: &'static Endpoint = &USER_SMS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[
            "from",
            "till",
            "user_id",
            "status_code",
            "provider_id",
            "reseller_id",
            "destination",
            "number",
        ]);
        form.set_opt("from", self.from);
        form.set_opt("till", self.till);
        form.set_opt("user_id", self.user_id);
        form.set_opt("status_code", self.status_code);
        form.set_opt("provider_id", self.provider_id);
        form.set_opt("reseller_id", self.reseller_id);
        form.set_opt("destination", self.destination.as_deref());
        form.set_opt("number", self.number.as_deref());
        form.extend(&self.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<SmsMessageList>(root, &["sms_messages"])?.sms_message)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PhonebookList {
    #[serde(deserialize_with = "coerce::list")]
    phonebook: Vec<Phonebook>,
}

impl Operation for GetPhonebooks {
    type Output = Vec<Phonebook>;
    const ENDPOINT: &'static Endpoint = &PHONEBOOKS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id"]);
        form.set("user_id", self.user_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<PhonebookList>(root, &["phonebooks"])?.phonebook)
    }
}

impl Operation for UpdatePhonebook {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &PHONEBOOK_EDIT;

    fn encode(&self) -> Form {
        let changes = self.changes();
        let mut form = Form::new(&["phonebook_id"]);
        form.set("phonebook_id", self.phonebook_id());
        form.set_opt("name", changes.name.as_deref());
        form.set_opt("number", changes.number.as_deref());
        form.set_opt("speeddial", changes.speeddial.as_deref());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

impl Operation for CreatePhonebookRecord {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &PHONEBOOK_RECORD_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id", "number", "name", "speeddial"]);
        form.set("user_id", self.user_id());
        form.set("name", self.name());
        form.set("number", self.number());
        form.set("speeddial", self.speeddial());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, failure_code, pairs};
    use super::*;
    use crate::domain::RawPhoneNumber;

    #[test]
    fn sms_message_is_percent_encoded_before_signing() {
        let request = SendSms::new(
            2,
            RawPhoneNumber::new("37060000000").unwrap(),
            "MOR",
            "Hello world & more",
        )
        .unwrap();
        let form = request.encode();
        assert_eq!(form.get("message"), Some("Hello+world+%26+more"));
        assert_eq!(form.hash_keys("admin"), &["lcr_id", "dst", "src", "message"]);
    }

    #[test]
    fn sms_message_escapes_everything_but_unreserved_bytes() {
        assert_eq!(encode_message("a*b~c"), "a%2Ab%7Ec");
        assert_eq!(encode_message("x-y_z.0 9"), "x-y_z.0+9");
        assert_eq!(encode_message("ą!"), "%C4%85%21");
    }

    #[test]
    fn sms_result_reads_response_block() {
        let root = doc(
            "<page><response><status>ok</status><message>\
             <message_id>m-1</message_id><sms_status_code_tip>Sent</sms_status_code_tip>\
             <price>0.05</price><currency>EUR</currency></message></response></page>",
        );
        let sent = SendSms::decode(&root).unwrap();
        assert_eq!(sent.status, "ok");
        assert_eq!(sent.message_id, "m-1");
        assert_eq!(sent.price, 0.05);
        assert_eq!(sent.currency, "EUR");
    }

    #[test]
    fn misspelled_history_error_is_known() {
        assert_eq!(
            failure_code::<GetUserSms>("<page><error>Sms Mesagges were not found</error></page>"),
            Some(KnownApiError::SmsMessagesNotFound)
        );
    }

    #[test]
    fn sms_history_list_keeps_order() {
        let root = doc(
            "<page><sms_messages>\
             <sms_message><id>2</id><user_price>0.1</user_price></sms_message>\
             <sms_message><id>1</id><number>3706</number></sms_message>\
             </sms_messages></page>",
        );
        let messages = GetUserSms::decode(&root).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, 2);
        assert_eq!(messages[0].user_price, 0.1);
        assert_eq!(messages[1].number, "3706");
    }

    #[test]
    fn phonebook_record_hashes_in_declared_order() {
        let form = CreatePhonebookRecord::new(4, "Bob", "3706", "12")
            .unwrap()
            .encode();
        assert_eq!(form.hash_keys("admin"), &["user_id", "number", "name", "speeddial"]);
        assert_eq!(
            pairs(&form),
            vec![
                ("user_id", "4"),
                ("name", "Bob"),
                ("number", "3706"),
                ("speeddial", "12"),
            ]
        );
    }

    #[test]
    fn empty_phonebook_list() {
        let root = doc("<page><phonebooks></phonebooks></page>");
        assert!(GetPhonebooks::decode(&root).unwrap().is_empty());
    }
}
