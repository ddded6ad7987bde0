//! Transport layer: endpoint contracts, form encoding and response decoding.
//!
//! Every MOR endpoint is described by one [`Endpoint`] constant (path,
//! credential policy, where the error element lives, and the closed set of
//! error strings it may return) and one request type implementing
//! [`Operation`].

/// [`Operation`] for a request that sends one id, hashed, and nothing else.
macro_rules! single_id_operation {
    ($request:ty, $endpoint:ident, $key:literal => $accessor:ident, $output:ty, $decode:expr) => {
        impl Operation for $request {
            type Output = $output;
            const ENDPOINT: &'static Endpoint = &$endpoint;

            fn encode(&self) -> Form {
                let mut form = Form::new(&[$key]);
                form.set($key, self.$accessor());
                form
            }

            fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
                Ok(($decode)(root))
            }
        }
    };
}

mod account;
mod billing;
mod calls;
mod devices;
mod dids;
mod messaging;
mod pbx;
mod routing;
mod sign;
mod system;
mod tariffs;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{ExtraParams, KnownApiError};
use crate::xml::XmlNode;

pub use sign::sign;

/// Error element at the document root (`<page><error>..</error></page>`).
pub const TOP_ERROR: &[&str] = &["error"];
/// Error element nested in the status block (`<status><error>..</error></status>`).
pub const STATUS_ERROR: &[&str] = &["status", "error"];

const STATUS_SUCCESS: &[&str] = &["status", "success"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which configured credentials the dispatcher adds to a request.
pub enum Credentials {
    /// `u` only.
    Username,
    /// `u` and `p`.
    UsernamePassword,
}

#[derive(Debug)]
/// Wire contract of one API path.
pub struct Endpoint {
    pub path: &'static str,
    pub credentials: Credentials,
    pub error_at: &'static [&'static str],
    pub errors: &'static [(&'static str, KnownApiError)],
}

impl Endpoint {
    /// Match an error string exactly against this endpoint's vocabulary.
    pub fn classify(&self, error: &str) -> Option<KnownApiError> {
        self.errors
            .iter()
            .find(|(text, _)| *text == error)
            .map(|(_, code)| *code)
    }

    /// Extract the error element, if the document carries one.
    ///
    /// `message` is read from a `message` child of the error element or, failing
    /// that, from a `message` sibling.
    pub fn failure(&self, root: &XmlNode) -> Option<RemoteFailure> {
        let node = root.find(self.error_at)?;
        let parent = &self.error_at[..self.error_at.len().saturating_sub(1)];
        let message = node
            .child("message")
            .or_else(|| root.find(parent).and_then(|parent| parent.child("message")))
            .map(|message| message.text.clone())
            .filter(|message| !message.is_empty());

        Some(RemoteFailure {
            error: node.text.clone(),
            message,
            code: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Failure reported inside an otherwise well-formed response.
pub struct RemoteFailure {
    pub error: String,
    pub message: Option<String>,
    /// Set when the failure is recognized by its shape rather than its text.
    pub code: Option<KnownApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered form parameters plus the hash spec they are signed with.
pub struct Form {
    params: Vec<(String, String)>,
    hash_keys: &'static [&'static str],
    admin_hash_keys: Option<&'static [&'static str]>,
    path_segment: Option<String>,
}

impl Form {
    pub fn new(hash_keys: &'static [&'static str]) -> Self {
        Self {
            params: Vec::new(),
            hash_keys,
            admin_hash_keys: None,
            path_segment: None,
        }
    }

    /// Hash spec used instead when the configured username is `admin`.
    pub fn with_admin_hash_keys(mut self, hash_keys: &'static [&'static str]) -> Self {
        self.admin_hash_keys = Some(hash_keys);
        self
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn set(&mut self, key: &str, value: impl fmt::Display) {
        let value = value.to_string();
        match self.params.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key.to_owned(), value)),
        }
    }

    pub fn set_opt<V: fmt::Display>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// `1` or `0`.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, if value { "1" } else { "0" });
    }

    pub fn set_opt_bool(&mut self, key: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.set_bool(key, value);
        }
    }

    /// Sends `1` when `value` is true and omits the key otherwise.
    pub fn set_true(&mut self, key: &str, value: bool) {
        if value {
            self.set(key, "1");
        }
    }

    pub fn extend(&mut self, extras: &ExtraParams) {
        for (key, value) in extras.iter() {
            self.set(key, value);
        }
    }

    /// Append an escaped path segment to the endpoint path.
    pub fn set_path_segment(&mut self, segment: impl Into<String>) {
        self.path_segment = Some(segment.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn hash_keys(&self, username: &str) -> &'static [&'static str] {
        match self.admin_hash_keys {
            Some(hash_keys) if username == "admin" => hash_keys,
            _ => self.hash_keys,
        }
    }

    pub fn path_segment(&self) -> Option<&str> {
        self.path_segment.as_deref()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn into_params(self) -> Vec<(String, String)> {
        self.params
    }
}

#[derive(Debug, thiserror::Error)]
/// A success document did not have the shape its endpoint promises.
pub enum DecodeError {
    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing <{0}>")]
    MissingElement(&'static str),

    #[error("invalid {field} in response: {value}")]
    InvalidFormat { field: &'static str, value: String },
}

/// One MOR API call: request encoding, endpoint contract and result decoding.
///
/// Implemented by every request type in [`crate::domain`]; pass any of them to
/// [`crate::KolmisoftClient::execute`] or [`crate::KolmisoftClient::execute_raw`].
pub trait Operation: Send + Sync {
    /// Typed result of a successful call.
    type Output;

    #[doc(hidden)]
    const ENDPOINT: &'static Endpoint;

    #[doc(hidden)]
    fn encode(&self) -> Form;

    #[doc(hidden)]
    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError>;

    #[doc(hidden)]
    fn failure(root: &XmlNode) -> Option<RemoteFailure> {
        Self::ENDPOINT.failure(root)
    }

    #[doc(hidden)]
    fn classify(error: &str) -> Option<KnownApiError> {
        Self::ENDPOINT.classify(error)
    }
}

/// Deserialize the element at `path`; a missing element reads as empty.
pub(crate) fn section<T: DeserializeOwned>(
    root: &XmlNode,
    path: &[&str],
) -> Result<T, DecodeError> {
    Ok(serde_json::from_value(section_value(root, path))?)
}

/// Generic form of the element at `path`; a missing element reads as `{}`.
pub(crate) fn section_value(root: &XmlNode, path: &[&str]) -> Value {
    root.find(path)
        .map(XmlNode::to_value)
        .unwrap_or_else(|| Value::Object(Map::new()))
}

pub(crate) fn required<'a>(
    root: &'a XmlNode,
    path: &[&'static str],
) -> Result<&'a XmlNode, DecodeError> {
    root.find(path)
        .ok_or(DecodeError::MissingElement(path.last().copied().unwrap_or("")))
}

/// Text of the element at `path`; a missing element reads as empty.
pub(crate) fn text(root: &XmlNode, path: &[&str]) -> String {
    root.find(path)
        .map(|node| node.text.clone())
        .unwrap_or_default()
}

/// `status/success`, the acknowledgement most write endpoints return.
pub(crate) fn status_success(root: &XmlNode) -> String {
    text(root, STATUS_SUCCESS)
}

pub(crate) fn float_at(root: &XmlNode, path: &[&str]) -> f64 {
    crate::xml::coerce::parse_float(&text(root, path))
}

pub(crate) fn int_at(root: &XmlNode, path: &[&str]) -> i64 {
    crate::xml::coerce::parse_int(&text(root, path))
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::xml::{self, XmlNode};

    use super::{Form, Operation};

    pub(crate) fn doc(body: &str) -> XmlNode {
        xml::parse(body).unwrap()
    }

    pub(crate) fn pairs(form: &Form) -> Vec<(&str, &str)> {
        form.params()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    /// Same classification path the client uses for a failed document.
    pub(crate) fn failure_code<O: Operation>(body: &str) -> Option<crate::domain::KnownApiError> {
        let root = doc(body);
        O::failure(&root).and_then(|failure| O::classify(&failure.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    const SAMPLE: Endpoint = Endpoint {
        path: "/api/sample",
        credentials: Credentials::Username,
        error_at: STATUS_ERROR,
        errors: &[
            ("Incorrect hash", KnownApiError::IncorrectHash),
            ("Access Denied", KnownApiError::AccessDenied),
        ],
    };

    #[test]
    fn form_set_replaces_in_place() {
        let mut form = Form::new(&["a"]);
        form.set("a", 1);
        form.set("b", "x");
        form.set("a", 2);
        form.set_opt::<u64>("c", None);
        form.set_true("d", false);
        form.set_true("e", true);
        assert_eq!(
            form.params(),
            &[
                ("a".to_owned(), "2".to_owned()),
                ("b".to_owned(), "x".to_owned()),
                ("e".to_owned(), "1".to_owned()),
            ]
        );
    }

    #[test]
    fn extras_are_appended_and_override() {
        let mut form = Form::new(&[]);
        form.set("from", 10);
        form.extend(&ExtraParams::new().with("from", 20).with("s_user", 3));
        assert_eq!(form.get("from"), Some("20"));
        assert_eq!(form.get("s_user"), Some("3"));
    }

    #[test]
    fn failure_reads_nested_error_and_message() {
        let root = xml::parse(
            "<page><status><error>Access Denied</error><message>no rights</message></status></page>",
        )
        .unwrap();
        let failure = SAMPLE.failure(&root).unwrap();
        assert_eq!(failure.error, "Access Denied");
        assert_eq!(failure.message.as_deref(), Some("no rights"));
        assert_eq!(
            SAMPLE.classify(&failure.error),
            Some(KnownApiError::AccessDenied)
        );
    }

    #[test]
    fn failure_ignores_errors_outside_declared_location() {
        let root = xml::parse("<page><error>Access Denied</error></page>").unwrap();
        assert_eq!(SAMPLE.failure(&root), None);
    }

    #[test]
    fn unknown_strings_are_not_classified() {
        assert_eq!(SAMPLE.classify("Something new"), None);
        assert_eq!(SAMPLE.classify("access denied"), None);
    }

    #[test]
    fn missing_section_reads_as_empty_object() {
        let root = xml::parse("<page/>").unwrap();
        assert_eq!(section_value(&root, &["status"]), Value::Object(Map::new()));
        assert!(matches!(
            required(&root, &["status", "device"]),
            Err(DecodeError::MissingElement("device"))
        ));
    }
}
