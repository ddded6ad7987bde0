use serde::Deserialize;
use serde_json::Value;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, int_at,
    section, section_value, status_success, text,
};
use crate::domain::{
    AddCli, CreateDevice, CreateDeviceRule, DeleteCli, DeleteDevice, DeleteDeviceRule,
    DeviceCreated, DeviceRef, GetCliInfo, GetDeviceCallFlow, GetDeviceClis, GetDeviceDetails,
    GetDeviceRules, GetDevices, KnownApiError, UpdateDevice, UpdateDeviceCallFlow,
};
use crate::xml::{XmlNode, coerce};

const DEVICE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Device was not found", KnownApiError::DeviceNotFound),
    ("CLIs were not found", KnownApiError::ClisNotFound),
    ("Access Denied", KnownApiError::AccessDenied),
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("User was not found", KnownApiError::UserNotFound),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Device rule was not found", KnownApiError::DeviceRuleNotFound),
    ("Add failed", KnownApiError::AddFailed),
    ("name cannot be blank", KnownApiError::NameBlank),
    (
        "both add and cut cannot be blank",
        KnownApiError::AddAndCutBlank,
    ),
];

const fn device_endpoint(path: &'static str) -> Endpoint {
    Endpoint {
        path,
        credentials: Credentials::Username,
        error_at: STATUS_ERROR,
        errors: DEVICE_ERRORS,
    }
}

const DEVICE_CREATE: Endpoint = Endpoint {
    error_at: TOP_ERROR,
    ..device_endpoint("/api/device_create")
};
const DEVICE_UPDATE: Endpoint = device_endpoint("/api/device_update");
const DEVICE_DELETE: Endpoint = device_endpoint("/api/device_delete");
const DEVICES_GET: Endpoint = device_endpoint("/api/devices_get");
const DEVICE_DETAILS_GET: Endpoint = device_endpoint("/api/device_details_get");
const DEVICE_CALLFLOW_GET: Endpoint = device_endpoint("/api/device_callflow_get");
const DEVICE_CALLFLOW_UPDATE: Endpoint = device_endpoint("/api/device_callflow_update");
const CLI_INFO_GET: Endpoint = device_endpoint("/api/cli_info_get");
const CLI_DELETE: Endpoint = device_endpoint("/api/cli_delete");
const CLI_ADD: Endpoint = device_endpoint("/api/cli_add");
const DEVICE_CLIS_GET: Endpoint = device_endpoint("/api/device_clis_get");
const DEVICE_RULES_GET: Endpoint = device_endpoint("/api/device_rules_get");
const DEVICE_RULE_DELETE: Endpoint = device_endpoint("/api/device_rule_delete");
const DEVICE_RULE_CREATE: Endpoint = device_endpoint("/api/device_rule_create");

impl Operation for CreateDevice {
    type Output = DeviceCreated;
    const ENDPOINT: &'static Endpoint = &DEVICE_CREATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&[
            "user_id",
            "description",
            "pin",
            "type",
            "devicegroup_id",
            "caller_id",
        ]);
        form.set("user_id", self.user_id());
        form.set_opt("description", options.description.as_deref());
        form.set_opt("pin", options.pin.as_deref());
        form.set_opt("type", options.device_type.as_deref());
        form.set_opt("devicegroup_id", options.devicegroup_id);
        form.set_opt("caller_id", options.caller_id.as_deref());
        form.extend(&options.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(DeviceCreated {
            status: text(root, &["status"]),
            id: int_at(root, &["id"]),
            username: text(root, &["username"]),
            password: text(root, &["password"]),
        })
    }
}

impl Operation for UpdateDevice {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DEVICE_UPDATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["device", "authentication", "username", "host", "port"]);
        form.set("device", self.device_id());
        form.set_opt("authentication", options.authentication.as_deref());
        form.set_opt("username", options.username.as_deref());
        form.set_opt("host", options.host.as_deref());
        form.set_opt("port", options.port);
        form.extend(&options.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for DeleteDevice {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DEVICE_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device"]);
        form.set("device", self.device_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DeviceList {
    #[serde(deserialize_with = "coerce::list")]
    device: Vec<Value>,
}

impl Operation for GetDevices {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &DEVICES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id"]);
        form.set("user_id", self.user_id());
        form.set_bool("show_hidden_devices", self.show_hidden());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<DeviceList>(root, &["devices"])?.device)
    }
}

impl Operation for GetDeviceDetails {
    type Output = Value;
    const ENDPOINT: &'static Endpoint = &DEVICE_DETAILS_GET;

    fn encode(&self) -> Form {
        match self.device() {
            DeviceRef::Id(id) => {
                let mut form = Form::new(&["device_id"]);
                form.set("device_id", id);
                form
            }
            DeviceRef::Username(username) => {
                let mut form = Form::new(&["device_u"]);
                form.set("device_u", username);
                form
            }
        }
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(root.to_value())
    }
}

impl Operation for GetDeviceCallFlow {
    type Output = Value;
    const ENDPOINT: &'static Endpoint = &DEVICE_CALLFLOW_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_id"]);
        form.set("device_id", self.device_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(root.to_value())
    }
}

impl Operation for UpdateDeviceCallFlow {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DEVICE_CALLFLOW_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_id", "state", "callflow_action"]);
        form.set("device_id", self.device_id());
        form.set("state", self.state());
        form.set("callflow_action", self.action());
        form.extend(self.extra());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

impl Operation for GetCliInfo {
    type Output = Value;
    const ENDPOINT: &'static Endpoint = &CLI_INFO_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set("cli", self.cli());
        form.set_opt("domain", self.domain());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section_value(root, &["cli"]))
    }
}

impl Operation for DeleteCli {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &CLI_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["cli_number"]);
        form.set("cli_number", self.cli_number());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

impl Operation for AddCli {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &CLI_ADD;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["device_id", "cli_number"]);
        form.set("device_id", self.device_id());
        form.set_opt("cli_number", options.cli_number.as_deref());
        form.set_opt("cli_domain", options.cli_domain.as_deref());
        form.extend(&options.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CliList {
    #[serde(deserialize_with = "coerce::list")]
    cli: Vec<Value>,
}

impl Operation for GetDeviceClis {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &DEVICE_CLIS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_opt("devices_id", self.device_id);
        form.set_opt("users_id", self.user_id);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<CliList>(root, &["status"])?.cli)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DeviceRuleList {
    #[serde(deserialize_with = "coerce::list")]
    rule: Vec<Value>,
}

impl Operation for GetDeviceRules {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &DEVICE_RULES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_id"]);
        form.set("device_id", self.device_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<DeviceRuleList>(root, &["status", "device_rules"])?.rule)
    }
}

impl Operation for DeleteDeviceRule {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DEVICE_RULE_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_rule_id"]);
        form.set("device_rule_id", self.rule_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for CreateDeviceRule {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DEVICE_RULE_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_id", "name", "cut", "add"]);
        form.set("device_id", self.device_id());
        form.set("name", self.name());
        form.set_opt("cut", self.cut());
        form.set_opt("add", self.add());
        form.extend(self.extra());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{doc, failure_code, pairs};
    use super::*;
    use crate::domain::{DeviceOptions, ExtraParams};

    #[test]
    fn device_create_errors_are_top_level() {
        assert_eq!(
            failure_code::<CreateDevice>("<page><error>User was not found</error></page>"),
            Some(KnownApiError::UserNotFound)
        );
        assert_eq!(
            failure_code::<CreateDevice>(
                "<page><status><error>User was not found</error></status></page>"
            ),
            None
        );
    }

    #[test]
    fn devices_get_errors_are_in_status() {
        assert_eq!(
            failure_code::<GetDevices>(
                "<page><status><error>Device was not found</error></status></page>"
            ),
            Some(KnownApiError::DeviceNotFound)
        );
    }

    #[test]
    fn device_create_encodes_type_and_extras() {
        let options = DeviceOptions {
            device_type: Some("SIP".into()),
            description: Some("desk phone".into()),
            extra: ExtraParams::new().with("callerid_number", "3700"),
            ..DeviceOptions::default()
        };
        let form = CreateDevice::new(8, options).unwrap().encode();
        assert_eq!(
            pairs(&form),
            vec![
                ("user_id", "8"),
                ("description", "desk phone"),
                ("type", "SIP"),
                ("callerid_number", "3700"),
            ]
        );

        let created = CreateDevice::decode(&doc(
            "<page><status>ok</status><id>55</id><username>1055</username>\
             <password>pw</password></page>",
        ))
        .unwrap();
        assert_eq!(created.id, 55);
        assert_eq!(created.username, "1055");
    }

    #[test]
    fn device_details_hash_follows_reference() {
        let by_id = GetDeviceDetails::new(DeviceRef::Id(4)).unwrap().encode();
        assert_eq!(by_id.hash_keys("admin"), &["device_id"]);
        let by_name = GetDeviceDetails::new(DeviceRef::Username("1004".into()))
            .unwrap()
            .encode();
        assert_eq!(by_name.hash_keys("admin"), &["device_u"]);
        assert_eq!(by_name.get("device_u"), Some("1004"));
    }

    #[test]
    fn devices_are_listed_in_order() {
        let form = GetDevices::new(3).unwrap().hide_hidden().encode();
        assert_eq!(form.get("show_hidden_devices"), Some("0"));

        let devices = GetDevices::decode(&doc(
            "<page><devices><device><id>1</id></device><device><id>2</id></device></devices></page>",
        ))
        .unwrap();
        assert_eq!(devices, vec![json!({"id": "1"}), json!({"id": "2"})]);
    }

    #[test]
    fn single_device_is_still_a_list() {
        let devices =
            GetDevices::decode(&doc("<page><devices><device><id>1</id></device></devices></page>"))
                .unwrap();
        assert_eq!(devices, vec![json!({"id": "1"})]);

        assert!(GetDevices::decode(&doc("<page><devices/></page>")).unwrap().is_empty());
    }

    #[test]
    fn device_clis_are_listed() {
        let one = GetDeviceClis::decode(&doc(
            "<page><status><cli><id>4</id><cli>370600</cli></cli></status></page>",
        ))
        .unwrap();
        assert_eq!(one, vec![json!({"id": "4", "cli": "370600"})]);

        let two = GetDeviceClis::decode(&doc(
            "<page><status><cli><id>4</id></cli><cli><id>5</id></cli></status></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"id": "4"}), json!({"id": "5"})]);
    }

    #[test]
    fn rule_errors_are_classified() {
        assert_eq!(
            failure_code::<CreateDeviceRule>(
                "<page><status><error>both add and cut cannot be blank</error></status></page>"
            ),
            Some(KnownApiError::AddAndCutBlank)
        );
        let rules = GetDeviceRules::decode(&doc(
            "<page><status><device_rules><rule><name>a</name></rule></device_rules></status></page>",
        ))
        .unwrap();
        assert_eq!(rules, vec![json!({"name": "a"})]);
    }

    #[test]
    fn device_rules_keep_every_rule() {
        let rules = GetDeviceRules::decode(&doc(
            "<page><status><device_rules><rule><name>a</name></rule>\
             <rule><name>b</name></rule></device_rules></status></page>",
        ))
        .unwrap();
        assert_eq!(rules, vec![json!({"name": "a"}), json!({"name": "b"})]);
    }
}
