use serde::Deserialize;
use serde_json::Value;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, int_at, section,
    section_value, status_success, text,
};
use crate::domain::{
    AssignDidDevice, AssignDidTrunkDevice, CloseDid, CreateDid, DeleteDid, DidCreated,
    DidRatesUpdated, GetDidRates, GetDidRatesDetails, GetDids, GetQuickForwardDids,
    KnownApiError, MakeDidFree, QuickForwardDid, StopDidSubscription, TerminateDid,
    UnassignDidDevice, UpdateDidDetails, UpdateDidRates, UpdateDidRatesDetails,
    UpdateQuickForwardDid,
};
use crate::xml::{XmlNode, coerce};

const DID_ERRORS: &[(&str, KnownApiError)] = &[
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Access Denied", KnownApiError::AccessDenied),
    ("DID was not found", KnownApiError::DidNotFound),
    ("Rates were not found", KnownApiError::RatesNotFound),
];

const QUICKFORWARD_ERRORS: &[(&str, KnownApiError)] = &[
    ("Quickforwards list is empty", KnownApiError::QuickforwardsEmpty),
    (
        "You are not authorized to use Quickforwards",
        KnownApiError::QuickforwardsNotAuthorized,
    ),
    ("User was not found", KnownApiError::UserNotFound),
    ("DID was not found", KnownApiError::DidNotFound),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const fn did_endpoint(path: &'static str) -> Endpoint {
    Endpoint {
        path,
        credentials: Credentials::Username,
        error_at: STATUS_ERROR,
        errors: DID_ERRORS,
    }
}

const DIDS_GET: Endpoint = Endpoint {
    error_at: TOP_ERROR,
    ..did_endpoint("/api/dids_get")
};
const DID_CREATE: Endpoint = did_endpoint("/api/did_create");
const DID_DEVICE_ASSIGN: Endpoint = did_endpoint("/api/did_device_assign");
const DID_TRUNK_DEVICE_ASSIGN: Endpoint = did_endpoint("/api/did_trunk_device_assign");
const DID_DEVICE_UNASSIGN: Endpoint = did_endpoint("/api/did_device_unassign");
const DID_DETAILS_UPDATE: Endpoint = did_endpoint("/api/did_details_update");
const DID_SUBSCRIPTION_STOP: Endpoint = did_endpoint("/api/did_subscription_stop");
const DID_TERMINATE: Endpoint = did_endpoint("/api/did_terminate");
const DID_MAKE_FREE: Endpoint = did_endpoint("/api/did_make_free");
const DID_CLOSE: Endpoint = did_endpoint("/api/did_close");
const DID_DELETE: Endpoint = did_endpoint("/api/did_delete");
const DID_RATES_UPDATE: Endpoint = did_endpoint("/api/did_rates_update");
const DID_RATES_GET: Endpoint = did_endpoint("/api/did_rates_get");
const DID_RATES_DETAILS_GET: Endpoint = did_endpoint("/api/did_rates_details_get");
const DID_RATES_DETAILS_UPDATE: Endpoint = did_endpoint("/api/did_rates_details_update");

const QUICKFORWARDS_DIDS_GET: Endpoint = Endpoint {
    path: "/api/quickforwards_dids_get",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: QUICKFORWARD_ERRORS,
};

const QUICKFORWARDS_DID_UPDATE: Endpoint = Endpoint {
    path: "/api/quickforwards_did_update",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: QUICKFORWARD_ERRORS,
};

#[derive(Deserialize, Default)]
#[serde(default)]
struct DidList {
    #[serde(deserialize_with = "coerce::list")]
    did: Vec<Value>,
}

impl Operation for GetDids {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &DIDS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["search_status"]);
        form.set_opt("search_status", self.search_status.as_deref());
        form.extend(&self.filters);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<DidList>(root, &["dids"])?.did)
    }
}

impl Operation for CreateDid {
    type Output = DidCreated;
    const ENDPOINT: &'static Endpoint = &DID_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["provider_id", "did"]);
        form.set("provider_id", self.provider_id());
        form.set("did", self.did());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(DidCreated {
            success: status_success(root),
            did_id: int_at(root, &["did_details", "id"]),
        })
    }
}

impl Operation for AssignDidDevice {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DID_DEVICE_ASSIGN;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_id", "did"]);
        form.set("device_id", self.device_id());
        form.set("did", self.did());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for AssignDidTrunkDevice {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DID_TRUNK_DEVICE_ASSIGN;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["device_id", "did"]);
        form.set("device_id", self.device_id());
        form.set("did", self.did());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

single_id_operation!(UnassignDidDevice, DID_DEVICE_UNASSIGN, "did" => did, String, status_success);

impl Operation for UpdateDidDetails {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DID_DETAILS_UPDATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["did_id"]);
        form.set("did_id", self.did_id());
        form.set_opt("active_from", options.active_from);
        form.set_opt("active_till", options.active_till);
        form.extend(&options.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

single_id_operation!(StopDidSubscription, DID_SUBSCRIPTION_STOP, "did_id" => did_id, String, status_success);
single_id_operation!(TerminateDid, DID_TERMINATE, "dids_id" => dids_id, String, status_success);
single_id_operation!(MakeDidFree, DID_MAKE_FREE, "dids_id" => dids_id, String, status_success);
single_id_operation!(CloseDid, DID_CLOSE, "dids_id" => dids_id, String, status_success);
single_id_operation!(DeleteDid, DID_DELETE, "dids_id" => dids_id, String, |root: &XmlNode| text(
    root,
    &["status", "status"]
));

impl Operation for UpdateDidRates {
    type Output = DidRatesUpdated;
    const ENDPOINT: &'static Endpoint = &DID_RATES_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["did"]);
        form.set("did", self.did());
        form.extend(self.rates());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(DidRatesUpdated {
            updated_rates: int_at(root, &["updated_rates"]),
            rates: did_rates(root)?,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DidRateList {
    #[serde(deserialize_with = "coerce::list")]
    rate: Vec<Value>,
}

fn did_rates(root: &XmlNode) -> Result<Vec<Value>, DecodeError> {
    Ok(section::<DidRateList>(root, &["rates"])?.rate)
}

impl Operation for GetDidRates {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &DID_RATES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["did"]);
        form.set("did", self.did());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        did_rates(root)
    }
}

single_id_operation!(GetDidRatesDetails, DID_RATES_DETAILS_GET, "did_id" => did_id, Value, |root: &XmlNode| {
    section_value(root, &["status", "did"])
});

impl Operation for UpdateDidRatesDetails {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &DID_RATES_DETAILS_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["did_id"]);
        form.set("did_id", self.did_id());
        form.extend(self.details());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct QuickForwardList {
    #[serde(deserialize_with = "coerce::list")]
    quick_forward_did: Vec<QuickForwardDid>,
}

impl Operation for GetQuickForwardDids {
    type Output = Vec<QuickForwardDid>;
    const ENDPOINT: &'static Endpoint = &QUICKFORWARDS_DIDS_GET;

    fn encode(&self) -> Form {
        Form::new(&[])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let list: QuickForwardList = section(root, &[])?;
        Ok(list.quick_forward_did)
    }
}

impl Operation for UpdateQuickForwardDid {
    type Output = QuickForwardDid;
    const ENDPOINT: &'static Endpoint = &QUICKFORWARDS_DID_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["did", "forward_to", "description"]);
        form.set("did", self.did());
        form.set_opt("forward_to", self.forward_number());
        form.set_opt("description", self.description());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        section(root, &["new_quickforward_did"])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{doc, failure_code, pairs};
    use super::*;
    use crate::domain::DidNumber;

    fn did() -> DidNumber {
        DidNumber::new("37052000000").unwrap()
    }

    #[test]
    fn dids_get_reads_top_level_error() {
        assert_eq!(
            failure_code::<GetDids>("<page><error>Access Denied</error></page>"),
            Some(KnownApiError::AccessDenied)
        );
        assert_eq!(
            failure_code::<CreateDid>(
                "<page><status><error>DID was not found</error></status></page>"
            ),
            Some(KnownApiError::DidNotFound)
        );
    }

    #[test]
    fn did_create_reads_new_id() {
        let form = CreateDid::new(2, did()).unwrap().encode();
        assert_eq!(pairs(&form), vec![("provider_id", "2"), ("did", "37052000000")]);

        let created = CreateDid::decode(&doc(
            "<page><status><success>DID created</success></status>\
             <did_details><id>310</id></did_details></page>",
        ))
        .unwrap();
        assert_eq!(created.did_id, 310);
        assert_eq!(created.success, "DID created");
    }

    #[test]
    fn single_id_operations_hash_their_id() {
        let form = TerminateDid::new(14).unwrap().encode();
        assert_eq!(form.hash_keys("admin"), &["dids_id"]);
        assert_eq!(pairs(&form), vec![("dids_id", "14")]);

        let status = DeleteDid::decode(&doc(
            "<page><status><status>DID deleted</status></status></page>",
        ))
        .unwrap();
        assert_eq!(status, "DID deleted");
    }

    #[test]
    fn rates_update_returns_count_and_document() {
        let result = UpdateDidRates::decode(&doc(
            "<page><updated_rates>2</updated_rates><rates><rate><id>1</id></rate></rates></page>",
        ))
        .unwrap();
        assert_eq!(result.updated_rates, 2);
        assert_eq!(result.rates, vec![json!({"id": "1"})]);
    }

    #[test]
    fn did_rates_are_listed() {
        let form = GetDidRates::new(DidNumber::new("37052000000").unwrap()).encode();
        assert_eq!(pairs(&form), vec![("did", "37052000000")]);

        let one = GetDidRates::decode(&doc("<page><rates><rate><id>1</id></rate></rates></page>"))
            .unwrap();
        assert_eq!(one, vec![json!({"id": "1"})]);

        let two = GetDidRates::decode(&doc(
            "<page><rates><rate><id>1</id></rate><rate><id>2</id></rate></rates></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"id": "1"}), json!({"id": "2"})]);
    }

    #[test]
    fn dids_are_listed() {
        let one = GetDids::decode(&doc(
            "<page><dids><did><did>37052000000</did></did></dids></page>",
        ))
        .unwrap();
        assert_eq!(one, vec![json!({"did": "37052000000"})]);

        let two = GetDids::decode(&doc(
            "<page><dids><did><id>1</id></did><did><id>2</id></did></dids></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"id": "1"}), json!({"id": "2"})]);
        assert!(GetDids::decode(&doc("<page/>")).unwrap().is_empty());
    }

    #[test]
    fn quick_forwards_list_root_children() {
        let dids = GetQuickForwardDids::decode(&doc(
            "<page><quick_forward_did><did>1</did><forward_to>2</forward_to></quick_forward_did>\
             <quick_forward_did><did>3</did></quick_forward_did></page>",
        ))
        .unwrap();
        assert_eq!(dids.len(), 2);
        assert_eq!(dids[0].forward_to, "2");
        assert_eq!(dids[1].did, "3");

        assert_eq!(
            failure_code::<GetQuickForwardDids>(
                "<page><error>Quickforwards list is empty</error></page>"
            ),
            Some(KnownApiError::QuickforwardsEmpty)
        );
    }

    #[test]
    fn quick_forward_update_hash_skips_unset_fields() {
        let form = UpdateQuickForwardDid::new(did())
            .with_description("office")
            .encode();
        assert_eq!(
            pairs(&form),
            vec![("did", "37052000000"), ("description", "office")]
        );
    }
}
