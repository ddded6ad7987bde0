use serde::Deserialize;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, int_at,
    required, section, status_success,
};
use crate::domain::{
    AddLcrProvider, CopyLocationRule, CreateLcr, CreateLocationRule, CreateProvider,
    CreateProviderRule, DeleteLcr, DeleteLocationRule, DeleteProvider, DeleteProviderRule,
    GetLcrs, GetLocationRule, GetLocationRules, GetProviderRules, GetProviders, KnownApiError, Lcr,
    LcrProvider, LocationRule, LocationRuleCreated, LocationRuleOptions, LocationSelector,
    NetworkType, Provider, ProviderCreated, ProviderOptions, ProviderRule, RemoveLcrProvider,
    RuleLocation, UpdateLcr, UpdateLocationRule, UpdateProvider,
};
use crate::xml::{XmlNode, coerce};

const LCR_ERRORS: &[(&str, KnownApiError)] = &[
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("Access Denied", KnownApiError::AccessDenied),
    ("No LCRs found", KnownApiError::NoLcrsFound),
    ("LCR was not found", KnownApiError::LcrNotFound),
    ("Provider was not found", KnownApiError::ProviderNotFound),
    ("Provider not found in LCR", KnownApiError::ProviderNotInLcr),
    ("Cannot delete provider", KnownApiError::CannotDeleteProvider),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const PROVIDER_ERRORS: &[(&str, KnownApiError)] = &[
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Provider was not found", KnownApiError::ProviderNotFound),
    ("Provider name must be unique", KnownApiError::ProviderNameNotUnique),
    ("Provider name cannot be empty", KnownApiError::ProviderNameEmpty),
    ("Invalid tariff", KnownApiError::InvalidTariff),
    ("Cannot delete provider", KnownApiError::CannotDeleteProvider),
];

const PROVIDER_RULE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Provider was not found", KnownApiError::ProviderNotFound),
    ("Provider has no rules", KnownApiError::ProviderHasNoRules),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Provider rule was not found", KnownApiError::ProviderRuleNotFound),
    ("Add failed", KnownApiError::AddFailed),
    ("name cannot be blank", KnownApiError::NameBlank),
    ("both add and cut cannot be blank", KnownApiError::AddAndCutBlank),
];

const LOCATION_RULE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Rule must be unique", KnownApiError::RuleNotUnique),
    ("Rule must have name", KnownApiError::RuleNameMissing),
    ("Cannot assign device", KnownApiError::CannotAssignDevice),
    ("Cut and Add cannot be empty", KnownApiError::CutAndAddEmpty),
    ("Device not found", KnownApiError::DeviceNotFound),
    ("Location error", KnownApiError::LocationError),
    ("Location not found", KnownApiError::LocationNotFound),
    ("LCR was not found", KnownApiError::LcrNotFound),
    ("Cannot assign lcr", KnownApiError::CannotAssignLcr),
    ("Cannot assign did", KnownApiError::CannotAssignDid),
    ("DID was not found", KnownApiError::DidNotFound),
    ("Tariff was not found", KnownApiError::TariffNotFound),
    ("Location Group was not found", KnownApiError::LocationGroupNotFound),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const fn routing_endpoint(
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

const LCRS_GET: Endpoint = routing_endpoint("/api/lcrs_get", LCR_ERRORS);
const LCR_CREATE: Endpoint = routing_endpoint("/api/lcr_create", LCR_ERRORS);
const LCR_UPDATE: Endpoint = routing_endpoint("/api/lcr_update", LCR_ERRORS);
const LCR_DELETE: Endpoint = routing_endpoint("/api/lcr_delete", LCR_ERRORS);
const LCR_ADD_PROVIDER: Endpoint = routing_endpoint("/api/lcr_add_provider", LCR_ERRORS);
const LCR_DELETE_PROVIDER: Endpoint = routing_endpoint("/api/lcr_delete_provider", LCR_ERRORS);

const PROVIDERS_GET: Endpoint = routing_endpoint("/api/providers_get", PROVIDER_ERRORS);
const PROVIDER_CREATE: Endpoint = routing_endpoint("/api/provider_create", PROVIDER_ERRORS);
const PROVIDER_UPDATE: Endpoint = routing_endpoint("/api/provider_update", PROVIDER_ERRORS);
const PROVIDER_DELETE: Endpoint = routing_endpoint("/api/provider_delete", PROVIDER_ERRORS);

const PROVIDER_RULES_GET: Endpoint =
    routing_endpoint("/api/provider_rules_get", PROVIDER_RULE_ERRORS);
const PROVIDER_RULE_CREATE: Endpoint =
    routing_endpoint("/api/provider_rule_create", PROVIDER_RULE_ERRORS);
const PROVIDER_RULE_DELETE: Endpoint =
    routing_endpoint("/api/provider_rule_delete", PROVIDER_RULE_ERRORS);

// Writes to location rules report errors inside `status`; reads and deletes
// report them at the top.
const LOCATION_RULE_CREATE: Endpoint = Endpoint {
    error_at: STATUS_ERROR,
    ..routing_endpoint("/api/location_rule_create", LOCATION_RULE_ERRORS)
};
const LOCATION_RULE_UPDATE: Endpoint = Endpoint {
    error_at: STATUS_ERROR,
    ..routing_endpoint("/api/location_rule_update", LOCATION_RULE_ERRORS)
};
const LOCATION_RULE_COPY: Endpoint = Endpoint {
    error_at: STATUS_ERROR,
    ..routing_endpoint("/api/location_rule_copy", LOCATION_RULE_ERRORS)
};
const LOCATION_RULES_GET: Endpoint =
    routing_endpoint("/api/location_rules_get", LOCATION_RULE_ERRORS);
const LOCATION_RULE_GET: Endpoint =
    routing_endpoint("/api/location_rule_get", LOCATION_RULE_ERRORS);
const LOCATION_RULE_DELETE: Endpoint =
    routing_endpoint("/api/location_rule_delete", LOCATION_RULE_ERRORS);

#[derive(Deserialize, Default)]
#[serde(default)]
struct LcrList {
    #[serde(deserialize_with = "coerce::list")]
    lcr: Vec<Lcr>,
}

impl Operation for GetLcrs {
    type Output = Vec<Lcr>;
    const ENDPOINT: &'static Endpoint = &LCRS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u"]);
        form.set_opt("s_name", self.name.as_deref());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<LcrList>(root, &["lcrs"])?.lcr)
    }
}

impl Operation for CreateLcr {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LCR_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u"]);
        form.set("name", self.name());
        form.set_opt("order", self.order().map(|order| order.as_str()));
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for UpdateLcr {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LCR_UPDATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["u", "lcr_id"]);
        form.set("lcr_id", self.lcr_id());
        form.set_opt("name", options.name.as_deref());
        form.set_opt("order", options.order.map(|order| order.as_str()));
        form.set_opt_bool("allow_loss_calls", options.allow_loss_calls);
        form.set_opt_bool("no_failover", options.no_failover);
        form.set_opt(
            "minimal_rate_margin_percent",
            options.minimal_rate_margin_percent,
        );
        form.set_opt(
            "first_provider_percent_limit",
            options.first_provider_percent_limit,
        );
        form.set_opt("quality_routing_id", options.quality_routing_id);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for DeleteLcr {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LCR_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u", "lcr_id"]);
        form.set("lcr_id", self.lcr_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

fn lcr_provider_form(slot: &LcrProvider) -> Form {
    let mut form = Form::new(&["u", "lcr_id", "provider_id"]);
    form.set("lcr_id", slot.lcr_id());
    form.set("provider_id", slot.provider_id());
    form.set_true("failover", slot.is_failover());
    form
}

impl Operation for AddLcrProvider {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LCR_ADD_PROVIDER;

    fn encode(&self) -> Form {
        lcr_provider_form(&self.0)
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for RemoveLcrProvider {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LCR_DELETE_PROVIDER;

    fn encode(&self) -> Form {
        lcr_provider_form(&self.0)
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

fn set_provider_options(form: &mut Form, options: &ProviderOptions) {
    form.set_opt("server_ids", options.server_ids.as_deref());
    form.set_opt_bool("active", options.active);
    form.set_opt("dtmfmode", options.dtmfmode.map(|mode| mode.as_str()));
    form.set_opt("location_id", options.location_id);
    form.set_opt("timeout", options.timeout);
    form.set_opt("max_timeout", options.max_timeout);
    form.set_opt("call_limit", options.call_limit);
    form.set_opt("balance_limit", options.balance_limit);
    form.set_opt("login", options.login.as_deref());
    form.set_opt("password", options.password.as_deref());
    form.set_opt_bool("register", options.register);
    form.set_opt("cid_name", options.cid_name.as_deref());
    form.set_opt("cid_number", options.cid_number.as_deref());
    form.set_opt("network_type", options.network_type.map(|kind| kind.as_str()));
    form.set_opt("server_ip", options.server_ip.as_deref());
    form.set_opt("ipaddr", options.ipaddr.as_deref());
    form.set_opt("port", options.port);
    form.set_opt("fromdomain", options.fromdomain.as_deref());
    if options.network_type == Some(NetworkType::Dynamic) {
        form.set("register", 0);
        form.set("server_ip", "dynamic");
        form.set("port", 0);
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProviderList {
    #[serde(deserialize_with = "coerce::list")]
    provider: Vec<Provider>,
}

impl Operation for GetProviders {
    type Output = Vec<Provider>;
    const ENDPOINT: &'static Endpoint = &PROVIDERS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_opt("provider_id", self.provider_id);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<ProviderList>(root, &["status", "providers"])?.provider)
    }
}

impl Operation for CreateProvider {
    type Output = ProviderCreated;
    const ENDPOINT: &'static Endpoint = &PROVIDER_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["name", "tech", "tariff_id"]);
        form.set("name", self.name());
        form.set("tech", self.tech().as_str());
        form.set("tariff_id", self.tariff_id());
        set_provider_options(&mut form, self.options());
        form.set_opt("fromuser", self.options().fromuser.as_deref());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(ProviderCreated {
            status: status_success(root),
            provider_id: int_at(root, &["status", "provider_id"]),
        })
    }
}

impl Operation for UpdateProvider {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &PROVIDER_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["provider_id"]);
        form.set("provider_id", self.provider_id());
        form.set_opt("name", self.name());
        form.set_opt("tariff_id", self.tariff_id());
        set_provider_options(&mut form, self.options());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

single_id_operation!(DeleteProvider, PROVIDER_DELETE, "provider_id" => provider_id, String, status_success);

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProviderRuleList {
    #[serde(deserialize_with = "coerce::list")]
    provider_rule: Vec<ProviderRule>,
}

impl Operation for GetProviderRules {
    type Output = Vec<ProviderRule>;
    const ENDPOINT: &'static Endpoint = &PROVIDER_RULES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["provider_id"]);
        form.set("provider_id", self.provider_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<ProviderRuleList>(root, &["status", "provider_rules"])?.provider_rule)
    }
}

single_id_operation!(DeleteProviderRule, PROVIDER_RULE_DELETE, "provider_rule_id" => provider_rule_id, String, status_success);

impl Operation for CreateProviderRule {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &PROVIDER_RULE_CREATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["provider_id", "name", "cut", "add"]);
        form.set("provider_id", self.provider_id());
        form.set("name", self.name());
        form.set("cut", self.cut());
        form.set("add", self.add());
        form.set("minlen", options.minlen);
        form.set("maxlen", options.maxlen);
        form.set("pr_type", options.pr_type.as_str());
        form.set_bool("change_callerid_name", options.change_callerid_name);
        form.set_opt("tariff_id", options.tariff_id);
        form.set_opt_bool("set_pai", options.set_pai);
        form.set_opt("suffix", options.suffix.as_deref());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

fn set_location_rule_options(form: &mut Form, options: &LocationRuleOptions) {
    form.set_opt("lr_type", options.lr_type.map(|kind| kind.as_str()));
    for (key, value) in options.numbers() {
        form.set_opt(key, value);
    }
    form.set_opt_bool("change_callerid_name", options.change_callerid_name);
    for (key, value) in options.patterns() {
        form.set_opt(key, value);
    }
}

impl Operation for CreateLocationRule {
    type Output = LocationRuleCreated;
    const ENDPOINT: &'static Endpoint = &LOCATION_RULE_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["location_id"]);
        form.set("location_id", self.location_id());
        form.set("name", self.name());
        set_location_rule_options(&mut form, self.options());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(LocationRuleCreated {
            success: status_success(root),
            rule_id: int_at(root, &["status", "rule_id"]),
        })
    }
}

impl Operation for UpdateLocationRule {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LOCATION_RULE_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["location_rule_id"]);
        form.set("location_rule_id", self.location_rule_id());
        form.set_opt_bool("enabled", self.is_enabled());
        form.set_opt("name", self.name());
        set_location_rule_options(&mut form, self.options());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for GetLocationRules {
    type Output = Option<RuleLocation>;
    const ENDPOINT: &'static Endpoint = &LOCATION_RULES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["location_id"]);
        match self.location() {
            LocationSelector::All => form.set("location_id", "all"),
            LocationSelector::Id(id) => form.set("location_id", id),
        }
        form.set_opt("from", self.from());
        form.set_opt("max_results", self.max_results());
        form
    }

    /// `None` when the location has no rule block at all.
    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        if root.find(&["status", "location"]).is_none() {
            return Ok(None);
        }
        section(root, &["status", "location"]).map(Some)
    }
}

impl Operation for GetLocationRule {
    type Output = LocationRule;
    const ENDPOINT: &'static Endpoint = &LOCATION_RULE_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["location_rule_id"]);
        form.set("location_rule_id", self.location_rule_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let rule = required(root, &["status", "location_rule"])?;
        Ok(serde_json::from_value(rule.to_value())?)
    }
}

impl Operation for CopyLocationRule {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &LOCATION_RULE_COPY;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["location_rule_id", "location_id"]);
        form.set("location_rule_id", self.location_rule_id());
        form.set("location_id", self.location_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

single_id_operation!(DeleteLocationRule, LOCATION_RULE_DELETE, "location_rule_id" => location_rule_id, String, status_success);

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, failure_code, pairs};
    use super::*;
    use crate::domain::{LcrOrder, ProviderTech};

    #[test]
    fn lcr_list_reads_single_and_many() {
        let one = GetLcrs::decode(&doc(
            "<page><lcrs><lcr><id>1</id><name>Main</name><order>price</order>\
             <failover_provider_id>0</failover_provider_id><no_failover>1</no_failover></lcr></lcrs></page>",
        ))
        .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].failover_provider_id, None);
        assert!(one[0].no_failover);

        let none = GetLcrs::decode(&doc("<page><lcrs/></page>")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn lcr_writes_hash_username() {
        let form = CreateLcr::new("Main").unwrap().with_order(LcrOrder::Quality).encode();
        assert_eq!(form.hash_keys("reseller"), &["u"]);
        assert_eq!(pairs(&form), vec![("name", "Main"), ("order", "quality")]);

        let slot = LcrProvider::new(2, 9).unwrap().failover();
        let form = AddLcrProvider(slot).encode();
        assert_eq!(form.hash_keys("admin"), &["u", "lcr_id", "provider_id"]);
        assert_eq!(form.get("failover"), Some("1"));
    }

    #[test]
    fn lcr_errors_come_with_a_message() {
        let root = doc("<page><error>Something</error><message>details</message></page>");
        let failure = GetLcrs::failure(&root).unwrap();
        assert_eq!(failure.message.as_deref(), Some("details"));
        assert_eq!(
            failure_code::<RemoveLcrProvider>(
                "<page><error>Provider not found in LCR</error></page>"
            ),
            Some(KnownApiError::ProviderNotInLcr)
        );
    }

    #[test]
    fn dynamic_providers_override_registration() {
        let options = ProviderOptions {
            network_type: Some(NetworkType::Dynamic),
            register: Some(true),
            port: Some(5060),
            ..ProviderOptions::default()
        };
        let form = CreateProvider::new("carrier", ProviderTech::Sip, 3, options)
            .unwrap()
            .encode();
        assert_eq!(form.get("register"), Some("0"));
        assert_eq!(form.get("server_ip"), Some("dynamic"));
        assert_eq!(form.get("port"), Some("0"));
        assert_eq!(form.get("tech"), Some("SIP"));
    }

    #[test]
    fn providers_are_listed_under_status() {
        let providers = GetProviders::decode(&doc(
            "<page><status><providers><provider><id>4</id><name>Carrier</name>\
             <balance_limit></balance_limit><active>1</active></provider></providers></status></page>",
        ))
        .unwrap();
        assert_eq!(providers[0].id, 4);
        assert_eq!(providers[0].balance_limit, None);
        assert!(providers[0].active);
    }

    #[test]
    fn provider_rule_sends_defaults() {
        let form = CreateProviderRule::new(1, "intl", "00", "", Default::default())
            .unwrap()
            .encode();
        assert_eq!(
            pairs(&form),
            vec![
                ("provider_id", "1"),
                ("name", "intl"),
                ("cut", "00"),
                ("add", ""),
                ("minlen", "1"),
                ("maxlen", "100"),
                ("pr_type", "dst"),
                ("change_callerid_name", "0"),
            ]
        );
    }

    #[test]
    fn location_rule_errors_depend_on_operation() {
        assert_eq!(
            failure_code::<CreateLocationRule>(
                "<page><status><error>Rule must be unique</error></status></page>"
            ),
            Some(KnownApiError::RuleNotUnique)
        );
        assert_eq!(
            failure_code::<GetLocationRule>("<page><error>Location not found</error></page>"),
            Some(KnownApiError::LocationNotFound)
        );
    }

    #[test]
    fn location_rule_create_applies_length_defaults() {
        let options = LocationRuleOptions {
            add: Some("370".into()),
            ..LocationRuleOptions::default()
        };
        let form = CreateLocationRule::new(2, "local", options).unwrap().encode();
        assert_eq!(form.get("minlen"), Some("1"));
        assert_eq!(form.get("src_maxlen"), Some("99"));
        assert!(!form.contains("lcr_id"));
    }

    #[test]
    fn location_rules_accept_all_locations() {
        let request = GetLocationRules::new(LocationSelector::All)
            .unwrap()
            .page(0, 50)
            .unwrap();
        let form = request.encode();
        assert_eq!(form.get("location_id"), Some("all"));
        assert_eq!(form.get("max_results"), Some("50"));

        let location = GetLocationRules::decode(&doc(
            "<page><status><location><id>1</id><name>Global</name>\
             <location_rule><id>7</id><lcr_id>3</lcr_id></location_rule></location></status></page>",
        ))
        .unwrap()
        .unwrap();
        assert_eq!(location.rules[0].lcr_id, Some(3));

        assert_eq!(
            GetLocationRules::decode(&doc("<page><status/></page>")).unwrap(),
            None
        );
    }

    #[test]
    fn single_rule_must_be_present() {
        let err = GetLocationRule::decode(&doc("<page><status/></page>")).unwrap_err();
        assert!(matches!(err, DecodeError::MissingElement("location_rule")));
    }
}
