use serde::Deserialize;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, RemoteFailure, TOP_ERROR, section, text,
};
use crate::domain::{
    GetRate, GetTariffRates, GetTariffs, ImportRetailTariff, KnownApiError, RateQuote,
    RetailDestinationGroup, RetailTariff, SaveWholesaleTariff, TariffImported, TariffRates,
    TariffSummary, WholesaleRate, WholesaleTariff, WholesaleTariffSaved,
};
use crate::xml::{XmlNode, coerce};

const TARIFF_ERRORS: &[(&str, KnownApiError)] = &[
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("Access Denied", KnownApiError::AccessDenied),
    ("No Tariffs found", KnownApiError::NoTariffsFound),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const IMPORT_ERRORS: &[(&str, KnownApiError)] = &[
    ("File does not exist", KnownApiError::TariffFileMissing),
    ("Bad XML data", KnownApiError::BadXmlData),
    ("Tariff belongs to other user!", KnownApiError::TariffOwnedByOtherUser),
    ("No destinations!", KnownApiError::NoDestinations),
];

/// Import errors that carry details after a fixed prefix.
const IMPORT_ERROR_PREFIXES: &[(&str, KnownApiError)] = &[
    (
        "TARIFF NAME WITH THIS ID DO NOT MATCH !!!FOUND ",
        KnownApiError::TariffIdNameMismatch,
    ),
    (
        "TARIFF with same name exists, ID:",
        KnownApiError::TariffNameExists,
    ),
];

const WHOLESALE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Tariff not found", KnownApiError::TariffNotFound),
    ("Bad login", KnownApiError::BadLogin),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const RATE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Rate was not found", KnownApiError::RateNotFound),
    ("User was not found", KnownApiError::UserNotFound),
    ("Feature disabled", KnownApiError::FeatureDisabled),
    ("API Requests are disabled", KnownApiError::ApiRequestsDisabled),
    (
        "You are not authorized to view this page",
        KnownApiError::NotAuthorizedToViewPage,
    ),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const fn tariff_endpoint(
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

const TARIFF_RATES_GET: Endpoint = tariff_endpoint("/api/tariff_rates_get", TARIFF_ERRORS);
const TARIFF_RETAIL_IMPORT: Endpoint = tariff_endpoint("/api/tariff_retail_import", IMPORT_ERRORS);
// Wholesale updates authenticate the login itself.
const TARIFF_WHOLESALE_UPDATE: Endpoint = Endpoint {
    credentials: Credentials::UsernamePassword,
    ..tariff_endpoint("/api/tariff_wholesale_update", WHOLESALE_ERRORS)
};
const TARIFFS_GET: Endpoint = tariff_endpoint("/api/tariffs_get", TARIFF_ERRORS);
const RATE_GET: Endpoint = tariff_endpoint("/api/rate_get", RATE_ERRORS);

#[derive(Deserialize, Default)]
#[serde(default)]
struct RetailRates {
    #[serde(deserialize_with = "coerce::list")]
    destination: Vec<RetailDestinationGroup>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WholesaleRates {
    #[serde(deserialize_with = "coerce::list")]
    rate: Vec<WholesaleRate>,
}

impl Operation for GetTariffRates {
    type Output = TariffRates;
    const ENDPOINT: &'static Endpoint = &TARIFF_RATES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["tariff_id", "user_id"]);
        form.set_opt("tariff_id", self.tariff_id);
        form.set_opt("user_id", self.user_id);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        if root.find(&["rates", "destination"]).is_some() {
            let mut tariff: RetailTariff = section(root, &[])?;
            tariff.destinations = section::<RetailRates>(root, &["rates"])?.destination;
            return Ok(TariffRates::Retail(tariff));
        }

        let mut tariff: WholesaleTariff = section(root, &[])?;
        tariff.rates = section::<WholesaleRates>(root, &["rates"])?.rate;
        Ok(TariffRates::Wholesale(tariff))
    }
}

/// Per-destination import problems, reported without a top-level `error`.
/// Each `bad_destinations` and `destination_with_bad_rates` element is one
/// destination; the collision elements hold `collision_in_time_range` lines.
fn import_details(root: &XmlNode) -> Vec<String> {
    let destination = |node: &XmlNode| {
        format!(
            "{} ({})",
            text(node, &["destination_group_name"]),
            text(node, &["destination_group_type"])
        )
    };
    let collisions = |element: &'static str| {
        root.children_named(element)
            .flat_map(|node| node.children_named("collision_in_time_range"))
            .map(move |collision| format!("{element}: {}", collision.text))
            .collect::<Vec<_>>()
    };

    let mut details: Vec<String> = root
        .children_named("bad_destinations")
        .map(|node| format!("bad_destinations: {}", destination(node)))
        .collect();
    details.extend(root.children_named("destination_with_bad_rates").map(|node| {
        format!(
            "destination_with_bad_rates: {}: price {}, round {}, duration {}, time {}-{}",
            destination(node),
            text(node, &["rate_price"]),
            text(node, &["rate_round_by"]),
            text(node, &["rate_duration"]),
            text(node, &["rate_start_time"]),
            text(node, &["rate_end_time"])
        )
    }));
    details.extend(collisions("destination_with_time_collisions_in_xml"));
    details.extend(collisions("destination_with_time_collisions_in_db"));
    details
}

impl Operation for ImportRetailTariff {
    type Output = TariffImported;
    const ENDPOINT: &'static Endpoint = &TARIFF_RETAIL_IMPORT;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set("xml", self.xml());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        section(root, &[])
    }

    fn failure(root: &XmlNode) -> Option<RemoteFailure> {
        if let Some(failure) = Self::ENDPOINT.failure(root) {
            return Some(failure);
        }
        let details = import_details(root);
        (!details.is_empty()).then(|| RemoteFailure {
            error: "Import failed".to_owned(),
            message: Some(details.join("\n")),
            code: None,
        })
    }

    fn classify(error: &str) -> Option<KnownApiError> {
        Self::ENDPOINT.classify(error).or_else(|| {
            IMPORT_ERROR_PREFIXES
                .iter()
                .find(|(prefix, _)| error.starts_with(prefix))
                .map(|(_, code)| *code)
        })
    }
}

impl Operation for SaveWholesaleTariff {
    type Output = WholesaleTariffSaved;
    const ENDPOINT: &'static Endpoint = &TARIFF_WHOLESALE_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["id", "name", "currency"]);
        form.set("name", self.name());
        form.set("currency", self.currency());
        form.set_opt("id", self.id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(match root.child("tariff_id") {
            Some(id) => WholesaleTariffSaved::Created {
                tariff_id: coerce::parse_int(&id.text),
            },
            None => WholesaleTariffSaved::Updated,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TariffList {
    #[serde(deserialize_with = "coerce::list")]
    tariff: Vec<TariffSummary>,
}

impl Operation for GetTariffs {
    type Output = Vec<TariffSummary>;
    const ENDPOINT: &'static Endpoint = &TARIFFS_GET;

    fn encode(&self) -> Form {
        Form::new(&["u"])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<TariffList>(root, &["tariffs"])?.tariff)
    }
}

impl Operation for GetRate {
    type Output = RateQuote;
    const ENDPOINT: &'static Endpoint = &RATE_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["username"]);
        form.set("username", self.username());
        form.set("prefix", self.prefix());
        form.set_true("by_full_dst", self.is_by_full_destination());
        form
    }

    /// `rate` reads `price#destination#prefix`.
    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let raw = text(root, &["rate"]);
        let parts: Vec<&str> = raw.split('#').collect();
        let [rate, destination, prefix] = parts.as_slice() else {
            return Err(DecodeError::InvalidFormat {
                field: "rate",
                value: raw,
            });
        };
        Ok(RateQuote {
            rate: coerce::parse_float(rate),
            destination: (*destination).to_owned(),
            prefix: (*prefix).to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, failure_code, pairs};
    use super::*;

    #[test]
    fn retail_rates_are_grouped_by_destination() {
        let root = doc(
            "<page><tariff_name>Retail</tariff_name><purpose>user</purpose>\
             <currency>EUR</currency><rates><destination>\
             <destination_group_name>Lithuania mobile</destination_group_name>\
             <destinations><destination_name>Omnitel</destination_name><prefix>3706</prefix></destinations>\
             <rate><duration>-1</duration><type>minute</type><round_by>1</round_by>\
             <tariff_rate>0.05</tariff_rate></rate>\
             </destination></rates></page>",
        );
        let TariffRates::Retail(tariff) = GetTariffRates::decode(&root).unwrap() else {
            panic!("expected a retail tariff");
        };
        assert_eq!(tariff.name, "Retail");
        assert_eq!(tariff.destinations.len(), 1);
        let group = &tariff.destinations[0];
        assert_eq!(group.destinations[0].prefix, "3706");
        assert_eq!(group.rates[0].rate, 0.05);
        assert_eq!(group.rates[0].duration, -1);
    }

    #[test]
    fn flat_rates_decode_as_wholesale() {
        let root = doc(
            "<page><tariff_name>WS</tariff_name><currency>USD</currency><rates>\
             <rate><prefix>370</prefix><tariff_rate>0.01</tariff_rate><con_fee>0.1</con_fee></rate>\
             <rate><prefix>371</prefix></rate></rates></page>",
        );
        let TariffRates::Wholesale(tariff) = GetTariffRates::decode(&root).unwrap() else {
            panic!("expected a wholesale tariff");
        };
        assert_eq!(tariff.rates.len(), 2);
        assert_eq!(tariff.rates[0].connection_fee, 0.1);
        assert_eq!(tariff.rates[1].prefix, "371");
    }

    #[test]
    fn import_errors_match_by_prefix() {
        assert_eq!(
            failure_code::<ImportRetailTariff>(
                "<page><error>TARIFF with same name exists, ID:12!!! CHANGE NAME OR ID</error></page>"
            ),
            Some(KnownApiError::TariffNameExists)
        );
        assert_eq!(
            failure_code::<ImportRetailTariff>("<page><error>Bad XML data</error></page>"),
            Some(KnownApiError::BadXmlData)
        );
    }

    #[test]
    fn import_detail_elements_are_a_failure() {
        let root = doc(
            "<page><bad_destinations><destination_group_name>Nowhere</destination_group_name>\
             <destination_group_type>FIX</destination_group_type></bad_destinations></page>",
        );
        let failure = ImportRetailTariff::failure(&root).unwrap();
        assert_eq!(failure.error, "Import failed");
        assert_eq!(failure.message.as_deref(), Some("bad_destinations: Nowhere (FIX)"));
    }

    #[test]
    fn bad_rate_details_carry_price_and_window() {
        let root = doc(
            "<page><destination_with_bad_rates>\
             <destination_group_name>Lithuania</destination_group_name>\
             <destination_group_type>MOB</destination_group_type>\
             <rate_price>-1</rate_price><rate_round_by>1</rate_round_by>\
             <rate_duration>60</rate_duration><rate_start_time>00:00:00</rate_start_time>\
             <rate_end_time>23:59:59</rate_end_time></destination_with_bad_rates>\
             <destination_with_time_collisions_in_db>\
             <collision_in_time_range>08:00-09:00</collision_in_time_range>\
             </destination_with_time_collisions_in_db></page>",
        );
        let failure = ImportRetailTariff::failure(&root).unwrap();
        assert_eq!(
            failure.message.as_deref(),
            Some(
                "destination_with_bad_rates: Lithuania (MOB): price -1, round 1, duration 60, \
                 time 00:00:00-23:59:59\n\
                 destination_with_time_collisions_in_db: 08:00-09:00"
            )
        );
    }

    #[test]
    fn wholesale_save_reports_created_or_updated() {
        assert_eq!(
            SaveWholesaleTariff::decode(&doc("<page><tariff_id>5</tariff_id></page>")).unwrap(),
            WholesaleTariffSaved::Created { tariff_id: 5 }
        );
        assert_eq!(
            SaveWholesaleTariff::decode(&doc("<page><status>ok</status></page>")).unwrap(),
            WholesaleTariffSaved::Updated
        );
    }

    #[test]
    fn rate_string_needs_three_parts() {
        let quote = GetRate::decode(&doc("<page><rate>0.2#Lithuania#370</rate></page>")).unwrap();
        assert_eq!(quote.rate, 0.2);
        assert_eq!(quote.destination, "Lithuania");

        let err = GetRate::decode(&doc("<page><rate>0.2#Lithuania</rate></page>")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFormat { field: "rate", .. }));
    }

    #[test]
    fn rate_lookup_hashes_username_only() {
        let form = GetRate::new("alice", "37060").unwrap().by_full_destination().encode();
        assert_eq!(form.hash_keys("admin"), &["username"]);
        assert_eq!(
            pairs(&form),
            vec![("username", "alice"), ("prefix", "37060"), ("by_full_dst", "1")]
        );
    }
}
