use serde::Deserialize;
use serde_json::Value;

use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, STATUS_ERROR, TOP_ERROR, int_at,
    section, status_success, text,
};
use crate::domain::{
    CreateCreditNote, CreateService, CreateSubscription, CreateSubscriptionBulk,
    CreditNoteFilter, DeleteCreditNote, DeleteService, DeleteSubscription, FlatRateNumberStatus,
    GetCreditNotes, GetFlatRateNumberStatus, GetInvoices, GetServices, GetSubscriptions, Invoice,
    InvoiceList, InvoiceProduct, KnownApiError, Service, ServiceCreated, ServiceOptions,
    SubscriptionCreated, SubscriptionOptions, SubscriptionsCreated, UpdateCreditNote,
    UpdateInvoice, UpdateService, UpdateSubscription,
};
use crate::xml::{XmlNode, coerce};

const INVOICE_ERRORS: &[(&str, KnownApiError)] = &[
    ("user not found", KnownApiError::UserNotFound),
    ("no invoices found", KnownApiError::NoInvoicesFound),
    ("Invoice was not found", KnownApiError::InvoiceNotFound),
    ("Access denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const CREDIT_NOTE_ERRORS: &[(&str, KnownApiError)] = &[
    ("User was not found", KnownApiError::UserNotFound),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Credit note was not created", KnownApiError::CreditNoteNotCreated),
    ("Bad login", KnownApiError::BadLogin),
    ("Credit note was not found", KnownApiError::CreditNoteNotFound),
];

const SERVICE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Access Denied", KnownApiError::AccessDenied),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Service must have service type", KnownApiError::ServiceTypeMissing),
    (
        "Flat Rate Service must have quantity",
        KnownApiError::FlatRateQuantityMissing,
    ),
    ("Quantity must be numeric", KnownApiError::QuantityNotNumeric),
    (
        "Quantity must be greater than zero",
        KnownApiError::QuantityNotPositive,
    ),
    ("Service Price must be numeric", KnownApiError::ServicePriceNotNumeric),
    (
        "You are not authorized to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("User was not found", KnownApiError::UserNotFound),
    ("Service was not found", KnownApiError::ServiceNotFound),
    (
        "You are not authorized to manage Services",
        KnownApiError::ServicesNotAuthorized,
    ),
    (
        "Cannot delete - some subscriptions to this service exist",
        KnownApiError::ServiceHasSubscriptions,
    ),
    ("No Services found", KnownApiError::NoServicesFound),
    ("Service Type is invalid", KnownApiError::InvalidServiceType),
    ("Service was not selected", KnownApiError::ServiceNotSelected),
];

const SUBSCRIPTION_ERRORS: &[(&str, KnownApiError)] = &[
    ("Access Denied", KnownApiError::AccessDenied),
    (
        "You are not authorised to use this functionality",
        KnownApiError::NotAuthorized,
    ),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("Subscription disabled", KnownApiError::SubscriptionDisabled),
    ("Subscription was not found", KnownApiError::SubscriptionNotFound),
    (
        "Subscription delete action was not found",
        KnownApiError::SubscriptionDeleteActionNotFound,
    ),
    ("No Subscriptions found", KnownApiError::NoSubscriptionsFound),
    (
        "You are not authorized to manage Subscriptions",
        KnownApiError::SubscriptionsNotAuthorized,
    ),
    (
        "User has insufficient balance",
        KnownApiError::InsufficientUserBalance,
    ),
    ("Service was not found", KnownApiError::ServiceNotFound),
    (
        "One or more Service was not found",
        KnownApiError::OneOrMoreServicesNotFound,
    ),
    (
        "Subscription activation end date must be valid timestamp",
        KnownApiError::InvalidActivationEnd,
    ),
    (
        "Subscription activation start date must be valid timestamp",
        KnownApiError::InvalidActivationStart,
    ),
    (
        "Activation start date must be earlier than end date",
        KnownApiError::ActivationStartAfterEnd,
    ),
    ("Service is not flat rate", KnownApiError::ServiceNotFlatRate),
    (
        "user_id must be non negative integer",
        KnownApiError::InvalidUserId,
    ),
    ("user_id must be provided", KnownApiError::UserIdMissing),
    ("Number must be provided", KnownApiError::NumberMissing),
    ("User was not found", KnownApiError::UserNotFound),
    (
        "User does not have any Flat-Rate subscriptions",
        KnownApiError::NoFlatRateSubscriptions,
    ),
];

const fn billing_endpoint(
    path: &'static str,
    error_at: &'static [&'static str],
    errors: &'static [(&'static str, KnownApiError)],
) -> Endpoint {
    Endpoint {
        path,
        credentials: Credentials::Username,
        error_at,
        errors,
    }
}

// The invoice listing is the one endpoint whose error element is capitalized.
const INVOICES_GET: Endpoint = billing_endpoint("/api/invoices_get", &["Error"], INVOICE_ERRORS);
const INVOICE_UPDATE: Endpoint =
    billing_endpoint("/api/invoice_update", STATUS_ERROR, INVOICE_ERRORS);

// Credit notes authenticate the login itself, so they carry the password.
const fn credit_note_endpoint(path: &'static str) -> Endpoint {
    Endpoint {
        credentials: Credentials::UsernamePassword,
        ..billing_endpoint(path, STATUS_ERROR, CREDIT_NOTE_ERRORS)
    }
}

const CREDIT_NOTES_GET: Endpoint = credit_note_endpoint("/api/credit_notes_get");
const CREDIT_NOTE_CREATE: Endpoint = credit_note_endpoint("/api/credit_note_create");
const CREDIT_NOTE_UPDATE: Endpoint = credit_note_endpoint("/api/credit_note_update");
const CREDIT_NOTE_DELETE: Endpoint = credit_note_endpoint("/api/credit_note_delete");

const SERVICE_CREATE: Endpoint =
    billing_endpoint("/api/service_create", TOP_ERROR, SERVICE_ERRORS);
const SERVICE_UPDATE: Endpoint =
    billing_endpoint("/api/service_update", TOP_ERROR, SERVICE_ERRORS);
const SERVICE_DELETE: Endpoint =
    billing_endpoint("/api/service_delete", TOP_ERROR, SERVICE_ERRORS);
const SERVICES_GET: Endpoint = billing_endpoint("/api/services_get", TOP_ERROR, SERVICE_ERRORS);

const SUBSCRIPTIONS_GET: Endpoint =
    billing_endpoint("/api/subscriptions_get", TOP_ERROR, SUBSCRIPTION_ERRORS);
const SUBSCRIPTION_CREATE: Endpoint =
    billing_endpoint("/api/subscription_create", TOP_ERROR, SUBSCRIPTION_ERRORS);
const SUBSCRIPTION_CREATE_BULK: Endpoint =
    billing_endpoint("/api/subscription_create_bulk", TOP_ERROR, SUBSCRIPTION_ERRORS);
const SUBSCRIPTION_UPDATE: Endpoint =
    billing_endpoint("/api/subscription_update", TOP_ERROR, SUBSCRIPTION_ERRORS);
const SUBSCRIPTION_DELETE: Endpoint =
    billing_endpoint("/api/subscription_delete", TOP_ERROR, SUBSCRIPTION_ERRORS);
const FLAT_RATE_NUMBER_STATUS_GET: Endpoint = billing_endpoint(
    "/api/subscription_flat_rate_number_status_get",
    TOP_ERROR,
    SUBSCRIPTION_ERRORS,
);

fn decode_invoice(node: &XmlNode) -> Result<Invoice, DecodeError> {
    let attribute = |name: &str| node.attribute(name).unwrap_or_default().to_owned();
    let products = node
        .children_named("Product")
        .map(|product| serde_json::from_value::<InvoiceProduct>(product.to_value()))
        .collect::<Result<_, _>>()?;

    Ok(Invoice {
        id: int_at(node, &["id"]),
        user_id: coerce::parse_int(&attribute("user_id")),
        agreement_number: attribute("agreementnumber"),
        client_id: attribute("clientid"),
        number: attribute("number"),
        paid: coerce::parse_flag(&text(node, &["paid"])),
        total_time: text(node, &["Total_time"]),
        products,
    })
}

impl Operation for GetInvoices {
    type Output = InvoiceList;
    const ENDPOINT: &'static Endpoint = &INVOICES_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u"]);
        form.set("from", self.from());
        form.set("till", self.till());
        form.set_opt("lang", self.lang());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let Some(invoices) = root.child("Invoices") else {
            return Ok(InvoiceList::default());
        };
        let period = |name: &str| invoices.attribute(name).unwrap_or_default().to_owned();

        Ok(InvoiceList {
            from: period("from"),
            till: period("till"),
            invoices: invoices
                .children_named("Invoice")
                .map(decode_invoice)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Operation for UpdateInvoice {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &INVOICE_UPDATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["id"]);
        form.set("id", self.id());
        form.set_opt("address", options.address.as_deref());
        form.set_opt("city", options.city.as_deref());
        form.set_opt("postcode", options.postcode.as_deref());
        form.set_opt("state", options.state.as_deref());
        form.set_opt("country_id", options.country_id);
        form.set_opt("phone", options.phone.as_deref());
        form.set_opt("tax_reg_number", options.tax_reg_number.as_deref());
        form.set_opt("comment", options.comment.as_deref());
        form.set_opt("name", options.name.as_deref());
        form.set_true("invoice_sent_manually", options.invoice_sent_manually);
        form.set_true("pay", options.pay);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CreditNoteList {
    #[serde(deserialize_with = "coerce::list")]
    credit_note: Vec<Value>,
}

impl Operation for GetCreditNotes {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &CREDIT_NOTES_GET;

    fn encode(&self) -> Form {
        match self.filter() {
            CreditNoteFilter::All => Form::new(&[]),
            CreditNoteFilter::User(user_id) => {
                let mut form = Form::new(&["user_id"]);
                form.set("user_id", user_id);
                form
            }
            CreditNoteFilter::CreditNote(credit_note_id) => {
                let mut form = Form::new(&["credit_note_id"]);
                form.set("credit_note_id", credit_note_id);
                form
            }
        }
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<CreditNoteList>(root, &["credit_notes"])?.credit_note)
    }
}

impl Operation for CreateCreditNote {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &CREDIT_NOTE_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id", "number"]);
        form.set("user_id", self.user_id());
        form.set("price", self.price());
        form.set("issue_date", self.issue_date());
        form.set_opt("number", self.number());
        form.extend(self.extra());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

impl Operation for UpdateCreditNote {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &CREDIT_NOTE_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set("credit_note_id", self.credit_note_id());
        form.set_opt("status", self.status());
        form.set_opt("comment", self.comment());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

impl Operation for DeleteCreditNote {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &CREDIT_NOTE_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set("credit_note_id", self.credit_note_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(text(root, &["status"]))
    }
}

fn set_service_options(form: &mut Form, options: &ServiceOptions) {
    form.set_opt("service_sell_price", options.sell_price);
    form.set_opt("service_self_cost", options.self_cost);
    form.set_opt("service_period", options.period.map(|period| period.as_str()));
    form.set_opt("service_minutes_per_month", options.minutes_per_month);
}

impl Operation for CreateService {
    type Output = ServiceCreated;
    const ENDPOINT: &'static Endpoint = &SERVICE_CREATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["new_service_name", "new_service_type"]);
        form.set("new_service_name", self.name());
        form.set("new_service_type", self.service_type().as_str());
        set_service_options(&mut form, self.options());
        form.set_opt("new_owner_id", self.owner_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(ServiceCreated {
            status: status_success(root),
            id: int_at(root, &["status", "service", "id"]),
        })
    }
}

impl Operation for UpdateService {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &SERVICE_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["service_id"]);
        form.set("service_id", self.service_id());
        form.set_opt("service_name", self.name());
        form.set_opt("service_type", self.service_type().map(|kind| kind.as_str()));
        set_service_options(&mut form, self.options());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

single_id_operation!(DeleteService, SERVICE_DELETE, "service_id" => service_id, String, status_success);

#[derive(Deserialize, Default)]
#[serde(default)]
struct ServiceList {
    #[serde(deserialize_with = "coerce::list")]
    service: Vec<Service>,
}

impl Operation for GetServices {
    type Output = Vec<Service>;
    const ENDPOINT: &'static Endpoint = &SERVICES_GET;

    fn encode(&self) -> Form {
        Form::new(&[])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<ServiceList>(root, &["services"])?.service)
    }
}

const SUBSCRIPTION_FILTER_KEYS: &[&str] = &[
    "service_id",
    "subscription_activation_start",
    "subscription_activation_end",
    "subscription_memo",
    "subscription_until_canceled",
    "user_id",
];

#[derive(Deserialize, Default)]
#[serde(default)]
struct SubscriptionList {
    #[serde(deserialize_with = "coerce::list")]
    subscription: Vec<Value>,
}

impl Operation for GetSubscriptions {
    type Output = Vec<Value>;
    const ENDPOINT: &'static Endpoint = &SUBSCRIPTIONS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(SUBSCRIPTION_FILTER_KEYS);
        form.set_opt("service_id", self.service_id);
        form.set_opt("subscription_activation_start", self.activation_start);
        form.set_opt("subscription_activation_end", self.activation_end);
        form.set_opt("subscription_memo", self.memo.as_deref());
        form.set_opt_bool("subscription_until_canceled", self.until_canceled);
        form.set_opt("user_id", self.user_id);
        form.extend(&self.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(section::<SubscriptionList>(root, &["status", "subscriptions"])?.subscription)
    }
}

fn set_subscription_options(form: &mut Form, options: &SubscriptionOptions) {
    form.set_opt("subscription_activation_start", options.activation_start);
    form.set_opt("subscription_activation_end", options.activation_end);
    form.set_opt("subscription_memo", options.memo.as_deref());
    form.set_opt_bool("subscription_until_canceled", options.until_canceled);
    form.extend(&options.extra);
}

fn subscription_form(request: &CreateSubscription) -> Form {
    let mut form = Form::new(&["user_id", "service_id"]);
    form.set("user_id", request.user_id());
    form.set("service_id", request.service_id());
    set_subscription_options(&mut form, request.options());
    form
}

impl Operation for CreateSubscription {
    type Output = SubscriptionCreated;
    const ENDPOINT: &'static Endpoint = &SUBSCRIPTION_CREATE;

    fn encode(&self) -> Form {
        subscription_form(self)
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(SubscriptionCreated {
            status: status_success(root),
            id: int_at(root, &["status", "id"]),
        })
    }
}

impl Operation for CreateSubscriptionBulk {
    type Output = SubscriptionsCreated;
    const ENDPOINT: &'static Endpoint = &SUBSCRIPTION_CREATE_BULK;

    fn encode(&self) -> Form {
        subscription_form(&self.0)
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let ids = text(root, &["status", "id"])
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(coerce::parse_int)
            .collect();
        Ok(SubscriptionsCreated {
            status: status_success(root),
            ids,
        })
    }
}

impl Operation for UpdateSubscription {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &SUBSCRIPTION_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["subscription_id"]);
        form.set("subscription_id", self.subscription_id());
        set_subscription_options(&mut form, self.options());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for DeleteSubscription {
    type Output = String;
    const ENDPOINT: &'static Endpoint = &SUBSCRIPTION_DELETE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["subscription_id", "subscription_delete_action"]);
        form.set("subscription_id", self.subscription_id());
        form.set("subscription_delete_action", self.delete_action());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(status_success(root))
    }
}

impl Operation for GetFlatRateNumberStatus {
    type Output = FlatRateNumberStatus;
    const ENDPOINT: &'static Endpoint = &FLAT_RATE_NUMBER_STATUS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["user_id", "number"]);
        form.set("user_id", self.user_id());
        form.set("number", self.number());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        section(root, &["status"])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{doc, failure_code, pairs};
    use super::*;
    use crate::domain::{ServicePeriod, ServiceType, UnixTimestamp};

    #[test]
    fn invoices_read_period_and_attributes() {
        let root = doc(r#"<page>
            <Invoices from="2024-01-01" till="2024-01-31">
                <Invoice user_id="7" agreementnumber="A-7" clientid="C1" number="INV-1">
                    <id>3</id><paid>1</paid><Total_time>00:10:00</Total_time>
                    <Product><Name>Calls</Name><Quantity>1</Quantity><Price>2.5</Price>
                        <Sum>2.5</Sum><Service_id>0</Service_id></Product>
                    <Product><Name>DID</Name><Price>1</Price></Product>
                </Invoice>
            </Invoices>
        </page>"#);

        let list = GetInvoices::decode(&root).unwrap();
        assert_eq!(list.from, "2024-01-01");
        assert_eq!(list.till, "2024-01-31");
        let invoice = &list.invoices[0];
        assert_eq!(invoice.id, 3);
        assert_eq!(invoice.user_id, 7);
        assert_eq!(invoice.agreement_number, "A-7");
        assert_eq!(invoice.number, "INV-1");
        assert!(invoice.paid);
        assert_eq!(invoice.total_time, "00:10:00");
        assert_eq!(invoice.products.len(), 2);
        assert_eq!(invoice.products[0].price, 2.5);
        assert_eq!(invoice.products[1].name, "DID");
    }

    #[test]
    fn missing_invoices_element_is_an_empty_list() {
        let list = GetInvoices::decode(&doc("<page></page>")).unwrap();
        assert!(list.invoices.is_empty());
        assert_eq!(list.from, "");
    }

    #[test]
    fn invoice_errors_live_in_capitalized_element() {
        assert_eq!(
            failure_code::<GetInvoices>("<page><Error>no invoices found</Error></page>"),
            Some(KnownApiError::NoInvoicesFound)
        );
        assert_eq!(
            failure_code::<GetInvoices>("<page><error>no invoices found</error></page>"),
            None
        );
    }

    #[test]
    fn invoice_update_sends_flags_only_when_set() {
        let request = UpdateInvoice::new(
            9,
            crate::domain::InvoiceUpdateOptions {
                comment: Some("checked".to_owned()),
                pay: true,
                ..Default::default()
            },
        )
        .unwrap();
        let form = request.encode();
        assert_eq!(
            pairs(&form),
            vec![("id", "9"), ("comment", "checked"), ("pay", "1")]
        );
        assert_eq!(form.hash_keys("admin"), &["id"]);
    }

    #[test]
    fn credit_note_filter_picks_hash_keys() {
        let all = GetCreditNotes::new(CreditNoteFilter::All).unwrap().encode();
        assert!(all.hash_keys("admin").is_empty());
        assert!(all.params().is_empty());

        let by_user = GetCreditNotes::new(CreditNoteFilter::User(4)).unwrap().encode();
        assert_eq!(by_user.hash_keys("admin"), &["user_id"]);
        assert_eq!(pairs(&by_user), vec![("user_id", "4")]);
    }

    #[test]
    fn credit_notes_are_listed() {
        let one = GetCreditNotes::decode(&doc(
            "<page><credit_notes><credit_note><id>3</id><number>CN-3</number></credit_note>\
             </credit_notes></page>",
        ))
        .unwrap();
        assert_eq!(one, vec![json!({"id": "3", "number": "CN-3"})]);

        let two = GetCreditNotes::decode(&doc(
            "<page><credit_notes><credit_note><id>3</id></credit_note>\
             <credit_note><id>4</id></credit_note></credit_notes></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"id": "3"}), json!({"id": "4"})]);
        assert!(GetCreditNotes::decode(&doc("<page/>")).unwrap().is_empty());
    }

    #[test]
    fn credit_note_create_hashes_number_when_given() {
        let form = CreateCreditNote::new(2, 10.5, UnixTimestamp::new(1_700_000_000))
            .unwrap()
            .with_number("CN-1")
            .encode();
        assert_eq!(form.hash_keys("admin"), &["user_id", "number"]);
        assert_eq!(form.get("price"), Some("10.5"));
        assert_eq!(form.get("number"), Some("CN-1"));
    }

    #[test]
    fn service_create_uses_prefixed_field_names() {
        let request = CreateService::new(
            "Support",
            ServiceType::PeriodicFee,
            ServiceOptions {
                sell_price: Some(5.0),
                period: Some(ServicePeriod::Month),
                ..Default::default()
            },
        )
        .unwrap()
        .owned_by(3);
        assert_eq!(
            pairs(&request.encode()),
            vec![
                ("new_service_name", "Support"),
                ("new_service_type", "periodic_fee"),
                ("service_sell_price", "5"),
                ("service_period", "month"),
                ("new_owner_id", "3"),
            ]
        );

        let root = doc(
            "<page><status><success>Service created</success>\
             <service><id>12</id></service></status></page>",
        );
        assert_eq!(CreateService::decode(&root).unwrap().id, 12);
    }

    #[test]
    fn services_list_reads_optional_quantity() {
        let root = doc(
            "<page><services>\
             <service><id>1</id><name>Fee</name><type>periodic_fee</type><price>3</price></service>\
             <service><id>2</id><name>Flat</name><type>flat_rate</type><quantity>100</quantity></service>\
             </services></page>",
        );
        let services = GetServices::decode(&root).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].kind, "periodic_fee");
        assert_eq!(services[0].quantity, None);
        assert_eq!(services[1].quantity, Some(100));
    }

    #[test]
    fn service_delete_reports_existing_subscriptions() {
        assert_eq!(
            failure_code::<DeleteService>(
                "<page><error>Cannot delete - some subscriptions to this service exist</error></page>"
            ),
            Some(KnownApiError::ServiceHasSubscriptions)
        );
    }

    #[test]
    fn bulk_subscription_ids_are_split() {
        let root = doc("<page><status><success>ok</success><id>4, 5,6</id></status></page>");
        let created = CreateSubscriptionBulk::decode(&root).unwrap();
        assert_eq!(created.ids, vec![4, 5, 6]);
        assert_eq!(created.status, "ok");
    }

    #[test]
    fn subscriptions_are_listed() {
        let one = GetSubscriptions::decode(&doc(
            "<page><status><subscriptions><subscription><id>9</id></subscription>\
             </subscriptions></status></page>",
        ))
        .unwrap();
        assert_eq!(one, vec![json!({"id": "9"})]);

        let two = GetSubscriptions::decode(&doc(
            "<page><status><subscriptions><subscription><id>9</id></subscription>\
             <subscription><id>10</id></subscription></subscriptions></status></page>",
        ))
        .unwrap();
        assert_eq!(two, vec![json!({"id": "9"}), json!({"id": "10"})]);
    }

    #[test]
    fn subscription_filters_hash_in_declared_order() {
        let request = GetSubscriptions {
            user_id: Some(8),
            service_id: Some(2),
            until_canceled: Some(true),
            ..Default::default()
        };
        let form = request.encode();
        assert_eq!(form.hash_keys("admin"), SUBSCRIPTION_FILTER_KEYS);
        assert_eq!(
            pairs(&form),
            vec![
                ("service_id", "2"),
                ("subscription_until_canceled", "1"),
                ("user_id", "8"),
            ]
        );
    }

    #[test]
    fn flat_rate_status_prefix_is_optional() {
        let root =
            doc("<page><status><number>370600</number><status>covered</status></status></page>");
        let status = GetFlatRateNumberStatus::decode(&root).unwrap();
        assert_eq!(status.number, "370600");
        assert_eq!(status.status, "covered");
        assert_eq!(status.prefix, None);
    }
}
