use super::{
    Credentials, DecodeError, Endpoint, Form, Operation, RemoteFailure, TOP_ERROR, float_at,
    int_at, required, section, text,
};
use crate::domain::{
    BalanceUpdateResponse, CreatePayment, CreatedPayment, GetPayments, GetSimpleBalance,
    GetUserBalance, GetUserBalanceByPassword, KnownApiError, LoginResponse, LogoutResponse,
    Payment, PaymentCreated, UpdateUserBalance, UseVoucher, UserLogin, UserLogout,
    VoucherUseResponse,
};
use crate::xml::{XmlNode, coerce};

const SESSION_ERRORS: &[(&str, KnownApiError)] = &[
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("API Requests are disabled", KnownApiError::ApiRequestsDisabled),
];

const BALANCE_ERRORS: &[(&str, KnownApiError)] = &[
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("User was not found", KnownApiError::UserNotFound),
    ("Feature disabled", KnownApiError::FeatureDisabled),
    ("Bad login", KnownApiError::BadLogin),
    ("User balance not updated", KnownApiError::BalanceNotUpdated),
];

const PAYMENT_ERRORS: &[(&str, KnownApiError)] = &[
    ("Bad login", KnownApiError::BadLogin),
    ("Incorrect hash", KnownApiError::IncorrectHash),
    ("No currency", KnownApiError::NoCurrency),
    ("Access Denied", KnownApiError::AccessDenied),
    ("Payment was not saved", KnownApiError::PaymentNotSaved),
];

const VOUCHER_ERRORS: &[(&str, KnownApiError)] = &[
    ("Voucher was not found", KnownApiError::VoucherNotFound),
    ("Vouchers Disabled", KnownApiError::VouchersDisabled),
    ("Access Denied", KnownApiError::AccessDenied),
    ("User was not found", KnownApiError::UserNotFound),
    ("Incorrect hash", KnownApiError::IncorrectHash),
];

const USER_LOGIN: Endpoint = Endpoint {
    path: "/api/user_login",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: SESSION_ERRORS,
};

const USER_LOGOUT: Endpoint = Endpoint {
    path: "/api/user_logout",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: SESSION_ERRORS,
};

const USER_BALANCE_GET: Endpoint = Endpoint {
    path: "/api/user_balance_get",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: BALANCE_ERRORS,
};

const USER_BALANCE_UPDATE: Endpoint = Endpoint {
    path: "/api/user_balance_update",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: BALANCE_ERRORS,
};

const USER_SIMPLE_BALANCE_GET: Endpoint = Endpoint {
    path: "/api/user_simple_balance_get",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: BALANCE_ERRORS,
};

const USER_BALANCE_GET_BY_PSW: Endpoint = Endpoint {
    path: "/api/user_balance_get_by_psw",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: BALANCE_ERRORS,
};

const PAYMENT_CREATE: Endpoint = Endpoint {
    path: "/api/payment_create",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: PAYMENT_ERRORS,
};

const PAYMENTS_GET: Endpoint = Endpoint {
    path: "/api/payments_get",
    credentials: Credentials::UsernamePassword,
    error_at: TOP_ERROR,
    errors: PAYMENT_ERRORS,
};

const VOUCHER_USE: Endpoint = Endpoint {
    path: "/api/voucher_use",
    credentials: Credentials::Username,
    error_at: TOP_ERROR,
    errors: VOUCHER_ERRORS,
};

/// A `failed` action status, which MOR reports without an error element.
fn action_failure(root: &XmlNode, code: KnownApiError, fallback: &str) -> Option<RemoteFailure> {
    let action = root.child("action")?;
    if text(action, &["status"]) != "failed" {
        return None;
    }
    let error = match code {
        KnownApiError::LoginFailed => action
            .child("status_message")
            .map(|message| message.text.clone())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_owned()),
        _ => fallback.to_owned(),
    };
    Some(RemoteFailure {
        error,
        message: None,
        code: Some(code),
    })
}

impl Operation for UserLogin {
    type Output = LoginResponse;
    const ENDPOINT: &'static Endpoint = &USER_LOGIN;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["u", "p"]);
        form.set("u", self.username());
        form.set("p", self.password());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let action = required(root, &["action"])?;
        let status = text(action, &["status"]);
        let status_message = match action.child("status_message") {
            Some(message) => message.text.clone(),
            None if status == "ok" => "Successfully logged in".to_owned(),
            None => "Login failed".to_owned(),
        };
        Ok(LoginResponse {
            name: text(action, &["name"]),
            status,
            status_message,
            user_id: action
                .child("user_id")
                .map(|id| coerce::parse_int(&id.text)),
        })
    }

    fn failure(root: &XmlNode) -> Option<RemoteFailure> {
        Self::ENDPOINT
            .failure(root)
            .or_else(|| action_failure(root, KnownApiError::LoginFailed, "Login failed"))
    }
}

impl Operation for UserLogout {
    type Output = LogoutResponse;
    const ENDPOINT: &'static Endpoint = &USER_LOGOUT;

    fn encode(&self) -> Form {
        Form::new(&[])
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let action = required(root, &["action"])?;
        Ok(LogoutResponse {
            name: text(action, &["name"]),
            status: text(action, &["status"]),
        })
    }

    fn failure(root: &XmlNode) -> Option<RemoteFailure> {
        Self::ENDPOINT
            .failure(root)
            .or_else(|| action_failure(root, KnownApiError::LogoutFailed, "Logout failed"))
    }
}

impl Operation for GetUserBalance {
    type Output = f64;
    const ENDPOINT: &'static Endpoint = &USER_BALANCE_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["username", "currency"]);
        form.set("username", self.username());
        form.set_opt("currency", self.currency());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(float_at(root, &["balance"]))
    }
}

impl Operation for UpdateUserBalance {
    type Output = BalanceUpdateResponse;
    const ENDPOINT: &'static Endpoint = &USER_BALANCE_UPDATE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set("user_id", self.user_id());
        form.set("balance", self.balance());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(BalanceUpdateResponse {
            status: text(root, &["status"]),
            username: text(root, &["user", "username"]),
            user_id: int_at(root, &["user", "id"]),
            balance: float_at(root, &["user", "balance"]),
        })
    }
}

impl Operation for GetSimpleBalance {
    type Output = f64;
    const ENDPOINT: &'static Endpoint = &USER_SIMPLE_BALANCE_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["id", "currency"]);
        form.set("id", self.id());
        form.set_opt("currency", self.currency());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        Ok(coerce::parse_float(&root.text))
    }
}

impl Operation for GetUserBalanceByPassword {
    type Output = f64;
    const ENDPOINT: &'static Endpoint = &USER_BALANCE_GET_BY_PSW;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_path_segment(self.password());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        // Older installations wrap the figure in <balance>.
        match root.child("balance") {
            Some(balance) => Ok(coerce::parse_float(&balance.text)),
            None => Ok(coerce::parse_float(&root.text)),
        }
    }
}

impl Operation for CreatePayment {
    type Output = PaymentCreated;
    const ENDPOINT: &'static Endpoint = &PAYMENT_CREATE;

    fn encode(&self) -> Form {
        let options = self.options();
        let mut form = Form::new(&["user_id", "p_currency", "amount"]);
        form.set("user_id", self.user_id());
        form.set("p_currency", self.currency());
        form.set("amount", self.amount());
        form.set_opt("paymenttype", options.payment_type.map(|kind| kind.as_str()));
        form.set_opt_bool("tax_in_amount", options.tax_in_amount);
        form.set_opt("transaction", options.transaction.as_deref());
        form.set_opt("payer_email", options.payer_email.as_deref());
        form.set_opt("comments_for_user", options.comments_for_user.as_deref());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let response = required(root, &["response"])?;
        let payment = response.child("payment");
        let field = |name: &str| {
            payment
                .and_then(|payment| payment.child(name))
                .map(|node| node.text.as_str())
                .unwrap_or_default()
        };
        Ok(PaymentCreated {
            status: text(response, &["status"]),
            confirmed: text(response, &["confirmed"]) == "Yes",
            payment: CreatedPayment {
                id: coerce::parse_int(field("payment_id")),
                currency: payment
                    .and_then(|payment| payment.attribute("currency"))
                    .unwrap_or_default()
                    .to_owned(),
                tax: coerce::parse_float(field("tax")),
                amount: coerce::parse_float(field("amount")),
                gross: coerce::parse_float(field("gross")),
            },
        })
    }
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct PaymentList {
    #[serde(deserialize_with = "coerce::list")]
    payment: Vec<Payment>,
}

impl Operation for GetPayments {
    type Output = Vec<Payment>;
    const ENDPOINT: &'static Endpoint = &PAYMENTS_GET;

    fn encode(&self) -> Form {
        let mut form = Form::new(&[]);
        form.set_opt("s_from", self.from);
        form.set_opt("s_till", self.till);
        form.set_opt_bool("s_completed", self.completed);
        form.set_opt("s_paymenttype", self.payment_type.map(|kind| kind.as_str()));
        form.extend(&self.extra);
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        let list: PaymentList = section(root, &["payments"])?;
        Ok(list.payment)
    }
}

impl Operation for UseVoucher {
    type Output = VoucherUseResponse;
    const ENDPOINT: &'static Endpoint = &VOUCHER_USE;

    fn encode(&self) -> Form {
        let mut form = Form::new(&["voucher_number"]);
        form.set("voucher_number", self.voucher_number());
        form.set_opt("user_id", self.user_id());
        form
    }

    fn decode(root: &XmlNode) -> Result<Self::Output, DecodeError> {
        section(root, &["status"])
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{doc, failure_code, pairs};
    use super::*;
    use crate::domain::{PaymentOptions, PaymentType};

    #[test]
    fn login_sends_its_own_credentials() {
        let form = UserLogin::new("alice", "secret").unwrap().encode();
        assert_eq!(pairs(&form), vec![("u", "alice"), ("p", "secret")]);
        assert_eq!(form.hash_keys("admin"), &["u", "p"]);
    }

    #[test]
    fn login_decodes_action_with_defaults() {
        let root = doc(
            "<page><action><name>login</name><status>ok</status><user_id>7</user_id></action></page>",
        );
        let response = UserLogin::decode(&root).unwrap();
        assert_eq!(response.status_message, "Successfully logged in");
        assert_eq!(response.user_id, Some(7));
        assert_eq!(UserLogin::failure(&root), None);
    }

    #[test]
    fn login_without_action_is_a_decode_error() {
        let root = doc("<page><something/></page>");
        assert!(matches!(
            UserLogin::decode(&root),
            Err(DecodeError::MissingElement("action"))
        ));
    }

    #[test]
    fn failed_login_carries_status_message() {
        let root = doc(
            "<page><action><name>login</name><status>failed</status>\
             <status_message>Wrong password</status_message></action></page>",
        );
        let failure = UserLogin::failure(&root).unwrap();
        assert_eq!(failure.error, "Wrong password");
        assert_eq!(failure.code, Some(KnownApiError::LoginFailed));

        let root = doc("<page><action><status>failed</status></action></page>");
        assert_eq!(UserLogin::failure(&root).unwrap().error, "Login failed");
    }

    #[test]
    fn failed_logout_is_reported() {
        let root = doc("<page><action><name>logout</name><status>failed</status></action></page>");
        let failure = UserLogout::failure(&root).unwrap();
        assert_eq!(failure.error, "Logout failed");
        assert_eq!(failure.code, Some(KnownApiError::LogoutFailed));
    }

    #[test]
    fn balance_update_reads_user_block() {
        let root = doc(
            "<page><status>ok</status><user><username>bob</username><id>4</id>\
             <balance>10.50</balance></user></page>",
        );
        let response = UpdateUserBalance::decode(&root).unwrap();
        assert_eq!(response.username, "bob");
        assert_eq!(response.user_id, 4);
        assert_eq!(response.balance, 10.5);
    }

    #[test]
    fn simple_balance_reads_root_text() {
        let root = doc("<page>42.75</page>");
        assert_eq!(GetSimpleBalance::decode(&root).unwrap(), 42.75);
    }

    #[test]
    fn password_lookup_moves_password_into_path() {
        let form = GetUserBalanceByPassword::new("pw").unwrap().encode();
        assert_eq!(form.path_segment(), Some("pw"));
        assert!(form.params().is_empty());
    }

    #[test]
    fn payment_create_encodes_options() {
        let options = PaymentOptions {
            payment_type: Some(PaymentType::Manual),
            tax_in_amount: Some(true),
            ..PaymentOptions::default()
        };
        let form = CreatePayment::new(5, "EUR", 20.0, options).unwrap().encode();
        assert_eq!(
            pairs(&form),
            vec![
                ("user_id", "5"),
                ("p_currency", "EUR"),
                ("amount", "20"),
                ("paymenttype", "manual"),
                ("tax_in_amount", "1"),
            ]
        );
    }

    #[test]
    fn payment_create_reads_currency_attribute() {
        let root = doc(
            "<page><response><status>ok</status><confirmed>Yes</confirmed>\
             <payment currency=\"EUR\"><payment_id>91</payment_id><tax>2</tax>\
             <amount>10</amount><gross>12</gross></payment></response></page>",
        );
        let created = CreatePayment::decode(&root).unwrap();
        assert!(created.confirmed);
        assert_eq!(created.payment.id, 91);
        assert_eq!(created.payment.currency, "EUR");
        assert_eq!(created.payment.gross, 12.0);
    }

    #[test]
    fn payments_list_handles_single_and_missing() {
        let root = doc(
            "<page><payments><payment><user>bob</user><amount>5</amount>\
             <completed>1</completed><confirmed_by_admin>0</confirmed_by_admin>\
             </payment></payments></page>",
        );
        let payments = GetPayments::decode(&root).unwrap();
        assert_eq!(payments.len(), 1);
        assert!(payments[0].completed);
        assert!(!payments[0].confirmed_by_admin);

        let root = doc("<page><payments/></page>");
        assert!(GetPayments::decode(&root).unwrap().is_empty());
    }

    #[test]
    fn payment_errors_are_classified() {
        assert_eq!(
            failure_code::<CreatePayment>(
                "<page><error>Payment was not saved</error><message>amount too low</message></page>"
            ),
            Some(KnownApiError::PaymentNotSaved)
        );
        let root = doc(
            "<page><error>Payment was not saved</error><message>amount too low</message></page>",
        );
        assert_eq!(
            CreatePayment::failure(&root).unwrap().message.as_deref(),
            Some("amount too low")
        );
    }

    #[test]
    fn voucher_use_reads_status_block() {
        let root = doc(
            "<page><status><status>ok</status><voucher_number>123</voucher_number>\
             <voucher_id>3</voucher_id><credit_with_tax>12.1</credit_with_tax>\
             <user_id>2</user_id></status></page>",
        );
        let response = UseVoucher::decode(&root).unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.voucher_id, 3);
        assert_eq!(response.credit_with_tax, 12.1);
        assert_eq!(
            failure_code::<UseVoucher>("<page><error>Vouchers Disabled</error></page>"),
            Some(KnownApiError::VouchersDisabled)
        );
    }
}
