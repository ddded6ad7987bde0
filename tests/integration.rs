use kolmisoft::domain::{
    GetNumberPools, GetUserBalance, RawPhoneNumber, RemovePoolNumbers, SendSms, UserLogin,
};
use kolmisoft::{Config, KnownApiError, KolmisoftClient, KolmisoftError};
use mockito::{Matcher, Server};
use sha1::{Digest, Sha1};

fn sha1_hex(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

fn test_client(server_url: String) -> KolmisoftClient {
    let config =
        Config::new(format!("{server_url}/billing"), "admin", "S3cr3t").with_password("pw");
    KolmisoftClient::new(config).expect("failed to build client")
}

fn xml_mock(server: &mut mockito::ServerGuard, path: &str) -> mockito::Mock {
    server
        .mock("POST", path)
        .match_header("Content-Type", "application/x-www-form-urlencoded")
        .with_status(200)
        .with_header("Content-Type", "application/xml")
}

#[tokio::test]
async fn balance_request_is_signed_and_decoded() {
    let mut server = Server::new_async().await;

    let mock = xml_mock(&mut server, "/billing/api/user_balance_get")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("u".into(), "admin".into()),
            Matcher::UrlEncoded("p".into(), "pw".into()),
            Matcher::UrlEncoded("username".into(), "alice".into()),
            Matcher::UrlEncoded("currency".into(), "USD".into()),
            Matcher::UrlEncoded("hash".into(), sha1_hex("aliceUSDS3cr3t")),
        ]))
        .with_body("<?xml version=\"1.0\"?>\n<page><balance>12.5</balance></page>")
        .create_async()
        .await;

    let client = test_client(server.url());
    let balance = client
        .get_user_balance(GetUserBalance::new("alice").unwrap().with_currency("USD"))
        .await
        .expect("balance lookup should succeed");

    assert_eq!(balance, 12.5);
    mock.assert_async().await;
}

#[tokio::test]
async fn documented_error_string_maps_to_code() {
    let mut server = Server::new_async().await;

    let mock = xml_mock(&mut server, "/billing/api/user_balance_get")
        .with_body("<page><error>User was not found</error></page>")
        .create_async()
        .await;

    let client = test_client(server.url());
    let err = client
        .get_user_balance(GetUserBalance::new("ghost").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.api_code(), Some(KnownApiError::UserNotFound));
    assert_eq!(err.api_error(), Some("User was not found"));
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_status_keeps_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/billing/api/user_balance_get")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let client = test_client(server.url());
    let err = client
        .get_user_balance(GetUserBalance::new("alice").unwrap())
        .await
        .unwrap_err();

    match err {
        KolmisoftError::HttpStatus { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body.as_deref(), Some("bad gateway"));
        }
        other => panic!("expected HttpStatus, got: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn html_body_is_a_parse_error() {
    let mut server = Server::new_async().await;

    let _mock = xml_mock(&mut server, "/billing/api/user_balance_get")
        .with_body("<html><body>maintenance")
        .create_async()
        .await;

    let client = test_client(server.url());
    let err = client
        .get_user_balance(GetUserBalance::new("alice").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, KolmisoftError::Parse { ref body, .. } if body.contains("maintenance")));
}

#[tokio::test]
async fn login_reports_failed_status() {
    let mut server = Server::new_async().await;

    let mock = xml_mock(&mut server, "/billing/api/user_login")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("u".into(), "bob".into()),
            Matcher::UrlEncoded("p".into(), "wrong".into()),
        ]))
        .with_body(
            "<page><action><name>user_login</name><status>failed</status>\
             <status_message>Bad login</status_message></action></page>",
        )
        .create_async()
        .await;

    let client = test_client(server.url());
    let err = client
        .user_login(UserLogin::new("bob", "wrong").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.api_code(), Some(KnownApiError::LoginFailed));
    mock.assert_async().await;
}

#[tokio::test]
async fn sms_text_travels_percent_encoded() {
    let mut server = Server::new_async().await;

    let mock = xml_mock(&mut server, "/billing/api/sms_send")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("lcr_id".into(), "3".into()),
            Matcher::UrlEncoded("dst".into(), "37060000000".into()),
            Matcher::UrlEncoded("message".into(), "hi+there".into()),
            Matcher::UrlEncoded("hash".into(), sha1_hex("337060000000MORhi+thereS3cr3t")),
        ]))
        .with_body(
            "<page><response><status>ok</status><message><message_id>77</message_id>\
             <price>0.04</price><currency>EUR</currency></message></response></page>",
        )
        .create_async()
        .await;

    let client = test_client(server.url());
    let request = SendSms::new(
        3,
        RawPhoneNumber::new("37060000000").unwrap(),
        "MOR",
        "hi there",
    )
    .unwrap();
    let sent = client.send_sms(request).await.expect("sms should be accepted");

    assert_eq!(sent.message_id, "77");
    assert_eq!(sent.currency, "EUR");
    mock.assert_async().await;
}

#[tokio::test]
async fn number_pools_are_listed() {
    let mut server = Server::new_async().await;

    let mock = xml_mock(&mut server, "/billing/api/number_pools_get")
        .with_body(
            "<page><status><number_pools>\
             <number_pool><id>1</id><name>Main</name><comment/><owner_id>0</owner_id></number_pool>\
             </number_pools></status></page>",
        )
        .create_async()
        .await;

    let client = test_client(server.url());
    let pools = client.get_number_pools(GetNumberPools::all()).await.unwrap();

    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].name, "Main");
    assert_eq!(pools[0].comment, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn invalid_request_never_reaches_server() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = RemovePoolNumbers::matching(1, Vec::new(), Vec::<String>::new());
    assert!(result.is_err());

    let err: KolmisoftError = result.unwrap_err().into();
    assert!(matches!(err, KolmisoftError::Validation(_)));
    mock.assert_async().await;
}
