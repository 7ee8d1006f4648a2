//! Integration tests for the HTTP client against a mock gateway.

use piastrix::{
    ClientConfig, ErrorCode, PiastrixClient, PiastrixError, SecretKey, TransferAmountType,
    WithdrawAmountType,
    fields::FieldMap,
    operation::Operation,
    request::{BillRequest, TransferRequest, WithdrawRequest},
    sign::CanonicalSigner,
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const SECRET: &str = "SecretKey01";

fn client_for(server: &MockServer) -> PiastrixClient {
    let config = ClientConfig::new(112, SecretKey::new(SECRET))
        .with_base_url(server.uri())
        .with_timeout_secs(5);
    PiastrixClient::new(config).expect("valid config")
}

fn ok_response() -> ResponseTemplate {
    let body = json!({"result": true});
    ResponseTemplate::new(200).set_body_json(body)
}

async fn last_body(server: &MockServer) -> FieldMap {
    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    let request = requests.last().expect("at least one request");
    serde_json::from_slice(&request.body).expect("JSON body")
}

/// Removes `sign` from `sent` and checks it against a fresh signature.
fn assert_signature(mut sent: FieldMap, operation: Operation) {
    let claimed = sent.remove("sign").expect("signed");
    let signer = CanonicalSigner::new(SecretKey::new(SECRET));
    let expected = signer
        .compute_signature(&sent, operation.signed_fields())
        .unwrap();
    assert_eq!(claimed, expected.as_str());
}

#[tokio::test]
async fn test_bill_posts_signed_json() {
    let server = MockServer::start().await;
    let expected = json!({"shop_id": 112, "shop_order_id": "101"});
    let bill_created = json!({
        "data": {"id": 25, "url": "https://wallet.piastrix.com/ru/bill/pay/25"},
        "error_code": 0,
        "message": "Ok",
        "result": true
    });

    Mock::given(method("POST"))
        .and(path("/bill/create"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(bill_created))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = BillRequest::new(643, dec!(10.50), 643, "101");
    let response = client.bill(request).await.expect("bill succeeds");

    assert_eq!(response.status, 200);
    let body: Value = response.json().expect("JSON response");
    assert_eq!(body["data"]["id"], 25);

    let sent = last_body(&server).await;
    // sha256("643:10.5:643:112:101" + secret)
    assert_eq!(
        sent["sign"],
        "01c75afc0af5c7c5367019f8839014bfd791064c9825a2ba1f4eb722bd7e7051"
    );
    assert_eq!(sent["shop_amount"], json!(10.5));
}

#[tokio::test]
async fn test_status_lookup_signs_timestamp() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/withdraw/shop_payment_status"))
        .respond_with(ok_response())
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .shop_payment_status("w-1")
        .await
        .expect("lookup succeeds");

    let sent = last_body(&server).await;
    assert!(sent["now"].is_string());
    assert_signature(sent, Operation::ShopPaymentStatus);
}

#[tokio::test]
async fn test_transfer_extra_fields_are_sent_unsigned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transfer/create"))
        .respond_with(ok_response())
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut extra = FieldMap::new();
    extra.insert("description".to_owned(), json!("Payout for May"));

    let amount_type = TransferAmountType::WriteoffAmount;
    let payee = "payee@example.com";
    let request = TransferRequest::new(dec!(5), amount_type, payee, 643, 643, "t-7")
        .with_extra_fields(extra);
    client.transfer(request).await.expect("transfer succeeds");

    let mut sent = last_body(&server).await;
    assert_eq!(sent["description"], "Payout for May");

    // Changing the unsigned field leaves the signature valid.
    sent.insert("description".to_owned(), json!("edited"));
    assert_signature(sent, Operation::Transfer);
}

#[tokio::test]
async fn test_non_success_status_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shop_balance"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.shop_balance().await.expect_err("500 is an error");

    match err {
        PiastrixError::Http(inner) => assert_eq!(inner.status().map(|s| s.as_u16()), Some(500)),
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_collision_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut extra = FieldMap::new();
    extra.insert("amount".to_owned(), json!(1_000_000));

    let amount_type = WithdrawAmountType::PsAmount;
    let request = WithdrawRequest::new("acc", dec!(1), amount_type, "card", 643, "w-2")
        .with_extra_fields(extra);
    let err = client.withdraw(request).await.expect_err("collision");

    assert_eq!(err.code(), Some(ErrorCode::ExtraFields));
}
