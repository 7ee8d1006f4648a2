//! Error kinds and their stable codes.
//!
//! Nothing here reaches the network: every error below is raised before a
//! request would be sent.
//!
//! ```bash
//! cargo run --example error_handling
//! ```

#![allow(clippy::print_stdout, reason = "examples are allowed to use println")]

use piastrix::{
    ClientConfig, Language, PiastrixClient, PiastrixError, SecretKey, WithdrawAmountType,
    fields::FieldMap, request::BillRequest,
};
use rust_decimal::Decimal;
use serde_json::json;

fn report(label: &str, err: &PiastrixError) {
    match err.code() {
        Some(code) => println!("{label}: [{code}] {err}"),
        None => println!("{label}: {err}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = "de".parse::<Language>() {
        report("language", &e);
    }

    if let Err(e) = "bogus".parse::<WithdrawAmountType>() {
        report("amount type", &e);
    }

    let config = ClientConfig::new(112, SecretKey::new("k")).with_timeout_secs(0);
    if let Err(e) = config.validate() {
        report("config", &e);
    }

    let config = ClientConfig::new(112, SecretKey::new("SecretKey01"));
    let client = PiastrixClient::new(config)?;
    let mut extra = FieldMap::new();
    extra.insert("shop_id".to_owned(), json!(1));
    let request = BillRequest::new(643, Decimal::ONE_HUNDRED, 643, "order-1")
        .with_extra_fields(extra);
    if let Err(e) = client.bill(request).await {
        report("extra fields", &e);
    }

    let (payload, peer, amount) = (FieldMap::new(), "not-an-ip", Decimal::ONE);
    if let Err(e) = client.verify_callback_from(payload, peer, amount, 643) {
        report("callback", &e);
    }

    Ok(())
}
