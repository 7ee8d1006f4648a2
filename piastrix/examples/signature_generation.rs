//! Offline request signing and callback verification.
//!
//! Builds a signed payment page form, then plays the gateway's part by
//! signing a callback and verifying it the way a merchant backend would.
//!
//! # Running this example
//!
//! ```bash
//! export PIASTRIX_SECRET_KEY=SecretKey01
//! cargo run --example signature_generation
//! ```

#![allow(clippy::print_stdout, reason = "examples are allowed to use println")]

use std::{env, net::IpAddr};

use piastrix::{
    ClientConfig, Language, PiastrixClient, SecretKey,
    fields::{FieldMap, is_empty_value},
    request::PayRequest,
    sign::CALLBACK_ALLOWED_IPS,
};
use rust_decimal::Decimal;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let secret = env::var("PIASTRIX_SECRET_KEY")
        .map_err(|_| "PIASTRIX_SECRET_KEY environment variable not set")?;
    let config = ClientConfig::new(112, SecretKey::new(secret));
    let client = PiastrixClient::new(config)?;

    println!("1. Building a payment page form...");
    let amount = Decimal::new(1050, 2);
    let order = "order-101";
    let lang = Language::En;
    let request = PayRequest::new(amount, 643, order).with_language(lang);
    let form = client.pay(request)?;
    println!("   POST {}", form.url);
    for (name, value) in &form.fields {
        println!("   {name} = {value}");
    }

    println!("\n2. Simulating the gateway callback...");
    let mut callback = FieldMap::new();
    callback.insert("shop_amount".to_owned(), json!(10.5));
    callback.insert("shop_currency".to_owned(), json!(643));
    callback.insert("shop_order_id".to_owned(), json!(order));
    callback.insert("status".to_owned(), json!("success"));
    callback.insert("client_price".to_owned(), json!(""));
    let signed: Vec<String> = callback
        .iter()
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, _)| key.clone())
        .collect();
    client.sign(&mut callback, &signed)?;
    println!("   sign = {}", callback["sign"]);

    println!("\n3. Verifying the callback...");
    let gateway = IpAddr::V4(CALLBACK_ALLOWED_IPS[0]);
    let payload = callback.clone();
    client.verify_callback(payload, gateway, amount, 643)?;
    println!("   ✓ accepted from {gateway}");

    let stranger: IpAddr = "203.0.113.7".parse()?;
    match client.verify_callback(callback, stranger, amount, 643) {
        Ok(()) => println!("   unexpected: accepted from {stranger}"),
        Err(e) => println!("   ✓ rejected from {stranger}: {e}"),
    }

    Ok(())
}
