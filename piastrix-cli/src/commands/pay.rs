//! `piastrix pay`: build a signed payment page form.

use clap::Args;
use piastrix::{Language, PiastrixClient, request::PayRequest};
use rust_decimal::Decimal;
use serde_json::json;

use super::parse_extra_fields;

#[derive(Args, Debug)]
pub struct PayArgs {
    /// Payment amount.
    #[arg(long)]
    pub amount: Decimal,

    /// Currency of the amount (ISO 4217 numeric).
    #[arg(long)]
    pub currency: u32,

    /// Order identifier on the shop side.
    #[arg(long)]
    pub shop_order_id: String,

    /// Payment page language: `ru` or `en`.
    #[arg(long, default_value_t = Language::Ru)]
    pub lang: Language,

    /// Extra unsigned form field as key=value; repeatable.
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,
}

/// Prints the form action URL and fields as JSON.
pub fn run(client: &PiastrixClient, args: &PayArgs) -> anyhow::Result<()> {
    let mut request = PayRequest::new(args.amount, args.currency, &args.shop_order_id)
        .with_language(args.lang);
    request.extra_fields = parse_extra_fields(&args.extra)?;

    let form = client.pay(request)?;
    let output = json!({"url": form.url, "fields": form.fields});
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
