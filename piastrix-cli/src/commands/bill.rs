//! `piastrix bill`: create a bill in the shop's currency.

use clap::Args;
use piastrix::{PiastrixClient, request::BillRequest};
use rust_decimal::Decimal;

use super::{parse_extra_fields, print_response};

#[derive(Args, Debug)]
pub struct BillArgs {
    /// Currency the payer pays in (ISO 4217 numeric, e.g. 643).
    #[arg(long)]
    pub payer_currency: u32,

    /// Amount the shop receives.
    #[arg(long)]
    pub shop_amount: Decimal,

    /// Currency of the shop amount (ISO 4217 numeric).
    #[arg(long)]
    pub shop_currency: u32,

    /// Order identifier on the shop side.
    #[arg(long)]
    pub shop_order_id: String,

    /// Extra unsigned field as key=value; repeatable.
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,
}

pub async fn run(client: &PiastrixClient, args: &BillArgs) -> anyhow::Result<()> {
    let mut request = BillRequest::new(
        args.payer_currency,
        args.shop_amount,
        args.shop_currency,
        &args.shop_order_id,
    );
    request.extra_fields = parse_extra_fields(&args.extra)?;

    print_response(&client.bill(request).await?)
}
