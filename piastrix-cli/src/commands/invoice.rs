//! `piastrix invoice` and `piastrix invoice-try`.

use clap::Args;
use piastrix::{PiastrixClient, request::InvoiceRequest};
use rust_decimal::Decimal;

use super::{parse_extra_fields, print_response};

#[derive(Args, Debug)]
pub struct InvoiceArgs {
    /// Invoice amount.
    #[arg(long)]
    pub amount: Decimal,

    /// Currency of the amount (ISO 4217 numeric).
    #[arg(long)]
    pub currency: u32,

    /// Order identifier on the shop side.
    #[arg(long)]
    pub shop_order_id: String,

    /// Payment method identifier.
    #[arg(long)]
    pub payway: String,

    /// Extra unsigned field as key=value; repeatable.
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,
}

impl InvoiceArgs {
    fn request(&self) -> anyhow::Result<InvoiceRequest> {
        let mut request = InvoiceRequest::new(
            self.amount,
            self.currency,
            &self.shop_order_id,
            &self.payway,
        );
        request.extra_fields = parse_extra_fields(&self.extra)?;
        Ok(request)
    }
}

pub async fn run(client: &PiastrixClient, args: &InvoiceArgs) -> anyhow::Result<()> {
    print_response(&client.invoice(args.request()?).await?)
}

pub async fn run_try(client: &PiastrixClient, args: &InvoiceArgs) -> anyhow::Result<()> {
    print_response(&client.invoice_try(args.request()?).await?)
}
