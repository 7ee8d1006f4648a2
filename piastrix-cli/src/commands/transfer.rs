//! `piastrix transfer`: transfer funds to a Piastrix wallet.

use clap::Args;
use piastrix::{PiastrixClient, TransferAmountType, request::TransferRequest};
use rust_decimal::Decimal;

use super::{parse_extra_fields, print_response};

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Amount, interpreted according to --amount-type.
    #[arg(long)]
    pub amount: Decimal,

    /// `receive_amount` or `writeoff_amount`.
    #[arg(long)]
    pub amount_type: TransferAmountType,

    /// Payee wallet number or e-mail.
    #[arg(long)]
    pub payee_account: String,

    /// Currency the payee receives (ISO 4217 numeric).
    #[arg(long)]
    pub payee_currency: u32,

    /// Currency written off the shop balance (ISO 4217 numeric).
    #[arg(long)]
    pub shop_currency: u32,

    /// Unique payment identifier on the shop side.
    #[arg(long)]
    pub shop_payment_id: String,

    /// Extra unsigned field as key=value; repeatable.
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,
}

pub async fn run(client: &PiastrixClient, args: &TransferArgs) -> anyhow::Result<()> {
    let mut request = TransferRequest::new(
        args.amount,
        args.amount_type,
        args.payee_account.as_str(),
        args.payee_currency,
        args.shop_currency,
        &args.shop_payment_id,
    );
    request.extra_fields = parse_extra_fields(&args.extra)?;

    print_response(&client.transfer(request).await?)
}
