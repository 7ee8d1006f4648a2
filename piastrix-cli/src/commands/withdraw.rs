//! `piastrix withdraw`, `withdraw-try` and `check-account`.

use clap::Args;
use piastrix::{
    PiastrixClient, WithdrawAmountType,
    request::{CheckAccountRequest, WithdrawRequest, WithdrawTryRequest},
};
use rust_decimal::Decimal;
use serde_json::Value;

use super::{parse_extra_fields, print_response, read_json_arg};

#[derive(Args, Debug)]
pub struct WithdrawTryArgs {
    /// Amount, interpreted according to --amount-type.
    #[arg(long)]
    pub amount: Decimal,

    /// `ps_amount` or `shop_amount`.
    #[arg(long)]
    pub amount_type: WithdrawAmountType,

    /// Payout method identifier.
    #[arg(long)]
    pub payway: String,

    /// Shop balance currency (ISO 4217 numeric).
    #[arg(long)]
    pub shop_currency: u32,
}

#[derive(Args, Debug)]
pub struct WithdrawArgs {
    /// Payee account in the payment system.
    #[arg(long)]
    pub account: String,

    #[command(flatten)]
    pub quote: WithdrawTryArgs,

    /// Unique payment identifier on the shop side.
    #[arg(long)]
    pub shop_payment_id: String,

    /// Payout-method specific account data as JSON or a path to a JSON file.
    #[arg(long)]
    pub account_details: Option<String>,

    /// Extra unsigned field as key=value; repeatable.
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CheckAccountArgs {
    /// Payee account in the payment system.
    #[arg(long)]
    pub account: String,

    /// Amount of the intended payout.
    #[arg(long)]
    pub amount: Decimal,

    /// Payout method identifier.
    #[arg(long)]
    pub payway: String,

    /// Payout-method specific account data as JSON or a path to a JSON file.
    #[arg(long)]
    pub account_details: Option<String>,
}

fn read_account_details(arg: Option<&str>) -> anyhow::Result<Option<Value>> {
    arg.map(read_json_arg).transpose()
}

pub async fn run_try(client: &PiastrixClient, args: &WithdrawTryArgs) -> anyhow::Result<()> {
    let request = WithdrawTryRequest::new(
        args.amount,
        args.amount_type,
        &args.payway,
        args.shop_currency,
    );
    print_response(&client.withdraw_try(request).await?)
}

pub async fn run(client: &PiastrixClient, args: &WithdrawArgs) -> anyhow::Result<()> {
    let mut request = WithdrawRequest::new(
        args.account.as_str(),
        args.quote.amount,
        args.quote.amount_type,
        &args.quote.payway,
        args.quote.shop_currency,
        &args.shop_payment_id,
    );
    request.account_details = read_account_details(args.account_details.as_deref())?;
    request.extra_fields = parse_extra_fields(&args.extra)?;

    print_response(&client.withdraw(request).await?)
}

pub async fn run_check_account(
    client: &PiastrixClient,
    args: &CheckAccountArgs,
) -> anyhow::Result<()> {
    let mut request = CheckAccountRequest::new(args.account.as_str(), args.amount, &args.payway);
    request.account_details = read_account_details(args.account_details.as_deref())?;

    print_response(&client.check_account(request).await?)
}
