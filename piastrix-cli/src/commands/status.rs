//! Status lookups.

use clap::Args;
use piastrix::PiastrixClient;

use super::print_response;

#[derive(Args, Debug)]
pub struct ShopPaymentIdArgs {
    /// Payment identifier on the shop side.
    pub shop_payment_id: String,
}

#[derive(Args, Debug)]
pub struct WithdrawIdArgs {
    /// Withdrawal identifier assigned by the gateway.
    pub withdraw_id: u64,
}

pub async fn run_transfer(client: &PiastrixClient, args: &ShopPaymentIdArgs) -> anyhow::Result<()> {
    print_response(&client.transfer_status(&args.shop_payment_id).await?)
}

pub async fn run_shop_payment(
    client: &PiastrixClient,
    args: &ShopPaymentIdArgs,
) -> anyhow::Result<()> {
    print_response(&client.shop_payment_status(&args.shop_payment_id).await?)
}

pub async fn run_withdraw(client: &PiastrixClient, args: &WithdrawIdArgs) -> anyhow::Result<()> {
    print_response(&client.withdraw_status(args.withdraw_id).await?)
}
