//! Piastrix CLI: drive the Piastrix gateway from the command line.
//!
//! Subcommands: balance, bill, invoice-try, invoice, transfer,
//! transfer-status, withdraw-try, withdraw, check-account, withdraw-status,
//! shop-payment-status, pay, verify-callback.

mod commands;
mod observability;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    commands::{bill, callback, invoice, pay, status, transfer, withdraw},
    observability::{LogFormat, init_observability},
};

/// Piastrix payment gateway client.
#[derive(Parser, Debug)]
#[command(name = "piastrix", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    /// Path to the TOML client configuration.
    #[arg(
        short,
        long,
        env = "PIASTRIX_CONFIG",
        default_value = "piastrix.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Shared secret; overrides `secret_key` from the config file.
    #[arg(
        long,
        env = "PIASTRIX_SECRET_KEY",
        hide_env_values = true,
        global = true
    )]
    pub secret_key: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the shop balances.
    Balance,
    /// Create a bill in the shop's currency.
    Bill(bill::BillArgs),
    /// Calculate an invoice in advance.
    InvoiceTry(invoice::InvoiceArgs),
    /// Create an invoice in another currency.
    Invoice(invoice::InvoiceArgs),
    /// Transfer funds to a Piastrix wallet.
    Transfer(transfer::TransferArgs),
    /// Look up a transfer by shop payment ID.
    TransferStatus(status::ShopPaymentIdArgs),
    /// Calculate a withdrawal in advance.
    WithdrawTry(withdraw::WithdrawTryArgs),
    /// Withdraw funds to an external payment system.
    Withdraw(withdraw::WithdrawArgs),
    /// Check a payee account before withdrawing.
    CheckAccount(withdraw::CheckAccountArgs),
    /// Look up a withdrawal by gateway withdrawal ID.
    WithdrawStatus(status::WithdrawIdArgs),
    /// Look up a withdrawal by shop payment ID.
    ShopPaymentStatus(status::ShopPaymentIdArgs),
    /// Build a signed payment page form.
    Pay(pay::PayArgs),
    /// Verify a bill or invoice callback payload.
    VerifyCallback(callback::VerifyCallbackArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_observability(LogFormat::from_env());

    let cli = Cli::parse();
    let client = commands::load_client(&cli.global)?;

    match &cli.command {
        Commands::Balance => commands::print_response(&client.shop_balance().await?),
        Commands::Bill(args) => bill::run(&client, args).await,
        Commands::InvoiceTry(args) => invoice::run_try(&client, args).await,
        Commands::Invoice(args) => invoice::run(&client, args).await,
        Commands::Transfer(args) => transfer::run(&client, args).await,
        Commands::TransferStatus(args) => status::run_transfer(&client, args).await,
        Commands::WithdrawTry(args) => withdraw::run_try(&client, args).await,
        Commands::Withdraw(args) => withdraw::run(&client, args).await,
        Commands::CheckAccount(args) => withdraw::run_check_account(&client, args).await,
        Commands::WithdrawStatus(args) => status::run_withdraw(&client, args).await,
        Commands::ShopPaymentStatus(args) => status::run_shop_payment(&client, args).await,
        Commands::Pay(args) => pay::run(&client, args),
        Commands::VerifyCallback(args) => callback::run(&client, args),
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, error::ErrorKind};
    use piastrix::WithdrawAmountType;

    use super::*;

    fn withdraw_try(amount_type: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([
            "piastrix",
            "withdraw-try",
            "--amount",
            "10",
            "--amount-type",
            amount_type,
            "--payway",
            "card",
            "--shop-currency",
            "643",
        ])
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_withdraw_try_parses_amount_type() {
        let cli = withdraw_try("ps_amount").unwrap();
        match cli.command {
            Commands::WithdrawTry(args) => {
                assert_eq!(args.amount_type, WithdrawAmountType::PsAmount);
                assert_eq!(args.shop_currency, 643);
            }
            other => panic!("expected withdraw-try, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_amount_type_is_rejected() {
        let err = withdraw_try("bogus").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let result = Cli::try_parse_from([
            "piastrix",
            "pay",
            "--amount",
            "1",
            "--currency",
            "643",
            "--shop-order-id",
            "o",
            "--lang",
            "de",
        ]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ValueValidation);
    }
}
