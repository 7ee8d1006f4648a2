//! `piastrix verify-callback`: check a callback payload offline.

use anyhow::Context;
use clap::Args;
use piastrix::{PiastrixClient, fields::FieldMap};
use rust_decimal::Decimal;

use super::read_json_arg;

#[derive(Args, Debug)]
pub struct VerifyCallbackArgs {
    /// Callback payload as JSON or a path to a JSON file.
    #[arg(long)]
    pub payload: String,

    /// Address the callback arrived from.
    #[arg(long)]
    pub remote_addr: String,

    /// Amount the shop expects.
    #[arg(long)]
    pub shop_amount: Decimal,

    /// Currency the shop expects (ISO 4217 numeric).
    #[arg(long)]
    pub shop_currency: u32,
}

pub fn run(client: &PiastrixClient, args: &VerifyCallbackArgs) -> anyhow::Result<()> {
    let payload = read_json_arg(&args.payload)?;
    let payload: FieldMap = serde_json::from_value(payload)
        .context("callback payload must be a JSON object")?;

    let result = client.verify_callback_from(
        payload,
        &args.remote_addr,
        args.shop_amount,
        args.shop_currency,
    );
    match result {
        Ok(()) => {
            println!("callback verified");
            Ok(())
        }
        Err(e) => {
            let Some(code) = e.code() else {
                return Err(e.into());
            };
            let message = format!("callback rejected (code {code})");
            Err(anyhow::Error::new(e).context(message))
        }
    }
}
