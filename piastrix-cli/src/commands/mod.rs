//! Subcommand implementations and shared helpers.

pub mod bill;
pub mod callback;
pub mod invoice;
pub mod pay;
pub mod status;
pub mod transfer;
pub mod withdraw;

use std::path::Path;

use anyhow::Context;
use piastrix::{ClientConfig, GatewayResponse, PiastrixClient, SecretKey, fields::FieldMap};
use serde_json::Value;
use tracing::debug;

use crate::GlobalArgs;

/// Loads the client configuration and builds a client.
pub fn load_client(global: &GlobalArgs) -> anyhow::Result<PiastrixClient> {
    let secret = global.secret_key.clone().map(SecretKey::new);
    let config = ClientConfig::from_file_with_secret(&global.config, secret)
        .with_context(|| format!("loading {}", global.config.display()))?;
    debug!(shop_id = config.shop_id, base_url = %config.base_url, "configuration loaded");

    Ok(PiastrixClient::new(config)?)
}

/// Prints a gateway response body to stdout, pretty-printed when it is JSON.
pub fn print_response(response: &GatewayResponse) -> anyhow::Result<()> {
    match response.json::<Value>() {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{}", String::from_utf8_lossy(&response.body)),
    }
    Ok(())
}

/// Parses repeated `key=value` arguments into extra fields.
///
/// Returns `None` when no pairs were given.
pub fn parse_extra_fields(pairs: &[String]) -> anyhow::Result<Option<FieldMap>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut fields = FieldMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("extra field '{pair}' is not in key=value form"))?;
        fields.insert(key.to_owned(), Value::String(value.to_owned()));
    }
    Ok(Some(fields))
}

/// Reads a JSON argument given inline or as a path to a file.
pub fn read_json_arg(arg: &str) -> anyhow::Result<Value> {
    let text = if Path::new(arg).exists() {
        std::fs::read_to_string(arg)
            .with_context(|| format!("reading {arg}"))?
    } else {
        arg.to_owned()
    };
    serde_json::from_str(&text).context("invalid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra_fields() {
        assert!(parse_extra_fields(&[]).unwrap().is_none());

        let pairs = [
            "description=Order 1".to_owned(),
            "success_url=https://a/?x=1".to_owned(),
        ];
        let fields = parse_extra_fields(&pairs).unwrap().unwrap();
        assert_eq!(fields["description"], "Order 1");
        assert_eq!(fields["success_url"], "https://a/?x=1");

        assert!(parse_extra_fields(&["novalue".to_owned()]).is_err());
    }

    #[test]
    fn test_read_json_arg_inline() {
        assert_eq!(read_json_arg(r#"{"a":1}"#).unwrap()["a"], 1);
        assert!(read_json_arg("{not json").is_err());
    }
}
