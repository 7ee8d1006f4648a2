//! Closed argument types validated at the API boundary.
//!
//! Amount types and payment page languages are parsed into enums before any
//! field map is built, so an unsupported value never reaches the signer.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{PiastrixError, Result};

/// Host serving the hosted payment page.
pub const PAY_BASE_URL: &str = "https://pay.piastrix.com";

/// How a transfer amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferAmountType {
    /// Amount the payee receives.
    ReceiveAmount,
    /// Amount written off the shop balance.
    WriteoffAmount,
}

impl TransferAmountType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReceiveAmount => "receive_amount",
            Self::WriteoffAmount => "writeoff_amount",
        }
    }
}

impl FromStr for TransferAmountType {
    type Err = PiastrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "receive_amount" => Ok(Self::ReceiveAmount),
            "writeoff_amount" => Ok(Self::WriteoffAmount),
            other => Err(PiastrixError::InvalidAmountType(other.to_owned())),
        }
    }
}

impl fmt::Display for TransferAmountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a withdrawal amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawAmountType {
    /// Amount in the payment system's currency.
    PsAmount,
    /// Amount in the shop's currency.
    ShopAmount,
}

impl WithdrawAmountType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PsAmount => "ps_amount",
            Self::ShopAmount => "shop_amount",
        }
    }
}

impl FromStr for WithdrawAmountType {
    type Err = PiastrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ps_amount" => Ok(Self::PsAmount),
            "shop_amount" => Ok(Self::ShopAmount),
            other => Err(PiastrixError::InvalidAmountType(other.to_owned())),
        }
    }
}

impl fmt::Display for WithdrawAmountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the hosted payment page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Russian.
    #[default]
    Ru,
    /// English.
    En,
}

impl Language {
    /// Returns the language code used in the payment page URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Returns the payment page URL for this language.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::Language;
    ///
    /// assert_eq!(Language::En.pay_url(), "https://pay.piastrix.com/en/pay");
    /// ```
    #[must_use]
    pub fn pay_url(self) -> String {
        format!("{PAY_BASE_URL}/{}/pay", self.as_str())
    }
}

impl FromStr for Language {
    type Err = PiastrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            other => Err(PiastrixError::InvalidLanguage(other.to_owned())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts an amount into the JSON number that is signed and sent.
///
/// Trailing zeros are dropped, so `10.50` and `10.5` produce the same value.
///
/// # Errors
///
/// Returns [`PiastrixError::InvalidAmount`] if the decimal has no JSON number
/// form.
///
/// # Examples
///
/// ```
/// use piastrix::types::amount_value;
/// use rust_decimal::Decimal;
///
/// let value = amount_value(Decimal::new(1050, 2)).unwrap();
/// assert_eq!(value.to_string(), "10.5");
/// ```
pub fn amount_value(amount: Decimal) -> Result<Value> {
    let text = amount.normalize().to_string();
    let number: Number = text
        .parse()
        .map_err(|_| PiastrixError::InvalidAmount(text.clone()))?;
    Ok(Value::Number(number))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_transfer_amount_type_parse() {
        let parse = |s: &str| s.parse::<TransferAmountType>();
        assert_eq!(
            parse("receive_amount").unwrap(),
            TransferAmountType::ReceiveAmount
        );
        assert_eq!(
            parse("writeoff_amount").unwrap(),
            TransferAmountType::WriteoffAmount
        );

        let err = parse("bogus").unwrap_err();
        assert!(
            matches!(err, PiastrixError::InvalidAmountType(ref v) if v == "bogus")
        );
    }

    #[test]
    fn test_withdraw_amount_type_parse() {
        let parse = |s: &str| s.parse::<WithdrawAmountType>();
        assert_eq!(parse("ps_amount").unwrap(), WithdrawAmountType::PsAmount);
        assert_eq!(
            parse("shop_amount").unwrap(),
            WithdrawAmountType::ShopAmount
        );

        // Transfer values are not valid for withdrawals.
        assert!(parse("receive_amount").is_err());
    }

    #[test]
    fn test_amount_type_display_matches_wire_value() {
        let writeoff = TransferAmountType::WriteoffAmount;
        assert_eq!(writeoff.to_string(), "writeoff_amount");
        assert_eq!(WithdrawAmountType::PsAmount.to_string(), "ps_amount");

        let json = serde_json::to_value(WithdrawAmountType::ShopAmount);
        assert_eq!(json.unwrap(), "shop_amount");
    }

    #[test]
    fn test_language() {
        assert_eq!(Language::default(), Language::Ru);
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(Language::Ru.pay_url(), "https://pay.piastrix.com/ru/pay");

        let err = "EN".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "EN is not valid language");
    }

    #[test]
    fn test_amount_value_normalizes() {
        assert_eq!(amount_value(dec!(10.50)).unwrap().to_string(), "10.5");
        assert_eq!(amount_value(dec!(100)).unwrap().to_string(), "100");
        assert_eq!(amount_value(dec!(100.00)).unwrap().to_string(), "100");
        assert_eq!(amount_value(dec!(0.01)).unwrap().to_string(), "0.01");
        assert_eq!(amount_value(dec!(-5.5)).unwrap().to_string(), "-5.5");
    }
}
