//! Typed request arguments.
//!
//! Each request type turns its arguments into the unsigned [`FieldMap`] for
//! one operation. Amounts become normalized JSON numbers, closed enums become
//! their wire strings, and caller-supplied extra fields go through
//! [`merge_extra_fields`] last so they can never replace a protocol field.
//! Only operations whose [`Operation::accepts_extra_fields`] is true have an
//! extra-fields builder.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    error::Result,
    fields::{FieldMap, merge_extra_fields},
    operation::Operation,
    types::{Language, TransferAmountType, WithdrawAmountType, amount_value},
};

fn insert(fields: &mut FieldMap, name: &str, value: impl Into<Value>) {
    fields.insert(name.to_owned(), value.into());
}

fn shop_fields(shop_id: u64) -> FieldMap {
    let mut fields = FieldMap::new();
    insert(&mut fields, "shop_id", shop_id);
    fields
}

fn attach_extra_fields(
    operation: Operation,
    fields: &mut FieldMap,
    extra_fields: Option<FieldMap>,
) -> Result<()> {
    debug_assert!(
        operation.accepts_extra_fields(),
        "{operation} does not take extra fields"
    );
    merge_extra_fields(fields, extra_fields)
}

/// Arguments for a bill in the shop's currency.
///
/// Useful extra fields: `description`, `payer_account`, `failed_url`,
/// `success_url`, `callback_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRequest {
    /// Currency the payer pays in (ISO 4217 numeric).
    pub payer_currency: u32,
    /// Amount the shop receives.
    pub shop_amount: Decimal,
    /// Currency of `shop_amount` (ISO 4217 numeric).
    pub shop_currency: u32,
    /// Order identifier on the shop side.
    pub shop_order_id: String,
    /// Optional unsigned fields.
    pub extra_fields: Option<FieldMap>,
}

impl BillRequest {
    /// Creates a bill request without extra fields.
    #[must_use]
    pub fn new(
        payer_currency: u32,
        shop_amount: Decimal,
        shop_currency: u32,
        shop_order_id: impl Into<String>,
    ) -> Self {
        Self {
            payer_currency,
            shop_amount,
            shop_currency,
            shop_order_id: shop_order_id.into(),
            extra_fields: None,
        }
    }

    /// Attaches extra fields.
    #[must_use]
    pub fn with_extra_fields(mut self, extra_fields: FieldMap) -> Self {
        self.extra_fields = Some(extra_fields);
        self
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "payer_currency", self.payer_currency);
        insert(&mut fields, "shop_amount", amount_value(self.shop_amount)?);
        insert(&mut fields, "shop_currency", self.shop_currency);
        insert(&mut fields, "shop_order_id", self.shop_order_id);
        attach_extra_fields(Operation::Bill, &mut fields, self.extra_fields)?;
        Ok(fields)
    }
}

/// Arguments for an invoice and its advance calculation.
///
/// Useful extra fields: `description`, `phone`, `failed_url`, `success_url`,
/// `callback_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRequest {
    /// Invoice amount.
    pub amount: Decimal,
    /// Currency of `amount` (ISO 4217 numeric).
    pub currency: u32,
    /// Order identifier on the shop side.
    pub shop_order_id: String,
    /// Payment method identifier.
    pub payway: String,
    /// Optional unsigned fields.
    pub extra_fields: Option<FieldMap>,
}

impl InvoiceRequest {
    /// Creates an invoice request without extra fields.
    #[must_use]
    pub fn new(
        amount: Decimal,
        currency: u32,
        shop_order_id: impl Into<String>,
        payway: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency,
            shop_order_id: shop_order_id.into(),
            payway: payway.into(),
            extra_fields: None,
        }
    }

    /// Attaches extra fields.
    #[must_use]
    pub fn with_extra_fields(mut self, extra_fields: FieldMap) -> Self {
        self.extra_fields = Some(extra_fields);
        self
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "amount", amount_value(self.amount)?);
        insert(&mut fields, "currency", self.currency);
        insert(&mut fields, "payway", self.payway);
        insert(&mut fields, "shop_order_id", self.shop_order_id);
        attach_extra_fields(Operation::Invoice, &mut fields, self.extra_fields)?;
        Ok(fields)
    }
}

/// Arguments for a transfer to a gateway wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Amount, interpreted according to `amount_type`.
    pub amount: Decimal,
    /// Whether `amount` is received or written off.
    pub amount_type: TransferAmountType,
    /// Wallet number or e-mail of the payee.
    pub payee_account: Value,
    /// Currency the payee receives (ISO 4217 numeric).
    pub payee_currency: u32,
    /// Currency written off the shop balance (ISO 4217 numeric).
    pub shop_currency: u32,
    /// Unique payment identifier on the shop side.
    pub shop_payment_id: String,
    /// Optional unsigned fields.
    pub extra_fields: Option<FieldMap>,
}

impl TransferRequest {
    /// Creates a transfer request without extra fields.
    #[must_use]
    pub fn new(
        amount: Decimal,
        amount_type: TransferAmountType,
        payee_account: impl Into<Value>,
        payee_currency: u32,
        shop_currency: u32,
        shop_payment_id: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            amount_type,
            payee_account: payee_account.into(),
            payee_currency,
            shop_currency,
            shop_payment_id: shop_payment_id.into(),
            extra_fields: None,
        }
    }

    /// Attaches extra fields.
    #[must_use]
    pub fn with_extra_fields(mut self, extra_fields: FieldMap) -> Self {
        self.extra_fields = Some(extra_fields);
        self
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "amount", amount_value(self.amount)?);
        insert(&mut fields, "amount_type", self.amount_type.as_str());
        insert(&mut fields, "payee_account", self.payee_account);
        insert(&mut fields, "payee_currency", self.payee_currency);
        insert(&mut fields, "shop_currency", self.shop_currency);
        insert(&mut fields, "shop_payment_id", self.shop_payment_id);
        attach_extra_fields(Operation::Transfer, &mut fields, self.extra_fields)?;
        Ok(fields)
    }
}

/// Arguments for a withdrawal advance calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawTryRequest {
    /// Amount, interpreted according to `amount_type`.
    pub amount: Decimal,
    /// Currency `amount` is expressed in.
    pub amount_type: WithdrawAmountType,
    /// Payout method identifier.
    pub payway: String,
    /// Shop balance currency (ISO 4217 numeric).
    pub shop_currency: u32,
}

impl WithdrawTryRequest {
    /// Creates a withdrawal advance calculation request.
    #[must_use]
    pub fn new(
        amount: Decimal,
        amount_type: WithdrawAmountType,
        payway: impl Into<String>,
        shop_currency: u32,
    ) -> Self {
        Self {
            amount,
            amount_type,
            payway: payway.into(),
            shop_currency,
        }
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "amount", amount_value(self.amount)?);
        insert(&mut fields, "amount_type", self.amount_type.as_str());
        insert(&mut fields, "payway", self.payway);
        insert(&mut fields, "shop_currency", self.shop_currency);
        Ok(fields)
    }
}

/// Arguments for a withdrawal to an external payment system.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawRequest {
    /// Payee account in the payment system.
    pub account: Value,
    /// Amount, interpreted according to `amount_type`.
    pub amount: Decimal,
    /// Currency `amount` is expressed in.
    pub amount_type: WithdrawAmountType,
    /// Payout method identifier.
    pub payway: String,
    /// Shop balance currency (ISO 4217 numeric).
    pub shop_currency: u32,
    /// Unique payment identifier on the shop side.
    pub shop_payment_id: String,
    /// Payout-method specific account data. Sent but not signed.
    pub account_details: Option<Value>,
    /// Optional unsigned fields.
    pub extra_fields: Option<FieldMap>,
}

impl WithdrawRequest {
    /// Creates a withdrawal request without account details or extra fields.
    #[must_use]
    pub fn new(
        account: impl Into<Value>,
        amount: Decimal,
        amount_type: WithdrawAmountType,
        payway: impl Into<String>,
        shop_currency: u32,
        shop_payment_id: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            amount,
            amount_type,
            payway: payway.into(),
            shop_currency,
            shop_payment_id: shop_payment_id.into(),
            account_details: None,
            extra_fields: None,
        }
    }

    /// Attaches payout-method specific account data.
    #[must_use]
    pub fn with_account_details(mut self, account_details: Value) -> Self {
        self.account_details = Some(account_details);
        self
    }

    /// Attaches extra fields.
    #[must_use]
    pub fn with_extra_fields(mut self, extra_fields: FieldMap) -> Self {
        self.extra_fields = Some(extra_fields);
        self
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "account", self.account);
        insert(&mut fields, "amount", amount_value(self.amount)?);
        insert(&mut fields, "amount_type", self.amount_type.as_str());
        insert(&mut fields, "payway", self.payway);
        insert(&mut fields, "shop_currency", self.shop_currency);
        insert(&mut fields, "shop_payment_id", self.shop_payment_id);
        if let Some(details) = self.account_details {
            insert(&mut fields, "account_details", details);
        }
        attach_extra_fields(Operation::Withdraw, &mut fields, self.extra_fields)?;
        Ok(fields)
    }
}

/// Arguments for a payee account check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckAccountRequest {
    /// Payee account in the payment system.
    pub account: Value,
    /// Amount of the intended payout.
    pub amount: Decimal,
    /// Payout method identifier.
    pub payway: String,
    /// Payout-method specific account data. Sent but not signed.
    pub account_details: Option<Value>,
}

impl CheckAccountRequest {
    /// Creates an account check request without account details.
    #[must_use]
    pub fn new(account: impl Into<Value>, amount: Decimal, payway: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            amount,
            payway: payway.into(),
            account_details: None,
        }
    }

    /// Attaches payout-method specific account data.
    #[must_use]
    pub fn with_account_details(mut self, account_details: Value) -> Self {
        self.account_details = Some(account_details);
        self
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "account", self.account);
        insert(&mut fields, "amount", amount_value(self.amount)?);
        insert(&mut fields, "payway", self.payway);
        if let Some(details) = self.account_details {
            insert(&mut fields, "account_details", details);
        }
        Ok(fields)
    }
}

/// Arguments for a hosted payment page form.
///
/// Useful extra fields: `description`, `payway`, `payer_account`,
/// `failed_url`, `success_url`, `callback_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct PayRequest {
    /// Payment amount.
    pub amount: Decimal,
    /// Currency of `amount` (ISO 4217 numeric).
    pub currency: u32,
    /// Order identifier on the shop side.
    pub shop_order_id: String,
    /// Payment page language.
    pub lang: Language,
    /// Optional unsigned form fields.
    pub extra_fields: Option<FieldMap>,
}

impl PayRequest {
    /// Creates a payment form request in the default language.
    #[must_use]
    pub fn new(amount: Decimal, currency: u32, shop_order_id: impl Into<String>) -> Self {
        Self {
            amount,
            currency,
            shop_order_id: shop_order_id.into(),
            lang: Language::default(),
            extra_fields: None,
        }
    }

    /// Sets the payment page language.
    #[must_use]
    pub fn with_language(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    /// Attaches extra fields.
    #[must_use]
    pub fn with_extra_fields(mut self, extra_fields: FieldMap) -> Self {
        self.extra_fields = Some(extra_fields);
        self
    }

    pub(crate) fn into_fields(self, shop_id: u64) -> Result<FieldMap> {
        let mut fields = shop_fields(shop_id);
        insert(&mut fields, "amount", amount_value(self.amount)?);
        insert(&mut fields, "currency", self.currency);
        insert(&mut fields, "shop_order_id", self.shop_order_id);
        attach_extra_fields(Operation::Pay, &mut fields, self.extra_fields)?;
        Ok(fields)
    }
}

/// Fields of a status lookup: shop ID, timestamp, and one identifier.
pub(crate) fn lookup_fields(shop_id: u64, now: String, id_field: &str, id: Value) -> FieldMap {
    let mut fields = shop_fields(shop_id);
    insert(&mut fields, "now", now);
    fields.insert(id_field.to_owned(), id);
    fields
}

/// Fields of a balance lookup.
pub(crate) fn balance_fields(shop_id: u64, now: String) -> FieldMap {
    let mut fields = shop_fields(shop_id);
    insert(&mut fields, "now", now);
    fields
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::error::PiastrixError;

    fn extra(key: &str, value: Value) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(key.to_owned(), value);
        map
    }

    fn assert_signable(fields: &FieldMap, op: Operation) {
        for name in op.signed_fields() {
            assert!(fields.contains_key(*name), "{op} is missing {name}");
        }
    }

    fn withdraw(account: &str, amount_type: WithdrawAmountType) -> WithdrawRequest {
        WithdrawRequest::new(account, dec!(10), amount_type, "card", 643, "w-1")
    }

    #[test]
    fn test_bill_fields() {
        let fields = BillRequest::new(643, dec!(10.50), 643, "101")
            .with_extra_fields(extra("description", json!("Test")))
            .into_fields(112)
            .unwrap();

        assert_signable(&fields, Operation::Bill);
        assert_eq!(fields["shop_amount"], json!(10.5));
        assert_eq!(fields["shop_id"], json!(112));
        assert_eq!(fields["description"], "Test");
    }

    #[test]
    fn test_bill_extra_field_collision() {
        let err = BillRequest::new(643, dec!(1), 643, "101")
            .with_extra_fields(extra("shop_order_id", json!("other")))
            .into_fields(1)
            .unwrap_err();

        assert!(
            matches!(err, PiastrixError::ExtraFieldCollision(ref k) if k == "shop_order_id")
        );
    }

    #[test]
    fn test_invoice_fields() {
        let request = InvoiceRequest::new(dec!(100), 643, "inv-1", "card_rub");
        let fields = request.into_fields(5).unwrap();

        assert_signable(&fields, Operation::Invoice);
        assert_signable(&fields, Operation::InvoiceTry);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["amount"], json!(100));
    }

    #[test]
    fn test_transfer_fields() {
        let amount_type = TransferAmountType::WriteoffAmount;
        let request = TransferRequest::new(dec!(5), amount_type, 1234u64, 643, 643, "p-1");
        let fields = request.into_fields(5).unwrap();

        assert_signable(&fields, Operation::Transfer);
        assert_eq!(fields["amount_type"], "writeoff_amount");
        assert_eq!(fields["payee_account"], json!(1234));
    }

    #[test]
    fn test_transfer_accepts_email_payee() {
        let amount_type = TransferAmountType::ReceiveAmount;
        let payee = "payee@example.com";
        let request = TransferRequest::new(dec!(5), amount_type, payee, 643, 643, "p");
        let fields = request.into_fields(5).unwrap();

        assert_eq!(fields["payee_account"], payee);
    }

    #[test]
    fn test_withdraw_try_fields() {
        let amount_type = WithdrawAmountType::PsAmount;
        let request = WithdrawTryRequest::new(dec!(10), amount_type, "qiwi", 643);
        let fields = request.into_fields(5).unwrap();

        assert_signable(&fields, Operation::WithdrawTry);
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn test_withdraw_account_details_are_unsigned_base_fields() {
        let details = json!({"card_holder": "IVAN IVANOV"});
        let fields = withdraw("4111111111111111", WithdrawAmountType::ShopAmount)
            .with_account_details(details.clone())
            .into_fields(5)
            .unwrap();

        assert_signable(&fields, Operation::Withdraw);
        let signed = Operation::Withdraw.signed_fields();
        assert!(!signed.contains(&"account_details"));
        assert_eq!(fields["account_details"], details);
    }

    #[test]
    fn test_withdraw_extra_fields_cannot_replace_account_details() {
        let err = withdraw("acc", WithdrawAmountType::PsAmount)
            .with_account_details(json!({}))
            .with_extra_fields(extra("account_details", json!({"forged": true})))
            .into_fields(5)
            .unwrap_err();

        assert!(
            matches!(err, PiastrixError::ExtraFieldCollision(ref k) if k == "account_details")
        );
    }

    #[test]
    fn test_check_account_fields() {
        let request = CheckAccountRequest::new("79001234567", dec!(100), "qiwi");
        let fields = request.into_fields(5).unwrap();

        assert_signable(&fields, Operation::CheckAccount);
        assert!(!fields.contains_key("account_details"));
    }

    #[test]
    fn test_pay_fields() {
        let fields = PayRequest::new(dec!(99.90), 643, "order-7")
            .with_language(Language::En)
            .with_extra_fields(extra("description", json!("Order 7")))
            .into_fields(5)
            .unwrap();

        assert_signable(&fields, Operation::Pay);
        assert_eq!(fields["amount"], json!(99.9));
        assert!(!fields.contains_key("lang"));
    }

    #[test]
    fn test_pay_rejects_sign_in_extra_fields() {
        let err = PayRequest::new(dec!(1), 643, "o")
            .with_extra_fields(extra("sign", json!("x")))
            .into_fields(5)
            .unwrap_err();
        assert!(matches!(err, PiastrixError::ExtraFieldCollision(_)));
    }

    #[test]
    fn test_extra_field_builders_follow_operation_table() {
        let note = || extra("note", json!("n"));
        let receive = TransferAmountType::ReceiveAmount;
        let payloads = [
            BillRequest::new(643, dec!(1), 643, "b")
                .with_extra_fields(note())
                .into_fields(5),
            InvoiceRequest::new(dec!(1), 643, "i", "card")
                .with_extra_fields(note())
                .into_fields(5),
            TransferRequest::new(dec!(1), receive, 1u64, 643, 643, "t")
                .with_extra_fields(note())
                .into_fields(5),
            withdraw("acc", WithdrawAmountType::PsAmount)
                .with_extra_fields(note())
                .into_fields(5),
            PayRequest::new(dec!(1), 643, "p")
                .with_extra_fields(note())
                .into_fields(5),
        ];
        for fields in payloads {
            assert_eq!(fields.unwrap()["note"], "n");
        }

        let accepting: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.accepts_extra_fields())
            .collect();
        let with_builder = [
            Operation::Bill,
            Operation::InvoiceTry,
            Operation::Invoice,
            Operation::Transfer,
            Operation::Withdraw,
            Operation::Pay,
        ];
        assert_eq!(accepting, with_builder);
    }

    #[test]
    fn test_lookup_fields() {
        let now = "2024-01-01 00:00:00.000000".to_owned();
        let fields = lookup_fields(5, now, "withdraw_id", json!(42));
        assert_signable(&fields, Operation::WithdrawStatus);

        let fields = balance_fields(5, "now".to_owned());
        assert_signable(&fields, Operation::ShopBalance);
    }
}
