//! Gateway operation table.
//!
//! Each operation has a fixed endpoint and a fixed list of signed fields.
//! Keeping them in one table lets the signer be tested independently of the
//! client methods that fill in the values.

use std::fmt;

/// A gateway operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Shop balance lookup.
    ShopBalance,
    /// Bill in the shop's currency.
    Bill,
    /// Invoice advance calculation.
    InvoiceTry,
    /// Invoice in another currency.
    Invoice,
    /// Transfer status by shop payment ID.
    TransferStatus,
    /// Transfer to a gateway wallet.
    Transfer,
    /// Withdrawal advance calculation.
    WithdrawTry,
    /// Withdrawal to an external payment system.
    Withdraw,
    /// Payee account check.
    CheckAccount,
    /// Withdrawal status by gateway withdrawal ID.
    WithdrawStatus,
    /// Withdrawal status by shop payment ID.
    ShopPaymentStatus,
    /// Hosted payment page form.
    Pay,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Self; 12] = [
        Self::ShopBalance,
        Self::Bill,
        Self::InvoiceTry,
        Self::Invoice,
        Self::TransferStatus,
        Self::Transfer,
        Self::WithdrawTry,
        Self::Withdraw,
        Self::CheckAccount,
        Self::WithdrawStatus,
        Self::ShopPaymentStatus,
        Self::Pay,
    ];

    /// Returns the endpoint path under the API base URL.
    ///
    /// [`Operation::Pay`] is a browser form post and has no API path.
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            Self::ShopBalance => Some("shop_balance"),
            Self::Bill => Some("bill/create"),
            Self::InvoiceTry => Some("invoice/try"),
            Self::Invoice => Some("invoice/create"),
            Self::TransferStatus => Some("transfer/shop_payment_status"),
            Self::Transfer => Some("transfer/create"),
            Self::WithdrawTry => Some("withdraw/try"),
            Self::Withdraw => Some("withdraw/create"),
            Self::CheckAccount => Some("check_account"),
            Self::WithdrawStatus => Some("withdraw/status"),
            Self::ShopPaymentStatus => Some("withdraw/shop_payment_status"),
            Self::Pay => None,
        }
    }

    /// Returns the fields covered by the request signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::operation::Operation;
    ///
    /// assert_eq!(Operation::ShopBalance.signed_fields(), ["shop_id", "now"]);
    /// ```
    #[must_use]
    pub const fn signed_fields(self) -> &'static [&'static str] {
        match self {
            Self::ShopBalance => &["shop_id", "now"],
            Self::Bill => &[
                "payer_currency",
                "shop_amount",
                "shop_currency",
                "shop_id",
                "shop_order_id",
            ],
            Self::InvoiceTry | Self::Invoice => {
                &["amount", "currency", "shop_id", "shop_order_id", "payway"]
            }
            Self::TransferStatus => &["shop_id", "now", "shop_payment_id"],
            Self::Transfer => &[
                "amount",
                "amount_type",
                "payee_account",
                "payee_currency",
                "shop_currency",
                "shop_id",
                "shop_payment_id",
            ],
            Self::WithdrawTry => &[
                "amount",
                "amount_type",
                "payway",
                "shop_currency",
                "shop_id",
            ],
            Self::Withdraw => &[
                "account",
                "amount",
                "amount_type",
                "payway",
                "shop_currency",
                "shop_id",
                "shop_payment_id",
            ],
            Self::CheckAccount => &["account", "amount", "payway", "shop_id"],
            Self::WithdrawStatus => &["now", "shop_id", "withdraw_id"],
            Self::ShopPaymentStatus => &["now", "shop_id", "shop_payment_id"],
            Self::Pay => &["amount", "currency", "shop_id", "shop_order_id"],
        }
    }

    /// Returns true if callers may attach extra fields to this operation.
    ///
    /// Request builders merge extra fields only for these operations.
    #[must_use]
    pub const fn accepts_extra_fields(self) -> bool {
        match self {
            Self::Bill | Self::InvoiceTry | Self::Invoice | Self::Transfer => true,
            Self::Withdraw | Self::Pay => true,
            Self::ShopBalance
            | Self::TransferStatus
            | Self::WithdrawTry
            | Self::CheckAccount
            | Self::WithdrawStatus
            | Self::ShopPaymentStatus => false,
        }
    }

    /// Returns a stable snake_case name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShopBalance => "shop_balance",
            Self::Bill => "bill",
            Self::InvoiceTry => "invoice_try",
            Self::Invoice => "invoice",
            Self::TransferStatus => "transfer_status",
            Self::Transfer => "transfer",
            Self::WithdrawTry => "withdraw_try",
            Self::Withdraw => "withdraw",
            Self::CheckAccount => "check_account",
            Self::WithdrawStatus => "withdraw_status",
            Self::ShopPaymentStatus => "shop_payment_status",
            Self::Pay => "pay",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_only_pay_has_no_path() {
        for op in Operation::ALL {
            assert_eq!(op.path().is_none(), op == Operation::Pay, "{op}");
        }
    }

    #[test]
    fn test_paths_are_unique() {
        let paths: HashSet<_> = Operation::ALL.iter().filter_map(|op| op.path()).collect();
        assert_eq!(paths.len(), Operation::ALL.len() - 1);
    }

    #[test]
    fn test_every_operation_signs_shop_id() {
        for op in Operation::ALL {
            assert!(op.signed_fields().contains(&"shop_id"), "{op}");
        }
    }

    #[test]
    fn test_signed_fields_have_no_duplicates() {
        for op in Operation::ALL {
            let unique: HashSet<_> = op.signed_fields().iter().collect();
            assert_eq!(unique.len(), op.signed_fields().len(), "{op}");
        }
    }

    #[test]
    fn test_status_lookups_sign_now() {
        for op in [
            Operation::ShopBalance,
            Operation::TransferStatus,
            Operation::WithdrawStatus,
            Operation::ShopPaymentStatus,
        ] {
            assert!(op.signed_fields().contains(&"now"), "{op}");
            assert!(!op.accepts_extra_fields(), "{op}");
        }
    }

    #[test]
    fn test_extra_fields_acceptance() {
        let accepting: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.accepts_extra_fields())
            .collect();
        assert_eq!(
            accepting,
            vec![
                Operation::Bill,
                Operation::InvoiceTry,
                Operation::Invoice,
                Operation::Transfer,
                Operation::Withdraw,
                Operation::Pay
            ]
        );
        assert!(!Operation::CheckAccount.accepts_extra_fields());
        assert!(!Operation::WithdrawTry.accepts_extra_fields());
    }

    #[test]
    fn test_names() {
        assert_eq!(Operation::WithdrawStatus.to_string(), "withdraw_status");
        assert_eq!(Operation::Bill.path(), Some("bill/create"));
    }
}
