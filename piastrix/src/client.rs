//! Gateway client.
//!
//! [`PiastrixClient`] assembles the field map for each operation, signs it
//! over the operation's fixed field list and POSTs it as JSON. Responses are
//! returned raw; the client does not interpret gateway results.

use std::net::IpAddr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    audit::{AuditEvent, AuditEventType, audit_log},
    config::ClientConfig,
    error::{PiastrixError, Result},
    fields::FieldMap,
    operation::Operation,
    request::{
        BillRequest, CheckAccountRequest, InvoiceRequest, PayRequest, TransferRequest,
        WithdrawRequest, WithdrawTryRequest, balance_fields, lookup_fields,
    },
    sign::{CallbackExpectation, CallbackVerifier, CanonicalSigner},
    transport::{HttpTransport, Transport},
};

/// Format of the `now` field sent with lookups.
pub const NOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Returns the current local time in [`NOW_FORMAT`].
#[must_use]
pub fn now_stamp() -> String {
    chrono::Local::now().format(NOW_FORMAT).to_string()
}

/// Raw gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Json`] if the body is not valid JSON for `D`.
    pub fn json<D: DeserializeOwned>(&self) -> Result<D> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Signed hosted payment page form.
///
/// Render `fields` as hidden inputs of a form that POSTs to `url`.
#[derive(Debug, Clone, PartialEq)]
pub struct PayForm {
    /// Form fields including `sign`.
    pub fields: FieldMap,
    /// Form action URL.
    pub url: String,
}

/// Client for one merchant credential set.
///
/// The client holds only immutable state, so it is `Send + Sync` and can be
/// shared across tasks behind an `Arc`.
///
/// # Examples
///
/// ```rust,no_run
/// use piastrix::{ClientConfig, PiastrixClient, SecretKey, request::BillRequest};
/// use rust_decimal::Decimal;
///
/// # async fn example() -> piastrix::Result<()> {
/// let config = ClientConfig::new(112, SecretKey::new("SecretKey01"));
/// let client = PiastrixClient::new(config)?;
///
/// let request = BillRequest::new(643, Decimal::new(1050, 2), 643, "order-101");
/// let response = client.bill(request).await?;
/// let body: serde_json::Value = response.json()?;
/// println!("{body}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PiastrixClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    signer: CanonicalSigner,
    verifier: CallbackVerifier,
    transport: T,
}

impl PiastrixClient<HttpTransport> {
    /// Creates a client that talks to the gateway over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Config`] if `config` is invalid, or
    /// [`PiastrixError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> PiastrixClient<T> {
    /// Creates a client with an explicit transport.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Config`] if `config` is invalid.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let signer = CanonicalSigner::new(config.secret_key.clone());
        let verifier = CallbackVerifier::new(config.secret_key.clone());
        Ok(Self {
            config,
            signer,
            verifier,
            transport,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the shop identifier.
    #[must_use]
    pub const fn shop_id(&self) -> u64 {
        self.config.shop_id
    }

    /// Signs `fields` over `signed_fields` with the client's secret.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::MissingSignedField`] if a listed field is absent.
    pub fn sign<S: AsRef<str>>(&self, fields: &mut FieldMap, signed_fields: &[S]) -> Result<()> {
        self.signer.sign(fields, signed_fields)
    }

    /// Requests the shop balances.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`] if the request fails.
    pub async fn shop_balance(&self) -> Result<GatewayResponse> {
        let fields = balance_fields(self.shop_id(), now_stamp());
        self.execute(Operation::ShopBalance, fields, None).await
    }

    /// Creates a bill in the shop's currency.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::ExtraFieldCollision`] if an extra field reuses
    /// a request field, or [`PiastrixError::Http`] if the request fails.
    pub async fn bill(&self, request: BillRequest) -> Result<GatewayResponse> {
        let reference = Some(request.shop_order_id.clone());
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::Bill, fields, reference).await
    }

    /// Calculates an invoice in advance.
    ///
    /// # Errors
    ///
    /// Same as [`bill`](Self::bill).
    pub async fn invoice_try(&self, request: InvoiceRequest) -> Result<GatewayResponse> {
        let reference = Some(request.shop_order_id.clone());
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::InvoiceTry, fields, reference).await
    }

    /// Creates an invoice in another currency.
    ///
    /// # Errors
    ///
    /// Same as [`bill`](Self::bill).
    pub async fn invoice(&self, request: InvoiceRequest) -> Result<GatewayResponse> {
        let reference = Some(request.shop_order_id.clone());
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::Invoice, fields, reference).await
    }

    /// Requests a transfer status by shop payment ID.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`] if the request fails.
    pub async fn transfer_status(&self, shop_payment_id: &str) -> Result<GatewayResponse> {
        let (operation, field) = (Operation::TransferStatus, "shop_payment_id");
        self.lookup(operation, field, shop_payment_id).await
    }

    /// Transfers funds from the shop balance to a gateway wallet.
    ///
    /// # Errors
    ///
    /// Same as [`bill`](Self::bill).
    pub async fn transfer(&self, request: TransferRequest) -> Result<GatewayResponse> {
        let reference = Some(request.shop_payment_id.clone());
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::Transfer, fields, reference).await
    }

    /// Calculates a withdrawal in advance.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`] if the request fails.
    pub async fn withdraw_try(&self, request: WithdrawTryRequest) -> Result<GatewayResponse> {
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::WithdrawTry, fields, None).await
    }

    /// Withdraws funds to an external payment system.
    ///
    /// # Errors
    ///
    /// Same as [`bill`](Self::bill). Extra fields also may not reuse
    /// `account_details`.
    pub async fn withdraw(&self, request: WithdrawRequest) -> Result<GatewayResponse> {
        let reference = Some(request.shop_payment_id.clone());
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::Withdraw, fields, reference).await
    }

    /// Checks a payee account before a withdrawal.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`] if the request fails.
    pub async fn check_account(&self, request: CheckAccountRequest) -> Result<GatewayResponse> {
        let fields = request.into_fields(self.shop_id())?;
        self.execute(Operation::CheckAccount, fields, None).await
    }

    /// Requests a withdrawal status by gateway withdrawal ID.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`] if the request fails.
    pub async fn withdraw_status(&self, withdraw_id: u64) -> Result<GatewayResponse> {
        let (operation, field) = (Operation::WithdrawStatus, "withdraw_id");
        self.lookup(operation, field, withdraw_id).await
    }

    /// Requests a withdrawal status by shop payment ID.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`] if the request fails.
    pub async fn shop_payment_status(&self, shop_payment_id: &str) -> Result<GatewayResponse> {
        let (operation, field) = (Operation::ShopPaymentStatus, "shop_payment_id");
        self.lookup(operation, field, shop_payment_id).await
    }

    /// Builds a signed hosted payment page form.
    ///
    /// Makes no network call.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::ExtraFieldCollision`] if an extra field reuses
    /// a form field.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{ClientConfig, Language, PiastrixClient, SecretKey, request::PayRequest};
    /// use rust_decimal::Decimal;
    ///
    /// let config = ClientConfig::new(112, SecretKey::new("SecretKey01"));
    /// let client = PiastrixClient::new(config).unwrap();
    ///
    /// let request = PayRequest::new(Decimal::new(1050, 2), 643, "order-101")
    ///     .with_language(Language::En);
    /// let form = client.pay(request).unwrap();
    /// assert_eq!(form.url, "https://pay.piastrix.com/en/pay");
    /// assert!(form.fields.contains_key("sign"));
    /// ```
    #[instrument(skip_all, fields(shop_order_id = %request.shop_order_id))]
    pub fn pay(&self, request: PayRequest) -> Result<PayForm> {
        let url = request.lang.pay_url();
        let reference = request.shop_order_id.clone();
        let mut fields = request.into_fields(self.shop_id())?;
        let signed_fields = Operation::Pay.signed_fields();
        self.signer.sign(&mut fields, signed_fields)?;

        let event = AuditEvent::new(AuditEventType::RequestSigned)
            .with_operation(Operation::Pay.name())
            .with_reference(reference);
        audit_log(&event);

        Ok(PayForm { fields, url })
    }

    /// Verifies a bill or invoice status callback.
    ///
    /// `shop_amount` and `shop_currency` come from the merchant's own order
    /// record.
    ///
    /// # Errors
    ///
    /// See [`CallbackVerifier::verify`].
    pub fn verify_callback(
        &self,
        payload: FieldMap,
        remote_addr: IpAddr,
        shop_amount: Decimal,
        shop_currency: u32,
    ) -> Result<()> {
        let expected = CallbackExpectation {
            shop_amount,
            shop_currency,
        };
        self.verifier.verify(payload, remote_addr, &expected)
    }

    /// Verifies a callback whose source address is in text form.
    ///
    /// # Errors
    ///
    /// See [`CallbackVerifier::verify_from`].
    pub fn verify_callback_from(
        &self,
        payload: FieldMap,
        remote_addr: &str,
        shop_amount: Decimal,
        shop_currency: u32,
    ) -> Result<()> {
        let expected = CallbackExpectation {
            shop_amount,
            shop_currency,
        };
        self.verifier.verify_from(payload, remote_addr, &expected)
    }

    async fn lookup(
        &self,
        operation: Operation,
        id_field: &str,
        id: impl Into<Value> + ToString,
    ) -> Result<GatewayResponse> {
        let reference = Some(id.to_string());
        let fields = lookup_fields(self.shop_id(), now_stamp(), id_field, id.into());
        self.execute(operation, fields, reference).await
    }

    #[instrument(skip_all, fields(%operation, protocol = self.transport.protocol_name()))]
    async fn execute(
        &self,
        operation: Operation,
        mut fields: FieldMap,
        reference: Option<String>,
    ) -> Result<GatewayResponse> {
        let Some(path) = operation.path() else {
            let message = format!("operation {operation} has no API endpoint");
            return Err(PiastrixError::Config(message));
        };

        self.signer.sign(&mut fields, operation.signed_fields())?;

        let mut event = AuditEvent::new(AuditEventType::RequestSigned)
            .with_operation(operation.name());
        if let Some(reference) = reference {
            event = event.with_reference(reference);
        }
        audit_log(&event);

        let url = self.config.endpoint_url(path);
        let body = serde_json::to_vec(&Value::Object(fields))?;
        let response = self.transport.post_json(&url, body).await?;

        info!(status = response.status, "gateway request completed");
        Ok(GatewayResponse {
            status: response.status,
            body: response.body,
        })
    }
}
