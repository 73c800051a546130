#![forbid(unsafe_code)]

//! Session state behind the demo screen.
//!
//! [`ExampleSession`] holds what the screen shows (field values, cached IDs,
//! the message log) and turns button presses into [`PosRequest`]s. Every
//! launched call leaves a transcript in the log:
//!
//! ```text
//! ==> Sale(amount=2, posMessageId=…, autoDismissResult=true)
//! ==> Success
//! ==> {
//!   "status": "Success",
//!   …
//! }
//! ```
//!
//! Field edits go through the `msapos-input` formats, so the session never
//! holds an amount or activation code the screen would have refused.

use std::fmt;

use msapos_input::{
    ActivationCodeFormat, AmountFormat, InputField, amount_for_submission,
    is_complete_activation_code,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::PosApi;
use crate::config::{DemoApp, SessionConfig, UnknownDemoApp};
use crate::message_log::MessageLog;
use crate::request::PosRequest;
use crate::response::PosResponse;

/// Errors from session operations.
#[derive(Debug)]
pub enum SessionError {
    /// The target POS application is not installed; nothing was launched.
    NotInstalled { package_name: String },
    /// A demo app name did not match any known application.
    UnknownDemoApp(UnknownDemoApp),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled { package_name } => {
                write!(f, "SoftPOS app {package_name} is not installed")
            }
            Self::UnknownDemoApp(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotInstalled { .. } => None,
            Self::UnknownDemoApp(err) => Some(err),
        }
    }
}

impl From<UnknownDemoApp> for SessionError {
    fn from(err: UnknownDemoApp) -> Self {
        Self::UnknownDemoApp(err)
    }
}

/// Demo screen state.
#[derive(Debug, Clone)]
pub struct ExampleSession {
    log: MessageLog,
    demo_app: DemoApp,
    activation_code: InputField<ActivationCodeFormat>,
    amount: InputField<AmountFormat>,
    currency: String,
    auto_dismiss_transaction: bool,
    merchant_admin_passcode: String,
    pos_message_id: String,
    cached_transaction_id: String,
    cached_pos_message_id: String,
}

impl Default for ExampleSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ExampleSession {
    /// Start a session: default activation code of the configured app and a
    /// fresh random POS message ID.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            log: MessageLog::new(),
            demo_app: config.demo_app,
            activation_code: InputField::new(ActivationCodeFormat),
            amount: InputField::new(AmountFormat).with_value(config.default_amount),
            currency: config.currency,
            auto_dismiss_transaction: config.auto_dismiss_transaction,
            merchant_admin_passcode: config.merchant_admin_passcode,
            pos_message_id: String::new(),
            cached_transaction_id: String::new(),
            cached_pos_message_id: String::new(),
        };
        session.restore_default_activation_code();
        session.reset_random_pos_message_id();
        session
    }

    // --- Message log ---

    /// Shared handle to the message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Append a line to the message log.
    pub fn write_message(&self, message: impl AsRef<str>) {
        self.log.append(message);
    }

    /// Empty the message log.
    pub fn clear_log(&self) {
        self.log.clear();
    }

    /// Current message log contents.
    pub fn messages(&self) -> Vec<String> {
        self.log.snapshot()
    }

    // --- Demo app ---

    pub fn demo_app(&self) -> DemoApp {
        self.demo_app
    }

    /// Switch target application by menu name and restore its default
    /// activation code.
    pub fn change_demo_app(&mut self, name: &str) -> Result<(), SessionError> {
        self.demo_app = DemoApp::from_name(name)?;
        tracing::info!(demo_app = %self.demo_app, "demo app changed");
        self.restore_default_activation_code();
        Ok(())
    }

    /// `SoftPOS App: <package>\nInstalled? <bool>` for the installation check.
    pub fn installation_report<A: PosApi + ?Sized>(&self, api: &A) -> String {
        format!(
            "SoftPOS App: {}\nInstalled? {}",
            self.demo_app.param().package_name,
            api.is_installed()
        )
    }

    // --- Activation code ---

    pub fn activation_code(&self) -> &str {
        self.activation_code.value()
    }

    /// Grouped display form, e.g. `7677-4758-2904`.
    pub fn activation_code_display(&self) -> String {
        self.activation_code.display()
    }

    /// Field state for keystroke-level editing.
    pub fn activation_code_field(&mut self) -> &mut InputField<ActivationCodeFormat> {
        &mut self.activation_code
    }

    /// Replace the activation code with a new field value (digits kept, at most 12).
    pub fn set_activation_code_input(&mut self, incoming: &str) {
        self.activation_code.set_value(incoming);
    }

    /// Whether the activation code is complete; the field shows an error otherwise.
    pub fn is_activation_code_complete(&self) -> bool {
        is_complete_activation_code(self.activation_code.value())
    }

    pub fn restore_default_activation_code(&mut self) {
        self.activation_code
            .replace(self.demo_app.default_activation_code());
    }

    // --- Amount ---

    pub fn amount_str(&self) -> &str {
        self.amount.value()
    }

    /// Field state for keystroke-level editing.
    pub fn amount_field(&mut self) -> &mut InputField<AmountFormat> {
        &mut self.amount
    }

    /// Apply a new amount field value; invalid values are ignored.
    pub fn handle_input_amount(&mut self, incoming: &str) {
        tracing::debug!(incoming, "amount input");
        self.amount.set_value(incoming);
    }

    /// Amount submitted with sale and auth requests (zero when unparseable).
    pub fn amount_for_sale(&self) -> Decimal {
        amount_for_submission(self.amount.value())
    }

    /// Whether the amount field shows an error (empty).
    pub fn is_amount_missing(&self) -> bool {
        self.amount.value().is_empty()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    // --- Other fields ---

    pub fn auto_dismiss_transaction(&self) -> bool {
        self.auto_dismiss_transaction
    }

    pub fn set_auto_dismiss_transaction(&mut self, enabled: bool) {
        self.auto_dismiss_transaction = enabled;
    }

    pub fn toggle_auto_dismiss_transaction(&mut self) {
        self.auto_dismiss_transaction = !self.auto_dismiss_transaction;
    }

    pub fn merchant_admin_passcode(&self) -> &str {
        &self.merchant_admin_passcode
    }

    pub fn set_merchant_admin_passcode(&mut self, passcode: impl Into<String>) {
        self.merchant_admin_passcode = passcode.into();
    }

    /// POS message ID the next transaction or settlement will carry.
    pub fn pos_message_id(&self) -> &str {
        &self.pos_message_id
    }

    pub fn set_pos_message_id(&mut self, id: impl Into<String>) {
        self.pos_message_id = id.into();
    }

    /// Replace the POS message ID with a random UUID.
    pub fn reset_random_pos_message_id(&mut self) {
        self.pos_message_id = Uuid::new_v4().to_string();
        tracing::trace!(pos_message_id = %self.pos_message_id, "new POS message ID");
    }

    /// Transaction ID of the last successful transaction (editable).
    pub fn cached_transaction_id(&self) -> &str {
        &self.cached_transaction_id
    }

    pub fn set_cached_transaction_id(&mut self, id: impl Into<String>) {
        self.cached_transaction_id = id.into();
    }

    /// POS message ID of the last transaction attempt (editable).
    pub fn cached_pos_message_id(&self) -> &str {
        &self.cached_pos_message_id
    }

    pub fn set_cached_pos_message_id(&mut self, id: impl Into<String>) {
        self.cached_pos_message_id = id.into();
    }

    // --- Request builders ---

    pub fn activation_request(&self) -> PosRequest {
        PosRequest::Activation {
            activation_code: self.activation_code.value().to_owned(),
        }
    }

    pub fn sale_request(&self) -> PosRequest {
        PosRequest::Sale {
            amount: self.amount_for_sale(),
            pos_message_id: self.pos_message_id.clone(),
            auto_dismiss_result: self.auto_dismiss_transaction,
        }
    }

    pub fn auth_request(&self) -> PosRequest {
        PosRequest::Auth {
            amount: self.amount_for_sale(),
            pos_message_id: self.pos_message_id.clone(),
            auto_dismiss_result: self.auto_dismiss_transaction,
        }
    }

    pub fn void_request(&self) -> PosRequest {
        PosRequest::Void {
            org_tran_id: self.cached_transaction_id.clone(),
            pos_message_id: self.pos_message_id.clone(),
            admin_pwd: self.merchant_admin_passcode.clone(),
        }
    }

    pub fn refund_request(&self) -> PosRequest {
        PosRequest::Refund {
            org_tran_id: self.cached_transaction_id.clone(),
            pos_message_id: self.pos_message_id.clone(),
            admin_pwd: self.merchant_admin_passcode.clone(),
        }
    }

    pub fn enquiry_tran_request(&self) -> PosRequest {
        PosRequest::EnquiryTranStatus {
            tran_id: self.cached_transaction_id.clone(),
        }
    }

    pub fn enquiry_tran_with_message_id_request(&self) -> PosRequest {
        PosRequest::EnquiryTranStatusWithMessageId {
            pos_message_id: self.cached_pos_message_id.clone(),
        }
    }

    pub fn settlement_request(&self) -> PosRequest {
        PosRequest::Settlement {
            pos_message_id: self.pos_message_id.clone(),
        }
    }

    // --- Launching ---

    /// Launch one call and record it in the message log.
    ///
    /// Logs the request description, then the response kind and its pretty
    /// JSON body. Transaction calls cache the returned `tranId` (on success)
    /// and the POS message ID they used, then draw a new POS message ID;
    /// settlement draws a new one as well.
    pub fn launch<A: PosApi + ?Sized>(
        &mut self,
        api: &mut A,
        request: PosRequest,
    ) -> Result<PosResponse, SessionError> {
        if !api.is_installed() {
            tracing::warn!(
                package_name = api.package_name(),
                request = request.name(),
                "POS app not installed, call not launched"
            );
            return Err(SessionError::NotInstalled {
                package_name: api.package_name().to_owned(),
            });
        }

        self.write_message(request.describe());
        tracing::info!(request = request.name(), "launching POS call");
        let response = api.execute(&request);
        tracing::info!(
            request = request.name(),
            outcome = response.kind(),
            "POS call finished"
        );
        self.record_response(&response);

        if request.is_transaction() {
            if let Some(tran_id) = response.tran_id() {
                self.cached_transaction_id = tran_id.to_owned();
            }
            self.cached_pos_message_id = self.pos_message_id.clone();
            self.reset_random_pos_message_id();
        } else if matches!(request, PosRequest::Settlement { .. }) {
            self.reset_random_pos_message_id();
        }

        Ok(response)
    }

    fn record_response(&self, response: &PosResponse) {
        self.write_message(response.kind());
        match response.to_pretty_json() {
            Ok(body) => self.write_message(body),
            Err(err) => {
                tracing::warn!(error = %err, "response not serializable");
                self.write_message(format!("<unserializable response: {err}>"));
            }
        }
    }

    pub fn warm_up<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        self.launch(api, PosRequest::WarmUp)
    }

    pub fn activate<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        let request = self.activation_request();
        self.launch(api, request)
    }

    pub fn enquiry_app_status<A: PosApi + ?Sized>(
        &mut self,
        api: &mut A,
    ) -> Result<PosResponse, SessionError> {
        self.launch(api, PosRequest::EnquiryDeviceStatus)
    }

    pub fn sale<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        let request = self.sale_request();
        self.launch(api, request)
    }

    pub fn auth<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        let request = self.auth_request();
        self.launch(api, request)
    }

    pub fn enquiry_transaction<A: PosApi + ?Sized>(
        &mut self,
        api: &mut A,
    ) -> Result<PosResponse, SessionError> {
        let request = self.enquiry_tran_request();
        self.launch(api, request)
    }

    pub fn enquiry_transaction_with_message_id<A: PosApi + ?Sized>(
        &mut self,
        api: &mut A,
    ) -> Result<PosResponse, SessionError> {
        let request = self.enquiry_tran_with_message_id_request();
        self.launch(api, request)
    }

    pub fn void<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        let request = self.void_request();
        self.launch(api, request)
    }

    pub fn settle<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        let request = self.settlement_request();
        self.launch(api, request)
    }

    pub fn refund<A: PosApi + ?Sized>(&mut self, api: &mut A) -> Result<PosResponse, SessionError> {
        let request = self.refund_request();
        self.launch(api, request)
    }

    pub fn reload_configuration<A: PosApi + ?Sized>(
        &mut self,
        api: &mut A,
    ) -> Result<PosResponse, SessionError> {
        self.launch(api, PosRequest::ReloadConfiguration)
    }

    pub fn enquiry_bluetooth_status<A: PosApi + ?Sized>(
        &mut self,
        api: &mut A,
    ) -> Result<PosResponse, SessionError> {
        self.launch(api, PosRequest::EnquiryBtConnectStatus)
    }
}
