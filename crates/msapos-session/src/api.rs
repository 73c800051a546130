#![forbid(unsafe_code)]

//! POS API boundary.
//!
//! The real transaction processing lives in an external POS application; the
//! session reaches it only through [`PosApi`]. [`SimulatedPosApi`] is an
//! in-process stand-in with deterministic behaviour, used by the demo binary
//! and the tests. It models enough state (warm-up, activation, a batch of
//! transactions, settlement) to make every call produce a meaningful
//! response, and nothing of the real device protocol.
//!
//! # Simulated failures
//!
//! | Code | When |
//! |------|------|
//! | `APP_NOT_INSTALLED` | any call while not installed |
//! | `INVALID_ACTIVATION_CODE` | activation with a code other than the app's |
//! | `NOT_WARMED_UP` | transaction before warm-up |
//! | `NOT_ACTIVATED` | transaction or settlement before activation |
//! | `INVALID_AMOUNT` | sale/auth with a zero amount |
//! | `DUPLICATE_POS_MESSAGE_ID` | sale/auth reusing a POS message ID |
//! | `INVALID_ADMIN_PASSCODE` | void/refund with the wrong passcode |
//! | `TRAN_NOT_FOUND` | unknown transaction or POS message ID |
//! | `TRAN_NOT_VOIDABLE` | void of a settled or already reversed transaction |
//! | `TRAN_NOT_REFUNDABLE` | refund of an unsettled or already reversed transaction |

use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::config::PosApiInitParam;
use crate::request::PosRequest;
use crate::response::PosResponse;

/// A POS application reachable from the session.
pub trait PosApi {
    /// Package identifier of the target application.
    fn package_name(&self) -> &str;

    /// Whether the target application is present on the device.
    fn is_installed(&self) -> bool;

    /// Run one call to completion.
    fn execute(&mut self, request: &PosRequest) -> PosResponse;
}

impl<A: PosApi + ?Sized> PosApi for Box<A> {
    fn package_name(&self) -> &str {
        (**self).package_name()
    }

    fn is_installed(&self) -> bool {
        (**self).is_installed()
    }

    fn execute(&mut self, request: &PosRequest) -> PosResponse {
        (**self).execute(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TranType {
    Sale,
    Auth,
    Void,
    Refund,
}

impl TranType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Auth => "AUTH",
            Self::Void => "VOID",
            Self::Refund => "REFUND",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TranStatus {
    Approved,
    Voided,
    Refunded,
}

impl TranStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Voided => "VOIDED",
            Self::Refunded => "REFUNDED",
        }
    }
}

#[derive(Debug, Clone)]
struct SimTransaction {
    tran_id: String,
    tran_type: TranType,
    status: TranStatus,
    amount: Decimal,
    pos_message_id: String,
    org_tran_id: Option<String>,
    batch_no: u32,
    settled: bool,
}

/// Deterministic in-process POS application.
#[derive(Debug, Clone)]
pub struct SimulatedPosApi {
    package_name: String,
    installed: bool,
    bluetooth_connected: bool,
    activation_code: String,
    admin_passcode: String,
    currency: String,
    warmed_up: bool,
    activated: bool,
    batch_no: u32,
    next_seq: u64,
    config_version: u32,
    transactions: Vec<SimTransaction>,
}

impl SimulatedPosApi {
    /// Simulate the application described by `param`, installed, accepting
    /// its default activation code and the admin passcode `123456`.
    #[must_use]
    pub fn new(param: PosApiInitParam) -> Self {
        Self {
            package_name: param.package_name.to_owned(),
            installed: true,
            bluetooth_connected: true,
            activation_code: param.default_activation_code.to_owned(),
            admin_passcode: "123456".into(),
            currency: "USD".into(),
            warmed_up: false,
            activated: false,
            batch_no: 1,
            next_seq: 1,
            config_version: 1,
            transactions: Vec::new(),
        }
    }

    /// Set whether the application is installed (builder).
    #[must_use]
    pub fn with_installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }

    /// Set the card reader's Bluetooth state (builder).
    #[must_use]
    pub fn with_bluetooth_connected(mut self, connected: bool) -> Self {
        self.bluetooth_connected = connected;
        self
    }

    /// Set the accepted admin passcode (builder).
    #[must_use]
    pub fn with_admin_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.admin_passcode = passcode.into();
        self
    }

    /// Set the transaction currency (builder).
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Whether activation has succeeded.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Current batch number.
    pub fn batch_no(&self) -> u32 {
        self.batch_no
    }

    fn find(&self, tran_id: &str) -> Option<usize> {
        self.transactions.iter().position(|t| t.tran_id == tran_id)
    }

    fn find_by_message_id(&self, pos_message_id: &str) -> Option<&SimTransaction> {
        self.transactions
            .iter()
            .rev()
            .find(|t| t.pos_message_id == pos_message_id)
    }

    fn transaction_json(&self, tran: &SimTransaction) -> Value {
        json!({
            "tranId": tran.tran_id,
            "tranType": tran.tran_type.as_str(),
            "status": tran.status.as_str(),
            "amount": tran.amount.to_string(),
            "currency": self.currency,
            "posMessageId": tran.pos_message_id,
            "orgTranId": tran.org_tran_id,
            "batchNo": tran.batch_no,
            "settled": tran.settled,
        })
    }

    fn record(
        &mut self,
        tran_type: TranType,
        amount: Decimal,
        pos_message_id: &str,
        org_tran_id: Option<String>,
    ) -> PosResponse {
        let tran = SimTransaction {
            tran_id: format!("T{:06}", self.next_seq),
            tran_type,
            status: TranStatus::Approved,
            amount,
            pos_message_id: pos_message_id.to_owned(),
            org_tran_id,
            batch_no: self.batch_no,
            settled: false,
        };
        self.next_seq += 1;
        tracing::debug!(
            tran_id = %tran.tran_id,
            tran_type = tran.tran_type.as_str(),
            amount = %tran.amount,
            "simulated transaction approved"
        );
        let body = self.transaction_json(&tran);
        self.transactions.push(tran);
        PosResponse::success(body)
    }

    fn ready_for_transaction(&self) -> Result<(), PosResponse> {
        if !self.warmed_up {
            return Err(PosResponse::failed(
                "NOT_WARMED_UP",
                "warm up the application before transacting",
            ));
        }
        if !self.activated {
            return Err(PosResponse::failed(
                "NOT_ACTIVATED",
                "the application has not been activated",
            ));
        }
        Ok(())
    }

    fn purchase(&mut self, tran_type: TranType, amount: Decimal, pos_message_id: &str) -> PosResponse {
        if let Err(response) = self.ready_for_transaction() {
            return response;
        }
        if amount <= Decimal::ZERO {
            return PosResponse::failed("INVALID_AMOUNT", format!("amount {amount} must be positive"));
        }
        if self.find_by_message_id(pos_message_id).is_some() {
            return PosResponse::failed(
                "DUPLICATE_POS_MESSAGE_ID",
                format!("POS message ID {pos_message_id} was already used"),
            );
        }
        self.record(tran_type, amount, pos_message_id, None)
    }

    fn reverse(
        &mut self,
        tran_type: TranType,
        org_tran_id: &str,
        pos_message_id: &str,
        admin_pwd: &str,
    ) -> PosResponse {
        if let Err(response) = self.ready_for_transaction() {
            return response;
        }
        if admin_pwd != self.admin_passcode {
            return PosResponse::failed("INVALID_ADMIN_PASSCODE", "admin passcode rejected");
        }
        let Some(idx) = self.find(org_tran_id) else {
            return PosResponse::failed(
                "TRAN_NOT_FOUND",
                format!("no transaction with ID {org_tran_id:?}"),
            );
        };

        let original = &self.transactions[idx];
        let reversible = original.status == TranStatus::Approved
            && matches!(original.tran_type, TranType::Sale | TranType::Auth);
        let (allowed, code, status) = match tran_type {
            TranType::Void => (reversible && !original.settled, "TRAN_NOT_VOIDABLE", TranStatus::Voided),
            _ => (reversible && original.settled, "TRAN_NOT_REFUNDABLE", TranStatus::Refunded),
        };
        if !allowed {
            return PosResponse::failed(
                code,
                format!("transaction {org_tran_id} is {}", original.status.as_str()),
            );
        }

        let amount = original.amount;
        self.transactions[idx].status = status;
        self.record(tran_type, amount, pos_message_id, Some(org_tran_id.to_owned()))
    }

    fn settle(&mut self, pos_message_id: &str) -> PosResponse {
        if !self.activated {
            return PosResponse::failed("NOT_ACTIVATED", "the application has not been activated");
        }
        let batch_no = self.batch_no;
        let mut count = 0u32;
        let mut total = Decimal::ZERO;
        for tran in self.transactions.iter_mut().filter(|t| !t.settled) {
            tran.settled = true;
            count += 1;
            match (tran.tran_type, tran.status) {
                (TranType::Sale | TranType::Auth, TranStatus::Approved) => total += tran.amount,
                (TranType::Refund, _) => total -= tran.amount,
                _ => {}
            }
        }
        self.batch_no += 1;
        tracing::debug!(batch_no, count, total = %total, "simulated batch settled");
        PosResponse::success(json!({
            "batchNo": batch_no,
            "transactionCount": count,
            "netAmount": total.to_string(),
            "currency": self.currency,
            "posMessageId": pos_message_id,
        }))
    }
}

impl PosApi for SimulatedPosApi {
    fn package_name(&self) -> &str {
        &self.package_name
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn execute(&mut self, request: &PosRequest) -> PosResponse {
        if !self.installed {
            return PosResponse::failed(
                "APP_NOT_INSTALLED",
                format!("{} is not installed", self.package_name),
            );
        }

        match request {
            PosRequest::WarmUp => {
                self.warmed_up = true;
                PosResponse::success(json!({ "ready": true }))
            }
            PosRequest::Activation { activation_code } => {
                if *activation_code == self.activation_code {
                    self.activated = true;
                    PosResponse::success(json!({
                        "activated": true,
                        "packageName": self.package_name,
                    }))
                } else {
                    PosResponse::failed("INVALID_ACTIVATION_CODE", "activation code rejected")
                }
            }
            PosRequest::EnquiryDeviceStatus => {
                let pending = self.transactions.iter().filter(|t| !t.settled).count();
                PosResponse::success(json!({
                    "activated": self.activated,
                    "warmedUp": self.warmed_up,
                    "batchNo": self.batch_no,
                    "pendingTransactions": pending,
                }))
            }
            PosRequest::Sale {
                amount,
                pos_message_id,
                ..
            } => self.purchase(TranType::Sale, *amount, pos_message_id),
            PosRequest::Auth {
                amount,
                pos_message_id,
                ..
            } => self.purchase(TranType::Auth, *amount, pos_message_id),
            PosRequest::Void {
                org_tran_id,
                pos_message_id,
                admin_pwd,
            } => self.reverse(TranType::Void, org_tran_id, pos_message_id, admin_pwd),
            PosRequest::Refund {
                org_tran_id,
                pos_message_id,
                admin_pwd,
            } => self.reverse(TranType::Refund, org_tran_id, pos_message_id, admin_pwd),
            PosRequest::EnquiryTranStatus { tran_id } => match self.find(tran_id) {
                Some(idx) => PosResponse::success(self.transaction_json(&self.transactions[idx])),
                None => PosResponse::failed(
                    "TRAN_NOT_FOUND",
                    format!("no transaction with ID {tran_id:?}"),
                ),
            },
            PosRequest::EnquiryTranStatusWithMessageId { pos_message_id } => {
                match self.find_by_message_id(pos_message_id) {
                    Some(tran) => PosResponse::success(self.transaction_json(tran)),
                    None => PosResponse::failed(
                        "TRAN_NOT_FOUND",
                        format!("no transaction with POS message ID {pos_message_id:?}"),
                    ),
                }
            }
            PosRequest::Settlement { pos_message_id } => self.settle(pos_message_id),
            PosRequest::ReloadConfiguration => {
                self.config_version += 1;
                PosResponse::success(json!({ "configVersion": self.config_version }))
            }
            PosRequest::EnquiryBtConnectStatus => {
                PosResponse::success(json!({ "connected": self.bluetooth_connected }))
            }
        }
    }
}
