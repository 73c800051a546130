#![forbid(unsafe_code)]

//! Requests sent across the POS API boundary.
//!
//! Each variant is one call the demo can make. [`PosRequest::describe`] is
//! the line written to the message log before the call is launched.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A call to the POS application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PosRequest {
    /// Runtime readiness check required before other calls.
    WarmUp,
    /// Provision the POS application with an activation code.
    #[serde(rename_all = "camelCase")]
    Activation { activation_code: String },
    /// Query the POS application's state after activation.
    EnquiryDeviceStatus,
    /// Card sale.
    #[serde(rename_all = "camelCase")]
    Sale {
        #[serde(with = "rust_decimal::serde::str")]
        amount: Decimal,
        pos_message_id: String,
        auto_dismiss_result: bool,
    },
    /// Pre-authorisation.
    #[serde(rename_all = "camelCase")]
    Auth {
        #[serde(with = "rust_decimal::serde::str")]
        amount: Decimal,
        pos_message_id: String,
        auto_dismiss_result: bool,
    },
    /// Void a transaction of the current batch.
    #[serde(rename_all = "camelCase")]
    Void {
        org_tran_id: String,
        pos_message_id: String,
        admin_pwd: String,
    },
    /// Refund a transaction from a settled batch.
    #[serde(rename_all = "camelCase")]
    Refund {
        org_tran_id: String,
        pos_message_id: String,
        admin_pwd: String,
    },
    /// Look up a transaction by its ID.
    #[serde(rename_all = "camelCase")]
    EnquiryTranStatus { tran_id: String },
    /// Look up a transaction by the POS message ID it was sent with.
    #[serde(rename_all = "camelCase")]
    EnquiryTranStatusWithMessageId { pos_message_id: String },
    /// Close the current batch.
    #[serde(rename_all = "camelCase")]
    Settlement { pos_message_id: String },
    /// Ask the POS application to reload its configuration.
    ReloadConfiguration,
    /// Query the card reader's Bluetooth connection.
    EnquiryBtConnectStatus,
}

impl PosRequest {
    /// Variant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WarmUp => "WarmUp",
            Self::Activation { .. } => "Activation",
            Self::EnquiryDeviceStatus => "EnquiryDeviceStatus",
            Self::Sale { .. } => "Sale",
            Self::Auth { .. } => "Auth",
            Self::Void { .. } => "Void",
            Self::Refund { .. } => "Refund",
            Self::EnquiryTranStatus { .. } => "EnquiryTranStatus",
            Self::EnquiryTranStatusWithMessageId { .. } => "EnquiryTranStatusWithMessageId",
            Self::Settlement { .. } => "Settlement",
            Self::ReloadConfiguration => "ReloadConfiguration",
            Self::EnquiryBtConnectStatus => "EnquiryBtConnectStatus",
        }
    }

    /// Whether this call creates or reverses a transaction.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        matches!(
            self,
            Self::Sale { .. } | Self::Auth { .. } | Self::Void { .. } | Self::Refund { .. }
        )
    }

    /// Log line written when the call is launched.
    ///
    /// Calls without a payload read `Launch - <label>`; the rest print the
    /// request with its fields, e.g. `Sale(amount=2, posMessageId=.., autoDismissResult=true)`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::WarmUp => "Launch - WarmUp".into(),
            Self::EnquiryDeviceStatus => "Launch - Enquiry App Status".into(),
            Self::ReloadConfiguration => "Launch - Reload Configuration".into(),
            Self::EnquiryBtConnectStatus => "Launch - Enquiry Bluetooth Connection Status".into(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for PosRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Self::WarmUp
            | Self::EnquiryDeviceStatus
            | Self::ReloadConfiguration
            | Self::EnquiryBtConnectStatus => f.write_str(name),
            Self::Activation { activation_code } => {
                write!(f, "{name}(activationCode={activation_code})")
            }
            Self::Sale {
                amount,
                pos_message_id,
                auto_dismiss_result,
            }
            | Self::Auth {
                amount,
                pos_message_id,
                auto_dismiss_result,
            } => write!(
                f,
                "{name}(amount={amount}, posMessageId={pos_message_id}, autoDismissResult={auto_dismiss_result})"
            ),
            Self::Void {
                org_tran_id,
                pos_message_id,
                admin_pwd,
            }
            | Self::Refund {
                org_tran_id,
                pos_message_id,
                admin_pwd,
            } => write!(
                f,
                "{name}(orgTranId={org_tran_id}, posMessageId={pos_message_id}, adminPwd={admin_pwd})"
            ),
            Self::EnquiryTranStatus { tran_id } => write!(f, "{name}(tranId={tran_id})"),
            Self::EnquiryTranStatusWithMessageId { pos_message_id }
            | Self::Settlement { pos_message_id } => {
                write!(f, "{name}(posMessageId={pos_message_id})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale() -> PosRequest {
        PosRequest::Sale {
            amount: Decimal::new(1050, 2),
            pos_message_id: "m-1".into(),
            auto_dismiss_result: true,
        }
    }

    #[test]
    fn payload_less_calls_describe_as_launch() {
        assert_eq!(PosRequest::WarmUp.describe(), "Launch - WarmUp");
        assert_eq!(
            PosRequest::EnquiryDeviceStatus.describe(),
            "Launch - Enquiry App Status"
        );
        assert_eq!(
            PosRequest::ReloadConfiguration.describe(),
            "Launch - Reload Configuration"
        );
        assert_eq!(
            PosRequest::EnquiryBtConnectStatus.describe(),
            "Launch - Enquiry Bluetooth Connection Status"
        );
    }

    #[test]
    fn sale_describes_fields() {
        assert_eq!(
            sale().describe(),
            "Sale(amount=10.50, posMessageId=m-1, autoDismissResult=true)"
        );
    }

    #[test]
    fn activation_and_void_describe_fields() {
        let activation = PosRequest::Activation {
            activation_code: "767747582904".into(),
        };
        assert_eq!(activation.describe(), "Activation(activationCode=767747582904)");

        let void = PosRequest::Void {
            org_tran_id: "T1".into(),
            pos_message_id: "m-2".into(),
            admin_pwd: "123456".into(),
        };
        assert_eq!(
            void.describe(),
            "Void(orgTranId=T1, posMessageId=m-2, adminPwd=123456)"
        );
    }

    #[test]
    fn transaction_classification() {
        assert!(sale().is_transaction());
        assert!(!PosRequest::WarmUp.is_transaction());
        assert!(
            !PosRequest::Settlement {
                pos_message_id: "m".into()
            }
            .is_transaction()
        );
    }

    #[test]
    fn serializes_camel_case_with_string_amount() {
        let json = serde_json::to_value(sale()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "Sale",
                "amount": "10.50",
                "posMessageId": "m-1",
                "autoDismissResult": true
            })
        );
    }

    #[test]
    fn unit_variant_serializes_tag_only() {
        let json = serde_json::to_value(PosRequest::WarmUp).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "WarmUp" }));
    }
}
