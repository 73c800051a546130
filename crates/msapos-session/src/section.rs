#![forbid(unsafe_code)]

//! The demo's sections, in screen order.

use std::fmt;

/// One section of the demo screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiSection {
    CheckInstallation,
    WarmUp,
    Activation,
    EnquiryApp,
    SaleTran,
    EnquiryTran,
    EnquiryTranWithMessageId,
    VoidTran,
    Settlement,
    RefundTran,
    ReloadConfiguration,
    EnquiryBluetoothConnectStatus,
}

impl UiSection {
    /// Every section, in screen order.
    pub const ALL: [UiSection; 12] = [
        UiSection::CheckInstallation,
        UiSection::WarmUp,
        UiSection::Activation,
        UiSection::EnquiryApp,
        UiSection::SaleTran,
        UiSection::EnquiryTran,
        UiSection::EnquiryTranWithMessageId,
        UiSection::VoidTran,
        UiSection::Settlement,
        UiSection::RefundTran,
        UiSection::ReloadConfiguration,
        UiSection::EnquiryBluetoothConnectStatus,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CheckInstallation => "Check SoftPOS Installation",
            Self::WarmUp => "Warm Up Checking",
            Self::Activation => "Activation App",
            Self::EnquiryApp => "Enquiry App Status",
            Self::SaleTran => "Sale Request",
            Self::EnquiryTran => "Enquiry Transaction Status",
            Self::EnquiryTranWithMessageId => "Enquiry Transaction Status With Pos MessageId",
            Self::VoidTran => "Void Transaction",
            Self::Settlement => "Settle Batch",
            Self::RefundTran => "Refund (After Settlement)",
            Self::ReloadConfiguration => "Reload Configuration",
            Self::EnquiryBluetoothConnectStatus => "Enquiry Bluetooth Connect Status",
        }
    }

    /// 1-based position on screen.
    #[must_use]
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|&s| s == self)
            .map_or(0, |idx| idx + 1)
    }
}

/// Numbered title, e.g. `1. Check SoftPOS Installation`.
impl fmt::Display for UiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}
